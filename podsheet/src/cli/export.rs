use std::path::PathBuf;

use crate::{
    cli::{
        Error,
        internal::{self, PodSource},
    },
    sink::XlsxSink,
};

/// Writes the report of one namespace to an `.xlsx` file.
pub struct ExportCommand {
    pub namespace: String,
    pub output_file_path: PathBuf,
    pub sheet_name: String,
}

impl ExportCommand {
    pub async fn run<S>(self, source: &S) -> Result<(), Error>
    where
        S: PodSource + Sync,
    {
        let Self { namespace, output_file_path, sheet_name } = self;

        let table = internal::load_table(source, &namespace).await?;

        let mut sink = XlsxSink::new(&sheet_name)?;
        table.write_to(&mut sink)?;
        sink.save(&output_file_path)?;

        let totals = table.totals();
        tracing::info!(
            "Saved {} row(s) to {}, requests: {:.3} CPU / {:.3} GiB, limits: {:.3} CPU / {:.3} GiB",
            table.rows().len(),
            output_file_path.display(),
            totals.request_cpu_cores,
            totals.request_memory_gib,
            totals.limit_cpu_cores,
            totals.limit_memory_gib,
        );
        Ok(())
    }
}
