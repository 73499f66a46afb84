use snafu::ResultExt;
use tokio::io::AsyncWriteExt;

use crate::{
    cli::{
        Error, error,
        internal::{self, PodSource},
    },
    ui::table::ReportTableExt,
};

/// Prints the report of one namespace to stdout instead of saving it.
pub struct PreviewCommand {
    pub namespace: String,
}

impl PreviewCommand {
    pub async fn run<S>(self, source: &S) -> Result<(), Error>
    where
        S: PodSource + Sync,
    {
        let rendered = self.render(source).await?;
        let mut stdout = tokio::io::stdout();
        stdout.write_all(rendered.as_bytes()).await.context(error::WriteStdoutSnafu)?;
        stdout.write_u8(b'\n').await.context(error::WriteStdoutSnafu)?;
        stdout.flush().await.context(error::WriteStdoutSnafu)
    }

    async fn render<S>(&self, source: &S) -> Result<String, Error>
    where
        S: PodSource + Sync,
    {
        internal::load_table(source, &self.namespace).await.map(|table| table.render_table())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        cli::internal::tests::FakePodSource,
        report::testing::{container, pod},
    };

    #[tokio::test]
    async fn test_render_lists_namespace_containers() {
        let source = FakePodSource::new(vec![
            pod("shop", "web-0", vec![container("app", &[("memory", "1Gi")], &[])]),
            pod("billing", "api-0", vec![container("worker", &[], &[])]),
        ]);
        let command = PreviewCommand { namespace: "shop".to_string() };

        let rendered = command.render(&source).await.unwrap();
        assert!(rendered.contains("web-0"));
        assert!(rendered.contains("1Gi"));
        assert!(!rendered.contains("api-0"));
        assert!(rendered.contains("Requests: 0.000 CPU, 1.000 GiB memory"), "{rendered}");
    }
}
