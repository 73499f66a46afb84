use std::path::PathBuf;

use snafu::Snafu;

/// Errors raised while locating, reading or rendering the configuration file.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum Error {
    #[snafu(display("Failed to open config from {}, error: {source}", filename.display()))]
    OpenConfig { filename: PathBuf, source: std::io::Error },

    #[snafu(display("Failed to parse config from {}, error: {source}", filename.display()))]
    ParseConfig { filename: PathBuf, source: serde_yaml::Error },

    /// The path could not be expanded, e.g. `~` with no home directory.
    #[snafu(display("Failed to resolve file path {}, error: {source}", file_path.display()))]
    ResolveFilePath { file_path: PathBuf, source: std::io::Error },

    #[snafu(display("Failed to serialize default config, error: {source}"))]
    SerializeConfig { source: serde_yaml::Error },
}
