//! The `podsheet` command line.
//!
//! Exports the CPU and memory requests and limits of every container in a
//! namespace, together with the pods' scheduling constraints, to a
//! spreadsheet with filter-aware totals.
//!
//! # Examples
//!
//! ```bash
//! # Export the current context's namespace to ./resource.xlsx
//! podsheet
//!
//! # Export another namespace to a chosen file
//! podsheet export -n shop -o shop.xlsx
//!
//! # Print the same rows in the terminal
//! podsheet preview -n shop
//! ```

pub mod error;
mod export;
mod internal;
mod preview;

use std::{io::Write, path::PathBuf};

use clap::{CommandFactory, Parser, Subcommand};
use podsheet_base::{CLI_PROGRAM_NAME, consts::env};
use snafu::ResultExt;
use tokio::runtime::Runtime;

pub use self::error::Error;
use self::{export::ExportCommand, internal::NamespaceResolver, preview::PreviewCommand};
use crate::{config::Config, shadow};

#[derive(Parser)]
#[command(
    name = CLI_PROGRAM_NAME,
    author,
    version,
    long_version = shadow::CLAP_LONG_VERSION,
    about = "Export Kubernetes container requests, limits and scheduling constraints to a \
             spreadsheet.",
    color = clap::ColorChoice::Always
)]
pub struct Cli {
    /// Runs `export` when omitted.
    #[clap(subcommand)]
    commands: Option<Commands>,

    #[clap(
        long = "namespace",
        short = 'n',
        global = true,
        env = env::NAMESPACE,
        help = "Kubernetes namespace to export. Defaults to the config file's namespace, then \
                the current Kubernetes context's namespace."
    )]
    namespace: Option<String>,

    #[clap(
        long = "output",
        short = 'o',
        global = true,
        env = env::OUTPUT_FILE_PATH,
        help = "Path of the spreadsheet to write. Defaults to resource.xlsx."
    )]
    output_file_path: Option<PathBuf>,

    #[clap(
        long = "config",
        short = 'c',
        env = env::CONFIG_FILE_PATH,
        help = "Specify a configuration file. Defaults to ~/.config/podsheet/config.yaml or \
                PODSHEET_CONFIG_FILE_PATH env var."
    )]
    config_file: Option<PathBuf>,

    #[clap(
        long = "log-level",
        env = env::LOG_LEVEL,
        help = "Set the logging level (e.g., info, debug, trace)."
    )]
    log_level: Option<tracing::Level>,
}

#[derive(Clone, Subcommand)]
pub enum Commands {
    #[command(about = "Display client and server version information")]
    Version {
        #[clap(long = "client", help = "If true, shows client version only (no server required).")]
        client: bool,
    },

    #[command(about = "Generate shell completion script for the specified shell (bash, zsh, fish)")]
    Completions { shell: clap_complete::Shell },

    #[command(about = "Output the default configuration in YAML format")]
    DefaultConfig,

    #[command(alias = "e", about = "Write the resource report of a namespace to a spreadsheet")]
    Export,

    #[command(alias = "p", about = "Print the resource report of a namespace as a table")]
    Preview,
}

impl Default for Cli {
    fn default() -> Self { Self::parse() }
}

impl Cli {
    /// Loads the configuration file and applies the overrides given on the
    /// command line. A file named with `--config` must exist; the searched
    /// default location may be absent.
    fn load_config(&self) -> Result<Config, Error> {
        let mut config = match &self.config_file {
            Some(path) => Config::load(path)?,
            None => Config::load_or_default(Config::search_config_file_path())?,
        };

        if let Some(log_level) = self.log_level {
            config.log.level = log_level;
        }
        if let Some(output_file_path) = self.output_file_path.clone() {
            config.output_file_path = output_file_path;
        }

        Ok(config)
    }

    /// Runs the selected command and returns the process exit code.
    ///
    /// # Errors
    ///
    /// Returns an `Error` if the configuration cannot be loaded, the
    /// Kubernetes client or the Tokio runtime cannot be initialized, or the
    /// command itself fails.
    pub fn run(self) -> Result<i32, Error> {
        let client_version = Self::command().get_version().unwrap_or_default().to_string();
        match self.commands {
            Some(Commands::Version { client }) if client => {
                let info = format!(
                    "{}Client Version: {client_version}\n",
                    Self::command().render_long_version()
                );
                std::io::stdout().write_all(info.as_bytes()).context(error::WriteStdoutSnafu)?;
                return Ok(0);
            }
            Some(Commands::Completions { shell }) => {
                let mut app = Self::command();
                let bin_name = app.get_name().to_string();
                clap_complete::generate(shell, &mut app, bin_name, &mut std::io::stdout());
                return Ok(0);
            }
            Some(Commands::DefaultConfig) => {
                std::io::stdout()
                    .write_all(Config::template_basic()?.as_bytes())
                    .context(error::WriteStdoutSnafu)?;
                return Ok(0);
            }
            _ => {}
        }

        let config = self.load_config()?;
        config.log.registry();

        let fut = async move {
            let kube_client = kube::Client::try_default().await.context(error::KubeConfigSnafu)?;
            let namespace =
                NamespaceResolver::from((&kube_client, &config)).resolve(self.namespace);

            match self.commands {
                Some(Commands::Version { .. }) => {
                    let server_version = kube_client.apiserver_version().await.map_or_else(
                        |_| "unknown".to_string(),
                        |info| format!("{}.{}", info.major, info.minor),
                    );
                    let info = format!(
                        "{}Client Version: {client_version}\nServer Version: {server_version}\n",
                        Self::command().render_long_version()
                    );
                    std::io::stdout()
                        .write_all(info.as_bytes())
                        .context(error::WriteStdoutSnafu)?;
                }
                Some(Commands::Preview) => {
                    PreviewCommand { namespace }.run(&kube_client).await?;
                }
                _ => {
                    let Config { output_file_path, sheet_name, .. } = config;
                    ExportCommand { namespace, output_file_path, sheet_name }
                        .run(&kube_client)
                        .await?;
                }
            }

            Ok(0)
        };

        Runtime::new().context(error::InitializeTokioRuntimeSnafu)?.block_on(fut)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_is_well_formed() { Cli::command().debug_assert(); }

    #[test]
    fn test_no_subcommand_means_export() {
        let cli = Cli::try_parse_from(["podsheet", "-n", "shop", "-o", "shop.xlsx"]).unwrap();
        assert!(cli.commands.is_none());
        assert_eq!(cli.namespace.as_deref(), Some("shop"));
        assert_eq!(cli.output_file_path, Some(PathBuf::from("shop.xlsx")));
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["podsheet", "preview", "--namespace", "billing"]).unwrap();
        assert!(matches!(cli.commands, Some(Commands::Preview)));
        assert_eq!(cli.namespace.as_deref(), Some("billing"));
    }

    #[test]
    fn test_missing_config_flag_file_fails() {
        let directory = tempfile::tempdir().unwrap();
        let config_arg = directory.path().join("absent.yaml").display().to_string();

        let cli = Cli::try_parse_from(["podsheet", "-c", config_arg.as_str()]).unwrap();
        let err = cli.load_config().unwrap_err();
        assert!(matches!(err, Error::Configuration { .. }), "{err}");
    }

    #[test]
    fn test_output_flag_overrides_config() {
        let directory = tempfile::tempdir().unwrap();
        let config_file = directory.path().join("config.yaml");
        let from_config = directory.path().join("from-config.xlsx");
        std::fs::write(&config_file, format!("outputFilePath: {}\n", from_config.display()))
            .unwrap();
        let config_arg = config_file.display().to_string();

        let cli =
            Cli::try_parse_from(["podsheet", "-c", config_arg.as_str(), "-o", "flag.xlsx"]).unwrap();
        assert_eq!(cli.load_config().unwrap().output_file_path, PathBuf::from("flag.xlsx"));

        if std::env::var_os(env::OUTPUT_FILE_PATH).is_none() {
            let cli = Cli::try_parse_from(["podsheet", "-c", config_arg.as_str()]).unwrap();
            assert_eq!(cli.load_config().unwrap().output_file_path, from_config);
        }
    }
}
