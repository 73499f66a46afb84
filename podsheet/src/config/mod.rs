mod error;

use std::path::{Path, PathBuf};

use podsheet_base::consts;
use podsheet_cli::config::LogConfig;
use resolve_path::PathResolveExt;
use serde::{Deserialize, Serialize};
use snafu::ResultExt;

pub use self::error::Error;

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Namespace to export when neither `--namespace` nor `K8S_NAMESPACE` is
    /// given. Falls back to the namespace of the current kube context.
    #[serde(default)]
    pub namespace: Option<String>,

    #[serde(default = "default_output_file_path")]
    pub output_file_path: PathBuf,

    #[serde(default = "default_sheet_name")]
    pub sheet_name: String,

    #[serde(default = "LogConfig::default")]
    pub log: LogConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            namespace: None,
            output_file_path: default_output_file_path(),
            sheet_name: default_sheet_name(),
            log: LogConfig::default(),
        }
    }
}

impl Config {
    pub fn search_config_file_path() -> PathBuf {
        let paths = vec![Self::default_path()]
            .into_iter()
            .chain(podsheet_base::fallback_project_config_directories().into_iter().map(
                |mut path| {
                    path.push(podsheet_base::CLI_CONFIG_NAME);
                    path
                },
            ))
            .collect::<Vec<_>>();
        for path in paths {
            let Ok(exists) = path.try_exists() else {
                continue;
            };
            if exists {
                return path;
            }
        }
        Self::default_path()
    }

    #[inline]
    pub fn default_path() -> PathBuf {
        [
            podsheet_base::PROJECT_CONFIG_DIR.to_path_buf(),
            PathBuf::from(podsheet_base::CLI_CONFIG_NAME),
        ]
        .into_iter()
        .collect()
    }

    /// Loads the config at `path`, which must exist.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let path = resolve(path.as_ref())?;
        let data =
            std::fs::read(&path).context(error::OpenConfigSnafu { filename: path.clone() })?;
        let mut config: Self =
            serde_yaml::from_slice(&data).context(error::ParseConfigSnafu { filename: path })?;

        config.output_file_path = resolve(&config.output_file_path)?;
        config.log.file_path = config.log.file_path.as_deref().map(resolve).transpose()?;

        Ok(config)
    }

    /// Like [`Config::load`], but a missing file yields the defaults. Used
    /// for the searched location, so the exporter runs without any setup.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let path = resolve(path.as_ref())?;
        if path.try_exists().context(error::OpenConfigSnafu { filename: path.clone() })? {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// The default configuration rendered as YAML.
    pub fn template_basic() -> Result<String, Error> {
        serde_yaml::to_string(&Self::default()).context(error::SerializeConfigSnafu)
    }
}

fn resolve(path: &Path) -> Result<PathBuf, Error> {
    path.try_resolve()
        .map(|path| path.to_path_buf())
        .with_context(|_| error::ResolveFilePathSnafu { file_path: path.to_path_buf() })
}

fn default_output_file_path() -> PathBuf { PathBuf::from(consts::DEFAULT_OUTPUT_FILE_PATH) }

fn default_sheet_name() -> String { consts::DEFAULT_SHEET_NAME.to_string() }
