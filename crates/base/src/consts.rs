pub mod k8s {
    pub mod resources {
        //! Resource names used as keys in container requests and limits.

        pub const CPU: &str = "cpu";
        pub const MEMORY: &str = "memory";
    }
}

pub mod env {
    //! Environment variables read at startup.

    /// Namespace to export.
    pub const NAMESPACE: &str = "K8S_NAMESPACE";
    pub const OUTPUT_FILE_PATH: &str = "PODSHEET_OUTPUT";
    pub const CONFIG_FILE_PATH: &str = "PODSHEET_CONFIG_FILE_PATH";
    pub const LOG_LEVEL: &str = "PODSHEET_LOG_LEVEL";
}

pub const DEFAULT_OUTPUT_FILE_PATH: &str = "resource.xlsx";
pub const DEFAULT_SHEET_NAME: &str = "Sheet1";
