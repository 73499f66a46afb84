use snafu::Snafu;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum Error {
    #[snafu(display("{source}"))]
    Configuration { source: crate::config::Error },

    #[snafu(display("{source}"))]
    Report {
        #[snafu(source(from(crate::report::Error, Box::new)))]
        source: Box<crate::report::Error>,
    },

    #[snafu(display("{source}"))]
    Sink { source: crate::sink::Error },

    #[snafu(display("Failed to write to stdout, error: {source}"))]
    WriteStdout { source: std::io::Error },

    #[snafu(display("Failed to initialize Kubernetes client configuration, error: {source}"))]
    KubeConfig { source: kube::Error },

    #[snafu(display("Failed to list pods in namespace {namespace}, error: {source}"))]
    ListPodsWithNamespace {
        namespace: String,
        #[snafu(source(from(kube::Error, Box::new)))]
        source: Box<kube::Error>,
    },

    #[snafu(display("Failed to create tokio runtime, error: {source}"))]
    InitializeTokioRuntime { source: std::io::Error },
}

impl From<crate::config::Error> for Error {
    fn from(source: crate::config::Error) -> Self { Self::Configuration { source } }
}

impl From<crate::report::Error> for Error {
    fn from(source: crate::report::Error) -> Self { Self::Report { source: Box::new(source) } }
}

impl From<crate::sink::Error> for Error {
    fn from(source: crate::sink::Error) -> Self { Self::Sink { source } }
}
