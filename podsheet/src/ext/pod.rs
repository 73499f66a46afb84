use k8s_openapi::{
    Metadata,
    api::core::v1::{Container, Pod},
};

pub trait PodExt {
    fn namespace_or_default(&self) -> String;

    fn name_or_default(&self) -> String;

    /// The node the pod is bound to, empty while it is unscheduled.
    fn node_name_or_default(&self) -> String;

    /// Application containers in declaration order. Init and ephemeral
    /// containers are not part of the report.
    fn containers(&self) -> &[Container];
}

impl PodExt for Pod {
    fn namespace_or_default(&self) -> String {
        self.metadata().namespace.clone().unwrap_or_default()
    }

    fn name_or_default(&self) -> String { self.metadata().name.clone().unwrap_or_default() }

    fn node_name_or_default(&self) -> String {
        self.spec.as_ref().and_then(|spec| spec.node_name.clone()).unwrap_or_default()
    }

    fn containers(&self) -> &[Container] {
        self.spec.as_ref().map(|spec| spec.containers.as_slice()).unwrap_or_default()
    }
}
