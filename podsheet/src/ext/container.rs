use k8s_openapi::{api::core::v1::Container, apimachinery::pkg::api::resource::Quantity};

use crate::report::ResourceKind;

pub trait ContainerExt {
    /// The requested amount of `kind`, if the container declares one.
    fn request(&self, kind: ResourceKind) -> Option<&Quantity>;

    /// The limit on `kind`, if the container declares one.
    fn limit(&self, kind: ResourceKind) -> Option<&Quantity>;
}

impl ContainerExt for Container {
    fn request(&self, kind: ResourceKind) -> Option<&Quantity> {
        self.resources.as_ref()?.requests.as_ref()?.get(kind.resource_name())
    }

    fn limit(&self, kind: ResourceKind) -> Option<&Quantity> {
        self.resources.as_ref()?.limits.as_ref()?.get(kind.resource_name())
    }
}
