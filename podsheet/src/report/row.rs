use k8s_openapi::api::core::v1::{Container, Pod};
use snafu::ResultExt;

use crate::{
    ext::{ContainerExt, PodExt},
    report::{
        CellValue, PodMetadata, ResourceKind, ResourceQuantity,
        error::{self, Error},
    },
};

/// A quantity as it appears in the report: the numeric scalar followed by its
/// canonical text.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QuantityCell {
    pub scalar: i64,
    pub canonical: String,
}

/// One report row, a single container of a single pod. Field order matches
/// [`HEADER`](crate::report::HEADER).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ContainerResourceRow {
    pub namespace: String,
    pub pod_name: String,
    pub node_name: String,
    pub container_name: String,
    pub request_cpu: QuantityCell,
    pub request_memory: QuantityCell,
    pub limit_cpu: QuantityCell,
    pub limit_memory: QuantityCell,
    pub affinity: String,
    pub node_selector: String,
    pub topology_spread_constraints: String,
}

impl ContainerResourceRow {
    /// Projects `container` of `pod` into a row.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidQuantity`] if one of the container's CPU or
    /// memory quantities is malformed.
    pub fn project(pod: &Pod, container: &Container) -> Result<Self, Error> {
        let PodMetadata { affinity, node_selector, topology_spread_constraints } =
            pod.spec.as_ref().map(PodMetadata::extract).unwrap_or_default();

        let cell = |kind: ResourceKind, field: &'static str, quantity| {
            ResourceQuantity::from_quantity(kind, quantity)
                .and_then(|quantity| quantity.format())
                .map(|(scalar, canonical)| QuantityCell { scalar, canonical })
                .with_context(|_| error::InvalidQuantitySnafu {
                    namespace: pod.namespace_or_default(),
                    pod_name: pod.name_or_default(),
                    container_name: container.name.clone(),
                    resource: kind.resource_name(),
                    field,
                })
        };

        Ok(Self {
            namespace: pod.namespace_or_default(),
            pod_name: pod.name_or_default(),
            node_name: pod.node_name_or_default(),
            container_name: container.name.clone(),
            request_cpu: cell(ResourceKind::Cpu, "request", container.request(ResourceKind::Cpu))?,
            request_memory: cell(
                ResourceKind::Memory,
                "request",
                container.request(ResourceKind::Memory),
            )?,
            limit_cpu: cell(ResourceKind::Cpu, "limit", container.limit(ResourceKind::Cpu))?,
            limit_memory: cell(
                ResourceKind::Memory,
                "limit",
                container.limit(ResourceKind::Memory),
            )?,
            affinity,
            node_selector,
            topology_spread_constraints,
        })
    }

    /// Projects every container of every pod, pods in listing order and
    /// containers in declaration order.
    ///
    /// # Errors
    ///
    /// Fails on the first container with a malformed quantity.
    pub fn project_all(pods: &[Pod]) -> Result<Vec<Self>, Error> {
        pods.iter()
            .flat_map(|pod| pod.containers().iter().map(move |container| (pod, container)))
            .map(|(pod, container)| Self::project(pod, container))
            .collect()
    }

    /// The row as the 15 cells written to the sheet.
    #[must_use]
    pub fn cells(&self) -> [CellValue; 15] {
        let text = |value: &String| CellValue::Text(value.clone());
        [
            text(&self.namespace),
            text(&self.pod_name),
            text(&self.node_name),
            text(&self.container_name),
            CellValue::Number(self.request_cpu.scalar),
            text(&self.request_cpu.canonical),
            CellValue::Number(self.request_memory.scalar),
            text(&self.request_memory.canonical),
            CellValue::Number(self.limit_cpu.scalar),
            text(&self.limit_cpu.canonical),
            CellValue::Number(self.limit_memory.scalar),
            text(&self.limit_memory.canonical),
            text(&self.affinity),
            text(&self.node_selector),
            text(&self.topology_spread_constraints),
        ]
    }
}
