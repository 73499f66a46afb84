//! Text renderings of a pod's scheduling constraints.
//!
//! Each rendering is total and deterministic: absent data becomes an empty
//! string, present data is rendered in full with every sub-field named, and
//! map entries are emitted in key order.

use std::{collections::BTreeMap, fmt};

use k8s_openapi::api::core::v1::{Affinity, PodSpec, TopologySpreadConstraint};
use serde::Serialize;

/// The three scheduling columns of a report row.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PodMetadata {
    pub affinity: String,
    pub node_selector: String,
    pub topology_spread_constraints: String,
}

impl PodMetadata {
    #[must_use]
    pub fn extract(spec: &PodSpec) -> Self {
        Self {
            affinity: render_affinity(spec.affinity.as_ref()),
            node_selector: render_node_selector(spec.node_selector.iter().flatten()),
            topology_spread_constraints: render_topology_spread_constraints(
                spec.topology_spread_constraints.as_deref().unwrap_or_default(),
            ),
        }
    }
}

/// Renders all three affinity kinds, `null` for the ones that are unset.
#[must_use]
pub fn render_affinity(affinity: Option<&Affinity>) -> String {
    let Some(affinity) = affinity else {
        return String::new();
    };
    format!(
        "nodeAffinity={} podAffinity={} podAntiAffinity={}",
        compact_json(&affinity.node_affinity),
        compact_json(&affinity.pod_affinity),
        compact_json(&affinity.pod_anti_affinity),
    )
}

/// Renders `key=value` pairs sorted by key and joined with `,`.
#[must_use]
pub fn render_node_selector<'a, I>(selector: I) -> String
where
    I: IntoIterator<Item = (&'a String, &'a String)>,
{
    selector
        .into_iter()
        .collect::<BTreeMap<_, _>>()
        .into_iter()
        .map(|(key, value)| format!("{key}={value}"))
        .collect::<Vec<_>>()
        .join(",")
}

/// Renders every constraint in declaration order, joined with `; `.
#[must_use]
pub fn render_topology_spread_constraints(constraints: &[TopologySpreadConstraint]) -> String {
    constraints
        .iter()
        .map(|constraint| {
            format!(
                "topologyKey={} maxSkew={} whenUnsatisfiable={} labelSelector={} minDomains={} \
                 nodeAffinityPolicy={} nodeTaintsPolicy={} matchLabelKeys={}",
                constraint.topology_key,
                constraint.max_skew,
                constraint.when_unsatisfiable,
                compact_json(&constraint.label_selector),
                compact_json(&constraint.min_domains),
                compact_json(&constraint.node_affinity_policy),
                compact_json(&constraint.node_taints_policy),
                compact_json(&constraint.match_label_keys),
            )
        })
        .collect::<Vec<_>>()
        .join("; ")
}

/// Serializes to single-line JSON. The `Debug` form stands in if
/// serialization fails, so a field is never dropped from the output.
fn compact_json<T>(value: &T) -> String
where
    T: Serialize + fmt::Debug,
{
    serde_json::to_string(value).unwrap_or_else(|_| format!("{value:?}"))
}
