//! Extensions to `k8s_openapi` types.
//!
//! These traits pull the handful of fields the report needs out of `Pod` and
//! `Container` objects, treating every absent optional field as empty.

mod container;
mod pod;

pub use self::{container::ContainerExt, pod::PodExt};
