use k8s_openapi::api::core::v1::Pod;
use kube::{Api, api::ListParams};
use snafu::ResultExt;

use crate::cli::{Error, error};

/// Supplies the pods of a namespace in listing order.
pub trait PodSource {
    /// Lists every pod of `namespace` in a single call; either the full list
    /// comes back or the call fails.
    fn list_pods(&self, namespace: &str) -> impl Future<Output = Result<Vec<Pod>, Error>> + Send;
}

impl PodSource for kube::Client {
    async fn list_pods(&self, namespace: &str) -> Result<Vec<Pod>, Error> {
        Api::<Pod>::namespaced(self.clone(), namespace)
            .list(&ListParams::default())
            .await
            .map(|list| list.items)
            .context(error::ListPodsWithNamespaceSnafu { namespace })
    }
}
