//! Internal helpers shared by the CLI commands.
//!
//! `namespace` decides which namespace a run targets and `pod_source` is the
//! seam between the commands and the Kubernetes API.

mod namespace;
mod pod_source;

pub use self::{namespace::NamespaceResolver, pod_source::PodSource};
use crate::{cli::Error, report::Table};

/// Lists the pods of `namespace` and lays them out as a report table.
pub async fn load_table<S>(source: &S, namespace: &str) -> Result<Table, Error>
where
    S: PodSource + Sync,
{
    let pods = source.list_pods(namespace).await?;
    tracing::debug!("Listed {} pod(s) in namespace {namespace}", pods.len());

    let table = Table::from_pods(&pods)?;
    tracing::info!(
        "Collected {} container(s) from {} pod(s) in namespace {namespace}",
        table.rows().len(),
        pods.len()
    );
    Ok(table)
}

#[cfg(test)]
pub(crate) mod tests {
    use std::sync::Mutex;

    use k8s_openapi::api::core::v1::Pod;

    use super::*;
    use crate::{
        ext::PodExt,
        report::testing::{container, pod},
    };

    /// Serves pods from memory, filtered by namespace, and remembers which
    /// namespaces were asked for.
    #[derive(Debug, Default)]
    pub(crate) struct FakePodSource {
        pods: Vec<Pod>,
        requests: Mutex<Vec<String>>,
    }

    impl FakePodSource {
        pub(crate) fn new(pods: Vec<Pod>) -> Self { Self { pods, ..Self::default() } }

        pub(crate) fn requested_namespaces(&self) -> Vec<String> {
            self.requests.lock().unwrap().clone()
        }
    }

    impl PodSource for FakePodSource {
        async fn list_pods(&self, namespace: &str) -> Result<Vec<Pod>, Error> {
            self.requests.lock().unwrap().push(namespace.to_string());
            Ok(self
                .pods
                .iter()
                .filter(|pod| pod.namespace_or_default() == namespace)
                .cloned()
                .collect())
        }
    }

    #[tokio::test]
    async fn test_load_table_only_reads_requested_namespace() {
        let source = FakePodSource::new(vec![
            pod("shop", "web-0", vec![container("app", &[], &[]), container("proxy", &[], &[])]),
            pod("billing", "api-0", vec![container("app", &[], &[])]),
        ]);

        let table = load_table(&source, "shop").await.unwrap();
        assert_eq!(table.rows().len(), 2);
        assert!(table.rows().iter().all(|row| row.namespace == "shop"));
        assert_eq!(source.requested_namespaces(), ["shop"]);
    }

    #[test]
    fn test_load_table_future_is_send() {
        fn assert_send<T: Send>(_: &T) {}

        let source = FakePodSource::default();
        let future = load_table(&source, "shop");
        assert_send(&future);
    }

    #[tokio::test]
    async fn test_load_table_of_empty_namespace() {
        let table = load_table(&FakePodSource::default(), "nothing").await.unwrap();
        assert!(table.rows().is_empty());
    }
}
