use crate::config::Config;

/// Picks the namespace a run exports, in order of precedence: the
/// `--namespace` flag (or `K8S_NAMESPACE`), the `namespace` config key, then
/// the namespace of the current kube context.
pub struct NamespaceResolver<'c> {
    default_namespace: &'c str,
    config: &'c Config,
}

impl<'c> From<(&'c kube::Client, &'c Config)> for NamespaceResolver<'c> {
    fn from((kube_client, config): (&'c kube::Client, &'c Config)) -> Self {
        Self { default_namespace: kube_client.default_namespace(), config }
    }
}

impl NamespaceResolver<'_> {
    /// Empty values count as unset, so `K8S_NAMESPACE=""` falls through to
    /// the next source.
    pub fn resolve(&self, namespace: Option<String>) -> String {
        let Self { default_namespace, config } = self;
        namespace
            .filter(|s| !s.is_empty())
            .or_else(|| config.namespace.clone().filter(|s| !s.is_empty()))
            .unwrap_or_else(|| (*default_namespace).to_string())
    }
}
