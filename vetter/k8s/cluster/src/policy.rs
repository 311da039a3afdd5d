use kube::api::Api;
use mesh_vet_core::{k8s, MembershipPolicy, PolicyError, PolicySource};
use tracing::{debug, instrument};

/// Locates the sidecar injector's configuration document.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConfigMapRef {
    pub namespace: String,
    pub name: String,
    pub key: String,
}

/// Reads the membership policy from the sidecar injector's ConfigMap.
#[derive(Clone)]
pub struct InjectConfigMap {
    client: kube::Client,
    config_map: ConfigMapRef,
}

// === impl ConfigMapRef ===

impl ConfigMapRef {
    pub const DEFAULT_NAME: &'static str = "istio-inject";
    pub const DEFAULT_KEY: &'static str = "config";

    /// Decodes the membership policy from the referenced ConfigMap's contents.
    pub fn decode(&self, cm: &k8s::ConfigMap) -> Result<MembershipPolicy, PolicyError> {
        let doc = cm
            .data
            .as_ref()
            .and_then(|data| data.get(&self.key))
            .ok_or_else(|| PolicyError::MissingKey {
                name: self.to_string(),
                key: self.key.clone(),
            })?;

        let config =
            k8s::InjectConfig::from_yaml(doc).map_err(|e| PolicyError::Malformed(e.into()))?;
        debug!(
            policy = ?config.policy,
            initializer = ?config.initializer_name,
            "Parsed injector config"
        );

        Ok(MembershipPolicy::from(&config))
    }

    /// Decodes the membership policy from the result of looking up the referenced ConfigMap. A
    /// ConfigMap that does not exist means injection is not configured.
    fn decode_lookup(
        &self,
        lookup: Result<Option<k8s::ConfigMap>, kube::Error>,
    ) -> Result<MembershipPolicy, PolicyError> {
        match lookup {
            Ok(Some(cm)) => self.decode(&cm),
            Ok(None) => Err(PolicyError::Absent(self.to_string())),
            Err(error) => Err(PolicyError::Unavailable(error.into())),
        }
    }
}

impl std::fmt::Display for ConfigMapRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.namespace, self.name)
    }
}

// === impl InjectConfigMap ===

impl InjectConfigMap {
    pub fn new(client: kube::Client, config_map: ConfigMapRef) -> Self {
        Self { client, config_map }
    }
}

impl std::fmt::Debug for InjectConfigMap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InjectConfigMap")
            .field("config_map", &self.config_map)
            .finish_non_exhaustive()
    }
}

#[async_trait::async_trait]
impl PolicySource for InjectConfigMap {
    #[instrument(skip(self), fields(config_map = %self.config_map))]
    async fn membership_policy(&self) -> Result<MembershipPolicy, PolicyError> {
        let api = Api::<k8s::ConfigMap>::namespaced(
            self.client.clone(),
            &self.config_map.namespace,
        );
        let lookup = api.get_opt(&self.config_map.name).await;
        self.config_map.decode_lookup(lookup)
    }
}
