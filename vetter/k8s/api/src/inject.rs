use serde::{Deserialize, Serialize};

/// The sidecar injector's configuration document, as stored in its ConfigMap.
///
/// Only the fields that determine which namespaces are eligible for injection are modeled. Other
/// fields (e.g. the injected template's `params`) are ignored when parsing.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InjectConfig {
    /// The injector's policy (e.g. `enabled`, `opt-out`). Its value has no bearing on membership,
    /// so it is kept verbatim.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub policy: Option<String>,

    /// Namespaces in which pods are injected. Empty (or absent) places no restriction; the
    /// `NAMESPACE_ALL` sentinel selects every namespace.
    #[serde(
        default,
        alias = "includeNamespaces",
        skip_serializing_if = "Option::is_none"
    )]
    pub namespaces: Option<Vec<String>>,

    /// Namespaces in which pods are never injected.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exclude_namespaces: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub initializer_name: Option<String>,
}

// === impl InjectConfig ===

impl InjectConfig {
    pub fn from_yaml(doc: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(doc)
    }
}
