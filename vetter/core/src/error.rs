pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Fails a membership resolution. No partial membership is ever returned alongside an error.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error(transparent)]
    Policy(#[from] PolicyError),
}

/// Indicates that listing cluster resources failed.
#[derive(Debug, thiserror::Error)]
#[error(
    "failed to list {kind} in {}: {source}",
    .namespace.as_deref().unwrap_or("cluster")
)]
pub struct ProviderError {
    pub kind: ResourceKind,

    /// The namespace being listed, if the listing was namespace-scoped.
    pub namespace: Option<String>,

    #[source]
    pub source: BoxError,
}

/// Indicates that the injection policy could not be obtained.
#[derive(Debug, thiserror::Error)]
pub enum PolicyError {
    /// The policy document does not exist, typically because sidecar injection has not been
    /// configured in the cluster.
    #[error("injection policy {0} not found")]
    Absent(String),

    #[error("injection policy {name} is missing key {key}")]
    MissingKey { name: String, key: String },

    #[error("failed to parse injection policy: {0}")]
    Malformed(#[source] BoxError),

    #[error("failed to fetch injection policy: {0}")]
    Unavailable(#[source] BoxError),
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    Namespace,
    Pod,
    Service,
    Endpoints,
}

// === impl Error ===

impl Error {
    /// Indicates that the injection policy does not exist, as opposed to being unreadable.
    pub fn is_policy_absent(&self) -> bool {
        matches!(self, Self::Policy(PolicyError::Absent(_)))
    }
}

// === impl ProviderError ===

impl ProviderError {
    pub(crate) fn cluster(kind: ResourceKind, source: BoxError) -> Self {
        Self {
            kind,
            namespace: None,
            source,
        }
    }

    pub(crate) fn namespaced(kind: ResourceKind, ns: &str, source: BoxError) -> Self {
        Self {
            kind,
            namespace: Some(ns.to_string()),
            source,
        }
    }
}

// === impl ResourceKind ===

impl std::fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Namespace => "namespaces".fmt(f),
            Self::Pod => "pods".fmt(f),
            Self::Service => "services".fmt(f),
            Self::Endpoints => "endpoints".fmt(f),
        }
    }
}
