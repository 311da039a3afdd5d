use crate::{
    k8s, BoxError, Error, MembershipPolicy, MeshConfig, PolicyError, ProviderError, ResourceKind,
};
use tracing::{debug, instrument, warn};

/// Lists cluster resources.
///
/// Implementations own any paging, deadline, and retry behavior; the resolver calls each method at
/// most once per namespace and propagates failures as-is.
#[async_trait::async_trait]
pub trait ClusterResources {
    async fn list_namespaces(&self) -> Result<Vec<k8s::Namespace>, BoxError>;

    async fn list_pods(&self, namespace: &str) -> Result<Vec<k8s::Pod>, BoxError>;

    async fn list_services(&self, namespace: &str) -> Result<Vec<k8s::Service>, BoxError>;

    async fn list_endpoints(&self, namespace: &str) -> Result<Vec<k8s::Endpoints>, BoxError>;
}

/// Provides the sidecar injector's current membership policy.
#[async_trait::async_trait]
pub trait PolicySource {
    async fn membership_policy(&self) -> Result<MembershipPolicy, PolicyError>;
}

/// All in-mesh resources, resolved against a single view of in-mesh namespaces.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Membership {
    pub namespaces: Vec<k8s::Namespace>,
    pub pods: Vec<k8s::Pod>,
    pub services: Vec<k8s::Service>,
    pub endpoints: Vec<k8s::Endpoints>,
}

/// Resolves mesh membership against a cluster.
///
/// Each resolution lists resources anew, one namespace at a time in the order the namespaces were
/// listed. The first failure aborts the resolution.
#[derive(Clone, Debug)]
pub struct Resolver<C, P> {
    cluster: C,
    policy: P,
    config: MeshConfig,
}

// === impl Resolver ===

impl<C, P> Resolver<C, P>
where
    C: ClusterResources,
    P: PolicySource,
{
    pub fn new(cluster: C, policy: P, config: MeshConfig) -> Self {
        Self {
            cluster,
            policy,
            config,
        }
    }

    pub fn config(&self) -> &MeshConfig {
        &self.config
    }

    pub fn cluster(&self) -> &C {
        &self.cluster
    }

    #[instrument(skip(self))]
    pub async fn in_mesh_namespaces(&self) -> Result<Vec<k8s::Namespace>, Error> {
        let namespaces = self.cluster.list_namespaces().await.map_err(|error| {
            warn!(%error, "Failed to list namespaces");
            ProviderError::cluster(ResourceKind::Namespace, error)
        })?;

        let policy = self.policy.membership_policy().await.map_err(|error| {
            warn!(%error, "Failed to obtain injection policy");
            error
        })?;
        debug!(?policy);

        let total = namespaces.len();
        let namespaces = policy.resolve_namespaces(&self.config.exemptions, namespaces);
        debug!(total, in_mesh = namespaces.len(), "Resolved namespaces");
        Ok(namespaces)
    }

    #[instrument(skip(self))]
    pub async fn in_mesh_pods(&self) -> Result<Vec<k8s::Pod>, Error> {
        let namespaces = self.in_mesh_namespaces().await?;
        self.pods_in(&namespaces).await
    }

    #[instrument(skip(self))]
    pub async fn in_mesh_services(&self) -> Result<Vec<k8s::Service>, Error> {
        let namespaces = self.in_mesh_namespaces().await?;
        self.services_in(&namespaces).await
    }

    #[instrument(skip(self))]
    pub async fn in_mesh_endpoints(&self) -> Result<Vec<k8s::Endpoints>, Error> {
        let namespaces = self.in_mesh_namespaces().await?;
        self.endpoints_in(&namespaces).await
    }

    /// Resolves all resource kinds from one namespace resolution, so that they agree on which
    /// namespaces are in the mesh.
    #[instrument(skip(self))]
    pub async fn membership(&self) -> Result<Membership, Error> {
        let namespaces = self.in_mesh_namespaces().await?;
        let pods = self.pods_in(&namespaces).await?;
        let services = self.services_in(&namespaces).await?;
        let endpoints = self.endpoints_in(&namespaces).await?;
        Ok(Membership {
            namespaces,
            pods,
            services,
            endpoints,
        })
    }

    async fn pods_in(&self, namespaces: &[k8s::Namespace]) -> Result<Vec<k8s::Pod>, Error> {
        let mut pods = Vec::new();
        for ns in names(namespaces) {
            let list = self
                .cluster
                .list_pods(ns)
                .await
                .map_err(|error| list_failed(ResourceKind::Pod, ns, error))?;
            let total = list.len();
            pods.extend(
                list.into_iter()
                    .filter(|pod| self.config.injection.is_injected(pod)),
            );
            debug!(%ns, total, "Listed pods");
        }
        Ok(pods)
    }

    async fn services_in(
        &self,
        namespaces: &[k8s::Namespace],
    ) -> Result<Vec<k8s::Service>, Error> {
        let mut services = Vec::new();
        for ns in names(namespaces) {
            let list = self
                .cluster
                .list_services(ns)
                .await
                .map_err(|error| list_failed(ResourceKind::Service, ns, error))?;
            services.extend(
                list.into_iter()
                    .filter(|svc| !self.config.is_internal_service(svc.metadata.name.as_deref())),
            );
        }
        Ok(services)
    }

    async fn endpoints_in(
        &self,
        namespaces: &[k8s::Namespace],
    ) -> Result<Vec<k8s::Endpoints>, Error> {
        let mut endpoints = Vec::new();
        for ns in names(namespaces) {
            let list = self
                .cluster
                .list_endpoints(ns)
                .await
                .map_err(|error| list_failed(ResourceKind::Endpoints, ns, error))?;
            endpoints.extend(
                list.into_iter()
                    .filter(|ep| !self.config.is_internal_service(ep.metadata.name.as_deref())),
            );
        }
        Ok(endpoints)
    }
}

fn names(namespaces: &[k8s::Namespace]) -> impl Iterator<Item = &str> {
    namespaces
        .iter()
        .filter_map(|ns| ns.metadata.name.as_deref())
}

fn list_failed(kind: ResourceKind, ns: &str, error: BoxError) -> Error {
    warn!(%ns, %error, "Failed to list {kind}");
    ProviderError::namespaced(kind, ns, error).into()
}
