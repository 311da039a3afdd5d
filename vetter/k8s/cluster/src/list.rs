use kube::api::{Api, ListParams};
use mesh_vet_core::{k8s, BoxError, ClusterResources};
use serde::de::DeserializeOwned;
use std::fmt::Debug;
use tracing::{debug, instrument, trace};

/// Lists cluster resources from the Kubernetes API.
#[derive(Clone)]
pub struct KubeCluster {
    client: kube::Client,
    page_size: u32,
}

// === impl KubeCluster ===

impl KubeCluster {
    pub const DEFAULT_PAGE_SIZE: u32 = 500;

    pub fn new(client: kube::Client, page_size: u32) -> Self {
        Self { client, page_size }
    }
}

impl Debug for KubeCluster {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KubeCluster")
            .field("page_size", &self.page_size)
            .finish_non_exhaustive()
    }
}

#[async_trait::async_trait]
impl ClusterResources for KubeCluster {
    async fn list_namespaces(&self) -> Result<Vec<k8s::Namespace>, BoxError> {
        let api = Api::<k8s::Namespace>::all(self.client.clone());
        Ok(list_all(api, self.page_size).await?)
    }

    async fn list_pods(&self, namespace: &str) -> Result<Vec<k8s::Pod>, BoxError> {
        let api = Api::<k8s::Pod>::namespaced(self.client.clone(), namespace);
        Ok(list_all(api, self.page_size).await?)
    }

    async fn list_services(&self, namespace: &str) -> Result<Vec<k8s::Service>, BoxError> {
        let api = Api::<k8s::Service>::namespaced(self.client.clone(), namespace);
        Ok(list_all(api, self.page_size).await?)
    }

    async fn list_endpoints(&self, namespace: &str) -> Result<Vec<k8s::Endpoints>, BoxError> {
        let api = Api::<k8s::Endpoints>::namespaced(self.client.clone(), namespace);
        Ok(list_all(api, self.page_size).await?)
    }
}

/// Lists every object, following continue tokens until the listing is exhausted.
#[instrument(skip(api), fields(url = %api.resource_url()))]
async fn list_all<K>(api: Api<K>, page_size: u32) -> Result<Vec<K>, kube::Error>
where
    K: kube::Resource + Clone + DeserializeOwned + Debug,
{
    let mut items = Vec::new();
    let mut params = ListParams::default().limit(page_size);
    loop {
        let page = api.list(&params).await?;
        trace!(items = page.items.len(), "Listed page");
        items.extend(page.items);
        match next_page(page.metadata.continue_) {
            Some(token) => params = params.continue_token(&token),
            None => break,
        }
    }
    debug!(items = items.len(), "Listed");
    Ok(items)
}

/// The API server signals the last page with an absent or empty continue token.
fn next_page(token: Option<String>) -> Option<String> {
    token.filter(|t| !t.is_empty())
}
