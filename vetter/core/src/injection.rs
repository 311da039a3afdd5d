use crate::k8s;

/// Identifies pods into which the mesh's proxy has actually been injected.
///
/// A pod being eligible for injection is not sufficient: the injector must have recorded its
/// status annotation on the pod _and_ the proxy container must be present in the pod spec.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InjectionDetector {
    pub status_annotation: String,
    pub proxy_container: String,
}

// === impl InjectionDetector ===

impl InjectionDetector {
    pub const ISTIO_STATUS_ANNOTATION: &'static str = "sidecar.istio.io/status";
    pub const ISTIO_PROXY_CONTAINER: &'static str = "istio-proxy";

    pub fn new(status_annotation: impl Into<String>, proxy_container: impl Into<String>) -> Self {
        Self {
            status_annotation: status_annotation.into(),
            proxy_container: proxy_container.into(),
        }
    }

    pub fn is_injected(&self, pod: &k8s::Pod) -> bool {
        let annotated = pod
            .metadata
            .annotations
            .as_ref()
            .is_some_and(|anns| anns.contains_key(&self.status_annotation));

        annotated
            && pod
                .spec
                .iter()
                .flat_map(|spec| spec.containers.iter())
                .any(|c| c.name == self.proxy_container)
    }
}

impl Default for InjectionDetector {
    fn default() -> Self {
        Self::new(Self::ISTIO_STATUS_ANNOTATION, Self::ISTIO_PROXY_CONTAINER)
    }
}
