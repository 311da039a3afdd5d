//! Mesh membership resolution
//!
//! Determines which cluster resources participate in the service mesh. Membership is decided in
//! layers:
//!
//! - A fixed set of system namespaces (the platform's own and the mesh control plane's) is never
//!   part of the mesh.
//! - The sidecar injector's policy includes and excludes namespaces. An exclusion always wins over
//!   an inclusion.
//! - Within an in-mesh namespace, a `Pod` is only in the mesh once a proxy has actually been
//!   injected into it. `Service` and `Endpoints` resources are in the mesh with their namespace,
//!   except for the platform's API server service.
//!
//! ```text
//! [ Namespace ] -> [ ExemptionSet ] -> [ MembershipPolicy ] -> [ Pod | Service | Endpoints ]
//! ```
//!
//! Every resolution reads a fresh snapshot from a `ClusterResources` provider and a
//! `PolicySource`; nothing is cached between calls.

#![deny(warnings, rust_2018_idioms)]
#![forbid(unsafe_code)]

mod error;
mod exemption;
mod injection;
pub mod policy;
mod protocol;
mod resolve;


pub use self::{
    error::{BoxError, Error, PolicyError, ProviderError, ResourceKind},
    exemption::ExemptionSet,
    injection::InjectionDetector,
    policy::{IncludeNamespaces, MembershipPolicy},
    protocol::service_port_prefixed,
    resolve::{ClusterResources, Membership, PolicySource, Resolver},
};
pub use mesh_vet_k8s_api as k8s;

/// Names reserved by the mesh and by the platform.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MeshConfig {
    /// Namespaces that are never part of the mesh.
    pub exemptions: ExemptionSet,

    /// Identifies pods into which a proxy has been injected.
    pub injection: InjectionDetector,

    /// The platform's API server service. Services and endpoints with this name are never part of
    /// the mesh.
    pub internal_service_name: String,
}

// === impl MeshConfig ===

impl MeshConfig {
    pub const DEFAULT_CONTROL_PLANE_NS: &'static str = "istio-system";
    pub const DEFAULT_INTERNAL_SERVICE_NAME: &'static str = "kubernetes";

    /// Istio's reserved names, with its control plane installed in `control_plane_ns`.
    pub fn istio(control_plane_ns: impl Into<String>) -> Self {
        Self {
            exemptions: ExemptionSet::new(control_plane_ns),
            injection: InjectionDetector::default(),
            internal_service_name: Self::DEFAULT_INTERNAL_SERVICE_NAME.to_string(),
        }
    }

    fn is_internal_service(&self, name: Option<&str>) -> bool {
        name == Some(self.internal_service_name.as_str())
    }
}

impl Default for MeshConfig {
    fn default() -> Self {
        Self::istio(Self::DEFAULT_CONTROL_PLANE_NS)
    }
}
