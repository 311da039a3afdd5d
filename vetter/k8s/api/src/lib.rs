#![deny(warnings, rust_2018_idioms)]
#![forbid(unsafe_code)]

pub mod inject;

pub use self::inject::InjectConfig;
pub use k8s_openapi::{
    api::{
        self,
        core::v1::{
            ConfigMap, Container, Endpoints, Namespace, Pod, PodSpec, Service, ServicePort,
            ServiceSpec,
        },
    },
    apimachinery::pkg::apis::meta::v1::ObjectMeta,
};
pub use kube::ResourceExt;

/// Designates every namespace when it appears in a list of namespace names.
pub const NAMESPACE_ALL: &str = "";
