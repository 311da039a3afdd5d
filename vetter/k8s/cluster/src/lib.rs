//! Kubernetes API bindings for mesh membership resolution.
//!
//! `KubeCluster` lists namespaces, pods, services, and endpoints through the API server's paged
//! list API. `InjectConfigMap` reads the sidecar injector's policy from its ConfigMap.

#![deny(warnings, rust_2018_idioms)]
#![forbid(unsafe_code)]

mod list;
mod policy;

pub use self::{
    list::KubeCluster,
    policy::{ConfigMapRef, InjectConfigMap},
};
