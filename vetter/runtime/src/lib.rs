#![deny(warnings, rust_2018_idioms)]
#![forbid(unsafe_code)]

pub use mesh_vet_core as core;
pub use mesh_vet_k8s_cluster as cluster;

mod args;
mod note;
mod report;

pub use self::{
    args::Args,
    note::{Note, NoteLevel},
    report::{ObjectRef, OutputFormat, Report},
};
