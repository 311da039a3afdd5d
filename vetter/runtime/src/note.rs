use crate::core::{k8s, service_port_prefixed};
use serde::Serialize;

/// A finding reported to the user.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Note {
    #[serde(rename = "type")]
    pub vetter_type: String,
    pub summary: String,
    pub level: NoteLevel,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum NoteLevel {
    Info,
    Warning,
    Error,
}

// === impl Note ===

impl Note {
    /// Reports that membership could not be resolved because sidecar injection has not been
    /// configured in the cluster.
    pub fn initializer_disabled(vetter: &str) -> Self {
        Self {
            vetter_type: vetter.to_string(),
            summary: format!(
                "Istio initializer is not configured. Enable initializer and automatic sidecar \
                 injection to use \"{vetter}\" vetter."
            ),
            level: NoteLevel::Info,
        }
    }

    /// Warns about service ports whose names do not declare a protocol the mesh supports. UDP
    /// ports are not proxied and are skipped.
    pub fn unprefixed_service_ports(vetter: &str, services: &[k8s::Service]) -> Vec<Self> {
        let mut notes = Vec::new();
        for svc in services {
            let ns = svc.metadata.namespace.as_deref().unwrap_or_default();
            let name = svc.metadata.name.as_deref().unwrap_or_default();
            let ports = svc
                .spec
                .iter()
                .flat_map(|spec| spec.ports.iter().flatten())
                .filter(|port| port.protocol.as_deref() != Some("UDP"));
            for port in ports {
                let port_name = port.name.as_deref().unwrap_or_default();
                if service_port_prefixed(port_name) {
                    continue;
                }
                let port_ref = if port_name.is_empty() {
                    port.port.to_string()
                } else {
                    format!("{port_name:?}")
                };
                notes.push(Self {
                    vetter_type: vetter.to_string(),
                    summary: format!(
                        "Service {ns}/{name} port {port_ref} name is not prefixed with a \
                         supported protocol (http, http2, grpc, mongo, redis, tcp)"
                    ),
                    level: NoteLevel::Warning,
                });
            }
        }
        notes
    }
}

// === impl NoteLevel ===

impl std::fmt::Display for NoteLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Info => "INFO".fmt(f),
            Self::Warning => "WARNING".fmt(f),
            Self::Error => "ERROR".fmt(f),
        }
    }
}
