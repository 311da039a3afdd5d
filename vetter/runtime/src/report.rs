use crate::{
    core::{k8s, Membership},
    Note,
};
use anyhow::{bail, Result};
use serde::Serialize;
use std::io::Write;

/// The resolved membership, as presented to the user.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Report {
    pub namespaces: Vec<String>,
    pub pods: Vec<ObjectRef>,
    pub services: Vec<ObjectRef>,
    pub endpoints: Vec<ObjectRef>,
    pub notes: Vec<Note>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ObjectRef {
    pub namespace: String,
    pub name: String,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Plain,
    Json,
}

// === impl Report ===

impl Report {
    pub fn write(&self, out: &mut impl Write, format: OutputFormat) -> Result<()> {
        match format {
            OutputFormat::Plain => self.write_plain(out)?,
            OutputFormat::Json => {
                serde_json::to_writer_pretty(&mut *out, self)?;
                writeln!(out)?;
            }
        }
        out.flush()?;
        Ok(())
    }

    fn write_plain(&self, out: &mut impl Write) -> std::io::Result<()> {
        for ns in &self.namespaces {
            writeln!(out, "namespace {ns}")?;
        }
        for (kind, refs) in [
            ("pod", &self.pods),
            ("service", &self.services),
            ("endpoints", &self.endpoints),
        ] {
            for r in refs {
                writeln!(out, "{kind} {}/{}", r.namespace, r.name)?;
            }
        }
        for note in &self.notes {
            writeln!(out, "{} {}: {}", note.level, note.vetter_type, note.summary)?;
        }
        Ok(())
    }
}

impl From<&Membership> for Report {
    fn from(membership: &Membership) -> Self {
        Self {
            namespaces: membership
                .namespaces
                .iter()
                .filter_map(|ns| ns.metadata.name.clone())
                .collect(),
            pods: ObjectRef::collect(membership.pods.iter().map(|p| &p.metadata)),
            services: ObjectRef::collect(membership.services.iter().map(|s| &s.metadata)),
            endpoints: ObjectRef::collect(membership.endpoints.iter().map(|e| &e.metadata)),
            notes: Vec::new(),
        }
    }
}

// === impl ObjectRef ===

impl ObjectRef {
    fn collect<'m>(metas: impl Iterator<Item = &'m k8s::ObjectMeta>) -> Vec<Self> {
        metas
            .map(|meta| Self {
                namespace: meta.namespace.clone().unwrap_or_default(),
                name: meta.name.clone().unwrap_or_default(),
            })
            .collect()
    }
}

// === impl OutputFormat ===

impl std::str::FromStr for OutputFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "plain" => Ok(Self::Plain),
            "json" => Ok(Self::Json),
            s => bail!("invalid output format: {s:?}"),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Plain => "plain".fmt(f),
            Self::Json => "json".fmt(f),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::NoteLevel;

    fn mk_meta(ns: Option<&str>, name: &str) -> k8s::ObjectMeta {
        k8s::ObjectMeta {
            namespace: ns.map(ToString::to_string),
            name: Some(name.to_string()),
            ..Default::default()
        }
    }

    fn membership() -> Membership {
        Membership {
            namespaces: vec![k8s::Namespace {
                metadata: mk_meta(None, "team-a"),
                ..Default::default()
            }],
            pods: vec![k8s::Pod {
                metadata: mk_meta(Some("team-a"), "p1"),
                ..Default::default()
            }],
            services: vec![k8s::Service {
                metadata: mk_meta(Some("team-a"), "web"),
                ..Default::default()
            }],
            endpoints: vec![k8s::Endpoints {
                metadata: mk_meta(Some("team-a"), "web"),
                ..Default::default()
            }],
        }
    }

    fn render(report: &Report, format: OutputFormat) -> String {
        let mut out = Vec::new();
        report.write(&mut out, format).expect("report must render");
        String::from_utf8(out).expect("report must be utf-8")
    }

    #[test]
    fn from_membership() {
        let report = Report::from(&membership());
        assert_eq!(report.namespaces, ["team-a"]);
        assert_eq!(
            report.pods,
            [ObjectRef {
                namespace: "team-a".to_string(),
                name: "p1".to_string(),
            }]
        );
        assert_eq!(report.services.len(), 1);
        assert_eq!(report.endpoints.len(), 1);
        assert!(report.notes.is_empty());
    }

    #[test]
    fn plain() {
        let mut report = Report::from(&membership());
        report.notes.push(Note {
            vetter_type: "ports".to_string(),
            summary: "port \"web\" is not prefixed".to_string(),
            level: NoteLevel::Warning,
        });
        assert_eq!(
            render(&report, OutputFormat::Plain),
            "namespace team-a\n\
             pod team-a/p1\n\
             service team-a/web\n\
             endpoints team-a/web\n\
             WARNING ports: port \"web\" is not prefixed\n"
        );
    }

    #[test]
    fn json() {
        let report = Report {
            notes: vec![Note::initializer_disabled("mesh-membership")],
            ..Default::default()
        };
        let value: serde_json::Value =
            serde_json::from_str(&render(&report, OutputFormat::Json)).expect("must be json");
        assert_eq!(
            value,
            serde_json::json!({
                "namespaces": [],
                "pods": [],
                "services": [],
                "endpoints": [],
                "notes": [{
                    "type": "mesh-membership",
                    "summary": "Istio initializer is not configured. Enable initializer and \
                                automatic sidecar injection to use \"mesh-membership\" vetter.",
                    "level": "INFO",
                }],
            })
        );
    }

    #[test]
    fn output_format() {
        assert_eq!("plain".parse::<OutputFormat>().unwrap(), OutputFormat::Plain);
        assert_eq!("json".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert!("yaml".parse::<OutputFormat>().is_err());
        assert_eq!(OutputFormat::Json.to_string(), "json");
    }
}
