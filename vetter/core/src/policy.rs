use crate::{k8s, ExemptionSet};
use std::collections::BTreeSet;
use tracing::trace;

/// Describes which namespaces the sidecar injector applies to.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MembershipPolicy {
    pub include: IncludeNamespaces,

    /// Namespaces that are never part of the mesh. Takes precedence over `include`.
    pub exclude: BTreeSet<String>,
}

/// Restricts mesh membership to a set of namespaces.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum IncludeNamespaces {
    /// Every namespace that is not otherwise excluded.
    #[default]
    All,

    /// Only the named namespaces.
    Only(BTreeSet<String>),
}

// === impl MembershipPolicy ===

impl MembershipPolicy {
    pub fn new(include: IncludeNamespaces, exclude: impl IntoIterator<Item = String>) -> Self {
        Self {
            include,
            exclude: exclude.into_iter().collect(),
        }
    }

    /// Indicates whether pods in the named namespace are subject to injection.
    pub fn admits(&self, exemptions: &ExemptionSet, ns: &str) -> bool {
        if exemptions.is_exempted(ns) {
            trace!(%ns, "Exempt");
            return false;
        }

        if self.exclude.contains(ns) {
            trace!(%ns, "Excluded");
            return false;
        }

        if !self.include.contains(ns) {
            trace!(%ns, "Not included");
            return false;
        }

        true
    }

    /// Filters `namespaces` down to those in the mesh, preserving their order.
    ///
    /// Namespaces without a name are dropped.
    pub fn resolve_namespaces(
        &self,
        exemptions: &ExemptionSet,
        namespaces: impl IntoIterator<Item = k8s::Namespace>,
    ) -> Vec<k8s::Namespace> {
        namespaces
            .into_iter()
            .filter(|ns| {
                ns.metadata
                    .name
                    .as_deref()
                    .is_some_and(|name| self.admits(exemptions, name))
            })
            .collect()
    }
}

impl From<&k8s::InjectConfig> for MembershipPolicy {
    fn from(config: &k8s::InjectConfig) -> Self {
        let include = config
            .namespaces
            .as_deref()
            .map(IncludeNamespaces::from_names)
            .unwrap_or_default();
        Self::new(include, config.exclude_namespaces.iter().flatten().cloned())
    }
}

// === impl IncludeNamespaces ===

impl IncludeNamespaces {
    /// Decodes an injector namespace list, where an empty list and a list containing
    /// `NAMESPACE_ALL` both select every namespace.
    pub fn from_names(names: &[String]) -> Self {
        if names.is_empty() || names.iter().any(|n| n == k8s::NAMESPACE_ALL) {
            return Self::All;
        }
        Self::Only(names.iter().cloned().collect())
    }

    #[inline]
    pub fn contains(&self, ns: &str) -> bool {
        match self {
            Self::All => true,
            Self::Only(names) => names.contains(ns),
        }
    }
}

impl<S: Into<String>> FromIterator<S> for IncludeNamespaces {
    fn from_iter<T: IntoIterator<Item = S>>(iter: T) -> Self {
        let names = iter.into_iter().map(Into::into).collect::<Vec<String>>();
        Self::from_names(&names)
    }
}
