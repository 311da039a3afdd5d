use std::collections::BTreeSet;

/// Namespaces that are never part of the mesh, regardless of the injection policy.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExemptionSet(BTreeSet<String>);

// === impl ExemptionSet ===

impl ExemptionSet {
    /// The platform's own namespaces.
    pub const SYSTEM_NAMESPACES: [&'static str; 2] = ["kube-system", "kube-public"];

    /// Exempts the platform's system namespaces and the mesh control plane's namespace.
    pub fn new(control_plane_ns: impl Into<String>) -> Self {
        Self::SYSTEM_NAMESPACES
            .iter()
            .map(|ns| ns.to_string())
            .chain(Some(control_plane_ns.into()))
            .collect()
    }

    #[inline]
    pub fn is_exempted(&self, ns: &str) -> bool {
        self.0.contains(ns)
    }

    pub fn exempted_names(&self) -> &BTreeSet<String> {
        &self.0
    }
}

impl FromIterator<String> for ExemptionSet {
    fn from_iter<T: IntoIterator<Item = String>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> FromIterator<&'a str> for ExemptionSet {
    fn from_iter<T: IntoIterator<Item = &'a str>>(iter: T) -> Self {
        iter.into_iter().map(ToString::to_string).collect()
    }
}
