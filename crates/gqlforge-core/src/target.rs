//! Target identities.
//!
//! A [`TargetId`] is the stable handle identifying one declared type across
//! the registry and the resolved graph. It is the sole key used for
//! cross-referencing between descriptors and graph nodes.

use std::fmt;

/// Opaque, stable handle identifying one declared type.
///
/// Minted by [`RegistryBuilder::target`](crate::registry::RegistryBuilder::target)
/// before the corresponding descriptor is declared, so descriptors may
/// reference types in any order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TargetId(u64);

impl TargetId {
    pub(crate) fn new(raw: u64) -> Self {
        Self(raw)
    }
}

impl fmt::Display for TargetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "target#{}", self.0)
    }
}
