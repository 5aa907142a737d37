//! Module identity.
//!
//! An opaque canonical key derived from a dotted module name. Two strings
//! name the same module iff their canonicalizations are equal. Modeled as
//! a newtype rather than a bare `String` so canonicalization lives in
//! exactly one place, the way `foundry_compilers::resolver::parse`
//! centralizes source-unit-name handling instead of comparing raw paths
//! ad hoc.

use std::fmt;
use std::path::PathBuf;

/// The canonical identity of a module, e.g. `A.B.C`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ModuleId(String);

impl ModuleId {
    /// Canonicalizes a dotted module name: trims whitespace, collapses
    /// repeated dots, and strips a trailing dot.
    pub fn canonicalize(name: &str) -> Self {
        let canon = name
            .trim()
            .split('.')
            .filter(|segment| !segment.is_empty())
            .collect::<Vec<_>>()
            .join(".");
        ModuleId(canon)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Translates the dotted name into a relative filesystem path with the
    /// given extension, e.g. `A.B.C` + `flow` -> `A/B/C.flow`.
    pub fn to_relative_path(&self, extension: &str) -> PathBuf {
        let mut path = PathBuf::new();
        for segment in self.0.split('.') {
            path.push(segment);
        }
        path.set_extension(extension);
        path
    }
}

impl fmt::Display for ModuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ModuleId {
    fn from(s: &str) -> Self {
        ModuleId::canonicalize(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonicalization_is_equality() {
        assert_eq!(ModuleId::canonicalize("A.B.C"), ModuleId::canonicalize(" A.B.C "));
        assert_eq!(ModuleId::canonicalize("A..B."), ModuleId::canonicalize("A.B"));
    }

    #[test]
    fn relative_path_translates_dots() {
        let id = ModuleId::canonicalize("A.B.C");
        assert_eq!(id.to_relative_path("java"), PathBuf::from("A/B/C.java"));
    }
}
