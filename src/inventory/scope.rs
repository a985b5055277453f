//! Scope normalization
//!
//! Turns bare project, folder and organization IDs into the fully-qualified
//! parent names the Cloud Asset API expects.

use std::fmt;

/// Resource hierarchy level of a scope
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeKind {
    Project,
    Folder,
    Organization,
}

impl ScopeKind {
    pub const fn prefix(self) -> &'static str {
        match self {
            ScopeKind::Project => "projects/",
            ScopeKind::Folder => "folders/",
            ScopeKind::Organization => "organizations/",
        }
    }
}

/// A fully-qualified scope such as `projects/my-project`.
///
/// Only constructible through [`Scope::new`], so a bare ID never reaches the API.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Scope(String);

impl Scope {
    /// Qualify `raw` with the prefix for `kind` unless it already carries it.
    /// The ID itself is not validated.
    pub fn new(kind: ScopeKind, raw: &str) -> Self {
        let prefix = kind.prefix();
        if raw.starts_with(prefix) {
            Self(raw.to_string())
        } else {
            Self(format!("{}{}", prefix, raw))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Build the scope list: projects first, then folders, then organizations,
/// each group in input order.
pub fn normalize_scopes<S: AsRef<str>>(
    projects: &[S],
    folders: &[S],
    organizations: &[S],
) -> Vec<Scope> {
    let qualify = |kind: ScopeKind, ids: &[S]| {
        ids.iter()
            .map(|id| Scope::new(kind, id.as_ref()))
            .collect::<Vec<_>>()
    };

    let mut scopes = qualify(ScopeKind::Project, projects);
    scopes.extend(qualify(ScopeKind::Folder, folders));
    scopes.extend(qualify(ScopeKind::Organization, organizations));
    scopes
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bare_id_gets_prefixed() {
        assert_eq!(Scope::new(ScopeKind::Project, "abc").as_str(), "projects/abc");
        assert_eq!(Scope::new(ScopeKind::Folder, "123").as_str(), "folders/123");
        assert_eq!(
            Scope::new(ScopeKind::Organization, "456").as_str(),
            "organizations/456"
        );
    }

    #[test]
    fn test_qualified_id_is_unchanged() {
        assert_eq!(
            Scope::new(ScopeKind::Project, "projects/abc").as_str(),
            "projects/abc"
        );
    }

    #[test]
    fn test_prefix_of_another_kind_is_not_recognized() {
        // A folder name passed as a project is still treated as a bare project ID
        assert_eq!(
            Scope::new(ScopeKind::Project, "folders/1").as_str(),
            "projects/folders/1"
        );
    }

    #[test]
    fn test_scope_order_is_projects_folders_organizations() {
        let scopes = normalize_scopes(&["p1"], &["f1"], &["o1"]);
        let scopes: Vec<&str> = scopes.iter().map(Scope::as_str).collect();
        assert_eq!(scopes, ["projects/p1", "folders/f1", "organizations/o1"]);
    }

    #[test]
    fn test_input_order_kept_within_group() {
        let projects = vec!["b".to_string(), "projects/a".to_string()];
        let none: Vec<String> = Vec::new();
        let scopes = normalize_scopes(&projects, &none, &none);
        assert_eq!(scopes[0].as_str(), "projects/b");
        assert_eq!(scopes[1].as_str(), "projects/a");
    }

    #[test]
    fn test_empty_inputs() {
        let none: [&str; 0] = [];
        assert!(normalize_scopes(&none, &none, &none).is_empty());
    }
}
