/*
 * backend.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Backend identifiers.
 */

//! Output backend identifiers.
//!
//! The backend selects which built-in converter is constructed and names the
//! subdirectory the template resolver nests into.

/// Backend identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Backend {
    /// HTML5 output (built-in converter)
    Html5,
    /// DocBook 5 (built-in converter)
    Docbook5,
    /// DocBook 4.5 (built-in converter)
    Docbook45,
    /// troff man page (built-in converter)
    Manpage,
    /// reveal.js slides (templates only)
    Revealjs,
    /// Any other backend name
    Custom(String),
}

impl Backend {
    /// Backends that have a built-in converter.
    pub const BUILTIN: [Backend; 4] = [
        Backend::Html5,
        Backend::Docbook5,
        Backend::Docbook45,
        Backend::Manpage,
    ];

    /// Get the backend name as a string
    pub fn as_str(&self) -> &str {
        match self {
            Backend::Html5 => "html5",
            Backend::Docbook5 => "docbook5",
            Backend::Docbook45 => "docbook45",
            Backend::Manpage => "manpage",
            Backend::Revealjs => "revealjs",
            Backend::Custom(name) => name,
        }
    }

    /// Check if this backend has a built-in converter
    pub fn is_builtin(&self) -> bool {
        matches!(
            self,
            Backend::Html5 | Backend::Docbook5 | Backend::Docbook45 | Backend::Manpage
        )
    }
}

impl std::fmt::Display for Backend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl From<&str> for Backend {
    fn from(s: &str) -> Self {
        match s {
            "html5" | "html" => Backend::Html5,
            "docbook5" | "docbook" => Backend::Docbook5,
            "docbook45" => Backend::Docbook45,
            "manpage" => Backend::Manpage,
            "revealjs" => Backend::Revealjs,
            other => Backend::Custom(other.to_string()),
        }
    }
}

impl From<String> for Backend {
    fn from(s: String) -> Self {
        Backend::from(s.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aliases() {
        assert_eq!(Backend::from("html"), Backend::Html5);
        assert_eq!(Backend::from("docbook"), Backend::Docbook5);
        assert_eq!(Backend::from("html5").as_str(), "html5");
    }

    #[test]
    fn test_custom_backend_keeps_its_name() {
        let backend = Backend::from("slides");
        assert_eq!(backend, Backend::Custom("slides".to_string()));
        assert_eq!(backend.to_string(), "slides");
        assert!(!backend.is_builtin());
    }

    #[test]
    fn test_revealjs_is_not_builtin() {
        assert!(!Backend::Revealjs.is_builtin());
        assert!(Backend::BUILTIN.iter().all(Backend::is_builtin));
    }
}
