// Descriptor errors

use crate::descriptor::DescriptorKind;
use buildrules_diagnostics::{error_codes, Diagnostic, Location};
use thiserror::Error;

/// Every failure of registration, resolution or binding.
/// All of them abort the current build invocation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DescriptorError {
    #[error("{kind} `{name}` is already registered")]
    DuplicateName { name: String, kind: DescriptorKind },

    #[error("{kind} `{name}` not found")]
    NotFound {
        name: String,
        kind: DescriptorKind,
        /// Module whose dependency list named the missing module
        required_by: Option<String>,
        suggestions: Vec<String>,
    },

    #[error("cyclic dependency: {}", .path.join(" -> "))]
    CyclicDependency { path: Vec<String> },
}

impl DescriptorError {
    /// Name of the descriptor the error is about
    pub fn name(&self) -> &str {
        match self {
            DescriptorError::DuplicateName { name, .. } => name,
            DescriptorError::NotFound { name, .. } => name,
            DescriptorError::CyclicDependency { path } => {
                path.first().map(String::as_str).unwrap_or_default()
            }
        }
    }

    /// Render as a diagnostic pointing into `file`
    pub fn to_diagnostic(&self, file: &str) -> Diagnostic {
        let location = Location::new(file);

        match self {
            DescriptorError::DuplicateName { name, kind } => Diagnostic::error(
                error_codes::DUPLICATE_DEFINITION,
                self.to_string(),
                location.with_descriptor(format!("{} `{}`", kind, name)),
            )
            .with_help(format!("{} names must be unique", kind)),

            DescriptorError::NotFound {
                kind,
                required_by,
                suggestions,
                ..
            } => {
                let code = match kind {
                    DescriptorKind::Module => error_codes::MODULE_NOT_FOUND,
                    DescriptorKind::Target => error_codes::TARGET_NOT_FOUND,
                };
                let location = match required_by {
                    Some(dependent) => location.with_descriptor(format!("module `{}`", dependent)),
                    None => location,
                };
                let mut diag = Diagnostic::error(code, self.to_string(), location);

                if let Some(dependent) = required_by {
                    diag = diag.with_note(format!("required by `{}`", dependent));
                }
                if !suggestions.is_empty() {
                    diag = diag.with_help(format!("did you mean `{}`?", suggestions.join("`, `")));
                }
                diag
            }

            DescriptorError::CyclicDependency { path } => {
                let head = self.name().to_string();
                Diagnostic::error(
                    error_codes::CIRCULAR_DEPENDENCY,
                    format!("cyclic dependency detected while resolving `{}`", head),
                    location.with_descriptor(format!("module `{}`", head)),
                )
                .with_note(format!("cycle: {}", path.join(" -> ")))
                .with_help("remove one of the dependencies on the cycle".to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cycle_message() {
        let err = DescriptorError::CyclicDependency {
            path: vec!["A".to_string(), "B".to_string(), "A".to_string()],
        };
        assert_eq!(err.to_string(), "cyclic dependency: A -> B -> A");
        assert_eq!(err.name(), "A");

        let diag = err.to_diagnostic("buildrules.json");
        assert_eq!(diag.code, error_codes::CIRCULAR_DEPENDENCY);
        assert_eq!(diag.notes, vec!["cycle: A -> B -> A"]);
    }

    #[test]
    fn test_not_found_diagnostic() {
        let err = DescriptorError::NotFound {
            name: "Engnie".to_string(),
            kind: DescriptorKind::Module,
            required_by: Some("Game".to_string()),
            suggestions: vec!["Engine".to_string()],
        };
        assert_eq!(err.to_string(), "module `Engnie` not found");

        let diag = err.to_diagnostic("buildrules.json");
        assert_eq!(diag.code, error_codes::MODULE_NOT_FOUND);
        assert_eq!(diag.help.as_deref(), Some("did you mean `Engine`?"));
        assert_eq!(diag.location.descriptor.as_deref(), Some("module `Game`"));
    }

    #[test]
    fn test_missing_target_code() {
        let err = DescriptorError::NotFound {
            name: "Server".to_string(),
            kind: DescriptorKind::Target,
            required_by: None,
            suggestions: Vec::new(),
        };
        let diag = err.to_diagnostic("buildrules.json");
        assert_eq!(diag.code, error_codes::TARGET_NOT_FOUND);
        assert!(diag.help.is_none());
    }
}
