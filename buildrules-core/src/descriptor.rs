// Target and module descriptor records

use serde::{Deserialize, Serialize};
use std::fmt;

/// Binary a target produces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetKind {
    Game,
    Editor,
}

impl fmt::Display for TargetKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            TargetKind::Game => write!(f, "Game"),
            TargetKind::Editor => write!(f, "Editor"),
        }
    }
}

/// Which namespace of the registry a descriptor lives in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DescriptorKind {
    Target,
    Module,
}

impl fmt::Display for DescriptorKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            DescriptorKind::Target => write!(f, "target"),
            DescriptorKind::Module => write!(f, "module"),
        }
    }
}

/// A buildable output and the modules it pulls in
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetDescriptor {
    pub name: String,
    pub kind: TargetKind,

    #[serde(rename = "extraModuleNames", default)]
    pub extra_module_names: Vec<String>,
}

impl TargetDescriptor {
    pub fn new(name: impl Into<String>, kind: TargetKind) -> Self {
        Self {
            name: name.into(),
            kind,
            extra_module_names: Vec::new(),
        }
    }

    pub fn with_module(mut self, module: impl Into<String>) -> Self {
        self.extra_module_names.push(module.into());
        self
    }
}

/// A unit of compiled code and the modules it depends on publicly
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleDescriptor {
    pub name: String,

    /// Declaration order is kept; it breaks ties during resolution
    #[serde(
        rename = "publicDependencyModuleNames",
        default,
        skip_serializing_if = "Vec::is_empty"
    )]
    pub public_dependency_module_names: Vec<String>,
}

impl ModuleDescriptor {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            public_dependency_module_names: Vec::new(),
        }
    }

    /// Builder form of `PublicDependencyModuleNames.AddRange(...)`
    pub fn with_dependencies<I, S>(mut self, deps: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.public_dependency_module_names
            .extend(deps.into_iter().map(Into::into));
        self
    }

    /// Collapse repeated dependency names to their first occurrence.
    /// Returns the names that were dropped.
    pub fn dedup_dependencies(&mut self) -> Vec<String> {
        let mut seen = std::collections::HashSet::new();
        let mut dropped = Vec::new();
        self.public_dependency_module_names.retain(|dep| {
            if seen.insert(dep.clone()) {
                true
            } else {
                dropped.push(dep.clone());
                false
            }
        });
        dropped
    }
}

/// Anything the registry can hold
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Descriptor {
    Target(TargetDescriptor),
    Module(ModuleDescriptor),
}

impl Descriptor {
    pub fn name(&self) -> &str {
        match self {
            Descriptor::Target(t) => &t.name,
            Descriptor::Module(m) => &m.name,
        }
    }

    pub fn kind(&self) -> DescriptorKind {
        match self {
            Descriptor::Target(_) => DescriptorKind::Target,
            Descriptor::Module(_) => DescriptorKind::Module,
        }
    }
}

impl From<TargetDescriptor> for Descriptor {
    fn from(target: TargetDescriptor) -> Self {
        Descriptor::Target(target)
    }
}

impl From<ModuleDescriptor> for Descriptor {
    fn from(module: ModuleDescriptor) -> Self {
        Descriptor::Module(module)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dedup_keeps_first_occurrence() {
        let mut module =
            ModuleDescriptor::new("Game").with_dependencies(["Core", "Engine", "Core", "Engine"]);
        let dropped = module.dedup_dependencies();

        assert_eq!(module.public_dependency_module_names, vec!["Core", "Engine"]);
        assert_eq!(dropped, vec!["Core", "Engine"]);
    }

    #[test]
    fn test_target_kind_serde_names() {
        let target: TargetDescriptor = serde_json::from_str(
            r#"{ "name": "GameEditor", "kind": "editor", "extraModuleNames": ["Game"] }"#,
        )
        .unwrap();

        assert_eq!(target.kind, TargetKind::Editor);
        assert_eq!(target.extra_module_names, vec!["Game"]);
        assert_eq!(target.kind.to_string(), "Editor");
    }

    #[test]
    fn test_module_without_dependencies() {
        let module: ModuleDescriptor = serde_json::from_str(r#"{ "name": "Core" }"#).unwrap();
        assert!(module.public_dependency_module_names.is_empty());
    }
}
