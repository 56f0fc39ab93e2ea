// Descriptor registry: owns every target and module record of one invocation

use crate::descriptor::{Descriptor, DescriptorKind, ModuleDescriptor, TargetDescriptor};
use crate::error::DescriptorError;
use crate::manifest::Manifest;
use buildrules_diagnostics::fuzzy::{find_similar_names, DEFAULT_THRESHOLD};
use std::collections::HashMap;

const MAX_SUGGESTIONS: usize = 3;

/// Holds descriptors keyed by (kind, name).
///
/// Records are immutable once registered. Resolution only ever takes
/// `&Registry`, so nothing can change underneath a running resolution.
#[derive(Debug, Default, Clone)]
pub struct Registry {
    targets: HashMap<String, TargetDescriptor>,
    modules: HashMap<String, ModuleDescriptor>,
    // registration order, for deterministic listing
    target_order: Vec<String>,
    module_order: Vec<String>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a registry from a parsed manifest: modules first, then targets
    pub fn from_manifest(manifest: &Manifest) -> Result<Self, DescriptorError> {
        let mut registry = Self::new();

        for module in &manifest.modules {
            registry.register_module(module.clone())?;
        }
        for target in &manifest.targets {
            registry.register_target(target.clone())?;
        }

        log::debug!(
            "registry for `{}`: {} targets, {} modules",
            manifest.project,
            registry.target_order.len(),
            registry.module_order.len()
        );

        Ok(registry)
    }

    /// Register any descriptor
    pub fn register(&mut self, descriptor: impl Into<Descriptor>) -> Result<(), DescriptorError> {
        match descriptor.into() {
            Descriptor::Target(target) => self.register_target(target),
            Descriptor::Module(module) => self.register_module(module),
        }
    }

    pub fn register_target(&mut self, target: TargetDescriptor) -> Result<(), DescriptorError> {
        if self.targets.contains_key(&target.name) {
            return Err(DescriptorError::DuplicateName {
                name: target.name,
                kind: DescriptorKind::Target,
            });
        }

        log::trace!("registered target `{}` ({})", target.name, target.kind);
        self.target_order.push(target.name.clone());
        self.targets.insert(target.name.clone(), target);
        Ok(())
    }

    pub fn register_module(&mut self, mut module: ModuleDescriptor) -> Result<(), DescriptorError> {
        if self.modules.contains_key(&module.name) {
            return Err(DescriptorError::DuplicateName {
                name: module.name,
                kind: DescriptorKind::Module,
            });
        }

        for dropped in module.dedup_dependencies() {
            log::warn!(
                "module `{}` lists dependency `{}` more than once",
                module.name,
                dropped
            );
        }

        log::trace!("registered module `{}`", module.name);
        self.module_order.push(module.name.clone());
        self.modules.insert(module.name.clone(), module);
        Ok(())
    }

    /// Look up a descriptor of the given kind
    pub fn lookup(&self, name: &str, kind: DescriptorKind) -> Result<Descriptor, DescriptorError> {
        match kind {
            DescriptorKind::Target => self.lookup_target(name).cloned().map(Descriptor::Target),
            DescriptorKind::Module => self.lookup_module(name).cloned().map(Descriptor::Module),
        }
    }

    pub fn lookup_target(&self, name: &str) -> Result<&TargetDescriptor, DescriptorError> {
        self.targets
            .get(name)
            .ok_or_else(|| self.not_found(name, DescriptorKind::Target))
    }

    pub fn lookup_module(&self, name: &str) -> Result<&ModuleDescriptor, DescriptorError> {
        self.modules
            .get(name)
            .ok_or_else(|| self.not_found(name, DescriptorKind::Module))
    }

    pub fn contains(&self, name: &str, kind: DescriptorKind) -> bool {
        match kind {
            DescriptorKind::Target => self.targets.contains_key(name),
            DescriptorKind::Module => self.modules.contains_key(name),
        }
    }

    /// Targets in registration order
    pub fn targets(&self) -> impl Iterator<Item = &TargetDescriptor> {
        self.target_order
            .iter()
            .filter_map(|name| self.targets.get(name))
    }

    /// Modules in registration order
    pub fn modules(&self) -> impl Iterator<Item = &ModuleDescriptor> {
        self.module_order
            .iter()
            .filter_map(|name| self.modules.get(name))
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty() && self.modules.is_empty()
    }

    fn not_found(&self, name: &str, kind: DescriptorKind) -> DescriptorError {
        let candidates = match kind {
            DescriptorKind::Target => &self.target_order,
            DescriptorKind::Module => &self.module_order,
        };

        DescriptorError::NotFound {
            name: name.to_string(),
            kind,
            required_by: None,
            suggestions: find_similar_names(
                name,
                candidates.iter().map(String::as_str),
                DEFAULT_THRESHOLD,
                MAX_SUGGESTIONS,
            ),
        }
    }
}
