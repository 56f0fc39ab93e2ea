// Dependency resolver: depth-first, post-order walk over module descriptors

use crate::descriptor::{DescriptorKind, ModuleDescriptor};
use crate::error::DescriptorError;
use crate::registry::Registry;
use std::collections::HashSet;
use std::iter::FusedIterator;

/// Resolve `module` against `registry`.
///
/// The root is looked up eagerly; the rest of the walk happens lazily while
/// the returned [`Resolution`] is iterated.
pub fn resolve<'r>(
    registry: &'r Registry,
    module: &str,
) -> Result<Resolution<'r>, DescriptorError> {
    let root = registry.lookup_module(module)?;
    Ok(Resolution { registry, root })
}

/// Dependency-ordered module sequence rooted at one module.
///
/// Dependencies come before their dependents and the root comes last.
/// Siblings keep declaration order. Every call to [`Resolution::iter`]
/// starts a fresh walk, so the sequence can be consumed any number of times.
#[derive(Debug, Clone, Copy)]
pub struct Resolution<'r> {
    registry: &'r Registry,
    root: &'r ModuleDescriptor,
}

impl<'r> Resolution<'r> {
    pub fn root(&self) -> &'r str {
        &self.root.name
    }

    pub fn iter(&self) -> ResolveIter<'r> {
        ResolveIter::new(self.registry, self.root)
    }

    /// Drain the walk into a vector, stopping at the first error
    pub fn to_vec(&self) -> Result<Vec<&'r str>, DescriptorError> {
        self.iter().collect()
    }
}

impl<'r> IntoIterator for &Resolution<'r> {
    type Item = Result<&'r str, DescriptorError>;
    type IntoIter = ResolveIter<'r>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[derive(Debug)]
struct Frame<'r> {
    module: &'r ModuleDescriptor,
    next_dep: usize,
}

/// Iterator behind [`Resolution`]. Fused after the first error.
#[derive(Debug)]
pub struct ResolveIter<'r> {
    registry: &'r Registry,
    stack: Vec<Frame<'r>>,
    // modules on the current DFS path
    visiting: HashSet<&'r str>,
    emitted: HashSet<&'r str>,
    failed: bool,
}

impl<'r> ResolveIter<'r> {
    fn new(registry: &'r Registry, root: &'r ModuleDescriptor) -> Self {
        let mut visiting = HashSet::new();
        visiting.insert(root.name.as_str());

        Self {
            registry,
            stack: vec![Frame {
                module: root,
                next_dep: 0,
            }],
            visiting,
            emitted: HashSet::new(),
            failed: false,
        }
    }

    /// Path from the first occurrence of `closing` on the stack back to `closing`
    fn cycle_path(&self, closing: &str) -> Vec<String> {
        let start = self
            .stack
            .iter()
            .position(|frame| frame.module.name == closing)
            .unwrap_or(0);

        self.stack
            .iter()
            .skip(start)
            .map(|frame| frame.module.name.clone())
            .chain(std::iter::once(closing.to_string()))
            .collect()
    }

    fn fail(&mut self, err: DescriptorError) -> Option<Result<&'r str, DescriptorError>> {
        self.failed = true;
        self.stack.clear();
        Some(Err(err))
    }
}

impl<'r> Iterator for ResolveIter<'r> {
    type Item = Result<&'r str, DescriptorError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }

        loop {
            let frame = self.stack.last_mut()?;
            let module = frame.module;

            let Some(dep) = module.public_dependency_module_names.get(frame.next_dep) else {
                // All dependencies emitted: the module itself is next
                self.stack.pop();
                self.visiting.remove(module.name.as_str());
                self.emitted.insert(module.name.as_str());
                return Some(Ok(module.name.as_str()));
            };
            frame.next_dep += 1;

            if self.emitted.contains(dep.as_str()) {
                continue;
            }

            if self.visiting.contains(dep.as_str()) {
                let path = self.cycle_path(dep);
                log::debug!("cycle while resolving: {}", path.join(" -> "));
                return self.fail(DescriptorError::CyclicDependency { path });
            }

            match self.registry.lookup_module(dep) {
                Ok(child) => {
                    self.visiting.insert(child.name.as_str());
                    self.stack.push(Frame {
                        module: child,
                        next_dep: 0,
                    });
                }
                Err(DescriptorError::NotFound { suggestions, .. }) => {
                    return self.fail(DescriptorError::NotFound {
                        name: dep.clone(),
                        kind: DescriptorKind::Module,
                        required_by: Some(module.name.clone()),
                        suggestions,
                    });
                }
                Err(err) => return self.fail(err),
            }
        }
    }
}

impl FusedIterator for ResolveIter<'_> {}
