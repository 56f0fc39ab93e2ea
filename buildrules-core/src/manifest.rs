// Manifest parser - buildrules.json

use crate::descriptor::{ModuleDescriptor, TargetDescriptor, TargetKind};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fs;
use std::path::Path;

/// Default manifest file name
pub const MANIFEST_FILE: &str = "buildrules.json";

/// Engine modules the starter project depends on
const STARTER_ENGINE_MODULES: [&str; 5] =
    ["Core", "CoreUObject", "Engine", "InputCore", "AIModule"];

/// Static descriptor declarations of one project
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Manifest {
    pub project: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default)]
    pub targets: Vec<TargetDescriptor>,

    #[serde(default)]
    pub modules: Vec<ModuleDescriptor>,
}

impl Manifest {
    /// Parse buildrules.json from file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.as_ref().display()))?;

        Self::from_str(&content)
            .with_context(|| format!("Invalid manifest {}", path.as_ref().display()))
    }

    /// Parse buildrules.json from string
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(content: &str) -> Result<Self> {
        let manifest: Manifest =
            serde_json::from_str(content).context("Failed to parse buildrules.json")?;

        manifest.validate()?;
        Ok(manifest)
    }

    /// Write manifest to file
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = serde_json::to_string_pretty(self).context("Failed to serialize manifest")?;

        fs::write(&path, content)
            .with_context(|| format!("Failed to write {}", path.as_ref().display()))?;

        Ok(())
    }

    /// Validate names. Uniqueness and reachability are the registry's job.
    fn validate(&self) -> Result<()> {
        if self.project.trim().is_empty() {
            anyhow::bail!("Project name cannot be empty");
        }

        for target in &self.targets {
            check_name(&target.name, "target")?;
            for module in &target.extra_module_names {
                check_name(module, &format!("extra module of target `{}`", target.name))?;
            }
        }

        for module in &self.modules {
            check_name(&module.name, "module")?;
            for dep in &module.public_dependency_module_names {
                check_name(dep, &format!("dependency of module `{}`", module.name))?;
            }
        }

        Ok(())
    }
}

/// Names must be non-empty identifiers: ASCII alphanumerics, `_` or `-`
fn check_name(name: &str, what: &str) -> Result<()> {
    if name.is_empty() {
        anyhow::bail!("Empty {} name", what);
    }
    if !is_valid_name(name) {
        anyhow::bail!("Invalid {} name: `{}`", what, name);
    }
    Ok(())
}

fn is_valid_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

/// SHA-256 of the manifest bytes, as recorded in the plan file
pub fn manifest_digest<P: AsRef<Path>>(path: P) -> Result<String> {
    let content = fs::read(&path)
        .with_context(|| format!("Failed to read {}", path.as_ref().display()))?;

    Ok(digest_bytes(&content))
}

pub(crate) fn digest_bytes(content: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content);
    format!("sha256:{:x}", hasher.finalize())
}

impl Default for Manifest {
    /// Starter project: one gameplay module on top of the engine, a game
    /// target and an editor target
    fn default() -> Self {
        let project = "AI_vs_Dungeon".to_string();

        let mut modules = vec![ModuleDescriptor::new(project.clone())
            .with_dependencies(STARTER_ENGINE_MODULES)];
        modules.extend(STARTER_ENGINE_MODULES.iter().map(|name| ModuleDescriptor::new(*name)));

        Self {
            description: Some("Game and editor targets for AI_vs_Dungeon".to_string()),
            targets: vec![
                TargetDescriptor::new(project.clone(), TargetKind::Game)
                    .with_module(project.clone()),
                TargetDescriptor::new(format!("{}Editor", project), TargetKind::Editor)
                    .with_module(project.clone()),
            ],
            modules,
            project,
        }
    }
}
