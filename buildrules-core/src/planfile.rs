// Plan file management (buildrules.plan.json)

use crate::binder::BuildPlan;
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Default plan file name
pub const PLAN_FILE: &str = "buildrules.plan.json";

const PLAN_FILE_VERSION: u32 = 1;

/// Persisted build plans of every target, tied to the manifest they came from
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanFile {
    pub version: u32,

    #[serde(rename = "generatedAt")]
    pub generated_at: DateTime<Utc>,

    #[serde(rename = "manifestDigest")]
    pub manifest_digest: String,

    pub plans: BTreeMap<String, BuildPlan>,
}

impl PlanFile {
    /// Generate a plan file from freshly bound plans
    pub fn generate(manifest_digest: String, plans: Vec<BuildPlan>) -> Self {
        Self {
            version: PLAN_FILE_VERSION,
            generated_at: Utc::now(),
            manifest_digest,
            plans: plans
                .into_iter()
                .map(|plan| (plan.target.clone(), plan))
                .collect(),
        }
    }

    /// Load plan file from disk
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.as_ref().display()))?;

        Self::from_str(&content)
    }

    /// Parse plan file from string
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(content: &str) -> Result<Self> {
        let plan_file: PlanFile =
            serde_json::from_str(content).context("Failed to parse buildrules.plan.json")?;

        if plan_file.version != PLAN_FILE_VERSION {
            anyhow::bail!(
                "Unsupported plan file version {} (expected {})",
                plan_file.version,
                PLAN_FILE_VERSION
            );
        }

        Ok(plan_file)
    }

    /// Save plan file to disk
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content =
            serde_json::to_string_pretty(self).context("Failed to serialize plan file")?;

        fs::write(&path, content)
            .with_context(|| format!("Failed to write {}", path.as_ref().display()))?;

        Ok(())
    }

    /// True when generated from a manifest with this digest
    pub fn is_current(&self, manifest_digest: &str) -> bool {
        self.manifest_digest == manifest_digest
    }

    /// Get plan by target name
    pub fn get_plan(&self, target: &str) -> Option<&BuildPlan> {
        self.plans.get(target)
    }
}

/// Plan file that belongs next to `manifest_path`
pub fn plan_path_for(manifest_path: &Path) -> PathBuf {
    manifest_path
        .parent()
        .map(|dir| dir.join(PLAN_FILE))
        .unwrap_or_else(|| PathBuf::from(PLAN_FILE))
}
