// Project commands (init, list, check, plan, graph)

use crate::binder::{bind, bind_all, bind_target, BuildPlan};
use crate::error::DescriptorError;
use crate::manifest::{manifest_digest, Manifest, MANIFEST_FILE};
use crate::planfile::{plan_path_for, PlanFile};
use crate::registry::Registry;
use crate::resolver::resolve;
use anyhow::{Context, Result};
use buildrules_diagnostics::{error_codes, Diagnostic, DiagnosticEngine, Location};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

/// Load the manifest and register every descriptor in it
pub fn load_registry(manifest_path: &Path) -> Result<(Manifest, Registry)> {
    if !manifest_path.exists() {
        anyhow::bail!(
            "{} not found. Run 'buildrules init' first.",
            manifest_path.display()
        );
    }

    let manifest = Manifest::from_file(manifest_path)?;
    let registry = Registry::from_manifest(&manifest)?;
    Ok((manifest, registry))
}

/// Write a starter manifest.
///
/// With `path`, the manifest goes into that directory under the file name of
/// `manifest`; otherwise it is written to `manifest` itself.
pub fn init_project(path: Option<PathBuf>, manifest: &Path) -> Result<PathBuf> {
    let file_name = manifest
        .file_name()
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(MANIFEST_FILE));

    let manifest_path = match path {
        Some(dir) => dir.join(file_name),
        None => manifest.to_path_buf(),
    };
    let project_path = match manifest_path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
        _ => PathBuf::from("."),
    };

    fs::create_dir_all(&project_path)
        .with_context(|| format!("Failed to create directory: {}", project_path.display()))?;

    if manifest_path.exists() {
        anyhow::bail!("{} already exists", manifest_path.display());
    }

    Manifest::default().to_file(&manifest_path)?;

    println!("✅ Initialized {}", manifest_path.display());
    log::info!("wrote starter manifest to {}", manifest_path.display());

    Ok(manifest_path)
}

/// Print targets and modules in declaration order
pub fn list_descriptors(manifest_path: &Path) -> Result<()> {
    let (manifest, registry) = load_registry(manifest_path)?;

    println!("📦 {}", manifest.project);
    println!();

    println!("Targets:");
    for target in registry.targets() {
        println!(
            "  {} [{}] -> {}",
            target.name,
            target.kind,
            target.extra_module_names.join(", ")
        );
    }

    println!();
    println!("Modules:");
    for module in registry.modules() {
        if module.public_dependency_module_names.is_empty() {
            println!("  {}", module.name);
        } else {
            println!(
                "  {} -> {}",
                module.name,
                module.public_dependency_module_names.join(", ")
            );
        }
    }

    Ok(())
}

/// Validate the whole project and collect diagnostics.
///
/// Descriptor problems end up in the returned engine; only I/O failures are
/// returned as errors. With `locked`, a missing or stale plan file is an error.
pub fn check_project(manifest_path: &Path, locked: bool) -> Result<DiagnosticEngine> {
    let mut engine = DiagnosticEngine::new();
    let file = manifest_path.display().to_string();

    let content = fs::read_to_string(manifest_path)
        .with_context(|| format!("Failed to read {}", manifest_path.display()))?;

    let manifest = match Manifest::from_str(&content) {
        Ok(manifest) => manifest,
        Err(err) => {
            engine.emit(Diagnostic::error(
                error_codes::INVALID_MANIFEST,
                format!("{:#}", err),
                Location::new(file),
            ));
            return Ok(engine);
        }
    };

    let registry = match Registry::from_manifest(&manifest) {
        Ok(registry) => registry,
        Err(err) => {
            engine.emit(err.to_diagnostic(&file));
            return Ok(engine);
        }
    };

    for module in &manifest.modules {
        let mut seen = HashSet::new();
        for dep in &module.public_dependency_module_names {
            if !seen.insert(dep) {
                engine.emit(Diagnostic::warning(
                    error_codes::DUPLICATE_DEPENDENCY,
                    format!("dependency `{}` is listed more than once", dep),
                    Location::new(file.clone())
                        .with_descriptor(format!("module `{}`", module.name)),
                ));
            }
        }
    }

    // Every target on its own, so one bad target does not hide another
    let mut reported: Vec<DescriptorError> = Vec::new();
    let mut used: HashSet<String> = HashSet::new();
    for target in registry.targets() {
        match bind(&registry, target) {
            Ok(plan) => used.extend(plan.ordered_modules),
            Err(err) => {
                if !reported.contains(&err) {
                    engine.emit(
                        err.to_diagnostic(&file)
                            .with_note(format!("while binding target `{}`", target.name)),
                    );
                    reported.push(err);
                }
            }
        }
    }

    if engine.has_errors() {
        return Ok(engine);
    }

    for module in registry.modules() {
        if !used.contains(&module.name) {
            engine.emit(Diagnostic::warning(
                error_codes::UNREACHABLE_MODULE,
                format!("module `{}` is not used by any target", module.name),
                Location::new(file.clone())
                    .with_descriptor(format!("module `{}`", module.name)),
            ));
        }
    }

    check_plan_file(manifest_path, locked, &mut engine)?;

    log::info!(
        "checked {}: {} errors, {} warnings",
        file,
        engine.error_count(),
        engine.warning_count()
    );

    Ok(engine)
}

fn check_plan_file(
    manifest_path: &Path,
    locked: bool,
    engine: &mut DiagnosticEngine,
) -> Result<()> {
    let plan_path = plan_path_for(manifest_path);
    let location = Location::from_path(&plan_path);

    let stale = |message: String| {
        let diag = if locked {
            Diagnostic::error(error_codes::STALE_PLAN, message, location.clone())
        } else {
            Diagnostic::warning(error_codes::STALE_PLAN, message, location.clone())
        };
        diag.with_help("run 'buildrules plan --write' to regenerate it".to_string())
    };

    if !plan_path.exists() {
        if locked {
            engine.emit(stale("plan file not found".to_string()));
        }
        return Ok(());
    }

    // An unreadable plan file is as useless as a stale one
    let plan_file = match PlanFile::from_file(&plan_path) {
        Ok(plan_file) => plan_file,
        Err(err) => {
            engine.emit(stale(format!("plan file cannot be used: {:#}", err)));
            return Ok(());
        }
    };
    let digest = manifest_digest(manifest_path)?;
    if !plan_file.is_current(&digest) {
        engine.emit(stale(format!(
            "plan file is out of date with {}",
            manifest_path.display()
        )));
    }

    Ok(())
}

/// Bind one target (or all of them) and optionally persist the plan file
pub fn plan_targets(
    manifest_path: &Path,
    target: Option<&str>,
    write: bool,
) -> Result<Vec<BuildPlan>> {
    let (_, registry) = load_registry(manifest_path)?;

    let plans = match target {
        Some(name) => vec![bind_target(&registry, name)?],
        None => bind_all(&registry)?,
    };

    if write {
        // Always persist every target so the file describes the whole manifest
        let all = match target {
            Some(_) => bind_all(&registry)?,
            None => plans.clone(),
        };
        let plan_path = plan_path_for(manifest_path);
        PlanFile::generate(manifest_digest(manifest_path)?, all).to_file(&plan_path)?;
        log::info!("wrote {}", plan_path.display());
    }

    Ok(plans)
}

/// Print plans as text
pub fn print_plans(plans: &[BuildPlan]) {
    for plan in plans {
        println!("{} [{}]", plan.target, plan.kind);
        for (i, module) in plan.ordered_modules.iter().enumerate() {
            println!("  {:>2}. {}", i + 1, module);
        }
    }
}

/// Resolution order of a single module
pub fn module_graph(manifest_path: &Path, module: &str) -> Result<Vec<String>> {
    let (_, registry) = load_registry(manifest_path)?;
    let resolution = resolve(&registry, module)?;

    let order = resolution
        .to_vec()?
        .into_iter()
        .map(str::to_string)
        .collect();

    Ok(order)
}
