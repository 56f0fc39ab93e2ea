use anyhow::Result;
use buildrules_core::{DescriptorError, MANIFEST_FILE};
use buildrules_diagnostics::{error_codes, Diagnostic, DiagnosticEngine, Location};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "buildrules")]
#[command(version)]
#[command(about = "Resolve target and module descriptors into build plans", long_about = None)]
struct Cli {
    /// Path to the manifest
    #[arg(long, global = true, value_name = "PATH", default_value = MANIFEST_FILE)]
    manifest: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a starter manifest (at --manifest, or into PATH)
    Init {
        /// Project directory (default: the directory of --manifest)
        #[arg(value_name = "PATH")]
        path: Option<PathBuf>,
    },

    /// List targets and modules
    List,

    /// Bind every target and report problems
    Check {
        /// Fail when the plan file is missing or out of date (CI mode)
        #[arg(long)]
        locked: bool,

        /// Output diagnostics as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the build plan of one target, or of all targets
    Plan {
        /// Target name (default: all targets)
        #[arg(value_name = "TARGET")]
        target: Option<String>,

        /// Save buildrules.plan.json next to the manifest
        #[arg(short, long)]
        write: bool,

        /// Output plans as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the resolution order of one module
    Graph {
        /// Module name
        #[arg(value_name = "MODULE")]
        module: String,
    },
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let json = matches!(
        cli.command,
        Commands::Check { json: true, .. } | Commands::Plan { json: true, .. }
    );

    match run(cli.command, &cli.manifest) {
        Ok(true) => Ok(()),
        Ok(false) => std::process::exit(1),
        Err(err) => {
            report_error(&err, &cli.manifest, json);
            std::process::exit(1);
        }
    }
}

/// Run one command; `Ok(false)` means it completed but found errors
fn run(command: Commands, manifest: &Path) -> Result<bool> {
    match command {
        Commands::Init { path } => {
            buildrules_core::init_project(path, manifest)?;
        }

        Commands::List => {
            buildrules_core::list_descriptors(manifest)?;
        }

        Commands::Check { locked, json } => {
            log::info!("Checking: {:?} (locked: {})", manifest, locked);
            let engine = buildrules_core::check_project(manifest, locked)?;

            if json {
                println!("{}", engine.to_json()?);
            } else {
                engine.print_all();
                engine.print_summary();
                if !engine.has_errors() {
                    println!("✅ {} is valid", manifest.display());
                }
            }

            if engine.has_errors() {
                return Ok(false);
            }
        }

        Commands::Plan {
            target,
            write,
            json,
        } => {
            let plans = buildrules_core::plan_targets(manifest, target.as_deref(), write)?;

            if json {
                println!("{}", serde_json::to_string_pretty(&plans)?);
            } else {
                buildrules_core::print_plans(&plans);
                if write {
                    println!(
                        "✅ Saved {}",
                        buildrules_core::plan_path_for(manifest).display()
                    );
                }
            }
        }

        Commands::Graph { module } => {
            let order = buildrules_core::module_graph(manifest, &module)?;
            for (depth, name) in order.iter().enumerate() {
                println!("{:>3}  {}", depth + 1, name);
            }
        }
    }

    Ok(true)
}

/// Descriptor errors become diagnostics, everything else is printed as a chain
fn report_error(err: &anyhow::Error, manifest: &Path, json: bool) {
    let file = manifest.display().to_string();
    let diagnostic = match err.downcast_ref::<DescriptorError>() {
        Some(descriptor_err) => descriptor_err.to_diagnostic(&file),
        None if json => Diagnostic::error(
            error_codes::INVALID_MANIFEST,
            format!("{:#}", err),
            Location::new(file),
        ),
        None => {
            eprintln!("❌ {:#}", err);
            return;
        }
    };

    let mut engine = DiagnosticEngine::new();
    engine.emit(diagnostic);

    if json {
        match engine.to_json() {
            Ok(report) => println!("{}", report),
            Err(e) => eprintln!("❌ {}", e),
        }
    } else {
        engine.print_all();
        engine.print_summary();
    }
}
