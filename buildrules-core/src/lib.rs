// buildrules - build descriptor resolution
// Registry of target/module descriptors, dependency resolver and target binder

pub mod binder;
pub mod commands;
pub mod descriptor;
pub mod error;
pub mod manifest;
pub mod planfile;
pub mod registry;
pub mod resolver;

pub use binder::{bind, bind_all, bind_target, BuildPlan};
pub use commands::{
    check_project, init_project, list_descriptors, load_registry, module_graph, plan_targets,
    print_plans,
};
pub use descriptor::{Descriptor, DescriptorKind, ModuleDescriptor, TargetDescriptor, TargetKind};
pub use error::DescriptorError;
pub use manifest::{manifest_digest, Manifest, MANIFEST_FILE};
pub use planfile::{plan_path_for, PlanFile, PLAN_FILE};
pub use registry::Registry;
pub use resolver::{resolve, Resolution, ResolveIter};

/// Resolver version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
