// Target binder: turn a target into the ordered module list its binary needs

use crate::descriptor::{TargetDescriptor, TargetKind};
use crate::error::DescriptorError;
use crate::registry::Registry;
use crate::resolver::resolve;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Resolved build plan handed to the compiler/linker driver
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildPlan {
    pub target: String,
    pub kind: TargetKind,

    #[serde(rename = "orderedModules")]
    pub ordered_modules: Vec<String>,
}

/// Bind one target: resolve every extra module in declaration order and
/// concatenate the closures, keeping the first occurrence of each module.
pub fn bind(registry: &Registry, target: &TargetDescriptor) -> Result<BuildPlan, DescriptorError> {
    let mut seen = HashSet::new();
    let mut ordered_modules = Vec::new();

    for module in &target.extra_module_names {
        let resolution = resolve(registry, module)?;
        for name in &resolution {
            let name = name?;
            if seen.insert(name) {
                ordered_modules.push(name.to_string());
            }
        }
    }

    log::debug!(
        "bound {} target `{}` to {} modules",
        target.kind,
        target.name,
        ordered_modules.len()
    );

    Ok(BuildPlan {
        target: target.name.clone(),
        kind: target.kind,
        ordered_modules,
    })
}

/// Look up a target by name and bind it
pub fn bind_target(registry: &Registry, name: &str) -> Result<BuildPlan, DescriptorError> {
    let target = registry.lookup_target(name)?;
    bind(registry, target)
}

/// Bind every registered target in registration order.
/// The first failure aborts the whole run: no partial plans.
pub fn bind_all(registry: &Registry) -> Result<Vec<BuildPlan>, DescriptorError> {
    registry.targets().map(|target| bind(registry, target)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::{DescriptorKind, ModuleDescriptor};

    const ENGINE_MODULES: [&str; 5] = ["Core", "CoreUObject", "Engine", "InputCore", "AIModule"];

    fn dungeon_registry() -> Registry {
        let mut registry = Registry::new();
        registry
            .register(ModuleDescriptor::new("AI_vs_Dungeon").with_dependencies(ENGINE_MODULES))
            .unwrap();
        for name in ENGINE_MODULES {
            registry.register(ModuleDescriptor::new(name)).unwrap();
        }
        registry
            .register(
                TargetDescriptor::new("AI_vs_Dungeon", TargetKind::Game)
                    .with_module("AI_vs_Dungeon"),
            )
            .unwrap();
        registry
            .register(
                TargetDescriptor::new("AI_vs_DungeonEditor", TargetKind::Editor)
                    .with_module("AI_vs_Dungeon"),
            )
            .unwrap();
        registry
    }

    #[test]
    fn test_game_target_plan() {
        let registry = dungeon_registry();
        let plan = bind_target(&registry, "AI_vs_Dungeon").unwrap();

        assert_eq!(plan.kind, TargetKind::Game);
        assert_eq!(
            plan.ordered_modules,
            vec!["Core", "CoreUObject", "Engine", "InputCore", "AIModule", "AI_vs_Dungeon"]
        );
    }

    #[test]
    fn test_editor_target_shares_module_closure() {
        let registry = dungeon_registry();
        let game = bind_target(&registry, "AI_vs_Dungeon").unwrap();
        let editor = bind_target(&registry, "AI_vs_DungeonEditor").unwrap();

        assert_eq!(editor.kind, TargetKind::Editor);
        assert_eq!(editor.ordered_modules, game.ordered_modules);
    }

    #[test]
    fn test_bind_is_idempotent() {
        let registry = dungeon_registry();
        let target = registry.lookup_target("AI_vs_Dungeon").unwrap();

        assert_eq!(bind(&registry, target).unwrap(), bind(&registry, target).unwrap());
    }

    #[test]
    fn test_closures_are_deduplicated_across_extra_modules() {
        let mut registry = Registry::new();
        registry
            .register(ModuleDescriptor::new("Gameplay").with_dependencies(["Core", "Engine"]))
            .unwrap();
        registry
            .register(ModuleDescriptor::new("Tools").with_dependencies(["Core", "Slate"]))
            .unwrap();
        for name in ["Core", "Engine", "Slate"] {
            registry.register(ModuleDescriptor::new(name)).unwrap();
        }
        let target = TargetDescriptor::new("Game", TargetKind::Game)
            .with_module("Gameplay")
            .with_module("Tools")
            .with_module("Gameplay");

        let plan = bind(&registry, &target).unwrap();
        assert_eq!(
            plan.ordered_modules,
            vec!["Core", "Engine", "Gameplay", "Slate", "Tools"]
        );
    }

    #[test]
    fn test_unregistered_extra_module() {
        let registry = dungeon_registry();
        let target =
            TargetDescriptor::new("Server", TargetKind::Game).with_module("AI_vs_Dungeon_Server");

        match bind(&registry, &target) {
            Err(DescriptorError::NotFound { name, kind, .. }) => {
                assert_eq!(name, "AI_vs_Dungeon_Server");
                assert_eq!(kind, DescriptorKind::Module);
            }
            other => panic!("expected NotFound, got {:?}", other),
        }
    }

    #[test]
    fn test_cycle_propagates_unchanged() {
        let mut registry = Registry::new();
        registry
            .register(ModuleDescriptor::new("A").with_dependencies(["B"]))
            .unwrap();
        registry
            .register(ModuleDescriptor::new("B").with_dependencies(["A"]))
            .unwrap();
        let target = TargetDescriptor::new("Game", TargetKind::Game).with_module("A");

        assert_eq!(
            bind(&registry, &target).unwrap_err(),
            DescriptorError::CyclicDependency {
                path: vec!["A".to_string(), "B".to_string(), "A".to_string()],
            }
        );
    }

    #[test]
    fn test_unknown_target_name() {
        let registry = dungeon_registry();
        assert!(matches!(
            bind_target(&registry, "AI_vs_DungeonServer"),
            Err(DescriptorError::NotFound {
                kind: DescriptorKind::Target,
                ..
            })
        ));
    }

    #[test]
    fn test_bind_all_in_registration_order() {
        let registry = dungeon_registry();
        let plans = bind_all(&registry).unwrap();

        let names: Vec<_> = plans.iter().map(|p| p.target.as_str()).collect();
        assert_eq!(names, vec!["AI_vs_Dungeon", "AI_vs_DungeonEditor"]);
    }
}
