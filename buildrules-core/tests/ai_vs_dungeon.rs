use buildrules_core::{
    bind, bind_all, resolve, DescriptorError, DescriptorKind, Manifest, ModuleDescriptor,
    Registry, TargetDescriptor, TargetKind,
};

const MANIFEST: &str = r#"{
    "project": "AI_vs_Dungeon",
    "targets": [
        { "name": "AI_vs_Dungeon", "kind": "game", "extraModuleNames": ["AI_vs_Dungeon"] },
        { "name": "AI_vs_DungeonEditor", "kind": "editor", "extraModuleNames": ["AI_vs_Dungeon"] }
    ],
    "modules": [
        {
            "name": "AI_vs_Dungeon",
            "publicDependencyModuleNames": [
                "Core", "CoreUObject", "Engine", "InputCore", "AIModule"
            ]
        },
        { "name": "Core" },
        { "name": "CoreUObject" },
        { "name": "Engine" },
        { "name": "InputCore" },
        { "name": "AIModule" }
    ]
}"#;

fn expected_modules() -> Vec<String> {
    ["Core", "CoreUObject", "Engine", "InputCore", "AIModule", "AI_vs_Dungeon"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

#[test]
fn test_game_and_editor_plans_from_manifest() {
    let manifest = Manifest::from_str(MANIFEST).unwrap();
    let registry = Registry::from_manifest(&manifest).unwrap();

    let plans = bind_all(&registry).unwrap();
    assert_eq!(plans.len(), 2);

    assert_eq!(plans[0].target, "AI_vs_Dungeon");
    assert_eq!(plans[0].kind, TargetKind::Game);
    assert_eq!(plans[0].ordered_modules, expected_modules());

    assert_eq!(plans[1].target, "AI_vs_DungeonEditor");
    assert_eq!(plans[1].kind, TargetKind::Editor);
    assert_eq!(plans[1].ordered_modules, expected_modules());
}

#[test]
fn test_starter_manifest_matches_declarations() {
    let registry = Registry::from_manifest(&Manifest::default()).unwrap();
    let plans = bind_all(&registry).unwrap();

    let parsed = Registry::from_manifest(&Manifest::from_str(MANIFEST).unwrap()).unwrap();
    assert_eq!(plans, bind_all(&parsed).unwrap());
}

#[test]
fn test_repeated_binding_is_stable() {
    let registry = Registry::from_manifest(&Manifest::from_str(MANIFEST).unwrap()).unwrap();
    let target = registry.lookup_target("AI_vs_DungeonEditor").unwrap();

    let first = bind(&registry, target).unwrap();
    for _ in 0..10 {
        assert_eq!(bind(&registry, target).unwrap(), first);
    }
}

#[test]
fn test_duplicate_module_in_manifest() {
    let json = r#"{
        "project": "P",
        "modules": [{ "name": "Core" }, { "name": "Core" }]
    }"#;
    let manifest = Manifest::from_str(json).unwrap();

    assert_eq!(
        Registry::from_manifest(&manifest).unwrap_err(),
        DescriptorError::DuplicateName {
            name: "Core".to_string(),
            kind: DescriptorKind::Module,
        }
    );
}

#[test]
fn test_missing_engine_module() {
    let mut registry = Registry::new();
    registry
        .register(ModuleDescriptor::new("AI_vs_Dungeon").with_dependencies(["Core", "AIModule"]))
        .unwrap();
    registry.register(ModuleDescriptor::new("Core")).unwrap();
    let target =
        TargetDescriptor::new("AI_vs_Dungeon", TargetKind::Game).with_module("AI_vs_Dungeon");

    match bind(&registry, &target).unwrap_err() {
        DescriptorError::NotFound {
            name, required_by, ..
        } => {
            assert_eq!(name, "AIModule");
            assert_eq!(required_by.as_deref(), Some("AI_vs_Dungeon"));
        }
        other => panic!("expected NotFound, got {:?}", other),
    }
}

#[test]
fn test_resolution_can_be_walked_twice() {
    let registry = Registry::from_manifest(&Manifest::from_str(MANIFEST).unwrap()).unwrap();
    let resolution = resolve(&registry, "AI_vs_Dungeon").unwrap();

    let first: Vec<&str> = resolution.iter().map(Result::unwrap).collect();
    let second: Vec<&str> = resolution.iter().map(Result::unwrap).collect();

    assert_eq!(first, second);
    assert_eq!(resolution.root(), "AI_vs_Dungeon");
    assert_eq!(first.last(), Some(&"AI_vs_Dungeon"));
}
