//! Built-in component, plugin manager and solve engine.

use std::sync::Arc;

use branching_tree::builtin::components::{OUTPUT_BRANCHES, OUTPUT_COUNT};
use branching_tree::builtin::BranchingTreeComponent;
use branching_tree::config::ForestConfig;
use branching_tree::model::AngleUnit;
use branching_tree::plugin::PinDataType;
use branching_tree::{
    build_forest, create_plugin_manager, ComponentPlugin, DataAccess, PinValue, PluginManager,
    SolveEngine, SolvePhase,
};

fn inputs(
    length: Option<f64>,
    angle: Option<f64>,
    scale: Option<f64>,
    count: Option<i64>,
) -> Vec<Option<PinValue>> {
    vec![
        length.map(PinValue::Scalar),
        angle.map(PinValue::Scalar),
        scale.map(PinValue::Scalar),
        count.map(PinValue::Integer),
    ]
}

#[test]
fn test_definition_pins() {
    let def = BranchingTreeComponent::default().definition();
    let names: Vec<_> = def.inputs.iter().map(|pin| pin.nickname.as_str()).collect();
    assert_eq!(names, ["L", "BA", "BS", "N"]);
    assert_eq!(def.inputs[3].data_type, PinDataType::Integer);
    assert_eq!(def.output_index("Check"), Some(OUTPUT_COUNT));
    assert_eq!(def.output_index("Branches"), Some(OUTPUT_BRANCHES));
}

#[test]
fn test_solve_writes_count_and_branches() {
    let component = BranchingTreeComponent::default();
    let def = component.definition();
    let mut access = DataAccess::new(&def, 0, inputs(Some(10.0), Some(30.0), Some(0.7), Some(2)));

    component.solve_instance(&mut access, SolvePhase::Solve).unwrap();

    let expected = build_forest(10.0, 30.0, 0.7, 2);
    assert_eq!(access.output(OUTPUT_COUNT), Some(&PinValue::Integer(7)));
    assert_eq!(
        access.output(OUTPUT_BRANCHES).and_then(PinValue::as_lines),
        Some(expected.segments())
    );
}

#[test]
fn test_each_missing_input_skips_output() {
    let component = BranchingTreeComponent::default();
    let def = component.definition();
    let cases = [
        inputs(None, Some(30.0), Some(0.7), Some(2)),
        inputs(Some(10.0), None, Some(0.7), Some(2)),
        inputs(Some(10.0), Some(30.0), None, Some(2)),
        inputs(Some(10.0), Some(30.0), Some(0.7), None),
        vec![],
    ];
    for case in cases {
        let mut access = DataAccess::new(&def, 0, case);
        component.solve_instance(&mut access, SolvePhase::Solve).unwrap();
        assert!(!access.has_output());
    }
}

#[test]
fn test_missing_input_error_names_the_pin() {
    let def = BranchingTreeComponent::default().definition();
    let access = DataAccess::new(&def, 0, inputs(Some(1.0), None, Some(0.5), Some(1)));
    let err = access.get_scalar(1).unwrap_err();
    assert!(err.is_missing_input());
    assert!(err.to_string().contains("Branch Angle"));
}

#[test]
fn test_whole_scalar_is_accepted_as_count() {
    let component = BranchingTreeComponent::default();
    let def = component.definition();
    let mut input = inputs(Some(10.0), Some(30.0), Some(0.7), None);
    input[3] = Some(PinValue::Scalar(3.0));
    let mut access = DataAccess::new(&def, 0, input);
    component.solve_instance(&mut access, SolvePhase::Solve).unwrap();
    assert_eq!(access.output(OUTPUT_COUNT), Some(&PinValue::Integer(15)));
}

#[test]
fn test_engine_counts_items_with_output() {
    let component = BranchingTreeComponent::default();
    let def = component.definition();
    let mut items = vec![
        DataAccess::new(&def, 0, inputs(Some(10.0), Some(30.0), Some(0.7), Some(1))),
        DataAccess::new(&def, 1, inputs(None, Some(30.0), Some(0.7), Some(1))),
        DataAccess::new(&def, 2, inputs(Some(5.0), Some(10.0), Some(0.5), Some(-3))),
    ];

    // Not task capable, so task mode makes no difference.
    assert_eq!(SolveEngine::new(true).solve(&component, &mut items), 2);
    assert_eq!(items[2].output(OUTPUT_COUNT), Some(&PinValue::Integer(1)));
}

#[test]
fn test_plugin_manager_registration() {
    let manager = PluginManager::new();
    assert!(manager.get_component(BranchingTreeComponent::ID).is_none());

    manager.register_component(Arc::new(BranchingTreeComponent::default()));
    manager.register_component(Arc::new(BranchingTreeComponent::default()));

    assert_eq!(manager.component_ids(), vec![BranchingTreeComponent::ID.to_string()]);
    assert_eq!(manager.definitions().len(), 1);
    let component = manager.get_component(BranchingTreeComponent::ID).unwrap();
    assert!(!component.is_task_capable());
    manager.request_cancel_all();
}

#[test]
fn test_create_plugin_manager_uses_configured_angle_unit() {
    let config = ForestConfig {
        angle_unit: AngleUnit::Degrees,
        ..ForestConfig::default()
    };
    let manager = create_plugin_manager(&config);
    let component = manager.get_component(BranchingTreeComponent::ID).unwrap();

    let def = component.definition();
    let mut access = DataAccess::new(&def, 0, inputs(Some(1.0), Some(180.0), Some(1.0), Some(1)));
    component.solve_instance(&mut access, SolvePhase::Solve).unwrap();

    let lines = access.output(OUTPUT_BRANCHES).and_then(PinValue::as_lines).unwrap();
    // Half a turn in real degrees folds the children back onto the trunk.
    assert!(lines[1].to.distance_to(branching_tree::Point3::ORIGIN) < 1e-9);
}

#[test]
fn test_missing_plugin_directory_loads_nothing() {
    let manager = PluginManager::new();
    let dir = std::env::temp_dir().join(format!("forest-plugins-{}", uuid::Uuid::new_v4()));
    assert_eq!(manager.load_plugins_from_directory(&dir).unwrap(), 0);
}

#[test]
fn test_non_plugin_files_are_skipped() {
    let dir = std::env::temp_dir().join(format!("forest-plugins-{}", uuid::Uuid::new_v4()));
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(dir.join("readme.txt"), "not a plugin").unwrap();
    std::fs::write(dir.join("broken.so"), "not a shared object").unwrap();

    let manager = PluginManager::new();
    let loaded = manager.load_plugins_from_directory(&dir).unwrap();
    std::fs::remove_dir_all(&dir).unwrap();

    assert_eq!(loaded, 0);
    assert!(manager.component_ids().is_empty());
}
