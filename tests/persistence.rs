use varscope::persistence::{
    load_project_from_path, project_from_json, project_from_yaml, project_to_json,
    project_to_yaml, save_project_to_path, PlotSerde, ProjectSerde, VariableSerde,
};
use varscope::{AcquisitionConfig, PlotHandler, PlotKind, VarType};

fn sample_handler() -> PlotHandler {
    let config = AcquisitionConfig {
        buffer_capacity: 64,
        elf_path: Some("/tmp/firmware.elf".into()),
        ..Default::default()
    };
    let handler = PlotHandler::new(config).unwrap();
    handler.add_variable("speed", 0x2000_0000, VarType::F32).unwrap();
    handler.add_variable("rpm", 0x2000_0004, VarType::U16).unwrap();
    handler.add_plot("dash").unwrap();
    handler.set_plot_kind("dash", PlotKind::Table).unwrap();
    handler.set_plot_visibility("dash", false).unwrap();
    handler.add_series("dash", "speed").unwrap();
    handler.add_series("dash", "rpm").unwrap();
    handler
}

#[test]
fn capture_reflects_the_live_setup() {
    let project = ProjectSerde::capture(&sample_handler());
    assert_eq!(project.elf_path.as_deref(), Some("/tmp/firmware.elf"));
    assert_eq!(project.variables.len(), 2);
    assert_eq!(project.plots.len(), 1);
    let plot = &project.plots[0];
    assert_eq!(plot.name, "dash");
    assert_eq!(plot.kind, PlotKind::Table);
    assert!(!plot.visible);
    assert_eq!(plot.series, vec!["speed".to_string(), "rpm".to_string()]);
}

#[test]
fn json_round_trip_preserves_the_project() {
    let project = ProjectSerde::capture(&sample_handler());
    let json = project_to_json(&project).unwrap();
    let restored = project_from_json(&json).unwrap();
    assert_eq!(restored.plots[0].series, project.plots[0].series);
    assert_eq!(restored.variables[0].name, "speed");
    assert_eq!(restored.variables[0].address, 0x2000_0000);
}

#[test]
fn yaml_round_trip_preserves_the_project() {
    let project = ProjectSerde::capture(&sample_handler());
    let yaml = project_to_yaml(&project).unwrap();
    let restored = project_from_yaml(&yaml).unwrap();
    assert_eq!(restored.plots[0].name, "dash");
    assert_eq!(restored.plots[0].kind, PlotKind::Table);
    assert_eq!(restored.variables.len(), 2);
}

#[test]
fn apply_to_rebuilds_variables_and_rebinds_series_by_name() {
    let project = ProjectSerde::capture(&sample_handler());

    let target = PlotHandler::new(AcquisitionConfig::default()).unwrap();
    target.add_plot("stale").unwrap();
    target.add_variable("stale_var", 0x0, VarType::U8).unwrap();

    project.apply_to(&target).unwrap();

    assert_eq!(target.plot_names(), vec!["dash".to_string()]);
    assert!(target.variable("stale_var").is_none());
    let snap = target.plot_snapshot("dash").unwrap();
    assert_eq!(snap.kind, PlotKind::Table);
    assert!(!snap.visible);
    let names: Vec<_> = snap.series.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, vec!["speed", "rpm"]);
}

#[test]
fn apply_to_skips_series_for_unknown_variables() {
    let project = ProjectSerde {
        elf_path: None,
        variables: vec![VariableSerde {
            name: "present".into(),
            address: 0x1,
            ty: VarType::U8,
            color_rgba: [1, 2, 3, 255],
        }],
        plots: vec![PlotSerde {
            name: "P".into(),
            kind: PlotKind::Curve,
            visible: true,
            series: vec!["present".into(), "missing".into()],
        }],
    };

    let handler = PlotHandler::new(AcquisitionConfig::default()).unwrap();
    project.apply_to(&handler).unwrap();
    let snap = handler.plot_snapshot("P").unwrap();
    assert_eq!(snap.series.len(), 1);
    assert_eq!(snap.series[0].name, "present");
    assert_eq!(snap.series[0].color.0, [1, 2, 3, 255]);
}

#[test]
fn file_round_trip_by_extension() {
    let project = ProjectSerde::capture(&sample_handler());
    let dir = std::env::temp_dir();

    for file in ["varscope_project_test.json", "varscope_project_test.yaml"] {
        let path = dir.join(file);
        save_project_to_path(&project, &path).unwrap();
        let restored = load_project_from_path(&path).unwrap();
        assert_eq!(restored.plots[0].name, "dash");
        assert_eq!(restored.variables.len(), 2);
        let _ = std::fs::remove_file(&path);
    }
}

#[test]
fn load_from_missing_path_is_a_persistence_error() {
    let err = load_project_from_path(std::path::Path::new("/nonexistent/varscope.json"))
        .unwrap_err();
    assert!(matches!(err, varscope::VarScopeError::Persistence(_)));
}
