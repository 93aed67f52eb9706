use frame_solver::prelude::*;

fn two_node_geometry(end: [f64; 3], element_type: &str) -> String {
    format!(
        r#"{{
            "nodes": [
                {{"id": "A", "position": [0.0, 0.0, 0.0]}},
                {{"id": "B", "position": [{}, {}, {}]}}
            ],
            "components": [
                {{"id": "arch", "kind": "arch", "members": [
                    {{"id": "M1", "element_type": "{}", "start": "A", "end": "B",
                     "material": "steel", "section": "hoop"}}
                ]}}
            ],
            "supports": [{{"node": "A", "support": {{"restraints": [true, true, true, true, true, true]}}}}],
            "materials": {{"steel": {{"e": 2.1e11, "g": 8.1e10, "nu": 0.3, "rho": 7850.0, "fy": 3.55e8}}}},
            "sections": {{"hoop": {{"a": 3.6e-4, "iy": 1.5e-7, "iz": 1.5e-7, "ix": 3.0e-7, "j": 3.0e-7}}}}
        }}"#,
        end[0], end[1], end[2], element_type
    )
}

#[test]
fn geometry_from_json_builds_model() {
    let geometry = GeometryModel::from_json_str(&two_node_geometry([0.0, 0.0, 2.0], "frame")).unwrap();
    let mut recorder = EventRecorder::new();
    let mut model = StructuralModel::new();
    model
        .create_model_from_geometry(&geometry, &[LoadCase::dead().with_self_weight()], &mut recorder)
        .unwrap();

    assert_eq!(model.nodes().len(), 2);
    assert_eq!(model.element("M1").unwrap().component.as_deref(), Some("arch"));
    assert_eq!(
        recorder.events,
        vec![SolverEvent::ModelCreated {
            nodes: 2,
            elements: 1,
            load_cases: 1
        }]
    );

    let results = model
        .analyze(&LoadCombination::single("G", "Dead"), &SolverConfiguration::linear(), &mut recorder)
        .unwrap();
    assert!(matches!(recorder.events[1], SolverEvent::MatricesAssembled { dofs: 12 }));
    assert!(matches!(recorder.events[2], SolverEvent::AnalysisComplete { .. }));
    // Vertical post under self-weight shortens
    assert!(results.displacement("B").unwrap()[2] < 0.0);
    assert!(results.element("M1").unwrap().axial_force < 0.0);
}

#[test]
fn geometry_errors_are_model_errors() {
    let mut model = StructuralModel::new();

    let mut geometry = GeometryModel::from_json_str(&two_node_geometry([0.0, 0.0, 2.0], "frame")).unwrap();
    geometry.components[0].members[0].material = "timber".to_string();
    let err = model.create_model_from_geometry(&geometry, &[], &mut ()).unwrap_err();
    assert!(matches!(err, FEAError::MaterialNotFound(_)));

    let mut geometry = GeometryModel::from_json_str(&two_node_geometry([0.0, 0.0, 2.0], "frame")).unwrap();
    geometry.components[0].members[0].end = "Z".to_string();
    let err = model.create_model_from_geometry(&geometry, &[], &mut ()).unwrap_err();
    assert!(matches!(err, FEAError::NodeNotFound(_)));

    let geometry = GeometryModel::from_json_str(&two_node_geometry([0.0, 0.0, 0.0], "frame")).unwrap();
    let err = model.create_model_from_geometry(&geometry, &[], &mut ()).unwrap_err();
    assert!(matches!(err, FEAError::InvalidGeometry(_)));
    assert_eq!(err.category(), ErrorCategory::Model);

    let geometry = GeometryModel::from_json_str(&two_node_geometry([1.0, 0.0, 0.0], "shell")).unwrap();
    let err = model.create_model_from_geometry(&geometry, &[], &mut ()).unwrap_err();
    assert!(matches!(err, FEAError::UnsupportedElement(_)));
    assert_eq!(err.category(), ErrorCategory::Configuration);

    let geometry = GeometryModel::from_json_str(&two_node_geometry([1.0, 0.0, 0.0], "frame")).unwrap();
    let beyond = LoadCase::live().with_point_load(PointLoad::downward("M1", 100.0, 1.5));
    let err = model.create_model_from_geometry(&geometry, &[beyond], &mut ()).unwrap_err();
    assert!(matches!(err, FEAError::InvalidInput(_)));
}

#[test]
fn local_y_parallel_to_axis_is_rejected() {
    let mut model = StructuralModel::new();
    model.add_node(Node::new("A", 0.0, 0.0, 0.0)).unwrap();
    model.add_node(Node::new("B", 3.0, 0.0, 0.0)).unwrap();
    let element = Element::new("M", ElementType::Beam, 0, 1, Material::steel(), Section::default())
        .with_local_y([1.0, 0.0, 0.0]);
    assert!(matches!(model.add_element(element), Err(FEAError::InvalidGeometry(_))));
}

#[test]
fn configuration_from_json() {
    let config = SolverConfiguration::from_json_str(
        r#"{"analysis_type": "nonlinear_static", "p_delta": true, "max_iterations": 50}"#,
    )
    .unwrap();
    assert_eq!(config.analysis_type, AnalysisType::NonlinearStatic);
    assert!(config.p_delta);
    assert_eq!(config.max_iterations, 50);
    assert_eq!(config.tolerance, 1e-6);

    let err = SolverConfiguration::from_json_str(r#"{"analysis_type": "harmonic"}"#).unwrap_err();
    assert!(matches!(err, FEAError::UnsupportedAnalysis(_)));
    assert_eq!(err.category(), ErrorCategory::Configuration);

    let err = SolverConfiguration::from_json_str(r#"{"tolerance": -1.0}"#).unwrap_err();
    assert!(matches!(err, FEAError::InvalidConfiguration(_)));

    let err = SolverConfiguration::from_json_file("does/not/exist.json").unwrap_err();
    assert_eq!(err.category(), ErrorCategory::Io);
}

#[test]
fn concurrent_solves_share_one_model() {
    let snow = LoadCase::snow()
        .with_distributed_load(DistributedLoad::uniform_downward("R1", 2000.0))
        .with_distributed_load(DistributedLoad::uniform_downward("R2", 2000.0));
    let mut model = StructuralModel::new();
    model
        .create_model_from_geometry(
            &GeometryModel::gable_frame(9.6, 4.0, 5.6),
            &[LoadCase::dead().with_self_weight(), snow],
            &mut (),
        )
        .unwrap();

    let linear = SolverConfiguration::linear();
    let modal = SolverConfiguration::modal(3);
    let matrices = model.assemble_global_matrices(&linear, &mut ()).unwrap();
    let combination = LoadCombination::uls_snow();

    let (a, b, c) = std::thread::scope(|scope| {
        let first = scope.spawn(|| Solver::new(&model, &matrices, &linear).solve(&combination, &mut ()));
        let second = scope.spawn(|| Solver::new(&model, &matrices, &linear).solve(&combination, &mut ()));
        let third = scope.spawn(|| {
            Solver::new(&model, &matrices, &modal).solve(&LoadCombination::new("modal"), &mut ())
        });
        (
            first.join().unwrap().unwrap(),
            second.join().unwrap().unwrap(),
            third.join().unwrap().unwrap(),
        )
    });

    assert_eq!(a.displacements, b.displacements);
    assert_eq!(a.elements, b.elements);
    assert_eq!(c.modal.unwrap().modes.len(), 3);
}

#[test]
fn stored_results_land_on_nodes() {
    let mut model = StructuralModel::new();
    model.add_node(Node::new("A", 0.0, 0.0, 0.0)).unwrap();
    model.add_node(Node::new("B", 0.0, 0.0, 3.0)).unwrap();
    model
        .add_element(Element::new("C", ElementType::Frame, 0, 1, Material::steel(), Section::default()))
        .unwrap();
    model.add_support("A", Support::fixed()).unwrap();
    model
        .add_load_case(LoadCase::wind().with_node_load(NodeLoad::force("B", 200.0, 0.0, 0.0)))
        .unwrap();

    let results = model
        .analyze(&LoadCombination::single("W", "Wind"), &SolverConfiguration::linear(), &mut ())
        .unwrap();
    model.store_results(&results);

    let top = model.node("B").unwrap();
    assert_eq!(top.displacement, results.displacement("B"));
    assert!(top.reaction.is_none());
    assert_eq!(top.applied[0], 200.0);
    assert!(model.node("A").unwrap().reaction.is_some());
}

#[test]
fn case_scale_and_combination_factor_multiply() {
    let build = |scale: f64| {
        let mut model = StructuralModel::new();
        model.add_node(Node::new("A", 0.0, 0.0, 0.0)).unwrap();
        model.add_node(Node::new("B", 4.0, 0.0, 0.0)).unwrap();
        model
            .add_element(Element::new("M", ElementType::Beam, 0, 1, Material::steel(), Section::rectangular(0.1, 0.2)))
            .unwrap();
        model.add_support("A", Support::fixed()).unwrap();
        model
            .add_load_case(
                LoadCase::live()
                    .with_scale(scale)
                    .with_point_load(PointLoad::downward("M", 500.0, 2.0)),
            )
            .unwrap();
        model
    };

    let base = build(1.0)
        .analyze(&LoadCombination::single("Q", "Live"), &SolverConfiguration::linear(), &mut ())
        .unwrap();
    let scaled = build(2.0)
        .analyze(
            &LoadCombination::new("Q").with_case("Live", 1.5),
            &SolverConfiguration::linear(),
            &mut (),
        )
        .unwrap();

    let dz = |r: &SolverResults| r.displacement("B").unwrap()[2];
    assert!(dz(&base) < 0.0);
    assert!((dz(&scaled) / dz(&base) - 3.0).abs() < 1e-9);
}

#[test]
fn duplicate_ids_are_rejected() {
    let mut model = StructuralModel::new();
    model.add_node(Node::new("A", 0.0, 0.0, 0.0)).unwrap();
    let err = model.add_node(Node::new("A", 1.0, 0.0, 0.0)).unwrap_err();
    assert!(matches!(err, FEAError::DuplicateId(ref id) if id == "A"));

    model.add_load_case(LoadCase::dead()).unwrap();
    assert!(matches!(model.add_load_case(LoadCase::dead()), Err(FEAError::DuplicateId(_))));
}

#[test]
fn failed_rebuild_keeps_previous_model() {
    let mut model = StructuralModel::new();
    model
        .create_model_from_geometry(&GeometryModel::gable_frame(9.6, 4.0, 5.6), &[LoadCase::dead()], &mut ())
        .unwrap();

    let mut broken = GeometryModel::from_json_str(&two_node_geometry([0.0, 0.0, 2.0], "frame")).unwrap();
    broken.components[0].members[0].section = "missing".to_string();
    let mut recorder = EventRecorder::new();
    let err = model.create_model_from_geometry(&broken, &[], &mut recorder).unwrap_err();

    assert!(matches!(err, FEAError::SectionNotFound(_)));
    assert!(recorder.events.is_empty());
    assert_eq!(model.nodes().len(), 5);
    assert_eq!(model.elements().len(), 4);
    assert!(model.node("R").is_some());
    assert!(model.load_case("Dead").is_some());
}
