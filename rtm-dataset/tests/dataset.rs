use rtm_dataset::{
    check_version, CoordValues, Coordinate, Dataset, DatasetError, Results, Variable,
    VersionCheck, ATTR_TITLE, ATTR_VERSION,
};
use tempfile::tempdir;

fn sample_dataset() -> Dataset {
    let mut dataset = Dataset::new();
    dataset.add_dim("wavelength", 3).expect("dim");
    dataset.add_dim("atmosphere", 2).expect("dim");
    dataset
        .add_coord(
            Coordinate::index(
                "wavelength",
                CoordValues::Float64(vec![0.4, 0.55, 0.7]),
            )
            .with_attr(ATTR_TITLE, "Wavelength (µm)"),
        )
        .expect("coord");
    dataset
        .add_coord(Coordinate::index(
            "atmosphere",
            CoordValues::Str(vec!["Tropical".to_string(), "SubarcticWinter".to_string()]),
        ))
        .expect("coord");
    let var = Variable::new(
        "transmittance",
        &[("wavelength", 3), ("atmosphere", 2)],
        vec![0.5, f64::INFINITY, 0.7, f64::NEG_INFINITY, 0.9, f64::NAN],
    )
    .expect("variable")
    .with_attr(ATTR_TITLE, "Total transmittance");
    dataset.add_var(var).expect("var");
    dataset
}

#[test]
fn dim_title_prefers_coordinate_title() {
    let dataset = sample_dataset();
    assert_eq!(dataset.dim_title("wavelength"), "Wavelength (µm)");
    assert_eq!(dataset.dim_title("atmosphere"), "atmosphere");
}

#[test]
fn sweep_dims_require_index_coordinate() {
    let mut dataset = sample_dataset();
    dataset.add_dim("band", 4).expect("dim");
    let names: Vec<&str> = dataset
        .sweep_dims()
        .iter()
        .map(|d| d.name.as_str())
        .collect();
    assert_eq!(names, vec!["wavelength", "atmosphere"]);
}

#[test]
fn add_var_rejects_undeclared_dim() {
    let mut dataset = sample_dataset();
    let var = Variable::new("x", &[("missing", 1)], vec![1.0]).expect("variable");
    let err = dataset.add_var(var).unwrap_err();
    assert!(matches!(err, DatasetError::UnknownDim(name) if name == "missing"));
}

#[test]
fn variable_rejects_wrong_value_count() {
    assert!(Variable::new("x", &[("a", 2)], vec![1.0]).is_err());
}

#[test]
fn save_and_reload_preserves_structure() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("results.json");
    let mut results = Results::unsaved(sample_dataset());
    assert!(!results.is_saved());
    results.save_as(&path).expect("save");
    assert_eq!(results.file.as_deref(), Some(path.as_path()));

    let loaded = Results::load(&path).expect("load");
    let dataset = &loaded.dataset;
    assert_eq!(dataset.dims, results.dataset.dims);
    let var = dataset.var("transmittance").expect("var");
    assert_eq!(var.shape, vec![3, 2]);
    assert!(var.values[5].is_nan());
    assert_eq!(
        var.values[..5],
        [0.5, f64::INFINITY, 0.7, f64::NEG_INFINITY, 0.9]
    );
    assert_eq!(
        dataset.index_coord("wavelength").map(|c| &c.values),
        Some(&CoordValues::Float64(vec![0.4, 0.55, 0.7]))
    );
    assert_eq!(dataset.dim_title("wavelength"), "Wavelength (µm)");
}

#[test]
fn load_rejects_inconsistent_file() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("broken.json");
    std::fs::write(
        &path,
        r#"{"dims":[{"name":"a","size":2}],"data_vars":[{"name":"v","dims":["a"],"shape":[3],"values":[1,2,3]}]}"#,
    )
    .expect("write");
    assert!(matches!(
        Dataset::load_from_file(&path),
        Err(DatasetError::Invalid(_))
    ));

    std::fs::write(&path, "not json").expect("write");
    assert!(matches!(
        Dataset::load_from_file(&path),
        Err(DatasetError::Format(_))
    ));
}

#[test]
fn load_rejects_overflowing_shape() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("huge.json");
    let size = 1u64 << 33;
    let document = format!(
        r#"{{"dims":[{{"name":"a","size":{size}}},{{"name":"b","size":{size}}}],"data_vars":[{{"name":"v","dims":["a","b"],"shape":[{size},{size}],"values":[]}}]}}"#
    );
    std::fs::write(&path, document).expect("write");
    assert!(matches!(
        Dataset::load_from_file(&path),
        Err(DatasetError::Invalid(_))
    ));
    assert!(Results::load(&path).is_err());
}

#[test]
fn add_coord_rejects_overflowing_shape() {
    let mut dataset = Dataset::new();
    dataset.add_dim("a", usize::MAX).expect("dim");
    dataset.add_dim("b", 2).expect("dim");
    let coord = Coordinate {
        name: "grid".to_string(),
        dims: vec!["a".to_string(), "b".to_string()],
        values: CoordValues::Float64(Vec::new()),
        attrs: Default::default(),
    };
    assert!(matches!(
        dataset.add_coord(coord),
        Err(DatasetError::Invalid(_))
    ));
    assert!(matches!(
        Variable::new("v", &[("a", usize::MAX), ("b", 2)], Vec::new()),
        Err(DatasetError::Invalid(_))
    ));
}

#[test]
fn version_gate_verdicts() {
    let mut dataset = Dataset::new();
    assert_eq!(check_version(&dataset, "1.2.0"), VersionCheck::Missing);

    dataset.attrs.insert(ATTR_VERSION.to_string(), "banana".to_string());
    assert!(matches!(
        check_version(&dataset, "1.2.0"),
        VersionCheck::Unparsable(_)
    ));

    dataset.attrs.insert(ATTR_VERSION.to_string(), "1.3.0-dev.4".to_string());
    assert!(matches!(
        check_version(&dataset, "1.2.0"),
        VersionCheck::DevelopmentBuild { .. }
    ));
    assert_eq!(check_version(&dataset, "1.3.0-dev.5"), VersionCheck::Compatible);

    dataset.attrs.insert(ATTR_VERSION.to_string(), "2.0.1".to_string());
    let verdict = check_version(&dataset, "1.2.0");
    assert_eq!(verdict.title(), "Confirm different major version");

    dataset.attrs.insert(ATTR_VERSION.to_string(), "1.0.9".to_string());
    assert!(check_version(&dataset, "1.2.0").is_compatible());
}
