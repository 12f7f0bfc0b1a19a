//! Catalog loading through the config path.

use std::io::Write;

use tlc_athena::*;

#[test]
fn load_without_override_uses_builtin() {
    let catalog = SchemaCatalog::load(None).unwrap();
    assert_eq!(catalog, SchemaCatalog::builtin());
}

#[test]
fn load_override_from_config_path() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        file,
        r#"
[[tables]]
name = "fhv_trips"
description = "For-hire vehicle trips"
columns = ["dispatching_base_num", "pickup_datetime", "pulocationid"]
"#
    )
    .unwrap();

    let cfg = AthenaConfig {
        schema_file: Some(file.path().to_path_buf()),
        ..AthenaConfig::default()
    };
    let catalog = SchemaCatalog::load(cfg.schema_file.as_deref()).unwrap();

    assert_eq!(catalog.table_names(), vec!["fhv_trips"]);
    let text = catalog.describe();
    assert!(text.contains("Table: fhv_trips"));
    assert!(text.contains("Columns: dispatching_base_num, pickup_datetime, pulocationid"));
    assert!(!text.contains("taxi_zones"));
}
