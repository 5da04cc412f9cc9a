use super::*;
use serial_test::serial;

const MINIMAL: &str = "name: plant_master\n";

#[test]
fn test_minimal_config_defaults() {
    let config = Config::from_yaml(MINIMAL).unwrap();
    assert_eq!(config.name, "plant_master");
    assert_eq!(config.database.path, ":memory:");
    assert_eq!(config.database.db_type, DbType::DuckDb);
    assert!(config.builtin_catalog);
    assert!(config.units.is_empty());
}

#[test]
fn test_unknown_field_rejected() {
    let result = Config::from_yaml("name: x\nunknown_key: 1\n");
    assert!(matches!(result, Err(CoreError::YamlParse(_))));
}

#[test]
fn test_empty_name_rejected() {
    let result = Config::from_yaml("name: \"  \"\n");
    assert!(matches!(result, Err(CoreError::ConfigInvalid { .. })));
}

#[test]
fn test_unit_requires_exactly_one_script_source() {
    let neither = "name: x\nunits:\n  - name: t\n    columns: [id]\n";
    assert!(matches!(
        Config::from_yaml(neither),
        Err(CoreError::ScriptSource { name }) if name == "t"
    ));

    let both = "name: x\nunits:\n  - name: t\n    script: SELECT 1\n    script_file: t.sql\n";
    assert!(matches!(
        Config::from_yaml(both),
        Err(CoreError::ScriptSource { .. })
    ));
}

#[test]
fn test_invalid_unit_name_rejected() {
    let yaml = "name: x\nunits:\n  - name: \"bad name\"\n    script: SELECT 1\n";
    assert!(Config::from_yaml(yaml).is_err());
}

#[test]
fn test_no_units_without_catalog_rejected() {
    let result = Config::from_yaml("name: x\nbuiltin_catalog: false\n");
    assert!(matches!(result, Err(CoreError::ConfigInvalid { .. })));
}

#[test]
fn test_target_database_override() {
    let yaml = r#"
name: plant_master
database:
  path: dev.duckdb
targets:
  prod:
    database:
      path: /srv/master.duckdb
  staging: {}
"#;
    let config = Config::from_yaml(yaml).unwrap();
    assert_eq!(config.get_database_config(None).unwrap().path, "dev.duckdb");
    assert_eq!(
        config.get_database_config(Some("prod")).unwrap().path,
        "/srv/master.duckdb"
    );
    // Target without a database override falls back to the base config
    assert_eq!(
        config.get_database_config(Some("staging")).unwrap().path,
        "dev.duckdb"
    );

    let err = config.get_database_config(Some("qa")).unwrap_err();
    assert!(err.to_string().contains("prod, staging"));
}

#[test]
#[serial]
fn test_resolve_target_precedence() {
    std::env::set_var(TARGET_ENV_VAR, "prod");
    assert_eq!(Config::resolve_target(Some("dev")), Some("dev".to_string()));
    assert_eq!(Config::resolve_target(None), Some("prod".to_string()));
    std::env::remove_var(TARGET_ENV_VAR);
    assert_eq!(Config::resolve_target(None), None);
}

#[test]
fn test_load_from_dir_finds_yaml_variants() {
    let dir = tempfile::tempdir().unwrap();
    assert!(matches!(
        Config::load_from_dir(dir.path()),
        Err(CoreError::ConfigNotFound { .. })
    ));

    std::fs::write(dir.path().join("bedrock.yaml"), MINIMAL).unwrap();
    let config = Config::load_from_dir(dir.path()).unwrap();
    assert_eq!(config.name, "plant_master");
}

#[test]
fn test_build_registry_with_custom_units() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::create_dir(dir.path().join("sql")).unwrap();
    std::fs::write(
        dir.path().join("sql/cost_centers.sql"),
        "CREATE TABLE dms_cost_centers (id INTEGER PRIMARY KEY, code VARCHAR);",
    )
    .unwrap();

    let yaml = r#"
name: plant_master
units:
  - name: dms_cost_centers
    script_file: sql/cost_centers.sql
    columns: [id, code]
    depends_on: [dms_departments]
    category: organization
    seed:
      min_rows: 1
      filter: code IS NOT NULL
"#;
    let config = Config::from_yaml(yaml).unwrap();
    let registry = config.build_registry(dir.path()).unwrap();

    let unit = registry.get("dms_cost_centers").unwrap();
    assert!(unit.script().starts_with("CREATE TABLE dms_cost_centers"));
    assert_eq!(unit.columns(), ["id", "code"]);
    assert_eq!(unit.category(), UnitCategory::Organization);
    assert_eq!(
        unit.seed().and_then(|s| s.filter.as_deref()),
        Some("code IS NOT NULL")
    );
    assert!(registry
        .ancestors("dms_cost_centers")
        .unwrap()
        .iter()
        .any(|n| n == "dms_sites"));
}

#[test]
fn test_build_registry_missing_script_file() {
    let yaml = "name: x\nbuiltin_catalog: false\nunits:\n  - name: t\n    script_file: nope.sql\n";
    let config = Config::from_yaml(yaml).unwrap();
    let dir = tempfile::tempdir().unwrap();
    assert!(matches!(
        config.build_registry(dir.path()),
        Err(CoreError::IoWithPath { .. })
    ));
}

#[test]
fn test_build_registry_rejects_catalog_name_clash() {
    let yaml = "name: x\nunits:\n  - name: dms_sites\n    script: SELECT 1\n";
    let config = Config::from_yaml(yaml).unwrap();
    assert!(matches!(
        config.build_registry(Path::new(".")),
        Err(CoreError::DuplicateUnit { name }) if name == "dms_sites"
    ));
}
