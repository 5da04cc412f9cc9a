use super::*;
use crate::test_support::run_script;
use br_core::{SeedRequirement, UnitName};
use br_db::DuckDbBackend;

fn roles_unit(min_rows: usize) -> SchemaUnit {
    SchemaUnit::builder(
        UnitName::new("dms_roles"),
        "CREATE TABLE dms_roles (id INTEGER, role_name VARCHAR, display_name VARCHAR)",
    )
    .columns(["id", "role_name", "display_name"])
    .seed(SeedRequirement::at_least(min_rows))
    .build()
}

#[tokio::test]
async fn test_absent_table_short_circuits() {
    let db = DuckDbBackend::in_memory().unwrap();
    let result = verify(&roles_unit(2), &db).await.unwrap();

    assert!(!result.exists);
    assert!(result.missing_columns.is_empty());
    assert_eq!(result.row_count, None);
    assert_eq!(result.required_minimum, Some(2));
    assert!(!result.passed());
    assert_eq!(result.to_string(), "table 'dms_roles' does not exist");
}

#[tokio::test]
async fn test_missing_columns_in_declaration_order() {
    let db = DuckDbBackend::in_memory().unwrap();
    db.execute("CREATE TABLE dms_roles (id INTEGER)").await.unwrap();

    let result = verify(&roles_unit(0), &db).await.unwrap();
    assert!(result.exists);
    assert_eq!(result.missing_columns, vec!["role_name", "display_name"]);
    assert!(!result.is_structurally_sound());
    assert_eq!(
        result.to_string(),
        "missing columns: role_name, display_name"
    );
}

#[tokio::test]
async fn test_column_comparison_ignores_case() {
    let db = DuckDbBackend::in_memory().unwrap();
    db.execute("CREATE TABLE dms_roles (ID INTEGER, Role_Name VARCHAR, DISPLAY_NAME VARCHAR)")
        .await
        .unwrap();

    let result = verify(&roles_unit(0), &db).await.unwrap();
    assert!(result.missing_columns.is_empty());
    assert!(result.passed());
}

#[tokio::test]
async fn test_seed_shortfall() {
    let db = DuckDbBackend::in_memory().unwrap();
    run_script(
        &db,
        "CREATE TABLE dms_roles (id INTEGER, role_name VARCHAR, display_name VARCHAR);
         INSERT INTO dms_roles VALUES (1, 'admin', 'Administrator');",
    )
    .await;

    let result = verify(&roles_unit(4), &db).await.unwrap();
    assert!(result.is_structurally_sound());
    assert!(!result.seed_satisfied());
    assert_eq!(result.row_count, Some(1));
    assert_eq!(result.row_shortfall(), Some(3));
    assert_eq!(result.to_string(), "1 of 4 required rows present");
}

#[tokio::test]
async fn test_seed_filter_counts_qualifying_rows() {
    let db = DuckDbBackend::in_memory().unwrap();
    run_script(
        &db,
        "CREATE TABLE dms_notification_channels (id INTEGER, is_enabled BOOLEAN);
         INSERT INTO dms_notification_channels VALUES (1, TRUE), (2, FALSE), (3, FALSE);",
    )
    .await;

    let unit = SchemaUnit::builder(UnitName::new("dms_notification_channels"), "")
        .columns(["id", "is_enabled"])
        .seed(SeedRequirement::at_least(2).matching("is_enabled"))
        .build();

    let result = verify(&unit, &db).await.unwrap();
    assert_eq!(result.row_count, Some(1));
    assert!(!result.passed());
}

#[tokio::test]
async fn test_unit_without_seed_reports_rows_but_no_minimum() {
    let db = DuckDbBackend::in_memory().unwrap();
    run_script(&db, "CREATE TABLE dms_sites (id INTEGER); INSERT INTO dms_sites VALUES (1);").await;

    let unit = SchemaUnit::builder(UnitName::new("dms_sites"), "")
        .columns(["id"])
        .build();
    let result = verify(&unit, &db).await.unwrap();
    assert_eq!(result.row_count, Some(1));
    assert_eq!(result.required_minimum, None);
    assert!(result.seed_satisfied());
    assert_eq!(result.row_shortfall(), None);
    assert_eq!(result.to_string(), "ok");
}

#[tokio::test]
async fn test_migration_step_verifies_target_table() {
    let db = DuckDbBackend::in_memory().unwrap();
    db.execute("CREATE TABLE dms_customers (id INTEGER)").await.unwrap();

    let unit = SchemaUnit::builder(
        UnitName::new("dms_customers_vat_id"),
        "ALTER TABLE dms_customers ADD COLUMN vat_id VARCHAR",
    )
    .table(UnitName::new("dms_customers"))
    .columns(["vat_id"])
    .depends_on(UnitName::new("dms_customers"))
    .build();

    let before = verify(&unit, &db).await.unwrap();
    assert_eq!(before.table, UnitName::new("dms_customers"));
    assert_eq!(before.missing_columns, vec!["vat_id"]);

    db.execute("ALTER TABLE dms_customers ADD COLUMN vat_id VARCHAR")
        .await
        .unwrap();
    let after = verify(&unit, &db).await.unwrap();
    assert!(after.passed());
}

#[tokio::test]
async fn test_seed_filter_over_missing_column_reports_drift() {
    let db = DuckDbBackend::in_memory().unwrap();
    run_script(
        &db,
        "CREATE TABLE dms_notification_channels (
             id INTEGER, channel_code VARCHAR, channel_name VARCHAR
         );
         INSERT INTO dms_notification_channels VALUES (1, 'EMAIL', 'E-Mail'), (2, 'TEAMS', 'Teams');",
    )
    .await;

    let unit = SchemaUnit::builder(UnitName::new("dms_notification_channels"), "")
        .columns(["id", "channel_code", "channel_name", "is_enabled"])
        .seed(SeedRequirement::at_least(2).matching("is_enabled"))
        .build();

    let result = verify(&unit, &db).await.unwrap();
    assert!(result.exists);
    assert_eq!(result.missing_columns, vec!["is_enabled"]);
    assert_eq!(result.row_count, None);
    assert_eq!(result.required_minimum, Some(2));
    assert!(!result.passed());
    assert_eq!(result.to_string(), "missing columns: is_enabled");
}

#[tokio::test]
async fn test_missing_columns_without_filter_still_counts_rows() {
    let db = DuckDbBackend::in_memory().unwrap();
    run_script(
        &db,
        "CREATE TABLE dms_roles (id INTEGER);
         INSERT INTO dms_roles VALUES (1), (2);",
    )
    .await;

    let result = verify(&roles_unit(2), &db).await.unwrap();
    assert_eq!(result.row_count, Some(2));
    assert!(result.seed_satisfied());
    assert!(!result.passed());
}

/// A filter over a column the unit never declared is a configuration
/// mistake, surfaced as a query error.
#[tokio::test]
async fn test_undeclared_filter_column_is_an_error() {
    let db = DuckDbBackend::in_memory().unwrap();
    db.execute("CREATE TABLE dms_roles (id INTEGER, role_name VARCHAR, display_name VARCHAR)")
        .await
        .unwrap();

    let unit = SchemaUnit::builder(UnitName::new("dms_roles"), "")
        .seed(SeedRequirement::at_least(1).matching("no_such_column = 1"))
        .build();
    assert!(verify(&unit, &db).await.is_err());
}

#[tokio::test]
async fn test_verify_is_idempotent() {
    let db = DuckDbBackend::in_memory().unwrap();
    run_script(
        &db,
        "CREATE TABLE dms_roles (id INTEGER, role_name VARCHAR, display_name VARCHAR);
         INSERT INTO dms_roles VALUES (1, 'admin', 'Administrator'), (2, 'author', 'Author');",
    )
    .await;

    let unit = roles_unit(2);
    let first = verify(&unit, &db).await.unwrap();
    let second = verify(&unit, &db).await.unwrap();
    assert_eq!(first, second);
}
