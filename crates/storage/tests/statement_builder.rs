use rusqlite::Connection;
use std::path::{Path, PathBuf};
use tb_storage::{
    IdentifierPolicy, IsolationPolicy, SqlFailureKind, StatementBuilder, StoreConfig, StoreError,
    Table, TableOp,
};
use tempfile::TempDir;

fn scratch_db(dir: &TempDir) -> PathBuf {
    dir.path().join("builder.db")
}

fn builder_for(path: &Path) -> StatementBuilder {
    StatementBuilder::new(StoreConfig::new(path))
}

fn open_builder_for(path: &Path) -> StatementBuilder {
    StatementBuilder::new(
        StoreConfig::new(path).with_identifier_policy(IdentifierPolicy::AnySyntacticallyValid),
    )
}

fn table_columns(path: &Path, table: &str) -> Vec<(String, String)> {
    let conn = Connection::open(path).expect("db must open");
    let mut stmt = conn
        .prepare(&format!("PRAGMA table_info({table})"))
        .expect("pragma must prepare");
    let mut rows = stmt.query([]).expect("pragma must run");
    let mut out = Vec::new();
    while let Some(row) = rows.next().expect("row must read") {
        out.push((
            row.get::<_, String>(1).expect("name"),
            row.get::<_, String>(2).expect("type"),
        ));
    }
    out
}

#[test]
fn create_table_is_idempotent_and_adds_the_id_key() {
    let dir = TempDir::new().expect("temp dir");
    let path = scratch_db(&dir);
    let builder = builder_for(&path);

    builder
        .create_table("Tasks", &Table::Tasks.column_defs())
        .expect("first create should succeed");
    builder
        .create_table("Tasks", &Table::Tasks.column_defs())
        .expect("second create should be a no-op");

    let columns = table_columns(&path, "Tasks");
    let names = columns.iter().map(|(name, _)| name.as_str()).collect::<Vec<_>>();
    assert_eq!(
        names,
        vec![
            "Id",
            "Title",
            "Responsible",
            "Phone",
            "StartDate",
            "Lasting",
            "IsDone",
            "ProjectId"
        ]
    );
    assert_eq!(columns[0].1, "INTEGER");
    assert_eq!(columns[4].1, "INTEGER");
}

#[test]
fn insert_row_binds_values_in_order_and_returns_the_generated_id() {
    let dir = TempDir::new().expect("temp dir");
    let path = scratch_db(&dir);
    let builder = builder_for(&path);
    builder
        .create_table("Tasks", &Table::Tasks.column_defs())
        .expect("create");

    let columns = Table::Tasks.column_names();
    let first = builder
        .insert_row(
            "Tasks",
            &columns,
            &["Water room 1", "Maria", "45632", "1517000000000", "2", "0", "1"],
        )
        .expect("first insert");
    let second = builder
        .insert_row(
            "Tasks",
            &["Phone", "Title"],
            &["75632", "Water room 2"],
        )
        .expect("partial insert");
    assert_eq!((first, second), (1, 2));

    let conn = Connection::open(&path).expect("db must open");
    let row = conn
        .query_row(
            "SELECT Title, Responsible, Phone, StartDate, typeof(StartDate), IsDone, ProjectId FROM Tasks WHERE Id = 1",
            [],
            |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, i64>(3)?,
                    row.get::<_, String>(4)?,
                    row.get::<_, i64>(5)?,
                    row.get::<_, i64>(6)?,
                ))
            },
        )
        .expect("row 1");
    assert_eq!(
        row,
        (
            "Water room 1".to_string(),
            "Maria".to_string(),
            "45632".to_string(),
            1_517_000_000_000,
            "integer".to_string(),
            0,
            1
        )
    );

    let (title, phone) = conn
        .query_row("SELECT Title, Phone FROM Tasks WHERE Id = 2", [], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })
        .expect("row 2");
    assert_eq!(title, "Water room 2");
    assert_eq!(phone, "75632");
}

#[test]
fn insert_row_rejects_mismatched_lengths_before_touching_the_database() {
    let dir = TempDir::new().expect("temp dir");
    let path = scratch_db(&dir);

    let err = builder_for(&path)
        .insert_row("Projects", &["Title"], &["a", "b"])
        .expect_err("mismatch must fail");
    assert!(matches!(
        err,
        StoreError::ColumnValueMismatch {
            columns: 1,
            values: 2
        }
    ));
    assert_eq!(err.code(), "COLUMN_VALUE_MISMATCH");
    assert!(err.failure_kind().is_none());
    assert!(!path.exists(), "no connection should have been opened");

    let err = builder_for(&path)
        .insert_row::<&str, &str>("Projects", &[], &[])
        .expect_err("empty insert must fail");
    assert!(matches!(err, StoreError::InvalidInput(_)));
}

#[test]
fn identifiers_are_validated_before_interpolation() {
    let dir = TempDir::new().expect("temp dir");
    let path = scratch_db(&dir);
    let builder = open_builder_for(&path);

    let err = builder
        .drop_table("Projects; DROP TABLE Tasks")
        .expect_err("injected table name must be rejected");
    assert!(matches!(err, StoreError::InvalidIdentifier { .. }));

    let err = builder
        .insert_row("Projects", &["Title) VALUES ('x'); --"], &["y"])
        .expect_err("injected column name must be rejected");
    assert!(matches!(err, StoreError::InvalidIdentifier { .. }));

    let err = builder
        .create_table("Projects", &["Title TEXT); DROP TABLE Tasks; --"])
        .expect_err("injected column type must be rejected");
    assert!(matches!(err, StoreError::InvalidColumnDef { .. }));

    assert!(!path.exists(), "rejected statements must never reach SQLite");
}

#[test]
fn known_schema_policy_rejects_foreign_tables_and_columns() {
    let dir = TempDir::new().expect("temp dir");
    let path = scratch_db(&dir);
    let builder = builder_for(&path);

    let err = builder
        .create_table("Invoices", &["Amount INTEGER"])
        .expect_err("unknown table");
    assert!(matches!(
        err,
        StoreError::InvalidIdentifier { ref identifier, .. } if identifier == "Invoices"
    ));

    let err = builder
        .create_table("Projects", &["Budget INTEGER"])
        .expect_err("unknown column");
    assert!(matches!(
        err,
        StoreError::InvalidIdentifier { ref identifier, .. } if identifier == "Budget"
    ));

    open_builder_for(&path)
        .create_table("Invoices", &["Amount INTEGER"])
        .expect("open policy accepts any valid identifier");
    assert_eq!(table_columns(&path, "Invoices").len(), 2);
}

#[test]
fn create_table_rejects_bad_column_lists() {
    let dir = TempDir::new().expect("temp dir");
    let builder = builder_for(&scratch_db(&dir));

    let err = builder
        .create_table::<&str>("Projects", &[])
        .expect_err("empty column list");
    assert!(matches!(err, StoreError::InvalidInput(_)));

    let err = builder
        .create_table("Projects", &["Id INTEGER"])
        .expect_err("explicit Id column");
    assert!(matches!(err, StoreError::InvalidColumnDef { .. }));

    let err = builder
        .create_table("Projects", &["Title TEXT", "title TEXT"])
        .expect_err("duplicate column");
    assert!(matches!(err, StoreError::InvalidIdentifier { .. }));
}

#[test]
fn write_failures_surface_as_table_operation_errors() {
    let dir = TempDir::new().expect("temp dir");
    let path = scratch_db(&dir);

    let err = builder_for(&path)
        .insert_row("Tasks", &["Title"], &["orphan"])
        .expect_err("table does not exist yet");
    assert!(matches!(
        err,
        StoreError::TableOperation {
            op: TableOp::InsertRow,
            ref table,
            ..
        } if table == "Tasks"
    ));
    assert_eq!(err.code(), "TABLE_OPERATION");
    assert!(err.is_write_failure());
    assert_eq!(err.failure_kind(), Some(SqlFailureKind::Schema));
}

#[test]
fn failed_insert_is_rolled_back_and_classified_as_constraint() {
    let dir = TempDir::new().expect("temp dir");
    let path = scratch_db(&dir);
    let builder = open_builder_for(&path);
    builder
        .create_table("Ledger", &["Amount INTEGER NOT NULL", "Memo TEXT"])
        .expect("create");

    let err = builder
        .insert_row("Ledger", &["Memo"], &["no amount"])
        .expect_err("NOT NULL must be enforced");
    assert_eq!(err.failure_kind(), Some(SqlFailureKind::Constraint));

    builder
        .insert_row("Ledger", &["Amount", "Memo"], &["10", "ok"])
        .expect("valid insert");

    let conn = Connection::open(&path).expect("db must open");
    let count = conn
        .query_row("SELECT COUNT(*) FROM Ledger", [], |row| row.get::<_, i64>(0))
        .expect("count");
    assert_eq!(count, 1);
}

#[test]
fn drop_table_is_idempotent() {
    let dir = TempDir::new().expect("temp dir");
    let path = scratch_db(&dir);
    let builder = builder_for(&path);

    builder.drop_table("Projects").expect("dropping a missing table is fine");
    builder
        .create_table("Projects", &Table::Projects.column_defs())
        .expect("create");
    builder.drop_table("Projects").expect("drop");
    builder.drop_table("Projects").expect("drop again");

    assert!(table_columns(&path, "Projects").is_empty());
}

#[test]
fn serializable_policy_runs_the_same_statements() {
    let dir = TempDir::new().expect("temp dir");
    let path = scratch_db(&dir);
    let builder =
        StatementBuilder::new(StoreConfig::new(&path).with_isolation(IsolationPolicy::Serializable));
    assert_eq!(builder.config().isolation(), IsolationPolicy::Serializable);

    builder
        .create_table("Projects", &Table::Projects.column_defs())
        .expect("create");
    let id = builder
        .insert_row("Projects", &["Title"], &["Water the plants"])
        .expect("insert");
    assert_eq!(id, 1);

    let conn = Connection::open(&path).expect("db must open");
    let read_uncommitted = conn
        .query_row("PRAGMA read_uncommitted", [], |row| row.get::<_, i64>(0))
        .expect("pragma");
    assert_eq!(read_uncommitted, 0);
}
