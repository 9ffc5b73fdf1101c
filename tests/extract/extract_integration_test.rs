//! End-to-end extraction tests over in-memory and SQLite readers.

use metaprofile::config::ExtractionConfig;
use metaprofile::error::ExtractError;
use metaprofile::export::gmeta::GmetaDocument;
use metaprofile::export::store::MetadataStore;
use metaprofile::extract::{extract_table, run};
use metaprofile::model::{ColumnStats, SemanticType};
use metaprofile::reader::{MemoryReader, SqliteReader};

fn mixed_reader() -> MemoryReader {
    MemoryReader::new("orders")
        .with_str_column(
            "status",
            vec![Some("open"), Some("closed"), Some("open"), Some("open")],
        )
        .with_str_column(
            "amount",
            vec![Some("10.5"), Some("20"), None, Some("30.25")],
        )
        .with_str_column(
            "created",
            vec![
                Some("2023-01-01"),
                Some("2023-02-15"),
                Some("2023-03-30"),
                Some("2023-04-01"),
            ],
        )
        .with_str_column(
            "notes",
            vec![Some("first order"), Some("rush"), Some("gift wrap please"), None],
        )
}

fn mixed_config() -> ExtractionConfig {
    ExtractionConfig::new("public", "orders").with_categorical_threshold(2)
}

#[test]
fn test_mixed_table_extraction() {
    let metadata = extract_table(&mixed_reader(), &mixed_config()).unwrap();

    assert_eq!(metadata.schema_name, "public");
    assert_eq!(metadata.row_count, 4);
    assert_eq!(metadata.column_count, 4);

    let types: Vec<SemanticType> = metadata
        .columns
        .iter()
        .map(|c| c.semantic_type())
        .collect();
    assert_eq!(
        types,
        vec![
            SemanticType::Code,
            SemanticType::Numeric,
            SemanticType::Date,
            SemanticType::Text,
        ]
    );

    match &metadata.columns[0].stats {
        ColumnStats::Code(stats) => {
            let total: u64 = stats.values.iter().map(|cf| cf.frequency).sum();
            assert_eq!(total, metadata.row_count - metadata.columns[0].null_count);
        }
        other => panic!("expected code stats, got {other:?}"),
    }

    match &metadata.columns[2].stats {
        ColumnStats::Date(stats) => assert_eq!(stats.format, "%Y-%m-%d"),
        other => panic!("expected date stats, got {other:?}"),
    }
}

#[test]
fn test_forced_override_failure_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let gmeta_path = dir.path().join("orders.gmeta.json");
    let config = mixed_config()
        .with_override("notes", SemanticType::Numeric)
        .with_gmeta_output(&gmeta_path);
    let mut store = MetadataStore::open_in_memory("tester").unwrap();

    let err = run(&mixed_reader(), &config, Some(&mut store)).unwrap_err();
    assert!(matches!(err, ExtractError::TypeInference(_)));

    assert!(!gmeta_path.exists());
    assert!(store.snapshots("public", "orders").unwrap().is_empty());
}

#[test]
fn test_run_exports_store_and_gmeta() {
    let dir = tempfile::tempdir().unwrap();
    let gmeta_path = dir.path().join("orders.gmeta.json");
    let config = mixed_config().with_gmeta_output(&gmeta_path);
    let mut store = MetadataStore::open_in_memory("tester").unwrap();

    let output = run(&mixed_reader(), &config, Some(&mut store)).unwrap();

    let data_table_id = output.data_table_id.unwrap();
    let columns = store.columns(data_table_id).unwrap();
    assert_eq!(columns.len(), 4);

    let content = std::fs::read_to_string(&gmeta_path).unwrap();
    let document: GmetaDocument = serde_json::from_str(&content).unwrap();
    assert_eq!(document.table.row_count, 4);
    assert_eq!(document.columns.len(), 4);
}

#[test]
fn test_empty_table_is_an_assembly_error() {
    let reader = MemoryReader::new("empty").with_str_column("col", vec![]);
    let config = ExtractionConfig::new("public", "empty");

    let err = extract_table(&reader, &config).unwrap_err();
    assert!(matches!(err, ExtractError::Assembly(_)));
}

#[test]
fn test_extraction_from_sqlite() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("source.db");
    {
        let conn = rusqlite::Connection::open(&db_path).unwrap();
        conn.execute_batch(
            "
            CREATE TABLE measurements (
                sensor TEXT,
                reading REAL,
                taken_on TEXT
            );
            INSERT INTO measurements VALUES ('a', 1.5, '2023-01-01');
            INSERT INTO measurements VALUES ('b', 2.5, '2023-01-02');
            INSERT INTO measurements VALUES ('a', 3.5, '2023-01-03');
            INSERT INTO measurements VALUES ('b', NULL, '2023-01-04');
            ",
        )
        .unwrap();
    }

    let reader = SqliteReader::open(&db_path, "main", "measurements").unwrap();
    let config = ExtractionConfig::new("main", "measurements").with_categorical_threshold(2);

    let metadata = extract_table(&reader, &config).unwrap();
    assert_eq!(metadata.row_count, 4);
    assert_eq!(metadata.columns[0].semantic_type(), SemanticType::Code);
    assert_eq!(metadata.columns[1].semantic_type(), SemanticType::Numeric);
    assert_eq!(metadata.columns[1].null_count, 1);
    assert_eq!(metadata.columns[2].semantic_type(), SemanticType::Date);
    assert_eq!(metadata.columns[1].declared_type.as_deref(), Some("REAL"));
}
