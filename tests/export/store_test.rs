//! Integration tests for the metadata store.

use chrono::Utc;
use metaprofile::config::StoreConfig;
use metaprofile::export::store::MetadataStore;
use metaprofile::model::{
    CategoricalStats, CodeFrequency, ColumnMetadata, ColumnStats, NumericStats, Quartiles,
    TableMetadata, TextStats,
};

fn sample_metadata() -> TableMetadata {
    TableMetadata {
        schema_name: "public".to_string(),
        table_name: "orders".to_string(),
        row_count: 6,
        column_count: 3,
        table_size_bytes: Some(8192),
        extracted_at: Utc::now(),
        columns: vec![
            ColumnMetadata {
                name: "status".to_string(),
                declared_type: Some("TEXT".to_string()),
                override_applied: false,
                null_count: 1,
                distinct_count: 2,
                stats: ColumnStats::Code(CategoricalStats {
                    values: vec![
                        CodeFrequency {
                            value: "closed".to_string(),
                            frequency: 2,
                        },
                        CodeFrequency {
                            value: "open".to_string(),
                            frequency: 3,
                        },
                    ],
                    value_count: 2,
                }),
            },
            ColumnMetadata {
                name: "amount".to_string(),
                declared_type: Some("REAL".to_string()),
                override_applied: false,
                null_count: 0,
                distinct_count: 6,
                stats: ColumnStats::Numeric(NumericStats {
                    min: Some(1.0),
                    max: Some(9.0),
                    mean: Some(5.0),
                    stddev: Some(2.5),
                    quartiles: Some(Quartiles {
                        q1: 3.0,
                        median: 5.0,
                        q3: 7.0,
                    }),
                }),
            },
            ColumnMetadata {
                name: "notes".to_string(),
                declared_type: None,
                override_applied: true,
                null_count: 2,
                distinct_count: 4,
                stats: ColumnStats::Text(TextStats {
                    min_length: Some(2),
                    max_length: Some(40),
                    median_length: Some(12.0),
                }),
            },
        ],
    }
}

#[test]
fn test_snapshot_rows_are_normalized() {
    let mut store = MetadataStore::open_in_memory("tester").unwrap();
    let metadata = sample_metadata();

    let data_table_id = store.record_snapshot(&metadata).unwrap();

    let snapshot = store.latest_snapshot("public", "orders").unwrap();
    assert_eq!(snapshot.data_table_id, data_table_id);
    assert_eq!(snapshot.number_rows, 6);
    assert_eq!(snapshot.number_columns, 3);
    assert_eq!(snapshot.updated_by, "tester");

    let columns = store.columns(data_table_id).unwrap();
    assert_eq!(columns.len(), 3);
    assert_eq!(columns[0].column_name, "status");
    assert_eq!(columns[0].semantic_type, "code");
    assert_eq!(columns[1].column_name, "amount");
    assert_eq!(columns[1].semantic_type, "numeric");
    assert_eq!(columns[1].ordinal, 1);
    assert!(columns[2].override_applied);
    assert_eq!(columns[2].null_count, 2);

    let frequencies = store.code_frequencies(columns[0].column_id).unwrap();
    assert_eq!(
        frequencies,
        vec![("closed".to_string(), 2), ("open".to_string(), 3)]
    );
}

#[test]
fn test_replaying_a_snapshot_is_idempotent() {
    let mut store = MetadataStore::open_in_memory("tester").unwrap();
    let metadata = sample_metadata();

    let first = store.record_snapshot(&metadata).unwrap();
    let second = store.record_snapshot(&metadata).unwrap();

    let snapshots = store.snapshots("public", "orders").unwrap();
    assert_eq!(snapshots.len(), 1);
    assert_eq!(snapshots[0].data_table_id, second);
    assert_ne!(first, second);

    let columns = store.columns(second).unwrap();
    assert_eq!(columns.len(), 3);
    // rows of the replaced snapshot are gone
    assert!(store.columns(first).unwrap().is_empty());
}

#[test]
fn test_new_extraction_creates_a_new_snapshot() {
    let mut store = MetadataStore::open_in_memory("tester").unwrap();
    let mut metadata = sample_metadata();

    store.record_snapshot(&metadata).unwrap();
    metadata.extracted_at = metadata.extracted_at + chrono::Duration::seconds(60);
    store.record_snapshot(&metadata).unwrap();

    let snapshots = store.snapshots("public", "orders").unwrap();
    assert_eq!(snapshots.len(), 2);
}

#[test]
fn test_store_persists_to_disk() {
    let dir = tempfile::tempdir().unwrap();
    let config = StoreConfig::new(dir.path().join("meta.db"), "etl_service");
    let metadata = sample_metadata();

    {
        let mut store = MetadataStore::open(&config).unwrap();
        store.record_snapshot(&metadata).unwrap();
    }

    let store = MetadataStore::open(&config).unwrap();
    let snapshot = store.latest_snapshot("public", "orders").unwrap();
    assert_eq!(snapshot.updated_by, "etl_service");
}

#[test]
fn test_missing_snapshot_is_an_error() {
    let store = MetadataStore::open_in_memory("tester").unwrap();
    assert!(store.latest_snapshot("public", "nothing").is_err());
}
