//! Exporters for assembled table metadata.
//!
//! Both exporters consume a `&TableMetadata` and hold no pipeline state:
//! `gmeta` writes the JSON document, `store` records the normalized
//! snapshot in the metadata store.

pub mod gmeta;
pub mod store;

pub use gmeta::{write_gmeta, GmetaColumn, GmetaDocument, GmetaTable};
pub use store::{ColumnRow, MetadataStore, SnapshotInfo};
