//! Export orchestration for entity types backed by a record store.
//!
//! An entity type opts in through [`ExportCatalog::declare`]; the
//! [`Exporter`] then resolves columns, fetches records through a
//! [`RecordStore`] and hands the dataset to the format registry.

pub mod catalog;
pub mod config;
pub mod dispatch;
pub mod entity;
pub mod exporter;
pub mod memory;
pub mod options;
pub mod query;
pub mod record;

pub use catalog::ExportCatalog;
pub use config::{ExportConfig, resolve_columns};
pub use dispatch::Operation;
pub use entity::EntityType;
pub use exporter::Exporter;
pub use memory::{MemoryRecord, MemoryStore, MemoryTable, Method};
pub use options::{ExportOptions, ExportRequest, NameList, ReportOptions};
pub use query::{Direction, OrderBy, Query};
pub use record::{EXPORT_OVERRIDE_SUFFIX, ExportRecord, RecordStore};
