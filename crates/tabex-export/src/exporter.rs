//! Export orchestration: column resolution, retrieval, header policy and
//! dispatch to the format registry.

use tabex_format::{FormatDescriptor, FormatRegistry, Report};
use tabex_model::{Dataset, ExportError, Result, Row};
use tracing::{debug, info_span};

use crate::catalog::ExportCatalog;
use crate::config::{ExportConfig, resolve_columns};
use crate::dispatch::Operation;
use crate::entity::EntityType;
use crate::options::{ExportRequest, ReportOptions};
use crate::record::{ExportRecord, RecordStore};

/// Runs exports for the entity types in a catalog.
///
/// Borrows everything it needs; build one per call site or keep one around.
pub struct Exporter<'a, S: RecordStore> {
    registry: &'a FormatRegistry,
    catalog: &'a ExportCatalog,
    store: &'a S,
}

impl<'a, S: RecordStore> Exporter<'a, S> {
    pub fn new(registry: &'a FormatRegistry, catalog: &'a ExportCatalog, store: &'a S) -> Self {
        Self {
            registry,
            catalog,
            store,
        }
    }

    /// Whether `entity` is exportable at all, or in `format` when given.
    pub fn is_exportable(&self, entity: &EntityType, format: Option<&str>) -> bool {
        match (self.catalog.config_for(entity), format) {
            (None, _) => false,
            (Some(_), None) => true,
            (Some(config), Some(format)) => config.allows(format),
        }
    }

    /// Check that `format` is registered and enabled for `entity`.
    pub fn validate_format(&self, entity: &EntityType, format: &str) -> Result<&'a FormatDescriptor> {
        let descriptor = self.registry.require(format)?;
        if !self.config(entity)?.allows(format) {
            return Err(ExportError::FormatNotAllowed {
                format: format.to_string(),
                entity: entity.name().to_string(),
            });
        }
        Ok(descriptor)
    }

    /// Check the row/header length invariant, returning the row width.
    pub fn validate_shape(&self, dataset: &Dataset) -> Result<usize> {
        dataset.validate_shape()
    }

    /// Retrieve and project records. The dataset's headers are the raw
    /// column identifiers.
    pub fn fetch_rows(&self, entity: &EntityType, request: &ExportRequest) -> Result<Dataset> {
        let config = self.config(entity)?;
        let columns = resolve_columns(
            config.columns(),
            request.only.as_ref(),
            request.except.as_ref(),
        );
        if columns.is_empty() {
            return Err(ExportError::NoColumnsSpecified {
                entity: entity.name().to_string(),
            });
        }

        let query = request.apply_to(config.query());
        let records = self.store.fetch(entity, &query)?;
        debug!(
            entity = entity.name(),
            records = records.len(),
            columns = columns.len(),
            "records fetched"
        );
        let rows: Vec<Row> = records
            .iter()
            .map(|record| record.export_row(&columns))
            .collect();
        Ok(Dataset::with_headers(columns, rows))
    }

    /// Fetch the entity's records and encode them as `format`.
    pub fn export(
        &self,
        entity: &EntityType,
        format: &str,
        request: &ExportRequest,
    ) -> Result<Report> {
        let _span = info_span!("export", entity = entity.name(), format).entered();
        let descriptor = self.validate_format(entity, format)?;
        let config = self.config(entity)?;

        let Dataset { headers, mut rows } = self.fetch_rows(entity, request)?;
        let columns = headers.unwrap_or_default();
        let derived = derived_headers(config, &columns, request.overrides_columns());
        let headers = request.headers.resolve(derived, &mut rows)?;
        if headers.is_none() && rows.is_empty() {
            // Fetched rows always span the resolved columns, so an empty
            // headerless result has a known width.
            debug!(columns = columns.len(), "no records to export");
            return descriptor.generate(&rows, None);
        }
        self.registry.generate(format, &Dataset::new(headers, rows))
    }

    /// Encode caller-supplied rows as `format` for `entity`.
    pub fn build_report(
        &self,
        entity: &EntityType,
        format: &str,
        mut rows: Vec<Row>,
        options: &ReportOptions,
    ) -> Result<Report> {
        let _span = info_span!("report", entity = entity.name(), format).entered();
        self.validate_format(entity, format)?;
        let config = self.config(entity)?;

        let columns = options.columns.as_deref().unwrap_or(config.columns());
        let derived = derived_headers(config, columns, options.columns.is_some());
        let headers = options.headers.resolve(derived, &mut rows)?;
        self.registry.generate(format, &Dataset::new(headers, rows))
    }

    /// Resolve a `create_<format>_report` / `to_<format>_export` name.
    pub fn resolve_method(&self, entity: &EntityType, name: &str) -> Result<Operation> {
        let config = self.config(entity)?;
        Operation::parse(name)
            .filter(|operation| config.allows(operation.format()))
            .ok_or_else(|| unsupported_operation(entity, name))
    }

    /// Run a `to_<format>_export` operation by name.
    pub fn export_via(
        &self,
        entity: &EntityType,
        name: &str,
        request: &ExportRequest,
    ) -> Result<Report> {
        match self.resolve_method(entity, name)? {
            Operation::ToExport(format) => self.export(entity, &format, request),
            Operation::CreateReport(_) => Err(unsupported_operation(entity, name)),
        }
    }

    /// Run a `create_<format>_report` operation by name.
    pub fn report_via(
        &self,
        entity: &EntityType,
        name: &str,
        rows: Vec<Row>,
        options: &ReportOptions,
    ) -> Result<Report> {
        match self.resolve_method(entity, name)? {
            Operation::CreateReport(format) => self.build_report(entity, &format, rows, options),
            Operation::ToExport(_) => Err(unsupported_operation(entity, name)),
        }
    }

    fn config(&self, entity: &EntityType) -> Result<&'a ExportConfig> {
        self.catalog
            .config_for(entity)
            .ok_or_else(|| ExportError::EntityNotExportable {
                entity: entity.name().to_string(),
            })
    }
}

/// Header source for derived headers: the configured default headers
/// when the columns are the configured defaults, else the columns.
fn derived_headers<'c>(
    config: &'c ExportConfig,
    columns: &'c [String],
    columns_overridden: bool,
) -> &'c [String] {
    match config.headers() {
        Some(headers) if !columns_overridden => headers,
        _ => columns,
    }
}

fn unsupported_operation(entity: &EntityType, name: &str) -> ExportError {
    ExportError::UnsupportedOperation {
        method: name.to_string(),
        entity: entity.name().to_string(),
    }
}
