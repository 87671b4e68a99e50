//! Format registry: the formats an application can export to.

use tabex_model::{Dataset, ExportError, Result};
use tracing::debug;

use crate::descriptor::{FormatDescriptor, Report};
use crate::encoders::{
    CsvEncoder, JsonEncoder, RecordsXmlEncoder, TableEncoder, TsvEncoder, WorkbookEncoder,
};

pub const CSV: &str = "csv";
pub const TSV: &str = "tsv";
pub const XLS: &str = "xls";
pub const XLSML: &str = "xlsml";
pub const HTML: &str = "html";
pub const XML: &str = "xml";
pub const JSON: &str = "json";

/// The formats shipped with the library, in registration order.
pub fn builtin_formats() -> Vec<FormatDescriptor> {
    vec![
        FormatDescriptor::new(CSV, "CSV", "text/csv; charset=utf-8", CsvEncoder)
            .with_long_name("Comma-separated (CSV)"),
        FormatDescriptor::new(
            TSV,
            "TSV",
            "text/tab-separated-values; charset=utf-8",
            TsvEncoder,
        )
        .with_long_name("Tab-separated (TSV)"),
        FormatDescriptor::new(
            XLS,
            "Excel",
            "application/vnd.ms-excel; charset=utf-8",
            TableEncoder,
        )
        .with_long_name("Microsoft Excel"),
        FormatDescriptor::new(
            XLSML,
            "Excel XML",
            "application/vnd.ms-excel; charset=utf-8",
            WorkbookEncoder::default(),
        )
        .with_long_name("Microsoft Excel 2003 XML workbook"),
        FormatDescriptor::new(HTML, "HTML", "text/html; charset=utf-8", TableEncoder),
        FormatDescriptor::new(XML, "XML", "application/xml", RecordsXmlEncoder),
        FormatDescriptor::new(JSON, "JSON", "application/json; charset=utf-8", JsonEncoder)
            .with_long_name("JavaScript Object Notation (JSON)")
            .without_header_token(),
    ]
}

/// Registered formats, keyed by identifier.
///
/// Built once at startup and shared by reference afterwards.
#[derive(Debug, Clone, Default)]
pub struct FormatRegistry {
    formats: Vec<FormatDescriptor>,
}

impl FormatRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding [`builtin_formats`].
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        for descriptor in builtin_formats() {
            registry.register(descriptor);
        }
        registry
    }

    /// Register a format. The first descriptor for an identifier wins;
    /// returns `false` when the identifier was already taken.
    pub fn register(&mut self, descriptor: FormatDescriptor) -> bool {
        if self.contains(descriptor.id()) {
            debug!(format = descriptor.id(), "format already registered");
            return false;
        }
        self.formats.push(descriptor);
        true
    }

    pub fn get(&self, id: &str) -> Option<&FormatDescriptor> {
        self.formats.iter().find(|descriptor| descriptor.id() == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    /// Look up a format, failing with `UnsupportedFormat`.
    pub fn require(&self, id: &str) -> Result<&FormatDescriptor> {
        self.get(id)
            .ok_or_else(|| ExportError::unsupported_format(id))
    }

    /// Identifiers in registration order.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.formats.iter().map(FormatDescriptor::id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &FormatDescriptor> {
        self.formats.iter()
    }

    pub fn len(&self) -> usize {
        self.formats.len()
    }

    pub fn is_empty(&self) -> bool {
        self.formats.is_empty()
    }

    /// `(display name, identifier)` pairs sorted by display name.
    pub fn format_list(&self) -> Vec<(String, String)> {
        let mut list: Vec<(String, String)> = self
            .formats
            .iter()
            .map(|descriptor| (descriptor.name().to_string(), descriptor.id().to_string()))
            .collect();
        list.sort();
        list
    }

    /// Validate the dataset shape and encode it.
    pub fn generate(&self, id: &str, dataset: &Dataset) -> Result<Report> {
        let descriptor = self.require(id)?;
        dataset.validate_shape()?;
        descriptor.generate(&dataset.rows, dataset.headers())
    }
}
