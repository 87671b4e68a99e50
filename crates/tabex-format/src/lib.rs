//! Format encoding engine: sanitizers, encoders and the format registry.

pub mod descriptor;
pub mod encoders;
pub mod registry;
pub mod sanitize;

pub use descriptor::{FormatDescriptor, Report};
pub use encoders::{
    CsvEncoder, FormatEncoder, JsonEncoder, RecordsXmlEncoder, TableEncoder, TsvEncoder,
    WorkbookEncoder,
};
pub use registry::{FormatRegistry, builtin_formats};
