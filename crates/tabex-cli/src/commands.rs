use std::fs;
use std::io::{self, Write};
use std::path::Path;

use anyhow::{Context, Result};
use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{ContentArrangement, Table};
use tracing::{info, info_span, warn};

use tabex_export::{
    EntityType, ExportCatalog, ExportOptions, ExportRequest, Exporter, MemoryStore, ReportOptions,
};
use tabex_format::{FormatRegistry, Report};
use tabex_model::HeaderSpec;

use crate::cli::{ExportArgs, HeadersArg, RenderArgs};
use crate::config::ExportConfigFile;
use crate::source::{entity_name, load_table, read_rows};

pub fn run_formats() -> Result<()> {
    let registry = FormatRegistry::with_defaults();
    println!("{}", format_table(&registry));
    Ok(())
}

/// Registered formats as a table: id, name, description, content type.
pub fn format_table(registry: &FormatRegistry) -> Table {
    let mut table = Table::new();
    table.set_header(vec!["Format", "Name", "Description", "Content type"]);
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
    for descriptor in registry.iter() {
        table.add_row(vec![
            descriptor.id(),
            descriptor.name(),
            descriptor.long_name(),
            descriptor.content_type(),
        ]);
    }
    table
}

/// Render a CSV file as `args.format`.
pub fn run_render(args: &RenderArgs) -> Result<Report> {
    let name = entity_name(&args.input)?;
    let span = info_span!("render", input = %args.input.display(), format = %args.format);
    let _guard = span.enter();

    let rows = read_rows(&args.input)?;
    let width = rows.first().map_or(0, Vec::len);
    let columns: Vec<String> = (1..=width).map(|index| format!("column_{index}")).collect();
    let headers = if args.header.is_empty() {
        match args.headers {
            HeadersArg::FirstRow => HeaderSpec::FirstRow,
            HeadersArg::None => HeaderSpec::Suppressed,
            HeadersArg::Derive => HeaderSpec::Derive,
        }
    } else {
        HeaderSpec::Explicit(args.header.clone())
    };

    let registry = FormatRegistry::with_defaults();
    let entity = EntityType::new(name.as_str(), name.as_str(), columns);
    let mut catalog = ExportCatalog::new();
    catalog
        .declare(&entity, &ExportOptions::new(), &registry)
        .context("declare input")?;
    let store = MemoryStore::new();
    let exporter = Exporter::new(&registry, &catalog, &store);

    let report = exporter
        .build_report(
            &entity,
            &args.format,
            rows,
            &ReportOptions::new().headers(headers),
        )
        .with_context(|| format!("render {} as {}", args.input.display(), args.format))?;
    write_report(&report, args.output.as_deref())?;
    Ok(report)
}

/// Run a configured export over the CSV-backed table in `args.input`.
pub fn run_export(args: &ExportArgs) -> Result<Report> {
    let name = entity_name(&args.input)?;
    let span = info_span!("export", entity = %name, format = %args.format);
    let _guard = span.enter();

    let config = match &args.config {
        Some(path) => ExportConfigFile::load(path)?,
        None => ExportConfigFile::default(),
    };

    let registry = FormatRegistry::with_defaults();
    let table = config.define_scopes(load_table(&args.input)?);
    let store = MemoryStore::new().with_table(name.as_str(), table);
    let entity = store
        .entity_type(name.as_str(), &name)
        .with_context(|| format!("table {name} missing after load"))?;
    let mut catalog = ExportCatalog::new();
    catalog
        .declare(&entity, &config.options, &registry)
        .with_context(|| format!("declare {name}"))?;

    let request = export_request(args);
    let exporter = Exporter::new(&registry, &catalog, &store);
    let report = exporter
        .export(&entity, &args.format, &request)
        .with_context(|| format!("export {name} as {}", args.format))?;
    write_report(&report, args.output.as_deref())?;
    Ok(report)
}

fn export_request(args: &ExportArgs) -> ExportRequest {
    let mut request = ExportRequest::new();
    if !args.only.is_empty() {
        request = request.only(args.only.clone());
    }
    if !args.except.is_empty() {
        request = request.except(args.except.clone());
    }
    if !args.scope.is_empty() {
        request = request.scopes(args.scope.iter().cloned());
    }
    if let Some(order) = &args.order {
        request = request.order(order);
    }
    if let Some(limit) = args.limit {
        request = request.limit(limit);
    }
    if let Some(offset) = args.offset {
        request = request.offset(offset);
    }
    if args.no_headers {
        request = request.headers(HeaderSpec::Suppressed);
    }
    request
}

fn write_report(report: &Report, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            fs::write(path, &report.payload)
                .with_context(|| format!("write {}", path.display()))?;
            info!(
                path = %path.display(),
                bytes = report.payload.len(),
                content_type = %report.content_type,
                "payload written"
            );
        }
        None => {
            let mut stdout = io::stdout().lock();
            stdout
                .write_all(report.payload.as_bytes())
                .context("write stdout")?;
            stdout.flush().context("flush stdout")?;
            info!(content_type = %report.content_type, "payload written to stdout");
        }
    }
    if report.payload.is_empty() {
        warn!("empty payload");
    }
    Ok(())
}
