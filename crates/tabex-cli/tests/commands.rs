//! Integration tests for the CLI commands.

use std::fs;
use std::path::{Path, PathBuf};

use tabex_cli::cli::{ExportArgs, HeadersArg, RenderArgs};
use tabex_cli::commands::{format_table, run_export, run_render};
use tabex_format::FormatRegistry;
use tabex_model::ExportError;
use tempfile::TempDir;

fn write_file(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, contents).unwrap();
    path
}

fn render_args(input: PathBuf, format: &str, output: PathBuf) -> RenderArgs {
    RenderArgs {
        input,
        format: format.to_string(),
        headers: HeadersArg::FirstRow,
        header: Vec::new(),
        output: Some(output),
    }
}

fn export_args(input: PathBuf, format: &str, output: PathBuf) -> ExportArgs {
    ExportArgs {
        input,
        format: format.to_string(),
        config: None,
        only: Vec::new(),
        except: Vec::new(),
        scope: Vec::new(),
        order: None,
        limit: None,
        offset: None,
        no_headers: false,
        output: Some(output),
    }
}

const USERS: &str = "id,first_name,is_admin\n1,user_1,false\n2,user_2,false\n";

#[test]
fn format_table_lists_every_format() {
    let registry = FormatRegistry::with_defaults();
    let rendered = format_table(&registry).to_string();
    for id in registry.ids() {
        assert!(rendered.contains(id), "{id} missing");
    }
    assert!(rendered.contains("text/csv; charset=utf-8"));
}

#[test]
fn render_first_row_headers_as_html() {
    let dir = TempDir::new().unwrap();
    let input = write_file(dir.path(), "titles.csv", "Title,Another Title\ndata,lovely data\n");
    let output = dir.path().join("titles.html");

    let report = run_render(&render_args(input, "html", output.clone())).unwrap();
    let written = fs::read_to_string(&output).unwrap();
    assert_eq!(written, report.payload);
    assert!(written.contains("\t\t<th>Another Title</th>\n"));
    assert!(written.contains("\t\t<td>lovely data</td>\n"));
    assert_eq!(report.content_type, "text/html; charset=utf-8; header=present");
}

#[test]
fn render_keeps_empty_fields_quoted() {
    let dir = TempDir::new().unwrap();
    let input = write_file(
        dir.path(),
        "titles.csv",
        "Title,Another Title\ndata,lovely data\n\"\",more lovely data\n",
    );
    let output = dir.path().join("out.csv");
    let report = run_render(&render_args(input, "csv", output)).unwrap();
    assert_eq!(
        report.payload,
        "Title,Another Title\ndata,lovely data\n\"\",more lovely data\n"
    );
}

#[test]
fn render_with_explicit_headers() {
    let dir = TempDir::new().unwrap();
    let input = write_file(dir.path(), "pairs.csv", "a,b\nc,d\n");
    let mut args = render_args(input, "tsv", dir.path().join("pairs.tsv"));
    args.header = vec!["left".to_string(), "right".to_string()];
    let report = run_render(&args).unwrap();
    assert_eq!(report.payload, "Left\tRight\na\tb\nc\td\n");
}

#[test]
fn render_rejects_ragged_input() {
    let dir = TempDir::new().unwrap();
    let input = write_file(dir.path(), "ragged.csv", "Title,Another Title\ndata,x\nonly one\n");
    let error = run_render(&render_args(input, "xml", dir.path().join("out.xml"))).unwrap_err();
    assert_eq!(
        error.downcast_ref::<ExportError>(),
        Some(&ExportError::RowLengthMismatch {
            row: 1,
            expected: 2,
            found: 1
        })
    );
}

#[test]
fn render_rejects_unknown_formats() {
    let dir = TempDir::new().unwrap();
    let input = write_file(dir.path(), "users.csv", USERS);
    let error = run_render(&render_args(input, "pdf", dir.path().join("out"))).unwrap_err();
    assert!(matches!(
        error.downcast_ref::<ExportError>(),
        Some(ExportError::UnsupportedFormat { .. })
    ));
}

#[test]
fn export_with_filters() {
    let dir = TempDir::new().unwrap();
    let input = write_file(dir.path(), "users.csv", USERS);
    let mut args = export_args(input, "csv", dir.path().join("users.out.csv"));
    args.only = vec!["first_name".to_string(), "is_admin".to_string()];
    args.order = Some("id DESC".to_string());
    args.limit = Some(1);

    let report = run_export(&args).unwrap();
    assert_eq!(report.payload, "First Name,Is Admin\nuser_2,false\n");
}

#[test]
fn export_with_config_file() {
    let dir = TempDir::new().unwrap();
    let input = write_file(dir.path(), "users.csv", USERS);
    let config = write_file(
        dir.path(),
        "users.json",
        r#"{"except": ["id"], "as": ["json", "xml"], "conditions": {"first_name": "user_1"}}"#,
    );
    let mut args = export_args(input.clone(), "json", dir.path().join("users.json.out"));
    args.config = Some(config.clone());
    let report = run_export(&args).unwrap();
    assert_eq!(
        report.payload,
        r#"[{"first_name":"user_1","is_admin":"false"}]"#
    );

    let mut args = export_args(input, "csv", dir.path().join("users.csv.out"));
    args.config = Some(config);
    let error = run_export(&args).unwrap_err();
    assert!(matches!(
        error.downcast_ref::<ExportError>(),
        Some(ExportError::FormatNotAllowed { .. })
    ));
}

#[test]
fn export_with_defined_scopes() {
    let dir = TempDir::new().unwrap();
    let input = write_file(
        dir.path(),
        "users.csv",
        "id,first_name,is_admin\n1,user_1,true\n2,user_2,false\n3,user_3,true\n",
    );
    let config = write_file(
        dir.path(),
        "users.json",
        r#"{
            "only": ["first_name"],
            "scope_definitions": {
                "admins": {"conditions": {"is_admin": "true"}},
                "newest": {"order": "id DESC", "limit": 1}
            }
        }"#,
    );

    let mut args = export_args(input.clone(), "csv", dir.path().join("admins.csv"));
    args.config = Some(config.clone());
    args.scope = vec!["admins".to_string()];
    assert_eq!(run_export(&args).unwrap().payload, "First Name\nuser_1\nuser_3\n");

    args.scope = vec!["admins".to_string(), "newest".to_string()];
    assert_eq!(run_export(&args).unwrap().payload, "First Name\nuser_3\n");

    let mut args = export_args(input, "csv", dir.path().join("missing.csv"));
    args.config = Some(config);
    args.scope = vec!["owners".to_string()];
    assert!(matches!(
        run_export(&args).unwrap_err().downcast_ref::<ExportError>(),
        Some(ExportError::Store(_))
    ));
}

#[test]
fn export_without_headers_as_xml() {
    let dir = TempDir::new().unwrap();
    let input = write_file(dir.path(), "users.csv", USERS);
    let mut args = export_args(input, "xml", dir.path().join("users.xml"));
    args.only = vec!["first_name".to_string()];
    args.no_headers = true;

    let report = run_export(&args).unwrap();
    assert_eq!(report.payload.matches("<attribute_0>").count(), 2);
    assert_eq!(report.content_type, "application/xml; header=absent");
}

#[test]
fn export_of_an_empty_file_fails() {
    let dir = TempDir::new().unwrap();
    let input = write_file(dir.path(), "empty.csv", "");
    assert!(run_export(&export_args(input, "csv", dir.path().join("out"))).is_err());
}
