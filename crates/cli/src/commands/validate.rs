use std::path::{Path, PathBuf};
use std::process;

use flowsmith_core::{TypeResolver, ValidationReport};
use jsonschema::Validator;

use super::{print_report, read_definition};
use crate::error::CliError;
use crate::{report_error, Context, OutputFormat};

static DEFINITION_SCHEMA_STR: &str =
    include_str!("../../../../schema/workflow-definition.schema.json");

/// Result of checking one file.
struct FileCheck {
    report: ValidationReport,
    /// `None` when the schema check was not requested.
    schema_errors: Option<Vec<String>>,
}

impl FileCheck {
    fn is_ok(&self) -> bool {
        self.report.is_ok() && self.schema_errors.as_ref().is_none_or(|e| e.is_empty())
    }

    fn to_json_value(&self) -> serde_json::Value {
        let mut value = self.report.to_json_value();
        if let Some(errors) = &self.schema_errors {
            value["valid"] = serde_json::Value::Bool(self.is_ok());
            value["schema_errors"] = serde_json::json!(errors);
        }
        value
    }
}

pub(crate) fn cmd_validate(files: &[PathBuf], schema: bool, ctx: &Context) {
    let validator = if schema {
        match compile_schema() {
            Ok(v) => Some(v),
            Err(msg) => {
                report_error(&msg, ctx.output, ctx.quiet);
                process::exit(1);
            }
        }
    } else {
        None
    };
    let resolver = ctx.config.resolver();

    let mut checks = Vec::new();
    let mut failed = false;
    for path in files {
        match check_file(path, validator.as_ref(), resolver.as_ref()) {
            Ok(check) => {
                failed |= !check.is_ok();
                checks.push(check);
            }
            Err(e) => {
                failed = true;
                report_error(&e.to_string(), ctx.output, ctx.quiet);
            }
        }
    }

    match ctx.output {
        OutputFormat::Text => {
            if !ctx.quiet {
                for check in &checks {
                    print_text(check);
                }
            }
        }
        OutputFormat::Json => {
            let json: Vec<_> = checks.iter().map(FileCheck::to_json_value).collect();
            println!(
                "{}",
                serde_json::to_string_pretty(&json).unwrap_or_default()
            );
        }
    }

    if failed {
        process::exit(1);
    }
}

fn compile_schema() -> Result<Validator, String> {
    let schema: serde_json::Value = serde_json::from_str(DEFINITION_SCHEMA_STR)
        .map_err(|e| format!("internal error: failed to parse embedded schema: {}", e))?;
    jsonschema::validator_for(&schema)
        .map_err(|e| format!("internal error: failed to compile schema: {}", e))
}

fn check_file(
    path: &Path,
    validator: Option<&Validator>,
    resolver: &dyn TypeResolver,
) -> Result<FileCheck, CliError> {
    let definition = read_definition(path)?;
    let source = path.display().to_string();

    let schema_errors = validator.map(|v| {
        v.iter_errors(&definition)
            .map(|e| format!("{}", e))
            .collect::<Vec<_>>()
    });
    let report = flowsmith_core::validate(&definition, &source, resolver)?;

    Ok(FileCheck {
        report,
        schema_errors,
    })
}

fn print_text(check: &FileCheck) {
    if check.is_ok() {
        println!("{}: valid", check.report.source);
        return;
    }
    if !check.report.is_ok() {
        print_report(&check.report);
    }
    if let Some(errors) = check.schema_errors.as_ref().filter(|e| !e.is_empty()) {
        eprintln!("{}: {} schema error(s)", check.report.source, errors.len());
        for err in errors {
            eprintln!("  - {}", err);
        }
    }
}
