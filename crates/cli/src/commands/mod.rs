mod create;
mod generate;
mod validate;

pub(crate) use create::cmd_create;
pub(crate) use generate::cmd_generate;
pub(crate) use validate::cmd_validate;

use std::path::Path;
use std::sync::LazyLock;

use flowsmith_core::ValidationReport;
use regex::Regex;
use serde_json::Value;

use crate::error::CliError;

static WORKFLOW_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z][a-zA-Z0-9]+$").expect("valid regex"));

/// Workflow folder and class names.
pub(crate) fn check_workflow_name(name: &str) -> Result<(), CliError> {
    if WORKFLOW_NAME.is_match(name) {
        Ok(())
    } else {
        Err(CliError::InvalidName(name.to_owned()))
    }
}

/// Read a definition file and decode it, keeping key order.
pub(crate) fn read_definition(path: &Path) -> Result<Value, CliError> {
    let text = std::fs::read_to_string(path).map_err(|e| CliError::read(path, e))?;
    serde_json::from_str(&text).map_err(|source| CliError::NotJson {
        path: path.to_path_buf(),
        source,
    })
}

/// Write `content`, creating parent folders as needed.
pub(crate) fn write_file(path: &Path, content: &str) -> Result<(), CliError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| CliError::write(parent, e))?;
    }
    std::fs::write(path, content).map_err(|e| CliError::write(path, e))?;
    tracing::info!(path = %path.display(), "wrote file");
    Ok(())
}

/// Text rendering of one report's diagnostics, to stderr.
pub(crate) fn print_report(report: &ValidationReport) {
    eprintln!("{}: {} diagnostic(s)", report.source, report.len());
    for diagnostic in &report.diagnostics {
        eprintln!("  - {}", diagnostic);
    }
}
