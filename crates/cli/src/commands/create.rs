use std::path::PathBuf;
use std::process;
use std::sync::LazyLock;

use flowsmith_codegen::stub::{self, DEFINITION_NAME, DEFINITION_NAMESPACE, DEFINITION_START_STATE};
use flowsmith_codegen::StubKind;
use regex::Regex;

use super::{check_workflow_name, write_file};
use crate::error::CliError;
use crate::layout::{Layout, CODE_DIR, GENERATED_DIR};
use crate::{report_error, Context, OutputFormat};

static START_STATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9]+$").expect("valid regex"));

pub(crate) fn cmd_create(name: &str, start: &str, force: bool, ctx: &Context) {
    let path = match run(name, start, force, ctx) {
        Ok(p) => p,
        Err(e) => {
            report_error(&e.to_string(), ctx.output, ctx.quiet);
            process::exit(1);
        }
    };

    match ctx.output {
        OutputFormat::Text => {
            if !ctx.quiet {
                println!("created {}", path.display());
            }
        }
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::json!({ "created": path.display().to_string() })
            );
        }
    }
}

fn run(name: &str, start: &str, force: bool, ctx: &Context) -> Result<PathBuf, CliError> {
    check_workflow_name(name)?;
    if !START_STATE.is_match(start) {
        return Err(CliError::InvalidStartState(start.to_owned()));
    }

    let layout = Layout::new(&ctx.config.workflows_dir);
    let path = layout.definition_file(name);
    if path.exists() && !force {
        return Err(CliError::AlreadyExists(path));
    }

    let stubs = ctx.config.stubs()?;
    let namespace = format!(
        "{}\\{}",
        ctx.config.namespace_root.trim_end_matches('\\'),
        name
    );
    // The stub is JSON; the namespace lands inside a string literal.
    let namespace = namespace.replace('\\', "\\\\");
    let text = stub::substitute(
        stubs.get(StubKind::Definition),
        [
            (DEFINITION_NAME, name),
            (DEFINITION_NAMESPACE, namespace.as_str()),
            (DEFINITION_START_STATE, start),
        ],
    );
    write_file(&path, &text)?;

    for dir in [CODE_DIR, GENERATED_DIR] {
        let dir = layout.workflow_dir(name).join(dir);
        std::fs::create_dir_all(&dir).map_err(|e| CliError::write(&dir, e))?;
    }

    Ok(path)
}
