use std::path::PathBuf;
use std::process;

use flowsmith_codegen::{CodegenError, StubKind, StubSet};
use flowsmith_core::{TypeResolver, ValidationReport};
use tracing::{debug, warn};

use super::{check_workflow_name, print_report, read_definition, write_file};
use crate::error::CliError;
use crate::layout::Layout;
use crate::{report_error, Context, OutputFormat};

/// What one `generate` run did.
#[derive(Default)]
struct Summary {
    /// Files written this run.
    written: Vec<PathBuf>,
    /// Implementation files left alone because they already exist.
    kept: Vec<PathBuf>,
    /// Definitions with diagnostics; nothing was generated for them.
    rejected: Vec<ValidationReport>,
    /// Definition files that could not be read or decoded.
    unreadable: Vec<String>,
}

impl Summary {
    fn is_ok(&self) -> bool {
        self.rejected.is_empty() && self.unreadable.is_empty()
    }

    fn generated_any(&self) -> bool {
        !self.written.is_empty() || !self.kept.is_empty()
    }

    fn to_json_value(&self) -> serde_json::Value {
        serde_json::json!({
            "written": self.written.iter().map(|p| p.display().to_string()).collect::<Vec<_>>(),
            "kept": self.kept.iter().map(|p| p.display().to_string()).collect::<Vec<_>>(),
            "rejected": self.rejected.iter().map(ValidationReport::to_json_value).collect::<Vec<_>>(),
            "errors": self.unreadable,
        })
    }
}

pub(crate) fn cmd_generate(name: Option<&str>, ctx: &Context) {
    let summary = match run(name, ctx) {
        Ok(s) => s,
        Err(e) => {
            report_error(&e.to_string(), ctx.output, ctx.quiet);
            process::exit(1);
        }
    };

    match ctx.output {
        OutputFormat::Text => {
            if !ctx.quiet {
                for path in &summary.written {
                    println!("generated {}", path.display());
                }
                for path in &summary.kept {
                    println!("kept {} (already exists)", path.display());
                }
                for report in &summary.rejected {
                    print_report(report);
                }
                for msg in &summary.unreadable {
                    eprintln!("{}", msg);
                }
            }
        }
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::to_string_pretty(&summary.to_json_value()).unwrap_or_default()
            );
        }
    }

    if !summary.is_ok() {
        process::exit(1);
    }
}

fn run(name: Option<&str>, ctx: &Context) -> Result<Summary, CliError> {
    let layout = Layout::new(&ctx.config.workflows_dir);
    let workflows = match name {
        Some(name) => {
            check_workflow_name(name)?;
            if !layout.workflow_dir(name).is_dir() {
                return Err(CliError::WorkflowNotFound {
                    name: name.to_owned(),
                    dir: layout.root().to_path_buf(),
                });
            }
            vec![name.to_owned()]
        }
        None => layout.workflows()?,
    };

    let stubs = ctx.config.stubs()?;
    let resolver = ctx.config.resolver();
    let mut summary = Summary::default();

    for workflow in &workflows {
        generate_folder(&layout, workflow, &stubs, resolver.as_ref(), &mut summary)?;
    }

    if summary.generated_any() {
        let common = layout.common_file();
        if common.exists() {
            summary.kept.push(common);
        } else {
            write_file(&common, stubs.get(StubKind::Common))?;
            summary.written.push(common);
        }
    }

    Ok(summary)
}

/// Generate every definition in one workflow folder, in file name order.
/// The folder stops at its first unreadable or invalid definition. A folder
/// with no definitions is an error.
fn generate_folder(
    layout: &Layout<'_>,
    workflow: &str,
    stubs: &StubSet,
    resolver: &dyn TypeResolver,
    summary: &mut Summary,
) -> Result<(), CliError> {
    let files = layout.definition_files(workflow)?;
    if files.is_empty() {
        let dir = layout.definition_dir(workflow);
        warn!(workflow, dir = %dir.display(), "no definition files");
        summary
            .unreadable
            .push(format!("no definition files found in '{}'", dir.display()));
        return Ok(());
    }

    for path in files {
        let definition = match read_definition(&path) {
            Ok(v) => v,
            Err(e) => {
                warn!(workflow, path = %path.display(), "skipping rest of folder");
                summary.unreadable.push(e.to_string());
                return Ok(());
            }
        };

        let source = path.display().to_string();
        let compiled = match flowsmith_codegen::compile(&definition, &source, resolver) {
            Ok(c) => c,
            Err(CodegenError::Invalid(report)) => {
                warn!(workflow, path = %source, "definition has diagnostics, skipping rest of folder");
                summary.rejected.push(report);
                return Ok(());
            }
            Err(CodegenError::Contract(e)) => {
                summary
                    .unreadable
                    .push(format!("error in definition '{}': {}", source, e));
                return Ok(());
            }
            Err(e) => return Err(e.into()),
        };

        let base_path = layout.generated_file(workflow, &compiled.base_class_name());
        write_file(&base_path, &compiled.base.apply(stubs.get(StubKind::Base)))?;
        summary.written.push(base_path);

        let code_path = layout.code_file(workflow, &compiled.class_name());
        if code_path.exists() {
            debug!(path = %code_path.display(), "implementation exists, not overwriting");
            summary.kept.push(code_path);
        } else {
            write_file(
                &code_path,
                &compiled.implementation.apply(stubs.get(StubKind::Code)),
            )?;
            summary.written.push(code_path);
        }
    }
    Ok(())
}
