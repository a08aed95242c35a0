//! Definition validation.
//!
//! Validation is maximal: every phase runs, each returns its own
//! diagnostics, and [`validate`] concatenates them in phase order. A missing
//! or mistyped structural field only skips the checks that depend on it.
//! The only hard failure is a top-level value that is not a mapping.

mod fields;
mod graph;
mod header;
mod imports;
mod states;

use crate::definition::DefinitionView;
use crate::diagnostic::ValidationReport;
use crate::env;
use crate::error::ContractViolation;
use crate::resolver::TypeResolver;
use serde_json::Value;
use tracing::debug;

pub(crate) use imports::Imports;

/// Validate one decoded definition.
///
/// `source_label` names the definition in messages (usually its file path).
/// `resolver` answers whether each `uses` entry exists; it is queried once
/// per distinct import.
pub fn validate(
    definition: &Value,
    source_label: &str,
    resolver: &dyn TypeResolver,
) -> Result<ValidationReport, ContractViolation> {
    let (view, mut diags) = DefinitionView::read(definition, source_label)?;
    debug!(source = source_label, count = diags.len(), "structure checked");

    diags.extend(header::validate_names(&view));

    let (imports, import_diags) = Imports::resolve(view.uses.as_deref(), resolver);
    diags.extend(import_diags);
    debug!(source = source_label, count = diags.len(), "imports checked");

    diags.extend(fields::validate_input(&view, &imports));
    diags.extend(fields::validate_output(&view, &imports));

    let built = env::build(&view);
    diags.extend(built.diagnostics);
    debug!(
        source = source_label,
        fields = built.env.len(),
        count = diags.len(),
        "field environment built"
    );

    diags.extend(graph::validate_entry(&view));
    diags.extend(states::validate_states(
        &view,
        &built.possible_inputs,
        &imports,
    ));
    diags.extend(graph::validate_paths(&view));
    diags.extend(graph::validate_reachability(&view));
    debug!(source = source_label, count = diags.len(), "workflow graph checked");

    Ok(ValidationReport::new(source_label, diags))
}

const UPPER_RULE: &str = "must start with an uppercase letter and be alphanumeric";
const LOWER_RULE: &str = "must start with a lowercase letter and be alphanumeric";
