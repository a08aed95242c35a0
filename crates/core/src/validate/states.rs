//! Per-state checks.
//!
//! Each declared state is checked exactly once, in declaration order,
//! independently of how many paths reach it.

use super::imports::check_field_type;
use super::{Imports, LOWER_RULE, UPPER_RULE};
use crate::definition::{
    DefinitionView, StateView, FIELD_WORKFLOW, STATE_PARAMETERS, STATE_RESULT, STATE_TRANSITION,
};
use crate::diagnostic::{Diagnostic, Rule};
use crate::env::{FieldEnv, PossibleInputs, TypeConflict};
use crate::grammar;
use crate::TERMINAL_STATE;

pub(super) fn validate_states(
    view: &DefinitionView<'_>,
    possible_inputs: &PossibleInputs,
    imports: &Imports<'_>,
) -> Vec<Diagnostic> {
    let mut diags = Vec::new();
    for state in view.workflow.iter().flatten() {
        let empty = FieldEnv::new();
        let visible = possible_inputs.for_state(state.name).unwrap_or(&empty);
        validate_state(view, state, visible, imports, &mut diags);
    }
    diags
}

fn validate_state(
    view: &DefinitionView<'_>,
    state: &StateView<'_>,
    visible: &FieldEnv,
    imports: &Imports<'_>,
    diags: &mut Vec<Diagnostic>,
) {
    let base = format!("{}.{}", FIELD_WORKFLOW, state.name);

    if !grammar::is_upper_identifier(state.name) {
        diags.push(Diagnostic::new(
            Rule::InvalidStateName,
            base.as_str(),
            format!("invalid workflow state name '{}': {}", state.name, UPPER_RULE),
        ));
    }

    diags.extend(state.issues.iter().cloned());

    // ── Parameters ──────────────────────────────────────────────────
    for param in state.parameters.iter().flatten() {
        let path = format!("{}.{}.{}", base, STATE_PARAMETERS, param.name);
        if !grammar::is_lower_identifier(param.name) {
            diags.push(Diagnostic::new(
                Rule::InvalidParameterName,
                path,
                format!(
                    "invalid parameter name '{}' in workflow state '{}': {}",
                    param.name, state.name, LOWER_RULE
                ),
            ));
            continue;
        }
        match visible.type_of(param.name) {
            None => diags.push(Diagnostic::new(
                Rule::ParameterNotDeclared,
                path,
                format!(
                    "parameter '{}' in workflow state '{}' has not been previously declared",
                    param.name, state.name
                ),
            )),
            Some(declared) if declared != param.ty => {
                let conflict = TypeConflict {
                    name: param.name.to_owned(),
                    declared: declared.to_owned(),
                    conflicting: param.ty.to_owned(),
                };
                diags.push(Diagnostic::new(Rule::TypeConflict, path, conflict.to_string()));
            }
            Some(_) => {}
        }
    }

    // ── Result ──────────────────────────────────────────────────────
    if let Some(result) = &state.result {
        if result.len() != 1 {
            diags.push(Diagnostic::new(
                Rule::ResultFieldCount,
                format!("{}.{}", base, STATE_RESULT),
                format!(
                    "workflow state '{}' needs exactly one result field, found {}",
                    state.name,
                    result.len()
                ),
            ));
        }
        for field in result {
            let path = format!("{}.{}.{}", base, STATE_RESULT, field.name);
            if !grammar::is_lower_identifier(field.name) {
                diags.push(Diagnostic::new(
                    Rule::InvalidResultFieldName,
                    path.as_str(),
                    format!(
                        "invalid result field name '{}' in workflow state '{}': {}",
                        field.name, state.name, LOWER_RULE
                    ),
                ));
            }
            diags.extend(check_field_type(imports, field.name, field.ty, &path));
        }
    }

    // ── Transitions ─────────────────────────────────────────────────
    if let Some(transition) = &state.transition {
        let path = format!("{}.{}", base, STATE_TRANSITION);
        if transition.is_empty() {
            diags.push(Diagnostic::new(
                Rule::NoTransition,
                path.as_str(),
                format!("no transitions specified for workflow state '{}'", state.name),
            ));
        }
        let guarded = transition.len() > 1;
        for entry in transition {
            let entry_path = format!("{}.{}", path, entry.target);
            if guarded && entry.guard.trim().is_empty() {
                diags.push(Diagnostic::new(
                    Rule::GuardMissing,
                    entry_path.as_str(),
                    format!(
                        "transition from '{}' to '{}' has no guard specified",
                        state.name, entry.target
                    ),
                ));
            }
            if entry.target != TERMINAL_STATE && view.state(entry.target).is_none() {
                diags.push(Diagnostic::new(
                    Rule::UnknownTransitionTarget,
                    entry_path,
                    format!(
                        "transition from '{}' to '{}' is not possible: workflow state '{}' is not declared",
                        state.name, entry.target, entry.target
                    ),
                ));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{env, AnyType};
    use serde_json::json;

    fn run(def: serde_json::Value) -> Vec<Diagnostic> {
        let (view, _) = DefinitionView::read(&def, "s.json").unwrap();
        let built = env::build(&view);
        let (imports, _) = Imports::resolve(view.uses.as_deref(), &AnyType);
        validate_states(&view, &built.possible_inputs, &imports)
    }

    #[test]
    fn undeclared_parameter() {
        let diags = run(json!({
            "uses": ["App\\Bar", "App\\Int"],
            "input": {"amount": "Int"},
            "workflow": {"Charge": {
                "parameters": {"foo": "Bar"},
                "result": {"total": "Int"},
                "transition": {"End": ""}
            }}
        }));
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].rule, Rule::ParameterNotDeclared);
        assert_eq!(diags[0].path, "workflow.Charge.parameters.foo");
    }

    #[test]
    fn parameters_see_results_of_earlier_declared_states_only() {
        let diags = run(json!({
            "uses": ["App\\Int"],
            "input": {"amount": "Int"},
            "workflow": {
                "Charge": {
                    "parameters": {"receipt": "Int"},
                    "result": {"total": "Int"},
                    "transition": {"Store": ""}
                },
                "Store": {
                    "parameters": {"total": "Int", "amount": "Int"},
                    "result": {"receipt": "Int"},
                    "transition": {"End": ""}
                }
            }
        }));
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].path, "workflow.Charge.parameters.receipt");
    }

    #[test]
    fn parameter_type_mismatch_is_a_conflict() {
        let diags = run(json!({
            "uses": ["App\\Int", "App\\Money"],
            "input": {"amount": "Int"},
            "workflow": {"Charge": {
                "parameters": {"amount": "Money"},
                "result": {"total": "Int"},
                "transition": {"End": ""}
            }}
        }));
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].rule, Rule::TypeConflict);
        assert!(diags[0].message.contains("'Int' and 'Money'"));
    }

    #[test]
    fn guards_required_only_with_several_transitions() {
        let diags = run(json!({
            "uses": ["App\\Int"],
            "input": {"amount": "Int"},
            "workflow": {
                "Charge": {
                    "parameters": {},
                    "result": {"total": "Int"},
                    "transition": {"Refund": "$this->total > 0", "End": " "}
                },
                "Refund": {
                    "parameters": {},
                    "result": {"refund": "Int"},
                    "transition": {"End": ""}
                }
            }
        }));
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].rule, Rule::GuardMissing);
        assert_eq!(diags[0].path, "workflow.Charge.transition.End");
    }

    #[test]
    fn whitespace_only_guard_counts_as_missing() {
        let diags = run(json!({
            "uses": ["App\\Int"],
            "input": {"amount": "Int"},
            "workflow": {"Charge": {
                "parameters": {},
                "result": {"total": "Int"},
                "transition": {"Charge": "\t\n", "End": "$this->total > 0"}
            }}
        }));
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].rule, Rule::GuardMissing);
        assert_eq!(diags[0].path, "workflow.Charge.transition.Charge");

        let single = run(json!({
            "uses": ["App\\Int"],
            "input": {"amount": "Int"},
            "workflow": {"Charge": {
                "parameters": {},
                "result": {"total": "Int"},
                "transition": {"End": "  "}
            }}
        }));
        assert!(single.is_empty());
    }

    #[test]
    fn terminal_target_is_never_unknown() {
        let diags = run(json!({
            "uses": ["App\\Int"],
            "input": {"amount": "Int"},
            "workflow": {"Charge": {
                "parameters": {"amount": "Int"},
                "result": {"total": "Int"},
                "transition": {"End": ""}
            }}
        }));
        assert!(diags.is_empty());
    }

    #[test]
    fn unknown_target_and_result_count() {
        let diags = run(json!({
            "uses": ["App\\Int"],
            "input": {"amount": "Int"},
            "workflow": {"Charge": {
                "parameters": {},
                "result": {},
                "transition": {"Ship": ""}
            }}
        }));
        let rules: Vec<Rule> = diags.iter().map(|d| d.rule).collect();
        assert_eq!(
            rules,
            vec![Rule::ResultFieldCount, Rule::UnknownTransitionTarget]
        );
    }

    #[test]
    fn missing_state_keys_are_reported_with_the_state() {
        let diags = run(json!({
            "uses": [],
            "input": {"amount": "int"},
            "workflow": {"charge": {"parameters": {}}}
        }));
        let rules: Vec<Rule> = diags.iter().map(|d| d.rule).collect();
        assert_eq!(
            rules,
            vec![
                Rule::InvalidStateName,
                Rule::StateFieldMissing,
                Rule::StateFieldMissing
            ]
        );
    }
}
