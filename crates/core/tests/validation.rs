//! End-to-end validator behaviour over whole definitions.

use flowsmith_core::{validate, AnyType, ContractViolation, KnownTypes, Rule, ValidationReport};
use serde_json::{json, Value};

fn billing() -> Value {
    json!({
        "name": "Billing",
        "uses": ["App\\Types\\Int"],
        "namespace": "App\\Workflows\\Billing",
        "startState": "Charge",
        "input": {"amount": "Int"},
        "output": {"total": "Int"},
        "workflow": {
            "Charge": {
                "parameters": {"amount": "Int"},
                "result": {"total": "Int"},
                "transition": {"End": ""}
            }
        }
    })
}

fn run(def: &Value) -> ValidationReport {
    validate(def, "billing.json", &AnyType).unwrap()
}

fn rules(report: &ValidationReport) -> Vec<Rule> {
    report.diagnostics.iter().map(|d| d.rule).collect()
}

// ── End-to-end scenarios ─────────────────────────────────────────────

#[test]
fn billing_definition_is_valid() {
    let report = run(&billing());
    assert!(report.is_ok(), "unexpected: {:?}", report.messages());
}

#[test]
fn start_state_mismatch_is_the_only_diagnostic() {
    let mut def = billing();
    def["startState"] = json!("Other");
    let report = run(&def);
    assert_eq!(rules(&report), vec![Rule::StartStateMismatch]);
    assert!(report.diagnostics[0].message.contains("'Other'"));
    assert!(report.diagnostics[0].message.contains("'Charge'"));
}

#[test]
fn undeclared_parameter_is_the_only_diagnostic() {
    let mut def = billing();
    def["workflow"]["Charge"]["parameters"] = json!({"foo": "Bar"});
    let report = run(&def);
    assert_eq!(rules(&report), vec![Rule::ParameterNotDeclared]);
    assert!(report.diagnostics[0]
        .message
        .contains("has not been previously declared"));
}

#[test]
fn two_outputs_report_the_count() {
    let mut def = billing();
    def["output"] = json!({"total": "Int", "fee": "Int"});
    let report = run(&def);
    assert_eq!(rules(&report), vec![Rule::OutputFieldCount]);
    assert!(report.diagnostics[0].message.contains('2'));
}

// ── Properties ───────────────────────────────────────────────────────

#[test]
fn validation_is_idempotent() {
    let mut def = billing();
    def["name"] = json!("billing");
    def["workflow"]["Orphan"] = json!({"parameters": {}, "result": {"x": "int"}, "transition": {"Orphan": ""}});
    let first = run(&def);
    let second = run(&def);
    assert_eq!(first, second);
    assert!(!first.is_ok());
}

#[test]
fn independent_defects_are_all_reported() {
    let mut def = billing();
    def.as_object_mut().unwrap().remove("namespace");
    def["name"] = json!("billing");
    def["uses"] = json!(["App\\Types\\Int", "App\\Types\\Text"]);
    def["workflow"]["Charge"]["parameters"] = json!({"amount": "Int", "foo": "Int"});
    def["workflow"]["Audit"] = json!({
        "parameters": {},
        "result": {"amount": "Text"},
        "transition": {"End": ""}
    });

    let report = run(&def);
    assert_eq!(
        rules(&report),
        vec![
            Rule::FieldMissing,
            Rule::InvalidDefinitionName,
            Rule::TypeConflict,
            Rule::ParameterNotDeclared,
            Rule::UnreachableState,
        ]
    );
}

#[test]
fn unreferenced_state_is_unreachable() {
    let mut def = billing();
    def["workflow"]["Refund"] = json!({
        "parameters": {"total": "Int"},
        "result": {"refund": "Int"},
        "transition": {"End": ""}
    });
    let report = run(&def);
    assert_eq!(rules(&report), vec![Rule::UnreachableState]);
    assert_eq!(report.diagnostics[0].path, "workflow.Refund");
}

#[test]
fn mutual_transitions_are_circular() {
    let mut def = billing();
    def["workflow"]["Charge"]["transition"] = json!({"Retry": ""});
    def["workflow"]["Retry"] = json!({
        "parameters": {"total": "Int"},
        "result": {"total": "Int"},
        "transition": {"Charge": ""}
    });
    let report = run(&def);
    assert_eq!(rules(&report), vec![Rule::CircularTransition]);
    assert!(report.diagnostics[0]
        .message
        .contains("from 'Retry' to 'Charge'"));
}

#[test]
fn type_conflict_names_both_types() {
    let mut def = billing();
    def["uses"] = json!(["App\\Types\\Int", "App\\Types\\String"]);
    def["input"] = json!({"total": "Int", "amount": "Int"});
    def["workflow"]["Charge"]["result"] = json!({"total": "String"});
    let report = run(&def);
    let conflicts: Vec<&str> = report
        .diagnostics
        .iter()
        .filter(|d| d.rule == Rule::TypeConflict)
        .map(|d| d.message.as_str())
        .collect();
    assert_eq!(conflicts.len(), 1);
    assert!(conflicts[0].contains("'Int'") && conflicts[0].contains("'String'"));
}

#[test]
fn terminal_marker_is_not_an_unknown_target() {
    let report = run(&billing());
    assert_eq!(report.count_rule(Rule::UnknownTransitionTarget), 0);
}

// ── Imports and contract ─────────────────────────────────────────────

#[test]
fn unresolvable_import_is_reported() {
    let resolver: KnownTypes = ["App\\Types\\Money"].into_iter().collect();
    let report = validate(&billing(), "billing.json", &resolver).unwrap();
    assert_eq!(rules(&report), vec![Rule::ImportNotFound]);
    assert_eq!(report.diagnostics[0].path, "uses[0]");
}

#[test]
fn non_primitive_type_needs_an_import() {
    let mut def = billing();
    def["output"] = json!({"total": "Money"});
    let report = run(&def);
    assert_eq!(rules(&report), vec![Rule::ImportMissing]);
}

#[test]
fn missing_field_names_the_source_label() {
    let mut def = billing();
    def.as_object_mut().unwrap().remove("workflow");
    let report = run(&def);
    assert_eq!(rules(&report), vec![Rule::FieldMissing]);
    assert!(report.diagnostics[0].message.contains("'workflow'"));
    assert!(report.diagnostics[0].message.contains("billing.json"));
}

#[test]
fn non_mapping_is_a_contract_violation() {
    let err = validate(&json!(["Billing"]), "billing.json", &AnyType).unwrap_err();
    assert!(matches!(err, ContractViolation::NotAMapping { .. }));
}

#[test]
fn report_serializes_for_machine_output() {
    let mut def = billing();
    def["startState"] = json!("Other");
    let json = run(&def).to_json_value();
    assert_eq!(json["source"], "billing.json");
    assert_eq!(json["valid"], false);
    assert_eq!(json["diagnostics"][0]["rule"], "start_state_mismatch");
    assert_eq!(json["diagnostics"][0]["kind"], "graph");
}
