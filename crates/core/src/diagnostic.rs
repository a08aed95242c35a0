//! Validator output: diagnostics and the per-definition report.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Category of a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticKind {
    /// A required field is missing or has the wrong shape.
    Structural,
    /// An identifier fails its naming pattern.
    Grammar,
    /// Something refers to an import, field or state that does not exist.
    Reference,
    /// The same field name is declared with conflicting types.
    Consistency,
    /// Unreachable state, circular transition, missing or ambiguous transitions.
    Graph,
}

/// The rule that produced a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rule {
    FieldMissing,
    FieldShape,
    InvalidDefinitionName,
    InvalidStartStateName,
    ImportNotFound,
    NoInputFields,
    OutputFieldCount,
    InvalidInputFieldName,
    InvalidOutputFieldName,
    InvalidTypeName,
    ImportMissing,
    TypeConflict,
    NoWorkflowStates,
    StartStateMismatch,
    InvalidStateName,
    StateFieldMissing,
    InvalidParameterName,
    ParameterNotDeclared,
    ResultFieldCount,
    InvalidResultFieldName,
    NoTransition,
    GuardMissing,
    UnknownTransitionTarget,
    CircularTransition,
    UnreachableState,
}

impl Rule {
    pub fn kind(self) -> DiagnosticKind {
        match self {
            Rule::FieldMissing | Rule::FieldShape | Rule::StateFieldMissing => {
                DiagnosticKind::Structural
            }
            Rule::InvalidDefinitionName
            | Rule::InvalidStartStateName
            | Rule::InvalidInputFieldName
            | Rule::InvalidOutputFieldName
            | Rule::InvalidTypeName
            | Rule::InvalidStateName
            | Rule::InvalidParameterName
            | Rule::InvalidResultFieldName => DiagnosticKind::Grammar,
            Rule::ImportNotFound
            | Rule::ImportMissing
            | Rule::ParameterNotDeclared
            | Rule::UnknownTransitionTarget
            | Rule::NoInputFields
            | Rule::OutputFieldCount
            | Rule::ResultFieldCount => DiagnosticKind::Reference,
            Rule::TypeConflict => DiagnosticKind::Consistency,
            Rule::NoWorkflowStates
            | Rule::StartStateMismatch
            | Rule::NoTransition
            | Rule::GuardMissing
            | Rule::CircularTransition
            | Rule::UnreachableState => DiagnosticKind::Graph,
        }
    }

    /// Stable identifier, e.g. `"circular_transition"`.
    pub fn id(self) -> &'static str {
        match self {
            Rule::FieldMissing => "field_missing",
            Rule::FieldShape => "field_shape",
            Rule::InvalidDefinitionName => "invalid_definition_name",
            Rule::InvalidStartStateName => "invalid_start_state_name",
            Rule::ImportNotFound => "import_not_found",
            Rule::NoInputFields => "no_input_fields",
            Rule::OutputFieldCount => "output_field_count",
            Rule::InvalidInputFieldName => "invalid_input_field_name",
            Rule::InvalidOutputFieldName => "invalid_output_field_name",
            Rule::InvalidTypeName => "invalid_type_name",
            Rule::ImportMissing => "import_missing",
            Rule::TypeConflict => "type_conflict",
            Rule::NoWorkflowStates => "no_workflow_states",
            Rule::StartStateMismatch => "start_state_mismatch",
            Rule::InvalidStateName => "invalid_state_name",
            Rule::StateFieldMissing => "state_field_missing",
            Rule::InvalidParameterName => "invalid_parameter_name",
            Rule::ParameterNotDeclared => "parameter_not_declared",
            Rule::ResultFieldCount => "result_field_count",
            Rule::InvalidResultFieldName => "invalid_result_field_name",
            Rule::NoTransition => "no_transition",
            Rule::GuardMissing => "guard_missing",
            Rule::UnknownTransitionTarget => "unknown_transition_target",
            Rule::CircularTransition => "circular_transition",
            Rule::UnreachableState => "unreachable_state",
        }
    }
}

/// One independently meaningful validation problem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub rule: Rule,
    /// Dotted location inside the definition, e.g. `workflow.Charge.result`.
    pub path: String,
    pub message: String,
}

impl Diagnostic {
    pub fn new(rule: Rule, path: impl Into<String>, message: impl Into<String>) -> Self {
        Diagnostic {
            rule,
            path: path.into(),
            message: message.into(),
        }
    }

    pub fn kind(&self) -> DiagnosticKind {
        self.rule.kind()
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

/// All diagnostics for one definition, in the order they were found.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub source: String,
    pub diagnostics: Vec<Diagnostic>,
}

impl ValidationReport {
    pub fn new(source: impl Into<String>, diagnostics: Vec<Diagnostic>) -> Self {
        ValidationReport {
            source: source.into(),
            diagnostics,
        }
    }

    /// An empty diagnostic list is the only success signal.
    pub fn is_ok(&self) -> bool {
        self.diagnostics.is_empty()
    }

    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// Plain message list.
    pub fn messages(&self) -> Vec<String> {
        self.diagnostics.iter().map(|d| d.message.clone()).collect()
    }

    pub fn count_rule(&self, rule: Rule) -> usize {
        self.diagnostics.iter().filter(|d| d.rule == rule).count()
    }

    /// Serialize for `--output json`.
    pub fn to_json_value(&self) -> serde_json::Value {
        serde_json::json!({
            "source": self.source,
            "valid": self.is_ok(),
            "diagnostics": self.diagnostics.iter().map(|d| serde_json::json!({
                "rule": d.rule.id(),
                "kind": d.kind(),
                "path": d.path,
                "message": d.message,
            })).collect::<Vec<_>>(),
        })
    }
}
