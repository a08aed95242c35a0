//! Read-only, borrowed views over a raw workflow definition.
//!
//! The definition arrives as a decoded `serde_json::Value` (with
//! `preserve_order`, so object key order is declaration order). Reading it
//! into a [`DefinitionView`] never fails on user input: missing or mistyped
//! fields become structural diagnostics and the corresponding view field is
//! left as `None` so later checks can skip it.

use crate::diagnostic::{Diagnostic, Rule};
use crate::error::{json_kind, ContractViolation};
use serde_json::{Map, Value};

pub const FIELD_NAME: &str = "name";
pub const FIELD_USES: &str = "uses";
pub const FIELD_NAMESPACE: &str = "namespace";
pub const FIELD_START_STATE: &str = "startState";
pub const FIELD_INPUT: &str = "input";
pub const FIELD_OUTPUT: &str = "output";
pub const FIELD_WORKFLOW: &str = "workflow";

pub const REQUIRED_FIELDS: [&str; 7] = [
    FIELD_NAME,
    FIELD_USES,
    FIELD_NAMESPACE,
    FIELD_START_STATE,
    FIELD_INPUT,
    FIELD_OUTPUT,
    FIELD_WORKFLOW,
];

pub const STATE_PARAMETERS: &str = "parameters";
pub const STATE_RESULT: &str = "result";
pub const STATE_TRANSITION: &str = "transition";

/// A `name: Type` declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Field<'a> {
    pub name: &'a str,
    pub ty: &'a str,
}

/// A `target: guard` transition entry, in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransitionEntry<'a> {
    pub target: &'a str,
    pub guard: &'a str,
}

/// One entry of the `workflow` mapping.
#[derive(Debug, Clone, Default)]
pub struct StateView<'a> {
    pub name: &'a str,
    pub parameters: Option<Vec<Field<'a>>>,
    pub result: Option<Vec<Field<'a>>>,
    pub transition: Option<Vec<TransitionEntry<'a>>>,
    /// Missing or mistyped state keys, reported by the state checks.
    pub issues: Vec<Diagnostic>,
}

impl<'a> StateView<'a> {
    /// First (and, once validated, only) result field.
    pub fn result_field(&self) -> Option<Field<'a>> {
        self.result.as_ref().and_then(|r| r.first().copied())
    }
}

/// The seven top-level fields. `None` means missing or mistyped.
#[derive(Debug, Clone, Default)]
pub struct DefinitionView<'a> {
    pub name: Option<&'a str>,
    pub uses: Option<Vec<&'a str>>,
    pub namespace: Option<&'a str>,
    pub start_state: Option<&'a str>,
    pub input: Option<Vec<Field<'a>>>,
    pub output: Option<Vec<Field<'a>>>,
    pub workflow: Option<Vec<StateView<'a>>>,
}

impl<'a> DefinitionView<'a> {
    /// Read the definition, returning the view plus top-level structural
    /// diagnostics (in required-field order).
    pub fn read(
        definition: &'a Value,
        source_label: &str,
    ) -> Result<(Self, Vec<Diagnostic>), ContractViolation> {
        let root = definition
            .as_object()
            .ok_or_else(|| ContractViolation::NotAMapping {
                source_label: source_label.to_owned(),
                found: json_kind(definition).to_owned(),
            })?;

        let mut diags = Vec::new();
        let mut view = DefinitionView::default();

        for field in REQUIRED_FIELDS {
            let Some(value) = present(root, field) else {
                diags.push(Diagnostic::new(
                    Rule::FieldMissing,
                    field,
                    format!(
                        "field '{}' is missing from the definition file '{}'",
                        field, source_label
                    ),
                ));
                continue;
            };

            match field {
                FIELD_NAME => view.name = read_str(value, field, &mut diags),
                FIELD_NAMESPACE => view.namespace = read_str(value, field, &mut diags),
                FIELD_START_STATE => view.start_state = read_str(value, field, &mut diags),
                FIELD_USES => view.uses = read_str_list(value, field, &mut diags),
                FIELD_INPUT => view.input = read_fields(value, field, &mut diags),
                FIELD_OUTPUT => view.output = read_fields(value, field, &mut diags),
                FIELD_WORKFLOW => view.workflow = read_states(value, &mut diags),
                _ => {}
            }
        }

        Ok((view, diags))
    }

    pub fn state(&self, name: &str) -> Option<&StateView<'a>> {
        self.workflow
            .as_ref()
            .and_then(|states| states.iter().find(|s| s.name == name))
    }

    /// The first declared state, which is where execution enters.
    pub fn entry_state(&self) -> Option<&StateView<'a>> {
        self.workflow.as_ref().and_then(|states| states.first())
    }
}

// ── Shape helpers ───────────────────────────────────────────────────

/// A key counts as present when it exists and is not `null`.
fn present<'a>(obj: &'a Map<String, Value>, key: &str) -> Option<&'a Value> {
    obj.get(key).filter(|v| !v.is_null())
}

fn shape_error(path: &str, expected: &str, found: &Value) -> Diagnostic {
    Diagnostic::new(
        Rule::FieldShape,
        path,
        format!(
            "field '{}' must be {}, found {}",
            path,
            expected,
            json_kind(found)
        ),
    )
}

fn read_str<'a>(value: &'a Value, path: &str, diags: &mut Vec<Diagnostic>) -> Option<&'a str> {
    match value.as_str() {
        Some(s) => Some(s),
        None => {
            diags.push(shape_error(path, "a string", value));
            None
        }
    }
}

fn read_str_list<'a>(
    value: &'a Value,
    path: &str,
    diags: &mut Vec<Diagnostic>,
) -> Option<Vec<&'a str>> {
    let Some(items) = value.as_array() else {
        diags.push(shape_error(path, "an array", value));
        return None;
    };
    let mut out = Vec::with_capacity(items.len());
    for (i, item) in items.iter().enumerate() {
        match item.as_str() {
            Some(s) => out.push(s),
            None => diags.push(shape_error(&format!("{}[{}]", path, i), "a string", item)),
        }
    }
    Some(out)
}

/// An object of `name: "Type"` entries. Non-string types are reported and
/// dropped; the rest of the mapping is still returned.
fn read_fields<'a>(
    value: &'a Value,
    path: &str,
    diags: &mut Vec<Diagnostic>,
) -> Option<Vec<Field<'a>>> {
    let Some(obj) = value.as_object() else {
        diags.push(shape_error(path, "an object", value));
        return None;
    };
    let mut out = Vec::with_capacity(obj.len());
    for (name, ty) in obj {
        match ty.as_str() {
            Some(ty) => out.push(Field {
                name: name.as_str(),
                ty,
            }),
            None => diags.push(shape_error(&format!("{}.{}", path, name), "a string", ty)),
        }
    }
    Some(out)
}

fn read_transitions<'a>(
    value: &'a Value,
    path: &str,
    diags: &mut Vec<Diagnostic>,
) -> Option<Vec<TransitionEntry<'a>>> {
    let Some(obj) = value.as_object() else {
        diags.push(shape_error(path, "an object", value));
        return None;
    };
    let mut out = Vec::with_capacity(obj.len());
    for (target, guard) in obj {
        match guard {
            Value::Null => out.push(TransitionEntry {
                target: target.as_str(),
                guard: "",
            }),
            Value::String(g) => out.push(TransitionEntry {
                target: target.as_str(),
                guard: g.as_str(),
            }),
            other => diags.push(shape_error(
                &format!("{}.{}", path, target),
                "a string",
                other,
            )),
        }
    }
    Some(out)
}

fn read_states<'a>(value: &'a Value, diags: &mut Vec<Diagnostic>) -> Option<Vec<StateView<'a>>> {
    let Some(obj) = value.as_object() else {
        diags.push(shape_error(FIELD_WORKFLOW, "an object", value));
        return None;
    };
    Some(
        obj.iter()
            .map(|(name, state)| read_state(name.as_str(), state))
            .collect(),
    )
}

fn read_state<'a>(name: &'a str, value: &'a Value) -> StateView<'a> {
    let mut view = StateView {
        name,
        ..StateView::default()
    };
    let base = format!("{}.{}", FIELD_WORKFLOW, name);

    let Some(obj) = value.as_object() else {
        view.issues.push(shape_error(&base, "an object", value));
        return view;
    };

    for key in [STATE_PARAMETERS, STATE_RESULT, STATE_TRANSITION] {
        let path = format!("{}.{}", base, key);
        let Some(field) = present(obj, key) else {
            view.issues.push(Diagnostic::new(
                Rule::StateFieldMissing,
                path,
                format!("workflow state '{}' requires the '{}' field", name, key),
            ));
            continue;
        };
        match key {
            STATE_PARAMETERS => view.parameters = read_fields(field, &path, &mut view.issues),
            STATE_RESULT => view.result = read_fields(field, &path, &mut view.issues),
            _ => view.transition = read_transitions(field, &path, &mut view.issues),
        }
    }

    view
}
