//! Workflow IR -- the verified graph handed to code synthesis.
//!
//! [`WorkflowIr::build`] re-derives the structure from the raw definition and
//! refuses (with [`ContractViolation::Unvalidated`]) anything that does not
//! have the shape validation guarantees. It does not re-run the full
//! validator; callers are expected to gate on an empty [`ValidationReport`].
//!
//! [`ValidationReport`]: crate::ValidationReport

use crate::definition::{DefinitionView, Field, StateView};
use crate::env::{self, FieldEnv};
use crate::error::ContractViolation;
use crate::grammar;
use crate::TERMINAL_STATE;
use serde_json::Value;

/// A declared `name: Type` pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDecl {
    pub name: String,
    pub ty: String,
}

impl FieldDecl {
    pub fn is_nullable(&self) -> bool {
        grammar::has_nullable_suffix(&self.ty)
    }

    /// The type with `|null` stripped and `Type[]` collapsed to `array`.
    pub fn base_type(&self) -> &str {
        grammar::base_type(&self.ty)
    }
}

impl From<&Field<'_>> for FieldDecl {
    fn from(field: &Field<'_>) -> Self {
        FieldDecl {
            name: field.name.to_owned(),
            ty: field.ty.to_owned(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransitionTarget {
    Goto(String),
    Terminate,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub target: TransitionTarget,
    pub guard: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateIr {
    pub name: String,
    pub parameters: Vec<FieldDecl>,
    pub result: FieldDecl,
    pub transitions: Vec<Transition>,
}

#[derive(Debug, Clone)]
pub struct WorkflowIr {
    pub name: String,
    pub namespace: String,
    pub uses: Vec<String>,
    pub start_state: String,
    pub input: Vec<FieldDecl>,
    pub output: FieldDecl,
    /// In declaration order; the first is the entry state.
    pub states: Vec<StateIr>,
    /// Every field from `input` and the state results, first-seen order.
    pub fields: FieldEnv,
}

impl WorkflowIr {
    /// Build the IR from a definition that validated without diagnostics.
    pub fn build(definition: &Value) -> Result<WorkflowIr, ContractViolation> {
        let (view, diags) = DefinitionView::read(definition, "<ir>")?;
        if let Some(first) = diags.first() {
            return Err(ContractViolation::unvalidated(first.message.clone()));
        }

        let name = required(view.name, "name")?;
        let namespace = required(view.namespace, "namespace")?;
        let start = required(view.start_state, "startState")?;
        let uses = required(view.uses.as_ref(), "uses")?;
        let input = required(view.input.as_ref(), "input")?;
        let output = required(view.output.as_ref(), "output")?;
        let workflow = required(view.workflow.as_ref(), "workflow")?;

        let [output] = output.as_slice() else {
            return Err(ContractViolation::unvalidated(format!(
                "expected one output field, found {}",
                output.len()
            )));
        };
        match workflow.first() {
            Some(first) if first.name == start => {}
            _ => {
                return Err(ContractViolation::unvalidated(format!(
                    "start state '{}' is not the first workflow state",
                    start
                )))
            }
        }

        let built = env::build(&view);
        if let Some(conflict) = built.diagnostics.first() {
            return Err(ContractViolation::unvalidated(conflict.message.clone()));
        }

        let states = workflow
            .iter()
            .map(|state| build_state(&view, state))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(WorkflowIr {
            name: name.to_owned(),
            namespace: namespace.to_owned(),
            uses: uses.iter().map(|u| u.to_string()).collect(),
            start_state: start.to_owned(),
            input: input.iter().map(FieldDecl::from).collect(),
            output: FieldDecl::from(output),
            states,
            fields: built.env,
        })
    }

    pub fn state(&self, name: &str) -> Option<&StateIr> {
        self.states.iter().find(|s| s.name == name)
    }

    pub fn entry(&self) -> &StateIr {
        // `build` guarantees at least one state.
        &self.states[0]
    }
}

fn required<T>(value: Option<T>, field: &str) -> Result<T, ContractViolation> {
    value.ok_or_else(|| ContractViolation::unvalidated(format!("field '{}' is missing", field)))
}

fn build_state(view: &DefinitionView<'_>, state: &StateView<'_>) -> Result<StateIr, ContractViolation> {
    if let Some(issue) = state.issues.first() {
        return Err(ContractViolation::unvalidated(issue.message.clone()));
    }
    let parameters = required(state.parameters.as_ref(), "parameters")?;
    let result = required(state.result.as_ref(), "result")?;
    let transition = required(state.transition.as_ref(), "transition")?;

    let [result] = result.as_slice() else {
        return Err(ContractViolation::unvalidated(format!(
            "workflow state '{}' has {} result fields",
            state.name,
            result.len()
        )));
    };
    if transition.is_empty() {
        return Err(ContractViolation::unvalidated(format!(
            "workflow state '{}' has no transitions",
            state.name
        )));
    }

    let transitions = transition
        .iter()
        .map(|entry| {
            let target = if entry.target == TERMINAL_STATE {
                TransitionTarget::Terminate
            } else if view.state(entry.target).is_some() {
                TransitionTarget::Goto(entry.target.to_owned())
            } else {
                return Err(ContractViolation::unvalidated(format!(
                    "workflow state '{}' transitions to undeclared state '{}'",
                    state.name, entry.target
                )));
            };
            Ok(Transition {
                target,
                guard: entry.guard.to_owned(),
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(StateIr {
        name: state.name.to_owned(),
        parameters: parameters.iter().map(FieldDecl::from).collect(),
        result: FieldDecl::from(result),
        transitions,
    })
}
