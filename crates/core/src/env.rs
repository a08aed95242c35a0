//! Field/type environment.
//!
//! The environment is the ordered set of every field introduced by `input`
//! or by a state's `result`, each bound to its first-seen type. The same
//! accumulation, snapshotted before each state, gives that state's
//! possible-input prefix: the fields a `parameters` entry may reference.

use crate::definition::{DefinitionView, Field, FIELD_INPUT, FIELD_WORKFLOW, STATE_RESULT};
use crate::diagnostic::{Diagnostic, Rule};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// A field name bound to its declared type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldBinding {
    pub name: String,
    pub ty: String,
}

/// A redeclaration with a type different from the first-seen one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeConflict {
    pub name: String,
    pub declared: String,
    pub conflicting: String,
}

impl fmt::Display for TypeConflict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "field '{}' has been declared with type '{}' and '{}'",
            self.name, self.declared, self.conflicting
        )
    }
}

/// Insertion-ordered `name -> type` map.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldEnv {
    bindings: Vec<FieldBinding>,
    index: HashMap<String, usize>,
}

impl FieldEnv {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `name` to `ty` unless already bound. A rebinding with the same
    /// type is a no-op; a different type is returned as a conflict and the
    /// first binding is kept.
    pub fn declare(&mut self, name: &str, ty: &str) -> Option<TypeConflict> {
        match self.index.get(name) {
            Some(&i) => {
                let declared = &self.bindings[i].ty;
                if declared == ty {
                    None
                } else {
                    Some(TypeConflict {
                        name: name.to_owned(),
                        declared: declared.clone(),
                        conflicting: ty.to_owned(),
                    })
                }
            }
            None => {
                self.index.insert(name.to_owned(), self.bindings.len());
                self.bindings.push(FieldBinding {
                    name: name.to_owned(),
                    ty: ty.to_owned(),
                });
                None
            }
        }
    }

    pub fn type_of(&self, name: &str) -> Option<&str> {
        self.index.get(name).map(|&i| self.bindings[i].ty.as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldBinding> {
        self.bindings.iter()
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

impl<'e> IntoIterator for &'e FieldEnv {
    type Item = &'e FieldBinding;
    type IntoIter = std::slice::Iter<'e, FieldBinding>;

    fn into_iter(self) -> Self::IntoIter {
        self.bindings.iter()
    }
}

/// Possible-input prefix for each state, keyed by state name.
///
/// Visibility is flat: a state sees `input` plus the results of every state
/// declared before it, whether or not that state lies on a path to it.
#[derive(Debug, Clone, Default)]
pub struct PossibleInputs {
    prefixes: HashMap<String, FieldEnv>,
}

impl PossibleInputs {
    pub fn for_state(&self, state: &str) -> Option<&FieldEnv> {
        self.prefixes.get(state)
    }
}

/// Environment, prefixes, and any type conflicts found while accumulating.
#[derive(Debug, Clone, Default)]
pub struct EnvBuild {
    pub env: FieldEnv,
    pub possible_inputs: PossibleInputs,
    pub diagnostics: Vec<Diagnostic>,
}

/// Accumulate `input`, then each state's `result` in declaration order.
pub fn build(view: &DefinitionView<'_>) -> EnvBuild {
    let mut out = EnvBuild::default();

    if let Some(input) = &view.input {
        declare_all(&mut out, input, FIELD_INPUT);
    }

    for state in view.workflow.iter().flatten() {
        out.possible_inputs
            .prefixes
            .entry(state.name.to_owned())
            .or_insert_with(|| out.env.clone());

        if let Some(result) = &state.result {
            let path = format!("{}.{}.{}", FIELD_WORKFLOW, state.name, STATE_RESULT);
            declare_all(&mut out, result, &path);
        }
    }

    out
}

fn declare_all(out: &mut EnvBuild, fields: &[Field<'_>], path: &str) {
    for field in fields {
        if let Some(conflict) = out.env.declare(field.name, field.ty) {
            out.diagnostics.push(Diagnostic::new(
                Rule::TypeConflict,
                format!("{}.{}", path, field.name),
                conflict.to_string(),
            ));
        }
    }
}
