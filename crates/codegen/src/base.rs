//! Base artifact: the abstract orchestration class.
//!
//! Everything here is regenerated on every run. It declares one constant
//! and one member per field, copies the input payload into members, and
//! for every state emits an abstract operation plus a private dispatch
//! function that calls it and follows the state's transitions.

use crate::placeholder::{Artifact, Placeholder, Rendered};
use crate::syntax::{import_block, Branches, DispatchFn, GuardedBranch, OperationSig, Syntax};
use flowsmith_core::grammar;
use flowsmith_core::{StateIr, TransitionTarget, WorkflowIr};

/// Namespace segment appended to the workflow namespace for generated code.
pub const GENERATED_SEGMENT: &str = "Generated";

/// `Workflow<Name>Base`
pub fn base_class_name(ir: &WorkflowIr) -> String {
    format!("Workflow{}Base", ir.name)
}

/// `execute<State>`
pub fn dispatch_name(state: &str) -> String {
    format!("execute{}", state)
}

/// Operation implemented by the user for a state: the state name with a
/// lowercased first letter.
pub fn operation_name(state: &str) -> String {
    grammar::lower_first(state)
}

pub fn render(ir: &WorkflowIr, syntax: &dyn Syntax) -> Rendered {
    let mut out = Rendered::new(Artifact::Base);

    out.insert(
        Placeholder::NameSpace,
        syntax.qualify(&[ir.namespace.as_str(), GENERATED_SEGMENT]),
    );
    out.insert(
        Placeholder::AllImport,
        import_block(syntax, ir.uses.iter().map(String::as_str)),
    );
    out.insert(Placeholder::NameBase, base_class_name(ir));
    out.insert(
        Placeholder::AllFieldConstant,
        ir.fields.iter().map(|f| syntax.field_constant(f)).collect::<String>(),
    );
    out.insert(
        Placeholder::AllFieldVariable,
        ir.fields.iter().map(|f| syntax.field_member(f)).collect::<String>(),
    );
    out.insert(Placeholder::AllInputParameterArray, syntax.input_key_list(&ir.input));
    out.insert(
        Placeholder::InputSetAllProperty,
        ir.input.iter().map(|f| syntax.input_assignment(f)).collect::<String>(),
    );
    out.insert(
        Placeholder::ExecuteStartState,
        syntax.start_dispatch(&dispatch_name(&ir.entry().name)),
    );

    let operations: Vec<OperationSig<'_>> = ir.states.iter().map(operation).collect();
    out.insert(
        Placeholder::StateAllAbstractFunction,
        operations
            .iter()
            .map(|op| syntax.abstract_operation(op))
            .collect::<String>(),
    );
    out.insert(
        Placeholder::StateAllFunction,
        ir.states
            .iter()
            .zip(&operations)
            .map(|(state, op)| syntax.dispatch_function(&dispatch(state, op)))
            .collect::<String>(),
    );
    out.insert(Placeholder::OutputName, syntax.output_name(&ir.output));

    out
}

fn operation(state: &StateIr) -> OperationSig<'_> {
    OperationSig {
        name: operation_name(&state.name),
        params: &state.parameters,
        result: &state.result,
    }
}

fn dispatch<'a>(state: &'a StateIr, op: &'a OperationSig<'a>) -> DispatchFn<'a> {
    let branches = match state.transitions.as_slice() {
        [only] => match &only.target {
            TransitionTarget::Goto(next) => Branches::Goto(dispatch_name(next)),
            TransitionTarget::Terminate => Branches::Terminate,
        },
        many => Branches::Guarded(
            many.iter()
                .map(|t| GuardedBranch {
                    guard: &t.guard,
                    dispatch: match &t.target {
                        TransitionTarget::Goto(next) => Some(dispatch_name(next)),
                        TransitionTarget::Terminate => None,
                    },
                })
                .collect(),
        ),
    };
    DispatchFn {
        state: &state.name,
        name: dispatch_name(&state.name),
        operation: op,
        branches,
    }
}
