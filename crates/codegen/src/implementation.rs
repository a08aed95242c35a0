//! Implementation artifact: the concrete class the user completes.

use crate::base::{base_class_name, GENERATED_SEGMENT};
use crate::placeholder::{Artifact, Placeholder, Rendered};
use crate::syntax::{import_block, Syntax};
use flowsmith_core::WorkflowIr;

/// Namespace segment under `Generated` that holds the Base class.
pub const BASE_NAMESPACE_SEGMENT: &str = "Workflow";

/// `Workflow<Name>`
pub fn class_name(ir: &WorkflowIr) -> String {
    format!("Workflow{}", ir.name)
}

pub fn render(ir: &WorkflowIr, syntax: &dyn Syntax) -> Rendered {
    let mut out = Rendered::new(Artifact::Implementation);
    let base = base_class_name(ir);

    out.insert(Placeholder::NameSpace, ir.namespace.clone());

    let base_qualified = syntax.qualify(&[
        ir.namespace.as_str(),
        GENERATED_SEGMENT,
        BASE_NAMESPACE_SEGMENT,
        base.as_str(),
    ]);
    let names = ir.uses.iter().map(String::as_str).chain([base_qualified.as_str()]);
    out.insert(Placeholder::AllImport, import_block(syntax, names));

    out.insert(Placeholder::Name, class_name(ir));
    out.insert(Placeholder::NameBase, base);
    out.insert(
        Placeholder::ExecuteDocBlock,
        syntax.entry_doc_block(&ir.input, &ir.output),
    );
    out.insert(Placeholder::AllInputParameter, syntax.entry_parameters(&ir.input));
    out.insert(Placeholder::OutputType, syntax.entry_return_type(&ir.output));
    out.insert(Placeholder::AllInputData, syntax.input_data(&ir.input));

    out
}
