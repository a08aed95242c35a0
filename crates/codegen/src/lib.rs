//! flowsmith-codegen: renders a verified workflow into source artifacts.
//!
//! Two artifacts come out of one [`WorkflowIr`]:
//!
//! - **Base** ([`base::render`]) -- the abstract orchestration class with
//!   field constants and members, input assignment, start dispatch, one
//!   abstract operation and one dispatch function per state.
//! - **Implementation** ([`implementation::render`]) -- the concrete class
//!   skeleton whose entry point mirrors the workflow input.
//!
//! Each render returns a [`Rendered`] placeholder map; [`stub::substitute`]
//! lays it into a stub template. The text layout comes from a [`Syntax`];
//! [`Php`] is the shipped one.

pub mod base;
pub mod error;
pub mod implementation;
pub mod placeholder;
pub mod stub;
pub mod syntax;

pub use error::CodegenError;
pub use placeholder::{Artifact, Placeholder, Rendered};
pub use stub::{StubKind, StubSet};
pub use syntax::{Php, Syntax};

use flowsmith_core::{TypeResolver, WorkflowIr};
use serde_json::Value;
use tracing::{debug, info};

/// Output of a successful [`compile`].
#[derive(Debug, Clone)]
pub struct Compilation {
    pub ir: WorkflowIr,
    pub base: Rendered,
    pub implementation: Rendered,
}

impl Compilation {
    pub fn base_class_name(&self) -> String {
        base::base_class_name(&self.ir)
    }

    pub fn class_name(&self) -> String {
        implementation::class_name(&self.ir)
    }
}

/// Validate `definition` and, only if it has no diagnostics, build the IR
/// and render both artifacts with `syntax`.
pub fn compile_with(
    definition: &Value,
    source: &str,
    resolver: &dyn TypeResolver,
    syntax: &dyn Syntax,
) -> Result<Compilation, CodegenError> {
    let report = flowsmith_core::validate(definition, source, resolver)?;
    if !report.is_ok() {
        debug!(source, diagnostics = report.len(), "definition rejected");
        return Err(CodegenError::Invalid(report));
    }

    let ir = WorkflowIr::build(definition)?;
    let base = base::render(&ir, syntax);
    let implementation = implementation::render(&ir, syntax);
    info!(source, workflow = %ir.name, states = ir.states.len(), "rendered workflow");

    Ok(Compilation {
        ir,
        base,
        implementation,
    })
}

/// [`compile_with`] using the [`Php`] layout.
pub fn compile(
    definition: &Value,
    source: &str,
    resolver: &dyn TypeResolver,
) -> Result<Compilation, CodegenError> {
    compile_with(definition, source, resolver, &Php)
}
