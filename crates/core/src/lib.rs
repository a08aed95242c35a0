//! flowsmith-core: workflow definition validator and IR builder.
//!
//! Takes an already-decoded JSON workflow definition and turns it into
//! either a list of diagnostics or a verified [`WorkflowIr`] that the
//! code generator can render.
//!
//! # Public API
//!
//! - [`validate()`] -- run every semantic check and collect diagnostics
//! - [`WorkflowIr`] -- the verified state graph (built only after validation)
//! - [`FieldEnv`] / [`PossibleInputs`] -- field name to declared type maps
//! - [`TypeResolver`] -- injected "does this imported type exist" predicate
//! - [`Diagnostic`] / [`ValidationReport`] -- validator output
//! - [`ContractViolation`] -- hard error for programming-contract violations
//!
//! Field grammar predicates live in [`grammar`].

/// Reserved transition target that ends execution.
pub const TERMINAL_STATE: &str = "End";

pub mod definition;
pub mod diagnostic;
pub mod env;
pub mod error;
pub mod grammar;
pub mod ir;
pub mod resolver;
pub mod validate;

// ── Convenience re-exports: key types ────────────────────────────────

pub use diagnostic::{Diagnostic, DiagnosticKind, Rule, ValidationReport};
pub use env::{FieldBinding, FieldEnv, PossibleInputs, TypeConflict};
pub use error::ContractViolation;
pub use ir::{FieldDecl, StateIr, Transition, TransitionTarget, WorkflowIr};
pub use resolver::{AnyType, AutoloadResolver, KnownTypes, TypeResolver};

// ── Convenience re-exports: entry points ─────────────────────────────

pub use validate::validate;
