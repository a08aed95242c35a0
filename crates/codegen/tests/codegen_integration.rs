//! Integration tests for the full pipeline: definition JSON to rendered
//! stubs.

use flowsmith_codegen::{compile, CodegenError, Placeholder, StubKind, StubSet};
use flowsmith_core::{AnyType, Rule};
use std::fs;
use std::path::Path;

/// Locate the workspace root by walking up from CARGO_MANIFEST_DIR.
fn workspace_root() -> &'static Path {
    let manifest_dir = Path::new(env!("CARGO_MANIFEST_DIR"));
    manifest_dir
        .parent()
        .and_then(|p| p.parent())
        .expect("workspace root")
}

fn read_fixture(rel: &str) -> serde_json::Value {
    let path = workspace_root().join("fixtures").join(rel);
    let content = fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("failed to read fixture '{}': {}", path.display(), e));
    serde_json::from_str(&content)
        .unwrap_or_else(|e| panic!("failed to parse fixture '{}': {}", path.display(), e))
}

#[test]
fn billing_renders_one_operation_and_one_dispatch_function() {
    let def = read_fixture("valid/billing.json");
    let out = compile(&def, "billing.json", &AnyType).expect("compile failed");

    let ops = out.base.get(Placeholder::StateAllAbstractFunction).unwrap();
    assert_eq!(ops.matches("abstract protected function").count(), 1);
    assert!(ops.contains("abstract protected function charge(\n        Int $amount\n    ): Int;"));

    let fns = out.base.get(Placeholder::StateAllFunction).unwrap();
    assert_eq!(fns.matches("private function execute").count(), 1);
    assert!(fns.contains("$this->total = $this->charge("));
    // Terminal-only transition: nothing is dispatched after the operation.
    let tail = &fns[fns.find("throw $exception;").unwrap()..];
    assert!(!tail.contains("$this->execute"));
    assert!(!tail.contains("if ("));
}

#[test]
fn rendered_stubs_have_no_placeholders_left() {
    let def = read_fixture("valid/order.json");
    let out = compile(&def, "order.json", &AnyType).expect("compile failed");
    let stubs = StubSet::embedded();

    let base = out.base.apply(stubs.get(StubKind::Base));
    let code = out.implementation.apply(stubs.get(StubKind::Code));

    for text in [&base, &code] {
        assert!(!text.contains("DefaultWorkflow"), "leftover placeholder in:\n{}", text);
    }
    assert!(base.contains("namespace App\\Workflows\\Order\\Generated\\Workflow;"));
    assert!(base.contains("abstract class WorkflowOrderBase extends Workflow"));
    assert!(base.contains("return $this->invoice;"));
    assert!(code.contains("class WorkflowOrder extends WorkflowOrderBase"));
    assert!(code.contains("use App\\Workflows\\Order\\Generated\\Workflow\\WorkflowOrderBase;"));
    assert!(code.contains("public function execute(\n        Cart $cart,\n        string $coupon = null,\n        bool $express\n    ): Invoice"));
}

#[test]
fn rendering_is_deterministic() {
    let def = read_fixture("valid/order.json");
    let a = compile(&def, "order.json", &AnyType).unwrap();
    let b = compile(&def, "order.json", &AnyType).unwrap();
    assert_eq!(a.base, b.base);
    assert_eq!(a.implementation, b.implementation);
}

#[test]
fn invalid_definition_is_not_rendered() {
    let def = read_fixture("invalid/cycle.json");
    let err = compile(&def, "cycle.json", &AnyType).unwrap_err();
    let report = err.report().expect("expected diagnostics");
    assert_eq!(report.count_rule(Rule::CircularTransition), 1);
    assert!(matches!(err, CodegenError::Invalid(_)));
}

#[test]
fn non_mapping_is_a_contract_error() {
    let err = compile(&serde_json::json!(42), "x.json", &AnyType).unwrap_err();
    assert!(matches!(err, CodegenError::Contract(_)));
}

#[test]
fn stub_overrides_are_used() {
    let dir = tempfile::tempdir().expect("temp dir");
    fs::write(
        dir.path().join("workflow.base.stub"),
        "// DefaultWorkflowNameBase in DefaultWorkflowNameSpace\n",
    )
    .unwrap();
    let stubs = StubSet::with_overrides(dir.path()).unwrap();
    let def = read_fixture("valid/billing.json");
    let out = compile(&def, "billing.json", &AnyType).unwrap();
    assert_eq!(
        out.base.apply(stubs.get(StubKind::Base)),
        "// WorkflowBillingBase in App\\Workflows\\Billing\\Generated\n"
    );
}
