//! `input` and `output` field checks.

use super::imports::check_field_type;
use super::{Imports, LOWER_RULE};
use crate::definition::{DefinitionView, Field, FIELD_INPUT, FIELD_OUTPUT};
use crate::diagnostic::{Diagnostic, Rule};
use crate::grammar;

pub(super) fn validate_input(view: &DefinitionView<'_>, imports: &Imports<'_>) -> Vec<Diagnostic> {
    let Some(input) = &view.input else {
        return Vec::new();
    };
    let mut diags = Vec::new();
    if input.is_empty() {
        diags.push(Diagnostic::new(
            Rule::NoInputFields,
            FIELD_INPUT,
            "no input fields specified",
        ));
    }
    check_fields(input, FIELD_INPUT, Rule::InvalidInputFieldName, imports, &mut diags);
    diags
}

pub(super) fn validate_output(
    view: &DefinitionView<'_>,
    imports: &Imports<'_>,
) -> Vec<Diagnostic> {
    let Some(output) = &view.output else {
        return Vec::new();
    };
    let mut diags = Vec::new();
    if output.len() != 1 {
        diags.push(Diagnostic::new(
            Rule::OutputFieldCount,
            FIELD_OUTPUT,
            format!(
                "there must be exactly one output field, found {}",
                output.len()
            ),
        ));
    }
    check_fields(output, FIELD_OUTPUT, Rule::InvalidOutputFieldName, imports, &mut diags);
    diags
}

fn check_fields(
    fields: &[Field<'_>],
    section: &str,
    name_rule: Rule,
    imports: &Imports<'_>,
    diags: &mut Vec<Diagnostic>,
) {
    for field in fields {
        let path = format!("{}.{}", section, field.name);
        if !grammar::is_lower_identifier(field.name) {
            diags.push(Diagnostic::new(
                name_rule,
                path.as_str(),
                format!("invalid {} field name '{}': {}", section, field.name, LOWER_RULE),
            ));
        }
        diags.extend(check_field_type(imports, field.name, field.ty, &path));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::AnyType;
    use serde_json::json;

    fn run(def: serde_json::Value) -> Vec<Diagnostic> {
        let (view, _) = DefinitionView::read(&def, "f.json").unwrap();
        let (imports, _) = Imports::resolve(view.uses.as_deref(), &AnyType);
        let mut diags = validate_input(&view, &imports);
        diags.extend(validate_output(&view, &imports));
        diags
    }

    #[test]
    fn empty_input_is_reported() {
        let diags = run(json!({"uses": [], "input": {}, "output": {"total": "int"}}));
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].rule, Rule::NoInputFields);
    }

    #[test]
    fn output_count_is_in_the_message() {
        let diags = run(json!({
            "uses": ["App\\Int"],
            "input": {"amount": "Int"},
            "output": {"total": "Int", "fee": "Int"}
        }));
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].rule, Rule::OutputFieldCount);
        assert!(diags[0].message.contains("found 2"));
    }

    #[test]
    fn name_type_and_import_checks() {
        let diags = run(json!({
            "uses": ["App\\Money"],
            "input": {"Amount": "Money", "fee": "fee", "total": "Receipt"},
            "output": {"paid": "bool"}
        }));
        let rules: Vec<Rule> = diags.iter().map(|d| d.rule).collect();
        assert_eq!(
            rules,
            vec![
                Rule::InvalidInputFieldName,
                Rule::InvalidTypeName,
                Rule::ImportMissing
            ]
        );
        assert_eq!(diags[2].path, "input.total");
    }

    #[test]
    fn unions_other_than_trailing_null_are_invalid_types() {
        let diags = run(json!({
            "uses": ["App\\Money"],
            "input": {"amount": "Money|Bogus", "fee": "Money|null"},
            "output": {"paid": "bool"}
        }));
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].rule, Rule::InvalidTypeName);
        assert_eq!(diags[0].path, "input.amount");
    }
}
