use super::UPPER_RULE;
use crate::definition::{DefinitionView, FIELD_NAME, FIELD_START_STATE};
use crate::diagnostic::{Diagnostic, Rule};
use crate::grammar;

/// `name` and `startState` grammar.
pub(super) fn validate_names(view: &DefinitionView<'_>) -> Vec<Diagnostic> {
    let mut diags = Vec::new();

    if let Some(name) = view.name {
        if !grammar::is_upper_identifier(name) {
            diags.push(Diagnostic::new(
                Rule::InvalidDefinitionName,
                FIELD_NAME,
                format!("invalid definition name '{}': {}", name, UPPER_RULE),
            ));
        }
    }

    if let Some(start) = view.start_state {
        if !grammar::is_upper_identifier(start) {
            diags.push(Diagnostic::new(
                Rule::InvalidStartStateName,
                FIELD_START_STATE,
                format!("invalid start state name '{}': {}", start, UPPER_RULE),
            ));
        }
    }

    diags
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn lowercase_names_are_rejected() {
        let def = json!({"name": "billing", "startState": "charge"});
        let (view, _) = DefinitionView::read(&def, "h.json").unwrap();
        let rules: Vec<Rule> = validate_names(&view).iter().map(|d| d.rule).collect();
        assert_eq!(
            rules,
            vec![Rule::InvalidDefinitionName, Rule::InvalidStartStateName]
        );
    }

    #[test]
    fn missing_names_are_skipped() {
        let doc = json!({});
        let (view, _) = DefinitionView::read(&doc, "h.json").unwrap();
        assert!(validate_names(&view).is_empty());
    }
}
