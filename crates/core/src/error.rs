/// A programming-contract violation.
///
/// These are never user-facing diagnostics: they signal that a caller handed
/// the validator something that is not a definition at all, or asked for an
/// IR from a definition that was never validated cleanly.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ContractViolation {
    /// The top-level value is not a JSON object.
    #[error("definition '{source_label}' is not a mapping (found {found})")]
    NotAMapping { source_label: String, found: String },

    /// The IR was requested for a definition that does not have the
    /// structure validation guarantees.
    #[error("definition is not validated: {reason}")]
    Unvalidated { reason: String },
}

impl ContractViolation {
    pub fn unvalidated(reason: impl Into<String>) -> Self {
        ContractViolation::Unvalidated {
            reason: reason.into(),
        }
    }
}

/// Human-readable JSON kind name, used in contract and shape messages.
pub(crate) fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}
