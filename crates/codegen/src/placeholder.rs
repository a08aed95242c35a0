//! Placeholder names and the rendered placeholder map.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// A fixed placeholder name that appears verbatim in a stub file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Placeholder {
    #[serde(rename = "DefaultWorkflowNameSpace")]
    NameSpace,
    #[serde(rename = "DefaultWorkflowAllImport")]
    AllImport,
    #[serde(rename = "DefaultWorkflowName")]
    Name,
    #[serde(rename = "DefaultWorkflowNameBase")]
    NameBase,
    #[serde(rename = "DefaultWorkflowAllFieldConstant")]
    AllFieldConstant,
    #[serde(rename = "DefaultWorkflowAllFieldVariable")]
    AllFieldVariable,
    #[serde(rename = "DefaultWorkflowAllInputParameterArray")]
    AllInputParameterArray,
    #[serde(rename = "DefaultWorkflowInputSetAllProperty")]
    InputSetAllProperty,
    #[serde(rename = "DefaultWorkflowExecuteStartState")]
    ExecuteStartState,
    #[serde(rename = "DefaultWorkflowStateAllAbstractFunction")]
    StateAllAbstractFunction,
    #[serde(rename = "DefaultWorkflowStateAllFunction")]
    StateAllFunction,
    #[serde(rename = "DefaultWorkflowOutputName")]
    OutputName,
    #[serde(rename = "DefaultWorkflowExecuteDocBlock")]
    ExecuteDocBlock,
    #[serde(rename = "DefaultWorkflowAllInputParameter")]
    AllInputParameter,
    #[serde(rename = "DefaultWorkflowOutputType")]
    OutputType,
    #[serde(rename = "DefaultWorkflowAllInputData")]
    AllInputData,
}

impl Placeholder {
    pub fn as_str(self) -> &'static str {
        match self {
            Placeholder::NameSpace => "DefaultWorkflowNameSpace",
            Placeholder::AllImport => "DefaultWorkflowAllImport",
            Placeholder::Name => "DefaultWorkflowName",
            Placeholder::NameBase => "DefaultWorkflowNameBase",
            Placeholder::AllFieldConstant => "DefaultWorkflowAllFieldConstant",
            Placeholder::AllFieldVariable => "DefaultWorkflowAllFieldVariable",
            Placeholder::AllInputParameterArray => "DefaultWorkflowAllInputParameterArray",
            Placeholder::InputSetAllProperty => "DefaultWorkflowInputSetAllProperty",
            Placeholder::ExecuteStartState => "DefaultWorkflowExecuteStartState",
            Placeholder::StateAllAbstractFunction => "DefaultWorkflowStateAllAbstractFunction",
            Placeholder::StateAllFunction => "DefaultWorkflowStateAllFunction",
            Placeholder::OutputName => "DefaultWorkflowOutputName",
            Placeholder::ExecuteDocBlock => "DefaultWorkflowExecuteDocBlock",
            Placeholder::AllInputParameter => "DefaultWorkflowAllInputParameter",
            Placeholder::OutputType => "DefaultWorkflowOutputType",
            Placeholder::AllInputData => "DefaultWorkflowAllInputData",
        }
    }
}

impl fmt::Display for Placeholder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which generated artifact a placeholder map belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Artifact {
    /// Abstract orchestration class, regenerated every run.
    Base,
    /// Concrete class the user fills in, written once.
    Implementation,
}

/// Rendered text for every placeholder of one artifact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rendered {
    pub artifact: Artifact,
    pub blocks: BTreeMap<Placeholder, String>,
}

impl Rendered {
    pub fn new(artifact: Artifact) -> Self {
        Rendered {
            artifact,
            blocks: BTreeMap::new(),
        }
    }

    pub fn insert(&mut self, placeholder: Placeholder, text: impl Into<String>) {
        self.blocks.insert(placeholder, text.into());
    }

    pub fn get(&self, placeholder: Placeholder) -> Option<&str> {
        self.blocks.get(&placeholder).map(String::as_str)
    }

    /// Lay the blocks into `template`.
    pub fn apply(&self, template: &str) -> String {
        crate::stub::substitute(
            template,
            self.blocks.iter().map(|(p, text)| (p.as_str(), text.as_str())),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serde_names_match_stub_names() {
        for p in [
            Placeholder::NameSpace,
            Placeholder::Name,
            Placeholder::NameBase,
            Placeholder::AllInputParameterArray,
            Placeholder::AllInputData,
        ] {
            assert_eq!(serde_json::to_value(p).unwrap(), serde_json::json!(p.as_str()));
        }
    }

    #[test]
    fn rendered_serializes_as_placeholder_map() {
        let mut rendered = Rendered::new(Artifact::Base);
        rendered.insert(Placeholder::OutputName, "total;");
        let json = serde_json::to_value(&rendered).unwrap();
        assert_eq!(json["artifact"], "base");
        assert_eq!(json["blocks"]["DefaultWorkflowOutputName"], "total;");
    }
}
