//! Stub templates and placeholder substitution.

use crate::error::CodegenError;
use std::path::Path;

/// The stub files the generator knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StubKind {
    Base,
    Code,
    Common,
    Definition,
}

impl StubKind {
    pub const ALL: [StubKind; 4] = [
        StubKind::Base,
        StubKind::Code,
        StubKind::Common,
        StubKind::Definition,
    ];

    pub fn file_name(self) -> &'static str {
        match self {
            StubKind::Base => "workflow.base.stub",
            StubKind::Code => "workflow.code.stub",
            StubKind::Common => "workflow.common.stub",
            StubKind::Definition => "workflow.definition.simple.stub",
        }
    }

    fn embedded(self) -> &'static str {
        match self {
            StubKind::Base => include_str!("../stubs/workflow.base.stub"),
            StubKind::Code => include_str!("../stubs/workflow.code.stub"),
            StubKind::Common => include_str!("../stubs/workflow.common.stub"),
            StubKind::Definition => include_str!("../stubs/workflow.definition.simple.stub"),
        }
    }
}

/// Placeholder names in the definition stub used by scaffolding.
pub const DEFINITION_NAME: &str = "WorkflowName";
pub const DEFINITION_NAMESPACE: &str = "WorkflowNameSpace";
pub const DEFINITION_START_STATE: &str = "WorkflowStartState";

/// One template per [`StubKind`]; embedded unless overridden from disk.
#[derive(Debug, Clone)]
pub struct StubSet {
    base: String,
    code: String,
    common: String,
    definition: String,
}

impl Default for StubSet {
    fn default() -> Self {
        Self::embedded()
    }
}

impl StubSet {
    pub fn embedded() -> Self {
        StubSet {
            base: StubKind::Base.embedded().to_owned(),
            code: StubKind::Code.embedded().to_owned(),
            common: StubKind::Common.embedded().to_owned(),
            definition: StubKind::Definition.embedded().to_owned(),
        }
    }

    /// Embedded stubs with any file present in `dir` taking precedence.
    pub fn with_overrides(dir: &Path) -> Result<Self, CodegenError> {
        let mut stubs = Self::embedded();
        for kind in StubKind::ALL {
            let path = dir.join(kind.file_name());
            if !path.is_file() {
                continue;
            }
            let text = std::fs::read_to_string(&path).map_err(|source| CodegenError::Io {
                path: path.clone(),
                source,
            })?;
            tracing::debug!(stub = kind.file_name(), path = %path.display(), "stub overridden");
            *stubs.slot_mut(kind) = text;
        }
        Ok(stubs)
    }

    pub fn get(&self, kind: StubKind) -> &str {
        match kind {
            StubKind::Base => &self.base,
            StubKind::Code => &self.code,
            StubKind::Common => &self.common,
            StubKind::Definition => &self.definition,
        }
    }

    fn slot_mut(&mut self, kind: StubKind) -> &mut String {
        match kind {
            StubKind::Base => &mut self.base,
            StubKind::Code => &mut self.code,
            StubKind::Common => &mut self.common,
            StubKind::Definition => &mut self.definition,
        }
    }
}

/// Replace every occurrence of each name with its text in one left-to-right
/// pass. Where several names match at the same position the longest wins,
/// so `DefaultWorkflowName` never eats the front of `DefaultWorkflowNameBase`.
/// Inserted text is not rescanned.
pub fn substitute<'a, I>(template: &str, replacements: I) -> String
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    let mut pairs: Vec<(&str, &str)> = replacements
        .into_iter()
        .filter(|(name, _)| !name.is_empty())
        .collect();
    pairs.sort_by(|a, b| b.0.len().cmp(&a.0.len()));

    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(ch) = rest.chars().next() {
        match pairs.iter().find(|(name, _)| rest.starts_with(name)) {
            Some((name, text)) => {
                out.push_str(text);
                rest = &rest[name.len()..];
            }
            None => {
                out.push(ch);
                rest = &rest[ch.len_utf8()..];
            }
        }
    }
    out
}
