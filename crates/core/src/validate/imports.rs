//! Import existence and import coverage of declared types.

use crate::definition::FIELD_USES;
use crate::diagnostic::{Diagnostic, Rule};
use crate::grammar;
use crate::resolver::TypeResolver;
use std::collections::HashSet;

/// Short names made available by `uses`.
///
/// When `uses` itself is missing or mistyped, coverage is unknown and every
/// type counts as imported so that one structural defect does not fan out
/// into an import diagnostic per field.
pub(crate) struct Imports<'a> {
    short_names: Option<HashSet<&'a str>>,
}

impl<'a> Imports<'a> {
    /// Query the resolver once per distinct import, in declaration order.
    pub(crate) fn resolve(
        uses: Option<&[&'a str]>,
        resolver: &dyn TypeResolver,
    ) -> (Self, Vec<Diagnostic>) {
        let Some(uses) = uses else {
            return (Imports { short_names: None }, Vec::new());
        };

        let mut diags = Vec::new();
        let mut seen: HashSet<&str> = HashSet::new();
        for (i, &import) in uses.iter().enumerate() {
            if !seen.insert(import) {
                continue;
            }
            if !resolver.type_exists(import) {
                diags.push(Diagnostic::new(
                    Rule::ImportNotFound,
                    format!("{}[{}]", FIELD_USES, i),
                    format!("type does not exist for import '{}'", import),
                ));
            }
        }

        let short_names = uses.iter().map(|&u| grammar::import_short_name(u)).collect();
        (
            Imports {
                short_names: Some(short_names),
            },
            diags,
        )
    }

    /// True when `ty` is primitive or some import's last segment matches its
    /// element type.
    pub(crate) fn covers(&self, ty: &str) -> bool {
        if grammar::is_primitive(ty) {
            return true;
        }
        match &self.short_names {
            Some(names) => names.contains(grammar::element_type(ty)),
            None => true,
        }
    }
}

/// Type grammar then import coverage for one declared field. An invalid
/// type is not checked for an import.
pub(super) fn check_field_type(
    imports: &Imports<'_>,
    name: &str,
    ty: &str,
    path: &str,
) -> Option<Diagnostic> {
    if !grammar::is_valid_type(ty) {
        return Some(Diagnostic::new(
            Rule::InvalidTypeName,
            path,
            format!(
                "invalid type name '{}' for field '{}': {}",
                ty,
                name,
                super::UPPER_RULE
            ),
        ));
    }
    if !imports.covers(ty) {
        return Some(Diagnostic::new(
            Rule::ImportMissing,
            path,
            format!("import is missing for field '{}' of type '{}'", name, ty),
        ));
    }
    None
}
