//! Type resolver abstraction for host-independent import checking.
//!
//! The validator never looks at the host environment itself. Whether an
//! imported, fully-qualified type name exists is answered by a
//! [`TypeResolver`] supplied by the caller, which keeps validation
//! deterministic. [`AutoloadResolver`] maps namespace prefixes onto source
//! directories; [`KnownTypes`] and [`AnyType`] work without a filesystem.

use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};

/// Answers "does a type with this fully-qualified name exist".
///
/// Implementations must be deterministic and reentrant; the validator calls
/// `type_exists` at most once per distinct import in a single run.
pub trait TypeResolver: Send + Sync {
    fn type_exists(&self, qualified_name: &str) -> bool;
}

impl<F> TypeResolver for F
where
    F: Fn(&str) -> bool + Send + Sync,
{
    fn type_exists(&self, qualified_name: &str) -> bool {
        self(qualified_name)
    }
}

/// Accepts every import. Used when import checking is switched off.
#[derive(Debug, Clone, Copy, Default)]
pub struct AnyType;

impl TypeResolver for AnyType {
    fn type_exists(&self, _qualified_name: &str) -> bool {
        true
    }
}

/// An explicit set of known fully-qualified type names.
#[derive(Debug, Clone, Default)]
pub struct KnownTypes {
    names: HashSet<String>,
}

impl KnownTypes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, qualified_name: impl Into<String>) {
        self.names.insert(normalize(&qualified_name.into()));
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for KnownTypes {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut known = KnownTypes::new();
        for name in iter {
            known.insert(name);
        }
        known
    }
}

impl TypeResolver for KnownTypes {
    fn type_exists(&self, qualified_name: &str) -> bool {
        self.names.contains(normalize(qualified_name).as_str())
    }
}

/// Prefix-to-directory autoload mapping.
///
/// `App\Models\Invoice` with the mapping `App\ -> src/app` resolves to
/// `src/app/Models/Invoice.php`. The longest matching prefix wins.
#[derive(Debug, Clone, Default)]
pub struct AutoloadResolver {
    roots: BTreeMap<String, PathBuf>,
    extension: String,
}

impl AutoloadResolver {
    pub fn new() -> Self {
        AutoloadResolver {
            roots: BTreeMap::new(),
            extension: "php".to_owned(),
        }
    }

    /// Register a namespace prefix (e.g. `App\`) rooted at `dir`.
    pub fn with_root(mut self, prefix: &str, dir: impl Into<PathBuf>) -> Self {
        let prefix = normalize(prefix).trim_end_matches('\\').to_owned();
        self.roots.insert(prefix, dir.into());
        self
    }

    pub fn with_extension(mut self, extension: &str) -> Self {
        self.extension = extension.trim_start_matches('.').to_owned();
        self
    }

    /// The file a qualified name maps to, if any prefix matches.
    pub fn candidate_path(&self, qualified_name: &str) -> Option<PathBuf> {
        let name = normalize(qualified_name);
        let (prefix, root) = self
            .roots
            .iter()
            .filter(|(prefix, _)| {
                prefix.is_empty()
                    || name == **prefix
                    || name.starts_with(&format!("{}\\", prefix))
            })
            .max_by_key(|(prefix, _)| prefix.len())?;

        let rest = name[prefix.len()..].trim_start_matches('\\');
        if rest.is_empty() {
            return None;
        }
        let mut path = root.clone();
        for segment in rest.split('\\') {
            path.push(segment);
        }
        path.set_extension(&self.extension);
        Some(path)
    }

    pub fn roots(&self) -> impl Iterator<Item = (&str, &Path)> {
        self.roots.iter().map(|(p, d)| (p.as_str(), d.as_path()))
    }
}

impl TypeResolver for AutoloadResolver {
    fn type_exists(&self, qualified_name: &str) -> bool {
        self.candidate_path(qualified_name)
            .is_some_and(|path| path.is_file())
    }
}

/// Imports may be written with a leading `\`; compare without it.
fn normalize(qualified_name: &str) -> String {
    qualified_name.trim().trim_start_matches('\\').to_owned()
}
