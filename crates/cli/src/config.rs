//! Project configuration for `flowsmith`.
//!
//! Read from `flowsmith.toml` in the working directory, or from the file
//! passed with `--config`. Every key is optional.
//!
//! # Example
//!
//! ```toml
//! workflows_dir = "app/Workflows"
//! stub_dir = "stubs/workflow"
//! namespace_root = "App\\Workflows"
//!
//! [imports]
//! check = true
//! known = ["App\\Models\\Cart"]
//!
//! [imports.autoload]
//! "App\\" = "app"
//! ```
//!
//! Relative paths are resolved against the directory holding the file.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use flowsmith_codegen::StubSet;
use flowsmith_core::{AnyType, AutoloadResolver, KnownTypes, TypeResolver};
use serde::Deserialize;

use crate::error::CliError;

/// File looked up in the working directory when `--config` is absent.
pub(crate) const CONFIG_FILE: &str = "flowsmith.toml";

// ── Types ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub(crate) struct Config {
    /// Folder with one sub-folder per workflow, plus the shared `Common`.
    pub workflows_dir: PathBuf,
    /// Stub files in this directory replace the embedded ones.
    pub stub_dir: Option<PathBuf>,
    /// Namespace new workflows are scaffolded under.
    pub namespace_root: String,
    pub imports: ImportsConfig,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            workflows_dir: PathBuf::from("app/Workflows"),
            stub_dir: None,
            namespace_root: "App\\Workflows".to_owned(),
            imports: ImportsConfig::default(),
        }
    }
}

/// `[imports]`: how imported type names are checked for existence.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub(crate) struct ImportsConfig {
    /// When false every import is assumed to exist.
    pub check: bool,
    /// Fully qualified names that always exist.
    pub known: Vec<String>,
    /// Namespace prefix to source directory.
    pub autoload: BTreeMap<String, PathBuf>,
}

// ── Functions ─────────────────────────────────────────────────────────────────

/// Read and parse a config file, resolving its relative paths against the
/// file's directory.
pub(crate) fn read_config(path: &Path) -> Result<Config, CliError> {
    let content = std::fs::read_to_string(path).map_err(|e| CliError::read(path, e))?;
    let config: Config = toml::from_str(&content).map_err(|source| CliError::Config {
        path: path.to_path_buf(),
        source,
    })?;
    let base = path.parent().unwrap_or_else(|| Path::new(""));
    Ok(config.rebased(base))
}

/// The explicit file if given, otherwise `./flowsmith.toml` if present,
/// otherwise defaults.
pub(crate) fn load(explicit: Option<&Path>) -> Result<Config, CliError> {
    if let Some(path) = explicit {
        return read_config(path);
    }
    let implicit = Path::new(CONFIG_FILE);
    if implicit.is_file() {
        read_config(implicit)
    } else {
        Ok(Config::default())
    }
}

impl Config {
    fn rebased(mut self, base: &Path) -> Self {
        self.workflows_dir = base.join(&self.workflows_dir);
        self.stub_dir = self.stub_dir.map(|d| base.join(d));
        for dir in self.imports.autoload.values_mut() {
            *dir = base.join(&*dir);
        }
        self
    }

    /// The import existence check this configuration asks for.
    pub(crate) fn resolver(&self) -> Box<dyn TypeResolver> {
        if !self.imports.check {
            return Box::new(AnyType);
        }
        let known: KnownTypes = self.imports.known.iter().cloned().collect();
        let autoload = self
            .imports
            .autoload
            .iter()
            .fold(AutoloadResolver::new(), |r, (prefix, dir)| {
                r.with_root(prefix, dir.clone())
            });
        Box::new(move |name: &str| known.type_exists(name) || autoload.type_exists(name))
    }

    pub(crate) fn stubs(&self) -> Result<StubSet, CliError> {
        match &self.stub_dir {
            Some(dir) => Ok(StubSet::with_overrides(dir)?),
            None => Ok(StubSet::embedded()),
        }
    }
}
