//! On-disk layout of a workflows directory.
//!
//! ```text
//! <workflows_dir>/
//!   Common/Workflow.php
//!   Billing/
//!     Definition/Billing.json
//!     Code/WorkflowBilling.php
//!     Generated/WorkflowBillingBase.php
//! ```

use std::path::{Path, PathBuf};

use crate::error::CliError;

pub(crate) const COMMON_DIR: &str = "Common";
pub(crate) const DEFINITION_DIR: &str = "Definition";
pub(crate) const CODE_DIR: &str = "Code";
pub(crate) const GENERATED_DIR: &str = "Generated";

/// Extension of generated source files.
pub(crate) const SOURCE_EXTENSION: &str = "php";

pub(crate) struct Layout<'a> {
    root: &'a Path,
}

impl<'a> Layout<'a> {
    pub(crate) fn new(root: &'a Path) -> Self {
        Layout { root }
    }

    pub(crate) fn root(&self) -> &Path {
        self.root
    }

    pub(crate) fn workflow_dir(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }

    pub(crate) fn definition_dir(&self, name: &str) -> PathBuf {
        self.workflow_dir(name).join(DEFINITION_DIR)
    }

    pub(crate) fn definition_file(&self, name: &str) -> PathBuf {
        self.definition_dir(name).join(format!("{}.json", name))
    }

    pub(crate) fn code_file(&self, workflow: &str, class: &str) -> PathBuf {
        self.workflow_dir(workflow)
            .join(CODE_DIR)
            .join(source_file(class))
    }

    pub(crate) fn generated_file(&self, workflow: &str, class: &str) -> PathBuf {
        self.workflow_dir(workflow)
            .join(GENERATED_DIR)
            .join(source_file(class))
    }

    pub(crate) fn common_file(&self) -> PathBuf {
        self.root.join(COMMON_DIR).join(source_file("Workflow"))
    }

    /// Workflow folder names, sorted, `Common` and plain files excluded.
    pub(crate) fn workflows(&self) -> Result<Vec<String>, CliError> {
        let mut names = Vec::new();
        for entry in read_dir(self.root)? {
            if !entry.is_dir() {
                continue;
            }
            let Some(name) = entry.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            if name == COMMON_DIR || name.starts_with('.') {
                continue;
            }
            names.push(name.to_owned());
        }
        Ok(names)
    }

    /// Files in a workflow's `Definition` folder, sorted, hidden files
    /// excluded. A missing folder yields no files.
    pub(crate) fn definition_files(&self, name: &str) -> Result<Vec<PathBuf>, CliError> {
        let dir = self.definition_dir(name);
        if !dir.is_dir() {
            return Ok(Vec::new());
        }
        Ok(read_dir(&dir)?
            .into_iter()
            .filter(|p| p.is_file())
            .filter(|p| {
                p.file_name()
                    .and_then(|n| n.to_str())
                    .is_some_and(|n| !n.starts_with('.'))
            })
            .collect())
    }
}

fn source_file(class: &str) -> String {
    format!("{}.{}", class, SOURCE_EXTENSION)
}

fn read_dir(dir: &Path) -> Result<Vec<PathBuf>, CliError> {
    let entries = std::fs::read_dir(dir).map_err(|e| CliError::read(dir, e))?;
    let mut paths = Vec::new();
    for entry in entries {
        paths.push(entry.map_err(|e| CliError::read(dir, e))?.path());
    }
    paths.sort();
    Ok(paths)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn paths_follow_the_folder_convention() {
        let layout = Layout::new(Path::new("app/Workflows"));
        assert_eq!(
            layout.definition_file("Billing"),
            PathBuf::from("app/Workflows/Billing/Definition/Billing.json")
        );
        assert_eq!(
            layout.generated_file("Billing", "WorkflowBillingBase"),
            PathBuf::from("app/Workflows/Billing/Generated/WorkflowBillingBase.php")
        );
        assert_eq!(
            layout.code_file("Billing", "WorkflowBilling"),
            PathBuf::from("app/Workflows/Billing/Code/WorkflowBilling.php")
        );
        assert_eq!(
            layout.common_file(),
            PathBuf::from("app/Workflows/Common/Workflow.php")
        );
    }

    #[test]
    fn workflows_skip_common_and_files() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["Shipping", "Billing", "Common", ".cache"] {
            fs::create_dir(dir.path().join(name)).unwrap();
        }
        fs::write(dir.path().join("README.md"), "").unwrap();

        let layout = Layout::new(dir.path());
        assert_eq!(layout.workflows().unwrap(), vec!["Billing", "Shipping"]);
    }

    #[test]
    fn definition_files_are_sorted() {
        let dir = tempfile::tempdir().unwrap();
        let layout = Layout::new(dir.path());
        assert!(layout.definition_files("Billing").unwrap().is_empty());

        let defs = layout.definition_dir("Billing");
        fs::create_dir_all(&defs).unwrap();
        for name in ["b.json", "a.json", ".DS_Store"] {
            fs::write(defs.join(name), "{}").unwrap();
        }
        let files = layout.definition_files("Billing").unwrap();
        assert_eq!(files, vec![defs.join("a.json"), defs.join("b.json")]);
    }
}
