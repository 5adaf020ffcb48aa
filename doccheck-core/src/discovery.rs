//! Model directory discovery and `--model-path-filter` construction.

use std::fmt;
use std::path::{Component, Path, PathBuf};

use crate::error::Result;
use crate::fs::FileSystem;

/// Flag passed to `dbt-coverage` once per model directory.
pub const MODEL_PATH_FILTER_FLAG: &str = "--model-path-filter";

/// List the directories one level below `root`, sorted and deduplicated.
pub fn discover_model_paths<F: FileSystem + ?Sized>(fs: &F, root: &Path) -> Result<Vec<PathBuf>> {
    let mut paths = fs.list_dirs(root)?;
    paths.sort();
    paths.dedup();
    log::debug!(
        "discovered {} model path(s) under {}",
        paths.len(),
        root.display()
    );
    Ok(paths)
}

/// Model path filters for a coverage tool invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterArgs {
    paths: Vec<String>,
}

impl FilterArgs {
    /// Relative model paths, in discovery order.
    pub fn paths(&self) -> &[String] {
        &self.paths
    }

    /// Whether no filter was built.
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    /// Argument tokens, two per path.
    pub fn tokens(&self) -> Vec<String> {
        self.paths
            .iter()
            .flat_map(|path| [MODEL_PATH_FILTER_FLAG.to_string(), path.clone()])
            .collect()
    }
}

impl fmt::Display for FilterArgs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.tokens().join(" "))
    }
}

/// Build filter arguments from discovered paths, dropping any `./` prefix.
pub fn build_filter_args(paths: &[PathBuf]) -> FilterArgs {
    let paths = paths
        .iter()
        .map(|path| relative_display(path))
        .filter(|path| !path.is_empty())
        .collect();
    FilterArgs { paths }
}

fn relative_display(path: &Path) -> String {
    let stripped: PathBuf = path
        .components()
        .skip_while(|component| matches!(component, Component::CurDir))
        .collect();
    stripped.to_string_lossy().into_owned()
}
