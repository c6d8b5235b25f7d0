//! Filesystem access for the few predictors whose outputs depend on what is
//! already on disk (eddy, eddy_quad, flameo, feat). Everything else stays
//! pure; these take the capability as an argument so tests can fake it.

use std::path::{Path, PathBuf};

use crate::config::defs::TaskError;

pub trait FileQuery {
    fn exists(&self, path: &Path) -> bool;

    /// Expand a glob pattern, returning matches in lexical order.
    fn glob(&self, pattern: &str) -> Result<Vec<PathBuf>, TaskError>;
}

/// The real filesystem.
pub struct LocalFs;

impl FileQuery for LocalFs {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn glob(&self, pattern: &str) -> Result<Vec<PathBuf>, TaskError> {
        let entries = glob::glob(pattern).map_err(|source| TaskError::Glob {
            pattern: pattern.to_string(),
            source,
        })?;
        let mut hits: Vec<PathBuf> = entries.filter_map(Result::ok).collect();
        hits.sort();
        Ok(hits)
    }
}

#[cfg(test)]
pub(crate) struct MemFs {
    files: std::collections::BTreeSet<PathBuf>,
}

#[cfg(test)]
impl MemFs {
    pub(crate) fn new<I, P>(files: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        MemFs {
            files: files.into_iter().map(Into::into).collect(),
        }
    }
}

#[cfg(test)]
impl FileQuery for MemFs {
    fn exists(&self, path: &Path) -> bool {
        self.files.contains(path)
    }

    fn glob(&self, pattern: &str) -> Result<Vec<PathBuf>, TaskError> {
        let compiled = glob::Pattern::new(pattern).map_err(|source| TaskError::Glob {
            pattern: pattern.to_string(),
            source,
        })?;
        Ok(self
            .files
            .iter()
            .filter(|p| compiled.matches_path(p))
            .cloned()
            .collect())
    }
}
