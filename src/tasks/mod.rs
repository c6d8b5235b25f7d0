//! One module per wrapped FSL executable. Each exposes the tool's typed
//! inputs, an `arg_generator` building its command-line argument vector, and
//! a `predict_outputs` computing the artifacts the run will leave behind.

use std::collections::BTreeMap;
use std::fmt::Display;
use std::path::{Path, PathBuf};

pub mod applywarp;
pub mod bet;
pub mod cluster;
pub mod convert_xfm;
pub mod convertwarp;
pub mod distance_map;
pub mod eddy;
pub mod eddy_quad;
pub mod epi_reg;
pub mod fast;
pub mod feat;
pub mod filmgls;
pub mod first;
pub mod flameo;
pub mod flirt;
pub mod fnirt;
pub mod invwarp;
pub mod melodic;

/// Predicted artifacts of one invocation, keyed by logical output name.
/// A key is present exactly when its gating condition held.
pub type Outputs = BTreeMap<&'static str, OutputValue>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputValue {
    Path(PathBuf),
    Paths(Vec<PathBuf>),
    /// The output key applies but the tool was told not to write it
    /// (bet's `-n`). Kept distinct from an absent key on purpose.
    Unset,
}

impl OutputValue {
    pub fn path(&self) -> Option<&Path> {
        match self {
            OutputValue::Path(p) => Some(p),
            _ => None,
        }
    }

    pub fn paths(&self) -> Option<&[PathBuf]> {
        match self {
            OutputValue::Paths(ps) => Some(ps),
            _ => None,
        }
    }

    pub fn is_unset(&self) -> bool {
        matches!(self, OutputValue::Unset)
    }
}

/// How a caller asks for an optional output file: not at all, derived from
/// the tool's input filename, or at an explicit path.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum OutputRequest {
    #[default]
    Skip,
    Derive,
    Explicit(PathBuf),
}

impl OutputRequest {
    pub fn wanted(&self) -> bool {
        !matches!(self, OutputRequest::Skip)
    }
}

pub(crate) fn comma_list<T: Display>(values: &[T]) -> String {
    values
        .iter()
        .map(T::to_string)
        .collect::<Vec<_>>()
        .join(",")
}

pub(crate) fn path_arg(path: &Path) -> String {
    path.to_string_lossy().to_string()
}
