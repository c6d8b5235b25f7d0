//! First-level fMRI analysis driver (`feat`).
//!
//! The analysis directory is whatever the setup file declares, when that
//! directory exists; otherwise the newest-style fallback is a sweep of the
//! run directory for a `.feat` (or `.ica` for MELODIC runs) folder.

use std::path::PathBuf;

use crate::config::defs::{RunConfig, TaskError};
use crate::tasks::{OutputValue, Outputs, path_arg};
use crate::utils::design::read_fsf;
use crate::utils::fsquery::FileQuery;

#[derive(Debug, Clone, Default)]
pub struct FeatInputs {
    /// FEAT setup file, usually `design.fsf`.
    pub fsf_file: Option<PathBuf>,
}

pub fn predict_outputs(
    inputs: &FeatInputs,
    cfg: &RunConfig,
    fs: &dyn FileQuery,
) -> Result<Outputs, TaskError> {
    let fsf_file = inputs
        .fsf_file
        .as_deref()
        .ok_or(TaskError::MissingInput("fsf_file"))?;
    let fsf = read_fsf(fsf_file)?;

    let declared = fsf
        .output_dir
        .as_deref()
        .map(PathBuf::from)
        .filter(|dir| fs.exists(dir));
    let feat_dir = match declared {
        Some(dir) => dir,
        None => {
            let pattern = cfg
                .output_dir
                .join(if fsf.is_ica { "*ica" } else { "*feat" })
                .to_string_lossy()
                .into_owned();
            fs.glob(&pattern)?
                .into_iter()
                .next()
                .ok_or(TaskError::OutputDirNotFound { pattern })?
        }
    };

    let mut outputs = Outputs::new();
    outputs.insert("feat_dir", OutputValue::Path(feat_dir));
    Ok(outputs)
}

pub fn arg_generator(inputs: &FeatInputs, _cfg: &RunConfig) -> Result<Vec<String>, TaskError> {
    let fsf_file = inputs
        .fsf_file
        .as_deref()
        .ok_or(TaskError::MissingInput("fsf_file"))?;
    Ok(vec![path_arg(fsf_file)])
}
