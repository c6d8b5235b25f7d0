use std::collections::HashMap;
use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use lazy_static::lazy_static;
use log::warn;
use thiserror::Error;

// External software
pub const BET_TAG: &str = "bet";
pub const FAST_TAG: &str = "fast";
pub const FIRST_TAG: &str = "run_first_all";
pub const FLIRT_TAG: &str = "flirt";
pub const CONVERT_XFM_TAG: &str = "convert_xfm";
pub const FNIRT_TAG: &str = "fnirt";
pub const APPLYWARP_TAG: &str = "applywarp";
pub const CONVERTWARP_TAG: &str = "convertwarp";
pub const INVWARP_TAG: &str = "invwarp";
pub const EDDY_TAG: &str = "eddy";
pub const EDDY_QUAD_TAG: &str = "eddy_quad";
pub const MELODIC_TAG: &str = "melodic";
pub const CLUSTER_TAG: &str = "cluster";
pub const FLAMEO_TAG: &str = "flameo";
pub const FILMGLS_TAG: &str = "film_gls";
pub const FEAT_TAG: &str = "feat";
pub const EPI_REG_TAG: &str = "epi_reg";
pub const DISTANCEMAP_TAG: &str = "distancemap";

pub const OUTPUT_TYPE_VAR: &str = "FSLOUTPUTTYPE";

lazy_static! {
    /// Minimum FSL release each wrapped executable is known to work with.
    pub static ref TOOL_VERSIONS: HashMap<&'static str, f32> = {
        let mut m = HashMap::new();
        m.insert(BET_TAG, 5.0);
        m.insert(FAST_TAG, 5.0);
        m.insert(FIRST_TAG, 5.0);
        m.insert(FLIRT_TAG, 5.0);
        m.insert(CONVERT_XFM_TAG, 5.0);
        m.insert(FNIRT_TAG, 5.0);
        m.insert(APPLYWARP_TAG, 5.0);
        m.insert(CONVERTWARP_TAG, 5.0);
        m.insert(INVWARP_TAG, 5.0);
        m.insert(EDDY_TAG, 6.0);
        m.insert(EDDY_QUAD_TAG, 6.0);
        m.insert(MELODIC_TAG, 5.0);
        m.insert(CLUSTER_TAG, 5.0);
        m.insert(FLAMEO_TAG, 5.0);
        m.insert(FILMGLS_TAG, 5.0);
        m.insert(FEAT_TAG, 5.0);
        m.insert(EPI_REG_TAG, 5.0);
        m.insert(DISTANCEMAP_TAG, 5.0);

        m
    };
}

/// File type FSL writes its image outputs as, selected process-wide
/// through `FSLOUTPUTTYPE`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputType {
    Nifti,
    NiftiGz,
    NiftiPair,
    NiftiPairGz,
}

impl OutputType {
    pub fn ext(&self) -> &'static str {
        match self {
            OutputType::Nifti => ".nii",
            OutputType::NiftiGz => ".nii.gz",
            OutputType::NiftiPair => ".img",
            OutputType::NiftiPairGz => ".img.gz",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            OutputType::Nifti => "NIFTI",
            OutputType::NiftiGz => "NIFTI_GZ",
            OutputType::NiftiPair => "NIFTI_PAIR",
            OutputType::NiftiPairGz => "NIFTI_PAIR_GZ",
        }
    }

    /// Read the output type from `FSLOUTPUTTYPE`. An unset variable is not an
    /// error: it falls back to NIFTI with a warning. An unrecognised value is.
    pub fn from_env() -> Result<Self, TaskError> {
        Self::from_env_value(env::var(OUTPUT_TYPE_VAR).ok().as_deref())
    }

    fn from_env_value(value: Option<&str>) -> Result<Self, TaskError> {
        match value {
            Some(name) => name.parse(),
            None => {
                warn!("{} environment variable is not set, assuming NIFTI", OUTPUT_TYPE_VAR);
                Ok(OutputType::Nifti)
            }
        }
    }
}

impl FromStr for OutputType {
    type Err = TaskError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "NIFTI" => Ok(OutputType::Nifti),
            "NIFTI_GZ" => Ok(OutputType::NiftiGz),
            "NIFTI_PAIR" => Ok(OutputType::NiftiPair),
            "NIFTI_PAIR_GZ" => Ok(OutputType::NiftiPairGz),
            other => Err(TaskError::InvalidOutputType(other.to_string())),
        }
    }
}

/// Per-invocation settings handed to every output predictor. `output_dir` is
/// the working directory of the task, used to anchor relative paths.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub output_dir: PathBuf,
    pub output_type: OutputType,
}

#[derive(Debug, Error)]
pub enum TaskError {
    #[error("missing mandatory input `{0}`")]
    MissingInput(&'static str),
    #[error("invalid FSLOUTPUTTYPE: {0}")]
    InvalidOutputType(String),
    #[error("cannot derive `{output}`: requires `{requires}` to be set")]
    MissingPrerequisite {
        output: &'static str,
        requires: &'static str,
    },
    #[error("could not locate output directory matching {pattern}")]
    OutputDirNotFound { pattern: String },
    #[error("unable to generate filename for {tool}: basename is not set")]
    EmptyBasename { tool: &'static str },
    #[error("malformed count in design file {path:?}: {line:?}")]
    MalformedDesign { path: PathBuf, line: String },
    #[error("invalid glob pattern {pattern}")]
    Glob {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
