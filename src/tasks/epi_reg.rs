//! EPI to structural registration script (`epi_reg`).

use std::path::PathBuf;

use crate::config::defs::{RunConfig, TaskError};
use crate::tasks::{OutputValue, Outputs, path_arg};

#[derive(Debug, Clone, Default)]
pub struct EpiRegInputs {
    pub epi: Option<PathBuf>,
    pub t1_head: Option<PathBuf>,
    pub t1_brain: Option<PathBuf>,
    pub out_base: Option<String>,
    pub fmap: Option<PathBuf>,
    pub fmapmag: Option<PathBuf>,
    pub fmapmagbrain: Option<PathBuf>,
    pub echospacing: Option<f64>,
    pub pedir: Option<String>,
    pub no_clean: bool,
    pub no_fmapreg: bool,
    /// Supplying a segmentation skips the internal fast run.
    pub wmseg: Option<PathBuf>,
}

/// Fieldmap-chain artifacts, present when a fieldmap is registered.
const FMAP_OUTPUTS: &[(&str, &str)] = &[
    ("out_1vol", "_1vol.nii.gz"),
    ("fmap2str_mat", "_fieldmap2str.mat"),
    ("fmap2epi_mat", "_fieldmaprads2epi.mat"),
    ("fmap_epi", "_fieldmaprads2epi.nii.gz"),
    ("fmap_str", "_fieldmaprads2str.nii.gz"),
    ("fmapmag_str", "_fieldmap2str.nii.gz"),
    ("shiftmap", "_fieldmaprads2epi_shift.nii.gz"),
    ("fullwarp", "_warp.nii.gz"),
    ("epi2str_inv", "_inv.mat"),
];

pub fn predict_outputs(inputs: &EpiRegInputs, cfg: &RunConfig) -> Result<Outputs, TaskError> {
    let base = inputs.out_base.as_deref().unwrap_or("epi2struct");
    let under = |tail: &str| cfg.output_dir.join(format!("{base}{tail}"));

    let mut outputs = Outputs::new();
    outputs.insert("out_file", OutputValue::Path(under(".nii.gz")));
    outputs.insert("epi2str_mat", OutputValue::Path(under(".mat")));
    if inputs.fmap.is_some() && !inputs.no_fmapreg {
        for &(name, tail) in FMAP_OUTPUTS {
            outputs.insert(name, OutputValue::Path(under(tail)));
        }
    }
    if inputs.wmseg.is_none() {
        outputs.insert("wmedge", OutputValue::Path(under("_fast_wmedge.nii.gz")));
        outputs.insert("wmseg", OutputValue::Path(under("_fast_wmseg.nii.gz")));
        outputs.insert("seg", OutputValue::Path(under("_fast_seg.nii.gz")));
    }
    Ok(outputs)
}

pub fn arg_generator(inputs: &EpiRegInputs, _cfg: &RunConfig) -> Result<Vec<String>, TaskError> {
    let epi = inputs.epi.as_deref().ok_or(TaskError::MissingInput("epi"))?;
    let t1_head = inputs
        .t1_head
        .as_deref()
        .ok_or(TaskError::MissingInput("t1_head"))?;
    let t1_brain = inputs
        .t1_brain
        .as_deref()
        .ok_or(TaskError::MissingInput("t1_brain"))?;

    let mut args_vec: Vec<String> = Vec::new();
    args_vec.push(format!("--epi={}", path_arg(epi)));
    args_vec.push(format!("--t1={}", path_arg(t1_head)));
    args_vec.push(format!("--t1brain={}", path_arg(t1_brain)));
    args_vec.push(format!("--out={}", inputs.out_base.as_deref().unwrap_or("epi2struct")));
    if let Some(fmap) = &inputs.fmap {
        args_vec.push(format!("--fmap={}", path_arg(fmap)));
    }
    if let Some(fmapmag) = &inputs.fmapmag {
        args_vec.push(format!("--fmapmag={}", path_arg(fmapmag)));
    }
    if let Some(fmapmagbrain) = &inputs.fmapmagbrain {
        args_vec.push(format!("--fmapmagbrain={}", path_arg(fmapmagbrain)));
    }
    if let Some(echospacing) = inputs.echospacing {
        args_vec.push(format!("--echospacing={echospacing}"));
    }
    if let Some(pedir) = &inputs.pedir {
        args_vec.push(format!("--pedir={pedir}"));
    }
    if let Some(wmseg) = &inputs.wmseg {
        args_vec.push(format!("--wmseg={}", path_arg(wmseg)));
    }
    if inputs.no_clean {
        args_vec.push("--noclean".to_string());
    }
    if inputs.no_fmapreg {
        args_vec.push("--nofmapreg".to_string());
    }
    Ok(args_vec)
}
