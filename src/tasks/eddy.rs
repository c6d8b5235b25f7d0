//! Eddy-current and movement correction for diffusion data (`eddy`).
//!
//! Which report files eddy writes varies with its release, so everything
//! beyond the corrected image and the motion parameters is only reported
//! when it is actually on disk.

use std::path::{Path, PathBuf};

use crate::config::defs::{RunConfig, TaskError};
use crate::tasks::{OutputValue, Outputs, path_arg};
use crate::utils::file::resolve_under;
use crate::utils::fsquery::FileQuery;

#[derive(Debug, Clone, Default)]
pub struct EddyInputs {
    pub in_file: Option<PathBuf>,
    pub in_mask: Option<PathBuf>,
    pub in_index: Option<PathBuf>,
    pub in_acqp: Option<PathBuf>,
    pub in_bvec: Option<PathBuf>,
    pub in_bval: Option<PathBuf>,
    /// Basename every output hangs off; `--out`.
    pub out_base: Option<PathBuf>,
    pub session: Option<PathBuf>,
    pub repol: bool,
    pub cnr_maps: bool,
    pub residuals: bool,
    pub mporder: Option<u32>,
    pub flm: Option<String>,
    pub fwhm: Option<f64>,
    pub niter: Option<u32>,
}

/// Outputs gated purely on what the installed eddy release left behind.
const VERSIONED_OUTPUTS: &[(&str, &str)] = &[
    ("out_rotated_bvecs", ".eddy_rotated_bvecs"),
    ("out_movement_rms", ".eddy_movement_rms"),
    ("out_restricted_movement_rms", ".eddy_restricted_movement_rms"),
    ("out_shell_alignment_parameters", ".eddy_post_eddy_shell_alignment_parameters"),
    ("out_shell_pe_translation_parameters", ".eddy_post_eddy_shell_PE_translation_parameters"),
    ("out_outlier_map", ".eddy_outlier_map"),
    ("out_outlier_n_stdev_map", ".eddy_outlier_n_stdev_map"),
    ("out_outlier_n_sqr_stdev_map", ".eddy_outlier_n_sqr_stdev_map"),
    ("out_outlier_report", ".eddy_outlier_report"),
];

pub fn predict_outputs(
    inputs: &EddyInputs,
    cfg: &RunConfig,
    fs: &dyn FileQuery,
) -> Result<Outputs, TaskError> {
    let out_base = resolve_under(
        inputs.out_base.as_deref().unwrap_or(Path::new("eddy_corrected")),
        &cfg.output_dir,
    );
    let base = out_base.to_string_lossy();
    let named = |tail: &str| PathBuf::from(format!("{base}{tail}"));

    let mut outputs = Outputs::new();
    outputs.insert("out_corrected", OutputValue::Path(named(".nii.gz")));
    outputs.insert("out_parameter", OutputValue::Path(named(".eddy_parameters")));

    if inputs.repol {
        let outlier_free = named(".eddy_outlier_free_data");
        if fs.exists(&outlier_free) {
            outputs.insert("out_outlier_free", OutputValue::Path(outlier_free));
        }
    }
    if inputs.mporder.unwrap_or(0) > 0 {
        let over_time = named(".eddy_movement_over_time");
        if fs.exists(&over_time) {
            outputs.insert("out_movement_over_time", OutputValue::Path(over_time));
        }
    }
    if inputs.cnr_maps {
        let cnr = named(".eddy_cnr_maps.nii.gz");
        if fs.exists(&cnr) {
            outputs.insert("out_cnr_maps", OutputValue::Path(cnr));
        }
    }
    if inputs.residuals {
        let residuals = named(".eddy_residuals.nii.gz");
        if fs.exists(&residuals) {
            outputs.insert("out_residuals", OutputValue::Path(residuals));
        }
    }
    for &(name, tail) in VERSIONED_OUTPUTS {
        let path = named(tail);
        if fs.exists(&path) {
            outputs.insert(name, OutputValue::Path(path));
        }
    }
    Ok(outputs)
}

pub fn arg_generator(inputs: &EddyInputs, cfg: &RunConfig) -> Result<Vec<String>, TaskError> {
    let in_file = inputs.in_file.as_deref().ok_or(TaskError::MissingInput("in_file"))?;
    let in_mask = inputs.in_mask.as_deref().ok_or(TaskError::MissingInput("in_mask"))?;
    let in_index = inputs.in_index.as_deref().ok_or(TaskError::MissingInput("in_index"))?;
    let in_acqp = inputs.in_acqp.as_deref().ok_or(TaskError::MissingInput("in_acqp"))?;
    let in_bvec = inputs.in_bvec.as_deref().ok_or(TaskError::MissingInput("in_bvec"))?;
    let in_bval = inputs.in_bval.as_deref().ok_or(TaskError::MissingInput("in_bval"))?;
    let out_base = resolve_under(
        inputs.out_base.as_deref().unwrap_or(Path::new("eddy_corrected")),
        &cfg.output_dir,
    );

    let mut args_vec: Vec<String> = Vec::new();
    args_vec.push(format!("--imain={}", path_arg(in_file)));
    args_vec.push(format!("--mask={}", path_arg(in_mask)));
    args_vec.push(format!("--index={}", path_arg(in_index)));
    args_vec.push(format!("--acqp={}", path_arg(in_acqp)));
    args_vec.push(format!("--bvecs={}", path_arg(in_bvec)));
    args_vec.push(format!("--bvals={}", path_arg(in_bval)));
    args_vec.push(format!("--out={}", out_base.display()));
    if let Some(session) = &inputs.session {
        args_vec.push(format!("--session={}", path_arg(session)));
    }
    if let Some(flm) = &inputs.flm {
        args_vec.push(format!("--flm={flm}"));
    }
    if let Some(fwhm) = inputs.fwhm {
        args_vec.push(format!("--fwhm={fwhm}"));
    }
    if let Some(niter) = inputs.niter {
        args_vec.push(format!("--niter={niter}"));
    }
    if let Some(mporder) = inputs.mporder {
        args_vec.push(format!("--mporder={mporder}"));
    }
    if inputs.repol {
        args_vec.push("--repol".to_string());
    }
    if inputs.cnr_maps {
        args_vec.push("--cnr_maps".to_string());
    }
    if inputs.residuals {
        args_vec.push("--residuals".to_string());
    }
    Ok(args_vec)
}
