//! Combine linear and non-linear transforms into one warpfield (`convertwarp`).

use std::path::PathBuf;

use crate::config::defs::{CONVERTWARP_TAG, RunConfig, TaskError};
use crate::tasks::{OutputRequest, OutputValue, Outputs, path_arg};
use crate::utils::file::{gen_fname, resolve_under};

#[derive(Debug, Clone, Default)]
pub struct ConvertWarpInputs {
    /// Everything is named after the reference image.
    pub reference_image: Option<PathBuf>,
    pub premat: Option<PathBuf>,
    pub warp1: Option<PathBuf>,
    pub midmat: Option<PathBuf>,
    pub warp2: Option<PathBuf>,
    pub postmat: Option<PathBuf>,
    pub shift_in_file: Option<PathBuf>,
    pub out_file: Option<PathBuf>,
    pub jacobian_file: OutputRequest,
    pub relwarp: bool,
    pub abswarp: bool,
}

fn derive(
    reference_image: &std::path::Path,
    suffix: &str,
    cfg: &RunConfig,
) -> Result<PathBuf, TaskError> {
    gen_fname(
        reference_image,
        &cfg.output_dir,
        Some(suffix),
        true,
        None,
        cfg.output_type,
        CONVERTWARP_TAG,
    )
}

fn resolved_out_file(
    reference_image: &std::path::Path,
    inputs: &ConvertWarpInputs,
    cfg: &RunConfig,
) -> Result<PathBuf, TaskError> {
    match &inputs.out_file {
        Some(out) => Ok(resolve_under(out, &cfg.output_dir)),
        None => derive(reference_image, "_warp", cfg),
    }
}

fn resolved_jacobian(
    reference_image: &std::path::Path,
    inputs: &ConvertWarpInputs,
    cfg: &RunConfig,
) -> Result<Option<PathBuf>, TaskError> {
    match &inputs.jacobian_file {
        OutputRequest::Skip => Ok(None),
        OutputRequest::Derive => derive(reference_image, "_jac", cfg).map(Some),
        OutputRequest::Explicit(p) => Ok(Some(resolve_under(p, &cfg.output_dir))),
    }
}

pub fn predict_outputs(inputs: &ConvertWarpInputs, cfg: &RunConfig) -> Result<Outputs, TaskError> {
    let reference_image = inputs
        .reference_image
        .as_deref()
        .ok_or(TaskError::MissingInput("reference_image"))?;

    let mut outputs = Outputs::new();
    outputs.insert(
        "out_file",
        OutputValue::Path(resolved_out_file(reference_image, inputs, cfg)?),
    );
    if let Some(jacobian) = resolved_jacobian(reference_image, inputs, cfg)? {
        outputs.insert("jacobian_file", OutputValue::Path(jacobian));
    }
    Ok(outputs)
}

pub fn arg_generator(inputs: &ConvertWarpInputs, cfg: &RunConfig) -> Result<Vec<String>, TaskError> {
    let reference_image = inputs
        .reference_image
        .as_deref()
        .ok_or(TaskError::MissingInput("reference_image"))?;

    let mut args_vec: Vec<String> = Vec::new();
    args_vec.push(format!("--ref={}", path_arg(reference_image)));
    if let Some(premat) = &inputs.premat {
        args_vec.push(format!("--premat={}", path_arg(premat)));
    }
    if let Some(warp1) = &inputs.warp1 {
        args_vec.push(format!("--warp1={}", path_arg(warp1)));
    }
    if let Some(midmat) = &inputs.midmat {
        args_vec.push(format!("--midmat={}", path_arg(midmat)));
    }
    if let Some(warp2) = &inputs.warp2 {
        args_vec.push(format!("--warp2={}", path_arg(warp2)));
    }
    if let Some(postmat) = &inputs.postmat {
        args_vec.push(format!("--postmat={}", path_arg(postmat)));
    }
    if let Some(shift) = &inputs.shift_in_file {
        args_vec.push(format!("--shiftmap={}", path_arg(shift)));
    }
    args_vec.push(format!(
        "--out={}",
        resolved_out_file(reference_image, inputs, cfg)?.display()
    ));
    if let Some(jacobian) = resolved_jacobian(reference_image, inputs, cfg)? {
        args_vec.push(format!("--jacobian={}", jacobian.display()));
    }
    if inputs.relwarp {
        args_vec.push("--rel".to_string());
    }
    if inputs.abswarp {
        args_vec.push("--abs".to_string());
    }
    Ok(args_vec)
}
