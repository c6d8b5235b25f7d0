//! FMRIB's Linear Image Registration Tool (`flirt`).

use std::path::{Path, PathBuf};

use crate::config::defs::{FLIRT_TAG, RunConfig, TaskError};
use crate::tasks::{OutputValue, Outputs, path_arg};
use crate::utils::file::{fname_presuffix, gen_fname, resolve_under};

#[derive(Debug, Clone, Default)]
pub struct FlirtInputs {
    pub in_file: Option<PathBuf>,
    pub reference: Option<PathBuf>,
    pub out_file: Option<PathBuf>,
    pub out_matrix_file: Option<PathBuf>,
    pub in_matrix_file: Option<PathBuf>,
    pub apply_xfm: bool,
    pub cost: Option<String>,
    pub dof: Option<u32>,
    pub interp: Option<String>,
    pub uses_qform: bool,
}

fn resolved_out_file(
    in_file: &Path,
    inputs: &FlirtInputs,
    cfg: &RunConfig,
) -> Result<PathBuf, TaskError> {
    match &inputs.out_file {
        Some(out) => Ok(resolve_under(out, &cfg.output_dir)),
        None => gen_fname(
            in_file,
            &cfg.output_dir,
            Some("_flirt"),
            true,
            None,
            cfg.output_type,
            FLIRT_TAG,
        ),
    }
}

fn resolved_out_matrix(in_file: &Path, inputs: &FlirtInputs, cfg: &RunConfig) -> PathBuf {
    match &inputs.out_matrix_file {
        Some(out) => resolve_under(out, &cfg.output_dir),
        None => fname_presuffix(in_file, "", "_flirt.mat", Some(&cfg.output_dir), false),
    }
}

pub fn predict_outputs(inputs: &FlirtInputs, cfg: &RunConfig) -> Result<Outputs, TaskError> {
    let in_file = inputs
        .in_file
        .as_deref()
        .ok_or(TaskError::MissingInput("in_file"))?;

    let mut outputs = Outputs::new();
    outputs.insert(
        "out_file",
        OutputValue::Path(resolved_out_file(in_file, inputs, cfg)?),
    );
    outputs.insert(
        "out_matrix_file",
        OutputValue::Path(resolved_out_matrix(in_file, inputs, cfg)),
    );
    Ok(outputs)
}

pub fn arg_generator(inputs: &FlirtInputs, cfg: &RunConfig) -> Result<Vec<String>, TaskError> {
    let in_file = inputs
        .in_file
        .as_deref()
        .ok_or(TaskError::MissingInput("in_file"))?;
    let reference = inputs
        .reference
        .as_deref()
        .ok_or(TaskError::MissingInput("reference"))?;

    let mut args_vec: Vec<String> = Vec::new();
    args_vec.push("-in".to_string());
    args_vec.push(path_arg(in_file));
    args_vec.push("-ref".to_string());
    args_vec.push(path_arg(reference));
    args_vec.push("-out".to_string());
    args_vec.push(path_arg(&resolved_out_file(in_file, inputs, cfg)?));
    args_vec.push("-omat".to_string());
    args_vec.push(path_arg(&resolved_out_matrix(in_file, inputs, cfg)));
    if let Some(init) = &inputs.in_matrix_file {
        args_vec.push("-init".to_string());
        args_vec.push(path_arg(init));
    }
    if inputs.apply_xfm {
        args_vec.push("-applyxfm".to_string());
    }
    if let Some(cost) = &inputs.cost {
        args_vec.push("-cost".to_string());
        args_vec.push(cost.clone());
    }
    if let Some(dof) = inputs.dof {
        args_vec.push("-dof".to_string());
        args_vec.push(dof.to_string());
    }
    if let Some(interp) = &inputs.interp {
        args_vec.push("-interp".to_string());
        args_vec.push(interp.clone());
    }
    if inputs.uses_qform {
        args_vec.push("-usesqform".to_string());
    }
    Ok(args_vec)
}
