//! Invert a fnirt warpfield (`invwarp`).

use std::path::PathBuf;

use crate::config::defs::{INVWARP_TAG, RunConfig, TaskError};
use crate::tasks::{OutputValue, Outputs, path_arg};
use crate::utils::file::{gen_fname, resolve_under};

#[derive(Debug, Clone, Default)]
pub struct InvWarpInputs {
    pub warp_file: Option<PathBuf>,
    pub reference_image: Option<PathBuf>,
    pub inverse_warp_file: Option<PathBuf>,
    pub absolute: bool,
    pub relative: bool,
    pub regularise: Option<f64>,
    pub no_constraint: bool,
}

fn resolved_inverse_warp(inputs: &InvWarpInputs, cfg: &RunConfig) -> Result<PathBuf, TaskError> {
    match &inputs.inverse_warp_file {
        Some(out) => Ok(resolve_under(out, &cfg.output_dir)),
        None => {
            let warp_file = inputs
                .warp_file
                .as_deref()
                .ok_or(TaskError::MissingInput("warp_file"))?;
            gen_fname(
                warp_file,
                &cfg.output_dir,
                Some("_invwarp"),
                true,
                None,
                cfg.output_type,
                INVWARP_TAG,
            )
        }
    }
}

pub fn predict_outputs(inputs: &InvWarpInputs, cfg: &RunConfig) -> Result<Outputs, TaskError> {
    let mut outputs = Outputs::new();
    outputs.insert(
        "inverse_warp",
        OutputValue::Path(resolved_inverse_warp(inputs, cfg)?),
    );
    Ok(outputs)
}

pub fn arg_generator(inputs: &InvWarpInputs, cfg: &RunConfig) -> Result<Vec<String>, TaskError> {
    let warp_file = inputs
        .warp_file
        .as_deref()
        .ok_or(TaskError::MissingInput("warp_file"))?;
    let reference_image = inputs
        .reference_image
        .as_deref()
        .ok_or(TaskError::MissingInput("reference_image"))?;

    let mut args_vec: Vec<String> = Vec::new();
    args_vec.push(format!("--warp={}", path_arg(warp_file)));
    args_vec.push(format!("--ref={}", path_arg(reference_image)));
    args_vec.push(format!("--out={}", resolved_inverse_warp(inputs, cfg)?.display()));
    if inputs.absolute {
        args_vec.push("--abs".to_string());
    }
    if inputs.relative {
        args_vec.push("--rel".to_string());
    }
    if let Some(regularise) = inputs.regularise {
        args_vec.push(format!("--regularise={regularise}"));
    }
    if inputs.no_constraint {
        args_vec.push("--noconstraint".to_string());
    }
    Ok(args_vec)
}
