//! Brain Extraction Tool (`bet`).

use std::path::PathBuf;

use crate::config::defs::{BET_TAG, RunConfig, TaskError};
use crate::tasks::{OutputValue, Outputs, path_arg};
use crate::utils::file::{gen_fname, resolve_under, split_filename};

#[derive(Debug, Clone, Default)]
pub struct BetInputs {
    pub in_file: Option<PathBuf>,
    pub out_file: Option<PathBuf>,
    pub outline: bool,
    pub mask: bool,
    pub skull: bool,
    pub no_output: bool,
    pub frac: Option<f64>,
    pub vertical_gradient: Option<f64>,
    pub radius: Option<u32>,
    pub center: Option<[u32; 3]>,
    pub threshold: bool,
    pub mesh: bool,
    pub robust: bool,
    pub padding: bool,
    pub remove_eyes: bool,
    pub surfaces: bool,
    pub functional: bool,
    pub reduce_bias: bool,
}

/// Seven extra masks and meshes written by `-A`, each keyed by its suffix.
const SURFACE_OUTPUTS: &[(&str, &str)] = &[
    ("inskull_mask_file", "_inskull_mask"),
    ("inskull_mesh_file", "_inskull_mesh"),
    ("outskull_mask_file", "_outskull_mask"),
    ("outskull_mesh_file", "_outskull_mesh"),
    ("outskin_mask_file", "_outskin_mask"),
    ("outskin_mesh_file", "_outskin_mesh"),
    ("skull_mask_file", "_skull_mask"),
];

fn resolved_out_file(inputs: &BetInputs, cfg: &RunConfig) -> Result<PathBuf, TaskError> {
    match &inputs.out_file {
        Some(out) => Ok(resolve_under(out, &cfg.output_dir)),
        None => {
            let in_file = inputs
                .in_file
                .as_deref()
                .ok_or(TaskError::MissingInput("in_file"))?;
            gen_fname(
                in_file,
                &cfg.output_dir,
                Some("_brain"),
                true,
                None,
                cfg.output_type,
                BET_TAG,
            )
        }
    }
}

pub fn predict_outputs(inputs: &BetInputs, cfg: &RunConfig) -> Result<Outputs, TaskError> {
    let out_file = resolved_out_file(inputs, cfg)?;
    let (cwd, _, _) = split_filename(&out_file);
    let derived = |suffix: &str, change_ext: bool| {
        gen_fname(
            &out_file,
            &cwd,
            Some(suffix),
            change_ext,
            None,
            cfg.output_type,
            BET_TAG,
        )
    };

    let mut outputs = Outputs::new();
    outputs.insert("out_file", OutputValue::Path(out_file.clone()));
    if inputs.mesh || inputs.surfaces {
        outputs.insert("meshfile", OutputValue::Path(derived("_mesh.vtk", false)?));
    }
    if inputs.mask || inputs.reduce_bias {
        outputs.insert("mask_file", OutputValue::Path(derived("_mask", true)?));
    }
    if inputs.outline {
        outputs.insert("outline_file", OutputValue::Path(derived("_overlay", true)?));
    }
    if inputs.surfaces {
        for &(name, suffix) in SURFACE_OUTPUTS {
            outputs.insert(name, OutputValue::Path(derived(suffix, true)?));
        }
    }
    if inputs.skull {
        outputs.insert("skull_file", OutputValue::Path(derived("_skull", true)?));
    }
    if inputs.no_output {
        outputs.insert("out_file", OutputValue::Unset);
    }
    Ok(outputs)
}

pub fn arg_generator(inputs: &BetInputs, cfg: &RunConfig) -> Result<Vec<String>, TaskError> {
    let in_file = inputs
        .in_file
        .as_deref()
        .ok_or(TaskError::MissingInput("in_file"))?;
    let out_file = resolved_out_file(inputs, cfg)?;

    let mut args_vec: Vec<String> = Vec::new();
    args_vec.push(path_arg(in_file));
    args_vec.push(path_arg(&out_file));
    if inputs.outline {
        args_vec.push("-o".to_string());
    }
    if inputs.mask {
        args_vec.push("-m".to_string());
    }
    if inputs.skull {
        args_vec.push("-s".to_string());
    }
    if inputs.no_output {
        args_vec.push("-n".to_string());
    }
    if let Some(frac) = inputs.frac {
        args_vec.push("-f".to_string());
        args_vec.push(format!("{frac:.2}"));
    }
    if let Some(gradient) = inputs.vertical_gradient {
        args_vec.push("-g".to_string());
        args_vec.push(format!("{gradient:.2}"));
    }
    if let Some(radius) = inputs.radius {
        args_vec.push("-r".to_string());
        args_vec.push(radius.to_string());
    }
    if let Some(center) = inputs.center {
        args_vec.push("-c".to_string());
        for coord in center {
            args_vec.push(coord.to_string());
        }
    }
    if inputs.threshold {
        args_vec.push("-t".to_string());
    }
    if inputs.mesh {
        args_vec.push("-e".to_string());
    }
    if inputs.robust {
        args_vec.push("-R".to_string());
    }
    if inputs.remove_eyes {
        args_vec.push("-S".to_string());
    }
    if inputs.reduce_bias {
        args_vec.push("-B".to_string());
    }
    if inputs.padding {
        args_vec.push("-Z".to_string());
    }
    if inputs.functional {
        args_vec.push("-F".to_string());
    }
    if inputs.surfaces {
        args_vec.push("-A".to_string());
    }
    Ok(args_vec)
}
