//! FMRIB's Non-linear Image Registration Tool (`fnirt`).

use std::path::PathBuf;

use crate::config::defs::{FNIRT_TAG, RunConfig, TaskError};
use crate::tasks::{OutputValue, Outputs, comma_list, path_arg};
use crate::utils::file::{gen_fname, resolve_under};

#[derive(Debug, Clone, Default)]
pub struct FnirtInputs {
    pub reference_image: Option<PathBuf>,
    pub input_image: Option<PathBuf>,
    pub affine_matrix: Option<PathBuf>,
    pub input_warpfield: Option<PathBuf>,
    pub output_warpcoef: Option<PathBuf>,
    pub output_image: Option<PathBuf>,
    pub output_warpfield: Option<PathBuf>,
    pub output_jacobian: Option<PathBuf>,
    pub reference_mask: Option<PathBuf>,
    pub input_mask: Option<PathBuf>,
    pub max_iterations: Option<Vec<u32>>,
    pub subsampling: Option<Vec<u32>>,
    pub warp_resolution: Option<[f64; 3]>,
    pub input_fwhm: Option<Vec<f64>>,
    pub reference_fwhm: Option<Vec<f64>>,
    pub spline_order: Option<u8>,
}

/// fnirt writes all four of its images by default; explicit names just move
/// them. Order: coefficients, warped image, field, jacobian.
fn resolved_outputs(
    inputs: &FnirtInputs,
    cfg: &RunConfig,
) -> Result<[(&'static str, PathBuf); 4], TaskError> {
    let input_image = inputs
        .input_image
        .as_deref()
        .ok_or(TaskError::MissingInput("input_image"))?;

    let derive = |suffix: &str| {
        gen_fname(
            input_image,
            &cfg.output_dir,
            Some(suffix),
            true,
            None,
            cfg.output_type,
            FNIRT_TAG,
        )
    };
    let choose = |explicit: &Option<PathBuf>, suffix: &str| match explicit {
        Some(p) => Ok(resolve_under(p, &cfg.output_dir)),
        None => derive(suffix),
    };

    Ok([
        ("warpcoef_file", choose(&inputs.output_warpcoef, "_warpcoef")?),
        ("warped_file", choose(&inputs.output_image, "_warped")?),
        ("warpfield_file", choose(&inputs.output_warpfield, "_warpfield")?),
        ("jacobian_file", choose(&inputs.output_jacobian, "_jac")?),
    ])
}

pub fn predict_outputs(inputs: &FnirtInputs, cfg: &RunConfig) -> Result<Outputs, TaskError> {
    let mut outputs = Outputs::new();
    for (name, path) in resolved_outputs(inputs, cfg)? {
        outputs.insert(name, OutputValue::Path(path));
    }
    Ok(outputs)
}

pub fn arg_generator(inputs: &FnirtInputs, cfg: &RunConfig) -> Result<Vec<String>, TaskError> {
    let reference_image = inputs
        .reference_image
        .as_deref()
        .ok_or(TaskError::MissingInput("reference_image"))?;
    let input_image = inputs
        .input_image
        .as_deref()
        .ok_or(TaskError::MissingInput("input_image"))?;
    let [warpcoef, warped, warpfield, jacobian] = resolved_outputs(inputs, cfg)?;

    let mut args_vec: Vec<String> = Vec::new();
    args_vec.push("--ref".to_string());
    args_vec.push(path_arg(reference_image));
    args_vec.push("--in".to_string());
    args_vec.push(path_arg(input_image));
    if let Some(affine) = &inputs.affine_matrix {
        args_vec.push("--aff".to_string());
        args_vec.push(path_arg(affine));
    }
    if let Some(inwarp) = &inputs.input_warpfield {
        args_vec.push("--inwarp".to_string());
        args_vec.push(path_arg(inwarp));
    }
    args_vec.push(format!("--cout={}", warpcoef.1.display()));
    args_vec.push(format!("--iout={}", warped.1.display()));
    args_vec.push(format!("--fout={}", warpfield.1.display()));
    args_vec.push(format!("--jout={}", jacobian.1.display()));
    if let Some(mask) = &inputs.reference_mask {
        args_vec.push("--applyrefmask".to_string());
        args_vec.push(format!("--refmask={}", mask.display()));
    }
    if let Some(mask) = &inputs.input_mask {
        args_vec.push("--applyinmask".to_string());
        args_vec.push(format!("--inmask={}", mask.display()));
    }
    if let Some(miter) = &inputs.max_iterations {
        args_vec.push(format!("--miter={}", comma_list(miter)));
    }
    if let Some(subsamp) = &inputs.subsampling {
        args_vec.push(format!("--subsamp={}", comma_list(subsamp)));
    }
    if let Some(warpres) = &inputs.warp_resolution {
        args_vec.push(format!("--warpres={}", comma_list(warpres)));
    }
    if let Some(fwhm) = &inputs.input_fwhm {
        args_vec.push(format!("--infwhm={}", comma_list(fwhm)));
    }
    if let Some(fwhm) = &inputs.reference_fwhm {
        args_vec.push(format!("--reffwhm={}", comma_list(fwhm)));
    }
    if let Some(order) = inputs.spline_order {
        args_vec.push(format!("--splineorder={order}"));
    }
    Ok(args_vec)
}
