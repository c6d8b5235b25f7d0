//! Apply a fnirt warpfield to an image (`applywarp`).

use std::path::PathBuf;

use crate::config::defs::{APPLYWARP_TAG, RunConfig, TaskError};
use crate::tasks::{OutputValue, Outputs, path_arg};
use crate::utils::file::{gen_fname, resolve_under};

#[derive(Debug, Clone, Default)]
pub struct ApplyWarpInputs {
    pub input_image: Option<PathBuf>,
    pub reference_image: Option<PathBuf>,
    pub field_file: Option<PathBuf>,
    pub premat: Option<PathBuf>,
    pub postmat: Option<PathBuf>,
    pub out_file: Option<PathBuf>,
    pub relwarp: bool,
    pub interp: Option<String>,
}

fn resolved_out_file(inputs: &ApplyWarpInputs, cfg: &RunConfig) -> Result<PathBuf, TaskError> {
    match &inputs.out_file {
        Some(out) => Ok(resolve_under(out, &cfg.output_dir)),
        None => {
            let input_image = inputs
                .input_image
                .as_deref()
                .ok_or(TaskError::MissingInput("input_image"))?;
            gen_fname(
                input_image,
                &cfg.output_dir,
                Some("_warped"),
                true,
                None,
                cfg.output_type,
                APPLYWARP_TAG,
            )
        }
    }
}

pub fn predict_outputs(inputs: &ApplyWarpInputs, cfg: &RunConfig) -> Result<Outputs, TaskError> {
    let mut outputs = Outputs::new();
    outputs.insert("out_file", OutputValue::Path(resolved_out_file(inputs, cfg)?));
    Ok(outputs)
}

pub fn arg_generator(inputs: &ApplyWarpInputs, cfg: &RunConfig) -> Result<Vec<String>, TaskError> {
    let input_image = inputs
        .input_image
        .as_deref()
        .ok_or(TaskError::MissingInput("input_image"))?;
    let reference_image = inputs
        .reference_image
        .as_deref()
        .ok_or(TaskError::MissingInput("reference_image"))?;

    let mut args_vec: Vec<String> = Vec::new();
    args_vec.push(format!("--in={}", path_arg(input_image)));
    args_vec.push(format!("--ref={}", path_arg(reference_image)));
    args_vec.push(format!("--out={}", resolved_out_file(inputs, cfg)?.display()));
    if let Some(field) = &inputs.field_file {
        args_vec.push(format!("--warp={}", path_arg(field)));
    }
    if let Some(premat) = &inputs.premat {
        args_vec.push(format!("--premat={}", path_arg(premat)));
    }
    if let Some(postmat) = &inputs.postmat {
        args_vec.push(format!("--postmat={}", path_arg(postmat)));
    }
    if inputs.relwarp {
        args_vec.push("--rel".to_string());
    }
    if let Some(interp) = &inputs.interp {
        args_vec.push(format!("--interp={interp}"));
    }
    Ok(args_vec)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::defs::OutputType;
    use std::path::Path;

    #[test]
    fn test_default_out_file() {
        let cfg = RunConfig {
            output_dir: PathBuf::from("/reg"),
            output_type: OutputType::NiftiGz,
        };
        let inputs = ApplyWarpInputs {
            input_image: Some(PathBuf::from("epi.nii.gz")),
            reference_image: Some(PathBuf::from("template.nii")),
            ..Default::default()
        };
        let outputs = predict_outputs(&inputs, &cfg).unwrap();
        assert_eq!(
            outputs["out_file"].path().unwrap(),
            Path::new("/reg/epi_warped.nii.gz")
        );
    }
}
