//! Distance transforms of binary masks (`distancemap`).

use std::path::PathBuf;

use crate::config::defs::{RunConfig, TaskError};
use crate::tasks::{OutputRequest, OutputValue, Outputs, path_arg};
use crate::utils::file::{fname_presuffix, resolve_under};

#[derive(Debug, Clone, Default)]
pub struct DistanceMapInputs {
    pub in_file: Option<PathBuf>,
    pub mask_file: Option<PathBuf>,
    pub invert_input: bool,
    pub local_max_file: OutputRequest,
    pub distance_map: Option<PathBuf>,
}

fn resolved_distance_map(inputs: &DistanceMapInputs, cfg: &RunConfig) -> Result<PathBuf, TaskError> {
    match &inputs.distance_map {
        Some(out) => Ok(resolve_under(out, &cfg.output_dir)),
        None => {
            let in_file = inputs
                .in_file
                .as_deref()
                .ok_or(TaskError::MissingInput("in_file"))?;
            Ok(fname_presuffix(in_file, "", "_dstmap", Some(&cfg.output_dir), true))
        }
    }
}

fn resolved_local_max(
    inputs: &DistanceMapInputs,
    cfg: &RunConfig,
) -> Result<Option<PathBuf>, TaskError> {
    match &inputs.local_max_file {
        OutputRequest::Skip => Ok(None),
        OutputRequest::Derive => {
            let in_file = inputs
                .in_file
                .as_deref()
                .ok_or(TaskError::MissingPrerequisite {
                    output: "local_max_file",
                    requires: "in_file",
                })?;
            Ok(Some(fname_presuffix(in_file, "", "_lclmax", Some(&cfg.output_dir), true)))
        }
        OutputRequest::Explicit(p) => Ok(Some(resolve_under(p, &cfg.output_dir))),
    }
}

pub fn predict_outputs(inputs: &DistanceMapInputs, cfg: &RunConfig) -> Result<Outputs, TaskError> {
    let mut outputs = Outputs::new();
    outputs.insert(
        "distance_map",
        OutputValue::Path(resolved_distance_map(inputs, cfg)?),
    );
    if let Some(local_max) = resolved_local_max(inputs, cfg)? {
        outputs.insert("local_max_file", OutputValue::Path(local_max));
    }
    Ok(outputs)
}

pub fn arg_generator(inputs: &DistanceMapInputs, cfg: &RunConfig) -> Result<Vec<String>, TaskError> {
    let in_file = inputs
        .in_file
        .as_deref()
        .ok_or(TaskError::MissingInput("in_file"))?;

    let mut args_vec: Vec<String> = Vec::new();
    args_vec.push(format!("--in={}", path_arg(in_file)));
    if let Some(mask) = &inputs.mask_file {
        args_vec.push(format!("--mask={}", path_arg(mask)));
    }
    if inputs.invert_input {
        args_vec.push("--invert".to_string());
    }
    if let Some(local_max) = resolved_local_max(inputs, cfg)? {
        args_vec.push(format!("--localmax={}", local_max.display()));
    }
    args_vec.push(format!("--out={}", resolved_distance_map(inputs, cfg)?.display()));
    Ok(args_vec)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::defs::OutputType;
    use std::path::Path;

    fn cfg() -> RunConfig {
        RunConfig {
            output_dir: PathBuf::from("/maps"),
            output_type: OutputType::NiftiGz,
        }
    }

    #[test]
    fn test_derived_distance_map_keeps_input_extension() {
        let inputs = DistanceMapInputs {
            in_file: Some(PathBuf::from("mask.nii.gz")),
            ..Default::default()
        };
        let outputs = predict_outputs(&inputs, &cfg()).unwrap();
        assert_eq!(outputs.len(), 1);
        assert_eq!(
            outputs["distance_map"].path().unwrap(),
            Path::new("/maps/mask_dstmap.nii.gz")
        );
    }

    #[test]
    fn test_local_max_tristate() {
        let mut inputs = DistanceMapInputs {
            in_file: Some(PathBuf::from("mask.nii.gz")),
            local_max_file: OutputRequest::Derive,
            ..Default::default()
        };
        let outputs = predict_outputs(&inputs, &cfg()).unwrap();
        assert_eq!(
            outputs["local_max_file"].path().unwrap(),
            Path::new("/maps/mask_lclmax.nii.gz")
        );

        inputs.local_max_file = OutputRequest::Explicit(PathBuf::from("peaks.nii.gz"));
        let outputs = predict_outputs(&inputs, &cfg()).unwrap();
        assert_eq!(
            outputs["local_max_file"].path().unwrap(),
            Path::new("/maps/peaks.nii.gz")
        );
    }
}
