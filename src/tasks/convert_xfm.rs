//! Affine transform manipulation (`convert_xfm`).

use std::path::PathBuf;

use crate::config::defs::{RunConfig, TaskError};
use crate::tasks::{OutputValue, Outputs, path_arg};
use crate::utils::file::{fname_presuffix, resolve_under};

#[derive(Debug, Clone, Default)]
pub struct ConvertXfmInputs {
    /// 4x4 ASCII matrix, last positional argument.
    pub input_matrix: Option<PathBuf>,
    pub output_matrix: Option<PathBuf>,
    pub concat_matrix: Option<PathBuf>,
    pub fix_scale_skew: Option<PathBuf>,
    pub inverse: bool,
}

fn resolved_output_matrix(
    input_matrix: &std::path::Path,
    inputs: &ConvertXfmInputs,
    cfg: &RunConfig,
) -> PathBuf {
    match &inputs.output_matrix {
        Some(out) => resolve_under(out, &cfg.output_dir),
        None => fname_presuffix(input_matrix, "", "_cxfm", Some(&cfg.output_dir), true),
    }
}

pub fn predict_outputs(inputs: &ConvertXfmInputs, cfg: &RunConfig) -> Result<Outputs, TaskError> {
    let input_matrix = inputs
        .input_matrix
        .as_deref()
        .ok_or(TaskError::MissingInput("input_matrix"))?;

    let mut outputs = Outputs::new();
    outputs.insert(
        "output_matrix",
        OutputValue::Path(resolved_output_matrix(input_matrix, inputs, cfg)),
    );
    Ok(outputs)
}

pub fn arg_generator(inputs: &ConvertXfmInputs, cfg: &RunConfig) -> Result<Vec<String>, TaskError> {
    let input_matrix = inputs
        .input_matrix
        .as_deref()
        .ok_or(TaskError::MissingInput("input_matrix"))?;

    let mut args_vec: Vec<String> = Vec::new();
    args_vec.push("-omat".to_string());
    args_vec.push(path_arg(&resolved_output_matrix(input_matrix, inputs, cfg)));
    if let Some(concat) = &inputs.concat_matrix {
        args_vec.push("-concat".to_string());
        args_vec.push(path_arg(concat));
    }
    if let Some(fix) = &inputs.fix_scale_skew {
        args_vec.push("-fixscaleskew".to_string());
        args_vec.push(path_arg(fix));
    }
    if inputs.inverse {
        args_vec.push("-inverse".to_string());
    }
    args_vec.push(path_arg(input_matrix));
    Ok(args_vec)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::defs::OutputType;
    use std::path::Path;

    fn cfg() -> RunConfig {
        RunConfig {
            output_dir: PathBuf::from("/xfms"),
            output_type: OutputType::NiftiGz,
        }
    }

    #[test]
    fn test_default_keeps_matrix_extension() {
        let inputs = ConvertXfmInputs {
            input_matrix: Some(PathBuf::from("AtoB.mat")),
            inverse: true,
            ..Default::default()
        };
        let outputs = predict_outputs(&inputs, &cfg()).unwrap();
        assert_eq!(
            outputs["output_matrix"].path().unwrap(),
            Path::new("/xfms/AtoB_cxfm.mat")
        );
    }

    #[test]
    fn test_input_matrix_is_last_argument() {
        let inputs = ConvertXfmInputs {
            input_matrix: Some(PathBuf::from("AtoB.mat")),
            concat_matrix: Some(PathBuf::from("BtoC.mat")),
            output_matrix: Some(PathBuf::from("AtoC.mat")),
            ..Default::default()
        };
        let args_vec = arg_generator(&inputs, &cfg()).unwrap();
        assert_eq!(args_vec[0], "-omat");
        assert_eq!(args_vec[1], "/xfms/AtoC.mat");
        assert!(args_vec.windows(2).any(|w| w == ["-concat", "BtoC.mat"]));
        assert_eq!(args_vec.last().unwrap(), "AtoB.mat");
    }
}
