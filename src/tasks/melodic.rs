//! Multivariate Exploratory Linear Optimized Decomposition into Independent
//! Components (`melodic`).

use std::path::PathBuf;

use crate::config::defs::{RunConfig, TaskError};
use crate::tasks::{OutputValue, Outputs, path_arg};
use crate::utils::file::resolve_under;

#[derive(Debug, Clone, Default)]
pub struct MelodicInputs {
    pub in_files: Vec<PathBuf>,
    /// Unlike the other tools, an unset out_dir lands directly in the run
    /// directory instead of a derived subdirectory.
    pub out_dir: Option<PathBuf>,
    pub report: bool,
    pub dim: Option<usize>,
    pub no_bet: bool,
    pub bg_threshold: Option<f64>,
    pub tr_sec: Option<f64>,
    pub mask: Option<PathBuf>,
    pub approach: Option<String>,
    pub out_all: bool,
}

pub fn predict_outputs(inputs: &MelodicInputs, cfg: &RunConfig) -> Result<Outputs, TaskError> {
    let out_dir = match &inputs.out_dir {
        Some(dir) => resolve_under(dir, &cfg.output_dir),
        None => cfg.output_dir.clone(),
    };
    let mut outputs = Outputs::new();
    outputs.insert("out_dir", OutputValue::Path(out_dir.clone()));
    if inputs.report {
        outputs.insert("report_dir", OutputValue::Path(out_dir.join("report")));
    }
    Ok(outputs)
}

pub fn arg_generator(inputs: &MelodicInputs, _cfg: &RunConfig) -> Result<Vec<String>, TaskError> {
    if inputs.in_files.is_empty() {
        return Err(TaskError::MissingInput("in_files"));
    }

    let mut args_vec: Vec<String> = Vec::new();
    args_vec.push(format!(
        "-i {}",
        inputs
            .in_files
            .iter()
            .map(|p| path_arg(p))
            .collect::<Vec<_>>()
            .join(",")
    ));
    if let Some(out_dir) = &inputs.out_dir {
        args_vec.push("-o".to_string());
        args_vec.push(path_arg(out_dir));
    }
    if let Some(mask) = &inputs.mask {
        args_vec.push("-m".to_string());
        args_vec.push(path_arg(mask));
    }
    if let Some(dim) = inputs.dim {
        args_vec.push("-d".to_string());
        args_vec.push(dim.to_string());
    }
    if let Some(approach) = &inputs.approach {
        args_vec.push("-a".to_string());
        args_vec.push(approach.clone());
    }
    if let Some(threshold) = inputs.bg_threshold {
        args_vec.push(format!("--bgthreshold={threshold}"));
    }
    if let Some(tr_sec) = inputs.tr_sec {
        args_vec.push(format!("--tr={tr_sec}"));
    }
    if inputs.no_bet {
        args_vec.push("--nobet".to_string());
    }
    if inputs.out_all {
        args_vec.push("--Oall".to_string());
    }
    if inputs.report {
        args_vec.push("--report".to_string());
    }
    Ok(args_vec)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::defs::OutputType;
    use std::path::Path;

    fn cfg() -> RunConfig {
        RunConfig {
            output_dir: PathBuf::from("/work"),
            output_type: OutputType::NiftiGz,
        }
    }

    #[test]
    fn test_out_dir_defaults_to_run_dir() {
        let inputs = MelodicInputs {
            in_files: vec![PathBuf::from("func.nii.gz")],
            ..Default::default()
        };
        let outputs = predict_outputs(&inputs, &cfg()).unwrap();
        assert_eq!(outputs["out_dir"].path().unwrap(), Path::new("/work"));
        assert!(!outputs.contains_key("report_dir"));
    }

    #[test]
    fn test_report_dir_nests_under_out_dir() {
        let inputs = MelodicInputs {
            in_files: vec![PathBuf::from("func.nii.gz")],
            out_dir: Some(PathBuf::from("groupica")),
            report: true,
            ..Default::default()
        };
        let outputs = predict_outputs(&inputs, &cfg()).unwrap();
        assert_eq!(outputs["out_dir"].path().unwrap(), Path::new("/work/groupica"));
        assert_eq!(
            outputs["report_dir"].path().unwrap(),
            Path::new("/work/groupica/report")
        );
    }
}
