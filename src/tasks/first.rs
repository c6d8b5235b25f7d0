//! Subcortical structure segmentation (`run_first_all`).

use std::path::{Path, PathBuf};

use crate::config::defs::{RunConfig, TaskError};
use crate::tasks::{OutputValue, Outputs, path_arg};
use crate::utils::file::{resolve_under, split_filename};

pub const DEFAULT_STRUCTURES: &[&str] = &[
    "L_Hipp", "R_Hipp", "L_Accu", "R_Accu", "L_Amyg", "R_Amyg", "L_Caud", "R_Caud", "L_Pall",
    "R_Pall", "L_Puta", "R_Puta", "L_Thal", "R_Thal", "BrStem",
];

#[derive(Debug, Clone, Default)]
pub struct FirstInputs {
    pub in_file: Option<PathBuf>,
    /// Output basename; the combined segmentations hang off its stem.
    pub out_file: Option<PathBuf>,
    pub verbose: bool,
    pub brain_extracted: bool,
    pub no_cleanup: bool,
    /// `auto`, `fast` or `none`.
    pub method: Option<String>,
    pub method_as_numerical_threshold: Option<f64>,
    pub list_of_specific_structures: Option<Vec<String>>,
    pub affine_file: Option<PathBuf>,
}

/// Boundary-correction token embedded in the combined output filenames.
fn method_token(inputs: &FirstInputs) -> String {
    let mut method = "none".to_string();
    if let Some(m) = &inputs.method {
        if m != "none" {
            method = "fast".to_string();
            if inputs.list_of_specific_structures.is_some() && m == "auto" {
                method = "none".to_string();
            }
        }
    }
    if let Some(threshold) = inputs.method_as_numerical_threshold {
        method = format!("{threshold:.4}").replace('.', "");
    }
    method
}

pub fn predict_outputs(inputs: &FirstInputs, cfg: &RunConfig) -> Result<Outputs, TaskError> {
    let out_file = inputs.out_file.as_deref().unwrap_or(Path::new("segmented"));
    let (_, outname, _) = split_filename(out_file);
    let method = method_token(inputs);
    let structures: Vec<String> = match &inputs.list_of_specific_structures {
        Some(list) => list.clone(),
        None => DEFAULT_STRUCTURES.iter().map(|s| s.to_string()).collect(),
    };

    let under = |name: String| resolve_under(Path::new(&name), &cfg.output_dir);
    let per_structure = |tail: &str| -> Vec<PathBuf> {
        structures
            .iter()
            .map(|s| under(format!("{outname}-{s}{tail}")))
            .collect()
    };

    let mut outputs = Outputs::new();
    outputs.insert(
        "original_segmentations",
        OutputValue::Path(under(format!("{outname}_all_{method}_origsegs.nii.gz"))),
    );
    outputs.insert(
        "segmentation_file",
        OutputValue::Path(under(format!("{outname}_all_{method}_firstseg.nii.gz"))),
    );
    outputs.insert("vtk_surfaces", OutputValue::Paths(per_structure("_first.vtk")));
    outputs.insert("bvars", OutputValue::Paths(per_structure("_first.bvars")));
    Ok(outputs)
}

pub fn arg_generator(inputs: &FirstInputs, _cfg: &RunConfig) -> Result<Vec<String>, TaskError> {
    let in_file = inputs
        .in_file
        .as_deref()
        .ok_or(TaskError::MissingInput("in_file"))?;
    let out_file = inputs.out_file.as_deref().unwrap_or(Path::new("segmented"));

    let mut args_vec: Vec<String> = Vec::new();
    args_vec.push("-i".to_string());
    args_vec.push(path_arg(in_file));
    args_vec.push("-o".to_string());
    args_vec.push(path_arg(out_file));
    if inputs.verbose {
        args_vec.push("-v".to_string());
    }
    if inputs.brain_extracted {
        args_vec.push("-b".to_string());
    }
    if inputs.no_cleanup {
        args_vec.push("-d".to_string());
    }
    if let Some(method) = &inputs.method {
        args_vec.push("-m".to_string());
        args_vec.push(method.clone());
    }
    if let Some(affine) = &inputs.affine_file {
        args_vec.push("-a".to_string());
        args_vec.push(path_arg(affine));
    }
    if let Some(structures) = &inputs.list_of_specific_structures {
        args_vec.push("-s".to_string());
        args_vec.push(structures.join(","));
    }
    Ok(args_vec)
}
