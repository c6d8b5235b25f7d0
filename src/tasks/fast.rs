//! FMRIB's Automated Segmentation Tool (`fast`).

use std::path::PathBuf;

use crate::config::defs::{FAST_TAG, RunConfig, TaskError};
use crate::tasks::{OutputValue, Outputs, path_arg};
use crate::utils::file::{gen_fname, per_class_suffixes, per_volume_suffixes, resolve_under, split_filename};

#[derive(Debug, Clone, Default)]
pub struct FastInputs {
    /// One image per channel; the last one names the outputs.
    pub in_files: Vec<PathBuf>,
    pub out_basename: Option<PathBuf>,
    pub number_classes: Option<usize>,
    pub segments: bool,
    pub no_pve: bool,
    /// Setting this at all, true or false, makes fast write restored images.
    pub output_biascorrected: Option<bool>,
    pub output_biasfield: bool,
    pub probability_maps: bool,
    pub use_priors: bool,
    pub img_type: Option<u8>,
    pub bias_iters: Option<u32>,
    pub bias_lowpass: Option<u32>,
}

pub fn predict_outputs(inputs: &FastInputs, cfg: &RunConfig) -> Result<Outputs, TaskError> {
    let last = inputs
        .in_files
        .last()
        .ok_or(TaskError::MissingInput("in_files"))?;
    let nclasses = inputs.number_classes.unwrap_or(3);

    // multichannel runs name results after the last input file
    let (basename, cwd): (PathBuf, PathBuf) = match &inputs.out_basename {
        Some(base) => (base.clone(), cfg.output_dir.clone()),
        None => {
            let (dir, _, _) = split_filename(last);
            (last.clone(), resolve_under(&dir, &cfg.output_dir))
        }
    };
    let derived = |suffix: &str| {
        gen_fname(
            &basename,
            &cwd,
            Some(suffix),
            true,
            None,
            cfg.output_type,
            FAST_TAG,
        )
    };
    let derived_list = |suffixes: Vec<String>| -> Result<Vec<PathBuf>, TaskError> {
        suffixes.iter().map(|s| derived(s)).collect()
    };

    let mut outputs = Outputs::new();
    outputs.insert("tissue_class_map", OutputValue::Path(derived("_seg")?));
    if inputs.segments {
        outputs.insert(
            "tissue_class_files",
            OutputValue::Paths(derived_list(per_class_suffixes("_seg", nclasses))?),
        );
    }
    if inputs.output_biascorrected.is_some() {
        outputs.insert(
            "restored_image",
            OutputValue::Paths(derived_list(per_volume_suffixes(
                "_restore",
                inputs.in_files.len(),
            ))?),
        );
    }
    outputs.insert("mixeltype", OutputValue::Path(derived("_mixeltype")?));
    if !inputs.no_pve {
        outputs.insert("partial_volume_map", OutputValue::Path(derived("_pveseg")?));
        outputs.insert(
            "partial_volume_files",
            OutputValue::Paths(derived_list(per_class_suffixes("_pve", nclasses))?),
        );
    }
    if inputs.output_biasfield {
        outputs.insert(
            "bias_field",
            OutputValue::Paths(derived_list(per_volume_suffixes(
                "_bias",
                inputs.in_files.len(),
            ))?),
        );
    }
    if inputs.probability_maps {
        outputs.insert(
            "probability_maps",
            OutputValue::Paths(derived_list(per_class_suffixes("_prob", nclasses))?),
        );
    }
    Ok(outputs)
}

pub fn arg_generator(inputs: &FastInputs, _cfg: &RunConfig) -> Result<Vec<String>, TaskError> {
    if inputs.in_files.is_empty() {
        return Err(TaskError::MissingInput("in_files"));
    }

    let mut args_vec: Vec<String> = Vec::new();
    if let Some(nclasses) = inputs.number_classes {
        args_vec.push("-n".to_string());
        args_vec.push(nclasses.to_string());
    }
    if let Some(img_type) = inputs.img_type {
        args_vec.push("-t".to_string());
        args_vec.push(img_type.to_string());
    }
    if let Some(iters) = inputs.bias_iters {
        args_vec.push("-I".to_string());
        args_vec.push(iters.to_string());
    }
    if let Some(lowpass) = inputs.bias_lowpass {
        args_vec.push("-l".to_string());
        args_vec.push(lowpass.to_string());
    }
    if inputs.segments {
        args_vec.push("-g".to_string());
    }
    if inputs.no_pve {
        args_vec.push("--nopve".to_string());
    }
    if inputs.output_biascorrected == Some(true) {
        args_vec.push("-B".to_string());
    }
    if inputs.output_biasfield {
        args_vec.push("-b".to_string());
    }
    if inputs.probability_maps {
        args_vec.push("-p".to_string());
    }
    if inputs.use_priors {
        args_vec.push("-P".to_string());
    }
    if let Some(base) = &inputs.out_basename {
        args_vec.push("-o".to_string());
        args_vec.push(path_arg(base));
    }
    args_vec.push("-S".to_string());
    args_vec.push(inputs.in_files.len().to_string());
    for file in &inputs.in_files {
        args_vec.push(path_arg(file));
    }
    Ok(args_vec)
}
