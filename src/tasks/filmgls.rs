//! Time-series GLM fitting with prewhitening (`film_gls`).
//!
//! The number of `pe`/`cope`/`zstat` images comes out of the design and
//! contrast files, so prediction reads their header lines.

use std::path::{Path, PathBuf};

use crate::config::defs::{RunConfig, TaskError};
use crate::tasks::{OutputValue, Outputs, path_arg};
use crate::utils::design::{count_contrasts, count_waves};
use crate::utils::file::resolve_under;

#[derive(Debug, Clone, Default)]
pub struct FilmGlsInputs {
    pub in_file: Option<PathBuf>,
    pub design_file: Option<PathBuf>,
    pub tcon_file: Option<PathBuf>,
    pub fcon_file: Option<PathBuf>,
    pub threshold: Option<f64>,
    pub smooth_autocorr: bool,
    pub mask_size: Option<u32>,
    pub autocorr_noestimate: bool,
    pub results_dir: Option<PathBuf>,
}

fn numbered(results_dir: &Path, stem: &str, count: usize) -> Vec<PathBuf> {
    (1..=count)
        .map(|i| results_dir.join(format!("{stem}{i}.nii.gz")))
        .collect()
}

pub fn predict_outputs(inputs: &FilmGlsInputs, cfg: &RunConfig) -> Result<Outputs, TaskError> {
    let results_dir = resolve_under(
        inputs.results_dir.as_deref().unwrap_or(Path::new("results")),
        &cfg.output_dir,
    );

    let mut outputs = Outputs::new();
    outputs.insert("results_dir", OutputValue::Path(results_dir.clone()));
    if let Some(design_file) = &inputs.design_file {
        if let Some(numpes) = count_waves(design_file)? {
            outputs.insert(
                "param_estimates",
                OutputValue::Paths(numbered(&results_dir, "pe", numpes)),
            );
        }
    }
    outputs.insert("residual4d", OutputValue::Path(results_dir.join("res4d.nii.gz")));
    outputs.insert("dof_file", OutputValue::Path(results_dir.join("dof")));
    outputs.insert(
        "sigmasquareds",
        OutputValue::Path(results_dir.join("sigmasquareds.nii.gz")),
    );
    outputs.insert(
        "thresholdac",
        OutputValue::Path(results_dir.join("threshac1.nii.gz")),
    );
    outputs.insert("logfile", OutputValue::Path(results_dir.join("logfile")));

    let numtcons = match &inputs.tcon_file {
        Some(tcon) => count_contrasts(tcon)?.unwrap_or(0),
        None => 0,
    };
    if numtcons > 0 {
        outputs.insert("copes", OutputValue::Paths(numbered(&results_dir, "cope", numtcons)));
        outputs.insert(
            "varcopes",
            OutputValue::Paths(numbered(&results_dir, "varcope", numtcons)),
        );
        outputs.insert("zstats", OutputValue::Paths(numbered(&results_dir, "zstat", numtcons)));
        outputs.insert("tstats", OutputValue::Paths(numbered(&results_dir, "tstat", numtcons)));
    }
    let numfcons = match &inputs.fcon_file {
        Some(fcon) => count_contrasts(fcon)?.unwrap_or(0),
        None => 0,
    };
    if numfcons > 0 {
        outputs.insert("fstats", OutputValue::Paths(numbered(&results_dir, "fstat", numfcons)));
        outputs.insert(
            "zfstats",
            OutputValue::Paths(numbered(&results_dir, "zfstat", numfcons)),
        );
    }
    Ok(outputs)
}

pub fn arg_generator(inputs: &FilmGlsInputs, _cfg: &RunConfig) -> Result<Vec<String>, TaskError> {
    let in_file = inputs
        .in_file
        .as_deref()
        .ok_or(TaskError::MissingInput("in_file"))?;

    let mut args_vec: Vec<String> = Vec::new();
    args_vec.push(format!("--in={}", path_arg(in_file)));
    if let Some(design_file) = &inputs.design_file {
        args_vec.push(format!("--pd={}", path_arg(design_file)));
    }
    if let Some(tcon_file) = &inputs.tcon_file {
        args_vec.push(format!("--con={}", path_arg(tcon_file)));
    }
    if let Some(fcon_file) = &inputs.fcon_file {
        args_vec.push(format!("--fcon={}", path_arg(fcon_file)));
    }
    if let Some(threshold) = inputs.threshold {
        args_vec.push(format!("--thr={threshold}"));
    }
    if inputs.smooth_autocorr {
        args_vec.push("--sa".to_string());
    }
    if let Some(mask_size) = inputs.mask_size {
        args_vec.push(format!("--ms={mask_size}"));
    }
    if inputs.autocorr_noestimate {
        args_vec.push("--noest".to_string());
    }
    if let Some(results_dir) = &inputs.results_dir {
        args_vec.push(format!("--rn={}", path_arg(results_dir)));
    }
    Ok(args_vec)
}
