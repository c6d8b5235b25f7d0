//! Mixed-effects GLM fitting (`flameo`).
//!
//! flameo numbers its statistic images at runtime, so prediction is a sweep
//! of the log directory rather than path arithmetic.

use std::path::{Path, PathBuf};

use crate::config::defs::{RunConfig, TaskError};
use crate::tasks::{OutputValue, Outputs, path_arg};
use crate::utils::file::{human_order_sort, resolve_under};
use crate::utils::fsquery::FileQuery;

#[derive(Debug, Clone, Default)]
pub struct FlameoInputs {
    pub cope_file: Option<PathBuf>,
    pub var_cope_file: Option<PathBuf>,
    pub dof_var_cope_file: Option<PathBuf>,
    pub mask_file: Option<PathBuf>,
    pub design_file: Option<PathBuf>,
    pub t_con_file: Option<PathBuf>,
    pub f_con_file: Option<PathBuf>,
    pub cov_split_file: Option<PathBuf>,
    /// `fe`, `ols`, `flame1` or `flame12`.
    pub run_mode: Option<String>,
    pub n_jumps: Option<u32>,
    pub burnin: Option<u32>,
    pub infer_outliers: bool,
    pub log_dir: Option<PathBuf>,
}

const GLOBBED_OUTPUTS: &[(&str, &str)] = &[
    ("pes", "pe[0-9]*.*"),
    ("copes", "cope[0-9]*.*"),
    ("var_copes", "varcope[0-9]*.*"),
    ("zstats", "zstat[0-9]*.*"),
    ("tstats", "tstat[0-9]*.*"),
    ("mrefvars", "mean_random_effects_var[0-9]*.*"),
    ("tdof", "tdof_t[0-9]*.*"),
    ("weights", "weights[0-9]*.*"),
];

const FTEST_OUTPUTS: &[(&str, &str)] = &[
    ("zfstats", "zfstat[0-9]*.*"),
    ("fstats", "fstat[0-9]*.*"),
];

pub fn predict_outputs(
    inputs: &FlameoInputs,
    cfg: &RunConfig,
    fs: &dyn FileQuery,
) -> Result<Outputs, TaskError> {
    let log_dir = resolve_under(
        inputs.log_dir.as_deref().unwrap_or(Path::new("stats")),
        &cfg.output_dir,
    );
    let sweep = |pattern: &str| -> Result<Vec<PathBuf>, TaskError> {
        let mut hits = fs.glob(&log_dir.join(pattern).to_string_lossy())?;
        human_order_sort(&mut hits);
        Ok(hits)
    };

    let mut outputs = Outputs::new();
    for &(name, pattern) in GLOBBED_OUTPUTS {
        let hits = sweep(pattern)?;
        if !hits.is_empty() {
            outputs.insert(name, OutputValue::Paths(hits));
        }
    }
    if inputs.f_con_file.is_some() {
        for &(name, pattern) in FTEST_OUTPUTS {
            let hits = sweep(pattern)?;
            if !hits.is_empty() {
                outputs.insert(name, OutputValue::Paths(hits));
            }
        }
    }
    let mut res4d = sweep("res4d.*")?;
    if res4d.len() == 1 {
        outputs.insert("res4d", OutputValue::Path(res4d.remove(0)));
    }
    outputs.insert("stats_dir", OutputValue::Path(log_dir));
    Ok(outputs)
}

pub fn arg_generator(inputs: &FlameoInputs, _cfg: &RunConfig) -> Result<Vec<String>, TaskError> {
    let cope_file = inputs.cope_file.as_deref().ok_or(TaskError::MissingInput("cope_file"))?;
    let mask_file = inputs.mask_file.as_deref().ok_or(TaskError::MissingInput("mask_file"))?;
    let design_file = inputs
        .design_file
        .as_deref()
        .ok_or(TaskError::MissingInput("design_file"))?;
    let t_con_file = inputs
        .t_con_file
        .as_deref()
        .ok_or(TaskError::MissingInput("t_con_file"))?;
    let cov_split_file = inputs
        .cov_split_file
        .as_deref()
        .ok_or(TaskError::MissingInput("cov_split_file"))?;
    let run_mode = inputs
        .run_mode
        .as_deref()
        .ok_or(TaskError::MissingInput("run_mode"))?;

    let mut args_vec: Vec<String> = Vec::new();
    args_vec.push(format!("--copefile={}", path_arg(cope_file)));
    if let Some(var_cope) = &inputs.var_cope_file {
        args_vec.push(format!("--varcopefile={}", path_arg(var_cope)));
    }
    if let Some(dof_var_cope) = &inputs.dof_var_cope_file {
        args_vec.push(format!("--dofvarcopefile={}", path_arg(dof_var_cope)));
    }
    args_vec.push(format!("--maskfile={}", path_arg(mask_file)));
    args_vec.push(format!("--designfile={}", path_arg(design_file)));
    args_vec.push(format!("--tcontrastsfile={}", path_arg(t_con_file)));
    if let Some(f_con) = &inputs.f_con_file {
        args_vec.push(format!("--fcontrastsfile={}", path_arg(f_con)));
    }
    args_vec.push(format!("--covsplitfile={}", path_arg(cov_split_file)));
    args_vec.push(format!("--runmode={run_mode}"));
    if let Some(n_jumps) = inputs.n_jumps {
        args_vec.push(format!("--njumps={n_jumps}"));
    }
    if let Some(burnin) = inputs.burnin {
        args_vec.push(format!("--burnin={burnin}"));
    }
    if inputs.infer_outliers {
        args_vec.push("--inferoutliers".to_string());
    }
    if let Some(log_dir) = &inputs.log_dir {
        args_vec.push(format!("--ld={}", path_arg(log_dir)));
    }
    Ok(args_vec)
}
