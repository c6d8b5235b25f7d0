//! Cluster-level thresholding and reporting of statistic images (`cluster`).

use std::path::PathBuf;

use crate::config::defs::{RunConfig, TaskError};
use crate::tasks::{OutputRequest, OutputValue, Outputs, path_arg};
use crate::utils::file::{resolve_under, split_filename};

#[derive(Debug, Clone, Default)]
pub struct ClusterInputs {
    pub in_file: Option<PathBuf>,
    pub threshold: Option<f64>,
    pub out_index_file: OutputRequest,
    pub out_threshold_file: OutputRequest,
    pub out_localmax_txt_file: OutputRequest,
    pub out_localmax_vol_file: OutputRequest,
    pub out_size_file: OutputRequest,
    pub out_max_file: OutputRequest,
    pub out_mean_file: OutputRequest,
    pub out_pval_file: OutputRequest,
    pub pthreshold: Option<f64>,
    pub peak_distance: Option<f64>,
    pub cope_file: Option<PathBuf>,
    pub volume: Option<u64>,
    pub dlh: Option<f64>,
    pub fractional: bool,
    pub connectivity: Option<u32>,
    pub use_mm: bool,
    pub find_min: bool,
    pub no_table: bool,
    pub minclustersize: bool,
    pub num_maxima: Option<u32>,
    pub xfm_file: Option<PathBuf>,
    pub std_space_file: Option<PathBuf>,
    pub warpfield_file: Option<PathBuf>,
}

/// output key, request accessor, suffix, whether the input's own extension is
/// kept (the local-maxima table is always plain text).
fn requested(
    inputs: &ClusterInputs,
) -> [(&'static str, &OutputRequest, &'static str, bool); 8] {
    [
        ("index_file", &inputs.out_index_file, "_index", true),
        ("threshold_file", &inputs.out_threshold_file, "_threshold", true),
        ("localmax_txt_file", &inputs.out_localmax_txt_file, "_localmax", false),
        ("localmax_vol_file", &inputs.out_localmax_vol_file, "_localmax", true),
        ("size_file", &inputs.out_size_file, "_size", true),
        ("max_file", &inputs.out_max_file, "_max", true),
        ("mean_file", &inputs.out_mean_file, "_mean", true),
        ("pval_file", &inputs.out_pval_file, "_pval", true),
    ]
}

pub fn predict_outputs(inputs: &ClusterInputs, cfg: &RunConfig) -> Result<Outputs, TaskError> {
    let mut outputs = Outputs::new();
    for (name, request, suffix, keep_ext) in requested(inputs) {
        let path = match request {
            OutputRequest::Skip => continue,
            OutputRequest::Explicit(p) => resolve_under(p, &cfg.output_dir),
            OutputRequest::Derive => {
                let in_file = inputs.in_file.as_deref().ok_or(
                    TaskError::MissingPrerequisite {
                        output: name,
                        requires: "in_file",
                    },
                )?;
                let (dir, stem, ext) = split_filename(in_file);
                let ext = if keep_ext { ext } else { ".txt".to_string() };
                resolve_under(&dir.join(format!("{stem}{suffix}{ext}")), &cfg.output_dir)
            }
        };
        outputs.insert(name, OutputValue::Path(path));
    }
    Ok(outputs)
}

pub fn arg_generator(inputs: &ClusterInputs, cfg: &RunConfig) -> Result<Vec<String>, TaskError> {
    let in_file = inputs
        .in_file
        .as_deref()
        .ok_or(TaskError::MissingInput("in_file"))?;
    let threshold = inputs
        .threshold
        .ok_or(TaskError::MissingInput("threshold"))?;
    let outputs = predict_outputs(inputs, cfg)?;
    let out_arg = |key: &str, flag: &str| -> Option<String> {
        outputs
            .get(key)
            .and_then(OutputValue::path)
            .map(|p| format!("--{flag}={}", p.display()))
    };

    let mut args_vec: Vec<String> = Vec::new();
    args_vec.push(format!("--in={}", path_arg(in_file)));
    args_vec.push(format!("--thresh={threshold:.10}"));
    args_vec.extend(out_arg("index_file", "oindex"));
    args_vec.extend(out_arg("threshold_file", "othresh"));
    args_vec.extend(out_arg("localmax_txt_file", "olmax"));
    args_vec.extend(out_arg("localmax_vol_file", "olmaxim"));
    args_vec.extend(out_arg("size_file", "osize"));
    args_vec.extend(out_arg("max_file", "omax"));
    args_vec.extend(out_arg("mean_file", "omean"));
    args_vec.extend(out_arg("pval_file", "opvals"));
    if let Some(pthreshold) = inputs.pthreshold {
        if inputs.dlh.is_none() || inputs.volume.is_none() {
            return Err(TaskError::MissingPrerequisite {
                output: "pthreshold",
                requires: "dlh and volume",
            });
        }
        args_vec.push(format!("--pthresh={pthreshold:.10}"));
    }
    if let Some(peak_distance) = inputs.peak_distance {
        args_vec.push(format!("--peakdist={peak_distance:.10}"));
    }
    if let Some(cope_file) = &inputs.cope_file {
        args_vec.push(format!("--cope={}", path_arg(cope_file)));
    }
    if let Some(volume) = inputs.volume {
        args_vec.push(format!("--volume={volume}"));
    }
    if let Some(dlh) = inputs.dlh {
        args_vec.push(format!("--dlh={dlh:.10}"));
    }
    if inputs.fractional {
        args_vec.push("--fractional".to_string());
    }
    if let Some(connectivity) = inputs.connectivity {
        args_vec.push(format!("--connectivity={connectivity}"));
    }
    if inputs.use_mm {
        args_vec.push("--mm".to_string());
    }
    if inputs.find_min {
        args_vec.push("--min".to_string());
    }
    if inputs.no_table {
        args_vec.push("--no_table".to_string());
    }
    if inputs.minclustersize {
        args_vec.push("--minclustersize".to_string());
    }
    if let Some(num_maxima) = inputs.num_maxima {
        args_vec.push(format!("--num={num_maxima}"));
    }
    if let Some(xfm_file) = &inputs.xfm_file {
        args_vec.push(format!("--xfm={}", path_arg(xfm_file)));
    }
    if let Some(std_space_file) = &inputs.std_space_file {
        args_vec.push(format!("--stdvol={}", path_arg(std_space_file)));
    }
    if let Some(warpfield_file) = &inputs.warpfield_file {
        args_vec.push(format!("--warpvol={}", path_arg(warpfield_file)));
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
            output_dir: PathBuf::from("/stats"),
            output_type: OutputType::NiftiGz,
        }
    }

    fn all_requested() -> ClusterInputs {
        ClusterInputs {
            in_file: Some(PathBuf::from("zstat1.nii.gz")),
            threshold: Some(2.3),
            out_index_file: OutputRequest::Derive,
            out_threshold_file: OutputRequest::Derive,
            out_localmax_txt_file: OutputRequest::Derive,
            out_localmax_vol_file: OutputRequest::Derive,
            out_size_file: OutputRequest::Derive,
            out_max_file: OutputRequest::Derive,
            out_mean_file: OutputRequest::Derive,
            out_pval_file: OutputRequest::Derive,
            ..Default::default()
        }
    }

    #[test]
    fn test_derived_names_keep_input_extension() {
        let outputs = predict_outputs(&all_requested(), &cfg()).unwrap();
        assert_eq!(outputs.len(), 8);
        assert_eq!(
            outputs["index_file"].path().unwrap(),
            Path::new("/stats/zstat1_index.nii.gz")
        );
        assert_eq!(
            outputs["localmax_vol_file"].path().unwrap(),
            Path::new("/stats/zstat1_localmax.nii.gz")
        );
        // the text table is the one output with a fixed extension
        assert_eq!(
            outputs["localmax_txt_file"].path().unwrap(),
            Path::new("/stats/zstat1_localmax.txt")
        );
    }

    #[test]
    fn test_unrequested_outputs_absent() {
        let inputs = ClusterInputs {
            in_file: Some(PathBuf::from("zstat1.nii.gz")),
            threshold: Some(2.3),
            out_index_file: OutputRequest::Derive,
            ..Default::default()
        };
        let outputs = predict_outputs(&inputs, &cfg()).unwrap();
        assert_eq!(outputs.len(), 1);
        assert!(outputs.contains_key("index_file"));
    }

    #[test]
    fn test_explicit_path_wins() {
        let inputs = ClusterInputs {
            in_file: Some(PathBuf::from("zstat1.nii.gz")),
            out_mean_file: OutputRequest::Explicit(PathBuf::from("means.nii.gz")),
            ..Default::default()
        };
        let outputs = predict_outputs(&inputs, &cfg()).unwrap();
        assert_eq!(
            outputs["mean_file"].path().unwrap(),
            Path::new("/stats/means.nii.gz")
        );
    }

    #[test]
    fn test_derive_without_in_file() {
        let inputs = ClusterInputs {
            out_index_file: OutputRequest::Derive,
            ..Default::default()
        };
        let err = predict_outputs(&inputs, &cfg()).unwrap_err();
        assert!(matches!(
            err,
            TaskError::MissingPrerequisite { output: "index_file", requires: "in_file" }
        ));
    }

    #[test]
    fn test_arg_generator_formats_threshold() {
        let args_vec = arg_generator(&all_requested(), &cfg()).unwrap();
        assert_eq!(args_vec[0], "--in=zstat1.nii.gz");
        assert_eq!(args_vec[1], "--thresh=2.3000000000");
        assert!(args_vec.contains(&"--oindex=/stats/zstat1_index.nii.gz".to_string()));
    }

    #[test]
    fn test_pthreshold_requires_dlh_and_volume() {
        let mut inputs = all_requested();
        inputs.pthreshold = Some(0.01);
        let err = arg_generator(&inputs, &cfg()).unwrap_err();
        assert!(matches!(err, TaskError::MissingPrerequisite { .. }));
    }
}
