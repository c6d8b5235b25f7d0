//! Single-subject QC reports for eddy runs (`eddy_quad`).

use std::path::{Path, PathBuf};

use crate::config::defs::{RunConfig, TaskError};
use crate::tasks::{OutputValue, Outputs, path_arg};
use crate::utils::file::resolve_under;
use crate::utils::fsquery::FileQuery;

#[derive(Debug, Clone, Default)]
pub struct EddyQuadInputs {
    /// Basename of the eddy output being checked.
    pub base_name: Option<PathBuf>,
    pub idx_file: Option<PathBuf>,
    pub param_file: Option<PathBuf>,
    pub mask_file: Option<PathBuf>,
    pub bval_file: Option<PathBuf>,
    pub bvec_file: Option<PathBuf>,
    pub field: Option<PathBuf>,
    pub slice_spec: Option<PathBuf>,
    pub output_dir: Option<PathBuf>,
    pub verbose: bool,
}

pub fn predict_outputs(
    inputs: &EddyQuadInputs,
    cfg: &RunConfig,
    fs: &dyn FileQuery,
) -> Result<Outputs, TaskError> {
    let base_name = inputs
        .base_name
        .as_deref()
        .unwrap_or(Path::new("eddy_corrected"));
    // the tool itself falls back to <basename>.qc when -o is not given
    let out_dir = match &inputs.output_dir {
        Some(dir) => resolve_under(dir, &cfg.output_dir),
        None => {
            let stem = base_name
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            cfg.output_dir.join(format!("{stem}.qc"))
        }
    };

    let mut outputs = Outputs::new();
    outputs.insert("qc_json", OutputValue::Path(out_dir.join("qc.json")));
    outputs.insert("qc_pdf", OutputValue::Path(out_dir.join("qc.pdf")));

    // grabs the avg_b0_pe* files too; they are carved out below when a
    // fieldmap was supplied
    let mut avg_b = fs.glob(&out_dir.join("avg_b*.png").to_string_lossy())?;
    if inputs.field.is_some() {
        let avg_b0_pe = fs.glob(&out_dir.join("avg_b0_pe*.png").to_string_lossy())?;
        avg_b.retain(|p| !avg_b0_pe.contains(p));
        outputs.insert("avg_b0_pe_png", OutputValue::Paths(avg_b0_pe));
        outputs.insert("vdm_png", OutputValue::Path(out_dir.join("vdm.png")));
    }
    outputs.insert("avg_b_png", OutputValue::Paths(avg_b));

    let cnr = fs.glob(&out_dir.join("cnr*.png").to_string_lossy())?;
    outputs.insert("cnr_png", OutputValue::Paths(cnr));

    let residuals = out_dir.join("eddy_msr.txt");
    if fs.exists(&residuals) {
        outputs.insert("residuals", OutputValue::Path(residuals));
    }
    let clean_volumes = out_dir.join("vols_no_outliers.txt");
    if fs.exists(&clean_volumes) {
        outputs.insert("clean_volumes", OutputValue::Path(clean_volumes));
    }
    Ok(outputs)
}

pub fn arg_generator(inputs: &EddyQuadInputs, _cfg: &RunConfig) -> Result<Vec<String>, TaskError> {
    let base_name = inputs
        .base_name
        .as_deref()
        .unwrap_or(Path::new("eddy_corrected"));
    let idx_file = inputs.idx_file.as_deref().ok_or(TaskError::MissingInput("idx_file"))?;
    let param_file = inputs
        .param_file
        .as_deref()
        .ok_or(TaskError::MissingInput("param_file"))?;
    let mask_file = inputs
        .mask_file
        .as_deref()
        .ok_or(TaskError::MissingInput("mask_file"))?;
    let bval_file = inputs
        .bval_file
        .as_deref()
        .ok_or(TaskError::MissingInput("bval_file"))?;

    let mut args_vec: Vec<String> = Vec::new();
    args_vec.push(path_arg(base_name));
    args_vec.push("-idx".to_string());
    args_vec.push(path_arg(idx_file));
    args_vec.push("-par".to_string());
    args_vec.push(path_arg(param_file));
    args_vec.push("-m".to_string());
    args_vec.push(path_arg(mask_file));
    args_vec.push("-b".to_string());
    args_vec.push(path_arg(bval_file));
    if let Some(bvec) = &inputs.bvec_file {
        args_vec.push("-g".to_string());
        args_vec.push(path_arg(bvec));
    }
    if let Some(field) = &inputs.field {
        args_vec.push("-f".to_string());
        args_vec.push(path_arg(field));
    }
    if let Some(slice_spec) = &inputs.slice_spec {
        args_vec.push("-s".to_string());
        args_vec.push(path_arg(slice_spec));
    }
    if let Some(out_dir) = &inputs.output_dir {
        args_vec.push("-o".to_string());
        args_vec.push(path_arg(out_dir));
    }
    if inputs.verbose {
        args_vec.push("-v".to_string());
    }
    Ok(args_vec)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::defs::OutputType;
    use crate::utils::fsquery::MemFs;

    fn cfg() -> RunConfig {
        RunConfig {
            output_dir: PathBuf::from("/dwi"),
            output_type: OutputType::NiftiGz,
        }
    }

    #[test]
    fn test_default_qc_dir_from_base_name() {
        let inputs = EddyQuadInputs {
            base_name: Some(PathBuf::from("/dwi/corrected")),
            ..Default::default()
        };
        let fs = MemFs::new(Vec::<PathBuf>::new());
        let outputs = predict_outputs(&inputs, &cfg(), &fs).unwrap();
        assert_eq!(
            outputs["qc_json"].path().unwrap(),
            Path::new("/dwi/corrected.qc/qc.json")
        );
        assert_eq!(
            outputs["qc_pdf"].path().unwrap(),
            Path::new("/dwi/corrected.qc/qc.pdf")
        );
        assert!(!outputs.contains_key("residuals"));
    }

    #[test]
    fn test_field_splits_pe_averages_out() {
        let inputs = EddyQuadInputs {
            base_name: Some(PathBuf::from("corrected")),
            field: Some(PathBuf::from("fieldmap.nii.gz")),
            ..Default::default()
        };
        let fs = MemFs::new([
            "/dwi/corrected.qc/avg_b0.png",
            "/dwi/corrected.qc/avg_b1000.png",
            "/dwi/corrected.qc/avg_b0_pe0.png",
        ]);
        let outputs = predict_outputs(&inputs, &cfg(), &fs).unwrap();
        assert_eq!(
            outputs["avg_b_png"].paths().unwrap(),
            &[
                PathBuf::from("/dwi/corrected.qc/avg_b0.png"),
                PathBuf::from("/dwi/corrected.qc/avg_b1000.png"),
            ]
        );
        assert_eq!(
            outputs["avg_b0_pe_png"].paths().unwrap(),
            &[PathBuf::from("/dwi/corrected.qc/avg_b0_pe0.png")]
        );
        assert_eq!(
            outputs["vdm_png"].path().unwrap(),
            Path::new("/dwi/corrected.qc/vdm.png")
        );
    }

    #[test]
    fn test_text_reports_on_existence() {
        let inputs = EddyQuadInputs {
            base_name: Some(PathBuf::from("corrected")),
            ..Default::default()
        };
        let fs = MemFs::new(["/dwi/corrected.qc/eddy_msr.txt"]);
        let outputs = predict_outputs(&inputs, &cfg(), &fs).unwrap();
        assert!(outputs.contains_key("residuals"));
        assert!(!outputs.contains_key("clean_volumes"));
    }
}
