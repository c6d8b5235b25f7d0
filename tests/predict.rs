use std::fs::{self, File};
use std::io::Write;
use std::path::PathBuf;

use anyhow::Result;
use tempfile::tempdir;

use fsl_tasks::config::defs::{OutputType, RunConfig, TaskError};
use fsl_tasks::tasks::bet::{self, BetInputs};
use fsl_tasks::tasks::cluster::{self, ClusterInputs};
use fsl_tasks::tasks::eddy::{self, EddyInputs};
use fsl_tasks::tasks::fast::{self, FastInputs};
use fsl_tasks::tasks::feat::{self, FeatInputs};
use fsl_tasks::tasks::filmgls::{self, FilmGlsInputs};
use fsl_tasks::tasks::{OutputRequest, Outputs};
use fsl_tasks::utils::fsquery::LocalFs;

fn cfg(output_dir: PathBuf) -> RunConfig {
    RunConfig {
        output_dir,
        output_type: OutputType::NiftiGz,
    }
}

fn names(outputs: &Outputs) -> Vec<&'static str> {
    outputs.keys().copied().collect()
}

#[test]
fn test_bet_minimal_invocation() -> Result<()> {
    let config = cfg(PathBuf::from("/data/run"));
    let inputs = BetInputs {
        in_file: Some(PathBuf::from("brain.nii.gz")),
        ..Default::default()
    };
    let outputs = bet::predict_outputs(&inputs, &config)?;
    assert_eq!(names(&outputs), vec!["out_file"]);
    assert_eq!(
        outputs["out_file"].path().unwrap(),
        std::path::Path::new("/data/run/brain_brain.nii.gz")
    );
    Ok(())
}

#[test]
fn test_bet_mask_invocation() -> Result<()> {
    let config = cfg(PathBuf::from("/data/run"));
    let inputs = BetInputs {
        in_file: Some(PathBuf::from("brain.nii.gz")),
        mask: true,
        ..Default::default()
    };
    let outputs = bet::predict_outputs(&inputs, &config)?;
    assert_eq!(names(&outputs), vec!["mask_file", "out_file"]);
    assert_eq!(
        outputs["mask_file"].path().unwrap(),
        std::path::Path::new("/data/run/brain_brain_mask.nii.gz")
    );
    Ok(())
}

#[test]
fn test_bet_predictions_are_deterministic() -> Result<()> {
    let config = cfg(PathBuf::from("/data/run"));
    let inputs = BetInputs {
        in_file: Some(PathBuf::from("brain.nii.gz")),
        surfaces: true,
        skull: true,
        ..Default::default()
    };
    let first = bet::predict_outputs(&inputs, &config)?;
    let second = bet::predict_outputs(&inputs, &config)?;
    assert_eq!(first, second);
    Ok(())
}

#[test]
fn test_fast_numbering_boundary() -> Result<()> {
    let config = cfg(PathBuf::from("/work"));
    let one = FastInputs {
        in_files: vec![PathBuf::from("/scans/t1.nii.gz")],
        output_biascorrected: Some(true),
        ..Default::default()
    };
    let outputs = fast::predict_outputs(&one, &config)?;
    assert_eq!(
        outputs["restored_image"].paths().unwrap(),
        &[PathBuf::from("/scans/t1_restore.nii.gz")]
    );

    let two = FastInputs {
        in_files: vec![PathBuf::from("/scans/t1.nii.gz"), PathBuf::from("/scans/t2.nii.gz")],
        output_biascorrected: Some(true),
        ..Default::default()
    };
    let outputs = fast::predict_outputs(&two, &config)?;
    assert_eq!(
        outputs["restored_image"].paths().unwrap(),
        &[
            PathBuf::from("/scans/t2_restore_1.nii.gz"),
            PathBuf::from("/scans/t2_restore_2.nii.gz"),
        ]
    );
    Ok(())
}

#[test]
fn test_cluster_extension_asymmetry() -> Result<()> {
    let config = cfg(PathBuf::from("/stats"));
    let inputs = ClusterInputs {
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
    };
    let outputs = cluster::predict_outputs(&inputs, &config)?;
    let txt = outputs["localmax_txt_file"].path().unwrap();
    let vol = outputs["localmax_vol_file"].path().unwrap();
    assert!(txt.to_string_lossy().ends_with("_localmax.txt"));
    assert!(vol.to_string_lossy().ends_with("_localmax.nii.gz"));
    Ok(())
}

#[test]
fn test_eddy_existence_gating_on_disk() -> Result<()> {
    let dir = tempdir()?;
    let config = cfg(dir.path().to_path_buf());
    let mut inputs = EddyInputs {
        in_file: Some(PathBuf::from("dwi.nii.gz")),
        in_mask: Some(PathBuf::from("mask.nii.gz")),
        in_index: Some(PathBuf::from("index.txt")),
        in_acqp: Some(PathBuf::from("acqp.txt")),
        in_bvec: Some(PathBuf::from("bvecs")),
        in_bval: Some(PathBuf::from("bvals")),
        out_base: Some(PathBuf::from("corrected")),
        repol: true,
        ..Default::default()
    };

    let outputs = eddy::predict_outputs(&inputs, &config, &LocalFs)?;
    assert!(!outputs.contains_key("out_outlier_free"));
    assert!(!outputs.contains_key("out_rotated_bvecs"));

    File::create(dir.path().join("corrected.eddy_outlier_free_data"))?;
    File::create(dir.path().join("corrected.eddy_rotated_bvecs"))?;
    let outputs = eddy::predict_outputs(&inputs, &config, &LocalFs)?;
    assert_eq!(
        outputs["out_outlier_free"].path().unwrap(),
        dir.path().join("corrected.eddy_outlier_free_data")
    );
    assert!(outputs.contains_key("out_rotated_bvecs"));

    // same disk state, flag off: the outlier-free key disappears again
    inputs.repol = false;
    let outputs = eddy::predict_outputs(&inputs, &config, &LocalFs)?;
    assert!(!outputs.contains_key("out_outlier_free"));
    Ok(())
}

#[test]
fn test_filmgls_contrast_counting_end_to_end() -> Result<()> {
    let dir = tempdir()?;
    let design_path = dir.path().join("design.mat");
    let mut design = File::create(&design_path)?;
    writeln!(design, "/NumWaves\t4")?;
    writeln!(design, "/NumPoints\t180")?;
    writeln!(design, "/Matrix")?;

    let tcon_path = dir.path().join("design.con");
    let mut tcon = File::create(&tcon_path)?;
    writeln!(tcon, "/NumWaves\t4")?;
    writeln!(tcon, "/NumContrasts\t2")?;

    let config = cfg(dir.path().to_path_buf());
    let inputs = FilmGlsInputs {
        in_file: Some(PathBuf::from("filtered_func_data.nii.gz")),
        design_file: Some(design_path),
        tcon_file: Some(tcon_path),
        ..Default::default()
    };
    let outputs = filmgls::predict_outputs(&inputs, &config)?;
    assert_eq!(outputs["param_estimates"].paths().unwrap().len(), 4);
    assert_eq!(
        outputs["copes"].paths().unwrap()[1],
        dir.path().join("results/cope2.nii.gz")
    );
    assert_eq!(
        outputs["zstats"].paths().unwrap()[0],
        dir.path().join("results/zstat1.nii.gz")
    );
    Ok(())
}

#[test]
fn test_feat_directory_discovery() -> Result<()> {
    let dir = tempdir()?;
    let fsf_path = dir.path().join("design.fsf");
    let mut fsf = File::create(&fsf_path)?;
    writeln!(fsf, "set fmri(level) 1")?;
    writeln!(fsf, "set fmri(outputdir) \"{}\"", dir.path().join("gone.feat").display())?;

    fs::create_dir(dir.path().join("analysis.feat"))?;

    let config = cfg(dir.path().to_path_buf());
    let inputs = FeatInputs {
        fsf_file: Some(fsf_path),
    };
    // the declared directory does not exist, so the sweep finds analysis.feat
    let outputs = feat::predict_outputs(&inputs, &config, &LocalFs)?;
    assert_eq!(
        outputs["feat_dir"].path().unwrap(),
        dir.path().join("analysis.feat")
    );
    Ok(())
}

#[test]
fn test_feat_no_match_errors() -> Result<()> {
    let dir = tempdir()?;
    let fsf_path = dir.path().join("design.fsf");
    File::create(&fsf_path)?;

    let config = cfg(dir.path().to_path_buf());
    let inputs = FeatInputs {
        fsf_file: Some(fsf_path),
    };
    let err = feat::predict_outputs(&inputs, &config, &LocalFs).unwrap_err();
    assert!(matches!(err, TaskError::OutputDirNotFound { .. }));
    Ok(())
}
