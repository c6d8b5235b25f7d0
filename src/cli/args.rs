use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::tasks::OutputRequest;
use crate::tasks::bet::BetInputs;
use crate::tasks::cluster::ClusterInputs;
use crate::tasks::eddy::EddyInputs;
use crate::tasks::fast::FastInputs;
use crate::tasks::feat::FeatInputs;
use crate::tasks::melodic::MelodicInputs;

/// Dry-run inspector: prints the command line a tool invocation would run
/// with and the output files it would leave behind.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Working directory predicted outputs are anchored to.
    #[arg(short = 'd', long = "output-dir", default_value = ".")]
    pub output_dir: PathBuf,

    /// NIFTI, NIFTI_GZ, NIFTI_PAIR or NIFTI_PAIR_GZ; read from FSLOUTPUTTYPE
    /// when omitted.
    #[arg(long = "output-type")]
    pub output_type: Option<String>,

    #[arg(short, long)]
    pub verbose: bool,

    #[command(subcommand)]
    pub tool: ToolCommand,
}

#[derive(Subcommand, Debug)]
pub enum ToolCommand {
    /// Brain extraction
    Bet(BetArgs),
    /// Tissue segmentation
    Fast(FastArgs),
    /// ICA decomposition
    Melodic(MelodicArgs),
    /// Cluster thresholding of a statistic image
    Cluster(ClusterArgs),
    /// Eddy-current correction
    Eddy(EddyArgs),
    /// Locate a FEAT analysis directory
    Feat(FeatArgs),
    /// List the wrapped executables and their minimum FSL release
    Tools,
}

#[derive(Args, Debug)]
pub struct BetArgs {
    #[arg(short = 'i', long = "in-file")]
    pub in_file: PathBuf,
    #[arg(short = 'o', long = "out-file")]
    pub out_file: Option<PathBuf>,
    #[arg(long)]
    pub mask: bool,
    #[arg(long)]
    pub outline: bool,
    #[arg(long)]
    pub skull: bool,
    #[arg(long)]
    pub mesh: bool,
    #[arg(long)]
    pub surfaces: bool,
    #[arg(long)]
    pub reduce_bias: bool,
    #[arg(long)]
    pub no_output: bool,
    #[arg(short = 'f', long)]
    pub frac: Option<f64>,
}

impl BetArgs {
    pub fn to_inputs(&self) -> BetInputs {
        BetInputs {
            in_file: Some(self.in_file.clone()),
            out_file: self.out_file.clone(),
            mask: self.mask,
            outline: self.outline,
            skull: self.skull,
            mesh: self.mesh,
            surfaces: self.surfaces,
            reduce_bias: self.reduce_bias,
            no_output: self.no_output,
            frac: self.frac,
            ..Default::default()
        }
    }
}

#[derive(Args, Debug)]
pub struct FastArgs {
    #[arg(short = 'i', long = "in-file", required = true, num_args = 1..)]
    pub in_files: Vec<PathBuf>,
    #[arg(short = 'o', long = "out-basename")]
    pub out_basename: Option<PathBuf>,
    #[arg(short = 'n', long = "classes")]
    pub number_classes: Option<usize>,
    #[arg(long)]
    pub segments: bool,
    #[arg(long)]
    pub no_pve: bool,
    #[arg(short = 'B', long)]
    pub biascorrected: bool,
    #[arg(short = 'b', long)]
    pub biasfield: bool,
    #[arg(short = 'p', long)]
    pub probability_maps: bool,
}

impl FastArgs {
    pub fn to_inputs(&self) -> FastInputs {
        FastInputs {
            in_files: self.in_files.clone(),
            out_basename: self.out_basename.clone(),
            number_classes: self.number_classes,
            segments: self.segments,
            no_pve: self.no_pve,
            output_biascorrected: self.biascorrected.then_some(true),
            output_biasfield: self.biasfield,
            probability_maps: self.probability_maps,
            ..Default::default()
        }
    }
}

#[derive(Args, Debug)]
pub struct MelodicArgs {
    #[arg(short = 'i', long = "in-file", required = true, num_args = 1..)]
    pub in_files: Vec<PathBuf>,
    #[arg(short = 'o', long = "out-dir")]
    pub out_dir: Option<PathBuf>,
    #[arg(long)]
    pub report: bool,
    #[arg(short = 'd', long)]
    pub dim: Option<usize>,
    #[arg(long)]
    pub no_bet: bool,
}

impl MelodicArgs {
    pub fn to_inputs(&self) -> MelodicInputs {
        MelodicInputs {
            in_files: self.in_files.clone(),
            out_dir: self.out_dir.clone(),
            report: self.report,
            dim: self.dim,
            no_bet: self.no_bet,
            ..Default::default()
        }
    }
}

#[derive(Args, Debug)]
pub struct ClusterArgs {
    #[arg(short = 'i', long = "in-file")]
    pub in_file: PathBuf,
    #[arg(short = 't', long)]
    pub threshold: f64,
    #[arg(long)]
    pub oindex: bool,
    #[arg(long)]
    pub othresh: bool,
    #[arg(long)]
    pub olmax: bool,
    #[arg(long)]
    pub olmaxim: bool,
    #[arg(long)]
    pub osize: bool,
    #[arg(long)]
    pub omax: bool,
    #[arg(long)]
    pub omean: bool,
    #[arg(long)]
    pub opvals: bool,
    #[arg(long)]
    pub mm: bool,
}

fn requested(flag: bool) -> OutputRequest {
    if flag { OutputRequest::Derive } else { OutputRequest::Skip }
}

impl ClusterArgs {
    pub fn to_inputs(&self) -> ClusterInputs {
        ClusterInputs {
            in_file: Some(self.in_file.clone()),
            threshold: Some(self.threshold),
            out_index_file: requested(self.oindex),
            out_threshold_file: requested(self.othresh),
            out_localmax_txt_file: requested(self.olmax),
            out_localmax_vol_file: requested(self.olmaxim),
            out_size_file: requested(self.osize),
            out_max_file: requested(self.omax),
            out_mean_file: requested(self.omean),
            out_pval_file: requested(self.opvals),
            use_mm: self.mm,
            ..Default::default()
        }
    }
}

#[derive(Args, Debug)]
pub struct EddyArgs {
    #[arg(long)]
    pub imain: PathBuf,
    #[arg(long)]
    pub mask: PathBuf,
    #[arg(long)]
    pub index: PathBuf,
    #[arg(long)]
    pub acqp: PathBuf,
    #[arg(long)]
    pub bvecs: PathBuf,
    #[arg(long)]
    pub bvals: PathBuf,
    #[arg(long)]
    pub out: Option<PathBuf>,
    #[arg(long)]
    pub repol: bool,
    #[arg(long)]
    pub cnr_maps: bool,
    #[arg(long)]
    pub residuals: bool,
    #[arg(long)]
    pub mporder: Option<u32>,
}

impl EddyArgs {
    pub fn to_inputs(&self) -> EddyInputs {
        EddyInputs {
            in_file: Some(self.imain.clone()),
            in_mask: Some(self.mask.clone()),
            in_index: Some(self.index.clone()),
            in_acqp: Some(self.acqp.clone()),
            in_bvec: Some(self.bvecs.clone()),
            in_bval: Some(self.bvals.clone()),
            out_base: self.out.clone(),
            repol: self.repol,
            cnr_maps: self.cnr_maps,
            residuals: self.residuals,
            mporder: self.mporder,
            ..Default::default()
        }
    }
}

#[derive(Args, Debug)]
pub struct FeatArgs {
    /// FEAT setup file (design.fsf)
    pub fsf_file: PathBuf,
}

impl FeatArgs {
    pub fn to_inputs(&self) -> FeatInputs {
        FeatInputs {
            fsf_file: Some(self.fsf_file.clone()),
        }
    }
}
