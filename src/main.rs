use std::io::Write;

use anyhow::Result;
use env_logger::Builder;
use log::{LevelFilter, info};

use fsl_tasks::cli::{self, ToolCommand};
use fsl_tasks::config::defs::{
    BET_TAG, CLUSTER_TAG, EDDY_TAG, FAST_TAG, FEAT_TAG, MELODIC_TAG, OutputType, RunConfig,
    TOOL_VERSIONS,
};
use fsl_tasks::tasks::{self, OutputValue, Outputs};
use fsl_tasks::utils::fsquery::LocalFs;

fn main() -> Result<()> {
    let cli = cli::parse();

    let log_level = if cli.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    Builder::new()
        .filter_level(log_level)
        .format(|buf, record| {
            writeln!(
                buf,
                "[{}] {}: {}",
                chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
                record.level(),
                record.args()
            )
        })
        .init();

    let output_type = match &cli.output_type {
        Some(name) => name.parse::<OutputType>()?,
        None => OutputType::from_env()?,
    };
    let output_dir = std::path::absolute(&cli.output_dir)?;
    info!("Anchoring outputs under {:?} as {}", output_dir, output_type.name());

    let cfg = RunConfig {
        output_dir,
        output_type,
    };
    let fs = LocalFs;

    match &cli.tool {
        ToolCommand::Bet(args) => {
            let inputs = args.to_inputs();
            report(
                BET_TAG,
                &tasks::bet::arg_generator(&inputs, &cfg)?,
                &tasks::bet::predict_outputs(&inputs, &cfg)?,
            );
        }
        ToolCommand::Fast(args) => {
            let inputs = args.to_inputs();
            report(
                FAST_TAG,
                &tasks::fast::arg_generator(&inputs, &cfg)?,
                &tasks::fast::predict_outputs(&inputs, &cfg)?,
            );
        }
        ToolCommand::Melodic(args) => {
            let inputs = args.to_inputs();
            report(
                MELODIC_TAG,
                &tasks::melodic::arg_generator(&inputs, &cfg)?,
                &tasks::melodic::predict_outputs(&inputs, &cfg)?,
            );
        }
        ToolCommand::Cluster(args) => {
            let inputs = args.to_inputs();
            report(
                CLUSTER_TAG,
                &tasks::cluster::arg_generator(&inputs, &cfg)?,
                &tasks::cluster::predict_outputs(&inputs, &cfg)?,
            );
        }
        ToolCommand::Eddy(args) => {
            let inputs = args.to_inputs();
            report(
                EDDY_TAG,
                &tasks::eddy::arg_generator(&inputs, &cfg)?,
                &tasks::eddy::predict_outputs(&inputs, &cfg, &fs)?,
            );
        }
        ToolCommand::Feat(args) => {
            let inputs = args.to_inputs();
            report(
                FEAT_TAG,
                &tasks::feat::arg_generator(&inputs, &cfg)?,
                &tasks::feat::predict_outputs(&inputs, &cfg, &fs)?,
            );
        }
        ToolCommand::Tools => {
            let mut tools: Vec<_> = TOOL_VERSIONS.iter().collect();
            tools.sort_by(|a, b| a.0.cmp(b.0));
            for (tool, version) in tools {
                println!("{tool}\t>= FSL {version}");
            }
        }
    }
    Ok(())
}

fn report(tool: &str, args_vec: &[String], outputs: &Outputs) {
    println!("command: {} {}", tool, args_vec.join(" "));
    for (name, value) in outputs {
        match value {
            OutputValue::Path(path) => println!("{name}\t{}", path.display()),
            OutputValue::Paths(paths) => {
                for path in paths {
                    println!("{name}\t{}", path.display());
                }
            }
            OutputValue::Unset => println!("{name}\t<unset>"),
        }
    }
}
