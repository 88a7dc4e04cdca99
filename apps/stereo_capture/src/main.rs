use std::{path::PathBuf, process::ExitCode};

use anyhow::{Context, Result};
use clap::Parser;
use rstereo_pair_writer::PairWriter;
use rstereo_sensor::{HighGuiDisplay, OpenCvBackend};
use stereocap::{probe_devices, CaptureExit, CaptureSession, ProbeOutcome, StereoCaptureCfg};

/// Preview two cameras side by side and save stereo image pairs.
///
/// Press 's' in the preview window to save the current pair, 'q' to quit.
#[derive(Parser, Debug)]
#[command(name = "stereo_capture", version, about, long_about = None)]
struct Args {
    /// TOML file overriding the built-in defaults
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Skip the device sweep before capturing
    #[arg(long, conflicts_with = "probe_only")]
    skip_probe: bool,

    /// Only sweep the devices, do not start capturing
    #[arg(long)]
    probe_only: bool,
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    match run(Args::parse()) {
        Ok(code) => code,
        Err(e) => {
            log::error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<ExitCode> {
    let cfg = match &args.config {
        Some(path) => StereoCaptureCfg::from_toml_file(path)?,
        None => StereoCaptureCfg::default(),
    };
    let settings = cfg.finalize().context("invalid configuration")?;
    let mut backend = OpenCvBackend::default();

    if !args.skip_probe {
        let reports = probe_devices(&mut backend, &settings.probe);
        let available = reports
            .iter()
            .filter(|r| matches!(r.outcome, ProbeOutcome::Available { .. }))
            .count();
        log::info!("{available} of {} probed devices available", reports.len());
    }
    if args.probe_only {
        return Ok(ExitCode::SUCCESS);
    }

    let mut session =
        CaptureSession::open(&mut backend, settings.session.clone(), HighGuiDisplay::new())
            .context("could not open one or both cameras")?;
    let writer = PairWriter::create(settings.layout.clone())?;

    let summary = session.run(&writer)?;
    log::info!("{} pair(s) saved", summary.saved_pairs);

    Ok(match summary.exit {
        CaptureExit::QuitRequested => ExitCode::SUCCESS,
        CaptureExit::ReadFailed { .. } => ExitCode::FAILURE,
    })
}
