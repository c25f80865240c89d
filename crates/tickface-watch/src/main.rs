mod cli;

use anyhow::Result;
use clap::Parser;
use winit::dpi::LogicalSize;

use tickface_clock::ClockApp;
use tickface_engine::device::GpuInit;
use tickface_engine::logging::{init_logging, LoggingConfig};
use tickface_engine::window::{Runtime, RuntimeConfig};

use cli::CliArgs;

fn main() {
    if let Err(e) = run() {
        eprintln!("tickface: {e:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let args = CliArgs::parse();

    init_logging(LoggingConfig {
        env_filter: args.log.clone(),
        ..LoggingConfig::default()
    });

    let runtime = RuntimeConfig {
        title: args.title.clone(),
        initial_size: LogicalSize::new(args.width, args.height),
        ..RuntimeConfig::default()
    };
    let face = args.face_config();
    log::info!(
        "starting {}x{} face, {:?} {:?} sweep",
        args.width,
        args.height,
        face.sweep_duration,
        face.sweep_curve
    );

    Runtime::run(runtime, GpuInit::default(), ClockApp::new(face))
}
