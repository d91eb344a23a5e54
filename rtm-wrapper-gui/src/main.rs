mod logging;

use clap::Parser;
use log::LevelFilter;
use logging::{init_logging, parse_log_level};
use rtm_core::plot::PlotterRegistry;
use rtm_gui::{run_gui, GuiConfig};

#[derive(Parser)]
#[command(
    name = "rtm-wrapper-gui",
    about = "Run, inspect and plot radiative transfer sweeps",
    disable_version_flag = true
)]
struct Cli {
    /// Log level name (DEBUG, INFO, WARNING, ERROR, CRITICAL) or number (10-50)
    #[arg(long, default_value = "WARNING", value_parser = parse_log_level)]
    log_level: LevelFilter,
    /// Print version information and exit
    #[arg(short = 'V', long)]
    version: bool,
    /// Initial window width
    #[arg(long, default_value_t = 1280.0)]
    width: f32,
    /// Initial window height
    #[arg(long, default_value_t = 800.0)]
    height: f32,
}

fn detailed_version() -> String {
    let build = option_env!("RTM_WRAPPER_GIT_HASH")
        .map(|hash| format!("+{hash}"))
        .unwrap_or_default();
    format!(
        "rtm-wrapper-gui {}{} (rtm-core {}, rtm-dataset {})",
        env!("CARGO_PKG_VERSION"),
        build,
        rtm_core::VERSION,
        rtm_dataset::VERSION
    )
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    if cli.version {
        println!("{}", detailed_version());
        return Ok(());
    }
    init_logging(cli.log_level);
    log::info!("starting {}", detailed_version());

    let config = GuiConfig {
        width: cli.width,
        height: cli.height,
        splash: detailed_version().replace(" (", "\n("),
        ..GuiConfig::default()
    };
    run_gui(config, PlotterRegistry::builtin())?;
    Ok(())
}
