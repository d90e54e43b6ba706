//! `chemlight`: send and remove chem light markers from the command line.
//!
//! Rendered geomessages go to stdout, one per line; logs go to stderr.

use clap::{Args, Parser, Subcommand, ValueEnum};
use cl_common::parse_argb;
use cl_core::exit_codes::ExitCode;
use cl_core::logging::{event_names, init_logging, LogConfig, LogFormat, LogLevel};
use cl_core::{load_config, ChemLightController, ConfigOptions};
use cl_geomessage::{LineFormat, MessageSink, WriterSink};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, error};

/// Send chem light geomessages
#[derive(Parser)]
#[command(name = "chemlight")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[command(flatten)]
    global: GlobalOpts,
}

#[derive(Args, Debug)]
struct GlobalOpts {
    /// Config file (overrides CHEMLIGHT_CONFIG and the XDG location)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Sender designation stamped on sent reports
    #[arg(long, global = true)]
    designation: Option<String>,

    /// Output encoding for rendered messages
    #[arg(long, short = 'f', global = true, value_enum, default_value_t = OutputFormat::Xml)]
    format: OutputFormat,

    /// Minimum log level (trace, debug, info, warn, error, off)
    #[arg(long, global = true)]
    log_level: Option<LogLevel>,

    /// Log format (human, jsonl)
    #[arg(long, global = true)]
    log_format: Option<LogFormat>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Xml,
    Json,
}

impl From<OutputFormat> for LineFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Xml => LineFormat::Xml,
            OutputFormat::Json => LineFormat::Json,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Create a chem light, or update one by reusing its ID
    Send(SendArgs),
    /// Remove a chem light
    Remove(RemoveArgs),
}

#[derive(Args, Debug)]
struct SendArgs {
    /// X coordinate (longitude for WGS84)
    #[arg(long, allow_negative_numbers = true)]
    x: f64,

    /// Y coordinate (latitude for WGS84)
    #[arg(long, allow_negative_numbers = true)]
    y: f64,

    /// Spatial reference WKID (defaults to the configured default_wkid)
    #[arg(long)]
    wkid: Option<u32>,

    /// Colour as 0xAARRGGBB, #RRGGBB or a decimal integer
    #[arg(long, value_parser = parse_argb)]
    color: u32,

    /// Existing chem light ID to update; omit to create a new one
    #[arg(long)]
    id: Option<String>,
}

#[derive(Args, Debug)]
struct RemoveArgs {
    /// ID of the chem light to remove
    #[arg(long)]
    id: String,
}

fn main() -> std::process::ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let _ = err.print();
            let code = if err.use_stderr() {
                ExitCode::ArgsError
            } else {
                ExitCode::Clean
            };
            return code.into();
        }
    };

    let log_config = LogConfig::from_env(cli.global.log_level, cli.global.log_format);
    init_logging(&log_config);

    run(cli).into()
}

fn run(cli: Cli) -> ExitCode {
    let options = ConfigOptions {
        config_path: cli.global.config.clone(),
        unique_designation: cli.global.designation.clone(),
        config_dir: None,
    };

    let resolved = match load_config(&options) {
        Ok(resolved) => resolved,
        Err(err) => {
            error!(target: event_names::CONFIG_ERROR, error = %err, "Could not load configuration");
            return ExitCode::ConfigError;
        }
    };
    debug!(
        target: event_names::CONFIG_LOADED,
        path = ?resolved.path,
        resolution = ?resolved.resolution,
        "Configuration loaded"
    );

    let sink: Arc<dyn MessageSink> = Arc::new(WriterSink::new(
        std::io::stdout(),
        cli.global.format.into(),
    ));
    let controller = match ChemLightController::from_config(sink, &resolved.config) {
        Ok(controller) => controller,
        Err(err) => {
            error!(target: event_names::CONFIG_ERROR, error = %err, "Could not create controller");
            return ExitCode::ConfigError;
        }
    };

    match cli.command {
        Commands::Send(args) => {
            let wkid = args.wkid.unwrap_or(resolved.config.default_wkid);
            controller.send_chem_light(args.x, args.y, wkid, args.color, args.id.as_deref());
        }
        Commands::Remove(args) => controller.remove_chem_light(Some(&args.id)),
    }

    ExitCode::Clean
}
