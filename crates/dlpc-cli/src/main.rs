use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use dlpc_core::{
    Config, CurrentDriver, DisplayMode, Dmd, ProtocolError, SerialTransport, TransportError,
    UsbTransport,
};
use log::{debug, info};

const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (",
    env!("DLPC_BUILD_COMMIT"),
    " ",
    env!("DLPC_BUILD_DATE"),
    ")"
);

#[derive(Parser, Debug)]
#[command(name = "dlpc")]
#[command(version, long_version = LONG_VERSION)]
#[command(
    about = "Control a DLPC900 display controller and its RS485 laser driver.",
    long_about = None,
    after_help = "Examples:\n  dlpc status --pretty\n  dlpc mode pattern\n  dlpc power standby\n  dlpc driver --port /dev/ttyUSB1 current 1200"
)]
struct Cli {
    /// JSON configuration file (USB identity, serial line, timing)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print a JSON status report of the controller.
    Status {
        /// Pretty-print JSON output
        #[arg(long)]
        pretty: bool,
    },
    /// Change the power state.
    Power {
        #[arg(value_enum)]
        action: PowerAction,
    },
    /// Show the display mode, or switch to MODE.
    Mode {
        #[arg(value_enum)]
        mode: Option<ModeArg>,
    },
    /// Start, pause or stop the pattern sequence.
    Pattern {
        #[arg(value_enum)]
        action: PatternAction,
    },
    /// Print the last error recorded by the controller.
    Error,
    /// Commands for the RS485 laser current driver.
    Driver {
        /// Serial port (overrides the configuration file)
        #[arg(long)]
        port: Option<String>,

        #[command(subcommand)]
        command: DriverCommands,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum PowerAction {
    Standby,
    Wakeup,
    Reset,
    IdleOn,
    IdleOff,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum ModeArg {
    Video,
    Pattern,
    VideoPattern,
    Otf,
}

impl From<ModeArg> for DisplayMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Video => DisplayMode::Video,
            ModeArg::Pattern => DisplayMode::Pattern,
            ModeArg::VideoPattern => DisplayMode::VideoPattern,
            ModeArg::Otf => DisplayMode::OnTheFly,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum PatternAction {
    Start,
    Pause,
    Stop,
}

#[derive(Subcommand, Debug)]
enum DriverCommands {
    /// Turn the output off.
    Reset,
    /// Set the output current in milliamps (0-3500).
    Current { ma: u16 },
    /// Print alarm state and laser temperature as JSON.
    Status,
    /// Clear latched fault codes.
    ClearFault,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = load_config(cli.config.as_ref()).and_then(|config| match cli.command {
        Commands::Status { pretty } => cmd_status(&config, pretty),
        Commands::Power { action } => cmd_power(&config, action),
        Commands::Mode { mode } => cmd_mode(&config, mode),
        Commands::Pattern { action } => cmd_pattern(&config, action),
        Commands::Error => cmd_error(&config),
        Commands::Driver { port, command } => cmd_driver(config, port, command),
    });

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {}", err.message);
            if let Some(hint) = err.hint {
                eprintln!("hint: {}", hint);
            }
            ExitCode::from(2)
        }
    }
}

#[derive(Debug)]
struct CliError {
    message: String,
    hint: Option<String>,
}

impl CliError {
    fn new(message: impl Into<String>, hint: Option<String>) -> Self {
        Self {
            message: message.into(),
            hint,
        }
    }
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

impl From<anyhow::Error> for CliError {
    fn from(err: anyhow::Error) -> Self {
        CliError::new(format!("{err:#}"), None)
    }
}

impl From<ProtocolError> for CliError {
    fn from(err: ProtocolError) -> Self {
        let hint = match &err {
            ProtocolError::InvalidTransition { .. } => {
                Some("switch to video mode first (dlpc mode video)".to_string())
            }
            ProtocolError::ModeActivationFailed { .. } => {
                Some("video-pattern mode needs a locked external source".to_string())
            }
            ProtocolError::Device { .. } | ProtocolError::Fault(_) => {
                Some("run `dlpc error` for the controller's description".to_string())
            }
            ProtocolError::InvalidResponse(_) => {
                Some("check the RS485 wiring and the driver address".to_string())
            }
            ProtocolError::Transport(TransportError::Timeout { .. }) => {
                Some("the device did not answer; check power and cabling".to_string())
            }
            _ => None,
        };
        CliError::new(err.to_string(), hint)
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}

fn load_config(path: Option<&PathBuf>) -> Result<Config, CliError> {
    let Some(path) = path else {
        return Ok(Config::default());
    };
    if !path.exists() {
        return Err(CliError::new(
            format!("config file not found: {}", path.display()),
            Some("pass a JSON file with optional usb, serial and timing sections".to_string()),
        ));
    }
    let config = Config::from_path(path).map_err(|err| {
        CliError::new(
            format!("cannot load {}: {err}", path.display()),
            Some("expected a JSON object with usb, serial and timing sections".to_string()),
        )
    })?;
    debug!("loaded config from {}", path.display());
    Ok(config)
}

fn connect(config: &Config) -> Result<Dmd<UsbTransport>, CliError> {
    let transport = UsbTransport::open(&config.usb).map_err(|err| {
        let hint = match err {
            TransportError::DeviceNotFound { .. } => Some(
                "check the USB cable and the usb.vendor_id/usb.product_id settings".to_string(),
            ),
            TransportError::OpenFailed(_) => {
                Some("the device may be busy or need udev permissions".to_string())
            }
            _ => None,
        };
        CliError::new(err.to_string(), hint)
    })?;
    let (dmd, hardware) = Dmd::connect(transport, config.timing)?;
    info!(
        "connected to {} (firmware {})",
        hardware.product, hardware.firmware_tag
    );
    Ok(dmd)
}

fn cmd_status(config: &Config, pretty: bool) -> Result<(), CliError> {
    let mut dmd = connect(config)?;
    let report = dmd.status_report()?;
    let json = if pretty {
        serde_json::to_string_pretty(&report)
    } else {
        serde_json::to_string(&report)
    }
    .context("JSON serialization failed")?;
    println!("{json}");
    Ok(())
}

fn cmd_power(config: &Config, action: PowerAction) -> Result<(), CliError> {
    let mut dmd = connect(config)?;
    match action {
        PowerAction::Standby => dmd.standby()?,
        PowerAction::Wakeup => dmd.wakeup()?,
        PowerAction::Reset => dmd.reset()?,
        PowerAction::IdleOn => dmd.idle_on()?,
        PowerAction::IdleOff => dmd.idle_off()?,
    }
    eprintln!("OK: {action:?}");
    Ok(())
}

fn cmd_mode(config: &Config, mode: Option<ModeArg>) -> Result<(), CliError> {
    let mut dmd = connect(config)?;
    match mode {
        Some(mode) => {
            let target = DisplayMode::from(mode);
            dmd.set_display_mode(target)?;
            eprintln!("OK: display mode {target}");
        }
        None => println!("{}", dmd.get_display_mode()?),
    }
    Ok(())
}

fn cmd_pattern(config: &Config, action: PatternAction) -> Result<(), CliError> {
    let mut dmd = connect(config)?;
    match action {
        PatternAction::Start => dmd.start_pattern()?,
        PatternAction::Pause => dmd.pause_pattern()?,
        PatternAction::Stop => dmd.stop_pattern()?,
    }
    // Rejected sequencer commands are only visible in the error register.
    dmd.ensure_no_fault()?;
    Ok(())
}

fn cmd_error(config: &Config) -> Result<(), CliError> {
    let mut dmd = connect(config)?;
    match dmd.check_for_error()? {
        None => println!("no error"),
        Some(fault) => {
            let description = dmd.get_error_description()?;
            println!("error {}: {fault}", fault.code());
            if !description.is_empty() {
                println!("{description}");
            }
        }
    }
    Ok(())
}

fn cmd_driver(
    mut config: Config,
    port: Option<String>,
    command: DriverCommands,
) -> Result<(), CliError> {
    if let Some(port) = port {
        config.serial.port = port;
    }
    let transport = SerialTransport::open(&config.serial).map_err(|err| {
        CliError::new(
            err.to_string(),
            Some("pass --port or set serial.port in the config file".to_string()),
        )
    })?;
    let mut driver = CurrentDriver::new(transport, config.serial.address, config.timing);

    match command {
        DriverCommands::Reset => driver.reset_output()?,
        DriverCommands::Current { ma } => driver.set_output_current(ma)?,
        DriverCommands::Status => {
            let status = driver.get_device_status()?;
            let json = serde_json::to_string(&status).context("JSON serialization failed")?;
            println!("{json}");
        }
        DriverCommands::ClearFault => driver.clear_fault()?,
    }
    Ok(())
}
