use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use exbreak_core::prelude::*;
use exbreak_utils::{default_log_path, info, init_logging, init_logging_to_file, init_logging_with_level, LogFormat, LogLevel};

mod simulate;

use simulate::Step;

/// Keeps "break on all exceptions" armed across debug sessions, minus the exceptions you ignore.
#[derive(Parser, Debug)]
#[command(name = "exbreak")]
#[command(version)]
#[command(about = "Exception-break policy for debuggers", long_about = None)]
struct Cli
{
    #[command(subcommand)]
    command: Commands,

    /// Log level (error, warn, info, debug, trace); defaults to RUST_LOG or info
    #[arg(long, global = true)]
    log_level: Option<LogLevel>,

    /// Log format (pretty or json)
    #[arg(long, global = true, default_value = "pretty")]
    log_format: LogFormat,

    /// Write logs to ~/.exbreak/<date>-exbreak.log instead of stderr
    #[arg(long, global = true, default_value_t = false)]
    log_to_file: bool,
}

#[derive(Subcommand, Debug)]
enum Commands
{
    /// Report whether exception type names are ignored by the settings
    Check
    {
        /// Settings file (TOML)
        #[arg(short, long)]
        settings: PathBuf,
        /// Fully qualified exception type names
        #[arg(required = true)]
        names: Vec<String>,
    },
    /// Drive a simulated debugger through a scripted sequence of host events
    Simulate
    {
        /// Settings file (TOML); empty settings when omitted
        #[arg(short, long)]
        settings: Option<PathBuf>,
        /// Host version (10, 11 or 12)
        #[arg(long, default_value = "12")]
        host: HostVersion,
        /// Make the simulated debugger reject every configuration call
        #[arg(long, default_value_t = false)]
        unsupported: bool,
        /// Steps: start, ready, end, toggle, throw:<Name>
        #[arg(required = true)]
        steps: Vec<Step>,
    },
}

fn main()
{
    let cli = Cli::parse();

    let logging = if cli.log_to_file {
        init_logging_to_file(&default_log_path(), cli.log_level)
    } else if let Some(level) = cli.log_level {
        init_logging_with_level(level, cli.log_format)
    } else {
        init_logging()
    };
    let _guard = match logging {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {}", e);
            process::exit(1);
        }
    };

    if let Err(e) = run_command(cli.command) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run_command(command: Commands) -> BreakerResult<()>
{
    match command {
        Commands::Check { settings, names } => {
            let settings = BreakerSettings::load(&settings)?;
            info!("Checking {} names against {} patterns", names.len(), settings.ignored.len());
            for name in names {
                match settings.ignored.first_match(&name) {
                    Some(pattern) => println!("{name}: ignored ({pattern})"),
                    None => println!("{name}: break"),
                }
            }
            Ok(())
        }
        Commands::Simulate {
            settings,
            host,
            unsupported,
            steps,
        } => {
            let settings = match settings {
                Some(path) => BreakerSettings::load(&path)?,
                None => BreakerSettings::default(),
            };
            let (breaker, recorder) = simulate::wire(host, settings, unsupported);
            for line in simulate::run(&breaker, &recorder, &steps) {
                println!("{line}");
            }
            println!("native calls: {}", recorder.calls().len());
            Ok(())
        }
    }
}
