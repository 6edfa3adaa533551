use std::error::Error;
use std::fs;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use detent::prelude::*;

mod demo;

#[derive(Parser, Debug)]
#[command(version, about = "Route encoder motion to the last touched control")]
struct Cli {
    /// Ports profile to use instead of the one in the config directory
    #[arg(long, global = true)]
    path: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Write a profile with default ports
    Init {
        #[arg(long, default_value_t = DEFAULT_PORT_COUNT)]
        ports: usize,

        /// Overwrite an existing profile
        #[arg(long)]
        force: bool,
    },
    /// List ports and their configuration
    Show,
    /// Replay a script against a demo cockpit
    Simulate { script: PathBuf },
}

fn main() {
    init_logger();

    let cli = Cli::parse();

    if let Err(err) = run(cli) {
        error!("{}", err);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    let path = match cli.path {
        Some(path) => path,
        None => storage::default_ports_path()
            .ok_or("Could not determine config directory")?,
    };

    match cli.command {
        Command::Init { ports, force } => {
            if path.exists() && !force {
                return Err(format!(
                    "{} already exists; pass --force to overwrite",
                    path.display()
                )
                .into());
            }
            storage::save_ports(&path, &Ports::with_count(ports))
        }
        Command::Show => {
            let ports = storage::load_ports_or_default(&path)?;
            for port in ports.iter() {
                let config = port.config();
                println!("{}", port.name());
                println!(
                    "  pulses per revolution: {}",
                    config.pulses_per_revolution
                );
                println!(
                    "  pulses per detent:     {}",
                    config.pulses_per_detent
                );
                println!("  pulse switches:        {}", config.pulse_switches);
                println!("  pulse all:             {}", config.pulse_all);
                println!(
                    "  value at 0°:           {}",
                    config.value_at_zero_degrees
                );
                println!(
                    "  value per revolution:  {}",
                    config.value_per_revolution
                );
            }
            Ok(())
        }
        Command::Simulate { script } => simulate(&path, &script),
    }
}

fn simulate(
    profile: &std::path::Path,
    script: &std::path::Path,
) -> Result<(), Box<dyn Error>> {
    let steps = demo::parse_script(&fs::read_to_string(script)?)?;
    let ports = storage::load_ports_or_default(profile)?;

    let mut registry = demo::cockpit();
    let (tx, rx) = event_channel();
    let mut router = Router::new(ports).with_events(tx);

    for step in &steps {
        println!("> {:?}", step);
        demo::run_step(step, &mut router, &mut registry)?;

        for event in rx.try_iter() {
            match event {
                RouterEvent::MostRecentControl(name) => {
                    println!("  most recent -> {:?}", name)
                }
                RouterEvent::UnclaimedControl(name) => {
                    println!("  unclaimed   -> {:?}", name)
                }
                RouterEvent::BoundControl { port, control } => {
                    println!("  {} bound -> {:?}", port, control)
                }
            }
        }
    }

    Ok(())
}
