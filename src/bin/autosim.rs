use autosim::bays::BayState;
use autosim::{Action, EngineConfig, EngineError, SimulationEngine, Snapshot, TemperatureSource};
use clap::{App, Arg, ArgMatches, SubCommand};
use colored::*;
use std::io::{self, BufRead, Write};
use tracing::Level;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let matches = App::new("autosim")
        .version("0.1.0")
        .author("Vehicle Systems Engineering Team")
        .about("🚗 Automotive monitoring workflow simulator")
        .arg(
            Arg::with_name("config")
                .short("c")
                .long("config")
                .value_name("FILE")
                .help("JSON engine configuration")
                .takes_value(true)
                .global(true),
        )
        .arg(
            Arg::with_name("seed")
                .short("s")
                .long("seed")
                .value_name("SEED")
                .help("Seed for the telemetry sampler (random if omitted)")
                .takes_value(true)
                .global(true)
                .validator(|v| match v.parse::<u64>() {
                    Ok(_) => Ok(()),
                    Err(_) => Err("Seed must be an unsigned integer".into()),
                }),
        )
        .arg(
            Arg::with_name("format")
                .short("f")
                .long("format")
                .value_name("FORMAT")
                .help("Output format")
                .takes_value(true)
                .possible_values(&["json", "table", "compact"])
                .default_value("table")
                .global(true),
        )
        .arg(
            Arg::with_name("verbose")
                .short("v")
                .long("verbose")
                .help("Enable debug logging")
                .global(true),
        )
        .subcommand(
            SubCommand::with_name("run")
                .about("▶️  Apply a sequence of actions and print the final state")
                .arg(
                    Arg::with_name("actions")
                        .help("Actions to apply in order: sample, fault, book, reset")
                        .required(true)
                        .multiple(true),
                ),
        )
        .subcommand(
            SubCommand::with_name("interactive")
                .about("⌨️  Read actions from stdin, one per line"),
        )
        .get_matches();

    let level = if matches.is_present("verbose") { Level::DEBUG } else { Level::INFO };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(io::stderr)
        .init();

    let config = load_config(&matches)?;
    let format = matches.value_of("format").unwrap_or("table");
    let mut engine = match matches.value_of("seed") {
        Some(seed) => SimulationEngine::seeded(config, seed.parse()?)?,
        None => SimulationEngine::new(config)?,
    };

    match matches.subcommand() {
        ("run", Some(sub_matches)) => {
            let actions = sub_matches
                .values_of("actions")
                .map(|values| values.map(str::parse::<Action>).collect::<Result<Vec<_>, _>>())
                .unwrap_or_else(|| Ok(Vec::new()))?;

            for action in actions {
                apply_action(&mut engine, action)?;
            }
            print_snapshot(&engine, format)?;
        }
        ("interactive", _) => {
            run_interactive(&mut engine, format)?;
        }
        _ => {
            println!("{}", "No command specified. Use --help for usage information.".yellow());
            println!("{}", "Quick start:".bright_green());
            println!("  {} Simulate a fault and book a bay", "autosim run fault book".bright_cyan());
            println!("  {} Drive the simulation from stdin", "autosim interactive".bright_cyan());
        }
    }

    Ok(())
}

fn load_config(matches: &ArgMatches<'_>) -> Result<EngineConfig, Box<dyn std::error::Error>> {
    match matches.value_of("config") {
        Some(path) => {
            let json = std::fs::read_to_string(path)?;
            Ok(EngineConfig::from_json_str(&json)?)
        }
        None => Ok(EngineConfig::default()),
    }
}

/// Apply one action. An exhausted bay table is reported and tolerated; a
/// sequencing error aborts the run.
fn apply_action<S: TemperatureSource>(
    engine: &mut SimulationEngine<S>,
    action: Action,
) -> Result<(), Box<dyn std::error::Error>> {
    match engine.apply(action) {
        Ok(_) => Ok(()),
        Err(EngineError::NoFreeBay) => {
            println!("{} {}", "⚠️".yellow(), "No service bay available, try again later".yellow());
            Ok(())
        }
        Err(e) => {
            eprintln!("{} {}", "❌".red(), e.to_string().bright_red());
            Err(e.into())
        }
    }
}

fn run_interactive<S: TemperatureSource>(
    engine: &mut SimulationEngine<S>,
    format: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", "🚗 Automotive Agentic AI System (type 'quit' to exit)".bright_blue().bold());
    print_snapshot(engine, format)?;

    let stdin = io::stdin();
    loop {
        print!("{} ", ">".bright_white());
        io::stdout().flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }

        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        if trimmed == "quit" || trimmed == "exit" {
            break;
        }

        match trimmed.parse::<Action>() {
            Ok(action) => {
                if let Err(e) = engine.apply(action) {
                    println!("{} {}", "❌".red(), e.to_string().bright_red());
                }
                print_snapshot(engine, format)?;
            }
            Err(e) => println!("{} {}", "❓".yellow(), e.to_string().yellow()),
        }
    }

    Ok(())
}

fn print_snapshot<S: TemperatureSource>(
    engine: &SimulationEngine<S>,
    format: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let snapshot = engine.snapshot();

    match format {
        "json" => {
            let json = serde_json::json!({
                "snapshot": snapshot,
                "view": engine.view(),
            });
            println!("{}", json);
        }
        "compact" => print_compact(&snapshot),
        _ => print_table(engine, &snapshot),
    }

    Ok(())
}

fn print_compact(snapshot: &Snapshot) {
    let latest = snapshot.samples.last().copied().unwrap_or_default();
    let status = if snapshot.service_booked {
        "BOOKED".green()
    } else if snapshot.fault_triggered {
        "FAULT".red()
    } else {
        "OK".green()
    };
    let bays: String = snapshot
        .bays
        .iter()
        .map(|b| if b.state == BayState::Free { 'F' } else { 'B' })
        .collect();

    println!(
        "{} temp={:.1}°C samples={} bays={} log={}",
        status,
        latest,
        snapshot.samples.len(),
        bays,
        snapshot.dialogue.len()
    );
}

fn print_table<S: TemperatureSource>(engine: &SimulationEngine<S>, snapshot: &Snapshot) {
    let view = engine.view();

    println!("\n{}", "1. Telematics Simulator".bright_blue().bold());
    let recent: Vec<String> = snapshot
        .samples
        .iter()
        .rev()
        .take(8)
        .rev()
        .map(|&t| {
            let cell = format!("{:.1}", t);
            if t >= engine.config().critical_threshold_c {
                cell.red().to_string()
            } else {
                cell.white().to_string()
            }
        })
        .collect();
    println!("{} {} ({} samples)", "Engine Temperature:".bright_white(), recent.join(" "), snapshot.samples.len());

    println!("\n{}", "2. Agent Brain".bright_blue().bold());
    if let Some(banner) = view.status_banner {
        println!("{}", banner.green());
    } else {
        for entry in &snapshot.dialogue {
            println!("  {}", entry);
        }
    }
    if let Some(script) = view.voice_agent_script {
        println!("{} '{}'", "🗣️  VOICE AGENT SPEAKING:".bright_red().bold(), script);
    }

    println!("\n{}", "3. Service Dashboard".bright_blue().bold());
    for bay in &snapshot.bays {
        let state = match bay.state {
            BayState::Free => "FREE".green(),
            BayState::Booked => "BOOKED".red(),
        };
        println!("  Bay {}: {}", bay.index, state);
    }

    if view.show_booking_button {
        println!("{}", "Awaiting customer decision: run 'book' to accept".yellow());
    }
    if let Some(confirmation) = view.confirmation {
        println!("{}", confirmation.bright_green());
    }
    if let Some(report) = view.report {
        println!("{}", "📋 Quality Agent - Root Cause Analysis".bright_white().bold());
        println!("{}", report);
    }
}
