//! Fieldwork simulation runner.
//!
//! Runs one vehicle through a scenario (fieldwork, unload/refill, stop) and
//! prints the event timeline and a summary.
//!
//! Usage:
//!   cargo run -p fieldwork_sitl --bin fieldwork_sim -- [OPTIONS]
//!
//! Options:
//!   -s, --scenario <PATH>   Scenario JSON file (default: built-in demo)
//!   --dt <SECONDS>          Step size (default: from scenario)
//!   --max-steps <N>         Step limit (default: from scenario)
//!   --seed <N>              RNG seed for tool motion jitter
//!   --resume                Return to fieldwork after unload/refill
//!   -v, --verbose           Log state machine details to stderr

use std::env;
use std::path::PathBuf;
use std::process;

use fieldwork_sitl::{Scenario, Simulation, SimulatorError};
use log::{LevelFilter, Log, Metadata, Record};

struct Args {
    scenario: Option<PathBuf>,
    dt: Option<f32>,
    max_steps: Option<u64>,
    seed: Option<u64>,
    resume: bool,
    verbose: bool,
}

fn parse_args() -> Args {
    let mut args = Args {
        scenario: None,
        dt: None,
        max_steps: None,
        seed: None,
        resume: false,
        verbose: false,
    };

    let raw: Vec<String> = env::args().collect();
    let mut i = 1;
    while i < raw.len() {
        match raw[i].as_str() {
            "-s" | "--scenario" => {
                i += 1;
                args.scenario = Some(PathBuf::from(arg_value(&raw, i, "scenario")));
            }
            "--dt" => {
                i += 1;
                args.dt = Some(parse_arg(&raw, i, "dt"));
            }
            "--max-steps" => {
                i += 1;
                args.max_steps = Some(parse_arg(&raw, i, "max-steps"));
            }
            "--seed" => {
                i += 1;
                args.seed = Some(parse_arg(&raw, i, "seed"));
            }
            "--resume" => args.resume = true,
            "-v" | "--verbose" => args.verbose = true,
            "-h" | "--help" => {
                print_usage();
                process::exit(0);
            }
            other => {
                eprintln!("Unknown option: {other}");
                print_usage();
                process::exit(1);
            }
        }
        i += 1;
    }

    args
}

fn arg_value<'a>(raw: &'a [String], i: usize, name: &str) -> &'a str {
    raw.get(i).map(String::as_str).unwrap_or_else(|| {
        eprintln!("Error: --{name} requires a value");
        process::exit(1);
    })
}

fn parse_arg<T: std::str::FromStr>(raw: &[String], i: usize, name: &str) -> T {
    arg_value(raw, i, name).parse().unwrap_or_else(|_| {
        eprintln!("Error: invalid value for --{name}");
        process::exit(1);
    })
}

fn print_usage() {
    eprintln!(
        "Usage: fieldwork_sim [OPTIONS]\n\
         \n\
         Options:\n\
         \x20 -s, --scenario <PATH>   Scenario JSON file (default: built-in demo)\n\
         \x20 --dt <SECONDS>          Step size (default: from scenario)\n\
         \x20 --max-steps <N>         Step limit (default: from scenario)\n\
         \x20 --seed <N>              RNG seed for tool motion jitter\n\
         \x20 --resume                Return to fieldwork after unload/refill\n\
         \x20 -v, --verbose           Log state machine details to stderr\n\
         \x20 -h, --help              Show this help"
    );
}

/// Logger printing records to stderr.
struct StderrLogger;

impl Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            eprintln!("[{:5}] {}: {}", record.level(), record.target(), record.args());
        }
    }

    fn flush(&self) {}
}

static LOGGER: StderrLogger = StderrLogger;

fn load_scenario(args: &Args) -> Result<Scenario, SimulatorError> {
    let mut scenario = match &args.scenario {
        Some(path) => Scenario::load(path)?,
        None => Scenario::default(),
    };
    if let Some(dt) = args.dt {
        scenario.step_s = dt;
    }
    if let Some(max_steps) = args.max_steps {
        scenario.max_steps = max_steps;
    }
    if args.seed.is_some() {
        scenario.seed = args.seed;
    }
    scenario.resume_after_unload |= args.resume;
    scenario.validate()?;
    Ok(scenario)
}

fn run(args: &Args) -> Result<(), SimulatorError> {
    let scenario = load_scenario(args)?;

    println!("=== Fieldwork Simulation: {} ===", scenario.name);
    println!(
        "Waypoints: {}, field speed: {} km/h, road speed: {} km/h, step: {}s",
        scenario.course.len(),
        scenario.field_speed,
        scenario.road_speed,
        scenario.step_s
    );
    println!();

    let mut sim = Simulation::new(&scenario)?;
    let report = sim.run()?;

    for entry in &report.events {
        println!("[{:8.1}s] {:?}", entry.time_s, entry.event);
    }

    println!();
    println!("Steps: {}, time: {:.1}s", report.steps, report.time_s);
    println!("Distance: {:.1} m", report.distance_m);
    println!("Unload/refill trips: {}", report.unload_trips);
    println!(
        "Implement requests: {} lower, {} raise",
        report.lower_requests, report.raise_requests
    );
    match report.stop_reason {
        Some(reason) => println!("Stopped: {reason}"),
        None => println!("Stopped: unknown"),
    }
    Ok(())
}

fn main() {
    let args = parse_args();

    if log::set_logger(&LOGGER).is_ok() {
        log::set_max_level(if args.verbose {
            LevelFilter::Debug
        } else {
            LevelFilter::Warn
        });
    }

    if let Err(e) = run(&args) {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}
