//! Tandem simulator CLI.
//!
//! This binary provides a headless driver for the simulator library. It performs:
//! 1. **Assemble:** Assemble a source file and print the resolved program or its diagnostics.
//! 2. **Run:** Assemble and run a program to halt (whole instructions or micro-operations),
//!    bounded by `general.max_steps`, then print final state and statistics.
//! 3. **Event streaming:** Optionally print every CPU and compute unit event as a JSON line.
//!
//! Logging goes to stderr through `tracing-subscriber`; set `RUST_LOG` (e.g.
//! `RUST_LOG=tandem_core=debug`) to see committed instructions and compute phases.

use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use tandem_core::Program;
use tandem_core::config::Config;
use tandem_core::sim::{LoadError, RunOutcome, Simulator, loader};

#[derive(Parser, Debug)]
#[command(
    name = "sim",
    author,
    version,
    about = "16-bit register machine + lock-step compute unit simulator",
    long_about = "Assemble and run programs for the tandem register machine.\n\nExamples:\n  sim asm programs/dot.asm\n  sim run programs/dot.asm --micro\n  sim run programs/loop.asm --config sim.json --events"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Assemble a source file and print the resolved program.
    Asm {
        /// Assembly source file.
        path: PathBuf,

        /// Print the program as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Assemble and run a source file until it halts.
    Run {
        /// Assembly source file.
        path: PathBuf,

        /// JSON configuration file (defaults apply to omitted fields).
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Advance one micro-operation at a time instead of whole instructions.
        #[arg(long)]
        micro: bool,

        /// Override `general.max_steps`.
        #[arg(long)]
        max_steps: Option<u64>,

        /// Log every committed instruction (`general.trace_instructions`).
        #[arg(long)]
        trace: bool,

        /// Print every CPU and compute unit event as a JSON line.
        #[arg(long)]
        events: bool,

        /// Print the final state and outcome as JSON instead of a report.
        #[arg(long)]
        json: bool,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let code = match cli.command {
        Commands::Asm { path, json } => cmd_asm(&path, json),
        Commands::Run {
            path,
            config,
            micro,
            max_steps,
            trace,
            events,
            json,
        } => {
            let options = RunOptions {
                micro,
                max_steps,
                trace,
                events,
                json,
            };
            cmd_run(&path, config.as_deref(), &options)
        }
    };
    process::exit(code);
}

/// Loads a program, printing diagnostics on failure.
fn load(path: &Path) -> Option<Program> {
    match loader::load_program(path) {
        Ok(program) => Some(program),
        Err(LoadError::Assembly(diagnostics)) => {
            for diagnostic in &diagnostics {
                eprintln!("{}: {diagnostic}", path.display());
            }
            eprintln!("[!] {} diagnostic(s), no program produced", diagnostics.len());
            None
        }
        Err(e) => {
            eprintln!("[!] {}: {e}", path.display());
            None
        }
    }
}

/// Prints a JSON value on stdout, reporting serialization failures on stderr.
fn print_json<T: serde::Serialize>(value: &T) {
    match serde_json::to_string(value) {
        Ok(line) => println!("{line}"),
        Err(e) => eprintln!("[!] could not serialize output: {e}"),
    }
}

/// Assembles a file and prints the program listing.
fn cmd_asm(path: &Path, json: bool) -> i32 {
    let Some(program) = load(path) else {
        return 1;
    };
    if json {
        print_json(&program);
        return 0;
    }

    let mut labels: Vec<(&String, &usize)> = program.labels().iter().collect();
    labels.sort_by_key(|(_, idx)| **idx);
    for (idx, text) in program.instructions().iter().enumerate() {
        for (name, _) in labels.iter().filter(|(_, at)| **at == idx) {
            println!("{name}:");
        }
        let line = program.source_line(idx).unwrap_or_default();
        println!("  {idx:>4}  {text:<32} ; line {line}");
    }
    0
}

/// Command-line switches of `sim run`.
#[derive(Debug)]
struct RunOptions {
    micro: bool,
    max_steps: Option<u64>,
    trace: bool,
    events: bool,
    json: bool,
}

/// Runs a program to halt, fault, or the step limit.
fn cmd_run(path: &Path, config_path: Option<&Path>, options: &RunOptions) -> i32 {
    let mut config = match config_path.map(Config::from_file).transpose() {
        Ok(config) => config.unwrap_or_default(),
        Err(e) => {
            eprintln!("[!] {e}");
            return 2;
        }
    };
    if let Some(max_steps) = options.max_steps {
        config.general.max_steps = max_steps.max(1);
    }
    config.general.trace_instructions |= options.trace;

    let Some(program) = load(path) else {
        return 1;
    };

    tracing::debug!(path = %path.display(), micro = options.micro, "running program");
    let mut sim = Simulator::new(&config);
    sim.load_program(program);
    if options.events {
        let _ = sim.cpu.subscribe(|event| print_json(event));
        if let Some(gpu) = sim.cpu.compute_mut() {
            let _ = gpu.subscribe(|event| print_json(event));
        }
    }

    let outcome = if options.micro {
        sim.run_micro()
    } else {
        sim.run()
    };

    if options.json {
        print_json(&serde_json::json!({
            "outcome": outcome,
            "state": sim.cpu.snapshot(),
            "stats": sim.cpu.stats,
            "compute": sim.cpu.compute().map(|gpu| &gpu.stats),
        }));
    } else {
        match &outcome {
            RunOutcome::Halted { steps } => println!("\n[*] Halted after {steps} instruction(s)"),
            RunOutcome::Faulted { steps, error } => {
                println!("\n[!] FATAL after {steps} instruction(s): {error}");
            }
            RunOutcome::StepLimit { steps } => {
                println!("\n[!] Step limit reached after {steps} instruction(s)");
            }
        }
        sim.cpu.dump_state();
        sim.cpu.stats.print();
        if let Some(gpu) = sim.cpu.compute() {
            gpu.stats.print();
        }
    }

    match outcome {
        RunOutcome::Halted { .. } => 0,
        RunOutcome::Faulted { .. } | RunOutcome::StepLimit { .. } => 1,
    }
}
