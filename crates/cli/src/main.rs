//! emu4380 command-line front end.
//!
//! Loads a flat binary image, builds a [`Machine`] from the requested
//! memory size and cache organization, and runs it to completion. This
//! binary owns everything the core deliberately does not: argument
//! parsing, file I/O, process exit codes, and diagnostic printing.
//!
//! Exit codes: 0 on success, 1 for usage/IO errors and invalid
//! instructions, 2 for memory or cache configuration errors.

use std::io::Write;
use std::path::PathBuf;
use std::process;

use clap::Parser;

use emu4380_core::sim::loader;
use emu4380_core::{CacheMode, Console, EmuConfig, Machine, MachineError};

#[derive(Parser, Debug)]
#[command(
    name = "emu",
    version,
    about = "emu4380 cycle-accounting emulator",
    long_about = "Run an emu4380 binary image and report the total memory cycles.\n\n\
        The image's first little-endian word is the initial program counter.\n\n\
        Cache types: 0 = no cache, 1 = direct-mapped, 2 = fully associative,\n\
        3 = two-way set-associative."
)]
struct Cli {
    /// Bytecode image to execute.
    bytecode_file: PathBuf,

    /// Memory size in bytes (default 131072).
    #[arg(short = 'm', long = "memory", value_name = "BYTES")]
    memory_size: Option<String>,

    /// Cache type selector, 0..=3 (default 0).
    #[arg(short = 'c', long = "cache", value_name = "TYPE")]
    cache_type: Option<String>,

    /// JSON configuration file; -m and -c override its values.
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,
}

fn main() {
    env_logger::init();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let _ = err.print();
            process::exit(1);
        }
    };

    let config = build_config(&cli);

    let image = match loader::load_program(&cli.bytecode_file) {
        Ok(image) => image,
        Err(err) => {
            eprintln!("{err}");
            process::exit(1);
        }
    };

    let mut machine = match Machine::new(&config, &image, Console::stdio()) {
        Ok(machine) => machine,
        Err(MachineError::ImageTooLarge { .. }) => {
            println!("INSUFFICIENT MEMORY SPACE");
            process::exit(2);
        }
        Err(err) => {
            eprintln!("{err}");
            process::exit(1);
        }
    };

    match machine.run() {
        Ok(()) => {
            println!(
                "Execution completed. Total memory cycles: {}",
                machine.mem_cycles()
            );
        }
        Err(fault) => {
            print!("{fault}");
            let _ = std::io::stdout().flush();
            process::exit(1);
        }
    }
}

/// Resolves the effective configuration: file first, then flag overrides.
fn build_config(cli: &Cli) -> EmuConfig {
    let mut config = match &cli.config {
        Some(path) => match std::fs::read_to_string(path) {
            Ok(text) => match serde_json::from_str::<EmuConfig>(&text) {
                Ok(config) => config,
                Err(err) => {
                    eprintln!("Invalid configuration file: {err}");
                    process::exit(2);
                }
            },
            Err(err) => {
                eprintln!("Failed to read configuration file: {err}");
                process::exit(2);
            }
        },
        None => EmuConfig::default(),
    };

    if let Some(raw) = &cli.memory_size {
        match raw.parse::<u32>() {
            Ok(size) => config.mem_size = size,
            Err(_) => {
                eprintln!("Invalid memory configuration. Aborting.");
                process::exit(2);
            }
        }
    }

    if let Some(raw) = &cli.cache_type {
        let mode = raw
            .parse::<u32>()
            .ok()
            .and_then(|selector| CacheMode::try_from(selector).ok());
        match mode {
            Some(mode) => config.cache = mode,
            None => {
                eprintln!("Invalid cache configuration. Aborting.");
                process::exit(2);
            }
        }
    }

    config
}
