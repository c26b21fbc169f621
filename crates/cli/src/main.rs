//! Pipeline simulator CLI.
//!
//! Loads a hex program image, runs it to completion on the configured
//! machine, and reports the final register state and run statistics. It
//! provides:
//! 1. **Configuration:** JSON config file plus flag overrides for the cache
//!    scheme and branch predictor.
//! 2. **Tracing:** `--debug` for verbose per-stage tracing, `--log` to
//!    write the per-cycle pipeline log to a file.

use std::fs::File;
use std::io::Write;
use std::path::PathBuf;
use std::process;

use clap::{Parser, ValueEnum};

use rv32_core::config::{CacheScheme, Config, PredictorKind};
use rv32_core::core::units::bru::Predictor;
use rv32_core::isa::abi;
use rv32_core::sim::loader;
use rv32_core::Cpu;

#[derive(Parser, Debug)]
#[command(
    name = "rv32sim",
    author,
    version,
    about = "Cycle-accurate RV32IMFC pipeline simulator",
    long_about = "Run a hex program image through the five-stage pipeline.\n\n\
        The image is a text file of whitespace-separated 2-character hex\n\
        tokens, one per byte, in ascending address order.\n\n\
        Examples:\n  \
        rv32sim program.hex\n  \
        rv32sim program.hex --debug --log pipeline.log\n  \
        rv32sim program.hex --cache direct-mapped --predictor gshare"
)]
struct Cli {
    /// Hex program image to execute.
    program: PathBuf,

    /// Verbose per-stage tracing to stderr.
    #[arg(long)]
    debug: bool,

    /// Write the per-cycle pipeline log to this file.
    #[arg(long)]
    log: Option<PathBuf>,

    /// JSON configuration file (flags below override it).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Data-cache scheme override.
    #[arg(long)]
    cache: Option<CacheArg>,

    /// Branch-predictor override.
    #[arg(long)]
    predictor: Option<PredictorArg>,

    /// Cycle budget override.
    #[arg(long)]
    max_cycles: Option<u64>,

    /// Print the full statistics report after the run.
    #[arg(long)]
    stats: bool,
}

/// Cache scheme choices exposed on the command line.
#[derive(ValueEnum, Clone, Copy, Debug)]
enum CacheArg {
    None,
    DirectMapped,
    FullyAssociative,
    TwoWay,
    FourWay,
    EightWay,
}

impl From<CacheArg> for CacheScheme {
    fn from(arg: CacheArg) -> Self {
        match arg {
            CacheArg::None => CacheScheme::None,
            CacheArg::DirectMapped => CacheScheme::DirectMapped,
            CacheArg::FullyAssociative => CacheScheme::FullyAssociative,
            CacheArg::TwoWay => CacheScheme::TwoWay,
            CacheArg::FourWay => CacheScheme::FourWay,
            CacheArg::EightWay => CacheScheme::EightWay,
        }
    }
}

/// Branch predictor choices exposed on the command line.
#[derive(ValueEnum, Clone, Copy, Debug)]
enum PredictorArg {
    AlwaysNotTaken,
    AlwaysTaken,
    Bimodal,
    Gshare,
    Tournament,
}

impl From<PredictorArg> for PredictorKind {
    fn from(arg: PredictorArg) -> Self {
        match arg {
            PredictorArg::AlwaysNotTaken => PredictorKind::AlwaysNotTaken,
            PredictorArg::AlwaysTaken => PredictorKind::AlwaysTaken,
            PredictorArg::Bimodal => PredictorKind::Bimodal,
            PredictorArg::Gshare => PredictorKind::GShare,
            PredictorArg::Tournament => PredictorKind::Tournament,
        }
    }
}

fn main() {
    let cli = Cli::parse();

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(if cli.debug { "debug" } else { "warn" }),
    )
    .init();

    let mut config = match &cli.config {
        Some(path) => {
            let text = std::fs::read_to_string(path).unwrap_or_else(|e| {
                eprintln!("error reading config {}: {e}", path.display());
                process::exit(1);
            });
            serde_json::from_str::<Config>(&text).unwrap_or_else(|e| {
                eprintln!("error parsing config {}: {e}", path.display());
                process::exit(1);
            })
        }
        None => Config::default(),
    };
    if let Some(cache) = cli.cache {
        config.cache.scheme = cache.into();
    }
    if let Some(predictor) = cli.predictor {
        config.predictor.kind = predictor.into();
    }
    if let Some(max_cycles) = cli.max_cycles {
        config.trace.max_cycles = max_cycles;
    }

    let image = loader::load_file(&cli.program).unwrap_or_else(|e| {
        eprintln!("error loading program {}: {e}", cli.program.display());
        process::exit(1);
    });

    let mut cpu = Cpu::new(&config);
    cpu.set_debug(cli.debug);
    cpu.load_program(image);

    if cli.debug {
        eprintln!("starting simulation, max PC = {}", cpu.max_pc());
    }

    let cycles = cpu.run(config.trace.max_cycles);
    if cycles >= config.trace.max_cycles && !cpu.pipeline_empty() {
        eprintln!("warning: cycle budget ({cycles}) reached, simulation stopped");
    }

    if let Some(log_path) = &cli.log {
        if let Err(e) = write_pipeline_log(log_path, &cpu) {
            eprintln!("error writing log {}: {e}", log_path.display());
            process::exit(1);
        }
    }

    println!("\n=== Final Results ===");
    println!("Total cycles: {cycles}");
    print_registers(&cpu);

    if cli.stats {
        println!();
        cpu.stats().print();
        let predictor = cpu.predictor();
        println!(
            "Predictor: {} ({} correct / {} total, {:.2}%)",
            predictor.name(),
            predictor.correct(),
            predictor.total(),
            predictor.accuracy()
        );
    }
}

/// Writes every per-cycle pipeline snapshot to the log file.
fn write_pipeline_log(path: &PathBuf, cpu: &Cpu) -> std::io::Result<()> {
    let mut file = File::create(path)?;
    writeln!(file, "Pipeline Execution Log")?;
    writeln!(file, "=====================")?;
    for snapshot in &cpu.trace().pipeline {
        writeln!(file, "{snapshot}")?;
    }
    Ok(())
}

/// Prints the final integer register values, one per line.
fn print_registers(cpu: &Cpu) {
    println!("Register Values:");
    for idx in 0..32 {
        println!("{}: {}", abi::REG_NAMES[idx], cpu.register(idx) as i32);
    }
}
