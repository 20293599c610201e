//! nbfgen command-line front end.
//!
//! This binary provides a single entry point for boot script generation. It performs:
//! 1. **Generate:** Build the NBF boot script for a BlackParrot memory image.
//! 2. **Translate:** Show where DRAM word addresses land on the mesh.
//! 3. **Config:** Print the effective configuration as JSON.

use std::fs::File;
use std::io::{self, BufWriter};
use std::path::PathBuf;
use std::process;

use clap::{Args, Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use nbfgen_core::config::Config;
use nbfgen_core::stats::BootStats;
use nbfgen_core::tile::TileProgram;
use nbfgen_core::topology::derive_coordinates;
use nbfgen_core::translate::{AddressTranslator, Translation};
use nbfgen_core::writer::NbfWriter;
use nbfgen_core::{ImageSource, NbfError, generate};

#[derive(Parser, Debug)]
#[command(
    name = "nbfgen",
    author,
    version,
    about = "BlackParrot network boot format generator",
    long_about = "Generate the NBF boot script that loads a BlackParrot program onto the manycore.\n\nExamples:\n  nbfgen generate --config machine.json --mem-image prog.mem -o prog.nbf\n  nbfgen translate --config machine.json 0x20000000 0x20000010\n  nbfgen config --num-tiles-x 4 --no-dram"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate the boot script.
    Generate {
        #[command(flatten)]
        machine: MachineArgs,

        /// BlackParrot memory image (Verilog-style hex dump).
        #[arg(short, long)]
        mem_image: PathBuf,

        /// Tile program ELF loaded into the tile group.
        #[arg(short, long)]
        tile_program: Option<PathBuf>,

        /// Output file; defaults to stdout.
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Print run statistics on stderr.
        #[arg(long)]
        stats: bool,
    },

    /// Translate DRAM word addresses for the origin pod.
    Translate {
        #[command(flatten)]
        machine: MachineArgs,

        /// Word addresses (hex with 0x prefix, or decimal).
        #[arg(required = true, value_parser = parse_u64)]
        addrs: Vec<u64>,
    },

    /// Print the effective configuration.
    Config {
        #[command(flatten)]
        machine: MachineArgs,
    },
}

/// Configuration file and overrides shared by every subcommand.
#[derive(Args, Debug)]
struct MachineArgs {
    /// JSON configuration file; built-in defaults are used for missing fields.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Tile columns per pod.
    #[arg(long)]
    num_tiles_x: Option<u32>,

    /// Tile rows per pod.
    #[arg(long)]
    num_tiles_y: Option<u32>,

    /// Pods to boot along x.
    #[arg(long)]
    num_pods_x: Option<u32>,

    /// Pods to boot along y.
    #[arg(long)]
    num_pods_y: Option<u32>,

    /// Vcache rows on each side of a pod.
    #[arg(long)]
    num_vcache_rows: Option<u32>,

    /// Use the vcaches as block memories instead of hashing DRAM over them.
    #[arg(long)]
    no_dram: bool,

    /// Byte address of the BlackParrot image in manycore DRAM.
    #[arg(long, value_parser = parse_u64)]
    bp_dram_base: Option<u64>,

    /// Pod offset of the BlackParrot image.
    #[arg(long, value_parser = parse_u64)]
    bp_dram_pod_offset: Option<u64>,
}

impl MachineArgs {
    /// Loads the configuration file (if any) and applies the overrides.
    fn resolve(&self) -> Result<Config, NbfError> {
        let mut config = match &self.config {
            Some(path) => Config::from_json_file(path).map_err(|source| NbfError::ConfigFile {
                path: path.clone(),
                source,
            })?,
            None => Config::default(),
        };
        let t = &mut config.topology;
        let tg = &mut config.tile_group;
        // A shrunk pod clips the tile group to what still fits.
        if let Some(v) = self.num_tiles_x {
            t.num_tiles_x = v;
            tg.tg_dim_x = tg.tg_dim_x.min(v.saturating_sub(tg.tgo_x));
        }
        if let Some(v) = self.num_tiles_y {
            t.num_tiles_y = v;
            tg.tg_dim_y = tg.tg_dim_y.min(v.saturating_sub(tg.tgo_y));
        }
        if let Some(v) = self.num_pods_x {
            t.num_pods_x = v;
            t.machine_pods_x = t.machine_pods_x.max(v);
        }
        if let Some(v) = self.num_pods_y {
            t.num_pods_y = v;
            t.machine_pods_y = t.machine_pods_y.max(v);
        }
        if let Some(v) = self.num_vcache_rows {
            t.num_vcache_rows = v;
        }
        if self.no_dram {
            config.dram.enabled = false;
        }
        if let Some(v) = self.bp_dram_base {
            config.dram.bp_dram_base = v;
        }
        if let Some(v) = self.bp_dram_pod_offset {
            config.dram.bp_dram_pod_offset = v;
        }
        Ok(config)
    }
}

/// Parses a hex (`0x` prefix) or decimal integer.
fn parse_u64(text: &str) -> Result<u64, String> {
    let parsed = match text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
        Some(hex) => u64::from_str_radix(&hex.replace('_', ""), 16),
        None => text.replace('_', "").parse(),
    };
    parsed.map_err(|e| format!("invalid address '{text}': {e}"))
}

fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Generate {
            machine,
            mem_image,
            tile_program,
            output,
            stats,
        } => cmd_generate(&machine, mem_image, tile_program, output, stats),
        Commands::Translate { machine, addrs } => cmd_translate(&machine, &addrs),
        Commands::Config { machine } => cmd_config(&machine),
    };

    if let Err(e) = result {
        eprintln!("[!] FATAL: {e}");
        process::exit(1);
    }
}

/// Builds the script and writes it out only once the whole run succeeded.
fn cmd_generate(
    machine: &MachineArgs,
    mem_image: PathBuf,
    tile_program: Option<PathBuf>,
    output: Option<PathBuf>,
    stats: bool,
) -> Result<(), NbfError> {
    let config = machine.resolve()?;
    let program = tile_program.map(TileProgram::load).transpose()?;
    let script = generate(&config, &ImageSource::File(mem_image), program)?;

    let lines = match &output {
        Some(path) => {
            let mut writer = NbfWriter::new(BufWriter::new(File::create(path)?));
            writer.write_script(&script)?;
            writer.lines()
        }
        None => {
            let mut writer = NbfWriter::new(io::stdout().lock());
            writer.write_script(&script)?;
            writer.lines()
        }
    };
    info!(lines, "boot script written");

    if stats {
        eprintln!("{}", BootStats::from_script(&script));
    }
    Ok(())
}

/// Prints the destination of every address for the origin pod.
fn cmd_translate(machine: &MachineArgs, addrs: &[u64]) -> Result<(), NbfError> {
    let config = machine.resolve()?;
    config.validate()?;
    let topology = derive_coordinates(&config);
    let translator = AddressTranslator::new(&topology)?;
    println!("layout: {}", translator.layout());
    for &addr in addrs {
        match translator.translate(addr, topology.origin) {
            Translation::Mapped(loc) => {
                println!("{addr:#010x} -> x={} y={} epa={:#x}", loc.x(), loc.y(), loc.epa);
            }
            Translation::OutOfRange => println!("{addr:#010x} -> out of range"),
        }
    }
    Ok(())
}

fn cmd_config(machine: &MachineArgs) -> Result<(), NbfError> {
    let config = machine.resolve()?;
    let json = serde_json::to_string_pretty(&config).map_err(io::Error::from)?;
    println!("{json}");
    Ok(())
}
