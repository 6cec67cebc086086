use clap::{arg, crate_version, value_parser, Command};
use log::{info, LevelFilter};
use simplelog::{ColorChoice, ConfigBuilder, TermLogger, TerminalMode};
use std::io;
use std::path::{Path, PathBuf};
use std::process;

use rstree::loader::{self, Endian};
use rstree::session::{Session, DEFAULT_SMALLEST};
use rstree::RandomizedTree;

fn init_logging(level: LevelFilter) {
    let config = ConfigBuilder::new().set_time_level(LevelFilter::Off).build();
    if let Err(e) = TermLogger::init(level, config, TerminalMode::Stderr, ColorChoice::Auto) {
        eprintln!("Couldn't initialise logging: {e}");
    }
}

fn run(input_file: &Path, endian: Endian, seed: Option<u64>, smallest: usize) -> rstree::Result<()> {
    let mut tree = match seed {
        Some(seed) => RandomizedTree::with_seed(seed),
        None => RandomizedTree::new(),
    };
    let summary = loader::load_file(input_file, endian, &mut tree)?;
    info!(
        "{} records loaded from {}",
        summary.records,
        input_file.display()
    );

    let stdin = io::stdin();
    let stdout = io::stdout();
    let released = Session::new(tree, stdin.lock(), stdout.lock())
        .smallest(smallest)
        .run()?;
    info!("released {released} nodes");
    Ok(())
}

fn main() {
    // Generate a CLI, and get the dataset to load
    let params = Command::new("RST")
        .version(crate_version!())
        .about("Load integers into a randomized search tree and query it from an interactive menu")
        .arg(arg!(<INPUT> "A binary file of 32-bit signed integers, one per 4-byte record").value_parser(value_parser!(PathBuf)))
        .arg(arg!(-e --endian <ENDIAN> "Byte order of the records: little, big or native").default_value("native").value_parser(value_parser!(Endian)))
        .arg(arg!(-s --seed <SEED> "Seed for the random source. The same seed and input always give the same tree shape").value_parser(value_parser!(u64)))
        .arg(arg!(-k --smallest <K> "How many keys the smallest-elements menu entry lists").default_value("10").value_parser(value_parser!(usize)))
        .arg(arg!(-l --"log-level" <LEVEL> "Logging verbosity on stderr").default_value("warn").value_parser(["off", "error", "warn", "info", "debug", "trace"]))
        .get_matches();

    let level = params
        .get_one::<String>("log-level")
        .and_then(|level| level.parse::<LevelFilter>().ok())
        .unwrap_or(LevelFilter::Warn);
    init_logging(level);

    let Some(input_file) = params.get_one::<PathBuf>("INPUT") else {
        eprintln!("Usage: rstree <INPUT>");
        process::exit(1);
    };
    let endian = params.get_one::<Endian>("endian").copied().unwrap_or_default();
    let seed = params.get_one::<u64>("seed").copied();
    let smallest = params
        .get_one::<usize>("smallest")
        .copied()
        .unwrap_or(DEFAULT_SMALLEST);

    if let Err(e) = run(input_file, endian, seed, smallest) {
        eprintln!("{e}");
        process::exit(1);
    }
}
