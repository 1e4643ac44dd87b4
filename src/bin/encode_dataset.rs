//! Training data encoding CLI.
//!
//! Reads `fen,uci,outcome` rows and writes encoded samples as JSONL, with an
//! optional held-out validation file.
//!
//! Usage:
//!   cargo run --release --bin encode_dataset -- [OPTIONS]
//!
//! Options:
//!   --input FILE              Input CSV path (default: stdin)
//!   --output FILE             Output JSONL path (default: stdout)
//!   --validation-output FILE  Write a validation split to FILE
//!   --validation-split F      Validation fraction (default: 0.02)
//!   --threads N               Number of worker threads (default: 4)
//!   --seed N                  Shuffle seed, 0 for entropy (default: 0)
//!   --strict-castling         Reject unknown castling characters
//!   --strict-rows             Fail on the first malformed row
//!   --with-planes             Include input planes in each record
//!   --quiet                   Only log warnings and errors

use std::env;
use std::fs::File;
use std::io::{self, BufReader, BufWriter, Write};
use std::process;
use std::str::FromStr;
use std::time::Instant;

use log::{error, info};

use hyperion_codec::dataset::{self, DatasetConfig, DatasetError};

struct Args {
    config: DatasetConfig,
    input: Option<String>,
    output: Option<String>,
    validation_output: Option<String>,
    quiet: bool,
}

fn main() {
    let args = parse_args();

    let level = if args.quiet { "warn" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    if let Err(e) = run(&args) {
        error!("{}", e);
        process::exit(1);
    }
}

fn run(args: &Args) -> Result<(), DatasetError> {
    let config = &args.config;
    let start = Instant::now();

    let rows = match &args.input {
        Some(path) => dataset::read_rows(BufReader::new(File::open(path)?))?,
        None => dataset::read_rows(io::stdin().lock())?,
    };
    info!("read {} rows, encoding on {} threads", rows.len(), config.threads);

    let batch = dataset::encode_rows(&rows, config)?;
    info!(
        "encoded {} samples in {:.2}s ({} skipped)",
        batch.samples.len(),
        start.elapsed().as_secs_f64(),
        batch.skipped_lines.len()
    );

    let (train, validation) = match &args.validation_output {
        Some(_) => dataset::split_validation(batch.samples, config.validation_split, config.seed),
        None => (batch.samples, Vec::new()),
    };

    write_samples(&train, args.output.as_deref())?;
    if let Some(path) = &args.validation_output {
        write_samples(&validation, Some(path))?;
    }
    info!(
        "wrote {} training and {} validation samples",
        train.len(),
        validation.len()
    );
    Ok(())
}

fn write_samples(samples: &[dataset::TrainingSample], path: Option<&str>) -> Result<(), DatasetError> {
    let mut writer: Box<dyn Write> = match path {
        Some(path) => Box::new(BufWriter::new(File::create(path)?)),
        None => Box::new(BufWriter::new(io::stdout().lock())),
    };
    dataset::write_jsonl(samples, &mut writer)
}

fn parse_args() -> Args {
    let args: Vec<String> = env::args().collect();
    let mut parsed = Args {
        config: DatasetConfig::default(),
        input: None,
        output: None,
        validation_output: None,
        quiet: false,
    };

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--input" => parsed.input = Some(value(&args, &mut i)),
            "--output" => parsed.output = Some(value(&args, &mut i)),
            "--validation-output" => parsed.validation_output = Some(value(&args, &mut i)),
            "--validation-split" => parsed.config.validation_split = parse_value(&args, &mut i),
            "--threads" => parsed.config.threads = parse_value(&args, &mut i),
            "--seed" => parsed.config.seed = parse_value(&args, &mut i),
            "--strict-castling" => parsed.config.fen_options.strict_castling = true,
            "--strict-rows" => parsed.config.skip_malformed = false,
            "--with-planes" => parsed.config.include_planes = true,
            "--quiet" => parsed.quiet = true,
            "--help" | "-h" => {
                print_usage();
                process::exit(0);
            }
            other => {
                eprintln!("Unknown argument: {}", other);
                print_usage();
                process::exit(1);
            }
        }
        i += 1;
    }

    parsed
}

/// Returns the value following the flag at `args[*i]`, advancing `i`.
fn value(args: &[String], i: &mut usize) -> String {
    let flag = &args[*i];
    *i += 1;
    match args.get(*i) {
        Some(v) => v.clone(),
        None => {
            eprintln!("Missing value for {}", flag);
            print_usage();
            process::exit(1);
        }
    }
}

fn parse_value<T: FromStr>(args: &[String], i: &mut usize) -> T {
    let flag = args[*i].clone();
    let raw = value(args, i);
    match raw.parse() {
        Ok(v) => v,
        Err(_) => {
            eprintln!("Invalid {} value: {}", flag, raw);
            process::exit(1);
        }
    }
}

fn print_usage() {
    eprintln!("Usage: encode_dataset [OPTIONS]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --input FILE              Input CSV path (default: stdin)");
    eprintln!("  --output FILE             Output JSONL path (default: stdout)");
    eprintln!("  --validation-output FILE  Write a validation split to FILE");
    eprintln!("  --validation-split F      Validation fraction (default: 0.02)");
    eprintln!("  --threads N               Number of worker threads (default: 4)");
    eprintln!("  --seed N                  Shuffle seed, 0 for entropy (default: 0)");
    eprintln!("  --strict-castling         Reject unknown castling characters");
    eprintln!("  --strict-rows             Fail on the first malformed row");
    eprintln!("  --with-planes             Include input planes in each record");
    eprintln!("  --quiet                   Only log warnings and errors");
    eprintln!("  --help                    Show this help");
}
