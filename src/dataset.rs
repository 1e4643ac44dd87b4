//! Training data encoding.
//!
//! Turns `fen,uci,outcome` rows into network training samples: input planes
//! from the FEN, the policy index of the played move, and the game outcome as
//! the value target. Batches are encoded on a rayon pool and can be split into
//! training and validation sets with a seeded shuffle.

use std::io::{BufRead, Write};

use log::{info, warn};
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::Serialize;

use crate::board::PieceKind;
use crate::error::CodecError;
use crate::nn::encoding::{encode_position, PlaneTensor};
use crate::nn::policy::{encode_move, PolicyIndex};
use crate::protocol::fen::{parse_fen_with, FenOptions};
use crate::protocol::uci::parse_move;

/// Default fraction of samples held out for validation.
pub const DEFAULT_VALIDATION_SPLIT: f64 = 0.02;

/// Header line some CSV exports start with.
const CSV_HEADER_PREFIX: &str = "fen,";

#[derive(Debug, thiserror::Error)]
pub enum DatasetError {
    #[error("malformed row: expected 'fen,uci,outcome', got '{0}'")]
    MalformedRow(String),
    #[error("invalid outcome '{0}'")]
    InvalidOutcome(String),
    #[error("no piece on from-square of move '{uci}' in '{fen}'")]
    EmptyFromSquare { fen: String, uci: String },
    #[error(transparent)]
    Codec(#[from] CodecError),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

/// Configuration for batch encoding.
#[derive(Debug, Clone)]
pub struct DatasetConfig {
    /// Number of worker threads; 1 encodes on the calling thread.
    pub threads: usize,
    /// Shuffle seed for the validation split (0 = use entropy).
    pub seed: u64,
    /// Fraction of samples held out for validation.
    pub validation_split: f64,
    /// Log and skip malformed rows instead of failing the batch.
    pub skip_malformed: bool,
    /// FEN parsing options.
    pub fen_options: FenOptions,
    /// Encode input planes into each sample (and so into JSONL output).
    pub include_planes: bool,
}

impl Default for DatasetConfig {
    fn default() -> Self {
        DatasetConfig {
            threads: 4,
            seed: 0,
            validation_split: DEFAULT_VALIDATION_SPLIT,
            skip_malformed: true,
            fen_options: FenOptions::default(),
            include_planes: false,
        }
    }
}

/// One input row with its 1-based line number in the source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    pub line_number: usize,
    pub text: String,
}

impl Row {
    pub fn new(line_number: usize, text: impl Into<String>) -> Self {
        Row {
            line_number,
            text: text.into(),
        }
    }
}

/// A single encoded training example.
///
/// `planes` is only populated when the batch asked for them; a boxed tensor
/// keeps samples small otherwise.
#[derive(Debug, Clone, PartialEq)]
pub struct TrainingSample {
    pub fen: String,
    pub uci: String,
    pub planes: Option<Box<PlaneTensor>>,
    pub policy_index: PolicyIndex,
    pub value: f32,
}

/// The result of encoding a batch of rows.
#[derive(Debug, Default)]
pub struct EncodedBatch {
    pub samples: Vec<TrainingSample>,
    /// Source line numbers of rows dropped as malformed.
    pub skipped_lines: Vec<usize>,
}

/// Encodes one `fen,uci,outcome` row.
///
/// The moving piece and side to move are read from the FEN. Input planes are
/// encoded only when `config.include_planes` is set.
pub fn encode_row(line: &str, config: &DatasetConfig) -> Result<TrainingSample, DatasetError> {
    let fields: Vec<&str> = line.trim().split(',').collect();
    let [fen, uci, outcome] = fields[..] else {
        return Err(DatasetError::MalformedRow(line.to_string()));
    };
    let (fen, uci, outcome) = (fen.trim(), uci.trim(), outcome.trim());

    let value = outcome
        .parse::<i32>()
        .map_err(|_| DatasetError::InvalidOutcome(outcome.to_string()))? as f32;

    let pos = parse_fen_with(fen, &config.fen_options)?;
    let mv = parse_move(uci)?;
    let piece = pos.piece_kind_at(mv.from);
    if piece == PieceKind::Empty {
        return Err(DatasetError::EmptyFromSquare {
            fen: fen.to_string(),
            uci: uci.to_string(),
        });
    }
    let policy_index = encode_move(&mv, piece, pos.side_to_move)?;

    Ok(TrainingSample {
        fen: fen.to_string(),
        uci: uci.to_string(),
        planes: config
            .include_planes
            .then(|| Box::new(encode_position(&pos))),
        policy_index,
        value,
    })
}

/// Encodes a batch of rows, preserving input order.
///
/// With `skip_malformed` set, rows that fail are logged and counted;
/// otherwise the first failing row aborts the batch.
pub fn encode_rows(rows: &[Row], config: &DatasetConfig) -> Result<EncodedBatch, DatasetError> {
    let results: Vec<Result<TrainingSample, DatasetError>> = if config.threads > 1 {
        use rayon::prelude::*;

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(config.threads)
            .build()?;
        pool.install(|| {
            rows.par_iter()
                .map(|row| encode_row(&row.text, config))
                .collect()
        })
    } else {
        rows.iter().map(|row| encode_row(&row.text, config)).collect()
    };

    let mut batch = EncodedBatch {
        samples: Vec::with_capacity(results.len()),
        skipped_lines: Vec::new(),
    };
    for (row, result) in rows.iter().zip(results) {
        match result {
            Ok(sample) => batch.samples.push(sample),
            Err(e) if config.skip_malformed => {
                warn!("skipping line {}: {}", row.line_number, e);
                batch.skipped_lines.push(row.line_number);
            }
            Err(e) => return Err(e),
        }
    }

    info!(
        "encoded {} rows ({} skipped)",
        batch.samples.len(),
        batch.skipped_lines.len()
    );
    Ok(batch)
}

/// Reads data rows, dropping blank lines and a leading CSV header. Each row
/// keeps its line number in the source.
pub fn read_rows<R: BufRead>(reader: R) -> Result<Vec<Row>, DatasetError> {
    let mut rows = Vec::new();
    for (i, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() || (i == 0 && line.starts_with(CSV_HEADER_PREFIX)) {
            continue;
        }
        rows.push(Row::new(i + 1, line));
    }
    Ok(rows)
}

/// Shuffles `samples` and splits off `fraction` of them for validation.
///
/// Returns `(train, validation)`. The same non-zero seed always produces the
/// same split; seed 0 draws from entropy.
pub fn split_validation<T>(mut samples: Vec<T>, fraction: f64, seed: u64) -> (Vec<T>, Vec<T>) {
    let mut rng = if seed != 0 {
        SmallRng::seed_from_u64(seed)
    } else {
        SmallRng::from_entropy()
    };
    samples.shuffle(&mut rng);

    let fraction = fraction.clamp(0.0, 1.0);
    let validation_len = ((samples.len() as f64) * fraction).round() as usize;
    let train = samples.split_off(validation_len.min(samples.len()));
    (train, samples)
}

#[derive(Serialize)]
struct SampleRecord<'a> {
    fen: &'a str,
    uci: &'a str,
    policy_index: usize,
    value: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    planes: Option<&'a [f32]>,
}

/// Writes samples as one JSON object per line. Planes are written for
/// samples that carry them.
pub fn write_jsonl<W: Write>(samples: &[TrainingSample], out: &mut W) -> Result<(), DatasetError> {
    for sample in samples {
        let record = SampleRecord {
            fen: &sample.fen,
            uci: &sample.uci,
            policy_index: sample.policy_index.get(),
            value: sample.value,
            planes: sample.planes.as_ref().map(|p| p.as_slice()),
        };
        serde_json::to_writer(&mut *out, &record)?;
        writeln!(out)?;
    }
    out.flush()?;
    Ok(())
}
