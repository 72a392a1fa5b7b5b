//! Orchard missing tree detection tool
//!
//! Reads surveyed tree positions of one orchard from a CSV or JSON survey
//! file, infers the two planting directions and reports the positions where
//! a tree is expected but missing.

use clap::{Parser, ValueEnum};
use csv::{ReaderBuilder, WriterBuilder};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{self, BufReader, Write};
use std::path::{Path, PathBuf};

mod orchard;


use orchard::config::{
    DEFAULT_CLUSTERING_PRECISION, DEFAULT_COLINEARITY_TOLERANCE, DEFAULT_CONFIDENT_GROUP_SIZE,
    DEFAULT_EXISTENCE_PRECISION, DEFAULT_NEIGHBOR_COUNT, DEFAULT_POTENTIAL_GROUP_SIZE,
};
use orchard::{
    AxisPartition, Coordinate, Detection, DetectorConfig, GroupingStrategy, detect_missing_trees,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Json,
    Csv,
}

#[derive(Parser)]
#[command(name = "orchard_gaps")]
#[command(about = "Find missing trees in a regularly planted orchard", long_about = None)]
struct Args {
    /// Input file: CSV with latitude,longitude columns or a JSON tree survey
    #[arg(short, long, default_value = "trees.csv")]
    input: PathBuf,

    /// Output file for the report (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Report format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Json)]
    format: OutputFormat,

    /// Orchard identifier echoed in the JSON report
    #[arg(long)]
    orchard_id: Option<u64>,

    /// Also report potentially missing trees
    #[arg(short, long)]
    potential: bool,

    /// Trees considered per local axis search
    #[arg(short, long, default_value_t = DEFAULT_NEIGHBOR_COUNT)]
    neighbor_count: usize,

    /// Max gradient difference for three trees to share a row
    #[arg(long, default_value_t = DEFAULT_COLINEARITY_TOLERANCE)]
    colinearity_tolerance: f64,

    /// Max distance (m) between a projected position and a tree occupying it
    #[arg(long, default_value_t = DEFAULT_EXISTENCE_PRECISION)]
    existence_precision: f64,

    /// Max distance (m) between grouped missing tree candidates
    #[arg(long, default_value_t = DEFAULT_CLUSTERING_PRECISION)]
    clustering_precision: f64,

    /// Candidates needed to confirm a missing tree
    #[arg(short = 'm', long, default_value_t = DEFAULT_CONFIDENT_GROUP_SIZE)]
    min_group_size: usize,

    /// Candidates needed to flag a potentially missing tree
    #[arg(long, default_value_t = DEFAULT_POTENTIAL_GROUP_SIZE)]
    potential_group_size: usize,

    /// How row observations are split into the two orchard axes
    #[arg(long, value_enum, default_value_t = AxisPartition::SlopeSign)]
    partition: AxisPartition,

    /// How missing tree candidates are merged
    #[arg(long, value_enum, default_value_t = GroupingStrategy::Greedy)]
    grouping: GroupingStrategy,

    /// Enable debug output
    #[arg(short, long)]
    debug: bool,
}

impl Args {
    fn detector_config(&self) -> DetectorConfig {
        DetectorConfig {
            neighbor_count: self.neighbor_count,
            colinearity_tolerance: self.colinearity_tolerance,
            existence_precision: self.existence_precision,
            clustering_precision: self.clustering_precision,
            confident_group_size: self.min_group_size,
            potential_group_size: self.potential_group_size,
            report_potential: self.potential,
            axis_partition: self.partition,
            grouping: self.grouping,
        }
    }
}

/// JSON report shape: `{orchard_id, missing_trees: [{lat, lng}, ...]}`
#[derive(Debug, Serialize)]
struct Report {
    #[serde(skip_serializing_if = "Option::is_none")]
    orchard_id: Option<u64>,
    missing_trees: Vec<Coordinate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    potentially_missing_trees: Option<Vec<Coordinate>>,
}

impl Report {
    fn new(orchard_id: Option<u64>, detection: Detection) -> Self {
        Report {
            orchard_id,
            missing_trees: detection.missing,
            potentially_missing_trees: detection.potentially_missing,
        }
    }
}

fn main() {
    let args = Args::parse();

    let default_filter = if args.debug { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    let trees = match read_trees(&args.input) {
        Ok(trees) => trees,
        Err(e) => {
            eprintln!("Error reading {:?}: {}", args.input, e);
            std::process::exit(1);
        }
    };

    if trees.is_empty() {
        eprintln!("No trees found in {:?}", args.input);
        std::process::exit(1);
    }

    info!("Read {} trees from {:?}", trees.len(), args.input);

    let config = args.detector_config();
    debug!("Running with {:?}", config);

    let detection = match detect_missing_trees(&trees, &config) {
        Ok(detection) => detection,
        Err(e) => {
            eprintln!("Missing tree detection failed: {}", e);
            std::process::exit(1);
        }
    };

    debug!(
        "Axes: {:?} / {:?}, {} unoccupied projections",
        detection.features.axis1, detection.features.axis2, detection.candidate_count
    );

    let report = Report::new(args.orchard_id, detection);

    let written = match &args.output {
        None => write_report(io::stdout().lock(), &report, args.format),
        Some(path) => match File::create(path) {
            Ok(file) => write_report(file, &report, args.format),
            Err(e) => Err(e.into()),
        },
    };

    if let Err(e) = written {
        eprintln!("Error writing report: {}", e);
        std::process::exit(1);
    }

    if let Some(path) = &args.output {
        info!("Report written to {:?}", path);
    }
}

/// Tree survey as returned by the survey API: `{"results": [...]}`
#[derive(Debug, Deserialize)]
struct Survey {
    results: Vec<SurveyTree>,
}

#[derive(Debug, Deserialize)]
struct SurveyTree {
    latitude: SurveyNumber,
    longitude: SurveyNumber,
}

/// Survey APIs send coordinates as numbers or as decimal strings
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum SurveyNumber {
    Number(f64),
    Text(String),
}

impl SurveyNumber {
    fn value(&self) -> Result<f64, std::num::ParseFloatError> {
        match self {
            SurveyNumber::Number(v) => Ok(*v),
            SurveyNumber::Text(s) => s.trim().parse(),
        }
    }
}

/// Reads tree positions, picking the parser from the file extension
///
/// `.json` files are read as surveys, anything else as CSV.
fn read_trees(path: &Path) -> Result<Vec<Coordinate>, Box<dyn std::error::Error>> {
    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

    if is_json {
        read_trees_json(path)
    } else {
        read_trees_csv(path)
    }
}

/// Reads a JSON tree survey
fn read_trees_json(path: &Path) -> Result<Vec<Coordinate>, Box<dyn std::error::Error>> {
    let survey: Survey = serde_json::from_reader(BufReader::new(File::open(path)?))?;

    let mut trees = Vec::with_capacity(survey.results.len());
    for (i, tree) in survey.results.iter().enumerate() {
        match (tree.latitude.value(), tree.longitude.value()) {
            (Ok(lat), Ok(lng)) if is_valid_position(lat, lng) => {
                trees.push(Coordinate::new(lat, lng))
            }
            _ => warn!("Skipping survey result {} with unparsable coordinates", i),
        }
    }

    Ok(trees)
}

/// Reads trees from a CSV file
///
/// Expected format: `latitude,longitude` (header row is optional, extra
/// columns are ignored). Positions that are not finite or out of range
/// are skipped like unparsable rows.
fn read_trees_csv(path: &Path) -> Result<Vec<Coordinate>, Box<dyn std::error::Error>> {
    let file = File::open(path)?;
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(file);

    let mut trees = Vec::new();

    for (row, result) in reader.records().enumerate() {
        let record = result?;

        let lat = record.get(0).map(|s| s.trim().parse::<f64>());
        let lng = record.get(1).map(|s| s.trim().parse::<f64>());
        match (lat, lng) {
            (Some(Ok(lat)), Some(Ok(lng))) if is_valid_position(lat, lng) => {
                trees.push(Coordinate::new(lat, lng))
            }
            (Some(Ok(_)), Some(Ok(_))) => {
                warn!("Skipping CSV row {} with an out of range position", row + 1)
            }
            // First row not numeric: header
            _ if row == 0 => {}
            _ => warn!("Skipping CSV row {} without numeric latitude,longitude", row + 1),
        }
    }

    Ok(trees)
}

/// Checks that a parsed pair is a real position: `f64` parsing also
/// accepts `NaN` and `inf`
fn is_valid_position(lat: f64, lng: f64) -> bool {
    (-90.0..=90.0).contains(&lat) && (-180.0..=180.0).contains(&lng)
}

/// Writes the report to `out` in the requested format
///
/// CSV rows are `latitude,longitude,confidence` where confidence is
/// `missing` or `potential`.
fn write_report<W: Write>(
    mut out: W,
    report: &Report,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    match format {
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut out, report)?;
            writeln!(out)?;
            out.flush()?;
        }
        OutputFormat::Csv => {
            let mut writer = WriterBuilder::new().from_writer(out);
            writer.write_record(["latitude", "longitude", "confidence"])?;

            let potential = report.potentially_missing_trees.iter().flatten();
            let rows = report
                .missing_trees
                .iter()
                .map(|c| (c, "missing"))
                .chain(potential.map(|c| (c, "potential")));

            for (c, confidence) in rows {
                writer.write_record([
                    c.lat.to_string(),
                    c.lng.to_string(),
                    confidence.to_string(),
                ])?;
            }
            writer.flush()?;
        }
    }

    Ok(())
}
