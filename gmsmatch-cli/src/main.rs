use clap::Parser;
use gmsmatch::io::image_size;
use gmsmatch::{DMatch, GmsConfig, GmsMatcher, ImageSize, Keypoint};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

const SCHEMA_JSON: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/config.schema.json"));
const EXAMPLE_JSON: &str =
    include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/config.example.json"));

#[derive(Parser, Debug)]
#[command(author, version, about = "GMS match filter CLI (JSON config driven)")]
struct Cli {
    /// Path to the JSON configuration file.
    #[arg(short, long, value_name = "FILE", default_value = "config.json")]
    config: PathBuf,
    /// Print the JSON schema and exit.
    #[arg(long)]
    print_schema: bool,
    /// Print an example config and exit.
    #[arg(long)]
    print_example: bool,
    /// Enable tracing output for performance profiling.
    #[arg(long)]
    trace: bool,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct GmsConfigJson {
    with_rotation: bool,
    with_scale: bool,
    threshold_factor: f64,
    parallel: bool,
}

impl Default for GmsConfigJson {
    fn default() -> Self {
        let cfg = GmsConfig::default();
        Self {
            with_rotation: cfg.with_rotation,
            with_scale: cfg.with_scale,
            threshold_factor: cfg.threshold_factor,
            parallel: cfg.parallel,
        }
    }
}

impl From<GmsConfigJson> for GmsConfig {
    fn from(value: GmsConfigJson) -> Self {
        Self {
            with_rotation: value.with_rotation,
            with_scale: value.with_scale,
            threshold_factor: value.threshold_factor,
            parallel: value.parallel,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Config {
    input_path: String,
    output_path: Option<String>,
    image1_path: Option<String>,
    image2_path: Option<String>,
    gms: GmsConfigJson,
}

#[derive(Clone, Copy, Debug, Deserialize)]
struct SizeRecord {
    width: u32,
    height: u32,
}

#[derive(Clone, Copy, Debug, Deserialize)]
struct KeypointRecord {
    x: f32,
    y: f32,
    #[serde(default = "default_keypoint_size")]
    size: f32,
    #[serde(default = "default_keypoint_angle")]
    angle: f32,
}

fn default_keypoint_size() -> f32 {
    1.0
}

fn default_keypoint_angle() -> f32 {
    -1.0
}

impl From<KeypointRecord> for Keypoint {
    fn from(value: KeypointRecord) -> Self {
        Keypoint::new(value.x, value.y).with_shape(value.size, value.angle)
    }
}

#[derive(Clone, Copy, Debug, Deserialize, Serialize)]
struct MatchRecord {
    query_idx: usize,
    train_idx: usize,
    #[serde(default)]
    distance: f32,
}

impl From<MatchRecord> for DMatch {
    fn from(value: MatchRecord) -> Self {
        DMatch::new(value.query_idx, value.train_idx, value.distance)
    }
}

impl From<DMatch> for MatchRecord {
    fn from(value: DMatch) -> Self {
        Self {
            query_idx: value.query_idx,
            train_idx: value.train_idx,
            distance: value.distance,
        }
    }
}

#[derive(Debug, Deserialize)]
struct Input {
    size1: Option<SizeRecord>,
    size2: Option<SizeRecord>,
    keypoints1: Vec<KeypointRecord>,
    keypoints2: Vec<KeypointRecord>,
    matches: Vec<MatchRecord>,
}

#[derive(Debug, Serialize)]
struct HypothesisRecord {
    rotation_deg: f32,
    scale_ratio: f64,
}

#[derive(Debug, Serialize)]
struct Output {
    num_input: usize,
    num_inliers: usize,
    hypothesis: HypothesisRecord,
    matches: Vec<MatchRecord>,
}

fn resolve_size(
    size: Option<SizeRecord>,
    image_path: Option<&str>,
    name: &str,
) -> Result<ImageSize, Box<dyn std::error::Error>> {
    if let Some(size) = size {
        return Ok(ImageSize::new(size.width, size.height)?);
    }
    match image_path {
        Some(path) => Ok(image_size(path)?),
        None => Err(format!("{name} is missing from the input and no image path is set").into()),
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    if cli.trace {
        tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env().add_directive("gmsmatch=info".parse()?))
            .with_target(false)
            .init();
    }

    if cli.print_schema {
        println!("{SCHEMA_JSON}");
        return Ok(());
    }
    if cli.print_example {
        println!("{EXAMPLE_JSON}");
        return Ok(());
    }

    let config_text = fs::read_to_string(&cli.config)?;
    let config: Config = serde_json::from_str(&config_text)?;
    if config.input_path.is_empty() {
        return Err("input_path must be set in the config".into());
    }

    let input_text = fs::read_to_string(&config.input_path)?;
    let input: Input = serde_json::from_str(&input_text)?;
    let size1 = resolve_size(input.size1, config.image1_path.as_deref(), "size1")?;
    let size2 = resolve_size(input.size2, config.image2_path.as_deref(), "size2")?;
    let keypoints1: Vec<Keypoint> = input.keypoints1.into_iter().map(Keypoint::from).collect();
    let keypoints2: Vec<Keypoint> = input.keypoints2.into_iter().map(Keypoint::from).collect();
    let matches: Vec<DMatch> = input.matches.into_iter().map(DMatch::from).collect();

    let matcher = GmsMatcher::new(config.gms.into());
    let report = matcher.filter(size1, size2, &keypoints1, &keypoints2, &matches)?;

    let output = Output {
        num_input: matches.len(),
        num_inliers: report.num_inliers,
        hypothesis: HypothesisRecord {
            rotation_deg: report.hypothesis.rotation_deg(),
            scale_ratio: report.hypothesis.scale_ratio(),
        },
        matches: report.matches.into_iter().map(MatchRecord::from).collect(),
    };
    let json = serde_json::to_string_pretty(&output)?;

    match config.output_path {
        Some(path) => fs::write(path, json)?,
        None => println!("{json}"),
    }

    Ok(())
}
