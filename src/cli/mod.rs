//! SafeHeart CLI Module
//!
//! Command-line interface for serving the dashboard, scoring a single
//! profile and inspecting the dataset.

use clap::{Parser, Subcommand};
use colored::*;
use std::path::PathBuf;
use std::time::Instant;

use crate::dashboard::{probability_text, risk_text};
use crate::dataset::{CvdDataset, DataLoader, SEX_OPTIONS};
use crate::figures::heart_disease_label;
use crate::model::{HeartDiseasePredictor, PredictionRequest, TrainerConfig};
use crate::server::{run_server, ServerConfig};

// ─── Styling helpers ───────────────────────────────────────────────────────────

fn dim(s: &str) -> ColoredString   { s.truecolor(100, 100, 100) }
fn accent(s: &str) -> ColoredString { s.truecolor(120, 170, 255) }
fn muted(s: &str) -> ColoredString  { s.truecolor(140, 140, 140) }
fn ok(s: &str) -> ColoredString     { s.truecolor(100, 210, 120) }
fn alert(s: &str) -> ColoredString  { s.truecolor(235, 90, 90) }

fn step_run(msg: &str) {
    print!("  {} {}... ", accent("›"), msg);
}

fn step_done(detail: &str) {
    println!("{} {}", ok("done"), dim(detail));
}

fn section(title: &str) {
    println!();
    println!("  {}", title.white().bold());
    println!("  {}", dim(&"─".repeat(56)));
}

// ─── CLI definition ────────────────────────────────────────────────────────────

#[derive(Parser)]
#[command(name = "safeheart")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Heart disease risk dashboard")]
#[command(long_about = None)]
pub struct Cli {
    /// Survey CSV with the required columns
    #[arg(short, long, global = true, env = "SAFEHEART_DATA", default_value = "CVD_cleaned_v2.csv")]
    pub data: PathBuf,

    /// Number of trees in the forest
    #[arg(long, global = true, default_value_t = 100)]
    pub trees: usize,

    /// Seed for the split and the forest
    #[arg(long, global = true, default_value_t = 42)]
    pub seed: u64,

    /// Maximum tree depth (unlimited by default)
    #[arg(long, global = true)]
    pub max_depth: Option<usize>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the web dashboard (default)
    Serve {
        /// Host to bind to
        #[arg(long, env = "HOST", default_value = "0.0.0.0")]
        host: String,

        /// Port to listen on
        #[arg(short, long, env = "PORT", default_value_t = 8050)]
        port: u16,
    },

    /// Score one profile from the command line
    Predict {
        #[arg(long)]
        sex: String,

        /// Age bucket, e.g. 50-54
        #[arg(long)]
        age: String,

        /// Height in cm
        #[arg(long)]
        height: f64,

        /// Weight in kg
        #[arg(long)]
        weight: f64,

        #[arg(long)]
        bmi: f64,

        /// Yes or No
        #[arg(long)]
        diabetes: String,

        /// Yes or No
        #[arg(long)]
        arthritis: String,
    },

    /// Show dataset statistics
    Info,
}

impl Cli {
    pub fn trainer_config(&self) -> TrainerConfig {
        let config = TrainerConfig::default()
            .with_n_estimators(self.trees)
            .with_random_state(self.seed);
        match self.max_depth {
            Some(depth) => config.with_max_depth(depth),
            None => config,
        }
    }

    /// Environment defaults overridden by the parsed flags
    pub fn server_config(&self, host: &str, port: u16) -> ServerConfig {
        ServerConfig {
            host: host.to_string(),
            port,
            data_path: self.data.clone(),
            trainer: self.trainer_config(),
            ..ServerConfig::default()
        }
    }
}

// ─── Commands ──────────────────────────────────────────────────────────────────

fn load(data_path: &PathBuf) -> anyhow::Result<CvdDataset> {
    step_run("Loading dataset");
    let start = Instant::now();
    let dataset = DataLoader::new().load_dataset(data_path)?;
    step_done(&format!("{} rows in {:.2}s", dataset.len(), start.elapsed().as_secs_f64()));
    Ok(dataset)
}

pub fn cmd_predict(
    data_path: &PathBuf,
    config: &TrainerConfig,
    request: &PredictionRequest,
) -> anyhow::Result<()> {
    section("Heart Disease Risk");
    let dataset = load(data_path)?;

    step_run(&format!("Training forest ({} trees)", config.n_estimators));
    let start = Instant::now();
    let predictor = HeartDiseasePredictor::train(&dataset, config)?;
    step_done(&format!("{:.2}s", start.elapsed().as_secs_f64()));

    let result = predictor.predict(request)?;
    println!();
    let text = risk_text(&result);
    if result.is_high_risk() {
        println!("  {}", alert(text).bold());
    } else {
        println!("  {}", ok(text).bold());
    }
    println!("  {}", probability_text(result.probability));
    println!();
    Ok(())
}

pub fn cmd_info(data_path: &PathBuf) -> anyhow::Result<()> {
    section("Dataset Info");
    let dataset = load(data_path)?;
    println!();

    println!("  {:<14} {}", muted("File"), data_path.display());
    println!("  {:<14} {}", muted("Records"), dataset.len());
    println!("  {:<14} {}", muted(heart_disease_label(1)), dataset.positives());
    println!(
        "  {:<14} {}",
        muted(heart_disease_label(0)),
        dataset.len() - dataset.positives()
    );
    for sex in SEX_OPTIONS {
        println!("  {:<14} {}", muted(sex), dataset.filter_by_sex(sex).count());
    }
    println!("  {:<14} {}", muted("Age buckets"), dataset.age_categories().join(", "));
    println!();
    Ok(())
}

pub async fn cmd_serve(config: ServerConfig) -> anyhow::Result<()> {
    println!();
    println!("  {}", "SafeHeart".white().bold());
    println!("  {}", dim(&format!("v{}", env!("CARGO_PKG_VERSION"))));
    println!("  {} {}", muted("Dashboard"), format!("http://{}:{}", config.host, config.port));
    println!("  {} {}", muted("Health   "), format!("http://{}:{}/api/health", config.host, config.port));
    println!("  {}", dim("ctrl+c to stop"));
    println!();

    run_server(config).await
}
