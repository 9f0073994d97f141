//! progmeter - Watch simulated parallel jobs through the in-place meter

use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Result;
use clap::Parser;
use progmeter_core::{MeterConfig, OutputMode, ProgMeter, Reporter};
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing_subscriber::EnvFilter;

mod jobs;

use jobs::{Plan, PlanShape};

#[derive(Parser, Debug)]
#[command(name = "progmeter")]
#[command(author, version = env!("PROGMETER_VERSION"), about = "progmeter - In-place progress for parallel jobs")]
struct Cli {
    /// Append plain lines instead of redrawing rows (no color, no cursor moves)
    #[arg(long, env = "PROGMETER_MINIMAL")]
    minimal: bool,

    /// Jobs that get their own row
    #[arg(long, default_value_t = 12)]
    items: usize,

    /// Jobs running at once
    #[arg(short, long, default_value_t = 4)]
    jobs: usize,

    /// Extra jobs counted in the summary without a row
    #[arg(long, default_value_t = 0)]
    untracked: usize,

    /// Probability that a job fails, between 0 and 1
    #[arg(long, default_value_t = 0.1, value_parser = parse_rate)]
    fail_rate: f64,

    /// Upper bound for a single job's duration in milliseconds
    #[arg(long, default_value_t = 1500)]
    max_ms: u64,

    /// Summary refresh interval in milliseconds
    #[arg(long, default_value_t = 1000)]
    tick_ms: u64,

    /// Seed for a reproducible plan
    #[arg(long)]
    seed: Option<u64>,

    /// Run without the progress display
    #[arg(short, long)]
    quiet: bool,
}

fn parse_rate(s: &str) -> Result<f64, String> {
    let rate: f64 = s.parse::<f64>().map_err(|e| e.to_string())?;
    if (0.0..=1.0).contains(&rate) {
        Ok(rate)
    } else {
        Err(format!("{rate} is not between 0 and 1"))
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr so they never shift the rows on stdout
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mode = if cli.minimal {
        OutputMode::Minimal
    } else {
        OutputMode::detect()
    };
    let config = MeterConfig::default()
        .with_mode(mode)
        .with_tick_interval(Duration::from_millis(cli.tick_ms.max(1)));

    let mut rng = match cli.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };
    let plan = Plan::generate(
        &PlanShape {
            items: cli.items,
            untracked: cli.untracked,
            fail_rate: cli.fail_rate,
            max_ms: cli.max_ms,
        },
        &mut rng,
    );
    tracing::debug!(?mode, units = plan.len(), seed = ?cli.seed, "starting");

    let meter = (!cli.quiet).then(|| ProgMeter::with_config(config));
    let reporter: Arc<dyn Reporter> = Arc::new(meter);

    let start = Instant::now();
    let result = jobs::run(Arc::clone(&reporter), plan, cli.jobs).await;
    reporter.close();
    let outcome = result?;

    println!(
        "{} done, {} failed in {:.1}s",
        outcome.done,
        outcome.failed,
        start.elapsed().as_secs_f64()
    );

    Ok(())
}
