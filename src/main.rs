use anyhow::Context;
use clap::Parser;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use lif_trace::{
    Config, Simulator, SpikeSummary, TraceArchive, TraceTable, TrialRunner, TrialSet,
    PREVIEW_ROWS,
};

#[derive(Parser)]
#[command(name = "lif-trace")]
#[command(version)]
#[command(about = "Leaky integrate-and-fire neuron under a pulsed current", long_about = None)]
struct Cli {
    /// Path to a TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Applied current magnitude in amperes; repeat for several trials
    #[arg(short = 'i', long = "current")]
    currents: Vec<f64>,

    /// Integration step (s)
    #[arg(long)]
    dt: Option<f64>,

    /// Simulation horizon (s)
    #[arg(long)]
    tmax: Option<f64>,

    /// Current onset (s)
    #[arg(long)]
    ton: Option<f64>,

    /// Current offset (s)
    #[arg(long)]
    toff: Option<f64>,

    /// Write each trial's table as CSV
    #[arg(long)]
    csv: Option<PathBuf>,

    /// Write all traces and parameters as JSON
    #[arg(long)]
    json: Option<PathBuf>,

    /// Rows shown from the head and tail of each table
    #[arg(long, default_value_t = PREVIEW_ROWS)]
    preview: usize,

    /// Run trials on the calling thread instead of the rayon pool
    #[arg(long)]
    sequential: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,
}

impl Cli {
    /// CLI flags take precedence over the config file.
    fn apply_overrides(&self, config: &mut Config) {
        let sim = &mut config.simulation;
        if let Some(dt) = self.dt {
            sim.dt = dt;
        }
        if let Some(t_max) = self.tmax {
            sim.t_max = t_max;
        }
        if let Some(t_on) = self.ton {
            sim.t_on = t_on;
        }
        if let Some(t_off) = self.toff {
            sim.t_off = t_off;
        }
        if !self.currents.is_empty() {
            config.trials = TrialSet::new(self.currents.clone());
        }
    }
}

fn csv_path(base: &Path, trial: usize, trials: usize) -> PathBuf {
    if trials == 1 {
        return base.to_path_buf();
    }
    let stem = base
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "trace".to_string());
    let file_name = match base.extension() {
        Some(ext) => format!("{}_trial{}.{}", stem, trial, ext.to_string_lossy()),
        None => format!("{}_trial{}", stem, trial),
    };
    base.with_file_name(file_name)
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .with(filter)
        .init();

    let mut config = Config::load(cli.config.as_deref()).context("Failed to load configuration")?;
    cli.apply_overrides(&mut config);
    config.validate().context("Invalid configuration")?;

    let params = config.simulation;
    info!(
        dt = params.dt,
        t_max = params.t_max,
        t_on = params.t_on,
        t_off = params.t_off,
        tau = params.time_constant(),
        "Leaky integrate-and-fire simulation"
    );

    let simulator = Simulator::new(params)?;
    let mut runner = TrialRunner::new(simulator);
    if cli.sequential {
        runner = runner.sequential();
    }
    let traces = runner.run(&config.trials);

    for (trial, trace) in traces.iter().enumerate() {
        SpikeSummary::from_trace(trace, &params).report(trial);

        let table = TraceTable::from_trace(trace);
        if cli.preview > 0 {
            println!("Trial {} (I = {:e} A)", trial, trace.applied_current);
            print!("{}", table.head(cli.preview));
            println!("{:>8}", "...");
            print!("{}", table.tail(cli.preview));
        }

        if let Some(base) = &cli.csv {
            let path = csv_path(base, trial, traces.len());
            table
                .write_csv(&path)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            info!(path = %path.display(), "Wrote trace table");
        }
    }

    if let Some(path) = &cli.json {
        TraceArchive::new(params, traces)
            .save(path)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        info!(path = %path.display(), "Wrote trace archive");
    }

    Ok(())
}
