//! horizon-graph entry point: CLI wiring, config loading and output dispatch.

use std::io;
use std::process;

use chrono::NaiveDate;
use tracing_subscriber::EnvFilter;

use horizon_graph::cli::{self, CliError, CliOptions};
use horizon_graph::config::PlotConfig;
use horizon_graph::dataset::Dataset;
use horizon_graph::error::Result;
use horizon_graph::io::export::export_csv;
use horizon_graph::render;
use horizon_graph::report::print_week_summary;
use horizon_graph::synthetic::SyntheticLoad;
use horizon_graph::week::WeekView;

/// Length of the `--demo` dataset in days.
const DEMO_DAYS: usize = 8 * 7;

/// Installs the stderr subscriber. `RUST_LOG` wins over the verbosity flag.
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

/// Loads `--config` (if any), validates it and applies command-line overrides.
fn load_config(cli: &CliOptions) -> PlotConfig {
    let mut cfg = match cli.config {
        Some(ref path) => match PlotConfig::from_toml_file(path) {
            Ok(cfg) => cfg,
            Err(e) => {
                eprintln!("{e}");
                process::exit(1);
            }
        },
        None => PlotConfig::default(),
    };

    cli.apply_to(&mut cfg);

    let errors = cfg.validate();
    if !errors.is_empty() {
        for e in &errors {
            eprintln!("{e}");
        }
        process::exit(1);
    }
    cfg
}

fn load_dataset(cli: &CliOptions, cfg: &PlotConfig) -> Result<Dataset> {
    if cli.demo {
        let start = NaiveDate::from_ymd_opt(2004, 10, 1).unwrap_or_default();
        SyntheticLoad::default().dataset(start, DEMO_DAYS)
    } else {
        Dataset::from_path(&cfg.data.csv_path, &cfg.columns())
    }
}

/// Builds the requested week and writes every requested output.
fn run(cli: &CliOptions, cfg: &PlotConfig) -> Result<()> {
    let dataset = load_dataset(cli, cfg)?;
    let view = WeekView::build(&dataset, cfg.plot.week, cfg.plot.bands)?;

    if cfg.plot.save {
        let path = render::save_png(
            &view,
            &cfg.palette(),
            &cfg.render_options(),
            &cfg.data.label,
            &cfg.plot.output_dir,
        )?;
        println!("Gràfic guardat a: {}", path.display());
    }

    if let Some(ref path) = cli.export {
        export_csv(&view, path)?;
        eprintln!("Band heights written to {}", path.display());
    }

    show(cli, dataset, view, cfg)
}

#[cfg(feature = "tui")]
fn show(cli: &CliOptions, dataset: Dataset, view: WeekView, cfg: &PlotConfig) -> Result<()> {
    use std::io::IsTerminal;

    use horizon_graph::error::HorizonError;
    use horizon_graph::tui::{self, runtime::App};

    if cli.no_show || !io::stdout().is_terminal() {
        print_week_summary(&view);
        return Ok(());
    }
    tui::run(App::new(dataset, view, cfg)).map_err(HorizonError::Terminal)
}

#[cfg(not(feature = "tui"))]
fn show(_cli: &CliOptions, _dataset: Dataset, view: WeekView, _cfg: &PlotConfig) -> Result<()> {
    print_week_summary(&view);
    Ok(())
}

fn main() {
    let cli = match cli::parse_args() {
        Ok(cli) => cli,
        Err(e @ CliError::InvalidWeek(_)) => {
            println!("{e}");
            process::exit(1);
        }
        Err(e @ CliError::Usage(_)) => {
            eprintln!("{e}");
            cli::print_usage();
            process::exit(1);
        }
    };

    if cli.help {
        cli::print_usage();
        process::exit(0);
    }

    init_logging(cli.verbose);
    let cfg = load_config(&cli);

    if let Err(e) = run(&cli, &cfg) {
        eprintln!("{e}");
        process::exit(1);
    }
}
