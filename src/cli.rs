use std::env;
use std::path::PathBuf;

use thiserror::Error;

use crate::config::PlotConfig;

/// Parsed command line.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct CliOptions {
    /// Positional week number; the configured week when absent.
    pub week: Option<i64>,
    pub csv: Option<PathBuf>,
    pub bands: Option<usize>,
    pub save: bool,
    pub out_dir: Option<PathBuf>,
    pub export: Option<PathBuf>,
    pub config: Option<PathBuf>,
    pub demo: bool,
    pub no_show: bool,
    pub verbose: bool,
    pub help: bool,
}

impl CliOptions {
    /// Applies command-line overrides on top of a loaded configuration.
    pub fn apply_to(&self, cfg: &mut PlotConfig) {
        if let Some(week) = self.week {
            cfg.plot.week = week;
        }
        if let Some(ref csv) = self.csv {
            cfg.data.csv_path = csv.clone();
        }
        if let Some(bands) = self.bands {
            cfg.plot.bands = bands;
        }
        if self.save {
            cfg.plot.save = true;
        }
        if let Some(ref dir) = self.out_dir {
            cfg.plot.output_dir = dir.clone();
        }
    }
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum CliError {
    /// The positional week argument is not an integer.
    #[error("Error: Número de setmana no valid.")]
    InvalidWeek(String),
    #[error("error: {0}")]
    Usage(String),
}

pub fn parse_args() -> Result<CliOptions, CliError> {
    let args: Vec<String> = env::args().skip(1).collect();
    parse_args_from(&args)
}

pub fn parse_args_from(args: &[String]) -> Result<CliOptions, CliError> {
    let mut i = 0usize;
    let mut opts = CliOptions::default();

    while i < args.len() {
        let arg = args[i].as_str();
        if let Some(week) = parse_week(arg) {
            if opts.week.replace(week).is_some() {
                return Err(CliError::Usage("week number provided more than once".into()));
            }
            i += 1;
            continue;
        }
        match arg {
            "--csv" => {
                i += 1;
                let path = args.next_or_err(i, "missing value for --csv (expected a file path)")?;
                opts.csv = Some(PathBuf::from(path));
            }
            "--bands" => {
                i += 1;
                let raw = args.next_or_err(i, "missing value for --bands (expected a count)")?;
                let bands = raw
                    .parse::<usize>()
                    .ok()
                    .filter(|b| *b > 0)
                    .ok_or_else(|| {
                        CliError::Usage(format!("--bands value \"{raw}\" is not a positive integer"))
                    })?;
                opts.bands = Some(bands);
            }
            "--out-dir" => {
                i += 1;
                let dir = args.next_or_err(i, "missing value for --out-dir (expected a directory)")?;
                opts.out_dir = Some(PathBuf::from(dir));
            }
            "--export" => {
                i += 1;
                let path = args.next_or_err(i, "missing value for --export (expected a file path)")?;
                opts.export = Some(PathBuf::from(path));
            }
            "--config" => {
                i += 1;
                let path = args.next_or_err(i, "missing value for --config (expected a TOML file)")?;
                if opts.config.replace(PathBuf::from(path)).is_some() {
                    return Err(CliError::Usage("--config provided more than once".into()));
                }
            }
            "--save" => opts.save = true,
            "--demo" => opts.demo = true,
            "--no-show" => opts.no_show = true,
            "--verbose" | "-v" => opts.verbose = true,
            "--help" | "-h" => opts.help = true,
            other if other.starts_with('-') => {
                return Err(CliError::Usage(format!("unknown argument: {other}")));
            }
            other => return Err(CliError::InvalidWeek(other.to_string())),
        }
        i += 1;
    }

    if opts.demo && opts.csv.is_some() {
        return Err(CliError::Usage(
            "arguments `--demo` and `--csv` are mutually exclusive; choose one source".into(),
        ));
    }

    Ok(opts)
}

/// Parses a positional week. Integers beyond `i64` saturate so they are
/// reported as out of range rather than as non-numeric.
fn parse_week(arg: &str) -> Option<i64> {
    if let Ok(week) = arg.parse::<i64>() {
        return Some(week);
    }
    let (negative, digits) = match arg.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, arg.strip_prefix('+').unwrap_or(arg)),
    };
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    Some(if negative { i64::MIN } else { i64::MAX })
}

trait SliceArgExt {
    fn next_or_err(&self, index: usize, err: &str) -> Result<&str, CliError>;
}

impl SliceArgExt for [String] {
    fn next_or_err(&self, index: usize, err: &str) -> Result<&str, CliError> {
        self.get(index)
            .map(String::as_str)
            .ok_or_else(|| CliError::Usage(err.to_string()))
    }
}

pub fn print_usage() {
    eprintln!("horizon-graph: horizon graph of one week of hourly consumption");
    eprintln!();
    eprintln!("Usage: horizon-graph [WEEK] [OPTIONS]");
    eprintln!();
    eprintln!("Arguments:");
    eprintln!("  WEEK                 1-indexed week number (default: 1)");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --csv <path>         Hourly CSV (default: AEP_hourly.csv)");
    eprintln!("  --bands <n>          Bands per side of the horizon (default: 3)");
    eprintln!("  --save               Write the PNG");
    eprintln!("  --out-dir <dir>      Directory for the PNG (default: .)");
    eprintln!("  --export <path>      Write the folded band heights as CSV");
    eprintln!("  --config <path>      Load settings from a TOML file");
    eprintln!("  --demo               Use a synthetic dataset instead of a CSV");
    eprintln!("  --no-show            Skip the interactive display");
    eprintln!("  -v, --verbose        Debug logging (RUST_LOG overrides)");
    eprintln!("  -h, --help           Show this help message");
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| (*s).to_string()).collect()
    }

    #[test]
    fn no_arguments_defaults() {
        let opts = parse_args_from(&[]).expect("parse should succeed");
        assert_eq!(opts, CliOptions::default());
        assert!(opts.week.is_none());
    }

    #[test]
    fn positional_week() {
        let opts = parse_args_from(&args(&["12"])).expect("parse should succeed");
        assert_eq!(opts.week, Some(12));
    }

    #[test]
    fn negative_week_is_parsed_for_range_check() {
        let opts = parse_args_from(&args(&["-3"])).expect("parse should succeed");
        assert_eq!(opts.week, Some(-3));
    }

    #[test]
    fn oversized_week_saturates() {
        let opts = parse_args_from(&args(&["99999999999999999999"])).expect("parse should succeed");
        assert_eq!(opts.week, Some(i64::MAX));
        let opts = parse_args_from(&args(&["-99999999999999999999"])).expect("parse should succeed");
        assert_eq!(opts.week, Some(i64::MIN));
    }

    #[test]
    fn non_integer_week_is_rejected() {
        let err = parse_args_from(&args(&["tres"])).unwrap_err();
        assert_eq!(err, CliError::InvalidWeek("tres".into()));
        assert_eq!(err.to_string(), "Error: Número de setmana no valid.");
        assert!(parse_args_from(&args(&["1.5"])).is_err());
    }

    #[test]
    fn options_and_week_in_any_order() {
        let opts = parse_args_from(&args(&[
            "--save", "4", "--bands", "5", "--csv", "data.csv", "--out-dir", "plots",
        ]))
        .expect("parse should succeed");
        assert_eq!(opts.week, Some(4));
        assert!(opts.save);
        assert_eq!(opts.bands, Some(5));
        assert_eq!(opts.csv.as_deref().and_then(|p| p.to_str()), Some("data.csv"));
        assert_eq!(opts.out_dir.as_deref().and_then(|p| p.to_str()), Some("plots"));
    }

    #[test]
    fn zero_bands_rejected() {
        assert!(matches!(
            parse_args_from(&args(&["--bands", "0"])),
            Err(CliError::Usage(_))
        ));
    }

    #[test]
    fn missing_option_value() {
        assert!(matches!(
            parse_args_from(&args(&["--csv"])),
            Err(CliError::Usage(_))
        ));
    }

    #[test]
    fn unknown_flag() {
        let err = parse_args_from(&args(&["--bogus"])).unwrap_err();
        assert!(err.to_string().contains("--bogus"));
    }

    #[test]
    fn demo_and_csv_are_exclusive() {
        assert!(parse_args_from(&args(&["--demo", "--csv", "x.csv"])).is_err());
    }

    #[test]
    fn overrides_apply_to_config() {
        let opts = parse_args_from(&args(&["2", "--bands", "4", "--save"])).expect("parse");
        let mut cfg = PlotConfig::default();
        opts.apply_to(&mut cfg);
        assert_eq!(cfg.plot.week, 2);
        assert_eq!(cfg.plot.bands, 4);
        assert!(cfg.plot.save);
        assert_eq!(cfg.data.value_column, "AEP_MW");
    }
}
