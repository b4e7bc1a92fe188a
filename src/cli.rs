//! CLI definition and dispatch.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::domain::analytics::Analysis;
use crate::domain::day_counts::parse_day_counts;
use crate::domain::error::StocklensError;
use crate::ports::config_port::ConfigPort;

#[derive(Parser, Debug)]
#[command(
    name = "stocklens",
    about = "Trailing-window analytics for daily stock quotes"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Load CSV quote files into the repository
    Ingest {
        #[arg(short, long)]
        config: PathBuf,
        /// Override the [data] path from config
        #[arg(long)]
        data_dir: Option<PathBuf>,
    },
    /// Compute SMA, EMA and volatility for a symbol
    Analyze {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long)]
        symbol: String,
        /// Comma-separated day-counts overriding the configured lists
        #[arg(long)]
        days: Option<String>,
        /// Restrict output to one analysis: sma, ema or volatility
        #[arg(long)]
        analysis: Option<String>,
    },
    /// List symbols available in the repository
    ListSymbols {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// Show stored data range for a symbol
    Info {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long)]
        symbol: Option<String>,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Ingest { config, data_dir } => run_ingest(&config, data_dir),
        Command::Analyze {
            config,
            symbol,
            days,
            analysis,
        } => run_analyze(&config, &symbol, days.as_deref(), analysis.as_deref()),
        Command::ListSymbols { config } => run_list_symbols(&config),
        Command::Info { config, symbol } => run_info(&config, symbol.as_deref()),
    }
}

pub fn load_config(path: &PathBuf) -> Result<FileConfigAdapter, ExitCode> {
    FileConfigAdapter::from_file(path).map_err(|e| {
        let err = StocklensError::ConfigParse {
            file: path.display().to_string(),
            reason: e.to_string(),
        };
        eprintln!("error: {err}");
        ExitCode::from(&err)
    })
}

/// Day-count lists per analysis, resolved from `[analysis]` config keys with
/// the standard defaults, or from a single override list applied to every
/// requested analysis.
pub fn build_analysis_plan(
    config: &dyn ConfigPort,
    days_override: Option<&str>,
    analysis_filter: Option<Analysis>,
) -> Result<Vec<(Analysis, Vec<u32>)>, StocklensError> {
    const DEFAULTS: [(Analysis, &str, &str); 3] = [
        (Analysis::Sma, "sma_days", "30,180,360"),
        (Analysis::Ema, "ema_days", "30,60,90"),
        (Analysis::Volatility, "volatility_days", "30,90"),
    ];

    let mut plan = Vec::new();
    for (analysis, key, default) in DEFAULTS {
        if analysis_filter.is_some_and(|wanted| wanted != analysis) {
            continue;
        }
        let list = match days_override {
            Some(list) => list.to_string(),
            None => config
                .get_string("analysis", key)
                .unwrap_or_else(|| default.to_string()),
        };
        plan.push((analysis, parse_day_counts(&list)?));
    }

    Ok(plan)
}

fn run_ingest(config_path: &PathBuf, data_dir: Option<PathBuf>) -> ExitCode {
    eprintln!("Loading config from {}", config_path.display());
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    let data_path = match data_dir.or_else(|| adapter.get_string("data", "path").map(PathBuf::from))
    {
        Some(p) => p,
        None => {
            let err = StocklensError::ConfigMissing {
                section: "data".into(),
                key: "path".into(),
            };
            eprintln!("error: {err}");
            return ExitCode::from(&err);
        }
    };

    let source = crate::adapters::csv_source::CsvDirSource::new(data_path.clone());
    let files = match source.list_files() {
        Ok(f) => f,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::from(&e);
        }
    };

    if files.is_empty() {
        eprintln!("error: no .csv files found in {}", data_path.display());
        return ExitCode::from(4);
    }

    #[cfg(feature = "sqlite")]
    {
        use crate::adapters::sqlite_repository::SqliteRepository;
        use crate::ports::bar_repository::BarRepository;

        let repo = match SqliteRepository::from_config(&adapter) {
            Ok(r) => r,
            Err(e) => {
                eprintln!("error: {e}");
                return ExitCode::from(&e);
            }
        };

        eprintln!("Ingesting {} files from {}", files.len(), data_path.display());

        let mut loaded = 0;
        for file in &files {
            let series = match source.load_file(file) {
                Ok(s) => s,
                Err(e) => {
                    eprintln!("warning: skipping {} ({})", file.display(), e);
                    continue;
                }
            };

            if series.is_empty() {
                eprintln!("warning: skipping {} (no rows)", file.display());
                continue;
            }

            if let Err(e) = repo.replace_series(&series) {
                eprintln!("error: {e}");
                return ExitCode::from(&e);
            }
            eprintln!("  {}: {} bars", series.symbol(), series.len());
            loaded += 1;
        }

        if loaded == 0 {
            eprintln!("error: no files could be ingested");
            return ExitCode::from(4);
        }

        eprintln!("Ingested {loaded} symbols");
        ExitCode::SUCCESS
    }

    #[cfg(not(feature = "sqlite"))]
    {
        let _ = (adapter, files);
        eprintln!("error: sqlite feature is required for ingest");
        ExitCode::from(1)
    }
}

fn run_analyze(
    config_path: &PathBuf,
    symbol: &str,
    days: Option<&str>,
    analysis: Option<&str>,
) -> ExitCode {
    eprintln!("Loading config from {}", config_path.display());
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    let analysis_filter = match analysis.map(str::parse::<Analysis>).transpose() {
        Ok(f) => f,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::from(2);
        }
    };

    let plan = match build_analysis_plan(&adapter, days, analysis_filter) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::from(&e);
        }
    };

    #[cfg(feature = "sqlite")]
    {
        use crate::adapters::console_report::ConsoleReportAdapter;
        use crate::adapters::sqlite_repository::SqliteRepository;
        use crate::domain::report::{AnalysisReport, ReportSection};
        use crate::ports::bar_repository::BarRepository;
        use crate::ports::report_port::ReportPort;

        let repo = match SqliteRepository::from_config(&adapter) {
            Ok(r) => r,
            Err(e) => {
                eprintln!("error: {e}");
                return ExitCode::from(&e);
            }
        };

        let series = match repo.get_series(symbol) {
            Ok(s) => s,
            Err(e) => {
                eprintln!("error: {e}");
                return ExitCode::from(&e);
            }
        };

        // latest_date is always present: get_series never returns an empty series.
        let latest = series
            .latest_date()
            .map(|d| d.to_string())
            .unwrap_or_else(|| "-".into());
        eprintln!(
            "Analyzing {} ({} bars through {})",
            series.symbol(),
            series.len(),
            latest
        );

        let sections = plan
            .iter()
            .map(|(analysis, day_counts)| ReportSection::compute(*analysis, &series, day_counts))
            .collect();
        let report = AnalysisReport {
            symbol: series.symbol().to_string(),
            sections,
        };

        match ConsoleReportAdapter.write(&report) {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => {
                eprintln!("error: {e}");
                ExitCode::from(&e)
            }
        }
    }

    #[cfg(not(feature = "sqlite"))]
    {
        let _ = (plan, symbol);
        eprintln!("error: sqlite feature is required for analyze");
        ExitCode::from(1)
    }
}

fn run_list_symbols(config_path: &PathBuf) -> ExitCode {
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    #[cfg(feature = "sqlite")]
    {
        use crate::adapters::sqlite_repository::SqliteRepository;
        use crate::ports::bar_repository::BarRepository;

        let repo = match SqliteRepository::from_config(&adapter) {
            Ok(r) => r,
            Err(e) => {
                eprintln!("error: {e}");
                return ExitCode::from(&e);
            }
        };

        match repo.list_symbols() {
            Ok(symbols) => {
                for symbol in symbols {
                    println!("{symbol}");
                }
                ExitCode::SUCCESS
            }
            Err(e) => {
                eprintln!("error: {e}");
                ExitCode::from(&e)
            }
        }
    }

    #[cfg(not(feature = "sqlite"))]
    {
        let _ = adapter;
        eprintln!("error: sqlite feature is required for list-symbols");
        ExitCode::from(1)
    }
}

fn run_info(config_path: &PathBuf, symbol: Option<&str>) -> ExitCode {
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    #[cfg(feature = "sqlite")]
    {
        use crate::adapters::sqlite_repository::SqliteRepository;
        use crate::ports::bar_repository::BarRepository;

        let repo = match SqliteRepository::from_config(&adapter) {
            Ok(r) => r,
            Err(e) => {
                eprintln!("error: {e}");
                return ExitCode::from(&e);
            }
        };

        let symbols = match symbol {
            Some(s) => vec![s.to_string()],
            None => match repo.list_symbols() {
                Ok(symbols) => symbols,
                Err(e) => {
                    eprintln!("error: {e}");
                    return ExitCode::from(&e);
                }
            },
        };

        for symbol in &symbols {
            match repo.data_range(symbol) {
                Ok(Some((first, last, count))) => {
                    println!("{symbol}: {count} bars, {first} to {last}");
                }
                Ok(None) => {
                    println!("{symbol}: no data");
                }
                Err(e) => {
                    eprintln!("error: {e}");
                    return ExitCode::from(&e);
                }
            }
        }
        ExitCode::SUCCESS
    }

    #[cfg(not(feature = "sqlite"))]
    {
        let _ = (adapter, symbol);
        eprintln!("error: sqlite feature is required for info");
        ExitCode::from(1)
    }
}
