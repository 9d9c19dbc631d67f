//! # price-forecast
//!
//! Command-line interface for the price_forecast library.

use clap::{Args, Parser, Subcommand};
use price_forecast::data::{DataLoader, PriceSeries};
use price_forecast::error::Result;
use price_forecast::scaling::{scale, unscale};
use price_forecast::{
    ArimaModel, DifferencingOrderSelector, Evaluator, ForecastPipeline, Forecaster,
    HoldoutEvaluation, PipelineConfig, PipelineReport, StandardScaler,
};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "price-forecast")]
#[command(version, about = "ARIMA forecasting of daily close prices", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// How the close series is prepared before anything is estimated
#[derive(Args, Debug, Clone, Default)]
struct SeriesArgs {
    /// Rolling-mean window applied before modelling
    #[arg(long)]
    smoothing: Option<usize>,

    /// Standardize the series before fitting
    #[arg(long)]
    scale: bool,
}

impl SeriesArgs {
    fn apply(&self, config: &mut PipelineConfig) {
        if self.smoothing.is_some() {
            config.smoothing_window = self.smoothing;
        }
        if self.scale {
            config.scale = true;
        }
    }
}

#[derive(Args, Debug, Clone, Default)]
struct OrderArgs {
    /// AR order (p)
    #[arg(long)]
    ar: Option<usize>,

    /// MA order (q)
    #[arg(long)]
    ma: Option<usize>,
}

impl OrderArgs {
    fn apply(&self, config: &mut PipelineConfig) {
        if let Some(ar) = self.ar {
            config.order.ar = ar;
        }
        if let Some(ma) = self.ma {
            config.order.ma = ma;
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Print the differencing order and its p-value
    Order {
        /// CSV file with a date and a close column
        #[arg(short, long)]
        input: PathBuf,

        #[command(flatten)]
        series: SeriesArgs,
    },

    /// Print the RMSE on the last 30 observations
    Evaluate {
        /// CSV file with a date and a close column
        #[arg(short, long)]
        input: PathBuf,

        /// Differencing order; selected automatically when omitted
        #[arg(short, long)]
        order: Option<usize>,

        #[command(flatten)]
        series: SeriesArgs,

        #[command(flatten)]
        arma: OrderArgs,
    },

    /// Print a dated 30-day forecast starting today
    Forecast {
        /// CSV file with a date and a close column
        #[arg(short, long)]
        input: PathBuf,

        /// Differencing order; selected automatically when omitted
        #[arg(short, long)]
        order: Option<usize>,

        #[command(flatten)]
        series: SeriesArgs,

        #[command(flatten)]
        arma: OrderArgs,
    },

    /// Run the full pipeline
    Run {
        /// CSV file with a date and a close column
        #[arg(short, long)]
        input: PathBuf,

        /// JSON pipeline configuration
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,

        /// Give up after this many seconds
        #[arg(long)]
        timeout_secs: Option<u64>,

        #[command(flatten)]
        series: SeriesArgs,

        #[command(flatten)]
        arma: OrderArgs,
    },
}

/// Series prepared for modelling, with the scaler needed to map results back
struct Prepared {
    values: Vec<f64>,
    scaler: Option<StandardScaler>,
}

impl Prepared {
    fn new(series: &PriceSeries, config: &PipelineConfig) -> Result<Self> {
        let history = match config.smoothing_window {
            Some(window) => series.smoothed(window)?,
            None => series.clone(),
        };
        if config.scale {
            let (scaled, scaler) = scale(&history)?;
            Ok(Self {
                values: scaled.values().to_vec(),
                scaler: Some(scaler),
            })
        } else {
            Ok(Self {
                values: history.closes(),
                scaler: None,
            })
        }
    }

    fn to_prices(&self, values: &[f64]) -> Vec<f64> {
        match &self.scaler {
            Some(scaler) => unscale(scaler, values),
            None => values.to_vec(),
        }
    }
}

fn load_config(
    path: Option<&Path>,
    series: &SeriesArgs,
    arma: Option<&OrderArgs>,
) -> Result<PipelineConfig> {
    let mut config = match path {
        Some(path) => PipelineConfig::from_json_file(path)?,
        None => PipelineConfig::default(),
    };

    series.apply(&mut config);
    if let Some(arma) = arma {
        arma.apply(&mut config);
    }

    config.validate()?;
    Ok(config)
}

fn model_for(config: &PipelineConfig) -> ArimaModel {
    ArimaModel::with_options(config.order, config.fit.clone())
}

fn select_order(config: &PipelineConfig, values: &[f64], order: Option<usize>) -> Result<usize> {
    match order {
        Some(d) => Ok(d),
        None => Ok(DifferencingOrderSelector::new(&config.selector).select(values)?.d),
    }
}

fn print_report(report: &PipelineReport) {
    println!("Observations:       {}", report.history.len());
    println!("Differencing order: {} (p-value {})", report.d, report.p_value);
    println!("Holdout RMSE:       {}", report.evaluation.metric);
    println!("Holdout errors:     {}", report.evaluation.accuracy);
    println!("Forecast ({}):", report.forecast.model);
    for point in &report.forecast.points {
        println!("  {}  {:.2}", point.date, point.close);
    }
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Order { input, series: series_args } => {
            let config = load_config(None, &series_args, None)?;
            let series = DataLoader::from_csv(&input)?;
            let prepared = Prepared::new(&series, &config)?;
            let order = DifferencingOrderSelector::new(&config.selector).select(&prepared.values)?;
            println!("d = {} (p-value {})", order.d, order.p_value);
        }
        Commands::Evaluate {
            input,
            order,
            series: series_args,
            arma,
        } => {
            let config = load_config(None, &series_args, Some(&arma))?;
            let series = DataLoader::from_csv(&input)?;
            let prepared = Prepared::new(&series, &config)?;
            let d = select_order(&config, &prepared.values, order)?;

            let evaluation = Evaluator::new(model_for(&config))
                .with_holdout(config.holdout)?
                .evaluate_detailed(&prepared.values, Some(d))?;
            let evaluation = HoldoutEvaluation::score(
                d,
                prepared.to_prices(&evaluation.predictions),
                prepared.to_prices(&evaluation.actuals),
            )?;
            println!("RMSE = {} (d = {})", evaluation.metric, d);
        }
        Commands::Forecast {
            input,
            order,
            series: series_args,
            arma,
        } => {
            let config = load_config(None, &series_args, Some(&arma))?;
            let series = DataLoader::from_csv(&input)?;
            let prepared = Prepared::new(&series, &config)?;
            let d = select_order(&config, &prepared.values, order)?;

            let result = Forecaster::new(model_for(&config))
                .with_horizon(config.horizon)?
                .forecast(&prepared.values, d)?;
            let closes = prepared.to_prices(&result.values());
            println!("Forecast ({}):", result.model);
            for (date, close) in result.dates().into_iter().zip(closes) {
                println!("  {}  {:.2}", date, close);
            }
        }
        Commands::Run {
            input,
            config,
            json,
            timeout_secs,
            series: series_args,
            arma,
        } => {
            let config = load_config(config.as_deref(), &series_args, Some(&arma))?;
            let series = DataLoader::from_csv(&input)?;
            let pipeline = ForecastPipeline::new(config)?;

            let report = match timeout_secs {
                Some(secs) => pipeline.run_with_deadline(series, Duration::from_secs(secs))?,
                None => pipeline.run(&series)?,
            };

            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print_report(&report);
            }
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "price_forecast=warn".into()),
        )
        .init();

    let cli = Cli::parse();
    tracing::debug!("{} v{}", price_forecast::NAME, price_forecast::VERSION);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_order_takes_only_series_options() {
        let cli = Cli::try_parse_from([
            "price-forecast", "order", "--input", "prices.csv", "--smoothing", "7", "--scale",
        ])
        .unwrap();
        match cli.command {
            Commands::Order { series, .. } => {
                assert_eq!(series.smoothing, Some(7));
                assert!(series.scale);
            }
            _ => panic!("expected the order subcommand"),
        }

        for flag in ["--ar", "--ma"] {
            let parsed =
                Cli::try_parse_from(["price-forecast", "order", "--input", "prices.csv", flag, "5"]);
            assert!(parsed.is_err(), "order accepted {}", flag);
        }
    }

    #[test]
    fn test_model_orders_override_config() {
        let cli = Cli::try_parse_from([
            "price-forecast", "evaluate", "--input", "prices.csv", "--ar", "5", "--ma", "2",
        ])
        .unwrap();
        let Commands::Evaluate { series, arma, .. } = cli.command else {
            panic!("expected the evaluate subcommand");
        };

        let config = load_config(None, &series, Some(&arma)).unwrap();
        assert_eq!(config.order.ar, 5);
        assert_eq!(config.order.ma, 2);
        assert_eq!(config.smoothing_window, None);
    }
}
