// Runs the full forecasting pipeline on a synthetic trending series
use chrono::NaiveDate;
use price_forecast_workspace::price_forecast::synthetic::SyntheticSeries;
use price_forecast_workspace::price_forecast::{ForecastPipeline, ModelOrder, PipelineConfig};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("Exploring the price forecasting pipeline\n");

    let start = NaiveDate::from_ymd_opt(2025, 1, 1).ok_or("invalid start date")?;
    let series = SyntheticSeries::new(start, 100.0)
        .with_seed(7)
        .trend_with_noise(365, 0.1, 0.8)?;

    let config = PipelineConfig {
        order: ModelOrder::new(10, 10),
        smoothing_window: Some(7),
        scale: true,
        ..PipelineConfig::default()
    };
    let report = ForecastPipeline::new(config)?.run(&series)?;

    println!("=== Differencing ===");
    println!("d = {} (p-value {})", report.d, report.p_value);

    println!("\n=== Holdout ===");
    println!("RMSE: {}", report.evaluation.metric);
    println!("{}", report.evaluation.accuracy);

    println!("\n=== Forecast ({}) ===", report.forecast.model);
    for point in &report.forecast.points {
        println!("{}  {:.2}", point.date, point.close);
    }

    println!("\nDone");
    Ok(())
}
