use chrono::NaiveDate;
use price_forecast::synthetic::SyntheticSeries;
use price_forecast::{
    determine_differencing_order, ArimaModel, Evaluator, Forecaster, ModelOrder,
    StationarityAnalyzer,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("Price Forecast: Basic Forecasting Example");
    println!("=========================================\n");

    // Create sample data
    println!("Creating sample data...");
    let start = NaiveDate::from_ymd_opt(2024, 1, 1).ok_or("invalid start date")?;
    let series = SyntheticSeries::new(start, 100.0)
        .with_seed(42)
        .trend_with_noise(400, 0.1, 0.5)?;
    let closes = series.closes();
    println!(
        "Sample data created: {} daily closes from {} to {}\n",
        series.len(),
        series.first_date(),
        series.last_date()
    );

    // Stationarity
    let report = StationarityAnalyzer::default().analyze(&closes)?;
    println!(
        "ADF statistic {:.3}, p-value {} (lag {})",
        report.statistic, report.p_value, report.used_lag
    );
    let d = determine_differencing_order(&closes)?;
    println!("Differencing order: {}\n", d);

    // Evaluate
    let model = ArimaModel::new(ModelOrder::new(5, 5));
    let evaluation = Evaluator::new(model.clone()).evaluate_detailed(&closes, Some(d))?;
    println!("Holdout RMSE: {}", evaluation.metric);
    println!("{}", evaluation.accuracy);

    // Forecast
    let result = Forecaster::new(model).forecast(&closes, d)?;
    println!("Forecast ({}):", result.model);
    for point in result.points.iter().take(10) {
        println!("  {}  {:.2}", point.date, point.close);
    }
    println!("  ... {} days in total", result.len());

    Ok(())
}
