use approx::assert_relative_eq;
use chrono::NaiveDate;
use price_forecast::utils::{forecast_accuracy, forecast_dates, holdout_split, round_to};
use price_forecast::ForecastError;
use rstest::rstest;

#[test]
fn test_forecast_accuracy() {
    let forecast = vec![10.0, 12.0, 14.0, 16.0];
    let actual = vec![11.0, 12.0, 13.0, 18.0];
    let accuracy = forecast_accuracy(&forecast, &actual).unwrap();

    assert_relative_eq!(accuracy.rmse, 1.5f64.sqrt());
    assert_relative_eq!(accuracy.mse(), 1.5, epsilon = 1e-12);
    assert_relative_eq!(accuracy.mae, 1.0);
    // (1/11 + 0 + 1/13 + 2/18) / 4
    let mape = 100.0 * (1.0 / 11.0 + 1.0 / 13.0 + 2.0 / 18.0) / 4.0;
    assert_relative_eq!(accuracy.mape.unwrap(), mape, epsilon = 1e-12);
    assert!(accuracy.smape > 0.0 && accuracy.smape < 200.0);

    let perfect = forecast_accuracy(&actual, &actual).unwrap();
    assert_eq!(perfect.rmse, 0.0);
    assert_eq!(perfect.smape, 0.0);
}

#[test]
fn test_mape_skips_zero_actuals() {
    let accuracy = forecast_accuracy(&[1.0, 9.0], &[0.0, 10.0]).unwrap();
    assert_relative_eq!(accuracy.mape.unwrap(), 10.0, epsilon = 1e-12);

    let all_zero = forecast_accuracy(&[1.0, 2.0], &[0.0, 0.0]).unwrap();
    assert_eq!(all_zero.mape, None);
    assert_relative_eq!(all_zero.smape, 200.0);
    assert_eq!(all_zero.to_string(), "RMSE 1.5811, MAE 1.5000, MAPE n/a, SMAPE 200.00%");
}

#[test]
fn test_forecast_accuracy_length_mismatch() {
    assert!(matches!(
        forecast_accuracy(&[1.0], &[1.0, 2.0]),
        Err(ForecastError::DataError(_))
    ));
    assert!(forecast_accuracy(&[], &[]).is_err());
}

#[rstest]
#[case(1)]
#[case(7)]
#[case(30)]
fn test_forecast_dates_are_contiguous(#[case] horizon: usize) {
    let start = NaiveDate::from_ymd_opt(2024, 12, 25).unwrap();
    let dates = forecast_dates(start, horizon);

    assert_eq!(dates.len(), horizon);
    assert_eq!(dates[0], start);
    for pair in dates.windows(2) {
        assert_eq!((pair[1] - pair[0]).num_days(), 1);
    }
}

#[test]
fn test_holdout_split() {
    let data: Vec<f64> = (0..31).map(|v| v as f64).collect();
    let (train, test) = holdout_split(&data, 30).unwrap();
    assert_eq!(train, &[0.0]);
    assert_eq!(test.len(), 30);

    assert!(matches!(
        holdout_split(&data[..30], 30),
        Err(ForecastError::InsufficientData(_))
    ));
    assert!(matches!(
        holdout_split(&data, 0),
        Err(ForecastError::InvalidParameter(_))
    ));
}

#[rstest]
#[case(0.04949, 3, 0.049)]
#[case(2.3456, 2, 2.35)]
#[case(7.0, 2, 7.0)]
fn test_round_to(#[case] value: f64, #[case] decimals: u32, #[case] expected: f64) {
    assert_eq!(round_to(value, decimals), expected);
}
