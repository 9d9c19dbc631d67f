use pretty_assertions::assert_eq;
use price_forecast::config::{PipelineConfig, SelectorConfig};
use price_forecast::models::{FitOptions, ModelOrder};
use price_forecast::ForecastError;
use rstest::rstest;
use std::io::Write;
use tempfile::NamedTempFile;

#[test]
fn test_defaults() {
    let config = PipelineConfig::default();
    assert_eq!(config.horizon, 30);
    assert_eq!(config.holdout, 30);
    assert_eq!(config.order, ModelOrder::new(30, 30));
    assert_eq!(config.fit, FitOptions::default());
    assert_eq!(config.selector.significance, 0.05);
    assert_eq!(config.selector.max_rounds, None);
    assert_eq!(config.selector.p_value_decimals, Some(3));
    assert_eq!(config.smoothing_window, None);
    assert!(!config.scale);
    assert!(config.validate().is_ok());
}

#[test]
fn test_empty_json_gives_defaults() {
    assert_eq!(PipelineConfig::from_json_str("{}").unwrap(), PipelineConfig::default());
}

#[test]
fn test_partial_json() {
    let config = PipelineConfig::from_json_str(
        r#"{ "smoothing_window": 7, "scale": true, "order": { "ar": 5 }, "selector": { "max_rounds": 2 } }"#,
    )
    .unwrap();

    assert_eq!(config.smoothing_window, Some(7));
    assert!(config.scale);
    assert_eq!(config.order, ModelOrder::new(5, 30));
    assert_eq!(
        config.selector,
        SelectorConfig {
            max_rounds: Some(2),
            ..SelectorConfig::default()
        }
    );
    assert_eq!(config.horizon, 30);
}

#[test]
fn test_drift_opt_in_from_json() {
    let config = PipelineConfig::from_json_str(r#"{ "fit": { "include_constant": true } }"#).unwrap();
    assert_eq!(config.fit.include_constant, Some(true));
    assert!(config.fit.constant_for(1));

    let config = PipelineConfig::from_json_str(r#"{ "fit": { "include_constant": null } }"#).unwrap();
    assert!(config.fit.constant_for(0));
    assert!(!config.fit.constant_for(1));
}

#[rstest]
#[case(r#"{ "horizon": 0 }"#)]
#[case(r#"{ "holdout": 0 }"#)]
#[case(r#"{ "smoothing_window": 0 }"#)]
#[case(r#"{ "selector": { "significance": 1.5 } }"#)]
#[case(r#"{ "selector": { "significance": 0.0 } }"#)]
#[case(r#"{ "fit": { "tolerance": 0.0 } }"#)]
fn test_invalid_values_rejected(#[case] json: &str) {
    assert!(matches!(
        PipelineConfig::from_json_str(json),
        Err(ForecastError::InvalidParameter(_))
    ));
}

#[test]
fn test_malformed_json() {
    assert!(matches!(
        PipelineConfig::from_json_str("{ horizon: 30 }"),
        Err(ForecastError::ConfigError(_))
    ));
    assert!(matches!(
        PipelineConfig::from_json_str(r#"{ "horizon": "thirty" }"#),
        Err(ForecastError::ConfigError(_))
    ));
}

#[test]
fn test_from_json_file() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, r#"{{ "horizon": 14, "holdout": 20 }}"#).unwrap();

    let config = PipelineConfig::from_json_file(file.path()).unwrap();
    assert_eq!(config.horizon, 14);
    assert_eq!(config.holdout, 20);

    assert!(matches!(
        PipelineConfig::from_json_file("/nonexistent/config.json"),
        Err(ForecastError::ConfigError(_))
    ));
}

#[test]
fn test_config_round_trips_through_json() {
    let config = PipelineConfig {
        smoothing_window: Some(7),
        scale: true,
        ..PipelineConfig::default()
    };
    let json = serde_json::to_string(&config).unwrap();
    assert_eq!(PipelineConfig::from_json_str(&json).unwrap(), config);
}
