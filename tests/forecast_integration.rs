//! End-to-end tests: feature generation, fitting and batch forecasting on
//! long-format tables.

use approx::assert_relative_eq;
use chrono::{Duration, TimeZone, Utc};
use local_forecast::config::{ColumnNames, ForecastConfig};
use local_forecast::core::{Column, Observation, ObservationTable, TimeIndex};
use local_forecast::features::{generate_lags, generate_log_change, FeatureGenerator};
use local_forecast::models::{BoxedLocalModel, LagMovingAverage, LastValue, LocalForecastModel};
use local_forecast::state::{SeriesStateStore, StoreSnapshot};
use local_forecast::ForecastError;

fn single_series(values: &[f64]) -> ObservationTable {
    ObservationTable::from_observations(
        values
            .iter()
            .enumerate()
            .map(|(t, &v)| Observation::new("D1", t as i64, v)),
        &ColumnNames::default(),
    )
}

/// Three daily series of different length, rows interleaved.
fn daily_panel() -> ObservationTable {
    let base = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    let mut obs = Vec::new();
    for day in (0..60).rev() {
        let ts = base + Duration::days(day);
        obs.push(Observation::new("H1", ts, 100.0 + (day % 7) as f64));
        if day < 10 {
            obs.push(Observation::new("H2", ts, 50.0 + day as f64));
        }
        if day < 3 {
            obs.push(Observation::new("H3", ts, 1.0));
        }
    }
    ObservationTable::from_observations(obs, &ColumnNames::default())
}

#[test]
fn lag_features_for_reference_series() {
    let table = single_series(&[10.0, 20.0, 30.0, 40.0]);
    let out = generate_lags(&table, "M4id", "time_idx", "value", &[1, 2]).unwrap();

    assert_eq!(
        out.floats("lag_1").unwrap(),
        &[None, Some(10.0), Some(20.0), Some(30.0)]
    );
    assert_eq!(
        out.floats("lag_2").unwrap(),
        &[None, None, Some(10.0), Some(20.0)]
    );
}

#[test]
fn log_change_for_reference_series() {
    let table = single_series(&[10.0, 20.0, 40.0]);
    let out = generate_log_change(&table, "M4id", "time_idx", "value").unwrap();
    let col = out.floats("log_change").unwrap();

    assert!(col[0].is_none());
    assert_relative_eq!(col[1].unwrap(), 2.0_f64.ln(), epsilon = 1e-12);
    assert_relative_eq!(col[2].unwrap(), 2.0_f64.ln(), epsilon = 1e-12);
}

#[test]
fn rolling_buffer_keeps_last_three_of_five() {
    let table = single_series(&[1.0, 2.0, 3.0, 4.0, 5.0]);
    let store = SeriesStateStore::build(&table, "M4id", "time_idx", "value", 3).unwrap();
    assert_eq!(store.get("D1").unwrap().to_vec(), vec![3.0, 4.0, 5.0]);
}

#[test]
fn reference_recursive_forecast() {
    let mut model = LagMovingAverage::new(&[1, 2]).unwrap();
    model.fit(&single_series(&[10.0, 20.0])).unwrap();

    let batch = model.predict(2).unwrap();
    let pairs: Vec<_> = batch
        .records()
        .iter()
        .map(|r| (r.series_id.as_str(), r.horizon, r.y_hat))
        .collect();
    assert_eq!(pairs, vec![("D1", 1, 15.0), ("D1", 2, 17.5)]);
}

#[test]
fn short_series_fails_alone() {
    let mut model = LagMovingAverage::new(&[7, 14]).unwrap();
    model.fit(&daily_panel()).unwrap();

    let batch = model.predict(5).unwrap();
    assert_eq!(batch.series_values("H1").len(), 5);
    assert_eq!(batch.series_values("H2").len(), 5);
    assert!(batch.series_values("H3").is_empty());

    assert_eq!(batch.failures().len(), 1);
    assert_eq!(batch.failures()[0].series_id, "H3");
    assert_eq!(
        batch.failures()[0].error,
        ForecastError::InsufficientHistory {
            series_id: "H3".to_string(),
            step: 1,
            available: 3,
            min_lag: 7,
        }
    );
}

#[test]
fn timestamps_order_the_history() {
    let mut model = LagMovingAverage::new(&[1]).unwrap();
    model.fit(&daily_panel()).unwrap();

    // Newest H2 observation is day 9 -> 59.0, even though rows arrive newest first.
    assert_eq!(model.forecast_series("H2", 2).unwrap(), vec![59.0, 59.0]);
}

#[test]
fn weekly_lags_reproduce_weekly_pattern() {
    let mut model = LagMovingAverage::new(&[7, 14, 21, 28]).unwrap();
    model.fit(&daily_panel()).unwrap();

    // H1 repeats every 7 days, so averaging weekly lags continues the cycle.
    let path = model.forecast_series("H1", 14).unwrap();
    for (h, y) in path.iter().enumerate() {
        let day = 60 + h as i64;
        assert_relative_eq!(*y, 100.0 + (day % 7) as f64, epsilon = 1e-9);
    }
}

#[test]
fn predictions_are_repeatable() {
    let mut model = LagMovingAverage::default();
    model.fit(&daily_panel()).unwrap();
    assert_eq!(model.predict(28).unwrap(), model.predict(28).unwrap());
}

#[test]
fn batch_equals_series_by_series_forecasts() {
    let mut model = LagMovingAverage::new(&[1, 2, 3]).unwrap();
    model.fit(&daily_panel()).unwrap();

    let batch = model.predict(10).unwrap();
    for id in ["H1", "H2", "H3"] {
        assert_eq!(
            batch.series_values(id),
            model.forecast_series(id, 10).unwrap()
        );
    }
}

#[test]
fn forecast_table_has_output_schema() {
    let mut model = LagMovingAverage::new(&[1, 2]).unwrap();
    model.fit(&daily_panel()).unwrap();

    let table = model.predict(3).unwrap().to_table("M4id").unwrap();
    assert_eq!(table.num_rows(), 9);
    assert_eq!(
        table.column_names().collect::<Vec<_>>(),
        vec!["M4id", "horizon", "y_hat"]
    );
    assert_eq!(&table.integers("horizon").unwrap()[..3], &[1, 2, 3]);
}

#[test]
fn configured_pipeline_with_custom_columns() {
    let config = ForecastConfig::from_json(
        r#"{
            "lags": [1, 2],
            "horizon": 2,
            "columns": {"id": "unique_id", "time": "ds", "value": "y"}
        }"#,
    )
    .unwrap();

    let table = ObservationTable::new()
        .with_column("unique_id", Column::text(["a", "a", "b"]))
        .unwrap()
        .with_column("ds", Column::steps([1, 0, 0]))
        .unwrap()
        .with_column("y", Column::floats([20.0, 10.0, 3.0]))
        .unwrap();

    let features = FeatureGenerator::with_columns(config.columns.clone())
        .lags(&table, &config.lags)
        .unwrap();
    assert_eq!(
        features.floats("lag_1").unwrap(),
        &[None, Some(10.0), None]
    );

    let mut model = config.build_model().unwrap();
    model.fit(&table).unwrap();
    let batch = model.predict(config.horizon).unwrap();
    assert_eq!(batch.series_values("a"), vec![15.0, 17.5]);
    assert_eq!(batch.series_values("b"), vec![3.0, 3.0]);
}

#[test]
fn persisted_state_forecasts_like_the_original() {
    let mut model = LagMovingAverage::default();
    model.fit(&daily_panel()).unwrap();
    let json = model.state().unwrap().snapshot().to_json().unwrap();

    let mut restored = LagMovingAverage::default();
    restored
        .load_snapshot(StoreSnapshot::from_json(&json).unwrap())
        .unwrap();
    assert_eq!(restored.predict(14).unwrap(), model.predict(14).unwrap());
}

#[test]
fn model_variants_share_the_interface() {
    let table = daily_panel();
    let mut models: Vec<BoxedLocalModel> = vec![
        Box::new(LagMovingAverage::new(&[1]).unwrap()),
        Box::new(LastValue::new()),
    ];
    let mut paths = Vec::new();
    for model in models.iter_mut() {
        model.fit(&table).unwrap();
        paths.push(model.predict(4).unwrap().series_values("H1"));
    }
    // With a single lag of 1 the moving average degenerates to last value.
    assert_eq!(paths[0], paths[1]);
}

#[test]
fn feature_tables_keep_time_keys() {
    let out = generate_lags(&daily_panel(), "M4id", "time_idx", "value", &[1]).unwrap();
    let times = out.times("time_idx").unwrap();
    let ids = out.text("M4id").unwrap();
    for i in 1..out.num_rows() {
        if ids[i] == ids[i - 1] {
            assert!(times[i] > times[i - 1]);
        }
    }
    assert!(matches!(times[0], TimeIndex::Timestamp(_)));
}

#[test]
fn integer_time_column_fits_and_forecasts() {
    let table = ObservationTable::new()
        .with_column("M4id", Column::text(["a", "a", "b"]))
        .unwrap()
        .with_column("time_idx", Column::Integer(vec![1, 0, 0]))
        .unwrap()
        .with_column("value", Column::floats([20.0, 10.0, 3.0]))
        .unwrap();

    let mut model = LagMovingAverage::new(&[1, 2]).unwrap();
    model.fit(&table).unwrap();
    let batch = model.predict(2).unwrap();
    assert_eq!(batch.series_values("a"), vec![15.0, 17.5]);
    assert_eq!(batch.series_values("b"), vec![3.0, 3.0]);

    let out = generate_log_change(&table, "M4id", "time_idx", "value").unwrap();
    assert_relative_eq!(
        out.floats("log_change").unwrap()[1].unwrap(),
        2.0_f64.ln(),
        epsilon = 1e-12
    );
}

#[test]
fn one_incomplete_series_does_not_block_the_panel() {
    let table = ObservationTable::new()
        .with_column("M4id", Column::text(["good", "good", "bad", "bad"]))
        .unwrap()
        .with_column("time_idx", Column::steps([0, 1, 0, 1]))
        .unwrap()
        .with_column(
            "value",
            Column::Float(vec![Some(1.0), Some(2.0), Some(3.0), None]),
        )
        .unwrap();

    let mut model = LagMovingAverage::new(&[1]).unwrap();
    model.fit(&table).unwrap();
    let batch = model.predict(2).unwrap();
    assert_eq!(batch.series_values("good"), vec![2.0, 2.0]);
    assert_eq!(
        batch.failure_for("bad"),
        Some(&ForecastError::MissingValues("bad".to_string()))
    );
}
