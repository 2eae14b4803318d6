//! Quickstart demonstrating lag features and recursive moving-average forecasts.
//!
//! Run with: cargo run --example quickstart
//! Set RUST_LOG=local_forecast=debug to see fit/predict events.

use local_forecast::config::ForecastConfig;
use local_forecast::prelude::*;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "local_forecast=info".into()),
        )
        .init();

    println!("=== local-forecast Quickstart ===\n");

    // 1. Long-format table with three daily series of different length
    let columns = ColumnNames::default();
    let mut observations = Vec::new();
    for t in 0..56_i64 {
        observations.push(Observation::new("D1", t, 100.0 + 10.0 * (t % 7) as f64));
        observations.push(Observation::new("D2", t, 50.0 + 0.5 * t as f64));
    }
    observations.push(Observation::new("D3", 0, 5.0));
    observations.push(Observation::new("D3", 1, 6.0));
    let table = ObservationTable::from_observations(observations, &columns);
    println!("Loaded {} observations", table.num_rows());

    // 2. Lag and log-return features
    let generator = FeatureGenerator::with_columns(columns.clone());
    let features = generator.log_change(&generator.lags(&table, &[1, 7])?)?;
    let lag_7 = features.floats("lag_7")?;
    let log_change = features.floats("log_change")?;
    println!("\n--- Features for D1 (first 9 rows) ---");
    println!("{:>4} {:>10} {:>12}", "t", "lag_7", "log_change");
    for t in 0..9 {
        println!(
            "{:>4} {:>10} {:>12}",
            t,
            fmt_cell(lag_7[t]),
            fmt_cell(log_change[t])
        );
    }

    // 3. Fit and forecast two weeks ahead
    let config = ForecastConfig {
        horizon: 14,
        ..Default::default()
    };
    let mut model = config.build_model()?;
    model.fit(&table)?;
    let batch = model.predict(config.horizon)?;

    println!("\n--- {} forecast, lags {:?} ---", model.name(), model.lags().as_slice());
    for id in ["D1", "D2"] {
        let path = batch.series_values(id);
        println!("{}: {:?}", id, &path[..7]);
    }
    for failure in batch.failures() {
        println!("{} skipped: {}", failure.series_id, failure.error);
    }

    // 4. Persist the fitted state
    let json = model
        .state()
        .ok_or(ForecastError::FitRequired)?
        .snapshot()
        .to_json()?;
    println!("\nSnapshot size: {} bytes", json.len());

    Ok(())
}

fn fmt_cell(cell: Option<f64>) -> String {
    cell.map(|v| format!("{:.3}", v))
        .unwrap_or_else(|| "-".to_string())
}
