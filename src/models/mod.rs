//! Local forecasting models.

mod last_value;
mod moving_average;
mod traits;

pub use last_value::LastValue;
pub use moving_average::{recursive_forecast, LagMovingAverage, LagMovingAverageBuilder};
pub use traits::{BoxedLocalModel, LocalForecastModel};
