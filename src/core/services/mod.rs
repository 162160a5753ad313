pub mod forecast_service;

pub use forecast_service::{resolve_opening_balance, Collaborators, ForecastRun, ForecastService};
