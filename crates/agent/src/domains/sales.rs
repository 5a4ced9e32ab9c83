use anyhow::Result;

/// Opaque sales predictor. Model loading and inference live behind this seam;
/// the shipped implementation is whatever the deployment provides.
pub trait Forecaster: Send + Sync {
    fn predict(&self, year: i32, month: u32) -> Result<f64>;
}

/// Routes sales requests to the forecaster when one is available.
pub struct SalesAgent {
    forecaster: Option<Box<dyn Forecaster>>,
}

impl SalesAgent {
    pub fn new(forecaster: Option<Box<dyn Forecaster>>) -> Self {
        Self { forecaster }
    }

    pub fn handle_request(&self, request: &str) -> String {
        if request.to_lowercase().contains("forecast") {
            self.generate_forecast()
        } else {
            "Sales Agent received the request but needs more details.".to_string()
        }
    }

    fn generate_forecast(&self) -> String {
        let Some(forecaster) = &self.forecaster else {
            return "Sales forecasting model not available.".to_string();
        };

        match forecaster.predict(2024, 7) {
            Ok(forecast) => format!("Sales forecast for next month: {forecast}"),
            Err(error) => {
                tracing::error!(error = %error, "sales forecaster failed");
                "Sales forecasting model not available.".to_string()
            }
        }
    }
}
