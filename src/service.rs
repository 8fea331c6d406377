use anyhow::Result;
use rmcp::{
    handler::server::{tool::ToolRouter, wrapper::Parameters, ServerHandler},
    model::{
        CallToolResult, Content, Implementation, ProtocolVersion, ServerCapabilities, ServerInfo,
    },
    tool, tool_handler, tool_router, ErrorData as McpError,
};
use serde::de::DeserializeOwned;
use std::sync::Arc;

use crate::client::{NwsClient, Upstream};
use crate::config::Config;
use crate::constants::{SERVER_INSTRUCTIONS, SERVER_NAME};
use crate::error::FetchError;
use crate::formatters::{format_alerts_report, format_forecast_report};
use crate::models::{
    AlertResponse, ForecastResponse, GetAlertsRequest, GetForecastRequest, PointsResponse,
};

/// Weather service exposing the alert and forecast tools over MCP
#[derive(Clone)]
pub struct Weather {
    upstream: Arc<dyn Upstream>,
    api_base: String,
    tool_router: ToolRouter<Self>,
}

impl Weather {
    /// Creates a service backed by the live NWS API
    pub fn new(config: &Config) -> Result<Self> {
        let client = NwsClient::new(config)?;
        Ok(Self::with_upstream(Arc::new(client), &config.api_base))
    }

    pub fn with_upstream(upstream: Arc<dyn Upstream>, api_base: &str) -> Self {
        Self {
            upstream,
            api_base: api_base.trim_end_matches('/').to_string(),
            tool_router: Self::tool_router(),
        }
    }

    /// Fetches `url` and decodes it into `T`, logging any failure
    async fn fetch<T: DeserializeOwned>(&self, url: &str) -> Result<T, FetchError> {
        let outcome = match self.upstream.get_json(url).await {
            Ok(value) => serde_json::from_value::<T>(value).map_err(FetchError::from),
            Err(err) => Err(err),
        };
        if let Err(err) = &outcome {
            tracing::error!(%url, error = %err, "Error making NWS request");
        }
        outcome
    }

    fn alerts_url(&self, request: &GetAlertsRequest) -> String {
        format!("{}/alerts?area={}", self.api_base, request.state)
    }

    fn points_url(&self, request: &GetForecastRequest) -> String {
        format!(
            "{}/points/{:.4},{:.4}",
            self.api_base,
            request.latitude.value(),
            request.longitude.value()
        )
    }
}

fn text_result(text: impl Into<String>) -> CallToolResult {
    CallToolResult::success(vec![Content::text(text.into())])
}

fn failure_result(text: impl Into<String>) -> CallToolResult {
    CallToolResult::error(vec![Content::text(text.into())])
}

#[tool_handler]
impl ServerHandler for Weather {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2024_11_05,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: SERVER_NAME.to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                icons: None,
                title: None,
                website_url: None,
            },
            instructions: Some(SERVER_INSTRUCTIONS.to_string()),
        }
    }
}

#[tool_router]
impl Weather {
    /// Gets active weather alerts for a US state
    #[tool(name = "getAlerts", description = "Get weather alerts for a state")]
    async fn get_alerts(
        &self,
        Parameters(request): Parameters<GetAlertsRequest>,
    ) -> Result<CallToolResult, McpError> {
        tracing::info!("Getting alerts for state: {}", request.state);

        let url = self.alerts_url(&request);
        let alerts = match self.fetch::<AlertResponse>(&url).await {
            Ok(alerts) => alerts,
            Err(_) => return Ok(failure_result("Failed to retrieve alerts data")),
        };

        if alerts.features.is_empty() {
            return Ok(text_result(format!("No active alerts for {}", request.state)));
        }

        Ok(text_result(format_alerts_report(
            request.state.as_str(),
            &alerts.features,
        )))
    }

    /// Gets the forecast for a coordinate via the NWS grid-point lookup
    #[tool(name = "getForecast", description = "Get the weather forecast for a location")]
    async fn get_forecast(
        &self,
        Parameters(request): Parameters<GetForecastRequest>,
    ) -> Result<CallToolResult, McpError> {
        let (latitude, longitude) = (request.latitude, request.longitude);
        tracing::info!("Getting forecast for coordinates: {}, {}", latitude, longitude);

        let points_url = self.points_url(&request);
        let points = match self.fetch::<PointsResponse>(&points_url).await {
            Ok(points) => points,
            Err(_) => {
                return Ok(failure_result(format!(
                    "Failed to retrieve grid point data for coordinates: {latitude}, {longitude}"
                )))
            }
        };

        let Some(forecast_url) = points.properties.forecast.filter(|url| !url.is_empty()) else {
            tracing::warn!(%points_url, "Grid point response has no forecast URL");
            return Ok(failure_result(format!(
                "Failed to retrieve forecast data for coordinates: {latitude}, {longitude}"
            )));
        };

        let forecast = match self.fetch::<ForecastResponse>(&forecast_url).await {
            Ok(forecast) => forecast,
            Err(_) => {
                return Ok(failure_result(format!(
                    "Failed to retrieve forecast data for coordinates: {latitude}, {longitude}"
                )))
            }
        };

        let periods = forecast.properties.periods;
        if periods.is_empty() {
            return Ok(failure_result(format!(
                "No forecast data available for coordinates: {latitude}, {longitude}"
            )));
        }

        Ok(text_result(format_forecast_report(
            latitude.value(),
            longitude.value(),
            &periods,
        )))
    }
}
