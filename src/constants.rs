use std::time::Duration;

/// User agent string for HTTP requests
pub const USER_AGENT: &str = "weather-app/1.0";

/// National Weather Service API base URL
pub const NWS_API_BASE: &str = "https://api.weather.gov";

/// Media type requested from the NWS API
pub const GEO_JSON: &str = "application/geo+json";

/// Upper bound on a single upstream request
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

pub const SERVER_NAME: &str = "Weather";
pub const SERVER_INSTRUCTIONS: &str = "A simple weather MCP server";
