use anyhow::Result;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub service: ServiceConfig,
    pub analysis: AnalysisConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServiceConfig {
    pub name: String,
    pub environment: String,
    pub http: HttpConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HttpConfig {
    pub bind: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AnalysisConfig {
    /// Sliding window for the insight engine: analyze only the most
    /// recent N segments. 0 analyzes everything.
    pub window_size: usize,
}

impl Config {
    /// Load configuration with baked-in defaults, an optional config
    /// file, and CALLSIGHT_-prefixed environment overrides
    /// (e.g. CALLSIGHT_SERVICE__HTTP__PORT=9000).
    pub fn load(path: &str) -> Result<Self> {
        let settings = config::Config::builder()
            .set_default("service.name", "callsight")?
            .set_default("service.environment", "development")?
            .set_default("service.http.bind", "0.0.0.0")?
            .set_default("service.http.port", 8000)?
            .set_default("analysis.window_size", 0)?
            .add_source(config::File::with_name(path).required(false))
            .add_source(config::Environment::with_prefix("CALLSIGHT").separator("__"))
            .build()?;

        Ok(settings.try_deserialize()?)
    }
}
