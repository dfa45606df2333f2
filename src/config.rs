use std::env;

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub server_host: String,
    pub server_port: u16,
    pub database_path: String,
    pub allowed_origins: Vec<String>,
    /// Base (non-bonus) number of candidate views allowed per calendar day.
    /// There is no built-in default; the allotment is a product decision.
    pub base_daily_views: u32,
    /// UTC offset, in whole hours, of the reference time zone used for the
    /// business-day boundary. All callers share this one boundary.
    pub day_boundary_utc_offset_hours: i32,
    pub environment: String,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, String> {
        // Load .env file if it exists (development)
        dotenvy::dotenv().ok();

        let server_host = env::var("SERVER_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let server_port = env::var("SERVER_PORT")
            .unwrap_or_else(|_| "8080".to_string())
            .parse()
            .map_err(|_| "Invalid SERVER_PORT")?;

        let database_path =
            env::var("DATABASE_PATH").unwrap_or_else(|_| "./data/peerprep.db".to_string());

        let allowed_origins = env::var("ALLOWED_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .collect();

        let base_daily_views = env::var("BASE_DAILY_VIEWS")
            .map_err(|_| "BASE_DAILY_VIEWS must be set (daily candidate-view allotment)")?
            .parse()
            .map_err(|_| "Invalid BASE_DAILY_VIEWS")?;

        let day_boundary_utc_offset_hours = env::var("DAY_BOUNDARY_UTC_OFFSET_HOURS")
            .unwrap_or_else(|_| "0".to_string())
            .parse()
            .map_err(|_| "Invalid DAY_BOUNDARY_UTC_OFFSET_HOURS")?;

        if !(-23..=23).contains(&day_boundary_utc_offset_hours) {
            return Err("DAY_BOUNDARY_UTC_OFFSET_HOURS must be between -23 and 23".to_string());
        }

        let environment = env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string());

        Ok(Config {
            server_host,
            server_port,
            database_path,
            allowed_origins,
            base_daily_views,
            day_boundary_utc_offset_hours,
            environment,
        })
    }

    /// Get server address as string
    pub fn server_address(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }
}
