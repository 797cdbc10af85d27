/// Runtime configuration, read once at startup.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Base URL of the tender backend API (no trailing slash).
    pub api_base_url: String,
    /// Public origin of this site, used for absolute links.
    pub host: String,
    /// Address the HTTP server binds to.
    pub bind_addr: String,
    pub app_name: String,
}

fn env_or(name: &str, default: &str) -> String {
    match std::env::var(name) {
        Ok(val) if !val.trim().is_empty() => val,
        _ => {
            log::warn!("No {name} set — using default '{default}'");
            default.to_string()
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self {
            api_base_url: env_or("API_BASE_URL", "http://127.0.0.1:3333")
                .trim_end_matches('/')
                .to_string(),
            host: env_or("HOST", "http://localhost:8080")
                .trim_end_matches('/')
                .to_string(),
            bind_addr: env_or("BIND_ADDR", "127.0.0.1:8080"),
            app_name: env_or("APP_NAME", "RFQ Portal"),
        }
    }
}
