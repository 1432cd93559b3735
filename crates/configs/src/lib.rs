use anyhow::Result;
use serde::Deserialize;
use anyhow::anyhow;

#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub auth: AuthConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    #[serde(default)]
    pub worker_threads: Option<usize>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { host: "127.0.0.1".into(), port: 8080, worker_threads: Some(4) }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default)]
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
    #[serde(default = "default_idle_timeout")]
    pub idle_timeout_secs: u64,
    #[serde(default = "default_max_lifetime")]
    pub max_lifetime_secs: u64,
    #[serde(default = "default_acquire_timeout")]
    pub acquire_timeout_secs: u64,
    #[serde(default)]
    pub sqlx_logging: bool,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            max_connections: default_max_connections(),
            min_connections: default_min_connections(),
            connect_timeout_secs: default_connect_timeout(),
            idle_timeout_secs: default_idle_timeout(),
            max_lifetime_secs: default_max_lifetime(),
            acquire_timeout_secs: default_acquire_timeout(),
            sqlx_logging: false,
        }
    }
}

/// Token signing and the bootstrap admin account.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    #[serde(default)]
    pub jwt_secret: String,
    #[serde(default = "default_token_ttl")]
    pub token_ttl_hours: i64,
    #[serde(default)]
    pub admin_login_id: Option<String>,
    #[serde(default)]
    pub admin_password: Option<String>,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self { jwt_secret: String::new(), token_ttl_hours: default_token_ttl(), admin_login_id: None, admin_password: None }
    }
}

fn default_max_connections() -> u32 { 10 }
fn default_min_connections() -> u32 { 2 }
fn default_connect_timeout() -> u64 { 30 }
fn default_idle_timeout() -> u64 { 600 }
fn default_max_lifetime() -> u64 { 3600 }
fn default_acquire_timeout() -> u64 { 30 }
fn default_token_ttl() -> i64 { 12 }

fn config_path() -> String {
    std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string())
}

pub fn load_default() -> Result<AppConfig> {
    load_from_file(&config_path())
}

/// Like `load_from_file`, but a missing file yields the defaults.
/// Unreadable or malformed files are still errors.
pub fn load_or_default(path: &str) -> Result<AppConfig> {
    match std::fs::read_to_string(path) {
        Ok(content) => parse(&content).map_err(|e| anyhow!("{path}: {e}")),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(AppConfig::default()),
        Err(e) => Err(anyhow!("{path}: {e}")),
    }
}

pub fn load_from_file(path: &str) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path)?;
    parse(&content)
}

pub fn parse(content: &str) -> Result<AppConfig> {
    let cfg: AppConfig = toml::from_str(content)?;
    Ok(cfg)
}

impl AppConfig {
    /// Config file when present, otherwise defaults; environment variables
    /// fill whatever the file leaves empty.
    pub fn load_or_env() -> Result<Self> {
        let mut cfg = load_or_default(&config_path())?;
        cfg.normalize_and_validate()?;
        Ok(cfg)
    }

    pub fn normalize_and_validate(&mut self) -> Result<()> {
        self.server.normalize_from_env();
        self.server.normalize()?;
        self.database.normalize_from_env();
        self.database.validate()?;
        self.auth.normalize_from_env();
        self.auth.validate()?;
        Ok(())
    }
}

impl ServerConfig {
    fn normalize_from_env(&mut self) {
        if let Ok(host) = std::env::var("SERVER_HOST") {
            self.host = host;
        }
        if let Some(port) = std::env::var("SERVER_PORT").ok().and_then(|p| p.parse::<u16>().ok()) {
            self.port = port;
        }
        if self.worker_threads.is_none() {
            self.worker_threads = std::env::var("TOKIO_WORKER_THREADS").ok().and_then(|v| v.parse::<usize>().ok());
        }
    }

    fn normalize(&mut self) -> Result<()> {
        if self.host.trim().is_empty() {
            self.host = "127.0.0.1".to_string();
        }
        if self.port == 0 {
            return Err(anyhow!("server.port must be within 1..=65535"));
        }
        match self.worker_threads {
            Some(0) | None => self.worker_threads = Some(4),
            Some(_) => {}
        }
        Ok(())
    }
}

impl DatabaseConfig {
    pub fn normalize_from_env(&mut self) {
        if self.url.trim().is_empty() {
            if let Ok(url) = std::env::var("DATABASE_URL") {
                self.url = url;
            }
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.url.trim().is_empty() {
            return Err(anyhow!("database.url is empty; set it in config.toml or DATABASE_URL"));
        }
        let lower = self.url.to_lowercase();
        if !(lower.starts_with("postgresql://") || lower.starts_with("postgres://")) {
            return Err(anyhow!("database.url must start with postgresql:// or postgres://"));
        }
        if self.min_connections == 0 {
            return Err(anyhow!("database.min_connections must be >= 1"));
        }
        if self.max_connections < self.min_connections {
            return Err(anyhow!("database.max_connections must be >= min_connections"));
        }
        if self.connect_timeout_secs == 0 || self.acquire_timeout_secs == 0 {
            return Err(anyhow!("database timeouts must be positive seconds"));
        }
        Ok(())
    }
}

impl AuthConfig {
    pub fn normalize_from_env(&mut self) {
        if self.jwt_secret.trim().is_empty() {
            if let Ok(secret) = std::env::var("JWT_SECRET") {
                self.jwt_secret = secret;
            }
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.jwt_secret.len() < 16 {
            return Err(anyhow!("auth.jwt_secret must be at least 16 bytes; set it in config.toml or JWT_SECRET"));
        }
        if self.token_ttl_hours <= 0 {
            return Err(anyhow!("auth.token_ttl_hours must be positive"));
        }
        if self.admin_login_id.is_some() != self.admin_password.is_some() {
            return Err(anyhow!("auth.admin_login_id and auth.admin_password must be set together"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
        [server]
        host = "0.0.0.0"
        port = 9000

        [database]
        url = "postgres://laundry:pw@localhost:5432/laundry"
        max_connections = 8

        [auth]
        jwt_secret = "0123456789abcdef0123"
        admin_login_id = "admin"
        admin_password = "ChangeMe123"
    "#;

    #[test]
    fn parses_all_sections() {
        let mut cfg = parse(SAMPLE).unwrap();
        cfg.normalize_and_validate().unwrap();
        assert_eq!(cfg.server.port, 9000);
        assert_eq!(cfg.server.worker_threads, Some(4));
        assert_eq!(cfg.database.max_connections, 8);
        assert_eq!(cfg.database.min_connections, 2);
        assert_eq!(cfg.auth.token_ttl_hours, 12);
        assert_eq!(cfg.auth.admin_login_id.as_deref(), Some("admin"));
    }

    #[test]
    fn rejects_non_postgres_url() {
        let db = DatabaseConfig { url: "mysql://x".into(), ..DatabaseConfig::default() };
        assert!(db.validate().is_err());
    }

    #[test]
    fn rejects_short_secret_and_half_admin() {
        let auth = AuthConfig { jwt_secret: "short".into(), ..AuthConfig::default() };
        assert!(auth.validate().is_err());
        let auth = AuthConfig {
            jwt_secret: "0123456789abcdef".into(),
            admin_login_id: Some("admin".into()),
            ..AuthConfig::default()
        };
        assert!(auth.validate().is_err());
    }

    fn scratch_file(name: &str, content: &str) -> String {
        let path = std::env::temp_dir().join(format!("laundry-{}-{name}.toml", std::process::id()));
        std::fs::write(&path, content).unwrap();
        path.to_string_lossy().into_owned()
    }

    #[test]
    fn malformed_file_is_an_error_not_defaults() {
        let path = scratch_file("malformed", "[server]\nport = \"not a number\"\n");
        let res = load_or_default(&path);
        std::fs::remove_file(&path).ok();
        let err = res.unwrap_err().to_string();
        assert!(err.contains(&path), "{err}");
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let path = std::env::temp_dir().join(format!("laundry-{}-absent.toml", std::process::id()));
        let cfg = load_or_default(&path.to_string_lossy()).unwrap();
        assert_eq!(cfg.server.port, 8080);
        assert!(cfg.database.url.is_empty());
    }

    #[test]
    fn present_file_is_parsed() {
        let path = scratch_file("present", SAMPLE);
        let res = load_or_default(&path);
        std::fs::remove_file(&path).ok();
        assert_eq!(res.unwrap().server.port, 9000);
    }
}
