/// Configuration management for blog-service
///
/// All settings come from environment variables (a `.env` file is loaded by
/// `main` first). Production refuses to start with permissive CORS or without
/// an explicit signing secret.
use std::fmt;
use std::str::FromStr;

/// Signing secret used when `JWT_SECRET` is unset outside production
const DEVELOPMENT_JWT_SECRET: &str = "blog-service-development-secret";

/// Longest accepted token lifetime: 30 days
const MAX_JWT_TTL_SECONDS: i64 = 30 * 24 * 60 * 60;

/// Main application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Application settings
    pub app: AppConfig,
    /// CORS configuration
    pub cors: CorsConfig,
    /// Which repository implementation backs the service
    pub storage: StorageBackend,
    /// Database configuration (used when `storage` is `Postgres`)
    pub database: DatabaseConfig,
    /// Token signing configuration
    pub jwt: JwtConfig,
    /// Argon2 cost parameters
    pub password_hash: PasswordHashConfig,
}

/// Application settings
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Application environment (development, staging, production)
    pub env: String,
    /// Server host to bind to
    pub host: String,
    /// Server port to bind to
    pub port: u16,
}

/// CORS configuration
#[derive(Debug, Clone)]
pub struct CorsConfig {
    /// Comma-separated list of allowed origins
    pub allowed_origins: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    Postgres,
    Memory,
}

impl FromStr for StorageBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(StorageBackend::Postgres),
            "memory" => Ok(StorageBackend::Memory),
            other => Err(format!(
                "STORAGE_BACKEND must be 'postgres' or 'memory', got '{}'",
                other
            )),
        }
    }
}

impl fmt::Display for StorageBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageBackend::Postgres => write!(f, "postgres"),
            StorageBackend::Memory => write!(f, "memory"),
        }
    }
}

/// Database configuration
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// Database URL
    pub url: String,
    /// Max connections in pool
    pub max_connections: u32,
    /// Apply pending migrations at startup
    pub run_migrations: bool,
}

/// Token signing configuration
#[derive(Clone)]
pub struct JwtConfig {
    pub secret: String,
    /// Token lifetime in seconds
    pub ttl_seconds: i64,
    /// True when `JWT_SECRET` was unset and the development secret is in use
    pub using_development_secret: bool,
}

impl fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JwtConfig")
            .field("secret", &"[REDACTED]")
            .field("ttl_seconds", &self.ttl_seconds)
            .field("using_development_secret", &self.using_development_secret)
            .finish()
    }
}

/// Argon2 cost parameters; `None` keeps the argon2 crate default
#[derive(Debug, Clone, Default)]
pub struct PasswordHashConfig {
    pub memory_kib: Option<u32>,
    pub iterations: Option<u32>,
    pub parallelism: Option<u32>,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, String> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, String>
    where
        F: Fn(&str) -> Option<String>,
    {
        let app_env = lookup("APP_ENV").unwrap_or_else(|| "development".to_string());
        let production = app_env.eq_ignore_ascii_case("production");

        Ok(Config {
            app: AppConfig {
                host: lookup("BLOG_SERVICE_HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
                port: parse_or(&lookup, "BLOG_SERVICE_PORT", 5000)?,
                env: app_env,
            },
            cors: {
                let allowed_origins = match lookup("CORS_ALLOWED_ORIGINS") {
                    Some(value) => value,
                    None if production => {
                        return Err("CORS_ALLOWED_ORIGINS must be set in production".to_string())
                    }
                    None => "http://localhost:3000".to_string(),
                };

                if production && allowed_origins.split(',').any(|o| o.trim() == "*") {
                    return Err("CORS_ALLOWED_ORIGINS cannot be '*' in production".to_string());
                }

                CorsConfig { allowed_origins }
            },
            storage: match lookup("STORAGE_BACKEND") {
                Some(value) => value.parse()?,
                None => StorageBackend::Postgres,
            },
            database: DatabaseConfig {
                url: lookup("DATABASE_URL")
                    .unwrap_or_else(|| "postgresql://localhost/blog".to_string()),
                max_connections: parse_or(&lookup, "DATABASE_MAX_CONNECTIONS", 10)?,
                run_migrations: parse_or(&lookup, "DATABASE_RUN_MIGRATIONS", true)?,
            },
            jwt: {
                let (secret, using_development_secret) =
                    match lookup("JWT_SECRET").filter(|s| !s.is_empty()) {
                        Some(secret) => (secret, false),
                        None if production => {
                            return Err("JWT_SECRET must be set in production".to_string())
                        }
                        None => (DEVELOPMENT_JWT_SECRET.to_string(), true),
                    };

                let ttl_seconds = parse_or(
                    &lookup,
                    "JWT_TTL_SECONDS",
                    crypto_core::jwt::DEFAULT_TOKEN_TTL_SECONDS,
                )?;
                if !(1..=MAX_JWT_TTL_SECONDS).contains(&ttl_seconds) {
                    return Err(format!(
                        "JWT_TTL_SECONDS must be between 1 and {}, got {}",
                        MAX_JWT_TTL_SECONDS, ttl_seconds
                    ));
                }

                JwtConfig {
                    secret,
                    ttl_seconds,
                    using_development_secret,
                }
            },
            password_hash: PasswordHashConfig {
                memory_kib: parse_optional(&lookup, "PASSWORD_HASH_MEMORY_KIB")?,
                iterations: parse_optional(&lookup, "PASSWORD_HASH_ITERATIONS")?,
                parallelism: parse_optional(&lookup, "PASSWORD_HASH_PARALLELISM")?,
            },
        })
    }

    pub fn is_production(&self) -> bool {
        self.app.env.eq_ignore_ascii_case("production")
    }

    /// Address the HTTP server binds to
    pub fn bind_address(&self) -> (String, u16) {
        (self.app.host.clone(), self.app.port)
    }
}

fn parse_optional<F, T>(lookup: &F, key: &str) -> Result<Option<T>, String>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: fmt::Display,
{
    match lookup(key) {
        Some(val) => val
            .trim()
            .parse()
            .map(Some)
            .map_err(|e| format!("Failed to parse {}='{}': {}", key, val, e)),
        None => Ok(None),
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T, String>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: fmt::Display,
{
    Ok(parse_optional(lookup, key)?.unwrap_or(default))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<Config, String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[]).unwrap();
        assert_eq!(config.app.env, "development");
        assert_eq!(config.app.port, 5000);
        assert_eq!(config.cors.allowed_origins, "http://localhost:3000");
        assert_eq!(config.storage, StorageBackend::Postgres);
        assert_eq!(config.database.max_connections, 10);
        assert!(config.database.run_migrations);
        assert_eq!(config.jwt.ttl_seconds, 3600);
        assert!(config.jwt.using_development_secret);
        assert!(config.password_hash.memory_kib.is_none());
    }

    #[test]
    fn test_explicit_values() {
        let config = load(&[
            ("BLOG_SERVICE_PORT", "8080"),
            ("STORAGE_BACKEND", "memory"),
            ("JWT_SECRET", "s3cret"),
            ("JWT_TTL_SECONDS", "60"),
            ("DATABASE_RUN_MIGRATIONS", "false"),
            ("PASSWORD_HASH_ITERATIONS", "3"),
        ])
        .unwrap();

        assert_eq!(config.app.port, 8080);
        assert_eq!(config.storage, StorageBackend::Memory);
        assert_eq!(config.jwt.secret, "s3cret");
        assert!(!config.jwt.using_development_secret);
        assert_eq!(config.jwt.ttl_seconds, 60);
        assert!(!config.database.run_migrations);
        assert_eq!(config.password_hash.iterations, Some(3));
    }

    #[test]
    fn test_invalid_numbers_are_errors() {
        let err = load(&[("BLOG_SERVICE_PORT", "eighty")]).unwrap_err();
        assert!(err.contains("BLOG_SERVICE_PORT"));

        assert!(load(&[("JWT_TTL_SECONDS", "0")]).is_err());
        assert!(load(&[("JWT_TTL_SECONDS", "10000000000000")]).is_err());
        let huge = i64::MAX.to_string();
        assert!(load(&[("JWT_TTL_SECONDS", huge.as_str())]).is_err());
        assert!(load(&[("JWT_TTL_SECONDS", "2592000")]).is_ok());
        assert!(load(&[("PASSWORD_HASH_MEMORY_KIB", "-1")]).is_err());
        assert!(load(&[("STORAGE_BACKEND", "mongo")]).is_err());
    }

    #[test]
    fn test_production_requirements() {
        assert!(load(&[("APP_ENV", "production"), ("JWT_SECRET", "x")])
            .unwrap_err()
            .contains("CORS_ALLOWED_ORIGINS"));

        assert!(load(&[
            ("APP_ENV", "production"),
            ("CORS_ALLOWED_ORIGINS", "*"),
            ("JWT_SECRET", "x"),
        ])
        .is_err());

        assert!(load(&[
            ("APP_ENV", "production"),
            ("CORS_ALLOWED_ORIGINS", "https://blog.example.com"),
        ])
        .unwrap_err()
        .contains("JWT_SECRET"));

        let config = load(&[
            ("APP_ENV", "production"),
            ("CORS_ALLOWED_ORIGINS", "https://blog.example.com"),
            ("JWT_SECRET", "x"),
        ])
        .unwrap();
        assert!(config.is_production());
    }

    #[test]
    fn test_secret_is_redacted_in_debug() {
        let config = load(&[("JWT_SECRET", "do-not-print")]).unwrap();
        assert!(!format!("{:?}", config).contains("do-not-print"));
    }
}
