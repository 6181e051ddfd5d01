use std::env;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct Config {
    pub app: AppConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    pub storage: StorageConfig,
    pub mail: MailConfig,
    pub bootstrap: BootstrapConfig,
    pub swagger: SwaggerConfig,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub cors_allowed_origins: Vec<String>,
    /// `development` attaches internal error details to 5xx responses
    pub environment: String,
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub acquire_timeout_secs: u64,
    pub idle_timeout_secs: u64,
    pub max_lifetime_secs: u64,
}

#[derive(Clone)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub token_ttl_hours: i64,
    pub argon2_memory_kib: u32,
    pub argon2_iterations: u32,
    pub argon2_parallelism: u32,
}

// Keep the signing secret out of logs.
impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("jwt_secret", &"***")
            .field("token_ttl_hours", &self.token_ttl_hours)
            .field("argon2_memory_kib", &self.argon2_memory_kib)
            .field("argon2_iterations", &self.argon2_iterations)
            .field("argon2_parallelism", &self.argon2_parallelism)
            .finish()
    }
}

/// Local disk storage for evidence uploads
#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// Directory where uploaded files are written
    pub upload_dir: PathBuf,
    /// URL prefix under which stored files are served (e.g. "/uploads")
    pub public_path: String,
}

/// Outbound mail relay used for account validation emails.
/// When `api_url` is unset, emails are only logged.
#[derive(Debug, Clone)]
pub struct MailConfig {
    pub api_url: Option<String>,
    pub api_key: Option<String>,
    pub from: String,
    pub frontend_url: String,
}

/// Optional staff accounts created at startup
#[derive(Debug, Clone, Default)]
pub struct BootstrapConfig {
    pub admin: Option<BootstrapAccount>,
    pub operator: Option<BootstrapAccount>,
}

#[derive(Clone)]
pub struct BootstrapAccount {
    pub email: String,
    pub password: String,
}

impl std::fmt::Debug for BootstrapAccount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BootstrapAccount")
            .field("email", &self.email)
            .field("password", &"***")
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct SwaggerConfig {
    pub username: Option<String>,
    pub password: Option<String>,
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        // Load .env file if exists, ignore if not found (optional for production)
        if let Err(e) = dotenvy::dotenv() {
            if !e.to_string().contains("not found") {
                eprintln!("Warning: Error loading .env file: {}", e);
            }
        }

        Ok(Config {
            app: AppConfig::from_env()?,
            database: DatabaseConfig::from_env()?,
            auth: AuthConfig::from_env()?,
            storage: StorageConfig::from_env()?,
            mail: MailConfig::from_env()?,
            bootstrap: BootstrapConfig::from_env()?,
            swagger: SwaggerConfig::from_env()?,
        })
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, String> {
        let host = env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|e| format!("Invalid PORT: {}", e))?;

        // Parse CORS allowed origins from comma-separated string
        let cors_allowed_origins = env::var("CORS_ALLOWED_ORIGINS")
            .unwrap_or_else(|_| "*".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let environment = env::var("APP_ENV").unwrap_or_else(|_| "production".to_string());

        Ok(Self {
            host,
            port,
            cors_allowed_origins,
            environment,
        })
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn is_development(&self) -> bool {
        self.environment.eq_ignore_ascii_case("development")
    }
}

impl DatabaseConfig {
    // Default values for database connection pool (conservative defaults for small-medium apps)
    const DEFAULT_MAX_CONNECTIONS: u32 = 10;
    const DEFAULT_MIN_CONNECTIONS: u32 = 1;
    const DEFAULT_ACQUIRE_TIMEOUT_SECS: u64 = 5;
    const DEFAULT_IDLE_TIMEOUT_SECS: u64 = 600; // 10 minutes
    const DEFAULT_MAX_LIFETIME_SECS: u64 = 1800; // 30 minutes

    pub fn from_env() -> Result<Self, String> {
        let url = env::var("DATABASE_URL").map_err(|_| "DATABASE_URL must be set".to_string())?;

        let max_connections = env::var("DB_MAX_CONNECTIONS")
            .unwrap_or_else(|_| Self::DEFAULT_MAX_CONNECTIONS.to_string())
            .parse::<u32>()
            .map_err(|_| "DB_MAX_CONNECTIONS must be a valid number".to_string())?;

        let min_connections = env::var("DB_MIN_CONNECTIONS")
            .unwrap_or_else(|_| Self::DEFAULT_MIN_CONNECTIONS.to_string())
            .parse::<u32>()
            .map_err(|_| "DB_MIN_CONNECTIONS must be a valid number".to_string())?;

        let acquire_timeout_secs = env::var("DB_ACQUIRE_TIMEOUT_SECS")
            .unwrap_or_else(|_| Self::DEFAULT_ACQUIRE_TIMEOUT_SECS.to_string())
            .parse::<u64>()
            .map_err(|_| "DB_ACQUIRE_TIMEOUT_SECS must be a valid number".to_string())?;

        let idle_timeout_secs = env::var("DB_IDLE_TIMEOUT_SECS")
            .unwrap_or_else(|_| Self::DEFAULT_IDLE_TIMEOUT_SECS.to_string())
            .parse::<u64>()
            .map_err(|_| "DB_IDLE_TIMEOUT_SECS must be a valid number".to_string())?;

        let max_lifetime_secs = env::var("DB_MAX_LIFETIME_SECS")
            .unwrap_or_else(|_| Self::DEFAULT_MAX_LIFETIME_SECS.to_string())
            .parse::<u64>()
            .map_err(|_| "DB_MAX_LIFETIME_SECS must be a valid number".to_string())?;

        Ok(Self {
            url,
            max_connections,
            min_connections,
            acquire_timeout_secs,
            idle_timeout_secs,
            max_lifetime_secs,
        })
    }
}

impl AuthConfig {
    const DEFAULT_TOKEN_TTL_HOURS: i64 = 24;
    const MIN_SECRET_LENGTH: usize = 32;

    // Argon2id defaults (OWASP recommended minimums)
    const DEFAULT_ARGON2_MEMORY_KIB: u32 = 19_456;
    const DEFAULT_ARGON2_ITERATIONS: u32 = 2;
    const DEFAULT_ARGON2_PARALLELISM: u32 = 1;

    pub fn from_env() -> Result<Self, String> {
        let jwt_secret = env::var("JWT_SECRET")
            .map_err(|_| "JWT_SECRET environment variable is required".to_string())?;

        if jwt_secret.len() < Self::MIN_SECRET_LENGTH {
            return Err(format!(
                "JWT_SECRET must be at least {} bytes long",
                Self::MIN_SECRET_LENGTH
            ));
        }

        let token_ttl_hours = env::var("JWT_TTL_HOURS")
            .unwrap_or_else(|_| Self::DEFAULT_TOKEN_TTL_HOURS.to_string())
            .parse::<i64>()
            .map_err(|_| "JWT_TTL_HOURS must be a valid number".to_string())?;

        if token_ttl_hours <= 0 {
            return Err("JWT_TTL_HOURS must be positive".to_string());
        }

        let argon2_memory_kib = env::var("ARGON2_MEMORY_KIB")
            .unwrap_or_else(|_| Self::DEFAULT_ARGON2_MEMORY_KIB.to_string())
            .parse::<u32>()
            .map_err(|_| "ARGON2_MEMORY_KIB must be a valid number".to_string())?;

        let argon2_iterations = env::var("ARGON2_ITERATIONS")
            .unwrap_or_else(|_| Self::DEFAULT_ARGON2_ITERATIONS.to_string())
            .parse::<u32>()
            .map_err(|_| "ARGON2_ITERATIONS must be a valid number".to_string())?;

        let argon2_parallelism = env::var("ARGON2_PARALLELISM")
            .unwrap_or_else(|_| Self::DEFAULT_ARGON2_PARALLELISM.to_string())
            .parse::<u32>()
            .map_err(|_| "ARGON2_PARALLELISM must be a valid number".to_string())?;

        Ok(Self {
            jwt_secret,
            token_ttl_hours,
            argon2_memory_kib,
            argon2_iterations,
            argon2_parallelism,
        })
    }
}

impl StorageConfig {
    pub fn from_env() -> Result<Self, String> {
        let upload_dir = env::var("UPLOAD_DIR").unwrap_or_else(|_| "uploads".to_string());
        let public_path =
            env::var("UPLOAD_PUBLIC_PATH").unwrap_or_else(|_| "/uploads".to_string());

        if !public_path.starts_with('/') {
            return Err("UPLOAD_PUBLIC_PATH must start with '/'".to_string());
        }

        Ok(Self {
            upload_dir: PathBuf::from(upload_dir),
            public_path: public_path.trim_end_matches('/').to_string(),
        })
    }
}

impl MailConfig {
    pub fn from_env() -> Result<Self, String> {
        let api_url = env::var("MAIL_API_URL").ok().filter(|s| !s.is_empty());
        let api_key = env::var("MAIL_API_KEY").ok().filter(|s| !s.is_empty());
        let from = env::var("MAIL_FROM").unwrap_or_else(|_| "no-reply@localhost".to_string());
        let frontend_url =
            env::var("FRONTEND_URL").unwrap_or_else(|_| "http://localhost:3000".to_string());

        Ok(Self {
            api_url,
            api_key,
            from,
            frontend_url,
        })
    }
}

impl BootstrapConfig {
    pub fn from_env() -> Result<Self, String> {
        Ok(Self {
            admin: BootstrapAccount::from_env("BOOTSTRAP_ADMIN")?,
            operator: BootstrapAccount::from_env("BOOTSTRAP_OPERATOR")?,
        })
    }
}

impl BootstrapAccount {
    /// Reads `<PREFIX>_EMAIL` / `<PREFIX>_PASSWORD`; both or neither must be set
    fn from_env(prefix: &str) -> Result<Option<Self>, String> {
        let email = env::var(format!("{}_EMAIL", prefix))
            .ok()
            .filter(|s| !s.is_empty());
        let password = env::var(format!("{}_PASSWORD", prefix))
            .ok()
            .filter(|s| !s.is_empty());

        match (email, password) {
            (Some(email), Some(password)) => Ok(Some(Self { email, password })),
            (None, None) => Ok(None),
            _ => Err(format!(
                "{}_EMAIL and {}_PASSWORD must be set together",
                prefix, prefix
            )),
        }
    }
}

impl SwaggerConfig {
    pub fn from_env() -> Result<Self, String> {
        // Only use credentials if they are non-empty
        let username = env::var("SWAGGER_USERNAME").ok().filter(|s| !s.is_empty());
        let password = env::var("SWAGGER_PASSWORD").ok().filter(|s| !s.is_empty());
        let title = env::var("SWAGGER_TITLE").unwrap_or_else(|_| "SAC API".to_string());
        let version = env::var("SWAGGER_VERSION").unwrap_or_else(|_| "0.1.0".to_string());
        let description = env::var("SWAGGER_DESCRIPTION")
            .unwrap_or_else(|_| "Citizen incident reporting API".to_string());

        Ok(Self {
            username,
            password,
            title,
            version,
            description,
        })
    }

    /// Returns credentials in "username:password" format if auth is enabled
    pub fn credentials(&self) -> Option<String> {
        match (&self.username, &self.password) {
            (Some(user), Some(pass)) => Some(format!("{}:{}", user, pass)),
            _ => None,
        }
    }
}
