use std::{env, sync::Arc, time::Duration};

#[derive(Clone, Debug)]
/// Configuration struct for the server.
///
/// This struct holds all the necessary configuration parameters
/// required to initialize and run the server.
/// It includes database connection details, JWT configuration,
/// server host and port, number of worker threads, CORS settings,
/// logging preferences and the third-party services the handlers call.
pub struct Config {
    // environment
    pub environment: String, // development or production
    /// The URL of the database to connect to.
    pub database_url: String,
    /// Configuration for JWT (JSON Web Token) authentication.
    pub jwt_config: JwtConfig,
    /// The hostname or IP address the server will bind to.
    pub server_host: String,
    /// The port number the server will listen on.
    pub server_port: u16,
    /// The number of worker threads to spawn for handling requests.
    pub num_workers: usize,
    /// The allowed origin for CORS. `*` allows any origin.
    pub cors_allowed_origin: String,
    /// A boolean indicating whether console logging is enabled.
    pub console_logging_enabled: bool,
    /// OpenAI-compatible inference gateway used by the chat handler.
    pub ai_gateway: AiGatewayConfig,
    /// Transactional email provider used by the notification handler.
    pub email: EmailConfig,
    /// Deadline applied to every outbound HTTP call.
    pub upstream_timeout: Duration,
}

#[derive(Clone, Debug)]
/// Configuration for JSON Web Token (JWT) authentication.
///
/// Tokens are issued by the auth platform; the server only verifies
/// them with the shared HS256 secret.
pub struct JwtConfig {
    /// The secret key used to verify JWTs.
    pub secret: String,
}

#[derive(Clone, Debug)]
pub struct AiGatewayConfig {
    /// Full URL of the `chat/completions` endpoint.
    pub url: String,
    pub api_key: String,
    pub model: String,
}

#[derive(Clone, Debug)]
pub struct EmailConfig {
    /// Full URL of the provider's send endpoint.
    pub api_url: String,
    pub api_key: String,
    /// Sender, e.g. `EcoFin <notifications@ecofin.app>`.
    pub from: String,
}

impl JwtConfig {
    /// Creates a new `JwtConfig` instance from environment variables.
    ///
    /// # Panics
    ///
    /// This function will panic if `JWT_SECRET` is not set.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        JwtConfig {
            secret: env::var("JWT_SECRET").expect("JWT_SECRET must be set"),
        }
    }
}

impl Config {
    /// Creates a new `Config` instance from environment variables.
    ///
    /// # Environment Variables
    ///
    /// Required:
    /// - `ENVIRONMENT`: `development` or `production`
    /// - `DATABASE_URL`: Connection string for the database
    /// - `JWT_SECRET`: Secret key for JWT verification
    ///
    /// Optional (with defaults):
    /// - `IP`: Server host (default: "127.0.0.1")
    /// - `PORT`: Server port (default: 8080)
    /// - `WORKERS`: Number of worker threads (default: 4)
    /// - `CORS_ALLOWED_ORIGIN`: Allowed CORS origin (default: "*")
    /// - `ENABLE_CONSOLE_LOGGING`: Whether to enable console logging (default: true)
    /// - `AI_GATEWAY_URL`, `AI_GATEWAY_API_KEY`, `AI_MODEL`
    /// - `EMAIL_API_URL`, `EMAIL_API_KEY`, `EMAIL_FROM`
    /// - `UPSTREAM_TIMEOUT_SECS`: Outbound HTTP deadline (default: 30)
    ///
    /// # Panics
    ///
    /// This function will panic if required environment variables are missing.
    pub fn from_env() -> Arc<Self> {
        dotenvy::dotenv().ok();

        Arc::new(Config {
            environment: env::var("ENVIRONMENT").expect("ENVIRONMENT must be set"),
            database_url: env::var("DATABASE_URL").expect("DATABASE_URL must be set"),
            jwt_config: JwtConfig::from_env(),
            server_host: env::var("IP").unwrap_or_else(|_| "127.0.0.1".to_string()),
            server_port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .unwrap_or(8080),
            num_workers: env::var("WORKERS")
                .unwrap_or_else(|_| "4".to_string())
                .parse()
                .unwrap_or(4),
            cors_allowed_origin: env::var("CORS_ALLOWED_ORIGIN")
                .unwrap_or_else(|_| "*".to_string()),
            console_logging_enabled: env::var("ENABLE_CONSOLE_LOGGING")
                .unwrap_or_else(|_| "true".to_string())
                .to_lowercase()
                == "true",
            ai_gateway: AiGatewayConfig {
                url: env::var("AI_GATEWAY_URL").unwrap_or_else(|_| {
                    "https://ai.gateway.lovable.dev/v1/chat/completions".to_string()
                }),
                api_key: env::var("AI_GATEWAY_API_KEY").unwrap_or_default(),
                model: env::var("AI_MODEL")
                    .unwrap_or_else(|_| "google/gemini-2.5-flash".to_string()),
            },
            email: EmailConfig {
                api_url: env::var("EMAIL_API_URL")
                    .unwrap_or_else(|_| "https://api.resend.com/emails".to_string()),
                api_key: env::var("EMAIL_API_KEY").unwrap_or_default(),
                from: env::var("EMAIL_FROM")
                    .unwrap_or_else(|_| "EcoFin <notifications@ecofin.app>".to_string()),
            },
            upstream_timeout: Duration::from_secs(
                env::var("UPSTREAM_TIMEOUT_SECS")
                    .unwrap_or_else(|_| "30".to_string())
                    .parse()
                    .unwrap_or(30),
            ),
        })
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}
