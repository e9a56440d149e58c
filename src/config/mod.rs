use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Runtime configuration for the upload and extraction pipeline
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Port for the HTTP server (default: 3000)
    pub port: u16,

    /// Directory where uploads are staged before extraction (default: "uploads")
    pub staging_dir: PathBuf,

    /// Directory holding index.html and client.js (default: "public")
    pub public_dir: PathBuf,

    /// Extractor executable (default: "python3")
    pub extractor_program: String,

    /// Arguments placed before the staged file path (default: the extraction script)
    pub extractor_args: Vec<String>,

    /// Deadline for a single extractor run (default: 120 s)
    pub extraction_timeout: Duration,

    /// Maximum number of extractor processes alive at once (default: 4)
    pub max_concurrent_extractions: usize,

    /// Maximum request body size in bytes (default: 50 MB)
    pub max_upload_size: usize,

    /// Keep staged files after extraction instead of deleting them (default: false)
    pub retain_staged_files: bool,

    /// CORS origins
    pub allowed_origins: Vec<String>,

    /// Serve Swagger UI at /swagger-ui (default: false)
    pub enable_swagger: bool,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            port: 3000,
            staging_dir: PathBuf::from("uploads"),
            public_dir: PathBuf::from("public"),
            extractor_program: "python3".to_string(),
            extractor_args: vec!["extract_financial_metrics.py".to_string()],
            extraction_timeout: Duration::from_secs(120),
            max_concurrent_extractions: 4,
            max_upload_size: 50 * 1024 * 1024, // 50 MB
            retain_staged_files: false,
            allowed_origins: vec![
                "http://localhost:3000".to_string(),
                "http://127.0.0.1:3000".to_string(),
            ],
            enable_swagger: false,
        }
    }
}

impl ServiceConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let default = Self::default();

        Self {
            port: env::var("PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(default.port),

            staging_dir: env::var("STAGING_DIR")
                .map(PathBuf::from)
                .unwrap_or(default.staging_dir),

            public_dir: env::var("PUBLIC_DIR")
                .map(PathBuf::from)
                .unwrap_or(default.public_dir),

            extractor_program: env::var("EXTRACTOR_PROGRAM")
                .unwrap_or(default.extractor_program),

            extractor_args: env::var("EXTRACTOR_ARGS")
                .ok()
                .map(|v| v.split_whitespace().map(|s| s.to_string()).collect())
                .unwrap_or(default.extractor_args),

            extraction_timeout: env::var("EXTRACTION_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .map(Duration::from_secs)
                .unwrap_or(default.extraction_timeout),

            max_concurrent_extractions: env::var("MAX_CONCURRENT_EXTRACTIONS")
                .ok()
                .and_then(|v| v.parse::<usize>().ok())
                .map(|n| n.max(1))
                .unwrap_or(default.max_concurrent_extractions),

            max_upload_size: env::var("MAX_UPLOAD_SIZE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(default.max_upload_size),

            retain_staged_files: env::var("RETAIN_STAGED_FILES")
                .map(|v| v.to_lowercase() == "true" || v == "1")
                .unwrap_or(default.retain_staged_files),

            allowed_origins: env::var("ALLOWED_ORIGINS")
                .ok()
                .map(|v| v.split(',').map(|s| s.trim().to_string()).collect())
                .unwrap_or(default.allowed_origins),

            enable_swagger: env::var("ENABLE_SWAGGER")
                .map(|v| v.to_lowercase() == "true" || v == "1")
                .unwrap_or(default.enable_swagger),
        }
    }

    /// Create config for local development (short deadline, files kept for inspection)
    pub fn development() -> Self {
        Self {
            extraction_timeout: Duration::from_secs(30),
            retain_staged_files: true,
            enable_swagger: true,
            allowed_origins: vec![
                "http://localhost:3000".to_string(),
                "http://localhost:5173".to_string(), // Vite default
                "http://127.0.0.1:3000".to_string(),
            ],
            ..Self::default()
        }
    }
}
