//! Global Constants
//!
//! Centralized constants for limits, provider defaults, and scoring weights.
//! All magic numbers should be defined here with documentation.

/// Upload and body size limits
pub mod limits {
    /// Maximum size of a single uploaded source file (5 MiB)
    pub const MAX_FILE_BYTES: usize = 5 * 1024 * 1024;

    /// Maximum size of an uploaded zip archive (50 MiB)
    pub const MAX_ARCHIVE_BYTES: usize = 50 * 1024 * 1024;

    /// Extra room granted to multipart bodies for boundaries and headers
    pub const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

    /// Default limit for JSON request bodies (10 MiB)
    pub const DEFAULT_BODY_LIMIT_BYTES: usize = 10 * 1024 * 1024;
}

/// HTTP/Network constants
pub mod network {
    /// Default completion endpoint base URL (OpenAI-compatible)
    pub const DEFAULT_API_BASE: &str = "https://api.openai.com/v1";

    /// Default completion model
    pub const DEFAULT_MODEL: &str = "gpt-4";

    /// Default request timeout (seconds)
    pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

    /// Low temperature keeps rewrites close to deterministic
    pub const DEFAULT_TEMPERATURE: f32 = 0.3;

    /// Output token ceiling per completion
    pub const DEFAULT_MAX_TOKENS: usize = 4000;
}

/// Server defaults
pub mod server {
    pub const DEFAULT_HOST: &str = "0.0.0.0";

    pub const DEFAULT_PORT: u16 = 5000;

    /// Requests allowed per client per window
    pub const DEFAULT_RATE_LIMIT_PER_MINUTE: u32 = 100;

    /// Rate limit window length (seconds)
    pub const RATE_LIMIT_WINDOW_SECS: u64 = 60;

    /// Client windows tracked before stale entries are swept
    pub const RATE_LIMIT_SWEEP_THRESHOLD: usize = 10_000;
}

/// Accepted file types and archive layout
pub mod files {
    /// Source extensions accepted for refactoring
    pub const SOURCE_EXTENSIONS: &[&str] = &["js", "jsx", "ts", "tsx", "json"];

    /// MIME types accepted for single source uploads
    pub const SOURCE_MIME_TYPES: &[&str] = &[
        "application/javascript",
        "text/javascript",
        "application/x-javascript",
        "application/typescript",
        "text/typescript",
        "text/jsx",
        "application/json",
    ];

    /// MIME types accepted for archive uploads
    pub const ARCHIVE_MIME_TYPES: &[&str] = &[
        "application/zip",
        "application/x-zip-compressed",
        "application/x-zip",
    ];

    /// Directory prefix for refactored sources inside output archives
    pub const OUTPUT_PREFIX: &str = "src/";

    /// Generated manifest name inside output archives
    pub const MANIFEST_NAME: &str = "README.md";

    /// Download name for output archives
    pub const ARCHIVE_FILE_NAME: &str = "refactored-code.zip";
}

/// Heuristic quality score weights
///
/// These are text heuristics, not a measurement of code quality.
pub mod quality {
    pub const BASELINE: f64 = 3.0;

    /// Async/await replaced callback-style code
    pub const ASYNC_BONUS: f64 = 0.5;

    /// More inline comments than the original
    pub const COMMENT_BONUS: f64 = 0.3;

    /// Output kept most of its length (proxy for fuller names)
    pub const NAMING_BONUS: f64 = 0.2;

    /// Minimum refactored/original character ratio for the naming bonus
    pub const NAMING_LENGTH_RATIO: f64 = 0.8;

    pub const MIN_SCORE: f64 = 1.0;
    pub const MAX_SCORE: f64 = 5.0;
}
