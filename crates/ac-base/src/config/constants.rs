// =============================================================================
// STORAGE
// =============================================================================

/// Directory (relative to the working directory) holding all console state
pub const STORE_DIR: &str = ".agent-console";

/// Single slot the form snapshot is persisted to
pub const SNAPSHOT_FILE: &str = "form.json";

/// User overrides for the embedded defaults
pub const CONFIG_FILE: &str = "config.yaml";

pub const LOGS_DIR: &str = "logs";
pub const LOG_FILE: &str = "agent-console.log";
pub const ERRORS_DIR: &str = "errors";
pub const PANIC_LOG_FILE: &str = "panic.log";

/// Coalescing window for snapshot writes in milliseconds
pub const PERSIST_DEBOUNCE_MS: u64 = 50;

/// Upper bound on how long a flush waits for the writer thread
pub const PERSIST_FLUSH_TIMEOUT_SECS: u64 = 5;

// =============================================================================
// BACKEND
// =============================================================================

/// A generation that has not answered within this window is abandoned
pub const GENERATE_TIMEOUT_SECS: u64 = 600;

/// Timeout for helper calls (deploy, voice, server launchers)
pub const ACTION_TIMEOUT_SECS: u64 = 120;

/// Error text that additionally raises a blocking notification
pub const DEPLOYMENT_FAILED_MARKER: &str = "Deployment failed";

/// Fallback when the server reports failure without a message
pub const UNKNOWN_SERVER_ERROR: &str = "Unknown server error";

pub const DEFAULT_SUCCESS_MESSAGE: &str = "Post generated successfully!";

// =============================================================================
// ENVIRONMENT
// =============================================================================

pub const ENV_BASE_URL: &str = "AGENT_CONSOLE_URL";
pub const ENV_LOG_FILTER: &str = "AGENT_CONSOLE_LOG";

// =============================================================================
// EVENT LOOP
// =============================================================================

/// Input poll timeout per loop iteration in milliseconds
pub const EVENT_POLL_MS: u64 = 50;

/// Spinner frame duration in milliseconds
pub const SPINNER_FRAME_MS: u64 = 100;

/// Sleep between controller polls in headless mode
pub const HEADLESS_POLL_MS: u64 = 100;
