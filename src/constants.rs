// Backend constants
pub const CHAT_ENDPOINT: &str = "/api/chat";
pub const DEFAULT_BACKEND_URL: &str = "http://127.0.0.1:5000";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

// Chat constants
pub const DEFAULT_BOT_NAME: &str = "Parlance";
pub const GENERIC_ERROR_TEXT: &str = "Sorry, I encountered an error. Please try again.";
pub const TIME_FORMAT: &str = "%H:%M";
