/// Items per page when the caller does not say otherwise
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Length of the popular tags / popular users sidebars
pub const POPULAR_LIMIT: usize = 30;

/// Maximum question title length in characters
pub const MAX_TITLE_LEN: usize = 256;

/// Maximum tag name length in characters
pub const MAX_TAG_NAME_LEN: usize = 64;

/// Maximum profile nickname length in characters
pub const MAX_NICKNAME_LEN: usize = 128;

/// Default HTTP port (server)
pub const DEFAULT_HTTP_PORT: u16 = 8000;
