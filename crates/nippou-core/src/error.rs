use std::fmt;

/// Machine-readable error codes surfaced by the store, session, and CLI layers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    WorkingCopyMissing,
    SettingsParseError,
    MalformedDocument,
    InvalidPayload,
    Unauthorized,
    MissingToken,
    StoreUnreachable,
    StoreWriteFailed,
    CategoryNotFound,
    ItemNotFound,
    EmptyName,
    InvalidAnswer,
    InvalidDate,
    InternalUnexpected,
}

impl ErrorCode {
    /// Stable code identifier (`E####`) for machine parsing.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::WorkingCopyMissing => "E1001",
            Self::SettingsParseError => "E1002",
            Self::MalformedDocument => "E2001",
            Self::InvalidPayload => "E2002",
            Self::Unauthorized => "E3001",
            Self::MissingToken => "E3002",
            Self::StoreUnreachable => "E4001",
            Self::StoreWriteFailed => "E4002",
            Self::CategoryNotFound => "E5001",
            Self::ItemNotFound => "E5002",
            Self::EmptyName => "E5003",
            Self::InvalidAnswer => "E6001",
            Self::InvalidDate => "E6002",
            Self::InternalUnexpected => "E9001",
        }
    }

    /// Short human-facing summary for logs and terminal output.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::WorkingCopyMissing => "No working copy loaded",
            Self::SettingsParseError => "Settings file parse error",
            Self::MalformedDocument => "Configuration text is not valid JSON",
            Self::InvalidPayload => "Invalid configuration payload",
            Self::Unauthorized => "Unauthorized",
            Self::MissingToken => "Admin token not provided",
            Self::StoreUnreachable => "Configuration store unreachable",
            Self::StoreWriteFailed => "Configuration store write failed",
            Self::CategoryNotFound => "Category not found",
            Self::ItemNotFound => "Item not found",
            Self::EmptyName => "Name must not be empty",
            Self::InvalidAnswer => "Invalid answer",
            Self::InvalidDate => "Invalid report date",
            Self::InternalUnexpected => "Internal unexpected error",
        }
    }

    /// Optional remediation hint that can be surfaced to operators.
    #[must_use]
    pub const fn hint(self) -> Option<&'static str> {
        match self {
            Self::WorkingCopyMissing => {
                Some("Run `nippou load` (or `nippou load --defaults`) first.")
            }
            Self::SettingsParseError => Some("Fix syntax in .nippou/config.toml and retry."),
            Self::MalformedDocument => Some("Fix the JSON in .nippou/working.json and retry."),
            Self::InvalidPayload => Some("The document needs a top-level `categories` array."),
            Self::Unauthorized => Some("Check the admin token and retry."),
            Self::MissingToken => Some("Pass --token or set NIPPOU_TOKEN."),
            Self::StoreUnreachable => Some("Check the store URL and network, then retry."),
            Self::StoreWriteFailed => Some("Check disk space and write permissions."),
            Self::CategoryNotFound => Some("Run `nippou show` to list category ids."),
            Self::ItemNotFound => Some("Run `nippou show` to list item ids."),
            Self::EmptyName => None,
            Self::InvalidAnswer => Some("Use `category/item` or `category/item=N`."),
            Self::InvalidDate => Some("Use the YYYY-MM-DD format."),
            Self::InternalUnexpected => Some("Retry once. If persistent, report a bug with logs."),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}
