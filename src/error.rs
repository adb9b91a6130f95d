//! Application error type shared by the pipeline, the HTTP binding and the CLI.

/// What went wrong, independent of how the failure is rendered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// Uploaded file name does not end with `.csv`.
    InvalidFileType,
    /// Content could not be parsed as a delimited table.
    Parse,
    /// One or more identifying columns are absent (in required order).
    MissingColumns(Vec<String>),
    /// Fewer month columns than the minimum history length.
    InsufficientHistory { found: usize },
    /// A month cell could not be coerced to a number.
    MalformedValue { sku: String, month: String },
    /// The anchor month key is not a `YYYY-MM` value.
    InvalidMonthFormat(String),
    /// A query arrived before any successful upload.
    NoSnapshot,
    /// The transport received a request it cannot interpret.
    BadRequest,
    /// File or socket failure.
    Io,
}

#[derive(Clone)]
pub struct AppError {
    kind: ErrorKind,
    message: String,
}

impl AppError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn invalid_file_type() -> Self {
        Self::new(ErrorKind::InvalidFileType, "Only CSV files are allowed")
    }

    pub fn parse(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Parse, message)
    }

    pub fn missing_columns(missing: Vec<String>) -> Self {
        let message = format!("Missing required columns: {}", missing.join(", "));
        Self::new(ErrorKind::MissingColumns(missing), message)
    }

    pub fn insufficient_history(found: usize) -> Self {
        Self::new(
            ErrorKind::InsufficientHistory { found },
            "CSV must contain at least 24 months of sales data",
        )
    }

    pub fn malformed_value(sku: impl Into<String>, month: impl Into<String>) -> Self {
        let sku = sku.into();
        let month = month.into();
        let message = format!("Non-numeric sales value for SKU '{sku}' in month column '{month}'");
        Self::new(ErrorKind::MalformedValue { sku, month }, message)
    }

    pub fn invalid_month_format(key: impl Into<String>) -> Self {
        let key = key.into();
        let message = format!("Month column '{key}' is not a YYYY-MM value");
        Self::new(ErrorKind::InvalidMonthFormat(key), message)
    }

    pub fn no_snapshot() -> Self {
        Self::new(ErrorKind::NoSnapshot, "No data uploaded yet")
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::BadRequest, message)
    }

    pub fn io(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Io, message)
    }

    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// HTTP status code for the failure.
    ///
    /// Malformed uploads are client errors, queries before an upload are "not
    /// found", bad data discovered in a held snapshot is unprocessable, and
    /// anything the parser chokes on is reported as a server-side failure.
    pub fn status_code(&self) -> u16 {
        match self.kind {
            ErrorKind::InvalidFileType
            | ErrorKind::MissingColumns(_)
            | ErrorKind::InsufficientHistory { .. }
            | ErrorKind::BadRequest => 400,
            ErrorKind::NoSnapshot => 404,
            ErrorKind::MalformedValue { .. } | ErrorKind::InvalidMonthFormat(_) => 422,
            ErrorKind::Parse | ErrorKind::Io => 500,
        }
    }

    /// Process exit code used by the `skulytics` binary.
    pub fn exit_code(&self) -> u8 {
        match self.kind {
            ErrorKind::InvalidFileType
            | ErrorKind::Parse
            | ErrorKind::MissingColumns(_)
            | ErrorKind::InsufficientHistory { .. }
            | ErrorKind::BadRequest => 2,
            ErrorKind::MalformedValue { .. } | ErrorKind::InvalidMonthFormat(_) => 3,
            ErrorKind::NoSnapshot | ErrorKind::Io => 4,
        }
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("kind", &self.kind)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}
