use thiserror::Error;

/// Result type alias using ExError
pub type Result<T> = std::result::Result<T, ExError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// Each kind maps to a stable error code that tests and callers can match on
/// without parsing messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExErrorKind {
    /// A generator cannot produce a value satisfying its declared constraint
    Format,
    /// A statement of a fixture operation failed against the store
    Fixture,
    /// Two snapshots being compared do not cover the same tables or columns
    SnapshotMismatch,
    /// Malformed caller input (bad operation shape, bad table spec, ...)
    InvalidInput,

    // Integration/IO
    Persistence,
    Io,
    Config,
    Serialization,

    // Internal
    Internal,
}

impl ExErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ExErrorKind::Format => "ERR_FORMAT",
            ExErrorKind::Fixture => "ERR_FIXTURE",
            ExErrorKind::SnapshotMismatch => "ERR_SNAPSHOT_MISMATCH",
            ExErrorKind::InvalidInput => "ERR_INVALID_INPUT",
            ExErrorKind::Persistence => "ERR_PERSISTENCE",
            ExErrorKind::Io => "ERR_IO",
            ExErrorKind::Config => "ERR_CONFIG",
            ExErrorKind::Serialization => "ERR_SERIALIZATION",
            ExErrorKind::Internal => "ERR_INTERNAL",
        }
    }
}

/// Canonical structured error type
///
/// Carries a classification kind plus the context needed to diagnose a failed
/// fixture or snapshot step: the operation name, the table involved and, for
/// fixture failures, the position of the failing statement.
#[derive(Debug, Clone)]
pub struct ExError {
    kind: ExErrorKind,
    op: Option<String>,
    table: Option<String>,
    statement_index: Option<usize>,
    statement: Option<String>,
    message: String,
    source: Option<Box<ExError>>,
}

impl ExError {
    /// Create a new error with the specified kind
    pub fn new(kind: ExErrorKind) -> Self {
        Self {
            kind,
            op: None,
            table: None,
            statement_index: None,
            statement: None,
            message: String::new(),
            source: None,
        }
    }

    /// Add operation context
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Add table context
    pub fn with_table(mut self, table: impl Into<String>) -> Self {
        self.table = Some(table.into());
        self
    }

    /// Add the zero-based position of the failing statement
    pub fn with_statement_index(mut self, index: usize) -> Self {
        self.statement_index = Some(index);
        self
    }

    /// Add the text of the failing statement
    pub fn with_statement(mut self, sql: impl Into<String>) -> Self {
        self.statement = Some(sql.into());
        self
    }

    /// Add custom message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Add source error
    pub fn with_source(mut self, source: ExError) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Get the error kind
    pub fn kind(&self) -> ExErrorKind {
        self.kind
    }

    /// Get the stable error code
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    /// Get the operation context, if any
    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    /// Get the table context, if any
    pub fn table(&self) -> Option<&str> {
        self.table.as_deref()
    }

    /// Get the failing statement position, if any
    pub fn statement_index(&self) -> Option<usize> {
        self.statement_index
    }

    /// Get the failing statement text, if any
    pub fn statement(&self) -> Option<&str> {
        self.statement.as_deref()
    }

    /// Get the error message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Get the source error, if any
    pub fn source_error(&self) -> Option<&ExError> {
        self.source.as_deref()
    }
}

impl std::fmt::Display for ExError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.code())?;
        if let Some(op) = &self.op {
            write!(f, " in operation '{}'", op)?;
        }
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        if let Some(table) = &self.table {
            write!(f, " (table: {})", table)?;
        }
        if let Some(index) = self.statement_index {
            write!(f, " (statement_index: {})", index)?;
        }
        if let Some(sql) = &self.statement {
            write!(f, " (statement: {})", sql)?;
        }
        if let Some(source) = &self.source {
            write!(f, " caused by {}", source)?;
        }
        Ok(())
    }
}

impl std::error::Error for ExError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_deref()
            .map(|e| e as &(dyn std::error::Error + 'static))
    }
}

// ========== End Error Facility ==========

/// Failure raised by the change assertion surface.
///
/// Each variant carries the expected and actual values plus the rendered
/// summary of every change in the diff under test, so a failing test shows
/// the full before/after context rather than a bare boolean.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AssertionFailure {
    #[error("expected {expected} change(s) but found {actual}\n\n{context}")]
    ChangeCount {
        expected: usize,
        actual: usize,
        context: String,
    },

    #[error("expected a change at index {index} on table '{table}' but it has {available}\n\n{context}")]
    ChangeIndexOutOfRange {
        table: String,
        index: usize,
        available: usize,
        context: String,
    },

    #[error("no change on table '{table}' has primary key {primary_key}\n\n{context}")]
    NoChangeForPrimaryKey {
        table: String,
        primary_key: String,
        context: String,
    },

    #[error("expected change {primary_key} on '{table}' to be a {expected} but it is a {actual}\n\n{context}")]
    ChangeKind {
        table: String,
        primary_key: String,
        expected: String,
        actual: String,
        context: String,
    },

    #[error("change {primary_key} on '{table}' has no column '{column}'\n\n{context}")]
    UnknownColumn {
        table: String,
        primary_key: String,
        column: String,
        context: String,
    },

    #[error("expected touched columns {expected:?} on '{table}' {primary_key} but found {actual:?}\n\n{context}")]
    TouchedColumns {
        table: String,
        primary_key: String,
        expected: Vec<String>,
        actual: Vec<String>,
        context: String,
    },

    #[error("column '{column}' of '{table}' {primary_key}: expected {expected} but was {actual}\n\n{context}")]
    ColumnDelta {
        table: String,
        primary_key: String,
        column: String,
        expected: String,
        actual: String,
        context: String,
    },
}
