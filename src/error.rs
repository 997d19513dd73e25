//! Error types for the Tip Pool Engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for all error conditions that can occur while aggregating and
//! distributing a week of tips.

use thiserror::Error;

/// The main error type for the Tip Pool Engine.
///
/// Every fatal condition aborts the whole distribution run; the engine never
/// hands back a partially built result alongside one of these.
///
/// # Example
///
/// ```
/// use tip_pool_engine::error::EngineError;
///
/// let error = EngineError::DateFormat {
///     text: "yesterday".to_string(),
/// };
/// assert_eq!(
///     error.to_string(),
///     "Timestamp 'yesterday' does not match any of the configured formats"
/// );
/// assert_eq!(error.kind(), "DATE_FORMAT_ERROR");
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// Configuration parsed but holds a value the engine cannot use.
    #[error("Invalid configuration value '{field}': {message}")]
    InvalidConfig {
        /// The offending configuration field.
        field: String,
        /// A description of what is wrong with it.
        message: String,
    },

    /// The requested point system is not registered.
    #[error("Point system not found: {name}")]
    PointSystemNotFound {
        /// The name that was requested.
        name: String,
    },

    /// A timestamp matched none of the configured formats.
    #[error("Timestamp '{text}' does not match any of the configured formats")]
    DateFormat {
        /// The text that failed to parse.
        text: String,
    },

    /// A required column is absent from an input table.
    #[error("Missing column '{column}' in {table} table")]
    MissingColumn {
        /// The table being read ("orders" or "time entries").
        table: String,
        /// The column that was expected.
        column: String,
    },

    /// A monetary cell could not be read as a number.
    #[error("Invalid amount '{value}' in column '{column}' of {table} row {row}")]
    InvalidAmount {
        /// The table being read.
        table: String,
        /// One-based data row number.
        row: usize,
        /// The column holding the value.
        column: String,
        /// The raw cell text.
        value: String,
    },

    /// A sum of amounts is too large to represent.
    #[error("Amount overflow while totalling {context}")]
    AmountOverflow {
        /// What was being totalled when the sum overflowed.
        context: String,
    },

    /// A time entry is structurally unusable.
    #[error("Invalid time entry at row {row}: {message}")]
    InvalidTimeEntry {
        /// One-based data row number.
        row: usize,
        /// A description of what made the entry invalid.
        message: String,
    },

    /// A clock-out is still earlier than its clock-in after midnight rollover.
    #[error("Clock-out '{clock_out}' is before clock-in '{clock_in}' even after midnight rollover")]
    ShiftOutOfOrder {
        /// The clock-in text.
        clock_in: String,
        /// The clock-out text.
        clock_out: String,
    },

    /// An employee has hours but no job title anywhere in the time entries.
    #[error("No role found for employee '{employee}'")]
    UnresolvedEmployeeRole {
        /// The employee whose role could not be determined.
        employee: String,
    },

    /// An employee appears under more than one job title.
    #[error("Employee '{employee}' has conflicting roles: {}", roles.join(", "))]
    ConflictingEmployeeRole {
        /// The employee with more than one role.
        employee: String,
        /// Every distinct role seen, in order of first appearance.
        roles: Vec<String>,
    },
}

impl EngineError {
    /// Returns a stable, upper-snake-case code identifying the failure kind.
    ///
    /// Conflicting and missing roles share the `UNRESOLVED_EMPLOYEE_ROLE`
    /// kind: in both cases the employee's weight cannot be determined.
    pub fn kind(&self) -> &'static str {
        match self {
            EngineError::ConfigNotFound { .. } => "CONFIG_NOT_FOUND",
            EngineError::ConfigParseError { .. } => "CONFIG_PARSE_ERROR",
            EngineError::InvalidConfig { .. } => "INVALID_CONFIG",
            EngineError::PointSystemNotFound { .. } => "POINT_SYSTEM_NOT_FOUND",
            EngineError::DateFormat { .. } => "DATE_FORMAT_ERROR",
            EngineError::MissingColumn { .. } => "MISSING_COLUMN",
            EngineError::InvalidAmount { .. } | EngineError::AmountOverflow { .. } => {
                "INVALID_AMOUNT"
            }
            EngineError::InvalidTimeEntry { .. } | EngineError::ShiftOutOfOrder { .. } => {
                "INVALID_TIME_ENTRY"
            }
            EngineError::UnresolvedEmployeeRole { .. }
            | EngineError::ConflictingEmployeeRole { .. } => "UNRESOLVED_EMPLOYEE_ROLE",
        }
    }

    /// Returns the input value that triggered the failure, if there is one.
    pub fn offending_value(&self) -> Option<String> {
        match self {
            EngineError::ConfigNotFound { path } => Some(path.clone()),
            EngineError::ConfigParseError { path, .. } => Some(path.clone()),
            EngineError::InvalidConfig { field, .. } => Some(field.clone()),
            EngineError::PointSystemNotFound { name } => Some(name.clone()),
            EngineError::DateFormat { text } => Some(text.clone()),
            EngineError::MissingColumn { column, .. } => Some(column.clone()),
            EngineError::InvalidAmount { value, .. } => Some(value.clone()),
            EngineError::AmountOverflow { context } => Some(context.clone()),
            EngineError::InvalidTimeEntry { .. } => None,
            EngineError::ShiftOutOfOrder { clock_out, .. } => Some(clock_out.clone()),
            EngineError::UnresolvedEmployeeRole { employee }
            | EngineError::ConflictingEmployeeRole { employee, .. } => Some(employee.clone()),
        }
    }

    /// Returns true if the failure comes from the engine's own configuration
    /// rather than from the tables handed to it.
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            EngineError::ConfigNotFound { .. }
                | EngineError::ConfigParseError { .. }
                | EngineError::InvalidConfig { .. }
        )
    }
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;
