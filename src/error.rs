// ⚠️ Error Types
// Typed errors for the places where callers need to tell failures apart.
// Everything else travels as anyhow::Error with context attached.

use chrono::NaiveDate;
use thiserror::Error;

use crate::entities::{ItemId, MemberId};

// ============================================================================
// PARSE ERRORS
// ============================================================================

/// A record line that could not be decoded into a typed value.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("line {line}: unknown {record} kind `{kind}`")]
    UnknownKind {
        record: &'static str,
        kind: String,
        line: u64,
    },

    #[error("line {line}: missing field `{field}`")]
    MissingField { field: &'static str, line: u64 },

    #[error("line {line}: field `{field}` is not a valid id: `{value}`")]
    InvalidId {
        field: &'static str,
        value: String,
        line: u64,
    },

    #[error("line {line}: unknown category tag `{value}`")]
    UnknownCategoryTag { value: String, line: u64 },

    #[error("line {line}: unknown command `{value}`")]
    UnknownCommand { value: String, line: u64 },

    #[error("line {line}: date `{value}` does not match {format}")]
    InvalidDate {
        value: String,
        format: String,
        line: u64,
    },
}

// ============================================================================
// STORE ERRORS
// ============================================================================

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("duplicate item id {0}")]
    DuplicateItem(ItemId),

    #[error("duplicate member id {0}")]
    DuplicateMember(MemberId),
}

// ============================================================================
// ENGINE ERRORS
// ============================================================================

/// Errors that abort a replay. Business-rule rejections are not errors;
/// they are reported as output lines and the replay continues.
#[derive(Error, Debug)]
pub enum LendingError {
    /// A borrow dated before the last accepted borrow.
    #[error("borrow dates must be sequential: {date} precedes {watermark}")]
    NonSequentialBorrow {
        date: NaiveDate,
        watermark: NaiveDate,
    },

    #[error("command references unknown member id {0}")]
    UnknownMember(MemberId),

    #[error("command references unknown item id {0}")]
    UnknownItem(ItemId),

    #[error("failed to write output: {0}")]
    Output(#[from] std::io::Error),
}
