//! Error entries reported alongside a best-effort result.
//!
//! Partial upstream failures never abort an aggregation. Instead each layer
//! returns a [`Partial`] carrying its value plus the entries it produced, and
//! the caller folds those entries into its own.

use std::fmt;

use serde::Serialize;

use crate::types::{CastMemberId, MovieId};

/// Known error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum ErrorCode {
    /// Cast information for a movie is missing or partial
    CastIncomplete = 440,
    /// A movie-details batch could not be fetched
    DetailsUnavailable = 450,
    /// A cast-details batch could not be fetched
    CastBatchUnavailable = 460,
}

impl ErrorCode {
    pub fn as_u16(self) -> u16 {
        self as u16
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_u16())
    }
}

/// A single `{errorCode, message}` entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorEntry {
    pub error_code: u16,
    pub message: String,
}

impl ErrorEntry {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            error_code: code.as_u16(),
            message: message.into(),
        }
    }

    pub fn cast_incomplete(movie_id: MovieId) -> Self {
        Self::new(
            ErrorCode::CastIncomplete,
            format!("Movie id #{movie_id} cast info is not complete"),
        )
    }

    pub fn details_unavailable(movie_id: MovieId) -> Self {
        Self::new(
            ErrorCode::DetailsUnavailable,
            format!("Movie id #{movie_id} details info is not available"),
        )
    }

    pub fn cast_batch_unavailable(cast_ids: &[CastMemberId]) -> Self {
        Self::new(
            ErrorCode::CastBatchUnavailable,
            format!("Cast id's #{cast_ids:?} details info is not complete"),
        )
    }

    pub fn is(&self, code: ErrorCode) -> bool {
        self.error_code == code.as_u16()
    }
}

/// A value together with the error entries produced while computing it.
#[derive(Debug, Clone, PartialEq)]
pub struct Partial<T> {
    pub value: T,
    pub errors: Vec<ErrorEntry>,
}

impl<T> Partial<T> {
    /// A value with no errors
    pub fn clean(value: T) -> Self {
        Self {
            value,
            errors: Vec::new(),
        }
    }

    pub fn with_errors(value: T, errors: Vec<ErrorEntry>) -> Self {
        Self { value, errors }
    }

    pub fn push_error(&mut self, error: ErrorEntry) {
        self.errors.push(error);
    }

    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }

    /// Move `other`'s errors to the end of ours and hand back its value
    pub fn absorb<U>(&mut self, other: Partial<U>) -> U {
        self.errors.extend(other.errors);
        other.value
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Partial<U> {
        Partial {
            value: f(self.value),
            errors: self.errors,
        }
    }

    pub fn into_parts(self) -> (T, Vec<ErrorEntry>) {
        (self.value, self.errors)
    }
}

impl<T: Default> Default for Partial<T> {
    fn default() -> Self {
        Self::clean(T::default())
    }
}
