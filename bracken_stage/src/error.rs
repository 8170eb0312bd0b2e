// Copyright 2025 the Bracken Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Shared error type for the Bracken workspace.
//!
//! Invariant violations (inconsistent parent links, attach cycles) are caller
//! bugs and panic instead of surfacing here; this type covers the expected
//! negative results: lookups that miss and operations a widget refuses.

use core::fmt;

/// Errors reported by stage and widget operations.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[non_exhaustive]
pub enum Error {
    /// The widget (or keyed entry) does not exist, is no longer alive, or is
    /// currently unavailable because its own handler is running.
    NotFound,
    /// Typed widget access found a widget of a different concrete type.
    TypeMismatch,
    /// The operation is not supported by this widget.
    Unsupported(&'static str),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound => write!(f, "widget or entry not found"),
            Self::TypeMismatch => write!(f, "widget has a different concrete type"),
            Self::Unsupported(what) => write!(f, "unsupported operation: {what}"),
        }
    }
}

impl core::error::Error for Error {}

/// Result alias used across the workspace.
pub type Result<T> = core::result::Result<T, Error>;
