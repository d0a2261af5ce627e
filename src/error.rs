// Copyright (c) 2026 bad-antics
// Licensed under the MIT License. See LICENSE file in the project root.
// https://github.com/bad-antics/vanrakshak-rs

//! Library error type

use thiserror::Error;

use crate::alerts::AlertStatus;

/// Errors surfaced by the monitoring core
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MonitorError {
    #[error("Alert not found: {0}")]
    UnknownAlert(String),

    #[error("Illegal status transition for {id}: {from:?} -> {to:?}")]
    IllegalTransition {
        id: String,
        from: AlertStatus,
        to: AlertStatus,
    },

    #[error("Audio capture unavailable: {0}")]
    CaptureUnavailable(String),

    #[error("Audio capture is not open")]
    CaptureClosed,

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Result alias for library operations
pub type MonitorResult<T> = std::result::Result<T, MonitorError>;
