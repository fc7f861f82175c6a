/*!
 * Error types for the lingobridge translation core.
 *
 * This module contains custom error types for the engine pool, the pivot
 * router, and the language detector, using the thiserror crate for ergonomic
 * error definitions.
 */

use thiserror::Error;

/// Which leg of a pivot translation a backend failure occurred on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PivotStage {
    /// Single direct call for a pair with its own model
    Direct,
    /// First leg of a pivot: source language into the hub language
    ToHub,
    /// Second leg of a pivot: hub language into the target language
    FromHub,
}

impl std::fmt::Display for PivotStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Direct => write!(f, "direct"),
            Self::ToHub => write!(f, "to-hub"),
            Self::FromHub => write!(f, "from-hub"),
        }
    }
}

/// Errors that can occur when acquiring or running a pooled engine
#[derive(Error, Debug)]
pub enum EngineError {
    /// No model resources could be resolved for the language pair
    #[error("no model available for {from} -> {to}")]
    ModelUnavailable {
        /// Source language code
        from: String,
        /// Target language code
        to: String,
    },

    /// The native engine failed to initialize
    #[error("engine initialization failed: {0}")]
    InitFailure(String),

    /// Native initialization exceeded the bounded startup timeout
    #[error("engine initialization timed out after {timeout_secs}s")]
    InitTimeout {
        /// Configured startup timeout in seconds
        timeout_secs: u64,
    },

    /// The pool has been shut down; no new engines may be created
    #[error("engine pool is shut down")]
    PoolClosed,

    /// The native backend returned an error from a translate call
    #[error("backend error: {0}")]
    Backend(String),
}

/// Errors that can occur during a pivot translation
#[derive(Error, Debug)]
pub enum TranslationError {
    /// Acquiring an engine for a leg failed
    #[error("engine error: {0}")]
    Engine(#[from] EngineError),

    /// A backend translate call failed mid-pivot; carries the failing leg
    #[error("translation failed at {stage} stage: {message}")]
    Backend {
        /// Which leg of the pivot sequence failed
        stage: PivotStage,
        /// Underlying backend error message
        message: String,
    },
}

/// Errors raised by the native language-identification backend
#[derive(Error, Debug)]
pub enum DetectorError {
    /// The native detector failed to initialize
    #[error("detector initialization failed: {0}")]
    InitFailure(String),

    /// The native detector crashed (runtime trap / out-of-bounds access)
    #[error("detector fault: {0}")]
    Fault(String),

    /// A detect call was issued against an uninitialized detector
    #[error("detector not initialized")]
    NotInitialized,
}

impl DetectorError {
    /// Whether this error means the native instance is unusable and must be
    /// discarded before the next call.
    pub fn is_fault(&self) -> bool {
        matches!(self, Self::Fault(_))
    }
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from the engine pool
    #[error("Engine error: {0}")]
    Engine(#[from] EngineError),

    /// Error from translation
    #[error("Translation error: {0}")]
    Translation(#[from] TranslationError),

    /// Error from the language detector
    #[error("Detector error: {0}")]
    Detector(#[from] DetectorError),

    /// Error in configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

// Utility functions for error conversion
impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::Config(error.to_string())
    }
}
