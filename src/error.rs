// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Error types for the paint engine and its codecs.

use thiserror::Error;

/// Result alias used across the library.
pub type PaintResult<T> = Result<T, PaintError>;

/// Top-level library error.
#[derive(Debug, Error)]
pub enum PaintError {
    #[error("invalid import: {0}")]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Geometry(#[from] GeometryError),

    #[error(transparent)]
    Gto(#[from] GtoError),

    #[error("session file error: {0}")]
    Session(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("config error: {0}")]
    Config(#[from] toml::de::Error),
}

/// Reasons an annotation import is rejected.
///
/// Every variant is raised before the store is touched.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("not json: {0}")]
    NotJson(String),

    #[error("not an object")]
    NotAnObject,

    #[error("wrong version")]
    WrongVersion,

    #[error("wrong source")]
    WrongSource,

    #[error("missing frames")]
    MissingFrames,

    #[error("invalid frame key {0:?}")]
    InvalidFrameKey(String),

    #[error("invalid annotation on frame {frame}: {reason}")]
    InvalidAnnotation { frame: u32, reason: String },

    #[error("invalid effects: {0}")]
    InvalidEffects(String),

    #[error("frame {0} is out of range after offset")]
    FrameOutOfRange(i64),

    #[error("annotations must be placed on a frame >= 1")]
    ZeroFrame,
}

/// Coordinate conversion failures.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeometryError {
    #[error("invalid media dimensions {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },

    #[error("invalid aspect ratio {0}")]
    InvalidAspect(f64),
}

/// GTO text parse failures, with the 1-based source line.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GtoError {
    #[error("line {line}: unexpected end of input, expected {expected}")]
    UnexpectedEof { line: usize, expected: &'static str },

    #[error("line {line}: expected {expected}, found {found:?}")]
    UnexpectedToken {
        line: usize,
        expected: &'static str,
        found: String,
    },

    #[error("line {line}: unterminated string")]
    UnterminatedString { line: usize },

    #[error("line {line}: unknown property type {name:?}")]
    UnknownType { line: usize, name: String },

    #[error("line {line}: invalid {ty} value {value:?}")]
    InvalidValue {
        line: usize,
        ty: &'static str,
        value: String,
    },

    #[error("line {line}: property {name:?} has {count} values, not a multiple of width {width}")]
    WidthMismatch {
        line: usize,
        name: String,
        count: usize,
        width: usize,
    },

    #[error("missing GTOa header")]
    MissingHeader,
}
