// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! rvpaint - frame-indexed paint engine for media review sessions.
//!
//! Annotations (pen strokes, text and shapes) are stored per frame with
//! undo/redo, hold and ghost effects, and can be exchanged as `openrv-web`
//! JSON envelopes or RV session files.

pub mod config;
pub mod error;
pub mod io;
pub mod models;
pub mod util;

pub use config::EngineConfig;
pub use error::{PaintError, PaintResult, ValidationError};
pub use models::annotation::{Annotation, AnnotationKind};
pub use models::effects::PaintEffects;
pub use models::session::Session;
pub use models::store::AnnotationStore;
