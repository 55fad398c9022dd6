// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Engine configuration.
//!
//! Settings are read from an optional TOML file. Every key has a default,
//! so a partial (or missing) file is fine.

use crate::error::PaintResult;
use crate::models::annotation::{BrushType, Color, PenStroke, Point, TextAnnotation};
use crate::models::effects::{PaintEffects, DEFAULT_GHOST_WINDOW};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Environment variable overriding the annotation author.
pub const USER_ENV: &str = "RVPAINT_USER";

/// Engine configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Author recorded on new annotations
    pub user: String,

    /// Maximum number of undo steps kept
    pub history_limit: usize,

    /// Effect defaults
    pub effects: EffectDefaults,

    /// Pen defaults
    pub pen: PenDefaults,

    /// Text defaults
    pub text: TextDefaults,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            user: "User".to_string(),
            history_limit: 50,
            effects: EffectDefaults::default(),
            pen: PenDefaults::default(),
            text: TextDefaults::default(),
        }
    }
}

/// Default ghost window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EffectDefaults {
    pub ghost_before: u32,
    pub ghost_after: u32,
}

impl Default for EffectDefaults {
    fn default() -> Self {
        Self {
            ghost_before: DEFAULT_GHOST_WINDOW,
            ghost_after: DEFAULT_GHOST_WINDOW,
        }
    }
}

/// Default pen style
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PenDefaults {
    pub color: [f32; 4],
    pub width: f32,
    pub brush: BrushType,
}

impl Default for PenDefaults {
    fn default() -> Self {
        Self {
            color: Color::RED.0,
            width: 3.0,
            brush: BrushType::Circle,
        }
    }
}

/// Default text style
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextDefaults {
    pub font_size: f32,
    pub font_family: String,
    pub color: [f32; 4],
}

impl Default for TextDefaults {
    fn default() -> Self {
        Self {
            font_size: 24.0,
            font_family: "sans-serif".to_string(),
            color: Color::RED.0,
        }
    }
}

impl EngineConfig {
    /// Parse a TOML document.
    pub fn from_toml_str(text: &str) -> PaintResult<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Load from a TOML file.
    pub fn from_file(path: &Path) -> PaintResult<Self> {
        let text = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&text)?;
        log::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Load from `path`, or use defaults when there is none.
    /// `RVPAINT_USER` overrides the configured user.
    pub fn load(path: Option<&Path>) -> PaintResult<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        if let Ok(user) = std::env::var(USER_ENV) {
            if !user.is_empty() {
                config.user = user;
            }
        }
        Ok(config)
    }

    /// Effects with the configured ghost window and both toggles off.
    pub fn default_effects(&self) -> PaintEffects {
        PaintEffects::with_window(self.effects.ghost_before, self.effects.ghost_after)
    }

    /// An empty stroke in the configured pen style.
    pub fn pen_stroke(&self) -> PenStroke {
        PenStroke::new(Color(self.pen.color), self.pen.width, self.pen.brush)
    }

    /// A text label in the configured text style.
    pub fn text(&self, position: Point, text: impl Into<String>) -> TextAnnotation {
        let mut label = TextAnnotation::new(position, text);
        label.font_size = self.text.font_size;
        label.font_family = self.text.font_family.clone();
        label.color = Color(self.text.color);
        label
    }
}
