// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Paint effects applied across all frames.

use serde::{Deserialize, Serialize};

/// Default number of frames ghosted on each side of the current frame.
pub const DEFAULT_GHOST_WINDOW: u32 = 3;

fn default_ghost_window() -> u32 {
    DEFAULT_GHOST_WINDOW
}

/// Hold and ghost modifiers, independent of the current frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaintEffects {
    /// Keep the last annotated frame's annotations on screen while navigating.
    #[serde(default)]
    pub hold: bool,
    /// Show faded annotations from nearby frames.
    #[serde(default)]
    pub ghost: bool,
    #[serde(default = "default_ghost_window")]
    pub ghost_before: u32,
    #[serde(default = "default_ghost_window")]
    pub ghost_after: u32,
}

impl Default for PaintEffects {
    fn default() -> Self {
        Self {
            hold: false,
            ghost: false,
            ghost_before: DEFAULT_GHOST_WINDOW,
            ghost_after: DEFAULT_GHOST_WINDOW,
        }
    }
}

impl PaintEffects {
    /// Effects with both toggles off and the given ghost window.
    pub fn with_window(ghost_before: u32, ghost_after: u32) -> Self {
        Self {
            ghost_before,
            ghost_after,
            ..Self::default()
        }
    }

    pub fn toggle_hold(&mut self) -> bool {
        self.hold = !self.hold;
        self.hold
    }

    pub fn toggle_ghost(&mut self) -> bool {
        self.ghost = !self.ghost;
        self.ghost
    }

    /// Opacity of a ghost `distance` frames away, or `None` outside the window.
    ///
    /// The nearest ghost is drawn at half opacity, falling off linearly
    /// towards the edge of the window.
    pub fn ghost_opacity(&self, distance: u32, before: bool) -> Option<f32> {
        let window = if before { self.ghost_before } else { self.ghost_after };
        if distance == 0 || distance > window {
            return None;
        }
        Some(0.5 * (1.0 - (distance - 1) as f32 / window as f32))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_from_partial_json() {
        let effects: PaintEffects = serde_json::from_str(r#"{"ghost":true}"#).unwrap();
        assert!(effects.ghost);
        assert!(!effects.hold);
        assert_eq!(effects.ghost_before, DEFAULT_GHOST_WINDOW);
        assert_eq!(effects.ghost_after, DEFAULT_GHOST_WINDOW);
    }

    #[test]
    fn test_camel_case_keys() {
        let value = serde_json::to_value(PaintEffects::with_window(5, 2)).unwrap();
        assert_eq!(value["ghostBefore"], 5);
        assert_eq!(value["ghostAfter"], 2);
    }

    #[test]
    fn test_ghost_opacity_falloff() {
        let effects = PaintEffects::with_window(4, 1);
        assert_eq!(effects.ghost_opacity(0, true), None);
        assert!((effects.ghost_opacity(1, true).unwrap() - 0.5).abs() < 1e-6);
        assert!((effects.ghost_opacity(4, true).unwrap() - 0.125).abs() < 1e-6);
        assert_eq!(effects.ghost_opacity(5, true), None);
        assert_eq!(effects.ghost_opacity(2, false), None);
    }

    #[test]
    fn test_toggles() {
        let mut effects = PaintEffects::default();
        assert!(effects.toggle_hold());
        assert!(!effects.toggle_hold());
        assert!(effects.toggle_ghost());
    }
}
