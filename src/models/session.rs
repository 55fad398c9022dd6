// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Review session state.
//!
//! This module groups the loaded media, playback settings, viewer state and
//! paint store that make up an RV session file.

use super::store::AnnotationStore;
use crate::config::EngineConfig;
use crate::util::geometry::AspectRatio;
use serde::{Deserialize, Serialize};

/// The media being reviewed.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MediaSource {
    pub path: String,
    pub width: u32,
    pub height: u32,
}

impl MediaSource {
    pub fn new(path: impl Into<String>, width: u32, height: u32) -> Self {
        Self {
            path: path.into(),
            width,
            height,
        }
    }

    /// Aspect ratio used for coordinate conversion. Unknown dimensions fall
    /// back to square.
    pub fn aspect(&self) -> AspectRatio {
        AspectRatio::or_square(self.width, self.height)
    }
}

/// Playback range and position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Playback {
    pub start: u32,
    pub end: u32,
    pub fps: f32,
    pub frame: u32,
}

impl Default for Playback {
    fn default() -> Self {
        Self {
            start: 1,
            end: 1,
            fps: 24.0,
            frame: 1,
        }
    }
}

/// Which channels the viewer displays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChannelMode {
    #[default]
    Rgb,
    Red,
    Green,
    Blue,
    Alpha,
    Luminance,
}

impl ChannelMode {
    /// RV channel flood code.
    pub fn flood_code(&self) -> i64 {
        match self {
            ChannelMode::Rgb => 0,
            ChannelMode::Red => 1,
            ChannelMode::Green => 2,
            ChannelMode::Blue => 3,
            ChannelMode::Alpha => 4,
            ChannelMode::Luminance => 5,
        }
    }

    pub fn from_flood_code(code: i64) -> Option<Self> {
        match code {
            0 => Some(ChannelMode::Rgb),
            1 => Some(ChannelMode::Red),
            2 => Some(ChannelMode::Green),
            3 => Some(ChannelMode::Blue),
            4 => Some(ChannelMode::Alpha),
            5 => Some(ChannelMode::Luminance),
            _ => None,
        }
    }
}

/// Complete session state for RV session files.
#[derive(Debug, Clone)]
pub struct Session {
    pub media: MediaSource,
    pub playback: Playback,
    pub channel_mode: ChannelMode,
    pub paint: AnnotationStore,
}

impl Session {
    /// Create a session for `media` with an empty paint store.
    pub fn new(media: MediaSource, config: &EngineConfig) -> Self {
        Self {
            media,
            playback: Playback::default(),
            channel_mode: ChannelMode::default(),
            paint: AnnotationStore::with_config(config),
        }
    }

    /// Widen the playback range to cover every annotated frame.
    pub fn fit_range_to_annotations(&mut self) {
        let mut frames = self.paint.annotated_frames();
        if let Some(first) = frames.next() {
            let last = frames.last().unwrap_or(first);
            self.playback.start = self.playback.start.min(first);
            self.playback.end = self.playback.end.max(last);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::annotation::{Annotation, Point, TextAnnotation};

    #[test]
    fn test_flood_codes_round_trip() {
        for mode in [
            ChannelMode::Rgb,
            ChannelMode::Red,
            ChannelMode::Green,
            ChannelMode::Blue,
            ChannelMode::Alpha,
            ChannelMode::Luminance,
        ] {
            assert_eq!(ChannelMode::from_flood_code(mode.flood_code()), Some(mode));
        }
        assert_eq!(ChannelMode::from_flood_code(9), None);
    }

    #[test]
    fn test_fit_range() {
        let mut session = Session::new(MediaSource::new("a.exr", 10, 10), &EngineConfig::default());
        for frame in [5, 40] {
            session
                .paint
                .add_annotation(Annotation::text(frame, "u", TextAnnotation::new(Point::default(), "x")))
                .unwrap();
        }
        session.fit_range_to_annotations();
        assert_eq!(session.playback.start, 1);
        assert_eq!(session.playback.end, 40);
    }

    #[test]
    fn test_missing_dimensions_use_square_aspect() {
        let media = MediaSource::new("missing.mov", 0, 0);
        assert_eq!(media.aspect(), AspectRatio::SQUARE);
    }
}
