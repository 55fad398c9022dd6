// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Annotation data structures.
//!
//! This module defines the frame-anchored paint objects (pen strokes, text
//! and shapes) and their style properties. Geometry is kept in normalized
//! coordinates (0.0 to 1.0); conversion to the persisted unit-height
//! convention lives in [`crate::util::geometry`].

use serde::{Deserialize, Deserializer, Serialize};

/// A 2D point with normalized coordinates (0.0 to 1.0).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// RGBA colour, each channel in [0, 1]. Serialized as a four element array.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Color(pub [f32; 4]);

impl Color {
    pub const WHITE: Color = Color([1.0, 1.0, 1.0, 1.0]);
    pub const RED: Color = Color([1.0, 0.0, 0.0, 1.0]);

    pub fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self([r, g, b, a])
    }
}

impl Default for Color {
    fn default() -> Self {
        Color::RED
    }
}

/// Brush profile for pen strokes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BrushType {
    #[default]
    Circle,
    Gaussian,
}

impl BrushType {
    pub fn as_str(&self) -> &'static str {
        match self {
            BrushType::Circle => "circle",
            BrushType::Gaussian => "gaussian",
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "circle" => Some(BrushType::Circle),
            "gaussian" => Some(BrushType::Gaussian),
            _ => None,
        }
    }
}

/// How consecutive stroke segments are joined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineJoin {
    None,
    Bevel,
    Miter,
    #[default]
    Round,
}

impl LineJoin {
    /// Numeric code used by RV session files.
    pub fn code(&self) -> i64 {
        match self {
            LineJoin::None => 0,
            LineJoin::Bevel => 1,
            LineJoin::Miter => 2,
            LineJoin::Round => 3,
        }
    }

    pub fn from_code(code: i64) -> Self {
        match code {
            0 => LineJoin::None,
            1 => LineJoin::Bevel,
            2 => LineJoin::Miter,
            _ => LineJoin::Round,
        }
    }
}

/// How stroke ends are drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineCap {
    None,
    Square,
    #[default]
    Round,
}

impl LineCap {
    pub fn code(&self) -> i64 {
        match self {
            LineCap::None => 0,
            LineCap::Square => 1,
            LineCap::Round => 2,
        }
    }

    pub fn from_code(code: i64) -> Self {
        match code {
            0 => LineCap::None,
            1 => LineCap::Square,
            _ => LineCap::Round,
        }
    }
}

/// Whether a stroke paints or erases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StrokeMode {
    #[default]
    Draw,
    Erase,
}

/// Horizontal text alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlignment {
    #[default]
    Left,
    Center,
    Right,
}

impl TextAlignment {
    pub fn as_str(&self) -> &'static str {
        match self {
            TextAlignment::Left => "left",
            TextAlignment::Center => "center",
            TextAlignment::Right => "right",
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "left" => Some(TextAlignment::Left),
            "center" => Some(TextAlignment::Center),
            "right" => Some(TextAlignment::Right),
            _ => None,
        }
    }
}

/// Geometry of a shape annotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeType {
    Rectangle,
    Ellipse,
    Line,
    Arrow,
    Polygon,
}

impl ShapeType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ShapeType::Rectangle => "rectangle",
            ShapeType::Ellipse => "ellipse",
            ShapeType::Line => "line",
            ShapeType::Arrow => "arrow",
            ShapeType::Polygon => "polygon",
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "rectangle" => Some(ShapeType::Rectangle),
            "ellipse" => Some(ShapeType::Ellipse),
            "line" => Some(ShapeType::Line),
            "arrow" => Some(ShapeType::Arrow),
            "polygon" => Some(ShapeType::Polygon),
            _ => None,
        }
    }

    /// Check if the shape outline is closed.
    pub fn is_closed(&self) -> bool {
        matches!(
            self,
            ShapeType::Rectangle | ShapeType::Ellipse | ShapeType::Polygon
        )
    }
}

fn default_pen_width() -> f32 {
    3.0
}

fn default_font_size() -> f32 {
    24.0
}

fn default_font_family() -> String {
    "sans-serif".to_string()
}

fn default_one() -> f32 {
    1.0
}

fn default_duration() -> u32 {
    1
}

/// A freehand pen stroke.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PenStroke {
    #[serde(default)]
    pub points: Vec<Point>,
    #[serde(default)]
    pub color: Color,
    /// Width in display pixels.
    #[serde(default = "default_pen_width")]
    pub width: f32,
    #[serde(default)]
    pub brush: BrushType,
    #[serde(default)]
    pub join: LineJoin,
    #[serde(default)]
    pub cap: LineCap,
    #[serde(default)]
    pub splat: bool,
    #[serde(default)]
    pub mode: StrokeMode,
}

impl PenStroke {
    /// Create an empty stroke with the given style.
    pub fn new(color: Color, width: f32, brush: BrushType) -> Self {
        Self {
            points: Vec::new(),
            color,
            width,
            brush,
            join: LineJoin::default(),
            cap: LineCap::default(),
            splat: false,
            mode: StrokeMode::default(),
        }
    }

    /// Add a point to the stroke.
    pub fn add_point(&mut self, point: Point) {
        self.points.push(point);
    }
}

/// A text label placed on the frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextAnnotation {
    pub position: Point,
    pub text: String,
    #[serde(default = "default_font_size")]
    pub font_size: f32,
    #[serde(default = "default_font_family")]
    pub font_family: String,
    #[serde(default)]
    pub color: Color,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_color: Option<Color>,
    #[serde(default)]
    pub bold: bool,
    #[serde(default)]
    pub italic: bool,
    #[serde(default)]
    pub underline: bool,
    #[serde(default)]
    pub alignment: TextAlignment,
    #[serde(default)]
    pub rotation: f32,
    #[serde(default = "default_one")]
    pub scale: f32,
    #[serde(default = "default_one")]
    pub spacing: f32,
}

impl TextAnnotation {
    pub fn new(position: Point, text: impl Into<String>) -> Self {
        Self {
            position,
            text: text.into(),
            font_size: default_font_size(),
            font_family: default_font_family(),
            color: Color::default(),
            background_color: None,
            bold: false,
            italic: false,
            underline: false,
            alignment: TextAlignment::default(),
            rotation: 0.0,
            scale: 1.0,
            spacing: 1.0,
        }
    }
}

/// A geometric shape spanning `start_point` to `end_point`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShapeAnnotation {
    pub shape_type: ShapeType,
    pub start_point: Point,
    pub end_point: Point,
    /// Vertices, only meaningful for polygons.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub points: Vec<Point>,
    #[serde(default)]
    pub stroke_color: Color,
    #[serde(default = "default_pen_width")]
    pub stroke_width: f32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fill_color: Option<Color>,
    #[serde(default)]
    pub rotation: f32,
}

impl ShapeAnnotation {
    pub fn new(shape_type: ShapeType, start_point: Point, end_point: Point) -> Self {
        Self {
            shape_type,
            start_point,
            end_point,
            points: Vec::new(),
            stroke_color: Color::default(),
            stroke_width: default_pen_width(),
            fill_color: None,
            rotation: 0.0,
        }
    }
}

/// Type-specific payload of an annotation, tagged by `type`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum AnnotationKind {
    Pen(PenStroke),
    Text(TextAnnotation),
    Shape(ShapeAnnotation),
}

impl AnnotationKind {
    /// The `type` tag as written in exports.
    pub fn name(&self) -> &'static str {
        match self {
            AnnotationKind::Pen(_) => "pen",
            AnnotationKind::Text(_) => "text",
            AnnotationKind::Shape(_) => "shape",
        }
    }
}

/// A paint object anchored to a frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Annotation {
    /// Store-assigned identifier. Empty until the annotation is inserted.
    #[serde(default, deserialize_with = "deserialize_id")]
    pub id: String,
    #[serde(default)]
    pub frame: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_frame: Option<u32>,
    /// Number of frames the annotation stays visible.
    #[serde(default = "default_duration")]
    pub duration: u32,
    #[serde(default)]
    pub user: String,
    #[serde(flatten)]
    pub kind: AnnotationKind,
}

impl Annotation {
    /// Create an annotation on `frame` with no id assigned yet.
    pub fn new(frame: u32, user: impl Into<String>, kind: AnnotationKind) -> Self {
        Self {
            id: String::new(),
            frame,
            start_frame: Some(frame),
            duration: default_duration(),
            user: user.into(),
            kind,
        }
    }

    pub fn pen(frame: u32, user: impl Into<String>, stroke: PenStroke) -> Self {
        Self::new(frame, user, AnnotationKind::Pen(stroke))
    }

    pub fn text(frame: u32, user: impl Into<String>, text: TextAnnotation) -> Self {
        Self::new(frame, user, AnnotationKind::Text(text))
    }

    pub fn shape(frame: u32, user: impl Into<String>, shape: ShapeAnnotation) -> Self {
        Self::new(frame, user, AnnotationKind::Shape(shape))
    }

    /// Builder-style duration override.
    pub fn with_duration(mut self, duration: u32) -> Self {
        self.duration = duration.max(1);
        self
    }

    pub fn kind_name(&self) -> &'static str {
        self.kind.name()
    }

    /// First frame of visibility; defaults to `frame`.
    pub fn start_frame(&self) -> u32 {
        self.start_frame.unwrap_or(self.frame)
    }

    /// Check whether the annotation's visibility span covers `frame`.
    pub fn covers(&self, frame: u32) -> bool {
        let start = self.start_frame();
        frame >= start && frame < start.saturating_add(self.duration.max(1))
    }
}

fn deserialize_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Number(u64),
    }

    Ok(match Option::<RawId>::deserialize(deserializer)? {
        Some(RawId::Text(id)) => id,
        Some(RawId::Number(id)) => id.to_string(),
        None => String::new(),
    })
}
