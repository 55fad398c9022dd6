// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! RV session file (`.rv`) export and import.
//!
//! A session is written as a GTO document with an `RVSession` object
//! (playback), an `RVFileSource` (media reference and size), an
//! `RVDisplayColor` (channel view) and an `RVPaint` object holding one
//! component per annotation plus a `frame:<N>` component listing the draw
//! order of each annotated frame. Paint geometry is written in unit-height
//! coordinates with pen widths and font sizes scaled down by the fixed
//! session file factors.

use super::gto::{GtoComponent, GtoDocument, GtoObject};
use crate::config::EngineConfig;
use crate::error::{PaintError, PaintResult};
use crate::models::annotation::{
    Annotation, AnnotationKind, BrushType, Color, LineCap, LineJoin, PenStroke, Point,
    ShapeAnnotation, ShapeType, StrokeMode, TextAlignment, TextAnnotation,
};
use crate::models::effects::PaintEffects;
use crate::models::session::{ChannelMode, MediaSource, Playback, Session};
use crate::util::geometry::{
    font_size_from_stored, font_size_to_stored, normalized_to_unit_height, pen_width_from_stored,
    pen_width_to_stored, unit_height_to_normalized, AspectRatio,
};
use std::collections::HashSet;
use std::path::Path;

const SESSION_OBJECT: &str = "rv";
const SOURCE_OBJECT: &str = "sourceGroup000000_source";
const PAINT_OBJECT: &str = "sourceGroup000000_paint";
const DISPLAY_OBJECT: &str = "defaultOutputGroup_displayColor";

/// Build the GTO document for `session`.
pub fn to_gto(session: &Session) -> GtoDocument {
    let aspect = session.media.aspect();
    let mut doc = GtoDocument::new();

    doc.push(
        GtoObject::new(SESSION_OBJECT, "RVSession", 4).with_component(
            GtoComponent::new("session")
                .with_string("viewNode", "defaultSequence")
                .with_ints(
                    "range",
                    2,
                    vec![
                        i64::from(session.playback.start),
                        i64::from(session.playback.end),
                    ],
                )
                .with_float("fps", f64::from(session.playback.fps))
                .with_int("frame", i64::from(session.playback.frame)),
        ),
    );

    doc.push(
        GtoObject::new(SOURCE_OBJECT, "RVFileSource", 1)
            .with_component(GtoComponent::new("media").with_string("movie", &session.media.path))
            .with_component(GtoComponent::new("proxy").with_ints(
                "size",
                2,
                vec![
                    i64::from(session.media.width),
                    i64::from(session.media.height),
                ],
            )),
    );

    doc.push(
        GtoObject::new(DISPLAY_OBJECT, "RVDisplayColor", 1).with_component(
            GtoComponent::new("color")
                .with_string("channelOrder", "RGBA")
                .with_int("channelFlood", session.channel_mode.flood_code()),
        ),
    );

    doc.push(paint_object(session, aspect));
    doc
}

fn paint_object(session: &Session, aspect: AspectRatio) -> GtoObject {
    let store = &session.paint;
    let effects = store.effects();
    let mut paint = GtoObject::new(PAINT_OBJECT, "RVPaint", 3).with_component(
        GtoComponent::new("paint")
            .with_int("nextId", next_numeric_id(store.iter()))
            .with_int("nextAnnotationId", 0)
            .with_int("show", 1)
            .with_int("ghost", i64::from(effects.ghost))
            .with_int("hold", i64::from(effects.hold))
            .with_int("ghostBefore", i64::from(effects.ghost_before))
            .with_int("ghostAfter", i64::from(effects.ghost_after))
            .with_strings("exclude", Vec::new())
            .with_strings("include", Vec::new()),
    );

    for frame in store.annotated_frames() {
        let mut order = Vec::new();
        for annotation in store.annotations_for_frame(frame) {
            let name = component_name(annotation, frame);
            paint.components.push(annotation_component(&name, annotation, aspect));
            order.push(name);
        }
        paint
            .components
            .push(GtoComponent::new(format!("frame:{}", frame)).with_strings("order", order));
    }
    paint
}

fn next_numeric_id<'a>(annotations: impl Iterator<Item = &'a Annotation>) -> i64 {
    annotations
        .filter_map(|a| a.id.parse::<i64>().ok())
        .max()
        .map_or(1, |max| max.saturating_add(1))
}

/// Component names are `<type>:<id>:<frame>:<user>`; colons inside the id
/// would break the split, so they are replaced.
fn component_name(annotation: &Annotation, frame: u32) -> String {
    format!(
        "{}:{}:{}:{}",
        annotation.kind_name(),
        annotation.id.replace(':', "_"),
        frame,
        annotation.user
    )
}

fn unit_points(points: &[Point], aspect: AspectRatio) -> Vec<f64> {
    points
        .iter()
        .flat_map(|p| {
            let u = normalized_to_unit_height(*p, aspect);
            [u.x, u.y]
        })
        .collect()
}

fn color_values(color: &Color) -> Vec<f64> {
    color.0.iter().map(|c| f64::from(*c)).collect()
}

fn annotation_component(name: &str, annotation: &Annotation, aspect: AspectRatio) -> GtoComponent {
    let component = GtoComponent::new(name);
    let component = match &annotation.kind {
        AnnotationKind::Pen(pen) => component
            .with_floats("color", 4, color_values(&pen.color))
            .with_float("width", f64::from(pen_width_to_stored(pen.width)))
            .with_string("brush", pen.brush.as_str())
            .with_floats("points", 2, unit_points(&pen.points, aspect))
            .with_int("debug", 0)
            .with_int("join", pen.join.code())
            .with_int("cap", pen.cap.code())
            .with_int("splat", i64::from(pen.splat))
            .with_int("mode", i64::from(pen.mode == StrokeMode::Erase)),
        AnnotationKind::Text(text) => {
            let component = component
                .with_floats("position", 2, unit_points(&[text.position], aspect))
                .with_floats("color", 4, color_values(&text.color))
                .with_float("spacing", f64::from(text.spacing))
                .with_float("size", f64::from(font_size_to_stored(text.font_size)))
                .with_float("scale", f64::from(text.scale))
                .with_float("rotation", f64::from(text.rotation))
                .with_string("font", &text.font_family)
                .with_string("text", &text.text)
                .with_int("debug", 0)
                .with_int("bold", i64::from(text.bold))
                .with_int("italic", i64::from(text.italic))
                .with_int("underline", i64::from(text.underline))
                .with_string("alignment", text.alignment.as_str());
            match &text.background_color {
                Some(bg) => component.with_floats("backgroundColor", 4, color_values(bg)),
                None => component,
            }
        }
        AnnotationKind::Shape(shape) => {
            let component = component
                .with_string("shapeType", shape.shape_type.as_str())
                .with_floats("startPoint", 2, unit_points(&[shape.start_point], aspect))
                .with_floats("endPoint", 2, unit_points(&[shape.end_point], aspect))
                .with_floats("points", 2, unit_points(&shape.points, aspect))
                .with_floats("strokeColor", 4, color_values(&shape.stroke_color))
                .with_float("strokeWidth", f64::from(pen_width_to_stored(shape.stroke_width)))
                .with_float("rotation", f64::from(shape.rotation));
            match &shape.fill_color {
                Some(fill) => component.with_floats("fillColor", 4, color_values(fill)),
                None => component,
            }
        }
    };
    component
        .with_int("startFrame", i64::from(annotation.start_frame()))
        .with_int("duration", i64::from(annotation.duration))
}

/// Render `session` as GTO text.
pub fn to_rv_string(session: &Session) -> String {
    to_gto(session).to_text()
}

/// Write `session` to an `.rv` file.
pub fn write_rv(session: &Session, path: &Path) -> PaintResult<()> {
    std::fs::write(path, to_rv_string(session))?;
    log::info!(
        "Wrote session with {} annotations to {}",
        session.paint.len(),
        path.display()
    );
    Ok(())
}

/// Rebuild a session from a parsed GTO document.
pub fn from_gto(doc: &GtoDocument, config: &EngineConfig) -> PaintResult<Session> {
    let media = match doc.find_protocol("RVFileSource") {
        Some(source) => {
            let path = source
                .component("media")
                .and_then(|c| c.string("movie"))
                .unwrap_or_default()
                .to_string();
            let size = source
                .component("proxy")
                .and_then(|c| c.ints("size"))
                .unwrap_or(&[]);
            let dimension = |i: usize| size.get(i).and_then(|v| u32::try_from(*v).ok()).unwrap_or(0);
            MediaSource::new(path, dimension(0), dimension(1))
        }
        None => {
            log::warn!("Session has no RVFileSource, assuming square media");
            MediaSource::default()
        }
    };

    let mut session = Session::new(media, config);

    if let Some(component) = doc
        .find_protocol("RVSession")
        .and_then(|o| o.component("session"))
    {
        session.playback = read_playback(component);
    }

    if let Some(flood) = doc
        .find_protocol("RVDisplayColor")
        .and_then(|o| o.component("color"))
        .and_then(|c| c.int("channelFlood"))
    {
        session.channel_mode = ChannelMode::from_flood_code(flood).unwrap_or_else(|| {
            log::warn!("Unknown channel flood {}, using RGB", flood);
            ChannelMode::Rgb
        });
    }

    if let Some(paint) = doc.find_protocol("RVPaint") {
        let aspect = session.media.aspect();
        let effects = read_effects(paint, config);
        let annotations = read_annotations(paint, aspect)?;
        session.paint.load_from_annotations(annotations, Some(effects));
    }

    Ok(session)
}

/// Parse an `.rv` document from text.
pub fn parse_rv(text: &str, config: &EngineConfig) -> PaintResult<Session> {
    let doc = GtoDocument::parse(text)?;
    from_gto(&doc, config)
}

/// Read an `.rv` file.
pub fn read_rv(path: &Path, config: &EngineConfig) -> PaintResult<Session> {
    let text = std::fs::read_to_string(path)?;
    let session = parse_rv(&text, config)?;
    log::info!(
        "Read session with {} annotations from {}",
        session.paint.len(),
        path.display()
    );
    Ok(session)
}

fn read_playback(component: &GtoComponent) -> Playback {
    let defaults = Playback::default();
    let range = component.ints("range").unwrap_or(&[]);
    let frame_at = |value: Option<i64>, fallback: u32| {
        value
            .and_then(|v| u32::try_from(v).ok())
            .filter(|v| *v >= 1)
            .unwrap_or(fallback)
    };
    Playback {
        start: frame_at(range.first().copied(), defaults.start),
        end: frame_at(range.get(1).copied(), defaults.end),
        fps: component.float("fps").map_or(defaults.fps, |f| f as f32),
        frame: frame_at(component.int("frame"), defaults.frame),
    }
}

fn read_effects(paint: &GtoObject, config: &EngineConfig) -> PaintEffects {
    let mut effects = config.default_effects();
    if let Some(component) = paint.component("paint") {
        let window = |name: &str, fallback: u32| {
            component
                .int(name)
                .and_then(|v| u32::try_from(v).ok())
                .unwrap_or(fallback)
        };
        effects.ghost = component.int("ghost").unwrap_or(0) != 0;
        effects.hold = component.int("hold").unwrap_or(0) != 0;
        effects.ghost_before = window("ghostBefore", effects.ghost_before);
        effects.ghost_after = window("ghostAfter", effects.ghost_after);
    }
    effects
}

/// Collect annotations in draw order: components listed by `frame:<N>`
/// order lists first, then any remaining paint components.
fn read_annotations(paint: &GtoObject, aspect: AspectRatio) -> PaintResult<Vec<Annotation>> {
    let mut ordered: Vec<&str> = Vec::new();
    let mut seen: HashSet<&str> = HashSet::new();
    for component in &paint.components {
        if component.name.starts_with("frame:") {
            for name in component.strings("order").unwrap_or(&[]) {
                if seen.insert(name.as_str()) {
                    ordered.push(name.as_str());
                }
            }
        }
    }
    for component in &paint.components {
        if is_annotation_component(&component.name) && seen.insert(component.name.as_str()) {
            ordered.push(component.name.as_str());
        }
    }

    let mut annotations = Vec::with_capacity(ordered.len());
    for name in ordered {
        match paint.component(name) {
            Some(component) => annotations.push(read_annotation(component, aspect)?),
            None => log::warn!("Frame order names missing paint component {:?}", name),
        }
    }
    Ok(annotations)
}

fn is_annotation_component(name: &str) -> bool {
    ["pen:", "text:", "shape:"]
        .iter()
        .any(|prefix| name.starts_with(prefix))
}

fn read_annotation(component: &GtoComponent, aspect: AspectRatio) -> PaintResult<Annotation> {
    let mut parts = component.name.splitn(4, ':');
    let kind = parts.next().unwrap_or_default();
    let id = parts.next().unwrap_or_default().to_string();
    let frame = parts
        .next()
        .and_then(|f| f.parse::<u32>().ok())
        .filter(|f| *f >= 1)
        .ok_or_else(|| {
            PaintError::Session(format!("paint component {:?} has no frame", component.name))
        })?;
    let user = parts.next().unwrap_or_default().to_string();

    let kind = match kind {
        "pen" => AnnotationKind::Pen(read_pen(component, aspect)),
        "text" => AnnotationKind::Text(read_text(component, aspect)),
        "shape" => AnnotationKind::Shape(read_shape(component, aspect)?),
        other => {
            return Err(PaintError::Session(format!(
                "unsupported paint component type {:?}",
                other
            )))
        }
    };

    let start_frame = component
        .int("startFrame")
        .and_then(|v| u32::try_from(v).ok())
        .filter(|v| *v >= 1)
        .unwrap_or(frame);
    let duration = component
        .int("duration")
        .and_then(|v| u32::try_from(v).ok())
        .unwrap_or(1)
        .max(1);

    Ok(Annotation {
        id,
        frame,
        start_frame: Some(start_frame),
        duration,
        user,
        kind,
    })
}

fn read_points(component: &GtoComponent, name: &str, aspect: AspectRatio) -> Vec<Point> {
    component
        .floats(name)
        .unwrap_or_default()
        .chunks_exact(2)
        .map(|xy| unit_height_to_normalized(Point::new(xy[0], xy[1]), aspect))
        .collect()
}

fn read_point(component: &GtoComponent, name: &str, aspect: AspectRatio) -> Point {
    read_points(component, name, aspect)
        .into_iter()
        .next()
        .unwrap_or_else(|| unit_height_to_normalized(Point::default(), aspect))
}

fn read_color(component: &GtoComponent, name: &str) -> Option<Color> {
    let values = component.floats(name)?;
    match values.as_slice() {
        [r, g, b, a, ..] => Some(Color([*r as f32, *g as f32, *b as f32, *a as f32])),
        _ => None,
    }
}

fn read_f32(component: &GtoComponent, name: &str, fallback: f32) -> f32 {
    component.float(name).map_or(fallback, |v| v as f32)
}

fn read_flag(component: &GtoComponent, name: &str) -> bool {
    component.int(name).unwrap_or(0) != 0
}

fn read_pen(component: &GtoComponent, aspect: AspectRatio) -> PenStroke {
    let brush = component
        .string("brush")
        .and_then(BrushType::parse)
        .unwrap_or_default();
    let mut stroke = PenStroke::new(
        read_color(component, "color").unwrap_or_default(),
        pen_width_from_stored(read_f32(component, "width", pen_width_to_stored(3.0))),
        brush,
    );
    stroke.points = read_points(component, "points", aspect);
    stroke.join = component.int("join").map(LineJoin::from_code).unwrap_or_default();
    stroke.cap = component.int("cap").map(LineCap::from_code).unwrap_or_default();
    stroke.splat = read_flag(component, "splat");
    stroke.mode = if read_flag(component, "mode") {
        StrokeMode::Erase
    } else {
        StrokeMode::Draw
    };
    stroke
}

fn read_text(component: &GtoComponent, aspect: AspectRatio) -> TextAnnotation {
    let mut text = TextAnnotation::new(
        read_point(component, "position", aspect),
        component.string("text").unwrap_or_default(),
    );
    text.color = read_color(component, "color").unwrap_or_default();
    text.background_color = read_color(component, "backgroundColor");
    text.font_size = font_size_from_stored(read_f32(
        component,
        "size",
        font_size_to_stored(text.font_size),
    ));
    if let Some(font) = component.string("font").filter(|f| !f.is_empty()) {
        text.font_family = font.to_string();
    }
    text.spacing = read_f32(component, "spacing", text.spacing);
    text.scale = read_f32(component, "scale", text.scale);
    text.rotation = read_f32(component, "rotation", text.rotation);
    text.bold = read_flag(component, "bold");
    text.italic = read_flag(component, "italic");
    text.underline = read_flag(component, "underline");
    text.alignment = component
        .string("alignment")
        .and_then(TextAlignment::parse)
        .unwrap_or_default();
    text
}

fn read_shape(component: &GtoComponent, aspect: AspectRatio) -> PaintResult<ShapeAnnotation> {
    let shape_type = component
        .string("shapeType")
        .and_then(ShapeType::parse)
        .ok_or_else(|| {
            PaintError::Session(format!("shape component {:?} has no shapeType", component.name))
        })?;
    let mut shape = ShapeAnnotation::new(
        shape_type,
        read_point(component, "startPoint", aspect),
        read_point(component, "endPoint", aspect),
    );
    shape.points = read_points(component, "points", aspect);
    shape.stroke_color = read_color(component, "strokeColor").unwrap_or_default();
    shape.stroke_width = pen_width_from_stored(read_f32(
        component,
        "strokeWidth",
        pen_width_to_stored(shape.stroke_width),
    ));
    shape.fill_color = read_color(component, "fillColor");
    shape.rotation = read_f32(component, "rotation", 0.0);
    Ok(shape)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::store::AnnotationStore;

    fn close(a: f64, b: f64, eps: f64) -> bool {
        (a - b).abs() < eps
    }

    fn square_session() -> Session {
        Session::new(MediaSource::new("/media/square.png", 1, 1), &EngineConfig::default())
    }

    fn pen_at(frame: u32, points: &[(f64, f64)]) -> Annotation {
        let mut stroke = PenStroke::new(Color::rgba(0.0, 1.0, 0.0, 1.0), 5.0, BrushType::Circle);
        for (x, y) in points {
            stroke.add_point(Point::new(*x, *y));
        }
        Annotation::pen(frame, "User", stroke)
    }

    const UNIT_HEIGHT_SESSION: &str = r#"GTOa (4)

rv : RVSession (4)
{
    session
    {
        int[2] range = [ [ 1 10 ] ]
        float fps = 24
        int frame = 1
    }
}

sourceGroup000000_source : RVFileSource (1)
{
    media
    {
        string movie = "square.png"
    }

    proxy
    {
        int[2] size = [ [ 1 1 ] ]
    }
}

sourceGroup000000_paint : RVPaint (3)
{
    paint
    {
        int nextId = 3
        int ghost = 1
    }

    "pen:1:1:User"
    {
        float[4] color = [ [ 1 0 0 1 ] ]
        float width = 0.01
        string brush = "circle"
        float[2] points = [ [ 0.5 0.5 ] ]
    }

    "text:2:1:User"
    {
        float[2] position = [ [ -0.5 -0.5 ] ]
        float[4] color = [ [ 1 1 1 1 ] ]
        float size = 0.01
        string text = "corner"
    }

    "frame:1"
    {
        string order = [ "pen:1:1:User" "text:2:1:User" ]
    }
}
"#;

    #[test]
    fn test_unit_height_import_and_reexport() {
        let session = parse_rv(UNIT_HEIGHT_SESSION, &EngineConfig::default()).unwrap();
        assert!(session.paint.effects().ghost);
        assert_eq!(session.paint.annotated_frames().collect::<Vec<_>>(), vec![1]);

        let anns = session.paint.annotations_for_frame(1);
        assert_eq!(anns.len(), 2);
        match &anns[0].kind {
            AnnotationKind::Pen(pen) => {
                assert!(close(pen.points[0].x, 1.0, 0.1));
                assert!(close(pen.points[0].y, 1.0, 0.1));
                assert!((pen.width - 5.0).abs() < 0.01);
            }
            other => panic!("expected pen, got {:?}", other),
        }
        match &anns[1].kind {
            AnnotationKind::Text(text) => {
                assert!(close(text.position.x, 0.0, 0.1));
                assert!(close(text.position.y, 0.0, 0.1));
                assert!((text.font_size - 20.0).abs() < 0.01);
                assert_eq!(text.text, "corner");
            }
            other => panic!("expected text, got {:?}", other),
        }

        let exported = to_rv_string(&session);
        assert!(exported.contains("0.5 0.5"));
        assert!(exported.contains("-0.5 -0.5"));
        assert!(exported.contains("int ghost = 1"));
    }

    #[test]
    fn test_session_round_trip() {
        let mut session =
            Session::new(MediaSource::new("/media/wide.exr", 1920, 1080), &EngineConfig::default());
        session.channel_mode = ChannelMode::Red;
        session.playback = Playback {
            start: 1,
            end: 48,
            fps: 25.0,
            frame: 7,
        };
        session.paint.set_effects(PaintEffects {
            hold: true,
            ghost: true,
            ghost_before: 4,
            ghost_after: 2,
        });

        let mut text = TextAnnotation::new(Point::new(0.25, 0.75), "look here");
        text.bold = true;
        text.alignment = TextAlignment::Right;
        text.background_color = Some(Color::rgba(0.0, 0.0, 0.0, 0.5));
        session.paint.add_annotation(pen_at(3, &[(0.1, 0.2), (0.3, 0.4)])).unwrap();
        session.paint.add_text(3, text).unwrap();
        let mut shape =
            ShapeAnnotation::new(ShapeType::Polygon, Point::new(0.1, 0.1), Point::new(0.6, 0.6));
        shape.points = vec![Point::new(0.1, 0.1), Point::new(0.6, 0.1), Point::new(0.3, 0.6)];
        shape.fill_color = Some(Color::WHITE);
        session.paint.add_shape(12, shape).unwrap();

        let restored = parse_rv(&to_rv_string(&session), &EngineConfig::default()).unwrap();
        assert_eq!(restored.media, session.media);
        assert_eq!(restored.channel_mode, ChannelMode::Red);
        assert_eq!(restored.playback, session.playback);
        assert_eq!(restored.paint.effects(), session.paint.effects());
        assert_eq!(
            restored.paint.annotated_frames().collect::<Vec<_>>(),
            vec![3, 12]
        );

        for frame in [3, 12] {
            let before = session.paint.annotations_for_frame(frame);
            let after = restored.paint.annotations_for_frame(frame);
            assert_eq!(before.len(), after.len());
            for (a, b) in before.iter().zip(after) {
                assert_eq!(a.id, b.id);
                assert_eq!(a.user, b.user);
                assert_eq!(a.kind_name(), b.kind_name());
                assert_eq!(a.start_frame(), b.start_frame());
            }
        }

        match &restored.paint.annotations_for_frame(3)[1].kind {
            AnnotationKind::Text(text) => {
                assert!(close(text.position.x, 0.25, 1e-4));
                assert!(close(text.position.y, 0.75, 1e-4));
                assert!(text.bold);
                assert_eq!(text.alignment, TextAlignment::Right);
                assert!(text.background_color.is_some());
            }
            other => panic!("expected text, got {:?}", other),
        }
        match &restored.paint.annotations_for_frame(12)[0].kind {
            AnnotationKind::Shape(shape) => {
                assert_eq!(shape.shape_type, ShapeType::Polygon);
                assert_eq!(shape.points.len(), 3);
                assert!(close(shape.points[1].x, 0.6, 1e-4));
                assert_eq!(shape.fill_color, Some(Color::WHITE));
            }
            other => panic!("expected shape, got {:?}", other),
        }
    }

    #[test]
    fn test_widescreen_points_are_unit_height() {
        let mut session =
            Session::new(MediaSource::new("wide.mov", 2000, 1000), &EngineConfig::default());
        session.paint.add_annotation(pen_at(1, &[(1.0, 1.0), (0.0, 0.0)])).unwrap();
        let text = to_rv_string(&session);
        assert!(text.contains("float[2] points = [ [ 1 0.5 ] [ -1 -0.5 ] ]"));
        assert!(text.contains("float width = 0.01"));
    }

    #[test]
    fn test_unlisted_components_are_appended() {
        let text = r#"GTOa (4)
paint : RVPaint (3)
{
    "text:9:4:Someone"
    {
        float[2] position = [ [ 0 0 ] ]
        string text = "orphan"
    }
}
"#;
        let session = parse_rv(text, &EngineConfig::default()).unwrap();
        let anns = session.paint.annotations_for_frame(4);
        assert_eq!(anns.len(), 1);
        assert_eq!(anns[0].id, "9");
        assert_eq!(anns[0].user, "Someone");
        assert_eq!(session.media, MediaSource::default());
    }

    #[test]
    fn test_bad_component_frame_is_an_error() {
        let text = "GTOa (4)\np : RVPaint (3)\n{\n \"pen:1:zero:U\"\n {\n  int debug = 0\n }\n}\n";
        assert!(matches!(
            parse_rv(text, &EngineConfig::default()),
            Err(PaintError::Session(_))
        ));
    }

    #[test]
    fn test_next_id_saturates_at_largest_id() {
        let mut session = square_session();
        let mut top = pen_at(1, &[(0.5, 0.5)]);
        top.id = i64::MAX.to_string();
        session.paint.load_from_annotations(vec![top], None);

        let text = to_rv_string(&session);
        assert!(text.contains(&format!("int nextId = {}", i64::MAX)));
        let restored = parse_rv(&text, &EngineConfig::default()).unwrap();
        assert_eq!(restored.paint.iter().next().unwrap().id, i64::MAX.to_string());
    }

    #[test]
    fn test_empty_session_file() {
        let store_session = square_session();
        let text = to_rv_string(&store_session);
        let restored = parse_rv(&text, &EngineConfig::default()).unwrap();
        assert!(restored.paint.is_empty());
        assert_eq!(restored.channel_mode, ChannelMode::Rgb);
    }

    #[test]
    fn test_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("review.rv");
        let mut session = square_session();
        session.paint = AnnotationStore::new();
        session.paint.add_annotation(pen_at(2, &[(0.5, 0.5)])).unwrap();
        write_rv(&session, &path).unwrap();

        let restored = read_rv(&path, &EngineConfig::default()).unwrap();
        assert_eq!(restored.paint.len(), 1);
        assert_eq!(restored.media.path, "/media/square.png");
    }
}
