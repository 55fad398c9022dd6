// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Frame-indexed annotation store.
//!
//! Owns the canonical frame -> annotations mapping, the paint effects and
//! the undo/redo history. Insertion order within a frame is preserved.

use super::annotation::{Annotation, PenStroke, Point, ShapeAnnotation, TextAnnotation};
use super::effects::PaintEffects;
use crate::config::EngineConfig;
use crate::error::{PaintResult, ValidationError};
use std::collections::{BTreeMap, HashSet};
use std::ops::Bound;

type FrameMap = BTreeMap<u32, Vec<Annotation>>;

/// History system for undo/redo functionality.
#[derive(Debug, Clone)]
struct History {
    /// Undo stack (past states)
    undo_stack: Vec<FrameMap>,
    /// Redo stack (future states after undo)
    redo_stack: Vec<FrameMap>,
    /// Maximum history size
    max_size: usize,
}

impl History {
    fn new(max_size: usize) -> Self {
        Self {
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            max_size,
        }
    }

    /// Save current state before making a change
    fn push(&mut self, frames: FrameMap) {
        if self.max_size == 0 {
            return;
        }
        self.undo_stack.push(frames);
        if self.undo_stack.len() > self.max_size {
            self.undo_stack.remove(0);
        }
        // Clear redo stack when new action is performed
        self.redo_stack.clear();
    }

    /// Undo: restore previous state
    fn undo(&mut self, current: &FrameMap) -> Option<FrameMap> {
        let previous = self.undo_stack.pop()?;
        self.redo_stack.push(current.clone());
        Some(previous)
    }

    /// Redo: restore next state
    fn redo(&mut self, current: &FrameMap) -> Option<FrameMap> {
        let next = self.redo_stack.pop()?;
        self.undo_stack.push(current.clone());
        Some(next)
    }

    fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }
}

/// A stroke being drawn, not yet part of the store.
#[derive(Debug, Clone)]
struct PendingStroke {
    frame: u32,
    stroke: PenStroke,
}

/// Annotations of a nearby frame drawn faded while ghosting.
#[derive(Debug, Clone, PartialEq)]
pub struct GhostFrame<'a> {
    pub frame: u32,
    /// Distance from the current frame.
    pub distance: u32,
    pub opacity: f32,
    pub annotations: &'a [Annotation],
}

/// Frame-indexed annotation store.
#[derive(Debug, Clone)]
pub struct AnnotationStore {
    frames: FrameMap,
    ids: HashSet<String>,
    next_id: u64,
    effects: PaintEffects,
    history: History,
    pending: Option<PendingStroke>,
    user: String,
    pen_style: PenStroke,
    text_style: TextAnnotation,
}

impl Default for AnnotationStore {
    fn default() -> Self {
        Self::new()
    }
}

impl AnnotationStore {
    /// Create an empty store with default settings.
    pub fn new() -> Self {
        Self::with_config(&EngineConfig::default())
    }

    /// Create an empty store using the configured user, history size and
    /// ghost window.
    pub fn with_config(config: &EngineConfig) -> Self {
        Self {
            frames: FrameMap::new(),
            ids: HashSet::new(),
            next_id: 1,
            effects: config.default_effects(),
            history: History::new(config.history_limit),
            pending: None,
            user: config.user.clone(),
            pen_style: config.pen_stroke(),
            text_style: config.text(Point::default(), ""),
        }
    }

    /// Author recorded on annotations created through the stroke and
    /// builder helpers.
    pub fn user(&self) -> &str {
        &self.user
    }

    pub fn set_user(&mut self, user: impl Into<String>) {
        self.user = user.into();
    }

    /// Annotations on exactly `frame`, in insertion order.
    pub fn annotations_for_frame(&self, frame: u32) -> &[Annotation] {
        self.frames.get(&frame).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Frames holding at least one annotation, ascending.
    pub fn annotated_frames(&self) -> impl Iterator<Item = u32> + '_ {
        self.frames.keys().copied()
    }

    /// All annotations, ordered by frame then insertion.
    pub fn iter(&self) -> impl Iterator<Item = &Annotation> {
        self.frames.values().flatten()
    }

    pub fn len(&self) -> usize {
        self.frames.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn find(&self, id: &str) -> Option<&Annotation> {
        self.iter().find(|a| a.id == id)
    }

    /// Annotations that should be drawn at `frame`.
    ///
    /// An annotation is visible while its `[startFrame, startFrame +
    /// duration)` span covers the frame. With hold on, the annotations of
    /// the nearest annotated frame at or before `frame` stay visible too.
    pub fn visible_annotations(&self, frame: u32) -> Vec<&Annotation> {
        let held = if self.effects.hold {
            self.frames.range(..=frame).next_back().map(|(f, _)| *f)
        } else {
            None
        };

        self.frames
            .iter()
            .flat_map(|(f, list)| list.iter().map(move |a| (*f, a)))
            .filter(|(f, a)| a.covers(frame) || Some(*f) == held)
            .map(|(_, a)| a)
            .collect()
    }

    /// Nearby annotated frames to draw faded, nearest first.
    ///
    /// Empty unless ghosting is on. The current frame is never included.
    pub fn ghost_frames(&self, frame: u32) -> Vec<GhostFrame<'_>> {
        if !self.effects.ghost {
            return Vec::new();
        }

        let effects = &self.effects;
        let lo = frame.saturating_sub(effects.ghost_before).max(1).min(frame);
        let hi = frame.saturating_add(effects.ghost_after);

        let before = self
            .frames
            .range(lo..frame)
            .rev()
            .map(|(f, list)| (*f, frame - f, true, list));
        let after = self
            .frames
            .range((Bound::Excluded(frame), Bound::Included(hi)))
            .map(|(f, list)| (*f, f - frame, false, list));

        let mut ghosts: Vec<GhostFrame<'_>> = before
            .chain(after)
            .filter_map(|(candidate, distance, is_before, list)| {
                let opacity = effects.ghost_opacity(distance, is_before)?;
                Some(GhostFrame {
                    frame: candidate,
                    distance,
                    opacity,
                    annotations: list.as_slice(),
                })
            })
            .collect();
        // Stable: on equal distance the earlier frame stays first.
        ghosts.sort_by_key(|g| g.distance);
        ghosts
    }

    pub fn effects(&self) -> &PaintEffects {
        &self.effects
    }

    pub fn effects_mut(&mut self) -> &mut PaintEffects {
        &mut self.effects
    }

    pub fn set_effects(&mut self, effects: PaintEffects) {
        self.effects = effects;
    }

    pub fn toggle_hold(&mut self) -> bool {
        let hold = self.effects.toggle_hold();
        log::debug!("Hold {}", if hold { "on" } else { "off" });
        hold
    }

    pub fn toggle_ghost(&mut self) -> bool {
        let ghost = self.effects.toggle_ghost();
        log::debug!("Ghost {}", if ghost { "on" } else { "off" });
        ghost
    }

    /// Add an annotation on its `frame`, assigning a fresh id.
    ///
    /// Any id already on the annotation is replaced. Records one undo step.
    pub fn add_annotation(&mut self, annotation: Annotation) -> PaintResult<String> {
        if annotation.frame == 0 {
            return Err(ValidationError::ZeroFrame.into());
        }
        self.save_to_history();
        Ok(self.insert_fresh(annotation))
    }

    /// Add a text label on `frame` with the store's user.
    pub fn add_text(&mut self, frame: u32, text: TextAnnotation) -> PaintResult<String> {
        let annotation = Annotation::text(frame, self.user.clone(), text);
        self.add_annotation(annotation)
    }

    /// Add a text label in the configured text style.
    pub fn add_label(
        &mut self,
        frame: u32,
        position: Point,
        text: impl Into<String>,
    ) -> PaintResult<String> {
        let mut label = self.text_style.clone();
        label.position = position;
        label.text = text.into();
        self.add_text(frame, label)
    }

    /// Add a shape on `frame` with the store's user.
    pub fn add_shape(&mut self, frame: u32, shape: ShapeAnnotation) -> PaintResult<String> {
        let annotation = Annotation::shape(frame, self.user.clone(), shape);
        self.add_annotation(annotation)
    }

    /// Add every annotation, keeping annotations already in the store.
    ///
    /// Incoming ids are stripped so the store assigns fresh ones. The whole
    /// batch is a single undo step. Annotations on frame 0 reject the batch.
    pub fn merge_annotations(&mut self, annotations: Vec<Annotation>) -> PaintResult<usize> {
        if annotations.iter().any(|a| a.frame == 0) {
            return Err(ValidationError::ZeroFrame.into());
        }
        if annotations.is_empty() {
            return Ok(0);
        }
        self.save_to_history();
        let count = annotations.len();
        for mut annotation in annotations {
            annotation.id.clear();
            self.insert_fresh(annotation);
        }
        log::info!("Merged {} annotations, total: {}", count, self.len());
        Ok(count)
    }

    /// Remove every annotation from every frame. Undoable.
    pub fn clear_all(&mut self) {
        if self.frames.is_empty() {
            return;
        }
        self.save_to_history();
        self.frames.clear();
        self.ids.clear();
        log::info!("Cleared all annotations");
    }

    /// Remove every annotation on `frame`, returning how many were removed.
    pub fn clear_frame(&mut self, frame: u32) -> usize {
        if !self.frames.contains_key(&frame) {
            return 0;
        }
        self.save_to_history();
        let removed = self.frames.remove(&frame).unwrap_or_default();
        for annotation in &removed {
            self.ids.remove(&annotation.id);
        }
        removed.len()
    }

    /// Remove one annotation by id from `frame`.
    pub fn remove_annotation(&mut self, frame: u32, id: &str) -> Option<Annotation> {
        let index = self
            .frames
            .get(&frame)?
            .iter()
            .position(|a| a.id == id)?;
        self.save_to_history();

        let list = self.frames.get_mut(&frame)?;
        let removed = list.remove(index);
        if list.is_empty() {
            self.frames.remove(&frame);
        }
        self.ids.remove(&removed.id);
        log::info!("Deleted annotation {} from frame {}", removed.id, frame);
        Some(removed)
    }

    /// Replace the store's contents with `annotations`.
    ///
    /// Clears first, then inserts each annotation on its own frame. Incoming
    /// ids are kept when non-empty and unique, otherwise a fresh id is
    /// assigned. Applies `effects` when given. Resets undo history.
    /// Returns the number of annotations loaded.
    pub fn load_from_annotations(
        &mut self,
        annotations: Vec<Annotation>,
        effects: Option<PaintEffects>,
    ) -> usize {
        self.frames.clear();
        self.ids.clear();
        self.history.clear();
        self.pending = None;

        // Fresh ids continue after the largest numeric id being loaded.
        self.next_id = annotations
            .iter()
            .filter_map(|a| a.id.parse::<u64>().ok())
            .max()
            .map_or(1, |max| max.saturating_add(1));

        let mut loaded = 0;
        for annotation in annotations {
            if annotation.frame == 0 {
                log::warn!("Skipping annotation {:?} without a frame", annotation.id);
                continue;
            }
            if annotation.id.is_empty() || self.ids.contains(&annotation.id) {
                self.insert_fresh(annotation);
            } else {
                self.insert(annotation);
            }
            loaded += 1;
        }

        if let Some(effects) = effects {
            self.effects = effects;
        }
        log::info!(
            "Loaded {} annotations on {} frames",
            loaded,
            self.frames.len()
        );
        loaded
    }

    /// Start drawing `stroke` on `frame`. Replaces any unfinished stroke.
    pub fn begin_stroke(&mut self, frame: u32, stroke: PenStroke) -> PaintResult<()> {
        if frame == 0 {
            return Err(ValidationError::ZeroFrame.into());
        }
        if self.pending.is_some() {
            log::debug!("Discarding unfinished stroke");
        }
        self.pending = Some(PendingStroke { frame, stroke });
        Ok(())
    }

    /// Start drawing on `frame` with the configured pen.
    pub fn begin_default_stroke(&mut self, frame: u32) -> PaintResult<()> {
        self.begin_stroke(frame, self.pen_style.clone())
    }

    /// Append a point to the stroke being drawn. Returns false when no
    /// stroke is in progress.
    pub fn extend_stroke(&mut self, point: Point) -> bool {
        match self.pending.as_mut() {
            Some(pending) => {
                pending.stroke.add_point(point);
                true
            }
            None => false,
        }
    }

    /// Finish the stroke being drawn, adding it to the store as one undo
    /// step. Strokes without points are discarded.
    pub fn end_stroke(&mut self) -> Option<String> {
        let pending = self.pending.take()?;
        if pending.stroke.points.is_empty() {
            return None;
        }
        let annotation = Annotation::pen(pending.frame, self.user.clone(), pending.stroke);
        self.save_to_history();
        let id = self.insert_fresh(annotation);
        log::info!("Added stroke {} on frame {}", id, pending.frame);
        Some(id)
    }

    pub fn cancel_stroke(&mut self) {
        self.pending = None;
    }

    /// The stroke being drawn, if any.
    pub fn pending_stroke(&self) -> Option<&PenStroke> {
        self.pending.as_ref().map(|p| &p.stroke)
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Revert the most recent change. Returns false when there is nothing
    /// to undo.
    pub fn undo(&mut self) -> bool {
        match self.history.undo(&self.frames) {
            Some(previous) => {
                self.restore(previous);
                log::debug!("Undo");
                true
            }
            None => false,
        }
    }

    /// Reapply the most recently undone change.
    pub fn redo(&mut self) -> bool {
        match self.history.redo(&self.frames) {
            Some(next) => {
                self.restore(next);
                log::debug!("Redo");
                true
            }
            None => false,
        }
    }

    fn save_to_history(&mut self) {
        self.history.push(self.frames.clone());
    }

    fn restore(&mut self, frames: FrameMap) {
        self.frames = frames;
        self.ids = self.frames.values().flatten().map(|a| a.id.clone()).collect();
    }

    fn fresh_id(&mut self) -> String {
        loop {
            let candidate = self.next_id.to_string();
            // Wraps to 1 once exhausted; taken ids are skipped.
            self.next_id = self.next_id.checked_add(1).unwrap_or(1);
            if !self.ids.contains(&candidate) {
                return candidate;
            }
        }
    }

    fn insert_fresh(&mut self, mut annotation: Annotation) -> String {
        annotation.id = self.fresh_id();
        self.insert(annotation)
    }

    fn insert(&mut self, mut annotation: Annotation) -> String {
        if annotation.start_frame.is_none() {
            annotation.start_frame = Some(annotation.frame);
        }
        annotation.duration = annotation.duration.max(1);
        let id = annotation.id.clone();
        self.ids.insert(id.clone());
        self.frames.entry(annotation.frame).or_default().push(annotation);
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::annotation::{AnnotationKind, Color, ShapeType};
    use assert_matches::assert_matches;

    fn text(frame: u32, label: &str) -> Annotation {
        Annotation::text(frame, "tester", TextAnnotation::new(Point::new(0.5, 0.5), label))
    }

    fn draw(store: &mut AnnotationStore, frame: u32, points: &[(f64, f64)]) -> Option<String> {
        store
            .begin_stroke(frame, PenStroke::new(Color::RED, 3.0, Default::default()))
            .unwrap();
        for (x, y) in points {
            store.extend_stroke(Point::new(*x, *y));
        }
        store.end_stroke()
    }

    #[test]
    fn test_add_assigns_unique_ids_and_preserves_order() {
        let mut store = AnnotationStore::new();
        let mut first = text(1, "a");
        first.id = "external".to_string();
        let a = store.add_annotation(first).unwrap();
        let b = store.add_annotation(text(1, "b")).unwrap();
        let c = store.add_annotation(text(1, "c")).unwrap();

        assert_ne!(a, "external");
        assert_ne!(a, b);
        assert_ne!(b, c);

        let labels: Vec<_> = store
            .annotations_for_frame(1)
            .iter()
            .map(|a| match &a.kind {
                crate::models::annotation::AnnotationKind::Text(t) => t.text.clone(),
                _ => unreachable!(),
            })
            .collect();
        assert_eq!(labels, vec!["a", "b", "c"]);
        assert_eq!(store.annotated_frames().collect::<Vec<_>>(), vec![1]);
    }

    #[test]
    fn test_empty_frame_queries() {
        let store = AnnotationStore::new();
        assert!(store.annotations_for_frame(42).is_empty());
        assert_eq!(store.annotated_frames().count(), 0);
        assert!(store.visible_annotations(42).is_empty());
    }

    #[test]
    fn test_frame_zero_is_rejected() {
        let mut store = AnnotationStore::new();
        assert!(store.add_annotation(text(0, "x")).is_err());
        assert!(store.begin_stroke(0, PenStroke::new(Color::RED, 1.0, Default::default())).is_err());
        assert!(store.is_empty());
        assert!(!store.can_undo());
    }

    #[test]
    fn test_stroke_is_one_undo_step() {
        let mut store = AnnotationStore::new();
        assert!(!store.can_undo());

        let id = draw(&mut store, 4, &[(0.1, 0.1), (0.2, 0.2), (0.3, 0.3)]).unwrap();
        assert!(store.can_undo());
        assert!(!store.can_redo());
        assert_eq!(store.find(&id).unwrap().user, "User");

        assert!(store.undo());
        assert!(store.is_empty());
        assert!(!store.can_undo());
        assert!(store.can_redo());

        assert!(store.redo());
        assert_eq!(store.annotations_for_frame(4).len(), 1);
        assert_eq!(store.annotations_for_frame(4)[0].id, id);
    }

    #[test]
    fn test_empty_stroke_is_discarded() {
        let mut store = AnnotationStore::new();
        assert_eq!(draw(&mut store, 1, &[]), None);
        assert!(store.is_empty());
        assert!(!store.can_undo());
        assert!(!store.extend_stroke(Point::new(0.0, 0.0)));
    }

    #[test]
    fn test_new_change_clears_redo() {
        let mut store = AnnotationStore::new();
        draw(&mut store, 1, &[(0.5, 0.5)]);
        store.undo();
        assert!(store.can_redo());
        draw(&mut store, 2, &[(0.5, 0.5)]);
        assert!(!store.can_redo());
    }

    #[test]
    fn test_history_limit() {
        let mut config = EngineConfig::default();
        config.history_limit = 2;
        let mut store = AnnotationStore::with_config(&config);
        for frame in 1..=4 {
            store.add_annotation(text(frame, "x")).unwrap();
        }
        assert!(store.undo());
        assert!(store.undo());
        assert!(!store.undo());
        assert_eq!(store.annotated_frames().collect::<Vec<_>>(), vec![1, 2]);
    }

    #[test]
    fn test_clear_all_and_undo() {
        let mut store = AnnotationStore::new();
        store.add_annotation(text(1, "a")).unwrap();
        store.add_annotation(text(7, "b")).unwrap();
        store.clear_all();
        assert_eq!(store.annotated_frames().count(), 0);
        assert!(store.undo());
        assert_eq!(store.annotated_frames().collect::<Vec<_>>(), vec![1, 7]);
    }

    #[test]
    fn test_remove_and_clear_frame() {
        let mut store = AnnotationStore::new();
        let a = store.add_annotation(text(3, "a")).unwrap();
        store.add_annotation(text(3, "b")).unwrap();
        store.add_annotation(text(5, "c")).unwrap();

        let removed = store.remove_annotation(3, &a).unwrap();
        assert_eq!(removed.id, a);
        assert_eq!(store.annotations_for_frame(3).len(), 1);
        assert!(store.remove_annotation(3, "missing").is_none());

        assert_eq!(store.clear_frame(3), 1);
        assert_eq!(store.clear_frame(3), 0);
        assert_eq!(store.annotated_frames().collect::<Vec<_>>(), vec![5]);
    }

    #[test]
    fn test_load_replaces_and_applies_effects() {
        let mut store = AnnotationStore::new();
        store.add_annotation(text(1, "old")).unwrap();

        let mut a = text(10, "a");
        a.id = "5".to_string();
        let mut b = text(20, "b");
        b.id = "5".to_string();
        let c = text(20, "c");

        let effects = PaintEffects {
            hold: true,
            ghost: true,
            ghost_before: 5,
            ghost_after: 3,
        };
        let loaded = store.load_from_annotations(vec![a, b, c], Some(effects));
        assert_eq!(loaded, 3);
        assert_eq!(store.annotated_frames().collect::<Vec<_>>(), vec![10, 20]);
        assert_eq!(store.effects(), &effects);
        assert!(!store.can_undo());

        let ids: HashSet<_> = store.iter().map(|a| a.id.clone()).collect();
        assert_eq!(ids.len(), 3);
        assert_eq!(store.annotations_for_frame(10)[0].id, "5");
    }

    #[test]
    fn test_fresh_ids_after_largest_numeric_id() {
        let mut store = AnnotationStore::new();
        let mut top = text(3, "top");
        top.id = u64::MAX.to_string();
        store.load_from_annotations(vec![top], None);

        let a = store.add_annotation(text(2, "a")).unwrap();
        let b = draw(&mut store, 2, &[(0.5, 0.5)]).unwrap();
        assert_eq!(a, "1");
        assert_eq!(b, "2");
        assert_eq!(store.len(), 3);
    }

    #[test]
    fn test_load_empty_clears() {
        let mut store = AnnotationStore::new();
        store.add_annotation(text(2, "a")).unwrap();
        store.load_from_annotations(Vec::new(), None);
        assert!(store.is_empty());
        assert_eq!(store.effects(), &PaintEffects::default());
    }

    #[test]
    fn test_merge_keeps_existing_and_is_one_step() {
        let mut store = AnnotationStore::new();
        let existing = store.add_annotation(text(1, "keep")).unwrap();

        let mut incoming = text(1, "new");
        incoming.id = existing.clone();
        let count = store
            .merge_annotations(vec![incoming, text(2, "other")])
            .unwrap();
        assert_eq!(count, 2);
        assert_eq!(store.annotations_for_frame(1).len(), 2);
        assert_eq!(store.annotations_for_frame(1)[0].id, existing);
        assert_ne!(store.annotations_for_frame(1)[1].id, existing);

        assert!(store.undo());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_visibility_with_duration_and_hold() {
        let mut store = AnnotationStore::new();
        store.add_annotation(text(10, "long").with_duration(5)).unwrap();
        store.add_annotation(text(20, "short")).unwrap();

        assert_eq!(store.visible_annotations(12).len(), 1);
        assert!(store.visible_annotations(16).is_empty());
        assert!(store.visible_annotations(21).is_empty());

        store.toggle_hold();
        assert_eq!(store.visible_annotations(16).len(), 1);
        assert_eq!(store.visible_annotations(25)[0].frame, 20);
        assert!(store.visible_annotations(5).is_empty());
    }

    #[test]
    fn test_ghost_frames_window() {
        let mut store = AnnotationStore::new();
        for frame in [1, 8, 9, 10, 12, 14] {
            store.add_annotation(text(frame, "g")).unwrap();
        }
        assert!(store.ghost_frames(10).is_empty());

        store.set_effects(PaintEffects {
            hold: false,
            ghost: true,
            ghost_before: 2,
            ghost_after: 3,
        });
        let ghosts = store.ghost_frames(10);
        let frames: Vec<_> = ghosts.iter().map(|g| g.frame).collect();
        assert_eq!(frames, vec![9, 8, 12]);
        assert!((ghosts[0].opacity - 0.5).abs() < 1e-6);
        assert!(ghosts[1].opacity < ghosts[0].opacity);
        assert!(ghosts.iter().all(|g| g.frame != 10));
    }

    #[test]
    fn test_ghost_frames_stop_at_first_frame() {
        let mut store = AnnotationStore::new();
        store.add_annotation(text(1, "g")).unwrap();
        store.effects_mut().ghost = true;
        let ghosts = store.ghost_frames(2);
        assert_eq!(ghosts.len(), 1);
        assert_eq!(ghosts[0].frame, 1);
    }

    #[test]
    fn test_ghost_frames_with_huge_window() {
        let mut store = AnnotationStore::new();
        for frame in [1, 9, 11, u32::MAX] {
            store.add_annotation(text(frame, "g")).unwrap();
        }
        store.set_effects(PaintEffects {
            hold: false,
            ghost: true,
            ghost_before: u32::MAX,
            ghost_after: u32::MAX,
        });
        let frames: Vec<_> = store.ghost_frames(10).iter().map(|g| g.frame).collect();
        assert_eq!(frames, vec![9, 11, 1, u32::MAX]);
        assert!(store.ghost_frames(u32::MAX).iter().all(|g| g.frame < u32::MAX));
    }

    #[test]
    fn test_configured_pen_and_text_styles() {
        let mut config = EngineConfig::default();
        config.pen.width = 9.0;
        config.text.font_size = 48.0;
        let mut store = AnnotationStore::with_config(&config);

        store.begin_default_stroke(3).unwrap();
        store.extend_stroke(Point::new(0.2, 0.2));
        store.extend_stroke(Point::new(0.3, 0.3));
        let pending = store.pending_stroke().unwrap();
        assert_eq!(pending.width, 9.0);
        assert_eq!(pending.points.len(), 2);

        let stroke = store.end_stroke().unwrap();
        assert!(store.pending_stroke().is_none());
        assert_matches!(
            &store.find(&stroke).unwrap().kind,
            AnnotationKind::Pen(pen) if pen.width == 9.0
        );

        let label = store.add_label(3, Point::new(0.5, 0.5), "note").unwrap();
        assert_matches!(
            &store.find(&label).unwrap().kind,
            AnnotationKind::Text(t) if t.font_size == 48.0 && t.text == "note"
        );
    }

    #[test]
    fn test_add_shape_uses_store_user() {
        let mut store = AnnotationStore::new();
        store.set_user("carol");
        let id = store
            .add_shape(
                6,
                ShapeAnnotation::new(ShapeType::Ellipse, Point::new(0.1, 0.1), Point::new(0.4, 0.4)),
            )
            .unwrap();
        let shape = store.find(&id).unwrap();
        assert_eq!(shape.user, "carol");
        assert_eq!(shape.kind_name(), "shape");
    }
}
