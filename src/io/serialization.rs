// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Annotation export envelope serialization and import.
//!
//! This module builds the `openrv-web` JSON envelope (also available as
//! YAML) from an annotation store, and validates and applies envelopes on
//! import with replace or merge semantics and an optional frame offset.

use crate::error::{PaintResult, ValidationError};
use crate::models::annotation::{Annotation, AnnotationKind};
use crate::models::effects::PaintEffects;
use crate::models::store::AnnotationStore;
use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

/// Envelope format version.
pub const ENVELOPE_VERSION: u32 = 1;

/// Envelope producer tag.
pub const ENVELOPE_SOURCE: &str = "openrv-web";

/// First/last exported frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FrameRange {
    pub start: u32,
    pub end: u32,
    pub total_frames: u32,
}

/// Annotation counts by type. Informational only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportStatistics {
    pub total_annotations: usize,
    pub pen_strokes: usize,
    pub text_annotations: usize,
    pub shape_annotations: usize,
    pub annotated_frames: usize,
}

impl ExportStatistics {
    /// Tally annotations by type.
    pub fn from_frames<'a>(
        frames: impl IntoIterator<Item = (u32, &'a [Annotation])>,
    ) -> Self {
        let mut stats = Self::default();
        for (_, list) in frames {
            if list.is_empty() {
                continue;
            }
            stats.annotated_frames += 1;
            for annotation in list {
                stats.total_annotations += 1;
                match annotation.kind {
                    AnnotationKind::Pen(_) => stats.pen_strokes += 1,
                    AnnotationKind::Text(_) => stats.text_annotations += 1,
                    AnnotationKind::Shape(_) => stats.shape_annotations += 1,
                }
            }
        }
        stats
    }

    pub fn from_store(store: &AnnotationStore) -> Self {
        Self::from_frames(
            store
                .annotated_frames()
                .map(|f| (f, store.annotations_for_frame(f))),
        )
    }
}

/// The export envelope as written to disk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportEnvelope {
    pub version: u32,
    pub exported_at: String,
    pub source: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub effects: Option<PaintEffects>,
    pub frame_range: FrameRange,
    pub statistics: ExportStatistics,
    pub frames: BTreeMap<u32, Vec<Annotation>>,
}

/// Export settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExportOptions {
    /// Write the effects block.
    pub include_effects: bool,
    /// Only export frames in this inclusive range.
    pub frame_range: Option<(u32, u32)>,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            include_effects: true,
            frame_range: None,
        }
    }
}

/// Build the export envelope from the live store.
pub fn export_envelope(store: &AnnotationStore, options: &ExportOptions) -> ExportEnvelope {
    let in_range = |frame: &u32| match options.frame_range {
        Some((start, end)) => *frame >= start && *frame <= end,
        None => true,
    };

    let frames: BTreeMap<u32, Vec<Annotation>> = store
        .annotated_frames()
        .filter(in_range)
        .map(|f| (f, store.annotations_for_frame(f).to_vec()))
        .collect();

    let frame_range = match (frames.keys().next(), frames.keys().next_back()) {
        (Some(&start), Some(&end)) => FrameRange {
            start,
            end,
            total_frames: end - start + 1,
        },
        _ => FrameRange::default(),
    };
    let statistics =
        ExportStatistics::from_frames(frames.iter().map(|(f, list)| (*f, list.as_slice())));

    ExportEnvelope {
        version: ENVELOPE_VERSION,
        exported_at: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        source: ENVELOPE_SOURCE.to_string(),
        effects: options.include_effects.then(|| *store.effects()),
        frame_range,
        statistics,
        frames,
    }
}

pub fn to_json_string(envelope: &ExportEnvelope) -> PaintResult<String> {
    Ok(serde_json::to_string_pretty(envelope)?)
}

pub fn to_yaml_string(envelope: &ExportEnvelope) -> PaintResult<String> {
    Ok(serde_yaml::to_string(envelope)?)
}

/// Export annotations to JSON format.
pub fn export_json(store: &AnnotationStore, options: &ExportOptions, path: &Path) -> PaintResult<()> {
    let json = to_json_string(&export_envelope(store, options))?;
    std::fs::write(path, json)?;
    log::info!("Exported {} annotations to {}", store.len(), path.display());
    Ok(())
}

/// Export annotations to YAML format.
pub fn export_yaml(store: &AnnotationStore, options: &ExportOptions, path: &Path) -> PaintResult<()> {
    let yaml = to_yaml_string(&export_envelope(store, options))?;
    std::fs::write(path, yaml)?;
    log::info!("Exported {} annotations to {}", store.len(), path.display());
    Ok(())
}

/// A validated envelope, ready to apply to a store.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AnnotationImport {
    pub effects: Option<PaintEffects>,
    pub frames: BTreeMap<u32, Vec<Annotation>>,
}

impl AnnotationImport {
    pub fn annotation_count(&self) -> usize {
        self.frames.values().map(Vec::len).sum()
    }
}

/// Parse and validate an envelope. Fails closed: anything that is not a
/// well-formed version 1 `openrv-web` envelope is rejected.
pub fn parse_envelope(text: &str) -> Result<AnnotationImport, ValidationError> {
    let value: Value =
        serde_json::from_str(text).map_err(|e| ValidationError::NotJson(e.to_string()))?;
    validate_envelope(&value)
}

/// Validate an already-decoded envelope value.
pub fn validate_envelope(value: &Value) -> Result<AnnotationImport, ValidationError> {
    let object = value.as_object().ok_or(ValidationError::NotAnObject)?;

    // 1 and 1.0 are the same JSON number.
    if object.get("version").and_then(Value::as_f64) != Some(f64::from(ENVELOPE_VERSION)) {
        return Err(ValidationError::WrongVersion);
    }
    if object.get("source").and_then(Value::as_str) != Some(ENVELOPE_SOURCE) {
        return Err(ValidationError::WrongSource);
    }
    let raw_frames = object
        .get("frames")
        .and_then(Value::as_object)
        .ok_or(ValidationError::MissingFrames)?;

    let effects = match object.get("effects") {
        None | Some(Value::Null) => None,
        Some(raw) => Some(
            serde_json::from_value::<PaintEffects>(raw.clone())
                .map_err(|e| ValidationError::InvalidEffects(e.to_string()))?,
        ),
    };

    let mut frames = BTreeMap::new();
    for (key, raw_list) in raw_frames {
        let frame = key
            .parse::<u32>()
            .ok()
            .filter(|f| *f >= 1)
            .ok_or_else(|| ValidationError::InvalidFrameKey(key.clone()))?;
        let items = raw_list
            .as_array()
            .ok_or_else(|| ValidationError::InvalidAnnotation {
                frame,
                reason: "expected an array of annotations".to_string(),
            })?;

        let mut list = Vec::with_capacity(items.len());
        for item in items {
            let mut annotation = serde_json::from_value::<Annotation>(item.clone()).map_err(
                |e| ValidationError::InvalidAnnotation {
                    frame,
                    reason: e.to_string(),
                },
            )?;
            if annotation.frame == 0 {
                annotation.frame = frame;
            }
            list.push(annotation);
        }
        frames.entry(frame).or_insert_with(Vec::new).extend(list);
    }

    Ok(AnnotationImport { effects, frames })
}

/// Read and validate an envelope file.
pub fn read_envelope(path: &Path) -> PaintResult<AnnotationImport> {
    let text = std::fs::read_to_string(path)?;
    Ok(parse_envelope(&text)?)
}

/// How imported annotations combine with the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ImportMode {
    /// Clear the store, load the import and its effects.
    #[default]
    Replace,
    /// Add alongside existing annotations; effects are left untouched.
    Merge,
}

/// Import settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ImportOptions {
    pub mode: ImportMode,
    /// Added to every imported frame and start frame.
    pub frame_offset: i64,
}

/// What an import did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportSummary {
    pub mode: ImportMode,
    pub annotations: usize,
    pub frames: usize,
}

/// Apply a validated import to `store`.
///
/// Frame offsets are resolved for every annotation before the store is
/// touched; an annotation shifted below frame 1 rejects the whole import.
pub fn apply_import(
    store: &mut AnnotationStore,
    import: AnnotationImport,
    options: &ImportOptions,
) -> PaintResult<ImportSummary> {
    let mut annotations = Vec::with_capacity(import.annotation_count());
    let mut frames = BTreeSet::new();
    for mut annotation in import.frames.into_values().flatten() {
        let original = annotation.frame;
        let target = shift_frame(original, options.frame_offset)?;
        let start = shift_frame(annotation.start_frame.unwrap_or(original), options.frame_offset)?;
        annotation.frame = target;
        annotation.start_frame = Some(start);
        frames.insert(target);
        annotations.push(annotation);
    }

    let count = annotations.len();
    match options.mode {
        ImportMode::Replace => {
            store.load_from_annotations(annotations, import.effects);
        }
        ImportMode::Merge => {
            store.merge_annotations(annotations)?;
        }
    }

    log::info!(
        "Imported {} annotations on {} frames ({:?}, offset {})",
        count,
        frames.len(),
        options.mode,
        options.frame_offset
    );
    Ok(ImportSummary {
        mode: options.mode,
        annotations: count,
        frames: frames.len(),
    })
}

/// Parse, validate and apply an envelope in one step. The store is left
/// untouched on any validation failure.
pub fn import_json_str(
    store: &mut AnnotationStore,
    text: &str,
    options: &ImportOptions,
) -> PaintResult<ImportSummary> {
    let import = parse_envelope(text)?;
    apply_import(store, import, options)
}

fn shift_frame(frame: u32, offset: i64) -> Result<u32, ValidationError> {
    let shifted = i64::from(frame) + offset;
    u32::try_from(shifted)
        .ok()
        .filter(|f| *f >= 1)
        .ok_or(ValidationError::FrameOutOfRange(shifted))
}
