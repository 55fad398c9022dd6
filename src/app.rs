// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Command implementations for the rvpaint tool.
//!
//! Each command loads annotations from a JSON export or RV session, works
//! on the annotation store and writes the result in the format implied by
//! the output file extension.

use anyhow::{anyhow, bail, Context, Result};
use clap::Args;
use rvpaint::io::rv;
use rvpaint::io::serialization::{
    apply_import, export_json, export_yaml, read_envelope, ExportOptions, ExportStatistics,
    ImportMode, ImportOptions,
};
use rvpaint::models::session::{MediaSource, Session};
use rvpaint::EngineConfig;
use serde_json::json;
use std::path::{Path, PathBuf};

/// File formats recognised by extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FileFormat {
    Json,
    Yaml,
    Rv,
}

impl FileFormat {
    fn from_path(path: &Path) -> Result<Self> {
        let extension = path.extension().and_then(|s| s.to_str());
        match extension {
            Some("json") => Ok(FileFormat::Json),
            Some("yaml") | Some("yml") => Ok(FileFormat::Yaml),
            Some("rv") => Ok(FileFormat::Rv),
            _ => bail!("Unsupported file extension: {:?}", extension),
        }
    }
}

/// Media to attach when a JSON export becomes a session.
#[derive(Args, Debug, Clone, Default)]
pub struct MediaArgs {
    /// Media path recorded in RV sessions
    #[arg(long)]
    pub media: Option<String>,

    /// Media width in pixels (sets the coordinate aspect ratio)
    #[arg(long, default_value_t = 0)]
    pub width: u32,

    /// Media height in pixels
    #[arg(long, default_value_t = 0)]
    pub height: u32,
}

impl MediaArgs {
    fn source(&self) -> MediaSource {
        MediaSource::new(self.media.clone().unwrap_or_default(), self.width, self.height)
    }
}

#[derive(Args, Debug, Clone)]
pub struct ConvertArgs {
    pub input: PathBuf,
    pub output: PathBuf,

    #[command(flatten)]
    pub media: MediaArgs,
}

#[derive(Args, Debug, Clone)]
pub struct ImportArgs {
    /// Existing JSON export or RV session
    pub base: PathBuf,

    /// JSON export to apply
    pub incoming: PathBuf,

    /// Where to write the result
    #[arg(short, long)]
    pub output: PathBuf,

    /// Keep the base annotations instead of replacing them
    #[arg(long)]
    pub merge: bool,

    /// Frames added to every imported annotation
    #[arg(long, default_value_t = 0, allow_hyphen_values = true)]
    pub offset: i64,

    #[command(flatten)]
    pub media: MediaArgs,
}

/// Command runner.
pub struct App {
    config: EngineConfig,
}

impl App {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    /// Print statistics and effects as JSON.
    pub fn stats(&self, path: &Path) -> Result<()> {
        let session = self.load_session(path, &MediaArgs::default())?;
        let stats = ExportStatistics::from_store(&session.paint);
        let report = json!({
            "file": path.display().to_string(),
            "statistics": stats,
            "effects": session.paint.effects(),
            "frames": session.paint.annotated_frames().collect::<Vec<_>>(),
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
        Ok(())
    }

    /// Validate a JSON export without applying it.
    pub fn validate(&self, path: &Path) -> Result<()> {
        if FileFormat::from_path(path)? != FileFormat::Json {
            bail!("Only JSON exports can be validated: {}", path.display());
        }
        let import =
            read_envelope(path).with_context(|| format!("{} is not importable", path.display()))?;
        println!(
            "{}: valid, {} annotations on {} frames",
            path.display(),
            import.annotation_count(),
            import.frames.len()
        );
        Ok(())
    }

    pub fn convert(&self, args: &ConvertArgs) -> Result<()> {
        let session = self.load_session(&args.input, &args.media)?;
        self.save_session(session, &args.output)
    }

    pub fn import(&self, args: &ImportArgs) -> Result<()> {
        let mut session = self.load_session(&args.base, &args.media)?;
        if FileFormat::from_path(&args.incoming)? != FileFormat::Json {
            bail!("Incoming annotations must be a JSON export: {}", args.incoming.display());
        }
        let incoming = read_envelope(&args.incoming)
            .with_context(|| format!("Failed to import {}", args.incoming.display()))?;

        let options = ImportOptions {
            mode: if args.merge {
                ImportMode::Merge
            } else {
                ImportMode::Replace
            },
            frame_offset: args.offset,
        };
        let summary = apply_import(&mut session.paint, incoming, &options)?;
        log::info!(
            "Applied {} annotations on {} frames",
            summary.annotations,
            summary.frames
        );
        self.save_session(session, &args.output)
    }

    fn load_session(&self, path: &Path, media: &MediaArgs) -> Result<Session> {
        match FileFormat::from_path(path)? {
            FileFormat::Rv => rv::read_rv(path, &self.config)
                .with_context(|| format!("Failed to read session {}", path.display())),
            FileFormat::Json => {
                let import = read_envelope(path)
                    .with_context(|| format!("Failed to import {}", path.display()))?;
                let mut session = Session::new(media.source(), &self.config);
                apply_import(&mut session.paint, import, &ImportOptions::default())?;
                Ok(session)
            }
            FileFormat::Yaml => Err(anyhow!(
                "YAML is export-only, cannot read {}",
                path.display()
            )),
        }
    }

    fn save_session(&self, mut session: Session, path: &Path) -> Result<()> {
        let options = ExportOptions::default();
        match FileFormat::from_path(path)? {
            FileFormat::Json => export_json(&session.paint, &options, path),
            FileFormat::Yaml => export_yaml(&session.paint, &options, path),
            FileFormat::Rv => {
                session.fit_range_to_annotations();
                rv::write_rv(&session, path)
            }
        }
        .with_context(|| format!("Failed to write {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rvpaint::io::serialization::{export_envelope, to_json_string};
    use rvpaint::models::annotation::{Annotation, Point, TextAnnotation};
    use rvpaint::AnnotationStore;

    fn write_export(dir: &Path, name: &str, frames: &[u32]) -> PathBuf {
        let mut store = AnnotationStore::new();
        for frame in frames {
            store
                .add_annotation(Annotation::text(
                    *frame,
                    "tester",
                    TextAnnotation::new(Point::new(0.5, 0.5), "note"),
                ))
                .unwrap();
        }
        let path = dir.join(name);
        let json = to_json_string(&export_envelope(&store, &ExportOptions::default())).unwrap();
        std::fs::write(&path, json).unwrap();
        path
    }

    #[test]
    fn test_convert_json_to_rv_and_back() {
        let dir = tempfile::tempdir().unwrap();
        let app = App::new(EngineConfig::default());
        let input = write_export(dir.path(), "in.json", &[2, 6]);
        let rv_path = dir.path().join("out.rv");
        let back = dir.path().join("back.json");

        let media = MediaArgs {
            media: Some("plate.exr".to_string()),
            width: 1920,
            height: 1080,
        };
        app.convert(&ConvertArgs {
            input,
            output: rv_path.clone(),
            media,
        })
        .unwrap();

        let session = rv::read_rv(&rv_path, &EngineConfig::default()).unwrap();
        assert_eq!(session.media.width, 1920);
        assert_eq!(session.playback.end, 6);

        app.convert(&ConvertArgs {
            input: rv_path,
            output: back.clone(),
            media: MediaArgs::default(),
        })
        .unwrap();
        let import = read_envelope(&back).unwrap();
        assert_eq!(import.frames.keys().copied().collect::<Vec<_>>(), vec![2, 6]);
    }

    #[test]
    fn test_import_merge_with_offset() {
        let dir = tempfile::tempdir().unwrap();
        let app = App::new(EngineConfig::default());
        let base = write_export(dir.path(), "base.json", &[1]);
        let incoming = write_export(dir.path(), "incoming.json", &[1, 5]);
        let output = dir.path().join("merged.json");

        app.import(&ImportArgs {
            base,
            incoming,
            output: output.clone(),
            merge: true,
            offset: 10,
            media: MediaArgs::default(),
        })
        .unwrap();

        let merged = read_envelope(&output).unwrap();
        assert_eq!(merged.frames.keys().copied().collect::<Vec<_>>(), vec![1, 11, 15]);
    }

    #[test]
    fn test_unsupported_extension() {
        let app = App::new(EngineConfig::default());
        assert!(app.validate(Path::new("notes.txt")).is_err());
        assert!(app.stats(Path::new("notes.yaml")).is_err());
    }
}
