//! Geometry sources
//!
//! The compiler only sees a flat, ordered list of entities. Where they come
//! from is behind [`GeometrySource`]; the crate ships a JSON drawing reader and
//! a built-in test pattern.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::model::{GeometryEntity, Point, PolylineVertex};

/// Anything that can hand over drawing entities in file order
pub trait GeometrySource {
    fn entities(&self) -> Result<Vec<GeometryEntity>>;
}

/// `{"entities": [...]}` as exported from a CAD drawing
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Drawing {
    pub entities: Vec<GeometryEntity>,
}

/// Drawing stored as a JSON file
#[derive(Debug, Clone)]
pub struct JsonDrawing {
    path: PathBuf,
}

impl JsonDrawing {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl GeometrySource for JsonDrawing {
    fn entities(&self) -> Result<Vec<GeometryEntity>> {
        let unreadable = |reason: String| Error::UnreadableSource {
            path: self.path.clone(),
            reason,
        };

        let content = std::fs::read_to_string(&self.path).map_err(|e| unreadable(e.to_string()))?;
        let drawing = Drawing::from_json(&content).map_err(|e| unreadable(e.to_string()))?;

        let unsupported = drawing
            .entities
            .iter()
            .filter(|e| matches!(e, GeometryEntity::Unsupported))
            .count();
        if unsupported > 0 {
            warn!("{}: {} unsupported entities will be skipped", self.path.display(), unsupported);
        }
        debug!("{}: read {} entities", self.path.display(), drawing.entities.len());

        Ok(drawing.entities)
    }
}

impl Drawing {
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Write the drawing as JSON
    pub fn write(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let json = self
            .to_json()
            .map_err(|e| Error::UnwritableOutput {
                path: path.to_path_buf(),
                source: std::io::Error::new(std::io::ErrorKind::InvalidData, e),
            })?;
        std::fs::write(path, json).map_err(|source| Error::UnwritableOutput {
            path: path.to_path_buf(),
            source,
        })
    }
}

impl GeometrySource for Drawing {
    fn entities(&self) -> Result<Vec<GeometryEntity>> {
        Ok(self.entities.clone())
    }
}

/// Test pattern: one of each supported entity kind
pub fn sample_drawing() -> Vec<GeometryEntity> {
    vec![
        GeometryEntity::Line {
            start: Point::new(0.0, 0.0),
            end: Point::new(50.0, 50.0),
        },
        GeometryEntity::Arc {
            center: Point::new(75.0, 25.0),
            radius: 25.0,
            start_angle: 180.0,
            end_angle: 0.0,
        },
        GeometryEntity::Circle {
            center: Point::new(25.0, 75.0),
            radius: 10.0,
        },
        GeometryEntity::Polyline {
            vertices: vec![
                PolylineVertex::new(110.0, 10.0, 0.0),
                PolylineVertex::new(140.0, 10.0, 0.0),
                PolylineVertex::new(140.0, 30.0, 0.0),
                PolylineVertex::new(110.0, 30.0, 0.0),
                PolylineVertex::new(110.0, 10.0, 0.0),
            ],
            closed: false,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_read_json_drawing() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        write!(
            file,
            r#"{{"entities": [
                {{"type": "LINE", "start": {{"x": 0, "y": 0}}, "end": {{"x": 10, "y": 0}}}},
                {{"type": "spline", "degree": 3}},
                {{"type": "circle", "center": {{"x": 5, "y": 5}}, "radius": 2}}
            ]}}"#
        )
        .expect("write");

        let entities = JsonDrawing::new(file.path()).entities().expect("read");

        assert_eq!(entities.len(), 3);
        assert_eq!(entities[0].kind(), "LINE");
        assert_eq!(entities[1], GeometryEntity::Unsupported);
        assert_eq!(entities[2].kind(), "CIRCLE");
    }

    #[test]
    fn test_missing_file_is_unreadable() {
        let err = JsonDrawing::new("/nonexistent/drawing.json")
            .entities()
            .expect_err("missing file");

        assert!(matches!(err, Error::UnreadableSource { .. }));
    }

    #[test]
    fn test_malformed_file_is_unreadable() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        write!(file, r#"{{"entities": [{{"type": "line"}}]}}"#).expect("write");

        let err = JsonDrawing::new(file.path()).entities().expect_err("bad line");
        assert!(matches!(err, Error::UnreadableSource { .. }));
    }

    #[test]
    fn test_sample_drawing_written_and_read_back() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("sample.json");

        let drawing = Drawing {
            entities: sample_drawing(),
        };
        drawing.write(&path).expect("write");

        let entities = JsonDrawing::new(&path).entities().expect("read");
        assert_eq!(entities, sample_drawing());
    }

    #[test]
    fn test_sample_drawing_kinds() {
        let kinds: Vec<_> = sample_drawing().iter().map(|e| e.kind()).collect();

        assert_eq!(kinds, vec!["LINE", "ARC", "CIRCLE", "LWPOLYLINE"]);
    }
}
