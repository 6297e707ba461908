//! dxf2gcode - compile planar CAD geometry into G-code and read it back
//!
//! Lines, arcs, circles and polylines become a three-axis milling program
//! (header, per-entity motion, footer) with an optional global offset and
//! start/end overrides. The interpreter turns program text back into
//! Z-grouped polylines and an animation path for previewing.

pub mod codegen;
pub mod config;
pub mod error;
pub mod interpreter;
pub mod lexer;
pub mod model;
pub mod post;
pub mod program;
pub mod source;
pub mod validator;

#[cfg(feature = "viz")]
pub mod viz;

use std::path::Path;

use tracing::info;

pub use codegen::{generate, GeneratedProgram};
pub use config::JobConfig;
pub use error::{Error, Result};
pub use interpreter::{interpret, AnimationPath, Simulation, SimulationOptions, ZGroupedPath};
pub use model::{GeometryEntity, MotionCommand, Point, PolylineVertex, ToolState};
pub use source::{GeometrySource, JsonDrawing};

/// What a file conversion produced
#[derive(Debug, Clone, PartialEq)]
pub struct ConversionSummary {
    pub entities_read: usize,
    pub entities_processed: usize,
    pub lines_written: usize,
}

/// Read a drawing, compile it with `job`, and write the program to `output`.
///
/// The program is built in memory first; `output` is only created once the
/// drawing has been read successfully.
pub fn convert_file(
    input: impl AsRef<Path>,
    output: impl AsRef<Path>,
    job: &JobConfig,
) -> Result<ConversionSummary> {
    let output = output.as_ref();
    let entities = JsonDrawing::new(input.as_ref()).entities()?;
    let generated = generate(&entities, job);

    std::fs::write(output, generated.text()).map_err(|source| Error::UnwritableOutput {
        path: output.to_path_buf(),
        source,
    })?;

    info!("wrote {}", output.display());
    Ok(ConversionSummary {
        entities_read: entities.len(),
        entities_processed: generated.entities_processed,
        lines_written: generated.program.len(),
    })
}

/// Interpret a program file
pub fn simulate_file(path: impl AsRef<Path>, options: &SimulationOptions) -> Result<Simulation> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path).map_err(|e| Error::UnreadableSource {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    Ok(interpret(&text, options))
}

/// Write a simulation as JSON for the rendering surface
pub fn write_simulation(sim: &Simulation, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let unwritable = |source: std::io::Error| Error::UnwritableOutput {
        path: path.to_path_buf(),
        source,
    };

    let json = serde_json::to_string_pretty(sim).map_err(|e| unwritable(e.into()))?;
    std::fs::write(path, json).map_err(unwritable)
}

/// Log to stderr; `RUST_LOG` overrides the default `info` level
pub fn init_logging() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_level(true)
        .with_line_number(true);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_convert_file_writes_program() {
        let dir = tempfile::tempdir().expect("temp dir");
        let input = dir.path().join("drawing.json");
        let output = dir.path().join("out.nc");
        source::Drawing {
            entities: source::sample_drawing(),
        }
        .write(&input)
        .expect("write drawing");

        let summary = convert_file(&input, &output, &JobConfig::default()).expect("convert");

        assert_eq!(summary.entities_read, 4);
        assert_eq!(summary.entities_processed, 4);
        let text = std::fs::read_to_string(&output).expect("read program");
        assert_eq!(text.lines().count(), summary.lines_written);
        assert!(text.starts_with("G21\n"));
        assert!(text.ends_with("M2\n"));
    }

    #[test]
    fn test_unreadable_source_leaves_no_output() {
        let dir = tempfile::tempdir().expect("temp dir");
        let output = dir.path().join("out.nc");

        let err = convert_file(dir.path().join("missing.json"), &output, &JobConfig::default())
            .expect_err("missing input");

        assert!(matches!(err, Error::UnreadableSource { .. }));
        assert!(!output.exists());
    }

    #[test]
    fn test_unwritable_output() {
        let dir = tempfile::tempdir().expect("temp dir");
        let input = dir.path().join("drawing.json");
        std::fs::write(&input, r#"{"entities": []}"#).expect("write drawing");

        let err = convert_file(&input, dir.path().join("no/such/dir/out.nc"), &JobConfig::default())
            .expect_err("bad output dir");

        assert!(matches!(err, Error::UnwritableOutput { .. }));
    }

    #[test]
    fn test_simulation_json() {
        let dir = tempfile::tempdir().expect("temp dir");
        let program = dir.path().join("p.nc");
        let json = dir.path().join("sim.json");
        std::fs::write(&program, "G00 X1 Y2\n").expect("write program");

        let sim = simulate_file(&program, &SimulationOptions::default()).expect("simulate");
        write_simulation(&sim, &json).expect("write json");

        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&json).expect("read")).expect("parse");
        assert_eq!(value["animation"][0]["x"], 1.0);
        assert_eq!(value["end_marker"]["y"], 2.0);
    }

    #[test]
    fn test_write_simulation_failure_carries_path() {
        let dir = tempfile::tempdir().expect("temp dir");
        let json = dir.path().join("no/such/dir/sim.json");
        let sim = interpret("G00 X1 Y2\n", &SimulationOptions::default());

        let err = write_simulation(&sim, &json).expect_err("bad output dir");

        assert!(matches!(err, Error::UnwritableOutput { ref path, .. } if *path == json));
    }
}
