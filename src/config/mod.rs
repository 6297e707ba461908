//! Job configuration - JSON-based conversion parameters
//!
//! Every field has a default, so a config file only needs the values it changes.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::codegen::CutParams;
use crate::error::{Error, Result};
use crate::interpreter::{SimulationOptions, DEFAULT_ARC_SAMPLES};
use crate::model::Point;

pub const DEFAULT_FEED_XY: f64 = 300.0;
pub const DEFAULT_FEED_Z: f64 = 100.0;
pub const DEFAULT_SAFE_Z: f64 = 5.0;
pub const DEFAULT_CUT_Z: f64 = -0.3;
pub const DEFAULT_SPINDLE_RPM: f64 = 1000.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct JobConfig {
    /// XY cutting feed (units/min)
    #[serde(alias = "feedrate_xy")]
    pub feed_xy: f64,

    /// Plunge feed (units/min)
    #[serde(alias = "feedrate_z")]
    pub feed_z: f64,

    /// Height for rapid moves
    pub safe_z: f64,

    /// Cutting depth, relative to the material surface at Z0
    pub cut_z: f64,

    pub spindle_rpm: f64,

    /// Added to every X/Y word of the program
    pub offset: Point,

    /// Written over the first XY move of the body
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start: Option<Point>,

    /// Written over the last XY move of the body
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end: Option<Point>,

    /// Points per arc when simulating
    pub arc_samples: usize,
}

impl Default for JobConfig {
    fn default() -> Self {
        Self {
            feed_xy: DEFAULT_FEED_XY,
            feed_z: DEFAULT_FEED_Z,
            safe_z: DEFAULT_SAFE_Z,
            cut_z: DEFAULT_CUT_Z,
            spindle_rpm: DEFAULT_SPINDLE_RPM,
            offset: Point::default(),
            start: None,
            end: None,
            arc_samples: DEFAULT_ARC_SAMPLES,
        }
    }
}

impl JobConfig {
    /// Load a job config from a JSON file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| Error::InvalidConfig {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        serde_json::from_str(&content).map_err(|e| Error::InvalidConfig {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }

    pub fn cut_params(&self) -> CutParams {
        CutParams {
            feed_xy: self.feed_xy,
            feed_z: self.feed_z,
            safe_z: self.safe_z,
            cut_z: self.cut_z,
        }
    }

    /// Simulation parameters matching this job
    pub fn simulation_options(&self) -> SimulationOptions {
        SimulationOptions {
            offset: self.offset,
            start: self.start,
            end: self.end,
            arc_samples: self.arc_samples,
        }
    }
}
