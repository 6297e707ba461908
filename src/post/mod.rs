//! Post-processing transforms over a generated program
//!
//! Transforms run in a fixed order: the global offset first, then the
//! start/end overrides. The override pass writes its values verbatim, so it
//! has to see the already-offset program.

use crate::config::JobConfig;
use crate::model::Point;
use crate::program::MotionProgram;

pub mod endpoints;
pub mod offset;

pub use endpoints::EndpointOverride;
pub use offset::GlobalOffset;

/// Program-to-program rewrite
pub trait ProgramTransform {
    fn apply(&self, program: MotionProgram) -> MotionProgram;

    /// Transform name, used in logs
    fn name(&self) -> &str;
}

/// Ordered list of transforms
#[derive(Default)]
pub struct TransformPipeline {
    stages: Vec<Box<dyn ProgramTransform>>,
}

impl TransformPipeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn then(mut self, stage: impl ProgramTransform + 'static) -> Self {
        self.stages.push(Box::new(stage));
        self
    }

    /// Offset, then endpoint overrides
    pub fn for_job(job: &JobConfig) -> Self {
        Self::new()
            .then(GlobalOffset::new(job.offset))
            .then(EndpointOverride::new(job.start, job.end))
    }

    pub fn run(&self, program: MotionProgram) -> MotionProgram {
        self.stages.iter().fold(program, |program, stage| {
            tracing::debug!(transform = stage.name(), "applying transform");
            stage.apply(program)
        })
    }

    pub fn len(&self) -> usize {
        self.stages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }
}

/// Offset vector that leaves every coordinate unchanged
pub(crate) fn is_zero(p: Point) -> bool {
    p.x == 0.0 && p.y == 0.0
}
