//! G-code generator
//! Compiles drawing entities into a motion program, then runs the post-processing transforms

pub mod entities;

pub use entities::{ccw_sweep, convert, CutParams, EntityMotion};

use tracing::{debug, info};

use crate::config::JobConfig;
use crate::model::{GeometryEntity, ToolState};
use crate::post::TransformPipeline;
use crate::program::{Block, MotionProgram, Word};

/// Lines in the fixed footer
pub const FOOTER_LEN: usize = 4;

/// Generated program text plus how many entities made it in
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedProgram {
    pub program: MotionProgram,
    pub entities_processed: usize,
}

impl GeneratedProgram {
    pub fn text(&self) -> String {
        self.program.to_text()
    }
}

pub struct CodeGenerator {
    output: MotionProgram,
    params: CutParams,
    spindle_rpm: f64,
    tool: Option<ToolState>,
    entities_processed: usize,
}

impl CodeGenerator {
    pub fn new(job: &JobConfig) -> Self {
        Self {
            output: MotionProgram::default(),
            params: job.cut_params(),
            spindle_rpm: job.spindle_rpm,
            tool: None,
            entities_processed: 0,
        }
    }

    /// Header, one block group per entity, footer. No transforms applied.
    pub fn generate(mut self, entities: &[GeometryEntity]) -> GeneratedProgram {
        self.emit_header();

        for entity in entities {
            self.emit_entity(entity);
        }

        self.emit_footer();

        GeneratedProgram {
            program: self.output,
            entities_processed: self.entities_processed,
        }
    }

    fn emit_header(&mut self) {
        self.output.header = vec![
            Block::words([Word::g(21)]), // Millimeters
            Block::words([Word::g(90)]), // Absolute
            Block::words([Word::g(17)]), // XY plane
            Block::words([Word::m(3), Word::new('S', self.spindle_rpm, 0)]),
            Block::words([Word::g(0), Word::coord('Z', self.params.safe_z)]),
        ];
    }

    fn emit_entity(&mut self, entity: &GeometryEntity) {
        let Some(motion) = convert(entity, self.tool, &self.params) else {
            return;
        };

        debug!("{} → {} commands", entity.kind(), motion.commands.len());
        for cmd in &motion.commands {
            self.output.push_body(cmd);
        }
        self.tool = motion.tool;
        self.entities_processed += 1;
    }

    fn emit_footer(&mut self) {
        self.output.footer = vec![
            Block::words([Word::g(0), Word::coord('Z', self.params.safe_z)]),
            Block::words([Word::m(5)]),
            // Home, kept literal until an offset rewrites it
            Block::words([
                Word::g(0),
                Word::new('X', 0.0, 0),
                Word::new('Y', 0.0, 0),
            ]),
            Block::words([Word::m(2)]),
        ];
        debug_assert_eq!(self.output.footer.len(), FOOTER_LEN);
    }
}

/// Compile `entities` into a finished program: generate → offset → endpoint overrides
pub fn generate(entities: &[GeometryEntity], job: &JobConfig) -> GeneratedProgram {
    let mut generated = CodeGenerator::new(job).generate(entities);
    generated.program = TransformPipeline::for_job(job).run(generated.program);

    info!(
        "converted {} of {} entities into {} lines",
        generated.entities_processed,
        entities.len(),
        generated.program.len()
    );
    generated
}
