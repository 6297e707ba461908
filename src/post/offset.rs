//! Global work offset
//!
//! Shifts every X and Y word in the whole program, header and footer
//! included, so the footer's home move is offset too.

use crate::model::Point;
use crate::post::{is_zero, ProgramTransform};
use crate::program::MotionProgram;

pub struct GlobalOffset {
    offset: Point,
}

impl GlobalOffset {
    pub fn new(offset: Point) -> Self {
        Self { offset }
    }
}

impl ProgramTransform for GlobalOffset {
    fn apply(&self, mut program: MotionProgram) -> MotionProgram {
        if is_zero(self.offset) {
            return program;
        }

        for block in program.blocks_mut() {
            for w in block.words_mut('X') {
                w.set_coord(w.value() + self.offset.x);
            }
            for w in block.words_mut('Y') {
                w.set_coord(w.value() + self.offset.y);
            }
        }
        program
    }

    fn name(&self) -> &str {
        "global offset"
    }
}
