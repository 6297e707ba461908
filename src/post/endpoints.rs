//! Start/end point overrides
//!
//! Operates on the body only. The first body line carrying both X and Y gets
//! the requested start point written over its coordinates, the last such line
//! gets the end point. Values are written as given, not offset. I/J words are
//! left alone, so an overridden arc keeps its original center offset.

use tracing::debug;

use crate::model::Point;
use crate::post::ProgramTransform;
use crate::program::{Block, MotionProgram};

pub struct EndpointOverride {
    start: Option<Point>,
    end: Option<Point>,
}

impl EndpointOverride {
    pub fn new(start: Option<Point>, end: Option<Point>) -> Self {
        Self { start, end }
    }
}

fn overwrite(block: &mut Block, p: Point) {
    for w in block.words_mut('X') {
        w.set_coord(p.x);
    }
    for w in block.words_mut('Y') {
        w.set_coord(p.y);
    }
}

impl ProgramTransform for EndpointOverride {
    fn apply(&self, mut program: MotionProgram) -> MotionProgram {
        if let Some(start) = self.start {
            if let Some(block) = program.body.iter_mut().find(|b| b.is_xy_move()) {
                debug!("start override → ({:.3}, {:.3})", start.x, start.y);
                overwrite(block, start);
            }
        }
        if let Some(end) = self.end {
            if let Some(block) = program.body.iter_mut().rev().find(|b| b.is_xy_move()) {
                debug!("end override → ({:.3}, {:.3})", end.x, end.y);
                overwrite(block, end);
            }
        }
        program
    }

    fn name(&self) -> &str {
        "endpoint override"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn program(body: &[&str]) -> MotionProgram {
        MotionProgram {
            header: vec![Block::parse("G00 Z5.000").expect("block")],
            body: body.iter().filter_map(|l| Block::parse(l)).collect(),
            footer: vec![
                Block::parse("G00 Z5.000").expect("block"),
                Block::parse("M5").expect("block"),
                Block::parse("G00 X0 Y0").expect("block"),
                Block::parse("M2").expect("block"),
            ],
        }
    }

    fn text(p: &MotionProgram) -> Vec<String> {
        p.body.iter().map(|b| b.to_string()).collect()
    }

    #[test]
    fn test_first_and_last_xy_lines() {
        let input = program(&[
            "G00 X0.000 Y0.000",
            "G01 Z-0.300 F100.0",
            "G01 X50.000 Y50.000 F300.0",
            "G02 X100.000 Y25.000 I25.000 J0.000 F300.0",
            "G00 Z5.000",
        ]);
        let out = EndpointOverride::new(Some(Point::new(-1.0, 2.5)), Some(Point::new(7.0, 8.0)))
            .apply(input);

        assert_eq!(
            text(&out),
            vec![
                "G00 X-1.000 Y2.500",
                "G01 Z-0.300 F100.0",
                "G01 X50.000 Y50.000 F300.0",
                // Center offset untouched even though the endpoint moved
                "G02 X7.000 Y8.000 I25.000 J0.000 F300.0",
                "G00 Z5.000",
            ]
        );
        // Footer home move is never overridden
        assert_eq!(out.footer[2].to_string(), "G00 X0 Y0");
    }

    #[test]
    fn test_none_leaves_program_alone() {
        let input = program(&["G00 X3.000 Y4.000", "G01 X5.000 Y6.000 F300.0"]);
        let out = EndpointOverride::new(None, None).apply(input.clone());

        assert_eq!(out, input);
    }

    #[test]
    fn test_explicit_origin_is_an_override() {
        let input = program(&["G00 X3.000 Y4.000", "G01 X5.000 Y6.000 F300.0"]);
        let out = EndpointOverride::new(Some(Point::new(0.0, 0.0)), None).apply(input);

        assert_eq!(text(&out), vec!["G00 X0.000 Y0.000", "G01 X5.000 Y6.000 F300.0"]);
    }

    #[test]
    fn test_single_xy_line_gets_end_last() {
        let input = program(&["G00 X3.000 Y4.000"]);
        let out = EndpointOverride::new(Some(Point::new(1.0, 1.0)), Some(Point::new(2.0, 2.0)))
            .apply(input);

        assert_eq!(text(&out), vec!["G00 X2.000 Y2.000"]);
    }

    #[test]
    fn test_comment_lines_skipped() {
        let input = program(&[
            "; WARNING: LWPOLYLINE bulge segment from (1.00, 2.00) to (3.00, 4.00)",
            "G01 X5.000 Y6.000 F300.0",
        ]);
        let out = EndpointOverride::new(Some(Point::new(9.0, 9.0)), None).apply(input);

        assert_eq!(text(&out)[1], "G01 X9.000 Y9.000 F300.0");
    }
}
