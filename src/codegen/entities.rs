//! Per-entity motion generation
//!
//! Every entity follows the same pattern: rapid to its start (skipped when the
//! tool is already there), plunge to cut depth, cut, retract to safe height.

use tracing::{debug, warn};

use crate::model::{GeometryEntity, MotionCommand, Point, PolylineVertex, ToolState, ARC_DIRECTION};

/// Feeds and heights shared by every entity of a job
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CutParams {
    pub feed_xy: f64,
    pub feed_z: f64,
    pub safe_z: f64,
    pub cut_z: f64,
}

/// Commands for one entity and where the tool ends up afterwards
#[derive(Debug, Clone, PartialEq)]
pub struct EntityMotion {
    pub commands: Vec<MotionCommand>,
    pub tool: Option<ToolState>,
}

/// Compile one entity.
///
/// `tool` is `None` until the first move has been made; returns `None` for
/// entities with no mapping (they are skipped, not counted).
pub fn convert(
    entity: &GeometryEntity,
    tool: Option<ToolState>,
    params: &CutParams,
) -> Option<EntityMotion> {
    let motion = match entity {
        GeometryEntity::Line { start, end } => line(*start, *end, tool, params),
        GeometryEntity::Arc {
            center,
            radius,
            start_angle,
            end_angle,
        } => arc(*center, *radius, *start_angle, *end_angle, tool, params),
        GeometryEntity::Circle { center, radius } => circle(*center, *radius, tool, params),
        GeometryEntity::Polyline { vertices, closed } => polyline(vertices, *closed, tool, params),
        GeometryEntity::Unsupported => {
            debug!("skipping unsupported entity");
            return None;
        }
    };
    Some(motion)
}

/// Rapid over `start` unless already there, then plunge
fn approach(
    start: Point,
    tool: Option<ToolState>,
    params: &CutParams,
    out: &mut Vec<MotionCommand>,
) {
    if !tool.map_or(false, |t| t.is_at(start)) {
        out.push(MotionCommand::RapidXY {
            x: start.x,
            y: start.y,
        });
    }
    out.push(MotionCommand::LinearZ {
        z: params.cut_z,
        feed: params.feed_z,
    });
}

fn retract(params: &CutParams, out: &mut Vec<MotionCommand>) {
    out.push(MotionCommand::RapidZ { z: params.safe_z });
}

fn arc_to(end: Point, center: Point, from: Point, feed: f64) -> MotionCommand {
    MotionCommand::ArcXY {
        x: end.x,
        y: end.y,
        i: center.x - from.x,
        j: center.y - from.y,
        feed,
        clockwise: ARC_DIRECTION.is_clockwise(),
    }
}

fn finish(commands: Vec<MotionCommand>, at: Point, params: &CutParams) -> EntityMotion {
    EntityMotion {
        commands,
        tool: Some(ToolState::new(at.x, at.y, params.safe_z)),
    }
}

fn line(start: Point, end: Point, tool: Option<ToolState>, params: &CutParams) -> EntityMotion {
    debug!(
        "LINE from ({:.2}, {:.2}) to ({:.2}, {:.2})",
        start.x, start.y, end.x, end.y
    );

    let mut out = Vec::with_capacity(4);
    approach(start, tool, params, &mut out);
    out.push(MotionCommand::LinearXY {
        x: end.x,
        y: end.y,
        feed: params.feed_xy,
    });
    retract(params, &mut out);
    finish(out, end, params)
}

/// Counter-clockwise sweep from `start_deg` to `end_deg`, in `[0, 360)`
pub fn ccw_sweep(start_deg: f64, end_deg: f64) -> f64 {
    (end_deg - start_deg).rem_euclid(360.0)
}

fn arc(
    center: Point,
    radius: f64,
    start_angle: f64,
    end_angle: f64,
    tool: Option<ToolState>,
    params: &CutParams,
) -> EntityMotion {
    let start_deg = start_angle.rem_euclid(360.0);
    let end_deg = end_angle.rem_euclid(360.0);
    let start = center.polar(radius, start_deg);
    let end = center.polar(radius, end_deg);
    let sweep = ccw_sweep(start_deg, end_deg);

    debug!(
        "ARC center=({:.2}, {:.2}) R={:.2} {:.2}°→{:.2}° sweep {:.2}°",
        center.x, center.y, radius, start_deg, end_deg, sweep
    );

    let mut out = Vec::with_capacity(6);
    if radius == 0.0 {
        warn!("zero-radius arc at ({:.3}, {:.3})", center.x, center.y);
        out.push(MotionCommand::comment(format!(
            "WARNING: zero-radius arc at ({:.2}, {:.2})",
            center.x, center.y
        )));
    }

    approach(start, tool, params, &mut out);
    if sweep <= 180.0 {
        out.push(arc_to(end, center, start, params.feed_xy));
    } else {
        // Major arc: split where a 180° CCW sweep from the start lands
        let mid = center.polar(radius, (start_deg + 180.0).rem_euclid(360.0));
        out.push(arc_to(mid, center, start, params.feed_xy));
        out.push(arc_to(end, center, mid, params.feed_xy));
    }
    retract(params, &mut out);
    finish(out, end, params)
}

fn circle(center: Point, radius: f64, tool: Option<ToolState>, params: &CutParams) -> EntityMotion {
    debug!(
        "CIRCLE center=({:.2}, {:.2}) R={:.2}",
        center.x, center.y, radius
    );

    // Two semicircles split on the horizontal diameter
    let west = Point::new(center.x - radius, center.y);
    let east = Point::new(center.x + radius, center.y);

    let mut out = Vec::with_capacity(6);
    if radius == 0.0 {
        warn!("zero-radius circle at ({:.3}, {:.3})", center.x, center.y);
        out.push(MotionCommand::comment(format!(
            "WARNING: zero-radius circle at ({:.2}, {:.2})",
            center.x, center.y
        )));
    }

    approach(west, tool, params, &mut out);
    out.push(arc_to(east, center, west, params.feed_xy));
    out.push(arc_to(west, center, east, params.feed_xy));
    retract(params, &mut out);
    finish(out, west, params)
}

fn polyline(
    vertices: &[PolylineVertex],
    closed: bool,
    tool: Option<ToolState>,
    params: &CutParams,
) -> EntityMotion {
    debug!("LWPOLYLINE with {} points", vertices.len());

    let Some(first) = vertices.first() else {
        return EntityMotion {
            commands: Vec::new(),
            tool,
        };
    };

    let mut out = Vec::with_capacity(vertices.len() + 3);
    approach(first.point(), tool, params, &mut out);

    let closing = closed.then(|| (vertices[vertices.len() - 1], *first));
    let segments = vertices
        .windows(2)
        .map(|pair| (pair[0], pair[1]))
        .chain(closing);

    let mut at = first.point();
    for (from, to) in segments {
        if from.bulge != 0.0 {
            // Curvature is not reproduced; the chord is cut instead
            warn!(
                "polyline bulge {:.2} from ({:.2}, {:.2}) to ({:.2}, {:.2}) cut as straight line",
                from.bulge, from.x, from.y, to.x, to.y
            );
            out.push(MotionCommand::comment(format!(
                "WARNING: LWPOLYLINE bulge segment from ({:.2}, {:.2}) to ({:.2}, {:.2}) treated as straight line.",
                from.x, from.y, to.x, to.y
            )));
        }
        out.push(MotionCommand::LinearXY {
            x: to.x,
            y: to.y,
            feed: params.feed_xy,
        });
        at = to.point();
    }

    retract(params, &mut out);
    finish(out, at, params)
}
