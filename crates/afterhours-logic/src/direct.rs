//! Direct-path resolver: straight line if clear, else best of eight.
//!
//! Cheap local steering for agents that don't plan on the grid, and the
//! fallback for grid agents whose search came back empty. It never plans
//! more than one probe ahead, so concave obstacles can still trap it.

use serde::{Deserialize, Serialize};

use crate::constants::direct as defaults;
use crate::geometry::{Rect, Vec2};

/// Resolver tuning.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DirectParams {
    pub arrive_radius: f32,
    pub sample_step: f32,
    pub probe_half: f32,
    pub probe_distance: f32,
    pub alignment_weight: f32,
}

impl Default for DirectParams {
    fn default() -> Self {
        Self {
            arrive_radius: defaults::ARRIVE_RADIUS,
            sample_step: defaults::SAMPLE_STEP,
            probe_half: defaults::PROBE_HALF,
            probe_distance: defaults::PROBE_DISTANCE,
            alignment_weight: defaults::ALIGNMENT_WEIGHT,
        }
    }
}

const DIAG: f32 = std::f32::consts::FRAC_1_SQRT_2;

/// The eight canonical unit directions, in scan order.
pub const CANDIDATES: [Vec2; 8] = [
    Vec2::new(1.0, 0.0),
    Vec2::new(-1.0, 0.0),
    Vec2::new(0.0, 1.0),
    Vec2::new(0.0, -1.0),
    Vec2::new(DIAG, DIAG),
    Vec2::new(-DIAG, DIAG),
    Vec2::new(DIAG, -DIAG),
    Vec2::new(-DIAG, -DIAG),
];

fn probe(center: Vec2, half: f32) -> Rect {
    Rect::new(center.x - half, center.y - half, half * 2.0, half * 2.0)
}

fn hits(footprint: &Rect, obstacles: &[Rect]) -> bool {
    obstacles.iter().any(|o| o.overlaps(footprint))
}

/// Whether a footprint of half-size `params.probe_half` can travel from
/// `from` to `to` without touching an obstacle. Samples are evenly spaced,
/// at most `params.sample_step` apart, and the last one lands on `to`.
pub fn line_clear(from: Vec2, to: Vec2, obstacles: &[Rect], params: &DirectParams) -> bool {
    let dist = from.distance(&to);
    let steps = (dist / params.sample_step.max(1.0)).ceil().max(1.0) as usize;
    (1..=steps).all(|i| {
        let p = from + (to - from) * (i as f32 / steps as f32);
        !hits(&probe(p, params.probe_half), obstacles)
    })
}

/// Movement direction for one tick from `agent` toward `target`.
///
/// - Zero vector when already within `arrive_radius`.
/// - The ideal unit direction when the straight line is clear.
/// - Otherwise the best-scoring of [`CANDIDATES`] whose probe point lies in
///   `bounds` and whose footprint is clear of obstacles, scored as
///   `alignment × alignment_weight − remaining_distance`.
/// - The ideal direction if every candidate is rejected.
pub fn resolve_direction(
    agent: Vec2,
    target: Vec2,
    obstacles: &[Rect],
    bounds: Rect,
    params: &DirectParams,
) -> Vec2 {
    let dist = agent.distance(&target);
    if dist < params.arrive_radius {
        return Vec2::ZERO;
    }
    let ideal = (target - agent).normalize();
    if line_clear(agent, target, obstacles, params) {
        return ideal;
    }

    let mut best: Option<(f32, Vec2)> = None;
    for dir in CANDIDATES {
        let ahead = agent + dir * params.probe_distance;
        if !bounds.contains_point(ahead) || hits(&probe(ahead, params.probe_half), obstacles) {
            continue;
        }
        let score = dir.dot(&ideal) * params.alignment_weight - ahead.distance(&target);
        if best.map_or(true, |(s, _)| score > s) {
            best = Some((score, dir));
        }
    }
    best.map_or(ideal, |(_, dir)| dir)
}
