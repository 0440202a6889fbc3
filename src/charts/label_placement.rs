//! Collision-free placement of labels inside a doughnut hole.

use std::f64::consts::TAU;

use ordered_float::OrderedFloat;
use tracing::trace;

use crate::charts::pie::Sector;
use crate::core::{Bounds, Point, normalize_angle};

const ANCHOR_RATIO: f64 = 0.8;
const ANGLE_STEP: f64 = 0.02;
const ANGLE_ATTEMPTS: usize = 12;
const RESOLVE_ITERATIONS: usize = 20;
const SEPARATION_PADDING: f64 = 2.0;
/// Clearance kept around a label that is settled into a free spot.
const SETTLE_GAP: i32 = 2;
const ANGLE_EPSILON: f64 = 1e-9;

/// Final box of one sector label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LabelPlacement {
    /// Index into the sector list.
    pub sector: usize,
    pub bounds: Bounds,
}

/// Clamps `angle` into the sector swept clockwise from `start` to `end`.
///
/// An `end` below `start` wraps through zero. Angles outside the sector
/// snap to the angularly closer boundary; a tie goes to `start`. Results
/// are normalized to `[0, 2π)`.
#[must_use]
pub fn clamp_angle_to_sector(angle: f64, start: f64, end: f64) -> f64 {
    let angle = normalize_angle(angle);
    if (end - start).abs() >= TAU - ANGLE_EPSILON {
        return angle;
    }
    let start = normalize_angle(start);
    let end = normalize_angle(end);
    let inside = if start <= end {
        angle >= start && angle <= end
    } else {
        angle >= start || angle <= end
    };
    if inside {
        return angle;
    }
    if angular_distance(angle, end) < angular_distance(angle, start) {
        end
    } else {
        start
    }
}

fn angular_distance(a: f64, b: f64) -> f64 {
    let diff = (a - b).abs() % TAU;
    diff.min(TAU - diff)
}

/// Every corner of `bounds` lies within `radius` of the center.
#[must_use]
pub fn is_inside_circle(bounds: Bounds, cx: i32, cy: i32, radius: f64) -> bool {
    bounds.corners().iter().all(|corner| {
        let dx = f64::from(corner.x - cx);
        let dy = f64::from(corner.y - cy);
        (dx * dx + dy * dy).sqrt() <= radius + ANGLE_EPSILON
    })
}

/// Moves `bounds` inside the circle when possible.
///
/// The box is first shifted horizontally into the circle chord at its
/// vertical center, then nudged one pixel at a time toward the center. A
/// box that cannot fit ends up centered on the circle. Applying the clamp
/// to its own result returns that result.
#[must_use]
pub fn clamp_inside_circle(bounds: Bounds, cx: i32, cy: i32, radius: f64) -> Bounds {
    let width = bounds.width();
    let height = bounds.height();
    let centered = Bounds::from_size(cx - width / 2, cy - height / 2, width, height);
    if bounds == centered || is_inside_circle(bounds, cx, cy, radius) {
        return bounds;
    }
    let mut candidate = bounds;

    let center_y = f64::from(bounds.top + bounds.bottom) / 2.0;
    let dy = center_y - f64::from(cy);
    if dy.abs() < radius {
        let half_chord = (radius * radius - dy * dy).sqrt();
        if f64::from(width) <= 2.0 * half_chord {
            let chord_left = f64::from(cx) - half_chord;
            let chord_right = f64::from(cx) + half_chord;
            if f64::from(candidate.left) < chord_left {
                candidate = candidate.shift((chord_left - f64::from(candidate.left)).ceil() as i32, 0);
            } else if f64::from(candidate.right) > chord_right {
                candidate =
                    candidate.shift(-((f64::from(candidate.right) - chord_right).ceil() as i32), 0);
            }
            if is_inside_circle(candidate, cx, cy, radius) {
                return candidate;
            }
        }
    }

    let max_steps = (f64::from(width + height) + 4.0 * radius).ceil() as usize + 1;
    for _ in 0..max_steps {
        let diff_x = f64::from(cx) - f64::from(candidate.left + candidate.right) / 2.0;
        let diff_y = f64::from(cy) - f64::from(candidate.top + candidate.bottom) / 2.0;
        let step_x = if diff_x.abs() >= 1.0 { diff_x.signum() as i32 } else { 0 };
        let step_y = if diff_y.abs() >= 1.0 { diff_y.signum() as i32 } else { 0 };
        if step_x == 0 && step_y == 0 {
            break;
        }
        candidate = candidate.shift(step_x, step_y);
        if is_inside_circle(candidate, cx, cy, radius) {
            return candidate;
        }
    }
    centered
}

fn label_box(cx: i32, cy: i32, anchor: f64, angle: f64, size: (i32, i32)) -> Bounds {
    let (width, height) = size;
    let (sin, cos) = angle.sin_cos();
    let ax = f64::from(cx) + anchor * cos;
    let ay = f64::from(cy) + anchor * sin;
    let left = if cos < 0.0 { ax - f64::from(width) } else { ax };
    let top = ay - f64::from(height) / 2.0;
    Bounds::from_size(left.round() as i32, top.round() as i32, width, height)
}

fn box_center(bounds: Bounds) -> (f64, f64) {
    (
        f64::from(bounds.left + bounds.right) / 2.0,
        f64::from(bounds.top + bounds.bottom) / 2.0,
    )
}

/// Places one label per sector with a non-empty label inside the hole of
/// radius `inner_radius`. `sizes[i]` is the text size of sector `i`.
///
/// Labels are placed largest value first, so the largest label takes its
/// midAngle anchor (clamped into the hole) and never moves afterwards.
/// Collisions always move the smaller value.
#[must_use]
pub fn place_center_labels(
    sectors: &[Sector],
    sizes: &[(i32, i32)],
    cx: i32,
    cy: i32,
    inner_radius: f64,
) -> Vec<LabelPlacement> {
    let anchor = ANCHOR_RATIO * inner_radius;
    let mut order: Vec<usize> = (0..sectors.len())
        .filter(|index| sectors[*index].show_label && !sectors[*index].label.is_empty())
        .collect();
    order.sort_by(|a, b| {
        OrderedFloat(sectors[*b].value)
            .cmp(&OrderedFloat(sectors[*a].value))
            .then_with(|| OrderedFloat(sectors[*a].mid_angle).cmp(&OrderedFloat(sectors[*b].mid_angle)))
    });

    let mut placed: Vec<LabelPlacement> = Vec::with_capacity(order.len());
    for &index in &order {
        let sector = &sectors[index];
        let size = sizes.get(index).copied().unwrap_or((0, 0));
        let fits = |bounds: Bounds, placed: &[LabelPlacement]| {
            is_inside_circle(bounds, cx, cy, inner_radius)
                && placed.iter().all(|other| !other.bounds.overlaps(bounds))
        };
        let mut chosen = label_box(cx, cy, anchor, sector.mid_angle, size);
        if !fits(chosen, &placed) {
            let attempt = (1..=ANGLE_ATTEMPTS)
                .flat_map(|step| [1.0, -1.0].map(|sign| sign * step as f64 * ANGLE_STEP))
                .map(|offset| label_box(cx, cy, anchor, sector.mid_angle + offset, size))
                .find(|bounds| fits(*bounds, &placed));
            chosen = attempt.unwrap_or_else(|| clamp_inside_circle(chosen, cx, cy, inner_radius));
        }
        placed.push(LabelPlacement {
            sector: index,
            bounds: chosen,
        });
    }

    // Keep each label on the side of the center its sector points to.
    for placement in &mut placed {
        let cos = sectors[placement.sector].mid_angle.cos();
        let (center_x, _) = box_center(placement.bounds);
        let offset = center_x - f64::from(cx);
        if (cos >= 0.0 && offset < 0.0) || (cos < 0.0 && offset > 0.0) {
            let shift = offset.abs().ceil() as i32 + 1;
            let dx = if cos >= 0.0 { shift } else { -shift };
            placement.bounds = clamp_inside_circle(placement.bounds.shift(dx, 0), cx, cy, inner_radius);
        }
    }

    let mut iterations = 0;
    for _ in 0..RESOLVE_ITERATIONS {
        iterations += 1;
        let mut moved = false;
        for i in 0..placed.len() {
            for j in (i + 1)..placed.len() {
                if !placed[i].bounds.overlaps(placed[j].bounds) {
                    continue;
                }
                let value_i = sectors[placed[i].sector].value;
                let value_j = sectors[placed[j].sector].value;
                let (mover, other) = if value_i < value_j { (i, j) } else { (j, i) };
                let shifted = separate(
                    placed[mover].bounds,
                    placed[other].bounds,
                    sectors[placed[mover].sector].mid_angle,
                );
                placed[mover].bounds = clamp_inside_circle(shifted, cx, cy, inner_radius);
                moved = true;
            }
        }
        if !moved {
            break;
        }
    }
    let settled = settle_overlaps(&mut placed, cx, cy, inner_radius);
    trace!(labels = placed.len(), iterations, settled, "center labels placed");
    placed
}

/// Moves every label that still overlaps a larger one to the free spot
/// inside the circle nearest to where it stands. `placed` is ordered by
/// descending value; a label that finds no free spot stays put.
fn settle_overlaps(placed: &mut [LabelPlacement], cx: i32, cy: i32, radius: f64) -> usize {
    let mut settled = 0;
    for index in 1..placed.len() {
        let (larger, rest) = placed.split_at_mut(index);
        let current = &mut rest[0];
        if larger.iter().all(|other| !other.bounds.overlaps(current.bounds)) {
            continue;
        }
        if let Some(spot) = nearest_free_spot(current.bounds, larger, cx, cy, radius) {
            current.bounds = spot;
            settled += 1;
        }
    }
    settled
}

/// Closest position for a box of the same size that fits the circle and
/// keeps `SETTLE_GAP` pixels from every box in `taken`.
fn nearest_free_spot(
    bounds: Bounds,
    taken: &[LabelPlacement],
    cx: i32,
    cy: i32,
    radius: f64,
) -> Option<Bounds> {
    let (width, height) = (bounds.width(), bounds.height());
    let (min_x, max_x) = (
        (f64::from(cx) - radius).floor() as i32,
        (f64::from(cx) + radius).ceil() as i32 - width,
    );
    let (min_y, max_y) = (
        (f64::from(cy) - radius).floor() as i32,
        (f64::from(cy) + radius).ceil() as i32 - height,
    );
    let gap = Bounds::uniform(-SETTLE_GAP);
    // Doubled centers keep the distance integral.
    let (origin_x, origin_y) = (
        i64::from(bounds.left + bounds.right),
        i64::from(bounds.top + bounds.bottom),
    );
    let mut best: Option<(i64, Bounds)> = None;
    for top in min_y..=max_y {
        for left in min_x..=max_x {
            let dx = i64::from(2 * left + width) - origin_x;
            let dy = i64::from(2 * top + height) - origin_y;
            let distance = dx * dx + dy * dy;
            if best.is_some_and(|(closest, _)| distance >= closest) {
                continue;
            }
            let candidate = Bounds::from_size(left, top, width, height);
            if !is_inside_circle(candidate, cx, cy, radius) {
                continue;
            }
            let padded = candidate.inset(gap);
            if taken.iter().any(|other| other.bounds.overlaps(padded)) {
                continue;
            }
            best = Some((distance, candidate));
        }
    }
    best.map(|(_, spot)| spot)
}

/// Moves `mover` away from `other` along the line between their centers
/// (radially when the centers coincide) until the boxes clear by 2 px.
fn separate(mover: Bounds, other: Bounds, mid_angle: f64) -> Bounds {
    let (mx, my) = box_center(mover);
    let (ox, oy) = box_center(other);
    let (mut ux, mut uy) = (mx - ox, my - oy);
    let length = (ux * ux + uy * uy).sqrt();
    if length < ANGLE_EPSILON {
        ux = mid_angle.cos();
        uy = mid_angle.sin();
    } else {
        ux /= length;
        uy /= length;
    }
    let overlap_x = f64::from(mover.right.min(other.right) - mover.left.max(other.left));
    let overlap_y = f64::from(mover.bottom.min(other.bottom) - mover.top.max(other.top));
    let along_x = if ux.abs() > ANGLE_EPSILON { overlap_x / ux.abs() } else { f64::INFINITY };
    let along_y = if uy.abs() > ANGLE_EPSILON { overlap_y / uy.abs() } else { f64::INFINITY };
    let distance = along_x.min(along_y) + SEPARATION_PADDING;
    mover.shift((ux * distance).round() as i32, (uy * distance).round() as i32)
}

/// End point of the leader line from a center label to the ring.
///
/// The line leaves the label edge facing the sector and meets the inner
/// boundary at the angle toward that edge, clamped to the sector.
#[must_use]
pub fn leader_line(sector: &Sector, label: Bounds, cx: i32, cy: i32, inner_radius: f64) -> (Point, Point) {
    let edge_x = if matches!(sector.quadrant, 1 | 4) {
        label.right
    } else {
        label.left
    };
    let (_, center_y) = box_center(label);
    let half_height = f64::from(label.height()) / 2.0;
    let edge_y = if (center_y - f64::from(cy)).abs() < half_height {
        label.top + label.height() / 2
    } else if center_y < f64::from(cy) {
        label.top
    } else {
        label.bottom
    };
    let angle = f64::from(edge_y - cy).atan2(f64::from(edge_x - cx));
    let angle = clamp_angle_to_sector(angle, sector.start, sector.start + sector.delta);
    let ring = Point::new(
        cx + (inner_radius * angle.cos()).round() as i32,
        cy + (inner_radius * angle.sin()).round() as i32,
    );
    (Point::new(edge_x, edge_y), ring)
}

#[cfg(test)]
mod tests {
    use std::f64::consts::{FRAC_PI_2, PI};

    use super::{
        LabelPlacement, clamp_angle_to_sector, clamp_inside_circle, is_inside_circle, separate,
        settle_overlaps,
    };
    use crate::core::Bounds;

    #[test]
    fn wrapped_sector_tie_snaps_to_start() {
        let clamped = clamp_angle_to_sector(PI, 3.0 * FRAC_PI_2, FRAC_PI_2);
        assert!((clamped - 3.0 * FRAC_PI_2).abs() < 1e-12);
    }

    #[test]
    fn inside_angle_is_kept() {
        let clamped = clamp_angle_to_sector(0.1, -0.5, 0.5);
        assert!((clamped - 0.1).abs() < 1e-12);
        let inside_wrap = clamp_angle_to_sector(-0.2, -0.5, 0.5);
        assert!((inside_wrap - (std::f64::consts::TAU - 0.2)).abs() < 1e-12);
    }

    #[test]
    fn chord_shift_moves_box_in() {
        let bounds = Bounds::from_size(-60, -5, 30, 10);
        let clamped = clamp_inside_circle(bounds, 0, 0, 50.0);
        assert!(is_inside_circle(clamped, 0, 0, 50.0));
        assert_eq!(clamped.top, bounds.top);
        assert_eq!(clamped, clamp_inside_circle(clamped, 0, 0, 50.0));
    }

    #[test]
    fn oversized_box_is_centered() {
        let clamped = clamp_inside_circle(Bounds::from_size(100, 100, 200, 20), 0, 0, 50.0);
        assert_eq!(clamped, Bounds::from_size(-100, -10, 200, 20));
    }

    #[test]
    fn separation_clears_overlap() {
        let mover = Bounds::from_size(0, 5, 20, 10);
        let other = Bounds::from_size(0, 0, 20, 10);
        let moved = separate(mover, other, 0.0);
        assert!(!moved.overlaps(other));
    }

    #[test]
    fn settling_moves_only_the_smaller_label() {
        let mut placed = [
            LabelPlacement {
                sector: 0,
                bounds: Bounds::from_size(-20, -5, 40, 10),
            },
            LabelPlacement {
                sector: 1,
                bounds: Bounds::from_size(-10, -2, 40, 10),
            },
        ];
        assert_eq!(settle_overlaps(&mut placed, 0, 0, 60.0), 1);
        assert_eq!(placed[0].bounds, Bounds::from_size(-20, -5, 40, 10));
        assert!(!placed[0].bounds.overlaps(placed[1].bounds));
        assert!(is_inside_circle(placed[1].bounds, 0, 0, 60.0));
        assert_eq!(placed[1].bounds.width(), 40);
    }
}
