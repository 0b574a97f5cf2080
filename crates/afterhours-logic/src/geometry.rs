//! 2D primitives shared by every navigation layer.
//!
//! World coordinates grow right (+x) and down (+y), matching screen space.

use serde::{Deserialize, Serialize};

/// 2D vector / point in world units.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn distance_squared(&self, other: &Self) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx * dx + dy * dy
    }

    pub fn distance(&self, other: &Self) -> f32 {
        self.distance_squared(other).sqrt()
    }

    pub fn length(&self) -> f32 {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    pub fn dot(&self, other: &Self) -> f32 {
        self.x * other.x + self.y * other.y
    }

    /// Unit vector in the same direction, or zero for a zero-length input.
    pub fn normalize(&self) -> Self {
        let len = self.length();
        if len > 0.0 {
            Self {
                x: self.x / len,
                y: self.y / len,
            }
        } else {
            Self::ZERO
        }
    }

    /// Move toward `target` by at most `max_step`, never overshooting.
    pub fn move_toward(&self, target: Vec2, max_step: f32) -> Vec2 {
        let diff = target - *self;
        let dist = diff.length();
        if dist <= max_step || dist == 0.0 {
            target
        } else {
            *self + diff * (max_step / dist)
        }
    }
}

impl std::ops::Add for Vec2 {
    type Output = Self;
    fn add(self, other: Self) -> Self {
        Self {
            x: self.x + other.x,
            y: self.y + other.y,
        }
    }
}

impl std::ops::Sub for Vec2 {
    type Output = Self;
    fn sub(self, other: Self) -> Self {
        Self {
            x: self.x - other.x,
            y: self.y - other.y,
        }
    }
}

impl std::ops::Mul<f32> for Vec2 {
    type Output = Self;
    fn mul(self, scalar: f32) -> Self {
        Self {
            x: self.x * scalar,
            y: self.y * scalar,
        }
    }
}

/// Axis-aligned rectangle (top-left origin + size).
///
/// Overlap and containment are half-open: rectangles that merely touch
/// along an edge do not overlap.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    /// Square of side `size` centered on `center`.
    pub fn centered(center: Vec2, size: f32) -> Self {
        let half = size / 2.0;
        Self::new(center.x - half, center.y - half, size, size)
    }

    pub fn left(&self) -> f32 {
        self.x
    }
    pub fn right(&self) -> f32 {
        self.x + self.w
    }
    pub fn top(&self) -> f32 {
        self.y
    }
    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.w / 2.0, self.y + self.h / 2.0)
    }

    pub fn overlaps(&self, other: &Rect) -> bool {
        self.left() < other.right()
            && other.left() < self.right()
            && self.top() < other.bottom()
            && other.top() < self.bottom()
    }

    pub fn contains_point(&self, p: Vec2) -> bool {
        p.x >= self.left() && p.x < self.right() && p.y >= self.top() && p.y < self.bottom()
    }

    /// Grow by `margin` on every side (shrink for negative margins).
    pub fn inflate(&self, margin: f32) -> Rect {
        Rect::new(
            self.x - margin,
            self.y - margin,
            self.w + margin * 2.0,
            self.h + margin * 2.0,
        )
    }

    /// Clamp a point so that a square of half-size `inset` stays inside.
    /// Degenerate rooms collapse onto their center.
    pub fn clamp_point(&self, p: Vec2, inset: f32) -> Vec2 {
        let (lo_x, hi_x) = (self.left() + inset, self.right() - inset);
        let (lo_y, hi_y) = (self.top() + inset, self.bottom() - inset);
        let c = self.center();
        Vec2::new(
            if lo_x <= hi_x { p.x.clamp(lo_x, hi_x) } else { c.x },
            if lo_y <= hi_y { p.y.clamp(lo_y, hi_y) } else { c.y },
        )
    }
}

/// Sprite-facing direction derived from the dominant movement axis.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Facing {
    Up,
    #[default]
    Down,
    Left,
    Right,
}

impl Facing {
    /// Facing for a movement direction; `None` for a zero vector.
    pub fn from_direction(dir: Vec2) -> Option<Facing> {
        if dir.x == 0.0 && dir.y == 0.0 {
            return None;
        }
        Some(if dir.x.abs() > dir.y.abs() {
            if dir.x > 0.0 {
                Facing::Right
            } else {
                Facing::Left
            }
        } else if dir.y > 0.0 {
            Facing::Down
        } else {
            Facing::Up
        })
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Facing::Up => "up",
            Facing::Down => "down",
            Facing::Left => "left",
            Facing::Right => "right",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vec2_operations() {
        let a = Vec2::new(1.0, 2.0);
        let b = Vec2::new(4.0, 6.0);
        assert_eq!(a + b, Vec2::new(5.0, 8.0));
        assert_eq!(b - a, Vec2::new(3.0, 4.0));
        assert_eq!(a * 2.0, Vec2::new(2.0, 4.0));
        assert!((a.distance(&b) - 5.0).abs() < 1e-6);
    }

    #[test]
    fn test_normalize_zero_is_zero() {
        assert_eq!(Vec2::ZERO.normalize(), Vec2::ZERO);
        let n = Vec2::new(3.0, 4.0).normalize();
        assert!((n.length() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_move_toward_does_not_overshoot() {
        let p = Vec2::new(0.0, 0.0);
        assert_eq!(p.move_toward(Vec2::new(3.0, 0.0), 10.0), Vec2::new(3.0, 0.0));
        let q = p.move_toward(Vec2::new(10.0, 0.0), 2.0);
        assert!((q.x - 2.0).abs() < 1e-6);
    }

    #[test]
    fn test_touching_rects_do_not_overlap() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(10.0, 0.0, 10.0, 10.0);
        assert!(!a.overlaps(&b));
        let c = Rect::new(9.5, 9.5, 10.0, 10.0);
        assert!(a.overlaps(&c));
    }

    #[test]
    fn test_contains_point_half_open() {
        let r = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert!(r.contains_point(Vec2::new(0.0, 0.0)));
        assert!(!r.contains_point(Vec2::new(10.0, 5.0)));
    }

    #[test]
    fn test_clamp_point_with_inset() {
        let r = Rect::new(0.0, 0.0, 100.0, 50.0);
        let p = r.clamp_point(Vec2::new(-20.0, 80.0), 10.0);
        assert_eq!(p, Vec2::new(10.0, 40.0));
        let tiny = Rect::new(0.0, 0.0, 4.0, 4.0);
        assert_eq!(tiny.clamp_point(Vec2::new(50.0, 50.0), 10.0), Vec2::new(2.0, 2.0));
    }

    #[test]
    fn test_facing_dominant_axis() {
        assert_eq!(Facing::from_direction(Vec2::new(1.0, 0.2)), Some(Facing::Right));
        assert_eq!(Facing::from_direction(Vec2::new(-0.1, -1.0)), Some(Facing::Up));
        assert_eq!(Facing::from_direction(Vec2::ZERO), None);
    }
}
