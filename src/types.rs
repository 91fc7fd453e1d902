//! Strongly-typed numeric primitives for label geometry (zero-cost newtypes).
//!
//! Configuration speaks two units: physical sizes are millimetres (`Mm`),
//! typographic sizes and drawing offsets are PostScript points (`Pt`).
//! Geometry is computed exclusively in points; `Mm` only converts.

use std::fmt;
use std::ops::{Add, AddAssign, Div, Mul, Neg, Sub, SubAssign};

use serde::{Deserialize, Serialize};

/// Points per millimetre (1 in = 25.4 mm = 72 pt).
pub const PT_PER_MM: f64 = 72.0 / 25.4;

/// Length in millimetres (configuration unit for physical sizes)
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
#[repr(transparent)]
pub struct Mm(pub f64);

impl Mm {
    pub const ZERO: Mm = Mm(0.0);

    /// Convert to points.
    #[inline]
    pub fn to_pt(self) -> Pt {
        Pt(self.0 * PT_PER_MM)
    }

    #[inline]
    pub fn raw(self) -> f64 {
        self.0
    }
}

impl Add for Mm {
    type Output = Mm;
    fn add(self, rhs: Mm) -> Mm { Mm(self.0 + rhs.0) }
}
impl Sub for Mm {
    type Output = Mm;
    fn sub(self, rhs: Mm) -> Mm { Mm(self.0 - rhs.0) }
}

impl fmt::Display for Mm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}mm", self.0)
    }
}

/// Length in PostScript points (geometry and font unit)
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
#[repr(transparent)]
pub struct Pt(pub f64);

impl Pt {
    pub const ZERO: Pt = Pt(0.0);

    #[inline]
    pub fn raw(self) -> f64 {
        self.0
    }

    #[inline]
    pub fn min(self, other: Pt) -> Pt {
        Pt(self.0.min(other.0))
    }

    #[inline]
    pub fn max(self, other: Pt) -> Pt {
        Pt(self.0.max(other.0))
    }

    #[inline]
    pub fn abs(self) -> Pt {
        Pt(self.0.abs())
    }
}

impl From<i64> for Pt {
    fn from(v: i64) -> Pt { Pt(v as f64) }
}
impl From<u32> for Pt {
    fn from(v: u32) -> Pt { Pt(f64::from(v)) }
}

impl Add for Pt {
    type Output = Pt;
    fn add(self, rhs: Pt) -> Pt { Pt(self.0 + rhs.0) }
}
impl Sub for Pt {
    type Output = Pt;
    fn sub(self, rhs: Pt) -> Pt { Pt(self.0 - rhs.0) }
}
impl Mul<f64> for Pt {
    type Output = Pt;
    fn mul(self, rhs: f64) -> Pt { Pt(self.0 * rhs) }
}
impl Div<f64> for Pt {
    type Output = Pt;
    fn div(self, rhs: f64) -> Pt { Pt(self.0 / rhs) }
}
impl Neg for Pt {
    type Output = Pt;
    fn neg(self) -> Pt { Pt(-self.0) }
}
impl AddAssign for Pt {
    fn add_assign(&mut self, rhs: Pt) {
        self.0 += rhs.0;
    }
}
impl SubAssign for Pt {
    fn sub_assign(&mut self, rhs: Pt) {
        self.0 -= rhs.0;
    }
}

impl fmt::Display for Pt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}pt", self.0)
    }
}

/// RGB color with components in `0.0..=1.0` (PDF device RGB)
#[derive(Clone, Copy, Debug, PartialEq, Default, Serialize, Deserialize)]
pub struct Rgb {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb { r: 0.0, g: 0.0, b: 0.0 };

    pub const fn new(r: f64, g: f64, b: f64) -> Self {
        Rgb { r, g, b }
    }

    pub const fn gray(level: f64) -> Self {
        Rgb { r: level, g: level, b: level }
    }

    /// `rgb(r,g,b)` with 0-255 channels, as used by SVG/CSS.
    pub fn to_css(self) -> String {
        let channel = |c: f64| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        format!("rgb({},{},{})", channel(self.r), channel(self.g), channel(self.b))
    }
}

/// Generic 2D point
#[derive(Clone, Copy, Debug, PartialEq, Default, Serialize, Deserialize)]
pub struct Point<T> {
    pub x: T,
    pub y: T,
}

impl<T> Point<T> {
    pub fn new(x: T, y: T) -> Self { Point { x, y } }
}

/// 2D size
#[derive(Clone, Copy, Debug, PartialEq, Default, Serialize, Deserialize)]
pub struct Size<T> {
    pub w: T,
    pub h: T,
}

impl<T> Size<T> {
    pub fn new(w: T, h: T) -> Self { Size { w, h } }
}

impl Size<Mm> {
    pub fn to_pt(self) -> Size<Pt> {
        Size { w: self.w.to_pt(), h: self.h.to_pt() }
    }
}

/// A displacement vector (not an absolute position).
/// Point + Offset = Point
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct Offset<T> {
    pub dx: T,
    pub dy: T,
}

impl<T> Offset<T> {
    pub fn new(dx: T, dy: T) -> Self {
        Offset { dx, dy }
    }
}

impl Add<Offset<Pt>> for Point<Pt> {
    type Output = Point<Pt>;
    fn add(self, rhs: Offset<Pt>) -> Point<Pt> {
        Point { x: self.x + rhs.dx, y: self.y + rhs.dy }
    }
}

impl AddAssign<Offset<Pt>> for Point<Pt> {
    fn add_assign(&mut self, rhs: Offset<Pt>) {
        self.x += rhs.dx;
        self.y += rhs.dy;
    }
}

impl Sub<Point<Pt>> for Point<Pt> {
    type Output = Offset<Pt>;
    fn sub(self, rhs: Point<Pt>) -> Offset<Pt> {
        Offset { dx: self.x - rhs.x, dy: self.y - rhs.y }
    }
}

/// Axis-aligned bounding box (y grows downward, so `min` is the top-left corner)
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BBox<T> {
    pub min: Point<T>,
    pub max: Point<T>,
}

impl BBox<Pt> {
    /// Create an empty bounding box (will expand on first point)
    pub fn new() -> Self {
        BBox {
            min: Point { x: Pt(f64::MAX), y: Pt(f64::MAX) },
            max: Point { x: Pt(f64::MIN), y: Pt(f64::MIN) },
        }
    }

    /// Box spanning `origin` to `origin + size`
    pub fn from_origin_size(origin: Point<Pt>, size: Size<Pt>) -> Self {
        BBox {
            min: origin,
            max: Point { x: origin.x + size.w, y: origin.y + size.h },
        }
    }

    /// Check if the bbox is empty (never expanded)
    pub fn is_empty(&self) -> bool {
        self.min.x.0 > self.max.x.0 || self.min.y.0 > self.max.y.0
    }

    pub fn expand_point(&mut self, p: Point<Pt>) {
        self.min.x = self.min.x.min(p.x);
        self.min.y = self.min.y.min(p.y);
        self.max.x = self.max.x.max(p.x);
        self.max.y = self.max.y.max(p.y);
    }

    pub fn expand_bbox(&mut self, other: &BBox<Pt>) {
        if other.is_empty() {
            return;
        }
        self.expand_point(other.min);
        self.expand_point(other.max);
    }

    pub fn width(&self) -> Pt { self.max.x - self.min.x }

    pub fn height(&self) -> Pt { self.max.y - self.min.y }

    /// Whether `other` lies inside this box, allowing `tolerance` slack on every side
    pub fn contains(&self, other: &BBox<Pt>, tolerance: Pt) -> bool {
        other.min.x.0 >= self.min.x.0 - tolerance.0
            && other.min.y.0 >= self.min.y.0 - tolerance.0
            && other.max.x.0 <= self.max.x.0 + tolerance.0
            && other.max.y.0 <= self.max.y.0 + tolerance.0
    }
}

impl Default for BBox<Pt> {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenient aliases
pub type PtPoint = Point<Pt>;
pub type PtBox = BBox<Pt>;

#[cfg(test)]
mod tests {
    use super::*;

    // ==================== Unit tests ====================

    #[test]
    fn mm_to_pt_uses_inch_ratio() {
        assert!((Mm(25.4).to_pt().raw() - 72.0).abs() < 1e-9);
        assert_eq!(Mm::ZERO.to_pt(), Pt::ZERO);
    }

    #[test]
    fn pt_arithmetic() {
        let a = Pt(3.0);
        let b = Pt(2.0);

        assert_eq!(a + b, Pt(5.0));
        assert_eq!(a - b, Pt(1.0));
        assert_eq!(a * 2.0, Pt(6.0));
        assert_eq!(a / 2.0, Pt(1.5));
        assert_eq!(-a, Pt(-3.0));
        assert_eq!(a.min(b), b);
        assert_eq!(a.max(b), a);
    }

    #[test]
    fn rgb_to_css_rounds_channels() {
        assert_eq!(Rgb::gray(0.5).to_css(), "rgb(128,128,128)");
        assert_eq!(Rgb::BLACK.to_css(), "rgb(0,0,0)");
        assert_eq!(Rgb::new(1.5, -0.2, 1.0).to_css(), "rgb(255,0,255)");
    }

    // ==================== Point/Offset tests ====================

    #[test]
    fn point_plus_offset_gives_point() {
        let p = Point::new(Pt(1.0), Pt(2.0));
        let o = Offset::new(Pt(3.0), Pt(4.0));
        assert_eq!(p + o, Point::new(Pt(4.0), Pt(6.0)));
    }

    #[test]
    fn point_minus_point_gives_offset() {
        let offset = Point::new(Pt(5.0), Pt(7.0)) - Point::new(Pt(2.0), Pt(3.0));
        assert_eq!(offset, Offset::new(Pt(3.0), Pt(4.0)));
    }

    // ==================== BBox tests ====================

    #[test]
    fn bbox_new_is_empty() {
        assert!(BBox::<Pt>::new().is_empty());
    }

    #[test]
    fn bbox_expand_and_measure() {
        let mut bb = BBox::new();
        bb.expand_point(Point::new(Pt(1.0), Pt(2.0)));
        bb.expand_point(Point::new(Pt(5.0), Pt(8.0)));

        assert!(!bb.is_empty());
        assert_eq!(bb.width(), Pt(4.0));
        assert_eq!(bb.height(), Pt(6.0));
    }

    #[test]
    fn bbox_expand_ignores_empty_box() {
        let origin = Point::new(Pt(0.0), Pt(0.0));
        let mut bb = BBox::from_origin_size(origin, Size::new(Pt(1.0), Pt(1.0)));
        bb.expand_bbox(&BBox::new());
        assert_eq!(bb.max, Point::new(Pt(1.0), Pt(1.0)));
    }

    #[test]
    fn bbox_contains_with_tolerance() {
        let square = |x: Pt, y: Pt, side: Pt| {
            BBox::from_origin_size(Point::new(x, y), Size::new(side, side))
        };
        let outer = square(Pt(0.0), Pt(0.0), Pt(10.0));
        let inner = square(Pt(-0.5), Pt(2.0), Pt(3.0));
        assert!(!outer.contains(&inner, Pt::ZERO));
        assert!(outer.contains(&inner, Pt(1.0)));
    }
}
