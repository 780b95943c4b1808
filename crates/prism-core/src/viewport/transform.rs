use crate::geometry::{Point, Rect};

/// Scene-to-surface mapping: `surface = scene * scale + translation`.
///
/// No rotation or shear; the two axes scale independently.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewTransform {
    pub sx: f64,
    pub sy: f64,
    pub tx: f64,
    pub ty: f64,
}

impl Default for ViewTransform {
    fn default() -> Self {
        Self::identity()
    }
}

impl ViewTransform {
    pub const fn identity() -> Self {
        Self {
            sx: 1.0,
            sy: 1.0,
            tx: 0.0,
            ty: 0.0,
        }
    }

    pub fn is_invertible(&self) -> bool {
        self.sx != 0.0 && self.sy != 0.0 && self.sx.is_finite() && self.sy.is_finite()
    }

    pub fn map(&self, p: Point) -> Point {
        Point::new(p.x * self.sx + self.tx, p.y * self.sy + self.ty)
    }

    /// Surface to scene. A singular transform maps everything to the origin.
    pub fn inverse_map(&self, p: Point) -> Point {
        if !self.is_invertible() {
            return Point::default();
        }
        Point::new((p.x - self.tx) / self.sx, (p.y - self.ty) / self.sy)
    }

    pub fn map_rect(&self, r: Rect) -> Rect {
        let a = self.map(Point::new(r.x, r.y));
        let b = self.map(Point::new(r.right(), r.bottom()));
        Rect::from_points(a, b)
    }

    pub fn inverse_map_rect(&self, r: Rect) -> Rect {
        let a = self.inverse_map(Point::new(r.x, r.y));
        let b = self.inverse_map(Point::new(r.right(), r.bottom()));
        Rect::from_points(a, b)
    }

    /// Multiply the scale while keeping the scene point under `anchor`
    /// (a surface position) where it is.
    pub fn scale_about(&mut self, fx: f64, fy: f64, anchor: Point) {
        let fixed = self.inverse_map(anchor);
        self.sx *= fx;
        self.sy *= fy;
        self.tx = anchor.x - fixed.x * self.sx;
        self.ty = anchor.y - fixed.y * self.sy;
    }

    /// Translate so that scene point `p` lands on surface point `target`.
    pub fn align(&mut self, p: Point, target: Point) {
        self.tx = target.x - p.x * self.sx;
        self.ty = target.y - p.y * self.sy;
    }
}
