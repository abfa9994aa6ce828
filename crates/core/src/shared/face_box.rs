/// Axis-aligned face bounding box in pixel coordinates.
///
/// Detectors produce boxes in the coordinate space of the frame they ran
/// on; `scaled` maps them onto a differently sized display surface.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FaceBox {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl FaceBox {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn from_corners(x1: f32, y1: f32, x2: f32, y2: f32) -> Self {
        Self {
            x: x1.min(x2),
            y: y1.min(y2),
            width: (x2 - x1).abs(),
            height: (y2 - y1).abs(),
        }
    }

    /// Maps the box to a surface scaled by `(sx, sy)`.
    pub fn scaled(&self, sx: f32, sy: f32) -> FaceBox {
        FaceBox {
            x: self.x * sx,
            y: self.y * sy,
            width: self.width * sx,
            height: self.height * sy,
        }
    }

    /// Intersects the box with `[0, width] x [0, height]`.
    ///
    /// A box entirely outside the surface collapses to zero size at the
    /// nearest edge.
    pub fn clamped_to(&self, width: u32, height: u32) -> FaceBox {
        let max_x = width as f32;
        let max_y = height as f32;
        let x1 = self.x.clamp(0.0, max_x);
        let y1 = self.y.clamp(0.0, max_y);
        let x2 = (self.x + self.width).clamp(0.0, max_x);
        let y2 = (self.y + self.height).clamp(0.0, max_y);
        FaceBox::from_corners(x1, y1, x2, y2)
    }

    /// Smallest square containing the box grown by `margin` (fraction of the
    /// larger side) on every edge. Classifier crops want square inputs with
    /// some context around the face.
    pub fn square_expanded(&self, margin: f32) -> FaceBox {
        let (cx, cy) = self.center();
        let half = self.width.max(self.height) * (1.0 + margin) / 2.0;
        FaceBox {
            x: cx - half,
            y: cy - half,
            width: half * 2.0,
            height: half * 2.0,
        }
    }

    pub fn center(&self) -> (f32, f32) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    pub fn area(&self) -> f32 {
        self.width * self.height
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rstest::rstest;

    #[test]
    fn test_from_corners_normalizes_order() {
        let b = FaceBox::from_corners(50.0, 80.0, 10.0, 20.0);
        assert_relative_eq!(b.x, 10.0);
        assert_relative_eq!(b.y, 20.0);
        assert_relative_eq!(b.width, 40.0);
        assert_relative_eq!(b.height, 60.0);
    }

    #[test]
    fn test_scaled_maps_to_display_space() {
        // Detector space 320x240 → display 640x480
        let b = FaceBox::new(32.0, 24.0, 64.0, 48.0).scaled(2.0, 2.0);
        assert_relative_eq!(b.x, 64.0);
        assert_relative_eq!(b.y, 48.0);
        assert_relative_eq!(b.width, 128.0);
        assert_relative_eq!(b.height, 96.0);
    }

    #[test]
    fn test_scaled_non_uniform() {
        let b = FaceBox::new(10.0, 10.0, 100.0, 100.0).scaled(0.5, 2.0);
        assert_relative_eq!(b.width, 50.0);
        assert_relative_eq!(b.height, 200.0);
    }

    #[test]
    fn test_clamped_inside_is_unchanged() {
        let b = FaceBox::new(10.0, 20.0, 30.0, 40.0);
        assert_eq!(b.clamped_to(100, 100), b);
    }

    #[test]
    fn test_clamped_trims_overhang() {
        let b = FaceBox::new(-10.0, 80.0, 50.0, 50.0).clamped_to(100, 100);
        assert_relative_eq!(b.x, 0.0);
        assert_relative_eq!(b.y, 80.0);
        assert_relative_eq!(b.width, 40.0);
        assert_relative_eq!(b.height, 20.0);
    }

    #[test]
    fn test_clamped_fully_outside_collapses() {
        let b = FaceBox::new(200.0, 200.0, 50.0, 50.0).clamped_to(100, 100);
        assert!(b.is_empty());
    }

    #[test]
    fn test_square_expanded_is_square_around_center() {
        let b = FaceBox::new(10.0, 20.0, 40.0, 20.0);
        let sq = b.square_expanded(0.0);
        assert_relative_eq!(sq.width, 40.0);
        assert_relative_eq!(sq.height, 40.0);
        assert_eq!(sq.center(), b.center());
    }

    #[test]
    fn test_square_expanded_applies_margin() {
        let sq = FaceBox::new(0.0, 0.0, 100.0, 50.0).square_expanded(0.2);
        assert_relative_eq!(sq.width, 120.0);
        assert_relative_eq!(sq.height, 120.0);
    }

    #[rstest]
    #[case::zero_width(FaceBox::new(0.0, 0.0, 0.0, 10.0), true)]
    #[case::zero_height(FaceBox::new(0.0, 0.0, 10.0, 0.0), true)]
    #[case::positive(FaceBox::new(0.0, 0.0, 1.0, 1.0), false)]
    fn test_is_empty(#[case] b: FaceBox, #[case] expected: bool) {
        assert_eq!(b.is_empty(), expected);
    }

    #[test]
    fn test_area() {
        assert_relative_eq!(FaceBox::new(0.0, 0.0, 4.0, 5.0).area(), 20.0);
    }
}
