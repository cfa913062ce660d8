/// Axis-aligned box in source-image pixel coordinates: `(x1, y1)` top-left,
/// `(x2, y2)` bottom-right.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoundingBox {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

impl BoundingBox {
    pub fn new(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Self { x1, y1, x2, y2 }
    }

    /// Integer bounds with each coordinate truncated toward zero.
    pub fn pixel_bounds(&self) -> PixelBounds {
        // `as` truncates toward zero and saturates NaN to 0.
        PixelBounds {
            x1: self.x1 as i64,
            y1: self.y1 as i64,
            x2: self.x2 as i64,
            y2: self.y2 as i64,
        }
    }

    pub fn area(&self) -> f64 {
        (self.x2 - self.x1).max(0.0) * (self.y2 - self.y1).max(0.0)
    }

    pub fn iou(&self, other: &BoundingBox) -> f64 {
        let x1 = self.x1.max(other.x1);
        let y1 = self.y1.max(other.y1);
        let x2 = self.x2.min(other.x2);
        let y2 = self.y2.min(other.y2);

        let inter = (x2 - x1).max(0.0) * (y2 - y1).max(0.0);
        if inter == 0.0 {
            return 0.0;
        }
        inter / (self.area() + other.area() - inter)
    }
}

/// Truncated integer box, possibly outside the image or inverted.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PixelBounds {
    pub x1: i64,
    pub y1: i64,
    pub x2: i64,
    pub y2: i64,
}

impl PixelBounds {
    pub fn is_degenerate(&self) -> bool {
        self.x2 <= self.x1 || self.y2 <= self.y1
    }

    /// Clamps every coordinate into `[0, width] × [0, height]`.
    pub fn clamp_to(&self, width: u32, height: u32) -> (u32, u32, u32, u32) {
        let cx = |v: i64| v.clamp(0, width as i64) as u32;
        let cy = |v: i64| v.clamp(0, height as i64) as u32;
        (cx(self.x1), cy(self.y1), cx(self.x2), cy(self.y2))
    }
}

/// One candidate object reported by a detector.
#[derive(Clone, Debug, PartialEq)]
pub struct Detection {
    pub bbox: BoundingBox,
    pub confidence: f64,
    pub class_id: usize,
}

impl Detection {
    pub fn new(bbox: BoundingBox, confidence: f64, class_id: usize) -> Self {
        Self {
            bbox,
            confidence,
            class_id,
        }
    }
}
