//! Round-brush rasterization in source-pixel space.
//!
//! A pixel belongs to a stroke when its center lies within half the brush
//! width of the stroke path (round caps and joins). Coverage is binary; the
//! paint opacity is applied once per stroke when it is composited onto the mask.

use image::{GrayImage, Luma, Rgba};

pub const MIN_BRUSH_SIZE: f32 = 2.0;
pub const MAX_BRUSH_SIZE: f32 = 200.0;
pub const DEFAULT_BRUSH_SIZE: f32 = 40.0;

/// Semi-transparent red used to show painted regions over the base image.
pub const MASK_PAINT: Rgba<u8> = Rgba([255, 40, 40, 128]);

pub const COVERED: Luma<u8> = Luma([255]);

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Half-open pixel rectangle `[x0, x1) x [y0, y1)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub x0: u32,
    pub y0: u32,
    pub x1: u32,
    pub y1: u32,
}

impl Rect {
    pub fn union(self, other: Rect) -> Rect {
        Rect {
            x0: self.x0.min(other.x0),
            y0: self.y0.min(other.y0),
            x1: self.x1.max(other.x1),
            y1: self.y1.max(other.y1),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.x0 >= self.x1 || self.y0 >= self.y1
    }
}

pub fn clamp_brush_size(size: f32) -> f32 {
    if size.is_finite() {
        size.clamp(MIN_BRUSH_SIZE, MAX_BRUSH_SIZE)
    } else {
        DEFAULT_BRUSH_SIZE
    }
}

fn distance_to_segment(p: Point, a: Point, b: Point) -> f32 {
    let (dx, dy) = (b.x - a.x, b.y - a.y);
    let len_sq = dx * dx + dy * dy;
    let t = if len_sq <= f32::EPSILON {
        0.0
    } else {
        (((p.x - a.x) * dx + (p.y - a.y) * dy) / len_sq).clamp(0.0, 1.0)
    };
    let (cx, cy) = (a.x + t * dx, a.y + t * dy);
    ((p.x - cx).powi(2) + (p.y - cy).powi(2)).sqrt()
}

/// Marks every pixel within `width / 2` of the segment `from..to` and returns
/// the touched rectangle, or `None` if the segment misses the surface.
pub fn stamp_segment(coverage: &mut GrayImage, from: Point, to: Point, width: f32) -> Option<Rect> {
    let (w, h) = coverage.dimensions();
    let radius = width / 2.0;

    let min_x = (from.x.min(to.x) - radius).floor().max(0.0);
    let min_y = (from.y.min(to.y) - radius).floor().max(0.0);
    let max_x = (from.x.max(to.x) + radius).ceil().min(w as f32);
    let max_y = (from.y.max(to.y) + radius).ceil().min(h as f32);
    if min_x >= max_x || min_y >= max_y {
        return None;
    }

    let rect = Rect {
        x0: min_x as u32,
        y0: min_y as u32,
        x1: max_x as u32,
        y1: max_y as u32,
    };

    let mut touched: Option<Rect> = None;
    for y in rect.y0..rect.y1 {
        for x in rect.x0..rect.x1 {
            let center = Point::new(x as f32 + 0.5, y as f32 + 0.5);
            if distance_to_segment(center, from, to) <= radius {
                coverage.put_pixel(x, y, COVERED);
                let px = Rect { x0: x, y0: y, x1: x + 1, y1: y + 1 };
                touched = Some(touched.map_or(px, |r| r.union(px)));
            }
        }
    }
    touched
}

/// Source-over compositing of `src` onto `dst`.
pub fn blend_over(dst: Rgba<u8>, src: Rgba<u8>) -> Rgba<u8> {
    let sa = src[3] as f32 / 255.0;
    let da = dst[3] as f32 / 255.0;
    let out_a = sa + da * (1.0 - sa);
    if out_a <= 0.0 {
        return Rgba([0, 0, 0, 0]);
    }
    let channel = |s: u8, d: u8| -> u8 {
        let v = (s as f32 * sa + d as f32 * da * (1.0 - sa)) / out_a;
        v.round().clamp(0.0, 255.0) as u8
    };
    Rgba([
        channel(src[0], dst[0]),
        channel(src[1], dst[1]),
        channel(src[2], dst[2]),
        (out_a * 255.0).round().clamp(0.0, 255.0) as u8,
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn covered(img: &GrayImage) -> usize {
        img.pixels().filter(|p| p[0] > 0).count()
    }

    #[test]
    fn test_dab_covers_disc() {
        let mut coverage = GrayImage::new(20, 20);
        let center = Point::new(10.0, 10.0);
        let rect = stamp_segment(&mut coverage, center, center, 6.0).unwrap();
        assert!(coverage.get_pixel(10, 10)[0] > 0);
        assert!(coverage.get_pixel(9, 9)[0] > 0);
        assert_eq!(coverage.get_pixel(0, 0)[0], 0);
        assert_eq!(coverage.get_pixel(13, 13)[0], 0);
        assert!(rect.x0 >= 7 && rect.x1 <= 13);
        // pi * 3^2 ~= 28
        let count = covered(&coverage);
        assert!((24..=32).contains(&count), "covered {}", count);
    }

    #[test]
    fn test_segment_is_capsule() {
        let mut coverage = GrayImage::new(30, 10);
        stamp_segment(&mut coverage, Point::new(5.0, 5.0), Point::new(25.0, 5.0), 4.0);
        for x in 5..25 {
            assert!(coverage.get_pixel(x, 4)[0] > 0);
            assert!(coverage.get_pixel(x, 5)[0] > 0);
            assert_eq!(coverage.get_pixel(x, 8)[0], 0);
        }
        assert_eq!(coverage.get_pixel(0, 5)[0], 0);
        assert_eq!(coverage.get_pixel(29, 5)[0], 0);
    }

    #[test]
    fn test_offscreen_segment_misses() {
        let mut coverage = GrayImage::new(10, 10);
        assert!(stamp_segment(&mut coverage, Point::new(-50.0, -50.0), Point::new(-40.0, -40.0), 4.0).is_none());
        assert_eq!(covered(&coverage), 0);
    }

    #[test]
    fn test_blend_over() {
        let transparent = Rgba([0, 0, 0, 0]);
        assert_eq!(blend_over(transparent, MASK_PAINT), MASK_PAINT);
        let once = blend_over(transparent, MASK_PAINT);
        let twice = blend_over(once, MASK_PAINT);
        assert!(twice[3] > once[3]);
        assert_eq!(blend_over(Rgba([1, 2, 3, 255]), Rgba([9, 9, 9, 0])), Rgba([1, 2, 3, 255]));
    }

    #[test]
    fn test_clamp_brush_size() {
        assert_eq!(clamp_brush_size(0.0), MIN_BRUSH_SIZE);
        assert_eq!(clamp_brush_size(1000.0), MAX_BRUSH_SIZE);
        assert_eq!(clamp_brush_size(f32::NAN), DEFAULT_BRUSH_SIZE);
    }
}
