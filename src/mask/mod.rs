//! Mask editor for targeted regeneration.
//!
//! The editor keeps two surfaces of identical size: the decoded base image and
//! a mask the user paints on. Pointer events arrive in display coordinates and
//! are rescaled to source pixels, so the mask always matches the base image
//! resolution regardless of on-screen scaling.
//!
//! Every pointer-down snapshots the mask onto a bounded undo stack before the
//! stroke starts. A stroke's coverage is accumulated separately and composited
//! over that snapshot, so overlapping segments of one stroke paint with uniform
//! opacity while separate strokes stack.

pub mod brush;
pub mod history;

use image::{GrayImage, Rgba, RgbaImage};

use crate::{
    codec,
    error::{MockupError, Result},
    models::{AspectRatio, ImageBuffer},
};

pub use brush::{Point, Rect, DEFAULT_BRUSH_SIZE, MASK_PAINT, MAX_BRUSH_SIZE, MIN_BRUSH_SIZE};
pub use history::{UndoStack, MAX_UNDO_SNAPSHOTS};

const TRANSPARENT: Rgba<u8> = Rgba([0, 0, 0, 0]);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorState {
    Idle,
    Drawing,
}

#[derive(Debug, Clone)]
struct ActiveStroke {
    /// Mask as it was before this stroke.
    before: RgbaImage,
    coverage: GrayImage,
    last: Point,
}

/// Painted mask plus its undo history.
#[derive(Debug, Clone)]
pub struct MaskState {
    pub pixels: RgbaImage,
    pub snapshots: UndoStack,
}

impl MaskState {
    fn blank(width: u32, height: u32) -> Self {
        Self {
            pixels: RgbaImage::from_pixel(width, height, TRANSPARENT),
            snapshots: UndoStack::default(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct MaskEditor {
    base: RgbaImage,
    mask: MaskState,
    stroke: Option<ActiveStroke>,
    brush_size: f32,
    display_size: (f32, f32),
}

impl MaskEditor {
    /// Opens an editor over an encoded image.
    pub fn open(image: &ImageBuffer) -> Result<Self> {
        let base = codec::decode_pixels(image)?.to_rgba8();
        Ok(Self::from_pixels(base))
    }

    pub fn from_pixels(base: RgbaImage) -> Self {
        let (width, height) = base.dimensions();
        Self {
            mask: MaskState::blank(width, height),
            base,
            stroke: None,
            brush_size: DEFAULT_BRUSH_SIZE,
            display_size: (width as f32, height as f32),
        }
    }

    /// Replaces the base image. The mask and undo history are reset.
    pub fn load_base(&mut self, image: &ImageBuffer) -> Result<()> {
        let base = codec::decode_pixels(image)?.to_rgba8();
        let (width, height) = base.dimensions();
        self.base = base;
        self.mask.pixels = RgbaImage::from_pixel(width, height, TRANSPARENT);
        self.mask.snapshots.clear();
        self.stroke = None;
        self.display_size = (width as f32, height as f32);
        Ok(())
    }

    pub fn state(&self) -> EditorState {
        if self.stroke.is_some() {
            EditorState::Drawing
        } else {
            EditorState::Idle
        }
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.base.dimensions()
    }

    /// Aspect ratio of the source image, used for the inpaint request.
    pub fn aspect_ratio(&self) -> AspectRatio {
        let (width, height) = self.dimensions();
        AspectRatio::new(width, height)
    }

    pub fn base_pixels(&self) -> &RgbaImage {
        &self.base
    }

    pub fn mask_pixels(&self) -> &RgbaImage {
        &self.mask.pixels
    }

    pub fn brush_size(&self) -> f32 {
        self.brush_size
    }

    /// Brush width in source pixels. Takes effect from the next stroke.
    pub fn set_brush_size(&mut self, size: f32) {
        self.brush_size = brush::clamp_brush_size(size);
    }

    /// Size at which the surfaces are currently shown on screen.
    pub fn set_display_size(&mut self, width: f32, height: f32) {
        if width > 0.0 && height > 0.0 && width.is_finite() && height.is_finite() {
            self.display_size = (width, height);
        }
    }

    pub fn to_source(&self, display: Point) -> Point {
        let (src_w, src_h) = self.dimensions();
        let (disp_w, disp_h) = self.display_size;
        Point::new(
            display.x * src_w as f32 / disp_w,
            display.y * src_h as f32 / disp_h,
        )
    }

    pub fn undo_depth(&self) -> usize {
        self.mask.snapshots.len()
    }

    pub fn can_undo(&self) -> bool {
        !self.mask.snapshots.is_empty()
    }

    /// True when no pixel of the mask is painted.
    pub fn is_mask_empty(&self) -> bool {
        self.mask.pixels.pixels().all(|p| p[3] == 0)
    }

    /// Idle -> Drawing. Snapshots the mask and paints a dab at the pointer.
    pub fn pointer_down(&mut self, display: Point) {
        if self.stroke.is_some() {
            self.pointer_up();
        }

        let before = self.mask.pixels.clone();
        self.mask.snapshots.push(before.clone());

        let (width, height) = self.dimensions();
        let pos = self.to_source(display);
        let mut stroke = ActiveStroke {
            before,
            coverage: GrayImage::new(width, height),
            last: pos,
        };
        if let Some(dirty) = brush::stamp_segment(&mut stroke.coverage, pos, pos, self.brush_size) {
            render_stroke(&mut self.mask.pixels, &stroke, dirty);
        }
        self.stroke = Some(stroke);
    }

    /// Extends the stroke while Drawing; ignored when Idle.
    pub fn pointer_move(&mut self, display: Point) {
        let pos = self.to_source(display);
        let brush_size = self.brush_size;
        let Some(stroke) = self.stroke.as_mut() else {
            return;
        };
        let from = stroke.last;
        stroke.last = pos;
        if let Some(dirty) = brush::stamp_segment(&mut stroke.coverage, from, pos, brush_size) {
            render_stroke(&mut self.mask.pixels, stroke, dirty);
        }
    }

    /// Drawing -> Idle.
    pub fn pointer_up(&mut self) {
        self.stroke = None;
    }

    /// Drawing -> Idle when the pointer leaves the surface.
    pub fn pointer_leave(&mut self) {
        self.pointer_up();
    }

    /// Restores the mask to its state before the most recent stroke.
    /// Returns false when there is nothing to undo.
    pub fn undo(&mut self) -> bool {
        self.stroke = None;
        match self.mask.snapshots.pop() {
            Some(snapshot) => {
                self.mask.pixels = snapshot;
                true
            }
            None => false,
        }
    }

    /// Erases the mask. The undo history is left as is.
    pub fn clear(&mut self) {
        self.stroke = None;
        let (width, height) = self.dimensions();
        self.mask.pixels = RgbaImage::from_pixel(width, height, TRANSPARENT);
    }

    /// Base pixels with every painted pixel made fully transparent.
    pub fn cutout_pixels(&self) -> RgbaImage {
        let mut out = self.base.clone();
        for (dst, mask) in out.pixels_mut().zip(self.mask.pixels.pixels()) {
            if mask[3] > 0 {
                *dst = TRANSPARENT;
            }
        }
        out
    }

    /// The PNG submitted for inpainting.
    pub fn compose_cutout(&self) -> Result<ImageBuffer> {
        if self.base.width() == 0 || self.base.height() == 0 {
            return Err(MockupError::MalformedImageInput("Base image has no pixels".into()));
        }
        codec::encode_png(&self.cutout_pixels())
    }

    /// Base image with the mask drawn over it, as shown while editing.
    pub fn preview_pixels(&self) -> RgbaImage {
        let mut out = self.base.clone();
        for (dst, mask) in out.pixels_mut().zip(self.mask.pixels.pixels()) {
            if mask[3] > 0 {
                *dst = brush::blend_over(*dst, *mask);
            }
        }
        out
    }
}

fn render_stroke(mask: &mut RgbaImage, stroke: &ActiveStroke, dirty: Rect) {
    for y in dirty.y0..dirty.y1 {
        for x in dirty.x0..dirty.x1 {
            if stroke.coverage.get_pixel(x, y)[0] > 0 {
                let under = *stroke.before.get_pixel(x, y);
                mask.put_pixel(x, y, brush::blend_over(under, MASK_PAINT));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::tests::png_buffer;

    fn editor(width: u32, height: u32) -> MaskEditor {
        MaskEditor::open(&png_buffer(width, height, [20, 120, 220, 255])).unwrap()
    }

    fn stroke(editor: &mut MaskEditor, from: (f32, f32), to: (f32, f32)) {
        editor.pointer_down(Point::new(from.0, from.1));
        editor.pointer_move(Point::new(to.0, to.1));
        editor.pointer_up();
    }

    #[test]
    fn test_state_machine() {
        let mut editor = editor(40, 40);
        assert_eq!(editor.state(), EditorState::Idle);
        editor.pointer_move(Point::new(5.0, 5.0));
        assert!(editor.is_mask_empty());

        editor.set_brush_size(4.0);
        editor.pointer_down(Point::new(5.0, 5.0));
        assert_eq!(editor.state(), EditorState::Drawing);
        assert_eq!(editor.undo_depth(), 1);
        editor.pointer_move(Point::new(30.0, 5.0));
        editor.pointer_leave();
        assert_eq!(editor.state(), EditorState::Idle);
        assert!(editor.mask_pixels().get_pixel(20, 5)[3] > 0);

        editor.pointer_move(Point::new(30.0, 35.0));
        assert_eq!(editor.mask_pixels().get_pixel(30, 25)[3], 0);
    }

    #[test]
    fn test_stroke_opacity_is_uniform_within_stroke() {
        let mut editor = editor(40, 40);
        editor.set_brush_size(6.0);
        editor.pointer_down(Point::new(10.0, 10.0));
        editor.pointer_move(Point::new(30.0, 10.0));
        editor.pointer_move(Point::new(10.0, 10.0));
        editor.pointer_up();
        assert_eq!(*editor.mask_pixels().get_pixel(20, 10), MASK_PAINT);

        stroke(&mut editor, (20.0, 0.0), (20.0, 20.0));
        assert!(editor.mask_pixels().get_pixel(20, 10)[3] > MASK_PAINT[3]);
    }

    #[test]
    fn test_undo_restores_each_stroke() {
        let mut editor = editor(64, 64);
        editor.set_brush_size(4.0);
        let mut history = vec![editor.mask_pixels().clone()];
        for i in 0..5 {
            let y = 5.0 + i as f32 * 10.0;
            stroke(&mut editor, (2.0, y), (60.0, y));
            history.push(editor.mask_pixels().clone());
        }
        for expected in history.iter().rev().skip(1) {
            assert!(editor.undo());
            assert_eq!(editor.mask_pixels(), expected);
        }
        assert!(editor.is_mask_empty());
        assert!(!editor.undo());
    }

    #[test]
    fn test_undo_is_bounded() {
        let mut editor = editor(64, 64);
        editor.set_brush_size(2.0);
        let mut after = Vec::new();
        for i in 0..11 {
            let y = 2.0 + i as f32 * 5.0;
            stroke(&mut editor, (1.0, y), (60.0, y));
            after.push(editor.mask_pixels().clone());
        }
        assert_eq!(editor.undo_depth(), MAX_UNDO_SNAPSHOTS);

        for _ in 0..10 {
            assert!(editor.undo());
        }
        // Ten restorations reach the state after the first stroke.
        assert_eq!(editor.mask_pixels(), &after[0]);
        assert!(!editor.undo());
        assert_eq!(editor.mask_pixels(), &after[0]);
    }

    #[test]
    fn test_undo_during_stroke_reverts_it() {
        let mut editor = editor(20, 20);
        editor.pointer_down(Point::new(10.0, 10.0));
        assert!(!editor.is_mask_empty());
        assert!(editor.undo());
        assert_eq!(editor.state(), EditorState::Idle);
        assert!(editor.is_mask_empty());
    }

    #[test]
    fn test_clear_keeps_history() {
        let mut editor = editor(20, 20);
        stroke(&mut editor, (5.0, 5.0), (15.0, 15.0));
        let painted = editor.mask_pixels().clone();
        editor.clear();
        assert!(editor.is_mask_empty());
        assert_eq!(editor.undo_depth(), 1);
        // The snapshot is the pre-stroke (empty) mask.
        assert!(editor.undo());
        assert!(editor.is_mask_empty());
        assert_ne!(&painted, editor.mask_pixels());
    }

    #[test]
    fn test_load_base_resets() {
        let mut editor = editor(20, 20);
        stroke(&mut editor, (5.0, 5.0), (15.0, 15.0));
        editor.load_base(&png_buffer(8, 4, [0, 0, 0, 255])).unwrap();
        assert_eq!(editor.dimensions(), (8, 4));
        assert_eq!(editor.mask_pixels().dimensions(), (8, 4));
        assert!(editor.is_mask_empty());
        assert!(!editor.can_undo());
        assert_eq!(editor.undo_depth(), 0);
        assert!(!editor.undo());
        assert_eq!(editor.mask_pixels().dimensions(), (8, 4));
        assert!(editor.load_base(&ImageBuffer::new("image/png", vec![1])).is_err());
    }

    #[test]
    fn test_display_coordinates_are_rescaled() {
        let mut editor = editor(200, 100);
        editor.set_display_size(100.0, 50.0);
        editor.set_brush_size(2.0);
        editor.pointer_down(Point::new(50.0, 25.0));
        editor.pointer_up();
        let mask = editor.mask_pixels();
        assert_eq!(mask.dimensions(), (200, 100));
        assert!(mask.get_pixel(100, 50)[3] > 0);
        assert_eq!(mask.get_pixel(50, 25)[3], 0);
        assert_eq!(editor.to_source(Point::new(10.0, 10.0)), Point::new(20.0, 20.0));
    }

    #[test]
    fn test_cutout_empty_mask_matches_base() {
        let editor = editor(12, 9);
        let cutout = editor.compose_cutout().unwrap();
        assert_eq!(cutout.media_type(), "image/png");
        let pixels = codec::decode_pixels(&cutout).unwrap().to_rgba8();
        assert_eq!(&pixels, editor.base_pixels());
    }

    #[test]
    fn test_cutout_full_mask_is_transparent() {
        let mut editor = editor(16, 16);
        editor.set_brush_size(MAX_BRUSH_SIZE);
        editor.pointer_down(Point::new(8.0, 8.0));
        editor.pointer_up();
        let pixels = codec::decode_pixels(&editor.compose_cutout().unwrap())
            .unwrap()
            .to_rgba8();
        assert!(pixels.pixels().all(|p| p[3] == 0));
    }

    #[test]
    fn test_cutout_matches_stroke_footprint() {
        let mut editor = editor(40, 40);
        editor.set_brush_size(6.0);
        stroke(&mut editor, (5.0, 20.0), (35.0, 20.0));
        stroke(&mut editor, (20.0, 5.0), (20.0, 35.0));
        let cutout = editor.cutout_pixels();
        for (x, y, px) in cutout.enumerate_pixels() {
            let painted = editor.mask_pixels().get_pixel(x, y)[3] > 0;
            if painted {
                assert_eq!(px[3], 0, "pixel {},{} should be erased", x, y);
            } else {
                assert_eq!(px, editor.base_pixels().get_pixel(x, y));
            }
        }
        assert_eq!(cutout.get_pixel(20, 20)[3], 0);
        assert_eq!(cutout.get_pixel(2, 2)[3], 255);
    }

    #[test]
    fn test_preview_tints_painted_pixels() {
        let mut editor = editor(20, 20);
        editor.set_brush_size(4.0);
        editor.pointer_down(Point::new(10.0, 10.0));
        editor.pointer_up();
        let preview = editor.preview_pixels();
        assert_ne!(preview.get_pixel(10, 10), editor.base_pixels().get_pixel(10, 10));
        assert!(preview.get_pixel(10, 10)[0] > 20);
        assert_eq!(preview.get_pixel(0, 0), editor.base_pixels().get_pixel(0, 0));
    }

    #[test]
    fn test_aspect_ratio_from_source() {
        assert_eq!(editor(30, 20).aspect_ratio(), AspectRatio::new(30, 20));
    }
}
