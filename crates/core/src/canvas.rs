//! The raster canvas: white pixel buffer, freehand strokes, template
//! compositing.

use image::{imageops, Rgba, RgbaImage};

/// Vertical offset at which a month template is composited onto a fresh
/// raster. The strip above it stays white so strokes and the card header
/// have room.
pub const TEMPLATE_OFFSET_Y: u32 = 70;

const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);

/// Active stroke color and width.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Brush {
    /// Stroke color, sRGB.
    pub color: [u8; 3],
    /// Stroke width in pixels, kept in 1..=10.
    pub width: u32,
}

impl Default for Brush {
    fn default() -> Self {
        Self {
            color: [0, 0, 0],
            width: 5,
        }
    }
}

impl Brush {
    pub const MIN_WIDTH: u32 = 1;
    pub const MAX_WIDTH: u32 = 10;

    /// Width clamped into the supported range.
    pub fn clamped_width(&self) -> u32 {
        self.width.clamp(Self::MIN_WIDTH, Self::MAX_WIDTH)
    }
}

/// In-memory drawing surface.
///
/// Allocated lazily by the GUI once the view size is known, then mutated in
/// place by strokes and replaced wholesale by [`Canvas::set_template`].
pub struct Canvas {
    raster: RgbaImage,
}

impl Canvas {
    /// Allocate a white raster of the given size.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            raster: RgbaImage::from_pixel(width.max(1), height.max(1), WHITE),
        }
    }

    pub fn width(&self) -> u32 {
        self.raster.width()
    }

    pub fn height(&self) -> u32 {
        self.raster.height()
    }

    /// Current raster, for texture upload and saving.
    pub fn image(&self) -> &RgbaImage {
        &self.raster
    }

    /// Reset every pixel to white. Dimensions are unchanged; idempotent.
    pub fn clear(&mut self) {
        for px in self.raster.pixels_mut() {
            *px = WHITE;
        }
    }

    /// Replace the raster with a fresh one carrying `template`.
    ///
    /// The new raster keeps the template's width; its height is the larger
    /// of the caller's current view height and template height +
    /// [`TEMPLATE_OFFSET_Y`]. Sizing from the live view (not the prior
    /// raster) means a short template after a tall one shrinks the raster
    /// back down. The template is alpha-composited at (0, 70) over white,
    /// so transparent template regions stay paintable white. Prior strokes
    /// are discarded.
    pub fn set_template(&mut self, template: &RgbaImage, view_height: u32) {
        let height = (template.height() + TEMPLATE_OFFSET_Y).max(view_height.max(1));
        let mut raster = RgbaImage::from_pixel(template.width().max(1), height, WHITE);
        imageops::overlay(&mut raster, template, 0, i64::from(TEMPLATE_OFFSET_Y));
        self.raster = raster;
    }

    /// Draw one freehand segment from `from` to `to` with the given brush.
    ///
    /// A round stamp of the brush width is swept along a Bresenham line;
    /// pixels outside the raster are skipped.
    pub fn stroke(&mut self, from: (i32, i32), to: (i32, i32), brush: &Brush) {
        let color = Rgba([brush.color[0], brush.color[1], brush.color[2], 255]);
        let width = brush.clamped_width();

        let (mut x0, mut y0) = from;
        let (x1, y1) = to;
        let dx = (x1 - x0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let dy = -(y1 - y0).abs();
        let sy = if y0 < y1 { 1 } else { -1 };
        let mut err = dx + dy;
        loop {
            self.stamp(x0, y0, width, color);
            if x0 == x1 && y0 == y1 {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x0 += sx;
            }
            if e2 <= dx {
                err += dx;
                y0 += sy;
            }
        }
    }

    /// Stamp a filled disc of diameter `width` centered at (cx, cy).
    ///
    /// The disc covers exactly `width` rows/columns for both parities, so a
    /// stroke never spills outside its width envelope.
    fn stamp(&mut self, cx: i32, cy: i32, width: u32, color: Rgba<u8>) {
        let d = width as i32;
        let center = (d - 1) as f32 / 2.0;
        let radius_sq = (d as f32 / 2.0).powi(2);
        for oy in 0..d {
            for ox in 0..d {
                let fx = ox as f32 - center;
                let fy = oy as f32 - center;
                if fx * fx + fy * fy <= radius_sq {
                    self.put_pixel(
                        cx + ox - center.round() as i32,
                        cy + oy - center.round() as i32,
                        color,
                    );
                }
            }
        }
    }

    fn put_pixel(&mut self, x: i32, y: i32, color: Rgba<u8>) {
        if x < 0 || y < 0 {
            return;
        }
        let (x, y) = (x as u32, y as u32);
        if x >= self.raster.width() || y >= self.raster.height() {
            return;
        }
        self.raster.put_pixel(x, y, color);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BLACK: Rgba<u8> = Rgba([0, 0, 0, 255]);

    fn assert_all_white(canvas: &Canvas) {
        assert!(canvas.image().pixels().all(|&px| px == WHITE));
    }

    #[test]
    fn test_new_canvas_is_white() {
        let canvas = Canvas::new(40, 30);
        assert_eq!(canvas.width(), 40);
        assert_eq!(canvas.height(), 30);
        assert_all_white(&canvas);
    }

    #[test]
    fn test_clear_is_idempotent() {
        let mut canvas = Canvas::new(64, 64);
        canvas.stroke((5, 5), (40, 40), &Brush::default());
        assert!(canvas.image().pixels().any(|&px| px != WHITE));

        canvas.clear();
        assert_all_white(&canvas);
        canvas.clear();
        assert_all_white(&canvas);
        assert_eq!((canvas.width(), canvas.height()), (64, 64));
    }

    #[test]
    fn test_horizontal_stroke_stays_in_width_envelope() {
        let mut canvas = Canvas::new(100, 40);
        let brush = Brush {
            color: [0, 0, 0],
            width: 5,
        };
        canvas.stroke((10, 10), (50, 10), &brush);

        let img = canvas.image();
        for x in 10..=50 {
            // Core of the stroke: center row and the two rows either side.
            for y in 8..=12 {
                assert_eq!(*img.get_pixel(x, y), BLACK, "pixel ({x},{y})");
            }
            // Just outside the 5-pixel envelope.
            assert_eq!(*img.get_pixel(x, 7), WHITE, "pixel ({x},7)");
            assert_eq!(*img.get_pixel(x, 13), WHITE, "pixel ({x},13)");
        }
        // Well clear of the stroke on either end.
        assert_eq!(*img.get_pixel(5, 10), WHITE);
        assert_eq!(*img.get_pixel(60, 10), WHITE);
    }

    #[test]
    fn test_width_one_stroke_is_single_pixel_line() {
        let mut canvas = Canvas::new(30, 30);
        let brush = Brush {
            color: [200, 30, 30],
            width: 1,
        };
        canvas.stroke((2, 15), (20, 15), &brush);

        let img = canvas.image();
        assert_eq!(*img.get_pixel(10, 15), Rgba([200, 30, 30, 255]));
        assert_eq!(*img.get_pixel(10, 14), WHITE);
        assert_eq!(*img.get_pixel(10, 16), WHITE);
    }

    #[test]
    fn test_stroke_clips_at_raster_edges() {
        let mut canvas = Canvas::new(20, 20);
        let brush = Brush {
            color: [0, 0, 0],
            width: 10,
        };
        // Runs well past every edge; must not panic.
        canvas.stroke((-15, -15), (40, 40), &brush);
        assert!(canvas.image().pixels().any(|&px| px == BLACK));
    }

    #[test]
    fn test_brush_width_is_clamped() {
        let brush = Brush {
            color: [0, 0, 0],
            width: 99,
        };
        assert_eq!(brush.clamped_width(), Brush::MAX_WIDTH);
        let brush = Brush {
            width: 0,
            ..brush
        };
        assert_eq!(brush.clamped_width(), Brush::MIN_WIDTH);
    }

    #[test]
    fn test_default_brush_is_black_width_five() {
        let brush = Brush::default();
        assert_eq!(brush.color, [0, 0, 0]);
        assert_eq!(brush.width, 5);
    }

    #[test]
    fn test_set_template_offsets_and_sizes_raster() {
        let mut canvas = Canvas::new(100, 200);
        let mut template = RgbaImage::from_pixel(60, 50, Rgba([10, 120, 200, 255]));
        template.put_pixel(3, 4, Rgba([250, 0, 0, 255]));

        canvas.set_template(&template, 200);

        // Width follows the template; height is the larger of the view
        // height and template height + 70.
        assert_eq!(canvas.width(), 60);
        assert_eq!(canvas.height(), 200);

        let img = canvas.image();
        // The marked template pixel lands 70 rows down.
        assert_eq!(*img.get_pixel(3, 4 + TEMPLATE_OFFSET_Y), Rgba([250, 0, 0, 255]));
        // The strip above the template is untouched white.
        assert_eq!(*img.get_pixel(3, 4), WHITE);
        assert_eq!(*img.get_pixel(30, TEMPLATE_OFFSET_Y - 1), WHITE);
    }

    #[test]
    fn test_set_template_grows_raster_for_tall_templates() {
        let mut canvas = Canvas::new(100, 100);
        let template = RgbaImage::from_pixel(60, 300, Rgba([0, 0, 0, 255]));
        canvas.set_template(&template, 100);
        assert_eq!(canvas.height(), 300 + TEMPLATE_OFFSET_Y);
    }

    #[test]
    fn test_set_template_shrinks_back_to_view_height_after_tall_template() {
        let mut canvas = Canvas::new(540, 630);
        let tall = RgbaImage::from_pixel(500, 800, Rgba([0, 0, 0, 255]));
        canvas.set_template(&tall, 630);
        assert_eq!(canvas.height(), 800 + TEMPLATE_OFFSET_Y);

        // A short template sizes against the live view, not the tall raster
        // it is replacing.
        let short = RgbaImage::from_pixel(500, 100, Rgba([0, 0, 0, 255]));
        canvas.set_template(&short, 630);
        assert_eq!(canvas.height(), 630);
    }

    #[test]
    fn test_set_template_follows_a_grown_view() {
        let mut canvas = Canvas::new(540, 630);
        let template = RgbaImage::from_pixel(500, 100, Rgba([0, 0, 0, 255]));
        // The window was enlarged since the raster was allocated.
        canvas.set_template(&template, 900);
        assert_eq!(canvas.height(), 900);
    }

    #[test]
    fn test_set_template_keeps_white_under_transparent_regions() {
        let mut canvas = Canvas::new(50, 50);
        let template = RgbaImage::from_pixel(40, 40, Rgba([0, 0, 0, 0]));
        canvas.set_template(&template, 50);
        assert_all_white(&canvas);
    }

    #[test]
    fn test_set_template_discards_prior_strokes() {
        let mut canvas = Canvas::new(50, 120);
        canvas.stroke((0, 0), (49, 0), &Brush::default());
        let template = RgbaImage::from_pixel(50, 40, Rgba([0, 0, 0, 0]));
        canvas.set_template(&template, 120);
        assert_all_white(&canvas);
    }
}
