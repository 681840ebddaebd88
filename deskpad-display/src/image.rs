//! Key images
//!
//! A [`KeyCanvas`] is drawn on with `embedded-graphics` and then frozen into
//! a [`KeyImage`]. Images are shared between the screen that produced them,
//! the deck and the driver, so cloning one only bumps a reference count.

use alloc::sync::Arc;
use alloc::vec;
use alloc::vec::Vec;
use core::convert::Infallible;

use deskpad_protocol::DeviceModel;
use embedded_graphics::pixelcolor::Rgb888;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;

/// Key edge of the reference hardware (pixels)
pub const DEFAULT_KEY_PX: u32 = 72;

/// Square RGB drawing surface for one key
pub struct KeyCanvas {
    edge: u32,
    pixels: Vec<Rgb888>,
}

impl KeyCanvas {
    /// Black canvas with `edge` pixels per side
    pub fn new(edge: u32) -> Self {
        Self::filled(edge, Rgb888::BLACK)
    }

    /// Canvas with `edge` pixels per side, filled with `color`
    pub fn filled(edge: u32, color: Rgb888) -> Self {
        Self {
            edge,
            pixels: vec![color; (edge * edge) as usize],
        }
    }

    /// Black canvas sized for `model`'s keys
    pub fn for_model(model: DeviceModel) -> Self {
        Self::new(model.key_image_px())
    }

    /// Canvas starting from a copy of `background`
    pub fn from_image(background: &KeyImage) -> Self {
        Self {
            edge: background.edge,
            pixels: background.pixels.to_vec(),
        }
    }

    /// Pixels per side
    pub fn edge(&self) -> u32 {
        self.edge
    }

    /// Freeze the canvas
    pub fn finish(self) -> KeyImage {
        KeyImage {
            edge: self.edge,
            pixels: self.pixels.into(),
        }
    }

    fn index(&self, point: Point) -> Option<usize> {
        let x = u32::try_from(point.x).ok()?;
        let y = u32::try_from(point.y).ok()?;
        if x >= self.edge || y >= self.edge {
            return None;
        }
        Some((y * self.edge + x) as usize)
    }
}

impl OriginDimensions for KeyCanvas {
    fn size(&self) -> Size {
        Size::new(self.edge, self.edge)
    }
}

impl DrawTarget for KeyCanvas {
    type Color = Rgb888;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            // Off-canvas pixels are clipped
            if let Some(index) = self.index(point) {
                self.pixels[index] = color;
            }
        }
        Ok(())
    }

    fn clear(&mut self, color: Self::Color) -> Result<(), Self::Error> {
        self.pixels.fill(color);
        Ok(())
    }
}

/// Immutable key image, cheap to clone
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyImage {
    edge: u32,
    pixels: Arc<[Rgb888]>,
}

impl KeyImage {
    /// Single-color image
    pub fn solid(edge: u32, color: Rgb888) -> Self {
        KeyCanvas::filled(edge, color).finish()
    }

    /// Pixels per side
    pub fn edge(&self) -> u32 {
        self.edge
    }

    /// Bounds of the image
    pub fn bounding_box(&self) -> Rectangle {
        Rectangle::new(Point::zero(), Size::new(self.edge, self.edge))
    }

    /// Color at `(x, y)`, `None` outside the image
    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgb888> {
        if x >= self.edge || y >= self.edge {
            return None;
        }
        self.pixels.get((y * self.edge + x) as usize).copied()
    }

    /// Pixels in row-major order from the top-left
    pub fn pixels(&self) -> &[Rgb888] {
        &self.pixels
    }

    /// Check if two handles share the same pixel buffer
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.pixels, &other.pixels)
    }

    /// Packed 8-bit RGB triples, row-major, for drivers
    pub fn rgb_bytes(&self) -> impl Iterator<Item = u8> + '_ {
        self.pixels.iter().flat_map(|p| [p.r(), p.g(), p.b()])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_graphics::primitives::{PrimitiveStyle, Rectangle};

    #[test]
    fn test_new_canvas_is_black() {
        let image = KeyCanvas::new(DEFAULT_KEY_PX).finish();
        assert_eq!(image.edge(), 72);
        assert_eq!(image.pixels().len(), 72 * 72);
        assert!(image.pixels().iter().all(|p| *p == Rgb888::BLACK));
    }

    #[test]
    fn test_canvas_for_model() {
        let canvas = KeyCanvas::for_model(DeviceModel::Xl);
        assert_eq!(canvas.edge(), DeviceModel::Xl.key_image_px());
        assert_eq!(canvas.size().width, canvas.edge());
    }

    #[test]
    fn test_draw_is_clipped() {
        let mut canvas = KeyCanvas::new(8);
        Rectangle::new(Point::new(6, 6), Size::new(10, 10))
            .into_styled(PrimitiveStyle::with_fill(Rgb888::RED))
            .draw(&mut canvas)
            .unwrap();
        let image = canvas.finish();

        assert_eq!(image.pixel(7, 7), Some(Rgb888::RED));
        assert_eq!(image.pixel(5, 5), Some(Rgb888::BLACK));
        assert_eq!(image.pixel(8, 0), None);
        assert_eq!(image.pixels().iter().filter(|p| **p == Rgb888::RED).count(), 4);
    }

    #[test]
    fn test_from_image_keeps_background() {
        let background = KeyImage::solid(4, Rgb888::BLUE);
        let mut canvas = KeyCanvas::from_image(&background);
        Pixel(Point::new(0, 0), Rgb888::WHITE).draw(&mut canvas).unwrap();
        let image = canvas.finish();

        assert_eq!(image.pixel(0, 0), Some(Rgb888::WHITE));
        assert_eq!(image.pixel(3, 3), Some(Rgb888::BLUE));
        // The background itself is untouched
        assert_eq!(background.pixel(0, 0), Some(Rgb888::BLUE));
    }

    #[test]
    fn test_clone_shares_pixels() {
        let image = KeyImage::solid(4, Rgb888::GREEN);
        let copy = image.clone();
        assert!(image.ptr_eq(&copy));
        assert!(!image.ptr_eq(&KeyImage::solid(4, Rgb888::GREEN)));
        assert_eq!(image, KeyImage::solid(4, Rgb888::GREEN));
    }

    #[test]
    fn test_rgb_bytes() {
        let image = KeyImage::solid(2, Rgb888::new(1, 2, 3));
        let bytes: Vec<u8> = image.rgb_bytes().collect();
        assert_eq!(bytes, [1u8, 2, 3].repeat(4));
    }
}
