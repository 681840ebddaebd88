//! Text labels on key faces
//!
//! Labels are broken into rows of [`ROW_CHARS`] characters, at most
//! [`MAX_ROWS`] rows. Full rows start one pixel in from the left edge, the
//! final short row is centered, and the whole block is centered vertically.
//! Two-row labels get a little more air between the rows. Characters past
//! the last row are dropped.

use embedded_graphics::mono_font::ascii::FONT_6X10;
use embedded_graphics::mono_font::MonoTextStyle;
use embedded_graphics::pixelcolor::Rgb888;
use embedded_graphics::prelude::*;
use embedded_graphics::text::{Baseline, Text};

use crate::image::{KeyCanvas, KeyImage, DEFAULT_KEY_PX};

/// Characters per row
pub const ROW_CHARS: usize = 12;

/// Rows per key
pub const MAX_ROWS: usize = 4;

/// Left margin of full rows (pixels)
const FULL_ROW_X: i32 = 1;

/// Distance between the tops of two rows (pixels)
const fn row_pitch(rows: usize) -> i32 {
    if rows == 2 {
        18
    } else {
        15
    }
}

/// White label on a black key of the default size
pub fn text_icon(label: &str) -> KeyImage {
    text_icon_on(label, &KeyImage::solid(DEFAULT_KEY_PX, Rgb888::BLACK))
}

/// White label drawn over `background`
pub fn text_icon_on(label: &str, background: &KeyImage) -> KeyImage {
    let mut canvas = KeyCanvas::from_image(background);
    let style = MonoTextStyle::new(&FONT_6X10, Rgb888::WHITE);
    let char_width = FONT_6X10.character_size.width as i32;
    let char_height = FONT_6X10.character_size.height as i32;
    let edge = canvas.edge() as i32;

    let mut rows = [""; MAX_ROWS];
    let count = split_rows(label, &mut rows);

    let pitch = row_pitch(count);
    let block_height = char_height + pitch * (count as i32 - 1);
    let top = ((edge - block_height) / 2).max(0);

    for (i, row) in rows[..count].iter().enumerate() {
        let chars = row.chars().count() as i32;
        let x = if chars < ROW_CHARS as i32 {
            ((edge - chars * char_width) / 2).max(0)
        } else {
            FULL_ROW_X
        };
        let y = top + pitch * i as i32;
        let _ = Text::with_baseline(row, Point::new(x, y), style, Baseline::Top)
            .draw(&mut canvas);
    }

    canvas.finish()
}

/// Split `label` into rows of `ROW_CHARS` characters, returning the row count
fn split_rows<'a>(label: &'a str, rows: &mut [&'a str; MAX_ROWS]) -> usize {
    let mut rest = label;
    let mut count = 0;
    while !rest.is_empty() && count < MAX_ROWS {
        let end = rest
            .char_indices()
            .nth(ROW_CHARS)
            .map_or(rest.len(), |(index, _)| index);
        let (row, tail) = rest.split_at(end);
        rows[count] = row;
        count += 1;
        rest = tail;
    }
    count
}
