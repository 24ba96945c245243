use anyhow::{Context, Result};
use image::{ImageFormat, RgbaImage};
use rayon::prelude::*;
use std::io::Cursor;

use crate::constants::*;

/// Luma weights for the grayscale base layer.
///
/// Each channel is multiplied by its quota and the sum is divided by
/// `red + green + blue + divider_tune`. Raising `divider_tune` darkens the
/// tiles, lowering it brightens them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GrayscaleQuotas {
    pub red: i32,
    pub green: i32,
    pub blue: i32,
    pub divider_tune: i32,
}

impl Default for GrayscaleQuotas {
    fn default() -> Self {
        Self {
            red: QUOTA_RED,
            green: QUOTA_GREEN,
            blue: QUOTA_BLUE,
            divider_tune: QUOTA_DIVIDER_TUNE,
        }
    }
}

impl GrayscaleQuotas {
    /// Summed in `i64` so any four `i32` quotas add up without overflow.
    pub fn divider(&self) -> i64 {
        [self.red, self.green, self.blue, self.divider_tune]
            .iter()
            .map(|&q| i64::from(q))
            .sum()
    }

    /// Weighted average of one pixel, stored the way a clamped 8-bit buffer stores it.
    pub fn luma(&self, r: u8, g: u8, b: u8) -> u8 {
        let weighted = self.red as f64 * r as f64
            + self.green as f64 * g as f64
            + self.blue as f64 * b as f64;
        let value = weighted / self.divider() as f64;
        if value.is_nan() {
            return 0;
        }
        value.clamp(0.0, 255.0).round_ties_even() as u8
    }
}

/// A decoded map tile plus the "already filtered" stamp.
pub struct Tile {
    pub image: RgbaImage,
    grayscaled: bool,
}

impl Tile {
    pub fn new(image: RgbaImage) -> Self {
        Self {
            image,
            grayscaled: false,
        }
    }

    pub fn decode(bytes: &[u8]) -> Result<Self> {
        let img = image::load_from_memory(bytes).context("Failed to decode tile image")?;
        Ok(Self::new(img.to_rgba8()))
    }

    pub fn is_grayscaled(&self) -> bool {
        self.grayscaled
    }

    pub fn encode_png(&self) -> Result<Vec<u8>> {
        let mut bytes = Vec::new();
        self.image
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .context("Failed to encode tile as PNG")?;
        Ok(bytes)
    }
}

/// Desaturates the tile in place. A tile is only ever filtered once.
pub fn make_grayscale(tile: &mut Tile, quotas: &GrayscaleQuotas) {
    if tile.grayscaled {
        return;
    }

    tile.image.par_chunks_mut(4).for_each(|pixel| {
        let gray = quotas.luma(pixel[0], pixel[1], pixel[2]);
        pixel[0] = gray;
        pixel[1] = gray;
        pixel[2] = gray;
    });
    tile.grayscaled = true;
}

/// Decodes raw tile bytes (PNG or JPEG), filters them and re-encodes as PNG.
pub fn grayscale_png(bytes: &[u8], quotas: &GrayscaleQuotas) -> Result<Vec<u8>> {
    let mut tile = Tile::decode(bytes)?;
    make_grayscale(&mut tile, quotas);
    tile.encode_png()
}
