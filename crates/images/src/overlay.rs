use crate::{consts::PLAY_GLYPH_SIZE, Error, Result};

use image::{imageops, Rgba, RgbaImage};
use std::path::Path;

/// Largest watermark we accept from disk, a thumbnail-sized glyph is plenty
const MAXIMUM_WATERMARK_SIDE: u32 = 256;

/// A glyph composited into the corner of video thumbnails so they are
/// distinguishable from still images at a glance.
#[derive(Debug, Clone)]
pub struct Watermark {
	glyph: RgbaImage,
}

impl Default for Watermark {
	fn default() -> Self {
		Self::play()
	}
}

impl Watermark {
	/// The built-in "play" glyph: a translucent dark disc with a white triangle
	#[must_use]
	pub fn play() -> Self {
		Self {
			glyph: play_glyph(PLAY_GLYPH_SIZE),
		}
	}

	/// Loads a watermark from an image file, keeping its alpha channel
	pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
		let path = path.as_ref();
		let glyph = image::open(path)?.into_rgba8();

		if glyph.width() > MAXIMUM_WATERMARK_SIDE || glyph.height() > MAXIMUM_WATERMARK_SIDE {
			return Err(Error::WatermarkTooLarge(
				path.to_path_buf(),
				MAXIMUM_WATERMARK_SIDE,
			));
		}

		Ok(Self { glyph })
	}

	#[must_use]
	pub fn dimensions(&self) -> (u32, u32) {
		self.glyph.dimensions()
	}

	/// Alpha-composites the glyph into the bottom-right corner of `target`, `margin` pixels
	/// away from both edges. Targets smaller than the glyph get it pinned to the top-left.
	pub fn apply(&self, target: &mut RgbaImage, margin: u32) {
		let (x, y) = self.position(target.dimensions(), margin);
		imageops::overlay(target, &self.glyph, i64::from(x), i64::from(y));
	}

	/// Top-left corner where the glyph lands on a target of the given size
	#[must_use]
	pub fn position(&self, (width, height): (u32, u32), margin: u32) -> (u32, u32) {
		let (glyph_width, glyph_height) = self.glyph.dimensions();
		(
			width.saturating_sub(glyph_width.saturating_add(margin)),
			height.saturating_sub(glyph_height.saturating_add(margin)),
		)
	}
}

#[allow(
	clippy::cast_precision_loss,
	clippy::as_conversions,
	clippy::suboptimal_flops
)]
fn play_glyph(size: u32) -> RgbaImage {
	let side = size as f32;
	let radius = side / 2.0;

	// Triangle pointing right, roughly centered on the disc
	let (ax, ay) = (side * 0.34, side * 0.25);
	let (bx, by) = (side * 0.34, side * 0.75);
	let (cx, cy) = (side * 0.75, side * 0.5);

	let edge = |(x0, y0): (f32, f32), (x1, y1): (f32, f32), (px, py): (f32, f32)| {
		(x1 - x0) * (py - y0) - (y1 - y0) * (px - x0)
	};

	RgbaImage::from_fn(size, size, |x, y| {
		let p = (x as f32 + 0.5, y as f32 + 0.5);

		let d1 = edge((ax, ay), (bx, by), p);
		let d2 = edge((bx, by), (cx, cy), p);
		let d3 = edge((cx, cy), (ax, ay), p);
		let has_negative = d1 < 0.0 || d2 < 0.0 || d3 < 0.0;
		let has_positive = d1 > 0.0 || d2 > 0.0 || d3 > 0.0;

		if !(has_negative && has_positive) {
			Rgba([255, 255, 255, 255])
		} else if (p.0 - radius).hypot(p.1 - radius) <= radius {
			Rgba([0, 0, 0, 160])
		} else {
			Rgba([0, 0, 0, 0])
		}
	})
}
