#![warn(
	clippy::all,
	clippy::pedantic,
	clippy::correctness,
	clippy::perf,
	clippy::style,
	clippy::suspicious,
	clippy::complexity,
	clippy::nursery,
	clippy::unwrap_used,
	unused_qualifications,
	rust_2018_idioms,
	clippy::expect_used,
	trivial_casts,
	trivial_numeric_casts,
	unused_allocation,
	clippy::as_conversions,
	clippy::dbg_macro
)]
#![forbid(unsafe_code)]
#![allow(clippy::missing_errors_doc, clippy::module_name_repetitions)]

mod consts;
mod error;
mod formatter;
mod generic;
mod orientation;
mod overlay;

pub use consts::{GENERIC_EXTENSIONS, PLAY_GLYPH_SIZE};
pub use error::{Error, Result};
pub use formatter::{format_image, is_image_extension};
pub use image::{DynamicImage, RgbaImage};
pub use orientation::Orientation;
pub use overlay::Watermark;
use std::path::Path;

/// A decoder for a family of image formats
pub trait ImageHandler {
	/// Files above this many bytes are refused before being read
	fn maximum_size(&self) -> u64;

	fn handle_image(&self, path: &Path) -> Result<DynamicImage>;
}

/// Whether an image of `width`x`height` already fits in a `side`x`side` box
#[inline]
#[must_use]
pub const fn fits_within(width: u32, height: u32, side: u32) -> bool {
	width <= side && height <= side
}
