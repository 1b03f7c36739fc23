use super::Render;
use crate::{metadata::Provenance, SizeClass, SourceInfo, ThumbnailerError};

use image::imageops::FilterType;
use serde::{Deserialize, Serialize};
use thumbs_images::{fits_within, format_image, Orientation};
use tracing::{instrument, trace};

/// What to do with a source that already fits inside the target box
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SmallSource {
	/// Hand back the source path itself, nothing gets cached
	UseSource,
	/// Report [`Render::TooSmall`]
	Reject,
}

impl SmallSource {
	#[must_use]
	pub const fn default_for(size: SizeClass) -> Self {
		match size {
			SizeClass::XLarge => Self::Reject,
			SizeClass::Normal | SizeClass::Large => Self::UseSource,
		}
	}
}

/// Downscales still images into a PNG carrying the source's provenance
#[derive(Debug, Clone)]
pub struct ImageThumbnailer {
	size: SizeClass,
	small_source: SmallSource,
}

impl ImageThumbnailer {
	#[must_use]
	pub const fn new(size: SizeClass) -> Self {
		Self {
			size,
			small_source: SmallSource::default_for(size),
		}
	}

	#[must_use]
	pub const fn with_small_source(mut self, small_source: SmallSource) -> Self {
		self.small_source = small_source;
		self
	}

	#[instrument(skip_all, fields(path = %source.path.display(), size = self.size.pixels()))]
	pub fn render(&self, source: &SourceInfo) -> Result<Render, ThumbnailerError> {
		let img = format_image(&source.path).map_err(|e| ThumbnailerError::Decode {
			path: source.path.clone(),
			source: e,
		})?;

		let side = self.size.pixels();
		if fits_within(img.width(), img.height(), side) {
			trace!(
				width = img.width(),
				height = img.height(),
				"Source already fits the target box"
			);
			return Ok(match self.small_source {
				SmallSource::UseSource => Render::UseSource,
				SmallSource::Reject => Render::TooSmall,
			});
		}

		let mut thumb = img.resize(side, side, FilterType::Triangle);

		// this corrects the rotation of the image based on the *available* exif data
		// not all images have exif data, so we don't error
		if let Some(orientation) = Orientation::from_path(&source.path) {
			thumb = orientation.correct_thumbnail(thumb);
		}

		let thumb = thumb.into_rgba8();
		let mut encoded = Vec::new();
		Provenance::new(source, thumb.width(), thumb.height()).write_png(&mut encoded, &thumb)?;

		Ok(Render::Encoded(encoded))
	}
}
