use crate::Result;

use exif::{In, Tag};
use image::DynamicImage;
use std::{fs::File, io::BufReader, path::Path};
use tracing::trace;

/// Rotation recorded by a camera in the EXIF `Orientation` tag.
///
/// Only the pure rotations are honoured; mirrored variants are rendered as-is.
#[derive(Default, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Orientation {
	#[default]
	Normal,
	CW90,
	CW180,
	CW270,
}

impl Orientation {
	/// This is used for quickly sourcing [`Orientation`] data from a path, to be later used by
	/// [`Orientation::correct_thumbnail`]. Files without EXIF data yield `None`.
	pub fn from_path(path: impl AsRef<Path>) -> Option<Self> {
		let path = path.as_ref();
		Self::read_tag(path)
			.map_err(|e| trace!(path = %path.display(), %e, "No usable EXIF data"))
			.ok()
			.flatten()
			.map(Into::into)
	}

	fn read_tag(path: &Path) -> Result<Option<u32>> {
		let mut reader = BufReader::new(File::open(path)?);
		let exif = exif::Reader::new().read_from_container(&mut reader)?;

		Ok(exif
			.get_field(Tag::Orientation, In::PRIMARY)
			.and_then(|field| field.value.get_uint(0)))
	}

	/// This is used to correct thumbnails in the thumbnailer, if we are able to source orientation data for the file at hand.
	#[must_use]
	pub fn correct_thumbnail(&self, img: DynamicImage) -> DynamicImage {
		match self {
			Self::Normal => img,
			Self::CW90 => img.rotate90(),
			Self::CW180 => img.rotate180(),
			Self::CW270 => img.rotate270(),
		}
	}
}

impl From<u32> for Orientation {
	fn from(value: u32) -> Self {
		match value {
			3 => Self::CW180,
			6 => Self::CW90,
			8 => Self::CW270,
			_ => Self::Normal,
		}
	}
}
