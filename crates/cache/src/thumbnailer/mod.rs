//! The two kinds of thumbnail we know how to render, behind one interface.

pub mod image;
pub mod video;

pub use self::image::{ImageThumbnailer, SmallSource};
pub use self::video::{VideoThumbnailer, DEFAULT_WATERMARK_MARGIN};

use crate::{metadata::Provenance, SourceInfo, ThumbnailerError};

use std::path::Path;

use thumbs_utils::modified_seconds;
use tracing::{debug, trace};

pub const PNG_EXTENSION: &str = "png";
pub const JPEG_EXTENSION: &str = "jpg";

/// What rendering produced
#[derive(Debug)]
pub enum Render {
	/// Encoded thumbnail bytes, ready to be persisted by the store
	Encoded(Vec<u8>),
	/// The source is already small enough to be its own thumbnail
	UseSource,
	/// The source is already small enough and this size class refuses to reuse it
	TooSmall,
}

/// State of a cache entry relative to its source file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Freshness {
	Current,
	Stale,
	/// The entry exists but we can't tell what it was made from
	Invalid,
	Missing,
}

#[derive(Debug, Clone)]
pub enum Thumbnailer {
	Image(ImageThumbnailer),
	Video(VideoThumbnailer),
}

impl Thumbnailer {
	/// Extension of the entries this thumbnailer produces. Image and video entries never
	/// share one, so both kinds can live in the same directory.
	#[must_use]
	pub const fn extension(&self) -> &'static str {
		match self {
			Self::Image(_) => PNG_EXTENSION,
			Self::Video(_) => JPEG_EXTENSION,
		}
	}

	/// Image entries compare their embedded `Thumb::MTime` with the source; video entries can
	/// only compare their own modification time, the extractor embeds nothing.
	pub fn freshness(&self, entry: &Path, source: &Path) -> Freshness {
		let entry_mtime = match self {
			Self::Image(_) => Provenance::read_png(entry).map(|provenance| {
				provenance.map(|provenance| provenance.mtime)
			}),
			Self::Video(_) => modified_seconds(entry).map(Some),
		};

		let entry_mtime = match entry_mtime {
			Ok(Some(entry_mtime)) => entry_mtime,
			Ok(None) => return Freshness::Invalid,
			Err(e) if e.is_not_found() => return Freshness::Missing,
			Err(e) => {
				debug!(%e, "Unable to read cache entry");
				return Freshness::Invalid;
			}
		};

		match modified_seconds(source) {
			Ok(source_mtime) if self.is_current(entry_mtime, source_mtime) => Freshness::Current,
			Ok(source_mtime) => {
				trace!(entry_mtime, source_mtime, "Entry is stale");
				Freshness::Stale
			}
			Err(e) => {
				debug!(%e, "Unable to stat source, treating entry as invalid");
				Freshness::Invalid
			}
		}
	}

	const fn is_current(&self, entry_mtime: u64, source_mtime: u64) -> bool {
		match self {
			Self::Image(_) => entry_mtime == source_mtime,
			Self::Video(_) => entry_mtime >= source_mtime,
		}
	}

	/// Renders a thumbnail for `source`. `scratch_dir` receives any intermediate files, which
	/// are removed before returning.
	pub fn render(
		&self,
		source: &SourceInfo,
		scratch_dir: &Path,
	) -> Result<Render, ThumbnailerError> {
		match self {
			Self::Image(thumbnailer) => thumbnailer.render(source),
			Self::Video(thumbnailer) => thumbnailer.render(source, scratch_dir),
		}
	}
}
