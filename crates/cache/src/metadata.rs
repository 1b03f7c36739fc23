//! Provenance of a thumbnail: facts about its source file, embedded in the PNG as `tEXt`
//! chunks using the freedesktop.org `Thumb::*` keys.

use crate::{key::CanonicalUri, ThumbnailerError};

use std::{
	fs::File,
	io::{BufReader, Write},
	path::{Path, PathBuf},
};

use image::RgbaImage;
use thumbs_utils::{error::FileIOError, unix_seconds};

pub const URI_KEY: &str = "Thumb::URI";
pub const MTIME_KEY: &str = "Thumb::MTime";
pub const SIZE_KEY: &str = "Thumb::Size";
pub const MIME_KEY: &str = "Thumb::Mime";
pub const WIDTH_KEY: &str = "Thumb::Image::Width";
pub const HEIGHT_KEY: &str = "Thumb::Image::Height";
pub const SOFTWARE_KEY: &str = "Software";

pub const SOFTWARE: &str = concat!("thumbs ", env!("CARGO_PKG_VERSION"));

/// Snapshot of the source file taken right before rendering its thumbnail
#[derive(Debug, Clone)]
pub struct SourceInfo {
	pub path: PathBuf,
	pub uri: CanonicalUri,
	/// Whole seconds since the unix epoch
	pub mtime: u64,
	pub size: u64,
	pub mime: Option<String>,
}

impl SourceInfo {
	pub fn read(path: impl AsRef<Path>) -> Result<Self, FileIOError> {
		let path = path.as_ref();
		let metadata = std::fs::metadata(path).map_err(|e| FileIOError::from((path, e)))?;
		let modified = metadata
			.modified()
			.map_err(|e| FileIOError::from((path, e, "reading modification time")))?;

		Ok(Self {
			path: path.to_path_buf(),
			uri: CanonicalUri::from_path(path),
			mtime: unix_seconds(modified),
			size: metadata.len(),
			mime: mime_guess::from_path(path)
				.first()
				.map(|mime| mime.essence_str().to_string()),
		})
	}
}

/// Everything we embed into an image thumbnail
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Provenance {
	pub uri: String,
	pub mtime: u64,
	pub size: Option<u64>,
	pub mime: Option<String>,
	pub width: Option<u32>,
	pub height: Option<u32>,
	pub software: Option<String>,
}

impl Provenance {
	#[must_use]
	pub fn new(source: &SourceInfo, width: u32, height: u32) -> Self {
		Self {
			uri: source.uri.to_string(),
			mtime: source.mtime,
			size: Some(source.size),
			mime: source.mime.clone(),
			width: Some(width),
			height: Some(height),
			software: Some(SOFTWARE.to_string()),
		}
	}

	fn text_chunks(&self) -> Vec<(&'static str, String)> {
		let mut chunks = vec![
			(URI_KEY, self.uri.clone()),
			(MTIME_KEY, self.mtime.to_string()),
		];

		chunks.extend(
			[
				(SIZE_KEY, self.size.map(|size| size.to_string())),
				(MIME_KEY, self.mime.clone()),
				(WIDTH_KEY, self.width.map(|width| width.to_string())),
				(HEIGHT_KEY, self.height.map(|height| height.to_string())),
				(SOFTWARE_KEY, self.software.clone()),
			]
			.into_iter()
			.filter_map(|(key, value)| value.map(|value| (key, value))),
		);

		chunks
	}

	/// Encodes `image` as an 8-bit RGBA PNG carrying this provenance
	pub fn write_png(&self, writer: impl Write, image: &RgbaImage) -> Result<(), ThumbnailerError> {
		let mut encoder = png::Encoder::new(writer, image.width(), image.height());
		encoder.set_color(png::ColorType::Rgba);
		encoder.set_depth(png::BitDepth::Eight);

		for (key, value) in self.text_chunks() {
			encoder.add_text_chunk(key.to_string(), value)?;
		}

		let mut writer = encoder.write_header()?;
		writer.write_image_data(image.as_raw())?;
		writer.finish()?;

		Ok(())
	}

	/// Reads the provenance embedded in a thumbnail. Only the headers are decoded.
	///
	/// `None` means the file isn't a PNG or lacks the mandatory `Thumb::URI`/`Thumb::MTime`.
	pub fn read_png(path: impl AsRef<Path>) -> Result<Option<Self>, FileIOError> {
		let path = path.as_ref();
		let file = File::open(path).map_err(|e| FileIOError::from((path, e)))?;

		let Ok(reader) = png::Decoder::new(BufReader::new(file)).read_info() else {
			return Ok(None);
		};
		let info = reader.info();

		let text = |key: &str| {
			info.uncompressed_latin1_text
				.iter()
				.find(|chunk| chunk.keyword == key)
				.map(|chunk| chunk.text.clone())
		};

		let (Some(uri), Some(mtime)) = (
			text(URI_KEY),
			text(MTIME_KEY).and_then(|mtime| mtime.parse::<u64>().ok()),
		) else {
			return Ok(None);
		};

		Ok(Some(Self {
			uri,
			mtime,
			size: text(SIZE_KEY).and_then(|size| size.parse().ok()),
			mime: text(MIME_KEY),
			width: text(WIDTH_KEY).and_then(|width| width.parse().ok()),
			height: text(HEIGHT_KEY).and_then(|height| height.parse().ok()),
			software: text(SOFTWARE_KEY),
		}))
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	use image::Rgba;
	use tempfile::tempdir;

	#[test]
	fn embedded_fields_survive_encoding() {
		let dir = tempdir().unwrap();
		let source_path = dir.path().join("holiday photo.jpg");
		std::fs::write(&source_path, b"0123456789").unwrap();

		let source = SourceInfo::read(&source_path).unwrap();
		assert_eq!(source.size, 10);
		assert_eq!(source.mime.as_deref(), Some("image/jpeg"));

		let provenance = Provenance::new(&source, 4, 2);
		let thumb_path = dir.path().join("thumb.png");
		provenance
			.write_png(
				File::create(&thumb_path).unwrap(),
				&RgbaImage::from_pixel(4, 2, Rgba([1, 2, 3, 255])),
			)
			.unwrap();

		let read = Provenance::read_png(&thumb_path).unwrap().unwrap();
		assert_eq!(read, provenance);
		assert!(read.uri.starts_with("file:///"));
		assert!(read.uri.ends_with("holiday%20photo.jpg"));
		assert_eq!(read.software.as_deref(), Some(SOFTWARE));

		// the pixels are still a regular png
		let decoded = image::open(&thumb_path).unwrap();
		assert_eq!((decoded.width(), decoded.height()), (4, 2));
	}

	#[test]
	fn unknown_mime_is_omitted() {
		let dir = tempdir().unwrap();
		let source_path = dir.path().join("mystery.zzz-unknown");
		std::fs::write(&source_path, b"?").unwrap();

		let provenance = Provenance::new(&SourceInfo::read(&source_path).unwrap(), 1, 1);
		assert!(provenance
			.text_chunks()
			.iter()
			.all(|(key, _)| *key != MIME_KEY));
	}

	#[test]
	fn non_png_has_no_provenance() {
		let dir = tempdir().unwrap();
		let path = dir.path().join("bogus.png");
		std::fs::write(&path, b"not a png").unwrap();

		assert_eq!(Provenance::read_png(&path).unwrap(), None);
	}

	#[test]
	fn png_without_thumb_keys_has_no_provenance() {
		let dir = tempdir().unwrap();
		let path = dir.path().join("plain.png");
		RgbaImage::from_pixel(2, 2, Rgba([0, 0, 0, 255]))
			.save(&path)
			.unwrap();

		assert_eq!(Provenance::read_png(&path).unwrap(), None);
	}

	#[test]
	fn missing_thumbnail_is_an_io_error() {
		let err = Provenance::read_png("/no/such/thumb.png").unwrap_err();
		assert!(err.is_not_found());
	}
}
