use super::Render;
use crate::{SourceInfo, ThumbnailerError};

use std::path::Path;

use image::{codecs::jpeg::JpegEncoder, imageops::FilterType, ColorType, DynamicImage};
use thumbs_frame_extractor::FrameExtractor;
use thumbs_images::{fits_within, format_image, Watermark};
use thumbs_utils::error::{report_error, FileIOError};
use tracing::{instrument, trace};

/// Distance between the watermark and the bottom/right edges, in pixels
pub const DEFAULT_WATERMARK_MARGIN: u32 = 4;

const JPEG_QUALITY: u8 = 85;

/// Grabs a frame with an external tool, stamps the watermark on it and encodes a JPEG
#[derive(Debug, Clone)]
pub struct VideoThumbnailer {
	extractor: FrameExtractor,
	watermark: Watermark,
	margin: u32,
}

impl VideoThumbnailer {
	#[must_use]
	pub fn new(extractor: FrameExtractor) -> Self {
		Self {
			extractor,
			watermark: Watermark::play(),
			margin: DEFAULT_WATERMARK_MARGIN,
		}
	}

	#[must_use]
	pub fn with_watermark(mut self, watermark: Watermark, margin: u32) -> Self {
		self.watermark = watermark;
		self.margin = margin;
		self
	}

	#[instrument(
		skip_all,
		fields(path = %source.path.display(), size = self.extractor.size())
	)]
	pub fn render(
		&self,
		source: &SourceInfo,
		scratch_dir: &Path,
	) -> Result<Render, ThumbnailerError> {
		// Removed on drop, so every early return below cleans up after the extractor
		let frame_path = tempfile::Builder::new()
			.prefix(".frame-")
			.suffix(".png")
			.tempfile_in(scratch_dir)
			.map_err(|e| {
				ThumbnailerError::Write(FileIOError::from((
					scratch_dir,
					e,
					"creating frame scratch file",
				)))
			})?
			.into_temp_path();

		self.extractor.extract(&source.path, &frame_path)?;

		let mut frame = format_image(&frame_path).map_err(|e| ThumbnailerError::Decode {
			path: frame_path.to_path_buf(),
			source: e,
		})?;

		// Extractors treat the size as a hint, some hand back the native resolution
		let side = self.extractor.size();
		if !fits_within(frame.width(), frame.height(), side) {
			frame = frame.resize(side, side, FilterType::Triangle);
		}

		let mut frame = frame.into_rgba8();
		self.watermark.apply(&mut frame, self.margin);
		trace!(
			width = frame.width(),
			height = frame.height(),
			"Watermarked frame"
		);

		let frame = DynamicImage::ImageRgba8(frame).into_rgb8();
		let mut encoded = Vec::new();
		JpegEncoder::new_with_quality(&mut encoded, JPEG_QUALITY).encode(
			frame.as_raw(),
			frame.width(),
			frame.height(),
			ColorType::Rgb8,
		)?;

		report_error(&frame_path.close());

		Ok(Render::Encoded(encoded))
	}
}
