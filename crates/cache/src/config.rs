use crate::{
	thumbnailer::{ImageThumbnailer, SmallSource, VideoThumbnailer, DEFAULT_WATERMARK_MARGIN},
	ConfigError, SizeClass,
};

use std::{
	fs,
	path::{Path, PathBuf},
	time::Duration,
};

use directories::BaseDirs;
use serde::{Deserialize, Serialize};
use thumbs_frame_extractor::{FrameExtractorBuilder, DEFAULT_ARGS, DEFAULT_PROGRAM};
use thumbs_images::Watermark;
use thumbs_utils::error::FileIOError;

/// Hidden directory under the user's home holding one subdirectory per size class
pub const DEFAULT_CACHE_DIR_NAME: &str = ".thumbnails";

/// Everything needed to build the stores behind a [`crate::ThumbnailFactory`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThumbnailConfig {
	/// Largest side of generated thumbnails, rounded up to a [`SizeClass`]
	pub size: u32,
	/// Private cache root, `~/.thumbnails/<size class>` when absent
	pub cache_root: Option<PathBuf>,
	/// A second library with its own cache, e.g. a network share
	pub shared: Option<SharedLibrary>,
	pub extractor: ExtractorConfig,
	pub watermark: WatermarkConfig,
	/// Defaults to [`SmallSource::default_for`] the size class
	pub small_source: Option<SmallSource>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SharedLibrary {
	/// Sources under this directory are cached in `cache_root`
	pub media_root: PathBuf,
	pub cache_root: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractorConfig {
	pub program: PathBuf,
	/// Supports the `{input}`, `{output}` and `{size}` placeholders
	pub args: Vec<String>,
	pub timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WatermarkConfig {
	/// Image composited onto video thumbnails, the built-in play glyph when absent
	pub image: Option<PathBuf>,
	pub margin: u32,
}

impl Default for ThumbnailConfig {
	fn default() -> Self {
		Self {
			size: SizeClass::Normal.pixels(),
			cache_root: None,
			shared: None,
			extractor: ExtractorConfig::default(),
			watermark: WatermarkConfig::default(),
			small_source: None,
		}
	}
}

impl Default for ExtractorConfig {
	fn default() -> Self {
		Self {
			program: PathBuf::from(DEFAULT_PROGRAM),
			args: DEFAULT_ARGS.iter().map(ToString::to_string).collect(),
			timeout_secs: None,
		}
	}
}

impl Default for WatermarkConfig {
	fn default() -> Self {
		Self {
			image: None,
			margin: DEFAULT_WATERMARK_MARGIN,
		}
	}
}

impl ThumbnailConfig {
	/// Reads a JSON config file; missing fields take their defaults
	pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
		let path = path.as_ref();
		let data = fs::read(path).map_err(|e| FileIOError::from((path, e, "reading config")))?;

		serde_json::from_slice(&data).map_err(|source| ConfigError::Parse {
			path: path.to_path_buf(),
			source,
		})
	}

	pub fn size_class(&self) -> Result<SizeClass, ConfigError> {
		SizeClass::for_pixels(self.size)
	}

	pub fn private_root(&self) -> Result<PathBuf, ConfigError> {
		self.cache_root
			.clone()
			.map_or_else(|| default_cache_root(self.size_class()?), Ok)
	}

	pub fn image_thumbnailer(&self) -> Result<ImageThumbnailer, ConfigError> {
		let size = self.size_class()?;

		Ok(ImageThumbnailer::new(size).with_small_source(
			self.small_source
				.unwrap_or_else(|| SmallSource::default_for(size)),
		))
	}

	pub fn video_thumbnailer(&self) -> Result<VideoThumbnailer, ConfigError> {
		let extractor = FrameExtractorBuilder::new()
			.program(&self.extractor.program)
			.args(self.extractor.args.iter().cloned())?
			.size(self.size_class()?.pixels())
			.timeout(self.extractor.timeout_secs.map(Duration::from_secs))
			.build();

		let watermark = self
			.watermark
			.image
			.as_ref()
			.map_or_else(|| Ok(Watermark::play()), Watermark::from_path)?;

		Ok(VideoThumbnailer::new(extractor).with_watermark(watermark, self.watermark.margin))
	}
}

/// `~/.thumbnails/<size class>`
pub fn default_cache_root(size: SizeClass) -> Result<PathBuf, ConfigError> {
	let base_dirs = BaseDirs::new().ok_or(ConfigError::NoHomeDirectory)?;

	Ok(base_dirs
		.home_dir()
		.join(DEFAULT_CACHE_DIR_NAME)
		.join(size.directory_name()))
}
