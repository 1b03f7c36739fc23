use std::path::PathBuf;

use thiserror::Error;
use thumbs_frame_extractor::ExtractorError;
use thumbs_utils::error::FileIOError;

/// Problems with the values a cache is configured with. These are never downgraded.
#[derive(Error, Debug)]
pub enum ConfigError {
	#[error("thumbnail size must be between 1 and 512 pixels, received: {0}")]
	InvalidSize(u32),
	#[error("unable to locate the home directory to derive a default cache root")]
	NoHomeDirectory,
	#[error(transparent)]
	Read(#[from] FileIOError),
	#[error("failed to parse config file at {}: {source}", .path.display())]
	Parse {
		path: PathBuf,
		#[source]
		source: serde_json::Error,
	},
	#[error("invalid frame extractor settings: {0}")]
	Extractor(#[from] ExtractorError),
	#[error("failed to load watermark: {0}")]
	Watermark(#[from] thumbs_images::Error),
}

/// Fatal errors while setting up a [`crate::ThumbnailStore`]
#[derive(Error, Debug)]
pub enum StoreError {
	#[error("cache root exists but is not a directory: {}", .0.display())]
	NotADirectory(PathBuf),
	#[error(transparent)]
	FileIO(#[from] FileIOError),
	#[error(transparent)]
	Config(#[from] ConfigError),
}

/// Why a single thumbnail could not be produced. These never abort the caller, they are
/// carried in [`crate::Outcome::Failed`].
#[derive(Error, Debug)]
pub enum ThumbnailerError {
	#[error("failed to read source file: {0}")]
	Source(FileIOError),
	#[error("failed to decode {}: {source}", .path.display())]
	Decode {
		path: PathBuf,
		#[source]
		source: thumbs_images::Error,
	},
	#[error("video frame extraction failed: {0}")]
	Extractor(#[from] ExtractorError),
	#[error("failed to encode jpeg thumbnail: {0}")]
	JpegEncoding(#[from] image::ImageError),
	#[error("failed to encode png thumbnail: {0}")]
	PngEncoding(#[from] png::EncodingError),
	#[error("failed to write thumbnail: {0}")]
	Write(FileIOError),
}
