use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(thiserror::Error, Debug)]
pub enum Error {
	#[error("error while loading the image (via the `image` crate): {0}")]
	Image(#[from] image::ImageError),
	#[error("there was an i/o error: {0}")]
	Io(#[from] std::io::Error),
	#[error("error from the exif crate: {0}")]
	Exif(#[from] exif::Error),
	#[error("the image provided is unsupported")]
	Unsupported,
	#[error("the image provided is too large (over {0} bytes)")]
	TooLarge(u64),
	#[error("invalid path provided (it had no file extension)")]
	NoExtension,
	#[error("watermark at {} is larger than {1}x{1} pixels", .0.display())]
	WatermarkTooLarge(PathBuf, u32),
}
