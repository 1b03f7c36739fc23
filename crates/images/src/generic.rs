use crate::{
	consts::{GENERIC_MAXIMUM_DIMENSION, GENERIC_MAXIMUM_FILE_SIZE},
	Error, ImageHandler, Result,
};

use std::{fs, path::Path};

use image::{
	io::{Limits, Reader},
	DynamicImage,
};
use tracing::trace;

/// Everything the `image` crate decodes natively
pub struct GenericHandler;

impl ImageHandler for GenericHandler {
	fn maximum_size(&self) -> u64 {
		GENERIC_MAXIMUM_FILE_SIZE
	}

	fn handle_image(&self, path: &Path) -> Result<DynamicImage> {
		let len = fs::metadata(path)?.len();
		if len > self.maximum_size() {
			return Err(Error::TooLarge(self.maximum_size()));
		}

		let mut limits = Limits::default();
		limits.max_image_width = Some(GENERIC_MAXIMUM_DIMENSION);
		limits.max_image_height = Some(GENERIC_MAXIMUM_DIMENSION);

		// Content sniffing wins over the extension, plenty of .jpg files are really PNGs
		let mut reader = Reader::open(path)?.with_guessed_format()?;
		reader.limits(limits);

		trace!(path = %path.display(), format = ?reader.format(), bytes = len, "Decoding image");
		Ok(reader.decode()?)
	}
}
