use crate::{
	consts,
	error::{Error, Result},
	generic::GenericHandler,
	ImageHandler,
};
use image::DynamicImage;
use std::{ffi::OsStr, path::Path};

/// Decodes the image at `path`, picking a handler by its extension
pub fn format_image(path: impl AsRef<Path>) -> Result<DynamicImage> {
	let ext = path
		.as_ref()
		.extension()
		.map_or_else(|| Err(Error::NoExtension), |e| Ok(e.to_ascii_lowercase()))?;
	match_to_handler(&ext)?.handle_image(path.as_ref())
}

/// Whether files with this extension are decodable still images
#[must_use]
pub fn is_image_extension(ext: &OsStr) -> bool {
	let ext = ext.to_ascii_lowercase();
	consts::GENERIC_EXTENSIONS.iter().any(|x| ext == *x)
}

fn match_to_handler(ext: &OsStr) -> Result<Box<dyn ImageHandler>> {
	if is_image_extension(ext) {
		Ok(Box::new(GenericHandler))
	} else {
		Err(Error::Unsupported)
	}
}
