//! Grabs a representative still from a video by shelling out to an external tool
//! (`ffmpegthumbnailer` by default) and waiting for it to write the frame to disk.

#![warn(
	clippy::all,
	clippy::pedantic,
	clippy::correctness,
	clippy::perf,
	clippy::style,
	clippy::suspicious,
	clippy::complexity,
	clippy::nursery,
	clippy::unwrap_used,
	unused_qualifications,
	rust_2018_idioms,
	clippy::expect_used,
	trivial_casts,
	trivial_numeric_casts,
	unused_allocation,
	clippy::as_conversions,
	clippy::dbg_macro
)]
#![forbid(unsafe_code)]
#![allow(clippy::missing_errors_doc, clippy::module_name_repetitions)]

mod error;
mod extractor;
mod process;

pub use error::ExtractorError;
pub use extractor::{
	FrameExtractor, FrameExtractorBuilder, DEFAULT_ARGS, DEFAULT_PROGRAM, INPUT_PLACEHOLDER,
	OUTPUT_PLACEHOLDER, SIZE_PLACEHOLDER,
};
