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

pub mod error;

use std::{
	path::Path,
	time::{SystemTime, UNIX_EPOCH},
};

/// Whole seconds since the unix epoch, clamping pre-epoch times to zero
#[must_use]
pub fn unix_seconds(time: SystemTime) -> u64 {
	time.duration_since(UNIX_EPOCH)
		.map_or(0, |elapsed| elapsed.as_secs())
}

/// Modification time of the file at `path`, truncated to whole seconds
pub fn modified_seconds(path: impl AsRef<Path>) -> Result<u64, error::FileIOError> {
	let path = path.as_ref();
	std::fs::metadata(path)
		.and_then(|metadata| metadata.modified())
		.map(unix_seconds)
		.map_err(|e| error::FileIOError::from((path, e)))
}

#[cfg(test)]
mod tests {
	use super::*;

	use std::time::Duration;

	#[test]
	fn truncates_sub_second_precision() {
		let time = UNIX_EPOCH + Duration::from_millis(1_700_000_000_999);
		assert_eq!(unix_seconds(time), 1_700_000_000);
	}

	#[test]
	fn pre_epoch_is_zero() {
		let time = UNIX_EPOCH - Duration::from_secs(10);
		assert_eq!(unix_seconds(time), 0);
	}
}
