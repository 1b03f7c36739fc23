use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// The fixed target boxes thumbnails are rendered into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SizeClass {
	/// 128x128
	Normal,
	/// 256x256
	Large,
	/// 512x512, mostly used for video previews
	XLarge,
}

impl SizeClass {
	/// Smallest class whose box can hold `pixels`
	pub fn for_pixels(pixels: u32) -> Result<Self, ConfigError> {
		match pixels {
			0 => Err(ConfigError::InvalidSize(pixels)),
			1..=128 => Ok(Self::Normal),
			129..=256 => Ok(Self::Large),
			257..=512 => Ok(Self::XLarge),
			_ => Err(ConfigError::InvalidSize(pixels)),
		}
	}

	/// Side of the square box, in pixels
	#[must_use]
	pub const fn pixels(self) -> u32 {
		match self {
			Self::Normal => 128,
			Self::Large => 256,
			Self::XLarge => 512,
		}
	}

	/// Name of the per-class subdirectory under the default cache root
	#[must_use]
	pub const fn directory_name(self) -> &'static str {
		match self {
			Self::Normal => "normal",
			Self::Large => "large",
			Self::XLarge => "video",
		}
	}
}
