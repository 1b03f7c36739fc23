/// Extensions the `image` crate can decode with its default feature set.
///
/// Anything outside this list is not considered a still image.
pub const GENERIC_EXTENSIONS: [&str; 19] = [
	"bmp", "exr", "ff", "gif", "hdr", "ico", "jpeg", "jpg", "pbm", "pgm", "png", "pnm", "ppm",
	"qoi", "tga", "tif", "tiff", "webp", "jfif",
];

/// The maximum file size that an image can be in order to have a thumbnail generated.
///
/// This value is in MiB.
pub(crate) const GENERIC_MAXIMUM_FILE_SIZE: u64 = MIB * 64;

/// Widest (or tallest) image we are willing to decode, guards against decompression bombs
pub(crate) const GENERIC_MAXIMUM_DIMENSION: u32 = 16_384;

/// Side length of the built-in "play" watermark glyph, in pixels
pub const PLAY_GLYPH_SIZE: u32 = 32;

/// The size of 1MiB in bytes
const MIB: u64 = 1_048_576;
