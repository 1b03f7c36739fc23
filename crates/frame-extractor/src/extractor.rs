use crate::{process, ExtractorError};

use std::{
	ffi::OsString,
	path::{Path, PathBuf},
	time::Duration,
};
use tracing::{debug, instrument, trace};

pub const INPUT_PLACEHOLDER: &str = "{input}";
pub const OUTPUT_PLACEHOLDER: &str = "{output}";
pub const SIZE_PLACEHOLDER: &str = "{size}";

/// `ffmpegthumbnailer` is what most desktop thumbnailers shell out to
pub const DEFAULT_PROGRAM: &str = "ffmpegthumbnailer";
pub const DEFAULT_ARGS: [&str; 6] = [
	"-i",
	INPUT_PLACEHOLDER,
	"-o",
	OUTPUT_PLACEHOLDER,
	"-s",
	SIZE_PLACEHOLDER,
];

/// `FrameExtractor` struct holds data from a `FrameExtractorBuilder`, exposing methods
/// to grab a representative still from video files.
#[derive(Debug, Clone)]
pub struct FrameExtractor {
	builder: FrameExtractorBuilder,
}

impl FrameExtractor {
	/// Runs the external tool, blocking until it exits (or the timeout elapses), and checks
	/// that it actually produced something at `output_path`
	#[instrument(
		skip_all,
		fields(
			program = %self.builder.program.display(),
			input_path = %video_file_path.as_ref().display(),
			output_path = %output_path.as_ref().display(),
			size = self.builder.size,
		)
	)]
	pub fn extract(
		&self,
		video_file_path: impl AsRef<Path>,
		output_path: impl AsRef<Path>,
	) -> Result<(), ExtractorError> {
		let output_path = output_path.as_ref();
		let args = self.command_args(video_file_path.as_ref(), output_path);

		debug!("Spawning frame extractor");
		process::run(&self.builder.program, &args, self.builder.timeout)?;

		match std::fs::metadata(output_path) {
			Ok(metadata) if metadata.len() > 0 => {
				trace!(bytes = metadata.len(), "Frame extracted");
				Ok(())
			}
			_ => Err(ExtractorError::MissingOutput(output_path.to_path_buf())),
		}
	}

	/// The argument list handed to the program, with every placeholder substituted
	#[must_use]
	pub fn command_args(&self, input: &Path, output: &Path) -> Vec<OsString> {
		let size = self.builder.size.to_string();

		self.builder
			.args
			.iter()
			.map(|arg| match arg.as_str() {
				// Whole-argument placeholders keep non UTF-8 paths intact
				INPUT_PLACEHOLDER => input.as_os_str().to_owned(),
				OUTPUT_PLACEHOLDER => output.as_os_str().to_owned(),
				_ => arg
					.replace(INPUT_PLACEHOLDER, &input.to_string_lossy())
					.replace(OUTPUT_PLACEHOLDER, &output.to_string_lossy())
					.replace(SIZE_PLACEHOLDER, &size)
					.into(),
			})
			.collect()
	}

	#[must_use]
	pub const fn size(&self) -> u32 {
		self.builder.size
	}
}

/// `FrameExtractorBuilder` struct holds data to build a `FrameExtractor` struct, exposing many
/// methods to configure how a frame must be extracted.
#[derive(Debug, Clone)]
pub struct FrameExtractorBuilder {
	program: PathBuf,
	args: Vec<String>,
	size: u32,
	timeout: Option<Duration>,
}

impl Default for FrameExtractorBuilder {
	fn default() -> Self {
		Self {
			program: PathBuf::from(DEFAULT_PROGRAM),
			args: DEFAULT_ARGS.iter().map(ToString::to_string).collect(),
			size: 128,
			timeout: None,
		}
	}
}

impl FrameExtractorBuilder {
	/// Creates a new `FrameExtractorBuilder` with default values:
	/// - `program`: `ffmpegthumbnailer`
	/// - `args`: `-i {input} -o {output} -s {size}`
	/// - `size`: 128 pixels
	/// - `timeout`: none, the tool may run for as long as it wants
	#[must_use]
	pub fn new() -> Self {
		Self::default()
	}

	/// The executable to run, looked up in `PATH` when not absolute
	#[must_use]
	pub fn program(mut self, program: impl Into<PathBuf>) -> Self {
		self.program = program.into();
		self
	}

	/// Argument template; `{input}` and `{output}` are mandatory, `{size}` is optional
	pub fn args<S: Into<String>>(
		mut self,
		args: impl IntoIterator<Item = S>,
	) -> Result<Self, ExtractorError> {
		let args = args.into_iter().map(Into::into).collect::<Vec<String>>();

		let mentions = |placeholder: &str| args.iter().any(|arg| arg.contains(placeholder));
		if !mentions(INPUT_PLACEHOLDER) || !mentions(OUTPUT_PLACEHOLDER) {
			return Err(ExtractorError::InvalidArgsTemplate(args));
		}

		self.args = args;
		Ok(self)
	}

	/// Largest side of the extracted frame, in pixels
	#[must_use]
	pub const fn size(mut self, size: u32) -> Self {
		self.size = size;
		self
	}

	/// Kill the tool if it runs for longer than this
	#[must_use]
	pub const fn timeout(mut self, timeout: Option<Duration>) -> Self {
		self.timeout = timeout;
		self
	}

	/// Builds a `FrameExtractor` struct
	#[must_use]
	pub fn build(self) -> FrameExtractor {
		FrameExtractor { builder: self }
	}
}
