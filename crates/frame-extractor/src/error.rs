use std::{path::PathBuf, time::Duration};
use thiserror::Error;

/// Error type for the library.
#[derive(Error, Debug)]
pub enum ExtractorError {
	#[error("I/O Error: {0}")]
	Io(#[from] std::io::Error),
	#[error("Failed to spawn frame extractor {}: {source}", .program.display())]
	Spawn {
		program: PathBuf,
		#[source]
		source: std::io::Error,
	},
	#[error("Frame extractor failed (code {code:?}): {stderr}")]
	Failed { code: Option<i32>, stderr: String },
	#[error("Frame extractor did not finish within {0:?}")]
	Timeout(Duration),
	#[error("Frame extractor exited successfully but wrote nothing to {}", .0.display())]
	MissingOutput(PathBuf),
	#[error("Argument template must mention both {{input}} and {{output}}, received: {0:?}")]
	InvalidArgsTemplate(Vec<String>),
}
