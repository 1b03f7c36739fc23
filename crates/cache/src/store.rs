use crate::{
	key::CacheKey,
	thumbnailer::{Freshness, Render, Thumbnailer},
	SourceInfo, StoreError, ThumbnailerError,
};

use std::{
	fs,
	io::{self, Write},
	path::{Path, PathBuf},
};

use thumbs_utils::error::FileIOError;
use tracing::{debug, error, instrument, trace, warn};

/// Why a thumbnail was (re)generated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cause {
	/// There was no usable entry
	Missing,
	/// The entry was made from an older version of the source
	Stale,
	/// The caller asked for regeneration
	Forced,
}

/// Result of a store operation. Per-request failures live here rather than in an `Err`, the
/// only fatal errors are configuration errors raised when building the store.
#[derive(Debug)]
pub enum Outcome {
	/// A current entry was already cached
	Hit(PathBuf),
	/// A new entry was written
	Generated { path: PathBuf, cause: Cause },
	/// The source is small enough to be used as-is
	Source(PathBuf),
	/// The source is small enough and this store refuses to reuse it
	TooSmall,
	/// Nothing cached and creation wasn't requested
	Miss,
	/// Rendering or writing failed; any previous entry is untouched
	Failed {
		cause: Cause,
		error: ThumbnailerError,
	},
}

impl Outcome {
	/// The file to display, if any
	#[must_use]
	pub fn path(&self) -> Option<&Path> {
		match self {
			Self::Hit(path) | Self::Generated { path, .. } | Self::Source(path) => Some(path),
			Self::TooSmall | Self::Miss | Self::Failed { .. } => None,
		}
	}

	#[must_use]
	pub fn into_path(self) -> Option<PathBuf> {
		match self {
			Self::Hit(path) | Self::Generated { path, .. } | Self::Source(path) => Some(path),
			Self::TooSmall | Self::Miss | Self::Failed { .. } => None,
		}
	}
}

/// A cache directory holding `<cache-key>.<ext>` entries produced by one thumbnailer.
///
/// Entries only ever appear through an atomic rename from a temporary file in the same
/// directory, so readers never observe a partially written thumbnail.
#[derive(Debug, Clone)]
pub struct ThumbnailStore {
	root: PathBuf,
	thumbnailer: Thumbnailer,
}

impl ThumbnailStore {
	/// The directory itself is created lazily, on the first write
	pub fn new(root: impl Into<PathBuf>, thumbnailer: Thumbnailer) -> Result<Self, StoreError> {
		let root = root.into();

		match fs::metadata(&root) {
			Ok(metadata) if !metadata.is_dir() => return Err(StoreError::NotADirectory(root)),
			Ok(_) => {}
			Err(e) if e.kind() == io::ErrorKind::NotFound => {}
			Err(e) => return Err(FileIOError::from((root, e, "inspecting cache root")).into()),
		}

		Ok(Self { root, thumbnailer })
	}

	#[must_use]
	pub fn root(&self) -> &Path {
		&self.root
	}

	#[must_use]
	pub const fn thumbnailer(&self) -> &Thumbnailer {
		&self.thumbnailer
	}

	/// Where the entry for `source` lives, whether or not it exists
	#[must_use]
	pub fn entry_path(&self, source: impl AsRef<Path>) -> PathBuf {
		self.entry_path_for(&CacheKey::derive(source))
	}

	fn entry_path_for(&self, key: &CacheKey) -> PathBuf {
		self.root.join(key.file_name(self.thumbnailer.extension()))
	}

	pub fn is_current(&self, source: impl AsRef<Path>) -> Freshness {
		let source = source.as_ref();
		self.thumbnailer.freshness(&self.entry_path(source), source)
	}

	/// Returns the cached entry when it's current, regenerating stale or unreadable ones.
	/// Missing entries are only created when `create` is set.
	#[instrument(skip_all, fields(source = %source.as_ref().display(), create))]
	pub fn lookup_or_create(&self, source: impl AsRef<Path>, create: bool) -> Outcome {
		let source = source.as_ref();
		let entry = self.entry_path(source);

		match self.thumbnailer.freshness(&entry, source) {
			Freshness::Current => {
				trace!("Cache hit");
				Outcome::Hit(entry)
			}
			Freshness::Missing if !create => Outcome::Miss,
			Freshness::Missing | Freshness::Invalid => self.generate(source, Cause::Missing),
			Freshness::Stale => self.generate(source, Cause::Stale),
		}
	}

	/// Regenerates the entry regardless of its state
	#[instrument(skip_all, fields(source = %source.as_ref().display()))]
	pub fn create(&self, source: impl AsRef<Path>) -> Outcome {
		self.generate(source.as_ref(), Cause::Forced)
	}

	/// Removes the entry for `source`. Deleting something that isn't cached is a no-op.
	#[instrument(skip_all, fields(source = %source.as_ref().display()))]
	pub fn delete(&self, source: impl AsRef<Path>) -> Result<(), FileIOError> {
		let entry = self.entry_path(source);

		match fs::remove_file(&entry) {
			Ok(()) => {
				debug!(entry = %entry.display(), "Removed thumbnail");
				Ok(())
			}
			Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
			Err(e) => Err(FileIOError::from((entry, e, "removing thumbnail"))),
		}
	}

	fn generate(&self, source: &Path, cause: Cause) -> Outcome {
		debug!(?cause, "Generating thumbnail");

		match self.try_generate(source) {
			Ok(Some(path)) => Outcome::Generated { path, cause },
			Ok(None) => {
				// try_generate only returns None for sources that don't need a thumbnail
				Outcome::Source(source.to_path_buf())
			}
			Err(GenerateError::TooSmall) => Outcome::TooSmall,
			Err(GenerateError::Thumbnailer(error)) => {
				warn!(%error, ?cause, "Failed to generate thumbnail");
				Outcome::Failed { cause, error }
			}
		}
	}

	fn try_generate(&self, source: &Path) -> Result<Option<PathBuf>, GenerateError> {
		let info = SourceInfo::read(source).map_err(ThumbnailerError::Source)?;
		let key = CacheKey::from_uri(&info.uri);

		self.ensure_root()?;

		let encoded = match self.thumbnailer.render(&info, &self.root)? {
			Render::Encoded(bytes) => bytes,
			Render::UseSource => return Ok(None),
			Render::TooSmall => return Err(GenerateError::TooSmall),
		};

		let entry = self.entry_path_for(&key);
		self.persist(&encoded, &entry)?;
		debug!(entry = %entry.display(), bytes = encoded.len(), "Wrote thumbnail");

		Ok(Some(entry))
	}

	/// Temp file in the cache directory, made owner-only, then renamed over the final name.
	/// The rename is the last fallible step, the temp file removes itself if anything before
	/// it fails.
	fn persist(&self, bytes: &[u8], entry: &Path) -> Result<(), ThumbnailerError> {
		let write_err = |e: io::Error, context: &'static str| {
			ThumbnailerError::Write(FileIOError::from((entry, e, context)))
		};

		let mut temp = tempfile::Builder::new()
			.prefix(".thumb-")
			.suffix(".tmp")
			.tempfile_in(&self.root)
			.map_err(|e| write_err(e, "creating temporary file"))?;

		temp.write_all(bytes)
			.and_then(|()| temp.as_file().sync_all())
			.map_err(|e| write_err(e, "writing temporary file"))?;

		restrict_permissions(temp.as_file())
			.map_err(|e| write_err(e, "restricting permissions"))?;

		temp.persist(entry)
			.map(|_| ())
			.map_err(|e| write_err(e.error, "renaming into place"))
	}

	fn ensure_root(&self) -> Result<(), ThumbnailerError> {
		create_private_dir(&self.root).map_err(|e| {
			error!(%e, "Failed to create cache directory");
			ThumbnailerError::Write(FileIOError::from((
				&self.root,
				e,
				"creating cache directory",
			)))
		})
	}
}

enum GenerateError {
	TooSmall,
	Thumbnailer(ThumbnailerError),
}

impl From<ThumbnailerError> for GenerateError {
	fn from(e: ThumbnailerError) -> Self {
		Self::Thumbnailer(e)
	}
}

/// Creates `dir` and any missing parents, readable by the owner only
pub(crate) fn create_private_dir(dir: &Path) -> io::Result<()> {
	let mut builder = fs::DirBuilder::new();
	builder.recursive(true);

	#[cfg(unix)]
	{
		use std::os::unix::fs::DirBuilderExt;
		builder.mode(0o700);
	}

	builder.create(dir)
}

#[cfg(unix)]
fn restrict_permissions(file: &fs::File) -> io::Result<()> {
	use std::os::unix::fs::PermissionsExt;
	file.set_permissions(fs::Permissions::from_mode(0o600))
}

#[cfg(not(unix))]
#[allow(clippy::unnecessary_wraps)]
fn restrict_permissions(_file: &fs::File) -> io::Result<()> {
	Ok(())
}
