use crate::{
	key::absolute_path,
	store::{Outcome, ThumbnailStore},
	thumbnailer::{Freshness, Thumbnailer},
	StoreError, ThumbnailConfig,
};

use std::path::{Path, PathBuf};

use thumbs_images::is_image_extension;
use thumbs_utils::error::FileIOError;
use tracing::{debug, instrument};

/// Which thumbnailer a source goes through
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MediaKind {
	Image,
	/// Anything that isn't a known still image format
	Video,
}

impl MediaKind {
	#[must_use]
	pub fn classify(path: impl AsRef<Path>) -> Self {
		match path.as_ref().extension() {
			Some(ext) if is_image_extension(ext) => Self::Image,
			_ => Self::Video,
		}
	}
}

/// Which cache a source belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scope {
	Private,
	Shared,
}

/// Which store handles a source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Route {
	pub scope: Scope,
	pub kind: MediaKind,
}

#[derive(Debug, Clone)]
struct StoreSet {
	image: ThumbnailStore,
	video: ThumbnailStore,
}

impl StoreSet {
	fn new(root: &Path, config: &ThumbnailConfig) -> Result<Self, StoreError> {
		Ok(Self {
			image: ThumbnailStore::new(root, Thumbnailer::Image(config.image_thumbnailer()?))?,
			video: ThumbnailStore::new(root, Thumbnailer::Video(config.video_thumbnailer()?))?,
		})
	}

	const fn get(&self, kind: MediaKind) -> &ThumbnailStore {
		match kind {
			MediaKind::Image => &self.image,
			MediaKind::Video => &self.video,
		}
	}
}

/// One entry point over a private cache and, optionally, a shared library's cache.
///
/// Sources under the shared media root are cached in the shared cache root, everything else
/// in the private one, so two libraries never step on each other's entries.
#[derive(Debug, Clone)]
pub struct ThumbnailFactory {
	private: StoreSet,
	shared: Option<(PathBuf, StoreSet)>,
}

impl ThumbnailFactory {
	pub fn new(config: &ThumbnailConfig) -> Result<Self, StoreError> {
		let private = StoreSet::new(&config.private_root()?, config)?;

		let shared = config
			.shared
			.as_ref()
			.map(|shared| {
				StoreSet::new(&shared.cache_root, config)
					.map(|stores| (absolute_path(&shared.media_root), stores))
			})
			.transpose()?;

		Ok(Self { private, shared })
	}

	#[must_use]
	pub fn route(&self, source: impl AsRef<Path>) -> Route {
		let source = source.as_ref();

		let scope = match &self.shared {
			Some((media_root, _)) if absolute_path(source).starts_with(media_root) => {
				Scope::Shared
			}
			_ => Scope::Private,
		};

		Route {
			scope,
			kind: MediaKind::classify(source),
		}
	}

	/// The store responsible for `source`
	#[must_use]
	pub fn store_for(&self, source: impl AsRef<Path>) -> &ThumbnailStore {
		let Route { scope, kind } = self.route(source);

		match (scope, &self.shared) {
			(Scope::Shared, Some((_, shared))) => shared.get(kind),
			_ => self.private.get(kind),
		}
	}

	#[instrument(skip_all, fields(source = %source.as_ref().display(), create))]
	pub fn lookup_or_create(&self, source: impl AsRef<Path>, create: bool) -> Outcome {
		let source = source.as_ref();
		let store = self.store_for(source);
		debug!(root = %store.root().display(), "Routed request");
		store.lookup_or_create(source, create)
	}

	pub fn create(&self, source: impl AsRef<Path>) -> Outcome {
		let source = source.as_ref();
		self.store_for(source).create(source)
	}

	pub fn delete(&self, source: impl AsRef<Path>) -> Result<(), FileIOError> {
		let source = source.as_ref();
		self.store_for(source).delete(source)
	}

	pub fn is_current(&self, source: impl AsRef<Path>) -> Freshness {
		let source = source.as_ref();
		self.store_for(source).is_current(source)
	}
}
