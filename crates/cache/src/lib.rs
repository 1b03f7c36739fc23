//! A freedesktop-style thumbnail cache.
//!
//! Thumbnails live in a flat directory, one file per source, named after a hash of the source's
//! `file://` URI. Image thumbnails are PNGs that carry the source's URI and modification time as
//! text chunks, so a stale entry can be told apart from a current one without any index. Video
//! thumbnails are JPEGs produced by an external frame extractor and stamped with a play glyph.
//!
//! [`ThumbnailFactory`] is the usual entry point: it picks the right [`ThumbnailStore`] for a
//! source based on its file type and on whether it belongs to a shared library.

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

pub mod config;
mod error;
pub mod factory;
pub mod key;
pub mod metadata;
mod size;
pub mod store;
pub mod thumbnailer;

pub use config::{
	default_cache_root, ExtractorConfig, SharedLibrary, ThumbnailConfig, WatermarkConfig,
};
pub use error::{ConfigError, StoreError, ThumbnailerError};
pub use factory::{MediaKind, Route, Scope, ThumbnailFactory};
pub use key::{CacheKey, CanonicalUri};
pub use metadata::{Provenance, SourceInfo};
pub use size::SizeClass;
pub use store::{Cause, Outcome, ThumbnailStore};
pub use thumbnailer::{Freshness, ImageThumbnailer, SmallSource, Thumbnailer, VideoThumbnailer};
