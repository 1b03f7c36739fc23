//! Cache keys: a source path becomes a canonical `file://` URI, and the URI's BLAKE3 digest
//! names the thumbnail on disk.

use std::{
	fmt,
	path::{Component, Path, PathBuf},
};

use url::Url;

/// Absolute, lexically normalized form of `path`: `.` components are dropped and `..` pops
/// its parent. Symlinks are not resolved, so the file doesn't need to exist.
#[must_use]
pub fn absolute_path(path: impl AsRef<Path>) -> PathBuf {
	let path = path.as_ref();
	let absolute = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());

	let mut normalized = PathBuf::new();
	for component in absolute.components() {
		match component {
			Component::CurDir => {}
			Component::ParentDir => {
				normalized.pop();
			}
			other => normalized.push(other),
		}
	}

	normalized
}

/// Percent-encoded `file://` URI of an absolute, normalized source path.
///
/// Two paths resolving to the same absolute path always produce byte-identical URIs.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CanonicalUri(String);

impl CanonicalUri {
	#[must_use]
	pub fn from_path(path: impl AsRef<Path>) -> Self {
		let absolute = absolute_path(path);

		Self(
			Url::from_file_path(&absolute).map_or_else(
				// Only reachable when we couldn't make the path absolute at all
				|()| format!("file://{}", absolute.to_string_lossy()),
				String::from,
			),
		)
	}

	#[must_use]
	pub fn as_str(&self) -> &str {
		&self.0
	}
}

impl fmt::Display for CanonicalUri {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}

/// Lowercase hex BLAKE3 digest of a [`CanonicalUri`], used as the thumbnail's file stem
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
	#[must_use]
	pub fn derive(path: impl AsRef<Path>) -> Self {
		Self::from_uri(&CanonicalUri::from_path(path))
	}

	#[must_use]
	pub fn from_uri(uri: &CanonicalUri) -> Self {
		Self(blake3::hash(uri.as_str().as_bytes()).to_hex().to_string())
	}

	#[must_use]
	pub fn as_str(&self) -> &str {
		&self.0
	}

	/// `<hex>.<extension>`
	#[must_use]
	pub fn file_name(&self, extension: &str) -> String {
		format!("{}.{extension}", self.0)
	}
}

impl fmt::Display for CacheKey {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn relative_spellings_share_a_key() {
		assert_eq!(CacheKey::derive("a/b.png"), CacheKey::derive("./a/b.png"));
		assert_eq!(CacheKey::derive("a/b.png"), CacheKey::derive("a/c/../b.png"));
		assert_eq!(
			CacheKey::derive("a/b.png"),
			CacheKey::derive(std::env::current_dir().unwrap().join("a/b.png"))
		);
	}

	#[test]
	fn different_files_differ() {
		assert_ne!(CacheKey::derive("/media/a.png"), CacheKey::derive("/media/b.png"));
	}

	#[test]
	fn key_is_lowercase_hex() {
		let key = CacheKey::derive("/media/photos/beach.jpg");

		assert_eq!(key.as_str().len(), 64);
		assert!(key
			.as_str()
			.chars()
			.all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c)));
		assert_eq!(key, CacheKey::derive("/media/photos/beach.jpg"));
		assert_eq!(key.file_name("png"), format!("{key}.png"));
	}

	#[cfg(unix)]
	#[test]
	fn uri_is_percent_encoded() {
		let uri = CanonicalUri::from_path("/media/summer trip/100%.jpg");
		assert_eq!(uri.as_str(), "file:///media/summer%20trip/100%25.jpg");
	}

	#[cfg(unix)]
	#[test]
	fn dot_components_are_folded() {
		assert_eq!(
			absolute_path("/media/./movies/../photos/x.jpg"),
			PathBuf::from("/media/photos/x.jpg")
		);
	}

	#[test]
	fn key_matches_uri_digest() {
		let uri = CanonicalUri::from_path("/media/x.mkv");
		assert_eq!(CacheKey::from_uri(&uri), CacheKey::derive("/media/x.mkv"));
		assert_eq!(
			CacheKey::from_uri(&uri).as_str(),
			blake3::hash(uri.as_str().as_bytes()).to_hex().as_str()
		);
	}
}
