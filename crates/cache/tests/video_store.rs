#![cfg(unix)]

use thumbs_cache::{
	Cause, ExtractorConfig, Freshness, Outcome, ThumbnailConfig, ThumbnailStore, Thumbnailer,
	ThumbnailerError,
};
use thumbs_frame_extractor::ExtractorError;

use std::{
	fs::{self, File},
	path::{Path, PathBuf},
	time::Duration,
};

use image::{Rgb, RgbImage, Rgba, RgbaImage};
use tempfile::{tempdir, TempDir};
use tracing_test::traced_test;

struct Fixture {
	dir: TempDir,
	root: PathBuf,
	source: PathBuf,
	recorded_args: PathBuf,
}

impl Fixture {
	/// A fake video next to a 160x90 red frame that the fake extractor hands back
	fn new() -> Self {
		let dir = tempdir().unwrap();
		let frame = dir.path().join("frame.png");
		RgbImage::from_pixel(160, 90, Rgb([220, 0, 0]))
			.save(&frame)
			.unwrap();

		let source = dir.path().join("pilot episode.mkv");
		fs::write(&source, b"not really matroska").unwrap();

		let recorded_args = dir.path().join("args.txt");
		let script = dir.path().join("extract.sh");
		fs::write(
			&script,
			format!(
				"printf '%s\\n' \"$@\" > '{}'\ncp '{}' \"$4\"\n",
				recorded_args.display(),
				frame.display()
			),
		)
		.unwrap();

		Self {
			root: dir.path().join("cache"),
			source,
			recorded_args,
			dir,
		}
	}

	fn script(&self, name: &str, body: &str) -> PathBuf {
		let script = self.dir.path().join(name);
		fs::write(&script, body).unwrap();
		script
	}

	fn store_with(&self, script: &Path) -> ThumbnailStore {
		let config = ThumbnailConfig {
			cache_root: Some(self.root.clone()),
			extractor: ExtractorConfig {
				program: "/bin/sh".into(),
				args: vec![
					script.to_string_lossy().into_owned(),
					"-i".into(),
					"{input}".into(),
					"-o".into(),
					"{output}".into(),
					"-s".into(),
					"{size}".into(),
				],
				timeout_secs: Some(10),
			},
			..Default::default()
		};

		ThumbnailStore::new(
			&self.root,
			Thumbnailer::Video(config.video_thumbnailer().unwrap()),
		)
		.unwrap()
	}

	fn store(&self) -> ThumbnailStore {
		self.store_with(&self.dir.path().join("extract.sh"))
	}
}

fn is_white(Rgba([r, g, b, _]): Rgba<u8>) -> bool {
	r > 160 && g > 160 && b > 160
}

fn is_red(Rgba([r, g, b, _]): Rgba<u8>) -> bool {
	r > 180 && g < 60 && b < 60
}

#[test]
#[traced_test]
fn frame_is_scaled_watermarked_and_cached_as_jpeg() {
	let fixture = Fixture::new();
	let store = fixture.store();

	let Outcome::Generated { path, cause } = store.lookup_or_create(&fixture.source, true)
	else {
		panic!("expected a generated thumbnail");
	};
	assert_eq!(cause, Cause::Missing);
	assert_eq!(path.extension().unwrap(), "jpg");
	assert_eq!(path.parent().unwrap(), fixture.root);

	let recorded = fs::read_to_string(&fixture.recorded_args).unwrap();
	let args = recorded.lines().collect::<Vec<_>>();
	assert_eq!(args[0], "-i");
	assert_eq!(args[1], fixture.source.to_str().unwrap());
	assert_eq!(args[5], "128");

	let thumb: RgbaImage = image::open(&path).unwrap().into_rgba8();
	assert_eq!(thumb.dimensions(), (128, 72));

	// the 32px glyph sits 4px away from the bottom-right corner, so its center is (108, 52)
	assert!(is_white(*thumb.get_pixel(108, 52)));
	assert!(is_red(*thumb.get_pixel(2, 2)));
	assert!(is_red(*thumb.get_pixel(60, 36)));

	// nothing but the entry is left behind
	let files = fs::read_dir(&fixture.root).unwrap().count();
	assert_eq!(files, 1);
}

#[test]
#[traced_test]
fn entry_newer_than_source_is_a_hit() {
	let fixture = Fixture::new();
	let store = fixture.store();

	let first = store.lookup_or_create(&fixture.source, true).into_path().unwrap();
	assert_eq!(store.is_current(&fixture.source), Freshness::Current);

	match store.lookup_or_create(&fixture.source, true) {
		Outcome::Hit(path) => assert_eq!(path, first),
		other => panic!("unexpected outcome: {other:?}"),
	}
}

#[test]
#[traced_test]
fn touching_the_source_regenerates() {
	let fixture = Fixture::new();
	let store = fixture.store();
	store.lookup_or_create(&fixture.source, true).into_path().unwrap();

	let modified = fs::metadata(&fixture.source).unwrap().modified().unwrap();
	File::options()
		.write(true)
		.open(&fixture.source)
		.unwrap()
		.set_modified(modified + Duration::from_secs(120))
		.unwrap();
	assert_eq!(store.is_current(&fixture.source), Freshness::Stale);

	assert!(matches!(
		store.lookup_or_create(&fixture.source, false),
		Outcome::Generated {
			cause: Cause::Stale,
			..
		}
	));
}

#[test]
#[traced_test]
fn failing_tool_keeps_previous_entry() {
	let fixture = Fixture::new();
	let entry = fixture
		.store()
		.lookup_or_create(&fixture.source, true)
		.into_path()
		.unwrap();
	let bytes = fs::read(&entry).unwrap();

	let broken = fixture.script("broken.sh", "echo 'moov atom not found' >&2\nexit 1\n");
	let store = fixture.store_with(&broken);

	match store.create(&fixture.source) {
		Outcome::Failed {
			cause: Cause::Forced,
			error: ThumbnailerError::Extractor(ExtractorError::Failed { code, stderr }),
		} => {
			assert_eq!(code, Some(1));
			assert!(stderr.contains("moov atom not found"));
		}
		other => panic!("unexpected outcome: {other:?}"),
	}

	assert_eq!(fs::read(&entry).unwrap(), bytes);
	let files = fs::read_dir(&fixture.root)
		.unwrap()
		.map(|entry| entry.unwrap().path())
		.collect::<Vec<_>>();
	assert_eq!(files, [entry]);
}

#[test]
#[traced_test]
fn tool_without_output_fails() {
	let fixture = Fixture::new();
	let silent = fixture.script("silent.sh", "exit 0\n");

	match fixture.store_with(&silent).lookup_or_create(&fixture.source, true) {
		Outcome::Failed {
			cause: Cause::Missing,
			error: ThumbnailerError::Extractor(ExtractorError::MissingOutput(_)),
		} => {}
		other => panic!("unexpected outcome: {other:?}"),
	}
}

#[test]
fn video_and_image_entries_do_not_collide() {
	let fixture = Fixture::new();
	let store = fixture.store();
	let entry = store.entry_path(&fixture.source);

	let image_store = ThumbnailStore::new(
		&fixture.root,
		Thumbnailer::Image(
			ThumbnailConfig::default()
				.image_thumbnailer()
				.unwrap(),
		),
	)
	.unwrap();

	assert_eq!(entry.with_extension("png"), image_store.entry_path(&fixture.source));
}
