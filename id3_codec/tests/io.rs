#![allow(missing_docs)]

use id3_codec::config::{ParseOptions, ParsingMode, WriteOptions};
use id3_codec::diagnostic::LogSink;
use id3_codec::id3::v1::Id3v1Tag;
use id3_codec::id3::v2::Id3v2Tag;
use id3_codec::id3::{Id3Version, find_id3v1, find_id3v2};

use std::io::{Read, Seek, SeekFrom, Write};

const AUDIO: &[u8] = b"\xFF\xFB\x90\x64 pretend this is an MPEG frame";

fn id3v2() -> Id3v2Tag {
	let mut tag = Id3v2Tag::new();
	tag.set_title("Foo title");
	tag.set_artist("Bar artist");
	tag.set_album("Baz album");
	tag.set_track_num(Some(1), Some(10));
	tag
}

fn write_file(file: &mut std::fs::File, id3v2: &Id3v2Tag, options: WriteOptions) {
	id3v2.dump_to(file, options).unwrap();
	file.write_all(AUDIO).unwrap();
	Id3v1Tag::from(id3v2)
		.dump_to(file, WriteOptions::new())
		.unwrap();
}

#[test_log::test]
fn io_save_to_file() {
	let mut temp_file = tempfile::tempfile().unwrap();
	write_file(&mut temp_file, &id3v2(), WriteOptions::new());

	temp_file.rewind().unwrap();

	let tag = find_id3v2(&mut temp_file, ParseOptions::new(), &mut LogSink)
		.unwrap()
		.unwrap();
	assert_eq!(tag.title().as_deref(), Some("Foo title"));
	assert_eq!(tag.track_num(), (Some(1), Some(10)));
	assert_eq!(tag.padding(), WriteOptions::DEFAULT_PREFERRED_PADDING);

	// The reader is left at the audio
	let mut audio = [0; AUDIO.len()];
	temp_file.read_exact(&mut audio).unwrap();
	assert_eq!(audio, AUDIO);

	let id3v1 = find_id3v1(&mut temp_file, ParsingMode::Strict)
		.unwrap()
		.unwrap();
	assert_eq!(id3v1.title.as_deref(), Some("Foo title"));
	assert_eq!(id3v1.track_number, Some(1));
}

#[test_log::test]
fn io_rewrite_tag() {
	let mut temp_file = tempfile::tempfile().unwrap();
	write_file(&mut temp_file, &id3v2(), WriteOptions::new().version(Id3Version::ID3_V2_3));

	temp_file.rewind().unwrap();
	let mut tag = find_id3v2(&mut temp_file, ParseOptions::new(), &mut LogSink)
		.unwrap()
		.unwrap();
	assert_eq!(tag.version(), Id3Version::ID3_V2_3);

	// Everything after the old tag
	let mut rest = Vec::new();
	temp_file.read_to_end(&mut rest).unwrap();

	tag.set_artist("Qux artist");

	let mut new_file = tempfile::tempfile().unwrap();
	tag.dump_to(&mut new_file, WriteOptions::new()).unwrap();
	new_file.write_all(&rest).unwrap();

	new_file.rewind().unwrap();
	let tag = find_id3v2(&mut new_file, ParseOptions::new(), &mut LogSink)
		.unwrap()
		.unwrap();
	assert_eq!(tag.version(), Id3Version::ID3_V2_4);
	assert_eq!(tag.artist().as_deref(), Some("Qux artist"));
	assert_eq!(tag.title().as_deref(), Some("Foo title"));

	// The ID3v1 tag was untouched
	let id3v1 = find_id3v1(&mut new_file, ParsingMode::Strict)
		.unwrap()
		.unwrap();
	assert_eq!(id3v1.artist.as_deref(), Some("Bar artist"));
}

#[test_log::test]
fn io_untagged_file() {
	let mut temp_file = tempfile::tempfile().unwrap();
	temp_file.write_all(AUDIO).unwrap();
	temp_file.rewind().unwrap();

	assert!(
		find_id3v2(&mut temp_file, ParseOptions::new(), &mut LogSink)
			.unwrap()
			.is_none()
	);

	// Too small for an ID3v1 tag, the reader ends up at the end
	assert!(
		find_id3v1(&mut temp_file, ParsingMode::BestAttempt)
			.unwrap()
			.is_none()
	);
	assert_eq!(
		temp_file.stream_position().unwrap(),
		temp_file.seek(SeekFrom::End(0)).unwrap()
	);
}
