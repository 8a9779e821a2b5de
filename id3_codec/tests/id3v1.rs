#![allow(missing_docs)]

use id3_codec::config::{ParsingMode, WriteOptions};
use id3_codec::id3::v1::Id3v1Tag;
use id3_codec::id3::v2::Id3v2Tag;
use id3_codec::id3::{Id3Version, find_id3v1};

use std::io::Cursor;

fn with_audio(tag: &[u8]) -> Cursor<Vec<u8>> {
	let mut file = vec![0xFF; 512];
	file.extend_from_slice(tag);
	Cursor::new(file)
}

#[test_log::test]
fn read_v1_1() {
	let mut tag = [0; 128];
	tag[..3].copy_from_slice(b"TAG");
	tag[3..12].copy_from_slice(b"Foo title");
	tag[33..43].copy_from_slice(b"Bar artist");
	tag[63..72].copy_from_slice(b"Baz album");
	tag[93..97].copy_from_slice(b"1984");
	tag[97..108].copy_from_slice(b"Qux comment");
	tag[126] = 3;
	tag[127] = 17;

	let tag = find_id3v1(&mut with_audio(&tag), ParsingMode::Strict)
		.unwrap()
		.unwrap();

	assert_eq!(tag.version(), Id3Version::ID3_V1_1);
	assert_eq!(tag.title.as_deref(), Some("Foo title"));
	assert_eq!(tag.artist.as_deref(), Some("Bar artist"));
	assert_eq!(tag.album.as_deref(), Some("Baz album"));
	assert_eq!(tag.year, Some(1984));
	assert_eq!(tag.comment.as_deref(), Some("Qux comment"));
	assert_eq!(tag.track_number, Some(3));
	assert_eq!(tag.genre, Some(17));
}

#[test_log::test]
fn no_tag() {
	let mut file = with_audio(&[0; 128]);
	assert!(
		find_id3v1(&mut file, ParsingMode::Strict)
			.unwrap()
			.is_none()
	);
}

#[test_log::test]
fn latin1_text() {
	let tag = Id3v1Tag {
		title: Some(String::from("Café del Mar")),
		..Id3v1Tag::default()
	};

	let bytes = tag.render(WriteOptions::new()).unwrap();
	// "é" is a single byte in Latin-1
	assert_eq!(bytes[6], 0xE9);

	let tag = find_id3v1(&mut with_audio(&bytes), ParsingMode::Strict)
		.unwrap()
		.unwrap();
	assert_eq!(tag.title.as_deref(), Some("Café del Mar"));
}

#[test_log::test]
fn through_id3v2() {
	let id3v1 = Id3v1Tag {
		title: Some(String::from("Foo title")),
		year: Some(2001),
		track_number: Some(5),
		genre: Some(80),
		..Id3v1Tag::default()
	};

	let id3v2 = Id3v2Tag::from(id3v1.clone());
	assert_eq!(id3v2.genre().as_deref(), Some("80"));
	assert_eq!(Id3v1Tag::from(&id3v2), id3v1);
}
