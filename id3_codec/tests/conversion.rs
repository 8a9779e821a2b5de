#![allow(missing_docs)]

use id3_codec::config::{ParseOptions, ParsingMode, WriteOptions};
use id3_codec::date::Date;
use id3_codec::diagnostic::{Diagnostic, DiagnosticKind, IgnoreSink};
use id3_codec::id3::Id3Version;
use id3_codec::id3::v2::{FrameContent, Id3v2Tag};

fn parse(bytes: &[u8]) -> Id3v2Tag {
	Id3v2Tag::parse(
		&mut &bytes[..],
		ParseOptions::new().parsing_mode(ParsingMode::Strict),
		&mut IgnoreSink,
	)
	.unwrap()
	.unwrap()
}

// An ID3v2.3 tag with "TYER", "TDAT", "TIME", "TORY" and "TRDA"
fn v3_tag() -> Vec<u8> {
	let frames: [(&[u8; 4], &[u8]); 5] = [
		(b"TYER", b"1999"),
		(b"TDAT", b"2512"),
		(b"TIME", b"2359"),
		(b"TORY", b"1970"),
		(b"TRDA", b"December 25"),
	];

	let mut body = Vec::new();
	for (id, value) in frames {
		body.extend(id);
		body.extend((value.len() as u32 + 1).to_be_bytes());
		body.extend([0, 0, 0]);
		body.extend(value);
	}

	let mut tag = b"ID3\x03\x00\x00\x00\x00\x00".to_vec();
	tag.push(body.len() as u8);
	tag.extend(body);
	tag
}

#[test_log::test]
fn v3_to_v4() {
	let mut tag = parse(&v3_tag());
	assert_eq!(tag.version(), Id3Version::ID3_V2_3);

	let recording_date = Date {
		year: 1999,
		month: Some(12),
		day: Some(25),
		hour: Some(23),
		minute: Some(59),
		second: None,
	};

	// Available before conversion
	assert_eq!(tag.recording_date(), Some(recording_date));
	assert_eq!(tag.original_release_date(), Some(Date::from_year(1970)));

	let mut diagnostics: Vec<Diagnostic> = Vec::new();
	tag.convert_with(Id3Version::ID3_V2_4, &mut diagnostics)
		.unwrap();

	let ids: Vec<_> = tag.frames().ids().map(|id| id.as_str().to_owned()).collect();
	assert_eq!(ids.len(), 2);
	assert!(ids.iter().any(|id| id == "TDRC"));
	assert!(ids.iter().any(|id| id == "TDOR"));

	assert_eq!(diagnostics.len(), 1);
	assert_eq!(diagnostics[0].kind, DiagnosticKind::UnconvertibleFrameId);
	assert_eq!(diagnostics[0].frame_id.as_deref(), Some("TRDA"));

	let FrameContent::Date(date) = &tag.frames()["TDRC"][0].content else {
		unreachable!()
	};
	assert_eq!(date.date, Some(recording_date));
}

#[test_log::test]
fn v3_written_as_v4() {
	let tag = parse(&v3_tag());

	let bytes = tag.render(WriteOptions::new().preferred_padding(0)).unwrap();
	let reparsed = parse(&bytes);

	assert_eq!(reparsed.version(), Id3Version::ID3_V2_4);
	assert_eq!(reparsed.recording_date(), tag.recording_date());
	assert_eq!(reparsed.original_release_date(), Some(Date::from_year(1970)));
	assert!(!reparsed.frames().contains("TYER"));

	// Rendering doesn't touch the original
	assert!(tag.frames().contains("TYER"));
}

#[test_log::test]
fn v4_to_v3_and_back() {
	let mut tag = Id3v2Tag::new();
	tag.set_title("Foo title");
	tag.set_recording_date("2012-04-05T06:07:08".parse().unwrap());
	tag.set_text("TSST", "Disc subtitle").unwrap();

	let mut diagnostics: Vec<Diagnostic> = Vec::new();
	let mut v3 = tag.clone();
	v3.convert_with(Id3Version::ID3_V2_3, &mut diagnostics)
		.unwrap();

	assert_eq!(v3.version(), Id3Version::ID3_V2_3);
	assert_eq!(v3.text("TYER"), Some("2012"));
	assert_eq!(v3.text("TDAT"), Some("0504"));
	assert_eq!(v3.text("TIME"), Some("0607"));
	assert!(!v3.frames().contains("TSST"));
	assert_eq!(diagnostics.len(), 1);

	let back = parse(&v3.render(WriteOptions::new()).unwrap());
	assert_eq!(back.title().as_deref(), Some("Foo title"));
	assert_eq!(
		back.recording_date(),
		Some("2012-04-05T06:07".parse().unwrap())
	);
}

#[test_log::test]
fn v2_tag_upgraded() {
	let mut bytes = b"ID3\x02\x00\x00\x00\x00\x00\x1B".to_vec();
	bytes.extend(b"TP1\x00\x00\x07\x00Artist");
	bytes.extend(b"TYE\x00\x00\x05\x002001");
	bytes.extend(b"\0\0\0");

	let tag = Id3v2Tag::parse(&mut &bytes[..], ParseOptions::new(), &mut IgnoreSink)
		.unwrap()
		.unwrap();

	assert_eq!(tag.version(), Id3Version::ID3_V2_2);
	assert_eq!(tag.artist().as_deref(), Some("Artist"));
	assert_eq!(tag.text("TYER"), Some("2001"));
	assert_eq!(tag.recording_date(), Some(Date::from_year(2001)));

	let v4 = parse(&tag.render(WriteOptions::new()).unwrap());
	assert_eq!(v4.recording_date(), Some(Date::from_year(2001)));
	assert!(v4.frames().contains("TDRC"));
}
