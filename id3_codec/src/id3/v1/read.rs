use super::tag::Id3v1Tag;
use super::{ID3V1_TAG_MARKER, ID3V1_TAG_SIZE};
use crate::config::ParsingMode;
use crate::error::Result;
use crate::macros::err;
use crate::util::text::latin1_decode;

// Offsets past the marker
const TITLE: std::ops::Range<usize> = 0..30;
const ARTIST: std::ops::Range<usize> = 30..60;
const ALBUM: std::ops::Range<usize> = 60..90;
const YEAR: std::ops::Range<usize> = 90..94;
const COMMENT_START: usize = 94;
const TRACK_MARKER: usize = 122;
const TRACK: usize = 123;
const GENRE: usize = 124;

const NO_GENRE: u8 = 255;

impl Id3v1Tag {
	/// Read an `Id3v1Tag` from its 128 bytes
	///
	/// # Errors
	///
	/// * The tag doesn't start with "TAG"
	/// * [`ParsingMode::Strict`] is used and the year isn't 4 digits
	///
	/// # Examples
	///
	/// ```rust
	/// use id3_codec::config::ParsingMode;
	/// use id3_codec::id3::v1::Id3v1Tag;
	///
	/// # fn main() -> id3_codec::error::Result<()> {
	/// let mut bytes = [0; 128];
	/// bytes[..3].copy_from_slice(b"TAG");
	/// bytes[3..7].copy_from_slice(b"Song");
	/// bytes[127] = 255;
	///
	/// let tag = Id3v1Tag::parse(bytes, ParsingMode::BestAttempt)?;
	/// assert_eq!(tag.title.as_deref(), Some("Song"));
	/// assert!(tag.genre.is_none());
	/// # Ok(()) }
	/// ```
	pub fn parse(bytes: [u8; ID3V1_TAG_SIZE], parse_mode: ParsingMode) -> Result<Self> {
		if bytes[..3] != ID3V1_TAG_MARKER {
			err!(FakeTag);
		}

		let reader = &bytes[3..];

		// Determine the range of the comment (30 bytes for ID3v1 and 28 for ID3v1.1)
		// We check for the null terminator 28 bytes in, and for a non-zero track number after it.
		// A track number of 0 is invalid.
		let (comment_end, track_number) = if reader[TRACK_MARKER] == 0 && reader[TRACK] != 0 {
			(TRACK_MARKER, Some(reader[TRACK]))
		} else {
			(GENRE, None)
		};

		Ok(Self {
			title: decode_text(&reader[TITLE]),
			artist: decode_text(&reader[ARTIST]),
			album: decode_text(&reader[ALBUM]),
			year: try_parse_year(&reader[YEAR], parse_mode)?,
			comment: decode_text(&reader[COMMENT_START..comment_end]),
			track_number,
			genre: (reader[GENRE] != NO_GENRE).then_some(reader[GENRE]),
		})
	}
}

fn decode_text(data: &[u8]) -> Option<String> {
	let mut first_null_pos = data.len();
	if let Some(null_pos) = data.iter().position(|&b| b == 0) {
		if null_pos == 0 {
			return None;
		}

		if data[null_pos..].iter().any(|b| *b != b'\0') {
			log::warn!("ID3v1 text field contains trailing junk, skipping");
		}

		first_null_pos = null_pos;
	}

	Some(latin1_decode(&data[..first_null_pos]))
}

fn try_parse_year(input: &[u8], parse_mode: ParsingMode) -> Result<Option<u16>> {
	let (num_digits, year) = input
		.iter()
		.take_while(|c| c.is_ascii_digit())
		.fold((0usize, 0u16), |(num_digits, year), c| {
			(num_digits + 1, year * 10 + u16::from(*c - b'0'))
		});

	if num_digits != 4 {
		// Most writers store "\0\0\0\0" for an empty year, rather than "0000"
		if parse_mode == ParsingMode::Strict && input.iter().any(|c| *c != 0) {
			err!(TextDecode(
				"ID3v1 year field contains non-ASCII digit characters"
			));
		}

		return Ok(None);
	}

	Ok(Some(year))
}

#[cfg(test)]
mod tests {
	use crate::config::ParsingMode;
	use crate::id3::v1::Id3v1Tag;

	fn tag_bytes(comment: &[u8], track_marker: u8, track: u8) -> [u8; 128] {
		let mut bytes = [0; 128];
		bytes[..3].copy_from_slice(b"TAG");
		bytes[3..12].copy_from_slice(b"Foo title");
		bytes[93..97].copy_from_slice(b"1984");
		bytes[97..97 + comment.len()].copy_from_slice(comment);
		bytes[125] = track_marker;
		bytes[126] = track;
		bytes[127] = 32;
		bytes
	}

	#[test_log::test]
	fn v1_1_track_number() {
		let tag = Id3v1Tag::parse(tag_bytes(b"Qux comment", 0, 7), ParsingMode::Strict).unwrap();

		assert_eq!(tag.title.as_deref(), Some("Foo title"));
		assert!(tag.artist.is_none());
		assert_eq!(tag.year, Some(1984));
		assert_eq!(tag.comment.as_deref(), Some("Qux comment"));
		assert_eq!(tag.track_number, Some(7));
		assert_eq!(tag.genre, Some(32));
	}

	#[test_log::test]
	fn v1_0_full_comment() {
		let comment = [b'a'; 30];
		let tag = Id3v1Tag::parse(tag_bytes(&comment, b'a', b'a'), ParsingMode::Strict).unwrap();

		assert_eq!(tag.comment.as_deref(), Some("a".repeat(30).as_str()));
		assert!(tag.track_number.is_none());

		// A zero track is no track
		let tag = Id3v1Tag::parse(tag_bytes(b"Qux", 0, 0), ParsingMode::Strict).unwrap();
		assert!(tag.track_number.is_none());
	}

	#[test_log::test]
	fn bad_years() {
		let mut bytes = tag_bytes(b"", 0, 0);
		bytes[93..97].copy_from_slice(b"84\0\0");

		assert!(Id3v1Tag::parse(bytes, ParsingMode::Strict).is_err());
		assert_eq!(
			Id3v1Tag::parse(bytes, ParsingMode::BestAttempt).unwrap().year,
			None
		);

		// Empty years are fine
		bytes[93..97].copy_from_slice(&[0; 4]);
		assert!(Id3v1Tag::parse(bytes, ParsingMode::Strict).is_ok());
	}

	#[test_log::test]
	fn fake_tag() {
		let mut bytes = tag_bytes(b"", 0, 0);
		bytes[..3].copy_from_slice(b"TAF");
		assert!(Id3v1Tag::parse(bytes, ParsingMode::BestAttempt).is_err());
	}
}
