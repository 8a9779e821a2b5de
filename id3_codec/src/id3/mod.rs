//! ID3 specific items
//!
//! ID3 does things differently than other tags, making working with them a little more effort than other formats.
//! Check the other modules for important notes and/or warnings.

pub mod v1;
pub mod v2;
mod version;

pub use version::{Id3Version, VersionFamily};

use crate::config::{ParseOptions, ParsingMode};
use crate::diagnostic::DiagnosticSink;
use crate::error::Result;
use v1::{ID3V1_TAG_MARKER, ID3V1_TAG_SIZE, Id3v1Tag};
use v2::Id3v2Tag;

use std::io::{Read, Seek, SeekFrom};

/// Search for an ID3v1 tag at the end of `reader`
///
/// The reader can be positioned anywhere. It is left at the end of the stream.
///
/// # Errors
///
/// * `reader` fails
/// * The tag is invalid, see [`Id3v1Tag::parse`]
///
/// # Examples
///
/// ```rust
/// use id3_codec::config::ParsingMode;
/// use id3_codec::id3::find_id3v1;
/// use std::io::Cursor;
///
/// # fn main() -> id3_codec::error::Result<()> {
/// let mut file = b"Some audio data".to_vec();
/// assert!(find_id3v1(&mut Cursor::new(&file), ParsingMode::BestAttempt)?.is_none());
///
/// let mut tag = [0; 128];
/// tag[..3].copy_from_slice(b"TAG");
/// tag[3..7].copy_from_slice(b"Song");
/// file.extend(tag);
///
/// let tag = find_id3v1(&mut Cursor::new(&file), ParsingMode::BestAttempt)?.unwrap();
/// assert_eq!(tag.title.as_deref(), Some("Song"));
/// # Ok(()) }
/// ```
pub fn find_id3v1<R>(reader: &mut R, parse_mode: ParsingMode) -> Result<Option<Id3v1Tag>>
where
	R: Read + Seek,
{
	log::debug!("Searching for an ID3v1 tag");

	// Reader is too small to contain an ID3v1 tag
	if reader.seek(SeekFrom::End(-(ID3V1_TAG_SIZE as i64))).is_err() {
		reader.seek(SeekFrom::End(0))?;
		return Ok(None);
	}

	let mut id3v1 = [0; ID3V1_TAG_SIZE];
	reader.read_exact(&mut id3v1)?;

	// No ID3v1 tag found
	if id3v1[..3] != ID3V1_TAG_MARKER {
		return Ok(None);
	}

	log::debug!("Found an ID3v1 tag, parsing");

	Id3v1Tag::parse(id3v1, parse_mode).map(Some)
}

/// Read an ID3v2 tag from the start of `reader`
///
/// When there is no tag, `Ok(None)` is returned, and the reader has consumed up to 10 bytes.
/// Otherwise, the reader is left directly after the tag (including its footer).
///
/// # Errors
///
/// See [`Id3v2Tag::parse`]
///
/// # Examples
///
/// ```rust
/// use id3_codec::config::ParseOptions;
/// use id3_codec::diagnostic::IgnoreSink;
/// use id3_codec::id3::find_id3v2;
///
/// # fn main() -> id3_codec::error::Result<()> {
/// let mut file = &b"ID3\x03\x00\x00\x00\x00\x00\x0FTIT2\x00\x00\x00\x05\x00\x00\x00Songaudio"[..];
///
/// let tag = find_id3v2(&mut file, ParseOptions::new(), &mut IgnoreSink)?.unwrap();
/// assert_eq!(tag.title().as_deref(), Some("Song"));
/// assert_eq!(file, b"audio");
/// # Ok(()) }
/// ```
pub fn find_id3v2<R>(
	reader: &mut R,
	options: ParseOptions,
	sink: &mut dyn DiagnosticSink,
) -> Result<Option<Id3v2Tag>>
where
	R: Read,
{
	log::debug!("Searching for an ID3v2 tag");

	Id3v2Tag::parse(reader, options, sink)
}
