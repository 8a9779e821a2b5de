use crate::error::{ErrorKind, Id3Error, Result};
use crate::id3::{Id3Version, VersionFamily};
use crate::macros::err;

/// Errors that can occur while encoding text
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct TextEncodingError {
	encoding: TextEncoding,
	valid_up_to: usize,
}

impl TextEncodingError {
	/// The target text encoding
	pub fn encoding(&self) -> TextEncoding {
		self.encoding
	}

	/// The character index in the provided string up to which the encoding was valid
	pub fn valid_up_to(&self) -> usize {
		self.valid_up_to
	}
}

impl core::fmt::Display for TextEncodingError {
	fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
		let encoding = match self.encoding {
			TextEncoding::Latin1 => "Latin-1",
			TextEncoding::UTF16 => "UTF-16",
			TextEncoding::UTF8 => "UTF-8",
			TextEncoding::UTF16BE => "UTF-16 BE",
		};

		write!(
			f,
			"invalid {encoding} sequence from index {}",
			self.valid_up_to
		)
	}
}

impl core::error::Error for TextEncodingError {}

/// The text encoding for use in ID3v2 frames
#[derive(Debug, Clone, Eq, PartialEq, Copy, Hash, Default)]
#[repr(u8)]
pub enum TextEncoding {
	/// ISO-8859-1
	#[default]
	Latin1 = 0,
	/// UTF-16 with a byte order mark
	UTF16 = 1,
	/// UTF-16 big endian
	UTF16BE = 2,
	/// UTF-8
	UTF8 = 3,
}

impl TextEncoding {
	/// Get a `TextEncoding` from a u8, must be 0-3 inclusive
	///
	/// # Examples
	///
	/// ```rust
	/// use id3_codec::id3::v2::TextEncoding;
	///
	/// assert_eq!(TextEncoding::from_u8(3), Some(TextEncoding::UTF8));
	/// assert_eq!(TextEncoding::from_u8(4), None);
	/// ```
	pub fn from_u8(byte: u8) -> Option<Self> {
		match byte {
			0 => Some(Self::Latin1),
			1 => Some(Self::UTF16),
			2 => Some(Self::UTF16BE),
			3 => Some(Self::UTF8),
			_ => None,
		}
	}

	/// The width of the null terminator in this encoding
	pub fn terminator_len(self) -> usize {
		match self {
			Self::Latin1 | Self::UTF8 => 1,
			Self::UTF16 | Self::UTF16BE => 2,
		}
	}

	pub(crate) fn verify_latin1(text: &str) -> bool {
		text.chars().all(|c| c as u32 <= 255)
	}

	/// ID3v2.4 introduced two new text encodings.
	///
	/// When writing ID3v2.3 (or ID3v2.2), we just substitute with UTF-16.
	pub(crate) fn to_id3v23(self) -> Self {
		match self {
			Self::UTF8 | Self::UTF16BE => {
				log::warn!(
					"Text encoding {:?} is not supported in ID3v2.3, substituting with UTF-16",
					self
				);
				Self::UTF16
			},
			_ => self,
		}
	}

	/// The encoding to actually write for `version`
	pub(crate) fn for_version(self, version: Id3Version) -> Self {
		match version.family() {
			VersionFamily::V2_4 => self,
			_ => self.to_id3v23(),
		}
	}

	/// The smallest encoding able to represent `text`
	pub(crate) fn best_for(text: &str) -> Self {
		if Self::verify_latin1(text) {
			return Self::Latin1;
		}

		Self::UTF8
	}

	/// Encode `text`, optionally appending a terminator
	///
	/// UTF-16 is always written little endian, with a byte order mark.
	///
	/// # Errors
	///
	/// `text` contains characters that cannot be represented in Latin-1, and `lossy` is not set.
	/// With `lossy`, such characters are replaced with '?'.
	pub fn encode(
		self,
		text: &str,
		terminated: bool,
		lossy: bool,
	) -> std::result::Result<Vec<u8>, TextEncodingError> {
		match self {
			TextEncoding::Latin1 => {
				let mut out =
					latin1_encode(text, lossy).collect::<std::result::Result<Vec<u8>, _>>()?;
				if terminated {
					out.push(0)
				}

				Ok(out)
			},
			TextEncoding::UTF16 => Ok(utf16_encode(text, u16::to_le_bytes, true, terminated)),
			TextEncoding::UTF16BE => Ok(utf16_encode(text, u16::to_be_bytes, false, terminated)),
			TextEncoding::UTF8 => {
				let mut out = text.as_bytes().to_vec();

				if terminated {
					out.push(0);
				}

				Ok(out)
			},
		}
	}
}

#[derive(Eq, PartialEq, Debug, Default)]
pub(crate) struct DecodeTextResult {
	pub(crate) content: String,
	pub(crate) bom: [u8; 2],
}

/// Specify how to decode the provided text
///
/// By default, this will:
///
/// * Use [`TextEncoding::UTF8`] as the encoding
/// * Have no byte order mark
/// * Error on invalid data
#[derive(Copy, Clone, Debug)]
pub(crate) struct TextDecodeOptions {
	pub encoding: TextEncoding,
	pub bom: [u8; 2],
	pub lossy: bool,
}

impl TextDecodeOptions {
	pub(crate) fn new() -> Self {
		Self::default()
	}

	pub(crate) fn encoding(mut self, encoding: TextEncoding) -> Self {
		self.encoding = encoding;
		self
	}

	/// The BOM to assume when a UTF-16 string doesn't carry its own
	pub(crate) fn bom(mut self, bom: [u8; 2]) -> Self {
		self.bom = bom;
		self
	}

	pub(crate) fn lossy(mut self, lossy: bool) -> Self {
		self.lossy = lossy;
		self
	}
}

impl Default for TextDecodeOptions {
	fn default() -> Self {
		Self {
			encoding: TextEncoding::UTF8,
			bom: [0, 0],
			lossy: false,
		}
	}
}

/// Decode a single (already split) text field
///
/// A UTF-16 string without a BOM falls back to `options.bom`, and then to little endian.
pub(crate) fn decode_text(raw_bytes: &[u8], options: TextDecodeOptions) -> Result<DecodeTextResult> {
	if raw_bytes.is_empty() {
		return Ok(DecodeTextResult {
			bom: options.bom,
			..DecodeTextResult::default()
		});
	}

	let mut bom = [0, 0];
	let content = match options.encoding {
		TextEncoding::Latin1 => latin1_decode(raw_bytes),
		TextEncoding::UTF16 => {
			let body;
			match raw_bytes {
				[0xFE, 0xFF, rest @ ..] | [0xFF, 0xFE, rest @ ..] => {
					bom = [raw_bytes[0], raw_bytes[1]];
					body = rest;
				},
				_ => {
					bom = options.bom;
					body = raw_bytes;
				},
			}

			match bom {
				[0xFE, 0xFF] => utf16_decode_bytes(body, u16::from_be_bytes, options.lossy)?,
				_ => utf16_decode_bytes(body, u16::from_le_bytes, options.lossy)?,
			}
		},
		TextEncoding::UTF16BE => utf16_decode_bytes(raw_bytes, u16::from_be_bytes, options.lossy)?,
		TextEncoding::UTF8 => utf8_decode(raw_bytes, options.lossy)?,
	};

	Ok(DecodeTextResult { content, bom })
}

/// Split `data` at the first null terminator of `encoding`
///
/// The terminator itself belongs to neither half. For UTF-16 encodings, only terminators
/// aligned to a code unit boundary are considered, so a null high byte followed by a
/// terminator is never cut in half.
///
/// When no terminator exists, the entire input is returned as the field with an empty remainder.
///
/// # Examples
///
/// ```rust
/// use id3_codec::id3::v2::{TextEncoding, split_on_terminator};
///
/// let (field, rest) = split_on_terminator(b"foo\0bar", TextEncoding::Latin1);
/// assert_eq!(field, b"foo");
/// assert_eq!(rest, b"bar");
///
/// // 'A' in UTF-16 LE, followed by a terminator
/// let (field, rest) = split_on_terminator(&[0x41, 0x00, 0x00, 0x00, 0x42], TextEncoding::UTF16);
/// assert_eq!(field, &[0x41, 0x00]);
/// assert_eq!(rest, &[0x42]);
///
/// let (field, rest) = split_on_terminator(b"no terminator", TextEncoding::UTF8);
/// assert_eq!(field, b"no terminator");
/// assert!(rest.is_empty());
/// ```
pub fn split_on_terminator(data: &[u8], encoding: TextEncoding) -> (&[u8], &[u8]) {
	split_terminated(data, encoding).unwrap_or((data, &[]))
}

/// Same as [`split_on_terminator`], but `None` when there is no terminator
pub(crate) fn split_terminated(data: &[u8], encoding: TextEncoding) -> Option<(&[u8], &[u8])> {
	match encoding.terminator_len() {
		1 => {
			let pos = data.iter().position(|&b| b == 0)?;
			Some((&data[..pos], &data[pos + 1..]))
		},
		_ => {
			let pos = data
				.chunks_exact(2)
				.position(|unit| unit == [0, 0])
				.map(|unit_index| unit_index * 2)?;
			Some((&data[..pos], &data[pos + 2..]))
		},
	}
}

pub(crate) fn latin1_decode(bytes: &[u8]) -> String {
	let mut text = bytes.iter().map(|c| *c as char).collect::<String>();
	trim_end_nulls(&mut text);
	text
}

pub(crate) fn latin1_encode(
	s: &str,
	lossy: bool,
) -> impl Iterator<Item = std::result::Result<u8, TextEncodingError>> {
	s.chars().enumerate().map(move |(index, c)| {
		if (c as u32) <= 255 {
			Ok(c as u8)
		} else if lossy {
			Ok(b'?')
		} else {
			Err(TextEncodingError {
				encoding: TextEncoding::Latin1,
				valid_up_to: index,
			})
		}
	})
}

pub(crate) fn utf8_decode(bytes: &[u8], lossy: bool) -> Result<String> {
	let mut text = match std::str::from_utf8(bytes) {
		Ok(text) => text.to_owned(),
		Err(_) if lossy => String::from_utf8_lossy(bytes).into_owned(),
		Err(_) => {
			return Err(Id3Error::new(ErrorKind::TextDecode(
				"Expected a UTF-8 string",
			)));
		},
	};

	trim_end_nulls(&mut text);
	Ok(text)
}

pub(crate) fn utf16_decode_bytes(
	bytes: &[u8],
	endianness: fn([u8; 2]) -> u16,
	lossy: bool,
) -> Result<String> {
	if bytes.is_empty() {
		return Ok(String::new());
	}

	if bytes.len() % 2 != 0 && !lossy {
		err!(TextDecode("UTF-16 string has an odd length"));
	}

	let unverified: Vec<u16> = bytes
		.chunks_exact(2)
		// In ID3v2, it is possible to have multiple UTF-16 strings separated by null.
		// This also makes it possible for us to encounter multiple BOMs in a single string.
		// We must filter them out.
		.filter_map(|c| match c {
			[0xFF, 0xFE] | [0xFE, 0xFF] => None,
			&[a, b] => Some(endianness([a, b])),
			_ => None,
		})
		.collect();

	let mut text = match String::from_utf16(&unverified) {
		Ok(text) => text,
		Err(_) if lossy => String::from_utf16_lossy(&unverified),
		Err(_) => err!(TextDecode("Given an invalid UTF-16 string")),
	};

	trim_end_nulls(&mut text);
	Ok(text)
}

pub(crate) fn trim_end_nulls(text: &mut String) {
	if text.ends_with('\0') {
		let new_len = text.trim_end_matches('\0').len();
		text.truncate(new_len);
	}
}

fn utf16_encode(
	text: &str,
	endianness: fn(u16) -> [u8; 2],
	bom: bool,
	terminated: bool,
) -> Vec<u8> {
	let mut encoded = Vec::<u8>::new();

	if bom {
		encoded.extend_from_slice(&endianness(0xFEFF_u16));
	}

	for ch in text.encode_utf16() {
		encoded.extend_from_slice(&endianness(ch));
	}

	if terminated {
		encoded.extend_from_slice(&[0, 0]);
	}

	encoded
}
