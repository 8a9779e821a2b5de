use super::tag::Id3v1Tag;
use super::{ID3V1_TAG_MARKER, ID3V1_TAG_SIZE};
use crate::config::WriteOptions;
use crate::error::Result;
use crate::util::text::latin1_encode;

use std::io::Write;

use byteorder::WriteBytesExt;

const NO_GENRE: u8 = 255;

impl Id3v1Tag {
	/// Render the tag as its 128 bytes
	///
	/// Fields are truncated to fit, and the ID3v1.1 layout is used when there is a track number.
	///
	/// # Errors
	///
	/// [`WriteOptions::lossy_text_encoding()`] is disabled and a field cannot be encoded as Latin-1
	///
	/// # Examples
	///
	/// ```rust
	/// use id3_codec::config::WriteOptions;
	/// use id3_codec::id3::v1::Id3v1Tag;
	///
	/// # fn main() -> id3_codec::error::Result<()> {
	/// let tag = Id3v1Tag {
	/// 	title: Some(String::from("A title that is far too long for ID3v1")),
	/// 	track_number: Some(3),
	/// 	..Id3v1Tag::default()
	/// };
	///
	/// let bytes = tag.render(WriteOptions::new())?;
	/// assert_eq!(&bytes[3..33], b"A title that is far too long f");
	/// assert_eq!(bytes[126], 3);
	/// // No genre
	/// assert_eq!(bytes[127], 255);
	/// # Ok(()) }
	/// ```
	pub fn render(&self, options: WriteOptions) -> Result<[u8; ID3V1_TAG_SIZE]> {
		fn resize_string(value: Option<&str>, size: usize, options: WriteOptions) -> Result<Vec<u8>> {
			let mut field = Vec::with_capacity(size);

			if let Some(value) = value {
				for b in latin1_encode(value, options.lossy_text_encoding).take(size) {
					field.push(b?);
				}
			}

			field.resize(size, 0);
			Ok(field)
		}

		let mut writer = Vec::with_capacity(ID3V1_TAG_SIZE);

		writer.write_all(&ID3V1_TAG_MARKER)?;
		writer.write_all(&resize_string(self.title.as_deref(), 30, options)?)?;
		writer.write_all(&resize_string(self.artist.as_deref(), 30, options)?)?;
		writer.write_all(&resize_string(self.album.as_deref(), 30, options)?)?;

		let year = match self.year {
			Some(year) => format!("{:04}", year.min(9999)).into_bytes(),
			None => vec![0; 4],
		};
		writer.write_all(&year)?;

		match self.track_number {
			Some(track_number) => {
				writer.write_all(&resize_string(self.comment.as_deref(), 28, options)?)?;
				writer.write_u8(0)?;
				writer.write_u8(track_number)?;
			},
			None => {
				writer.write_all(&resize_string(self.comment.as_deref(), 30, options)?)?;
			},
		}

		writer.write_u8(self.genre.unwrap_or(NO_GENRE))?;

		let mut bytes = [0; ID3V1_TAG_SIZE];
		bytes.copy_from_slice(&writer);
		Ok(bytes)
	}
}

#[cfg(test)]
mod tests {
	use crate::config::{ParsingMode, WriteOptions};
	use crate::id3::v1::Id3v1Tag;

	#[test_log::test]
	fn v1_0_layout() {
		let tag = Id3v1Tag {
			comment: Some("c".repeat(40)),
			year: Some(7),
			..Id3v1Tag::default()
		};

		let bytes = tag.render(WriteOptions::new()).unwrap();
		assert_eq!(&bytes[93..97], b"0007");
		assert_eq!(&bytes[97..127], "c".repeat(30).as_bytes());
		assert_eq!(bytes[127], 255);

		let reparsed = Id3v1Tag::parse(bytes, ParsingMode::Strict).unwrap();
		assert_eq!(reparsed.comment.as_deref(), Some("c".repeat(30).as_str()));
		assert!(reparsed.track_number.is_none());
	}

	#[test_log::test]
	fn empty_tag() {
		let bytes = Id3v1Tag::new().render(WriteOptions::new()).unwrap();
		assert_eq!(&bytes[..3], b"TAG");
		assert!(bytes[3..127].iter().all(|b| *b == 0));

		let reparsed = Id3v1Tag::parse(bytes, ParsingMode::Strict).unwrap();
		assert!(reparsed.is_empty());
	}
}
