use crate::config::WriteOptions;
use crate::error::Result;
use crate::id3::v2::frame::read::ParseContext;
use crate::util::text::TextEncoding;

use byteorder::ReadBytesExt;

/// An `ID3v2` text frame ("T..." excluding "TXXX")
///
/// ID3v2.4 allows for multiple values, separated by null characters. These are kept as-is in
/// `value`, see [`TextFrame::values`].
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct TextFrame {
	/// The encoding of the text
	pub encoding: TextEncoding,
	/// The text itself
	pub value: String,
}

impl TextFrame {
	/// Create a new [`TextFrame`]
	pub fn new(encoding: TextEncoding, value: impl Into<String>) -> Self {
		Self {
			encoding,
			value: value.into(),
		}
	}

	/// Iterate over the null separated values
	///
	/// # Examples
	///
	/// ```rust
	/// use id3_codec::id3::v2::TextEncoding;
	/// use id3_codec::id3::v2::items::TextFrame;
	///
	/// let frame = TextFrame::new(TextEncoding::UTF8, "Rock\0Pop");
	/// assert_eq!(frame.values().collect::<Vec<_>>(), ["Rock", "Pop"]);
	/// ```
	pub fn values(&self) -> impl Iterator<Item = &str> {
		self.value.split('\0')
	}

	pub(crate) fn parse(data: &[u8], ctx: &mut ParseContext<'_>) -> Result<Self> {
		let mut reader = data;

		let encoding = ctx.encoding(reader.read_u8()?)?;
		let value = ctx.text(reader, encoding)?;

		Ok(Self { encoding, value })
	}

	/// Convert a [`TextFrame`] to a byte vec
	///
	/// # Errors
	///
	/// * [`WriteOptions::lossy_text_encoding()`] is disabled and the content cannot be encoded in the specified [`TextEncoding`].
	pub fn as_bytes(&self, options: WriteOptions) -> Result<Vec<u8>> {
		let encoding = self.encoding.for_version(options.version);

		let mut content = encoding.encode(&self.value, false, options.lossy_text_encoding)?;
		content.insert(0, encoding as u8);
		Ok(content)
	}
}

#[cfg(test)]
mod tests {
	use super::TextFrame;
	use crate::config::{ParseOptions, WriteOptions};
	use crate::diagnostic::Diagnostic;
	use crate::id3::Id3Version;
	use crate::id3::v2::TextEncoding;
	use crate::id3::v2::frame::read::ParseContext;

	#[test_log::test]
	fn utf16_with_bom() {
		let mut sink: Vec<Diagnostic> = Vec::new();
		let mut ctx = ParseContext::new(Id3Version::ID3_V2_3, ParseOptions::new(), &mut sink);

		let frame = TextFrame::parse(&[0x01, 0xFF, 0xFE, b'H', 0, b'i', 0, 0, 0], &mut ctx).unwrap();
		assert_eq!(frame, TextFrame::new(TextEncoding::UTF16, "Hi"));
		assert!(sink.is_empty());
	}

	#[test_log::test]
	fn encoding_downgraded_for_v3() {
		let frame = TextFrame::new(TextEncoding::UTF8, "Hi");

		let v4 = frame.as_bytes(WriteOptions::new()).unwrap();
		assert_eq!(v4, [0x03, b'H', b'i']);

		let v3 = frame
			.as_bytes(WriteOptions::new().version(Id3Version::ID3_V2_3))
			.unwrap();
		assert_eq!(v3, [0x01, 0xFF, 0xFE, b'H', 0, b'i', 0]);
	}

	#[test_log::test]
	fn lossy_latin1() {
		let frame = TextFrame::new(TextEncoding::Latin1, "日本");
		assert!(frame.as_bytes(WriteOptions::new()).is_err());

		let bytes = frame
			.as_bytes(WriteOptions::new().lossy_text_encoding(true))
			.unwrap();
		assert_eq!(bytes, [0x00, b'?', b'?']);
	}
}
