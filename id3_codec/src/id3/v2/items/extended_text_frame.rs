use crate::config::WriteOptions;
use crate::error::Result;
use crate::id3::v2::frame::read::ParseContext;
use crate::util::text::TextEncoding;

use byteorder::ReadBytesExt;

/// An extended `ID3v2` text frame ("TXXX")
///
/// Unlike plain text frames, these are told apart by their `description`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct UserTextFrame {
	/// The encoding of the description and its content
	pub encoding: TextEncoding,
	/// Unique content description
	pub description: String,
	/// The actual frame content
	pub content: String,
}

impl UserTextFrame {
	/// Create a new [`UserTextFrame`]
	pub fn new(
		encoding: TextEncoding,
		description: impl Into<String>,
		content: impl Into<String>,
	) -> Self {
		Self {
			encoding,
			description: description.into(),
			content: content.into(),
		}
	}

	pub(crate) fn parse(data: &[u8], ctx: &mut ParseContext<'_>) -> Result<Self> {
		let mut reader = data;

		let encoding = ctx.encoding(reader.read_u8()?)?;

		let (description, content) = ctx.split(reader, encoding)?;
		let description = ctx.decode(description, encoding, [0, 0])?;

		// The content may not carry its own BOM
		let content = ctx.decode(content, encoding, description.bom)?.content;

		Ok(Self {
			encoding,
			description: description.content,
			content,
		})
	}

	/// Convert a [`UserTextFrame`] to a byte vec
	///
	/// # Errors
	///
	/// * [`WriteOptions::lossy_text_encoding()`] is disabled and the content cannot be encoded in the specified [`TextEncoding`].
	pub fn as_bytes(&self, options: WriteOptions) -> Result<Vec<u8>> {
		let encoding = self.encoding.for_version(options.version);

		let mut bytes = vec![encoding as u8];
		bytes.extend(encoding.encode(&self.description, true, options.lossy_text_encoding)?);
		bytes.extend(encoding.encode(&self.content, false, options.lossy_text_encoding)?);

		Ok(bytes)
	}
}
