use crate::config::WriteOptions;
use crate::error::Result;
use crate::id3::v2::frame::read::ParseContext;
use crate::util::text::TextEncoding;

use byteorder::ReadBytesExt;

/// An extended `ID3v2` URL frame ("WXXX")
///
/// The encoding only applies to the description. The URL itself is always Latin-1.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct UserUrlFrame {
	/// The encoding of the description
	pub encoding: TextEncoding,
	/// Unique content description
	pub description: String,
	/// The URL
	pub url: String,
}

impl UserUrlFrame {
	/// Create a new [`UserUrlFrame`]
	pub fn new(encoding: TextEncoding, description: impl Into<String>, url: impl Into<String>) -> Self {
		Self {
			encoding,
			description: description.into(),
			url: url.into(),
		}
	}

	pub(crate) fn parse(data: &[u8], ctx: &mut ParseContext<'_>) -> Result<Self> {
		let mut reader = data;

		let encoding = ctx.encoding(reader.read_u8()?)?;

		let (description, url) = ctx.split(reader, encoding)?;
		let description = ctx.text(description, encoding)?;
		let url = ctx.text(url, TextEncoding::Latin1)?;

		Ok(Self {
			encoding,
			description,
			url,
		})
	}

	/// Convert a [`UserUrlFrame`] to a byte vec
	///
	/// # Errors
	///
	/// * [`WriteOptions::lossy_text_encoding()`] is disabled and the content cannot be encoded in the specified [`TextEncoding`].
	pub fn as_bytes(&self, options: WriteOptions) -> Result<Vec<u8>> {
		let encoding = self.encoding.for_version(options.version);

		let mut bytes = vec![encoding as u8];
		bytes.extend(encoding.encode(&self.description, true, options.lossy_text_encoding)?);
		bytes.extend(TextEncoding::Latin1.encode(&self.url, false, options.lossy_text_encoding)?);

		Ok(bytes)
	}
}
