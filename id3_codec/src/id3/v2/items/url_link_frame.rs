use crate::config::WriteOptions;
use crate::error::Result;
use crate::id3::v2::frame::read::ParseContext;
use crate::util::text::TextEncoding;

/// An `ID3v2` URL frame ("W..." excluding "WXXX")
///
/// URLs have no encoding byte, they are always Latin-1.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct UrlFrame {
	/// The URL
	pub url: String,
}

impl UrlFrame {
	/// Create a new [`UrlFrame`]
	pub fn new(url: impl Into<String>) -> Self {
		Self { url: url.into() }
	}

	pub(crate) fn parse(data: &[u8], ctx: &mut ParseContext<'_>) -> Result<Self> {
		let url = ctx.text(data, TextEncoding::Latin1)?;
		Ok(Self { url })
	}

	/// Convert a [`UrlFrame`] to a byte vec
	///
	/// # Errors
	///
	/// * [`WriteOptions::lossy_text_encoding()`] is disabled and the URL is not Latin-1
	pub fn as_bytes(&self, options: WriteOptions) -> Result<Vec<u8>> {
		Ok(TextEncoding::Latin1.encode(&self.url, false, options.lossy_text_encoding)?)
	}
}
