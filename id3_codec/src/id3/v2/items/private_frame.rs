use crate::config::WriteOptions;
use crate::error::Result;
use crate::id3::v2::frame::read::ParseContext;
use crate::util::text::TextEncoding;

/// An `ID3v2` private frame ("PRIV")
///
/// This frame is used to contain information from a software producer that
/// its program uses and does not fit into the other frames.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct PrivateFrame {
	/// A URL containing an email address, or a link to a location where an email can be found,
	/// that belongs to the organisation responsible for the frame
	pub owner: String,
	/// Binary data
	pub data: Vec<u8>,
}

impl PrivateFrame {
	/// Create a new [`PrivateFrame`]
	pub fn new(owner: impl Into<String>, data: Vec<u8>) -> Self {
		Self {
			owner: owner.into(),
			data,
		}
	}

	pub(crate) fn parse(data: &[u8], ctx: &mut ParseContext<'_>) -> Result<Self> {
		let (owner, data) = ctx.split(data, TextEncoding::Latin1)?;
		let owner = ctx.text(owner, TextEncoding::Latin1)?;

		Ok(Self {
			owner,
			data: data.to_vec(),
		})
	}

	/// Convert a [`PrivateFrame`] to a byte vec
	///
	/// # Errors
	///
	/// * [`WriteOptions::lossy_text_encoding()`] is disabled and the owner is not Latin-1
	pub fn as_bytes(&self, options: WriteOptions) -> Result<Vec<u8>> {
		let mut content =
			TextEncoding::Latin1.encode(&self.owner, true, options.lossy_text_encoding)?;
		content.extend_from_slice(&self.data);

		Ok(content)
	}
}
