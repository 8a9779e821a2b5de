use crate::config::WriteOptions;
use crate::error::Result;

/// An `ID3v2` music CD identifier frame ("MCDI")
///
/// This holds the CD's table of contents as-is.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Default)]
pub struct MusicCdIdFrame {
	/// The binary table of contents
	pub toc: Vec<u8>,
}

impl MusicCdIdFrame {
	/// Create a new [`MusicCdIdFrame`]
	pub fn new(toc: Vec<u8>) -> Self {
		Self { toc }
	}

	pub(crate) fn parse(data: &[u8]) -> Self {
		Self { toc: data.to_vec() }
	}

	/// Convert a [`MusicCdIdFrame`] to a byte vec
	///
	/// # Errors
	///
	/// This cannot fail, the `Result` is for consistency with other frames
	#[allow(clippy::unnecessary_wraps)]
	pub fn as_bytes(&self, _options: WriteOptions) -> Result<Vec<u8>> {
		Ok(self.toc.clone())
	}
}
