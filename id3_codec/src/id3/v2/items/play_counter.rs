use crate::config::WriteOptions;
use crate::diagnostic::DiagnosticKind;
use crate::error::Result;
use crate::id3::v2::frame::read::ParseContext;

/// An `ID3v2` play counter frame ("PCNT")
///
/// The counter is a big endian integer of at least 4 bytes, growing as needed.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct PlayCountFrame {
	/// The number of times the file has been played
	pub count: u64,
}

impl PlayCountFrame {
	const MIN_SIZE: usize = 4;

	/// Create a new [`PlayCountFrame`]
	pub fn new(count: u64) -> Self {
		Self { count }
	}

	pub(crate) fn parse(data: &[u8], ctx: &mut ParseContext<'_>) -> Result<Self> {
		if data.len() < Self::MIN_SIZE {
			ctx.report(
				DiagnosticKind::ShortPlayCount,
				format!("Play counter is only {} bytes", data.len()),
			)?;
		}

		if data.len() > size_of::<u64>() {
			ctx.report(
				DiagnosticKind::BadFrame,
				format!("Play counter of {} bytes does not fit in 64 bits", data.len()),
			)?;
			return Ok(Self { count: u64::MAX });
		}

		let count = data
			.iter()
			.fold(0u64, |count, byte| (count << 8) | u64::from(*byte));
		Ok(Self { count })
	}

	/// Convert a [`PlayCountFrame`] to a byte vec
	///
	/// # Errors
	///
	/// This cannot fail, the `Result` is for consistency with other frames
	#[allow(clippy::unnecessary_wraps)]
	pub fn as_bytes(&self, _options: WriteOptions) -> Result<Vec<u8>> {
		let bytes = self.count.to_be_bytes();

		let significant = bytes.iter().position(|b| *b != 0).unwrap_or(bytes.len());
		let start = significant.min(bytes.len() - Self::MIN_SIZE);

		Ok(bytes[start..].to_vec())
	}
}

#[cfg(test)]
mod tests {
	use super::PlayCountFrame;
	use crate::config::{ParseOptions, WriteOptions};
	use crate::diagnostic::{Diagnostic, DiagnosticKind};
	use crate::id3::Id3Version;
	use crate::id3::v2::frame::read::ParseContext;

	#[test_log::test]
	fn minimum_width() {
		let frame = PlayCountFrame::new(5);
		assert_eq!(frame.as_bytes(WriteOptions::new()).unwrap(), [0, 0, 0, 5]);

		let frame = PlayCountFrame::new(0x01_0000_0000);
		assert_eq!(
			frame.as_bytes(WriteOptions::new()).unwrap(),
			[1, 0, 0, 0, 0]
		);
	}

	#[test_log::test]
	fn short_counter() {
		let mut sink: Vec<Diagnostic> = Vec::new();
		let mut ctx = ParseContext::new(Id3Version::ID3_V2_4, ParseOptions::new(), &mut sink);

		let frame = PlayCountFrame::parse(&[0x01, 0x00], &mut ctx).unwrap();
		assert_eq!(frame.count, 256);
		assert_eq!(sink[0].kind, DiagnosticKind::ShortPlayCount);
	}

	#[test_log::test]
	fn oversized_counter() {
		let mut sink: Vec<Diagnostic> = Vec::new();
		let mut ctx = ParseContext::new(Id3Version::ID3_V2_4, ParseOptions::new(), &mut sink);

		let frame = PlayCountFrame::parse(&[0xFF; 9], &mut ctx).unwrap();
		assert_eq!(frame.count, u64::MAX);
	}
}
