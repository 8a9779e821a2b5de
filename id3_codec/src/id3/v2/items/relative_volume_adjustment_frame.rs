use crate::config::WriteOptions;
use crate::diagnostic::DiagnosticKind;
use crate::error::{Id3v2Error, Id3v2ErrorKind, Result};
use crate::id3::v2::frame::read::ParseContext;
use crate::id3::v2::util::bits::{MIN_INT16, bytes_to_signed_int16, signed_int16_to_bytes};
use crate::macros::err;
use crate::util::text::TextEncoding;

use std::io::Read;

use byteorder::ReadBytesExt;

/// A channel identifier used in the RVA2 frame
#[repr(u8)]
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Debug, Hash)]
#[allow(missing_docs)]
pub enum ChannelType {
	Other = 0,
	MasterVolume = 1,
	FrontRight = 2,
	FrontLeft = 3,
	BackRight = 4,
	BackLeft = 5,
	FrontCentre = 6,
	BackCentre = 7,
	Subwoofer = 8,
}

impl ChannelType {
	/// Get a [`ChannelType`] from a `u8`
	///
	/// # Examples
	///
	/// ```rust
	/// use id3_codec::id3::v2::items::ChannelType;
	///
	/// let valid_byte = 1;
	/// assert_eq!(
	/// 	ChannelType::from_u8(valid_byte),
	/// 	Some(ChannelType::MasterVolume)
	/// );
	///
	/// // The valid range is 0..=8
	/// let invalid_byte = 10;
	/// assert_eq!(ChannelType::from_u8(invalid_byte), None);
	/// ```
	pub fn from_u8(byte: u8) -> Option<Self> {
		match byte {
			0 => Some(Self::Other),
			1 => Some(Self::MasterVolume),
			2 => Some(Self::FrontRight),
			3 => Some(Self::FrontLeft),
			4 => Some(Self::BackRight),
			5 => Some(Self::BackLeft),
			6 => Some(Self::FrontCentre),
			7 => Some(Self::BackCentre),
			8 => Some(Self::Subwoofer),
			_ => None,
		}
	}
}

/// Volume adjustment information for a specific channel
///
/// This is used in the RVA2 frame through [`RelativeVolumeAdjustmentFrame`]
#[derive(Clone, Eq, PartialEq, Debug, Hash)]
pub struct ChannelInformation {
	/// The type of channel this describes
	pub channel_type: ChannelType,
	/// A fixed point decibel value representing (adjustment*512), giving +/- 64 dB with a precision of 0.001953125 dB.
	pub volume_adjustment: i16,
	/// The number of bits the peak volume field occupies, with 0 meaning there is no peak volume.
	pub bits_representing_peak: u8,
	/// An optional peak volume, `(bits_representing_peak + 7) / 8` bytes long
	pub peak_volume: Option<Vec<u8>>,
}

impl ChannelInformation {
	fn peak_len(bits_representing_peak: u8) -> usize {
		(usize::from(bits_representing_peak) + 7) >> 3
	}
}

/// An `ID3v2.4` relative volume adjustment frame ("RVA2")
///
/// Channels are kept in the order they were read.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct RelativeVolumeAdjustmentFrame {
	/// The identifier used to identify the situation and/or device where this adjustment should apply
	pub identification: String,
	/// The information for each channel described in the frame
	pub channels: Vec<ChannelInformation>,
}

impl RelativeVolumeAdjustmentFrame {
	/// Create a new [`RelativeVolumeAdjustmentFrame`]
	pub fn new(identification: impl Into<String>, channels: Vec<ChannelInformation>) -> Self {
		Self {
			identification: identification.into(),
			channels,
		}
	}

	/// Get the adjustment for a channel
	pub fn channel(&self, channel_type: ChannelType) -> Option<&ChannelInformation> {
		self.channels
			.iter()
			.find(|channel| channel.channel_type == channel_type)
	}

	pub(crate) fn parse(data: &[u8], ctx: &mut ParseContext<'_>) -> Result<Self> {
		let (identification, mut reader) = ctx.split(data, TextEncoding::Latin1)?;
		let identification = ctx.text(identification, TextEncoding::Latin1)?;

		let mut channels = Vec::new();
		while let Ok(channel_type_byte) = reader.read_u8() {
			let channel_type = match ChannelType::from_u8(channel_type_byte) {
				Some(channel_type) => channel_type,
				None => {
					ctx.report(
						DiagnosticKind::BadFrame,
						format!("Unknown channel type {channel_type_byte}, using `Other`"),
					)?;
					ChannelType::Other
				},
			};

			let mut adjustment = [0; 2];
			reader.read_exact(&mut adjustment)?;
			let volume_adjustment = match bytes_to_signed_int16(&adjustment) {
				Ok(volume_adjustment) => volume_adjustment,
				Err(_) => {
					ctx.report(
						DiagnosticKind::BadFrame,
						format!(
							"Volume adjustment {adjustment:02X?} is out of range, using {MIN_INT16}"
						),
					)?;
					i16::MIN + 1
				},
			};

			let bits_representing_peak = reader.read_u8()?;

			let mut peak_volume = None;
			if bits_representing_peak > 0 {
				let mut peak_volume_bytes =
					vec![0; ChannelInformation::peak_len(bits_representing_peak)];
				reader.read_exact(&mut peak_volume_bytes)?;
				peak_volume = Some(peak_volume_bytes);
			}

			channels.push(ChannelInformation {
				channel_type,
				volume_adjustment,
				bits_representing_peak,
				peak_volume,
			});
		}

		Ok(Self {
			identification,
			channels,
		})
	}

	/// Convert a [`RelativeVolumeAdjustmentFrame`] to a byte vec
	///
	/// # Errors
	///
	/// * A volume adjustment is outside of the signed 16-bit range (`-32767..32768`)
	/// * A peak volume does not match its `bits_representing_peak`
	/// * [`WriteOptions::lossy_text_encoding()`] is disabled and the identifier cannot be Latin-1 encoded.
	pub fn as_bytes(&self, options: WriteOptions) -> Result<Vec<u8>> {
		let mut content = TextEncoding::Latin1.encode(
			&self.identification,
			true,
			options.lossy_text_encoding,
		)?;

		for info in &self.channels {
			let adjustment = i32::from(info.volume_adjustment);
			let Ok(adjustment_bytes) = signed_int16_to_bytes(adjustment) else {
				return Err(Id3v2Error::new(Id3v2ErrorKind::BadVolumeAdjustment(adjustment)).into());
			};

			content.push(info.channel_type as u8);
			content.extend(adjustment_bytes);

			match &info.peak_volume {
				// Easiest path, no peak
				None => content.push(0),
				Some(peak)
					if peak.len() == ChannelInformation::peak_len(info.bits_representing_peak)
						&& info.bits_representing_peak > 0 =>
				{
					content.push(info.bits_representing_peak);
					content.extend(peak);
				},
				Some(_) => err!(InvalidArgument(
					"Peak volume length does not match the bits representing it"
				)),
			}
		}

		Ok(content)
	}
}
