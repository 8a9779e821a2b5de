//! ID3v2.4 tag restrictions
//!
//! An encoder can promise that the tag abides by a set of restrictions, stored as a single byte
//! in the extended header:
//!
//! ```text
//! %ppqrrstt
//!  ||||||++ image size
//!  |||||+-- image encoding
//!  |||++--- text fields size
//!  ||+----- text encoding
//!  ++------ tag size
//! ```
//!
//! Restrictions are only stored. Nothing is enforced when reading or writing.

macro_rules! restriction_codes {
	(
		$(#[$meta:meta])*
		$name:ident, $shift:literal, $mask:literal {
			$($(#[$variant_meta:meta])* $variant:ident = $bits:literal => $description:literal),+ $(,)?
		}
	) => {
		$(#[$meta])*
		#[derive(Default, Clone, Copy, Debug, PartialEq, Eq, Hash)]
		#[allow(non_camel_case_types)]
		pub enum $name {
			$($(#[$variant_meta])* $variant = $bits),+
		}

		impl $name {
			/// Extract the restriction from a restrictions byte
			pub fn from_byte(byte: u8) -> Self {
				match (byte >> $shift) & $mask {
					$($bits => Self::$variant,)+
					_ => Self::default(),
				}
			}

			/// The restriction's bits, positioned within a restrictions byte
			pub fn as_byte(self) -> u8 {
				(self as u8) << $shift
			}

			/// A human readable description of the restriction
			pub fn description(self) -> &'static str {
				match self {
					$(Self::$variant => $description),+
				}
			}
		}
	};
}

restriction_codes! {
	/// Restrictions on the tag size
	TagSizeRestrictions, 6, 0b11 {
		/// No more than 128 frames and 1 MB total tag size
		#[default]
		S_128F_1M = 0 => "No more than 128 frames and 1 MB total tag size",
		/// No more than 64 frames and 128 KB total tag size
		S_64F_128K = 1 => "No more than 64 frames and 128 KB total tag size",
		/// No more than 32 frames and 40 KB total tag size
		S_32F_40K = 2 => "No more than 32 frames and 40 KB total tag size",
		/// No more than 32 frames and 4 KB total tag size
		S_32F_4K = 3 => "No more than 32 frames and 4 KB total tag size",
	}
}

restriction_codes! {
	/// Restrictions on text encodings
	TextEncodingRestrictions, 5, 0b1 {
		/// No restrictions
		#[default]
		None = 0 => "No restrictions",
		/// Strings are only encoded with Latin-1 or UTF-8
		Latin1OrUtf8 = 1 => "Strings are only encoded with ISO-8859-1 or UTF-8",
	}
}

restriction_codes! {
	/// Restrictions on text field sizes
	TextSizeRestrictions, 3, 0b11 {
		/// No restrictions
		#[default]
		None = 0 => "No restrictions",
		/// No longer than 1024 characters
		C_1024 = 1 => "No string is longer than 1024 characters",
		/// No longer than 128 characters
		C_128 = 2 => "No string is longer than 128 characters",
		/// No longer than 30 characters
		C_30 = 3 => "No string is longer than 30 characters",
	}
}

restriction_codes! {
	/// Restrictions on image encodings
	ImageEncodingRestrictions, 2, 0b1 {
		/// No restrictions
		#[default]
		None = 0 => "No restrictions",
		/// Images are only PNG or JPEG
		PngOrJpeg = 1 => "Images are encoded only with PNG or JPEG",
	}
}

restriction_codes! {
	/// Restrictions on all image sizes
	ImageSizeRestrictions, 0, 0b11 {
		/// No restrictions
		#[default]
		None = 0 => "No restrictions",
		/// All images are 256x256 or smaller
		P_256 = 1 => "All images are 256x256 pixels or smaller",
		/// All images are 64x64 or smaller
		P_64 = 2 => "All images are 64x64 pixels or smaller",
		/// All images are **exactly** 64x64
		P_64_64 = 3 => "All images are exactly 64x64 pixels, unless required otherwise",
	}
}

/// Restrictions on the content of an ID3v2 tag
#[derive(Default, Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TagRestrictions {
	/// Restriction on the size of the tag. See [`TagSizeRestrictions`]
	pub size: TagSizeRestrictions,
	/// Text encoding restrictions. See [`TextEncodingRestrictions`]
	pub text_encoding: TextEncodingRestrictions,
	/// Restrictions on all text field sizes. See [`TextSizeRestrictions`]
	pub text_fields_size: TextSizeRestrictions,
	/// Image encoding restrictions. See [`ImageEncodingRestrictions`]
	pub image_encoding: ImageEncodingRestrictions,
	/// Restrictions on all image sizes. See [`ImageSizeRestrictions`]
	pub image_size: ImageSizeRestrictions,
}

impl TagRestrictions {
	/// Read a [`TagRestrictions`] from a byte
	///
	/// # Examples
	///
	/// ```rust
	/// use id3_codec::id3::v2::{TagRestrictions, TagSizeRestrictions, TextSizeRestrictions};
	///
	/// let restrictions = TagRestrictions::from_byte(0b1001_0000);
	/// assert_eq!(restrictions.size, TagSizeRestrictions::S_32F_40K);
	/// assert_eq!(restrictions.text_fields_size, TextSizeRestrictions::C_128);
	/// assert_eq!(restrictions.as_byte(), 0b1001_0000);
	/// ```
	pub fn from_byte(byte: u8) -> Self {
		Self {
			size: TagSizeRestrictions::from_byte(byte),
			text_encoding: TextEncodingRestrictions::from_byte(byte),
			text_fields_size: TextSizeRestrictions::from_byte(byte),
			image_encoding: ImageEncodingRestrictions::from_byte(byte),
			image_size: ImageSizeRestrictions::from_byte(byte),
		}
	}

	/// Convert a [`TagRestrictions`] into a `u8`
	pub fn as_byte(self) -> u8 {
		self.size.as_byte()
			| self.text_encoding.as_byte()
			| self.text_fields_size.as_byte()
			| self.image_encoding.as_byte()
			| self.image_size.as_byte()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test_log::test]
	fn every_byte_round_trips() {
		for byte in 0..=u8::MAX {
			assert_eq!(TagRestrictions::from_byte(byte).as_byte(), byte);
		}
	}

	#[test_log::test]
	fn fields_are_independent() {
		let mut restrictions = TagRestrictions::default();

		restrictions.image_size = ImageSizeRestrictions::P_64_64;
		restrictions.size = TagSizeRestrictions::S_32F_4K;
		restrictions.text_encoding = TextEncodingRestrictions::Latin1OrUtf8;
		restrictions.image_encoding = ImageEncodingRestrictions::PngOrJpeg;
		restrictions.text_fields_size = TextSizeRestrictions::C_30;

		assert_eq!(restrictions.as_byte(), 0xFF);

		let parsed = TagRestrictions::from_byte(restrictions.as_byte());
		assert_eq!(parsed, restrictions);

		restrictions.size = TagSizeRestrictions::S_128F_1M;
		assert_eq!(restrictions.as_byte(), 0x3F);
	}

	#[test_log::test]
	fn descriptions() {
		assert_eq!(
			TextSizeRestrictions::C_30.description(),
			"No string is longer than 30 characters"
		);
		assert_eq!(ImageSizeRestrictions::None.description(), "No restrictions");
	}
}
