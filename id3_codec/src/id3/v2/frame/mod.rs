pub(super) mod content;
pub(super) mod header;
pub(crate) mod read;
pub(super) mod registry;

use super::items::{
	CommentFrame, DateFrame, ImageFrame, LyricsFrame, MusicCdIdFrame, ObjectFrame,
	PlayCountFrame, PopularityFrame, PrivateFrame, RelativeVolumeAdjustmentFrame, TermsOfUseFrame,
	TextFrame, UniqueFileIdFrame, UrlFrame, UserTextFrame, UserUrlFrame,
};
use crate::config::WriteOptions;
use crate::error::Result;
use crate::id3::Id3Version;
use crate::util::text::TextEncoding;
use header::{FrameFlags, FrameHeader, FrameId};
use registry::FrameKind;

macro_rules! define_frames {
	(
		$(#[$meta:meta])*
		pub enum FrameContent {
			$(
				$(#[$field_meta:meta])+
				$variant:ident($type:ty) => $kind:ident,
			)*
		}
	) => {
		$(#[$meta])*
		pub enum FrameContent {
			$(
				$(#[$field_meta])+
				$variant($type),
			)*
			/// Raw frame content
			///
			/// NOTES:
			///
			/// * This is used for frames that are known but have no dedicated codec (SYLT, ETCO, etc.)
			/// * This is used for **all** frames with an ID of [`FrameId::Outdated`]
			/// * This is used for unknown frames, and encrypted frames
			Raw(Vec<u8>),
		}

		impl FrameContent {
			/// The codec used for this content
			pub fn kind(&self) -> FrameKind {
				match self {
					$(
						FrameContent::$variant(_) => FrameKind::$kind,
					)*
					FrameContent::Raw(_) => FrameKind::Raw,
				}
			}

			// Used for errors in `content::verify_frame`
			pub(crate) fn name(&self) -> &'static str {
				match self {
					$(
						FrameContent::$variant(_) => stringify!($variant),
					)*
					FrameContent::Raw(_) => "Raw",
				}
			}

			/// Encode the content, without any envelope or header
			///
			/// # Errors
			///
			/// See the `as_bytes` method of the specific content type
			pub fn as_bytes(&self, options: WriteOptions) -> Result<Vec<u8>> {
				match self {
					$(
						FrameContent::$variant(content) => content.as_bytes(options),
					)*
					FrameContent::Raw(data) => Ok(data.clone()),
				}
			}
		}

		$(
			impl From<$type> for FrameContent {
				fn from(value: $type) -> Self {
					FrameContent::$variant(value)
				}
			}
		)*
	}
}

define_frames! {
	/// The decoded content of an `ID3v2` frame
	#[non_exhaustive]
	#[derive(Clone, Debug, PartialEq, Eq, Hash)]
	pub enum FrameContent {
		/// Represents a "T..." (excluding "TXXX" and timestamps) frame
		Text(TextFrame) => Text,
		/// Represents a "TDEN", "TDOR", "TDRC", "TDRL", or "TDTG" frame
		Date(DateFrame) => Date,
		/// Represents a "TXXX" frame
		UserText(UserTextFrame) => UserText,
		/// Represents a "W..." (excluding "WXXX") frame
		Url(UrlFrame) => Url,
		/// Represents a "WXXX" frame
		UserUrl(UserUrlFrame) => UserUrl,
		/// Represents an "APIC" or "PIC" frame
		Image(ImageFrame) => Image,
		/// Represents a "GEOB" frame
		Object(ObjectFrame) => Object,
		/// Represents a "PRIV" frame
		Private(PrivateFrame) => Private,
		/// Represents a "UFID" frame
		UniqueFileId(UniqueFileIdFrame) => UniqueFileId,
		/// Represents a "PCNT" frame
		PlayCount(PlayCountFrame) => PlayCount,
		/// Represents an "MCDI" frame
		MusicCdId(MusicCdIdFrame) => MusicCdId,
		/// Represents a "COMM" frame
		Comment(CommentFrame) => Comment,
		/// Represents a "USLT" frame
		Lyrics(LyricsFrame) => Lyrics,
		/// Represents a "USER" frame
		TermsOfUse(TermsOfUseFrame) => TermsOfUse,
		/// Represents a "POPM" frame
		Popularity(PopularityFrame) => Popularity,
		/// Represents an "RVA2" frame
		RelativeVolumeAdjustment(RelativeVolumeAdjustmentFrame) => RelativeVolumeAdjustment,
	}
}

/// Represents an `ID3v2` frame
///
/// ## Outdated Frames
///
/// ### ID3v2.2
///
/// `ID3v2.2` frame IDs are 3 characters. When reading these tags, [`upgrade_v2`](crate::id3::v2::upgrade_v2) is used, which has a list of all of the common IDs
/// that have a mapping to `ID3v2.4`. Any ID that fails to be converted will be stored as [`FrameId::Outdated`], and it must be manually
/// upgraded before it can be written.
///
/// ### ID3v2.3
///
/// `ID3v2.3`, unlike `ID3v2.2`, stores frame IDs in 4 characters like `ID3v2.4`. There are some IDs that need upgrading (See [`upgrade_v3`](crate::id3::v2::upgrade_v3)),
/// which is done by [`Id3v2Tag::convert`](crate::id3::v2::Id3v2Tag::convert).
#[derive(Clone, Debug)]
pub struct Frame {
	pub(crate) header: FrameHeader,
	/// The group identifier the frame belongs to
	///
	/// All frames with the same group identifier byte belong to the same group.
	pub group_id: Option<u8>,
	/// Frame encryption method symbol
	///
	/// NOTE: Since the encryption method is unknown, encrypted frames are kept as
	/// [`FrameContent::Raw`], and cannot be decrypted or re-encrypted.
	pub encrypt_method: Option<u8>,
	pub(crate) decompressed_size: Option<u32>,
	/// The frame content
	pub content: FrameContent,
}

impl PartialEq for Frame {
	fn eq(&self, other: &Self) -> bool {
		self.header.id == other.header.id
			&& self.header.flags == other.header.flags
			&& self.group_id == other.group_id
			&& self.encrypt_method == other.encrypt_method
			&& self.content == other.content
	}
}

impl Eq for Frame {}

impl Frame {
	/// Create a new frame
	///
	/// # Errors
	///
	/// * `id` is not a valid frame ID
	/// * `content` cannot be stored under `id` (for example, a [`FrameContent::Comment`] as "TIT2")
	///
	/// # Examples
	///
	/// ```rust
	/// use id3_codec::id3::v2::items::{CommentFrame, TextFrame};
	/// use id3_codec::id3::v2::{Frame, TextEncoding};
	///
	/// # fn main() -> id3_codec::error::Result<()> {
	/// let title = Frame::new("TIT2", TextFrame::new(TextEncoding::UTF8, "Song"))?;
	/// assert_eq!(title.id_str(), "TIT2");
	///
	/// let wrong = Frame::new("TIT2", CommentFrame::new(TextEncoding::UTF8, *b"eng", "", "hi"));
	/// assert!(wrong.is_err());
	/// # Ok(()) }
	/// ```
	pub fn new(id: &str, content: impl Into<FrameContent>) -> Result<Self> {
		let id = FrameId::new(id)?;
		let content = content.into();

		content::verify_frame(&id, &content)?;

		let version = if id.is_outdated() {
			Id3Version::ID3_V2_2
		} else {
			Id3Version::ID3_V2_4
		};

		Ok(Self {
			header: FrameHeader::new(id, version)?,
			group_id: None,
			encrypt_method: None,
			decompressed_size: None,
			content,
		})
	}

	// For IDs whose content kind is already known to match
	pub(crate) fn known(id: &'static str, content: impl Into<FrameContent>) -> Self {
		Self {
			header: FrameHeader {
				id: FrameId::Valid(id.to_owned()),
				version: Id3Version::ID3_V2_4,
				data_size: 0,
				flags: FrameFlags::default(),
				reserved_flags: 0,
			},
			group_id: None,
			encrypt_method: None,
			decompressed_size: None,
			content: content.into(),
		}
	}

	/// Create a text frame, choosing the smallest encoding able to hold `value`
	///
	/// # Errors
	///
	/// * `id` is not a valid frame ID
	/// * `id` does not hold plain text (see [`FrameKind`])
	pub fn text(id: &str, value: impl Into<String>) -> Result<Self> {
		let value = value.into();
		let encoding = TextEncoding::best_for(&value);

		Self::new(id, TextFrame::new(encoding, value))
	}

	/// Get the ID of the frame
	pub fn id(&self) -> &FrameId {
		&self.header.id
	}

	/// Extract the string from the [`FrameId`]
	pub fn id_str(&self) -> &str {
		self.header.id.as_str()
	}

	/// Get the header of the frame
	///
	/// For frames that were read, this holds the version and size of the frame as it was stored.
	pub fn header(&self) -> &FrameHeader {
		&self.header
	}

	/// Get the flags for the frame
	pub fn flags(&self) -> FrameFlags {
		self.header.flags
	}

	/// Set the flags for the frame
	///
	/// NOTE: The `unsync` and `data_length_indicator` flags are decided by [`WriteOptions`] and the
	/// content when writing.
	pub fn set_flags(&mut self, flags: FrameFlags) {
		self.header.flags = flags;
	}

	/// Get the content of the frame
	pub fn content(&self) -> &FrameContent {
		&self.content
	}

	/// Get a mutable reference to the content of the frame
	pub fn content_mut(&mut self) -> &mut FrameContent {
		&mut self.content
	}

	/// Consume the frame, returning its content
	pub fn into_content(self) -> FrameContent {
		self.content
	}

	/// The size of the content before compression, or the data length indicator of an
	/// encrypted frame, as it was read
	pub fn decompressed_size(&self) -> Option<u32> {
		self.decompressed_size
	}
}

#[cfg(test)]
mod tests {
	use super::{Frame, FrameContent};
	use crate::id3::v2::items::{DateFrame, PlayCountFrame, TextFrame, UrlFrame};
	use crate::id3::v2::{FrameKind, TextEncoding};

	#[test_log::test]
	fn content_must_match_id() {
		assert!(Frame::new("TIT2", TextFrame::new(TextEncoding::UTF8, "a")).is_ok());
		assert!(Frame::new("TDRC", DateFrame::default()).is_ok());
		assert!(Frame::new("TDRC", TextFrame::new(TextEncoding::UTF8, "2024")).is_err());
		assert!(Frame::new("WOAR", UrlFrame::new("https://example.com")).is_ok());
		assert!(Frame::new("PCNT", PlayCountFrame::new(1)).is_ok());
		assert!(Frame::new("TXXX", TextFrame::new(TextEncoding::UTF8, "a")).is_err());

		// Unknown "T" and "W" frames can be text and URLs
		assert!(Frame::new("TZZZ", TextFrame::new(TextEncoding::UTF8, "a")).is_ok());
		assert!(Frame::new("WZZZ", UrlFrame::new("a")).is_ok());

		// Raw content is never checked
		assert!(Frame::new("ZZZZ", FrameContent::Raw(vec![1, 2, 3])).is_ok());
	}

	#[test_log::test]
	fn text_constructor() {
		let latin1 = Frame::text("TIT2", "Song").unwrap();
		assert_eq!(
			latin1.content,
			FrameContent::Text(TextFrame::new(TextEncoding::Latin1, "Song"))
		);

		let utf8 = Frame::text("TIT2", "曲").unwrap();
		assert_eq!(utf8.content.kind(), FrameKind::Text);
		assert_eq!(
			utf8.content,
			FrameContent::Text(TextFrame::new(TextEncoding::UTF8, "曲"))
		);
	}

	#[test_log::test]
	fn outdated_ids() {
		let frame = Frame::new("TT2", TextFrame::new(TextEncoding::Latin1, "Song")).unwrap();
		assert!(frame.id().is_outdated());
	}
}
