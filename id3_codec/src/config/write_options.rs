use crate::id3::Id3Version;

/// Options to control how tags are written
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[non_exhaustive]
pub struct WriteOptions {
	pub(crate) version: Id3Version,
	pub(crate) preferred_padding: Option<u32>,
	pub(crate) unsynchronisation: bool,
	pub(crate) lossy_text_encoding: bool,
	pub(crate) footer: bool,
}

impl WriteOptions {
	/// Default preferred padding size in bytes
	pub const DEFAULT_PREFERRED_PADDING: u32 = 1024;

	/// Creates a new `WriteOptions`, alias for `Default` implementation
	///
	/// See also: [`WriteOptions::default`]
	///
	/// # Examples
	///
	/// ```rust
	/// use id3_codec::config::WriteOptions;
	///
	/// let write_options = WriteOptions::new();
	/// ```
	pub const fn new() -> Self {
		Self {
			version: Id3Version::ID3_V2_4,
			preferred_padding: Some(Self::DEFAULT_PREFERRED_PADDING),
			unsynchronisation: false,
			lossy_text_encoding: false,
			footer: false,
		}
	}

	/// The version to write the tag as
	///
	/// Only ID3v2.3 and ID3v2.4 tags can be written. Frames are converted to fit the target
	/// version when rendered, see [`Id3v2Tag::convert`](crate::id3::v2::Id3v2Tag::convert)
	/// for a lossless upfront conversion.
	///
	/// # Examples
	///
	/// ```rust
	/// use id3_codec::config::WriteOptions;
	/// use id3_codec::id3::Id3Version;
	///
	/// // My old car stereo only understands ID3v2.3
	/// let options = WriteOptions::new().version(Id3Version::ID3_V2_3);
	/// ```
	pub fn version(mut self, version: Id3Version) -> Self {
		self.version = version;
		self
	}

	/// Set the preferred padding size in bytes
	///
	/// NOTES:
	///
	/// * No padding is written when [`WriteOptions::footer`] is enabled
	///
	/// # Examples
	///
	/// ```rust
	/// use id3_codec::config::WriteOptions;
	///
	/// // I really don't want my files rewritten, so I'll double the padding size!
	/// let options = WriteOptions::new().preferred_padding(2048);
	///
	/// // ...Or I don't want padding under any circumstances!
	/// let options = WriteOptions::new().preferred_padding(0);
	/// ```
	pub fn preferred_padding(mut self, preferred_padding: u32) -> Self {
		match preferred_padding {
			0 => self.preferred_padding = None,
			_ => self.preferred_padding = Some(preferred_padding),
		}
		self
	}

	/// Whether to unsynchronise the written tag
	///
	/// For ID3v2.3, the entire frame region is unsynchronised. For ID3v2.4, every frame is
	/// unsynchronised individually.
	///
	/// This is only necessary for software that is not ID3v2 aware, and will mistake tag
	/// bytes for MPEG frame sync.
	///
	/// # Examples
	///
	/// ```rust
	/// use id3_codec::config::WriteOptions;
	///
	/// let options = WriteOptions::new().unsynchronisation(true);
	/// ```
	pub fn unsynchronisation(mut self, unsynchronisation: bool) -> Self {
		self.unsynchronisation = unsynchronisation;
		self
	}

	/// Whether to replace characters that cannot be encoded with '?'
	///
	/// This only applies to Latin-1 text. When disabled, writing text that cannot be encoded
	/// will error.
	///
	/// # Examples
	///
	/// ```rust
	/// use id3_codec::config::WriteOptions;
	///
	/// let options = WriteOptions::new().lossy_text_encoding(true);
	/// ```
	pub fn lossy_text_encoding(mut self, lossy_text_encoding: bool) -> Self {
		self.lossy_text_encoding = lossy_text_encoding;
		self
	}

	/// Whether to append a footer to the tag
	///
	/// This is only available in ID3v2.4, and is ignored for earlier versions.
	///
	/// # Examples
	///
	/// ```rust
	/// use id3_codec::config::WriteOptions;
	///
	/// let options = WriteOptions::new().footer(true);
	/// ```
	pub fn footer(mut self, footer: bool) -> Self {
		self.footer = footer;
		self
	}
}

impl Default for WriteOptions {
	/// The default implementation for `WriteOptions`
	///
	/// The defaults are as follows:
	///
	/// ```rust,ignore
	/// WriteOptions {
	///     version: Id3Version::ID3_V2_4,
	///     preferred_padding: 1024,
	///     unsynchronisation: false,
	///     lossy_text_encoding: false,
	///     footer: false,
	/// }
	/// ```
	fn default() -> Self {
		Self::new()
	}
}
