/// The parsing strictness mode
///
/// This can be set with [`ParseOptions::parsing_mode`].
///
/// # Examples
///
/// ```rust,no_run
/// use id3_codec::config::{ParseOptions, ParsingMode};
/// use id3_codec::diagnostic::LogSink;
/// use id3_codec::id3::v2::Id3v2Tag;
/// use std::fs::File;
///
/// # fn main() -> id3_codec::error::Result<()> {
/// // We only want to read spec-compliant inputs
/// let parsing_options = ParseOptions::new().parsing_mode(ParsingMode::Strict);
///
/// let mut file = File::open("foo.mp3")?;
/// let tag = Id3v2Tag::parse(&mut file, parsing_options, &mut LogSink)?;
/// # Ok(()) }
/// ```
#[derive(Copy, Clone, Debug, Ord, PartialOrd, Eq, PartialEq, Default)]
#[non_exhaustive]
pub enum ParsingMode {
	/// Will eagerly error on invalid input
	///
	/// Every recoverable problem reported as a [`Diagnostic`](crate::diagnostic::Diagnostic)
	/// is turned into an error, and the entire tag is discarded.
	///
	/// ## Examples of behavior
	///
	/// * Unable to decode text - The parser will error and the entire tag is discarded
	/// * Invalid picture type - The parser will error and the entire tag is discarded
	Strict,
	/// Default mode, less eager to error on recoverably malformed input
	///
	/// This mode will attempt to fill in any holes where possible in otherwise valid input.
	///
	/// NOTE: A readable tag does *not* necessarily make it writeable.
	///
	/// ## Examples of behavior
	///
	/// * Unable to decode text - The text is decoded lossily, and the parser moves on
	/// * Invalid picture type - The type is corrected to [`PictureType::Other`](crate::id3::v2::PictureType::Other)
	/// * Unable to decode a frame - The frame is dropped, and the parser moves on
	#[default]
	BestAttempt,
	/// Least eager to error, may produce partial output
	///
	/// This mode will discard any invalid frames, and ignore the majority of non-fatal errors.
	///
	/// ## Examples of behavior
	///
	/// * Unable to decode text - The entire frame is discarded and the parser moves on
	/// * Invalid picture type - The type is corrected to [`PictureType::Other`](crate::id3::v2::PictureType::Other)
	Relaxed,
}

/// Options to control how tags are parsed
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[non_exhaustive]
pub struct ParseOptions {
	pub(crate) parsing_mode: ParsingMode,
	pub(crate) default_language: [u8; 3],
	pub(crate) read_images: bool,
}

impl Default for ParseOptions {
	/// The default implementation for `ParseOptions`
	///
	/// The defaults are as follows:
	///
	/// ```rust,ignore
	/// ParseOptions {
	/// 	parsing_mode: ParsingMode::BestAttempt,
	/// 	default_language: *b"eng",
	/// 	read_images: true,
	/// }
	/// ```
	fn default() -> Self {
		Self::new()
	}
}

impl ParseOptions {
	/// Default parsing mode
	pub const DEFAULT_PARSING_MODE: ParsingMode = ParsingMode::BestAttempt;

	/// Default language substituted for invalid language codes
	pub const DEFAULT_LANGUAGE: [u8; 3] = *b"eng";

	/// Creates a new `ParseOptions`, alias for `Default` implementation
	///
	/// See also: [`ParseOptions::default`]
	///
	/// # Examples
	///
	/// ```rust
	/// use id3_codec::config::ParseOptions;
	///
	/// let parsing_options = ParseOptions::new();
	/// ```
	#[must_use]
	pub const fn new() -> Self {
		Self {
			parsing_mode: Self::DEFAULT_PARSING_MODE,
			default_language: Self::DEFAULT_LANGUAGE,
			read_images: true,
		}
	}

	/// The parsing mode to use, see [`ParsingMode`] for details
	///
	/// # Examples
	///
	/// ```rust
	/// use id3_codec::config::{ParseOptions, ParsingMode};
	///
	/// // By default, `parsing_mode` is ParsingMode::BestAttempt. Here, we need absolute correctness.
	/// let parsing_options = ParseOptions::new().parsing_mode(ParsingMode::Strict);
	/// ```
	pub fn parsing_mode(&mut self, parsing_mode: ParsingMode) -> Self {
		self.parsing_mode = parsing_mode;
		*self
	}

	/// The language code substituted when a frame carries an invalid one
	///
	/// Language codes must be 3 ASCII letters.
	///
	/// # Examples
	///
	/// ```rust
	/// use id3_codec::config::ParseOptions;
	///
	/// // My library is mostly German
	/// let parsing_options = ParseOptions::new().default_language(*b"deu");
	/// ```
	pub fn default_language(&mut self, default_language: [u8; 3]) -> Self {
		self.default_language = default_language;
		*self
	}

	/// Whether or not to read attached pictures ("APIC"/"PIC" frames)
	///
	/// # Examples
	///
	/// ```rust
	/// use id3_codec::config::ParseOptions;
	///
	/// // Reading cover art is expensive, and I do not need it!
	/// let parsing_options = ParseOptions::new().read_images(false);
	/// ```
	pub fn read_images(&mut self, read_images: bool) -> Self {
		self.read_images = read_images;
		*self
	}
}
