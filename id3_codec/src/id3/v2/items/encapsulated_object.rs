use crate::config::WriteOptions;
use crate::diagnostic::DiagnosticKind;
use crate::error::Result;
use crate::id3::v2::frame::read::ParseContext;
use crate::util::text::TextEncoding;

use byteorder::ReadBytesExt;

const FALLBACK_MIME_TYPE: &str = "application/octet-stream";

/// An `ID3v2` general encapsulated object frame ("GEOB")
///
/// Objects are told apart by their `description`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ObjectFrame {
	/// The encoding of the file name and description
	pub encoding: TextEncoding,
	/// The MIME type of the data
	pub mime_type: String,
	/// The file name
	pub file_name: String,
	/// Unique content description
	pub description: String,
	/// The object itself
	pub data: Vec<u8>,
}

impl ObjectFrame {
	pub(crate) fn parse(data: &[u8], ctx: &mut ParseContext<'_>) -> Result<Self> {
		let mut reader = data;

		let encoding = ctx.encoding(reader.read_u8()?)?;

		let (mime_type, rest) = ctx.split(reader, TextEncoding::Latin1)?;
		let mut mime_type = ctx.text(mime_type, TextEncoding::Latin1)?;
		if mime_type.is_empty() {
			ctx.report(
				DiagnosticKind::MissingMimeType,
				format!("Object has no MIME type, assuming \"{FALLBACK_MIME_TYPE}\""),
			)?;
			mime_type = String::from(FALLBACK_MIME_TYPE);
		}

		let (file_name, rest) = ctx.split(rest, encoding)?;
		let file_name = ctx.decode(file_name, encoding, [0, 0])?;

		let (description, rest) = ctx.split(rest, encoding)?;
		let description = ctx.decode(description, encoding, file_name.bom)?.content;

		Ok(Self {
			encoding,
			mime_type,
			file_name: file_name.content,
			description,
			data: rest.to_vec(),
		})
	}

	/// Convert an [`ObjectFrame`] to a byte vec
	///
	/// # Errors
	///
	/// * [`WriteOptions::lossy_text_encoding()`] is disabled and the content cannot be encoded in the specified [`TextEncoding`].
	pub fn as_bytes(&self, options: WriteOptions) -> Result<Vec<u8>> {
		let encoding = self.encoding.for_version(options.version);
		let lossy = options.lossy_text_encoding;

		let mut bytes = vec![encoding as u8];
		bytes.extend(TextEncoding::Latin1.encode(&self.mime_type, true, lossy)?);
		bytes.extend(encoding.encode(&self.file_name, true, lossy)?);
		bytes.extend(encoding.encode(&self.description, true, lossy)?);
		bytes.extend(&self.data);

		Ok(bytes)
	}
}
