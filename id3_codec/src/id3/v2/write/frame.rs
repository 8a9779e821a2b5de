use crate::config::WriteOptions;
use crate::error::{ErrorKind, Id3Error, Result};
use crate::id3::VersionFamily;
use crate::id3::v2::frame::content::verify_frame;
use crate::id3::v2::util::synchsafe::{SynchsafeInteger, unsynchronise};
use crate::id3::v2::{FlagLayout, Frame, FrameContent, FrameHeader};
use crate::macros::{err, id3v2_err};

impl Frame {
	/// Render the frame, including its header, for `options.version`
	///
	/// The envelope is written in version order, the content is compressed if the `compressed`
	/// flag is set, and for ID3v2.4 the content is unsynchronised when
	/// [`WriteOptions::unsynchronisation`] is enabled.
	pub(crate) fn render(&self, options: WriteOptions) -> Result<Vec<u8>> {
		let family = options.version.family();
		if !matches!(family, VersionFamily::V2_3 | VersionFamily::V2_4) {
			err!(Unsupported("Only ID3v2.3 and ID3v2.4 frames can be written"));
		}

		verify_frame(&self.header.id, &self.content)?;

		let mut header = FrameHeader::new(self.header.id.clone(), options.version)?;
		header.flags = self.header.flags;
		header.flags.grouped = self.group_id.is_some();
		header.flags.encrypted = self.encrypt_method.is_some();
		header.flags.unsync = false;

		let (mut body, decompressed_size) = if header.flags.encrypted {
			// Already encrypted (and possibly compressed) as it was read
			let FrameContent::Raw(data) = &self.content else {
				err!(Unsupported("Encrypting frames is not supported"));
			};

			if (header.flags.compressed || family == VersionFamily::V2_4)
				&& self.decompressed_size.is_none()
			{
				id3v2_err!(MissingDataLengthIndicator);
			}

			(data.clone(), self.decompressed_size)
		} else {
			let content = self.content.as_bytes(options)?;
			if header.flags.compressed {
				let size = u32::try_from(content.len())
					.map_err(|_| Id3Error::new(ErrorKind::TooMuchData))?;
				(compress(&content)?, Some(size))
			} else {
				(content, None)
			}
		};

		let mut prefix = Vec::with_capacity(6);
		let mut unsync = false;

		match family {
			VersionFamily::V2_3 => {
				header.flags.data_length_indicator = false;

				if header.flags.compressed {
					if let Some(size) = decompressed_size {
						prefix.extend_from_slice(&size.to_be_bytes());
					}
				}

				if let Some(method) = self.encrypt_method {
					prefix.push(method);
				}

				if let Some(group) = self.group_id {
					prefix.push(group);
				}
			},
			_ => {
				let data_length = match decompressed_size {
					Some(size) => size,
					None => {
						u32::try_from(body.len()).map_err(|_| Id3Error::new(ErrorKind::TooMuchData))?
					},
				};

				if options.unsynchronisation {
					log::trace!("Unsynchronising frame \"{}\"", header.id);
					body = unsynchronise(&body);
					unsync = true;
				}

				header.flags.data_length_indicator = header.flags.data_length_indicator
					|| header.flags.compressed
					|| header.flags.encrypted
					|| unsync;

				if let Some(group) = self.group_id {
					prefix.push(group);
				}

				if let Some(method) = self.encrypt_method {
					prefix.push(method);
				}

				if header.flags.data_length_indicator {
					prefix.extend_from_slice(&data_length.synch()?.to_be_bytes());
				}
			},
		}

		let data_size = u32::try_from(prefix.len() + body.len())
			.map_err(|_| Id3Error::new(ErrorKind::TooMuchData))?;

		let mut bytes = header.render(data_size)?;
		if unsync {
			// Only set in the output, the content is already unsynchronised
			let mask = FlagLayout::mask(FlagLayout::for_version(family).unsync).to_be_bytes();
			bytes[8] |= mask[0];
			bytes[9] |= mask[1];
		}

		bytes.reserve(data_size as usize);
		bytes.extend(prefix);
		bytes.extend(body);

		Ok(bytes)
	}
}

#[cfg(feature = "id3v2_compression_support")]
fn compress(content: &[u8]) -> Result<Vec<u8>> {
	use std::io::Write as _;

	log::trace!("Compressing frame content");

	let mut encoder = flate2::write::ZlibEncoder::new(Vec::new(), flate2::Compression::default());
	encoder.write_all(content)?;
	Ok(encoder.finish()?)
}

#[cfg(not(feature = "id3v2_compression_support"))]
fn compress(_: &[u8]) -> Result<Vec<u8>> {
	id3v2_err!(CompressedFrameEncountered);
}
