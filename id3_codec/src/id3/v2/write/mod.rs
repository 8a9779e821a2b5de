mod frame;

use super::header::TagHeader;
use super::util::synchsafe::unsynchronise;
use crate::config::WriteOptions;
use crate::diagnostic::LogSink;
use crate::error::{ErrorKind, Id3Error, Id3v2Error, Id3v2ErrorKind, Result};
use crate::id3::VersionFamily;
use crate::id3::v2::Id3v2Tag;

// The unsynchronisation bit of the tag flags
const UNSYNC_FLAG: u8 = 0x80;

pub(super) fn create_tag(tag: &Id3v2Tag, options: WriteOptions) -> Result<Vec<u8>> {
	let version = options.version;
	let family = version.family();
	if !matches!(family, VersionFamily::V2_3 | VersionFamily::V2_4) {
		return Err(Id3v2Error::new(Id3v2ErrorKind::UnwritableVersion(version)).into());
	}

	// We are stripping the tag
	if tag.is_empty() {
		log::debug!("Tag is empty, nothing to write");
		return Ok(Vec::new());
	}

	log::debug!("Writing ID3v2 tag as {version}");

	let mut tag = tag.clone();
	tag.convert_with(version, &mut LogSink)?;

	let mut frame_data = tag.frames.render(options)?;

	// https://mutagen-specs.readthedocs.io/en/latest/id3/id3v2.4.0-structure.html#padding:
	//
	// "[A tag] MUST NOT have any padding when a tag footer is added to the tag"
	let footer = options.footer && family == VersionFamily::V2_4;
	if options.footer && !footer {
		log::warn!("Footers are only supported in ID3v2.4, skipping");
	}

	let padding_len = if footer {
		log::trace!("Footer requested, not padding tag");
		0
	} else {
		options.preferred_padding.unwrap_or(0)
	};

	// The CRC covers the frames before unsynchronisation
	let extended_header = match &tag.extended_header {
		Some(extended_header) => extended_header.render(version, &frame_data, padding_len)?,
		None => Vec::new(),
	};

	// ID3v2.4 frames were unsynchronised individually
	if options.unsynchronisation && family == VersionFamily::V2_3 {
		log::trace!("Unsynchronising tag content");
		frame_data = unsynchronise(&frame_data);
	}

	let mut header = TagHeader::new(version)?;
	header.extended = !extended_header.is_empty();
	header.experimental = tag.header.experimental;
	header.footer = footer;

	let tag_size = u32::try_from(extended_header.len() + frame_data.len())
		.ok()
		.and_then(|size| size.checked_add(padding_len))
		.ok_or_else(|| Id3Error::new(ErrorKind::TooMuchData))?;

	let mut header_bytes = header.render(tag_size)?;
	if options.unsynchronisation {
		// Only set in the output, the frames are already unsynchronised
		header_bytes[5] |= UNSYNC_FLAG;
	}

	let mut id3v2 = Vec::with_capacity(
		TagHeader::SIZE as usize * 2 + tag_size as usize,
	);
	id3v2.extend(header_bytes);
	id3v2.extend(extended_header);
	id3v2.extend(frame_data);

	if padding_len > 0 {
		log::trace!("Padding tag with {padding_len} bytes");
		id3v2.resize(id3v2.len() + padding_len as usize, 0);
	}

	if footer {
		let mut footer_bytes = header.render_footer(tag_size)?;
		footer_bytes[5] = header_bytes[5];
		id3v2.extend(footer_bytes);
	}

	Ok(id3v2)
}
