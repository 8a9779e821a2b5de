//! ID3v2 items and utilities
//!
//! ## Important notes
//!
//! See:
//!
//! * [`Id3v2Tag`]
//! * [`Frame`]
//! * [`FrameSet`]

mod extended_header;
mod frame;
mod frame_set;
mod header;
pub mod items;
mod restrictions;
mod tag;
pub mod util;
mod write;

// Exports

pub use crate::util::text::{TextEncoding, split_on_terminator};

pub use extended_header::ExtendedTagHeader;
pub use header::{ID3V2_FOOTER_MAGIC, ID3V2_MAGIC, TagHeader};
pub use restrictions::{
	ImageEncodingRestrictions, ImageSizeRestrictions, TagRestrictions, TagSizeRestrictions,
	TextEncodingRestrictions, TextSizeRestrictions,
};

pub use util::upgrade::{downgrade_v3, upgrade_v2, upgrade_v3};

pub use frame::header::{FlagLayout, FrameFlags, FrameHeader, FrameId};
pub use frame::registry::{FrameInfo, FrameKind, frame_info, is_date_frame};
pub use frame::{Frame, FrameContent};
pub use frame_set::FrameSet;

pub use items::PictureType;
pub use tag::Id3v2Tag;
