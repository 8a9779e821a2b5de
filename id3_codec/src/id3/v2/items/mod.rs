//! Typed frame contents
//!
//! Each type here holds the decoded payload of a frame. The frame ID, flags and envelope live
//! in the surrounding [`Frame`](crate::id3::v2::Frame).

mod attached_picture_frame;
mod encapsulated_object;
mod extended_text_frame;
mod extended_url_frame;
mod language_frame;
mod music_cd_identifier;
mod play_counter;
mod popularimeter;
mod private_frame;
mod relative_volume_adjustment_frame;
mod text_information_frame;
mod timestamp_frame;
mod unique_file_identifier;
mod url_link_frame;

pub use attached_picture_frame::{ImageFrame, ImageSource, PictureType};
pub use encapsulated_object::ObjectFrame;
pub use extended_text_frame::UserTextFrame;
pub use extended_url_frame::UserUrlFrame;
pub use language_frame::{CommentFrame, LyricsFrame, TermsOfUseFrame};
pub use music_cd_identifier::MusicCdIdFrame;
pub use play_counter::PlayCountFrame;
pub use popularimeter::PopularityFrame;
pub use private_frame::PrivateFrame;
pub use relative_volume_adjustment_frame::{
	ChannelInformation, ChannelType, RelativeVolumeAdjustmentFrame,
};
pub use text_information_frame::TextFrame;
pub use timestamp_frame::DateFrame;
pub use unique_file_identifier::UniqueFileIdFrame;
pub use url_link_frame::UrlFrame;
