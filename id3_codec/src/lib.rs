//! Read, convert, and write ID3v1 and ID3v2 tags.
//!
//! Only the tags themselves are handled. Locating a tag within a larger file is limited to
//! the places ID3 tags are expected to live: an ID3v2 tag at the start of a stream (see
//! [`find_id3v2`](id3::find_id3v2)) and an ID3v1 tag in the last 128 bytes (see
//! [`find_id3v1`](id3::find_id3v1)).
//!
//! # Examples
//!
//! ## Reading a tag
//!
//! ```rust
//! # fn main() -> id3_codec::error::Result<()> {
//! use id3_codec::config::ParseOptions;
//! use id3_codec::diagnostic::LogSink;
//! use id3_codec::id3::v2::Id3v2Tag;
//!
//! let bytes = b"ID3\x04\x00\x00\x00\x00\x00\x0FTIT2\x00\x00\x00\x05\x00\x00\x00Song";
//!
//! let tag = Id3v2Tag::parse(&mut &bytes[..], ParseOptions::new(), &mut LogSink)?
//! 	.expect("should have found a tag");
//! assert_eq!(tag.title().as_deref(), Some("Song"));
//! # Ok(()) }
//! ```
//!
//! ## Writing a tag
//!
//! ```rust
//! # fn main() -> id3_codec::error::Result<()> {
//! use id3_codec::config::WriteOptions;
//! use id3_codec::id3::Id3Version;
//! use id3_codec::id3::v2::Id3v2Tag;
//!
//! let mut tag = Id3v2Tag::new();
//! tag.set_title("Song");
//! tag.set_track_num(Some(1), Some(12));
//!
//! // The frames are converted to the target version as they are written
//! let bytes = tag.render(WriteOptions::new().version(Id3Version::ID3_V2_3))?;
//! assert_eq!(&bytes[..4], b"ID3\x03");
//! # Ok(()) }
//! ```
//!
//! # Important notes
//!
//! ID3v2 has gone through multiple incompatible revisions. Be sure to read the
//! [`id3::v2`] module documentation for how the differences are papered over.
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

pub mod config;
pub mod date;
pub mod diagnostic;
pub mod error;
pub mod id3;
pub(crate) mod macros;
mod util;

pub use util::text::TextEncoding;
