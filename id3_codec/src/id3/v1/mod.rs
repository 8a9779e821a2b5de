//! ID3v1 items
//!
//! # ID3v1 notes
//!
//! An ID3v1 tag is a fixed 128 byte trailer at the end of a file. All fields are Latin-1, and
//! anything that doesn't fit is truncated when writing.
//!
//! ## Genres
//!
//! The genre is a single byte index into a list of genres, which is not resolved to a name here.
//! A value of `255` means there is no genre.
//!
//! ## ID3v1.1
//!
//! ID3v1.1 repurposes the last two bytes of the comment to store a track number. See
//! [`Id3v1Tag::version`].

mod read;
mod tag;
mod write;

pub use tag::Id3v1Tag;

/// The magic bytes at the start of every ID3v1 tag
pub const ID3V1_TAG_MARKER: [u8; 3] = *b"TAG";

/// The size of an ID3v1 tag, including the marker
pub const ID3V1_TAG_SIZE: usize = 128;
