//! Seekable reader trait
//!
//! Source rasters are parsed through a trait object so the same reader code
//! serves buffered files on disk and in-memory cursors in tests.

use std::io::{Read, Seek};

/// Trait for readers that can both read and seek
pub trait SeekableReader: Read + Seek + Send + Sync {}

// Blanket implementation for any type that implements the required traits
impl<T: Read + Seek + Send + Sync> SeekableReader for T {}
