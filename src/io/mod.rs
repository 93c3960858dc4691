//! I/O utilities for file handling
//!
//! Byte-order strategies and the seekable reader abstraction used by the
//! TIFF reader and the strip/tile decoders.

pub mod seekable;
pub mod byte_order;
