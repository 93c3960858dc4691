//! Custom error types for TIFF processing and height encoding

use std::fmt;
use std::io;

/// Broad category of a failure, used for diagnostics and exit reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The input does not satisfy a structural requirement of the pipeline
    Precondition,
    /// A sample format, compression or predictor the encoder cannot handle
    UnsupportedFormat,
    /// A storage layout the decoder cannot handle
    UnsupportedLayout,
    /// Reading the source or writing the destination failed
    Io,
    /// A buffer could not be allocated
    ResourceExhausted,
    /// Invalid configuration value
    Config,
    /// Malformed container structure
    Format,
}

impl ErrorKind {
    /// Short label used in diagnostics
    pub fn label(&self) -> &'static str {
        match self {
            ErrorKind::Precondition => "precondition violation",
            ErrorKind::UnsupportedFormat => "unsupported format",
            ErrorKind::UnsupportedLayout => "unsupported layout",
            ErrorKind::Io => "I/O failure",
            ErrorKind::ResourceExhausted => "resource exhaustion",
            ErrorKind::Config => "configuration error",
            ErrorKind::Format => "malformed TIFF",
        }
    }
}

/// TIFF-specific error types
#[derive(Debug)]
pub enum TiffError {
    /// I/O error
    IoError(io::Error),
    /// Invalid byte order marker
    InvalidByteOrder(u16),
    /// Invalid BigTIFF header
    InvalidBigTIFFHeader,
    /// Unsupported TIFF version
    UnsupportedVersion(u16),
    /// Tag not found
    TagNotFound(u16),
    /// Unsupported field type
    UnsupportedFieldType(u16),
    /// Unsupported compression method
    UnsupportedCompression(u64),
    /// Unsupported predictor for the given sample width
    UnsupportedPredictor { predictor: u16, bits_per_sample: u16 },
    /// Sample format / bit depth combination the height encoder does not cover
    UnsupportedSampleFormat { sample_format: u16, bits_per_sample: u16 },
    /// Storage layout that cannot be decoded
    UnsupportedLayout(String),
    /// Structural requirement of the input violated
    Precondition { invariant: &'static str, found: String },
    /// Image dimensions not found
    MissingDimensions,
    /// Reading or decoding a strip or tile failed
    StripRead { strip: usize, message: String },
    /// Writing an output strip failed
    StripWrite { strip: usize, source: io::Error },
    /// Buffer allocation failed
    Allocation { what: &'static str, bytes: usize },
    /// Invalid configuration
    Config(String),
    /// Generic error with message
    GenericError(String),
}

impl TiffError {
    /// Returns the taxonomy bucket of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            TiffError::IoError(_) | TiffError::StripRead { .. } | TiffError::StripWrite { .. } => ErrorKind::Io,
            TiffError::InvalidByteOrder(_)
            | TiffError::InvalidBigTIFFHeader
            | TiffError::UnsupportedVersion(_)
            | TiffError::TagNotFound(_)
            | TiffError::UnsupportedFieldType(_)
            | TiffError::MissingDimensions
            | TiffError::GenericError(_) => ErrorKind::Format,
            TiffError::UnsupportedCompression(_)
            | TiffError::UnsupportedPredictor { .. }
            | TiffError::UnsupportedSampleFormat { .. } => ErrorKind::UnsupportedFormat,
            TiffError::UnsupportedLayout(_) => ErrorKind::UnsupportedLayout,
            TiffError::Precondition { .. } => ErrorKind::Precondition,
            TiffError::Allocation { .. } => ErrorKind::ResourceExhausted,
            TiffError::Config(_) => ErrorKind::Config,
        }
    }
}

impl fmt::Display for TiffError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TiffError::IoError(e) => write!(f, "I/O error: {}", e),
            TiffError::InvalidByteOrder(v) => write!(f, "Invalid byte order marker: {:#06x}", v),
            TiffError::InvalidBigTIFFHeader => write!(f, "Invalid BigTIFF header"),
            TiffError::UnsupportedVersion(v) => write!(f, "Unsupported TIFF version: {}", v),
            TiffError::TagNotFound(tag) => write!(f, "Tag not found: {}", tag),
            TiffError::UnsupportedFieldType(ft) => write!(f, "Unsupported field type: {}", ft),
            TiffError::UnsupportedCompression(c) => write!(f, "Unsupported compression method: {}", c),
            TiffError::UnsupportedPredictor { predictor, bits_per_sample } => write!(
                f, "Unsupported predictor {} for {}-bit samples", predictor, bits_per_sample),
            TiffError::UnsupportedSampleFormat { sample_format, bits_per_sample } => write!(
                f, "Unsupported sample format {} ({}) with {} bits per sample",
                sample_format,
                crate::utils::tiff_code_translators::sample_format_code_to_name(*sample_format as u64),
                bits_per_sample),
            TiffError::UnsupportedLayout(msg) => write!(f, "Unsupported layout: {}", msg),
            TiffError::Precondition { invariant, found } => write!(
                f, "Precondition violated: {} (found {})", invariant, found),
            TiffError::MissingDimensions => write!(f, "Image dimensions not found"),
            TiffError::StripRead { strip, message } => write!(f, "Failed to read strip {}: {}", strip, message),
            TiffError::StripWrite { strip, source } => write!(f, "Failed to write strip {}: {}", strip, source),
            TiffError::Allocation { what, bytes } => write!(f, "Cannot allocate {} bytes for {}", bytes, what),
            TiffError::Config(msg) => write!(f, "Invalid configuration: {}", msg),
            TiffError::GenericError(msg) => write!(f, "TIFF error: {}", msg),
        }
    }
}

impl std::error::Error for TiffError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TiffError::IoError(e) => Some(e),
            TiffError::StripWrite { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<io::Error> for TiffError {
    fn from(error: io::Error) -> Self {
        TiffError::IoError(error)
    }
}

impl From<String> for TiffError {
    fn from(msg: String) -> Self {
        TiffError::GenericError(msg)
    }
}

/// Result type for TIFF operations
pub type TiffResult<T> = Result<T, TiffError>;
