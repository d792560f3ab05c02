//! Variable storage layouts.
//!
//! A [`StorageLayout`] describes how the data of a variable is physically stored: chunking, compression, fill, byte order, and checksum.
//! A [`LayoutUpdate`] is a partial change to a layout.

use std::str::FromStr;

use derive_more::Display;
use ncarray_data_type::FillValue;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// An unrecognised storage layout mode name.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("unknown {kind} `{name}`")]
pub struct ParseModeError {
    kind: &'static str,
    name: String,
}

impl ParseModeError {
    fn new(kind: &'static str, name: &str) -> Self {
        Self {
            kind,
            name: name.to_string(),
        }
    }
}

macro_rules! impl_mode_from_str {
    ($mode:ty, $kind:literal, $($name:literal => $variant:expr),+ $(,)?) => {
        impl FromStr for $mode {
            type Err = ParseModeError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($name => Ok($variant),)+
                    _ => Err(ParseModeError::new($kind, s)),
                }
            }
        }
    };
}

/// The chunking mode of a variable.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChunkMode {
    /// The variable is stored in one contiguous block.
    #[display("contiguous")]
    Contiguous,
    /// The variable is stored in fixed-size chunks.
    #[display("chunked")]
    Chunked,
}

impl_mode_from_str!(ChunkMode, "chunk mode", "contiguous" => ChunkMode::Contiguous, "chunked" => ChunkMode::Chunked);

/// The fill mode of a variable.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FillMode {
    /// Unwritten elements read as the fill value.
    #[display("fill")]
    Fill,
    /// Unwritten elements are undefined.
    #[display("nofill")]
    NoFill,
}

impl_mode_from_str!(FillMode, "fill mode", "fill" => FillMode::Fill, "nofill" => FillMode::NoFill);

/// The byte order of stored elements.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Endianness {
    /// The byte order of the host.
    #[display("native")]
    Native,
    /// Little endian.
    #[display("little")]
    Little,
    /// Big endian.
    #[display("big")]
    Big,
}

impl_mode_from_str!(Endianness, "endianness", "native" => Endianness::Native, "little" => Endianness::Little, "big" => Endianness::Big);

impl Endianness {
    /// Returns true if elements stored with this byte order must be byte swapped to and from the host byte order.
    #[must_use]
    pub fn swaps(self) -> bool {
        match self {
            Self::Native => false,
            Self::Little => cfg!(target_endian = "big"),
            Self::Big => cfg!(target_endian = "little"),
        }
    }
}

/// The checksum mode of a variable.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChecksumMode {
    /// No checksum.
    #[display("none")]
    None,
    /// A fletcher32 checksum is stored with every chunk.
    #[display("fletcher32")]
    Fletcher32,
}

impl_mode_from_str!(ChecksumMode, "checksum mode", "none" => ChecksumMode::None, "fletcher32" => ChecksumMode::Fletcher32);

/// The highest deflate level.
pub const DEFLATE_LEVEL_MAX: u32 = 9;

/// The storage layout of a variable.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StorageLayout {
    /// The chunking mode.
    pub chunk_mode: ChunkMode,
    /// The chunk sizes, one per dimension. [`None`] if the variable is contiguous.
    pub chunk_sizes: Option<Vec<u64>>,
    /// Whether the shuffle filter is enabled.
    pub shuffle: bool,
    /// Whether the deflate filter is enabled.
    pub deflate: bool,
    /// The deflate level, `0..=9`.
    pub deflate_level: u32,
    /// The fill mode.
    pub fill_mode: FillMode,
    /// The fill value, a single element of the variable element type.
    pub fill_value: FillValue,
    /// The byte order of stored elements.
    pub endianness: Endianness,
    /// The checksum mode.
    pub checksum: ChecksumMode,
}

impl StorageLayout {
    /// Create a contiguous layout with no filters and the given fill value.
    #[must_use]
    pub fn new(fill_value: FillValue) -> Self {
        Self {
            chunk_mode: ChunkMode::Contiguous,
            chunk_sizes: None,
            shuffle: false,
            deflate: false,
            deflate_level: 0,
            fill_mode: FillMode::Fill,
            fill_value,
            endianness: Endianness::Native,
            checksum: ChecksumMode::None,
        }
    }

    /// Returns true if any filter (shuffle, deflate, or fletcher32) is enabled.
    #[must_use]
    pub fn has_filters(&self) -> bool {
        self.shuffle || self.deflate || self.checksum == ChecksumMode::Fletcher32
    }
}

/// A partial update to a [`StorageLayout`].
///
/// Only fields that are [`Some`] are changed.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[allow(missing_docs)]
pub struct LayoutUpdate {
    pub chunk_mode: Option<ChunkMode>,
    pub chunk_sizes: Option<Vec<u64>>,
    pub shuffle: Option<bool>,
    pub deflate: Option<bool>,
    pub deflate_level: Option<u32>,
    pub fill_mode: Option<FillMode>,
    pub fill_value: Option<FillValue>,
    pub endianness: Option<Endianness>,
    pub checksum: Option<ChecksumMode>,
}

impl LayoutUpdate {
    /// Returns true if the update changes nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    /// Set the chunk mode.
    #[must_use]
    pub fn with_chunk_mode(mut self, chunk_mode: ChunkMode) -> Self {
        self.chunk_mode = Some(chunk_mode);
        self
    }

    /// Set the chunk sizes.
    #[must_use]
    pub fn with_chunk_sizes(mut self, chunk_sizes: Vec<u64>) -> Self {
        self.chunk_sizes = Some(chunk_sizes);
        self
    }

    /// Enable or disable the shuffle filter.
    #[must_use]
    pub fn with_shuffle(mut self, shuffle: bool) -> Self {
        self.shuffle = Some(shuffle);
        self
    }

    /// Enable or disable the deflate filter.
    #[must_use]
    pub fn with_deflate(mut self, deflate: bool) -> Self {
        self.deflate = Some(deflate);
        self
    }

    /// Set the deflate level.
    #[must_use]
    pub fn with_deflate_level(mut self, deflate_level: u32) -> Self {
        self.deflate_level = Some(deflate_level);
        self
    }

    /// Set the fill mode.
    #[must_use]
    pub fn with_fill_mode(mut self, fill_mode: FillMode) -> Self {
        self.fill_mode = Some(fill_mode);
        self
    }

    /// Set the fill value.
    #[must_use]
    pub fn with_fill_value(mut self, fill_value: FillValue) -> Self {
        self.fill_value = Some(fill_value);
        self
    }

    /// Set the byte order.
    #[must_use]
    pub fn with_endianness(mut self, endianness: Endianness) -> Self {
        self.endianness = Some(endianness);
        self
    }

    /// Set the checksum mode.
    #[must_use]
    pub fn with_checksum(mut self, checksum: ChecksumMode) -> Self {
        self.checksum = Some(checksum);
        self
    }
}
