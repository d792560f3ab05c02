//! The chunk encoding pipeline of the memory store.
//!
//! Chunks are encoded by byte order, then shuffle, then deflate, then fletcher32, and decoded in reverse.

use std::io::{Cursor, Read};

use crate::storage_error::codes;
use crate::{ChecksumMode, StorageError, StorageLayout};

/// The size of a fletcher32 checksum.
const CHECKSUM_SIZE: usize = size_of::<u32>();

/// Encodes and decodes the chunks of one variable.
#[derive(Debug, Clone)]
pub(super) struct ChunkCodec {
    element_size: usize,
    swap: bool,
    shuffle: bool,
    deflate: Option<flate2::Compression>,
    fletcher32: bool,
    validate_checksums: bool,
}

impl ChunkCodec {
    pub(super) fn new(layout: &StorageLayout, element_size: usize, validate_checksums: bool) -> Self {
        Self {
            element_size,
            swap: layout.endianness.swaps(),
            shuffle: layout.shuffle,
            deflate: layout
                .deflate
                .then(|| flate2::Compression::new(layout.deflate_level)),
            fletcher32: layout.checksum == ChecksumMode::Fletcher32,
            validate_checksums,
        }
    }

    pub(super) fn encode(&self, decoded: &[u8]) -> Result<Vec<u8>, StorageError> {
        let mut encoded = decoded.to_vec();
        if self.swap {
            byte_swap(&mut encoded, self.element_size);
        }
        if self.shuffle {
            encoded = shuffle(&encoded, self.element_size);
        }
        if let Some(compression) = self.deflate {
            let mut encoder = flate2::read::ZlibEncoder::new(Cursor::new(encoded), compression);
            let mut out: Vec<u8> = Vec::new();
            encoder.read_to_end(&mut out)?;
            encoded = out;
        }
        if self.fletcher32 {
            let checksum = fletcher32(&encoded).to_le_bytes();
            encoded.extend_from_slice(&checksum);
        }
        Ok(encoded)
    }

    pub(super) fn decode(&self, encoded: &[u8]) -> Result<Vec<u8>, StorageError> {
        let mut data = encoded;
        if self.fletcher32 {
            if data.len() < CHECKSUM_SIZE {
                return Err(StorageError::new(
                    codes::NC_EHDFERR,
                    "NetCDF: HDF error: chunk is too short to hold a checksum",
                ));
            }
            let (payload, checksum_stored) = data.split_at(data.len() - CHECKSUM_SIZE);
            if self.validate_checksums && fletcher32(payload).to_le_bytes() != checksum_stored {
                return Err(StorageError::new(
                    codes::NC_EHDFERR,
                    "NetCDF: HDF error: fletcher32 checksum mismatch",
                ));
            }
            data = payload;
        }
        let mut decoded = if self.deflate.is_some() {
            let mut decoder = flate2::read::ZlibDecoder::new(Cursor::new(data));
            let mut out: Vec<u8> = Vec::new();
            decoder.read_to_end(&mut out)?;
            out
        } else {
            data.to_vec()
        };
        if self.shuffle {
            decoded = unshuffle(&decoded, self.element_size);
        }
        if self.swap {
            byte_swap(&mut decoded, self.element_size);
        }
        Ok(decoded)
    }
}

fn byte_swap(bytes: &mut [u8], element_size: usize) {
    if element_size > 1 {
        bytes
            .chunks_exact_mut(element_size)
            .for_each(<[u8]>::reverse);
    }
}

/// Group the `i`th byte of every element together.
fn shuffle(decoded: &[u8], element_size: usize) -> Vec<u8> {
    let mut encoded = decoded.to_vec();
    let count = decoded.len() / element_size;
    for i in 0..count {
        let offset = i * element_size;
        for byte_index in 0..element_size {
            encoded[byte_index * count + i] = decoded[offset + byte_index];
        }
    }
    encoded
}

fn unshuffle(encoded: &[u8], element_size: usize) -> Vec<u8> {
    let mut decoded = encoded.to_vec();
    let count = encoded.len() / element_size;
    for byte_index in 0..element_size {
        let offset = byte_index * count;
        for i in 0..count {
            decoded[i * element_size + byte_index] = encoded[offset + i];
        }
    }
    decoded
}

/// The HDF5 variant of the fletcher32 checksum.
///
/// Bytes are summed as big-endian 16-bit words, and a trailing odd byte is treated as the high byte of a word.
pub(crate) fn fletcher32(data: &[u8]) -> u32 {
    const BLOCK_WORDS: usize = 360;
    let fold = |sum: u64| (sum & 0xffff) + (sum >> 16);

    let mut sum1: u64 = 0;
    let mut sum2: u64 = 0;
    let words = data.chunks_exact(2);
    let remainder = words.remainder();
    for block in words.collect::<Vec<_>>().chunks(BLOCK_WORDS) {
        for word in block {
            sum1 += (u64::from(word[0]) << 8) | u64::from(word[1]);
            sum2 += sum1;
        }
        sum1 = fold(sum1);
        sum2 = fold(sum2);
    }
    if let [last] = remainder {
        sum1 += u64::from(*last) << 8;
        sum2 += sum1;
        sum1 = fold(sum1);
        sum2 = fold(sum2);
    }
    sum1 = fold(sum1);
    sum2 = fold(sum2);
    #[allow(clippy::cast_possible_truncation)]
    let checksum = ((sum2 << 16) | sum1) as u32;
    checksum
}

#[cfg(test)]
mod tests {
    use ncarray_data_type::FillValue;

    use super::*;
    use crate::Endianness;

    fn layout() -> StorageLayout {
        StorageLayout::new(FillValue::from(0u16))
    }

    #[test]
    fn fletcher32_checksum() {
        assert_eq!(fletcher32(b"abcde"), 0x4ff0_29c7);
        assert_eq!(fletcher32(b"abcdef"), 0x5056_2a2d);
        assert_eq!(fletcher32(b"abcdefgh"), 0xe1eb_9195);
        let long: Vec<u8> = (0..=255u8).cycle().take(1024).collect();
        assert_eq!(fletcher32(&long), 0x1516_00ff);
    }

    #[test]
    fn shuffle_transposes_bytes() {
        let decoded = [1, 2, 3, 4, 5, 6];
        let encoded = shuffle(&decoded, 2);
        assert_eq!(encoded, vec![1, 3, 5, 2, 4, 6]);
        assert_eq!(unshuffle(&encoded, 2), decoded);
    }

    #[test]
    fn chunk_codec_pipeline() -> Result<(), Box<dyn std::error::Error>> {
        let decoded: Vec<u8> = (0..200u16).flat_map(u16::to_ne_bytes).collect();

        let mut layout = layout();
        layout.endianness = Endianness::Big;
        layout.shuffle = true;
        layout.deflate = true;
        layout.deflate_level = 9;
        layout.checksum = ChecksumMode::Fletcher32;
        let codec = ChunkCodec::new(&layout, 2, true);
        let encoded = codec.encode(&decoded)?;
        assert!(encoded.len() < decoded.len());
        assert_eq!(codec.decode(&encoded)?, decoded);

        let mut corrupted = encoded.clone();
        corrupted[0] ^= 0xff;
        assert!(codec.decode(&corrupted).is_err());
        Ok(())
    }

    #[test]
    fn chunk_codec_byte_order() -> Result<(), Box<dyn std::error::Error>> {
        let decoded = 0x0102u16.to_ne_bytes();
        let mut layout = layout();
        layout.endianness = Endianness::Big;
        let encoded = ChunkCodec::new(&layout, 2, true).encode(&decoded)?;
        assert_eq!(encoded, vec![0x01, 0x02]);
        layout.endianness = Endianness::Little;
        let encoded = ChunkCodec::new(&layout, 2, true).encode(&decoded)?;
        assert_eq!(encoded, vec![0x02, 0x01]);
        Ok(())
    }

    #[test]
    fn chunk_codec_skip_checksum_validation() -> Result<(), Box<dyn std::error::Error>> {
        let mut layout = layout();
        layout.checksum = ChecksumMode::Fletcher32;
        let codec = ChunkCodec::new(&layout, 2, false);
        let mut encoded = codec.encode(&[1, 2, 3, 4])?;
        let len = encoded.len();
        encoded[len - 1] ^= 0xff;
        assert_eq!(codec.decode(&encoded)?, vec![1, 2, 3, 4]);
        Ok(())
    }
}
