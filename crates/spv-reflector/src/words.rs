//! # Decoding SpirV blobs into words
//!
//! Shaders usually arrive as a byte blob (read from a file or extracted from some container). SpirV allows
//! both byte orders, which is why the first word, the magic number, is used to figure out how the rest of the
//! blob has to be read.

use thiserror::Error;

///The SpirV magic number, as it reads in the module's own byte order.
pub const SPIRV_MAGIC: u32 = 0x0723_0203;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WordError {
    #[error("SpirV blob length {0} is not a multiple of 4")]
    UnalignedLength(usize),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endianness {
    Little,
    Big,
}

impl Endianness {
    ///Detects the byte order based on the magic number. Returns `None` if the blob is shorter than a word, or does not
    /// start with the magic number in either order.
    pub fn detect(bytes: &[u8]) -> Option<Self> {
        let first: [u8; 4] = bytes.get(0..4)?.try_into().ok()?;
        if u32::from_le_bytes(first) == SPIRV_MAGIC {
            Some(Endianness::Little)
        } else if u32::from_be_bytes(first) == SPIRV_MAGIC {
            Some(Endianness::Big)
        } else {
            None
        }
    }

    fn read(&self, word: [u8; 4]) -> u32 {
        match self {
            Endianness::Little => u32::from_le_bytes(word),
            Endianness::Big => u32::from_be_bytes(word),
        }
    }
}

///Decodes `bytes` into SpirV words.
///
/// Blobs that do not start with the magic number are still decoded (little endian), so that the cross compiler can
/// complain about them in its own words.
pub fn words_from_bytes(bytes: &[u8]) -> Result<Vec<u32>, WordError> {
    if bytes.len() % 4 != 0 {
        return Err(WordError::UnalignedLength(bytes.len()));
    }

    if bytes.is_empty() {
        return Ok(Vec::new());
    }

    let order = match Endianness::detect(bytes) {
        Some(order) => order,
        None => {
            log::warn!("No SpirV magic number found, assuming little endian words");
            Endianness::Little
        }
    };

    let words = bytes
        .chunks_exact(4)
        .map(|chunk| order.read([chunk[0], chunk[1], chunk[2], chunk[3]]))
        .collect();

    Ok(words)
}
