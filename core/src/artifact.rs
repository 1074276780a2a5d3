use std::{collections::BTreeMap, fs};

use anyhow::{anyhow, Context, Result};
use log::warn;

use crate::config::Config;

pub const WORD_SIZE: u64 = 4;

/// Number of 32-bit words in an artifact of `byte_length` bytes.
///
/// A length that isn't a multiple of [WORD_SIZE] is an error, unless
/// `allow_trailing_bytes` is set, in which case the extra bytes are dropped.
pub fn word_count(byte_length: u64, allow_trailing_bytes: bool) -> Result<usize> {
    let trailing = byte_length % WORD_SIZE;
    if trailing != 0 && !allow_trailing_bytes {
        return Err(anyhow!(
            "Length of {byte_length} bytes is not a multiple of {WORD_SIZE}"
        ));
    }

    Ok((byte_length / WORD_SIZE) as usize)
}

/// Little-endian words of `bytes`. Trailing bytes that don't fill a word are ignored.
pub fn decode_words(bytes: &[u8]) -> Vec<u32> {
    bytes
        .chunks_exact(WORD_SIZE as usize)
        .map(|chunk| u32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
        .collect()
}

/// Word count of every compiled shader, keyed by shader file name.
pub fn spirv_sizes(config: &Config, shaders: &[String]) -> Result<BTreeMap<String, usize>> {
    let mut sizes = BTreeMap::new();

    for shader in shaders {
        let path = config.spirv_path(shader);
        let byte_length = fs::metadata(&path)
            .with_context(|| {
                format!(
                    "Couldn't read SPIR-V binary {path}",
                    path = config.display_path(&path)
                )
            })?
            .len();

        let count = word_count(byte_length, config.allow_trailing_bytes)
            .with_context(|| format!("Invalid SPIR-V binary for shader {shader}"))?;
        if byte_length % WORD_SIZE != 0 {
            warn!(
                "Dropping {trailing} trailing bytes of {shader}.spv",
                trailing = byte_length % WORD_SIZE
            );
        }

        sizes.insert(shader.clone(), count);
    }

    Ok(sizes)
}

/// A compiled shader, loaded as the words that will be embedded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpirvArtifact {
    pub shader: String,
    pub words: Vec<u32>,
}

impl SpirvArtifact {
    pub fn new(shader: impl Into<String>, words: Vec<u32>) -> Self {
        Self {
            shader: shader.into(),
            words,
        }
    }

    /// Reads the first `word_count` words of the shader's `.spv` file.
    pub fn load(config: &Config, shader: &str, word_count: usize) -> Result<Self> {
        let path = config.spirv_path(shader);
        let bytes = fs::read(&path).with_context(|| {
            format!(
                "Couldn't read SPIR-V binary {path}",
                path = config.display_path(&path)
            )
        })?;

        let mut words = decode_words(&bytes);
        if words.len() < word_count {
            return Err(anyhow!(
                "SPIR-V binary {path} shrank to {actual} words, expected {word_count}",
                path = config.display_path(&path),
                actual = words.len()
            ));
        }
        words.truncate(word_count);

        Ok(Self::new(shader, words))
    }

    pub fn word_count(&self) -> usize {
        self.words.len()
    }
}

/// Loads every artifact listed in `sizes`, in name order.
pub fn read_artifacts(config: &Config, sizes: &BTreeMap<String, usize>) -> Result<Vec<SpirvArtifact>> {
    sizes
        .iter()
        .map(|(shader, &count)| SpirvArtifact::load(config, shader, count))
        .collect()
}
