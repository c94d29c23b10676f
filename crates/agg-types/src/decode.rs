//! Byte-stream boundary: raw data files are concatenated 32-byte
//! little-endian words. Nothing here reduces or truncates silently.

use crate::word::{Word, WORD_BYTES};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    #[error("byte length {len} is not a multiple of {WORD_BYTES}")]
    Misaligned { len: usize },

    #[error("word {index} is not a canonical field element")]
    NonCanonical { index: usize },
}

pub fn words_from_bytes(bytes: &[u8]) -> Result<Vec<Word>, DecodeError> {
    if bytes.len() % WORD_BYTES != 0 {
        return Err(DecodeError::Misaligned { len: bytes.len() });
    }
    Ok(bytes
        .chunks_exact(WORD_BYTES)
        .map(|chunk| {
            let mut w = [0u8; WORD_BYTES];
            w.copy_from_slice(chunk);
            Word(w)
        })
        .collect())
}

pub fn words_to_bytes(words: &[Word]) -> Vec<u8> {
    words.iter().flat_map(|w| w.0).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_partial_word() {
        assert_eq!(
            words_from_bytes(&[0u8; 33]),
            Err(DecodeError::Misaligned { len: 33 })
        );
    }

    #[test]
    fn empty_stream_is_empty() {
        assert!(words_from_bytes(&[]).unwrap().is_empty());
    }

    #[test]
    fn splits_in_order() {
        let mut bytes = vec![0u8; 64];
        bytes[0] = 1;
        bytes[32] = 2;
        let words = words_from_bytes(&bytes).unwrap();
        assert_eq!(words.len(), 2);
        assert_eq!(words[0].0[0], 1);
        assert_eq!(words[1].0[0], 2);
        assert_eq!(words_to_bytes(&words), bytes);
    }
}
