pub mod decode;
pub mod instance;
pub mod word;

pub use decode::{words_from_bytes, words_to_bytes, DecodeError};
pub use instance::{AuxData, Instance, ProofTranscript, ShadowInstance, SHADOW_WORDS};
pub use word::{Word, WORD_BYTES};
