use ark_bn254::Fr;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::decode::{words_from_bytes, words_to_bytes, DecodeError};
use crate::word::Word;

/// Words in a shadow instance: one deferred accumulator `(lhs, rhs)` of two G1 points.
pub const SHADOW_WORDS: usize = 4;

/// Public input/output vector of one circuit execution.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Instance(pub Vec<Fr>);

impl Instance {
    pub fn new(values: Vec<Fr>) -> Self {
        Self(values)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[Fr] {
        &self.0
    }

    pub fn from_words(words: &[Word]) -> Result<Self, DecodeError> {
        words
            .iter()
            .enumerate()
            .map(|(index, w)| w.to_fr().ok_or(DecodeError::NonCanonical { index }))
            .collect::<Result<Vec<_>, _>>()
            .map(Self)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, DecodeError> {
        Self::from_words(&words_from_bytes(bytes)?)
    }

    pub fn to_words(&self) -> Vec<Word> {
        self.0.iter().map(Word::from_fr).collect()
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        words_to_bytes(&self.to_words())
    }
}

impl From<Vec<Fr>> for Instance {
    fn from(values: Vec<Fr>) -> Self {
        Self(values)
    }
}

impl Serialize for Instance {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_words().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Instance {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let words = Vec::<Word>::deserialize(deserializer)?;
        Instance::from_words(&words).map_err(serde::de::Error::custom)
    }
}

/// Compact handle for a round's public state; the registry key.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ShadowInstance(pub Vec<Word>);

impl ShadowInstance {
    pub fn new(words: Vec<Word>) -> Self {
        Self(words)
    }

    pub fn words(&self) -> &[Word] {
        &self.0
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, DecodeError> {
        Ok(Self(words_from_bytes(bytes)?))
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        words_to_bytes(&self.0)
    }

    /// Short hex label for logs: the first 8 bytes of the first word.
    pub fn short_id(&self) -> String {
        self.0
            .first()
            .map(|w| hex::encode(&w.0[..8]))
            .unwrap_or_else(|| "empty".into())
    }
}

/// The prover's message sequence for one round.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ProofTranscript(pub Vec<Word>);

impl ProofTranscript {
    pub fn words(&self) -> &[Word] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, DecodeError> {
        Ok(Self(words_from_bytes(bytes)?))
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        words_to_bytes(&self.0)
    }
}

/// Untrusted helper values consumed by individual pipeline steps.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AuxData(pub Vec<Word>);

impl AuxData {
    pub fn words(&self) -> &[Word] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, DecodeError> {
        Ok(Self(words_from_bytes(bytes)?))
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        words_to_bytes(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ark_ff::UniformRand;
    use ark_std::test_rng;

    #[test]
    fn instance_bytes_roundtrip() {
        let mut rng = test_rng();
        let inst = Instance((0..4).map(|_| Fr::rand(&mut rng)).collect());
        assert_eq!(Instance::from_bytes(&inst.to_bytes()).unwrap(), inst);
    }

    #[test]
    fn instance_rejects_out_of_range_word() {
        let mut bytes = Instance(vec![Fr::from(1u64)]).to_bytes();
        bytes.extend_from_slice(&[0xffu8; 32]);
        assert_eq!(
            Instance::from_bytes(&bytes),
            Err(DecodeError::NonCanonical { index: 1 })
        );
    }

    #[test]
    fn instance_serde_rejects_non_canonical() {
        let json = format!("[\"{}\"]", "ff".repeat(32));
        assert!(serde_json::from_str::<Instance>(&json).is_err());
    }

    #[test]
    fn shadow_short_id() {
        assert_eq!(ShadowInstance::default().short_id(), "empty");
        let s = ShadowInstance(vec![Word([0xabu8; 32])]);
        assert_eq!(s.short_id(), "abababababababab");
    }
}
