use ark_bn254::Fr;
use ark_ff::{BigInt, BigInteger, PrimeField};
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

pub const WORD_BYTES: usize = 32;

/// A 256-bit little-endian word, the unit of every proof, instance and aux stream.
///
/// A word carries no interpretation of its own: pipeline steps read it as a
/// scalar (`Fr`) or as a base-field coordinate (`Fq`) depending on position.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Word(pub [u8; WORD_BYTES]);

impl Word {
    pub const ZERO: Word = Word([0u8; WORD_BYTES]);

    pub fn from_le_bytes(bytes: [u8; WORD_BYTES]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; WORD_BYTES] {
        &self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; WORD_BYTES]
    }

    fn limbs(&self) -> [u64; 4] {
        let mut limbs = [0u64; 4];
        for (limb, chunk) in limbs.iter_mut().zip(self.0.chunks_exact(8)) {
            let mut buf = [0u8; 8];
            buf.copy_from_slice(chunk);
            *limb = u64::from_le_bytes(buf);
        }
        limbs
    }

    /// Strict conversion: `None` when the word is not below the field modulus.
    pub fn to_field<F: PrimeField<BigInt = BigInt<4>>>(&self) -> Option<F> {
        F::from_bigint(BigInt::new(self.limbs()))
    }

    pub fn from_field<F: PrimeField<BigInt = BigInt<4>>>(value: &F) -> Self {
        let bytes = value.into_bigint().to_bytes_le();
        let mut out = [0u8; WORD_BYTES];
        out.copy_from_slice(&bytes[..WORD_BYTES]);
        Self(out)
    }

    pub fn from_fr(value: &Fr) -> Self {
        Self::from_field(value)
    }

    pub fn to_fr(&self) -> Option<Fr> {
        self.to_field()
    }

    /// Injective split into two 128-bit scalars, low half first.
    ///
    /// Used to absorb arbitrary words (e.g. `Fq` coordinates) into an `Fr` sponge.
    pub fn halves(&self) -> [Fr; 2] {
        [
            Fr::from_le_bytes_mod_order(&self.0[..16]),
            Fr::from_le_bytes_mod_order(&self.0[16..]),
        ]
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    pub fn from_hex(s: &str) -> Result<Self, hex::FromHexError> {
        let s = s.strip_prefix("0x").unwrap_or(s);
        let mut out = [0u8; WORD_BYTES];
        hex::decode_to_slice(s, &mut out)?;
        Ok(Self(out))
    }
}

impl From<Fr> for Word {
    fn from(value: Fr) -> Self {
        Self::from_fr(&value)
    }
}

impl fmt::Debug for Word {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Word({})", self.to_hex())
    }
}

impl fmt::Display for Word {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl Serialize for Word {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Word {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Word::from_hex(&s).map_err(de::Error::custom)
    }
}
