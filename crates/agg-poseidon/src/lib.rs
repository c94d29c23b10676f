use std::sync::OnceLock;

use agg_types::{Instance, ShadowInstance, Word};
use ark_bn254::Fr;
use ark_crypto_primitives::sponge::{
    poseidon::{PoseidonConfig, PoseidonSponge},
    CryptographicSponge, FieldBasedCryptographicSponge,
};
use ark_ff::PrimeField;

const RATE: usize = 2;
const FULL_ROUNDS: usize = 8;
const PARTIAL_ROUNDS: usize = 57;
const ALPHA: u64 = 5;

/// Domain tag absorbed first by every aggregate-proof transcript.
pub const TRANSCRIPT_DOMAIN: &[u8] = b"agg-verifier/transcript/v1";
/// Domain tag for the aggregate instance digest.
pub const INSTANCE_DOMAIN: &[u8] = b"agg-verifier/instance/v1";

pub fn poseidon_config() -> &'static PoseidonConfig<Fr> {
    static CONFIG: OnceLock<PoseidonConfig<Fr>> = OnceLock::new();
    CONFIG.get_or_init(|| {
        let (ark, mds) =
            ark_crypto_primitives::sponge::poseidon::find_poseidon_ark_and_mds::<Fr>(
                Fr::MODULUS_BIT_SIZE as u64,
                RATE,
                FULL_ROUNDS as u64,
                PARTIAL_ROUNDS as u64,
                0,
            );
        PoseidonConfig::new(FULL_ROUNDS, PARTIAL_ROUNDS, ALPHA, mds, ark, RATE, 1)
    })
}

fn domain_tag(tag: &[u8]) -> Fr {
    Fr::from_le_bytes_mod_order(tag)
}

/// Fiat-Shamir transcript shared by the prover and every verification step.
#[derive(Clone)]
pub struct Transcript {
    sponge: PoseidonSponge<Fr>,
}

impl Transcript {
    pub fn new(domain: &[u8]) -> Self {
        let mut sponge = PoseidonSponge::new(poseidon_config());
        sponge.absorb(&domain_tag(domain));
        Self { sponge }
    }

    /// Transcript seeded with the public data every aggregate proof is bound to.
    pub fn for_statement(instance: &Instance, shadow: &ShadowInstance) -> Self {
        let mut t = Self::new(TRANSCRIPT_DOMAIN);
        t.absorb_scalars(instance.as_slice());
        t.absorb_words(shadow.words());
        t
    }

    pub fn absorb_scalars(&mut self, values: &[Fr]) {
        self.sponge.absorb(&values);
    }

    pub fn absorb_words(&mut self, words: &[Word]) {
        let halves: Vec<Fr> = words.iter().flat_map(Word::halves).collect();
        self.sponge.absorb(&halves);
    }

    pub fn challenge(&mut self) -> Fr {
        self.sponge.squeeze_native_field_elements(1)[0]
    }
}

/// The public instance of an aggregate proof: a digest binding its shadow
/// instance to the ordered target instances it vouches for.
pub fn aggregate_instance(shadow: &ShadowInstance, targets: &[Instance], len: usize) -> Instance {
    let mut sponge = PoseidonSponge::new(poseidon_config());
    sponge.absorb(&domain_tag(INSTANCE_DOMAIN));
    let shadow_halves: Vec<Fr> = shadow.words().iter().flat_map(Word::halves).collect();
    sponge.absorb(&Fr::from(shadow.words().len() as u64));
    sponge.absorb(&shadow_halves);
    sponge.absorb(&Fr::from(targets.len() as u64));
    for target in targets {
        sponge.absorb(&Fr::from(target.len() as u64));
        sponge.absorb(&target.as_slice());
    }
    Instance(sponge.squeeze_native_field_elements(len))
}
