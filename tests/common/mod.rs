// Copyright 2020-2026 MathxH Chen.
//
// Code is licensed under MIT Apache Dual License

//! A toy decryption authority for building honest (and dishonest) proofs.

#![allow(dead_code)]

use base64::{prelude::BASE64_STANDARD, Engine};
use num_bigint::{BigInt, BigUint, RandBigInt};
use rand::Rng;
use simple_asn1::{to_der, ASN1Block, OID};
use std::path::PathBuf;

use tallyproof_rs::challenge::derive_challenge;
use tallyproof_rs::encoding::encode_message;
use tallyproof_rs::transcript::decryption_transcript;
use tallyproof_rs::{Ciphertext, DecryptionProof, ModpGroup, ProofRecord, PublicKey};

pub fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

/// `depth` SEQUENCEs, each wrapping the next, around an empty one. Built
/// inside out so deep values stay linear in time.
pub fn nested_sequence(depth: usize) -> Vec<u8> {
    let mut headers = Vec::with_capacity(depth + 1);
    let mut content_len = 0_usize;
    for _ in 0..=depth {
        let mut header = vec![0x30];
        if content_len < 0x80 {
            header.push(content_len as u8);
        } else {
            let bytes: Vec<u8> = content_len
                .to_be_bytes()
                .into_iter()
                .skip_while(|b| *b == 0)
                .collect();
            header.push(0x80 | bytes.len() as u8);
            header.extend(bytes);
        }
        content_len += header.len();
        headers.push(header);
    }
    headers.into_iter().rev().flatten().collect()
}

fn integer(x: &BigUint) -> ASN1Block {
    ASN1Block::Integer(0, BigInt::from(x.clone()))
}

/// SubjectPublicKeyInfo-like DER with the group parameters in the
/// algorithm block.
pub fn public_key_der(h: &BigUint) -> Vec<u8> {
    let group = ModpGroup::get();
    let oid = OID::new(
        [1_u64, 3, 6, 1, 4, 1, 3029, 2, 1]
            .into_iter()
            .map(BigUint::from)
            .collect(),
    );
    let algorithm = ASN1Block::Sequence(
        0,
        vec![
            ASN1Block::ObjectIdentifier(0, oid),
            ASN1Block::Sequence(0, vec![integer(group.modulus()), integer(group.generator())]),
        ],
    );
    let key = to_der(&ASN1Block::Sequence(0, vec![integer(h)])).unwrap();
    to_der(&ASN1Block::Sequence(
        0,
        vec![algorithm, ASN1Block::BitString(0, key.len() * 8, key)],
    ))
    .unwrap()
}

pub fn ciphertext_der(u: &BigUint, v: &BigUint) -> Vec<u8> {
    to_der(&ASN1Block::Sequence(
        0,
        vec![
            ASN1Block::Null(0),
            ASN1Block::Sequence(0, vec![integer(u), integer(v)]),
        ],
    ))
    .unwrap()
}

pub fn proof_der(proof: &DecryptionProof) -> Vec<u8> {
    to_der(&ASN1Block::Sequence(
        0,
        vec![integer(&proof.a), integer(&proof.b), integer(&proof.s)],
    ))
    .unwrap()
}

/// Holder of the election secret x.
pub struct Authority {
    pub x: BigUint,
    pub key: PublicKey,
}

impl Authority {
    pub fn new(x: BigUint) -> Self {
        let group = ModpGroup::get();
        let h = group.exp(group.generator(), &x);
        let key = PublicKey::from_der(&public_key_der(&h)).unwrap();
        Authority { x, key }
    }

    pub fn random<R: Rng>(rng: &mut R) -> Self {
        let group = ModpGroup::get();
        Self::new(rng.gen_biguint_range(&BigUint::from(1_u32), group.order()))
    }

    pub fn encrypt(&self, message: &[u8], r: &BigUint) -> Ciphertext {
        let group = ModpGroup::get();
        let m = encode_message(group, message).unwrap();
        let u = group.exp(group.generator(), r);
        let v = group.mul(&m, &group.exp(&self.key.h, r));
        Ciphertext::from_der(&ciphertext_der(&u, &v)).unwrap()
    }

    /// Honest proof that `ciphertext` decrypts to `message`, with nonce `w`.
    /// Nothing stops a caller from claiming a message the ciphertext does not
    /// hold, which yields a proof that must be rejected.
    pub fn prove(&self, ciphertext: &Ciphertext, message: &[u8], w: &BigUint) -> DecryptionProof {
        let group = ModpGroup::get();
        let a = group.exp(&ciphertext.u, w);
        let b = group.exp(group.generator(), w);
        let seed = decryption_transcript(&self.key, ciphertext, message, &a, &b).unwrap();
        let k = derive_challenge(&seed, group.order());
        let s = (w + k * &self.x) % group.order();
        DecryptionProof::new(a, b, s)
    }

    pub fn record(&self, ciphertext: &Ciphertext, message: &str, proof: &DecryptionProof) -> ProofRecord {
        ProofRecord {
            ciphertext: BASE64_STANDARD.encode(ciphertext.der()),
            message: message.to_string(),
            proof: BASE64_STANDARD.encode(proof_der(proof)),
        }
    }

    /// Encrypt `message` and prove its decryption with fresh randomness.
    pub fn honest_record<R: Rng>(&self, rng: &mut R, message: &str) -> ProofRecord {
        let order = ModpGroup::get().order();
        let r = rng.gen_biguint_below(order);
        let w = rng.gen_biguint_below(order);
        let ciphertext = self.encrypt(message.as_bytes(), &r);
        let proof = self.prove(&ciphertext, message.as_bytes(), &w);
        self.record(&ciphertext, message, &proof)
    }
}
