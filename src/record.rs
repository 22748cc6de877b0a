// Copyright 2020-2026 MathxH Chen.
//
// Code is licensed under MIT Apache Dual License

//! Proof file model.
//!
//! ```json
//! {
//!   "election": "EP2024",
//!   "proofs": [
//!     { "ciphertext": "<base64 DER>", "message": "<plaintext>", "proof": "<base64 DER>" }
//!   ]
//! }
//! ```

use base64::{prelude::BASE64_STANDARD, Engine};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::codec::{Ciphertext, PublicKey, MAX_DER_LEN};
use crate::error::{Error, Result};
use crate::group::ModpGroup;
use crate::proof::{DecryptionProof, Verdict};

/// One decrypted ciphertext with its proof of correct decryption.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProofRecord {
    pub ciphertext: String,
    pub message: String,
    pub proof: String,
}

/// Structurally decoded fields of a [`ProofRecord`].
#[derive(Debug, Clone)]
pub struct DecodedRecord {
    pub ciphertext: Ciphertext,
    pub proof: DecryptionProof,
}

/// Base64 decode one record field, refusing anything that cannot hold a
/// container of at most [`MAX_DER_LEN`] bytes.
fn decode_field(value: &str, what: &str) -> Result<Vec<u8>> {
    let limit = MAX_DER_LEN.div_ceil(3) * 4;
    if value.len() > limit {
        return Err(Error::Decoding(format!(
            "{what}: {} base64 characters exceeds the {limit} character limit",
            value.len()
        )));
    }
    Ok(BASE64_STANDARD.decode(value)?)
}

impl ProofRecord {
    pub fn decode(&self) -> Result<DecodedRecord> {
        let ciphertext = Ciphertext::from_der(&decode_field(&self.ciphertext, "ciphertext")?)?;
        let proof = DecryptionProof::from_der(&decode_field(&self.proof, "proof")?)?;
        Ok(DecodedRecord { ciphertext, proof })
    }

    /// Decode the record and check its proof against `key`.
    pub fn verify(&self, group: &ModpGroup, key: &PublicKey) -> Result<Verdict> {
        let DecodedRecord { ciphertext, proof } = self.decode()?;
        proof.verify(group, key, &ciphertext, self.message.as_bytes())
    }
}

/// All proofs published for one election.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProofFile {
    #[serde(default)]
    pub election: String,
    pub proofs: Vec<ProofRecord>,
}

impl ProofFile {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|err| Error::io(path, err))?;
        Self::from_json(&content)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        fs::write(path, self.to_json()?).map_err(|err| Error::io(path, err))
    }
}
