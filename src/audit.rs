// Copyright 2020-2026 MathxH Chen.
//
// Code is licensed under MIT Apache Dual License

//! Auxiliary checks around a proof file.
//!
//! * [`compare_ciphertexts`] checks that the decrypted ciphertexts are exactly
//!   the ones the mix network produced, so no ballot was dropped or injected
//!   between mixing and decryption.
//! * [`amplify`] repeats the records of a proof file to build large inputs
//!   for stress testing the verifier.

use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::record::ProofFile;

pub const DEFAULT_DISTRICT: &str = "0000.1";
pub const DEFAULT_AMPLIFY_TIMES: usize = 4000;

/// Question identifier used when none is given: `<election>.question-1`.
pub fn default_question(election: &str) -> String {
    format!("{election}.question-1")
}

/// Output of the mix network.
///
/// `districts[district][sub-district][question]` holds the base64 DER
/// ciphertexts handed to the decryption service.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MixerOutput {
    pub districts: BTreeMap<String, BTreeMap<String, BTreeMap<String, Vec<String>>>>,
}

impl MixerOutput {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let json = fs::read_to_string(path).map_err(|err| Error::io(path, err))?;
        Self::from_json(&json)
    }

    /// All ciphertexts of `question` across the sub-districts of `district`.
    pub fn ciphertexts(&self, district: &str, question: &str) -> Result<Vec<&str>> {
        let sub_districts = self
            .districts
            .get(district)
            .ok_or_else(|| Error::Config(format!("district {district} not in mixer output")))?;

        let mut found = false;
        let mut ciphertexts = Vec::new();
        for (name, questions) in sub_districts {
            if let Some(list) = questions.get(question) {
                debug!(sub_district = %name, count = list.len(), "collected mixed ciphertexts");
                found = true;
                ciphertexts.extend(list.iter().map(String::as_str));
            }
        }
        if !found {
            return Err(Error::Config(format!(
                "question {question} not in district {district}"
            )));
        }
        Ok(ciphertexts)
    }
}

/// Multiset comparison of proof ciphertexts against mixed ciphertexts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CiphertextComparison {
    pub proof_count: usize,
    pub mixed_count: usize,
    /// Occurrences present in the proof file but not in the mix.
    pub only_in_proofs: usize,
    /// Occurrences present in the mix but not in the proof file.
    pub only_in_mix: usize,
}

impl CiphertextComparison {
    pub fn matches(&self) -> bool {
        self.only_in_proofs == 0 && self.only_in_mix == 0
    }
}

pub fn compare_ciphertexts(
    proofs: &ProofFile,
    mixed: &MixerOutput,
    district: &str,
    question: &str,
) -> Result<CiphertextComparison> {
    let mixed_ciphertexts = mixed.ciphertexts(district, question)?;

    // positive: surplus in the proof file, negative: surplus in the mix
    let mut balance: BTreeMap<&str, isize> = BTreeMap::new();
    for record in &proofs.proofs {
        *balance.entry(record.ciphertext.as_str()).or_default() += 1;
    }
    for ciphertext in &mixed_ciphertexts {
        *balance.entry(ciphertext).or_default() -= 1;
    }

    let mut comparison = CiphertextComparison {
        proof_count: proofs.proofs.len(),
        mixed_count: mixed_ciphertexts.len(),
        ..CiphertextComparison::default()
    };
    for surplus in balance.into_values() {
        if surplus > 0 {
            comparison.only_in_proofs += surplus.unsigned_abs();
        } else {
            comparison.only_in_mix += surplus.unsigned_abs();
        }
    }
    info!(?comparison, "compared ciphertext sets");
    Ok(comparison)
}

/// Build a proof file holding the records of `file` repeated `times` times.
pub fn amplify(file: &ProofFile, times: usize) -> Result<ProofFile> {
    if times == 0 {
        return Err(Error::Config("times must be at least 1".to_string()));
    }
    let mut proofs = Vec::with_capacity(file.proofs.len() * times);
    for _ in 0..times {
        proofs.extend_from_slice(&file.proofs);
    }
    Ok(ProofFile {
        election: file.election.clone(),
        proofs,
    })
}
