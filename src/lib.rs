// Copyright 2020-2026 MathxH Chen.
//
// Code is licensed under MIT Apache Dual License

//! Batch verification of ElGamal decryption proofs.
//!
//! Given an election public key and a file of decrypted ballots, each with a
//! Chaum-Pedersen proof of correct decryption, check every proof and tally
//! the messages whose proofs verify.

pub mod audit;
pub mod batch;
pub mod challenge;
pub mod codec;
pub mod config;
pub mod encoding;
pub mod error;
pub mod group;
pub mod keyfile;
pub mod proof;
pub mod record;
pub mod report;
pub mod transcript;
pub mod util;

pub use batch::{BatchConfig, BatchRunner, FailurePolicy, Tally};
pub use codec::{Ciphertext, PublicKey};
pub use error::{Error, Result};
pub use group::ModpGroup;
pub use proof::{DecryptionProof, Verdict};
pub use record::{ProofFile, ProofRecord};
