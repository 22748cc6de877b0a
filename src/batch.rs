// Copyright 2020-2026 MathxH Chen.
//
// Code is licensed under MIT Apache Dual License

//! Parallel verification of many proof records.
//!
//! Records are verified independently on a rayon pool. Every task sends its
//! outcome over a channel to a single aggregator, which is the only writer of
//! the [`Tally`]. Nothing is locked while a proof is being checked, and the
//! final counts do not depend on the order in which tasks complete.

use rayon::prelude::*;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use tracing::{debug, info, warn};

use crate::codec::PublicKey;
use crate::error::{Error, Result};
use crate::group::ModpGroup;
use crate::proof::Verdict;
use crate::record::ProofRecord;

/// What to do with the rest of the batch once a record cannot be processed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FailurePolicy {
    /// Report the record and keep going.
    #[default]
    Isolate,
    /// Stop dispatching new records. Verdicts already recorded are kept and
    /// records that never started are counted as skipped.
    Abort,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchConfig {
    /// Worker count, `None` for one per available core.
    pub threads: Option<usize>,
    pub failure_policy: FailurePolicy,
    /// Log progress every this many processed records.
    pub progress_interval: usize,
}

impl Default for BatchConfig {
    fn default() -> Self {
        BatchConfig {
            threads: None,
            failure_policy: FailurePolicy::Isolate,
            progress_interval: 10_000,
        }
    }
}

/// Result of a single verification task.
#[derive(Debug)]
pub enum RecordOutcome {
    Verified(Verdict),
    Failed(Error),
    Skipped,
}

/// A record that could not be processed, by position in the proof file.
#[derive(Debug)]
pub struct RecordFailure {
    pub index: usize,
    pub error: Error,
}

/// Aggregate of a batch run.
#[derive(Debug, Default)]
pub struct Tally {
    /// Proofs that verified.
    pub passed: usize,
    /// Well-formed proofs that were rejected.
    pub failed: usize,
    /// Records that could not be decoded or encoded, sorted by index.
    pub failures: Vec<RecordFailure>,
    /// Records never started because the batch was aborted.
    pub skipped: usize,
    /// Number of valid proofs per decrypted message.
    pub counts: BTreeMap<String, usize>,
}

impl Tally {
    pub fn record(&mut self, index: usize, message: &str, outcome: RecordOutcome) {
        match outcome {
            RecordOutcome::Verified(Verdict::Valid) => {
                self.passed += 1;
                *self.counts.entry(message.to_owned()).or_default() += 1;
            }
            RecordOutcome::Verified(Verdict::Invalid) => {
                debug!(index, "proof rejected");
                self.failed += 1;
            }
            RecordOutcome::Failed(error) => {
                warn!(index, %error, "record could not be processed");
                self.failures.push(RecordFailure { index, error });
            }
            RecordOutcome::Skipped => self.skipped += 1,
        }
    }

    /// Number of records accounted for.
    pub fn processed(&self) -> usize {
        self.passed + self.failed + self.failures.len() + self.skipped
    }

    /// Every record was processed and every proof verified.
    pub fn all_valid(&self) -> bool {
        self.failed == 0 && !self.has_processing_failures()
    }

    pub fn has_processing_failures(&self) -> bool {
        !self.failures.is_empty() || self.skipped > 0
    }
}

/// Verifies proof records against one public key.
pub struct BatchRunner<'a> {
    group: &'a ModpGroup,
    key: &'a PublicKey,
    config: BatchConfig,
}

impl<'a> BatchRunner<'a> {
    pub fn new(group: &'a ModpGroup, key: &'a PublicKey, config: BatchConfig) -> Self {
        BatchRunner { group, key, config }
    }

    /// Verify all `records` and return their tally.
    ///
    /// Only worker pool construction can fail; per-record problems end up
    /// in [`Tally::failures`].
    pub fn run(&self, records: &[ProofRecord]) -> Result<Tally> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.config.threads.unwrap_or_default())
            .thread_name(|i| format!("tallyVerify{i:02}"))
            .build()
            .map_err(|err| Error::ThreadPool(err.to_string()))?;
        info!(
            records = records.len(),
            threads = pool.current_num_threads(),
            policy = ?self.config.failure_policy,
            "verifying proofs"
        );

        let (sender, receiver) = crossbeam_channel::unbounded();
        let cancel = AtomicBool::new(false);
        let progress_interval = self.config.progress_interval.max(1);

        let mut tally = thread::scope(|scope| {
            let pool = &pool;
            let cancel = &cancel;
            scope.spawn(move || {
                pool.install(|| {
                    records.par_iter().enumerate().for_each_with(
                        sender,
                        |sender, (index, record)| {
                            let outcome = self.verify_one(record, cancel);
                            // The receiver lives until every sender is gone.
                            let _ = sender.send((index, outcome));
                        },
                    )
                })
            });

            let mut tally = Tally::default();
            for (index, outcome) in receiver.iter() {
                tally.record(index, &records[index].message, outcome);
                if tally.processed() % progress_interval == 0 {
                    info!(processed = tally.processed(), "verification progress");
                }
            }
            tally
        });

        tally.failures.sort_by_key(|failure| failure.index);
        info!(
            passed = tally.passed,
            failed = tally.failed,
            errors = tally.failures.len(),
            skipped = tally.skipped,
            "verification finished"
        );
        Ok(tally)
    }

    fn verify_one(&self, record: &ProofRecord, cancel: &AtomicBool) -> RecordOutcome {
        if cancel.load(Ordering::Relaxed) {
            return RecordOutcome::Skipped;
        }
        match record.verify(self.group, self.key) {
            Ok(verdict) => RecordOutcome::Verified(verdict),
            Err(error) => {
                if self.config.failure_policy == FailurePolicy::Abort {
                    cancel.store(true, Ordering::Relaxed);
                }
                RecordOutcome::Failed(error)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn malformed(n: usize) -> Vec<ProofRecord> {
        (0..n)
            .map(|i| ProofRecord {
                ciphertext: "MAA=".to_string(),
                message: format!("m{i}"),
                proof: "MAA=".to_string(),
            })
            .collect()
    }

    fn dummy_key() -> PublicKey {
        // SEQUENCE { SEQUENCE { NULL }, BIT STRING { INTEGER 5 } }
        let der = [
            0x30, 0x0a, 0x30, 0x02, 0x05, 0x00, 0x03, 0x04, 0x00, 0x02, 0x01, 0x05,
        ];
        PublicKey::from_der(&der).unwrap()
    }

    #[test]
    fn test_tally_record() {
        let mut tally = Tally::default();
        tally.record(0, "A", RecordOutcome::Verified(Verdict::Valid));
        tally.record(1, "A", RecordOutcome::Verified(Verdict::Valid));
        tally.record(2, "B", RecordOutcome::Verified(Verdict::Invalid));
        tally.record(3, "C", RecordOutcome::Failed(Error::Decoding("x".into())));
        tally.record(4, "D", RecordOutcome::Skipped);

        assert_eq!(tally.passed, 2);
        assert_eq!(tally.failed, 1);
        assert_eq!(tally.failures.len(), 1);
        assert_eq!(tally.failures[0].index, 3);
        assert_eq!(tally.skipped, 1);
        assert_eq!(tally.processed(), 5);
        // only valid proofs are counted per message
        assert_eq!(tally.counts.len(), 1);
        assert_eq!(tally.counts["A"], 2);
        assert!(!tally.all_valid());
        assert!(tally.has_processing_failures());
    }

    #[test]
    fn test_empty_batch() {
        let key = dummy_key();
        let runner = BatchRunner::new(ModpGroup::get(), &key, BatchConfig::default());
        let tally = runner.run(&[]).unwrap();
        assert_eq!(tally.processed(), 0);
        assert!(tally.all_valid());
    }

    #[test]
    fn test_isolate_reports_every_failure() {
        let key = dummy_key();
        let config = BatchConfig {
            threads: Some(4),
            ..BatchConfig::default()
        };
        let tally = BatchRunner::new(ModpGroup::get(), &key, config)
            .run(&malformed(20))
            .unwrap();
        assert_eq!(tally.failures.len(), 20);
        assert_eq!(tally.skipped, 0);
        let indices: Vec<usize> = tally.failures.iter().map(|f| f.index).collect();
        assert_eq!(indices, (0..20).collect::<Vec<_>>());
    }

    #[test]
    fn test_abort_skips_remaining_records() {
        let key = dummy_key();
        let config = BatchConfig {
            threads: Some(1),
            failure_policy: FailurePolicy::Abort,
            ..BatchConfig::default()
        };
        let tally = BatchRunner::new(ModpGroup::get(), &key, config)
            .run(&malformed(10))
            .unwrap();
        // a single worker runs records in order, so only the first one starts
        assert_eq!(tally.failures.len(), 1);
        assert_eq!(tally.failures[0].index, 0);
        assert_eq!(tally.skipped, 9);
        assert_eq!(tally.processed(), 10);
    }

    #[test]
    fn test_failure_policy_from_config_value() {
        let policy: FailurePolicy = serde_json::from_str("\"abort\"").unwrap();
        assert_eq!(policy, FailurePolicy::Abort);
        let policy: FailurePolicy = serde_json::from_str("\"isolate\"").unwrap();
        assert_eq!(policy, FailurePolicy::Isolate);
    }
}
