// Copyright 2020-2026 MathxH Chen.
//
// Code is licensed under MIT Apache Dual License

//! Human readable summary of a verification run and the matching exit status.

use std::fmt::Write;

use crate::batch::Tally;

/// Process exit status of the verifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitStatus {
    /// Every proof verified.
    AllValid,
    /// At least one proof was rejected, every record was processed.
    Rejected,
    /// At least one record could not be processed.
    ProcessingFailure,
    /// Inputs could not be loaded at all.
    Fatal,
}

impl ExitStatus {
    pub fn from_tally(tally: &Tally) -> Self {
        if tally.has_processing_failures() {
            ExitStatus::ProcessingFailure
        } else if tally.failed > 0 {
            ExitStatus::Rejected
        } else {
            ExitStatus::AllValid
        }
    }

    pub fn code(self) -> u8 {
        match self {
            ExitStatus::AllValid => 0,
            ExitStatus::Rejected => 1,
            ExitStatus::ProcessingFailure => 2,
            ExitStatus::Fatal => 3,
        }
    }
}

/// Render the tally the way election observers are used to reading it:
/// success and failure counts followed by one line per candidate, sorted by
/// message.
pub fn summary(tally: &Tally) -> String {
    let mut out = String::new();
    // writing into a String cannot fail
    let _ = writeln!(out, "Successfully verified: {}.", tally.passed);
    let _ = writeln!(out, "Failed verifications: {}.", tally.failed);
    if !tally.failures.is_empty() {
        let _ = writeln!(out, "Unprocessable records: {}.", tally.failures.len());
        for failure in &tally.failures {
            let _ = writeln!(out, "  proof number {}: {}", failure.index + 1, failure.error);
        }
    }
    if tally.skipped > 0 {
        let _ = writeln!(out, "Skipped records: {}.", tally.skipped);
    }
    out.push('\n');
    for (message, votes) in &tally.counts {
        let _ = writeln!(out, "Candidate {message} got {votes} votes.");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::batch::RecordOutcome;
    use crate::error::Error;
    use crate::proof::Verdict;

    fn tally(outcomes: Vec<(&str, RecordOutcome)>) -> Tally {
        let mut tally = Tally::default();
        for (index, (message, outcome)) in outcomes.into_iter().enumerate() {
            tally.record(index, message, outcome);
        }
        tally
    }

    #[test]
    fn test_exit_status() {
        let valid = || RecordOutcome::Verified(Verdict::Valid);
        let invalid = || RecordOutcome::Verified(Verdict::Invalid);

        assert_eq!(ExitStatus::from_tally(&Tally::default()), ExitStatus::AllValid);
        assert_eq!(
            ExitStatus::from_tally(&tally(vec![("A", valid())])),
            ExitStatus::AllValid
        );
        assert_eq!(
            ExitStatus::from_tally(&tally(vec![("A", valid()), ("B", invalid())])),
            ExitStatus::Rejected
        );
        // a processing failure outranks a rejection
        let failed = tally(vec![
            ("A", invalid()),
            ("B", RecordOutcome::Failed(Error::Decoding("x".into()))),
        ]);
        assert_eq!(ExitStatus::from_tally(&failed), ExitStatus::ProcessingFailure);
        assert_eq!(
            ExitStatus::from_tally(&tally(vec![("A", RecordOutcome::Skipped)])),
            ExitStatus::ProcessingFailure
        );

        assert_eq!(ExitStatus::AllValid.code(), 0);
        assert_eq!(ExitStatus::Rejected.code(), 1);
        assert_eq!(ExitStatus::ProcessingFailure.code(), 2);
        assert_eq!(ExitStatus::Fatal.code(), 3);
    }

    #[test]
    fn test_summary() {
        let tally = tally(vec![
            ("B", RecordOutcome::Verified(Verdict::Valid)),
            ("A", RecordOutcome::Verified(Verdict::Valid)),
            ("B", RecordOutcome::Verified(Verdict::Valid)),
            ("C", RecordOutcome::Verified(Verdict::Invalid)),
        ]);
        assert_eq!(
            summary(&tally),
            "Successfully verified: 3.\n\
             Failed verifications: 1.\n\
             \n\
             Candidate A got 1 votes.\n\
             Candidate B got 2 votes.\n"
        );
    }

    #[test]
    fn test_summary_lists_failures() {
        let tally = tally(vec![
            ("A", RecordOutcome::Verified(Verdict::Valid)),
            ("B", RecordOutcome::Failed(Error::Decoding("bad".into()))),
        ]);
        let text = summary(&tally);
        assert!(text.contains("Unprocessable records: 1."));
        assert!(text.contains("proof number 2: malformed DER structure: bad"));
    }
}
