// Copyright 2020-2026 MathxH Chen.
//
// Code is licensed under MIT Apache Dual License

//! Tallyproof CLI

use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info};

use tallyproof_rs::audit::{self, MixerOutput, DEFAULT_AMPLIFY_TIMES, DEFAULT_DISTRICT};
use tallyproof_rs::config::{Config, Overrides};
use tallyproof_rs::keyfile::load_public_key;
use tallyproof_rs::report::{self, ExitStatus};
use tallyproof_rs::{BatchRunner, Error, FailurePolicy, ModpGroup, ProofFile, Result};

const VERIFY_CMD: &str = "verify";
const COMPARE_CMD: &str = "compare";
const AMPLIFY_CMD: &str = "amplify";

const LOG_LEVEL_FLAG: &str = "log-level";
const CONFIG_ARG: &str = "config";
const KEYFILE_ARG: &str = "keyfile";
const PROOFFILE_ARG: &str = "prooffile";
const MIXEDFILE_ARG: &str = "mixedfile";
const THREADS_ARG: &str = "threads";
const ABORT_FLAG: &str = "abort-on-error";
const DISTRICT_ARG: &str = "district";
const QUESTION_ARG: &str = "question";
const OUTPUT_ARG: &str = "output";
const TIMES_ARG: &str = "times";

fn path_arg(name: &'static str, help: &'static str) -> Arg {
    Arg::new(name)
        .long(name)
        .help(help)
        .value_parser(value_parser!(PathBuf))
}

fn config_arg() -> Arg {
    path_arg(CONFIG_ARG, "Path to the JSON config file (default: ./config.json)")
}

fn main() -> ExitCode {
    let matches = Command::new("tallyproof")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Verify proofs of correct decryption for an ElGamal-encrypted election.")
        .subcommand_required(true)
        .arg(
            Arg::new(LOG_LEVEL_FLAG)
                .long(LOG_LEVEL_FLAG)
                .global(true)
                .default_value("info")
                .help("Log verbosity (error, warn, info, debug, trace)")
                .value_parser(value_parser!(tracing::Level)),
        )
        .subcommand(
            Command::new(VERIFY_CMD)
                .about("Verify every decryption proof and tally the accepted messages.")
                .arg(config_arg())
                .arg(path_arg(KEYFILE_ARG, "Path to the armored election public key"))
                .arg(path_arg(PROOFFILE_ARG, "Path to the JSON proof file"))
                .arg(
                    Arg::new(THREADS_ARG)
                        .long(THREADS_ARG)
                        .help("Number of verification workers (default: one per core)")
                        .value_parser(clap::builder::RangedU64ValueParser::<usize>::new().range(1..)),
                )
                .arg(
                    Arg::new(ABORT_FLAG)
                        .long(ABORT_FLAG)
                        .action(ArgAction::SetTrue)
                        .help("Stop dispatching records after the first unprocessable one"),
                ),
        )
        .subcommand(
            Command::new(COMPARE_CMD)
                .about("Check that the proof file covers exactly the ciphertexts of the mix.")
                .arg(config_arg())
                .arg(path_arg(PROOFFILE_ARG, "Path to the JSON proof file"))
                .arg(path_arg(MIXEDFILE_ARG, "Path to the JSON mixer output"))
                .arg(
                    Arg::new(DISTRICT_ARG)
                        .long(DISTRICT_ARG)
                        .default_value(DEFAULT_DISTRICT)
                        .help("District of the mixer output to compare against")
                        .value_parser(value_parser!(String)),
                )
                .arg(
                    Arg::new(QUESTION_ARG)
                        .long(QUESTION_ARG)
                        .help("Question identifier (default: <election>.question-1)")
                        .value_parser(value_parser!(String)),
                ),
        )
        .subcommand(
            Command::new(AMPLIFY_CMD)
                .about("Write a proof file repeating the input records, for stress testing.")
                .arg(config_arg())
                .arg(path_arg(PROOFFILE_ARG, "Path to the JSON proof file to repeat"))
                .arg(path_arg(OUTPUT_ARG, "Path of the proof file to write").required(true))
                .arg(
                    Arg::new(TIMES_ARG)
                        .long(TIMES_ARG)
                        .default_value("4000")
                        .help("How many times to repeat the records")
                        .value_parser(clap::builder::RangedU64ValueParser::<usize>::new().range(1..)),
                ),
        )
        .get_matches();

    // Create logger
    let level = matches
        .get_one::<tracing::Level>(LOG_LEVEL_FLAG)
        .copied()
        .unwrap_or(tracing::Level::INFO);
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    let result = match matches.subcommand() {
        Some((VERIFY_CMD, matches)) => verify(matches),
        Some((COMPARE_CMD, matches)) => compare(matches),
        Some((AMPLIFY_CMD, matches)) => amplify(matches),
        _ => Err(Error::Config("unknown subcommand".to_string())),
    };
    match result {
        Ok(status) => ExitCode::from(status.code()),
        Err(e) => {
            error!(error = %e, "cannot complete the run");
            ExitCode::from(ExitStatus::Fatal.code())
        }
    }
}

/// Config file merged with whatever flags the subcommand defines.
fn load_config(matches: &ArgMatches) -> Result<Config> {
    let path = |name: &str| {
        matches
            .try_get_one::<PathBuf>(name)
            .ok()
            .flatten()
            .cloned()
    };
    let abort = matches
        .try_get_one::<bool>(ABORT_FLAG)
        .ok()
        .flatten()
        .copied()
        .unwrap_or(false);

    let mut config = Config::discover(path(CONFIG_ARG).as_deref())?;
    config.apply(Overrides {
        keyfile: path(KEYFILE_ARG),
        prooffile: path(PROOFFILE_ARG),
        mixedfile: path(MIXEDFILE_ARG),
        threads: matches.try_get_one::<usize>(THREADS_ARG).ok().flatten().copied(),
        failure_policy: abort.then_some(FailurePolicy::Abort),
    });
    config.validate()?;
    Ok(config)
}

fn verify(matches: &ArgMatches) -> Result<ExitStatus> {
    let config = load_config(matches)?;
    let key = load_public_key(config.keyfile()?)?;
    let file = ProofFile::load(config.prooffile()?)?;
    println!("Successfully loaded {} proof records.", file.proofs.len());

    let runner = BatchRunner::new(ModpGroup::get(), &key, config.batch_config());
    let tally = runner.run(&file.proofs)?;
    print!("{}", report::summary(&tally));
    Ok(ExitStatus::from_tally(&tally))
}

fn compare(matches: &ArgMatches) -> Result<ExitStatus> {
    let config = load_config(matches)?;
    let proofs = ProofFile::load(config.prooffile()?)?;
    let mixed = MixerOutput::load(config.mixedfile()?)?;

    let district = matches
        .get_one::<String>(DISTRICT_ARG)
        .map(String::as_str)
        .unwrap_or(DEFAULT_DISTRICT);
    let question = matches
        .get_one::<String>(QUESTION_ARG)
        .cloned()
        .unwrap_or_else(|| audit::default_question(&proofs.election));

    let comparison = audit::compare_ciphertexts(&proofs, &mixed, district, &question)?;
    if comparison.matches() {
        println!("The ciphertext sets match.");
        Ok(ExitStatus::AllValid)
    } else {
        println!("The ciphertext sets do not match.");
        println!(
            "{} ciphertexts only in the proof file, {} only in the mixer output.",
            comparison.only_in_proofs, comparison.only_in_mix
        );
        Ok(ExitStatus::Rejected)
    }
}

fn amplify(matches: &ArgMatches) -> Result<ExitStatus> {
    let config = load_config(matches)?;
    let output = matches
        .get_one::<PathBuf>(OUTPUT_ARG)
        .ok_or_else(|| Error::Config("no output file given".to_string()))?;
    let times = matches
        .get_one::<usize>(TIMES_ARG)
        .copied()
        .unwrap_or(DEFAULT_AMPLIFY_TIMES);

    let file = ProofFile::load(config.prooffile()?)?;
    let amplified = audit::amplify(&file, times)?;
    amplified.save(output)?;
    info!(
        records = amplified.proofs.len(),
        output = %output.display(),
        "wrote amplified proof file"
    );
    Ok(ExitStatus::AllValid)
}
