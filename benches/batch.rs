// Copyright 2020-2026 MathxH Chen.
//
// Code is licensed under MIT Apache Dual License

use criterion::{criterion_group, criterion_main, BatchSize, Criterion};
use std::time::Duration;
use tallyproof_rs::audit::amplify;
use tallyproof_rs::keyfile::parse_public_key;
use tallyproof_rs::{BatchConfig, BatchRunner, ModpGroup, ProofFile};

const PUBLIC_KEY: &str = include_str!("../tests/fixtures/public_key.pem");
const PROOFS: &str = include_str!("../tests/fixtures/proofs.json");

pub fn verification_benches(c: &mut Criterion) {
    let mut g = c.benchmark_group("decryption proof verification");
    let group = ModpGroup::get();
    let key = parse_public_key(PUBLIC_KEY).unwrap();
    let file = ProofFile::from_json(PROOFS).unwrap();

    g.bench_function("verify a single record", |bench| {
        bench.iter(|| file.proofs[0].verify(group, &key).unwrap())
    });

    let amplified = amplify(&file, 40).unwrap();
    for threads in [1, 4] {
        g.bench_function(format!("verify 200 records on {threads} workers"), |bench| {
            bench.iter_batched(
                || BatchConfig {
                    threads: Some(threads),
                    ..BatchConfig::default()
                },
                |config| {
                    BatchRunner::new(group, &key, config)
                        .run(&amplified.proofs)
                        .unwrap()
                },
                BatchSize::SmallInput,
            );
        });
    }

    g.finish();
}

criterion_group! {
  name = benches;
  config = Criterion::default().sample_size(10).measurement_time(Duration::from_secs(10));
  targets = verification_benches
}

criterion_main!(benches);
