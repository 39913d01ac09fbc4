use criterion::{Criterion, black_box, criterion_group, criterion_main};
use dealsmith_core::engine::DealSynthesizer;
use dealsmith_core::profile::HandProfile;
use rand::SeedableRng;
use rand::rngs::StdRng;

const OPEN_PROFILE: &str = r#"{
    "seats": {
        "N": { "subprofiles": [ { } ] },
        "E": { "subprofiles": [ { } ] },
        "S": { "subprofiles": [ { } ] },
        "W": { "subprofiles": [ { } ] }
    }
}"#;

const CONSTRAINED_PROFILE: &str = r#"{
    "seats": {
        "N": { "subprofiles": [ { "standard": { "total_min_hcp": 15, "total_max_hcp": 17 } } ] },
        "E": { "subprofiles": [ { } ] },
        "S": { "subprofiles": [ { "standard": { "spades": { "min_cards": 5 } } } ] },
        "W": { "subprofiles": [ { } ] }
    }
}"#;

fn bench_build(profile: &HandProfile, seed: u64) {
    let synthesizer = DealSynthesizer::default();
    let mut rng = StdRng::seed_from_u64(seed);
    let _ = black_box(synthesizer.build_deal(&mut rng, profile, 1));
}

fn synthesis_bench(c: &mut Criterion) {
    let mut group = c.benchmark_group("synthesis");
    let open = HandProfile::from_json(OPEN_PROFILE).expect("open profile");
    let constrained = HandProfile::from_json(CONSTRAINED_PROFILE).expect("constrained profile");
    for seed in [11u64, 42u64] {
        group.bench_function(format!("open_{seed}"), |b| {
            b.iter(|| bench_build(&open, seed))
        });
        group.bench_function(format!("strong_nt_{seed}"), |b| {
            b.iter(|| bench_build(&constrained, seed))
        });
    }
    group.finish();
}

criterion_group!(benches, synthesis_bench);
criterion_main!(benches);
