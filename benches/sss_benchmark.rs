use criterion::{black_box, criterion_group, criterion_main, Criterion};
use num_bigint::BigUint;
use vshard::commitment::{verify, CommitmentGroup, GroupParams};
use vshard::field::PrimeField;
use vshard::prime::generate_prime;
use vshard::refresh::refresh;
use vshard::rng::Randomness;
use vshard::sss::{deal, reconstruct};

fn bench_field() -> PrimeField {
    let mut rng = Randomness::from_seed([1u8; 32]);
    PrimeField::new(generate_prime(256, &mut rng).unwrap()).unwrap()
}

fn bench_deal(c: &mut Criterion) {
    c.bench_function("deal", |b| {
        let field = bench_field();
        let secret = BigUint::from(123456789u64);
        let mut rng = Randomness::from_seed([2u8; 32]);
        b.iter(|| deal(black_box(&secret), black_box(10), black_box(5), &field, 256, &mut rng))
    });
}

fn bench_reconstruct(c: &mut Criterion) {
    c.bench_function("reconstruct", |b| {
        let field = bench_field();
        let mut rng = Randomness::from_seed([3u8; 32]);
        let dealing = deal(&BigUint::from(42u32), 10, 5, &field, 256, &mut rng).unwrap();
        b.iter(|| reconstruct(black_box(&dealing.shares), black_box(5), &field))
    });
}

fn bench_verify(c: &mut Criterion) {
    c.bench_function("verify", |b| {
        let field = bench_field();
        let group = CommitmentGroup::for_field(&field).unwrap();
        let mut rng = Randomness::from_seed([4u8; 32]);
        let dealing = deal(&BigUint::from(42u32), 10, 5, &field, 256, &mut rng).unwrap();
        b.iter(|| {
            verify(
                black_box(&dealing.shares[7]),
                &dealing.commitments,
                &dealing.params,
                &group,
            )
        })
    });
}

fn bench_refresh(c: &mut Criterion) {
    c.bench_function("refresh", |b| {
        let field = bench_field();
        let group = CommitmentGroup::for_field(&field).unwrap();
        let mut rng = Randomness::from_seed([5u8; 32]);
        let params = GroupParams::generate(&group, 256, &mut rng);
        b.iter(|| refresh(black_box(10), black_box(5), &params, &group, &mut rng))
    });
}

criterion_group!(benches, bench_deal, bench_reconstruct, bench_verify, bench_refresh);
criterion_main!(benches);
