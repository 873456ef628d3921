use criterion::{criterion_group, criterion_main, Criterion};

use wick::convenience::{bra_e1, e1, e2, one_e, two_e};
use wick::{apply_wick, commute, AExpression, Expression, Occupation, Scalar};

fn hamiltonian() -> Expression {
    let f = one_e("f", &["occ", "vir"], true).unwrap();
    let v = two_e("I", &["occ", "vir"], true, true, false).unwrap();
    f + v
}

fn ccsd_energy() -> AExpression {
    let h = hamiltonian();
    let t = e1("t", &["occ"], &["vir"]) + e2("t", &["occ"], &["vir"]).unwrap();
    let ht = commute(&h, &t);
    let htt = commute(&ht, &t);
    let s = h + ht + Scalar::fraction(1, 2) * htt;
    let out = apply_wick(&s, &Occupation::Default).unwrap().resolve();
    AExpression::from_expression(&out).unwrap()
}

fn ccsd_t1() -> AExpression {
    let h = hamiltonian();
    let t1 = e1("t", &["occ"], &["vir"]);
    let t = t1.clone() + e2("t", &["occ"], &["vir"]).unwrap();
    let ht = commute(&h, &t);
    let htt = commute(&ht, &t);
    let httt = commute(&commute(&commute(&h, &t1), &t1), &t1);
    let s = bra_e1("occ", "vir")
        * (h + ht + Scalar::fraction(1, 2) * htt + Scalar::fraction(1, 6) * httt);
    let out = apply_wick(&s, &Occupation::Default).unwrap().resolve();
    AExpression::from_expression(&out).unwrap()
}

fn criterion_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("ccsd");
    group.sample_size(10);
    group.bench_function("energy", |b| b.iter(ccsd_energy));
    group.bench_function("t1 residual", |b| b.iter(ccsd_t1));
    group.finish();
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
