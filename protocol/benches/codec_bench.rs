// Codec benchmarks for ledger-xdr.
//
// Covers encode and decode of representative operations, base64 transport,
// recursive claim predicates and authorization trees at increasing depth,
// and the numeric conversions.

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use ledger_xdr::amount::{to_stroops, Price};
use ledger_xdr::crypto::hash::Hash;
use ledger_xdr::crypto::keys::KeyPair;
use ledger_xdr::identity::{AccountId, ContractId, ScAddress};
use ledger_xdr::ledger::claim::ClaimPredicate;
use ledger_xdr::ledger::Asset;
use ledger_xdr::operation::{CreateAccountOp, Operation, OperationBody, PathPaymentStrictSendOp, PaymentOp};
use ledger_xdr::soroban::{
    InvokeContractArgs, SorobanAuthorizedFunction, SorobanAuthorizedInvocation, ScVal,
};
use ledger_xdr::{Amount, XdrCodec};

fn account(seed: u8) -> AccountId {
    KeyPair::from_seed(&[seed; 32]).account_id()
}

fn sample_operations() -> Vec<(&'static str, Operation)> {
    let usd = Asset::credit("USD", account(1)).expect("asset");
    vec![
        (
            "create_account",
            Operation::new(OperationBody::CreateAccount(
                CreateAccountOp::new(account(2), Amount::from_stroops(1_000_000_000)).expect("op"),
            )),
        ),
        (
            "payment",
            Operation::new(OperationBody::Payment(
                PaymentOp::new(account(2), usd.clone(), Amount::from_stroops(5)).expect("op"),
            ))
            .with_source(account(3)),
        ),
        (
            "path_payment_5_hops",
            Operation::new(OperationBody::PathPaymentStrictSend(
                PathPaymentStrictSendOp::new(
                    Asset::Native,
                    Amount::from_stroops(100),
                    account(2),
                    usd.clone(),
                    Amount::from_stroops(1),
                    vec![usd; 5],
                )
                .expect("op"),
            )),
        ),
    ]
}

fn bench_operations(c: &mut Criterion) {
    let mut group = c.benchmark_group("operation");
    for (name, op) in sample_operations() {
        let bytes = op.to_xdr().expect("encode");
        let b64 = op.to_xdr_base64().expect("encode");
        group.throughput(Throughput::Bytes(bytes.len() as u64));
        group.bench_with_input(BenchmarkId::new("encode", name), &op, |b, op| {
            b.iter(|| op.to_xdr());
        });
        group.bench_with_input(BenchmarkId::new("decode", name), &bytes, |b, bytes| {
            b.iter(|| Operation::from_xdr(bytes));
        });
        group.bench_with_input(BenchmarkId::new("decode_base64", name), &b64, |b, b64| {
            b.iter(|| Operation::from_xdr_base64(b64));
        });
    }
    group.finish();
}

fn bench_predicates(c: &mut Criterion) {
    let mut group = c.benchmark_group("claim_predicate");
    for depth in [1usize, 16, 128] {
        let mut predicate = ClaimPredicate::BeforeRelativeTime(60);
        for _ in 0..depth {
            predicate = ClaimPredicate::and(ClaimPredicate::Unconditional, ClaimPredicate::not(predicate));
        }
        let bytes = predicate.to_xdr().expect("encode");
        group.bench_with_input(BenchmarkId::new("decode", depth), &bytes, |b, bytes| {
            b.iter(|| ClaimPredicate::from_xdr(bytes));
        });
    }
    group.finish();
}

fn bench_auth_tree(c: &mut Criterion) {
    let contract = ScAddress::Contract(ContractId(Hash([7; 32])));
    let call = || {
        SorobanAuthorizedInvocation::new(SorobanAuthorizedFunction::ContractFn(
            InvokeContractArgs::new(contract, "transfer", vec![ScVal::I64(1), ScVal::Address(contract)])
                .expect("args"),
        ))
    };

    let mut group = c.benchmark_group("auth_tree");
    for width in [1usize, 8, 64] {
        let mut root = call();
        for _ in 0..width {
            root = root.with_sub_invocation(call().with_sub_invocation(call()));
        }
        let bytes = root.to_xdr().expect("encode");
        group.throughput(Throughput::Elements(width as u64 * 2 + 1));
        group.bench_with_input(BenchmarkId::new("round_trip", width), &bytes, |b, bytes| {
            b.iter(|| SorobanAuthorizedInvocation::from_xdr(bytes).and_then(|tree| tree.to_xdr()));
        });
    }
    group.finish();
}

fn bench_numeric(c: &mut Criterion) {
    c.bench_function("amount/to_stroops", |b| {
        b.iter(|| to_stroops("922337203685.4775807"));
    });
    c.bench_function("price/from_decimal", |b| {
        b.iter(|| Price::from_decimal_str("3.14159265358979"));
    });
}

criterion_group!(benches, bench_operations, bench_predicates, bench_auth_tree, bench_numeric);
criterion_main!(benches);
