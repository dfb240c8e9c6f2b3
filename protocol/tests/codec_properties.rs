//! Codec properties, exercised end to end through the public API.
//!
//! Every operation kind, every ledger entry and key kind, and a spread of
//! config settings round-trip byte-exact. The numeric rules, balance-id
//! normalization, predicate shape checks, extension-chain absence and
//! retired-operation handling are each pinned by a test below.

use ledger_xdr::amount::{from_stroops, to_stroops, Amount, Price};
use ledger_xdr::config::Network;
use ledger_xdr::crypto::hash::Hash;
use ledger_xdr::crypto::keys::KeyPair;
use ledger_xdr::identity::{AccountId, ContractId, MuxedAccount, ScAddress, Signer, SignerKey};
use ledger_xdr::ledger::claim::{ClaimPredicate, ClaimableBalanceId, Claimant};
use ledger_xdr::ledger::config_setting::{
    ConfigSettingContractComputeV0, ConfigSettingEntry, ContractCostParamEntry, EvictionIterator,
    StateArchivalSettings,
};
use ledger_xdr::ledger::entry::{
    Liabilities, LedgerEntry, LedgerEntryData, TrustLineEntry, TrustLineEntryExtensionV2, TrustLineEntryV1,
};
use ledger_xdr::ledger::key::{ContractDataDurability, LedgerKey};
use ledger_xdr::ledger::{Asset, ChangeTrustAsset, ConfigSettingId, LiquidityPoolParameters, PoolId, TrustLineAsset};
use ledger_xdr::operation::account::SetOptionsOp;
use ledger_xdr::operation::*;
use ledger_xdr::soroban::{
    ContractExecutable, ContractIdPreimage, CreateContractArgs, HostFunction, InvokeContractArgs,
    SorobanAddressCredentials, SorobanAuthorizationEntry, SorobanAuthorizedFunction, SorobanAuthorizedInvocation,
    SorobanCredentials, ScVal,
};
use ledger_xdr::xdr::ExtensionPoint;
use ledger_xdr::{XdrCodec, XdrError};

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

fn alice() -> AccountId {
    KeyPair::from_seed(&[1; 32]).account_id()
}

fn bob() -> AccountId {
    KeyPair::from_seed(&[2; 32]).account_id()
}

fn usd() -> Asset {
    Asset::credit("USD", alice()).unwrap()
}

fn long_code() -> Asset {
    Asset::credit("LONGCODE1234", bob()).unwrap()
}

fn contract() -> ScAddress {
    ScAddress::Contract(ContractId(Hash([0xC0; 32])))
}

fn assert_round_trip<T: XdrCodec + PartialEq + std::fmt::Debug>(value: &T) {
    let bytes = value.to_xdr().unwrap();
    assert_eq!(bytes.len() % 4, 0, "wire form must stay 4-byte aligned");
    assert_eq!(&T::from_xdr(&bytes).unwrap(), value);
    let b64 = value.to_xdr_base64().unwrap();
    assert_eq!(&T::from_xdr_base64(&b64).unwrap(), value);
}

fn every_operation_body() -> Vec<OperationBody> {
    let pool = LiquidityPoolParameters::new(Asset::Native, usd()).unwrap();
    let balance = ClaimableBalanceId(Hash([0xBA; 32]));
    let invoke = InvokeContractArgs::new(contract(), "hello", vec![ScVal::symbol("world").unwrap()]).unwrap();
    vec![
        OperationBody::CreateAccount(CreateAccountOp::new(bob(), Amount::parse("100").unwrap()).unwrap()),
        OperationBody::Payment(PaymentOp::new(bob(), usd(), Amount::MAX).unwrap()),
        OperationBody::PathPaymentStrictReceive(
            PathPaymentStrictReceiveOp::new(
                Asset::Native,
                Amount::from_stroops(1),
                MuxedAccount::MuxedEd25519 { id: u64::MAX, account: bob() },
                usd(),
                Amount::from_stroops(1),
                vec![long_code(); 5],
            )
            .unwrap(),
        ),
        OperationBody::ManageSellOffer(
            ManageSellOfferOp::update(usd(), Asset::Native, Amount::ZERO, Price::new(i32::MAX, 1).unwrap(), 12)
                .unwrap(),
        ),
        OperationBody::CreatePassiveSellOffer(
            CreatePassiveSellOfferOp::new(Asset::Native, long_code(), Amount::from_stroops(7), Price::new(0, 1).unwrap())
                .unwrap(),
        ),
        OperationBody::SetOptions(SetOptionsOp {
            home_domain: Some(String::new()),
            signer: Some(Signer::new(SignerKey::signed_payload(alice(), vec![9; 64]).unwrap(), 0).unwrap()),
            ..Default::default()
        }),
        OperationBody::ChangeTrust(ChangeTrustOp::new(ChangeTrustAsset::PoolShare(pool.clone())).unwrap()),
        OperationBody::AccountMerge(bob().into()),
        OperationBody::ManageData(ManageDataOp::new("key", Some(b"value".to_vec())).unwrap()),
        OperationBody::BumpSequence(BumpSequenceOp::new(i64::MAX).unwrap()),
        OperationBody::ManageBuyOffer(
            ManageBuyOfferOp::new(Asset::Native, usd(), Amount::from_stroops(1), "0.5".parse().unwrap()).unwrap(),
        ),
        OperationBody::PathPaymentStrictSend(
            PathPaymentStrictSendOp::new(usd(), Amount::from_stroops(9), alice(), usd(), Amount::from_stroops(8), vec![])
                .unwrap(),
        ),
        OperationBody::CreateClaimableBalance(
            CreateClaimableBalanceOp::new(
                usd(),
                Amount::from_stroops(1),
                vec![
                    Claimant::unconditional(alice()),
                    Claimant::new(bob(), ClaimPredicate::not(ClaimPredicate::BeforeAbsoluteTime(0))),
                ],
            )
            .unwrap(),
        ),
        OperationBody::ClaimClaimableBalance(ClaimClaimableBalanceOp { balance_id: balance }),
        OperationBody::BeginSponsoringFutureReserves(BeginSponsoringFutureReservesOp { sponsored_id: bob() }),
        OperationBody::EndSponsoringFutureReserves,
        OperationBody::RevokeSponsorship(RevokeSponsorshipOp::LedgerEntry(
            LedgerKey::data(alice(), "key").unwrap(),
        )),
        OperationBody::Clawback(ClawbackOp::new(usd(), bob(), Amount::from_stroops(3)).unwrap()),
        OperationBody::ClawbackClaimableBalance(ClawbackClaimableBalanceOp { balance_id: balance }),
        OperationBody::SetTrustLineFlags(
            SetTrustLineFlagsOp::new(bob(), usd(), 0, trust::flags::AUTHORIZED).unwrap(),
        ),
        OperationBody::LiquidityPoolDeposit(
            LiquidityPoolDepositOp::new(
                pool.pool_id().unwrap(),
                Amount::from_stroops(10),
                Amount::from_stroops(20),
                Price::new(1, 2).unwrap(),
                Price::new(2, 1).unwrap(),
            )
            .unwrap(),
        ),
        OperationBody::LiquidityPoolWithdraw(
            LiquidityPoolWithdrawOp::new(pool.pool_id().unwrap(), Amount::from_stroops(5), Amount::ZERO, Amount::ZERO)
                .unwrap(),
        ),
        OperationBody::InvokeHostFunction(InvokeHostFunctionOp::new(HostFunction::InvokeContract(invoke))),
        OperationBody::ExtendFootprintTtl(ExtendFootprintTtlOp::new(1).unwrap()),
        OperationBody::RestoreFootprint(RestoreFootprintOp::default()),
    ]
}

// ---------------------------------------------------------------------------
// Round trips
// ---------------------------------------------------------------------------

#[test]
fn every_supported_operation_round_trips() {
    let bodies = every_operation_body();
    let retired = OperationType::VARIANTS.iter().filter(|k| k.is_retired()).count();
    assert_eq!(bodies.len() + retired, OperationType::VARIANTS.len());

    for body in bodies {
        assert_round_trip(&Operation::new(body.clone()));
        assert_round_trip(&Operation::new(body).with_source(alice()));
    }
}

#[test]
fn operations_survive_json() {
    for body in every_operation_body() {
        let op = Operation::new(body).with_source(MuxedAccount::MuxedEd25519 { id: 1, account: alice() });
        let json = serde_json::to_string(&op).unwrap();
        assert_eq!(serde_json::from_str::<Operation>(&json).unwrap(), op);
    }
}

#[test]
fn config_settings_round_trip() {
    let settings = vec![
        ConfigSettingEntry::ContractMaxSizeBytes(0),
        ConfigSettingEntry::ContractMaxSizeBytes(u32::MAX),
        ConfigSettingEntry::ContractComputeV0(ConfigSettingContractComputeV0::default()),
        ConfigSettingEntry::ContractCostParamsCpuInstructions(vec![
            ContractCostParamEntry {
                ext: ExtensionPoint,
                const_term: i64::MIN,
                linear_term: i64::MAX,
            };
            3
        ]),
        ConfigSettingEntry::StateArchival(StateArchivalSettings::default()),
        ConfigSettingEntry::BucketListSizeWindow(vec![1, 2, 3]),
        ConfigSettingEntry::EvictionIterator(EvictionIterator::default()),
    ];
    for setting in settings {
        assert_round_trip(&setting);
        let entry = LedgerEntry::new(7, LedgerEntryData::ConfigSetting(setting.clone()));
        assert_round_trip(&entry);
        assert_eq!(entry.ledger_key(), LedgerKey::config_setting(setting.id()));
    }
}

#[test]
fn ledger_keys_round_trip() {
    let keys = vec![
        LedgerKey::account(alice()),
        LedgerKey::trustline(alice(), TrustLineAsset::from(long_code())),
        LedgerKey::offer(bob(), 0),
        LedgerKey::data(bob(), "x".repeat(64)).unwrap(),
        LedgerKey::claimable_balance(ClaimableBalanceId(Hash([1; 32]))),
        LedgerKey::liquidity_pool(PoolId(Hash([2; 32]))),
        LedgerKey::contract_data(contract(), ScVal::LedgerKeyNonce(-1), ContractDataDurability::Temporary),
        LedgerKey::contract_code(Hash([3; 32])),
        LedgerKey::config_setting(ConfigSettingId::ScpTiming),
        LedgerKey::ttl(Hash([4; 32])),
    ];
    for key in keys {
        assert_round_trip(&key);
    }
}

// ---------------------------------------------------------------------------
// Amounts and prices
// ---------------------------------------------------------------------------

#[test]
fn amount_precision_rules() {
    assert_eq!(to_stroops("100.1234567").unwrap(), 1_001_234_567);
    assert!(matches!(to_stroops("100.12345678"), Err(XdrError::Precision(_))));
    assert!(matches!(to_stroops("922337203685.4775808"), Err(XdrError::Precision(_))));
    assert_eq!(to_stroops("922337203685.4775807").unwrap(), i64::MAX);

    for (input, canonical) in [
        ("100", "100.0000000"),
        ("0.1", "0.1000000"),
        ("-5.0000001", "-5.0000001"),
        (".5", "0.5000000"),
        ("007", "7.0000000"),
    ] {
        assert_eq!(from_stroops(to_stroops(input).unwrap()), canonical, "{}", input);
    }
}

#[test]
fn price_approximation() {
    assert_eq!(Price::from_decimal_str("1.25").unwrap(), Price { n: 5, d: 4 });
    assert_eq!(Price::from_decimal_str("2").unwrap(), Price { n: 2, d: 1 });

    let x = 3.141_592_653_589_79_f64;
    let p = Price::from_decimal_str("3.14159265358979").unwrap();
    assert!(p.n > 0 && p.d > 0);
    assert!((p.as_f64() - x).abs() < 1e-12);

    let third = Price::from_decimal_str("0.333333333333333").unwrap();
    assert!((third.as_f64() - 1.0 / 3.0).abs() < 1e-9);
}

// ---------------------------------------------------------------------------
// Structural rules
// ---------------------------------------------------------------------------

#[test]
fn legacy_balance_id_normalizes() {
    let hash = [0x5A; 32];
    let mut expanded = vec![0, 0, 0, 0];
    expanded.extend_from_slice(&hash);
    let legacy = ClaimableBalanceId::from_bytes(&hash).unwrap();
    let full = ClaimableBalanceId::from_bytes(&expanded).unwrap();
    assert_eq!(legacy, full);
    assert_eq!(ClaimableBalanceId::from_xdr(&expanded).unwrap(), legacy);
    assert_eq!(legacy.to_xdr().unwrap(), expanded);
}

#[test]
fn binary_predicates_need_two_children() {
    let one_child = [0, 0, 0, 1, 0, 0, 0, 1, 0, 0, 0, 0];
    let three_children = [0, 0, 0, 2, 0, 0, 0, 3, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0];
    for bytes in [&one_child[..], &three_children[..]] {
        assert!(matches!(
            ClaimPredicate::from_xdr(bytes),
            Err(XdrError::Malformed { kind: "ClaimPredicate", .. })
        ));
    }

    let p = ClaimPredicate::or(
        ClaimPredicate::Unconditional,
        ClaimPredicate::not(ClaimPredicate::Unconditional),
    );
    assert_eq!(
        p.to_xdr().unwrap(),
        vec![0, 0, 0, 2, 0, 0, 0, 2, 0, 0, 0, 0, 0, 0, 0, 3, 0, 0, 0, 1, 0, 0, 0, 0]
    );
    assert_round_trip(&p);
}

#[test]
fn v1_only_trust_line_leaves_v2_absent() {
    let entry = LedgerEntry::new(
        10,
        LedgerEntryData::Trustline(TrustLineEntry {
            account_id: alice(),
            asset: TrustLineAsset::from(usd()),
            balance: Amount::from_stroops(5),
            limit: Amount::MAX,
            flags: 1,
            ext: Some(TrustLineEntryV1 {
                liabilities: Liabilities::default(),
                ext: None,
            }),
        }),
    );
    let bytes = entry.to_xdr().unwrap();
    // ... V1 tag, liabilities, V2 tag = 0, then the entry's own ext = 0
    let tail = &bytes[bytes.len() - 28..];
    assert_eq!(&tail[..4], &[0, 0, 0, 1]);
    assert_eq!(&tail[20..], &[0, 0, 0, 0, 0, 0, 0, 0]);

    let LedgerEntryData::Trustline(back) = LedgerEntry::from_xdr(&bytes).unwrap().data else {
        panic!("expected a trust line");
    };
    assert!(back.ext.unwrap().ext.is_none());

    let with_v2 = TrustLineEntryV1 {
        liabilities: Liabilities::default(),
        ext: Some(TrustLineEntryExtensionV2 {
            liquidity_pool_use_count: 2,
            ext: ExtensionPoint,
        }),
    };
    assert_round_trip(&with_v2);
}

#[test]
fn retired_operations_are_unsupported() {
    for kind in [7u8, 9] {
        let body = [0, 0, 0, kind, 0, 0, 0, 0];
        assert!(matches!(OperationBody::from_xdr(&body), Err(XdrError::Unsupported(_))));
    }
}

#[test]
fn trailing_bytes_are_rejected() {
    let mut bytes = Operation::new(OperationBody::EndSponsoringFutureReserves).to_xdr().unwrap();
    bytes.extend_from_slice(&[0, 0, 0, 0]);
    assert!(matches!(Operation::from_xdr(&bytes), Err(XdrError::TrailingBytes(4))));
}

#[test]
fn create_account_end_to_end() {
    let destination = bob();
    let op = Operation::new(OperationBody::CreateAccount(
        CreateAccountOp::new(destination, "100".parse().unwrap()).unwrap(),
    ));
    let decoded = Operation::from_xdr_base64(&op.to_xdr_base64().unwrap()).unwrap();
    let OperationBody::CreateAccount(ref body) = decoded.body else {
        panic!("expected create account");
    };
    assert_eq!(body.destination, destination);
    assert_eq!(body.starting_balance.to_string(), from_stroops(1_000_000_000));
    assert_eq!(body.starting_balance.to_string(), "100.0000000");
    assert_eq!(decoded.threshold(), ThresholdLevel::Medium);
}

// ---------------------------------------------------------------------------
// Contracts
// ---------------------------------------------------------------------------

#[test]
fn signed_authorization_entry_round_trips() {
    let key = KeyPair::from_seed(&[3; 32]);
    let create = CreateContractArgs {
        contract_id_preimage: ContractIdPreimage::from_address(key.account_id().into(), [0x11; 32]),
        executable: ContractExecutable::Wasm(Hash([0x22; 32])),
    };
    let mut entry = SorobanAuthorizationEntry {
        credentials: SorobanCredentials::Address(SorobanAddressCredentials {
            address: key.account_id().into(),
            nonce: i64::MIN,
            signature_expiration_ledger: 0,
            signature: ScVal::Void,
        }),
        root_invocation: SorobanAuthorizedInvocation::new(SorobanAuthorizedFunction::CreateContractHostFn(
            create.clone(),
        )),
    };
    entry.sign(&key, u32::MAX, &Network::Futurenet).unwrap();
    assert_round_trip(&entry);

    let op = Operation::new(OperationBody::InvokeHostFunction(
        InvokeHostFunctionOp::new(HostFunction::CreateContract(create)).with_auth(vec![entry]),
    ));
    assert_round_trip(&op);
}
