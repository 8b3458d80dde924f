use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

use preauth_ledger::{
    EntityKind, EntityRecord, FormStatus, InMemoryEntityStore, PreAuthForm, PreAuthRegistry,
    Query, RecordKey, RegistryConfig, RegistryError, WriteRequest, WriteStage,
};

fn registry(seed: u64) -> PreAuthRegistry<InMemoryEntityStore, StdRng> {
    PreAuthRegistry::with_rng(
        InMemoryEntityStore::new(),
        RegistryConfig::default(),
        StdRng::seed_from_u64(seed),
    )
    .unwrap()
}

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

fn is_form_key(key: &RecordKey) -> bool {
    key.as_str()
        .strip_prefix("PA")
        .is_some_and(|n| !n.is_empty() && n.chars().all(|c| c.is_ascii_digit()))
}

#[test]
fn provider_form_scenario() {
    let mut reg = registry(1);
    let args = strings(&[
        "John Smith",
        "XYZ Capitol avenue NY",
        "22322",
        "112-223-22222",
        "112-223-22223",
        "Susan Smith",
    ]);

    let key = reg.write(None, &args).unwrap();
    assert!(is_form_key(&key), "unexpected key {key}");

    let bytes = reg.read(&Query::parse("direct", &[key.to_string()]).unwrap()).unwrap();
    let form: PreAuthForm = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(form.status, FormStatus::Submitted);
    assert_eq!(form.id, key);
    assert_eq!(EntityRecord::Provider(form.provider.unwrap()).into_fields(), args);
}

#[test]
fn typed_read_of_unwritten_key_is_not_found() {
    let reg = registry(2);
    let query = Query::parse("typed", &strings(&["readProvider", "PRO999"])).unwrap();
    let err = reg.read(&query).unwrap_err();
    assert!(matches!(
        err,
        RegistryError::NotFound { kind: EntityKind::Provider, .. }
    ));
}

#[test]
fn only_the_provider_length_completes() {
    let full: Vec<String> = (0..31).map(|i| format!("f{i}")).collect();
    let mut reg = registry(3);

    let key = reg.write(Some(EntityKind::PreAuth), &full[..6]).unwrap();
    let form = reg.fetch_form(&key).unwrap();
    assert_eq!(form.embedded_count(), 1);
    assert_eq!(
        EntityRecord::Provider(form.provider.unwrap()).into_fields(),
        full[..6].to_vec()
    );
    let stored = reg.store().len();

    for len in [10, 22, 31] {
        let err = reg.write(Some(EntityKind::PreAuth), &full[..len]).unwrap_err();
        assert!(
            matches!(
                err,
                RegistryError::OperationFailed { stage: WriteStage::SubRecordWrite, orphan: None, .. }
            ),
            "len {len}: {err}"
        );
        assert_eq!(reg.store().len(), stored);
    }
}

#[test]
fn named_operations_round_trip() {
    let mut reg = registry(4);
    reg.invoke("init", &strings(&["seed"])).unwrap();

    let member = strings(&["Ann Lee", "M-77", "1980-01-01", "2021-06-30"]);
    let key = match reg.invoke("writeMember", &member).unwrap() {
        preauth_ledger::Invocation::Written(key) => key,
        other => panic!("unexpected {other:?}"),
    };
    let bytes = reg.query("readMember", &[key.to_string()]).unwrap();
    let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(json["memid"], "M-77");

    let provider = strings(&["Clinic", "1 Main St", "10001", "555-0100", "555-0101", "Dr. Ray"]);
    let form_key = match reg.invoke("writePreAuth", &provider).unwrap() {
        preauth_ledger::Invocation::Written(key) => key,
        other => panic!("unexpected {other:?}"),
    };
    let form: PreAuthForm =
        serde_json::from_slice(&reg.query("readPreAuth", &[form_key.to_string()]).unwrap())
            .unwrap();
    assert_eq!(form.provider.unwrap().contact_person, "Dr. Ray");
    assert!(form.member.is_none());
}

#[test]
fn explicit_request_bypasses_arity_routing() {
    let mut reg = registry(5);
    let payer: Vec<String> = (0..9).map(|i| format!("p{i}")).collect();
    let key = reg
        .write_form(WriteRequest::tagged(EntityKind::Payer, &payer).unwrap())
        .unwrap();
    let form = reg.fetch_form(&key).unwrap();
    assert_eq!(form.payer.unwrap().comment, "p7");
}

fn field() -> impl Strategy<Value = String> {
    "[ -~]{0,24}"
}

proptest! {
    #[test]
    fn provider_forms_embed_inputs_in_order(
        args in prop::collection::vec(field(), 6),
        seed in any::<u64>(),
    ) {
        let mut reg = registry(seed);
        let key = reg.write(None, &args).unwrap();
        let form = reg.fetch_form(&key).unwrap();
        prop_assert_eq!(EntityRecord::Provider(form.provider.unwrap()).into_fields(), args);
    }

    #[test]
    fn sub_records_read_back_exactly(
        kind_index in 0usize..4,
        values in prop::collection::vec(field(), 12),
    ) {
        let kind = EntityKind::SUB_RECORDS[kind_index];
        let args = &values[..kind.arity().unwrap()];
        let mut reg = registry(11);
        let key = reg.write_subrecord(kind, args).unwrap();
        prop_assert_eq!(reg.read_entity(kind, &key).unwrap().into_fields(), args.to_vec());
    }

    #[test]
    fn mismatched_arity_never_mutates(
        kind_index in 0usize..4,
        len in 0usize..40,
    ) {
        let kind = EntityKind::SUB_RECORDS[kind_index];
        prop_assume!(len != kind.arity().unwrap());
        let args: Vec<String> = (0..len).map(|i| i.to_string()).collect();
        let mut reg = registry(12);
        let is_arity_error = matches!(reg.write_subrecord(kind, &args), Err(RegistryError::Arity(_)));
        prop_assert!(is_arity_error);
        prop_assert!(reg.store().is_empty());
    }

    #[test]
    fn composite_writes_other_than_provider_never_mutate(len in 0usize..64) {
        prop_assume!(len != 6);
        let args: Vec<String> = (0..len).map(|i| i.to_string()).collect();
        let mut reg = registry(13);
        prop_assert!(reg.write(None, &args).is_err());
        prop_assert!(reg.store().is_empty());
    }
}
