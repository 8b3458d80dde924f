//! Read-side routing.

use std::fmt;

use rand::RngCore;

use preauth_store::EntityStore;
use preauth_types::{EntityKind, EntityRecord, PreAuthForm, RecordKey};

use crate::error::{RegistryError, RegistryResult};
use crate::registry::PreAuthRegistry;
use crate::subrecord::decode;

/// A read request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Query {
    /// Composite form lookup by key alone.
    Direct(RecordKey),
    /// Sub-record lookup by explicit kind and key.
    Typed(EntityKind, RecordKey),
}

impl Query {
    /// Parse an explicit mode (`direct` or `typed`) and its arguments.
    pub fn parse(mode: &str, args: &[String]) -> RegistryResult<Self> {
        match (mode, args) {
            ("direct", [key]) => Ok(Self::Direct(RecordKey::from(key.as_str()))),
            ("typed", [tag, key]) => Ok(Self::Typed(
                tag.parse()?,
                RecordKey::from(key.as_str()),
            )),
            ("direct" | "typed", _) => Err(RegistryError::InvalidRequest(format!(
                "{mode} read does not take {} argument(s)",
                args.len()
            ))),
            _ => Err(RegistryError::InvalidRequest(format!("unknown read mode: {mode}"))),
        }
    }

    /// Infer the mode from the argument shape: one key is direct, a tag and a
    /// key is typed.
    pub fn from_args(args: &[String]) -> RegistryResult<Self> {
        match args {
            [_] => Self::parse("direct", args),
            [_, _] => Self::parse("typed", args),
            _ => Err(RegistryError::InvalidRequest(format!(
                "expected a key or a tag and a key, got {} argument(s)",
                args.len()
            ))),
        }
    }

    pub fn key(&self) -> &RecordKey {
        match self {
            Self::Direct(key) | Self::Typed(_, key) => key,
        }
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Direct(key) => write!(f, "direct {key}"),
            Self::Typed(kind, key) => write!(f, "typed {kind} {key}"),
        }
    }
}

impl<S: EntityStore, R: RngCore> PreAuthRegistry<S, R> {
    /// Entry point for all reads; returns the stored bytes.
    ///
    /// The bytes are returned exactly as stored, after checking they decode
    /// as the expected schema. A typed query for the composite kind is the
    /// same as a direct one.
    pub fn read(&self, query: &Query) -> RegistryResult<Vec<u8>> {
        match query {
            Query::Direct(key) | Query::Typed(EntityKind::PreAuth, key) => {
                let bytes = self.fetch(EntityKind::PreAuth, key)?;
                decode::<PreAuthForm>(EntityKind::PreAuth, key, &bytes)?;
                Ok(bytes)
            }
            Query::Typed(kind, key) => {
                let bytes = self.fetch(*kind, key)?;
                EntityRecord::from_json(*kind, &bytes).map_err(|e| {
                    RegistryError::Decode {
                        kind: *kind,
                        key: key.clone(),
                        reason: e.to_string(),
                    }
                })?;
                Ok(bytes)
            }
        }
    }

    /// Route a read by argument shape (see [`Query::from_args`]).
    pub fn read_args(&self, args: &[String]) -> RegistryResult<Vec<u8>> {
        self.read(&Query::from_args(args)?)
    }

    /// Fetch and decode a composite form.
    pub fn fetch_form(&self, key: &RecordKey) -> RegistryResult<PreAuthForm> {
        let bytes = self.fetch(EntityKind::PreAuth, key)?;
        decode(EntityKind::PreAuth, key, &bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{registry, strings};
    use preauth_store::InMemoryEntityStore;

    #[test]
    fn parse_modes() {
        assert_eq!(
            Query::parse("direct", &strings(&["PA1"])).unwrap(),
            Query::Direct(RecordKey::from("PA1"))
        );
        assert_eq!(
            Query::parse("typed", &strings(&["readMember", "MEM2"])).unwrap(),
            Query::Typed(EntityKind::Member, RecordKey::from("MEM2"))
        );
    }

    #[test]
    fn bad_shapes_are_invalid_requests() {
        for (mode, args) in [
            ("direct", strings(&[])),
            ("direct", strings(&["a", "b"])),
            ("typed", strings(&["provider"])),
            ("scan", strings(&["a"])),
        ] {
            assert!(matches!(
                Query::parse(mode, &args),
                Err(RegistryError::InvalidRequest(_))
            ));
        }
        assert!(matches!(
            Query::from_args(&strings(&["a", "b", "c"])),
            Err(RegistryError::InvalidRequest(_))
        ));
        assert!(matches!(
            Query::parse("typed", &strings(&["claim", "k"])),
            Err(RegistryError::InvalidRequest(_))
        ));
    }

    #[test]
    fn from_args_infers_mode() {
        assert!(matches!(
            Query::from_args(&strings(&["PA1"])).unwrap(),
            Query::Direct(_)
        ));
        assert!(matches!(
            Query::from_args(&strings(&["payer", "PYR1"])).unwrap(),
            Query::Typed(EntityKind::Payer, _)
        ));
    }

    #[test]
    fn direct_read_rejects_sub_record_bytes() {
        let mut reg = registry(InMemoryEntityStore::new());
        reg.init(&strings(&["init"])).unwrap();
        let err = reg.read(&Query::Direct(RecordKey::from("PR001"))).unwrap_err();
        assert!(matches!(err, RegistryError::Decode { kind: EntityKind::PreAuth, .. }));
    }

    #[test]
    fn typed_read_of_missing_key_is_not_found() {
        let reg = registry(InMemoryEntityStore::new());
        let err = reg
            .read(&Query::Typed(EntityKind::Provider, RecordKey::from("PRO404")))
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn reads_are_repeatable() {
        let mut reg = registry(InMemoryEntityStore::new());
        let key = reg
            .write(None, &strings(&["a", "b", "c", "d", "e", "f"]))
            .unwrap();
        let query = Query::Direct(key);
        let first = reg.read(&query).unwrap();
        assert_eq!(reg.read(&query).unwrap(), first);
        assert_eq!(reg.read_args(&strings(&[query.key().as_str()])).unwrap(), first);
    }

    #[test]
    fn typed_preauth_is_direct() {
        let mut reg = registry(InMemoryEntityStore::new());
        let key = reg
            .write(None, &strings(&["a", "b", "c", "d", "e", "f"]))
            .unwrap();
        let typed = reg.read(&Query::Typed(EntityKind::PreAuth, key.clone())).unwrap();
        assert_eq!(typed, reg.read(&Query::Direct(key)).unwrap());
    }
}
