use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// Entity-type tag for everything persisted in the entity store.
///
/// The tag determines the key prefix, the range the key generator draws its
/// numeric suffix from, and the schema used to decode stored bytes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EntityKind {
    Provider,
    Member,
    Service,
    Payer,
    /// The composite pre-authorization form.
    PreAuth,
}

impl EntityKind {
    /// The four sub-record kinds, in composite-layout order.
    pub const SUB_RECORDS: [EntityKind; 4] = [
        EntityKind::Provider,
        EntityKind::Member,
        EntityKind::Service,
        EntityKind::Payer,
    ];

    /// Key prefix written in front of the generated numeric suffix.
    pub fn key_prefix(self) -> &'static str {
        match self {
            Self::Provider => "PRO",
            Self::Member => "MEM",
            Self::Service => "SRV",
            Self::Payer => "PYR",
            Self::PreAuth => "PA",
        }
    }

    /// Default exclusive upper bound of the numeric key suffix.
    pub fn default_key_range(self) -> u32 {
        match self {
            Self::PreAuth => 10_000_000,
            _ => 1_000,
        }
    }

    /// Expected positional field count, `None` for the composite form.
    pub fn arity(self) -> Option<usize> {
        use crate::records::{Member, Payer, Provider, Service, SubRecord};
        match self {
            Self::Provider => Some(Provider::ARITY),
            Self::Member => Some(Member::ARITY),
            Self::Service => Some(Service::ARITY),
            Self::Payer => Some(Payer::ARITY),
            Self::PreAuth => None,
        }
    }

    pub fn is_sub_record(self) -> bool {
        !matches!(self, Self::PreAuth)
    }

    /// Lowercase name used on the command line and in logs.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Provider => "provider",
            Self::Member => "member",
            Self::Service => "service",
            Self::Payer => "payer",
            Self::PreAuth => "preauth",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parses a kind from its name or from an operation name.
///
/// Accepts `provider`, `Provider`, `writeProvider`, `readProvider` and the
/// same forms for every other kind. Matching is case-insensitive.
impl FromStr for EntityKind {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        let name = lower
            .strip_prefix("write")
            .or_else(|| lower.strip_prefix("read"))
            .unwrap_or(lower.as_str());
        match name {
            "provider" => Ok(Self::Provider),
            "member" => Ok(Self::Member),
            "service" => Ok(Self::Service),
            "payer" => Ok(Self::Payer),
            "preauth" => Ok(Self::PreAuth),
            _ => Err(TypeError::UnknownEntity(s.to_string())),
        }
    }
}

/// Textual key of a record in the entity store.
///
/// Generated keys are `prefix + decimal suffix` (`PRO42`, `PA1234567`). The
/// prefix only hints at the record's kind; the store does not enforce it.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordKey(String);

impl RecordKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// Build a generated key from a kind prefix and numeric suffix.
    pub fn generated(kind: EntityKind, suffix: u32) -> Self {
        Self(format!("{}{suffix}", kind.key_prefix()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }

    /// The kind suggested by the key prefix, if any.
    ///
    /// Seeded demonstration keys use the shorter `PR` family and are
    /// recognized as providers too.
    pub fn kind_hint(&self) -> Option<EntityKind> {
        let key = self.0.as_str();
        if key.starts_with("PYR") {
            Some(EntityKind::Payer)
        } else if key.starts_with("PA") {
            Some(EntityKind::PreAuth)
        } else if key.starts_with("PR") {
            Some(EntityKind::Provider)
        } else if key.starts_with("MEM") {
            Some(EntityKind::Member)
        } else if key.starts_with("SRV") {
            Some(EntityKind::Service)
        } else {
            None
        }
    }
}

impl fmt::Display for RecordKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for RecordKey {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for RecordKey {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl AsRef<str> for RecordKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_and_operation_names() {
        assert_eq!("provider".parse::<EntityKind>().unwrap(), EntityKind::Provider);
        assert_eq!("Member".parse::<EntityKind>().unwrap(), EntityKind::Member);
        assert_eq!("writeService".parse::<EntityKind>().unwrap(), EntityKind::Service);
        assert_eq!("readPayer".parse::<EntityKind>().unwrap(), EntityKind::Payer);
        assert_eq!("writePreAuth".parse::<EntityKind>().unwrap(), EntityKind::PreAuth);
    }

    #[test]
    fn rejects_unknown_tag() {
        let err = "writeClaim".parse::<EntityKind>().unwrap_err();
        assert_eq!(err, TypeError::UnknownEntity("writeClaim".into()));
    }

    #[test]
    fn sub_records_have_small_range() {
        for kind in EntityKind::SUB_RECORDS {
            assert_eq!(kind.default_key_range(), 1_000);
            assert!(kind.arity().is_some());
        }
        assert_eq!(EntityKind::PreAuth.default_key_range(), 10_000_000);
        assert_eq!(EntityKind::PreAuth.arity(), None);
    }

    #[test]
    fn generated_key_format() {
        let key = RecordKey::generated(EntityKind::Member, 17);
        assert_eq!(key.as_str(), "MEM17");
        assert_eq!(key.kind_hint(), Some(EntityKind::Member));
    }

    #[test]
    fn kind_hint_distinguishes_p_prefixes() {
        assert_eq!(RecordKey::from("PYR3").kind_hint(), Some(EntityKind::Payer));
        assert_eq!(RecordKey::from("PA9912").kind_hint(), Some(EntityKind::PreAuth));
        assert_eq!(RecordKey::from("PRO5").kind_hint(), Some(EntityKind::Provider));
        assert_eq!(RecordKey::from("PR001").kind_hint(), Some(EntityKind::Provider));
        assert_eq!(RecordKey::from("XYZ1").kind_hint(), None);
    }

    #[test]
    fn key_serializes_as_plain_string() {
        let key = RecordKey::from("SRV12");
        assert_eq!(serde_json::to_string(&key).unwrap(), "\"SRV12\"");
    }
}
