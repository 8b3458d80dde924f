use std::fmt;

use serde::{Deserialize, Serialize};

use crate::kind::RecordKey;
use crate::records::{EntityRecord, Member, Payer, Provider, Service};

/// Lifecycle status of a composite form.
///
/// Forms are created once and never updated, so `Submitted` is the only
/// state this module ever writes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FormStatus {
    #[default]
    Submitted,
}

impl fmt::Display for FormStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Submitted => write!(f, "Submitted"),
        }
    }
}

/// The composite pre-authorization form.
///
/// Embedded sub-records are point-in-time copies of what was read back from
/// the store, not references. Slots not filled by this form are `None` and
/// persist as `null`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreAuthForm {
    #[serde(rename = "preauthid")]
    pub id: RecordKey,
    #[serde(rename = "preauthstatus")]
    pub status: FormStatus,
    #[serde(rename = "Provider", default)]
    pub provider: Option<Provider>,
    #[serde(rename = "Member", default)]
    pub member: Option<Member>,
    #[serde(rename = "Service", default)]
    pub service: Option<Service>,
    #[serde(rename = "Payer", default)]
    pub payer: Option<Payer>,
}

impl PreAuthForm {
    /// A fresh, empty form in `Submitted` status.
    pub fn new(id: RecordKey) -> Self {
        Self {
            id,
            status: FormStatus::Submitted,
            provider: None,
            member: None,
            service: None,
            payer: None,
        }
    }

    /// Copy `record` into the slot for its kind, replacing any previous value.
    pub fn embed(&mut self, record: EntityRecord) {
        match record {
            EntityRecord::Provider(r) => self.provider = Some(r),
            EntityRecord::Member(r) => self.member = Some(r),
            EntityRecord::Service(r) => self.service = Some(r),
            EntityRecord::Payer(r) => self.payer = Some(r),
        }
    }

    /// Number of filled sub-record slots.
    pub fn embedded_count(&self) -> usize {
        [
            self.provider.is_some(),
            self.member.is_some(),
            self.service.is_some(),
            self.payer.is_some(),
        ]
        .iter()
        .filter(|filled| **filled)
        .count()
    }
}
