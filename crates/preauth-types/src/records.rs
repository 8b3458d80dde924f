//! Fixed-arity sub-records.
//!
//! Each sub-record is a flat struct of text fields. Field order is fixed and
//! doubles as the positional argument order accepted by [`SubRecord::from_fields`].
//! JSON field names are the persisted layout and must not change.

use std::fmt::Debug;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::TypeError;
use crate::kind::EntityKind;

/// A leaf entity persisted independently and embedded into composite forms.
pub trait SubRecord:
    Clone + Debug + PartialEq + Serialize + DeserializeOwned + Into<EntityRecord>
{
    /// Entity tag of this schema.
    const KIND: EntityKind;
    /// Number of positional fields.
    const ARITY: usize;
    /// Persisted JSON field names in declared order.
    const FIELD_NAMES: &'static [&'static str];

    /// Build the record positionally. Fails unless `fields.len() == ARITY`.
    fn from_fields(fields: &[String]) -> Result<Self, TypeError>;

    /// Field values in declared order.
    fn into_fields(self) -> Vec<String>;
}

fn check_arity(kind: EntityKind, expected: usize, actual: usize) -> Result<(), TypeError> {
    if expected == actual {
        Ok(())
    } else {
        Err(TypeError::Arity {
            kind,
            expected,
            actual,
        })
    }
}

macro_rules! sub_record {
    (
        $(#[$meta:meta])*
        $name:ident => $kind:expr, {
            $( $(#[$fmeta:meta])* $field:ident => $json:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
        pub struct $name {
            $(
                $(#[$fmeta])*
                #[serde(rename = $json)]
                pub $field: String,
            )+
        }

        impl SubRecord for $name {
            const KIND: EntityKind = $kind;
            const ARITY: usize = [$( $json ),+].len();
            const FIELD_NAMES: &'static [&'static str] = &[$( $json ),+];

            fn from_fields(fields: &[String]) -> Result<Self, TypeError> {
                check_arity(Self::KIND, Self::ARITY, fields.len())?;
                let mut values = fields.iter().cloned();
                Ok(Self {
                    $( $field: values.next().unwrap_or_default(), )+
                })
            }

            fn into_fields(self) -> Vec<String> {
                vec![$( self.$field ),+]
            }
        }

        impl From<$name> for EntityRecord {
            fn from(record: $name) -> Self {
                EntityRecord::$name(record)
            }
        }
    };
}

sub_record! {
    /// The requesting healthcare provider.
    Provider => EntityKind::Provider, {
        name => "providername",
        address => "provideraddr",
        city_zip => "providercityzip",
        phone => "providerphone",
        fax => "providerfax",
        contact_person => "providercontactperson",
    }
}

sub_record! {
    /// The insured member the request is for.
    Member => EntityKind::Member, {
        name => "memname",
        member_id => "memid",
        /// Date of birth.
        date_of_birth => "memdob",
        /// Date of registration.
        date_of_registration => "memdor",
    }
}

sub_record! {
    /// The requested service and its clinical context.
    Service => EntityKind::Service, {
        requested => "srvrequested",
        date_of_service => "srvdos",
        diagnosis => "srvdiagnosis",
        cpt_code => "srvcptcode",
        icd_code => "srvicdcode",
        facility => "srvproviderfacility",
        phone => "srvphone",
        address => "srvaddr",
        city_zip => "srvcityzip",
        procedure => "srvprocedure",
        other_procedure => "srvprocothertxt",
        clinical_info => "srvclinicalinfo",
    }
}

sub_record! {
    /// The payer's authorization decision.
    Payer => EntityKind::Payer, {
        /// Length of stay.
        length_of_stay => "payerLOS",
        provider_tin => "payerProvTIN",
        date_of_service => "payerDOS",
        billing_tin => "payerBillTIN",
        amount_authorized => "payerAmtAuth",
        diagnosis => "payerDiag",
        allowed_procedure => "payerAllowedProc",
        comment => "payerComment",
        /// Additional documentation required flag, kept as text.
        additional_doc_required => "payerAddDocReqd",
    }
}

/// A sub-record of any kind.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntityRecord {
    Provider(Provider),
    Member(Member),
    Service(Service),
    Payer(Payer),
}

impl EntityRecord {
    /// Build the record named by `kind` positionally from `fields`.
    pub fn from_fields(kind: EntityKind, fields: &[String]) -> Result<Self, TypeError> {
        match kind {
            EntityKind::Provider => Provider::from_fields(fields).map(Self::Provider),
            EntityKind::Member => Member::from_fields(fields).map(Self::Member),
            EntityKind::Service => Service::from_fields(fields).map(Self::Service),
            EntityKind::Payer => Payer::from_fields(fields).map(Self::Payer),
            EntityKind::PreAuth => Err(TypeError::UnknownEntity(format!(
                "{kind} is not a sub-record"
            ))),
        }
    }

    /// Decode stored JSON as the schema named by `kind`.
    pub fn from_json(kind: EntityKind, bytes: &[u8]) -> Result<Self, serde_json::Error> {
        match kind {
            EntityKind::Provider => serde_json::from_slice(bytes).map(Self::Provider),
            EntityKind::Member => serde_json::from_slice(bytes).map(Self::Member),
            EntityKind::Service => serde_json::from_slice(bytes).map(Self::Service),
            EntityKind::Payer => serde_json::from_slice(bytes).map(Self::Payer),
            EntityKind::PreAuth => Err(serde::de::Error::custom(
                "composite form is not a sub-record",
            )),
        }
    }

    /// Encode the inner record in its persisted layout (no enum wrapper).
    pub fn to_json(&self) -> Result<Vec<u8>, serde_json::Error> {
        match self {
            Self::Provider(r) => serde_json::to_vec(r),
            Self::Member(r) => serde_json::to_vec(r),
            Self::Service(r) => serde_json::to_vec(r),
            Self::Payer(r) => serde_json::to_vec(r),
        }
    }

    pub fn kind(&self) -> EntityKind {
        match self {
            Self::Provider(_) => EntityKind::Provider,
            Self::Member(_) => EntityKind::Member,
            Self::Service(_) => EntityKind::Service,
            Self::Payer(_) => EntityKind::Payer,
        }
    }

    /// Field values in declared order.
    pub fn into_fields(self) -> Vec<String> {
        match self {
            Self::Provider(r) => r.into_fields(),
            Self::Member(r) => r.into_fields(),
            Self::Service(r) => r.into_fields(),
            Self::Payer(r) => r.into_fields(),
        }
    }
}
