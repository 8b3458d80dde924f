//! The registry facade: construction, seeding, and operation-name dispatch.

use rand::rngs::StdRng;
use rand::RngCore;
use tracing::info;

use preauth_store::EntityStore;
use preauth_types::{EntityKind, Provider, RecordKey, SubRecord};

use crate::config::RegistryConfig;
use crate::error::{RegistryError, RegistryResult};
use crate::keys::KeyGenerator;
use crate::query::Query;

/// Demonstration providers written by [`PreAuthRegistry::init`].
const DEMO_PROVIDERS: [(&str, [&str; 6]); 4] = [
    (
        "PR001",
        ["John Smith", "XYZ Capitol avenue NY", "22322", "112-223-22222", "112-223-22223", "Susan Smith"],
    ),
    (
        "PR002",
        ["Steven Foss", "ABC Capitol avenue NY", "22321", "112-223-33333", "112-223-33334", "Susan Smith"],
    ),
    (
        "PR003",
        ["Tad Harison", "ABC Capitol avenue NY", "22323", "112-223-33344", "112-223-33345", "Robert Smith"],
    ),
    (
        "PR004",
        ["Albert", "ABC Capitol avenue NY", "22323", "112-223-33355", "112-223-33356", "Robert Smith"],
    ),
];

/// Result of a named invocation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Invocation {
    /// The store was seeded.
    Initialized,
    /// A sub-record or composite form was written under this key.
    Written(RecordKey),
}

/// Record registry over an entity store.
///
/// Writes take `&mut self` because they draw from the owned key generator;
/// reads take `&self`. Each call runs to completion with no internal
/// suspension, and nothing is cached between calls.
#[derive(Debug)]
pub struct PreAuthRegistry<S, R = StdRng> {
    pub(crate) store: S,
    pub(crate) keys: KeyGenerator<R>,
    pub(crate) config: RegistryConfig,
}

impl<S: EntityStore> PreAuthRegistry<S, StdRng> {
    /// Registry with default configuration and OS-seeded keys.
    pub fn new(store: S) -> Self {
        let config = RegistryConfig::default();
        Self {
            keys: KeyGenerator::from_entropy(&config),
            store,
            config,
        }
    }

    /// Registry with custom configuration and OS-seeded keys.
    pub fn with_config(store: S, config: RegistryConfig) -> RegistryResult<Self> {
        config.validate()?;
        Ok(Self {
            keys: KeyGenerator::from_entropy(&config),
            store,
            config,
        })
    }
}

impl<S: EntityStore, R: RngCore> PreAuthRegistry<S, R> {
    /// Registry drawing keys from the given random source.
    pub fn with_rng(store: S, config: RegistryConfig, rng: R) -> RegistryResult<Self> {
        config.validate()?;
        Ok(Self {
            keys: KeyGenerator::new(&config, rng),
            store,
            config,
        })
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    pub fn into_store(self) -> S {
        self.store
    }

    /// Next key for `kind`, probing the store when unique keys are enabled.
    pub(crate) fn next_key(&mut self, kind: EntityKind) -> RegistryResult<RecordKey> {
        if self.config.unique_keys {
            self.keys.next_unique_key(kind, &self.store)
        } else {
            Ok(self.keys.next_key(kind))
        }
    }

    /// Seed the store with the demonstration providers `PR001`..`PR004`.
    ///
    /// Takes exactly one argument, whose value is ignored. Existing values
    /// under the demonstration keys are overwritten.
    pub fn init(&mut self, args: &[String]) -> RegistryResult<()> {
        if args.len() != 1 {
            return Err(RegistryError::InvalidRequest(format!(
                "init expects 1 argument, got {}",
                args.len()
            )));
        }
        for (key, fields) in DEMO_PROVIDERS {
            let fields: Vec<String> = fields.iter().map(|f| f.to_string()).collect();
            let provider = Provider::from_fields(&fields)?;
            let bytes = serde_json::to_vec(&provider).map_err(|e| RegistryError::Encode {
                kind: Provider::KIND,
                reason: e.to_string(),
            })?;
            self.store.put(key, &bytes)?;
        }
        info!(providers = DEMO_PROVIDERS.len(), "store seeded");
        Ok(())
    }

    /// Dispatch a write-side operation by name.
    ///
    /// Recognized names are `init`, `writeProvider`, `writeMember`,
    /// `writeService`, `writePayer` and `writePreAuth`.
    pub fn invoke(&mut self, function: &str, args: &[String]) -> RegistryResult<Invocation> {
        info!(function, args = args.len(), "invoke");
        if function == "init" {
            self.init(args)?;
            return Ok(Invocation::Initialized);
        }
        let kind = write_target(function).ok_or_else(|| {
            RegistryError::InvalidRequest(format!("received unknown function invocation: {function}"))
        })?;
        self.write(Some(kind), args).map(Invocation::Written)
    }

    /// Dispatch a read-side operation by name.
    ///
    /// `readPreAuth` is a direct form lookup; the other `read*` names are
    /// typed sub-record reads. Each takes exactly one key argument.
    pub fn query(&self, function: &str, args: &[String]) -> RegistryResult<Vec<u8>> {
        let kind = read_target(function).ok_or_else(|| {
            RegistryError::InvalidRequest(format!("received unknown function query: {function}"))
        })?;
        let [key] = args else {
            return Err(RegistryError::InvalidRequest(format!(
                "{function} expects 1 key argument, got {}",
                args.len()
            )));
        };
        let key = RecordKey::from(key.as_str());
        let query = match kind {
            EntityKind::PreAuth => Query::Direct(key),
            sub => Query::Typed(sub, key),
        };
        self.read(&query)
    }
}

fn write_target(function: &str) -> Option<EntityKind> {
    match function {
        "writeProvider" => Some(EntityKind::Provider),
        "writeMember" => Some(EntityKind::Member),
        "writeService" => Some(EntityKind::Service),
        "writePayer" => Some(EntityKind::Payer),
        "writePreAuth" => Some(EntityKind::PreAuth),
        _ => None,
    }
}

fn read_target(function: &str) -> Option<EntityKind> {
    match function {
        "readProvider" => Some(EntityKind::Provider),
        "readMember" => Some(EntityKind::Member),
        "readService" => Some(EntityKind::Service),
        "readPayer" => Some(EntityKind::Payer),
        "readPreAuth" => Some(EntityKind::PreAuth),
        _ => None,
    }
}
