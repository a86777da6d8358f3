//! Network parameter registry
//!
//! Holds one validated [`ParameterBundle`] per [`NetworkVariant`]. The
//! process-wide instance is built on first access by [`Registry::global`]; concurrent
//! first callers wait for a single construction and all observe the same
//! bundles afterwards.

use crate::error::{RegistryError, RegistryResult};
use crate::params::{mainnet::MAIN, regtest::REGTEST, testnet::TESTNET};
use crate::params::{NetworkVariant, ParameterBundle, StaticParams};
use std::sync::{Arc, OnceLock};
use tracing::{debug, info};

/// Immutable set of parameter bundles, one per variant
#[derive(Debug, Clone)]
pub struct Registry {
    main: Arc<ParameterBundle>,
    testnet: Arc<ParameterBundle>,
    regtest: Arc<ParameterBundle>,
}

impl Registry {
    /// Build and validate the built-in tables
    pub fn new() -> RegistryResult<Self> {
        Self::from_tables(&MAIN, &TESTNET, &REGTEST)
    }

    /// Build a registry from explicit tables
    ///
    /// Each table must carry the variant of the slot it fills and every
    /// network must use its own magic.
    pub fn from_tables(
        main: &StaticParams,
        testnet: &StaticParams,
        regtest: &StaticParams,
    ) -> RegistryResult<Self> {
        let registry = Registry {
            main: Arc::new(build_slot(NetworkVariant::Main, main)?),
            testnet: Arc::new(build_slot(NetworkVariant::Testnet, testnet)?),
            regtest: Arc::new(build_slot(NetworkVariant::Regtest, regtest)?),
        };

        for (i, a) in NetworkVariant::ALL.iter().enumerate() {
            for b in &NetworkVariant::ALL[i + 1..] {
                let magic = registry.bundle(*a).magic();
                if magic == registry.bundle(*b).magic() {
                    return Err(RegistryError::DuplicateMagic {
                        variant: *b,
                        other: *a,
                        magic,
                    });
                }
            }
        }

        for bundle in registry.bundles() {
            info!(
                "{} parameters ready: genesis {}, magic {:08x}, port {}",
                bundle.variant(),
                bundle.genesis_hash().to_display_hex(),
                bundle.magic(),
                bundle.identity.port
            );
        }
        Ok(registry)
    }

    /// Look up a bundle by exact variant name
    pub fn get(&self, name: &str) -> RegistryResult<Arc<ParameterBundle>> {
        let variant: NetworkVariant = name.parse()?;
        Ok(self.get_variant(variant))
    }

    pub fn get_variant(&self, variant: NetworkVariant) -> Arc<ParameterBundle> {
        Arc::clone(self.slot(variant))
    }

    /// Borrow a bundle without touching the reference count
    pub fn bundle(&self, variant: NetworkVariant) -> &ParameterBundle {
        self.slot(variant)
    }

    /// Bundles in canonical variant order
    pub fn bundles(&self) -> impl Iterator<Item = &ParameterBundle> + '_ {
        NetworkVariant::ALL.into_iter().map(move |v| self.bundle(v))
    }

    pub fn variants(&self) -> impl Iterator<Item = NetworkVariant> {
        NetworkVariant::ALL.into_iter()
    }

    fn slot(&self, variant: NetworkVariant) -> &Arc<ParameterBundle> {
        match variant {
            NetworkVariant::Main => &self.main,
            NetworkVariant::Testnet => &self.testnet,
            NetworkVariant::Regtest => &self.regtest,
        }
    }
}

fn build_slot(expected: NetworkVariant, raw: &StaticParams) -> RegistryResult<ParameterBundle> {
    if raw.variant != expected {
        return Err(RegistryError::MalformedConstant {
            variant: expected,
            field: "variant",
            reason: format!("table for {} placed in the {} slot", raw.variant, expected),
        });
    }
    ParameterBundle::from_static(raw)
}

static GLOBAL: OnceLock<RegistryResult<Registry>> = OnceLock::new();

impl Registry {
    /// Process-wide registry, built on first use
    ///
    /// A failure is cached: every caller sees the same error.
    pub fn try_global() -> Result<&'static Registry, &'static RegistryError> {
        GLOBAL
            .get_or_init(|| {
                debug!("initializing global parameter registry");
                Registry::new()
            })
            .as_ref()
    }

    /// Process-wide registry, built on first use
    ///
    /// # Panics
    ///
    /// Panics if the built-in tables fail validation. The tables are compiled
    /// in, so this means the binary itself is broken.
    pub fn global() -> &'static Registry {
        match Self::try_global() {
            Ok(registry) => registry,
            Err(e) => panic!("built-in network parameters are corrupt: {}", e),
        }
    }
}

/// Shorthand for `Registry::global().get(name)`
pub fn get(name: &str) -> RegistryResult<Arc<ParameterBundle>> {
    Registry::global().get(name)
}
