//! Chain Parameters - consensus constants for every supported network
//!
//! This crate is the single source of truth for the per-network values a node
//! needs before it can validate anything: genesis identity, proof-of-work
//! limits and retarget schedule, soft-fork activation heights, versionbits
//! deployments, address and key prefixes, and relay policy.
//!
//! ## Layout
//!
//! 1. `params/{mainnet,testnet,regtest}.rs`: declarative constant tables
//! 2. [`codec`]: decoder for the raw genesis block embedded in each table
//! 3. [`params::ParameterBundle`]: typed bundle built and cross-checked from a table
//! 4. [`registry`]: lazily initialized, read-only lookup by variant name
//!
//! ## Example
//!
//! ```rust
//! use bllvm_chainparams::registry;
//!
//! let regtest = registry::get("regtest").unwrap();
//! assert_eq!(regtest.pow.bits, 0x207fffff);
//! assert!(registry::get("signet").is_err());
//! ```

pub mod codec;
pub mod config;
pub mod deployment;
pub mod error;
pub mod hash;
pub mod params;
pub mod pow;
pub mod registry;
pub mod utils;

pub use config::{LoggingConfig, ParamsConfig};
pub use deployment::{Activation, DeploymentParameters, Quorum, Rollout, Timeout};
pub use error::{CodecError, CodecResult, RegistryError, RegistryResult};
pub use hash::{double_sha256, Hash256};
pub use params::{NetworkVariant, ParameterBundle};
pub use pow::{ChainWork, U256};
pub use registry::Registry;
