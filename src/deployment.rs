//! Versionbits soft-fork deployment parameters
//!
//! The constant tables use the traditional sentinel encoding (`-1` start time
//! for always-active, `0x7fffffff` for no timeout, `-1` threshold for "use the
//! network default"). Those sentinels are decoded once, at registry load, into
//! the tagged types below so that the validator's state machine matches on
//! variants instead of comparing magic numbers.
//!
//! The per-block signaling tally and the STARTED / LOCKED_IN / ACTIVE / FAILED
//! walk are not implemented here.

use crate::error::{RegistryError, RegistryResult};
use crate::params::NetworkVariant;
use serde::Serialize;
use std::collections::HashMap;

/// Start time meaning the deployment is active from genesis
pub const ALWAYS_ACTIVE: i64 = -1;

/// Start time meaning the deployment never starts
pub const NEVER_ACTIVE: i64 = 0xffff_ffff;

/// Timeout meaning a started deployment never fails
pub const NO_TIMEOUT: i64 = 0x7fff_ffff;

/// Threshold/window value meaning "use the network default"
pub const USE_NETWORK_DEFAULT: i32 = -1;

/// Highest usable signaling bit; bits 29..=31 carry the version scheme
pub const MAX_DEPLOYMENT_BIT: u8 = 28;

/// Version prefix of blocks that signal through versionbits
pub const VERSIONBITS_TOP_BITS: u32 = 0x2000_0000;
pub const VERSIONBITS_TOP_MASK: u32 = 0xe000_0000;

/// Deployment as written in the constant tables
#[derive(Debug, Clone, Copy)]
pub struct StaticDeployment {
    pub name: &'static str,
    pub bit: u8,
    pub start_time: i64,
    pub timeout: i64,
    pub threshold: i32,
    pub window: i32,
    pub required: bool,
    pub force: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "type", content = "time")]
pub enum Timeout {
    /// Once started, the deployment cannot fail
    Never,
    At(i64),
}

impl Timeout {
    pub fn from_raw(timeout: i64) -> Self {
        if timeout == NO_TIMEOUT {
            Timeout::Never
        } else {
            Timeout::At(timeout)
        }
    }

    /// Whether the deployment has timed out at median time `time`
    pub fn has_expired(&self, time: i64) -> bool {
        match self {
            Timeout::Never => false,
            Timeout::At(timeout) => time >= *timeout,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "type")]
pub enum Activation {
    /// Active regardless of block time
    AlwaysActive,
    /// Never starts
    Disabled,
    Timed { start: i64, timeout: Timeout },
}

impl Activation {
    /// Decode the raw start time / timeout pair
    ///
    /// Returns `None` for negative start times other than the always-active
    /// sentinel.
    pub fn from_raw(start_time: i64, timeout: i64) -> Option<Self> {
        match start_time {
            ALWAYS_ACTIVE => Some(Activation::AlwaysActive),
            NEVER_ACTIVE => Some(Activation::Disabled),
            start if start >= 0 => Some(Activation::Timed {
                start,
                timeout: Timeout::from_raw(timeout),
            }),
            _ => None,
        }
    }

    /// Whether signaling may begin at median time `time`
    pub fn has_started(&self, time: i64) -> bool {
        match self {
            Activation::AlwaysActive => true,
            Activation::Disabled => false,
            Activation::Timed { start, .. } => time >= *start,
        }
    }
}

/// Signaling threshold or window size
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "type", content = "value")]
pub enum Quorum {
    NetworkDefault,
    Explicit(u32),
}

impl Quorum {
    /// Returns `None` for negative values other than the default sentinel
    pub fn from_raw(value: i32) -> Option<Self> {
        match value {
            USE_NETWORK_DEFAULT => Some(Quorum::NetworkDefault),
            n => u32::try_from(n).ok().map(Quorum::Explicit),
        }
    }

    pub fn resolve(&self, default: u32) -> u32 {
        match self {
            Quorum::NetworkDefault => default,
            Quorum::Explicit(n) => *n,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Rollout {
    /// Activates through miner signaling
    Signaled,
    /// Activates at its start time without signaling
    Forced,
}

/// One soft-fork signaling slot
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeploymentParameters {
    pub name: String,
    pub bit: u8,
    pub activation: Activation,
    pub threshold: Quorum,
    pub window: Quorum,
    pub rollout: Rollout,
    /// Blocks violating the rule are invalid once the deployment is active
    pub required: bool,
}

impl DeploymentParameters {
    /// Decode a table entry, checking its bit range and sentinel values
    pub fn from_static(
        variant: NetworkVariant,
        raw: &StaticDeployment,
    ) -> RegistryResult<Self> {
        if raw.bit > MAX_DEPLOYMENT_BIT {
            return Err(RegistryError::DeploymentBitOutOfRange {
                variant,
                name: raw.name.to_string(),
                bit: raw.bit,
                max: MAX_DEPLOYMENT_BIT,
            });
        }

        let malformed = |field: &'static str, value: i64| RegistryError::MalformedConstant {
            variant,
            field,
            reason: format!("deployment {:?} has invalid value {}", raw.name, value),
        };

        let activation = Activation::from_raw(raw.start_time, raw.timeout)
            .ok_or_else(|| malformed("deployment start time", raw.start_time))?;
        let threshold = Quorum::from_raw(raw.threshold)
            .ok_or_else(|| malformed("deployment threshold", i64::from(raw.threshold)))?;
        let window = Quorum::from_raw(raw.window)
            .ok_or_else(|| malformed("deployment window", i64::from(raw.window)))?;

        Ok(Self {
            name: raw.name.to_string(),
            bit: raw.bit,
            activation,
            threshold,
            window,
            rollout: if raw.force {
                Rollout::Forced
            } else {
                Rollout::Signaled
            },
            required: raw.required,
        })
    }

    /// Version bit mask for this deployment
    pub fn mask(&self) -> u32 {
        1u32 << self.bit
    }

    /// Whether a block version signals for this deployment
    pub fn signals(&self, version: i32) -> bool {
        let version = version as u32;
        (version & VERSIONBITS_TOP_MASK) == VERSIONBITS_TOP_BITS && (version & self.mask()) != 0
    }

    pub fn threshold_or(&self, default: u32) -> u32 {
        self.threshold.resolve(default)
    }

    pub fn window_or(&self, default: u32) -> u32 {
        self.window.resolve(default)
    }

    pub fn is_forced(&self) -> bool {
        self.rollout == Rollout::Forced
    }
}

/// Check that deployment names and bits are unique within one network
pub fn check_deployments(
    variant: NetworkVariant,
    deployments: &[DeploymentParameters],
) -> RegistryResult<()> {
    let mut by_bit: HashMap<u8, &str> = HashMap::new();
    let mut names: HashMap<&str, u8> = HashMap::new();

    for deployment in deployments {
        if deployment.bit > MAX_DEPLOYMENT_BIT {
            return Err(RegistryError::DeploymentBitOutOfRange {
                variant,
                name: deployment.name.clone(),
                bit: deployment.bit,
                max: MAX_DEPLOYMENT_BIT,
            });
        }
        if let Some(first) = by_bit.insert(deployment.bit, &deployment.name) {
            return Err(RegistryError::DeploymentBitCollision {
                variant,
                bit: deployment.bit,
                first: first.to_string(),
                second: deployment.name.clone(),
            });
        }
        if names.insert(&deployment.name, deployment.bit).is_some() {
            return Err(RegistryError::DuplicateDeploymentName {
                variant,
                name: deployment.name.clone(),
            });
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(name: &'static str, bit: u8) -> StaticDeployment {
        StaticDeployment {
            name,
            bit,
            start_time: ALWAYS_ACTIVE,
            timeout: NO_TIMEOUT,
            threshold: USE_NETWORK_DEFAULT,
            window: USE_NETWORK_DEFAULT,
            required: false,
            force: false,
        }
    }

    fn decode(raw: &StaticDeployment) -> DeploymentParameters {
        DeploymentParameters::from_static(NetworkVariant::Regtest, raw).unwrap()
    }

    #[test]
    fn test_always_active_ignores_timeout() {
        assert_eq!(Activation::from_raw(ALWAYS_ACTIVE, 0), Some(Activation::AlwaysActive));
        assert_eq!(
            Activation::from_raw(ALWAYS_ACTIVE, NO_TIMEOUT),
            Some(Activation::AlwaysActive)
        );
        assert!(Activation::AlwaysActive.has_started(0));
    }

    #[test]
    fn test_never_active_sentinel() {
        assert_eq!(Activation::from_raw(NEVER_ACTIVE, NEVER_ACTIVE), Some(Activation::Disabled));
        assert!(!Activation::Disabled.has_started(i64::MAX));
    }

    #[test]
    fn test_timed_activation() {
        let activation = Activation::from_raw(1_199_145_601, 1_230_767_999).unwrap();
        assert_eq!(
            activation,
            Activation::Timed {
                start: 1_199_145_601,
                timeout: Timeout::At(1_230_767_999)
            }
        );
        assert!(!activation.has_started(1_199_145_600));
        assert!(activation.has_started(1_199_145_601));
    }

    #[test]
    fn test_no_timeout_sentinel() {
        let activation = Activation::from_raw(0, NO_TIMEOUT).unwrap();
        assert_eq!(
            activation,
            Activation::Timed {
                start: 0,
                timeout: Timeout::Never
            }
        );
        assert!(!Timeout::Never.has_expired(i64::MAX));
        assert!(Timeout::At(100).has_expired(100));
        assert!(!Timeout::At(100).has_expired(99));
        // 0xffffffff is a real (distant) timeout, not the no-timeout sentinel
        assert_eq!(Timeout::from_raw(0xffff_ffff), Timeout::At(0xffff_ffff));
    }

    #[test]
    fn test_invalid_start_time_rejected() {
        assert_eq!(Activation::from_raw(-2, NO_TIMEOUT), None);
        let mut entry = raw("bad", 3);
        entry.start_time = -5;
        assert!(matches!(
            DeploymentParameters::from_static(NetworkVariant::Main, &entry),
            Err(RegistryError::MalformedConstant { .. })
        ));
    }

    #[test]
    fn test_quorum_defaults() {
        assert_eq!(Quorum::from_raw(-1), Some(Quorum::NetworkDefault));
        assert_eq!(Quorum::from_raw(269), Some(Quorum::Explicit(269)));
        assert_eq!(Quorum::from_raw(-7), None);
        assert_eq!(Quorum::NetworkDefault.resolve(16128), 16128);
        assert_eq!(Quorum::Explicit(269).resolve(16128), 269);
    }

    #[test]
    fn test_decode_flags() {
        let mut entry = raw("csv", 0);
        entry.force = true;
        let forced = decode(&entry);
        assert!(forced.is_forced());
        assert!(!forced.required);

        let mut entry = raw("segwit", 1);
        entry.required = true;
        let required = decode(&entry);
        assert!(!required.is_forced());
        assert!(required.required);
        assert_eq!(required.threshold_or(936), 936);
        assert_eq!(required.window_or(1440), 1440);
    }

    #[test]
    fn test_signaling_mask() {
        let deployment = decode(&raw("testdummy", 28));
        assert_eq!(deployment.mask(), 0x1000_0000);
        assert!(deployment.signals(0x3000_0000));
        // Version without the top-bits prefix does not signal
        assert!(!deployment.signals(0x1000_0000));
        assert!(!deployment.signals(0x2000_0001));
        assert!(!deployment.signals(4));
    }

    #[test]
    fn test_bit_out_of_range() {
        let result = DeploymentParameters::from_static(NetworkVariant::Main, &raw("high", 29));
        assert!(matches!(
            result,
            Err(RegistryError::DeploymentBitOutOfRange { bit: 29, max: 28, .. })
        ));
        assert!(DeploymentParameters::from_static(NetworkVariant::Main, &raw("top", 28)).is_ok());
    }

    #[test]
    fn test_bit_collision_detected() {
        let deployments = vec![decode(&raw("csv", 0)), decode(&raw("other", 0))];
        match check_deployments(NetworkVariant::Testnet, &deployments) {
            Err(RegistryError::DeploymentBitCollision { bit, first, second, .. }) => {
                assert_eq!(bit, 0);
                assert_eq!(first, "csv");
                assert_eq!(second, "other");
            }
            other => panic!("expected bit collision, got {:?}", other),
        }
    }

    #[test]
    fn test_duplicate_name_detected() {
        let deployments = vec![decode(&raw("csv", 0)), decode(&raw("csv", 1))];
        assert!(matches!(
            check_deployments(NetworkVariant::Main, &deployments),
            Err(RegistryError::DuplicateDeploymentName { .. })
        ));
    }

    #[test]
    fn test_distinct_deployments_pass() {
        let deployments = vec![
            decode(&raw("csv", 0)),
            decode(&raw("segwit", 1)),
            decode(&raw("segsignal", 4)),
            decode(&raw("testdummy", 28)),
        ];
        assert!(check_deployments(NetworkVariant::Main, &deployments).is_ok());
    }
}
