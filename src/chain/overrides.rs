//! Test network overrides
//!
//! Signet and regtest accept runtime configuration that the fixed networks
//! refuse: a custom block challenge for signet, and directives that move
//! activation heights or reschedule version-bits deployments for regtest.
//! Parsing is strict; a typo in a directive aborts startup instead of
//! silently running a chain with the wrong rules.

use crate::consensus::{ConsensusParams, DeploymentId};
use thiserror::Error;

/// Configuration rejected while building chain parameters.
// No Eq: hex::FromHexError inside BadChallengeHex is only PartialEq.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("invalid format ({0}), expecting name@height")]
    BadActivationFormat(String),
    #[error("invalid height ({0}), expecting name@height")]
    BadActivationHeight(String),
    #[error("unknown feature name ({0}) in activation height override")]
    UnknownFeature(String),
    #[error("version bits override malformed ({0}), expecting deployment:start:timeout[:min_activation_height]")]
    BadDeploymentFormat(String),
    #[error("invalid {field} ({value}) in version bits override")]
    BadDeploymentNumber { field: &'static str, value: String },
    #[error("unknown deployment ({0}) in version bits override")]
    UnknownDeployment(String),
    #[error("at most one signet challenge may be given")]
    MultipleChallenges,
    #[error("signet challenge is not valid hex")]
    BadChallengeHex(#[from] hex::FromHexError),
    #[error("unknown chain ({0})")]
    UnknownNetwork(String),
}

/// Options accepted when building signet parameters.
#[derive(Debug, Clone, Default)]
pub struct SignetOptions {
    /// Hex-encoded block challenge scripts; at most one may be supplied.
    /// Empty selects the compiled-in default challenge.
    pub challenges: Vec<String>,
    /// Seed hosts replacing the defaults.
    pub seeds: Option<Vec<String>>,
}

/// Options accepted when building regtest parameters.
#[derive(Debug, Clone, Default)]
pub struct RegtestOptions {
    /// `name@height` directives that move buried activation heights.
    pub activation_heights: Vec<String>,
    /// `deployment:start:timeout[:min_activation_height]` directives.
    pub version_bits: Vec<String>,
    /// Prune much earlier, for tests that exercise pruning.
    pub fast_prune: bool,
}

/// Decode the challenge from the options, or `None` for the default.
pub(crate) fn parse_signet_challenge(
    options: &SignetOptions,
) -> Result<Option<Vec<u8>>, ConfigError> {
    match options.challenges.as_slice() {
        [] => Ok(None),
        [challenge] => Ok(Some(hex::decode(challenge)?)),
        _ => Err(ConfigError::MultipleChallenges),
    }
}

/// Apply `name@height` directives to the buried activation heights.
pub(crate) fn apply_activation_heights(
    consensus: &mut ConsensusParams,
    directives: &[String],
) -> Result<(), ConfigError> {
    for directive in directives {
        let (name, value) = directive
            .split_once('@')
            .ok_or_else(|| ConfigError::BadActivationFormat(directive.clone()))?;
        let height: i64 = value
            .parse()
            .map_err(|_| ConfigError::BadActivationHeight(directive.clone()))?;
        if height < 0 || height >= i64::from(i32::MAX) {
            return Err(ConfigError::BadActivationHeight(directive.clone()));
        }
        let height = height as i32;
        match name {
            "segwit" => consensus.segwit_height = height,
            "bip34" => consensus.bip34_height = height,
            "dersig" => consensus.dersig_height = height,
            "cltv" => consensus.cltv_height = height,
            "csv" => consensus.csv_height = height,
            _ => return Err(ConfigError::UnknownFeature(name.to_string())),
        }
    }
    Ok(())
}

/// Apply `deployment:start:timeout[:min_activation_height]` directives to
/// the version-bits table. The signalling bit itself is not overridable.
pub(crate) fn apply_version_bits(
    consensus: &mut ConsensusParams,
    directives: &[String],
) -> Result<(), ConfigError> {
    for directive in directives {
        let parts: Vec<&str> = directive.split(':').collect();
        if parts.len() < 3 || parts.len() > 4 {
            return Err(ConfigError::BadDeploymentFormat(directive.clone()));
        }
        let id = DeploymentId::from_name(parts[0])
            .ok_or_else(|| ConfigError::UnknownDeployment(parts[0].to_string()))?;
        let start_time: i64 = parts[1]
            .parse()
            .map_err(|_| ConfigError::BadDeploymentNumber {
                field: "start",
                value: parts[1].to_string(),
            })?;
        let timeout: i64 = parts[2]
            .parse()
            .map_err(|_| ConfigError::BadDeploymentNumber {
                field: "timeout",
                value: parts[2].to_string(),
            })?;
        let min_activation_height: i32 = match parts.get(3) {
            Some(value) => {
                let bad = || ConfigError::BadDeploymentNumber {
                    field: "min_activation_height",
                    value: value.to_string(),
                };
                let height: i64 = value.parse().map_err(|_| bad())?;
                // Same bound as the name@height directives.
                if height < 0 || height >= i64::from(i32::MAX) {
                    return Err(bad());
                }
                height as i32
            }
            None => 0,
        };

        let deployment = &mut consensus[id];
        deployment.start_time = start_time;
        deployment.timeout = timeout;
        deployment.min_activation_height = min_activation_height;
    }
    Ok(())
}
