//! The versioned export envelope the frontend consumes.

use chrono::{DateTime, Utc};
use packetscope_core::{PacketPath, SimulationStep, simulate};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::metadata::ContractMetadata;
use crate::options::ExportOptions;

/// Contract schema version. 2.x tags mutations by operation and attaches
/// conntrack state per function; 1.x consumers cannot read it.
pub const CONTRACT_VERSION: &str = "2.0.0";

/// Kernel version the catalogs are based on.
pub const KERNEL_VERSION: &str = "5.10.8";

#[derive(Debug, Error)]
pub enum ContractError {
    #[error("failed to serialize contract: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// One path bundled with its pre-computed simulation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PathEntry {
    pub path: PacketPath,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub simulation: Option<Vec<SimulationStep>>,
}

/// The complete contract: catalogs, simulations, and rendering metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contract {
    pub version: String,
    pub kernel_version: String,
    pub generated_at: DateTime<Utc>,
    pub paths: Vec<PathEntry>,
    pub metadata: ContractMetadata,
}

impl Contract {
    /// Assemble the contract from the built-in catalogs.
    ///
    /// Pure apart from the caller-supplied timestamp: identical options and
    /// timestamp produce byte-identical JSON.
    pub fn build(options: &ExportOptions, generated_at: DateTime<Utc>) -> Self {
        let paths = packetscope_paths::builtin_paths()
            .into_iter()
            .map(|path| {
                let simulation = options
                    .include_simulation
                    .then(|| simulate(&path, options.simulation_params()).steps);
                PathEntry { path, simulation }
            })
            .collect();

        Self {
            version: CONTRACT_VERSION.to_string(),
            kernel_version: KERNEL_VERSION.to_string(),
            generated_at,
            paths,
            metadata: ContractMetadata::new(options),
        }
    }

    /// Render to JSON, indented or compact per `pretty`.
    pub fn to_json(&self, pretty: bool) -> Result<String, ContractError> {
        let json = if pretty {
            serde_json::to_string_pretty(self)?
        } else {
            serde_json::to_string(self)?
        };
        Ok(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn fixed_timestamp() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2021, 1, 12, 8, 30, 0).unwrap()
    }

    #[test]
    fn test_envelope_carries_versions_and_both_paths() {
        let contract = Contract::build(&ExportOptions::default(), fixed_timestamp());
        assert_eq!(contract.version, "2.0.0");
        assert_eq!(contract.kernel_version, "5.10.8");
        assert_eq!(contract.paths.len(), 2);
        assert_eq!(contract.paths[0].path.id, "tcp_ipv4_egress");
        assert_eq!(contract.paths[1].path.id, "tcp_ipv4_ingress");
    }

    #[test]
    fn test_simulations_are_present_by_default() {
        let contract = Contract::build(&ExportOptions::default(), fixed_timestamp());
        for entry in &contract.paths {
            let simulation = entry.simulation.as_ref().unwrap();
            assert_eq!(simulation.len(), entry.path.functions.len());
        }
    }

    #[test]
    fn test_no_sim_drops_the_simulation_key() {
        let options = ExportOptions {
            include_simulation: false,
            ..Default::default()
        };
        let contract = Contract::build(&options, fixed_timestamp());
        let json = contract.to_json(false).unwrap();
        assert!(!json.contains("\"simulation\""));
        assert!(json.contains("\"entryPoint\":\"tcp_sendmsg\""));
    }

    #[test]
    fn test_identical_inputs_produce_identical_json() {
        let options = ExportOptions::default();
        let first = Contract::build(&options, fixed_timestamp())
            .to_json(true)
            .unwrap();
        let second = Contract::build(&options, fixed_timestamp())
            .to_json(true)
            .unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_camel_case_wire_keys() {
        let contract = Contract::build(&ExportOptions::default(), fixed_timestamp());
        let json = contract.to_json(false).unwrap();
        for key in [
            "\"kernelVersion\"",
            "\"generatedAt\"",
            "\"headerSizes\"",
            "\"bufferSize\"",
            "\"payloadSize\"",
            "\"skbuffState\"",
            "\"edgeTaken\"",
            "\"conntrackState\"",
            "\"isErrorPath\"",
        ] {
            assert!(json.contains(key), "missing {key}");
        }
    }

    #[test]
    fn test_compact_output_is_a_single_line() {
        let contract = Contract::build(&ExportOptions::default(), fixed_timestamp());
        let compact = contract.to_json(false).unwrap();
        assert!(!compact.contains('\n'));
        let pretty = contract.to_json(true).unwrap();
        assert!(pretty.contains('\n'));
    }

    #[test]
    fn test_contract_round_trips_through_json() {
        let contract = Contract::build(&ExportOptions::default(), fixed_timestamp());
        let json = contract.to_json(true).unwrap();
        let back: Contract = serde_json::from_str(&json).unwrap();
        assert_eq!(back, contract);
    }
}
