//! Export configuration.

use packetscope_core::{DEFAULT_BUFFER_SIZE, DEFAULT_PAYLOAD_SIZE, SimulationParams};

/// Knobs for one contract export.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExportOptions {
    /// Indented JSON output.
    pub pretty: bool,
    /// Bundle a pre-computed simulation with each path.
    pub include_simulation: bool,
    /// sk_buff allocation for the simulations.
    pub buffer_size: usize,
    /// Initial payload for the simulations.
    pub payload_size: usize,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            pretty: true,
            include_simulation: true,
            buffer_size: DEFAULT_BUFFER_SIZE,
            payload_size: DEFAULT_PAYLOAD_SIZE,
        }
    }
}

impl ExportOptions {
    /// Buffer sizing handed to the simulator.
    pub fn simulation_params(&self) -> SimulationParams {
        SimulationParams {
            capacity: self.buffer_size,
            payload_size: self.payload_size,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = ExportOptions::default();
        assert!(options.pretty);
        assert!(options.include_simulation);
        assert_eq!(options.buffer_size, 2048);
        assert_eq!(options.payload_size, 1000);
    }
}
