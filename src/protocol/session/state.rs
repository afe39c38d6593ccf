//! Live snapshot the outbound payloads are built from, plus the transmit
//! configuration. Written by the application (BMS readings, settings) and by
//! the engine (charge limits learned from the peer).
use crate::core::{CELL_COUNT, SERIAL_LEN};
use crate::protocol::messages::{ClassSet, MessageClass};

/// Serial found in the captured payload templates.
pub const DEFAULT_SERIAL: [u8; SERIAL_LEN] = *b"M102Z3B4ZE5H0601";

//==================================================================================TELEMETRY
#[derive(Clone, Copy, Debug, PartialEq)]
/// Battery readings.
pub struct Telemetry {
    /// Pack voltage in mV.
    pub pack_voltage_mv: u16,
    /// Charge voltage setpoint in mV.
    pub charge_voltage_mv: u16,
    /// Pack temperature in °C.
    pub temperature: i8,
    /// State of charge in percent.
    pub soc: u8,
    /// Charging power in W.
    pub input_watts: f32,
    /// Discharging power in W.
    pub output_watts: f32,
    /// Cell voltages in V.
    pub cell_voltages: [f32; CELL_COUNT],
    /// Full-charge voltage reported by the BMS, in mV.
    pub full_charge_voltage_mv: u16,
    /// Balance capacity reported by the BMS.
    pub balance_capacity: f32,
    /// ASCII serial announced to the peer.
    pub serial: [u8; SERIAL_LEN],
    /// Cumulative charge runtime counter.
    pub charge_runtime: u32,
    /// Cumulative discharge runtime counter.
    pub discharge_runtime: u32,
}

impl Default for Telemetry {
    fn default() -> Self {
        Self {
            pack_voltage_mv: 52_000,
            charge_voltage_mv: 56_000,
            temperature: 20,
            soc: 50,
            input_watts: 0.0,
            output_watts: 0.0,
            cell_voltages: [3.25; CELL_COUNT],
            full_charge_voltage_mv: 56_000,
            balance_capacity: 0.0,
            serial: DEFAULT_SERIAL,
            charge_runtime: 0,
            discharge_runtime: 0,
        }
    }
}

impl Telemetry {
    /// Replace the serial. Shorter strings are zero padded, longer ones cut.
    pub fn set_serial(&mut self, serial: &str) {
        let bytes = serial.as_bytes();
        let len = bytes.len().min(SERIAL_LEN);
        self.serial = [0; SERIAL_LEN];
        self.serial[..len].copy_from_slice(&bytes[..len]);
    }

    /// Cell voltages in mV, truncated.
    pub fn cell_millivolts(&self) -> [u16; CELL_COUNT] {
        let mut out = [0u16; CELL_COUNT];
        for (mv, volts) in out.iter_mut().zip(self.cell_voltages.iter()) {
            *mv = (volts * 1000.0) as u16;
        }
        out
    }

    /// `(min, max)` cell voltage in mV.
    pub fn cell_extremes_mv(&self) -> (u16, u16) {
        self.cell_millivolts()
            .iter()
            .fold((u16::MAX, 0), |(min, max), mv| (min.min(*mv), max.max(*mv)))
    }

    /// `true` while power flows into the pack.
    pub fn is_charging(&self) -> bool {
        (self.input_watts as i16) > 0
    }
}

//==================================================================================LIMITS
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
/// Charge limits (percent) pushed by the PowerStream.
pub struct BmsLimits {
    pub upper: u8,
    pub lower: u8,
}

impl Default for BmsLimits {
    fn default() -> Self {
        Self {
            upper: 100,
            lower: 5,
        }
    }
}

//==================================================================================TX_CONFIG
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
/// Transmit switches.
pub struct TxConfig {
    /// Master switch for every transmission, scheduled or reply.
    pub tx_enabled: bool,
    /// Per-class switches.
    pub classes: ClassSet,
    /// Log every received frame.
    pub rx_logging: bool,
    /// Log every transmitted frame.
    pub tx_logging: bool,
}

impl Default for TxConfig {
    fn default() -> Self {
        Self {
            tx_enabled: true,
            classes: ClassSet::all(),
            rx_logging: false,
            tx_logging: false,
        }
    }
}

impl TxConfig {
    /// Whether a message of `class` may go out right now.
    pub fn allows(&self, class: MessageClass) -> bool {
        self.tx_enabled && self.classes.contains(class)
    }
}

//==================================================================================BRIDGE_STATE
#[derive(Clone, Copy, Debug, Default, PartialEq)]
/// Everything the payload builders read.
pub struct BridgeState {
    pub telemetry: Telemetry,
    pub limits: BmsLimits,
    pub tx: TxConfig,
}
