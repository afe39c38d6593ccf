//! Typed payload records.
//!
//! Each record owns the live fields of one outbound payload. `to_payload`
//! copies the captured template and stamps the fields at their offsets;
//! `from_payload` reads them back (used by tests and by anything sniffing
//! the bus). `from_state` derives the record from the bridge snapshot.
use crate::core::{FieldDescriptor, FieldKind, CELL_COUNT, SERIAL_LEN};
use crate::error::{DeserializationError, SerializationError};
use crate::infra::codec::layout::{LayoutReader, LayoutWriter};
use crate::infra::codec::traits::{expect_len, stamp_template, PayloadData};
use crate::protocol::messages::templates::{
    BATTERY_STATUS_TEMPLATE, HEARTBEAT_REPLY_TEMPLATE, LIMIT_TEMPLATE, PACK_SUMMARY_TEMPLATE,
    PACK_VOLTAGE_TEMPLATE, POWER_FLOW_TEMPLATE, SERIAL_ANNOUNCE_TEMPLATE, VERSION_DATE_TEMPLATE,
    VERSION_INFO_TEMPLATE, VOLTAGE_REPORT_TEMPLATE,
};
use crate::protocol::session::state::BridgeState;

/// Serial number field of `SERIAL_LEN` bytes at `offset`.
const fn serial_at(offset: usize) -> FieldDescriptor {
    FieldDescriptor::new("Serial", FieldKind::Bytes(SERIAL_LEN), offset)
}

fn read_serial(reader: &LayoutReader<'_>, desc: &FieldDescriptor) -> Result<[u8; SERIAL_LEN], DeserializationError> {
    let mut serial = [0u8; SERIAL_LEN];
    serial.copy_from_slice(reader.bytes(desc)?);
    Ok(serial)
}

/// Charging flag byte used by the pack summary and power flow payloads.
const fn charging_flag(charging: bool) -> u8 {
    if charging {
        0x02
    } else {
        0x00
    }
}

//==================================================================================BATTERY_STATUS_0x13
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
/// Battery status (0x13): temperatures, pack and cell voltages, power.
pub struct BatteryStatus {
    pub temperature: u8,
    pub pack_voltage_mv: u16,
    pub max_cell_mv: u16,
    pub min_cell_mv: u16,
    pub cells_mv: [u16; CELL_COUNT],
    pub input_watts: i16,
    pub output_watts: i16,
    pub serial: [u8; SERIAL_LEN],
    pub full_charge_voltage_mv: u16,
}

impl BatteryStatus {
    const TEMP_A: FieldDescriptor = FieldDescriptor::new("Temperature", FieldKind::U8, 7);
    const VOLTAGE: FieldDescriptor = FieldDescriptor::new("PackVoltage", FieldKind::U16Le, 12);
    const TEMP_B: FieldDescriptor = FieldDescriptor::new("Temperature", FieldKind::U8, 20);
    const MAX_CELL: FieldDescriptor = FieldDescriptor::new("MaxCell", FieldKind::U16Le, 39);
    const MIN_CELL: FieldDescriptor = FieldDescriptor::new("MinCell", FieldKind::U16Le, 41);
    const CELL_TEMPS: FieldDescriptor = FieldDescriptor::new("CellTemperatures", FieldKind::Bytes(4), 43);
    const INPUT: FieldDescriptor = FieldDescriptor::new("InputWatts", FieldKind::I16Le, 57);
    const OUTPUT: FieldDescriptor = FieldDescriptor::new("OutputWatts", FieldKind::I16Le, 61);
    const CELLS: FieldDescriptor = FieldDescriptor::new("Cells", FieldKind::Bytes(CELL_COUNT * 2), 77);
    const SERIAL: FieldDescriptor = serial_at(122);
    const FULL_CHARGE: FieldDescriptor = FieldDescriptor::new("FullChargeVoltage", FieldKind::U16Le, 148);

    pub fn from_state(state: &BridgeState) -> Self {
        let t = &state.telemetry;
        let (min_cell_mv, max_cell_mv) = t.cell_extremes_mv();
        Self {
            temperature: t.temperature as u8,
            pack_voltage_mv: t.pack_voltage_mv,
            max_cell_mv,
            min_cell_mv,
            cells_mv: t.cell_millivolts(),
            input_watts: t.input_watts as i16,
            output_watts: t.output_watts as i16,
            serial: t.serial,
            full_charge_voltage_mv: t.full_charge_voltage_mv,
        }
    }
}

impl PayloadData for BatteryStatus {
    const TEMPLATE: &'static [u8] = &BATTERY_STATUS_TEMPLATE;
    const FIELDS: &'static [&'static FieldDescriptor] = &[
        &Self::TEMP_A,
        &Self::VOLTAGE,
        &Self::TEMP_B,
        &Self::MAX_CELL,
        &Self::MIN_CELL,
        &Self::CELL_TEMPS,
        &Self::INPUT,
        &Self::OUTPUT,
        &Self::CELLS,
        &Self::SERIAL,
        &Self::FULL_CHARGE,
    ];

    fn from_payload(payload: &[u8]) -> Result<Self, DeserializationError> {
        expect_len(Self::TEMPLATE, payload)?;
        let r = LayoutReader::new(payload);
        let mut cells_mv = [0u16; CELL_COUNT];
        for (i, cell) in cells_mv.iter_mut().enumerate() {
            *cell = r.u16_at(&Self::CELLS, i)?;
        }
        Ok(Self {
            temperature: r.u8(&Self::TEMP_A)?,
            pack_voltage_mv: r.u16(&Self::VOLTAGE)?,
            max_cell_mv: r.u16(&Self::MAX_CELL)?,
            min_cell_mv: r.u16(&Self::MIN_CELL)?,
            cells_mv,
            input_watts: r.i16(&Self::INPUT)?,
            output_watts: r.i16(&Self::OUTPUT)?,
            serial: read_serial(&r, &Self::SERIAL)?,
            full_charge_voltage_mv: r.u16(&Self::FULL_CHARGE)?,
        })
    }

    fn to_payload(&self, buffer: &mut [u8]) -> Result<usize, SerializationError> {
        let len = stamp_template(Self::TEMPLATE, buffer)?;
        let mut w = LayoutWriter::new(&mut buffer[..len]);
        w.put_u8(&Self::TEMP_A, self.temperature)?;
        w.put_u16(&Self::VOLTAGE, self.pack_voltage_mv)?;
        w.put_u8(&Self::TEMP_B, self.temperature)?;
        w.put_bytes(&Self::CELL_TEMPS, &[self.temperature; 4])?;
        w.put_u16_array(&Self::CELLS, &self.cells_mv)?;
        w.put_u16(&Self::MAX_CELL, self.max_cell_mv)?;
        w.put_u16(&Self::MIN_CELL, self.min_cell_mv)?;
        w.put_i16(&Self::INPUT, self.input_watts)?;
        w.put_i16(&Self::OUTPUT, self.output_watts)?;
        w.put_bytes(&Self::SERIAL, &self.serial)?;
        w.put_u16(&Self::FULL_CHARGE, self.full_charge_voltage_mv)?;
        Ok(len)
    }
}

//==================================================================================HEARTBEAT_REPLY_0x3C
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
/// Heartbeat reply (0x3C).
pub struct HeartbeatReply {
    pub serial: [u8; SERIAL_LEN],
    /// Charge voltage as announced: setpoint + 3 mV.
    pub charge_voltage_mv: u16,
    pub soc: u8,
    pub pack_voltage_mv: u16,
    pub temperature: u8,
    pub charge_runtime: u32,
    pub discharge_runtime: u32,
    pub upper_limit: u8,
    pub lower_limit: u8,
}

impl HeartbeatReply {
    const SERIAL: FieldDescriptor = serial_at(3);
    const CHARGE_VOLTAGE: FieldDescriptor = FieldDescriptor::new("ChargeVoltage", FieldKind::U16Le, 41);
    const SOC: FieldDescriptor = FieldDescriptor::new("Soc", FieldKind::U8, 56);
    const VOLTAGE: FieldDescriptor = FieldDescriptor::new("PackVoltage", FieldKind::U16Le, 57);
    const TEMP_A: FieldDescriptor = FieldDescriptor::new("Temperature", FieldKind::U8, 114);
    const TEMP_B: FieldDescriptor = FieldDescriptor::new("Temperature", FieldKind::U8, 115);
    const CHARGE_RUNTIME: FieldDescriptor = FieldDescriptor::new("ChargeRuntime", FieldKind::U32Le, 120);
    const DISCHARGE_RUNTIME: FieldDescriptor =
        FieldDescriptor::new("DischargeRuntime", FieldKind::U32Le, 124);
    const UPPER: FieldDescriptor = FieldDescriptor::new("UpperLimit", FieldKind::U8, 128);
    const LOWER: FieldDescriptor = FieldDescriptor::new("LowerLimit", FieldKind::U8, 129);

    pub fn from_state(state: &BridgeState) -> Self {
        let t = &state.telemetry;
        Self {
            serial: t.serial,
            charge_voltage_mv: t.charge_voltage_mv.wrapping_add(3),
            soc: t.soc,
            pack_voltage_mv: t.pack_voltage_mv,
            temperature: t.temperature as u8,
            charge_runtime: t.charge_runtime,
            discharge_runtime: t.discharge_runtime,
            upper_limit: state.limits.upper,
            lower_limit: state.limits.lower,
        }
    }
}

impl PayloadData for HeartbeatReply {
    const TEMPLATE: &'static [u8] = &HEARTBEAT_REPLY_TEMPLATE;
    const FIELDS: &'static [&'static FieldDescriptor] = &[
        &Self::SERIAL,
        &Self::CHARGE_VOLTAGE,
        &Self::SOC,
        &Self::VOLTAGE,
        &Self::TEMP_A,
        &Self::TEMP_B,
        &Self::CHARGE_RUNTIME,
        &Self::DISCHARGE_RUNTIME,
        &Self::UPPER,
        &Self::LOWER,
    ];

    fn from_payload(payload: &[u8]) -> Result<Self, DeserializationError> {
        expect_len(Self::TEMPLATE, payload)?;
        let r = LayoutReader::new(payload);
        Ok(Self {
            serial: read_serial(&r, &Self::SERIAL)?,
            charge_voltage_mv: r.u16(&Self::CHARGE_VOLTAGE)?,
            soc: r.u8(&Self::SOC)?,
            pack_voltage_mv: r.u16(&Self::VOLTAGE)?,
            temperature: r.u8(&Self::TEMP_A)?,
            charge_runtime: r.u32(&Self::CHARGE_RUNTIME)?,
            discharge_runtime: r.u32(&Self::DISCHARGE_RUNTIME)?,
            upper_limit: r.u8(&Self::UPPER)?,
            lower_limit: r.u8(&Self::LOWER)?,
        })
    }

    fn to_payload(&self, buffer: &mut [u8]) -> Result<usize, SerializationError> {
        let len = stamp_template(Self::TEMPLATE, buffer)?;
        let mut w = LayoutWriter::new(&mut buffer[..len]);
        w.put_bytes(&Self::SERIAL, &self.serial)?;
        w.put_u16(&Self::CHARGE_VOLTAGE, self.charge_voltage_mv)?;
        w.put_u8(&Self::SOC, self.soc)?;
        w.put_u16(&Self::VOLTAGE, self.pack_voltage_mv)?;
        w.put_u8(&Self::TEMP_A, self.temperature)?;
        w.put_u8(&Self::TEMP_B, self.temperature)?;
        w.put_u32(&Self::CHARGE_RUNTIME, self.charge_runtime)?;
        w.put_u32(&Self::DISCHARGE_RUNTIME, self.discharge_runtime)?;
        w.put_u8(&Self::UPPER, self.upper_limit)?;
        w.put_u8(&Self::LOWER, self.lower_limit)?;
        Ok(len)
    }
}

//==================================================================================VOLTAGE_REPORT_0x0B
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
/// Voltage report (0x0B). Carries the pack voltage twice, offset by +1000 mV
/// and by −1896 mV.
pub struct VoltageReport {
    pub pack_voltage_mv: u16,
}

impl VoltageReport {
    const RAISED: FieldDescriptor = FieldDescriptor::new("VoltagePlus1000", FieldKind::U16Le, 1);
    const LOWERED: FieldDescriptor = FieldDescriptor::new("VoltageMinus1896", FieldKind::U16Le, 9);

    pub fn from_state(state: &BridgeState) -> Self {
        Self {
            pack_voltage_mv: state.telemetry.pack_voltage_mv,
        }
    }
}

impl PayloadData for VoltageReport {
    const TEMPLATE: &'static [u8] = &VOLTAGE_REPORT_TEMPLATE;
    const FIELDS: &'static [&'static FieldDescriptor] = &[&Self::RAISED, &Self::LOWERED];

    fn from_payload(payload: &[u8]) -> Result<Self, DeserializationError> {
        expect_len(Self::TEMPLATE, payload)?;
        let raised = LayoutReader::new(payload).u16(&Self::RAISED)?;
        Ok(Self {
            pack_voltage_mv: raised.wrapping_sub(1000),
        })
    }

    fn to_payload(&self, buffer: &mut [u8]) -> Result<usize, SerializationError> {
        let len = stamp_template(Self::TEMPLATE, buffer)?;
        let mut w = LayoutWriter::new(&mut buffer[..len]);
        w.put_u16(&Self::RAISED, self.pack_voltage_mv.wrapping_add(1000))?;
        w.put_u16(&Self::LOWERED, self.pack_voltage_mv.wrapping_sub(1896))?;
        Ok(len)
    }
}

//==================================================================================SERIAL_ANNOUNCE_0x70
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
/// Serial announce (0x70).
pub struct SerialAnnounce {
    pub serial: [u8; SERIAL_LEN],
}

impl SerialAnnounce {
    const SERIAL: FieldDescriptor = serial_at(1);

    pub fn from_state(state: &BridgeState) -> Self {
        Self {
            serial: state.telemetry.serial,
        }
    }
}

impl PayloadData for SerialAnnounce {
    const TEMPLATE: &'static [u8] = &SERIAL_ANNOUNCE_TEMPLATE;
    const FIELDS: &'static [&'static FieldDescriptor] = &[&Self::SERIAL];

    fn from_payload(payload: &[u8]) -> Result<Self, DeserializationError> {
        expect_len(Self::TEMPLATE, payload)?;
        Ok(Self {
            serial: read_serial(&LayoutReader::new(payload), &Self::SERIAL)?,
        })
    }

    fn to_payload(&self, buffer: &mut [u8]) -> Result<usize, SerializationError> {
        let len = stamp_template(Self::TEMPLATE, buffer)?;
        LayoutWriter::new(&mut buffer[..len]).put_bytes(&Self::SERIAL, &self.serial)?;
        Ok(len)
    }
}

//==================================================================================VERSION_DATE_0x24
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
/// Version date reply (0x24).
pub struct VersionDate {
    pub serial: [u8; SERIAL_LEN],
}

impl VersionDate {
    const SERIAL: FieldDescriptor = serial_at(8);

    pub fn from_state(state: &BridgeState) -> Self {
        Self {
            serial: state.telemetry.serial,
        }
    }
}

impl PayloadData for VersionDate {
    const TEMPLATE: &'static [u8] = &VERSION_DATE_TEMPLATE;
    const FIELDS: &'static [&'static FieldDescriptor] = &[&Self::SERIAL];

    fn from_payload(payload: &[u8]) -> Result<Self, DeserializationError> {
        expect_len(Self::TEMPLATE, payload)?;
        Ok(Self {
            serial: read_serial(&LayoutReader::new(payload), &Self::SERIAL)?,
        })
    }

    fn to_payload(&self, buffer: &mut [u8]) -> Result<usize, SerializationError> {
        let len = stamp_template(Self::TEMPLATE, buffer)?;
        LayoutWriter::new(&mut buffer[..len]).put_bytes(&Self::SERIAL, &self.serial)?;
        Ok(len)
    }
}

//==================================================================================PACK_VOLTAGE_0x5C
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
/// Pack voltage (0x5C).
pub struct PackVoltage {
    pub pack_voltage_mv: u16,
}

impl PackVoltage {
    const VOLTAGE: FieldDescriptor = FieldDescriptor::new("PackVoltage", FieldKind::U16Le, 2);
    const RESERVED: FieldDescriptor = FieldDescriptor::new("Reserved", FieldKind::U8, 4);

    pub fn from_state(state: &BridgeState) -> Self {
        Self {
            pack_voltage_mv: state.telemetry.pack_voltage_mv,
        }
    }
}

impl PayloadData for PackVoltage {
    const TEMPLATE: &'static [u8] = &PACK_VOLTAGE_TEMPLATE;
    const FIELDS: &'static [&'static FieldDescriptor] = &[&Self::VOLTAGE, &Self::RESERVED];

    fn from_payload(payload: &[u8]) -> Result<Self, DeserializationError> {
        expect_len(Self::TEMPLATE, payload)?;
        Ok(Self {
            pack_voltage_mv: LayoutReader::new(payload).u16(&Self::VOLTAGE)?,
        })
    }

    fn to_payload(&self, buffer: &mut [u8]) -> Result<usize, SerializationError> {
        let len = stamp_template(Self::TEMPLATE, buffer)?;
        let mut w = LayoutWriter::new(&mut buffer[..len]);
        w.put_u16(&Self::VOLTAGE, self.pack_voltage_mv)?;
        w.put_u8(&Self::RESERVED, 0)?;
        Ok(len)
    }
}

//==================================================================================PACK_SUMMARY_0x68
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
/// Pack summary (0x68).
pub struct PackSummary {
    pub serial: [u8; SERIAL_LEN],
    pub soc: u8,
    pub pack_voltage_mv: u16,
    pub temperature: u8,
    pub charging: bool,
    /// Balance capacity × 1000, truncated to 16 bits.
    pub balance_capacity: u16,
    pub max_cell_mv: u16,
    pub min_cell_mv: u16,
    pub input_watts: i16,
    pub output_watts: i16,
    pub discharge_runtime: u32,
    pub upper_limit: u8,
    pub lower_limit: u8,
}

impl PackSummary {
    const SERIAL: FieldDescriptor = serial_at(0);
    const SOC: FieldDescriptor = FieldDescriptor::new("Soc", FieldKind::U8, 37);
    const VOLTAGE: FieldDescriptor = FieldDescriptor::new("PackVoltage", FieldKind::U16Le, 38);
    const TEMP: FieldDescriptor = FieldDescriptor::new("Temperature", FieldKind::U8, 46);
    const FLAG: FieldDescriptor = FieldDescriptor::new("ChargingFlag", FieldKind::U8, 47);
    const BALANCE: FieldDescriptor = FieldDescriptor::new("BalanceCapacity", FieldKind::U16Le, 57);
    const MAX_CELL: FieldDescriptor = FieldDescriptor::new("MaxCell", FieldKind::U16Le, 65);
    const MIN_CELL: FieldDescriptor = FieldDescriptor::new("MinCell", FieldKind::U16Le, 69);
    const INPUT: FieldDescriptor = FieldDescriptor::new("InputWatts", FieldKind::I16Le, 78);
    const OUTPUT: FieldDescriptor = FieldDescriptor::new("OutputWatts", FieldKind::I16Le, 82);
    const DISCHARGE_RUNTIME: FieldDescriptor =
        FieldDescriptor::new("DischargeRuntime", FieldKind::U32Le, 86);
    const UPPER: FieldDescriptor = FieldDescriptor::new("UpperLimit", FieldKind::U8, 91);
    const LOWER: FieldDescriptor = FieldDescriptor::new("LowerLimit", FieldKind::U8, 92);

    pub fn from_state(state: &BridgeState) -> Self {
        let t = &state.telemetry;
        let (min_cell_mv, max_cell_mv) = t.cell_extremes_mv();
        let balance = (t.balance_capacity as i16 as i32).wrapping_mul(1000);
        Self {
            serial: t.serial,
            soc: t.soc,
            pack_voltage_mv: t.pack_voltage_mv,
            temperature: t.temperature as u8,
            charging: t.is_charging(),
            balance_capacity: balance as u16,
            max_cell_mv,
            min_cell_mv,
            input_watts: t.input_watts as i16,
            output_watts: t.output_watts as i16,
            discharge_runtime: t.discharge_runtime,
            upper_limit: state.limits.upper,
            lower_limit: state.limits.lower,
        }
    }
}

impl PayloadData for PackSummary {
    const TEMPLATE: &'static [u8] = &PACK_SUMMARY_TEMPLATE;
    const FIELDS: &'static [&'static FieldDescriptor] = &[
        &Self::SERIAL,
        &Self::SOC,
        &Self::VOLTAGE,
        &Self::TEMP,
        &Self::FLAG,
        &Self::BALANCE,
        &Self::MAX_CELL,
        &Self::MIN_CELL,
        &Self::INPUT,
        &Self::OUTPUT,
        &Self::DISCHARGE_RUNTIME,
        &Self::UPPER,
        &Self::LOWER,
    ];

    fn from_payload(payload: &[u8]) -> Result<Self, DeserializationError> {
        expect_len(Self::TEMPLATE, payload)?;
        let r = LayoutReader::new(payload);
        Ok(Self {
            serial: read_serial(&r, &Self::SERIAL)?,
            soc: r.u8(&Self::SOC)?,
            pack_voltage_mv: r.u16(&Self::VOLTAGE)?,
            temperature: r.u8(&Self::TEMP)?,
            charging: r.u8(&Self::FLAG)? == charging_flag(true),
            balance_capacity: r.u16(&Self::BALANCE)?,
            max_cell_mv: r.u16(&Self::MAX_CELL)?,
            min_cell_mv: r.u16(&Self::MIN_CELL)?,
            input_watts: r.i16(&Self::INPUT)?,
            output_watts: r.i16(&Self::OUTPUT)?,
            discharge_runtime: r.u32(&Self::DISCHARGE_RUNTIME)?,
            upper_limit: r.u8(&Self::UPPER)?,
            lower_limit: r.u8(&Self::LOWER)?,
        })
    }

    fn to_payload(&self, buffer: &mut [u8]) -> Result<usize, SerializationError> {
        let len = stamp_template(Self::TEMPLATE, buffer)?;
        let mut w = LayoutWriter::new(&mut buffer[..len]);
        w.put_bytes(&Self::SERIAL, &self.serial)?;
        w.put_u8(&Self::SOC, self.soc)?;
        w.put_u16(&Self::VOLTAGE, self.pack_voltage_mv)?;
        w.put_u8(&Self::TEMP, self.temperature)?;
        w.put_u8(&Self::FLAG, charging_flag(self.charging))?;
        w.put_u16(&Self::BALANCE, self.balance_capacity)?;
        w.put_u16(&Self::MAX_CELL, self.max_cell_mv)?;
        w.put_u16(&Self::MIN_CELL, self.min_cell_mv)?;
        w.put_i16(&Self::INPUT, self.input_watts)?;
        w.put_i16(&Self::OUTPUT, self.output_watts)?;
        w.put_u32(&Self::DISCHARGE_RUNTIME, self.discharge_runtime)?;
        w.put_u8(&Self::UPPER, self.upper_limit)?;
        w.put_u8(&Self::LOWER, self.lower_limit)?;
        Ok(len)
    }
}

//==================================================================================POWER_FLOW_0x4F
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
/// Power flow (0x4F).
pub struct PowerFlow {
    pub soc: u8,
    pub charging: bool,
    pub input_watts: i32,
    pub output_watts: i32,
    pub charge_runtime: u32,
    pub upper_limit: u8,
    pub lower_limit: u8,
}

impl PowerFlow {
    const SOC: FieldDescriptor = FieldDescriptor::new("Soc", FieldKind::U8, 0);
    const FLAG: FieldDescriptor = FieldDescriptor::new("ChargingFlag", FieldKind::U8, 1);
    const INPUT: FieldDescriptor = FieldDescriptor::new("InputWatts", FieldKind::I32Le, 2);
    const OUTPUT: FieldDescriptor = FieldDescriptor::new("OutputWatts", FieldKind::I32Le, 6);
    const CHARGE_RUNTIME: FieldDescriptor = FieldDescriptor::new("ChargeRuntime", FieldKind::U32Le, 10);
    const UPPER: FieldDescriptor = FieldDescriptor::new("UpperLimit", FieldKind::U8, 15);
    const LOWER: FieldDescriptor = FieldDescriptor::new("LowerLimit", FieldKind::U8, 16);

    pub fn from_state(state: &BridgeState) -> Self {
        let t = &state.telemetry;
        let input_watts = t.input_watts as i32;
        Self {
            soc: t.soc,
            charging: input_watts > 0,
            input_watts,
            output_watts: t.output_watts as i32,
            charge_runtime: t.charge_runtime,
            upper_limit: state.limits.upper,
            lower_limit: state.limits.lower,
        }
    }
}

impl PayloadData for PowerFlow {
    const TEMPLATE: &'static [u8] = &POWER_FLOW_TEMPLATE;
    const FIELDS: &'static [&'static FieldDescriptor] = &[
        &Self::SOC,
        &Self::FLAG,
        &Self::INPUT,
        &Self::OUTPUT,
        &Self::CHARGE_RUNTIME,
        &Self::UPPER,
        &Self::LOWER,
    ];

    fn from_payload(payload: &[u8]) -> Result<Self, DeserializationError> {
        expect_len(Self::TEMPLATE, payload)?;
        let r = LayoutReader::new(payload);
        Ok(Self {
            soc: r.u8(&Self::SOC)?,
            charging: r.u8(&Self::FLAG)? == charging_flag(true),
            input_watts: r.i32(&Self::INPUT)?,
            output_watts: r.i32(&Self::OUTPUT)?,
            charge_runtime: r.u32(&Self::CHARGE_RUNTIME)?,
            upper_limit: r.u8(&Self::UPPER)?,
            lower_limit: r.u8(&Self::LOWER)?,
        })
    }

    fn to_payload(&self, buffer: &mut [u8]) -> Result<usize, SerializationError> {
        let len = stamp_template(Self::TEMPLATE, buffer)?;
        let mut w = LayoutWriter::new(&mut buffer[..len]);
        w.put_u8(&Self::SOC, self.soc)?;
        w.put_u8(&Self::FLAG, charging_flag(self.charging))?;
        w.put_i32(&Self::INPUT, self.input_watts)?;
        w.put_i32(&Self::OUTPUT, self.output_watts)?;
        w.put_u32(&Self::CHARGE_RUNTIME, self.charge_runtime)?;
        w.put_u8(&Self::UPPER, self.upper_limit)?;
        w.put_u8(&Self::LOWER, self.lower_limit)?;
        Ok(len)
    }
}

//==================================================================================STATIC_PAYLOADS
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
/// Version info reply (0x8C). Sent verbatim.
pub struct VersionInfo;

impl PayloadData for VersionInfo {
    const TEMPLATE: &'static [u8] = &VERSION_INFO_TEMPLATE;
    const FIELDS: &'static [&'static FieldDescriptor] = &[];

    fn from_payload(payload: &[u8]) -> Result<Self, DeserializationError> {
        expect_len(Self::TEMPLATE, payload)?;
        Ok(Self)
    }

    fn to_payload(&self, buffer: &mut [u8]) -> Result<usize, SerializationError> {
        stamp_template(Self::TEMPLATE, buffer)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
/// Limit frame or acknowledgement (0xCB), a single status byte.
pub struct LimitStatus {
    pub status: u8,
}

impl LimitStatus {
    const STATUS: FieldDescriptor = FieldDescriptor::new("Status", FieldKind::U8, 0);
}

impl Default for LimitStatus {
    fn default() -> Self {
        Self {
            status: LIMIT_TEMPLATE[0],
        }
    }
}

impl PayloadData for LimitStatus {
    const TEMPLATE: &'static [u8] = &LIMIT_TEMPLATE;
    const FIELDS: &'static [&'static FieldDescriptor] = &[&Self::STATUS];

    fn from_payload(payload: &[u8]) -> Result<Self, DeserializationError> {
        expect_len(Self::TEMPLATE, payload)?;
        Ok(Self {
            status: LayoutReader::new(payload).u8(&Self::STATUS)?,
        })
    }

    fn to_payload(&self, buffer: &mut [u8]) -> Result<usize, SerializationError> {
        let len = stamp_template(Self::TEMPLATE, buffer)?;
        LayoutWriter::new(&mut buffer[..len]).put_u8(&Self::STATUS, self.status)?;
        Ok(len)
    }
}
