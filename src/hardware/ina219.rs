//! INA219 power monitor on the board's I2C bus, reached through the FPGA.
use crate::backend::Backend;
use crate::{Error, Result};
use std::thread::sleep;
use std::time::Duration;

pub const INA219_REG_CONFIGURATION: u8 = 0x00;
pub const INA219_REG_SHUNT_VOLTAGE: u8 = 0x01;
pub const INA219_REG_BUS_VOLTAGE: u8 = 0x02;
pub const INA219_REG_POWER: u8 = 0x03;
pub const INA219_REG_CURRENT: u8 = 0x04;
pub const INA219_REG_CALIBRATION: u8 = 0x05;

const INA219_RESET: u16 = 0x8000;
/// 32V bus range, +/-320mV shunt range, 12-bit, continuous shunt and bus
const INA219_CONFIGURATION: u16 = 0x019f;
/// Current LSB, in A
const INA219_CURRENT_LSB: f32 = 0.001;
const INA219_RESET_POLLS: usize = 10;

/// Power monitor registers exposed to users.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PmicRegister {
    Configuration,
    VoltageShunt,
    VoltageBus,
    Power,
    Current,
    Calibration,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PmicValue {
    Raw(u16),
    /// Volts, watts or amperes, depending on the register.
    Float(f32),
}

/// Calibration register value for a shunt of `r_shunt` ohms.
pub fn ina219_calibration(r_shunt: f32) -> u16 {
    (0.04096 / (INA219_CURRENT_LSB * r_shunt) + 0.5) as u16
}

/// Reset the INA219 and program its configuration and calibration registers.
pub fn ina219_init(backend: &mut dyn Backend, r_shunt: f32) -> Result<()> {
    backend.ina219_write(INA219_REG_CONFIGURATION, INA219_RESET)?;

    let mut polls = 0;
    while backend.ina219_read(INA219_REG_CONFIGURATION)? & INA219_RESET != 0 {
        polls += 1;
        if polls >= INA219_RESET_POLLS {
            log::error!("INA219 did not come out of reset");
            return Err(Error::Timeout);
        }
        sleep(Duration::from_millis(1));
    }

    backend.ina219_write(INA219_REG_CONFIGURATION, INA219_CONFIGURATION)?;

    let calibration = ina219_calibration(r_shunt);
    log::trace!("INA219 calibration: {calibration:#06x}");
    backend.ina219_write(INA219_REG_CALIBRATION, calibration)?;

    Ok(())
}

pub fn ina219_read_shunt_voltage(backend: &mut dyn Backend) -> Result<f32> {
    let raw = backend.ina219_read(INA219_REG_SHUNT_VOLTAGE)? as i16;
    /* 10 uV LSB */
    Ok(raw as f32 * 0.000_01)
}

pub fn ina219_read_bus_voltage(backend: &mut dyn Backend) -> Result<f32> {
    let raw = backend.ina219_read(INA219_REG_BUS_VOLTAGE)?;
    /* 4 mV LSB, left aligned in bits 15:3 */
    Ok((raw >> 3) as f32 * 0.004)
}

pub fn ina219_read_power(backend: &mut dyn Backend) -> Result<f32> {
    let raw = backend.ina219_read(INA219_REG_POWER)?;
    Ok(raw as f32 * 20.0 * INA219_CURRENT_LSB)
}

pub fn ina219_read_current(backend: &mut dyn Backend) -> Result<f32> {
    let raw = backend.ina219_read(INA219_REG_CURRENT)? as i16;
    Ok(raw as f32 * INA219_CURRENT_LSB)
}

pub fn ina219_read_register(backend: &mut dyn Backend, reg: PmicRegister) -> Result<PmicValue> {
    let value = match reg {
        PmicRegister::Configuration => {
            PmicValue::Raw(backend.ina219_read(INA219_REG_CONFIGURATION)?)
        }
        PmicRegister::Calibration => PmicValue::Raw(backend.ina219_read(INA219_REG_CALIBRATION)?),
        PmicRegister::VoltageShunt => PmicValue::Float(ina219_read_shunt_voltage(backend)?),
        PmicRegister::VoltageBus => PmicValue::Float(ina219_read_bus_voltage(backend)?),
        PmicRegister::Power => PmicValue::Float(ina219_read_power(backend)?),
        PmicRegister::Current => PmicValue::Float(ina219_read_current(backend)?),
    };
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn calibration_for_default_shunt() {
        assert_eq!(ina219_calibration(0.001), 40960);
        assert_eq!(ina219_calibration(0.01), 4096);
    }
}
