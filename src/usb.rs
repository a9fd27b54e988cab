//! Transport backend for the bladeRF 2.0 micro on top of [nusb].
//!
//! Vendor control requests drive the FX3 firmware, NIOS II packets on the RF
//! link interface reach the FPGA peripherals.
use crate::backend::{Backend, FpgaProtocol};
use crate::nios::Nios;
use crate::version::Version;
use crate::{Direction, Error, Result};
use bladerf_globals::bladerf2::{BLADERF2_USB_PID, BLADERF2_USB_VID, BladerfDevSpeed};
use bladerf_globals::{ENDPOINT_IN, ENDPOINT_OUT, StringDescriptors};
use bladerf_nios::{
    NIOS_PKT_8X16_TARGET_AD56X1_DAC, NIOS_PKT_8X16_TARGET_INA219, NIOS_PKT_8X32_TARGET_ADF400X,
    NIOS_PKT_8X32_TARGET_CONTROL, NIOS_PKT_8X32_TARGET_RFFE_CSR, NIOS_PKT_8X32_TARGET_VERSION,
    NIOS_PKT_8X64_TARGET_TIMESTAMP, NIOS_PKT_8X64_TIMESTAMP_RX, NIOS_PKT_8X64_TIMESTAMP_TX,
    NIOS_PKT_16X64_TARGET_AD9361,
};
use futures_lite::future::block_on;
use nusb::transfer::{Control, ControlType, Recipient};
use nusb::{Device, DeviceInfo, Interface, Speed};
use std::num::NonZero;
use std::thread::sleep;
use std::time::Duration;

pub const BLADE_USB_CMD_QUERY_VERSION: u8 = 0;
pub const BLADE_USB_CMD_QUERY_FPGA_STATUS: u8 = 1;
pub const BLADE_USB_CMD_BEGIN_PROG: u8 = 2;
pub const BLADE_USB_CMD_END_PROG: u8 = 3;
pub const BLADE_USB_CMD_RF_RX: u8 = 4;
pub const BLADE_USB_CMD_RF_TX: u8 = 5;
pub const BLADE_USB_CMD_QUERY_DEVICE_READY: u8 = 6;
pub const BLADE_USB_CMD_RESET: u8 = 105;
pub const BLADE_USB_CMD_SET_LOOPBACK: u8 = 113;
pub const BLADE_USB_CMD_GET_LOOPBACK: u8 = 114;

/// Interface alternate settings
pub const USB_IF_NULL: u8 = 0;
pub const USB_IF_RF_LINK: u8 = 1;
pub const USB_IF_SPI_FLASH: u8 = 2;
pub const USB_IF_CONFIG: u8 = 3;

/// US English, the only language the firmware provides.
const LANGUAGE_ID: u16 = 0x409;

const CTRL_TIMEOUT: Duration = Duration::from_secs(5);

/// FX3 status `CY_U3P_ERROR_ALREADY_STARTED`, reported when a module is
/// enabled twice. Harmless.
const FX3_ERROR_ALREADY_STARTED: i32 = 0x44;

/// FPGA configuration status polls after programming.
const FPGA_STATUS_POLLS: usize = 10;
const FPGA_STATUS_POLL_INTERVAL: Duration = Duration::from_millis(200);

pub struct UsbBackend {
    device: Device,
    interface: Interface,
    speed: BladerfDevSpeed,
    protocol: FpgaProtocol,
}

impl UsbBackend {
    fn list_bladerf2() -> Result<impl Iterator<Item = DeviceInfo>> {
        Ok(nusb::list_devices()?.filter(|dev| {
            dev.vendor_id() == BLADERF2_USB_VID && dev.product_id() == BLADERF2_USB_PID
        }))
    }

    fn build(info: DeviceInfo) -> Result<Self> {
        let speed = match info.speed() {
            Some(Speed::Super) | Some(Speed::SuperPlus) => BladerfDevSpeed::Super,
            Some(Speed::High) => BladerfDevSpeed::High,
            _ => BladerfDevSpeed::Unknown,
        };
        log::debug!(
            "Opening bladeRF 2.0 at {:03}:{:03} ({speed:?})",
            info.bus_number(),
            info.device_address()
        );

        let device = info.open()?;
        let interface = device.detach_and_claim_interface(0)?;
        let backend = Self {
            device,
            interface,
            speed,
            protocol: FpgaProtocol::NiosII,
        };
        backend.change_setting(USB_IF_RF_LINK)?;

        Ok(backend)
    }

    pub fn from_first() -> Result<Self> {
        let info = Self::list_bladerf2()?.next().ok_or(Error::NotFound)?;
        Self::build(info)
    }

    pub fn from_serial(serial: &str) -> Result<Self> {
        let info = Self::list_bladerf2()?
            .find(|dev| dev.serial_number() == Some(serial))
            .ok_or(Error::NotFound)?;
        Self::build(info)
    }

    pub fn from_bus_addr(bus_number: u8, address: u8) -> Result<Self> {
        let info = Self::list_bladerf2()?
            .find(|dev| dev.bus_number() == bus_number && dev.device_address() == address)
            .ok_or(Error::NotFound)?;
        Self::build(info)
    }

    /// USB string descriptor in US English.
    pub fn get_string_descriptor(&self, descriptor: StringDescriptors) -> Result<String> {
        let index = NonZero::new(descriptor as u8).ok_or(Error::Invalid)?;
        self.device
            .get_string_descriptor(index.get(), LANGUAGE_ID, CTRL_TIMEOUT)
            .map_err(|e| {
                log::error!("get_string_descriptor: {e}");
                Error::Invalid
            })
    }

    pub fn serial(&self) -> Result<String> {
        self.get_string_descriptor(StringDescriptors::Serial)
    }

    pub fn manufacturer(&self) -> Result<String> {
        self.get_string_descriptor(StringDescriptors::Manufacturer)
    }

    pub fn product(&self) -> Result<String> {
        self.get_string_descriptor(StringDescriptors::Product)
    }

    pub fn fx3_firmware(&self) -> Result<String> {
        self.get_string_descriptor(StringDescriptors::Fx3Firmware)
    }

    fn change_setting(&self, setting: u8) -> Result<()> {
        log::trace!("Changing alternate setting to {setting}");
        Ok(self.interface.set_alt_setting(setting)?)
    }

    /// Vendor request returning a 32-bit status word.
    fn vendor_cmd_int_wvalue(&self, cmd: u8, wvalue: u16) -> Result<i32> {
        let control = Control {
            control_type: ControlType::Vendor,
            recipient: Recipient::Device,
            request: cmd,
            value: wvalue,
            index: 0,
        };
        let mut buf = [0u8; 4];
        let len = self
            .interface
            .control_in_blocking(control, &mut buf, CTRL_TIMEOUT)?;
        if len != buf.len() {
            return Err(Error::TransferTruncated {
                actual: len,
                expected: buf.len(),
            });
        }

        let value = i32::from_le_bytes(buf);
        log::trace!("vendor_cmd_int({cmd}, {wvalue:#x}) -> {value:#x}");
        Ok(value)
    }

    fn vendor_cmd_int(&self, cmd: u8) -> Result<i32> {
        self.vendor_cmd_int_wvalue(cmd, 0)
    }

    fn nios_read<A, D>(&self, target_id: u8, addr: A) -> Result<D>
    where
        A: bladerf_nios::packet::NiosWord,
        D: bladerf_nios::packet::NiosWord,
    {
        self.check_protocol()?;
        self.interface
            .nios_read(ENDPOINT_IN, ENDPOINT_OUT, target_id, addr)
    }

    fn nios_write<A, D>(&self, target_id: u8, addr: A, data: D) -> Result<()>
    where
        A: bladerf_nios::packet::NiosWord,
        D: bladerf_nios::packet::NiosWord,
    {
        self.check_protocol()?;
        self.interface
            .nios_write(ENDPOINT_IN, ENDPOINT_OUT, target_id, addr, data)
    }

    fn check_protocol(&self) -> Result<()> {
        match self.protocol {
            FpgaProtocol::NiosII => Ok(()),
            FpgaProtocol::NiosIILegacy => {
                log::error!("Legacy NIOS II framing is not supported by this board");
                Err(Error::Unsupported)
            }
        }
    }

    fn poll_fpga_configured(&mut self) -> Result<()> {
        for _ in 0..FPGA_STATUS_POLLS {
            if self.is_fpga_configured()? {
                return Ok(());
            }
            sleep(FPGA_STATUS_POLL_INTERVAL);
        }
        log::error!("Timeout while waiting for FPGA configuration status");
        Err(Error::Timeout)
    }
}

impl Backend for UsbBackend {
    fn get_fw_version(&mut self) -> Result<Version> {
        let descriptor = self.fx3_firmware()?;
        Version::parse(&descriptor).ok_or_else(|| {
            log::error!("Unable to parse firmware version \"{descriptor}\"");
            Error::Unexpected
        })
    }

    fn get_fpga_version(&mut self) -> Result<Version> {
        let word: u32 = self.nios_read(NIOS_PKT_8X32_TARGET_VERSION, 0u8)?;
        Ok(Version::from_fpga_word(word))
    }

    fn is_fw_ready(&mut self) -> Result<bool> {
        Ok(self.vendor_cmd_int(BLADE_USB_CMD_QUERY_DEVICE_READY)? == 1)
    }

    fn get_device_speed(&mut self) -> Result<BladerfDevSpeed> {
        Ok(self.speed)
    }

    fn is_fpga_configured(&mut self) -> Result<bool> {
        match self.vendor_cmd_int(BLADE_USB_CMD_QUERY_FPGA_STATUS)? {
            0 => Ok(false),
            1 => Ok(true),
            other => {
                log::error!("Unexpected FPGA status {other}");
                Err(Error::Unexpected)
            }
        }
    }

    fn load_fpga(&mut self, image: &[u8]) -> Result<()> {
        self.change_setting(USB_IF_CONFIG)?;

        let result = self.vendor_cmd_int(BLADE_USB_CMD_BEGIN_PROG)?;
        if result != 0 {
            log::error!("Failed to start FPGA programming, result = {result}");
            return Err(Error::Unexpected);
        }

        log::debug!("Sending {} byte FPGA image", image.len());
        let completion = block_on(self.interface.bulk_out(ENDPOINT_OUT, image.to_vec()));
        let sent = completion.data.actual_length();
        completion.status?;
        if sent != image.len() {
            return Err(Error::TransferTruncated {
                actual: sent,
                expected: image.len(),
            });
        }

        let result = self.vendor_cmd_int(BLADE_USB_CMD_END_PROG)?;
        if result != 0 {
            log::warn!("Unexpected end programming result: {result}");
        }

        self.poll_fpga_configured()?;
        self.change_setting(USB_IF_RF_LINK)
    }

    fn set_fpga_protocol(&mut self, protocol: FpgaProtocol) -> Result<()> {
        log::debug!("FPGA protocol: {protocol:?}");
        self.protocol = protocol;
        Ok(())
    }

    fn rffe_control_read(&mut self) -> Result<u32> {
        self.nios_read(NIOS_PKT_8X32_TARGET_RFFE_CSR, 0u8)
    }

    fn rffe_control_write(&mut self, value: u32) -> Result<()> {
        self.nios_write(NIOS_PKT_8X32_TARGET_RFFE_CSR, 0u8, value)
    }

    fn enable_module(&mut self, direction: Direction, enable: bool) -> Result<()> {
        let cmd = match direction {
            Direction::Rx => BLADE_USB_CMD_RF_RX,
            Direction::Tx => BLADE_USB_CMD_RF_TX,
        };

        let fx3_ret = self.vendor_cmd_int_wvalue(cmd, enable as u16)?;
        if fx3_ret != 0 {
            log::warn!(
                "FX3 reported error={fx3_ret:#x} when {} RF {direction}",
                if enable { "enabling" } else { "disabling" }
            );
            if fx3_ret != FX3_ERROR_ALREADY_STARTED {
                return Err(Error::Unexpected);
            }
        }
        Ok(())
    }

    fn get_timestamp(&mut self, direction: Direction) -> Result<u64> {
        let addr = match direction {
            Direction::Rx => NIOS_PKT_8X64_TIMESTAMP_RX,
            Direction::Tx => NIOS_PKT_8X64_TIMESTAMP_TX,
        };
        self.nios_read(NIOS_PKT_8X64_TARGET_TIMESTAMP, addr)
    }

    fn config_gpio_read(&mut self) -> Result<u32> {
        self.nios_read(NIOS_PKT_8X32_TARGET_CONTROL, 0u8)
    }

    fn config_gpio_write(&mut self, value: u32) -> Result<()> {
        self.nios_write(NIOS_PKT_8X32_TARGET_CONTROL, 0u8, value)
    }

    fn ad9361_spi_read(&mut self, cmd: u16) -> Result<u64> {
        self.nios_read(NIOS_PKT_16X64_TARGET_AD9361, cmd)
    }

    fn ad9361_spi_write(&mut self, cmd: u16, data: u64) -> Result<()> {
        self.nios_write(NIOS_PKT_16X64_TARGET_AD9361, cmd, data)
    }

    fn adf400x_read(&mut self, addr: u8) -> Result<u32> {
        self.nios_read(NIOS_PKT_8X32_TARGET_ADF400X, addr)
    }

    fn adf400x_write(&mut self, addr: u8, data: u32) -> Result<()> {
        self.nios_write(NIOS_PKT_8X32_TARGET_ADF400X, addr, data)
    }

    fn ina219_read(&mut self, addr: u8) -> Result<u16> {
        self.nios_read(NIOS_PKT_8X16_TARGET_INA219, addr)
    }

    fn ina219_write(&mut self, addr: u8, data: u16) -> Result<()> {
        self.nios_write(NIOS_PKT_8X16_TARGET_INA219, addr, data)
    }

    fn ad56x1_vctcxo_trim_dac_read(&mut self) -> Result<u16> {
        self.nios_read(NIOS_PKT_8X16_TARGET_AD56X1_DAC, 0u8)
    }

    fn ad56x1_vctcxo_trim_dac_write(&mut self, value: u16) -> Result<()> {
        self.nios_write(NIOS_PKT_8X16_TARGET_AD56X1_DAC, 0u8, value)
    }

    fn device_reset(&mut self) -> Result<()> {
        let control = Control {
            control_type: ControlType::Vendor,
            recipient: Recipient::Device,
            request: BLADE_USB_CMD_RESET,
            value: 0,
            index: 0,
        };
        self.interface
            .control_out_blocking(control, &[], CTRL_TIMEOUT)?;
        Ok(())
    }

    fn set_firmware_loopback(&mut self, enable: bool) -> Result<()> {
        self.vendor_cmd_int_wvalue(BLADE_USB_CMD_SET_LOOPBACK, enable as u16)?;
        self.change_setting(USB_IF_NULL)?;
        self.change_setting(USB_IF_RF_LINK)
    }

    fn get_firmware_loopback(&mut self) -> Result<bool> {
        Ok(self.vendor_cmd_int(BLADE_USB_CMD_GET_LOOPBACK)? != 0)
    }
}
