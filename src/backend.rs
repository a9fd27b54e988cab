use crate::Result;
use crate::version::Version;
use bladerf_globals::Direction;
use bladerf_globals::bladerf2::BladerfDevSpeed;

/// Packet framing used for FPGA peripheral access.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FpgaProtocol {
    /// Pre-2.0 framing (bladeRF 1 FPGA images)
    NiosIILegacy,
    /// Generic `NiosPkt<A, D>` framing
    NiosII,
}

/// Transport to the FX3 firmware and the FPGA.
///
/// All accesses to FPGA peripherals (RFFE control register, config GPIO,
/// AD9361 SPI, ADF4002, INA219, trim DAC) go through here.
pub trait Backend: Send {
    fn get_fw_version(&mut self) -> Result<Version>;
    fn get_fpga_version(&mut self) -> Result<Version>;
    fn is_fw_ready(&mut self) -> Result<bool>;
    fn get_device_speed(&mut self) -> Result<BladerfDevSpeed>;
    fn is_fpga_configured(&mut self) -> Result<bool>;
    fn load_fpga(&mut self, image: &[u8]) -> Result<()>;
    fn set_fpga_protocol(&mut self, protocol: FpgaProtocol) -> Result<()>;

    fn rffe_control_read(&mut self) -> Result<u32>;
    fn rffe_control_write(&mut self, value: u32) -> Result<()>;

    /// Start or stop the sample data path of one direction in the firmware.
    fn enable_module(&mut self, direction: Direction, enable: bool) -> Result<()>;
    fn get_timestamp(&mut self, direction: Direction) -> Result<u64>;

    fn config_gpio_read(&mut self) -> Result<u32>;
    fn config_gpio_write(&mut self, value: u32) -> Result<()>;

    /// `cmd` carries the read/write bit, byte count and register address.
    /// Read data is returned in the top byte(s) of the 64-bit word.
    fn ad9361_spi_read(&mut self, cmd: u16) -> Result<u64>;
    fn ad9361_spi_write(&mut self, cmd: u16, data: u64) -> Result<()>;

    fn adf400x_read(&mut self, addr: u8) -> Result<u32>;
    fn adf400x_write(&mut self, addr: u8, data: u32) -> Result<()>;

    fn ina219_read(&mut self, addr: u8) -> Result<u16>;
    fn ina219_write(&mut self, addr: u8, data: u16) -> Result<()>;

    fn ad56x1_vctcxo_trim_dac_read(&mut self) -> Result<u16>;
    fn ad56x1_vctcxo_trim_dac_write(&mut self, value: u16) -> Result<()>;

    fn device_reset(&mut self) -> Result<()>;
    fn set_firmware_loopback(&mut self, enable: bool) -> Result<()>;
    fn get_firmware_loopback(&mut self) -> Result<bool>;
}
