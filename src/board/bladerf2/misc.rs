use crate::board::bladerf2::{BladeRf2, BoardState, CheckStatus};
use crate::{Error, Result};
use bladerf_globals::bladerf2::{BladerfTuningMode, BladerfVctcxoTamerMode, BladerfXb};

/// The trim DAC is not calibrated in flash on this board, it idles at mid scale.
const VCTCXO_TRIM_DEFAULT: u16 = 0x7fff;

impl BladeRf2 {
    pub fn get_vctcxo_trim(&self) -> Result<u16> {
        self.check_state(BoardState::FirmwareLoaded)?;
        Ok(VCTCXO_TRIM_DEFAULT)
    }

    pub fn trim_dac_read(&mut self) -> Result<u16> {
        self.check_state(BoardState::FpgaLoaded)?;
        self.backend
            .ad56x1_vctcxo_trim_dac_read()
            .check("trim_dac_read", "ad56x1_vctcxo_trim_dac_read")
    }

    pub fn trim_dac_write(&mut self, value: u16) -> Result<()> {
        self.check_state(BoardState::FpgaLoaded)?;
        log::trace!("VCTCXO trim DAC <- {value:#06x}");
        self.backend
            .ad56x1_vctcxo_trim_dac_write(value)
            .check("trim_dac_write", "ad56x1_vctcxo_trim_dac_write")
    }

    pub fn set_vctcxo_tamer_mode(&mut self, _mode: BladerfVctcxoTamerMode) -> Result<()> {
        Err(Error::Unsupported)
    }

    pub fn get_vctcxo_tamer_mode(&self) -> Result<BladerfVctcxoTamerMode> {
        Err(Error::Unsupported)
    }

    pub fn set_tuning_mode(&mut self, _mode: BladerfTuningMode) -> Result<()> {
        Err(Error::Unsupported)
    }

    pub fn get_tuning_mode(&self) -> Result<BladerfTuningMode> {
        Err(Error::Unsupported)
    }

    pub fn config_gpio_read(&mut self) -> Result<u32> {
        self.check_state(BoardState::FpgaLoaded)?;
        self.backend
            .config_gpio_read()
            .check("config_gpio_read", "config_gpio_read")
    }

    pub fn config_gpio_write(&mut self, value: u32) -> Result<()> {
        self.check_state(BoardState::FpgaLoaded)?;
        self.backend
            .config_gpio_write(value)
            .check("config_gpio_write", "config_gpio_write")
    }

    /// No expansion boards exist for this board.
    pub fn expansion_attach(&mut self, _xb: BladerfXb) -> Result<()> {
        Err(Error::Unsupported)
    }

    pub fn expansion_get_attached(&self) -> BladerfXb {
        BladerfXb::None
    }
}
