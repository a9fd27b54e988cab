use crate::backend::Backend;
use crate::board::bladerf2::{BladeRf2, BoardState};
use crate::config::Config;
use crate::flash::FlashOps;
use crate::hardware::ad9361::{AD_ADDR_MASK, AD_READ, AD_WRITE, PhyFactory, ad_cnt};
use crate::streaming::StreamEngine;
use crate::trigger::TriggerOps;
use crate::version::VersionClassifier;
use crate::{Error, Result};
use std::sync::{Mutex, MutexGuard};

/// Everything a board needs from the outside world.
pub struct BoardParts {
    pub backend: Box<dyn Backend>,
    pub phy_factory: Box<dyn PhyFactory>,
    pub streaming: Box<dyn StreamEngine>,
    pub flash: Box<dyn FlashOps>,
    pub trigger: Box<dyn TriggerOps>,
    pub classifier: Box<dyn VersionClassifier>,
}

/// An open bladeRF 2.0 micro.
///
/// The board sits behind a single lock. Callers take it with [`Device::lock`]
/// and run board operations on the guard. Dropping the guard releases the
/// device, including on early returns.
pub struct Device {
    board: Mutex<BladeRf2>,
}

impl Device {
    /// Bring the board up as far as the attached hardware allows.
    ///
    /// A board without an FPGA image is still returned, in the
    /// [`BoardState::FirmwareLoaded`] state, so that an image can be loaded
    /// or flashed.
    pub fn open(parts: BoardParts, config: Config) -> Result<Self> {
        let board = BladeRf2::open(parts, config)?;
        Ok(Self {
            board: Mutex::new(board),
        })
    }

    pub fn lock(&self) -> Result<MutexGuard<'_, BladeRf2>> {
        self.board.lock().map_err(|_| {
            log::error!("device lock poisoned");
            Error::Unexpected
        })
    }

    /// Release the board. Equivalent to dropping the device.
    pub fn close(self) {
        log::debug!("Closing device");
        drop(self);
    }

    /// Read one AD9361 register.
    pub fn ad9361_read(&self, address: u16) -> Result<u8> {
        let mut board = self.lock()?;
        board.check_state(BoardState::FpgaLoaded)?;

        let cmd = AD_READ | ad_cnt(1) | (address & AD_ADDR_MASK);
        let data = board.backend_mut().ad9361_spi_read(cmd).inspect_err(|e| {
            log::error!("ad9361_read: ad9361_spi_read failed: {e}");
        })?;

        let value = ((data >> 56) & 0xff) as u8;
        log::trace!("AD9361[{address:#05x}] -> {value:#04x}");
        Ok(value)
    }

    /// Write one AD9361 register.
    pub fn ad9361_write(&self, address: u16, value: u8) -> Result<()> {
        let mut board = self.lock()?;
        board.check_state(BoardState::FpgaLoaded)?;

        let cmd = AD_WRITE | ad_cnt(1) | (address & AD_ADDR_MASK);
        let data = (value as u64) << 56;
        log::trace!("AD9361[{address:#05x}] <- {value:#04x}");
        board.backend_mut().ad9361_spi_write(cmd, data).inspect_err(|e| {
            log::error!("ad9361_write: ad9361_spi_write failed: {e}");
        })
    }

    /// Read one ADF4002 latch. Only the two low address bits are used.
    pub fn adf4002_read(&self, address: u8) -> Result<u32> {
        let mut board = self.lock()?;
        board.check_state(BoardState::FpgaLoaded)?;

        board.backend_mut().adf400x_read(address & 0x3).inspect_err(|e| {
            log::error!("adf4002_read: adf400x_read failed: {e}");
        })
    }

    pub fn adf4002_write(&self, address: u8, value: u32) -> Result<()> {
        let mut board = self.lock()?;
        board.check_state(BoardState::FpgaLoaded)?;

        board
            .backend_mut()
            .adf400x_write(address & 0x3, value)
            .inspect_err(|e| {
                log::error!("adf4002_write: adf400x_write failed: {e}");
            })
    }
}
