//! The bladeRF 2.0 micro board: AD9361 RFIC, ADF4002 reference PLL and the
//! FPGA-side RF front end control register.
mod band;
mod bandwidth;
mod basic;
mod corrections;
mod enable;
mod flash;
mod frequency;
mod gain;
mod loopback;
mod misc;
mod rf_port;
mod rx_mux;
mod sample_rate;
mod stream;
mod tables;
mod trigger;

pub use gain::GainDb;
pub use rx_mux::{BLADERF_GPIO_RX_MUX_MASK, BLADERF_GPIO_RX_MUX_SHIFT};
pub use tables::Band;

use crate::backend::Backend;
use crate::config::Config;
use crate::flash::FlashOps;
use crate::hardware::ad9361::{Ad9361Phy, PhyFactory, PhyResult};
use crate::streaming::{StreamEngine, SyncStream};
use crate::trigger::TriggerOps;
use crate::version::{Version, VersionClassifier};
use crate::{Error, Result};
use bladerf_globals::bladerf2::BladerfFpgaSize;
use std::fmt::{Display, Formatter};

/// Bring-up state of the board. Each state implies all the previous ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum BoardState {
    /// Nothing is known about the device yet.
    Uninitialized,
    /// Firmware version read and the firmware reported ready.
    FirmwareLoaded,
    /// The FPGA is configured with a hosted image.
    FpgaLoaded,
    /// RFIC and front end are set up. All operations are available.
    Initialized,
}

impl BoardState {
    pub fn name(&self) -> &'static str {
        match self {
            BoardState::Uninitialized => "Uninitialized",
            BoardState::FirmwareLoaded => "Firmware Loaded",
            BoardState::FpgaLoaded => "FPGA Loaded",
            BoardState::Initialized => "Initialized",
        }
    }
}

impl Display for BoardState {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

pub(crate) struct BoardData {
    pub(crate) state: BoardState,
    pub(crate) capabilities: u64,
    pub(crate) fpga_size: BladerfFpgaSize,
    /// USB data message size, depends on the bus speed.
    pub(crate) msg_size: usize,
    pub(crate) fw_version: Version,
    pub(crate) fpga_version: Version,
    pub(crate) phy: Option<Box<dyn Ad9361Phy>>,
    /// Synchronous interface handles, indexed by [`bladerf_globals::Direction::index`].
    pub(crate) sync: [Option<Box<dyn SyncStream>>; 2],
}

impl Default for BoardData {
    fn default() -> Self {
        Self {
            state: BoardState::Uninitialized,
            capabilities: 0,
            fpga_size: BladerfFpgaSize::Unknown,
            msg_size: 0,
            fw_version: Version::default(),
            fpga_version: Version::default(),
            phy: None,
            sync: [None, None],
        }
    }
}

pub struct BladeRf2 {
    backend: Box<dyn Backend>,
    phy_factory: Box<dyn PhyFactory>,
    streaming: Box<dyn StreamEngine>,
    flash: Box<dyn FlashOps>,
    trigger: Box<dyn TriggerOps>,
    classifier: Box<dyn VersionClassifier>,
    config: Config,
    board_data: BoardData,
}

impl BladeRf2 {
    /// Fail with [`Error::NotInit`] unless the board reached `required`.
    pub fn check_state(&self, required: BoardState) -> Result<()> {
        let actual = self.board_data.state;
        if actual < required {
            log::error!(
                "Board state insufficient for operation (current \"{actual}\", requires \"{required}\")"
            );
            return Err(Error::NotInit {
                required: required.name(),
                actual: actual.name(),
            });
        }
        Ok(())
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub(crate) fn backend_mut(&mut self) -> &mut dyn Backend {
        self.backend.as_mut()
    }

    /// The RFIC driver handle. Only present once the board is initialized.
    pub(crate) fn phy(&mut self) -> Result<&mut dyn Ad9361Phy> {
        match self.board_data.phy.as_deref_mut() {
            Some(phy) => Ok(phy),
            None => {
                log::error!("RFIC is not initialized");
                Err(Error::Unexpected)
            }
        }
    }
}

impl Drop for BladeRf2 {
    fn drop(&mut self) {
        for sync in self.board_data.sync.iter_mut() {
            if let Some(mut handle) = sync.take() {
                handle.deinit();
            }
        }
        if let Some(mut phy) = self.board_data.phy.take() {
            log::debug!("Releasing RFIC driver");
            phy.deinit();
        }
    }
}

/// Log a failing sub-call of a board operation and hand the error on.
pub(crate) trait CheckStatus<T> {
    fn check(self, op: &str, what: &str) -> Result<T>;
}

impl<T> CheckStatus<T> for Result<T> {
    fn check(self, op: &str, what: &str) -> Result<T> {
        self.inspect_err(|e| log::error!("{op}: {what} failed: {e}"))
    }
}

impl<T> CheckStatus<T> for PhyResult<T> {
    fn check(self, op: &str, what: &str) -> Result<T> {
        self.map_err(Error::from_errno).check(op, what)
    }
}
