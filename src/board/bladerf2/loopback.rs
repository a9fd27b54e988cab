use crate::board::bladerf2::{BladeRf2, BoardState, CheckStatus};
use crate::{Error, Result};
use bladerf_globals::BladerfLoopback;

/// RFIC built-in self test: digital TX to RX loopback.
const BIST_LOOPBACK_DIGITAL: i32 = 1;

impl BladeRf2 {
    pub fn is_loopback_mode_supported(&self, lb: BladerfLoopback) -> bool {
        matches!(
            lb,
            BladerfLoopback::None | BladerfLoopback::Firmware | BladerfLoopback::RficBist
        )
    }

    pub fn set_loopback(&mut self, lb: BladerfLoopback) -> Result<()> {
        const OP: &str = "set_loopback";

        self.check_state(BoardState::Initialized)?;

        if !self.is_loopback_mode_supported(lb) {
            log::error!("{OP}: decoding loopback mode {lb:?} failed");
            return Err(Error::Unsupported);
        }

        let bist = if lb == BladerfLoopback::RficBist {
            BIST_LOOPBACK_DIGITAL
        } else {
            0
        };

        self.phy()?
            .bist_loopback(bist)
            .check(OP, "ad9361_bist_loopback")?;

        self.backend
            .set_firmware_loopback(lb == BladerfLoopback::Firmware)
            .check(OP, "set_firmware_loopback")
    }

    pub fn get_loopback(&mut self) -> Result<BladerfLoopback> {
        const OP: &str = "get_loopback";

        self.check_state(BoardState::Initialized)?;

        if self
            .backend
            .get_firmware_loopback()
            .check(OP, "get_firmware_loopback")?
        {
            return Ok(BladerfLoopback::Firmware);
        }

        let bist = self
            .phy()?
            .get_bist_loopback()
            .check(OP, "ad9361_get_bist_loopback")?;

        if bist == BIST_LOOPBACK_DIGITAL {
            Ok(BladerfLoopback::RficBist)
        } else {
            Ok(BladerfLoopback::None)
        }
    }
}
