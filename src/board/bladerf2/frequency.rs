use crate::board::bladerf2::tables::frequency_range;
use crate::board::bladerf2::{BladeRf2, BoardState, CheckStatus};
use crate::{Error, Result};
use bladerf_globals::Direction;
use bladerf_globals::bladerf2::BladerfQuickTune;
use bladerf_globals::range::SdrRange;

impl BladeRf2 {
    pub fn get_frequency_range(&self, channel: u8) -> SdrRange {
        *frequency_range(Direction::from_channel(channel))
    }

    /// Tune the LO of `channel`'s direction and update the band selection.
    ///
    /// The LO is not restored if the band selection fails afterwards.
    pub fn set_frequency(&mut self, channel: u8, frequency: u64) -> Result<()> {
        const OP: &str = "set_frequency";

        self.check_state(BoardState::Initialized)?;

        let direction = Direction::from_channel(channel);
        if !frequency_range(direction).is_within_range(frequency as i64) {
            log::error!("{OP}: frequency {frequency}Hz is out of range");
            return Err(Error::Range);
        }

        log::trace!("Setting {direction} frequency to {frequency}Hz");

        let phy = self.phy()?;
        match direction {
            Direction::Tx => phy
                .set_tx_lo_freq(frequency)
                .check(OP, "ad9361_set_tx_lo_freq")?,
            Direction::Rx => phy
                .set_rx_lo_freq(frequency)
                .check(OP, "ad9361_set_rx_lo_freq")?,
        }

        self.select_band(direction, frequency)
            .check(OP, "select_band")
    }

    pub fn get_frequency(&mut self, channel: u8) -> Result<u64> {
        const OP: &str = "get_frequency";

        self.check_state(BoardState::Initialized)?;

        let phy = self.phy()?;
        match Direction::from_channel(channel) {
            Direction::Tx => phy.get_tx_lo_freq().check(OP, "ad9361_get_tx_lo_freq"),
            Direction::Rx => phy.get_rx_lo_freq().check(OP, "ad9361_get_rx_lo_freq"),
        }
    }

    /// Quick re-tune profiles are not available on this board.
    pub fn get_quick_tune(&self, _channel: u8) -> Result<BladerfQuickTune> {
        Err(Error::Unsupported)
    }

    pub fn schedule_retune(
        &mut self,
        _channel: u8,
        _timestamp: u64,
        _frequency: u64,
        _quick_tune: Option<&BladerfQuickTune>,
    ) -> Result<()> {
        Err(Error::Unsupported)
    }

    pub fn cancel_scheduled_retunes(&mut self, _channel: u8) -> Result<()> {
        Err(Error::Unsupported)
    }
}
