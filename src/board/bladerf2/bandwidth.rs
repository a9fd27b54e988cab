use crate::board::bladerf2::tables::BANDWIDTH_RANGE;
use crate::board::bladerf2::{BladeRf2, BoardState, CheckStatus};
use crate::Result;
use bladerf_globals::Direction;
use bladerf_globals::range::SdrRange;

impl BladeRf2 {
    pub fn get_bandwidth_range(&self, _channel: u8) -> SdrRange {
        BANDWIDTH_RANGE
    }

    pub fn get_bandwidth(&mut self, channel: u8) -> Result<u32> {
        const OP: &str = "get_bandwidth";

        self.check_state(BoardState::Initialized)?;

        let phy = self.phy()?;
        match Direction::from_channel(channel) {
            Direction::Tx => phy
                .get_tx_rf_bandwidth()
                .check(OP, "ad9361_get_tx_rf_bandwidth"),
            Direction::Rx => phy
                .get_rx_rf_bandwidth()
                .check(OP, "ad9361_get_rx_rf_bandwidth"),
        }
    }

    /// Set the RF bandwidth, clamped to the supported range, and return the
    /// bandwidth read back from the RFIC.
    pub fn set_bandwidth(&mut self, channel: u8, bandwidth: u32) -> Result<u32> {
        const OP: &str = "set_bandwidth";

        self.check_state(BoardState::Initialized)?;

        let bandwidth = BANDWIDTH_RANGE.clamp_to_range(bandwidth as i64) as u32;

        let phy = self.phy()?;
        match Direction::from_channel(channel) {
            Direction::Tx => phy
                .set_tx_rf_bandwidth(bandwidth)
                .check(OP, "ad9361_set_tx_rf_bandwidth")?,
            Direction::Rx => phy
                .set_rx_rf_bandwidth(bandwidth)
                .check(OP, "ad9361_set_rx_rf_bandwidth")?,
        }

        self.get_bandwidth(channel)
    }
}
