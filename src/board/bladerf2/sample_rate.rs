use crate::board::bladerf2::tables::SAMPLE_RATE_RANGE;
use crate::board::bladerf2::{BladeRf2, BoardState, CheckStatus};
use crate::{Error, Result};
use bladerf_globals::range::SdrRange;
use bladerf_globals::{BladerfRationalRate, Direction};

impl BladeRf2 {
    pub fn get_sample_rate_range(&self, _channel: u8) -> SdrRange {
        SAMPLE_RATE_RANGE
    }

    pub fn get_sample_rate(&mut self, channel: u8) -> Result<u32> {
        const OP: &str = "get_sample_rate";

        self.check_state(BoardState::Initialized)?;

        let phy = self.phy()?;
        match Direction::from_channel(channel) {
            Direction::Tx => phy
                .get_tx_sampling_freq()
                .check(OP, "ad9361_get_tx_sampling_freq"),
            Direction::Rx => phy
                .get_rx_sampling_freq()
                .check(OP, "ad9361_get_rx_sampling_freq"),
        }
    }

    /// Set the sample rate, clamped to the supported range, and return the
    /// rate the RFIC actually settled on.
    pub fn set_sample_rate(&mut self, channel: u8, rate: u32) -> Result<u32> {
        const OP: &str = "set_sample_rate";

        self.check_state(BoardState::Initialized)?;

        let rate = SAMPLE_RATE_RANGE.clamp_to_range(rate as i64) as u32;
        log::trace!("Setting sample rate of channel {channel} to {rate}");

        let phy = self.phy()?;
        match Direction::from_channel(channel) {
            Direction::Tx => phy
                .set_tx_sampling_freq(rate)
                .check(OP, "ad9361_set_tx_sampling_freq")?,
            Direction::Rx => phy
                .set_rx_sampling_freq(rate)
                .check(OP, "ad9361_set_rx_sampling_freq")?,
        }

        self.get_sample_rate(channel)
    }

    /// The RFIC only runs at integer rates: the fractional part is always zero.
    pub fn get_rational_sample_rate(&mut self, channel: u8) -> Result<BladerfRationalRate> {
        self.check_state(BoardState::Initialized)?;

        let rate = self
            .get_sample_rate(channel)
            .check("get_rational_sample_rate", "get_sample_rate")?;

        Ok(BladerfRationalRate {
            integer: rate as u64,
            num: 0,
            den: 1,
        })
    }

    pub fn set_rational_sample_rate(
        &mut self,
        channel: u8,
        rate: &BladerfRationalRate,
    ) -> Result<BladerfRationalRate> {
        const OP: &str = "set_rational_sample_rate";

        self.check_state(BoardState::Initialized)?;

        if rate.den == 0 {
            log::error!("{OP}: denominator is zero");
            return Err(Error::Argument("denominator must be greater than 0"));
        }

        let integer_rate = rate.integer.saturating_add(rate.num / rate.den);
        let integer_rate = u32::try_from(integer_rate).unwrap_or(u32::MAX);

        self.set_sample_rate(channel, integer_rate)
            .check(OP, "set_sample_rate")?;

        self.get_rational_sample_rate(channel)
    }
}
