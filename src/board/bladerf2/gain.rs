use crate::board::bladerf2::tables::{
    RX_GAIN_RANGES, TX_GAIN_RANGE, gain_mode_from_rfic, gain_mode_to_rfic, gain_stages,
};
use crate::board::bladerf2::{BladeRf2, BoardState, CheckStatus};
use crate::hardware::ad9361::RfGainCtrlMode;
use crate::{Error, Result};
use bladerf_globals::range::SdrRange;
use bladerf_globals::{BLADERF_CHANNEL_RX0, BLADERF_CHANNEL_RX1, BladerfGainMode, Direction};

/// Overall gain, in dB.
pub type GainDb = i32;

impl BladeRf2 {
    /// Gain range of `channel`. On RX it depends on the current frequency.
    pub fn get_gain_range(&mut self, channel: u8) -> Result<SdrRange> {
        self.check_state(BoardState::Initialized)?;

        match Direction::from_channel(channel) {
            Direction::Tx => Ok(TX_GAIN_RANGE),
            Direction::Rx => {
                let frequency = self
                    .get_frequency(channel)
                    .check("get_gain_range", "get_frequency")?;

                RX_GAIN_RANGES
                    .iter()
                    .find(|(range, _)| range.is_within_range(frequency as i64))
                    .map(|(_, gain)| *gain)
                    .ok_or_else(|| {
                        log::error!("get_gain_range: no RX gain range for {frequency}Hz");
                        Error::Range
                    })
            }
        }
    }

    /// Set the overall gain. Out of range values are clamped.
    ///
    /// TX gain is realised as attenuation: 0 dB is full power.
    pub fn set_gain(&mut self, channel: u8, gain: GainDb) -> Result<()> {
        const OP: &str = "set_gain";

        self.check_state(BoardState::Initialized)?;

        let range = self.get_gain_range(channel).check(OP, "get_gain_range")?;
        let clamped = range.clamp_to_range(gain as i64) as f64;
        let rfic_channel = channel >> 1;

        match Direction::from_channel(channel) {
            Direction::Tx => {
                let attenuation = (-clamped / range.scale).round() as u32;
                log::trace!("TX{rfic_channel} attenuation: {attenuation}mdB");
                self.phy()?
                    .set_tx_attenuation(rfic_channel, attenuation)
                    .check(OP, "ad9361_set_tx_attenuation")
            }
            Direction::Rx => {
                let rf_gain = (clamped / range.scale).round() as i32;
                log::trace!("RX{rfic_channel} gain: {rf_gain}dB");
                self.phy()?
                    .set_rx_rf_gain(rfic_channel, rf_gain)
                    .check(OP, "ad9361_set_rx_rf_gain")
            }
        }
    }

    pub fn get_gain(&mut self, channel: u8) -> Result<GainDb> {
        const OP: &str = "get_gain";

        self.check_state(BoardState::Initialized)?;

        let range = self.get_gain_range(channel).check(OP, "get_gain_range")?;
        let rfic_channel = channel >> 1;

        let gain = match Direction::from_channel(channel) {
            Direction::Tx => {
                let attenuation = self
                    .phy()?
                    .get_tx_attenuation(rfic_channel)
                    .check(OP, "ad9361_get_tx_attenuation")?;
                -(attenuation as f64 * range.scale)
            }
            Direction::Rx => {
                let rf_gain = self
                    .phy()?
                    .get_rx_rf_gain(rfic_channel)
                    .check(OP, "ad9361_get_rx_rf_gain")?;
                rf_gain as f64 * range.scale
            }
        };

        Ok(gain.round() as GainDb)
    }

    /// Gain control modes available on `channel`.
    pub fn get_gain_modes(&self, channel: u8) -> Vec<BladerfGainMode> {
        match Direction::from_channel(channel) {
            Direction::Tx => Vec::new(),
            Direction::Rx => vec![
                BladerfGainMode::Default,
                BladerfGainMode::Mgc,
                BladerfGainMode::FastattackAgc,
                BladerfGainMode::SlowattackAgc,
                BladerfGainMode::HybridAgc,
            ],
        }
    }

    /// RFIC channel of an RX channel, or `Unsupported` for TX.
    fn gain_mode_channel(op: &str, channel: u8) -> Result<u8> {
        match channel {
            BLADERF_CHANNEL_RX0 => Ok(0),
            BLADERF_CHANNEL_RX1 => Ok(1),
            _ => {
                log::error!("{op}: channel {channel} has no gain control mode");
                Err(Error::Unsupported)
            }
        }
    }

    /// Set the RX gain control mode. [`BladerfGainMode::Default`] selects the
    /// mode the RFIC was initialized with.
    pub fn set_gain_mode(&mut self, channel: u8, mode: BladerfGainMode) -> Result<()> {
        const OP: &str = "set_gain_mode";

        self.check_state(BoardState::Initialized)?;

        let rfic_channel = Self::gain_mode_channel(OP, channel)?;
        let rfic_mode = gain_mode_to_rfic(mode).unwrap_or(match rfic_channel {
            0 => self.config.rfic.gc_rx1_mode,
            _ => self.config.rfic.gc_rx2_mode,
        });

        log::debug!("RX{rfic_channel} gain control mode: {rfic_mode:?}");
        self.phy()?
            .set_rx_gain_control_mode(rfic_channel, rfic_mode)
            .check(OP, "ad9361_set_rx_gain_control_mode")
    }

    pub fn get_gain_mode(&mut self, channel: u8) -> Result<BladerfGainMode> {
        const OP: &str = "get_gain_mode";

        self.check_state(BoardState::Initialized)?;

        let rfic_channel = Self::gain_mode_channel(OP, channel)?;
        let raw = self
            .phy()?
            .get_rx_gain_control_mode(rfic_channel)
            .check(OP, "ad9361_get_rx_gain_control_mode")?;

        Ok(RfGainCtrlMode::from_raw(raw)
            .map(gain_mode_from_rfic)
            .unwrap_or(BladerfGainMode::Default))
    }

    pub fn get_gain_stages(&self, channel: u8) -> Vec<&'static str> {
        gain_stages(Direction::from_channel(channel))
            .iter()
            .map(|(name, _)| *name)
            .collect()
    }

    pub fn get_gain_stage_range(&self, channel: u8, stage: &str) -> Result<SdrRange> {
        gain_stages(Direction::from_channel(channel))
            .iter()
            .find(|(name, _)| *name == stage)
            .map(|(_, range)| *range)
            .ok_or_else(|| {
                log::error!("get_gain_stage_range: gain stage \"{stage}\" unsupported");
                Error::Unsupported
            })
    }

    /// Set a named gain stage. Unknown stages are ignored with a warning.
    pub fn set_gain_stage(&mut self, channel: u8, stage: &str, gain: GainDb) -> Result<()> {
        self.check_state(BoardState::Initialized)?;

        match (Direction::from_channel(channel), stage) {
            (Direction::Tx, "dsa") | (Direction::Rx, "full") => self.set_gain(channel, gain),
            (Direction::Rx, "digital") => {
                log::warn!("set_gain_stage: gain stage '{stage}' unsupported");
                Ok(())
            }
            _ => {
                log::warn!("set_gain_stage: gain stage '{stage}' invalid");
                Ok(())
            }
        }
    }

    /// Read a named gain stage. Unknown stages read as 0 with a warning.
    pub fn get_gain_stage(&mut self, channel: u8, stage: &str) -> Result<GainDb> {
        const OP: &str = "get_gain_stage";

        self.check_state(BoardState::Initialized)?;

        match Direction::from_channel(channel) {
            Direction::Tx if stage == "dsa" => return self.get_gain(channel),
            Direction::Tx => {}
            Direction::Rx => {
                let rx_gain = self
                    .phy()?
                    .get_rx_gain((channel >> 1) + 1)
                    .check(OP, "ad9361_get_rx_gain")?;

                match stage {
                    "full" => return Ok(rx_gain.gain_db),
                    "digital" => return Ok(rx_gain.digital_gain as GainDb),
                    _ => {}
                }
            }
        }

        log::warn!("{OP}: gain stage '{stage}' invalid");
        Ok(0)
    }
}
