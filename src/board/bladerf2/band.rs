use crate::board::bladerf2::tables::{
    RFFE_CONTROL_ENABLE, RFFE_CONTROL_RX_SW_SHIFT, RFFE_CONTROL_SPDT_MASK, RFFE_CONTROL_TXNRX,
    RFFE_CONTROL_TX_SW_SHIFT, band_by_frequency, band_port_for,
};
use crate::board::bladerf2::{Band, BladeRf2, BoardState, CheckStatus};
use crate::Result;
use bladerf_globals::Direction;

/// Position of the enable bit of `direction` in the RFFE control register.
pub(crate) fn rffe_enable_bit(direction: Direction) -> u32 {
    match direction {
        Direction::Tx => RFFE_CONTROL_TXNRX,
        Direction::Rx => RFFE_CONTROL_ENABLE,
    }
}

pub(crate) fn is_rffe_channel_enabled(reg: u32, direction: Direction) -> bool {
    (reg >> rffe_enable_bit(direction)) & 0x1 == 1
}

/// Replace the antenna switch bits of `direction` in `reg`.
pub(crate) fn set_spdt_bits(reg: &mut u32, direction: Direction, enabled: bool, frequency: u64) {
    let port = band_port_for(direction, enabled, frequency);
    let shift = match direction {
        Direction::Tx => RFFE_CONTROL_TX_SW_SHIFT,
        Direction::Rx => RFFE_CONTROL_RX_SW_SHIFT,
    };

    *reg &= !(RFFE_CONTROL_SPDT_MASK << shift);
    *reg |= port.spdt << shift;
}

impl BladeRf2 {
    /// Band a frequency falls into for `channel`.
    pub fn get_band(&self, channel: u8, frequency: u64) -> Band {
        band_by_frequency(Direction::from_channel(channel), frequency)
    }

    /// Point the RFIC input or output at the port serving `frequency`.
    pub(crate) fn set_rfic_port(
        &mut self,
        direction: Direction,
        enabled: bool,
        frequency: u64,
    ) -> Result<()> {
        self.check_state(BoardState::FpgaLoaded)?;

        let port = band_port_for(direction, enabled, frequency);
        let phy = self.phy()?;
        match direction {
            Direction::Tx => phy
                .set_tx_rf_port_output(port.rfic_port)
                .check("set_rfic_port", "setting rf port"),
            Direction::Rx => phy
                .set_rx_rf_port_input(port.rfic_port)
                .check("set_rfic_port", "setting rf port"),
        }
    }

    /// Apply the antenna switch and RFIC port for `frequency`, keeping the
    /// direction's current enable state.
    pub(crate) fn select_band(&mut self, direction: Direction, frequency: u64) -> Result<()> {
        const OP: &str = "select_band";

        self.check_state(BoardState::FpgaLoaded)?;

        let mut reg = self
            .backend
            .rffe_control_read()
            .check(OP, "rffe_control_read")?;

        let enabled = is_rffe_channel_enabled(reg, direction);
        log::trace!("{direction} enabled: {enabled}, frequency: {frequency}Hz");

        set_spdt_bits(&mut reg, direction, enabled, frequency);

        self.set_rfic_port(direction, enabled, frequency)
            .check(OP, "set_rfic_port")?;

        self.backend
            .rffe_control_write(reg)
            .check(OP, "rffe_control_write")
    }
}
