use crate::board::bladerf2::band::{rffe_enable_bit, set_spdt_bits};
use crate::board::bladerf2::{BladeRf2, BoardState, CheckStatus};
use crate::Result;
use bladerf_globals::Direction;

impl BladeRf2 {
    /// Enable or disable the direction of `channel`.
    ///
    /// Enabling routes the antenna switch and RFIC port for the current
    /// frequency. Disabling tears down the direction's synchronous interface
    /// before the hardware is switched off.
    pub fn enable_module(&mut self, channel: u8, enable: bool) -> Result<()> {
        const OP: &str = "enable_module";

        self.check_state(BoardState::Initialized)?;

        let direction = Direction::from_channel(channel);
        let mut frequency = 0;

        if enable {
            frequency = self.get_frequency(channel).check(OP, "get_frequency")?;
            self.set_rfic_port(direction, true, frequency)
                .check(OP, "set_rfic_port")?;
        } else if let Some(mut sync) = self.board_data.sync[direction.index()].take() {
            log::debug!("{OP}: stopping {direction} synchronous interface");
            sync.deinit();
        }

        let mut reg = self
            .backend
            .rffe_control_read()
            .check(OP, "rffe_control_read")?;

        if enable {
            log::debug!("{OP}: {direction} Enable");
            reg |= 1 << rffe_enable_bit(direction);
        } else {
            log::debug!("{OP}: {direction} Disable");
            reg &= !(1 << rffe_enable_bit(direction));
        }

        set_spdt_bits(&mut reg, direction, enable, frequency);

        self.backend
            .rffe_control_write(reg)
            .check(OP, "rffe_control_write")?;

        self.backend
            .enable_module(direction, enable)
            .check(OP, "enable_module")
    }
}
