use crate::board::bladerf2::tables::port_names;
use crate::board::bladerf2::{BladeRf2, BoardState, CheckStatus};
use crate::{Error, Result};
use bladerf_globals::Direction;

impl BladeRf2 {
    /// Select the RFIC port of `channel` by name, e.g. `"A_BALANCED"` or `"TXB"`.
    ///
    /// This bypasses the automatic band selection until the next frequency change.
    pub fn set_rf_port(&mut self, channel: u8, port: &str) -> Result<()> {
        const OP: &str = "set_rf_port";

        self.check_state(BoardState::Initialized)?;

        let direction = Direction::from_channel(channel);
        let Some(&(_, id)) = port_names(direction).iter().find(|(name, _)| *name == port) else {
            log::error!("{OP}: port \"{port}\" is not valid");
            return Err(Error::Invalid);
        };

        let phy = self.phy()?;
        match direction {
            Direction::Tx => phy
                .set_tx_rf_port_output(id)
                .check(OP, "ad9361_set_tx_rf_port_output"),
            Direction::Rx => phy
                .set_rx_rf_port_input(id)
                .check(OP, "ad9361_set_rx_rf_port_input"),
        }
    }

    pub fn get_rf_port(&mut self, channel: u8) -> Result<&'static str> {
        const OP: &str = "get_rf_port";

        self.check_state(BoardState::Initialized)?;

        let direction = Direction::from_channel(channel);
        let phy = self.phy()?;
        let id = match direction {
            Direction::Tx => phy
                .get_tx_rf_port_output()
                .check(OP, "ad9361_get_tx_rf_port_output")?,
            Direction::Rx => phy
                .get_rx_rf_port_input()
                .check(OP, "ad9361_get_rx_rf_port_input")?,
        };

        match port_names(direction).iter().find(|(_, port_id)| *port_id == id) {
            Some((name, _)) => Ok(name),
            None => {
                log::error!("{OP}: unexpected port_id {id}");
                Err(Error::Unexpected)
            }
        }
    }

    /// All port names of `channel`'s direction.
    pub fn get_rf_ports(&self, channel: u8) -> Vec<&'static str> {
        port_names(Direction::from_channel(channel))
            .iter()
            .map(|(name, _)| *name)
            .collect()
    }
}
