use crate::bladerf::RxMux;
use crate::board::bladerf2::{BladeRf2, BoardState, CheckStatus};
use crate::Result;

/// Bit mask of the RX mux selection in the config GPIO register
pub const BLADERF_GPIO_RX_MUX_MASK: u32 = 7 << BLADERF_GPIO_RX_MUX_SHIFT;

/// Starting bit index of the RX mux values in FX3 <-> FPGA GPIO bank
pub const BLADERF_GPIO_RX_MUX_SHIFT: u32 = 8;

impl BladeRf2 {
    /// Select the source of the samples delivered to the host.
    pub fn set_rx_mux(&mut self, mode: RxMux) -> Result<()> {
        const OP: &str = "set_rx_mux";

        self.check_state(BoardState::Initialized)?;

        let rx_mux_val = (mode as u32) << BLADERF_GPIO_RX_MUX_SHIFT;

        let mut config_gpio = self
            .backend
            .config_gpio_read()
            .check(OP, "config_gpio_read")?;

        config_gpio &= !BLADERF_GPIO_RX_MUX_MASK;
        config_gpio |= rx_mux_val;

        self.backend
            .config_gpio_write(config_gpio)
            .check(OP, "config_gpio_write")
    }

    pub fn get_rx_mux(&mut self) -> Result<RxMux> {
        self.check_state(BoardState::Initialized)?;

        let config_gpio = self
            .backend
            .config_gpio_read()
            .check("get_rx_mux", "config_gpio_read")?;

        RxMux::try_from((config_gpio & BLADERF_GPIO_RX_MUX_MASK) >> BLADERF_GPIO_RX_MUX_SHIFT)
    }
}
