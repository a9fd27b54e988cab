use crate::bladerf::{Correction, check_channel};
use crate::board::bladerf2::tables::{CORRECTION_REGS, RX_DC_REGS, force_bit};
use crate::board::bladerf2::{BladeRf2, BoardState, CheckStatus};
use crate::hardware::ad9361::{
    A_BALANCED, B_BALANCED, C_BALANCED, REG_FORCE_BITS, REG_TX_FORCE_BITS, TXA,
};
use crate::{Error, Result};
use bladerf_globals::Direction;

/// Unpack a 10-bit RX DC offset from its top/bottom registers and scale it
/// to a signed 13-bit value.
///
/// ```text
///           top                 bottom
/// RX1 I: | x x x x 9 8 7 6 | 5 4 3 2 1 0 x x |
/// RX1 Q: | x x x x x x 9 8 | 7 6 5 4 3 2 1 0 |
/// RX2 I: | 9 8 7 6 5 4 3 2 | x x x x x x 1 0 |
/// RX2 Q: | x x 9 8 7 6 5 4 | 3 2 1 0 x x x x |
/// ```
pub(crate) fn decode_rx_dc(rfic_channel: usize, is_q: bool, top: u8, bot: u8) -> i16 {
    let (top, bot) = (top as u16, bot as u16);

    let data = match (rfic_channel, is_q) {
        (0, false) => ((top & 0xf) << 6) | (bot >> 2),
        (0, true) => ((top & 0x3) << 8) | bot,
        (_, false) => (top << 2) | (bot & 0x3),
        (_, true) => ((top & 0x3f) << 4) | (bot >> 4),
    };

    sign_extend_13(data << 3)
}

/// Inverse of [`decode_rx_dc`]. Bits that belong to other fields of the
/// registers are preserved. Returns the new `(top, bottom)` contents.
pub(crate) fn encode_rx_dc(
    rfic_channel: usize,
    is_q: bool,
    value: i16,
    top: u8,
    bot: u8,
) -> (u8, u8) {
    let data = (value >> 3) as u16;
    let (top, bot) = (top as u16, bot as u16);

    let (top, bot) = match (rfic_channel, is_q) {
        (0, false) => (
            (top & 0xf0) | ((data >> 6) & 0x0f),
            (bot & 0x03) | ((data & 0x3f) << 2),
        ),
        (0, true) => ((top & 0xfc) | ((data >> 8) & 0x03), data & 0xff),
        (_, false) => ((data >> 2) & 0xff, (bot & 0xfc) | (data & 0x03)),
        (_, true) => (
            (top & 0xc0) | ((data >> 4) & 0x3f),
            (bot & 0x0f) | ((data & 0x0f) << 4),
        ),
    };

    (top as u8, bot as u8)
}

/// Scale an 8-bit correction register to 12 bits (shift 5) or 13 bits
/// (shift 6) and sign extend.
pub(crate) fn decode_correction(reg: u8, shift: u32) -> i16 {
    let data = (reg as u16) << shift;
    if shift == 5 {
        sign_extend_13(data)
    } else if data & (1 << 13) != 0 {
        (data | 0xc000) as i16
    } else {
        data as i16
    }
}

pub(crate) fn encode_correction(value: i16, shift: u32) -> u8 {
    ((value >> shift) & 0xff) as u8
}

fn sign_extend_13(data: u16) -> i16 {
    if data & (1 << 12) != 0 {
        (data | 0xf000) as i16
    } else {
        data as i16
    }
}

impl BladeRf2 {
    /// Correction table column for the RF port the RFIC currently uses.
    fn correction_band_index(&mut self, op: &str, channel: u8) -> Result<usize> {
        let phy = self.phy()?;
        match Direction::from_channel(channel) {
            Direction::Tx => {
                let port = phy
                    .get_tx_rf_port_output()
                    .check(op, "ad9361_get_tx_rf_port_output")?;
                Ok((port == TXA) as usize)
            }
            Direction::Rx => {
                let port = phy
                    .get_rx_rf_port_input()
                    .check(op, "ad9361_get_rx_rf_port_input")?;
                if port != A_BALANCED && port != B_BALANCED && port != C_BALANCED {
                    log::error!("{op}: RX port {port} has no correction registers");
                    return Err(Error::Unsupported);
                }
                Ok((port == A_BALANCED) as usize)
            }
        }
    }

    pub fn get_correction(&mut self, channel: u8, corr: Correction) -> Result<i16> {
        const OP: &str = "get_correction";

        self.check_state(BoardState::Initialized)?;
        check_channel(channel)?;

        let band = self.correction_band_index(OP, channel)?;
        let rfic_channel = (channel >> 1) as usize;
        let is_rx_dc = Direction::from_channel(channel) == Direction::Rx
            && matches!(corr, Correction::DcoffI | Correction::DcoffQ);

        let value = if is_rx_dc {
            let is_q = corr == Correction::DcoffQ;
            let (reg_top, reg_bot) = RX_DC_REGS[rfic_channel][band][is_q as usize];

            let phy = self.phy()?;
            let top = phy.spi_read(reg_top).check(OP, "ad9361_spi_read(top)")?;
            let bot = phy.spi_read(reg_bot).check(OP, "ad9361_spi_read(bottom)")?;

            decode_rx_dc(rfic_channel, is_q, top, bot)
        } else {
            let entry = CORRECTION_REGS[channel as usize][corr.index()].ok_or(Error::Unexpected)?;
            let data = self
                .phy()?
                .spi_read(entry.reg[band])
                .check(OP, "ad9361_spi_read(reg)")?;

            decode_correction(data, entry.shift)
        };

        log::trace!("channel {channel} {corr:?}: {value}");
        Ok(value)
    }

    /// Write a correction and set its force bit, so the RFIC uses the
    /// written value instead of its own calibration.
    pub fn set_correction(&mut self, channel: u8, corr: Correction, value: i16) -> Result<()> {
        const OP: &str = "set_correction";

        self.check_state(BoardState::Initialized)?;
        check_channel(channel)?;

        let band = self.correction_band_index(OP, channel)?;
        let rfic_channel = (channel >> 1) as usize;
        let direction = Direction::from_channel(channel);
        let is_rx_dc =
            direction == Direction::Rx && matches!(corr, Correction::DcoffI | Correction::DcoffQ);

        log::trace!("channel {channel} {corr:?} <- {value}");

        let phy = self.phy()?;
        if is_rx_dc {
            let is_q = corr == Correction::DcoffQ;
            let (reg_top, reg_bot) = RX_DC_REGS[rfic_channel][band][is_q as usize];

            let top = phy.spi_read(reg_top).check(OP, "ad9361_spi_read(top)")?;
            let bot = phy.spi_read(reg_bot).check(OP, "ad9361_spi_read(bottom)")?;

            let (top, bot) = encode_rx_dc(rfic_channel, is_q, value, top, bot);

            phy.spi_write(reg_top, top).check(OP, "ad9361_spi_write(top)")?;
            phy.spi_write(reg_bot, bot).check(OP, "ad9361_spi_write(bottom)")?;
        } else {
            let entry = CORRECTION_REGS[channel as usize][corr.index()].ok_or(Error::Unexpected)?;
            phy.spi_write(entry.reg[band], encode_correction(value, entry.shift))
                .check(OP, "ad9361_spi_write(reg)")?;
        }

        let force_reg = match direction {
            Direction::Tx => REG_TX_FORCE_BITS,
            Direction::Rx => REG_FORCE_BITS,
        };

        let force = phy.spi_read(force_reg).check(OP, "ad9361_spi_read(force)")?;
        phy.spi_write(force_reg, force | force_bit(rfic_channel, corr, band))
            .check(OP, "ad9361_spi_write(force)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rx_dc_round_trips_on_both_layouts() {
        for rfic_channel in [0, 1] {
            for is_q in [false, true] {
                for value in [-4096i16, -2048, -8, 0, 8, 96, 1000, 4088] {
                    let (top, bot) = encode_rx_dc(rfic_channel, is_q, value, 0, 0);
                    assert_eq!(decode_rx_dc(rfic_channel, is_q, top, bot), value);
                }
            }
        }
    }

    #[test]
    fn rx_dc_keeps_foreign_bits() {
        let (top, bot) = encode_rx_dc(0, false, 0, 0xff, 0xff);
        assert_eq!((top, bot), (0xf0, 0x03));
        let (top, bot) = encode_rx_dc(0, true, 0, 0xff, 0xff);
        assert_eq!((top, bot), (0xfc, 0x00));
        let (top, bot) = encode_rx_dc(1, false, 0, 0xff, 0xff);
        assert_eq!((top, bot), (0x00, 0xfc));
        let (top, bot) = encode_rx_dc(1, true, 0, 0xff, 0xff);
        assert_eq!((top, bot), (0xc0, 0x0f));
    }

    #[test]
    fn single_register_corrections() {
        assert_eq!(decode_correction(encode_correction(100, 5), 5), 96);
        assert_eq!(decode_correction(encode_correction(-100, 5), 5), -128);
        assert_eq!(decode_correction(encode_correction(-4096, 5), 5), -4096);
        assert_eq!(decode_correction(encode_correction(4064, 5), 5), 4064);
        assert_eq!(decode_correction(encode_correction(640, 6), 6), 640);
        assert_eq!(decode_correction(encode_correction(-8192, 6), 6), -8192);
        assert_eq!(decode_correction(0x80, 6), -8192);
    }
}
