use crate::Error;

macro_rules! mhz {
    ($value:expr) => {
        ($value * 1_000_000u64)
    };
}
pub(crate) use mhz;

/// IQ/DC correction parameters
#[derive(PartialEq, Eq, Debug, Clone, Copy)]
#[repr(u8)]
pub enum Correction {
    /// Adjusts the in-phase DC offset. Valid values are [-4096, 4095].
    DcoffI = 0,
    /// Adjusts the quadrature DC offset. Valid values are [-4096, 4095].
    DcoffQ = 1,
    /// Adjusts phase correction of [-10, 10] degrees, via a provided count
    /// value of [-4096, 4096].
    Phase = 2,
    /// Adjusts gain correction value in [-1.0, 1.0], via provided values in
    /// the range of [-4096, 4096].
    Gain = 3,
}

impl Correction {
    pub fn index(&self) -> usize {
        *self as usize
    }
}

impl TryFrom<u8> for Correction {
    type Error = Error;
    fn try_from(value: u8) -> crate::Result<Self> {
        match value {
            0 => Ok(Correction::DcoffI),
            1 => Ok(Correction::DcoffQ),
            2 => Ok(Correction::Phase),
            3 => Ok(Correction::Gain),
            _ => {
                log::error!("unsupported correction {value}");
                Err(Error::Unsupported)
            }
        }
    }
}

/// RX Mux modes
///
/// These values describe the source of samples to the RX FIFOs in the FPGA.
/// They map directly to rx_mux_mode_t inside the FPGA's source code.
#[derive(PartialEq, Eq, Debug, Clone, Copy)]
#[repr(u32)]
pub enum RxMux {
    /// Received baseband samples from the RFIC
    Baseband = 0,
    /// 12-bit counter in I and Q, counting [-2048, 2047]
    Counter12Bit = 1,
    /// 32-bit counter, the LSB is in Q and the MSB in I
    Counter32Bit = 2,
    /// TX to RX digital loopback in the FPGA
    DigitalLoopback = 4,
}

impl TryFrom<u32> for RxMux {
    type Error = Error;
    fn try_from(value: u32) -> crate::Result<Self> {
        match value {
            0 => Ok(RxMux::Baseband),
            1 => Ok(RxMux::Counter12Bit),
            2 => Ok(RxMux::Counter32Bit),
            4 => Ok(RxMux::DigitalLoopback),
            _ => {
                log::error!("invalid RX mux mode {value} read from config GPIO");
                Err(Error::Unexpected)
            }
        }
    }
}

/// Validate a channel number against the two RX and two TX channels of the board.
pub(crate) fn check_channel(channel: u8) -> crate::Result<()> {
    match channel {
        bladerf_globals::BLADERF_CHANNEL_RX0
        | bladerf_globals::BLADERF_CHANNEL_TX0
        | bladerf_globals::BLADERF_CHANNEL_RX1
        | bladerf_globals::BLADERF_CHANNEL_TX1 => Ok(()),
        _ => {
            log::error!("channel {channel} is not valid");
            Err(Error::Invalid)
        }
    }
}
