pub mod bladerf2;
pub mod range;

#[macro_export]
macro_rules! bladerf_channel_rx {
    ($ch:expr) => {
        ((($ch) << 1) | 0x0) as u8
    };
}
#[macro_export]
macro_rules! bladerf_channel_tx {
    ($ch:expr) => {
        ((($ch) << 1) | 0x1) as u8
    };
}

/// Convenience macro: true if argument is a TX channel
#[macro_export]
macro_rules! bladerf_channel_is_tx {
    ($ch:expr) => {
        (($ch) & $crate::BLADERF_DIRECTION_MASK) != 0
    };
}

pub const BLADERF_DIRECTION_MASK: u8 = 0x1;

pub const BLADERF_CHANNEL_RX0: u8 = bladerf_channel_rx!(0);
pub const BLADERF_CHANNEL_TX0: u8 = bladerf_channel_tx!(0);
pub const BLADERF_CHANNEL_RX1: u8 = bladerf_channel_rx!(1);
pub const BLADERF_CHANNEL_TX1: u8 = bladerf_channel_tx!(1);

/// Stream direction
#[derive(PartialEq, Eq, Debug, Clone, Copy)]
#[repr(u8)]
pub enum Direction {
    Rx = 0, // Receive direction
    Tx = 1, // Transmit direction
}

impl Direction {
    /// Direction a channel number belongs to.
    pub fn from_channel(channel: u8) -> Self {
        if bladerf_channel_is_tx!(channel) {
            Direction::Tx
        } else {
            Direction::Rx
        }
    }

    pub fn index(&self) -> usize {
        *self as usize
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Direction::Rx => f.write_str("RX"),
            Direction::Tx => f.write_str("TX"),
        }
    }
}

/// Stream channel layout. The lowest bit encodes the direction.
#[derive(PartialEq, Eq, Debug, Clone, Copy)]
#[repr(u8)]
pub enum ChannelLayout {
    RxX1 = 0,
    TxX1 = 1,
    RxX2 = 2,
    TxX2 = 3,
}

impl ChannelLayout {
    pub fn direction(&self) -> Direction {
        Direction::from_channel(*self as u8)
    }
}

/// Sample format
#[derive(PartialEq, Eq, Debug, Clone, Copy)]
pub enum BladerfFormat {
    /// Signed, Complex 16-bit Q11. This is the native format of the DAC data.
    ///
    /// Values in the range [-2048, 2048) are used to represent [-1.0, 1.0).
    /// Samples consist of interleaved IQ value pairs, with I being the first
    /// value in the pair.
    Sc16Q11 = 0,

    /// Same as `Sc16Q11`, with the first 16 bytes of each buffer carrying
    /// stream metadata (timestamp and flags).
    Sc16Q11Meta = 1,

    /// Packet mode, used to exchange raw NIOS packets with the FPGA.
    PacketMeta = 2,

    /// Signed, Complex 8-bit Q8. Values in [-128, 128) map to [-1.0, 1.0).
    Sc8Q7 = 3,

    /// `Sc8Q7` with metadata.
    Sc8Q7Meta = 4,
}

/// Loopback options
#[derive(PartialEq, Eq, Debug, Clone, Copy)]
pub enum BladerfLoopback {
    /// Disables loopback and returns to normal operation.
    None = 0,

    /// Firmware loopback inside of the FX3
    Firmware,

    /// Baseband loopback. TXLPF output is connected to the RXVGA2 input.
    BbTxlpfRxvga2,

    /// Baseband loopback. TXVGA1 output is connected to the RXVGA2 input.
    BbTxvga1Rxvga2,

    /// Baseband loopback. TXLPF output is connected to the RXLPF input.
    BbTxlpfRxlpf,

    /// Baseband loopback. TXVGA1 output is connected to RXLPF input.
    BbTxvga1Rxlpf,

    /// RF loopback. The TXMIX output, through the AUX PA, is connected to the
    /// output of LNA1.
    Lna1,

    /// RF loopback into LNA2.
    Lna2,

    /// RF loopback into LNA3.
    Lna3,

    /// RFIC digital loopback (built-in self-test)
    RficBist,
}

/// Gain control modes
///
/// In general, the default mode is automatic gain control. This will
/// continuously adjust the gain to maximize dynamic range and minimize clipping.
#[derive(PartialEq, Eq, Debug, Clone, Copy)]
pub enum BladerfGainMode {
    /// Device-specific default.
    ///
    /// On the bladeRF 2.0 Micro, this is the gain control mode configured in
    /// the RFIC initialization parameters (slow attack AGC).
    Default,

    /// Manual gain control
    Mgc,

    /// Automatic gain control, fast attack (advanced)
    FastattackAgc,

    /// Automatic gain control, slow attack (advanced)
    SlowattackAgc,

    /// Automatic gain control, hybrid attack (advanced)
    HybridAgc,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BladerfRationalRate {
    /* Integer portion */
    pub integer: u64,
    /* Numerator in fractional portion */
    pub num: u64,
    /* Denominator in fractional portion. This must be greater than 0. */
    pub den: u64,
}

#[repr(u8)]
pub enum StringDescriptors {
    Manufacturer = 0x1, // Don't want to start with 0 as 0 is reserved for the language table
    Product,
    Serial,
    Fx3Firmware,
}

pub const ENDPOINT_OUT: u8 = 0x02;
pub const ENDPOINT_IN: u8 = 0x82;
