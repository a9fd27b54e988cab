//! Interface to the AD9361 RF agile transceiver driver.
//!
//! The driver itself (synthesizer tuning, gain tables, calibrations) lives
//! outside of this crate. The board only needs the calls listed in
//! [`Ad9361Phy`]. Like the vendor driver, every call reports failure as a
//! negative errno style code, which the board translates through
//! [`crate::Error::from_errno`].

/// Result of a call into the RFIC driver. The error is a negative errno code.
pub type PhyResult<T> = std::result::Result<T, i32>;

/* RX RF port ids */
pub const A_BALANCED: u32 = 0;
pub const B_BALANCED: u32 = 1;
pub const C_BALANCED: u32 = 2;
pub const A_N: u32 = 3;
pub const A_P: u32 = 4;
pub const B_N: u32 = 5;
pub const B_P: u32 = 6;
pub const C_N: u32 = 7;
pub const C_P: u32 = 8;
pub const TX_MON1: u32 = 9;
pub const TX_MON2: u32 = 10;
pub const TX_MON1_2: u32 = 11;

/* TX RF port ids */
pub const TXA: u32 = 0;
pub const TXB: u32 = 1;

/* Registers used for manual IQ/DC corrections */
pub const REG_TX_FORCE_BITS: u16 = 0x09F;
pub const REG_TX1_OUT_1_PHASE_CORR: u16 = 0x08E;
pub const REG_TX1_OUT_1_GAIN_CORR: u16 = 0x08F;
pub const REG_TX2_OUT_1_PHASE_CORR: u16 = 0x090;
pub const REG_TX2_OUT_1_GAIN_CORR: u16 = 0x091;
pub const REG_TX1_OUT_1_OFFSET_I: u16 = 0x092;
pub const REG_TX1_OUT_1_OFFSET_Q: u16 = 0x093;
pub const REG_TX2_OUT_1_OFFSET_I: u16 = 0x094;
pub const REG_TX2_OUT_1_OFFSET_Q: u16 = 0x095;
pub const REG_TX1_OUT_2_PHASE_CORR: u16 = 0x096;
pub const REG_TX1_OUT_2_GAIN_CORR: u16 = 0x097;
pub const REG_TX2_OUT_2_PHASE_CORR: u16 = 0x098;
pub const REG_TX2_OUT_2_GAIN_CORR: u16 = 0x099;
pub const REG_TX1_OUT_2_OFFSET_I: u16 = 0x09A;
pub const REG_TX1_OUT_2_OFFSET_Q: u16 = 0x09B;
pub const REG_TX2_OUT_2_OFFSET_I: u16 = 0x09C;
pub const REG_TX2_OUT_2_OFFSET_Q: u16 = 0x09D;

pub const REG_RX1_INPUT_A_PHASE_CORR: u16 = 0x170;
pub const REG_RX1_INPUT_A_GAIN_CORR: u16 = 0x171;
pub const REG_RX2_INPUT_A_PHASE_CORR: u16 = 0x172;
pub const REG_RX2_INPUT_A_GAIN_CORR: u16 = 0x173;
pub const REG_RX1_INPUT_A_Q_OFFSET: u16 = 0x174;
pub const REG_RX1_INPUT_A_OFFSETS: u16 = 0x175;
pub const REG_INPUT_A_OFFSETS_1: u16 = 0x176;
pub const REG_RX2_INPUT_A_OFFSETS: u16 = 0x177;
pub const REG_RX2_INPUT_A_I_OFFSET: u16 = 0x178;
pub const REG_RX1_INPUT_BC_PHASE_CORR: u16 = 0x179;
pub const REG_RX1_INPUT_BC_GAIN_CORR: u16 = 0x17A;
pub const REG_RX2_INPUT_BC_PHASE_CORR: u16 = 0x17B;
pub const REG_RX2_INPUT_BC_GAIN_CORR: u16 = 0x17C;
pub const REG_RX1_INPUT_BC_Q_OFFSET: u16 = 0x17D;
pub const REG_RX1_INPUT_BC_OFFSETS: u16 = 0x17E;
pub const REG_INPUT_BC_OFFSETS_1: u16 = 0x17F;
pub const REG_RX2_INPUT_BC_OFFSETS: u16 = 0x180;
pub const REG_RX2_INPUT_BC_I_OFFSET: u16 = 0x181;
pub const REG_FORCE_BITS: u16 = 0x182;

/// SPI command word bits, as framed for the NIOS 16x64 AD9361 target.
pub const AD_READ: u16 = 0;
pub const AD_WRITE: u16 = 1 << 15;

/// Transaction byte count field. Only single byte transactions are used.
pub const fn ad_cnt(count: u16) -> u16 {
    ((count - 1) & 0x7) << 12
}

pub const AD_ADDR_MASK: u16 = 0x3ff;

/// AD9361 gain control modes, as understood by the driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum RfGainCtrlMode {
    Mgc = 0,
    FastAttackAgc = 1,
    SlowAttackAgc = 2,
    HybridAgc = 3,
}

impl RfGainCtrlMode {
    pub fn from_raw(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::Mgc),
            1 => Some(Self::FastAttackAgc),
            2 => Some(Self::SlowAttackAgc),
            3 => Some(Self::HybridAgc),
            _ => None,
        }
    }
}

/// Composite RX gain readback.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RfRxGain {
    /// Antenna (1 or 2)
    pub ant: u32,
    /// Overall gain, in dB
    pub gain_db: i32,
    pub fgt_lmt_index: u32,
    pub lmt_gain: u32,
    pub lpf_gain: u32,
    pub digital_gain: u32,
    pub lna_index: u32,
    pub tia_index: u32,
    pub mixer_index: u32,
}

/// Programmable FIR filter setup.
#[derive(Debug, Clone, PartialEq)]
pub struct FirConfig {
    /// Channel mask: 1 = channel 1, 2 = channel 2, 3 = both
    pub channels: u8,
    /// Filter gain in dB (RX: -12, -6, 0, +6; TX: -6, 0)
    pub gain_db: i32,
    /// Decimation (RX) or interpolation (TX) factor: 1, 2 or 4
    pub rate_factor: u32,
    pub coefficients: Vec<i16>,
}

impl FirConfig {
    /// A pass-through filter: `taps` coefficients with a single full-scale tap.
    pub fn unity(channels: u8, gain_db: i32, taps: usize) -> Self {
        let mut coefficients = vec![0i16; taps];
        if let Some(first) = coefficients.first_mut() {
            *first = i16::MAX;
        }
        Self {
            channels,
            gain_db,
            rate_factor: 1,
            coefficients,
        }
    }
}

/// AD9361 initialization parameter block.
#[derive(Debug, Clone, PartialEq)]
pub struct Ad9361InitParams {
    pub reference_clk_rate: u32,
    pub two_rx_two_tx_mode_enable: bool,
    pub rx_synthesizer_frequency_hz: u64,
    pub tx_synthesizer_frequency_hz: u64,
    pub rf_rx_bandwidth_hz: u32,
    pub rf_tx_bandwidth_hz: u32,
    pub rx_path_clock_frequencies: [u32; 6],
    pub tx_path_clock_frequencies: [u32; 6],
    pub rx_rf_port_input_select: u32,
    pub tx_rf_port_output_select: u32,
    /// Default gain control mode of RX1
    pub gc_rx1_mode: RfGainCtrlMode,
    /// Default gain control mode of RX2
    pub gc_rx2_mode: RfGainCtrlMode,
    pub tx_attenuation_mdb: u32,
    pub rx_fir: FirConfig,
    pub tx_fir: FirConfig,
}

impl Default for Ad9361InitParams {
    fn default() -> Self {
        Self {
            reference_clk_rate: 38_400_000,
            two_rx_two_tx_mode_enable: true,
            rx_synthesizer_frequency_hz: 2_400_000_000,
            tx_synthesizer_frequency_hz: 2_400_000_000,
            rf_rx_bandwidth_hz: 18_000_000,
            rf_tx_bandwidth_hz: 18_000_000,
            rx_path_clock_frequencies: [
                983_040_000,
                245_760_000,
                122_880_000,
                61_440_000,
                30_720_000,
                30_720_000,
            ],
            tx_path_clock_frequencies: [
                983_040_000,
                122_880_000,
                122_880_000,
                61_440_000,
                30_720_000,
                30_720_000,
            ],
            rx_rf_port_input_select: A_BALANCED,
            tx_rf_port_output_select: TXA,
            gc_rx1_mode: RfGainCtrlMode::SlowAttackAgc,
            gc_rx2_mode: RfGainCtrlMode::SlowAttackAgc,
            tx_attenuation_mdb: 10_000,
            rx_fir: FirConfig::unity(3, -6, 64),
            tx_fir: FirConfig::unity(3, 0, 64),
        }
    }
}

/// The AD9361 driver calls used by the board.
///
/// `ch` arguments are the zero based RFIC channel (0 or 1), except
/// [`Ad9361Phy::get_rx_gain`] which takes the one based receiver number.
pub trait Ad9361Phy: Send {
    fn get_rx_lo_freq(&mut self) -> PhyResult<u64>;
    fn set_rx_lo_freq(&mut self, freq: u64) -> PhyResult<()>;
    fn get_tx_lo_freq(&mut self) -> PhyResult<u64>;
    fn set_tx_lo_freq(&mut self, freq: u64) -> PhyResult<()>;

    fn get_rx_rf_port_input(&mut self) -> PhyResult<u32>;
    fn set_rx_rf_port_input(&mut self, port: u32) -> PhyResult<()>;
    fn get_tx_rf_port_output(&mut self) -> PhyResult<u32>;
    fn set_tx_rf_port_output(&mut self, port: u32) -> PhyResult<()>;

    fn get_rx_rf_gain(&mut self, ch: u8) -> PhyResult<i32>;
    fn set_rx_rf_gain(&mut self, ch: u8, gain_db: i32) -> PhyResult<()>;
    /// Attenuation in milli-dB.
    fn get_tx_attenuation(&mut self, ch: u8) -> PhyResult<u32>;
    fn set_tx_attenuation(&mut self, ch: u8, attenuation_mdb: u32) -> PhyResult<()>;
    fn get_rx_gain(&mut self, rx: u8) -> PhyResult<RfRxGain>;

    /// Raw gain control mode, see [`RfGainCtrlMode::from_raw`].
    fn get_rx_gain_control_mode(&mut self, ch: u8) -> PhyResult<u8>;
    fn set_rx_gain_control_mode(&mut self, ch: u8, mode: RfGainCtrlMode) -> PhyResult<()>;

    fn get_rx_rf_bandwidth(&mut self) -> PhyResult<u32>;
    fn set_rx_rf_bandwidth(&mut self, bandwidth_hz: u32) -> PhyResult<()>;
    fn get_tx_rf_bandwidth(&mut self) -> PhyResult<u32>;
    fn set_tx_rf_bandwidth(&mut self, bandwidth_hz: u32) -> PhyResult<()>;

    fn get_rx_sampling_freq(&mut self) -> PhyResult<u32>;
    fn set_rx_sampling_freq(&mut self, freq: u32) -> PhyResult<()>;
    fn get_tx_sampling_freq(&mut self) -> PhyResult<u32>;
    fn set_tx_sampling_freq(&mut self, freq: u32) -> PhyResult<()>;

    fn set_rx_fir_config(&mut self, config: &FirConfig) -> PhyResult<()>;
    fn set_tx_fir_config(&mut self, config: &FirConfig) -> PhyResult<()>;
    fn set_rx_fir_en_dis(&mut self, enable: bool) -> PhyResult<()>;

    /// Built-in self test loopback: 0 disabled, 1 digital TX to RX.
    fn bist_loopback(&mut self, mode: i32) -> PhyResult<()>;
    fn get_bist_loopback(&mut self) -> PhyResult<i32>;

    fn spi_read(&mut self, reg: u16) -> PhyResult<u8>;
    fn spi_write(&mut self, reg: u16, value: u8) -> PhyResult<()>;

    /// Release the driver. Called once, when the board is dropped.
    fn deinit(&mut self);
}

/// Constructs the RFIC driver during board initialization.
pub trait PhyFactory: Send {
    fn init(&mut self, params: &Ad9361InitParams) -> PhyResult<Box<dyn Ad9361Phy>>;
}
