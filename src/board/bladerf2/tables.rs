//! Fixed board tables: ranges, band maps, port names and correction registers.
use crate::bladerf::{Correction, mhz};
use crate::hardware::ad9361::*;
use bladerf_globals::range::SdrRange;
use bladerf_globals::{BladerfGainMode, Direction};

/* RFFE control register bits */
#[allow(dead_code)]
pub(crate) const RFFE_CONTROL_RESET_N: u32 = 0;
pub(crate) const RFFE_CONTROL_ENABLE: u32 = 1;
pub(crate) const RFFE_CONTROL_TXNRX: u32 = 2;
#[allow(dead_code)]
pub(crate) const RFFE_CONTROL_EN_AGC: u32 = 3;
#[allow(dead_code)]
pub(crate) const RFFE_CONTROL_SYNC_IN: u32 = 4;
#[allow(dead_code)]
pub(crate) const RFFE_CONTROL_RX_BIAS_EN: u32 = 5;
pub(crate) const RFFE_CONTROL_RX_SW_SHIFT: u32 = 6;
#[allow(dead_code)]
pub(crate) const RFFE_CONTROL_TX_BIAS_EN: u32 = 10;
pub(crate) const RFFE_CONTROL_TX_SW_SHIFT: u32 = 11;
pub(crate) const RFFE_CONTROL_SPDT_MASK: u32 = 0xf;
/// No connection
pub(crate) const RFFE_CONTROL_SPDT_SHUTDOWN: u32 = 0x0;
/// RF1 <-> RF3
pub(crate) const RFFE_CONTROL_SPDT_LOWBAND: u32 = 0xa;
/// RF1 <-> RF2
pub(crate) const RFFE_CONTROL_SPDT_HIGHBAND: u32 = 0x5;

/// Coarse frequency region. Selects the antenna switch path and RFIC port.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Band {
    Shutdown,
    Low,
    High,
}

pub(crate) struct BandPort {
    pub(crate) spdt: u32,
    pub(crate) rfic_port: u32,
}

/* Overall RX gain range, keyed by frequency. Scanned in order. */
pub(crate) const RX_GAIN_RANGES: [(SdrRange, SdrRange); 3] = [
    (
        SdrRange::new(0, mhz!(1300) as i64, 1, 1.0),
        SdrRange::new(1, 77, 1, 1.0),
    ),
    (
        SdrRange::new(mhz!(1300) as i64, mhz!(4000) as i64, 1, 1.0),
        SdrRange::new(-4, 71, 1, 1.0),
    ),
    (
        SdrRange::new(mhz!(4000) as i64, mhz!(6000) as i64, 1, 1.0),
        SdrRange::new(-10, 62, 1, 1.0),
    ),
];

pub(crate) const TX_GAIN_RANGE: SdrRange = SdrRange::new(-89750, 0, 250, 0.001);

pub(crate) const RX_GAIN_STAGES: [(&str, SdrRange); 2] = [
    ("full", SdrRange::new(-10, 77, 1, 1.0)),
    ("digital", SdrRange::new(0, 31, 1, 1.0)),
];

pub(crate) const TX_GAIN_STAGES: [(&str, SdrRange); 1] =
    [("dsa", SdrRange::new(-89750, 0, 250, 0.001))];

pub(crate) const SAMPLE_RATE_RANGE: SdrRange = SdrRange::new(2083334, 61440000, 1, 1.0);

pub(crate) const BANDWIDTH_RANGE: SdrRange =
    SdrRange::new(200_000, mhz!(56) as i64, 1, 1.0);

pub(crate) const RX_FREQUENCY_RANGE: SdrRange =
    SdrRange::new(mhz!(70) as i64, mhz!(6000) as i64, 2, 1.0);
pub(crate) const TX_FREQUENCY_RANGE: SdrRange =
    SdrRange::new(mhz!(70) as i64, mhz!(6000) as i64, 2, 1.0);

/* Band by frequency. The low band stops one hertz short of 3 GHz so that the
 * boundary itself selects the high band. */
const RX_BAND_MAP: [(Band, SdrRange); 2] = [
    (Band::Low, SdrRange::new(mhz!(70) as i64, 2_999_999_999, 2, 1.0)),
    (
        Band::High,
        SdrRange::new(mhz!(3000) as i64, mhz!(6000) as i64, 2, 1.0),
    ),
];

const TX_BAND_MAP: [(Band, SdrRange); 2] = [
    (Band::Low, SdrRange::new(46_875_000, 2_999_999_999, 2, 1.0)),
    (
        Band::High,
        SdrRange::new(mhz!(3000) as i64, mhz!(6000) as i64, 2, 1.0),
    ),
];

pub(crate) const RX_PORTS: [(&str, u32); 12] = [
    ("A_BALANCED", A_BALANCED),
    ("B_BALANCED", B_BALANCED),
    ("C_BALANCED", C_BALANCED),
    ("A_N", A_N),
    ("A_P", A_P),
    ("B_N", B_N),
    ("B_P", B_P),
    ("C_N", C_N),
    ("C_P", C_P),
    ("TX_MON1", TX_MON1),
    ("TX_MON2", TX_MON2),
    ("TX_MON1_2", TX_MON1_2),
];

pub(crate) const TX_PORTS: [(&str, u32); 2] = [("TXA", TXA), ("TXB", TXB)];

pub(crate) fn frequency_range(direction: Direction) -> &'static SdrRange {
    match direction {
        Direction::Rx => &RX_FREQUENCY_RANGE,
        Direction::Tx => &TX_FREQUENCY_RANGE,
    }
}

pub(crate) fn port_names(direction: Direction) -> &'static [(&'static str, u32)] {
    match direction {
        Direction::Rx => &RX_PORTS,
        Direction::Tx => &TX_PORTS,
    }
}

pub(crate) fn gain_stages(direction: Direction) -> &'static [(&'static str, SdrRange)] {
    match direction {
        Direction::Rx => &RX_GAIN_STAGES,
        Direction::Tx => &TX_GAIN_STAGES,
    }
}

/// First band whose range holds `frequency`, or `Shutdown` for none.
pub(crate) fn band_by_frequency(direction: Direction, frequency: u64) -> Band {
    let map = match direction {
        Direction::Rx => &RX_BAND_MAP,
        Direction::Tx => &TX_BAND_MAP,
    };

    match map
        .iter()
        .find(|(_, range)| range.is_within_range(frequency as i64))
    {
        Some((band, _)) => *band,
        None => {
            log::warn!("frequency {frequency} not found in {direction} band map");
            Band::Shutdown
        }
    }
}

/// Antenna switch code and RFIC port for a band.
pub(crate) fn band_port(direction: Direction, band: Band) -> BandPort {
    let (spdt, rfic_port) = match (direction, band) {
        (_, Band::Shutdown) => (RFFE_CONTROL_SPDT_SHUTDOWN, 0),
        (Direction::Rx, Band::Low) => (RFFE_CONTROL_SPDT_LOWBAND, B_BALANCED),
        (Direction::Rx, Band::High) => (RFFE_CONTROL_SPDT_HIGHBAND, A_BALANCED),
        (Direction::Tx, Band::Low) => (RFFE_CONTROL_SPDT_LOWBAND, TXB),
        (Direction::Tx, Band::High) => (RFFE_CONTROL_SPDT_HIGHBAND, TXA),
    };
    BandPort { spdt, rfic_port }
}

/// A disabled channel is always shut down, whatever its frequency.
pub(crate) fn band_port_for(direction: Direction, enabled: bool, frequency: u64) -> BandPort {
    let band = if enabled {
        band_by_frequency(direction, frequency)
    } else {
        Band::Shutdown
    };
    band_port(direction, band)
}

pub(crate) fn gain_mode_to_rfic(mode: BladerfGainMode) -> Option<RfGainCtrlMode> {
    match mode {
        BladerfGainMode::Default => None,
        BladerfGainMode::Mgc => Some(RfGainCtrlMode::Mgc),
        BladerfGainMode::FastattackAgc => Some(RfGainCtrlMode::FastAttackAgc),
        BladerfGainMode::SlowattackAgc => Some(RfGainCtrlMode::SlowAttackAgc),
        BladerfGainMode::HybridAgc => Some(RfGainCtrlMode::HybridAgc),
    }
}

pub(crate) fn gain_mode_from_rfic(mode: RfGainCtrlMode) -> BladerfGainMode {
    match mode {
        RfGainCtrlMode::Mgc => BladerfGainMode::Mgc,
        RfGainCtrlMode::FastAttackAgc => BladerfGainMode::FastattackAgc,
        RfGainCtrlMode::SlowAttackAgc => BladerfGainMode::SlowattackAgc,
        RfGainCtrlMode::HybridAgc => BladerfGainMode::HybridAgc,
    }
}

/// One correction register per band: `[band 0, band 1]`.
#[derive(Debug, Clone, Copy)]
pub(crate) struct CorrectionReg {
    pub(crate) reg: [u16; 2],
    pub(crate) shift: u32,
}

const fn creg(low: u16, high: u16, shift: u32) -> Option<CorrectionReg> {
    Some(CorrectionReg {
        reg: [low, high],
        shift,
    })
}

/// Correction registers, indexed by channel (RX0, TX0, RX1, TX1) and then
/// by [`Correction::index`]. RX DC offsets are packed across two registers
/// and handled separately.
pub(crate) const CORRECTION_REGS: [[Option<CorrectionReg>; 4]; 4] = [
    [
        None,
        None,
        creg(REG_RX1_INPUT_A_PHASE_CORR, REG_RX1_INPUT_BC_PHASE_CORR, 6),
        creg(REG_RX1_INPUT_A_GAIN_CORR, REG_RX1_INPUT_BC_GAIN_CORR, 6),
    ],
    [
        creg(REG_TX1_OUT_1_OFFSET_I, REG_TX1_OUT_2_OFFSET_I, 5),
        creg(REG_TX1_OUT_1_OFFSET_Q, REG_TX1_OUT_2_OFFSET_Q, 5),
        creg(REG_TX1_OUT_1_PHASE_CORR, REG_TX1_OUT_2_PHASE_CORR, 6),
        creg(REG_TX1_OUT_1_GAIN_CORR, REG_TX1_OUT_2_GAIN_CORR, 6),
    ],
    [
        None,
        None,
        creg(REG_RX2_INPUT_A_PHASE_CORR, REG_RX2_INPUT_BC_PHASE_CORR, 6),
        creg(REG_RX2_INPUT_A_GAIN_CORR, REG_RX2_INPUT_BC_GAIN_CORR, 6),
    ],
    [
        creg(REG_TX2_OUT_1_OFFSET_I, REG_TX2_OUT_2_OFFSET_I, 5),
        creg(REG_TX2_OUT_1_OFFSET_Q, REG_TX2_OUT_2_OFFSET_Q, 5),
        creg(REG_TX2_OUT_1_PHASE_CORR, REG_TX2_OUT_2_PHASE_CORR, 6),
        creg(REG_TX2_OUT_1_GAIN_CORR, REG_TX2_OUT_2_GAIN_CORR, 6),
    ],
];

/// RX DC offset registers as `(top, bottom)` pairs, indexed by RFIC channel,
/// band index and then I/Q.
pub(crate) const RX_DC_REGS: [[[(u16, u16); 2]; 2]; 2] = [
    [
        [
            (REG_INPUT_A_OFFSETS_1, REG_RX1_INPUT_A_OFFSETS),
            (REG_RX1_INPUT_A_OFFSETS, REG_RX1_INPUT_A_Q_OFFSET),
        ],
        [
            (REG_INPUT_BC_OFFSETS_1, REG_RX1_INPUT_BC_OFFSETS),
            (REG_RX1_INPUT_BC_OFFSETS, REG_RX1_INPUT_BC_Q_OFFSET),
        ],
    ],
    [
        [
            (REG_RX2_INPUT_A_I_OFFSET, REG_RX2_INPUT_A_OFFSETS),
            (REG_RX2_INPUT_A_OFFSETS, REG_INPUT_A_OFFSETS_1),
        ],
        [
            (REG_RX2_INPUT_BC_I_OFFSET, REG_RX2_INPUT_BC_OFFSETS),
            (REG_RX2_INPUT_BC_OFFSETS, REG_INPUT_BC_OFFSETS_1),
        ],
    ],
];

/// Force bit positions, indexed by RFIC channel, correction kind and band index.
pub(crate) const FORCE_BITS: [[[u8; 2]; 4]; 2] = [
    [[2, 6], [2, 6], [0, 4], [0, 4]],
    [[3, 7], [3, 7], [1, 5], [1, 5]],
];

pub(crate) fn force_bit(rfic_channel: usize, kind: Correction, band_index: usize) -> u8 {
    1 << FORCE_BITS[rfic_channel][kind.index()][band_index]
}
