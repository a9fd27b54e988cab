pub mod packet;

#[repr(u8)]
#[derive(Debug)]
pub enum NiosPktMagic {
    Invalid = 0x00, // 'INVALID'
    _8X8 = 0x41,    // 'A'
    _8X16 = 0x42,   // 'B'
    _8X32 = 0x43,   // 'C'
    _8X64 = 0x44,   // 'D'
    _16X64 = 0x45,  // 'E'
    _32X32 = 0x4B,  // 'K'
}

/* IDs 0x80 through 0xff will not be assigned by Nuand. These are reserved
 * for user customizations */
pub const NIOS_PKT_TARGET_USR1: u8 = 0x80;
pub const NIOS_PKT_TARGET_USR128: u8 = 0xff;

/* 8x8 target IDs */
pub const NIOS_PKT_8X8_TX_TRIGGER_CTL: u8 = 0x03; /* TX trigger control */
pub const NIOS_PKT_8X8_RX_TRIGGER_CTL: u8 = 0x04; /* RX trigger control */

/* 8x16 target IDs */
pub const NIOS_PKT_8X16_TARGET_AD56X1_DAC: u8 = 0x03; /* VCTCXO trim DAC */
pub const NIOS_PKT_8X16_TARGET_INA219: u8 = 0x04; /* Power monitor */

/* 8x32 target IDs */
pub const NIOS_PKT_8X32_TARGET_VERSION: u8 = 0x00; /* FPGA version (read only) */
pub const NIOS_PKT_8X32_TARGET_CONTROL: u8 = 0x01; /* FPGA control/config register */
pub const NIOS_PKT_8X32_TARGET_RFFE_CSR: u8 = 0x03; /* RFFE control & status GPIO */
pub const NIOS_PKT_8X32_TARGET_ADF400X: u8 = 0x04; /* ADF400x config */

/* 8x64 target IDs */
pub const NIOS_PKT_8X64_TARGET_TIMESTAMP: u8 = 0x00; /* Timestamp readback (read only) */

/* Sub-addresses for timestamp target */
pub const NIOS_PKT_8X64_TIMESTAMP_RX: u8 = 0x00;
pub const NIOS_PKT_8X64_TIMESTAMP_TX: u8 = 0x01;

/* 16x64 target IDs */
pub const NIOS_PKT_16X64_TARGET_AD9361: u8 = 0x00;
