/// BladeRF2 USB vendor ID.
pub const BLADERF2_USB_VID: u16 = 0x2CF0;
/// BladeRF2 USB product ID.
pub const BLADERF2_USB_PID: u16 = 0x5250;

/// Data message size at USB SuperSpeed.
pub const USB_MSG_SIZE_SS: usize = 2048;
/// Data message size at USB HighSpeed.
pub const USB_MSG_SIZE_HS: usize = 1024;

/// Flash page size, in bytes
pub const BLADERF_FLASH_PAGE_SIZE: u32 = 256;
/// Flash erase block size, in bytes
pub const BLADERF_FLASH_EB_SIZE: u32 = 64 * 1024;

pub const BLADERF_FLASH_ADDR_FIRMWARE: u32 = 0x00000000;
pub const BLADERF_FLASH_BYTE_LEN_FIRMWARE: u32 = 0x00030000;

pub const BLADERF_FLASH_ADDR_CAL: u32 = 0x00030000;
pub const BLADERF_FLASH_BYTE_LEN_CAL: u32 = 0x100;

/// Start of the FPGA autoload region. Must be erase block aligned.
pub const BLADERF_FLASH_ADDR_FPGA: u32 = 0x00040000;
/// Maximum length of an FPGA bitstream stored in flash.
pub const BLADERF_FLASH_BYTE_LEN_FPGA: u32 = 0x00370000;

/// Uncompressed size of a hosted xA4 bitstream.
pub const FPGA_SIZE_XA4: usize = 2632660;

/// FPGA device variant
#[derive(PartialEq, Eq, Debug, Clone, Copy)]
pub enum BladerfFpgaSize {
    Unknown = 0,
    /// 40 kLE FPGA (bladeRF x40)
    Kle40 = 40,
    /// 115 kLE FPGA (bladeRF x115)
    Kle115 = 115,
    /// 49 kLE FPGA (A4)
    A4 = 49,
    /// 77 kLE FPGA (A5)
    A5 = 77,
    /// 301 kLE FPGA (A9)
    A9 = 301,
}

/// USB bus speed the device enumerated at
#[derive(PartialEq, Eq, Debug, Clone, Copy)]
pub enum BladerfDevSpeed {
    Unknown,
    High,
    Super,
}

/// Expansion boards
#[derive(PartialEq, Eq, Debug, Clone, Copy)]
pub enum BladerfXb {
    None = 0,
    Xb100,
    Xb200,
    Xb300,
}

/// Quick re-tune parameters, as stored in the NIOS and RFFE profile tables
#[derive(Debug, Clone, Default)]
pub struct BladerfQuickTune {
    /// Profile number in Nios
    pub nios_profile: u16,
    /// Profile number in RFFE
    pub rffe_profile: u8,
    /// RFFE port settings
    pub port: u8,
    /// External SPDT settings
    pub spdt: u8,
}

/// Tuning mode selection. Only the host tuning mode exists on this board.
#[derive(PartialEq, Eq, Debug, Clone, Copy)]
pub enum BladerfTuningMode {
    Host,
    Fpga,
}

/// VCTCXO tamer input selection
#[derive(PartialEq, Eq, Debug, Clone, Copy)]
pub enum BladerfVctcxoTamerMode {
    Disabled,
    OnePps,
    TenMhz,
}
