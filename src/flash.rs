use crate::Result;

/// SPI flash access through the FX3 firmware.
///
/// Addresses are in pages (`BLADERF_FLASH_PAGE_SIZE`) for reads and writes
/// and in erase blocks (`BLADERF_FLASH_EB_SIZE`) for erases.
pub trait FlashOps: Send {
    fn erase(&mut self, erase_block: u32, count: u32) -> Result<()>;
    fn read(&mut self, page: u32, count: u32) -> Result<Vec<u8>>;
    fn write(&mut self, page: u32, data: &[u8]) -> Result<()>;
    /// Write an FX3 firmware image to the firmware region.
    fn write_fx3_fw(&mut self, image: &[u8]) -> Result<()>;
    /// Write an FPGA bitstream to the autoload region.
    fn write_fpga_bitstream(&mut self, image: &[u8]) -> Result<()>;
    /// Erase the autoload region.
    fn erase_fpga(&mut self) -> Result<()>;
}
