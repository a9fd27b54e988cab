use crate::board::bladerf2::{BladeRf2, BoardState, CheckStatus};
use crate::config::{ENV_SKIP_FPGA_SIZE_CHECK, ENV_SKIP_FW_SIZE_CHECK};
use crate::{Error, Result};
use bladerf_globals::bladerf2::{
    BLADERF_FLASH_BYTE_LEN_FIRMWARE, BLADERF_FLASH_BYTE_LEN_FPGA, BladerfFpgaSize, FPGA_SIZE_XA4,
};

/// Images of unknown FPGA variants are at least this large.
const FPGA_SIZE_MIN_RELAXED: usize = 1024 * 1024;
/// Even trivial FX3 applications are larger than this.
const FW_SIZE_MIN: usize = 50 * 1024;

/// Images are built uncompressed, so a known variant has a fixed size.
pub(crate) fn is_valid_fpga_size(fpga: BladerfFpgaSize, len: usize, skip_check: bool) -> bool {
    let mut valid = match fpga {
        BladerfFpgaSize::A4 => len == FPGA_SIZE_XA4,
        _ => {
            log::debug!("Unknown FPGA type ({fpga:?}). Using relaxed size criteria.");
            (FPGA_SIZE_MIN_RELAXED..=BLADERF_FLASH_BYTE_LEN_FPGA as usize).contains(&len)
        }
    };

    if skip_check {
        log::info!("Overriding FPGA size check per {ENV_SKIP_FPGA_SIZE_CHECK}");
        valid = true;
    }

    if !valid {
        log::warn!("Detected potentially incorrect FPGA file.");
        log::debug!(
            "If you are certain this file is valid, you may set \
             {ENV_SKIP_FPGA_SIZE_CHECK} to skip this check."
        );
    }

    valid
}

pub(crate) fn is_valid_fw_size(len: usize) -> bool {
    (FW_SIZE_MIN..=BLADERF_FLASH_BYTE_LEN_FIRMWARE as usize).contains(&len)
}

impl BladeRf2 {
    fn check_fpga_image(&self, op: &str, image: &[u8]) -> Result<()> {
        let fpga_size = self.board_data.fpga_size;
        if !is_valid_fpga_size(fpga_size, image.len(), self.config.skip_fpga_size_check) {
            log::error!("{op}: fpga size {fpga_size:?} is not valid for {} bytes", image.len());
            return Err(Error::Invalid);
        }
        Ok(())
    }

    /// Configure the FPGA from `image` and initialize the board.
    pub fn load_fpga(&mut self, image: &[u8]) -> Result<()> {
        const OP: &str = "load_fpga";

        self.check_state(BoardState::FirmwareLoaded)?;
        self.check_fpga_image(OP, image)?;

        self.backend.load_fpga(image).check(OP, "load_fpga")?;
        self.board_data.state = BoardState::FpgaLoaded;

        self.initialize().check(OP, "initialize")
    }

    /// Store `image` in the FPGA autoload region of the SPI flash.
    pub fn flash_fpga(&mut self, image: &[u8]) -> Result<()> {
        const OP: &str = "flash_fpga";

        self.check_state(BoardState::FirmwareLoaded)?;
        self.check_fpga_image(OP, image)?;

        self.flash
            .write_fpga_bitstream(image)
            .check(OP, "write_fpga_bitstream")
    }

    pub fn erase_stored_fpga(&mut self) -> Result<()> {
        self.check_state(BoardState::FirmwareLoaded)?;
        self.flash.erase_fpga().check("erase_stored_fpga", "erase_fpga")
    }

    pub fn flash_firmware(&mut self, image: &[u8]) -> Result<()> {
        const OP: &str = "flash_firmware";

        self.check_state(BoardState::FirmwareLoaded)?;

        if !self.config.skip_fw_size_check && !is_valid_fw_size(image.len()) {
            log::info!("Detected potentially invalid firmware file.");
            log::info!("Set {ENV_SKIP_FW_SIZE_CHECK} to skip this check.");
            log::error!("{OP}: firmware size {} is not valid", image.len());
            return Err(Error::Invalid);
        }

        self.flash.write_fx3_fw(image).check(OP, "write_fx3_fw")
    }

    pub fn erase_flash(&mut self, erase_block: u32, count: u32) -> Result<()> {
        self.check_state(BoardState::FirmwareLoaded)?;
        self.flash
            .erase(erase_block, count)
            .check("erase_flash", "spi_flash_erase")
    }

    pub fn read_flash(&mut self, page: u32, count: u32) -> Result<Vec<u8>> {
        self.check_state(BoardState::FirmwareLoaded)?;
        self.flash.read(page, count).check("read_flash", "spi_flash_read")
    }

    pub fn write_flash(&mut self, page: u32, data: &[u8]) -> Result<()> {
        self.check_state(BoardState::FirmwareLoaded)?;
        self.flash
            .write(page, data)
            .check("write_flash", "spi_flash_write")
    }

    pub fn device_reset(&mut self) -> Result<()> {
        self.check_state(BoardState::FirmwareLoaded)?;
        self.backend.device_reset().check("device_reset", "device_reset")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fpga_size_checks() {
        assert!(is_valid_fpga_size(BladerfFpgaSize::A4, FPGA_SIZE_XA4, false));
        assert!(!is_valid_fpga_size(BladerfFpgaSize::A4, 2_000_000, false));
        assert!(is_valid_fpga_size(BladerfFpgaSize::A4, 2_000_000, true));
        assert!(is_valid_fpga_size(BladerfFpgaSize::Unknown, 2_000_000, false));
        assert!(!is_valid_fpga_size(BladerfFpgaSize::Unknown, 1000, false));
        assert!(!is_valid_fpga_size(BladerfFpgaSize::Unknown, 0x0037_0001, false));
    }

    #[test]
    fn fw_size_checks() {
        assert!(!is_valid_fw_size(50 * 1024 - 1));
        assert!(is_valid_fw_size(50 * 1024));
        assert!(is_valid_fw_size(0x30000));
        assert!(!is_valid_fw_size(0x30001));
    }
}
