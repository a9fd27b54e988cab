use crate::board::bladerf2::tables::{RFFE_CONTROL_ENABLE, RFFE_CONTROL_TXNRX};
use crate::board::bladerf2::{BladeRf2, BoardData, BoardState, CheckStatus};
use crate::backend::FpgaProtocol;
use crate::config::{Config, FPGA_IMAGE_XA4};
use crate::device::BoardParts;
use crate::hardware::ina219::{PmicRegister, PmicValue, ina219_init, ina219_read_register};
use crate::version::{Compatibility, Version};
use crate::{Error, Result};
use bladerf_globals::Direction;
use bladerf_globals::bladerf2::{
    BladerfDevSpeed, BladerfFpgaSize, USB_MSG_SIZE_HS, USB_MSG_SIZE_SS,
};
use std::thread::sleep;

impl BladeRf2 {
    /// Walk the board up the bring-up chain as far as it goes.
    pub(crate) fn open(parts: BoardParts, config: Config) -> Result<Self> {
        let BoardParts {
            backend,
            phy_factory,
            streaming,
            flash,
            trigger,
            classifier,
        } = parts;

        let mut board = Self {
            backend,
            phy_factory,
            streaming,
            flash,
            trigger,
            classifier,
            config,
            board_data: BoardData::default(),
        };

        let fw_version = board.backend.get_fw_version().check("open", "get_fw_version")?;
        log::debug!("Read Firmware version: {fw_version}");

        board.board_data.fw_version = fw_version;
        board.board_data.capabilities |= board.classifier.fw_capabilities(&fw_version);
        log::debug!(
            "Capability mask before FPGA load: {:#018x}",
            board.board_data.capabilities
        );

        board.board_data.state = BoardState::FirmwareLoaded;

        board.wait_fw_ready()?;

        let speed = board
            .backend
            .get_device_speed()
            .check("open", "get_device_speed")?;
        board.board_data.msg_size = match speed {
            BladerfDevSpeed::Super => USB_MSG_SIZE_SS,
            BladerfDevSpeed::High => USB_MSG_SIZE_HS,
            BladerfDevSpeed::Unknown => {
                log::error!("open: Got unsupported device speed {speed:?}");
                return Err(Error::Unexpected);
            }
        };

        if let Compatibility::UpdateFw { required } = board.classifier.check_fw(&fw_version) {
            log::warn!(
                "Firmware v{fw_version} was detected. This driver requires firmware \
                 v{required} or later. An upgrade via the bootloader is required."
            );
            return Err(Error::UpdateFw {
                detected: fw_version,
                required,
            });
        }

        // The xA4 is the only variant shipped with this board.
        board.board_data.fpga_size = BladerfFpgaSize::A4;

        if board.config.force_no_fpga_present {
            log::debug!(
                "Skipping FPGA configuration and initialization - \
                 force_no_fpga_present is set."
            );
            return Ok(board);
        }

        if board
            .backend
            .is_fpga_configured()
            .check("open", "is_fpga_configured")?
        {
            board.board_data.state = BoardState::FpgaLoaded;
        } else {
            let image_name = match board.board_data.fpga_size {
                BladerfFpgaSize::A4 => FPGA_IMAGE_XA4,
                BladerfFpgaSize::Unknown => {
                    log::warn!("Unknown FPGA size. Skipping FPGA configuration...");
                    log::warn!("Skipping further initialization...");
                    return Ok(board);
                }
                other => {
                    log::error!("open: Mapping FPGA size {other:?} failed");
                    return Err(Error::Unexpected);
                }
            };

            let Some(path) = board.config.find_file(image_name) else {
                log::warn!("FPGA bitstream file not found.");
                log::warn!("Skipping further initialization...");
                return Ok(board);
            };

            log::debug!("Loading FPGA from: {}", path.display());
            let image = std::fs::read(&path).map_err(|e| {
                log::error!("open: reading {} failed: {e}", path.display());
                Error::Io(e)
            })?;

            board.backend.load_fpga(&image).check("open", "load_fpga")?;
            board.board_data.state = BoardState::FpgaLoaded;
        }

        board.initialize().check("open", "initialize")?;

        Ok(board)
    }

    fn wait_fw_ready(&mut self) -> Result<()> {
        let retries = self.config.fw_ready_retries;

        for attempt in 0..retries {
            if self.backend.is_fw_ready().check("open", "is_fw_ready")? {
                return Ok(());
            }
            if attempt == 0 {
                log::info!("Waiting for device to become ready...");
            } else {
                log::debug!("Retry {:02}/{:02}.", attempt + 1, retries);
            }
            sleep(self.config.fw_ready_interval);
        }

        log::error!("open: is_fw_ready failed: {}", Error::Timeout);
        Err(Error::Timeout)
    }

    /// Configure the FPGA framing, power monitor and RFIC, and park both
    /// directions in the shutdown band.
    pub(crate) fn initialize(&mut self) -> Result<()> {
        const OP: &str = "initialize";

        let fpga_version = self.backend.get_fpga_version().check(OP, "get_fpga_version")?;
        log::debug!("Read FPGA version: {fpga_version}");

        self.board_data.fpga_version = fpga_version;
        self.board_data.capabilities |= self.classifier.fpga_capabilities(&fpga_version);
        log::debug!(
            "Capability mask after FPGA load: {:#018x}",
            self.board_data.capabilities
        );

        // A mismatch only warns, so a corrective image can still be loaded.
        self.warn_incompatible(&fpga_version);

        self.backend
            .set_fpga_protocol(FpgaProtocol::NiosII)
            .check(OP, "set_fpga_protocol")?;

        self.backend
            .rffe_control_write((1 << RFFE_CONTROL_ENABLE) | (1 << RFFE_CONTROL_TXNRX))
            .check(OP, "rffe_control_write initialization")?;

        ina219_init(self.backend.as_mut(), self.config.ina219_r_shunt).check(OP, "ina219_init")?;

        if let Some(mut old) = self.board_data.phy.take() {
            log::debug!("{OP}: releasing previous RFIC handle");
            old.deinit();
        }

        let phy = self
            .phy_factory
            .init(&self.config.rfic)
            .check(OP, "ad9361_init")?;
        self.board_data.phy = Some(phy);

        let tx_fir = self.config.rfic.tx_fir.clone();
        let rx_fir = self.config.rfic.rx_fir.clone();
        self.phy()?
            .set_tx_fir_config(&tx_fir)
            .check(OP, "ad9361_set_tx_fir_config")?;
        self.phy()?
            .set_rx_fir_config(&rx_fir)
            .check(OP, "ad9361_set_rx_fir_config")?;
        self.phy()?
            .set_rx_fir_en_dis(true)
            .check(OP, "ad9361_set_rx_fir_en_dis")?;

        /* Disable the RFIC until a module is enabled */
        let mut reg = self.backend.rffe_control_read().check(OP, "rffe_control_read")?;
        reg &= !(1 << RFFE_CONTROL_TXNRX);
        reg &= !(1 << RFFE_CONTROL_ENABLE);
        self.backend
            .rffe_control_write(reg)
            .check(OP, "rffe_control_write")?;

        let tx_synth = self.config.rfic.tx_synthesizer_frequency_hz;
        let rx_synth = self.config.rfic.rx_synthesizer_frequency_hz;
        self.select_band(Direction::Tx, tx_synth)
            .check(OP, "select_band (TX)")?;
        self.select_band(Direction::Rx, rx_synth)
            .check(OP, "select_band (RX)")?;

        self.board_data.state = BoardState::Initialized;
        log::debug!("{OP}: complete");

        Ok(())
    }

    fn warn_incompatible(&self, fpga_version: &Version) {
        let fw_version = &self.board_data.fw_version;
        match self.classifier.check(fw_version, fpga_version) {
            Compatibility::Compatible => {}
            Compatibility::UpdateFpga { required } => log::warn!(
                "FPGA v{fpga_version} was detected. Firmware v{fw_version} requires \
                 FPGA v{required} or later. Please load a different FPGA version \
                 before continuing."
            ),
            Compatibility::UpdateFw { required } => log::warn!(
                "FPGA v{fpga_version} was detected, which requires firmware \
                 v{required} or later. The device firmware is currently \
                 v{fw_version}. Please upgrade the device firmware before continuing."
            ),
        }
    }

    pub fn state(&self) -> BoardState {
        self.board_data.state
    }

    pub fn state_name(&self) -> &'static str {
        self.board_data.state.name()
    }

    pub fn device_speed(&mut self) -> Result<BladerfDevSpeed> {
        self.check_state(BoardState::FirmwareLoaded)?;
        self.backend
            .get_device_speed()
            .check("device_speed", "get_device_speed")
    }

    pub fn get_fpga_size(&self) -> Result<BladerfFpgaSize> {
        self.check_state(BoardState::FirmwareLoaded)?;
        Ok(self.board_data.fpga_size)
    }

    pub fn is_fpga_configured(&mut self) -> Result<bool> {
        self.check_state(BoardState::FirmwareLoaded)?;
        self.backend
            .is_fpga_configured()
            .check("is_fpga_configured", "is_fpga_configured")
    }

    pub fn get_capabilities(&self) -> u64 {
        self.board_data.capabilities
    }

    pub fn has_capability(&self, capability: u64) -> bool {
        self.board_data.capabilities & capability == capability
    }

    pub fn get_fpga_version(&self) -> Result<Version> {
        self.check_state(BoardState::FpgaLoaded)?;
        Ok(self.board_data.fpga_version)
    }

    pub fn get_fw_version(&self) -> Result<Version> {
        self.check_state(BoardState::FirmwareLoaded)?;
        Ok(self.board_data.fw_version)
    }

    /// Read one of the INA219 power monitor registers.
    pub fn get_pmic_register(&mut self, reg: PmicRegister) -> Result<PmicValue> {
        self.check_state(BoardState::FpgaLoaded)?;
        ina219_read_register(self.backend.as_mut(), reg).check("get_pmic_register", "ina219")
    }
}
