mod common;

use crate::common::*;

use bladerf_globals::bladerf2::{BladerfDevSpeed, BladerfFpgaSize};
use bladerf_globals::{BLADERF_CHANNEL_RX0, BladerfFormat};
use libbladerf2_rs::hardware::ina219::{PmicRegister, PmicValue};
use libbladerf2_rs::version::{BLADERF_CAP_FW_SUPPORTS_BLADERF2, BLADERF_CAP_TIMESTAMPS};
use libbladerf2_rs::{BoardState, Device, Error, FpgaProtocol, Result, Version};

#[test]
fn open_initializes_board() -> Result<()> {
    logging_init("bladerf2_open");

    let (device, mocks) = open_initialized()?;
    let board = device.lock()?;

    log::trace!("State:\t{}", board.state());
    assert_eq!(board.state(), BoardState::Initialized);
    assert_eq!(board.state_name(), "Initialized");
    assert_eq!(board.get_fw_version()?, Version::new(2, 4, 0));
    assert_eq!(board.get_fpga_version()?, Version::new(0, 15, 0));
    assert_eq!(board.get_fpga_size()?, BladerfFpgaSize::A4);
    assert!(board.has_capability(BLADERF_CAP_FW_SUPPORTS_BLADERF2));
    assert!(board.has_capability(BLADERF_CAP_TIMESTAMPS));
    assert_eq!(
        mocks.backend.lock().unwrap().protocol,
        Some(FpgaProtocol::NiosII)
    );
    Ok(())
}

#[test]
fn initialization_order() -> Result<()> {
    logging_init("bladerf2_open");

    let (_device, mocks) = open_initialized()?;
    let calls = mocks.calls();
    let pos = |prefix: &str| {
        mocks
            .position(prefix)
            .unwrap_or_else(|| panic!("{prefix} not called: {calls:#?}"))
    };

    assert_eq!(pos("get_fw_version"), 0);
    assert!(pos("is_fw_ready") < pos("get_device_speed"));
    assert!(pos("get_device_speed") < pos("is_fpga_configured"));
    assert!(pos("get_fpga_version") < pos("set_fpga_protocol"));
    assert!(pos("set_fpga_protocol") < pos("rffe_control_write 0x0006"));
    assert!(pos("rffe_control_write 0x0006") < pos("ina219_write 0 0x8000"));
    assert!(pos("ina219_write 5 0xa000") < pos("phy init"));
    assert!(pos("phy init") < pos("phy set_tx_fir_config"));
    assert!(pos("phy set_tx_fir_config") < pos("phy set_rx_fir_config"));
    assert!(pos("phy set_rx_fir_config") < pos("phy set_rx_fir_en_dis true"));
    assert!(pos("phy set_rx_fir_en_dis true") < pos("phy set_tx_rf_port_output"));
    assert!(pos("phy set_tx_rf_port_output") < pos("phy set_rx_rf_port_input"));

    /* Both directions end up disabled and parked in the shutdown band */
    log::trace!("RFFE:\t{:#06x}", mocks.rffe());
    assert_eq!(mocks.rffe(), 0);
    assert!(mocks.phy.lock().unwrap().rx_fir_enabled);
    Ok(())
}

#[test]
fn waits_for_firmware() -> Result<()> {
    logging_init("bladerf2_open");

    let mocks = Mocks::new();
    mocks.backend.lock().unwrap().fw_not_ready_polls = 3;

    let device = Device::open(mocks.parts(), test_config())?;
    let polls = mocks
        .calls()
        .iter()
        .filter(|call| *call == "is_fw_ready")
        .count();
    log::trace!("Readiness polls:\t{polls}");
    assert_eq!(polls, 4);
    assert_eq!(device.lock()?.state(), BoardState::Initialized);
    Ok(())
}

#[test]
fn firmware_never_ready() {
    logging_init("bladerf2_open");

    let mocks = Mocks::new();
    mocks.backend.lock().unwrap().fw_not_ready_polls = 100;

    let result = Device::open(mocks.parts(), test_config());
    assert!(matches!(result, Err(Error::Timeout)));
}

#[test]
fn old_firmware_needs_update() {
    logging_init("bladerf2_open");

    let mocks = Mocks::new();
    mocks.backend.lock().unwrap().fw_version = Version::new(1, 9, 0);

    match Device::open(mocks.parts(), test_config()) {
        Err(Error::UpdateFw { detected, required }) => {
            assert_eq!(detected, Version::new(1, 9, 0));
            assert_eq!(required, Version::new(2, 0, 0));
        }
        Err(e) => panic!("unexpected error {e}"),
        Ok(_) => panic!("open succeeded with old firmware"),
    }
}

#[test]
fn unknown_speed_fails() {
    logging_init("bladerf2_open");

    let mocks = Mocks::new();
    mocks.backend.lock().unwrap().speed = BladerfDevSpeed::Unknown;

    let result = Device::open(mocks.parts(), test_config());
    assert!(matches!(result, Err(Error::Unexpected)));
}

#[test]
fn high_speed_uses_small_messages() -> Result<()> {
    logging_init("bladerf2_open");

    let mocks = Mocks::new();
    mocks.backend.lock().unwrap().speed = BladerfDevSpeed::High;

    let device = Device::open(mocks.parts(), test_config())?;
    let mut board = device.lock()?;
    assert_eq!(board.device_speed()?, BladerfDevSpeed::High);

    let stream =
        board.init_stream(BladerfFormat::Sc16Q11, 16, 8192, 8, Box::new(|_, _| None))?;
    board.deinit_stream(stream);

    assert!(mocks.position("init_stream Sc16Q11 16 8192 8 1024").is_some());
    Ok(())
}

#[test]
fn no_fpga_present_stops_after_firmware() -> Result<()> {
    logging_init("bladerf2_open");

    let mocks = Mocks::new();
    let config = libbladerf2_rs::Config {
        force_no_fpga_present: true,
        ..test_config()
    };

    let device = Device::open(mocks.parts(), config)?;
    let mut board = device.lock()?;
    assert_eq!(board.state(), BoardState::FirmwareLoaded);
    assert!(mocks.position("is_fpga_configured").is_none());

    match board.set_frequency(BLADERF_CHANNEL_RX0, 2_400_000_000) {
        Err(Error::NotInit { required, actual }) => {
            assert_eq!(required, "Initialized");
            assert_eq!(actual, "Firmware Loaded");
        }
        other => panic!("expected NotInit, got {other:?}"),
    }
    assert!(matches!(board.get_fpga_version(), Err(Error::NotInit { .. })));
    Ok(())
}

#[test]
fn missing_fpga_image() -> Result<()> {
    logging_init("bladerf2_open");

    let mocks = Mocks::new();
    mocks.backend.lock().unwrap().fpga_configured = false;

    let device = Device::open(mocks.parts(), test_config())?;
    assert_eq!(device.lock()?.state(), BoardState::FirmwareLoaded);
    assert!(mocks.position("load_fpga").is_none());
    assert!(mocks.position("phy init").is_none());
    Ok(())
}

#[test]
fn loads_fpga_from_search_path() -> Result<()> {
    logging_init("bladerf2_open");

    let dir = std::env::temp_dir().join(format!("bladerf2-open-{}", std::process::id()));
    std::fs::create_dir_all(&dir)?;
    let image: Vec<u8> = (0..64u8).collect();
    std::fs::write(dir.join("hostedxA4.rbf"), &image)?;

    let mocks = Mocks::new();
    mocks.backend.lock().unwrap().fpga_configured = false;
    let config = libbladerf2_rs::Config {
        fpga_search_paths: vec![dir.clone()],
        ..test_config()
    };

    let device = Device::open(mocks.parts(), config)?;
    std::fs::remove_dir_all(&dir)?;

    assert_eq!(device.lock()?.state(), BoardState::Initialized);
    assert_eq!(mocks.backend.lock().unwrap().loaded_image, Some(image));
    Ok(())
}

#[test]
fn rfic_failure_maps_errno() {
    logging_init("bladerf2_open");

    let mocks = Mocks::new();
    mocks.phy.lock().unwrap().fail = Some(("init", -22));

    let result = Device::open(mocks.parts(), test_config());
    assert!(matches!(result, Err(Error::Invalid)));
}

#[test]
fn power_monitor() -> Result<()> {
    logging_init("bladerf2_open");

    let (device, mocks) = open_initialized()?;
    mocks.backend.lock().unwrap().ina219[2] = 5000 << 3;

    let mut board = device.lock()?;
    let calibration = board.get_pmic_register(PmicRegister::Calibration)?;
    let configuration = board.get_pmic_register(PmicRegister::Configuration)?;
    let bus = board.get_pmic_register(PmicRegister::VoltageBus)?;
    log::trace!("Calibration:\t{calibration:?}");
    log::trace!("Configuration:\t{configuration:?}");
    log::trace!("Bus voltage:\t{bus:?}");

    assert_eq!(calibration, PmicValue::Raw(40960));
    assert_eq!(configuration, PmicValue::Raw(0x019f));
    assert_eq!(bus, PmicValue::Float(5000.0 * 0.004));
    Ok(())
}

#[test]
fn close_releases_rfic() -> Result<()> {
    logging_init("bladerf2_open");

    let (device, mocks) = open_initialized()?;
    device.close();

    assert!(mocks.phy.lock().unwrap().deinitialized);
    assert_eq!(mocks.calls().last().map(String::as_str), Some("phy deinit"));
    Ok(())
}
