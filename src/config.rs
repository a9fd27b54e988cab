use crate::hardware::ad9361::Ad9361InitParams;
use std::path::PathBuf;
use std::time::Duration;

pub const ENV_SEARCH_DIR: &str = "BLADERF_SEARCH_DIR";
pub const ENV_FORCE_NO_FPGA_PRESENT: &str = "BLADERF_FORCE_NO_FPGA_PRESENT";
pub const ENV_SKIP_FPGA_SIZE_CHECK: &str = "BLADERF_SKIP_FPGA_SIZE_CHECK";
pub const ENV_SKIP_FW_SIZE_CHECK: &str = "BLADERF_SKIP_FW_SIZE_CHECK";

/// Autoload FPGA image for the xA4 board variant.
pub const FPGA_IMAGE_XA4: &str = "hostedxA4.rbf";

/// Board configuration, fixed for the lifetime of an open device.
#[derive(Debug, Clone)]
pub struct Config {
    /// How many times to poll the firmware for readiness during open.
    pub fw_ready_retries: usize,
    /// Sleep between two readiness polls.
    pub fw_ready_interval: Duration,
    /// Directories searched, in order, for the autoload FPGA image.
    pub fpga_search_paths: Vec<PathBuf>,
    /// Skip FPGA configuration and board initialization entirely.
    pub force_no_fpga_present: bool,
    pub skip_fpga_size_check: bool,
    pub skip_fw_size_check: bool,
    /// AD9361 initialization parameters.
    pub rfic: Ad9361InitParams,
    /// INA219 shunt resistor, in ohms.
    pub ina219_r_shunt: f32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            fw_ready_retries: 30,
            fw_ready_interval: Duration::from_millis(50),
            fpga_search_paths: default_search_paths(),
            force_no_fpga_present: false,
            skip_fpga_size_check: false,
            skip_fw_size_check: false,
            rfic: Ad9361InitParams::default(),
            ina219_r_shunt: 0.001,
        }
    }
}

impl Config {
    /// Default configuration with the environment escape hatches applied.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(dir) = std::env::var_os(ENV_SEARCH_DIR) {
            log::info!("{ENV_SEARCH_DIR} is set, searching {dir:?} first");
            config.fpga_search_paths.insert(0, PathBuf::from(dir));
        }

        config.force_no_fpga_present = env_flag(ENV_FORCE_NO_FPGA_PRESENT);
        config.skip_fpga_size_check = env_flag(ENV_SKIP_FPGA_SIZE_CHECK);
        config.skip_fw_size_check = env_flag(ENV_SKIP_FW_SIZE_CHECK);
        config
    }

    /// First existing `name` in the search paths.
    pub fn find_file(&self, name: &str) -> Option<PathBuf> {
        self.fpga_search_paths
            .iter()
            .map(|dir| dir.join(name))
            .find(|path| path.is_file())
    }
}

fn env_flag(name: &str) -> bool {
    let set = std::env::var_os(name).is_some();
    if set {
        log::info!("{name} is set");
    }
    set
}

fn default_search_paths() -> Vec<PathBuf> {
    let mut paths = vec![PathBuf::from(".")];
    if let Some(home) = std::env::var_os("HOME") {
        paths.push(PathBuf::from(home).join(".config/Nuand/bladeRF"));
    }
    paths.push(PathBuf::from("/etc/Nuand/bladeRF"));
    paths.push(PathBuf::from("/usr/share/Nuand/bladeRF"));
    paths
}
