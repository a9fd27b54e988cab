#![allow(dead_code)]
// This module has been created using mod.rs in a subfolder, instead of just creating a common.rs under tests
// This is due to the test runner then not searching for runnable tests in mod.rs
// https://doc.rust-lang.org/rust-by-example/testing/integration_testing.html

use bladerf_globals::bladerf2::BladerfDevSpeed;
use bladerf_globals::{ChannelLayout, Direction};
use libbladerf2_rs::flash::FlashOps;
use libbladerf2_rs::hardware::ad9361::{
    AD_ADDR_MASK, Ad9361InitParams, Ad9361Phy, FirConfig, PhyFactory, PhyResult, RfGainCtrlMode,
    RfRxGain,
};
use libbladerf2_rs::hardware::ina219::INA219_REG_CONFIGURATION;
use libbladerf2_rs::streaming::{
    Metadata, StreamCallback, StreamConfig, StreamEngine, StreamHandle, SyncConfig, SyncStream,
};
use libbladerf2_rs::trigger::{Trigger, TriggerOps, TriggerRole, TriggerSignal, TriggerState};
use libbladerf2_rs::version::VersionTable;
use libbladerf2_rs::{Backend, BoardParts, Config, Device, Error, FpgaProtocol, Result, Version};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub fn logging_init(module: &str) {
    let _ = env_logger::builder()
        .is_test(true)
        .filter_level(log::LevelFilter::Error)
        .filter_module(module, log::LevelFilter::Trace)
        .filter_module("libbladerf2_rs", log::LevelFilter::Trace)
        .try_init();
}

/// Every collaborator call, in order, as a short text line.
pub type CallLog = Arc<Mutex<Vec<String>>>;

fn record(calls: &CallLog, entry: String) {
    calls.lock().unwrap().push(entry);
}

pub struct BackendState {
    pub fw_version: Version,
    pub fpga_version: Version,
    /// Number of readiness polls answered with "not ready".
    pub fw_not_ready_polls: usize,
    pub speed: BladerfDevSpeed,
    pub fpga_configured: bool,
    pub loaded_image: Option<Vec<u8>>,
    pub protocol: Option<FpgaProtocol>,
    pub rffe: u32,
    pub config_gpio: u32,
    pub fw_loopback: bool,
    pub timestamps: [u64; 2],
    pub ad9361: HashMap<u16, u8>,
    pub adf400x: [u32; 4],
    pub ina219: [u16; 6],
    pub trim_dac: u16,
    /// Name of a backend call that fails with `Error::Io`.
    pub fail: Option<&'static str>,
}

impl Default for BackendState {
    fn default() -> Self {
        Self {
            fw_version: Version::new(2, 4, 0),
            fpga_version: Version::new(0, 15, 0),
            fw_not_ready_polls: 0,
            speed: BladerfDevSpeed::Super,
            fpga_configured: true,
            loaded_image: None,
            protocol: None,
            rffe: 0,
            config_gpio: 0,
            fw_loopback: false,
            timestamps: [1000, 2000],
            ad9361: HashMap::new(),
            adf400x: [0; 4],
            ina219: [0; 6],
            trim_dac: 0,
            fail: None,
        }
    }
}

pub struct MockBackend {
    calls: CallLog,
    state: Arc<Mutex<BackendState>>,
}

impl MockBackend {
    fn call(&self, name: &'static str, entry: String) -> Result<std::sync::MutexGuard<'_, BackendState>> {
        record(&self.calls, entry);
        let state = self.state.lock().unwrap();
        if state.fail == Some(name) {
            return Err(Error::Io(std::io::Error::other(name)));
        }
        Ok(state)
    }
}

impl Backend for MockBackend {
    fn get_fw_version(&mut self) -> Result<Version> {
        Ok(self.call("get_fw_version", "get_fw_version".into())?.fw_version)
    }

    fn get_fpga_version(&mut self) -> Result<Version> {
        Ok(self.call("get_fpga_version", "get_fpga_version".into())?.fpga_version)
    }

    fn is_fw_ready(&mut self) -> Result<bool> {
        let mut state = self.call("is_fw_ready", "is_fw_ready".into())?;
        if state.fw_not_ready_polls > 0 {
            state.fw_not_ready_polls -= 1;
            return Ok(false);
        }
        Ok(true)
    }

    fn get_device_speed(&mut self) -> Result<BladerfDevSpeed> {
        Ok(self.call("get_device_speed", "get_device_speed".into())?.speed)
    }

    fn is_fpga_configured(&mut self) -> Result<bool> {
        Ok(self
            .call("is_fpga_configured", "is_fpga_configured".into())?
            .fpga_configured)
    }

    fn load_fpga(&mut self, image: &[u8]) -> Result<()> {
        let mut state = self.call("load_fpga", format!("load_fpga {}", image.len()))?;
        state.loaded_image = Some(image.to_vec());
        state.fpga_configured = true;
        Ok(())
    }

    fn set_fpga_protocol(&mut self, protocol: FpgaProtocol) -> Result<()> {
        let mut state = self.call("set_fpga_protocol", format!("set_fpga_protocol {protocol:?}"))?;
        state.protocol = Some(protocol);
        Ok(())
    }

    fn rffe_control_read(&mut self) -> Result<u32> {
        Ok(self.call("rffe_control_read", "rffe_control_read".into())?.rffe)
    }

    fn rffe_control_write(&mut self, value: u32) -> Result<()> {
        let mut state = self.call("rffe_control_write", format!("rffe_control_write {value:#06x}"))?;
        state.rffe = value;
        Ok(())
    }

    fn enable_module(&mut self, direction: Direction, enable: bool) -> Result<()> {
        let _state = self.call("enable_module", format!("enable_module {direction} {enable}"))?;
        Ok(())
    }

    fn get_timestamp(&mut self, direction: Direction) -> Result<u64> {
        Ok(self
            .call("get_timestamp", format!("get_timestamp {direction}"))?
            .timestamps[direction.index()])
    }

    fn config_gpio_read(&mut self) -> Result<u32> {
        Ok(self.call("config_gpio_read", "config_gpio_read".into())?.config_gpio)
    }

    fn config_gpio_write(&mut self, value: u32) -> Result<()> {
        let mut state = self.call("config_gpio_write", format!("config_gpio_write {value:#010x}"))?;
        state.config_gpio = value;
        Ok(())
    }

    fn ad9361_spi_read(&mut self, cmd: u16) -> Result<u64> {
        let state = self.call("ad9361_spi_read", format!("ad9361_spi_read {cmd:#06x}"))?;
        let value = state.ad9361.get(&(cmd & AD_ADDR_MASK)).copied().unwrap_or(0);
        Ok((value as u64) << 56)
    }

    fn ad9361_spi_write(&mut self, cmd: u16, data: u64) -> Result<()> {
        let mut state = self.call(
            "ad9361_spi_write",
            format!("ad9361_spi_write {cmd:#06x} {data:#018x}"),
        )?;
        state.ad9361.insert(cmd & AD_ADDR_MASK, (data >> 56) as u8);
        Ok(())
    }

    fn adf400x_read(&mut self, addr: u8) -> Result<u32> {
        Ok(self.call("adf400x_read", format!("adf400x_read {addr}"))?.adf400x[addr as usize])
    }

    fn adf400x_write(&mut self, addr: u8, data: u32) -> Result<()> {
        let mut state = self.call("adf400x_write", format!("adf400x_write {addr} {data:#x}"))?;
        state.adf400x[addr as usize] = data;
        Ok(())
    }

    fn ina219_read(&mut self, addr: u8) -> Result<u16> {
        Ok(self.call("ina219_read", format!("ina219_read {addr}"))?.ina219[addr as usize])
    }

    fn ina219_write(&mut self, addr: u8, data: u16) -> Result<()> {
        let mut state = self.call("ina219_write", format!("ina219_write {addr} {data:#06x}"))?;
        // Only the configuration register has a self-clearing reset bit.
        state.ina219[addr as usize] = if addr == INA219_REG_CONFIGURATION {
            data & !0x8000
        } else {
            data
        };
        Ok(())
    }

    fn ad56x1_vctcxo_trim_dac_read(&mut self) -> Result<u16> {
        Ok(self.call("trim_dac_read", "trim_dac_read".into())?.trim_dac)
    }

    fn ad56x1_vctcxo_trim_dac_write(&mut self, value: u16) -> Result<()> {
        let mut state = self.call("trim_dac_write", format!("trim_dac_write {value:#06x}"))?;
        state.trim_dac = value;
        Ok(())
    }

    fn device_reset(&mut self) -> Result<()> {
        let _state = self.call("device_reset", "device_reset".into())?;
        Ok(())
    }

    fn set_firmware_loopback(&mut self, enable: bool) -> Result<()> {
        let mut state = self.call(
            "set_firmware_loopback",
            format!("set_firmware_loopback {enable}"),
        )?;
        state.fw_loopback = enable;
        Ok(())
    }

    fn get_firmware_loopback(&mut self) -> Result<bool> {
        Ok(self
            .call("get_firmware_loopback", "get_firmware_loopback".into())?
            .fw_loopback)
    }
}

#[derive(Debug, Default)]
pub struct PhyState {
    pub initialized: bool,
    pub deinitialized: bool,
    pub rx_lo: u64,
    pub tx_lo: u64,
    pub rx_port: u32,
    pub tx_port: u32,
    pub rx_rf_gain: [i32; 2],
    pub tx_attenuation: [u32; 2],
    pub gc_mode: [u8; 2],
    pub rx_bandwidth: u32,
    pub tx_bandwidth: u32,
    pub rx_sampling_freq: u32,
    pub tx_sampling_freq: u32,
    pub rx_fir: Option<FirConfig>,
    pub tx_fir: Option<FirConfig>,
    pub rx_fir_enabled: bool,
    pub bist: i32,
    pub regs: HashMap<u16, u8>,
    /// Name of a driver call and the negative errno it fails with.
    pub fail: Option<(&'static str, i32)>,
}

pub struct MockPhy {
    calls: CallLog,
    state: Arc<Mutex<PhyState>>,
}

impl MockPhy {
    fn call(&self, name: &'static str, entry: String) -> PhyResult<std::sync::MutexGuard<'_, PhyState>> {
        record(&self.calls, entry);
        let state = self.state.lock().unwrap();
        let fail = state.fail;
        match fail {
            Some((failing, code)) if failing == name => Err(code),
            _ => Ok(state),
        }
    }
}

impl Ad9361Phy for MockPhy {
    fn get_rx_lo_freq(&mut self) -> PhyResult<u64> {
        Ok(self.call("get_rx_lo_freq", "phy get_rx_lo_freq".into())?.rx_lo)
    }

    fn set_rx_lo_freq(&mut self, freq: u64) -> PhyResult<()> {
        self.call("set_rx_lo_freq", format!("phy set_rx_lo_freq {freq}"))?.rx_lo = freq;
        Ok(())
    }

    fn get_tx_lo_freq(&mut self) -> PhyResult<u64> {
        Ok(self.call("get_tx_lo_freq", "phy get_tx_lo_freq".into())?.tx_lo)
    }

    fn set_tx_lo_freq(&mut self, freq: u64) -> PhyResult<()> {
        self.call("set_tx_lo_freq", format!("phy set_tx_lo_freq {freq}"))?.tx_lo = freq;
        Ok(())
    }

    fn get_rx_rf_port_input(&mut self) -> PhyResult<u32> {
        Ok(self.call("get_rx_rf_port_input", "phy get_rx_rf_port_input".into())?.rx_port)
    }

    fn set_rx_rf_port_input(&mut self, port: u32) -> PhyResult<()> {
        self.call("set_rx_rf_port_input", format!("phy set_rx_rf_port_input {port}"))?
            .rx_port = port;
        Ok(())
    }

    fn get_tx_rf_port_output(&mut self) -> PhyResult<u32> {
        Ok(self.call("get_tx_rf_port_output", "phy get_tx_rf_port_output".into())?.tx_port)
    }

    fn set_tx_rf_port_output(&mut self, port: u32) -> PhyResult<()> {
        self.call("set_tx_rf_port_output", format!("phy set_tx_rf_port_output {port}"))?
            .tx_port = port;
        Ok(())
    }

    fn get_rx_rf_gain(&mut self, ch: u8) -> PhyResult<i32> {
        Ok(self.call("get_rx_rf_gain", format!("phy get_rx_rf_gain {ch}"))?.rx_rf_gain[ch as usize])
    }

    fn set_rx_rf_gain(&mut self, ch: u8, gain_db: i32) -> PhyResult<()> {
        self.call("set_rx_rf_gain", format!("phy set_rx_rf_gain {ch} {gain_db}"))?
            .rx_rf_gain[ch as usize] = gain_db;
        Ok(())
    }

    fn get_tx_attenuation(&mut self, ch: u8) -> PhyResult<u32> {
        Ok(self
            .call("get_tx_attenuation", format!("phy get_tx_attenuation {ch}"))?
            .tx_attenuation[ch as usize])
    }

    fn set_tx_attenuation(&mut self, ch: u8, attenuation_mdb: u32) -> PhyResult<()> {
        self.call(
            "set_tx_attenuation",
            format!("phy set_tx_attenuation {ch} {attenuation_mdb}"),
        )?
        .tx_attenuation[ch as usize] = attenuation_mdb;
        Ok(())
    }

    fn get_rx_gain(&mut self, rx: u8) -> PhyResult<RfRxGain> {
        let state = self.call("get_rx_gain", format!("phy get_rx_gain {rx}"))?;
        Ok(RfRxGain {
            ant: rx as u32,
            gain_db: state.rx_rf_gain[(rx - 1) as usize],
            digital_gain: 3,
            ..Default::default()
        })
    }

    fn get_rx_gain_control_mode(&mut self, ch: u8) -> PhyResult<u8> {
        Ok(self
            .call("get_rx_gain_control_mode", format!("phy get_rx_gain_control_mode {ch}"))?
            .gc_mode[ch as usize])
    }

    fn set_rx_gain_control_mode(&mut self, ch: u8, mode: RfGainCtrlMode) -> PhyResult<()> {
        self.call(
            "set_rx_gain_control_mode",
            format!("phy set_rx_gain_control_mode {ch} {mode:?}"),
        )?
        .gc_mode[ch as usize] = mode as u8;
        Ok(())
    }

    fn get_rx_rf_bandwidth(&mut self) -> PhyResult<u32> {
        Ok(self.call("get_rx_rf_bandwidth", "phy get_rx_rf_bandwidth".into())?.rx_bandwidth)
    }

    fn set_rx_rf_bandwidth(&mut self, bandwidth_hz: u32) -> PhyResult<()> {
        self.call("set_rx_rf_bandwidth", format!("phy set_rx_rf_bandwidth {bandwidth_hz}"))?
            .rx_bandwidth = bandwidth_hz;
        Ok(())
    }

    fn get_tx_rf_bandwidth(&mut self) -> PhyResult<u32> {
        Ok(self.call("get_tx_rf_bandwidth", "phy get_tx_rf_bandwidth".into())?.tx_bandwidth)
    }

    fn set_tx_rf_bandwidth(&mut self, bandwidth_hz: u32) -> PhyResult<()> {
        self.call("set_tx_rf_bandwidth", format!("phy set_tx_rf_bandwidth {bandwidth_hz}"))?
            .tx_bandwidth = bandwidth_hz;
        Ok(())
    }

    fn get_rx_sampling_freq(&mut self) -> PhyResult<u32> {
        Ok(self
            .call("get_rx_sampling_freq", "phy get_rx_sampling_freq".into())?
            .rx_sampling_freq)
    }

    fn set_rx_sampling_freq(&mut self, freq: u32) -> PhyResult<()> {
        self.call("set_rx_sampling_freq", format!("phy set_rx_sampling_freq {freq}"))?
            .rx_sampling_freq = freq;
        Ok(())
    }

    fn get_tx_sampling_freq(&mut self) -> PhyResult<u32> {
        Ok(self
            .call("get_tx_sampling_freq", "phy get_tx_sampling_freq".into())?
            .tx_sampling_freq)
    }

    fn set_tx_sampling_freq(&mut self, freq: u32) -> PhyResult<()> {
        self.call("set_tx_sampling_freq", format!("phy set_tx_sampling_freq {freq}"))?
            .tx_sampling_freq = freq;
        Ok(())
    }

    fn set_rx_fir_config(&mut self, config: &FirConfig) -> PhyResult<()> {
        self.call("set_rx_fir_config", "phy set_rx_fir_config".into())?.rx_fir =
            Some(config.clone());
        Ok(())
    }

    fn set_tx_fir_config(&mut self, config: &FirConfig) -> PhyResult<()> {
        self.call("set_tx_fir_config", "phy set_tx_fir_config".into())?.tx_fir =
            Some(config.clone());
        Ok(())
    }

    fn set_rx_fir_en_dis(&mut self, enable: bool) -> PhyResult<()> {
        self.call("set_rx_fir_en_dis", format!("phy set_rx_fir_en_dis {enable}"))?
            .rx_fir_enabled = enable;
        Ok(())
    }

    fn bist_loopback(&mut self, mode: i32) -> PhyResult<()> {
        self.call("bist_loopback", format!("phy bist_loopback {mode}"))?.bist = mode;
        Ok(())
    }

    fn get_bist_loopback(&mut self) -> PhyResult<i32> {
        Ok(self.call("get_bist_loopback", "phy get_bist_loopback".into())?.bist)
    }

    fn spi_read(&mut self, reg: u16) -> PhyResult<u8> {
        let state = self.call("spi_read", format!("phy spi_read {reg:#05x}"))?;
        Ok(state.regs.get(&reg).copied().unwrap_or(0))
    }

    fn spi_write(&mut self, reg: u16, value: u8) -> PhyResult<()> {
        self.call("spi_write", format!("phy spi_write {reg:#05x} {value:#04x}"))?
            .regs
            .insert(reg, value);
        Ok(())
    }

    fn deinit(&mut self) {
        record(&self.calls, "phy deinit".into());
        self.state.lock().unwrap().deinitialized = true;
    }
}

pub struct MockPhyFactory {
    calls: CallLog,
    state: Arc<Mutex<PhyState>>,
}

impl PhyFactory for MockPhyFactory {
    fn init(&mut self, params: &Ad9361InitParams) -> PhyResult<Box<dyn Ad9361Phy>> {
        record(&self.calls, "phy init".into());
        {
            let mut state = self.state.lock().unwrap();
            if let Some(("init", code)) = state.fail {
                return Err(code);
            }
            state.initialized = true;
            state.rx_lo = params.rx_synthesizer_frequency_hz;
            state.tx_lo = params.tx_synthesizer_frequency_hz;
            state.rx_port = params.rx_rf_port_input_select;
            state.tx_port = params.tx_rf_port_output_select;
            state.gc_mode = [params.gc_rx1_mode as u8, params.gc_rx2_mode as u8];
            state.tx_attenuation = [params.tx_attenuation_mdb; 2];
            state.rx_bandwidth = params.rf_rx_bandwidth_hz;
            state.tx_bandwidth = params.rf_tx_bandwidth_hz;
            state.rx_sampling_freq = params.rx_path_clock_frequencies[5];
            state.tx_sampling_freq = params.tx_path_clock_frequencies[5];
        }
        Ok(Box::new(MockPhy {
            calls: self.calls.clone(),
            state: self.state.clone(),
        }))
    }
}

pub struct MockSync {
    calls: CallLog,
    direction: Direction,
}

impl SyncStream for MockSync {
    fn tx(&mut self, samples: &[u8], _meta: Option<&mut Metadata>, timeout: Duration) -> Result<()> {
        record(
            &self.calls,
            format!("sync_tx {} {}ms", samples.len(), timeout.as_millis()),
        );
        Ok(())
    }

    fn rx(
        &mut self,
        samples: &mut [u8],
        meta: Option<&mut Metadata>,
        timeout: Duration,
    ) -> Result<()> {
        record(
            &self.calls,
            format!("sync_rx {} {}ms", samples.len(), timeout.as_millis()),
        );
        samples.fill(0x5a);
        if let Some(meta) = meta {
            meta.actual_count = (samples.len() / 4) as u32;
        }
        Ok(())
    }

    fn deinit(&mut self) {
        record(&self.calls, format!("sync_deinit {}", self.direction));
    }
}

pub struct MockStreamEngine {
    calls: CallLog,
    next_handle: u32,
    callbacks: HashMap<StreamHandle, StreamCallback>,
}

impl StreamEngine for MockStreamEngine {
    fn init_stream(&mut self, config: &StreamConfig, callback: StreamCallback) -> Result<StreamHandle> {
        record(
            &self.calls,
            format!(
                "init_stream {:?} {} {} {} {}",
                config.format,
                config.num_buffers,
                config.samples_per_buffer,
                config.num_transfers,
                config.msg_size
            ),
        );
        let handle = StreamHandle(self.next_handle);
        self.next_handle += 1;
        self.callbacks.insert(handle, callback);
        Ok(handle)
    }

    /// Feeds buffers through the callback until it stops the stream.
    fn run_stream(&mut self, stream: StreamHandle, layout: ChannelLayout) -> Result<()> {
        record(&self.calls, format!("run_stream {} {layout:?}", stream.0));
        let callback = self.callbacks.get_mut(&stream).ok_or(Error::Invalid)?;

        let mut buffer = vec![0u8; 16];
        let mut meta = Metadata::default();
        while let Some(next) = callback(&meta, buffer) {
            meta.timestamp += 4;
            buffer = next;
        }
        Ok(())
    }

    fn submit_stream_buffer(
        &mut self,
        stream: StreamHandle,
        buffer: Vec<u8>,
        _timeout: Duration,
        nonblock: bool,
    ) -> Result<()> {
        record(
            &self.calls,
            format!("submit_stream_buffer {} {} {nonblock}", stream.0, buffer.len()),
        );
        Ok(())
    }

    fn deinit_stream(&mut self, stream: StreamHandle) {
        record(&self.calls, format!("deinit_stream {}", stream.0));
        self.callbacks.remove(&stream);
    }

    fn sync_init(&mut self, config: &SyncConfig) -> Result<Box<dyn SyncStream>> {
        record(
            &self.calls,
            format!(
                "sync_init {:?} {:?} {} {}",
                config.layout, config.format, config.buffer_size, config.msg_size
            ),
        );
        Ok(Box::new(MockSync {
            calls: self.calls.clone(),
            direction: config.layout.direction(),
        }))
    }
}

pub struct MockFlash {
    calls: CallLog,
}

impl FlashOps for MockFlash {
    fn erase(&mut self, erase_block: u32, count: u32) -> Result<()> {
        record(&self.calls, format!("flash_erase {erase_block} {count}"));
        Ok(())
    }

    fn read(&mut self, page: u32, count: u32) -> Result<Vec<u8>> {
        record(&self.calls, format!("flash_read {page} {count}"));
        Ok(vec![0xff; (count * 256) as usize])
    }

    fn write(&mut self, page: u32, data: &[u8]) -> Result<()> {
        record(&self.calls, format!("flash_write {page} {}", data.len()));
        Ok(())
    }

    fn write_fx3_fw(&mut self, image: &[u8]) -> Result<()> {
        record(&self.calls, format!("write_fx3_fw {}", image.len()));
        Ok(())
    }

    fn write_fpga_bitstream(&mut self, image: &[u8]) -> Result<()> {
        record(&self.calls, format!("write_fpga_bitstream {}", image.len()));
        Ok(())
    }

    fn erase_fpga(&mut self) -> Result<()> {
        record(&self.calls, "erase_fpga".into());
        Ok(())
    }
}

pub struct MockTrigger {
    calls: CallLog,
    registers: HashMap<u8, u8>,
}

impl TriggerOps for MockTrigger {
    fn init(&mut self, channel: u8, signal: TriggerSignal) -> Result<Trigger> {
        record(&self.calls, format!("trigger_init {channel} {signal:?}"));
        Ok(Trigger {
            channel,
            role: TriggerRole::Disabled,
            signal,
            options: 0,
        })
    }

    fn arm(&mut self, trigger: &Trigger, arm: bool) -> Result<()> {
        record(&self.calls, format!("trigger_arm {} {arm}", trigger.channel));
        Ok(())
    }

    fn fire(&mut self, trigger: &Trigger) -> Result<()> {
        record(&self.calls, format!("trigger_fire {}", trigger.channel));
        Ok(())
    }

    fn state(&mut self, trigger: &Trigger) -> Result<TriggerState> {
        record(&self.calls, format!("trigger_state {}", trigger.channel));
        Ok(TriggerState::default())
    }

    fn read(&mut self, channel: u8, signal: TriggerSignal) -> Result<u8> {
        record(&self.calls, format!("trigger_read {channel} {signal:?}"));
        Ok(self.registers.get(&channel).copied().unwrap_or(0))
    }

    fn write(&mut self, channel: u8, signal: TriggerSignal, value: u8) -> Result<()> {
        record(
            &self.calls,
            format!("trigger_write {channel} {signal:?} {value:#04x}"),
        );
        self.registers.insert(channel, value);
        Ok(())
    }
}

/// Handles onto the shared state behind a set of mock collaborators.
#[derive(Clone, Default)]
pub struct Mocks {
    pub calls: CallLog,
    pub backend: Arc<Mutex<BackendState>>,
    pub phy: Arc<Mutex<PhyState>>,
}

impl Mocks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn parts(&self) -> BoardParts {
        BoardParts {
            backend: Box::new(MockBackend {
                calls: self.calls.clone(),
                state: self.backend.clone(),
            }),
            phy_factory: Box::new(MockPhyFactory {
                calls: self.calls.clone(),
                state: self.phy.clone(),
            }),
            streaming: Box::new(MockStreamEngine {
                calls: self.calls.clone(),
                next_handle: 1,
                callbacks: HashMap::new(),
            }),
            flash: Box::new(MockFlash {
                calls: self.calls.clone(),
            }),
            trigger: Box::new(MockTrigger {
                calls: self.calls.clone(),
                registers: HashMap::new(),
            }),
            classifier: Box::new(VersionTable::default()),
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn clear_calls(&self) {
        self.calls.lock().unwrap().clear();
    }

    /// Index of the first logged call starting with `prefix`.
    pub fn position(&self, prefix: &str) -> Option<usize> {
        self.calls().iter().position(|call| call.starts_with(prefix))
    }

    pub fn rffe(&self) -> u32 {
        self.backend.lock().unwrap().rffe
    }
}

/// Defaults without environment overrides, searching nowhere for FPGA images.
pub fn test_config() -> Config {
    Config {
        fw_ready_retries: 5,
        fw_ready_interval: Duration::from_millis(1),
        fpga_search_paths: Vec::new(),
        ..Config::default()
    }
}

/// A fully initialized device on fresh mocks.
pub fn open_initialized() -> Result<(Device, Mocks)> {
    let mocks = Mocks::new();
    let device = Device::open(mocks.parts(), test_config())?;
    Ok((device, mocks))
}
