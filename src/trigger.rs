//! Interface to the FPGA trigger block, used to synchronize several boards.
use crate::Result;

/* Trigger control register bits */
pub const BLADERF_TRIGGER_REG_ARM: u8 = 1 << 0;
pub const BLADERF_TRIGGER_REG_FIRE: u8 = 1 << 1;
pub const BLADERF_TRIGGER_REG_MASTER: u8 = 1 << 2;
pub const BLADERF_TRIGGER_REG_LINE: u8 = 1 << 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerRole {
    Invalid,
    /// Trigger functionality is disabled
    Disabled,
    /// Trigger signal is output by this device
    Master,
    /// Trigger signal is an input to this device
    Slave,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerSignal {
    Invalid,
    /// J71 pin 4 (bladeRF 1)
    J71_4,
    /// J51 pin 1 (bladeRF 1 with XB-200)
    J51_1,
    /// Mini expansion connector pin 1 (bladeRF 2.0)
    MiniExp1,
    /// User defined FPGA signals
    User(u8),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Trigger {
    pub channel: u8,
    pub role: TriggerRole,
    pub signal: TriggerSignal,
    pub options: u64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TriggerState {
    pub is_armed: bool,
    pub has_fired: bool,
    pub fire_requested: bool,
}

pub trait TriggerOps: Send {
    /// A disabled trigger description for `channel` and `signal`.
    fn init(&mut self, channel: u8, signal: TriggerSignal) -> Result<Trigger>;
    fn arm(&mut self, trigger: &Trigger, arm: bool) -> Result<()>;
    fn fire(&mut self, trigger: &Trigger) -> Result<()>;
    fn state(&mut self, trigger: &Trigger) -> Result<TriggerState>;
    /// Raw trigger control register access.
    fn read(&mut self, channel: u8, signal: TriggerSignal) -> Result<u8>;
    fn write(&mut self, channel: u8, signal: TriggerSignal, value: u8) -> Result<()>;
}
