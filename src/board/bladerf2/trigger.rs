use crate::board::bladerf2::{BladeRf2, BoardState, CheckStatus};
use crate::trigger::{Trigger, TriggerSignal, TriggerState};
use crate::Result;

impl BladeRf2 {
    pub fn trigger_init(&mut self, channel: u8, signal: TriggerSignal) -> Result<Trigger> {
        self.check_state(BoardState::Initialized)?;
        self.trigger
            .init(channel, signal)
            .check("trigger_init", "fpga_trigger_init")
    }

    pub fn trigger_arm(&mut self, trigger: &Trigger, arm: bool) -> Result<()> {
        self.check_state(BoardState::Initialized)?;
        self.trigger
            .arm(trigger, arm)
            .check("trigger_arm", "fpga_trigger_arm")
    }

    pub fn trigger_fire(&mut self, trigger: &Trigger) -> Result<()> {
        self.check_state(BoardState::Initialized)?;
        self.trigger
            .fire(trigger)
            .check("trigger_fire", "fpga_trigger_fire")
    }

    pub fn trigger_state(&mut self, trigger: &Trigger) -> Result<TriggerState> {
        self.check_state(BoardState::Initialized)?;
        self.trigger
            .state(trigger)
            .check("trigger_state", "fpga_trigger_state")
    }

    pub fn read_trigger(&mut self, channel: u8, signal: TriggerSignal) -> Result<u8> {
        self.check_state(BoardState::FpgaLoaded)?;
        self.trigger
            .read(channel, signal)
            .check("read_trigger", "fpga_trigger_read")
    }

    pub fn write_trigger(&mut self, channel: u8, signal: TriggerSignal, value: u8) -> Result<()> {
        self.check_state(BoardState::FpgaLoaded)?;
        self.trigger
            .write(channel, signal, value)
            .check("write_trigger", "fpga_trigger_write")
    }
}
