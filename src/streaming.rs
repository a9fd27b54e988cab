//! Interface to the sample streaming engine.
//!
//! Buffer management and transfer scheduling belong to the engine. The board
//! only creates, runs and tears down streams, and owns one synchronous
//! stream handle per direction.
use crate::Result;
use bladerf_globals::{BladerfFormat, ChannelLayout};
use std::time::Duration;

/* Metadata flags */
/// Mark the associated buffer as the start of a burst transmission.
pub const BLADERF_META_FLAG_TX_BURST_START: u32 = 1 << 0;
/// Mark the associated buffer as the end of a burst transmission.
pub const BLADERF_META_FLAG_TX_BURST_END: u32 = 1 << 1;
/// Use this flag in conjunction with `BLADERF_META_FLAG_TX_BURST_START` to
/// start transmitting as soon as possible instead of at `timestamp`.
pub const BLADERF_META_FLAG_TX_NOW: u32 = 1 << 2;
/// Flush the remainder of a partial buffer with zeros.
pub const BLADERF_META_FLAG_TX_UPDATE_TIMESTAMP: u32 = 1 << 3;
/// Read the first sample at the current timestamp.
pub const BLADERF_META_FLAG_RX_NOW: u32 = 1 << 31;

/* Metadata status */
/// A sample overrun has occurred.
pub const BLADERF_META_STATUS_OVERRUN: u32 = 1 << 0;
/// A sample underrun has occurred.
pub const BLADERF_META_STATUS_UNDERRUN: u32 = 1 << 1;

/// Sample metadata, used with the `*Meta` sample formats.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Metadata {
    /// Free-running FPGA counter that increments at the sample rate.
    pub timestamp: u64,
    pub flags: u32,
    pub status: u32,
    /// Number of samples actually received or transmitted.
    pub actual_count: u32,
}

/// Parameters of the synchronous interface for one direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyncConfig {
    pub layout: ChannelLayout,
    pub format: BladerfFormat,
    pub num_buffers: u32,
    /// Buffer size in samples. Must be a multiple of 1024.
    pub buffer_size: u32,
    /// Data message size of the USB link, set by the board.
    pub msg_size: usize,
    pub num_transfers: u32,
    pub stream_timeout: Duration,
}

/// Parameters of an asynchronous stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreamConfig {
    pub format: BladerfFormat,
    pub num_buffers: usize,
    pub samples_per_buffer: usize,
    pub num_transfers: usize,
    /// Data message size of the USB link, set by the board.
    pub msg_size: usize,
}

/// Called by the engine for every completed buffer. Returns the next buffer
/// to submit, or `None` to shut the stream down.
pub type StreamCallback = Box<dyn FnMut(&Metadata, Vec<u8>) -> Option<Vec<u8>> + Send>;

/// Opaque handle to an asynchronous stream owned by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StreamHandle(pub u32);

/// Synchronous sample interface of one direction.
pub trait SyncStream: Send {
    /// Transmit `samples` (raw bytes in the configured format).
    fn tx(&mut self, samples: &[u8], meta: Option<&mut Metadata>, timeout: Duration) -> Result<()>;
    /// Fill `samples` with received data.
    fn rx(
        &mut self,
        samples: &mut [u8],
        meta: Option<&mut Metadata>,
        timeout: Duration,
    ) -> Result<()>;
    /// Stop the worker and release all buffers.
    fn deinit(&mut self);
}

pub trait StreamEngine: Send {
    fn init_stream(
        &mut self,
        config: &StreamConfig,
        callback: StreamCallback,
    ) -> Result<StreamHandle>;
    /// Start the stream. The engine keeps invoking the callback until it
    /// returns `None`.
    fn run_stream(&mut self, stream: StreamHandle, layout: ChannelLayout) -> Result<()>;
    fn submit_stream_buffer(
        &mut self,
        stream: StreamHandle,
        buffer: Vec<u8>,
        timeout: Duration,
        nonblock: bool,
    ) -> Result<()>;
    fn deinit_stream(&mut self, stream: StreamHandle);

    fn sync_init(&mut self, config: &SyncConfig) -> Result<Box<dyn SyncStream>>;
}
