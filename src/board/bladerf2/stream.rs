use crate::board::bladerf2::{BladeRf2, BoardState, CheckStatus};
use crate::streaming::{Metadata, StreamCallback, StreamConfig, StreamHandle, SyncConfig};
use crate::{Error, Result};
use bladerf_globals::{BladerfFormat, ChannelLayout, Direction};
use std::time::Duration;

impl BladeRf2 {
    /// Create an asynchronous stream. `callback` runs for each completed
    /// buffer once the stream is started with [`BladeRf2::stream`].
    pub fn init_stream(
        &mut self,
        format: BladerfFormat,
        num_buffers: usize,
        samples_per_buffer: usize,
        num_transfers: usize,
        callback: StreamCallback,
    ) -> Result<StreamHandle> {
        self.check_state(BoardState::Initialized)?;

        let config = StreamConfig {
            format,
            num_buffers,
            samples_per_buffer,
            num_transfers,
            msg_size: self.board_data.msg_size,
        };
        log::debug!("init_stream: {config:?}");

        self.streaming
            .init_stream(&config, callback)
            .check("init_stream", "async_init_stream")
    }

    /// Run `stream` until its callback asks to stop.
    pub fn stream(&mut self, stream: StreamHandle, layout: ChannelLayout) -> Result<()> {
        self.streaming
            .run_stream(stream, layout)
            .check("stream", "async_run_stream")
    }

    pub fn submit_stream_buffer(
        &mut self,
        stream: StreamHandle,
        buffer: Vec<u8>,
        timeout: Duration,
        nonblock: bool,
    ) -> Result<()> {
        self.streaming
            .submit_stream_buffer(stream, buffer, timeout, nonblock)
            .check("submit_stream_buffer", "async_submit_stream_buffer")
    }

    pub fn deinit_stream(&mut self, stream: StreamHandle) {
        self.streaming.deinit_stream(stream);
    }

    pub fn set_stream_timeout(&mut self, _direction: Direction, _timeout: Duration) -> Result<()> {
        Err(Error::Unsupported)
    }

    pub fn get_stream_timeout(&self, _direction: Direction) -> Result<Duration> {
        Err(Error::Unsupported)
    }

    /// Set up the synchronous interface for the direction of `layout`,
    /// replacing any previous one.
    pub fn sync_config(
        &mut self,
        layout: ChannelLayout,
        format: BladerfFormat,
        num_buffers: u32,
        buffer_size: u32,
        num_transfers: u32,
        stream_timeout: Duration,
    ) -> Result<()> {
        const OP: &str = "sync_config";

        self.check_state(BoardState::Initialized)?;

        let direction = layout.direction();
        let config = SyncConfig {
            layout,
            format,
            num_buffers,
            buffer_size,
            msg_size: self.board_data.msg_size,
            num_transfers,
            stream_timeout,
        };

        if let Some(mut old) = self.board_data.sync[direction.index()].take() {
            log::debug!("{OP}: replacing {direction} synchronous interface");
            old.deinit();
        }

        let handle = self.streaming.sync_init(&config).check(OP, "sync_init")?;
        self.board_data.sync[direction.index()] = Some(handle);
        Ok(())
    }

    pub fn sync_tx(
        &mut self,
        samples: &[u8],
        meta: Option<&mut Metadata>,
        timeout: Duration,
    ) -> Result<()> {
        let Some(sync) = self.board_data.sync[Direction::Tx.index()].as_mut() else {
            log::error!("sync_tx: TX synchronous interface is not configured");
            return Err(Error::Invalid);
        };
        sync.tx(samples, meta, timeout).check("sync_tx", "sync_tx")
    }

    pub fn sync_rx(
        &mut self,
        samples: &mut [u8],
        meta: Option<&mut Metadata>,
        timeout: Duration,
    ) -> Result<()> {
        let Some(sync) = self.board_data.sync[Direction::Rx.index()].as_mut() else {
            log::error!("sync_rx: RX synchronous interface is not configured");
            return Err(Error::Invalid);
        };
        sync.rx(samples, meta, timeout).check("sync_rx", "sync_rx")
    }

    /// Current FPGA sample counter of `direction`.
    pub fn get_timestamp(&mut self, direction: Direction) -> Result<u64> {
        self.check_state(BoardState::Initialized)?;
        self.backend
            .get_timestamp(direction)
            .check("get_timestamp", "get_timestamp")
    }
}
