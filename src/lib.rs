//! Board-control core for the bladeRF 2.0 micro, written in Rust.
//!
//! The board pairs an AD9361 RF transceiver with an ADF4002 reference PLL
//! behind a Cypress FX3 USB controller and a Cyclone V FPGA. This crate walks
//! the board through its bring-up states (firmware, FPGA, RFIC init) and then
//! exposes a two-channel transceiver: frequency, gain, sample rate, bandwidth,
//! RF port, IQ/DC corrections, loopback, RX mux and streaming control.
//!
//! ## Usage overview
//!
//! A [`Device`] is opened from a set of [`BoardParts`]: the transport
//! [`Backend`], a [`PhyFactory`] that constructs the AD9361 driver, the
//! streaming engine, SPI flash, trigger control and the version classifier.
//! With the `nusb` feature (default), [`usb::UsbBackend`] implements the
//! transport on top of [nusb].
//!
//! [nusb]: https://github.com/kevinmehall/nusb
//!
//! ```no_run
//! # use libbladerf2_rs::{Config, Device, BoardParts, Result};
//! # fn parts() -> BoardParts { unimplemented!() }
//! # fn main() -> Result<()> {
//! let device = Device::open(parts(), Config::from_env())?;
//! let mut board = device.lock()?;
//! board.set_frequency(libbladerf2_rs::BLADERF_CHANNEL_RX0, 915_000_000)?;
//! board.enable_module(libbladerf2_rs::BLADERF_CHANNEL_RX0, true)?;
//! # Ok(())
//! # }
//! ```
//!
//! Most board operations are methods on [`BladeRf2`] and expect the caller to
//! hold the device lock through [`Device::lock`]. The diagnostic register
//! accessors ([`Device::ad9361_read`], [`Device::adf4002_read`], ...) take the
//! lock themselves.
//!
//! ## Logging
//!
//! Everything logs through the [log] facade. Pick any logger implementation,
//! e.g. `env_logger`, and set `RUST_LOG=libbladerf2_rs=debug`.
//!
//! ## Datasheets
//!
//! [AD9361 Register Map Reference Manual](https://www.analog.com/media/en/technical-documentation/user-guides/ad9361_register_map_reference_manual_ug-671.pdf)
//!
//! [INA219 Datasheet](https://www.ti.com/lit/ds/symlink/ina219.pdf)
//!
//! [ADF4002 Datasheet](https://www.analog.com/media/en/technical-documentation/data-sheets/ADF4002.pdf)

pub mod backend;
pub mod bladerf;
pub mod board;
pub mod config;
pub mod device;
pub mod flash;
pub mod hardware;
#[cfg(feature = "nusb")]
pub mod nios;
pub mod streaming;
pub mod trigger;
#[cfg(feature = "nusb")]
pub mod usb;
pub mod version;

pub use backend::{Backend, FpgaProtocol};
pub use board::bladerf2::*;
pub use config::Config;
pub use device::{BoardParts, Device};
pub use hardware::ad9361::{Ad9361InitParams, Ad9361Phy, PhyFactory};
pub use version::{Compatibility, Version, VersionClassifier};

pub use bladerf_globals::*;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// Invalid argument provided.
    #[error("{0}")]
    Argument(&'static str),
    /// Invalid value provided
    #[error("invalid")]
    Invalid,
    /// Board state insufficient for the operation.
    #[error("board state insufficient for operation (current \"{actual}\", requires \"{required}\")")]
    NotInit {
        /// The state required for this operation.
        required: &'static str,
        /// The actual state of the board.
        actual: &'static str,
    },
    /// Value outside of the advertised range.
    #[error("value out of range")]
    Range,
    /// Operation not supported for this channel, mode or direction.
    #[error("operation not supported")]
    Unsupported,
    /// I/O error occurred.
    #[error("io")]
    Io(#[from] std::io::Error),
    #[error("operation would block")]
    WouldBlock,
    #[error("operation timed out")]
    Timeout,
    #[error("memory allocation failed")]
    Mem,
    #[error("no device")]
    NoDev,
    /// An internal invariant was violated, e.g. the hardware returned a value
    /// that is in none of the driver's tables.
    #[error("unexpected error")]
    Unexpected,
    /// Firmware is too old for this driver or for the loaded FPGA image.
    #[error("firmware update required (detected {detected}, requires {required})")]
    UpdateFw {
        detected: version::Version,
        required: version::Version,
    },
    /// The loaded FPGA image is too old for the firmware.
    #[error("FPGA update required (detected {detected}, requires {required})")]
    UpdateFpga {
        detected: version::Version,
        required: version::Version,
    },
    /// Device not found
    #[error("not found")]
    NotFound,
    /// USB transfer error.
    #[cfg(feature = "nusb")]
    #[error("transfer")]
    Transfer(#[from] nusb::transfer::TransferError),
    /// Transfer truncated.
    #[error("transfer truncated")]
    TransferTruncated {
        /// Actual amount of bytes transferred.
        actual: usize,
        /// Expected number of bytes transferred.
        expected: usize,
    },
}

const EIO: i32 = 5;
const EAGAIN: i32 = 11;
const ENOMEM: i32 = 12;
const EFAULT: i32 = 14;
const ENODEV: i32 = 19;
const EINVAL: i32 = 22;
const ETIMEDOUT: i32 = 110;

impl Error {
    /// Translate a POSIX style status code reported by the RFIC driver.
    /// Both `-EIO` and `EIO` are accepted. Unmapped codes become [`Error::Unexpected`].
    pub fn from_errno(code: i32) -> Self {
        match code.abs() {
            EIO => Error::Io(std::io::Error::from_raw_os_error(EIO)),
            EAGAIN => Error::WouldBlock,
            ENOMEM => Error::Mem,
            EFAULT => Error::Unexpected,
            ENODEV => Error::NoDev,
            EINVAL => Error::Invalid,
            ETIMEDOUT => Error::Timeout,
            _ => Error::Unexpected,
        }
    }
}

/// Result type for operations that may return an `Error`.
pub type Result<T> = std::result::Result<T, Error>;
