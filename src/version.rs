use std::fmt::{Display, Formatter};

/// Firmware or FPGA version as reported by the device.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Version {
    pub major: u16,
    pub minor: u16,
    pub patch: u16,
}

impl Version {
    pub const fn new(major: u16, minor: u16, patch: u16) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }

    /// Decode the packed 32-bit FPGA version word (`patch << 16 | minor << 8 | major`).
    pub fn from_fpga_word(word: u32) -> Self {
        Self {
            major: (word & 0xff) as u16,
            minor: ((word >> 8) & 0xff) as u16,
            patch: ((word >> 16) & 0xffff) as u16,
        }
    }

    /// Parse a dotted `major.minor.patch` string, as found in the firmware
    /// string descriptor. Missing components read as zero.
    pub fn parse(s: &str) -> Option<Self> {
        let mut parts = s.trim().trim_start_matches('v').split('.');
        let major = parts.next()?.trim().parse().ok()?;
        let minor = parts.next().map_or(Some(0), |p| p.trim().parse().ok())?;
        let patch = parts
            .next()
            .map_or(Some(0), |p| {
                p.trim()
                    .split(|c: char| !c.is_ascii_digit())
                    .next()
                    .and_then(|d| d.parse().ok())
            })?;
        Some(Self::new(major, minor, patch))
    }
}

impl Display for Version {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

/// Outcome of a firmware/FPGA compatibility check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Compatibility {
    Compatible,
    /// The FPGA image needs to be at least `required` for this firmware.
    UpdateFpga { required: Version },
    /// The firmware needs to be at least `required`.
    UpdateFw { required: Version },
}

/// Capability and compatibility lookup keyed by firmware and FPGA versions.
pub trait VersionClassifier: Send {
    /// Capability bits derived from the firmware version.
    fn fw_capabilities(&self, fw: &Version) -> u64;
    /// Capability bits derived from the FPGA version.
    fn fpga_capabilities(&self, fpga: &Version) -> u64;
    /// Check the firmware alone against what the driver requires.
    fn check_fw(&self, fw: &Version) -> Compatibility;
    /// Check a firmware/FPGA pairing.
    fn check(&self, fw: &Version, fpga: &Version) -> Compatibility;
}

/* Capability bits */
pub const BLADERF_CAP_FW_LOOPBACK: u64 = 1 << 32;
pub const BLADERF_CAP_QUERY_DEVICE_READY: u64 = 1 << 33;
pub const BLADERF_CAP_READ_FW_LOG_ENTRY: u64 = 1 << 34;
pub const BLADERF_CAP_FW_SUPPORTS_BLADERF2: u64 = 1 << 35;
pub const BLADERF_CAP_FW_FLASH_ID: u64 = 1 << 36;
pub const BLADERF_CAP_FW_FPGA_SOURCE: u64 = 1 << 37;
pub const BLADERF_CAP_FW_SHORT_PACKET: u64 = 1 << 38;

pub const BLADERF_CAP_SCHEDULED_RETUNE: u64 = 1 << 4;
pub const BLADERF_CAP_TIMESTAMPS: u64 = 1 << 5;
pub const BLADERF_CAP_FPGA_TUNING: u64 = 1 << 6;
pub const BLADERF_CAP_TRX_SYNC_TRIG: u64 = 1 << 8;
pub const BLADERF_CAP_FPGA_PACKET_META: u64 = 1 << 10;

/// One entry per capability: the bits are granted from `since` onward.
#[derive(Debug, Clone, Copy)]
pub struct CapabilityEntry {
    pub since: Version,
    pub bits: u64,
}

/// A table-driven classifier: minimum versions plus per-version capability
/// grants.
#[derive(Debug, Clone)]
pub struct VersionTable {
    pub min_fw: Version,
    /// Minimum FPGA version for a given firmware: `(firmware, fpga)` pairs,
    /// sorted by firmware version.
    pub fpga_for_fw: Vec<(Version, Version)>,
    pub fw_caps: Vec<CapabilityEntry>,
    pub fpga_caps: Vec<CapabilityEntry>,
}

impl Default for VersionTable {
    fn default() -> Self {
        Self {
            min_fw: Version::new(2, 0, 0),
            fpga_for_fw: vec![
                (Version::new(2, 0, 0), Version::new(0, 6, 0)),
                (Version::new(2, 3, 0), Version::new(0, 10, 0)),
            ],
            fw_caps: vec![
                CapabilityEntry {
                    since: Version::new(1, 7, 1),
                    bits: BLADERF_CAP_FW_LOOPBACK,
                },
                CapabilityEntry {
                    since: Version::new(1, 8, 0),
                    bits: BLADERF_CAP_QUERY_DEVICE_READY,
                },
                CapabilityEntry {
                    since: Version::new(1, 9, 0),
                    bits: BLADERF_CAP_READ_FW_LOG_ENTRY,
                },
                CapabilityEntry {
                    since: Version::new(2, 0, 0),
                    bits: BLADERF_CAP_FW_SUPPORTS_BLADERF2,
                },
                CapabilityEntry {
                    since: Version::new(2, 3, 0),
                    bits: BLADERF_CAP_FW_FLASH_ID | BLADERF_CAP_FW_FPGA_SOURCE,
                },
                CapabilityEntry {
                    since: Version::new(2, 3, 1),
                    bits: BLADERF_CAP_FW_SHORT_PACKET,
                },
            ],
            fpga_caps: vec![
                CapabilityEntry {
                    since: Version::new(0, 0, 0),
                    bits: BLADERF_CAP_TIMESTAMPS,
                },
                CapabilityEntry {
                    since: Version::new(0, 2, 0),
                    bits: BLADERF_CAP_SCHEDULED_RETUNE | BLADERF_CAP_FPGA_TUNING,
                },
                CapabilityEntry {
                    since: Version::new(0, 6, 0),
                    bits: BLADERF_CAP_TRX_SYNC_TRIG,
                },
                CapabilityEntry {
                    since: Version::new(0, 10, 0),
                    bits: BLADERF_CAP_FPGA_PACKET_META,
                },
            ],
        }
    }
}

fn granted(table: &[CapabilityEntry], version: &Version) -> u64 {
    table
        .iter()
        .filter(|entry| *version >= entry.since)
        .fold(0, |acc, entry| acc | entry.bits)
}

impl VersionClassifier for VersionTable {
    fn fw_capabilities(&self, fw: &Version) -> u64 {
        granted(&self.fw_caps, fw)
    }

    fn fpga_capabilities(&self, fpga: &Version) -> u64 {
        granted(&self.fpga_caps, fpga)
    }

    fn check_fw(&self, fw: &Version) -> Compatibility {
        if *fw < self.min_fw {
            Compatibility::UpdateFw {
                required: self.min_fw,
            }
        } else {
            Compatibility::Compatible
        }
    }

    fn check(&self, fw: &Version, fpga: &Version) -> Compatibility {
        if let Compatibility::UpdateFw { required } = self.check_fw(fw) {
            return Compatibility::UpdateFw { required };
        }
        let required_fpga = self
            .fpga_for_fw
            .iter()
            .rev()
            .find(|(min_fw, _)| fw >= min_fw)
            .map(|(_, min_fpga)| *min_fpga);

        match required_fpga {
            Some(required) if *fpga < required => Compatibility::UpdateFpga { required },
            _ => Compatibility::Compatible,
        }
    }
}
