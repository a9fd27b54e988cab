//! Host <-> FPGA (NIOS II) packets for accesses to blocks with X-bit
//! addresses and Y-bit data, where X and Y are a multiple of 8.
//!
//! ```text
//! +-------------+------------------------------------------------+
//! | Byte offset | Description                                    |
//! +-------------+------------------------------------------------+
//! |      0      | Magic value                                    |
//! |      1      | Target ID                                      |
//! |      2      | Flags: bit 0 write, bit 1 success (response)   |
//! |      3      | Reserved, 0x00                                 |
//! |      4      | X-bit address, little endian                   |
//! |    4 + X/8  | Y-bit data, little endian                      |
//! |   .. 15     | Reserved, 0x00                                 |
//! +-------------+------------------------------------------------+
//! ```
//!
//! The response carries the same fields as the request. For reads the data
//! field holds the value read from the target.
use crate::NiosPktMagic;
use std::fmt::{Debug, Display, Formatter, LowerHex};
use std::marker::PhantomData;

pub const NIOS_PKT_LEN: usize = 16;

pub type NiosPkt8x8 = NiosPkt<u8, u8>;
pub type NiosPkt8x16 = NiosPkt<u8, u16>;
pub type NiosPkt8x32 = NiosPkt<u8, u32>;
pub type NiosPkt8x64 = NiosPkt<u8, u64>;
pub type NiosPkt16x64 = NiosPkt<u16, u64>;
pub type NiosPkt32x32 = NiosPkt<u32, u32>;

/// Unsigned integer that can occupy an address or data field.
pub trait NiosWord: Copy + Default + Debug + LowerHex {
    const SIZE: usize;
    fn put_le(self, out: &mut [u8]);
    fn get_le(bytes: &[u8]) -> Self;
}

macro_rules! nios_word {
    ($($t:ty),*) => {
        $(
            impl NiosWord for $t {
                const SIZE: usize = size_of::<$t>();

                fn put_le(self, out: &mut [u8]) {
                    out[..Self::SIZE].copy_from_slice(&self.to_le_bytes());
                }

                fn get_le(bytes: &[u8]) -> Self {
                    let mut raw = [0u8; size_of::<$t>()];
                    raw.copy_from_slice(&bytes[..Self::SIZE]);
                    <$t>::from_le_bytes(raw)
                }
            }
        )*
    };
}

nios_word!(u8, u16, u32, u64);

pub struct NiosPkt<A: NiosWord, D: NiosWord> {
    buf: Vec<u8>,
    phantom: PhantomData<(A, D)>,
}

impl<A: NiosWord, D: NiosWord> NiosPkt<A, D> {
    pub const IDX_MAGIC: usize = 0;
    pub const IDX_TARGET_ID: usize = 1;
    pub const IDX_FLAGS: usize = 2;
    pub const IDX_RESERVED: usize = 3;
    pub const IDX_ADDR: usize = 4;
    pub const IDX_DATA: usize = Self::IDX_ADDR + A::SIZE;

    pub const FLAG_READ: u8 = 0;
    pub const FLAG_WRITE: u8 = 1;
    pub const FLAG_SUCCESS: u8 = 2;

    pub const MAGIC: u8 = match (A::SIZE, D::SIZE) {
        (1, 1) => NiosPktMagic::_8X8 as u8,
        (1, 2) => NiosPktMagic::_8X16 as u8,
        (1, 4) => NiosPktMagic::_8X32 as u8,
        (1, 8) => NiosPktMagic::_8X64 as u8,
        (2, 8) => NiosPktMagic::_16X64 as u8,
        (4, 4) => NiosPktMagic::_32X32 as u8,
        _ => panic!("no NIOS packet format for these address/data widths"),
    };

    pub fn new(target_id: u8, flags: u8, addr: A, data: D) -> Self {
        let mut pkt: Self = vec![0u8; NIOS_PKT_LEN].into();
        pkt.set(target_id, flags, addr, data);
        pkt
    }

    pub fn read(target_id: u8, addr: A) -> Self {
        Self::new(target_id, Self::FLAG_READ, addr, D::default())
    }

    pub fn write(target_id: u8, addr: A, data: D) -> Self {
        Self::new(target_id, Self::FLAG_WRITE, addr, data)
    }

    /// Rewrite every field in place, clearing stale reserved bytes.
    pub fn set(&mut self, target_id: u8, flags: u8, addr: A, data: D) -> &mut Self {
        self.buf.resize(NIOS_PKT_LEN, 0);
        self.buf.fill(0);
        self.buf[Self::IDX_MAGIC] = Self::MAGIC;
        self.buf[Self::IDX_TARGET_ID] = target_id;
        self.buf[Self::IDX_FLAGS] = flags;
        addr.put_le(&mut self.buf[Self::IDX_ADDR..]);
        data.put_le(&mut self.buf[Self::IDX_DATA..]);
        self
    }

    pub fn buf_ptr(&self) -> *const u8 {
        self.buf.as_ptr()
    }

    pub fn magic(&self) -> u8 {
        self.buf[Self::IDX_MAGIC]
    }

    pub fn target_id(&self) -> u8 {
        self.buf[Self::IDX_TARGET_ID]
    }

    pub fn flags(&self) -> u8 {
        self.buf[Self::IDX_FLAGS]
    }

    pub fn addr(&self) -> A {
        A::get_le(&self.buf[Self::IDX_ADDR..])
    }

    pub fn data(&self) -> D {
        D::get_le(&self.buf[Self::IDX_DATA..])
    }

    pub fn is_write(&self) -> bool {
        self.flags() & Self::FLAG_WRITE != 0
    }

    pub fn is_success(&self) -> bool {
        self.flags() & Self::FLAG_SUCCESS != 0
    }

    /// True if the buffer has the right length and magic for this format.
    pub fn is_valid(&self) -> bool {
        self.buf.len() == NIOS_PKT_LEN && self.magic() == Self::MAGIC
    }
}

impl<A: NiosWord, D: NiosWord> From<Vec<u8>> for NiosPkt<A, D> {
    fn from(mut buf: Vec<u8>) -> Self {
        if buf.len() < NIOS_PKT_LEN {
            log::warn!("short NIOS packet ({} bytes), padding with zeros", buf.len());
            buf.resize(NIOS_PKT_LEN, 0);
        }
        Self {
            buf,
            phantom: PhantomData,
        }
    }
}

impl<A: NiosWord, D: NiosWord> From<NiosPkt<A, D>> for Vec<u8> {
    fn from(pkt: NiosPkt<A, D>) -> Self {
        pkt.buf
    }
}

impl<A: NiosWord, D: NiosWord> Debug for NiosPkt<A, D> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let flags = match self.flags() & 0x3 {
            0x0 => "READ FAILURE",
            0x1 => "WRITE FAILURE",
            0x2 => "READ SUCCESS",
            _ => "WRITE SUCCESS",
        };
        f.debug_struct("NiosPkt")
            .field("magic", &format_args!("{:#x}", self.magic()))
            .field("target", &format_args!("{:#x}", self.target_id()))
            .field("flags", &flags)
            .field("addr", &format_args!("{:#x}", self.addr()))
            .field("data", &format_args!("{:#x}", self.data()))
            .finish()
    }
}

impl<A: NiosWord, D: NiosWord> Display for NiosPkt<A, D> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str("[")?;
        for elem in self.buf.iter() {
            write!(f, "{elem:02x} ")?;
        }
        f.write_str("]")
    }
}
