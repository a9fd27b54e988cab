//! NIOS II peripheral access over the RF link interface.
//!
//! Every FPGA peripheral access is one 16 byte request on the bulk OUT
//! endpoint answered by one 16 byte response on the bulk IN endpoint.
use crate::{Error, Result};
use bladerf_nios::packet::{NIOS_PKT_LEN, NiosPkt, NiosWord};
use futures_lite::future::block_on;
use nusb::Interface;
use nusb::transfer::RequestBuffer;

pub trait Nios {
    /// Send a raw request and return the raw response.
    fn nios_send(&self, endpoint_in: u8, endpoint_out: u8, pkt: Vec<u8>) -> Result<Vec<u8>>;

    /// Send `request` and check the response for the success flag.
    fn nios_access<A: NiosWord, D: NiosWord>(
        &self,
        endpoint_in: u8,
        endpoint_out: u8,
        request: NiosPkt<A, D>,
    ) -> Result<NiosPkt<A, D>> {
        let response: NiosPkt<A, D> = self
            .nios_send(endpoint_in, endpoint_out, request.into())?
            .into();

        if !response.is_valid() {
            log::error!("nios_access: malformed response {response}");
            return Err(Error::Unexpected);
        }
        if !response.is_success() {
            log::error!("nios_access: request failed: {response:?}");
            return Err(Error::Unexpected);
        }
        Ok(response)
    }

    fn nios_read<A: NiosWord, D: NiosWord>(
        &self,
        endpoint_in: u8,
        endpoint_out: u8,
        target_id: u8,
        addr: A,
    ) -> Result<D> {
        let request = NiosPkt::<A, D>::read(target_id, addr);
        let response = self.nios_access(endpoint_in, endpoint_out, request)?;
        Ok(response.data())
    }

    fn nios_write<A: NiosWord, D: NiosWord>(
        &self,
        endpoint_in: u8,
        endpoint_out: u8,
        target_id: u8,
        addr: A,
        data: D,
    ) -> Result<()> {
        self.nios_access(
            endpoint_in,
            endpoint_out,
            NiosPkt::<A, D>::write(target_id, addr, data),
        )?;
        Ok(())
    }
}

impl Nios for Interface {
    fn nios_send(&self, endpoint_in: u8, endpoint_out: u8, pkt: Vec<u8>) -> Result<Vec<u8>> {
        log::trace!("BulkOut: {pkt:02x?}");
        let sent = block_on(self.bulk_out(endpoint_out, pkt)).into_result()?;

        let request = RequestBuffer::reuse(sent.reuse(), NIOS_PKT_LEN);
        let response = block_on(self.bulk_in(endpoint_in, request)).into_result()?;
        log::trace!("BulkIn:  {response:02x?}");

        if response.len() != NIOS_PKT_LEN {
            return Err(Error::TransferTruncated {
                actual: response.len(),
                expected: NIOS_PKT_LEN,
            });
        }
        Ok(response)
    }
}
