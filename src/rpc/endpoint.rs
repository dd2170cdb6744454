use crate::{
    rpc::{
        error::RpcError,
        ring_buffer::{RingBuffer, RingBufferConfig},
    },
    types::{Reliability, SequenceNumber},
    wire::{error::WireError, reader::WireReader, writer::WireWriter},
};

/// One side of an entity's RPC channel: a reliable and an unreliable ring
/// buffer for outbound calls, each carrying the peer's ack mark for inbound
/// flow control.
///
/// Read and write endpoints are distinct instances; the type itself only
/// composes and synchronizes its buffers, nothing more. Wire order is fixed:
/// reliable buffer first, then unreliable, each followed by its paired ack.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Endpoint {
    reliable: RingBuffer,
    unreliable: RingBuffer,
}

impl Endpoint {
    pub fn new(reliable_config: RingBufferConfig, unreliable_config: RingBufferConfig) -> Self {
        Self {
            reliable: RingBuffer::new(reliable_config, Reliability::Reliable),
            unreliable: RingBuffer::new(unreliable_config, Reliability::Unreliable),
        }
    }

    fn buffer(&self, reliability: Reliability) -> &RingBuffer {
        match reliability {
            Reliability::Reliable => &self.reliable,
            Reliability::Unreliable => &self.unreliable,
        }
    }

    fn buffer_mut(&mut self, reliability: Reliability) -> &mut RingBuffer {
        match reliability {
            Reliability::Reliable => &mut self.reliable,
            Reliability::Unreliable => &mut self.unreliable,
        }
    }

    pub fn push(
        &mut self,
        payload: Vec<u8>,
        reliability: Reliability,
    ) -> Result<SequenceNumber, RpcError> {
        self.buffer_mut(reliability).push(payload)
    }

    pub fn read_unprocessed(
        &self,
        reliability: Reliability,
    ) -> impl Iterator<Item = (SequenceNumber, &[u8])> + '_ {
        self.buffer(reliability).read_unprocessed()
    }

    pub fn acknowledge(&mut self, reliability: Reliability, sequence: SequenceNumber) {
        self.buffer_mut(reliability).acknowledge(sequence);
    }

    pub fn reliable(&self) -> &RingBuffer {
        &self.reliable
    }

    pub fn unreliable(&self) -> &RingBuffer {
        &self.unreliable
    }

    pub fn write_to_wire(&self, writer: &mut WireWriter) {
        self.reliable.write_to_wire(writer);
        self.unreliable.write_to_wire(writer);
    }

    pub fn read_from_wire(&mut self, reader: &mut WireReader) -> Result<(), WireError> {
        self.reliable.read_from_wire(reader)?;
        self.unreliable.read_from_wire(reader)?;
        Ok(())
    }
}
