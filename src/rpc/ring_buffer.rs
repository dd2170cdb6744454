use crate::{
    rpc::{ack::Ack, error::RpcError},
    types::{Reliability, SequenceNumber},
    wire::{error::WireError, reader::WireReader, writer::WireWriter, Wire},
};

/// Runtime configuration for a ring buffer. Capacity comes from the schema
/// contract of the surrounding runtime, validated once at construction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RingBufferConfig {
    capacity: usize,
}

impl RingBufferConfig {
    pub fn new(capacity: usize) -> Result<Self, RpcError> {
        if capacity == 0 {
            return Err(RpcError::InvalidCapacity);
        }
        Ok(Self { capacity })
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

/// Fixed-capacity circular store of serialized call payloads for one
/// reliability class, one direction.
///
/// Slot `seq % capacity` holds the payload for `seq` iff
/// `seq > last_sent - capacity`. The paired [`Ack`] mirrors how far the peer
/// has consumed and gates reliable overflow.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RingBuffer {
    reliability: Reliability,
    slots: Vec<Option<Vec<u8>>>,
    last_sent: SequenceNumber,
    ack: Ack,
}

impl RingBuffer {
    pub fn new(config: RingBufferConfig, reliability: Reliability) -> Self {
        Self {
            reliability,
            slots: vec![None; config.capacity()],
            last_sent: 0,
            ack: Ack::new(),
        }
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn last_sent(&self) -> SequenceNumber {
        self.last_sent
    }

    pub fn acked(&self) -> SequenceNumber {
        self.ack.sequence()
    }

    /// Assigns the next sequence number to `payload` and stores it.
    ///
    /// On a reliable buffer, a backlog of unacknowledged payloads larger
    /// than the capacity is an [`RpcError::Overflow`]: the push is refused
    /// and the buffer is left untouched. On an unreliable buffer the oldest
    /// unread slot is silently overwritten instead.
    pub fn push(&mut self, payload: Vec<u8>) -> Result<SequenceNumber, RpcError> {
        let sequence = self.last_sent + 1;

        if self.reliability == Reliability::Reliable
            && sequence.saturating_sub(self.ack.sequence()) > self.capacity() as u64
        {
            return Err(RpcError::Overflow {
                sequence,
                acked: self.ack.sequence(),
                capacity: self.capacity(),
            });
        }

        let slot = (sequence % self.capacity() as u64) as usize;
        self.slots[slot] = Some(payload);
        self.last_sent = sequence;
        Ok(sequence)
    }

    /// Ordered view of every payload in `(acked, last_sent]` still present
    /// in the buffer. Does not mutate; calling again without acknowledging
    /// reproduces the same range. An ack mark beyond `last_sent` yields
    /// nothing (fail closed).
    pub fn read_unprocessed(&self) -> impl Iterator<Item = (SequenceNumber, &[u8])> + '_ {
        let capacity = self.capacity() as u64;
        // oldest sequence whose slot has not been overwritten
        let oldest_retained = self.last_sent.saturating_sub(capacity - 1);
        let start = (self.ack.sequence() + 1).max(oldest_retained);

        (start..=self.last_sent).filter_map(move |sequence| {
            self.slots[(sequence % capacity) as usize]
                .as_deref()
                .map(|payload| (sequence, payload))
        })
    }

    /// Marks everything up to `sequence` as consumed by the peer.
    /// Idempotent; regressive values are clamped.
    pub fn acknowledge(&mut self, sequence: SequenceNumber) {
        self.ack.acknowledge(sequence);
    }

    /// Serializes slots (in slot order), `last_sent`, and the paired ack.
    /// Capacity is fixed by configuration and never travels on the wire.
    pub fn write_to_wire(&self, writer: &mut WireWriter) {
        for slot in &self.slots {
            slot.ser(writer);
        }
        writer.write_u64(self.last_sent);
        self.ack.ser(writer);
    }

    /// Replaces this buffer's state with the wire representation. The
    /// reader must hold a buffer written with the same configured capacity.
    pub fn read_from_wire(&mut self, reader: &mut WireReader) -> Result<(), WireError> {
        let mut slots = Vec::with_capacity(self.capacity());
        for _ in 0..self.capacity() {
            slots.push(Option::<Vec<u8>>::de(reader)?);
        }
        let last_sent = reader.read_u64()?;
        let ack = Ack::de(reader)?;

        self.slots = slots;
        self.last_sent = last_sent;
        self.ack = ack;
        Ok(())
    }
}
