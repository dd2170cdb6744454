use crate::{
    types::SequenceNumber,
    wire::{error::WireError, reader::WireReader, writer::WireWriter, Wire},
};

/// The last sequence number the remote side has consumed, for one
/// reliability class. Serializes as a single integer field.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Ack {
    acked: SequenceNumber,
}

impl Ack {
    pub fn new() -> Self {
        Self { acked: 0 }
    }

    pub fn sequence(&self) -> SequenceNumber {
        self.acked
    }

    /// Advances the ack mark. Monotonic clamp: regressive or duplicate
    /// values are ignored, never an error.
    pub fn acknowledge(&mut self, sequence: SequenceNumber) {
        if sequence > self.acked {
            self.acked = sequence;
        }
    }
}

impl Wire for Ack {
    fn ser(&self, writer: &mut WireWriter) {
        writer.write_u64(self.acked);
    }

    fn de(reader: &mut WireReader) -> Result<Self, WireError> {
        Ok(Self {
            acked: reader.read_u64()?,
        })
    }
}
