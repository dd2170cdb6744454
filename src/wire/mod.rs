pub mod error;
pub mod reader;
pub mod writer;

use error::WireError;
use reader::WireReader;
use writer::WireWriter;

/// A value with a fixed byte-level wire representation.
///
/// All integers are little-endian fixed-width; byte blobs are length-prefixed
/// with a `u32`. Round-tripping through `ser` then `de` must reproduce the
/// value bit-for-bit.
pub trait Wire: Sized {
    fn ser(&self, writer: &mut WireWriter);
    fn de(reader: &mut WireReader) -> Result<Self, WireError>;
}

impl Wire for bool {
    fn ser(&self, writer: &mut WireWriter) {
        writer.write_bool(*self);
    }

    fn de(reader: &mut WireReader) -> Result<Self, WireError> {
        reader.read_bool()
    }
}

impl Wire for u32 {
    fn ser(&self, writer: &mut WireWriter) {
        writer.write_u32(*self);
    }

    fn de(reader: &mut WireReader) -> Result<Self, WireError> {
        reader.read_u32()
    }
}

impl Wire for u64 {
    fn ser(&self, writer: &mut WireWriter) {
        writer.write_u64(*self);
    }

    fn de(reader: &mut WireReader) -> Result<Self, WireError> {
        reader.read_u64()
    }
}

impl Wire for Vec<u8> {
    fn ser(&self, writer: &mut WireWriter) {
        writer.write_bytes(self);
    }

    fn de(reader: &mut WireReader) -> Result<Self, WireError> {
        reader.read_bytes()
    }
}

impl<T: Wire> Wire for Option<T> {
    fn ser(&self, writer: &mut WireWriter) {
        match self {
            Some(value) => {
                writer.write_bool(true);
                value.ser(writer);
            }
            None => writer.write_bool(false),
        }
    }

    fn de(reader: &mut WireReader) -> Result<Self, WireError> {
        if reader.read_bool()? {
            Ok(Some(T::de(reader)?))
        } else {
            Ok(None)
        }
    }
}
