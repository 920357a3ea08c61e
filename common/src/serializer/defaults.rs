use super::{writer::string_prefix_len, Reader, ReaderError, Serializer, Writer, MAX_LENGTH_PREFIX};

macro_rules! impl_serializer_int {
    ($t:ty, $read:ident, $write:ident) => {
        impl Serializer for $t {
            fn write(&self, writer: &mut Writer) {
                writer.$write(*self);
            }

            fn read(reader: &mut Reader) -> Result<Self, ReaderError> {
                reader.$read()
            }

            fn size(&self) -> usize {
                std::mem::size_of::<$t>()
            }
        }
    };
}

impl_serializer_int!(u8, read_u8, write_u8);
impl_serializer_int!(u16, read_u16, write_u16);
impl_serializer_int!(u32, read_u32, write_u32);
impl_serializer_int!(u64, read_u64, write_u64);
impl_serializer_int!(i64, read_i64, write_i64);

impl Serializer for bool {
    fn write(&self, writer: &mut Writer) {
        writer.write_bool(*self);
    }

    fn read(reader: &mut Reader) -> Result<Self, ReaderError> {
        reader.read_bool()
    }

    fn size(&self) -> usize {
        1
    }
}

impl Serializer for String {
    fn write(&self, writer: &mut Writer) {
        writer.write_string(self);
    }

    fn read(reader: &mut Reader) -> Result<Self, ReaderError> {
        reader.read_string()
    }

    fn size(&self) -> usize {
        2 + string_prefix_len(self)
    }
}

impl<T: Serializer> Serializer for Option<T> {
    fn write(&self, writer: &mut Writer) {
        match self {
            Some(value) => {
                writer.write_bool(true);
                value.write(writer);
            }
            None => writer.write_bool(false),
        }
    }

    fn read(reader: &mut Reader) -> Result<Self, ReaderError> {
        if reader.read_bool()? {
            Ok(Some(T::read(reader)?))
        } else {
            Ok(None)
        }
    }

    fn size(&self) -> usize {
        1 + self.as_ref().map(Serializer::size).unwrap_or(0)
    }
}

impl<T: Serializer> Serializer for Vec<T> {
    fn write(&self, writer: &mut Writer) {
        // Elements past the prefix limit are not written
        let count = self.len().min(MAX_LENGTH_PREFIX);
        writer.write_u16(count as u16);
        for value in &self[..count] {
            value.write(writer);
        }
    }

    fn read(reader: &mut Reader) -> Result<Self, ReaderError> {
        let count = reader.read_u16()? as usize;
        // Every element takes at least one byte
        if count > reader.size() {
            return Err(ReaderError::InvalidSize);
        }

        let mut values = Vec::with_capacity(count);
        for _ in 0..count {
            values.push(T::read(reader)?);
        }
        Ok(values)
    }

    fn size(&self) -> usize {
        2 + self
            .iter()
            .take(MAX_LENGTH_PREFIX)
            .map(Serializer::size)
            .sum::<usize>()
    }
}
