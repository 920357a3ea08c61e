use thiserror::Error;

use crate::crypto::{Hash, HASH_SIZE};

use super::Serializer;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ReaderError {
    #[error("Invalid size")]
    InvalidSize,
    #[error("Invalid value")]
    InvalidValue,
    #[error("Invalid hex")]
    InvalidHex,
    #[error("Error, read {read} bytes but only {available} available")]
    OutOfBounds { read: usize, available: usize },
    #[error("Invalid utf-8 string")]
    InvalidUtf8,
    #[error("Unknown discriminator {0}")]
    UnknownDiscriminator(String),
}

// Reader over a borrowed buffer, every read consumes from the front
pub struct Reader<'a> {
    bytes: &'a [u8],
    total: usize,
}

impl<'a> Reader<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, total: 0 }
    }

    pub fn read<T: Serializer>(&mut self) -> Result<T, ReaderError> {
        T::read(self)
    }

    pub fn read_bytes_ref(&mut self, n: usize) -> Result<&'a [u8], ReaderError> {
        if n > self.size() {
            return Err(ReaderError::OutOfBounds {
                read: n,
                available: self.size(),
            });
        }

        let (head, tail) = self.bytes.split_at(n);
        self.bytes = tail;
        self.total += n;
        Ok(head)
    }

    pub fn read_bytes<const N: usize>(&mut self) -> Result<[u8; N], ReaderError> {
        let bytes = self.read_bytes_ref(N)?;
        let mut array = [0u8; N];
        array.copy_from_slice(bytes);
        Ok(array)
    }

    pub fn read_bytes_32(&mut self) -> Result<[u8; 32], ReaderError> {
        self.read_bytes::<32>()
    }

    pub fn read_bool(&mut self) -> Result<bool, ReaderError> {
        match self.read_u8()? {
            0 => Ok(false),
            1 => Ok(true),
            _ => Err(ReaderError::InvalidValue),
        }
    }

    pub fn read_u8(&mut self) -> Result<u8, ReaderError> {
        Ok(self.read_bytes::<1>()?[0])
    }

    pub fn read_u16(&mut self) -> Result<u16, ReaderError> {
        Ok(u16::from_be_bytes(self.read_bytes::<2>()?))
    }

    pub fn read_u32(&mut self) -> Result<u32, ReaderError> {
        Ok(u32::from_be_bytes(self.read_bytes::<4>()?))
    }

    pub fn read_u64(&mut self) -> Result<u64, ReaderError> {
        Ok(u64::from_be_bytes(self.read_bytes::<8>()?))
    }

    pub fn read_i64(&mut self) -> Result<i64, ReaderError> {
        Ok(i64::from_be_bytes(self.read_bytes::<8>()?))
    }

    pub fn read_hash(&mut self) -> Result<Hash, ReaderError> {
        self.read_bytes::<HASH_SIZE>().map(Hash::new)
    }

    pub fn read_string(&mut self) -> Result<String, ReaderError> {
        let len = self.read_u16()? as usize;
        let bytes = self.read_bytes_ref(len)?;
        String::from_utf8(bytes.to_vec()).map_err(|_| ReaderError::InvalidUtf8)
    }

    // Bytes still available
    pub fn size(&self) -> usize {
        self.bytes.len()
    }

    pub fn total_read(&self) -> usize {
        self.total
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_out_of_bounds() {
        let mut reader = Reader::new(&[1, 2, 3]);
        assert_eq!(
            reader.read_u64(),
            Err(ReaderError::OutOfBounds {
                read: 8,
                available: 3
            })
        );
        // Nothing was consumed by the failed read
        assert_eq!(reader.read_u8(), Ok(1));
        assert_eq!(reader.total_read(), 1);
    }

    #[test]
    fn test_read_invalid_bool() {
        let mut reader = Reader::new(&[2]);
        assert_eq!(reader.read_bool(), Err(ReaderError::InvalidValue));
    }
}
