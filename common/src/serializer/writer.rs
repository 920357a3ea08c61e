use crate::crypto::Hash;

use super::{Serializer, MAX_LENGTH_PREFIX};

// Bytes of `value` that fit behind a length prefix, cut on a char boundary
pub(super) fn string_prefix_len(value: &str) -> usize {
    let mut len = value.len().min(MAX_LENGTH_PREFIX);
    while !value.is_char_boundary(len) {
        len -= 1;
    }
    len
}

#[derive(Default)]
pub struct Writer {
    bytes: Vec<u8>,
}

impl Writer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn write_bytes(&mut self, bytes: &[u8]) {
        self.bytes.extend_from_slice(bytes);
    }

    pub fn write_bool(&mut self, value: bool) {
        self.bytes.push(value as u8);
    }

    pub fn write_u8(&mut self, value: u8) {
        self.bytes.push(value);
    }

    pub fn write_u16(&mut self, value: u16) {
        self.write_bytes(&value.to_be_bytes());
    }

    pub fn write_u32(&mut self, value: u32) {
        self.write_bytes(&value.to_be_bytes());
    }

    pub fn write_u64(&mut self, value: u64) {
        self.write_bytes(&value.to_be_bytes());
    }

    pub fn write_i64(&mut self, value: i64) {
        self.write_bytes(&value.to_be_bytes());
    }

    pub fn write_hash(&mut self, hash: &Hash) {
        self.write_bytes(hash.as_bytes());
    }

    pub fn write_string(&mut self, value: &str) {
        let len = string_prefix_len(value);
        self.write_u16(len as u16);
        self.write_bytes(&value.as_bytes()[..len]);
    }

    pub fn write<T: Serializer + ?Sized>(&mut self, value: &T) {
        value.write(self);
    }

    pub fn total_write(&self) -> usize {
        self.bytes.len()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn bytes(self) -> Vec<u8> {
        self.bytes
    }
}
