#![allow(dead_code)]

use byteorder::{LittleEndian, WriteBytesExt};
use std::io::Write;

pub const NAME_SIZE: usize = 256;

/// Builds STUFF archives in memory
#[derive(Default)]
pub struct Fixture {
    content: Vec<u8>,
    records: Vec<(Vec<u8>, u32, u32)>,
}

impl Fixture {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a payload and a record pointing at it
    pub fn file(mut self, name: &str, data: &[u8]) -> Self {
        let offset = self.content.len() as u32;
        self.content.extend_from_slice(data);
        self.records
            .push((name.as_bytes().to_vec(), offset, data.len() as u32));
        self
    }

    /// Append a record without any payload
    pub fn record(mut self, name: &[u8], offset: u32, length: u32) -> Self {
        self.records.push((name.to_vec(), offset, length));
        self
    }

    pub fn build(&self) -> Vec<u8> {
        self.build_with_trailer(self.content.len() as u32)
    }

    pub fn build_with_trailer(&self, content_length: u32) -> Vec<u8> {
        let mut out = self.content.clone();
        for (name, offset, length) in &self.records {
            let mut field = name.clone();
            field.resize(NAME_SIZE, 0);
            out.write_all(&field).unwrap();
            out.write_u32::<LittleEndian>(*offset).unwrap();
            out.write_u32::<LittleEndian>(*length).unwrap();
            out.write_u32::<LittleEndian>(0).unwrap();
        }
        out.write_u32::<LittleEndian>(content_length).unwrap();
        out
    }
}
