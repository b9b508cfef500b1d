// SPDX-License-Identifier: LGPL-3.0-or-later OR MPL-2.0
// This file is a part of `gpu-shader`.
//
// `gpu-shader` is free software: you can redistribute it and/or modify it under the
// terms of either:
//
// * GNU Lesser General Public License as published by the Free Software Foundation, either
//   version 3 of the License, or (at your option) any later version.
// * Mozilla Public License as published by the Mozilla Foundation, version 2.
//
// `gpu-shader` is distributed in the hope that it will be useful, but WITHOUT ANY
// WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS FOR A PARTICULAR
// PURPOSE. See the GNU Lesser General Public License or the Mozilla Public License for more
// details.
//
// You should have received a copy of the GNU Lesser General Public License and the Mozilla
// Public License along with `gpu-shader`. If not, see <https://www.gnu.org/licenses/>.

//! A cursor over the binary shader resource format.

use crate::error::{Error, Malformed, Result};

/// Reads little-endian fields out of a borrowed byte stream.
#[derive(Debug, Clone)]
pub(crate) struct ByteReader<'a> {
    data: &'a [u8],
    offset: usize,
}

impl<'a> ByteReader<'a> {
    pub(crate) fn new(data: &'a [u8]) -> Self {
        Self { data, offset: 0 }
    }

    /// The number of bytes read so far.
    #[cfg(test)]
    pub(crate) fn offset(&self) -> usize {
        self.offset
    }

    pub(crate) fn remaining(&self) -> usize {
        self.data.len() - self.offset
    }

    pub(crate) fn error(&self, reason: Malformed) -> Error {
        Error::MalformedResource {
            offset: self.offset,
            reason,
        }
    }

    pub(crate) fn bytes(&mut self, len: usize, what: &'static str) -> Result<&'a [u8]> {
        if len > self.remaining() {
            return Err(self.error(Malformed::Truncated {
                what,
                needed: len,
                remaining: self.remaining(),
            }));
        }

        let bytes = &self.data[self.offset..self.offset + len];
        self.offset += len;
        Ok(bytes)
    }

    fn array<const N: usize>(&mut self, what: &'static str) -> Result<[u8; N]> {
        let mut array = [0; N];
        array.copy_from_slice(self.bytes(N, what)?);
        Ok(array)
    }

    pub(crate) fn u8(&mut self, what: &'static str) -> Result<u8> {
        self.array::<1>(what).map(|[b]| b)
    }

    pub(crate) fn i16_le(&mut self, what: &'static str) -> Result<i16> {
        self.array(what).map(i16::from_le_bytes)
    }

    pub(crate) fn u32_le(&mut self, what: &'static str) -> Result<u32> {
        self.array(what).map(u32::from_le_bytes)
    }

    /// Read a string with a 7-bit variable length prefix.
    pub(crate) fn string(&mut self, what: &'static str) -> Result<&'a str> {
        let start = self.offset;
        let mut len = 0usize;

        // At most five groups of seven bits fit in a 32-bit length.
        for shift in (0..35).step_by(7) {
            let byte = self.u8(what)?;
            len |= usize::from(byte & 0x7f) << shift;

            if byte & 0x80 == 0 {
                let bytes = self.bytes(len, what)?;
                return std::str::from_utf8(bytes).map_err(|_| Error::MalformedResource {
                    offset: start,
                    reason: Malformed::InvalidUtf8,
                });
            }
        }

        Err(Error::MalformedResource {
            offset: start,
            reason: Malformed::BadLengthPrefix,
        })
    }
}

/// Decode bytecode as ASCII, replacing anything outside of it with `?`.
pub(crate) fn decode_ascii(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|&b| if b.is_ascii() { b as char } else { '?' })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_little_endian_fields() {
        let mut reader = ByteReader::new(&[0x07, 0xfe, 0xff, 0x04, 0x03, 0x02, 0x01]);

        assert_eq!(reader.u8("byte").unwrap(), 7);
        assert_eq!(reader.i16_le("short").unwrap(), -2);
        assert_eq!(reader.u32_le("int").unwrap(), 0x0102_0304);
        assert_eq!(reader.remaining(), 0);
    }

    #[test]
    fn short_string() {
        let mut reader = ByteReader::new(b"\x04aPos\xff");
        assert_eq!(reader.string("name").unwrap(), "aPos");
        assert_eq!(reader.offset(), 5);
    }

    #[test]
    fn multi_byte_length_prefix() {
        let name = "a".repeat(200);
        let mut data = vec![0xc8, 0x01];
        data.extend_from_slice(name.as_bytes());

        let mut reader = ByteReader::new(&data);
        assert_eq!(reader.string("name").unwrap(), name);
    }

    #[test]
    fn length_prefix_past_end() {
        let mut reader = ByteReader::new(b"\x09aPos");
        let err = reader.string("attribute name").unwrap_err();

        match err {
            Error::MalformedResource {
                offset: 1,
                reason:
                    Malformed::Truncated {
                        needed: 9,
                        remaining: 4,
                        ..
                    },
            } => {}
            err => panic!("unexpected error: {err:?}"),
        }
    }

    #[test]
    fn unterminated_length_prefix() {
        let mut reader = ByteReader::new(&[0xff; 8]);
        match reader.string("name").unwrap_err() {
            Error::MalformedResource {
                offset: 0,
                reason: Malformed::BadLengthPrefix,
            } => {}
            err => panic!("unexpected error: {err:?}"),
        }
    }

    #[test]
    fn invalid_utf8_name() {
        let mut reader = ByteReader::new(&[0x02, 0xc3, 0x28]);
        assert!(matches!(
            reader.string("name"),
            Err(Error::MalformedResource {
                reason: Malformed::InvalidUtf8,
                ..
            })
        ));
    }

    #[test]
    fn ascii_decoding_replaces_high_bytes() {
        assert_eq!(decode_ascii(b"void main(){}"), "void main(){}");
        assert_eq!(decode_ascii(&[b'a', 0xe9, b'b']), "a?b");
    }
}
