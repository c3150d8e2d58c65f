// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.


//! Low level protobuf wire format reading.

use bytes::{Buf, Bytes};

use crate::error::{Error, Result};

pub const WIRE_TYPE_VARINT: u8 = 0;
pub const WIRE_TYPE_64BIT: u8 = 1;
pub const WIRE_TYPE_LENGTH_DELIMITED: u8 = 2;
pub const WIRE_TYPE_START_GROUP: u8 = 3;
pub const WIRE_TYPE_END_GROUP: u8 = 4;
pub const WIRE_TYPE_32BIT: u8 = 5;

const MAX_GROUP_DEPTH: usize = 100;

pub struct ProtobufReader {
    data: Bytes,
}

impl ProtobufReader {
    pub fn new(data: Bytes) -> Self {
        Self { data }
    }

    pub fn remaining(&self) -> usize {
        self.data.remaining()
    }

    /// Read a base-128 varint from the buffer.
    ///
    /// Bits beyond the 64th carried by the tenth byte are discarded, a tenth
    /// byte that still has the continuation bit set is an overflow.
    #[inline(always)]
    pub fn read_varint(&mut self) -> Result<u64> {
        if !self.data.has_remaining() {
            return Err(Error::UnexpectedEndOfInput { context: "varint" });
        }
        // Most tags and lengths fit in a single byte.
        let b = self.data.get_u8();
        if b < 0x80 {
            return Ok(b as u64);
        }

        let mut x = (b & 0x7f) as u64;
        let mut shift = 7;
        loop {
            if shift >= 64 {
                return Err(Error::IntegerOverflow);
            }
            if !self.data.has_remaining() {
                return Err(Error::UnexpectedEndOfInput { context: "varint" });
            }
            let b = self.data.get_u8();
            x |= ((b & 0x7f) as u64) << shift;
            if b < 0x80 {
                return Ok(x);
            }
            shift += 7;
        }
    }

    /// Read a tag from the buffer.
    ///
    /// tag = (field_number << 3) | wire_type, the field number must be
    /// positive.
    #[inline(always)]
    pub fn read_tag(&mut self, context: &'static str) -> Result<(u32, u8)> {
        let tag = self.read_varint()?;
        let field_number = tag >> 3;
        let wire_type = (tag & 0x07) as u8;
        if field_number == 0 || field_number > i32::MAX as u64 {
            return Err(Error::MalformedTag { context, tag });
        }
        Ok((field_number as u32, wire_type))
    }

    /// Read the tag of the next field of a message, where an end-group marker
    /// can never appear.
    #[inline(always)]
    pub fn read_field_tag(&mut self, context: &'static str) -> Result<(u32, u8)> {
        let (field_number, wire_type) = self.read_tag(context)?;
        if wire_type == WIRE_TYPE_END_GROUP {
            return Err(Error::MalformedTag {
                context,
                tag: make_tag(field_number, wire_type),
            });
        }
        Ok((field_number, wire_type))
    }

    /// Read the length prefix of a length-delimited value, checking that the
    /// value fits in the rest of the buffer.
    #[inline(always)]
    pub fn read_length(&mut self, context: &'static str) -> Result<usize> {
        let len = self.read_varint()?;
        if len > isize::MAX as u64 {
            return Err(Error::InvalidLength { context, len });
        }
        let len = len as usize;
        if self.data.remaining() < len {
            return Err(Error::UnexpectedEndOfInput { context });
        }
        Ok(len)
    }

    /// Read a length-delimited value and return its bytes without copying.
    ///
    /// No UTF-8 validation is applied, that is left to the caller.
    #[inline(always)]
    pub fn read_bytes(&mut self, context: &'static str) -> Result<Bytes> {
        let len = self.read_length(context)?;
        Ok(self.data.split_to(len))
    }

    /// Consume the value of a field whose tag has just been read, without
    /// interpreting it. Returns the number of bytes consumed.
    pub fn skip_field(&mut self, field_number: u32, wire_type: u8) -> Result<usize> {
        self.skip_field_with_depth(field_number, wire_type, 0)
    }

    fn skip_field_with_depth(
        &mut self,
        field_number: u32,
        wire_type: u8,
        depth: usize,
    ) -> Result<usize> {
        let start_remaining = self.data.remaining();
        match wire_type {
            WIRE_TYPE_VARINT => {
                self.read_varint()?;
            }
            WIRE_TYPE_64BIT => self.advance(8, "fixed64")?,
            WIRE_TYPE_LENGTH_DELIMITED => {
                let len = self.read_length("skipped field")?;
                self.data.advance(len);
            }
            WIRE_TYPE_START_GROUP => {
                if depth >= MAX_GROUP_DEPTH {
                    return Err(Error::MalformedTag {
                        context: "group nested too deep",
                        tag: make_tag(field_number, wire_type),
                    });
                }
                loop {
                    let (nested_field, nested_wire_type) = self.read_tag("group")?;
                    if nested_wire_type == WIRE_TYPE_END_GROUP {
                        if nested_field != field_number {
                            return Err(Error::MalformedTag {
                                context: "unbalanced group",
                                tag: make_tag(nested_field, nested_wire_type),
                            });
                        }
                        break;
                    }
                    self.skip_field_with_depth(nested_field, nested_wire_type, depth + 1)?;
                }
            }
            WIRE_TYPE_END_GROUP => {
                return Err(Error::MalformedTag {
                    context: "end group without start group",
                    tag: make_tag(field_number, wire_type),
                });
            }
            WIRE_TYPE_32BIT => self.advance(4, "fixed32")?,
            _ => {
                return Err(Error::MalformedTag {
                    context: "illegal wire type",
                    tag: make_tag(field_number, wire_type),
                });
            }
        }
        Ok(start_remaining - self.data.remaining())
    }

    #[inline(always)]
    fn advance(&mut self, n: usize, context: &'static str) -> Result<()> {
        if self.data.remaining() < n {
            return Err(Error::UnexpectedEndOfInput { context });
        }
        self.data.advance(n);
        Ok(())
    }
}

#[inline(always)]
fn make_tag(field_number: u32, wire_type: u8) -> u64 {
    ((field_number as u64) << 3) | wire_type as u64
}

#[inline(always)]
pub fn validate_wire_type(actual: u8, expected: u8, field: &'static str) -> Result<()> {
    if actual != expected {
        return Err(Error::WrongWireType {
            field,
            expected,
            actual,
        });
    }
    Ok(())
}
