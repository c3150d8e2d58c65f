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


use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Which collaborator decoder reported a payload failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadKind {
    Label,
    Chunk,
    TimeSeries,
}

impl PayloadKind {
    fn as_str(&self) -> &'static str {
        match self {
            PayloadKind::Label => "label",
            PayloadKind::Chunk => "chunk",
            PayloadKind::TimeSeries => "time series",
        }
    }
}

impl std::fmt::Display for PayloadKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorKind {
    IntegerOverflow,
    UnexpectedEndOfInput,
    MalformedTag,
    InvalidLength,
    WrongWireType,
    Payload,
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("varint overflows 64 bits")]
    IntegerOverflow,

    #[error("unexpected end of input, not enough bytes for {context}")]
    UnexpectedEndOfInput { context: &'static str },

    #[error("malformed tag {tag} in {context}")]
    MalformedTag { context: &'static str, tag: u64 },

    #[error("invalid length {len} for {context}")]
    InvalidLength { context: &'static str, len: u64 },

    #[error("expected wire type {expected} for {field}, but found wire type {actual}")]
    WrongWireType {
        field: &'static str,
        expected: u8,
        actual: u8,
    },

    #[error("failed to decode {kind} payload")]
    Payload {
        kind: PayloadKind,
        #[source]
        source: prost::DecodeError,
    },
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::IntegerOverflow => ErrorKind::IntegerOverflow,
            Error::UnexpectedEndOfInput { .. } => ErrorKind::UnexpectedEndOfInput,
            Error::MalformedTag { .. } => ErrorKind::MalformedTag,
            Error::InvalidLength { .. } => ErrorKind::InvalidLength,
            Error::WrongWireType { .. } => ErrorKind::WrongWireType,
            Error::Payload { .. } => ErrorKind::Payload,
        }
    }

    /// Whether the failure was reported by a collaborator decoder rather than
    /// by the wire format parser itself.
    #[inline]
    pub fn is_payload(&self) -> bool {
        matches!(self, Error::Payload { .. })
    }

    pub(crate) fn payload(kind: PayloadKind) -> impl FnOnce(prost::DecodeError) -> Self {
        move |source| Error::Payload { kind, source }
    }
}

#[cfg(test)]
mod tests {
    use std::error::Error as _;

    use prost::Message;

    use super::*;

    #[test]
    fn test_error_kind() {
        assert_eq!(Error::IntegerOverflow.kind(), ErrorKind::IntegerOverflow);
        assert_eq!(
            Error::UnexpectedEndOfInput { context: "varint" }.kind(),
            ErrorKind::UnexpectedEndOfInput
        );
        assert_eq!(
            Error::MalformedTag {
                context: "tag",
                tag: 0
            }
            .kind(),
            ErrorKind::MalformedTag
        );
        assert!(!Error::IntegerOverflow.is_payload());
    }

    #[test]
    fn test_error_display() {
        assert_eq!(
            Error::UnexpectedEndOfInput { context: "varint" }.to_string(),
            "unexpected end of input, not enough bytes for varint"
        );
        assert_eq!(
            Error::WrongWireType {
                field: "chunks",
                expected: 2,
                actual: 0,
            }
            .to_string(),
            "expected wire type 2 for chunks, but found wire type 0"
        );
    }

    #[test]
    fn test_payload_error_keeps_source() {
        // A lone tag byte with no value behind it.
        let source = pb_types::Chunk::decode(&[0x08][..]).unwrap_err();
        let err = Error::payload(PayloadKind::Chunk)(source);

        assert!(err.is_payload());
        assert_eq!(err.kind(), ErrorKind::Payload);
        assert_eq!(err.to_string(), "failed to decode chunk payload");
        assert!(err.source().is_some());
    }
}
