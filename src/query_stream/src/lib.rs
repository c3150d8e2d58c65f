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


//! Pooled decoder for streamed query responses.
//!
//! Storage nodes answer a query with a stream of [`QueryStreamResponse`]
//! messages, each carrying the compressed chunks of many series. Decoding
//! borrows the chunk slices from a process-wide pool and overwrites them in
//! place, the caller gives them back with [`release_response`] once it is done
//! reading.

pub mod chunk_pool;
pub mod config;
pub mod error;
pub mod pb_reader;
pub mod pooled_parser;
pub mod pooled_types;

pub use chunk_pool::{ChunkPool, ChunkSlicePool, CHUNK_SLICE_POOL, MAX_POOLED_CHUNKS};
pub use config::ParserConfig;
pub use error::{Error, ErrorKind, PayloadKind, Result};
pub use pooled_parser::{decode_query_stream_response, release_response, QueryStreamParser};
pub use pooled_types::{QueryStreamResponse, TimeSeriesChunk};
