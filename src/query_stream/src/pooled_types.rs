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


use bytes::Bytes;
use pb_types::{Chunk, LabelPair, TimeSeries};

/// Chunks of one series streamed back by a storage node.
///
/// `chunks` is on loan from the chunk slice pool for as long as the enclosing
/// [`QueryStreamResponse`] lives, it only goes back through
/// [`QueryStreamParser::release`](crate::pooled_parser::QueryStreamParser::release).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TimeSeriesChunk {
    pub from_ingester_id: Bytes,
    pub user_id: Bytes,
    pub labels: Vec<LabelPair>,
    pub chunks: Vec<Chunk>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryStreamResponse {
    pub chunk_series: Vec<TimeSeriesChunk>,
    pub time_series: Vec<TimeSeries>,
}

impl QueryStreamResponse {
    pub fn is_empty(&self) -> bool {
        self.chunk_series.is_empty() && self.time_series.is_empty()
    }

    /// Total number of chunks over all chunk series.
    pub fn num_chunks(&self) -> usize {
        self.chunk_series.iter().map(|s| s.chunks.len()).sum()
    }
}
