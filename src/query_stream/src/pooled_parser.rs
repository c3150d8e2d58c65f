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


//! Pooled parser for streamed query responses.
//!
//! Like the other hand-written readers in this crate, strings are parsed as
//! `Bytes` slices of the input instead of `String`s and **no** UTF-8
//! validation is applied to them. Labels, chunks and plain time series are
//! decoded by their own prost messages, whose failures surface as
//! [`Error::Payload`].

use std::{fmt, sync::Arc};

use bytes::Bytes;
use pb_types::{Chunk, LabelPair, TimeSeries};
use prost::Message;
use tracing::{debug, trace};

use crate::{
    chunk_pool::{ChunkPool, CHUNK_SLICE_POOL},
    config::ParserConfig,
    error::{Error, PayloadKind, Result},
    pb_reader::{validate_wire_type, ProtobufReader, WIRE_TYPE_LENGTH_DELIMITED},
    pooled_types::{QueryStreamResponse, TimeSeriesChunk},
};

const FIELD_NUM_CHUNK_SERIES: u32 = 1;
const FIELD_NUM_TIME_SERIES: u32 = 2;
const FIELD_NUM_FROM_INGESTER_ID: u32 = 1;
const FIELD_NUM_USER_ID: u32 = 2;
const FIELD_NUM_LABELS: u32 = 3;
const FIELD_NUM_CHUNKS: u32 = 4;

#[derive(Clone)]
pub struct QueryStreamParser {
    pool: Arc<dyn ChunkPool>,
    max_pooled_chunks: usize,
}

impl QueryStreamParser {
    pub fn new(pool: Arc<dyn ChunkPool>, config: ParserConfig) -> Self {
        Self {
            pool,
            max_pooled_chunks: config.max_pooled_chunks,
        }
    }

    /// Decode a [`QueryStreamResponse`] from the buffer.
    ///
    /// Either the whole message decodes or an error is returned, chunk slices
    /// borrowed before the failure are dropped rather than given back.
    pub fn decode(&self, buf: Bytes) -> Result<QueryStreamResponse> {
        let mut response = QueryStreamResponse::default();
        let mut reader = ProtobufReader::new(buf);
        if let Err(e) = self.read_response(&mut reader, &mut response) {
            debug!(kind = ?e.kind(), "Decode query stream response failed");
            return Err(e);
        }
        Ok(response)
    }

    /// Give the chunk slices of a fully consumed response back to the pool.
    pub fn release(&self, response: QueryStreamResponse) {
        for series in response.chunk_series {
            if series.chunks.len() > self.max_pooled_chunks {
                debug!(
                    len = series.chunks.len(),
                    max = self.max_pooled_chunks,
                    "Drop oversized chunk slice instead of pooling it"
                );
                continue;
            }
            self.pool.release(series.chunks);
        }
    }

    fn read_response(
        &self,
        reader: &mut ProtobufReader,
        response: &mut QueryStreamResponse,
    ) -> Result<()> {
        while reader.remaining() > 0 {
            let (field_number, wire_type) = reader.read_field_tag("query stream response")?;
            match field_number {
                FIELD_NUM_CHUNK_SERIES => {
                    validate_wire_type(wire_type, WIRE_TYPE_LENGTH_DELIMITED, "chunk series")?;
                    let data = reader.read_bytes("chunk series")?;
                    let series = self.read_time_series_chunk(data)?;
                    response.chunk_series.push(series);
                }
                FIELD_NUM_TIME_SERIES => {
                    validate_wire_type(wire_type, WIRE_TYPE_LENGTH_DELIMITED, "time series")?;
                    let payload = reader.read_bytes("time series")?;
                    let time_series = TimeSeries::decode(payload)
                        .map_err(Error::payload(PayloadKind::TimeSeries))?;
                    response.time_series.push(time_series);
                }
                _ => {
                    reader.skip_field(field_number, wire_type)?;
                }
            }
        }
        Ok(())
    }

    /// Read one chunk series, decoding its chunks into a slice taken from the
    /// pool.
    ///
    /// Slots already present in the pooled slice are overwritten in order,
    /// further chunks are appended. Slots left unused still hold chunks of an
    /// earlier response and are cut off before returning.
    fn read_time_series_chunk(&self, data: Bytes) -> Result<TimeSeriesChunk> {
        let mut series = TimeSeriesChunk {
            chunks: self.pool.acquire(),
            ..Default::default()
        };
        let available_slots = series.chunks.len();
        let mut reused_slots = 0;

        let mut reader = ProtobufReader::new(data);
        while reader.remaining() > 0 {
            let (field_number, wire_type) = reader.read_field_tag("time series chunk")?;
            match field_number {
                FIELD_NUM_FROM_INGESTER_ID => {
                    validate_wire_type(wire_type, WIRE_TYPE_LENGTH_DELIMITED, "from ingester id")?;
                    series.from_ingester_id = reader.read_bytes("from ingester id")?;
                }
                FIELD_NUM_USER_ID => {
                    validate_wire_type(wire_type, WIRE_TYPE_LENGTH_DELIMITED, "user id")?;
                    series.user_id = reader.read_bytes("user id")?;
                }
                FIELD_NUM_LABELS => {
                    validate_wire_type(wire_type, WIRE_TYPE_LENGTH_DELIMITED, "labels")?;
                    let payload = reader.read_bytes("labels")?;
                    let label =
                        LabelPair::decode(payload).map_err(Error::payload(PayloadKind::Label))?;
                    series.labels.push(label);
                }
                FIELD_NUM_CHUNKS => {
                    validate_wire_type(wire_type, WIRE_TYPE_LENGTH_DELIMITED, "chunks")?;
                    let payload = reader.read_bytes("chunks")?;
                    if reused_slots < available_slots {
                        // Keep the allocation of the chunk data, but none of
                        // the stale field values.
                        let chunk = &mut series.chunks[reused_slots];
                        chunk.clear();
                        chunk
                            .merge(payload)
                            .map_err(Error::payload(PayloadKind::Chunk))?;
                        reused_slots += 1;
                    } else {
                        let chunk =
                            Chunk::decode(payload).map_err(Error::payload(PayloadKind::Chunk))?;
                        series.chunks.push(chunk);
                    }
                }
                _ => {
                    reader.skip_field(field_number, wire_type)?;
                }
            }
        }

        if reused_slots < available_slots {
            series.chunks.truncate(reused_slots);
        }
        trace!(
            reused = reused_slots,
            appended = series.chunks.len() - reused_slots,
            "Decode time series chunk"
        );
        Ok(series)
    }
}

impl Default for QueryStreamParser {
    fn default() -> Self {
        Self::new(CHUNK_SLICE_POOL.clone(), ParserConfig::default())
    }
}

impl fmt::Debug for QueryStreamParser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueryStreamParser")
            .field("max_pooled_chunks", &self.max_pooled_chunks)
            .finish()
    }
}

/// Decode a [`QueryStreamResponse`] with chunk slices from the global pool.
pub fn decode_query_stream_response(buf: Bytes) -> Result<QueryStreamResponse> {
    QueryStreamParser::default().decode(buf)
}

/// Return the chunk slices of `response` to the global pool.
///
/// Must only be called once every reader of the response is done, the slices
/// can be handed to another decode right away.
pub fn release_response(response: QueryStreamResponse) {
    QueryStreamParser::default().release(response)
}
