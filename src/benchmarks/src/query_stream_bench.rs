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


//! Query stream response decoding bench.

use std::sync::Arc;

use bytes::Bytes;
use pb_types::{
    Chunk, LabelPair, QueryStreamResponse as ProstQueryStreamResponse, TimeSeriesChunk,
};
use prost::Message;
use query_stream::QueryStreamParser;

use crate::{config::QueryStreamConfig, util::run_concurrent_threads};

pub struct QueryStreamBench {
    raw_data: Bytes,
    scale: usize,
}

/// Build an encoded response with chunk counts cycling through
/// `0..=max_chunks_per_series`.
pub fn build_workload(config: &QueryStreamConfig) -> Bytes {
    let chunkseries = (0..config.num_series)
        .map(|i| TimeSeriesChunk {
            from_ingester_id: format!("ingester-{}", i % 3),
            user_id: "tenant-1".to_string(),
            labels: vec![
                LabelPair {
                    name: "__name__".to_string(),
                    value: "http_requests_total".to_string(),
                },
                LabelPair {
                    name: "instance".to_string(),
                    value: format!("host-{i}"),
                },
            ],
            chunks: (0..i % (config.max_chunks_per_series + 1))
                .map(|j| Chunk {
                    start_timestamp_ms: (j * 120_000) as i64,
                    end_timestamp_ms: (j * 120_000 + 119_999) as i64,
                    encoding: 1,
                    data: vec![j as u8; config.chunk_data_size],
                })
                .collect(),
        })
        .collect();

    let response = ProstQueryStreamResponse {
        chunkseries,
        timeseries: vec![],
    };
    Bytes::from(response.encode_to_vec())
}

impl QueryStreamBench {
    pub fn new(config: QueryStreamConfig) -> Self {
        Self {
            raw_data: build_workload(&config),
            scale: config.scale,
        }
    }

    pub fn raw_data(&self) -> &Bytes {
        &self.raw_data
    }

    // prost parser sequential bench.
    pub fn prost_parser_sequential(&self) -> Result<(), String> {
        for _ in 0..self.scale {
            ProstQueryStreamResponse::decode(self.raw_data.clone())
                .map_err(|e| format!("prost sequential parse failed: {}", e))?;
        }
        Ok(())
    }

    // Hand-written pooled parser sequential bench, responses are released so
    // chunk slices get recycled.
    pub fn pooled_parser_sequential(&self) -> Result<(), String> {
        let parser = QueryStreamParser::default();
        for _ in 0..self.scale {
            let response = parser
                .decode(self.raw_data.clone())
                .map_err(|e| format!("pooled sequential parse failed: {e:?}"))?;
            parser.release(response);
        }
        Ok(())
    }

    // Hand-written pooled parser sequential bench without releasing, every
    // decode misses the pool.
    pub fn pooled_parser_no_release_sequential(&self) -> Result<(), String> {
        let parser = QueryStreamParser::default();
        for _ in 0..self.scale {
            parser
                .decode(self.raw_data.clone())
                .map_err(|e| format!("pooled sequential parse failed: {e:?}"))?;
        }
        Ok(())
    }

    // prost parser concurrent bench.
    pub fn prost_parser_concurrent(&self) -> Result<(), String> {
        let raw = Arc::new(self.raw_data.clone());
        run_concurrent_threads(self.scale, move |n| {
            for _ in 0..n {
                ProstQueryStreamResponse::decode((*raw).clone())
                    .map_err(|e| format!("prost concurrent parse failed: {}", e))?;
            }
            Ok(())
        })
    }

    // Hand-written pooled parser concurrent bench.
    pub fn pooled_parser_concurrent(&self) -> Result<(), String> {
        let raw = Arc::new(self.raw_data.clone());
        run_concurrent_threads(self.scale, move |n| {
            let parser = QueryStreamParser::default();
            for _ in 0..n {
                let response = parser
                    .decode((*raw).clone())
                    .map_err(|e| format!("pooled concurrent parse failed: {e:?}"))?;
                parser.release(response);
            }
            Ok(())
        })
    }
}
