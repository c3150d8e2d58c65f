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


//! Verifies the pooled parser against prost (50 iterations alternating a
//! large and a small response), releasing every response so later iterations
//! decode into recycled chunk slices.

use std::{sync::Arc, thread};

use bytes::Bytes;
use pb_types::{
    Chunk, Exemplar, LabelPair, QueryStreamResponse, Sample, TimeSeries, TimeSeriesChunk,
};
use prost::Message;
use query_stream::{ChunkSlicePool, ParserConfig, QueryStreamParser};

const ITERATIONS: usize = 50;

fn label(name: &str, value: &str) -> LabelPair {
    LabelPair {
        name: name.to_string(),
        value: value.to_string(),
    }
}

fn build_response(num_series: usize, max_chunks: usize, seed: usize) -> QueryStreamResponse {
    let chunkseries = (0..num_series)
        .map(|i| {
            // Varying chunk counts, some series have none.
            let num_chunks = (i * 7 + seed) % (max_chunks + 1);
            TimeSeriesChunk {
                from_ingester_id: format!("ingester-{}", i % 3),
                user_id: format!("tenant-{seed}"),
                labels: vec![
                    label("__name__", "http_requests_total"),
                    label("instance", &format!("host-{i}")),
                ],
                chunks: (0..num_chunks)
                    .map(|j| Chunk {
                        start_timestamp_ms: (j * 120_000) as i64,
                        end_timestamp_ms: (j * 120_000 + 119_999) as i64,
                        encoding: (j % 3) as i32,
                        data: vec![(i + j + seed) as u8; 16 + (j * 13 + i) % 200],
                    })
                    .collect(),
            }
        })
        .collect();

    let timeseries = (0..num_series / 10)
        .map(|i| TimeSeries {
            labels: vec![label("__name__", "up"), label("shard", &i.to_string())],
            samples: (0..5)
                .map(|j| Sample {
                    value: (i * j) as f64 * 0.5,
                    timestamp_ms: 1_700_000_000_000 + j as i64 * 15_000,
                })
                .collect(),
            exemplars: vec![Exemplar {
                labels: vec![label("trace_id", "abc123")],
                value: 1.5,
                timestamp_ms: 1_700_000_000_000,
            }],
        })
        .collect();

    QueryStreamResponse {
        chunkseries,
        timeseries,
    }
}

fn load_test_data() -> (Bytes, Bytes) {
    let data1 = Bytes::from(build_response(200, 40, 1).encode_to_vec());
    let data2 = Bytes::from(build_response(30, 5, 2).encode_to_vec());
    (data1, data2)
}

fn parse_with_prost(data: &Bytes) -> QueryStreamResponse {
    QueryStreamResponse::decode(data.clone()).expect("prost decode failed")
}

fn parse_with_pooled(parser: &QueryStreamParser, data: &Bytes) -> QueryStreamResponse {
    let pooled_response = parser.decode(data.clone()).expect("pooled decode failed");

    // Convert pooled types to pb_types to compare with prost.
    let response = QueryStreamResponse {
        chunkseries: pooled_response
            .chunk_series
            .iter()
            .map(|series| TimeSeriesChunk {
                from_ingester_id: String::from_utf8_lossy(&series.from_ingester_id).to_string(),
                user_id: String::from_utf8_lossy(&series.user_id).to_string(),
                labels: series.labels.clone(),
                chunks: series.chunks.clone(),
            })
            .collect(),
        timeseries: pooled_response.time_series.clone(),
    };

    parser.release(pooled_response);
    response
}

fn new_parser() -> (QueryStreamParser, Arc<ChunkSlicePool>) {
    let pool = Arc::new(ChunkSlicePool::new());
    let parser = QueryStreamParser::new(pool.clone(), ParserConfig::default());
    (parser, pool)
}

#[test]
fn test_sequential_correctness() {
    let (data1, data2) = load_test_data();
    let datasets = [&data1, &data2];
    let (parser, pool) = new_parser();

    for iteration in 0..ITERATIONS {
        let data_index = iteration % 2;
        let data = datasets[data_index];

        let prost_result = parse_with_prost(data);
        let pooled_result = parse_with_pooled(&parser, data);

        assert_eq!(
            &prost_result, &pooled_result,
            "Data {} QueryStreamResponse mismatch",
            data_index
        );
    }

    // Slices are recycled instead of piling up.
    assert_eq!(pool.len(), 200);
}

#[test]
fn test_concurrent_correctness() {
    let (data1, data2) = load_test_data();
    let data1 = Arc::new(data1);
    let data2 = Arc::new(data2);
    let (parser, _pool) = new_parser();

    let mut handles = Vec::new();

    for iteration in 0..ITERATIONS {
        let data1_clone = Arc::clone(&data1);
        let data2_clone = Arc::clone(&data2);
        let parser = parser.clone();

        let handle = thread::spawn(move || {
            let data_index = iteration % 2;
            let data = if data_index == 0 {
                &*data1_clone
            } else {
                &*data2_clone
            };

            let prost_result = parse_with_prost(data);
            let pooled_result = parse_with_pooled(&parser, data);

            assert_eq!(
                &prost_result, &pooled_result,
                "Iteration {} data {} QueryStreamResponse mismatch",
                iteration, data_index
            );
        });

        handles.push(handle);
    }

    for handle in handles {
        handle.join().expect("thread panicked");
    }
}
