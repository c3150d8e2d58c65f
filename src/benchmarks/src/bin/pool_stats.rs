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


//! Report how many chunk slices the global pool retains after concurrent
//! decodes of growing scale.

use anyhow::{Context, Result};
use benchmarks::{config::QueryStreamConfig, query_stream_bench::build_workload};
use query_stream::{QueryStreamParser, CHUNK_SLICE_POOL};
use tokio::task::JoinHandle;

async fn run_concurrent_parsing(data: bytes::Bytes, scale: usize) -> Result<usize> {
    let handles: Vec<JoinHandle<query_stream::Result<()>>> = (0..scale)
        .map(|_| {
            let data = data.clone();
            tokio::task::spawn_blocking(move || {
                let parser = QueryStreamParser::default();
                let response = parser.decode(data)?;
                parser.release(response);
                Ok(())
            })
        })
        .collect();

    for handle in handles {
        handle
            .await
            .context("task completion failed")?
            .context("parse failed")?;
    }

    Ok(CHUNK_SLICE_POOL.len())
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = QueryStreamConfig {
        num_series: 1000,
        max_chunks_per_series: 32,
        chunk_data_size: 256,
        scale: 1,
        bench_measurement_time: std::time::Duration::from_secs(1).into(),
        bench_sample_size: 10,
    };
    let data = build_workload(&config);
    let scale_values = [1, 2, 5, 10, 20, 50, 100, 200, 500];

    println!("{:<8} {:<10}", "Scale", "Pooled");
    println!("{}", "=".repeat(20));

    for &scale in &scale_values {
        let pooled = run_concurrent_parsing(data.clone(), scale).await?;
        println!("{:<8} {:<10}", scale, pooled);
    }

    println!("=== Final Pool Status ===");
    println!("Pooled Chunk Slices: {}", CHUNK_SLICE_POOL.len());
    Ok(())
}
