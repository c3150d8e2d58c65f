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


use serde::Deserialize;

use crate::chunk_pool::MAX_POOLED_CHUNKS;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    /// Chunk slices longer than this are dropped on release instead of being
    /// returned to the pool.
    pub max_pooled_chunks: usize,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            max_pooled_chunks: MAX_POOLED_CHUNKS,
        }
    }
}
