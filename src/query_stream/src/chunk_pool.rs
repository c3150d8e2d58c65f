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


//! Recycling pool of chunk slices.
//!
//! Chunk slices are borrowed by the decoder, handed to the caller inside the
//! decoded response and given back through the release entry point. The pool
//! itself applies no size policy, callers decide what is worth returning.

use std::{fmt, sync::Arc};

use object_pool::Pool;
use once_cell::sync::Lazy;
use pb_types::Chunk;

/// Largest chunk slice (in elements) the release entry point returns to the
/// pool, larger ones are dropped to bound the retained memory.
pub const MAX_POOLED_CHUNKS: usize = 16_384;

pub trait ChunkPool: Send + Sync {
    /// Take a previously released slice, or a new empty one if none is
    /// available. The returned slice may hold chunks of an unrelated response.
    fn acquire(&self) -> Vec<Chunk>;

    /// Give a slice back for future reuse.
    fn release(&self, chunks: Vec<Chunk>);
}

/// Unbounded, mutex-guarded free list of chunk slices.
pub struct ChunkSlicePool {
    slices: Pool<Vec<Chunk>>,
}

impl ChunkSlicePool {
    pub fn new() -> Self {
        Self {
            slices: Pool::new(0, Vec::new),
        }
    }

    /// Number of slices currently available for reuse.
    pub fn len(&self) -> usize {
        self.slices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slices.is_empty()
    }
}

impl Default for ChunkSlicePool {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ChunkSlicePool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChunkSlicePool")
            .field("available", &self.len())
            .finish()
    }
}

impl ChunkPool for ChunkSlicePool {
    #[inline]
    fn acquire(&self) -> Vec<Chunk> {
        match self.slices.try_pull() {
            Some(reusable) => reusable.detach().1,
            None => Vec::new(),
        }
    }

    #[inline]
    fn release(&self, chunks: Vec<Chunk>) {
        self.slices.attach(chunks);
    }
}

/// Global thread-safe chunk slice pool.
pub static CHUNK_SLICE_POOL: Lazy<Arc<ChunkSlicePool>> =
    Lazy::new(|| Arc::new(ChunkSlicePool::new()));
