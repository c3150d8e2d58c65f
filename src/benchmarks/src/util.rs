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


//! Utilities for benchmarks.

use std::{fmt, str::FromStr, sync::Arc, thread, time::Duration};

use serde::{de, Deserialize, Deserializer};

/// Duration written as `<number><unit>`, unit being one of `ms`, `s`, `m`
/// or `h`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Ord, PartialOrd, Default)]
pub struct ReadableDuration(pub Duration);

impl From<Duration> for ReadableDuration {
    fn from(t: Duration) -> ReadableDuration {
        ReadableDuration(t)
    }
}

impl FromStr for ReadableDuration {
    type Err = String;

    fn from_str(dur_str: &str) -> std::result::Result<ReadableDuration, String> {
        let dur_str = dur_str.trim();
        let idx = dur_str
            .find(|c: char| !c.is_ascii_digit())
            .ok_or_else(|| format!("missing unit in duration: {dur_str}"))?;
        let (number, unit) = dur_str.split_at(idx);
        let number: u64 = number
            .parse()
            .map_err(|e| format!("invalid duration {dur_str}, err:{e}"))?;
        let millis = match unit {
            "ms" => number,
            "s" => number * 1000,
            "m" => number * 60 * 1000,
            "h" => number * 60 * 60 * 1000,
            _ => return Err(format!("unknown unit in duration: {dur_str}")),
        };
        Ok(ReadableDuration(Duration::from_millis(millis)))
    }
}

impl fmt::Display for ReadableDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}ms", self.0.as_millis())
    }
}

impl<'de> Deserialize<'de> for ReadableDuration {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let dur_str = String::deserialize(deserializer)?;
        dur_str.parse().map_err(de::Error::custom)
    }
}

/// Run a workload concurrently with up to CPU core count threads.
pub fn run_concurrent_threads<F>(scale: usize, worker: F) -> Result<(), String>
where
    F: Fn(usize) -> Result<(), String> + Send + Sync + 'static,
{
    let threads = std::cmp::min(scale, num_cpus::get());
    if threads == 0 {
        return Ok(());
    }
    let base = scale / threads;
    let extra = scale % threads;
    let worker = Arc::new(worker);
    let mut handles = Vec::with_capacity(threads);
    for i in 0..threads {
        let n = base + if i < extra { 1 } else { 0 };
        if n == 0 {
            continue;
        }
        let w = Arc::clone(&worker);
        handles.push(thread::spawn(move || (w)(n)));
    }
    for h in handles {
        h.join().map_err(|_| "thread panicked".to_string())??;
    }
    Ok(())
}
