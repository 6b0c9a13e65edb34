/*
 * Copyright © 2026, the SierraVision project contributors.
 *
 * The "SierraVision" software is licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License. You may obtain a copy
 * of the License at http://www.apache.org/licenses/LICENSE-2.0.
 *
 * Unless required by applicable law or agreed to in writing, software distributed under
 * the License is distributed on an "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND,
 * either express or implied. See the License for the specific language governing permissions
 * and limitations under the License.
 */

//! common datetime helpers

use std::time::Duration;
use chrono::{DateTime, Utc};

#[inline] pub fn secs (n: u64)->Duration { Duration::from_secs(n) }

#[inline]
pub fn utc_now ()->DateTime<Utc> {
    Utc::now()
}
