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

//! shared infrastructure for the SierraVision crates: geo primitives, datetime and
//! filesystem helpers, buffered HTTP access, RON config lookup and the error/CLI macros

pub mod macros;
pub mod geo;
pub mod datetime;
pub mod fs;
pub mod net;
pub mod config;
