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

//! the SierraVision imagery pipeline: ordered multi-source satellite image retrieval
//! with fallback, deterministic enhancement and a file based slot cache, driven by a
//! comparison orchestrator that produces baseline/current image pairs for a region

use std::{collections::HashMap, fmt};
use bytes::Bytes;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Serialize, Deserialize};
use sierra_common::geo::{builtin_regions, GeoRect};

mod errors;
pub use errors::*;

pub mod source;
pub use source::*;

pub mod enhance;
pub use enhance::*;

pub mod store;
pub use store::*;

pub mod orchestrator;
pub use orchestrator::*;

/* #region canonical request constants **********************************************************/

pub const TARGET_WIDTH: u32 = 1024;
pub const TARGET_HEIGHT: u32 = 1024;

/// bodies below this are upstream error pages or blank tiles, not usable imagery
pub const MIN_IMAGE_BYTES: usize = 5000;

pub const CONTRAST_BOOST_PCT: f32 = 20.0;
pub const SATURATION_BOOST: f64 = 1.1;

pub const OUTPUT_FORMAT: &str = "image/png";

/// annual sampling date - July 1 falls into the Luzon dry-to-wet transition where
/// historical layers have usable coverage. Years outside the representable
/// calendar range are a configuration error
pub fn acquisition_date_for_year (year: i32)->Result<NaiveDate> {
    NaiveDate::from_ymd_opt( year, 7, 1)
        .ok_or_else( || config_error( format!("year {} out of range", year)))
}

/* #endregion canonical request constants */

/* #region slot addressing **********************************************************************/

/// the role a cached image plays within a comparison
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ImageRole {
    Baseline,
    Current,
    SingleYear,
}

impl ImageRole {
    pub fn as_str (&self)->&'static str {
        match self {
            ImageRole::Baseline => "baseline",
            ImageRole::Current => "current",
            ImageRole::SingleYear => "single_year",
        }
    }
}

impl fmt::Display for ImageRole {
    fn fmt (&self, f: &mut fmt::Formatter<'_>)->fmt::Result {
        f.write_str( self.as_str())
    }
}

/// cache address of one enhanced image
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SlotKey {
    pub region: String,
    pub year: i32,
    pub role: ImageRole,
}

impl SlotKey {
    pub fn new (region: impl ToString, year: i32, role: ImageRole)->Self {
        SlotKey { region: region.to_string(), year, role }
    }
}

impl fmt::Display for SlotKey {
    fn fmt (&self, f: &mut fmt::Formatter<'_>)->fmt::Result {
        write!(f, "{}/{}/{}", self.region, self.year, self.role)
    }
}

/* #endregion slot addressing */

/* #region request / response types *************************************************************/

/// everything a source needs to build its GET url
#[derive(Debug, Clone)]
pub struct ImageRequest {
    pub region: String,
    pub bbox: GeoRect,
    pub date: NaiveDate,
    pub layer: Option<String>, // per-request override of the source's configured layer
    pub width: u32,
    pub height: u32,
    pub format: String,
}

impl ImageRequest {
    pub fn for_year (region: impl ToString, bbox: GeoRect, year: i32)->Result<Self> {
        Ok( ImageRequest {
            region: region.to_string(),
            bbox,
            date: acquisition_date_for_year(year)?,
            layer: None,
            width: TARGET_WIDTH,
            height: TARGET_HEIGHT,
            format: OUTPUT_FORMAT.to_string(),
        })
    }
}

/// raw bytes as delivered by the first source that passed validation
#[derive(Debug, Clone)]
pub struct FetchedImage {
    pub data: Bytes,
    pub n_bytes: usize,
    pub source: String,
}

/// one failed source in a fallback chain, with the reason it was rejected
#[derive(Debug, Clone, Serialize)]
pub struct SourceAttempt {
    pub source: String,
    pub reason: String,
}

/// enhancer output, always an encoded PNG
#[derive(Debug, Clone, PartialEq)]
pub struct EnhancedImage {
    pub data: Vec<u8>,
    pub width: u32,
    pub height: u32,
    pub format: String,
}

/// RON sidecar metadata stored next to each slot image
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlotMeta {
    pub width: u32,
    pub height: u32,
    pub n_bytes: usize,
    pub fetched: DateTime<Utc>,
    pub source: String,
}

/* #endregion request / response types */

/* #region outcome types ************************************************************************/

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SlotOutcome {
    Fetched { source: String, n_bytes: usize },
    Cached,
    Failed { reason: String },
}

impl SlotOutcome {
    pub fn succeeded (&self)->bool {
        !matches!( self, SlotOutcome::Failed {..})
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct YearOutcome {
    pub year: i32,
    pub role: ImageRole,
    pub outcome: SlotOutcome,
}

impl YearOutcome {
    pub fn succeeded (&self)->bool { self.outcome.succeeded() }
}

#[derive(Debug, Clone, Serialize)]
pub struct ComparisonResult {
    pub region: String,
    pub baseline: YearOutcome,
    pub current: YearOutcome,
    pub overall: bool,
}

impl ComparisonResult {
    pub fn to_json_pretty (&self)->Result<String> {
        Ok( serde_json::to_string_pretty( &self)?)
    }
    pub fn to_json (&self)->Result<String> {
        Ok( serde_json::to_string( &self)?)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct YearRangeResult {
    pub region: String,
    pub outcomes: Vec<YearOutcome>,
    pub n_success: usize,
}

impl YearRangeResult {
    pub fn to_json_pretty (&self)->Result<String> {
        Ok( serde_json::to_string_pretty( &self)?)
    }
    pub fn to_json (&self)->Result<String> {
        Ok( serde_json::to_string( &self)?)
    }
}

/* #endregion outcome types */

/// region registry used when there is no regions.ron
pub fn default_regions ()->HashMap<String,GeoRect> {
    builtin_regions()
}
