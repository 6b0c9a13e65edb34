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

//! active fire detection retrieval from the NASA FIRMS area API.
//!
//! FIRMS serves hotspot detections as CSV or JSON depending on the endpoint; both
//! variants are normalized into [`FireRecord`] right after parsing. Malformed rows
//! are skipped and counted - a retrieval only fails as a whole when every row of a
//! non-empty response is unparseable.

use std::time::Duration;
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use reqwest::Client;
use serde::{Serialize, Deserialize};
use serde_json::Value;
use tracing::{debug, warn};

use sierra_common::{datetime::secs, geo::{GeoRect, LatLon}, net::get_data};

mod errors;
pub use errors::*;

fn default_timeout ()->Duration { secs(30) }

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FirmsConfig {
    pub server: String, // e.g. "https://firms.modaps.eosdis.nasa.gov"
    pub map_key: String,
    pub source: String, // e.g. "VIIRS_SNPP_NRT" or "MODIS_NRT"

    #[serde(default = "default_timeout")]
    pub request_timeout: Duration,
}

/* #region hotspot records **********************************************************************/

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Confidence {
    Low,
    Nominal,
    High,
}

impl Confidence {
    /// map a FIRMS confidence code onto the three-level scale. VIIRS uses letter
    /// codes, MODIS reports 0..100 percent
    pub fn from_code (code: &str)->Result<Confidence> {
        match code.trim().to_ascii_lowercase().as_str() {
            "l" | "low" => Ok(Confidence::Low),
            "n" | "nominal" => Ok(Confidence::Nominal),
            "h" | "high" => Ok(Confidence::High),
            s => {
                let pct: f64 = s.parse().map_err( |_| parse_error( format!("invalid confidence code {:?}", code)))?;
                if pct < 30.0 { Ok(Confidence::Low) }
                else if pct < 80.0 { Ok(Confidence::Nominal) }
                else { Ok(Confidence::High) }
            }
        }
    }
}

/// raw hotspot row - used for direct parsing of the FIRMS CSV variant
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawFirmsRow {
    pub latitude: f64,
    pub longitude: f64,
    #[serde(alias="bright_ti4")] pub brightness: f64, // K
    pub acq_date: NaiveDate,
    pub acq_time: u32, // hhmm
    pub confidence: String,
}

impl RawFirmsRow {
    pub fn acquired (&self)->Result<DateTime<Utc>> {
        let hrs = self.acq_time / 100;
        let min = self.acq_time % 100;
        let t = NaiveTime::from_hms_opt( hrs, min, 0)
            .ok_or_else( || parse_error( format!("invalid acq_time {}", self.acq_time)))?;
        Ok( self.acq_date.and_time(t).and_utc())
    }

    pub fn to_fire_record (&self)->Result<FireRecord> {
        Ok( FireRecord {
            pos: LatLon::new( self.latitude, self.longitude),
            brightness: self.brightness,
            confidence: Confidence::from_code( &self.confidence)?,
            acquired: self.acquired()?,
        })
    }
}

/// the normalized detection shape both wire variants map onto
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FireRecord {
    pub pos: LatLon,
    pub brightness: f64, // K
    pub confidence: Confidence,
    pub acquired: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct FireSummary {
    pub region: String,
    pub records: Vec<FireRecord>,
    pub n_skipped: usize,
}

impl FireSummary {
    pub fn to_json_pretty (&self)->Result<String> {
        Ok( serde_json::to_string_pretty( &self)?)
    }
    pub fn to_json (&self)->Result<String> {
        Ok( serde_json::to_string( &self)?)
    }
}

/* #endregion hotspot records */

/* #region wire parsers *************************************************************************/

/// parse the CSV variant, skipping and counting rows that don't parse. An empty body
/// or a header-only body yields an empty record list
pub fn parse_csv_hotspots (text: &str)->Result<(Vec<FireRecord>, usize)> {
    let mut records: Vec<FireRecord> = Vec::new();
    let mut n_skipped = 0;
    let mut n_rows = 0;

    let mut reader = csv::ReaderBuilder::new().flexible(true).from_reader( text.as_bytes());
    for result in reader.deserialize::<RawFirmsRow>() {
        n_rows += 1;
        match result.map_err( SierraFirmsError::from).and_then( |raw| raw.to_fire_record()) {
            Ok(rec) => records.push(rec),
            Err(e) => {
                warn!("skipping unparseable hotspot row: {}", e);
                n_skipped += 1;
            }
        }
    }

    if n_rows > 0 && records.is_empty() {
        return Err( parse_error( format!("all {} hotspot rows unparseable", n_rows)))
    }
    Ok( (records, n_skipped))
}

fn json_f64 (obj: &Value, keys: &[&str])->Option<f64> {
    let v = keys.iter().find_map( |key| obj.get(key))?;
    match v {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.parse().ok(),
        _ => None
    }
}

fn json_row_to_record (obj: &Value)->Result<FireRecord> {
    let latitude = json_f64( obj, &["latitude", "lat"]).ok_or_else( || parse_error("missing latitude"))?;
    let longitude = json_f64( obj, &["longitude", "lon"]).ok_or_else( || parse_error("missing longitude"))?;
    let brightness = json_f64( obj, &["brightness", "bright_ti4"]).ok_or_else( || parse_error("missing brightness"))?;

    let acq_date = obj.get("acq_date").and_then( Value::as_str)
        .and_then( |s| NaiveDate::parse_from_str( s, "%Y-%m-%d").ok())
        .ok_or_else( || parse_error("missing or invalid acq_date"))?;
    let acq_time = json_f64( obj, &["acq_time"])
        .ok_or_else( || parse_error("missing acq_time"))? as u32;

    let confidence = match obj.get("confidence") {
        Some(Value::String(s)) => Confidence::from_code(s)?,
        Some(Value::Number(n)) => Confidence::from_code( &n.to_string())?,
        _ => return Err( parse_error("missing confidence"))
    };

    let t = NaiveTime::from_hms_opt( acq_time / 100, acq_time % 100, 0)
        .ok_or_else( || parse_error( format!("invalid acq_time {}", acq_time)))?;

    Ok( FireRecord {
        pos: LatLon::new( latitude, longitude),
        brightness,
        confidence,
        acquired: acq_date.and_time(t).and_utc(),
    })
}

/// parse the JSON variant (an array of detection objects), with the same
/// skip-and-count row semantics as the CSV parser
pub fn parse_json_hotspots (text: &str)->Result<(Vec<FireRecord>, usize)> {
    let parsed: Value = serde_json::from_str(text)?;
    let rows = parsed.as_array().ok_or_else( || parse_error("expected a JSON array of detections"))?;

    let mut records: Vec<FireRecord> = Vec::new();
    let mut n_skipped = 0;

    for row in rows {
        match json_row_to_record(row) {
            Ok(rec) => records.push(rec),
            Err(e) => {
                warn!("skipping unparseable hotspot row: {}", e);
                n_skipped += 1;
            }
        }
    }

    if !rows.is_empty() && records.is_empty() {
        return Err( parse_error( format!("all {} hotspot rows unparseable", rows.len())))
    }
    Ok( (records, n_skipped))
}

/// pick the row parser from the response content type
pub fn parse_hotspots (content_type: Option<&str>, text: &str)->Result<(Vec<FireRecord>, usize)> {
    if content_type.map( |ct| ct.contains("json")).unwrap_or(false) {
        parse_json_hotspots(text)
    } else {
        parse_csv_hotspots(text)
    }
}

/* #endregion wire parsers */

/// retrieve active fire detections for the region from the FIRMS area API and filter
/// them to the region bbox (edge-inclusive). No detections is a normal result
pub async fn fetch_active_fires (client: &Client, config: &FirmsConfig, region: &str, bbox: &GeoRect, lookback_days: u32)->Result<FireSummary> {
    let url = format!("{}/api/area/csv/{}/{}/{}/{}",
        config.server, config.map_key, config.source, bbox.wsen_query(), lookback_days);

    let response = get_data( client, &url, config.request_timeout).await?;
    if !response.is_success() {
        return Err( SierraFirmsError::RequestFailed( format!("FIRMS status {} for {}", response.status, region)))
    }

    let text = response.text()?;
    let (all_records, n_skipped) = parse_hotspots( response.content_type.as_deref(), &text)?;

    let n_total = all_records.len();
    let records: Vec<FireRecord> = all_records.into_iter()
        .filter( |rec| bbox.contains( &rec.pos))
        .collect();

    debug!("{}: {} of {} detections within bbox, {} rows skipped", region, records.len(), n_total, n_skipped);
    Ok( FireSummary { region: region.to_string(), records, n_skipped })
}
