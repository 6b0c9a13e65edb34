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

//! geographic primitives shared by the imagery and fire-data crates.
//! All coordinates are WGS84 degrees, x = longitude, y = latitude.

use std::collections::HashMap;
use geo::{Rect, coord};
use serde::{Deserialize, Serialize};

/// a geographic position in degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLon {
    pub lat_deg: f64,
    pub lon_deg: f64,
}

impl LatLon {
    pub fn new (lat_deg: f64, lon_deg: f64)->Self {
        LatLon { lat_deg, lon_deg }
    }
}

/// serde shadow for GeoRect - config files spell bounding boxes out by edge name
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct BboxDegrees {
    pub west: f64,
    pub south: f64,
    pub east: f64,
    pub north: f64,
}

/// an axis-aligned geographic bounding box in degrees, wrapping a `geo::Rect`.
/// Note that containment here is edge-inclusive, which differs from the
/// boundary-exclusive `geo::Contains` semantics.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "BboxDegrees", into = "BboxDegrees")]
pub struct GeoRect(Rect<f64>);

impl GeoRect {
    pub fn from_wsen (west: f64, south: f64, east: f64, north: f64)->Self {
        GeoRect( Rect::new( coord! {x: west, y: south}, coord! {x: east, y: north}))
    }

    pub fn west (&self)->f64 { self.0.min().x }
    pub fn south (&self)->f64 { self.0.min().y }
    pub fn east (&self)->f64 { self.0.max().x }
    pub fn north (&self)->f64 { self.0.max().y }

    pub fn contains_degrees (&self, lat_deg: f64, lon_deg: f64)->bool {
        lat_deg >= self.south() && lat_deg <= self.north()
            && lon_deg >= self.west() && lon_deg <= self.east()
    }

    pub fn contains (&self, pos: &LatLon)->bool {
        self.contains_degrees( pos.lat_deg, pos.lon_deg)
    }

    /// "west,south,east,north" - the FIRMS area and Worldview snapshot parameter order
    pub fn wsen_query (&self)->String {
        format!("{},{},{},{}", self.west(), self.south(), self.east(), self.north())
    }

    /// "south,west,north,east" - WMS 1.3.0 BBOX axis order for EPSG:4326
    pub fn bbox_13 (&self)->String {
        format!("{},{},{},{}", self.south(), self.west(), self.north(), self.east())
    }
}

impl From<BboxDegrees> for GeoRect {
    fn from (b: BboxDegrees)->Self { GeoRect::from_wsen( b.west, b.south, b.east, b.north) }
}

impl From<GeoRect> for BboxDegrees {
    fn from (r: GeoRect)->Self {
        BboxDegrees { west: r.west(), south: r.south(), east: r.east(), north: r.north() }
    }
}

/// the monitoring regions we always know about, config can add more
pub fn builtin_regions ()->HashMap<String,GeoRect> {
    HashMap::from( [
        ("sierra_madre".to_string(), GeoRect::from_wsen( 120.5, 14.0, 122.8, 17.5)),
        ("manila".to_string(),       GeoRect::from_wsen( 120.8, 14.3, 121.2, 14.8)),
        ("luzon_wide".to_string(),   GeoRect::from_wsen( 119.5, 12.5, 124.0, 19.0)),
    ])
}
