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

//! the comparison orchestrator ties fetch chain, enhancer and slot store together.
//! It is an explicitly constructed value, owning its source list, store, region
//! registry and config - there are no process-wide singletons

use std::{collections::HashMap, sync::Arc, time::Duration};
use dashmap::DashMap;
use serde::{Serialize, Deserialize};
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use sierra_common::{datetime::{secs, utc_now}, geo::GeoRect};

use crate::{
    errors::*, build_sources, enhance, fetch_first_valid, ImageRequest, ImageRole, ImageSource,
    QualityTier, SlotKey, SlotMeta, SlotStore, SourceConfig, SourceKind, Transport,
    ComparisonResult, EnhancedImage, SlotOutcome, YearOutcome, YearRangeResult,
    TARGET_HEIGHT, TARGET_WIDTH,
};

/* #region configuration ************************************************************************/

fn default_timeout ()->Duration { secs(60) }
fn default_width ()->u32 { TARGET_WIDTH }
fn default_height ()->u32 { TARGET_HEIGHT }

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageryConfig {
    pub sources: Vec<SourceConfig>,

    #[serde(default = "default_timeout")]
    pub request_timeout: Duration,

    #[serde(default = "default_width")]
    pub width: u32,

    #[serde(default = "default_height")]
    pub height: u32,
}

impl Default for ImageryConfig {
    /// the canonical source chain: GIBS WMS layers by decreasing resolution, then
    /// the Worldview snapshot service as a last resort
    fn default ()->Self {
        let gibs = "https://gibs.earthdata.nasa.gov/wms/epsg4326/best/wms.cgi";
        let worldview = "https://worldview.earthdata.nasa.gov/api/v1/snapshot";

        ImageryConfig {
            sources: vec![
                SourceConfig {
                    name: "gibs_modis_terra".to_string(),
                    kind: SourceKind::GibsWms,
                    endpoint: gibs.to_string(),
                    layer: "MODIS_Terra_CorrectedReflectance_TrueColor".to_string(),
                    quality: QualityTier::High,
                },
                SourceConfig {
                    name: "gibs_viirs_snpp".to_string(),
                    kind: SourceKind::GibsWms,
                    endpoint: gibs.to_string(),
                    layer: "VIIRS_SNPP_CorrectedReflectance_TrueColor".to_string(),
                    quality: QualityTier::High,
                },
                SourceConfig {
                    name: "gibs_landsat_weld".to_string(),
                    kind: SourceKind::GibsWms,
                    endpoint: gibs.to_string(),
                    layer: "Landsat_WELD_CorrectedReflectance_TrueColor_Global_Annual".to_string(),
                    quality: QualityTier::High,
                },
                SourceConfig {
                    name: "worldview_snapshot".to_string(),
                    kind: SourceKind::WorldviewSnapshot,
                    endpoint: worldview.to_string(),
                    layer: "MODIS_Terra_CorrectedReflectance_TrueColor".to_string(),
                    quality: QualityTier::Standard,
                },
            ],
            request_timeout: default_timeout(),
            width: default_width(),
            height: default_height(),
        }
    }
}

/* #endregion configuration */

pub struct ComparisonOrchestrator<T: Transport, S: SlotStore> {
    transport: T,
    sources: Vec<Box<dyn ImageSource>>,
    store: S,
    regions: HashMap<String,GeoRect>,
    config: ImageryConfig,

    // per-slot single flight guards - concurrent work on the same key serializes,
    // distinct keys proceed concurrently
    inflight: DashMap<SlotKey, Arc<Mutex<()>>>,
}

impl<T: Transport, S: SlotStore> ComparisonOrchestrator<T, S> {
    pub fn new (transport: T, store: S, regions: HashMap<String,GeoRect>, config: ImageryConfig)->Self {
        let sources = build_sources( &config.sources);
        ComparisonOrchestrator { transport, sources, store, regions, config, inflight: DashMap::new() }
    }

    pub fn store (&self)->&S { &self.store }
    pub fn transport (&self)->&T { &self.transport }

    pub fn available_years (&self, region: &str)->Result<Vec<i32>> {
        self.store.list_available_years(region)
    }

    pub fn cached_image (&self, key: &SlotKey)->Result<Option<EnhancedImage>> {
        self.store.get(key)
    }

    /// make sure the slot holds an enhanced image, fetching and storing it if it is
    /// missing (or unconditionally with `force`). Failures are reported as the year's
    /// outcome, not as errors - a comparison should survive one bad year
    pub async fn ensure_slot (&self, region: &str, year: i32, role: ImageRole, force: bool, cancel: &CancellationToken)->YearOutcome {
        match self.try_ensure_slot( region, year, role, force, cancel).await {
            Ok(outcome) => YearOutcome { year, role, outcome },
            Err(e) => {
                warn!("slot {}/{}/{} failed: {}", region, year, role, e);
                YearOutcome { year, role, outcome: SlotOutcome::Failed { reason: e.to_string() } }
            }
        }
    }

    async fn try_ensure_slot (&self, region: &str, year: i32, role: ImageRole, force: bool, cancel: &CancellationToken)->Result<SlotOutcome> {
        let bbox = *self.regions.get(region)
            .ok_or_else( || SierraImageryError::UnknownRegion( region.to_string()))?;

        let key = SlotKey::new( region, year, role);

        let guard = self.inflight.entry( key.clone())
            .or_insert_with( || Arc::new( Mutex::new(())))
            .clone();
        let _locked = guard.lock().await;

        if !force && self.store.has( &key) {
            return Ok( SlotOutcome::Cached)
        }

        let mut req = ImageRequest::for_year( region, bbox, year)?;
        req.width = self.config.width;
        req.height = self.config.height;

        let fetched = fetch_first_valid( &self.transport, &self.sources, &req, self.config.request_timeout, cancel).await?;
        let enhanced = enhance( &fetched.data)?;

        let meta = SlotMeta {
            width: enhanced.width,
            height: enhanced.height,
            n_bytes: enhanced.data.len(),
            fetched: utc_now(),
            source: fetched.source.clone(),
        };
        self.store.put( &key, &enhanced, &meta)?;

        info!("fetched slot {} from {} ({} bytes)", key, fetched.source, fetched.n_bytes);
        Ok( SlotOutcome::Fetched { source: fetched.source, n_bytes: fetched.n_bytes })
    }

    /// produce the baseline/current image pair for a region, both years concurrently.
    /// One year failing does not abort the other, `overall` is true only if both
    /// slots are in place afterwards
    pub async fn ensure_comparison (&self, region: &str, baseline_year: i32, current_year: i32, force: bool, cancel: &CancellationToken)->ComparisonResult {
        let (baseline, current) = tokio::join!(
            self.ensure_slot( region, baseline_year, ImageRole::Baseline, force, cancel),
            self.ensure_slot( region, current_year, ImageRole::Current, force, cancel)
        );

        let overall = baseline.succeeded() && current.succeeded();
        ComparisonResult { region: region.to_string(), baseline, current, overall }
    }

    pub async fn ensure_single_year (&self, region: &str, year: i32, force: bool, cancel: &CancellationToken)->YearOutcome {
        self.ensure_slot( region, year, ImageRole::SingleYear, force, cancel).await
    }

    /// fill slots for every year of the inclusive range, in ascending order, continuing
    /// past per-year failures
    pub async fn ensure_year_range (&self, region: &str, start_year: i32, end_year: i32, force: bool, cancel: &CancellationToken)->YearRangeResult {
        let mut outcomes: Vec<YearOutcome> = Vec::new();

        for year in start_year..=end_year {
            if cancel.is_cancelled() {
                break
            }
            outcomes.push( self.ensure_slot( region, year, ImageRole::SingleYear, force, cancel).await);
        }

        let n_success = outcomes.iter().filter( |o| o.succeeded()).count();
        YearRangeResult { region: region.to_string(), outcomes, n_success }
    }
}
