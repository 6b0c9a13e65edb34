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

//! image source descriptors and the fallback chain executor.
//!
//! Sources are configured as an ordered list of [`SourceConfig`] records and realized
//! as trait objects, one impl per provider protocol. The chain executor walks the list
//! in configured order and stops at the first response that passes validation.

use std::{collections::HashSet, future::Future, time::Duration};
use lazy_static::lazy_static;
use reqwest::Client;
use serde::{Serialize, Deserialize};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use sierra_common::net::{self, get_data, HttpResponseData};

use crate::{errors::*, FetchedImage, ImageRequest, SourceAttempt, MIN_IMAGE_BYTES};

lazy_static! {
    /// layer ids we know how to request. Requests naming any other layer fail before
    /// a network call is made
    static ref KNOWN_LAYERS: HashSet<&'static str> = HashSet::from( [
        "MODIS_Terra_CorrectedReflectance_TrueColor",
        "MODIS_Aqua_CorrectedReflectance_TrueColor",
        "VIIRS_SNPP_CorrectedReflectance_TrueColor",
        "Landsat_WELD_CorrectedReflectance_TrueColor_Global_Annual",
    ]);
}

/* #region source configuration *****************************************************************/

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum QualityTier {
    High,
    Standard,
}

/// the provider protocol a source speaks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SourceKind {
    GibsWms,
    WorldviewSnapshot,
}

/// one entry of the configured source list, in priority order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    pub name: String,
    pub kind: SourceKind,
    pub endpoint: String,
    pub layer: String,
    pub quality: QualityTier,
}

/* #endregion source configuration */

/* #region ImageSource **************************************************************************/

/// a single upstream imagery provider. Implementations only translate requests into
/// GET urls and judge responses, the chain executor owns all transport
pub trait ImageSource: Send + Sync {
    fn name (&self)->&str;
    fn quality (&self)->QualityTier;

    /// build the GET url for the given request, or fail without network access
    fn build_request (&self, req: &ImageRequest)->Result<String>;

    /// judge a transport-successful response, returning the rejection reason otherwise
    fn validate (&self, response: &HttpResponseData)->std::result::Result<(),String> {
        if !response.is_image() {
            return Err( format!("unexpected content type {:?}", response.content_type))
        }
        if response.body.len() < MIN_IMAGE_BYTES {
            return Err( format!("body too small ({} bytes)", response.body.len()))
        }
        Ok(())
    }
}

fn effective_layer<'a> (configured: &'a str, req: &'a ImageRequest)->Result<&'a str> {
    let layer = req.layer.as_deref().unwrap_or(configured);
    if !KNOWN_LAYERS.contains(layer) {
        return Err( SierraImageryError::UnknownLayer( layer.to_string()))
    }
    Ok(layer)
}

/// NASA GIBS WMS GetMap (1.3.0). Note the EPSG:4326 BBOX axis order is lat first
pub struct GibsWmsSource {
    config: SourceConfig,
}

impl ImageSource for GibsWmsSource {
    fn name (&self)->&str { &self.config.name }
    fn quality (&self)->QualityTier { self.config.quality }

    fn build_request (&self, req: &ImageRequest)->Result<String> {
        let layer = effective_layer( &self.config.layer, req)?;

        Ok( format!(
            "{}?SERVICE=WMS&REQUEST=GetMap&VERSION=1.3.0&LAYERS={}&STYLES=&FORMAT={}&CRS=EPSG:4326&BBOX={}&WIDTH={}&HEIGHT={}&TIME={}",
            self.config.endpoint, layer, req.format, req.bbox.bbox_13(), req.width, req.height,
            req.date.format("%Y-%m-%d")
        ))
    }
}

/// NASA Worldview snapshot API. Lower quality than GIBS WMS but more forgiving
/// about historical dates
pub struct WorldviewSnapshotSource {
    config: SourceConfig,
}

impl ImageSource for WorldviewSnapshotSource {
    fn name (&self)->&str { &self.config.name }
    fn quality (&self)->QualityTier { self.config.quality }

    fn build_request (&self, req: &ImageRequest)->Result<String> {
        let layer = effective_layer( &self.config.layer, req)?;

        Ok( format!(
            "{}?REQUEST=GetSnapshot&TIME={}&BBOX={}&CRS=EPSG:4326&LAYERS={}&FORMAT={}&WIDTH={}&HEIGHT={}",
            self.config.endpoint, req.date.format("%Y-%m-%d"), req.bbox.wsen_query(), layer,
            req.format, req.width, req.height
        ))
    }
}

/// turn the configured source list into trait objects, preserving order
pub fn build_sources (configs: &[SourceConfig])->Vec<Box<dyn ImageSource>> {
    configs.iter().map( |c| {
        match c.kind {
            SourceKind::GibsWms => Box::new( GibsWmsSource { config: c.clone() }) as Box<dyn ImageSource>,
            SourceKind::WorldviewSnapshot => Box::new( WorldviewSnapshotSource { config: c.clone() }),
        }
    }).collect()
}

/* #endregion ImageSource */

/* #region transport ****************************************************************************/

/// the HTTP seam of the fallback chain. Production code wraps a reqwest Client,
/// tests substitute scripted responses
pub trait Transport: Send + Sync {
    fn get (&self, url: &str, timeout: Duration)->impl Future<Output = net::Result<HttpResponseData>> + Send;
}

pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new ()->Self {
        HttpTransport { client: Client::new() }
    }
}

impl Transport for HttpTransport {
    async fn get (&self, url: &str, timeout: Duration)->net::Result<HttpResponseData> {
        get_data( &self.client, url, timeout).await
    }
}

/* #endregion transport */

/* #region chain executor ***********************************************************************/

/// walk the source list in priority order and return the first response that passes
/// validation. Per-source failures of any kind (bad url, transport error, rejected
/// response) are recorded and the chain continues; once a source succeeds no further
/// source is tried. Exhausting the list yields `ChainExhausted` carrying every
/// attempt with its reason
pub async fn fetch_first_valid<T: Transport> (
    transport: &T,
    sources: &[Box<dyn ImageSource>],
    req: &ImageRequest,
    timeout: Duration,
    cancel: &CancellationToken,
) -> Result<FetchedImage> {
    if sources.is_empty() {
        return Err( config_error("no image sources configured"))
    }

    let mut attempts: Vec<SourceAttempt> = Vec::with_capacity( sources.len());

    for source in sources {
        if cancel.is_cancelled() {
            return Err( SierraImageryError::Cancelled( format!("fetch for {} cancelled", req.region)))
        }

        let url = match source.build_request(req) {
            Ok(url) => url,
            Err(SierraImageryError::UnknownLayer(layer)) if req.layer.is_some() => {
                // an explicitly requested unknown layer is a caller error, not a source failure
                return Err( SierraImageryError::UnknownLayer(layer))
            }
            Err(e) => {
                // a misconfigured source fails fast for that source only, the chain continues
                attempts.push( SourceAttempt { source: source.name().to_string(), reason: e.to_string() });
                continue
            }
        };

        debug!("trying source {} for {}", source.name(), req.region);

        let response = tokio::select! {
            _ = cancel.cancelled() => {
                return Err( SierraImageryError::Cancelled( format!("fetch for {} cancelled", req.region)))
            }
            res = transport.get( &url, timeout) => res
        };

        match response {
            Ok(data) => {
                if !data.is_success() {
                    attempts.push( SourceAttempt {
                        source: source.name().to_string(),
                        reason: format!("http status {}", data.status)
                    });
                    continue
                }
                match source.validate( &data) {
                    Ok(()) => {
                        let n_bytes = data.body.len();
                        return Ok( FetchedImage { data: data.body, n_bytes, source: source.name().to_string() })
                    }
                    Err(reason) => {
                        warn!("source {} rejected for {}: {}", source.name(), req.region, reason);
                        attempts.push( SourceAttempt { source: source.name().to_string(), reason });
                    }
                }
            }
            Err(e) => {
                attempts.push( SourceAttempt { source: source.name().to_string(), reason: e.to_string() });
            }
        }
    }

    Err( SierraImageryError::ChainExhausted( attempts))
}

/* #endregion chain executor */
