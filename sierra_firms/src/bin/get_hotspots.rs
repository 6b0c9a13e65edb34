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

//! retrieve active fire detections for a monitoring region and print them as JSON

use std::collections::HashMap;
use anyhow::{anyhow, Result};
use reqwest::Client;

use sierra_common::{config::load_config, define_cli, geo::{builtin_regions, GeoRect}};
use sierra_firms::{fetch_active_fires, FirmsConfig};

define_cli! { ARGS [about="get_hotspots - retrieve active fire detections for a region"] =
    region: String [help="region key, e.g. sierra_madre", long, short, default_value="sierra_madre"],
    days: u32 [help="lookback window in days", long, short, default_value="3"]
}

#[tokio::main]
async fn main ()->Result<()> {
    tracing_subscriber::fmt().init();

    let mut config: FirmsConfig = load_config("firms")?;
    if let Ok(map_key) = std::env::var("FIRMS_MAP_KEY") {
        config.map_key = map_key;
    }
    if config.map_key.is_empty() {
        return Err( anyhow!("no FIRMS map key (set it in firms.ron or the FIRMS_MAP_KEY env var)"))
    }

    let regions: HashMap<String,GeoRect> = load_config("regions").unwrap_or_else( |_| builtin_regions());
    let bbox = regions.get( ARGS.region.as_str())
        .ok_or_else( || anyhow!("unknown region {}", ARGS.region))?;

    let client = Client::new();
    let summary = fetch_active_fires( &client, &config, &ARGS.region, bbox, ARGS.days).await?;

    println!("{}", summary.to_json_pretty()?);
    Ok(())
}
