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

//! fetch, enhance and cache satellite imagery for a monitoring region.
//! One year fills a single slot, two years produce a baseline/current comparison,
//! a range fills one slot per year

use std::collections::HashMap;
use anyhow::{anyhow, Result};
use tokio_util::sync::CancellationToken;

use sierra_common::{config::load_config, define_cli, geo::GeoRect};
use sierra_imagery::{
    default_regions, ComparisonOrchestrator, FileStore, HttpTransport, ImageryConfig,
};

define_cli! { ARGS [about="get_imagery - fetch and enhance satellite imagery for a region"] =
    refresh: bool [help="re-fetch even if the slot is already cached", long],
    data_dir: String [help="root directory of the slot cache", long, default_value="./data"],
    region: String [help="region key, e.g. sierra_madre", long, short, default_value="sierra_madre"],
    years: Vec<i32> [help="one year (single slot), two years (comparison) or --range", required=true],
    range: bool [help="treat the two given years as an inclusive range", long]
}

#[tokio::main]
async fn main ()->Result<()> {
    tracing_subscriber::fmt().init();

    let config: ImageryConfig = load_config("imagery").unwrap_or_default();
    let regions: HashMap<String,GeoRect> = load_config("regions").unwrap_or_else( |_| default_regions());

    let store = FileStore::new( &ARGS.data_dir)?;
    let orchestrator = ComparisonOrchestrator::new( HttpTransport::new(), store, regions, config);
    let cancel = CancellationToken::new();

    match ARGS.years.as_slice() {
        [year] => {
            let outcome = orchestrator.ensure_single_year( &ARGS.region, *year, ARGS.refresh, &cancel).await;
            println!("{}", serde_json::to_string_pretty( &outcome)?);
        }
        [start, end] if ARGS.range => {
            let result = orchestrator.ensure_year_range( &ARGS.region, *start, *end, ARGS.refresh, &cancel).await;
            println!("{}", result.to_json_pretty()?);
        }
        [baseline, current] => {
            let result = orchestrator.ensure_comparison( &ARGS.region, *baseline, *current, ARGS.refresh, &cancel).await;
            println!("{}", result.to_json_pretty()?);
        }
        _ => return Err( anyhow!("expecting one or two years"))
    }

    Ok(())
}
