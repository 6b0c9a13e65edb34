use std::{collections::HashMap, io::Cursor, sync::atomic::{AtomicUsize, Ordering}, time::Duration};
use bytes::Bytes;
use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use tokio_util::sync::CancellationToken;

use sierra_common::geo::{builtin_regions, GeoRect};
use sierra_common::net::{self, HttpResponseData, SierraNetError};
use sierra_imagery::{
    ComparisonOrchestrator, FileStore, ImageRole, ImageryConfig, SlotKey, SlotOutcome,
    SlotStore, Transport,
};

/// serves one noisy PNG for every request, except for years listed as down, and
/// counts how many requests were made
struct FakeSatellite {
    body: Bytes,
    down_years: Vec<i32>,
    n_requests: AtomicUsize,
}

impl FakeSatellite {
    fn new (down_years: Vec<i32>)->Self {
        let mut img = RgbImage::new( 128, 128);
        let mut seed: u32 = 0x9e37_79b9;
        for (_x, _y, px) in img.enumerate_pixels_mut() {
            seed = seed.wrapping_mul(1664525).wrapping_add(1013904223);
            *px = Rgb( [(seed >> 8) as u8, (seed >> 16) as u8, (seed >> 24) as u8]);
        }
        let mut buf: Vec<u8> = Vec::new();
        DynamicImage::ImageRgb8(img).write_to( &mut Cursor::new( &mut buf), ImageFormat::Png).unwrap();
        assert!( buf.len() >= 5000); // must pass chain validation

        FakeSatellite { body: Bytes::from(buf), down_years, n_requests: AtomicUsize::new(0) }
    }

    fn request_count (&self)->usize {
        self.n_requests.load( Ordering::SeqCst)
    }
}

impl Transport for FakeSatellite {
    async fn get (&self, url: &str, _timeout: Duration)->net::Result<HttpResponseData> {
        self.n_requests.fetch_add( 1, Ordering::SeqCst);

        for year in &self.down_years {
            if url.contains( &format!("TIME={}-07-01", year)) {
                return Err( SierraNetError::OpFailed("connection refused".to_string()))
            }
        }
        Ok( HttpResponseData {
            status: 200,
            content_type: Some("image/png".to_string()),
            body: self.body.clone(),
        })
    }
}

fn orchestrator (dir: &std::path::Path, down_years: Vec<i32>)->ComparisonOrchestrator<FakeSatellite, FileStore> {
    let store = FileStore::new(dir).unwrap();
    let regions: HashMap<String,GeoRect> = builtin_regions();
    ComparisonOrchestrator::new( FakeSatellite::new(down_years), store, regions, ImageryConfig::default())
}

#[tokio::test]
async fn test_comparison_fills_both_slots () {
    let dir = tempfile::tempdir().unwrap();
    let orch = orchestrator( dir.path(), vec![]);
    let cancel = CancellationToken::new();

    let result = orch.ensure_comparison( "sierra_madre", 2015, 2023, false, &cancel).await;

    assert!( result.overall);
    assert!( matches!( result.baseline.outcome, SlotOutcome::Fetched {..}));
    assert!( matches!( result.current.outcome, SlotOutcome::Fetched {..}));

    // overall success implies both slots are actually stored
    assert!( orch.store().has( &SlotKey::new( "sierra_madre", 2015, ImageRole::Baseline)));
    assert!( orch.store().has( &SlotKey::new( "sierra_madre", 2023, ImageRole::Current)));
}

#[tokio::test]
async fn test_one_failed_year_does_not_abort_the_other () {
    let dir = tempfile::tempdir().unwrap();
    let orch = orchestrator( dir.path(), vec![2015]);
    let cancel = CancellationToken::new();

    let result = orch.ensure_comparison( "sierra_madre", 2015, 2023, false, &cancel).await;

    assert!( !result.overall);
    assert!( matches!( result.baseline.outcome, SlotOutcome::Failed {..}));
    assert!( matches!( result.current.outcome, SlotOutcome::Fetched {..}));
    assert!( orch.store().has( &SlotKey::new( "sierra_madre", 2023, ImageRole::Current)));
    assert!( !orch.store().has( &SlotKey::new( "sierra_madre", 2015, ImageRole::Baseline)));
}

#[tokio::test]
async fn test_cached_slot_is_not_refetched () {
    let dir = tempfile::tempdir().unwrap();
    let orch = orchestrator( dir.path(), vec![]);
    let cancel = CancellationToken::new();

    let first = orch.ensure_single_year( "manila", 2020, false, &cancel).await;
    assert!( matches!( first.outcome, SlotOutcome::Fetched {..}));
    let n_after_first = 1;
    assert_eq!( orch_transport_count( &orch), n_after_first);

    let second = orch.ensure_single_year( "manila", 2020, false, &cancel).await;
    assert!( matches!( second.outcome, SlotOutcome::Cached));
    assert_eq!( orch_transport_count( &orch), n_after_first); // no network traffic
}

#[tokio::test]
async fn test_force_refresh_refetches () {
    let dir = tempfile::tempdir().unwrap();
    let orch = orchestrator( dir.path(), vec![]);
    let cancel = CancellationToken::new();

    orch.ensure_single_year( "manila", 2020, false, &cancel).await;
    let refreshed = orch.ensure_single_year( "manila", 2020, true, &cancel).await;

    assert!( matches!( refreshed.outcome, SlotOutcome::Fetched {..}));
    assert_eq!( orch_transport_count( &orch), 2);
}

#[tokio::test]
async fn test_year_range_continues_past_failures () {
    let dir = tempfile::tempdir().unwrap();
    let orch = orchestrator( dir.path(), vec![2019]);
    let cancel = CancellationToken::new();

    let result = orch.ensure_year_range( "luzon_wide", 2018, 2021, false, &cancel).await;

    assert_eq!( result.outcomes.len(), 4);
    assert_eq!( result.n_success, 3);

    let years: Vec<i32> = result.outcomes.iter().map( |o| o.year).collect();
    assert_eq!( years, vec![2018, 2019, 2020, 2021]); // ascending
    assert!( !result.outcomes[1].succeeded());

    assert_eq!( orch.available_years("luzon_wide").unwrap(), vec![2018, 2020, 2021]);
}

#[tokio::test]
async fn test_unknown_region_is_a_failed_outcome () {
    let dir = tempfile::tempdir().unwrap();
    let orch = orchestrator( dir.path(), vec![]);
    let cancel = CancellationToken::new();

    let outcome = orch.ensure_single_year( "atlantis", 2020, false, &cancel).await;

    match outcome.outcome {
        SlotOutcome::Failed { reason } => assert!( reason.contains("atlantis")),
        other => panic!("expected failure, got {:?}", other),
    }
    assert_eq!( orch_transport_count( &orch), 0);
}

#[tokio::test]
async fn test_out_of_range_year_is_a_failed_outcome () {
    let dir = tempfile::tempdir().unwrap();
    let orch = orchestrator( dir.path(), vec![]);
    let cancel = CancellationToken::new();

    // beyond the representable calendar range, must not panic
    let outcome = orch.ensure_single_year( "manila", 1_000_000, false, &cancel).await;

    match outcome.outcome {
        SlotOutcome::Failed { reason } => assert!( reason.contains("out of range")),
        other => panic!("expected failure, got {:?}", other),
    }
    assert_eq!( orch_transport_count( &orch), 0);
}

#[tokio::test]
async fn test_stored_slot_is_enhancer_output () {
    let dir = tempfile::tempdir().unwrap();
    let orch = orchestrator( dir.path(), vec![]);
    let cancel = CancellationToken::new();

    orch.ensure_single_year( "manila", 2020, false, &cancel).await;

    let key = SlotKey::new( "manila", 2020, ImageRole::SingleYear);
    let stored = orch.cached_image( &key).unwrap().unwrap();

    // never the raw upstream bytes
    let raw = FakeSatellite::new( vec![]).body;
    assert_ne!( stored.data.as_slice(), raw.as_ref());
    assert!( image::load_from_memory( &stored.data).is_ok());
}

fn orch_transport_count (orch: &ComparisonOrchestrator<FakeSatellite, FileStore>)->usize {
    orch.transport().request_count()
}
