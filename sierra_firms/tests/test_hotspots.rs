use chrono::{TimeZone, Utc};

use sierra_common::geo::GeoRect;
use sierra_firms::{parse_csv_hotspots, parse_hotspots, parse_json_hotspots, Confidence, SierraFirmsError};

const VIIRS_CSV: &str = "\
latitude,longitude,bright_ti4,scan,track,acq_date,acq_time,satellite,instrument,confidence,version,bright_ti5,frp,daynight
15.1234,121.5678,330.5,0.39,0.36,2023-07-01,0512,N,VIIRS,n,2.0NRT,290.1,2.4,D
16.5000,122.0000,345.2,0.41,0.37,2023-07-01,0512,N,VIIRS,h,2.0NRT,295.7,5.1,D
10.0000,125.0000,310.0,0.40,0.36,2023-07-01,0513,N,VIIRS,l,2.0NRT,285.3,1.2,D
";

fn sierra_madre ()->GeoRect {
    GeoRect::from_wsen( 120.5, 14.0, 122.8, 17.5)
}

#[test]
fn test_csv_rows_are_normalized () {
    let (records, n_skipped) = parse_csv_hotspots( VIIRS_CSV).unwrap();

    assert_eq!( records.len(), 3);
    assert_eq!( n_skipped, 0);

    let first = &records[0];
    assert_eq!( first.pos.lat_deg, 15.1234);
    assert_eq!( first.pos.lon_deg, 121.5678);
    assert_eq!( first.brightness, 330.5);
    assert_eq!( first.confidence, Confidence::Nominal);
    assert_eq!( first.acquired, Utc.with_ymd_and_hms( 2023, 7, 1, 5, 12, 0).unwrap());

    assert_eq!( records[1].confidence, Confidence::High);
    assert_eq!( records[2].confidence, Confidence::Low);
}

#[test]
fn test_bbox_filter_is_edge_inclusive () {
    let (records, _) = parse_csv_hotspots( VIIRS_CSV).unwrap();
    let bbox = sierra_madre();

    let within: Vec<_> = records.iter().filter( |r| bbox.contains( &r.pos)).collect();
    assert_eq!( within.len(), 2); // the Mindanao detection is outside

    // a detection exactly on the boundary counts as inside
    let on_edge = sierra_firms::FireRecord {
        pos: sierra_common::geo::LatLon::new( 14.0, 120.5),
        brightness: 300.0,
        confidence: Confidence::Low,
        acquired: Utc.with_ymd_and_hms( 2023, 7, 1, 0, 0, 0).unwrap(),
    };
    assert!( bbox.contains( &on_edge.pos));
}

#[test]
fn test_malformed_rows_are_skipped_and_counted () {
    let csv = "\
latitude,longitude,bright_ti4,scan,track,acq_date,acq_time,satellite,instrument,confidence,version,bright_ti5,frp,daynight
15.1,121.5,330.5,0.39,0.36,2023-07-01,0512,N,VIIRS,n,2.0NRT,290.1,2.4,D
not_a_number,121.5,330.5,0.39,0.36,2023-07-01,0512,N,VIIRS,n,2.0NRT,290.1,2.4,D
15.2,121.6,331.0,0.39,0.36,bad_date,0512,N,VIIRS,n,2.0NRT,290.1,2.4,D
15.3,121.7,332.0,0.39,0.36,2023-07-01,0512,N,VIIRS,x,2.0NRT,290.1,2.4,D
";
    let (records, n_skipped) = parse_csv_hotspots( csv).unwrap();

    assert_eq!( records.len(), 1);
    assert_eq!( n_skipped, 3);
}

#[test]
fn test_fully_unparseable_response_is_an_error () {
    let csv = "\
latitude,longitude,bright_ti4,scan,track,acq_date,acq_time,satellite,instrument,confidence,version,bright_ti5,frp,daynight
oops,121.5,330.5,0.39,0.36,2023-07-01,0512,N,VIIRS,n,2.0NRT,290.1,2.4,D
also_bad,121.5,330.5,0.39,0.36,2023-07-01,0512,N,VIIRS,n,2.0NRT,290.1,2.4,D
";
    let err = parse_csv_hotspots( csv).unwrap_err();
    assert!( matches!( err, SierraFirmsError::ParseError(_)));
}

#[test]
fn test_empty_response_is_success () {
    let header_only = "latitude,longitude,bright_ti4,scan,track,acq_date,acq_time,satellite,instrument,confidence,version,bright_ti5,frp,daynight\n";

    let (records, n_skipped) = parse_csv_hotspots( header_only).unwrap();
    assert!( records.is_empty());
    assert_eq!( n_skipped, 0);
}

#[test]
fn test_json_variant () {
    let json = r#"[
        {"latitude": 15.1, "longitude": 121.5, "brightness": 320.7, "acq_date": "2023-07-01", "acq_time": 512, "confidence": 85},
        {"latitude": "16.2", "longitude": "122.1", "bright_ti4": 340.0, "acq_date": "2023-07-01", "acq_time": "0512", "confidence": "n"},
        {"latitude": 15.5}
    ]"#;

    let (records, n_skipped) = parse_json_hotspots( json).unwrap();

    assert_eq!( records.len(), 2);
    assert_eq!( n_skipped, 1);
    assert_eq!( records[0].confidence, Confidence::High); // 85 percent
    assert_eq!( records[1].brightness, 340.0);
    assert_eq!( records[1].acquired, Utc.with_ymd_and_hms( 2023, 7, 1, 5, 12, 0).unwrap());
}

#[test]
fn test_parser_selection_by_content_type () {
    let json = r#"[{"latitude": 15.1, "longitude": 121.5, "brightness": 320.7, "acq_date": "2023-07-01", "acq_time": 512, "confidence": "h"}]"#;

    let (from_json, _) = parse_hotspots( Some("application/json"), json).unwrap();
    assert_eq!( from_json.len(), 1);

    let (from_csv, _) = parse_hotspots( Some("text/csv"), VIIRS_CSV).unwrap();
    assert_eq!( from_csv.len(), 3);

    // no content type defaults to CSV, the area endpoint's wire format
    let (fallback, _) = parse_hotspots( None, VIIRS_CSV).unwrap();
    assert_eq!( fallback.len(), 3);
}

#[test]
fn test_numeric_confidence_mapping () {
    assert_eq!( Confidence::from_code("10").unwrap(), Confidence::Low);
    assert_eq!( Confidence::from_code("29.9").unwrap(), Confidence::Low);
    assert_eq!( Confidence::from_code("30").unwrap(), Confidence::Nominal);
    assert_eq!( Confidence::from_code("79").unwrap(), Confidence::Nominal);
    assert_eq!( Confidence::from_code("80").unwrap(), Confidence::High);
    assert_eq!( Confidence::from_code("100").unwrap(), Confidence::High);
    assert!( Confidence::from_code("maybe").is_err());
}
