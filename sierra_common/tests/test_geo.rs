use sierra_common::geo::{builtin_regions, GeoRect, LatLon};

#[test]
fn test_containment_is_edge_inclusive () {
    let rect = GeoRect::from_wsen( 120.5, 14.0, 122.8, 17.5);

    assert!( rect.contains_degrees( 15.0, 121.0)); // interior
    assert!( rect.contains_degrees( 14.0, 120.5)); // sw corner
    assert!( rect.contains_degrees( 17.5, 122.8)); // ne corner
    assert!( rect.contains_degrees( 14.0, 121.0)); // south edge

    assert!( !rect.contains_degrees( 13.999, 121.0));
    assert!( !rect.contains_degrees( 15.0, 122.801));

    assert!( rect.contains( &LatLon::new( 16.0, 122.0)));
}

#[test]
fn test_query_parameter_order () {
    let rect = GeoRect::from_wsen( 120.5, 14.0, 122.8, 17.5);

    assert_eq!( rect.wsen_query(), "120.5,14,122.8,17.5");
    assert_eq!( rect.bbox_13(), "14,120.5,17.5,122.8");
}

#[test]
fn test_builtin_regions () {
    let regions = builtin_regions();

    let sierra_madre = regions.get("sierra_madre").unwrap();
    assert_eq!( sierra_madre.south(), 14.0);
    assert_eq!( sierra_madre.north(), 17.5);
    assert_eq!( sierra_madre.west(), 120.5);
    assert_eq!( sierra_madre.east(), 122.8);

    assert!( regions.contains_key("manila"));
    assert!( regions.contains_key("luzon_wide"));
}

#[test]
fn test_bbox_ron_roundtrip () {
    let rect = GeoRect::from_wsen( 119.5, 12.5, 124.0, 19.0);
    let ser = ron::to_string(&rect).unwrap();
    let de: GeoRect = ron::from_str(&ser).unwrap();
    assert_eq!( de, rect);
}
