use chrono::Utc;

use sierra_imagery::{EnhancedImage, FileStore, ImageRole, SlotKey, SlotMeta, SlotStore};

fn test_image (fill: u8)->EnhancedImage {
    EnhancedImage {
        data: vec![fill; 6000],
        width: 1024,
        height: 1024,
        format: "image/png".to_string(),
    }
}

fn test_meta (img: &EnhancedImage, source: &str)->SlotMeta {
    SlotMeta {
        width: img.width,
        height: img.height,
        n_bytes: img.data.len(),
        fetched: Utc::now(),
        source: source.to_string(),
    }
}

#[test]
fn test_put_then_get_roundtrip () {
    let dir = tempfile::tempdir().unwrap();
    let store = FileStore::new( dir.path()).unwrap();

    let key = SlotKey::new( "sierra_madre", 2023, ImageRole::Current);
    assert!( !store.has( &key));
    assert!( store.get( &key).unwrap().is_none());

    let img = test_image(7);
    store.put( &key, &img, &test_meta( &img, "gibs_modis_terra")).unwrap();

    assert!( store.has( &key));
    let loaded = store.get( &key).unwrap().unwrap();
    assert_eq!( loaded.data, img.data);
    assert_eq!( loaded.width, 1024);

    let meta = store.meta( &key).unwrap().unwrap();
    assert_eq!( meta.source, "gibs_modis_terra");
    assert_eq!( meta.n_bytes, 6000);
}

#[test]
fn test_put_overwrites_existing_slot () {
    let dir = tempfile::tempdir().unwrap();
    let store = FileStore::new( dir.path()).unwrap();
    let key = SlotKey::new( "sierra_madre", 2023, ImageRole::Baseline);

    let first = test_image(1);
    store.put( &key, &first, &test_meta( &first, "gibs_modis_terra")).unwrap();

    let second = test_image(2);
    store.put( &key, &second, &test_meta( &second, "worldview_snapshot")).unwrap();

    let loaded = store.get( &key).unwrap().unwrap();
    assert_eq!( loaded.data, second.data);
    assert_eq!( store.meta( &key).unwrap().unwrap().source, "worldview_snapshot");
}

#[test]
fn test_roles_are_distinct_slots () {
    let dir = tempfile::tempdir().unwrap();
    let store = FileStore::new( dir.path()).unwrap();

    let baseline = SlotKey::new( "manila", 2015, ImageRole::Baseline);
    let current = SlotKey::new( "manila", 2015, ImageRole::Current);

    let img = test_image(3);
    store.put( &baseline, &img, &test_meta( &img, "gibs_modis_terra")).unwrap();

    assert!( store.has( &baseline));
    assert!( !store.has( &current));
}

#[test]
fn test_list_available_years_is_ascending () {
    let dir = tempfile::tempdir().unwrap();
    let store = FileStore::new( dir.path()).unwrap();

    let img = test_image(4);
    for year in [2021, 2015, 2018] {
        let key = SlotKey::new( "luzon_wide", year, ImageRole::SingleYear);
        store.put( &key, &img, &test_meta( &img, "gibs_modis_terra")).unwrap();
    }

    assert_eq!( store.list_available_years("luzon_wide").unwrap(), vec![2015, 2018, 2021]);
    assert!( store.list_available_years("sierra_madre").unwrap().is_empty());
}

#[test]
fn test_year_dir_without_slot_files_is_not_listed () {
    let dir = tempfile::tempdir().unwrap();
    let store = FileStore::new( dir.path()).unwrap();

    let img = test_image(5);
    let key = SlotKey::new( "manila", 2020, ImageRole::SingleYear);
    store.put( &key, &img, &test_meta( &img, "gibs_modis_terra")).unwrap();

    // a leftover year dir with no slot image must not count as available
    std::fs::create_dir_all( dir.path().join("manila").join("2021")).unwrap();

    assert_eq!( store.list_available_years("manila").unwrap(), vec![2020]);
}
