//! On-disk and in-memory round trips.

use std::collections::HashSet;

use approx::assert_relative_eq;
use smriti_map::core::{Bounds, GridCoord, PointAccumulator, RawAccumulator, WorldPoint};
use smriti_map::grid::{GridConfig, GridMap, MapConfig};
use smriti_map::io::{HEADER_SIZE, MapCodec, MapIoError, METADATA_SIZE, load_map, save_map};

use crate::common::{
    Raw8, encode, fill_patch, init_logging, office_codec, office_legacy_codec, office_map,
    set_active, tagged,
};

#[test]
fn test_sparse_cell_roundtrip() {
    init_logging();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("sparse.map");

    let mut map = office_map();
    let slot = GridCoord::new(4, 4);
    fill_patch(&mut map, slot, &[(3, 5)]);

    office_codec().save(&map, &path).unwrap();
    let loaded: GridMap<Raw8> = office_codec().load(&path).unwrap();

    assert!(loaded.equivalent(&map));
    assert_eq!(loaded.storage().allocated_patch_count(), 1);

    let patch = loaded.storage().patch_at(slot).unwrap();
    assert_eq!(patch.active_count(), 1);
    assert_eq!(patch.cell_at(3, 5), Some(&tagged(slot, 3, 5)));
    for xx in 0..8 {
        for yy in 0..8 {
            if (xx, yy) != (3, 5) {
                assert_eq!(patch.cell_at(xx, yy), None, "cell ({xx}, {yy}) should be unset");
            }
        }
    }
}

#[test]
fn test_active_area_without_patch() {
    init_logging();
    let mut map = office_map();
    set_active(&mut map, &[(2, 2)]);

    let bytes = encode(&office_codec(), &map);
    let loaded: GridMap<Raw8> = office_codec().read(bytes.as_slice()).unwrap();

    assert_eq!(
        loaded.storage().active_area(),
        &HashSet::from([GridCoord::new(2, 2)])
    );
    assert!(loaded.storage().patch_at(GridCoord::new(2, 2)).is_none());
    assert_eq!(loaded.storage().allocated_patch_count(), 0);
}

#[test]
fn test_patch_outside_active_area() {
    let mut map = office_map();
    set_active(&mut map, &[(0, 0), (7, 7)]);
    fill_patch(&mut map, GridCoord::new(3, 1), &[(0, 0), (7, 7)]);
    fill_patch(&mut map, GridCoord::new(0, 6), &[]);

    let bytes = encode(&office_codec(), &map);
    let loaded: GridMap<Raw8> = office_codec().read(bytes.as_slice()).unwrap();

    assert!(loaded.equivalent(&map));
    // An allocated patch with no set cells is still listed
    assert!(loaded.storage().patch_at(GridCoord::new(0, 6)).unwrap().is_empty());
}

#[test]
fn test_empty_map_roundtrip() {
    let map = office_map();

    let headered = encode(&office_codec(), &map);
    assert_eq!(headered.len(), HEADER_SIZE + METADATA_SIZE + 8);

    let legacy = encode(&office_legacy_codec(), &map);
    assert_eq!(legacy.len(), 64);

    let loaded: GridMap<Raw8> = office_legacy_codec().read(legacy.as_slice()).unwrap();
    assert!(loaded.equivalent(&map));
    assert!(loaded.storage().active_area().is_empty());
}

#[test]
fn test_metadata_bit_exact() {
    let center = WorldPoint::new(0.1, -0.3);
    let bounds = Bounds::new(-3.3, -2.7, 4.1, 2.9);
    let map: GridMap<Raw8> = GridMap::new(center, bounds, 0.05, 3).unwrap();

    let bytes = encode(&office_codec(), &map);
    let loaded: GridMap<Raw8> = office_codec().read(bytes.as_slice()).unwrap();

    assert!(loaded.center().bit_eq(&center));
    assert_eq!(loaded.delta().to_bits(), 0.05f64.to_bits());
    assert!(loaded.bounds().bit_eq(&bounds));
    assert_eq!(loaded.map_size(), map.map_size());
    assert_eq!(loaded.storage().size(), map.storage().size());
}

#[test]
fn test_save_is_deterministic() {
    let mut a = office_map();
    let mut b = office_map();

    let slots = [(1, 2), (5, 0), (0, 7), (3, 3)];
    set_active(&mut a, &slots);
    let mut reversed = slots;
    reversed.reverse();
    set_active(&mut b, &reversed);

    for map in [&mut a, &mut b] {
        fill_patch(map, GridCoord::new(1, 2), &[(1, 1)]);
    }

    assert_eq!(encode(&office_codec(), &a), encode(&office_codec(), &b));
}

#[test]
fn test_legacy_and_headered_bodies_match() {
    let mut map = office_map();
    set_active(&mut map, &[(6, 1)]);
    fill_patch(&mut map, GridCoord::new(6, 1), &[(2, 3), (7, 0)]);

    let headered = encode(&office_codec(), &map);
    let legacy = encode(&office_legacy_codec(), &map);
    assert_eq!(&headered[HEADER_SIZE..], legacy.as_slice());
}

#[test]
fn test_point_accumulator_roundtrip() {
    init_logging();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("scan.map");

    let mut map = GridConfig::for_area(10.0, 10.0, 0.05)
        .build_map::<PointAccumulator>()
        .unwrap();
    let wall = [
        WorldPoint::new(2.0, 0.0),
        WorldPoint::new(2.0, 0.02),
        WorldPoint::new(-3.5, 1.25),
    ];
    for &point in &wall {
        let cell = map.world_to_map(point);
        let acc = map.cell_mut_or_allocate(cell).unwrap().get_or_insert_with(Default::default);
        acc.update(true, point);
        acc.update(false, point);
    }

    save_map(&map, &path).unwrap();
    let loaded = load_map::<PointAccumulator>(&path).unwrap();
    assert!(loaded.equivalent(&map));

    let cell = loaded.cell_at_world(WorldPoint::new(2.0, 0.0)).unwrap();
    assert_eq!(cell.n, 2);
    assert_eq!(cell.visits, 4);
    let mean = cell.mean().unwrap();
    assert_relative_eq!(mean.x, 2.0, epsilon = 1e-6);
    assert_relative_eq!(mean.y, 0.01, epsilon = 1e-6);
    assert_relative_eq!(cell.occupancy().unwrap(), 0.5);
}

#[test]
fn test_save_requires_codec_patch_magnitude() {
    init_logging();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("office.map");
    std::fs::write(&path, b"previous").unwrap();

    let mut map = office_map();
    let cell = GridCoord::new(11, 13);
    *map.cell_mut_or_allocate(cell).unwrap() = Some(RawAccumulator([1, 2, 3, 4, 5, 6, 7, 8]));

    for codec in [MapCodec::default(), MapCodec::legacy()] {
        let err = codec.save(&map, &path).unwrap_err();
        assert!(matches!(
            err,
            MapIoError::PatchMagnitudeMismatch {
                expected: 5,
                found: 3
            }
        ));
    }
    assert!(matches!(
        save_map(&map, &path),
        Err(MapIoError::PatchMagnitudeMismatch { .. })
    ));
    assert_eq!(std::fs::read(&path).unwrap(), b"previous");

    for codec in [office_codec(), office_legacy_codec()] {
        codec.save(&map, &path).unwrap();
        let loaded: GridMap<Raw8> = codec.load(&path).unwrap();
        assert_eq!(loaded.patch_magnitude(), 3);
        assert_eq!(loaded.cell(cell), map.cell(cell));
        assert!(loaded.equivalent(&map));
    }
}

#[test]
fn test_codec_from_yaml_config() {
    let dir = tempfile::tempdir().unwrap();
    let config_path = dir.path().join("map.yaml");
    let map_path = dir.path().join("legacy.map");

    std::fs::write(
        &config_path,
        "grid:\n  patch_magnitude: 3\n  delta: 0.25\n  bounds: { xmin: -8.0, ymin: -8.0, xmax: 8.0, ymax: 8.0 }\ncodec:\n  legacy: true\n",
    )
    .unwrap();
    let config = MapConfig::from_yaml_file(&config_path).unwrap();
    let codec = MapCodec::from_config(&config);

    let mut map: GridMap<Raw8> = config.grid.build_map().unwrap();
    fill_patch(&mut map, GridCoord::new(7, 7), &[(7, 7)]);
    codec.save(&map, &map_path).unwrap();

    assert_eq!(std::fs::read(&map_path).unwrap(), encode(&office_legacy_codec(), &map));
    let loaded: GridMap<Raw8> = codec.load(&map_path).unwrap();
    assert!(loaded.equivalent(&map));
}

#[test]
fn test_save_overwrites_existing_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("map.bin");
    std::fs::write(&path, vec![0xEE; 4096]).unwrap();

    let map = office_map();
    office_codec().save(&map, &path).unwrap();

    assert_eq!(std::fs::read(&path).unwrap(), encode(&office_codec(), &map));
}

#[test]
fn test_open_failures() {
    let dir = tempfile::tempdir().unwrap();
    let missing_dir = dir.path().join("no_such_dir").join("map.bin");

    let map = office_map();
    let err = office_codec().save(&map, &missing_dir).unwrap_err();
    assert!(matches!(err, MapIoError::Open { ref path, .. } if path == &missing_dir));
    assert!(!missing_dir.exists());

    let err = office_codec()
        .load::<Raw8>(&dir.path().join("absent.map"))
        .unwrap_err();
    assert!(matches!(err, MapIoError::Open { .. }));
}
