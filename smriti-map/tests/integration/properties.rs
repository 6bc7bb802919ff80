//! Property-based round-trip tests.
//!
//! Uses proptest to generate random sparse maps, then checks that saving
//! and loading reproduces them and that corrupted bodies fail cleanly.

use std::collections::HashSet;

use proptest::prelude::*;
use smriti_map::core::{Bounds, GridCoord, RawAccumulator, WorldPoint};
use smriti_map::grid::GridMap;
use smriti_map::io::{HEADER_SIZE, METADATA_SIZE};

use crate::common::{Raw8, encode, office_codec, office_legacy_codec, office_map};

// ===========================================================================
// Generators
// ===========================================================================

type PatchSpec = ((i32, i32), Vec<((usize, usize), [u8; 8])>);

fn arb_slot() -> impl Strategy<Value = (i32, i32)> {
    (0..8i32, 0..8i32)
}

fn arb_patch() -> impl Strategy<Value = PatchSpec> {
    (
        arb_slot(),
        proptest::collection::vec(((0..8usize, 0..8usize), any::<[u8; 8]>()), 0..12),
    )
}

/// Random map over the office frame: up to 16 active slots and 10 patches.
fn arb_office_map() -> impl Strategy<Value = GridMap<Raw8>> {
    (
        proptest::collection::vec(arb_slot(), 0..16),
        proptest::collection::vec(arb_patch(), 0..10),
    )
        .prop_map(|(active, patches)| {
            let mut map = office_map();
            let area: HashSet<GridCoord> = active.into_iter().map(GridCoord::from).collect();
            map.storage_mut().set_active_area(area);

            for (slot, cells) in patches {
                let slot = GridCoord::from(slot);
                if map.storage().patch_at(slot).is_none() {
                    map.storage_mut().allocate_patch_at(slot).unwrap();
                }
                let patch = map.storage_mut().patch_at_mut(slot).unwrap();
                for ((xx, yy), bytes) in cells {
                    patch.set_cell(xx, yy, RawAccumulator(bytes)).unwrap();
                }
            }
            map
        })
}

// ===========================================================================
// Properties
// ===========================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// load(save(map)) is equivalent to map, in both layouts.
    #[test]
    fn prop_roundtrip_equivalent(map in arb_office_map()) {
        for codec in [office_codec(), office_legacy_codec()] {
            let bytes = encode(&codec, &map);
            let loaded: GridMap<Raw8> = codec.read(bytes.as_slice()).unwrap();

            prop_assert!(loaded.equivalent(&map));
            prop_assert_eq!(
                loaded.storage().active_cell_count(),
                map.storage().active_cell_count()
            );
            // Re-encoding is byte-stable
            prop_assert_eq!(encode(&codec, &loaded), bytes);
        }
    }

    /// Frame metadata survives bit-for-bit.
    #[test]
    fn prop_metadata_roundtrip(
        cx in -10.0f64..10.0,
        cy in -10.0f64..10.0,
        half_w in 0.5f64..20.0,
        half_h in 0.5f64..20.0,
        delta in 0.05f64..1.0,
    ) {
        let center = WorldPoint::new(cx, cy);
        let bounds = Bounds::new(cx - half_w, cy - half_h, cx + half_w, cy + half_h);
        let map: GridMap<Raw8> = GridMap::new(center, bounds, delta, 3).unwrap();

        let bytes = encode(&office_codec(), &map);
        let loaded: GridMap<Raw8> = office_codec().read(bytes.as_slice()).unwrap();

        prop_assert!(loaded.equivalent(&map));
        prop_assert!(loaded.bounds().bit_eq(&bounds));
        prop_assert_eq!(loaded.map_size(), map.map_size());
    }

    /// Corrupting one body byte never panics.
    #[test]
    fn prop_corrupt_body_is_handled(
        map in arb_office_map(),
        position in any::<prop::sample::Index>(),
        value in any::<u8>(),
    ) {
        let mut bytes = encode(&office_codec(), &map);
        let body = HEADER_SIZE + METADATA_SIZE;
        let index = body + position.index(bytes.len() - body);
        bytes[index] = value;

        // Either a clean error or a map no larger than its input; repeated
        // active-area entries collapse into one
        let result: Result<GridMap<Raw8>, _> = office_codec().read(bytes.as_slice());
        if let Ok(loaded) = result {
            prop_assert!(encode(&office_codec(), &loaded).len() <= bytes.len());
        }
    }
}
