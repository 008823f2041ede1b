//! Property-based tests for the paging engine.
//!
//! Uses proptest to check the bookkeeping invariants over random traces.

use proptest::prelude::*;
use vm_sim::{Geometry, Operation, Outcome, PolicyKind, VmManager};

// ============================================================================
// Strategies
// ============================================================================

fn policy() -> impl Strategy<Value = PolicyKind> {
    prop_oneof![Just(PolicyKind::Fifo), Just(PolicyKind::Lru)]
}

/// page size, frames, pages
fn geometry() -> impl Strategy<Value = Geometry> {
    (1usize..8, 1usize..6, 1usize..12)
        .prop_map(|(page_size, frames, pages)| Geometry::new(page_size, frames, pages, 0).unwrap())
}

/// A geometry together with in-range accesses for it
fn workload() -> impl Strategy<Value = (Geometry, Vec<(Operation, u64)>)> {
    geometry().prop_flat_map(|g| {
        let limit = (g.page_size * g.num_pages) as u64;
        let access = (any::<bool>(), 0..limit).prop_map(|(write, address)| {
            let op = if write { Operation::Write } else { Operation::Read };
            (op, address)
        });
        (Just(g), prop::collection::vec(access, 0..80))
    })
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn prop_bindings_stay_consistent((g, accesses) in workload(), kind in policy()) {
        let mut vm = VmManager::new(g, kind);
        for (op, address) in accesses {
            vm.access(op, address).unwrap();
            prop_assert_eq!(vm.check_invariants(), Ok(()));
        }
    }

    #[test]
    fn prop_counters_track_accesses((g, accesses) in workload(), kind in policy()) {
        let mut vm = VmManager::new(g, kind);
        let mut misses = 0u64;
        for &(op, address) in &accesses {
            if let Outcome::Miss { .. } = vm.access(op, address).unwrap() {
                misses += 1;
            }
        }
        let t = vm.tracker();
        prop_assert_eq!(t.pages_referenced, accesses.len() as u64);
        prop_assert_eq!(t.page_misses, misses);
        prop_assert!(t.page_misses <= t.pages_referenced);
        prop_assert!(t.pages_mapped <= g.num_pages as u64);
        prop_assert!(t.frames_written_to_disk <= t.frames_taken);
        prop_assert_eq!(vm.instruction_count(), accesses.len() as u64 + 1);
    }

    #[test]
    fn prop_frames_taken_only_once_memory_is_full((g, accesses) in workload(), kind in policy()) {
        // Both policies fill every free frame before taking one from a page
        let mut vm = VmManager::new(g, kind);
        for (op, address) in accesses {
            vm.access(op, address).unwrap();
        }
        let t = vm.tracker();
        prop_assert_eq!(t.frames_taken, t.page_misses.saturating_sub(g.num_frames as u64));
    }

    #[test]
    fn prop_hit_iff_resident((g, accesses) in workload(), kind in policy()) {
        let mut vm = VmManager::new(g, kind);
        for (op, address) in accesses {
            let page = (address / g.page_size as u64) as usize;
            let resident = vm.page(page).unwrap().resident_frame();
            match vm.access(op, address).unwrap() {
                Outcome::Hit { frame } => prop_assert_eq!(Some(frame), resident),
                Outcome::Miss { evicted, .. } => {
                    prop_assert_eq!(resident, None);
                    prop_assert_ne!(evicted, Some(page));
                }
            }
        }
    }

    #[test]
    fn prop_fifo_sequential_first_touch_evicts_in_load_order(
        frames in 1usize..6,
        extra in 1usize..6,
        page_size in 1usize..5,
    ) {
        let pages = frames + extra;
        let g = Geometry::new(page_size, frames, pages, 0).unwrap();
        let mut vm = VmManager::new(g, PolicyKind::Fifo);
        for page in 0..pages {
            let outcome = vm.access(Operation::Read, (page * page_size) as u64).unwrap();
            let expected_evicted = page.checked_sub(frames);
            prop_assert_eq!(outcome, Outcome::Miss { frame: page % frames, evicted: expected_evicted });
        }
    }

    #[test]
    fn prop_on_disk_is_sticky((g, accesses) in workload(), kind in policy()) {
        let mut vm = VmManager::new(g, kind);
        let mut written = vec![false; g.num_pages];
        for (op, address) in accesses {
            vm.access(op, address).unwrap();
            for (index, seen) in written.iter_mut().enumerate() {
                let on_disk = vm.page(index).unwrap().on_disk;
                prop_assert!(!*seen || on_disk, "page {} lost its on-disk flag", index);
                *seen = on_disk;
            }
        }
    }
}
