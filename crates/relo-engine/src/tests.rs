//! Unit tests for relo-engine.
//!
//! Stochastic behaviour is pinned down one of two ways: structural
//! assertions that hold for every seed, or forced outcomes (`share >= 1`
//! moves every resident because draws live in `[0, 1)`; a zero baseline
//! yields an infinite share with the same effect).

use relo_core::{Envelope, Point, Polygon, RelocationConfig, RunRng, ZoneId};
use relo_spatial::ZoneSet;

use crate::{Population, RelocationEngine, TransitionMatrix};

// ── Helpers ───────────────────────────────────────────────────────────────────

/// Unit-square zones side by side on the x axis: zone `i` covers
/// `[i, i+1] x [0, 1]`.
fn grid_zones(baselines: &[f64]) -> ZoneSet {
    let geometries = (0..baselines.len())
        .map(|i| {
            let x = i as f64;
            (
                ZoneId(i as u32),
                Polygon::rectangle(Envelope::new(x, 0.0, x + 1.0, 1.0)),
            )
        })
        .collect();
    ZoneSet::load(geometries, baselines.to_vec()).unwrap()
}

fn matrix(rows: Vec<Vec<f64>>) -> TransitionMatrix {
    let dim = rows.len();
    TransitionMatrix::parse(rows, dim).unwrap()
}

fn config(seed: u64) -> RelocationConfig {
    RelocationConfig { seed: Some(seed), ..Default::default() }
}

/// Anchor-only agent strictly inside zone `i` of a unit grid.
fn anchor_in_zone(i: usize) -> Point {
    Point::new(i as f64 + 0.5, 0.5)
}

// ── Population ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod population {
    use super::*;
    use relo_core::AgentId;

    #[test]
    fn push_and_snapshot_agree() {
        let mut a = Population::new();
        let id0 = a.push(Point::new(1.0, 1.0), vec![]);
        let id1 = a.push(Point::new(2.0, 2.0), vec![Point::new(3.0, 3.0)]);
        assert_eq!((id0, id1), (AgentId(0), AgentId(1)));

        let b = Population::from_snapshot(vec![
            (Point::new(1.0, 1.0), vec![]),
            (Point::new(2.0, 2.0), vec![Point::new(3.0, 3.0)]),
        ]);
        assert_eq!(a.anchor, b.anchor);
        assert_eq!(a.secondary, b.secondary);
        assert_eq!(b.len(), 2);
        assert_eq!(a.agent_ids().collect::<Vec<_>>(), vec![AgentId(0), AgentId(1)]);
    }

    #[test]
    fn anchor_entries_are_positional() {
        let population = Population::from_snapshot(vec![
            (Point::new(1.0, 1.0), vec![]),
            (Point::new(2.0, 2.0), vec![]),
        ]);
        let entries = population.anchor_entries();
        assert_eq!(entries[0], (AgentId(0), Point::new(1.0, 1.0)));
        assert_eq!(entries[1], (AgentId(1), Point::new(2.0, 2.0)));
    }

    #[test]
    fn histogram_omits_unmoved() {
        let mut population = Population::from_snapshot(vec![
            (Point::new(1.0, 1.0), vec![]),
            (Point::new(2.0, 2.0), vec![]),
            (Point::new(3.0, 3.0), vec![]),
        ]);
        population.move_count[0] = 2;
        population.move_count[2] = 2;

        let histogram = population.move_count_histogram();
        assert_eq!(histogram.len(), 1);
        assert_eq!(histogram[&2], 2);
    }
}

// ── TransitionMatrix ──────────────────────────────────────────────────────────

#[cfg(test)]
mod matrix {
    use std::io::Cursor;

    use super::*;
    use crate::EngineError;

    #[test]
    fn parse_and_value() {
        let m = matrix(vec![vec![0.0, 10.0], vec![-5.0, 0.0]]);
        assert_eq!(m.dim(), 2);
        assert_eq!(m.value(0, 1), 10.0);
        // Negative cells are a run-time anomaly, not a parse fault.
        assert_eq!(m.value(1, 0), -5.0);
    }

    #[test]
    fn ragged_rows_rejected() {
        let err = TransitionMatrix::parse(vec![vec![0.0, 1.0], vec![2.0]], 2).unwrap_err();
        assert!(matches!(
            err,
            EngineError::RaggedRow { row: 1, got: 1, expected: 2 }
        ));
    }

    #[test]
    fn wrong_row_count_rejected() {
        let err = TransitionMatrix::parse(vec![vec![0.0, 1.0]], 2).unwrap_err();
        assert!(matches!(err, EngineError::DimensionMismatch { rows: 1, zones: 2 }));
    }

    #[test]
    #[should_panic]
    fn value_out_of_range_panics() {
        let m = matrix(vec![vec![0.0]]);
        let _ = m.value(0, 1);
    }

    #[test]
    fn csv_header_is_skipped() {
        let data = "z0,z1,z2\n0,10,0\n5,0,0\n0,0,0\n";
        let m = TransitionMatrix::from_reader(Cursor::new(data), 3).unwrap();
        assert_eq!(m.value(0, 1), 10.0);
        assert_eq!(m.value(1, 0), 5.0);
        assert_eq!(m.value(2, 2), 0.0);
    }

    #[test]
    fn csv_ragged_row_surfaces_as_data_fault() {
        let data = "z0,z1\n1,2\n3\n";
        let err = TransitionMatrix::from_reader(Cursor::new(data), 2).unwrap_err();
        assert!(matches!(err, EngineError::RaggedRow { row: 1, .. }));
    }

    #[test]
    fn csv_non_numeric_field_is_a_parse_fault() {
        let data = "z0,z1\n1,x\n2,3\n";
        let err = TransitionMatrix::from_reader(Cursor::new(data), 2).unwrap_err();
        assert!(matches!(err, EngineError::Parse(_)));
    }
}

// ── Engine construction ───────────────────────────────────────────────────────

#[cfg(test)]
mod construction {
    use super::*;
    use crate::EngineError;

    #[test]
    fn dimension_mismatch_rejected() {
        let zones = grid_zones(&[10.0, 10.0, 10.0]);
        let m = matrix(vec![vec![0.0, 1.0], vec![1.0, 0.0]]);
        let err = RelocationEngine::new(zones, m, config(0)).unwrap_err();
        assert!(matches!(err, EngineError::DimensionMismatch { rows: 2, zones: 3 }));
    }

    #[test]
    fn invalid_config_rejected() {
        let zones = grid_zones(&[10.0]);
        let m = matrix(vec![vec![0.0]]);
        let bad = RelocationConfig { paired_share_threshold: 2.0, ..Default::default() };
        assert!(matches!(
            RelocationEngine::new(zones, m, bad),
            Err(EngineError::Config(_))
        ));
    }
}

// ── Relocation runs ───────────────────────────────────────────────────────────

#[cfg(test)]
mod runs {
    use super::*;

    #[test]
    fn diagonal_never_consulted() {
        // Huge diagonal, zeros elsewhere: nothing may move.
        let zones = grid_zones(&[10.0, 10.0]);
        let mut population = Population::from_snapshot(vec![
            (anchor_in_zone(0), vec![]),
            (anchor_in_zone(1), vec![]),
        ]);
        let m = matrix(vec![vec![1e9, 0.0], vec![0.0, 1e9]]);

        let engine = RelocationEngine::new(zones, m, config(1)).unwrap();
        let mut index = engine.build_index(&population);
        let mut rng = RunRng::new(1);
        let report = engine.run(&mut population, &mut index, &mut rng).unwrap();

        assert_eq!(report.relocation_events, 0);
        assert_eq!(population.move_count, vec![0, 0]);
        assert_eq!(population.anchor[0], anchor_in_zone(0));
    }

    #[test]
    fn share_of_one_moves_every_resident() {
        // value == baseline → share = 1.0, and draws in [0, 1) always pass.
        let zones = grid_zones(&[4.0, 10.0]);
        let mut population = Population::from_snapshot(vec![
            (anchor_in_zone(0), vec![]),
            (Point::new(0.25, 0.75), vec![]),
        ]);
        let m = matrix(vec![vec![0.0, 4.0], vec![0.0, 0.0]]);

        let engine = RelocationEngine::new(zones, m, config(7)).unwrap();
        let mut index = engine.build_index(&population);
        let mut rng = RunRng::new(7);
        let report = engine.run(&mut population, &mut index, &mut rng).unwrap();

        assert_eq!(report.relocation_events, 2);
        assert_eq!(population.move_count, vec![1, 1]);
        let dest = Envelope::new(1.0, 0.0, 2.0, 1.0);
        for &anchor in &population.anchor {
            assert!(dest.contains(anchor), "anchor {anchor} not in destination");
        }
        assert_eq!(report.move_count_histogram[&1], 2);
    }

    #[test]
    fn zero_baseline_moves_all_residents() {
        // share = v / 0 = +inf resolves to "always selected", not a fault.
        let zones = grid_zones(&[0.0, 5.0]);
        let mut population = Population::from_snapshot(vec![
            (anchor_in_zone(0), vec![]),
            (Point::new(0.3, 0.3), vec![]),
            (Point::new(0.7, 0.7), vec![]),
        ]);
        let m = matrix(vec![vec![0.0, 3.0], vec![0.0, 0.0]]);

        let engine = RelocationEngine::new(zones, m, config(3)).unwrap();
        let mut index = engine.build_index(&population);
        let mut rng = RunRng::new(3);
        let report = engine.run(&mut population, &mut index, &mut rng).unwrap();

        assert_eq!(report.relocation_events, 3);
        assert_eq!(population.move_count, vec![1, 1, 1]);
        assert_eq!(report.empty_source_cells, 0);
    }

    #[test]
    fn negative_value_skipped_not_relocated() {
        let zones = grid_zones(&[10.0, 10.0]);
        let mut population = Population::from_snapshot(vec![(anchor_in_zone(0), vec![])]);
        let m = matrix(vec![vec![0.0, -5.0], vec![0.0, 0.0]]);

        let engine = RelocationEngine::new(zones, m, config(5)).unwrap();
        let mut index = engine.build_index(&population);
        let mut rng = RunRng::new(5);
        let report = engine.run(&mut population, &mut index, &mut rng).unwrap();

        assert_eq!(report.relocation_events, 0);
        assert_eq!(report.empty_source_cells, 0);
        assert_eq!(report.expected_movers, 0.0);
    }

    #[test]
    fn row_exhaustion_is_observed_by_later_destinations() {
        // (0,1) drains zone 0 completely; (0,2) must then see zero residents
        // and bump the empty-source-cell counter, never a stale result.
        let zones = grid_zones(&[1.0, 10.0, 10.0]);
        let mut population = Population::from_snapshot(vec![(anchor_in_zone(0), vec![])]);
        let m = matrix(vec![
            vec![0.0, 1.0, 1.0],
            vec![0.0, 0.0, 0.0],
            vec![0.0, 0.0, 0.0],
        ]);

        let engine = RelocationEngine::new(zones, m, config(11)).unwrap();
        let mut index = engine.build_index(&population);
        let mut rng = RunRng::new(11);
        let report = engine.run(&mut population, &mut index, &mut rng).unwrap();

        assert_eq!(report.relocation_events, 1);
        assert_eq!(report.empty_source_cells, 1);
        let zone1 = Envelope::new(1.0, 0.0, 2.0, 1.0);
        assert!(zone1.contains(population.anchor[0]));
    }

    #[test]
    fn three_zone_scenario_structural_invariants() {
        // Baselines [100, 50, 0], matrix [[0,10,0],[5,0,0],[0,0,0]]:
        // shares 0.1 per cell, zone 2 never a source or destination.
        let zones = grid_zones(&[100.0, 50.0, 0.0]);
        let mut population = Population::from_snapshot(vec![
            (Point::new(0.2, 0.5), vec![]),
            (Point::new(0.8, 0.5), vec![]),
            (anchor_in_zone(1), vec![]),
        ]);
        let m = matrix(vec![
            vec![0.0, 10.0, 0.0],
            vec![5.0, 0.0, 0.0],
            vec![0.0, 0.0, 0.0],
        ]);

        let engine = RelocationEngine::new(zones, m, config(42)).unwrap();
        let mut index = engine.build_index(&population);
        let mut rng = RunRng::new(42);
        let report = engine.run(&mut population, &mut index, &mut rng).unwrap();

        // Zone 2 receives zero movers: nobody may end up at x >= 2.
        for &anchor in &population.anchor {
            assert!(anchor.x < 2.0, "agent leaked into zone 2 at {anchor}");
        }
        // Every relocation event is accounted for in the move counters.
        let total_moves: u32 = population.move_count.iter().sum();
        assert_eq!(total_moves as u64, report.relocation_events);
        // Both populated cells were processed: expected sum is exact.
        assert!((report.expected_movers - 15.0 * 0.01).abs() < 1e-12);
    }

    #[test]
    fn same_seed_is_bit_identical() {
        let run = |seed: u64| {
            let zones = grid_zones(&[10.0, 10.0, 10.0]);
            let mut population = Population::from_snapshot(vec![
                (Point::new(0.2, 0.4), vec![Point::new(0.5, 0.5)]),
                (Point::new(0.9, 0.9), vec![]),
                (anchor_in_zone(1), vec![Point::new(1.1, 0.2), Point::new(1.9, 0.8)]),
                (anchor_in_zone(2), vec![]),
            ]);
            let m = matrix(vec![
                vec![0.0, 6.0, 2.0],
                vec![3.0, 0.0, 3.0],
                vec![1.0, 1.0, 0.0],
            ]);
            let engine = RelocationEngine::new(zones, m, config(seed)).unwrap();
            let mut index = engine.build_index(&population);
            let mut rng = RunRng::new(seed);
            let report = engine.run(&mut population, &mut index, &mut rng).unwrap();
            (population.anchor, population.secondary, population.move_count, report)
        };

        assert_eq!(run(1234), run(1234));
    }

    #[test]
    fn rebuilt_index_matches_incremental_after_run() {
        let zones = grid_zones(&[2.0, 2.0]);
        let bounds = zones.bounds();
        let mut population = Population::from_snapshot(vec![
            (Point::new(0.3, 0.3), vec![]),
            (Point::new(0.6, 0.6), vec![]),
            (anchor_in_zone(1), vec![]),
        ]);
        let m = matrix(vec![vec![0.0, 2.0], vec![2.0, 0.0]]);

        let engine = RelocationEngine::new(zones, m, config(99)).unwrap();
        let mut index = engine.build_index(&population);
        let mut rng = RunRng::new(99);
        engine.run(&mut population, &mut index, &mut rng).unwrap();

        let rebuilt = relo_spatial::SpatialIndex::bulk(bounds, &population.anchor_entries());
        for window in [bounds, Envelope::new(0.0, 0.0, 1.0, 1.0), Envelope::new(1.0, 0.0, 2.0, 1.0)] {
            assert_eq!(index.query_rectangle(window), rebuilt.query_rectangle(window));
        }
    }
}

// ── Paired/solo secondary relocation ──────────────────────────────────────────

#[cfg(test)]
mod paired_solo {
    use super::*;

    fn forced_move_engine(threshold: f64, seed: u64) -> RelocationEngine {
        let zones = grid_zones(&[0.0, 5.0]);
        let m = matrix(vec![vec![0.0, 1.0], vec![0.0, 0.0]]);
        let cfg = RelocationConfig {
            paired_share_threshold: threshold,
            seed: Some(seed),
            ..Default::default()
        };
        RelocationEngine::new(zones, m, cfg).unwrap()
    }

    #[test]
    fn paired_mover_keeps_secondary_locations() {
        // threshold = 1.0: r2 in [0, 1) can never exceed it → always paired.
        let secondary = vec![Point::new(0.1, 0.1), Point::new(0.9, 0.9)];
        let mut population =
            Population::from_snapshot(vec![(anchor_in_zone(0), secondary.clone())]);

        let engine = forced_move_engine(1.0, 21);
        let mut index = engine.build_index(&population);
        let mut rng = RunRng::new(21);
        engine.run(&mut population, &mut index, &mut rng).unwrap();

        assert_eq!(population.move_count[0], 1);
        assert_eq!(population.secondary[0], secondary, "paired mover must keep its context");
        // The anchor itself still moved.
        assert!(Envelope::new(1.0, 0.0, 2.0, 1.0).contains(population.anchor[0]));
    }

    #[test]
    fn solo_mover_redraws_each_secondary_independently() {
        // threshold = 0.0: r2 > 0 for any practical draw → always solo.
        let secondary = vec![Point::new(0.1, 0.1), Point::new(0.9, 0.9)];
        let mut population =
            Population::from_snapshot(vec![(anchor_in_zone(0), secondary.clone())]);

        let engine = forced_move_engine(0.0, 22);
        let mut index = engine.build_index(&population);
        let mut rng = RunRng::new(22);
        engine.run(&mut population, &mut index, &mut rng).unwrap();

        let dest = Envelope::new(1.0, 0.0, 2.0, 1.0);
        let moved = &population.secondary[0];
        assert_eq!(moved.len(), 2);
        for &location in moved {
            assert!(dest.contains(location), "secondary {location} not re-drawn in destination");
        }
        // One fresh draw per location, not one shared point.
        assert_ne!(moved[0], moved[1]);
        assert_ne!(moved[0], population.anchor[0]);
    }

    #[test]
    fn empty_secondary_list_is_a_noop() {
        let mut population = Population::from_snapshot(vec![(anchor_in_zone(0), vec![])]);

        let engine = forced_move_engine(0.0, 23);
        let mut index = engine.build_index(&population);
        let mut rng = RunRng::new(23);
        let report = engine.run(&mut population, &mut index, &mut rng).unwrap();

        assert_eq!(report.relocation_events, 1);
        assert!(population.secondary[0].is_empty());
    }
}

// ── Strict policy ─────────────────────────────────────────────────────────────

#[cfg(test)]
mod strict_policy {
    use super::*;
    use relo_spatial::PolygonPolicy;

    #[test]
    fn movers_land_inside_the_destination_polygon() {
        let triangle = |x0: f64| {
            Polygon::new(vec![
                Point::new(x0, 0.0),
                Point::new(x0 + 1.0, 0.0),
                Point::new(x0, 1.0),
            ])
            .unwrap()
        };
        let zones = ZoneSet::load(
            vec![(ZoneId(0), triangle(0.0)), (ZoneId(1), triangle(2.0))],
            vec![0.0, 5.0],
        )
        .unwrap();
        let m = matrix(vec![vec![0.0, 1.0], vec![0.0, 0.0]]);

        let mut population = Population::from_snapshot(vec![(Point::new(0.2, 0.2), vec![])]);
        let engine =
            RelocationEngine::with_policy(zones, m, config(31), PolygonPolicy::default()).unwrap();
        let mut index = engine.build_index(&population);
        let mut rng = RunRng::new(31);
        engine.run(&mut population, &mut index, &mut rng).unwrap();

        assert_eq!(population.move_count[0], 1);
        assert!(engine.zones().zone_at(1).polygon().contains(population.anchor[0]));
    }
}

// ── RunReport ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod report {
    use std::collections::BTreeMap;

    use crate::RunReport;

    fn sample() -> RunReport {
        RunReport {
            relocation_events: 5,
            empty_source_cells: 2,
            expected_movers: 0.15,
            move_count_histogram: BTreeMap::from([(1, 3), (2, 1)]),
        }
    }

    #[test]
    fn moved_agents_sums_histogram() {
        assert_eq!(sample().moved_agents(), 4);
    }

    #[test]
    fn histogram_csv_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("moves.csv");
        sample().write_histogram_csv(&path).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        assert_eq!(contents, "move_count,agents\n1,3\n2,1\n");
    }
}
