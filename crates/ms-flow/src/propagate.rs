//! Worklist flow propagation.

use ms_core::{Real, SegmentId, poiseuille_weight};
use ms_graph::FlowGraph;
use tracing::{debug, warn};

use crate::diagnostics::FlowDiagnostics;
use crate::error::StrictResult;
use crate::result::FlowResult;
use crate::seed::{PropagationOptions, Seed, SeedPolicy};

/// Outcome of one propagation run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Propagation {
    pub result: FlowResult,
    pub diagnostics: FlowDiagnostics,
}

impl Propagation {
    /// Fail on unknown seeds, invalid seeds or malformed radii.
    pub fn ensure_clean(&self, graph: &FlowGraph) -> StrictResult<()> {
        match self.diagnostics.first_error(graph) {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

/// Distribute the seeded flows over `graph`.
///
/// Each distinct seeded segment starts one depth-first walk with its own
/// visited set. At every segment the incoming flow is split over its segment
/// targets by `radius^4`; foreign targets (sinks, receivers) take no share.
/// Targets already resolved by the current walk are not re-assigned.
///
/// Never fails: odd input yields partial results plus diagnostics.
pub fn propagate(graph: &FlowGraph, seeds: &[Seed], options: &PropagationOptions) -> Propagation {
    let policy = options.seed_policy;
    let mut diagnostics = FlowDiagnostics::default();
    let mut result = FlowResult::default();

    let injections = resolve_seeds(graph, seeds, policy, &mut diagnostics);
    let radii = usable_radii(graph, &mut diagnostics);

    for &(origin, flow) in &injections {
        result.set(origin, flow);
    }

    for &(origin, seeded) in &injections {
        // under last-write-wins an earlier walk may already have replaced the
        // seed, and the walk carries whatever the origin holds now
        let flow = match policy {
            SeedPolicy::Overwrite => result.get(origin).unwrap_or(seeded),
            SeedPolicy::Accumulate => seeded,
        };
        walk(graph, &radii, origin, flow, policy, &mut result, &mut diagnostics);
    }

    debug!(
        seeds = injections.len(),
        resolved = result.len(),
        truncations = diagnostics.cycle_truncations,
        "flow propagation finished"
    );

    Propagation {
        result,
        diagnostics,
    }
}

/// Map seeds to segment ids, dropping unknown targets and non-finite values.
/// Distinct segments keep first-appearance order.
fn resolve_seeds(
    graph: &FlowGraph,
    seeds: &[Seed],
    policy: SeedPolicy,
    diagnostics: &mut FlowDiagnostics,
) -> Vec<(SegmentId, Real)> {
    let mut injections: Vec<(SegmentId, Real)> = Vec::with_capacity(seeds.len());

    for seed in seeds {
        let Some(id) = graph.segment_id(&seed.segment) else {
            warn!(segment = %seed.segment, "seed targets unknown segment, skipping");
            diagnostics.unknown_seeds.push(seed.segment.clone());
            continue;
        };
        if !seed.flow.is_finite() {
            warn!(segment = %seed.segment, flow = seed.flow, "seed flow is not finite, skipping");
            diagnostics.invalid_seeds.push(seed.clone());
            continue;
        }
        match injections.iter_mut().find(|(existing, _)| *existing == id) {
            Some((_, value)) => *value = policy.combine(*value, seed.flow),
            None => injections.push((id, seed.flow)),
        }
    }

    injections
}

/// Radius per segment, `None` for segments without a usable one.
fn usable_radii(graph: &FlowGraph, diagnostics: &mut FlowDiagnostics) -> Vec<Option<Real>> {
    graph
        .segments()
        .iter()
        .map(|seg| match seg.radius {
            Some(r) if r.is_finite() && r >= 0.0 => Some(r),
            other => {
                warn!(segment = %seg.name, radius = ?other, "segment has no usable radius");
                diagnostics.malformed_radius.push(seg.id);
                None
            }
        })
        .collect()
}

/// Branch weights of a junction, relative to its widest branch so that
/// `r^4` neither overflows nor underflows for extreme radii. `None` when no
/// branch has a positive radius.
fn junction_weights(targets: &[SegmentId], radii: &[Option<Real>]) -> Option<Vec<Option<Real>>> {
    let widest = targets
        .iter()
        .filter_map(|t| radii[t.index() as usize])
        .fold(0.0, Real::max);
    if widest <= 0.0 {
        return None;
    }
    Some(
        targets
            .iter()
            .map(|t| radii[t.index() as usize].map(|r| poiseuille_weight(r / widest)))
            .collect(),
    )
}

fn walk(
    graph: &FlowGraph,
    radii: &[Option<Real>],
    origin: SegmentId,
    flow: Real,
    policy: SeedPolicy,
    result: &mut FlowResult,
    diagnostics: &mut FlowDiagnostics,
) {
    let mut visited = vec![false; graph.len()];
    visited[origin.index() as usize] = true;

    let mut stack = vec![(origin, flow)];
    let mut next = Vec::new();

    while let Some((segment, incoming)) = stack.pop() {
        let targets = graph.targets(segment);
        if targets.is_empty() {
            continue;
        }

        let Some(weights) = junction_weights(targets, radii) else {
            debug!(segment = %segment, "junction has zero total branch weight");
            diagnostics.note_degenerate(segment);
            continue;
        };
        // the widest branch weighs exactly 1, so denom >= 1
        let denom: Real = weights.iter().flatten().sum();

        next.clear();
        for (&target, weight) in targets.iter().zip(&weights) {
            let Some(weight) = *weight else {
                continue;
            };
            let slot = &mut visited[target.index() as usize];
            if *slot {
                debug!(from = %segment, to = %target, "target already resolved in this walk");
                diagnostics.cycle_truncations += 1;
                continue;
            }
            *slot = true;

            let share = incoming * weight / denom;
            result.write(target, share, policy);
            next.push((target, share));
        }

        // reversed so the first wired branch is walked first
        stack.extend(next.iter().rev().copied());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ms_core::{Tolerances, nearly_equal};
    use ms_graph::FlowGraphBuilder;

    fn tol() -> Tolerances {
        Tolerances {
            abs: 1e-12,
            rel: 1e-9,
        }
    }

    fn fork(rb: Real, rc: Real) -> FlowGraph {
        let mut builder = FlowGraphBuilder::new();
        let a = builder.add_segment("A", Some(2.0));
        builder.add_segment("B", Some(rb));
        builder.add_segment("C", Some(rc));
        builder.connect(a, "B");
        builder.connect(a, "C");
        builder.build().unwrap()
    }

    fn run(graph: &FlowGraph, seeds: &[Seed]) -> Propagation {
        propagate(graph, seeds, &PropagationOptions::default())
    }

    #[test]
    fn equal_radii_split_evenly() {
        let graph = fork(1.0, 1.0);
        let out = run(&graph, &[Seed::new("A", 100.0)]);

        assert_eq!(out.result.get_by_name(&graph, "A"), Some(100.0));
        assert_eq!(out.result.get_by_name(&graph, "B"), Some(50.0));
        assert_eq!(out.result.get_by_name(&graph, "C"), Some(50.0));
        assert!(out.diagnostics.is_clean());
    }

    #[test]
    fn fourth_power_split() {
        let graph = fork(2.0, 1.0);
        let out = run(&graph, &[Seed::new("A", 100.0)]);

        let b = out.result.get_by_name(&graph, "B").unwrap();
        let c = out.result.get_by_name(&graph, "C").unwrap();
        assert!(nearly_equal(b, 100.0 * 16.0 / 17.0, tol()));
        assert!(nearly_equal(c, 100.0 / 17.0, tol()));
        assert!(nearly_equal(b / c, 16.0, tol()));
        assert!(nearly_equal(b + c, 100.0, tol()));
    }

    #[test]
    fn zero_radius_children_get_nothing() {
        let graph = fork(0.0, 0.0);
        let out = run(&graph, &[Seed::new("A", 10.0)]);

        assert_eq!(out.result.len(), 1);
        assert_eq!(out.result.get_by_name(&graph, "B"), None);
        assert_eq!(out.result.get_by_name(&graph, "C"), None);
        assert_eq!(
            out.diagnostics.degenerate_junctions,
            vec![graph.segment_id("A").unwrap()]
        );
    }

    #[test]
    fn one_zero_radius_child_gets_computed_zero() {
        let graph = fork(1.0, 0.0);
        let out = run(&graph, &[Seed::new("A", 10.0)]);

        assert_eq!(out.result.get_by_name(&graph, "B"), Some(10.0));
        assert_eq!(out.result.get_by_name(&graph, "C"), Some(0.0));
    }

    #[test]
    fn malformed_radius_is_excluded_from_split() {
        let mut builder = FlowGraphBuilder::new();
        let a = builder.add_segment("A", Some(1.0));
        builder.add_segment("B", None);
        builder.add_segment("C", Some(1.0));
        builder.add_segment("D", Some(Real::NAN));
        builder.connect(a, "B");
        builder.connect(a, "C");
        builder.connect(a, "D");
        let graph = builder.build().unwrap();

        let out = run(&graph, &[Seed::new("A", 4.0)]);
        assert_eq!(out.result.get_by_name(&graph, "C"), Some(4.0));
        assert_eq!(out.result.get_by_name(&graph, "B"), None);
        assert_eq!(out.result.get_by_name(&graph, "D"), None);
        assert_eq!(out.diagnostics.malformed_radius.len(), 2);
        assert!(out.ensure_clean(&graph).is_err());
    }

    #[test]
    fn two_node_cycle_terminates() {
        let mut builder = FlowGraphBuilder::new();
        let a = builder.add_segment("A", Some(1.0));
        let b = builder.add_segment("B", Some(1.0));
        builder.connect(a, "B");
        builder.connect(b, "A");
        let graph = builder.build().unwrap();

        let out = run(&graph, &[Seed::new("A", 7.0)]);
        assert_eq!(out.result.get(a), Some(7.0));
        assert_eq!(out.result.get(b), Some(7.0));
        assert_eq!(out.diagnostics.cycle_truncations, 1);
    }

    #[test]
    fn unreached_segments_absent() {
        let mut builder = FlowGraphBuilder::new();
        let a = builder.add_segment("A", Some(1.0));
        builder.add_segment("B", Some(1.0));
        let island = builder.add_segment("island", Some(1.0));
        builder.connect(a, "B");
        let graph = builder.build().unwrap();

        let out = run(&graph, &[Seed::new("A", 1.0)]);
        assert!(!out.result.contains(island));
        assert_eq!(out.result.len(), 2);
    }

    #[test]
    fn unknown_and_invalid_seeds_are_reported() {
        let graph = fork(1.0, 1.0);
        let out = run(
            &graph,
            &[
                Seed::new("nowhere", 5.0),
                Seed::new("B", Real::INFINITY),
                Seed::new("A", 2.0),
            ],
        );

        assert_eq!(out.diagnostics.unknown_seeds, vec!["nowhere".to_string()]);
        assert_eq!(out.diagnostics.invalid_seeds.len(), 1);
        assert_eq!(out.result.get_by_name(&graph, "B"), Some(1.0));
        assert!(matches!(
            out.ensure_clean(&graph),
            Err(crate::FlowError::UnknownSeeds { .. })
        ));
    }

    #[test]
    fn foreign_targets_take_no_share() {
        let mut builder = FlowGraphBuilder::new();
        let a = builder.add_segment("A", Some(1.0));
        builder.add_segment("B", Some(1.0));
        builder.connect(a, "sink1");
        builder.connect(a, "B");
        let graph = builder.build().unwrap();

        let out = run(&graph, &[Seed::new("A", 3.0)]);
        assert_eq!(out.result.get_by_name(&graph, "B"), Some(3.0));
        assert_eq!(out.result.len(), 2);
    }

    #[test]
    fn repeated_seed_overwrite_vs_accumulate() {
        let graph = fork(1.0, 1.0);
        let seeds = [Seed::new("A", 10.0), Seed::new("A", 30.0)];

        let over = run(&graph, &seeds);
        assert_eq!(over.result.get_by_name(&graph, "A"), Some(30.0));
        assert_eq!(over.result.get_by_name(&graph, "B"), Some(15.0));

        let acc = propagate(
            &graph,
            &seeds,
            &PropagationOptions::with_policy(SeedPolicy::Accumulate),
        );
        assert_eq!(acc.result.get_by_name(&graph, "A"), Some(40.0));
        assert_eq!(acc.result.get_by_name(&graph, "B"), Some(20.0));
    }

    #[test]
    fn upstream_walk_overwrites_downstream_seed() {
        // A -> B -> C, seeded at A and at B
        let mut builder = FlowGraphBuilder::new();
        let a = builder.add_segment("A", Some(1.0));
        let b = builder.add_segment("B", Some(1.0));
        builder.add_segment("C", Some(1.0));
        builder.connect(a, "B");
        builder.connect(b, "C");
        let graph = builder.build().unwrap();
        let seeds = [Seed::new("A", 5.0), Seed::new("B", 2.0)];

        // the walk from A replaces B's seed, and B's walk carries that value on
        let over = run(&graph, &seeds);
        assert_eq!(over.result.get_by_name(&graph, "A"), Some(5.0));
        assert_eq!(over.result.get_by_name(&graph, "B"), Some(5.0));
        assert_eq!(over.result.get_by_name(&graph, "C"), Some(5.0));

        let acc = propagate(
            &graph,
            &seeds,
            &PropagationOptions::with_policy(SeedPolicy::Accumulate),
        );
        assert_eq!(acc.result.get_by_name(&graph, "B"), Some(7.0));
        assert_eq!(acc.result.get_by_name(&graph, "C"), Some(7.0));
    }

    #[test]
    fn split_share_replaces_later_direct_seed() {
        // A -> {B, C}, seeded A = 4 then B = 3
        let graph = fork(1.0, 1.0);
        let out = run(&graph, &[Seed::new("A", 4.0), Seed::new("B", 3.0)]);
        assert_eq!(out.result.get_by_name(&graph, "B"), Some(2.0));
        assert_eq!(out.result.get_by_name(&graph, "C"), Some(2.0));

        // seeded the other way round, B's own seed is the last write
        let out = run(&graph, &[Seed::new("B", 3.0), Seed::new("A", 4.0)]);
        assert_eq!(out.result.get_by_name(&graph, "B"), Some(2.0));
    }

    #[test]
    fn extreme_radii_split_without_overflow() {
        let graph = fork(1e100, 1.0);
        let out = run(&graph, &[Seed::new("A", 10.0)]);
        assert_eq!(out.result.get_by_name(&graph, "B"), Some(10.0));
        assert_eq!(out.result.get_by_name(&graph, "C"), Some(0.0));
        assert!(out.diagnostics.degenerate_junctions.is_empty());

        let graph = fork(1e-90, 2e-90);
        let out = run(&graph, &[Seed::new("A", 17.0)]);
        let b = out.result.get_by_name(&graph, "B").unwrap();
        let c = out.result.get_by_name(&graph, "C").unwrap();
        assert!(nearly_equal(b, 1.0, tol()));
        assert!(nearly_equal(c, 16.0, tol()));
        assert!(out.diagnostics.degenerate_junctions.is_empty());
    }

    #[test]
    fn diamond_merge_keeps_first_branch_share() {
        // A -> {B, C} -> D; D is reached through B first
        let mut builder = FlowGraphBuilder::new();
        let a = builder.add_segment("A", Some(1.0));
        let b = builder.add_segment("B", Some(2.0));
        let c = builder.add_segment("C", Some(1.0));
        builder.add_segment("D", Some(1.0));
        builder.connect(a, "B");
        builder.connect(a, "C");
        builder.connect(b, "D");
        builder.connect(c, "D");
        let graph = builder.build().unwrap();

        let out = run(&graph, &[Seed::new("A", 17.0)]);
        let b_flow = out.result.get_by_name(&graph, "B").unwrap();
        let d_flow = out.result.get_by_name(&graph, "D").unwrap();
        assert!(nearly_equal(b_flow, 16.0, tol()));
        assert_eq!(d_flow, b_flow);
        assert_eq!(out.diagnostics.cycle_truncations, 1);
    }

    #[test]
    fn repeated_runs_are_bit_identical() {
        let graph = fork(1.3, 0.7);
        let seeds = [Seed::new("A", 0.123_456_789)];
        let first = run(&graph, &seeds);
        let second = run(&graph, &seeds);
        assert_eq!(first, second);
        for ((ia, va), (ib, vb)) in first.result.iter().zip(second.result.iter()) {
            assert_eq!(ia, ib);
            assert_eq!(va.to_bits(), vb.to_bits());
        }
    }
}
