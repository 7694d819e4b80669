use std::collections::HashMap;
use std::f64::consts::PI;

use force_graph::{EdgeData, ForceGraph, NodeData, SimulationParameters};

/// Fixed layout seed; identical inputs must yield identical positions.
pub const LAYOUT_SEED: u64 = 42;

const RING_RADIUS: f64 = 220.0;
const RING_JITTER: f64 = 40.0;
const SETTLE_STEPS: usize = 300;
const STEP_DT: f32 = 0.016;

pub(crate) fn simulation_parameters() -> SimulationParameters {
	SimulationParameters {
		force_charge: 150.0,
		force_spring: 0.05,
		force_max: 100.0,
		node_speed: 3000.0,
		damping_factor: 0.9,
	}
}

/// Deterministic spring layout for a star graph of `node_count` nodes.
///
/// Node 0 is the hub, anchored at the origin; the remaining nodes start on
/// a seeded jittered ring and settle through a fixed number of simulation
/// steps. Returns one `(x, y)` per node, in input order, centered on the
/// origin.
pub(crate) fn spring_star_layout(node_count: usize, seed: u64) -> Vec<(f64, f64)> {
	if node_count == 0 {
		return Vec::new();
	}

	let mut graph = ForceGraph::<(), ()>::new(simulation_parameters());
	let mut rng = Lcg::new(seed);
	let mut indices = Vec::with_capacity(node_count);

	let hub = graph.add_node(NodeData {
		x: 0.0,
		y: 0.0,
		mass: 10.0,
		is_anchor: true,
		user_data: (),
	});
	indices.push(hub);

	let spokes = node_count - 1;
	for i in 0..spokes {
		let angle = (i as f64) * 2.0 * PI / (spokes as f64);
		let radius = RING_RADIUS + (rng.next_f64() - 0.5) * 2.0 * RING_JITTER;
		let idx = graph.add_node(NodeData {
			x: (radius * angle.cos()) as f32,
			y: (radius * angle.sin()) as f32,
			mass: 10.0,
			is_anchor: false,
			user_data: (),
		});
		graph.add_edge(hub, idx, EdgeData::default());
		indices.push(idx);
	}

	for _ in 0..SETTLE_STEPS {
		graph.update(STEP_DT);
	}

	let slots: HashMap<_, _> = indices
		.iter()
		.enumerate()
		.map(|(slot, &idx)| (idx, slot))
		.collect();
	let mut positions = vec![(0.0, 0.0); node_count];
	graph.visit_nodes(|node| {
		if let Some(&slot) = slots.get(&node.index()) {
			positions[slot] = (node.x() as f64, node.y() as f64);
		}
	});
	positions
}

/// Small deterministic PRNG so layout never depends on ambient entropy.
struct Lcg(u64);

impl Lcg {
	fn new(seed: u64) -> Self {
		Self(seed.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407))
	}

	fn next_f64(&mut self) -> f64 {
		self.0 = self
			.0
			.wrapping_mul(6364136223846793005)
			.wrapping_add(1442695040888963407);
		((self.0 >> 11) as f64) / ((1u64 << 53) as f64)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn layout_is_deterministic_for_a_fixed_seed() {
		let a = spring_star_layout(6, LAYOUT_SEED);
		let b = spring_star_layout(6, LAYOUT_SEED);
		assert_eq!(a, b);
	}

	#[test]
	fn hub_stays_anchored() {
		let positions = spring_star_layout(5, LAYOUT_SEED);
		assert_eq!(positions[0], (0.0, 0.0));
	}

	#[test]
	fn spokes_settle_away_from_the_hub() {
		let positions = spring_star_layout(4, LAYOUT_SEED);
		for &(x, y) in &positions[1..] {
			assert!((x * x + y * y).sqrt() > 10.0);
		}
	}

	#[test]
	fn single_node_graph() {
		assert_eq!(spring_star_layout(1, LAYOUT_SEED), vec![(0.0, 0.0)]);
		assert!(spring_star_layout(0, LAYOUT_SEED).is_empty());
	}
}
