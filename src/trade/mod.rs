//! Bilateral trade network extraction.
//!
//! Turns one (country, year) row of the dataset into a layout-ready star
//! graph: the focal country in the middle, its top trade partners around
//! it, edge weight carrying combined export + import volume.

mod layout;

use std::collections::HashMap;

use thiserror::Error;

use crate::data::{Dataset, FlowDirection};

pub use layout::LAYOUT_SEED;
pub(crate) use layout::simulation_parameters;

/// Visual size of the focal node.
pub const FOCAL_NODE_SIZE: f64 = 1800.0;
/// Focal node fill color.
pub const FOCAL_NODE_COLOR: &str = "crimson";
/// Partner node fill color.
pub const PARTNER_NODE_COLOR: &str = "skyblue";

const PARTNER_SIZE_BASE: f64 = 600.0;
const PARTNER_SIZE_SPAN: f64 = 1000.0;
const EDGE_WIDTH_MIN: f64 = 1.0;
const EDGE_WIDTH_SPAN: f64 = 7.0;
const WIDTH_EPSILON: f64 = 1e-9;

/// Contract violations rejected before any computation.
#[derive(Debug, Error)]
pub enum TradeNetworkError {
	#[error("top_n must be at least 1")]
	InvalidTopN,
}

/// Export and import volume accumulated for one partner.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PartnerAggregate {
	pub export: f64,
	pub import: f64,
}

impl PartnerAggregate {
	/// Combined trade volume, the ranking key.
	pub fn total(&self) -> f64 {
		self.export + self.import
	}
}

/// One node of the trade graph, with visual attributes and a layout
/// position centered on the origin.
#[derive(Clone, Debug)]
pub struct TradeNode {
	pub code: String,
	pub size: f64,
	pub color: &'static str,
	pub x: f64,
	pub y: f64,
}

/// One focal-to-partner edge, indexing into [`TradeGraph::nodes`].
#[derive(Clone, Debug)]
pub struct TradeEdge {
	pub source: usize,
	pub target: usize,
	pub weight: f64,
	pub width: f64,
}

/// Layout-ready trade network for one (country, year). Node 0 is always
/// the focal country.
#[derive(Clone, Debug)]
pub struct TradeGraph {
	pub focal: String,
	pub year: i32,
	pub nodes: Vec<TradeNode>,
	pub edges: Vec<TradeEdge>,
}

/// Builds [`TradeGraph`]s from the dataset.
#[derive(Clone, Copy, Debug)]
pub struct TradeGraphBuilder {
	top_n: usize,
}

impl Default for TradeGraphBuilder {
	fn default() -> Self {
		Self { top_n: 10 }
	}
}

impl TradeGraphBuilder {
	pub fn new() -> Self {
		Self::default()
	}

	/// Keep at most `top_n` partners, ranked by combined volume.
	pub fn top_n(mut self, top_n: usize) -> Self {
		self.top_n = top_n;
		self
	}

	/// Build the trade network for `focal`.
	///
	/// With `year = None` the chronologically latest row for `focal` is
	/// used. `Ok(None)` means no row matched the selection, which callers
	/// must present as "no data", not as an error. A matching row with no
	/// eligible partners yields a graph holding only the focal node.
	pub fn build(
		&self,
		data: &Dataset,
		focal: &str,
		year: Option<i32>,
	) -> Result<Option<TradeGraph>, TradeNetworkError> {
		if self.top_n == 0 {
			return Err(TradeNetworkError::InvalidTopN);
		}
		let Some(record) = data.record_for(focal, year) else {
			return Ok(None);
		};

		// Accumulate per-partner volumes in first-seen column order; that
		// order breaks ranking ties.
		let mut partners: Vec<(String, PartnerAggregate)> = Vec::new();
		let mut slots: HashMap<String, usize> = HashMap::new();
		for (partner, direction, value) in data.flows_of(record) {
			if partner == focal || !value.is_finite() || value <= 0.0 {
				continue;
			}
			let slot = *slots.entry(partner.to_string()).or_insert_with(|| {
				partners.push((partner.to_string(), PartnerAggregate::default()));
				partners.len() - 1
			});
			let agg = &mut partners[slot].1;
			match direction {
				FlowDirection::Export => agg.export += value,
				FlowDirection::Import => agg.import += value,
			}
		}

		partners.sort_by(|a, b| b.1.total().total_cmp(&a.1.total()));
		partners.truncate(self.top_n);

		let max_total = partners
			.iter()
			.map(|(_, agg)| agg.total())
			.fold(0.0_f64, f64::max)
			.max(1.0);
		let min_weight = partners
			.iter()
			.map(|(_, agg)| agg.total())
			.fold(f64::INFINITY, f64::min);
		let max_weight = partners
			.iter()
			.map(|(_, agg)| agg.total())
			.fold(f64::NEG_INFINITY, f64::max);

		let mut nodes = Vec::with_capacity(1 + partners.len());
		nodes.push(TradeNode {
			code: focal.to_string(),
			size: FOCAL_NODE_SIZE,
			color: FOCAL_NODE_COLOR,
			x: 0.0,
			y: 0.0,
		});
		let mut edges = Vec::with_capacity(partners.len());
		for (code, agg) in &partners {
			let total = agg.total();
			nodes.push(TradeNode {
				code: code.clone(),
				size: PARTNER_SIZE_BASE + (total / max_total) * PARTNER_SIZE_SPAN,
				color: PARTNER_NODE_COLOR,
				x: 0.0,
				y: 0.0,
			});
			edges.push(TradeEdge {
				source: 0,
				target: nodes.len() - 1,
				weight: total,
				width: EDGE_WIDTH_MIN
					+ EDGE_WIDTH_SPAN
						* ((total - min_weight) / (max_weight - min_weight + WIDTH_EPSILON)),
			});
		}

		let positions = layout::spring_star_layout(nodes.len(), LAYOUT_SEED);
		for (node, (x, y)) in nodes.iter_mut().zip(positions) {
			node.x = x;
			node.y = y;
		}

		Ok(Some(TradeGraph {
			focal: focal.to_string(),
			year: record.year,
			nodes,
			edges,
		}))
	}
}

#[cfg(test)]
mod tests {
	use std::collections::HashSet;

	use super::*;

	fn dataset(csv: &str) -> Dataset {
		Dataset::from_csv_str(csv).unwrap()
	}

	const SCENARIO: &str = "\
ISO3,Year,BET_Export,BET_Import,GAM_Export
ALP,2020,100,50,0
";

	#[test]
	fn scenario_zero_volume_partner_excluded() {
		let ds = dataset(SCENARIO);
		let graph = TradeGraphBuilder::new()
			.build(&ds, "ALP", Some(2020))
			.unwrap()
			.unwrap();

		let codes: Vec<&str> = graph.nodes.iter().map(|n| n.code.as_str()).collect();
		assert_eq!(codes, vec!["ALP", "BET"]);
		assert_eq!(graph.edges.len(), 1);
		assert_eq!(graph.edges[0].weight, 150.0);
		assert_eq!(graph.edges[0].source, 0);
		assert_eq!(graph.edges[0].target, 1);
	}

	#[test]
	fn missing_year_is_no_data_not_an_error() {
		let ds = dataset(SCENARIO);
		let result = TradeGraphBuilder::new().build(&ds, "ALP", Some(1999)).unwrap();
		assert!(result.is_none());
		assert!(TradeGraphBuilder::new().build(&ds, "ZZZ", None).unwrap().is_none());
	}

	#[test]
	fn omitted_year_selects_latest() {
		let ds = dataset(
			"ISO3,Year,BET_Export\n\
			 ALP,2018,10\n\
			 ALP,2020,30\n",
		);
		let graph = TradeGraphBuilder::new().build(&ds, "ALP", None).unwrap().unwrap();
		assert_eq!(graph.year, 2020);
		assert_eq!(graph.edges[0].weight, 30.0);
	}

	#[test]
	fn node_count_is_one_plus_min_topn_eligible() {
		let ds = dataset(
			"ISO3,Year,A_Export,B_Export,C_Export,D_Export\n\
			 ALP,2020,4,3,2,1\n",
		);
		for top_n in 1..=6 {
			let graph = TradeGraphBuilder::new()
				.top_n(top_n)
				.build(&ds, "ALP", Some(2020))
				.unwrap()
				.unwrap();
			assert_eq!(graph.nodes.len(), 1 + top_n.min(4));
			assert_eq!(graph.edges.len(), top_n.min(4));
		}
	}

	#[test]
	fn selection_is_sorted_descending_and_positive() {
		let ds = dataset(
			"ISO3,Year,A_Export,A_Import,B_Export,C_Import,D_Export\n\
			 ALP,2020,5,10,40,25,-3\n",
		);
		let graph = TradeGraphBuilder::new().build(&ds, "ALP", Some(2020)).unwrap().unwrap();
		let weights: Vec<f64> = graph.edges.iter().map(|e| e.weight).collect();
		assert_eq!(weights, vec![40.0, 25.0, 15.0]);
		assert!(weights.iter().all(|&w| w > 0.0));
		// D's negative flow is excluded entirely.
		assert!(graph.nodes.iter().all(|n| n.code != "D"));
	}

	#[test]
	fn no_self_loops_and_no_duplicate_edges() {
		let ds = dataset(
			"ISO3,Year,ALP_Export,ALP_Import,BET_Export\n\
			 ALP,2020,99,99,10\n",
		);
		let graph = TradeGraphBuilder::new().build(&ds, "ALP", Some(2020)).unwrap().unwrap();
		assert!(graph.edges.iter().all(|e| e.source != e.target));
		let endpoints: HashSet<(usize, usize)> =
			graph.edges.iter().map(|e| (e.source, e.target)).collect();
		assert_eq!(endpoints.len(), graph.edges.len());
		assert_eq!(graph.nodes.len(), 2);
	}

	#[test]
	fn focal_only_graph_when_nothing_is_eligible() {
		let ds = dataset(
			"ISO3,Year,BET_Export,ShockImpact\n\
			 ALP,2020,0,0.5\n",
		);
		let graph = TradeGraphBuilder::new().build(&ds, "ALP", Some(2020)).unwrap().unwrap();
		assert_eq!(graph.nodes.len(), 1);
		assert_eq!(graph.nodes[0].code, "ALP");
		assert_eq!(graph.nodes[0].size, FOCAL_NODE_SIZE);
		assert!(graph.edges.is_empty());
	}

	#[test]
	fn equal_volumes_give_equal_widths_in_range() {
		let ds = dataset(
			"ISO3,Year,A_Export,B_Export,C_Export\n\
			 ALP,2020,20,20,20\n",
		);
		let graph = TradeGraphBuilder::new().build(&ds, "ALP", Some(2020)).unwrap().unwrap();
		let widths: Vec<f64> = graph.edges.iter().map(|e| e.width).collect();
		for &w in &widths {
			assert!((w - widths[0]).abs() < 1e-12);
			assert!((1.0..=8.0).contains(&w));
		}
	}

	#[test]
	fn widths_span_the_documented_range() {
		let ds = dataset(
			"ISO3,Year,A_Export,B_Export\n\
			 ALP,2020,100,10\n",
		);
		let graph = TradeGraphBuilder::new().build(&ds, "ALP", Some(2020)).unwrap().unwrap();
		assert!((graph.edges[0].width - 8.0).abs() < 1e-6);
		assert!((graph.edges[1].width - 1.0).abs() < 1e-6);
	}

	#[test]
	fn node_size_is_monotonic_in_volume() {
		let ds = dataset(
			"ISO3,Year,A_Export,B_Export,C_Export\n\
			 ALP,2020,100,60,60\n",
		);
		let graph = TradeGraphBuilder::new().build(&ds, "ALP", Some(2020)).unwrap().unwrap();
		let partner_sizes: Vec<f64> = graph.nodes[1..].iter().map(|n| n.size).collect();
		assert!(partner_sizes.windows(2).all(|w| w[0] >= w[1]));
		// The largest partner pins the top of the scale.
		assert_eq!(partner_sizes[0], PARTNER_SIZE_BASE + PARTNER_SIZE_SPAN);
		assert_eq!(partner_sizes[1], partner_sizes[2]);
	}

	#[test]
	fn ties_keep_first_seen_column_order() {
		let ds = dataset(
			"ISO3,Year,BET_Export,GAM_Export,DEL_Export\n\
			 ALP,2020,10,10,10\n",
		);
		let graph = TradeGraphBuilder::new()
			.top_n(2)
			.build(&ds, "ALP", Some(2020))
			.unwrap()
			.unwrap();
		let codes: Vec<&str> = graph.nodes[1..].iter().map(|n| n.code.as_str()).collect();
		assert_eq!(codes, vec!["BET", "GAM"]);
	}

	#[test]
	fn export_and_import_columns_aggregate_per_partner() {
		let ds = dataset(
			"ISO3,Year,BET_Export,BET_Import\n\
			 ALP,2020,100,\n\
			 ALP,2021,70,30\n",
		);
		let graph = TradeGraphBuilder::new().build(&ds, "ALP", Some(2021)).unwrap().unwrap();
		assert_eq!(graph.edges[0].weight, 100.0);
	}

	#[test]
	fn zero_top_n_is_rejected() {
		let ds = dataset(SCENARIO);
		let err = TradeGraphBuilder::new().top_n(0).build(&ds, "ALP", Some(2020));
		assert!(matches!(err, Err(TradeNetworkError::InvalidTopN)));
	}

	#[test]
	fn repeated_builds_produce_identical_layouts() {
		let ds = dataset(
			"ISO3,Year,A_Export,B_Export,C_Export,D_Import\n\
			 ALP,2020,9,7,5,3\n",
		);
		let builder = TradeGraphBuilder::new();
		let a = builder.build(&ds, "ALP", Some(2020)).unwrap().unwrap();
		let b = builder.build(&ds, "ALP", Some(2020)).unwrap().unwrap();
		for (na, nb) in a.nodes.iter().zip(&b.nodes) {
			assert_eq!((na.x, na.y), (nb.x, nb.y));
		}
		// Focal sits at the anchor; partners settle away from it.
		assert_eq!((a.nodes[0].x, a.nodes[0].y), (0.0, 0.0));
		assert!(a.nodes[1..].iter().all(|n| n.x.hypot(n.y) > 10.0));
	}

	#[test]
	fn builder_does_not_mutate_the_dataset() {
		let ds = dataset(SCENARIO);
		let before = ds.records().len();
		let _ = TradeGraphBuilder::new().build(&ds, "ALP", Some(2020)).unwrap();
		assert_eq!(ds.records().len(), before);
		assert_eq!(ds.countries(), vec!["ALP"]);
	}
}

