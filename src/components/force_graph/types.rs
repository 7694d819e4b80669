#[derive(Clone, Debug)]
pub struct GraphNode {
	pub id: String,
	pub label: Option<String>,
	pub color: Option<String>,
	/// Abstract node size on the builder's scale, mapped to a pixel
	/// radius by [`super::scale::node_radius`].
	pub size: f64,
	/// Initial layout position, centered on the origin.
	pub x: f64,
	pub y: f64,
}

#[derive(Clone, Debug)]
pub struct GraphLink {
	pub source: String,
	pub target: String,
	pub weight: f64,
	pub width: f64,
}

#[derive(Clone, Debug, Default)]
pub struct GraphData {
	pub nodes: Vec<GraphNode>,
	pub links: Vec<GraphLink>,
}
