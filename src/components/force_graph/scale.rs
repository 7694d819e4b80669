//! Display-space scaling for graph attributes.

/// Map an abstract node size (the builder's 600..1800 scale) to a canvas
/// radius in pixels.
pub fn node_radius(size: f64) -> f64 {
	(size.max(0.0) / std::f64::consts::PI).sqrt() * 0.8
}

/// Clamp the zoom factor to a usable range.
pub fn clamp_zoom(k: f64) -> f64 {
	k.clamp(0.1, 10.0)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn radius_grows_with_size() {
		assert!(node_radius(1800.0) > node_radius(600.0));
		assert!(node_radius(600.0) > 0.0);
		assert_eq!(node_radius(0.0), 0.0);
	}

	#[test]
	fn zoom_clamps_both_ends() {
		assert_eq!(clamp_zoom(0.0), 0.1);
		assert_eq!(clamp_zoom(1.0), 1.0);
		assert_eq!(clamp_zoom(50.0), 10.0);
	}
}
