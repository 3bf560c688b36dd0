//! Force-directed layout engine for the board graph.
//!
//! Velocity-Verlet style integration with three forces: a spring per link
//! with a configurable rest distance, pairwise charge repulsion, and an
//! exact mean-recentring pass. Excitement is governed by an `alpha` energy
//! level that decays toward a movable target, so interactions can reheat
//! the layout and let it cool back down. The engine never stops itself;
//! callers tick it on every animation frame.

const ALPHA_DECAY: f64 = 0.0228;
const VELOCITY_RETAIN: f64 = 0.6;
// Squared floor for pair distances in the charge pass.
const DISTANCE_MIN2: f64 = 1.0;

/// A layout participant: current position, velocity and optional pin.
#[derive(Clone, Copy, Debug)]
pub struct LayoutNode {
	pub x: f64,
	pub y: f64,
	pub vx: f64,
	pub vy: f64,
	pub pin: Option<(f64, f64)>,
}

/// Force tuning for one simulation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ForceConfig {
	/// Rest length of every link spring.
	pub link_distance: f64,
	/// Pairwise charge; negative values repel.
	pub charge: f64,
	/// Point the node population is recentred on each tick.
	pub center: (f64, f64),
}

impl Default for ForceConfig {
	fn default() -> Self {
		Self {
			link_distance: 30.0,
			charge: -30.0,
			center: (0.0, 0.0),
		}
	}
}

/// The running simulation over a fixed node and link population.
pub struct Simulation {
	nodes: Vec<LayoutNode>,
	links: Vec<(usize, usize)>,
	// Per-link spring strength and distribution bias, both degree-derived.
	strength: Vec<f64>,
	bias: Vec<f64>,
	config: ForceConfig,
	alpha: f64,
	alpha_target: f64,
	jiggle_seed: u64,
}

impl Simulation {
	/// Starts a simulation with nodes seeded at `positions`.
	///
	/// Link endpoints must be valid indices into `positions`.
	pub fn new(positions: &[(f64, f64)], links: &[(usize, usize)], config: ForceConfig) -> Self {
		let nodes: Vec<LayoutNode> = positions
			.iter()
			.map(|&(x, y)| LayoutNode {
				x,
				y,
				vx: 0.0,
				vy: 0.0,
				pin: None,
			})
			.collect();

		let mut degree = vec![0usize; nodes.len()];
		for &(a, b) in links {
			debug_assert!(a < nodes.len() && b < nodes.len());
			degree[a] += 1;
			degree[b] += 1;
		}
		let strength: Vec<f64> = links
			.iter()
			.map(|&(a, b)| 1.0 / degree[a].min(degree[b]) as f64)
			.collect();
		let bias: Vec<f64> = links
			.iter()
			.map(|&(a, b)| degree[a] as f64 / (degree[a] + degree[b]) as f64)
			.collect();

		Self {
			nodes,
			links: links.to_vec(),
			strength,
			bias,
			config,
			alpha: 1.0,
			alpha_target: 0.0,
			jiggle_seed: 1,
		}
	}

	pub fn nodes(&self) -> &[LayoutNode] {
		&self.nodes
	}

	pub fn node_count(&self) -> usize {
		self.nodes.len()
	}

	pub fn config(&self) -> &ForceConfig {
		&self.config
	}

	pub fn alpha(&self) -> f64 {
		self.alpha
	}

	pub fn alpha_target(&self) -> f64 {
		self.alpha_target
	}

	/// Moves the energy level the simulation relaxes toward. Raising it
	/// above zero reheats the layout; zero lets it cool to rest.
	pub fn set_alpha_target(&mut self, target: f64) {
		self.alpha_target = target;
	}

	/// Pins a node: it snaps to the given point and sheds its velocity
	/// until unpinned.
	pub fn pin(&mut self, index: usize, x: f64, y: f64) {
		let node = &mut self.nodes[index];
		node.pin = Some((x, y));
		node.x = x;
		node.y = y;
	}

	pub fn unpin(&mut self, index: usize) {
		self.nodes[index].pin = None;
	}

	pub fn is_pinned(&self, index: usize) -> bool {
		self.nodes[index].pin.is_some()
	}

	/// Advances the simulation one step: decay alpha toward its target,
	/// apply link, charge and centring forces, then integrate.
	pub fn tick(&mut self) {
		self.alpha += (self.alpha_target - self.alpha) * ALPHA_DECAY;
		self.apply_links();
		self.apply_charge();
		self.apply_center();
		for node in &mut self.nodes {
			if let Some((px, py)) = node.pin {
				node.x = px;
				node.y = py;
				node.vx = 0.0;
				node.vy = 0.0;
			} else {
				node.vx *= VELOCITY_RETAIN;
				node.vy *= VELOCITY_RETAIN;
				node.x += node.vx;
				node.y += node.vy;
			}
		}
	}

	fn apply_links(&mut self) {
		for l in 0..self.links.len() {
			let (s, t) = self.links[l];
			let mut dx =
				(self.nodes[t].x + self.nodes[t].vx) - (self.nodes[s].x + self.nodes[s].vx);
			let mut dy =
				(self.nodes[t].y + self.nodes[t].vy) - (self.nodes[s].y + self.nodes[s].vy);
			if dx == 0.0 && dy == 0.0 {
				dx = self.jiggle();
				dy = self.jiggle();
			}
			let len = (dx * dx + dy * dy).sqrt();
			let k = (len - self.config.link_distance) / len * self.alpha * self.strength[l];
			dx *= k;
			dy *= k;
			let bias = self.bias[l];
			self.nodes[t].vx -= dx * bias;
			self.nodes[t].vy -= dy * bias;
			self.nodes[s].vx += dx * (1.0 - bias);
			self.nodes[s].vy += dy * (1.0 - bias);
		}
	}

	fn apply_charge(&mut self) {
		if self.config.charge == 0.0 {
			return;
		}
		for i in 0..self.nodes.len() {
			for j in (i + 1)..self.nodes.len() {
				let mut dx = self.nodes[j].x - self.nodes[i].x;
				let mut dy = self.nodes[j].y - self.nodes[i].y;
				let mut l2 = dx * dx + dy * dy;
				if l2 == 0.0 {
					dx = self.jiggle();
					dy = self.jiggle();
					l2 = dx * dx + dy * dy;
				}
				if l2 < DISTANCE_MIN2 {
					l2 = (DISTANCE_MIN2 * l2).sqrt();
				}
				let w = self.config.charge * self.alpha / l2;
				self.nodes[i].vx += dx * w;
				self.nodes[i].vy += dy * w;
				self.nodes[j].vx -= dx * w;
				self.nodes[j].vy -= dy * w;
			}
		}
	}

	fn apply_center(&mut self) {
		if self.nodes.is_empty() {
			return;
		}
		let n = self.nodes.len() as f64;
		let mut sx = 0.0;
		let mut sy = 0.0;
		for node in &self.nodes {
			sx += node.x;
			sy += node.y;
		}
		let (cx, cy) = self.config.center;
		sx = sx / n - cx;
		sy = sy / n - cy;
		for node in &mut self.nodes {
			node.x -= sx;
			node.y -= sy;
		}
	}

	// Tiny deterministic offset used to split exactly coincident nodes.
	fn jiggle(&mut self) -> f64 {
		self.jiggle_seed = (self.jiggle_seed * 9301 + 49297) % 233280;
		(self.jiggle_seed as f64 / 233280.0 - 0.5) * 1e-6
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn quiet_config(center: (f64, f64)) -> ForceConfig {
		ForceConfig {
			link_distance: 100.0,
			charge: 0.0,
			center,
		}
	}

	fn distance(a: &LayoutNode, b: &LayoutNode) -> f64 {
		((a.x - b.x).powi(2) + (a.y - b.y).powi(2)).sqrt()
	}

	#[test]
	fn test_alpha_decays_toward_zero() {
		let mut sim = Simulation::new(&[(0.0, 0.0)], &[], ForceConfig::default());
		assert_eq!(sim.alpha(), 1.0);
		for _ in 0..300 {
			sim.tick();
		}
		assert!(sim.alpha() < 0.01);
		assert!(sim.alpha() > 0.0);
	}

	#[test]
	fn test_raised_alpha_target_reheats() {
		let mut sim = Simulation::new(&[(0.0, 0.0)], &[], ForceConfig::default());
		for _ in 0..300 {
			sim.tick();
		}
		let cooled = sim.alpha();
		sim.set_alpha_target(0.3);
		sim.tick();
		assert!(sim.alpha() > cooled);
		for _ in 0..300 {
			sim.tick();
		}
		assert!(sim.alpha() > 0.25);
	}

	#[test]
	fn test_link_spring_approaches_rest_distance() {
		let mut sim = Simulation::new(
			&[(0.0, 0.0), (10.0, 0.0)],
			&[(0, 1)],
			quiet_config((5.0, 0.0)),
		);
		for _ in 0..300 {
			sim.tick();
		}
		let d = distance(&sim.nodes()[0], &sim.nodes()[1]);
		assert!(d > 50.0 && d < 150.0, "settled at {d}");
	}

	#[test]
	fn test_pinned_node_holds_position() {
		let mut sim = Simulation::new(
			&[(0.0, 0.0), (10.0, 0.0)],
			&[(0, 1)],
			quiet_config((5.0, 0.0)),
		);
		sim.pin(0, 5.0, 5.0);
		for _ in 0..50 {
			sim.tick();
		}
		assert_eq!(sim.nodes()[0].x, 5.0);
		assert_eq!(sim.nodes()[0].y, 5.0);
		assert!(sim.is_pinned(0));
	}

	#[test]
	fn test_unpinned_node_moves_again() {
		let mut sim = Simulation::new(
			&[(0.0, 0.0), (10.0, 0.0)],
			&[(0, 1)],
			quiet_config((5.0, 0.0)),
		);
		sim.pin(0, 5.0, 5.0);
		for _ in 0..10 {
			sim.tick();
		}
		sim.unpin(0);
		for _ in 0..50 {
			sim.tick();
		}
		assert!(!sim.is_pinned(0));
		assert!((sim.nodes()[0].x, sim.nodes()[0].y) != (5.0, 5.0));
	}

	#[test]
	fn test_population_recentres_on_configured_point() {
		let mut sim = Simulation::new(
			&[(0.0, 0.0), (10.0, 0.0)],
			&[],
			quiet_config((100.0, 100.0)),
		);
		sim.tick();
		let mean_x = (sim.nodes()[0].x + sim.nodes()[1].x) / 2.0;
		let mean_y = (sim.nodes()[0].y + sim.nodes()[1].y) / 2.0;
		assert!((mean_x - 100.0).abs() < 1e-9);
		assert!((mean_y - 100.0).abs() < 1e-9);
	}

	#[test]
	fn test_coincident_nodes_separate() {
		let config = ForceConfig {
			link_distance: 30.0,
			charge: -30.0,
			center: (0.0, 0.0),
		};
		let mut sim = Simulation::new(&[(3.0, 3.0), (3.0, 3.0)], &[], config);
		for _ in 0..10 {
			sim.tick();
		}
		assert!(distance(&sim.nodes()[0], &sim.nodes()[1]) > 1.0);
	}

	#[test]
	fn test_empty_population_ticks() {
		let mut sim = Simulation::new(&[], &[], ForceConfig::default());
		sim.tick();
		assert_eq!(sim.node_count(), 0);
	}
}
