use thiserror::Error;

use super::layout::{ForceConfig, Simulation};
use crate::model::{BoardGraph, NodeStatus};

pub const STONE_RADIUS: f64 = 12.0;
pub const HIT_RADIUS: f64 = 14.0;
/// Boards render at a fixed height; only the width follows the container.
pub const BOARD_HEIGHT: f64 = 550.0;

// Link rest distance is LINK_SPREAD * minDim / sqrt(node count).
const LINK_SPREAD: f64 = 0.3;
const CHARGE: f64 = -30.0;
const DRAG_ALPHA_TARGET: f64 = 0.3;
// Pointer travel in px before a press counts as a drag instead of a click.
const DRAG_SLOP: f64 = 3.0;

/// What happens to a seized stone's pin when the pointer lets go.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PinPolicy {
	/// The stone stays pinned where it was dropped.
	#[default]
	Retain,
	/// The stone rejoins the simulation freely.
	Release,
}

#[derive(Clone, Debug, Default)]
pub struct DragState {
	pub node: Option<usize>,
	pub start_x: f64,
	pub start_y: f64,
	pub moved: bool,
}

/// Failures applying pushed state to the installed board.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum BoardError {
	#[error("board state carries {got} stones for a {expected}-node graph")]
	StateLength { got: usize, expected: usize },
}

/// One installed board: the layout simulation plus the stone classification
/// that rides along with it. Positions and classifications are parallel
/// arrays updated independently of each other.
pub struct BoardView {
	sim: Simulation,
	links: Vec<(usize, usize)>,
	stones: Vec<NodeStatus>,
	drag: DragState,
	pin_policy: PinPolicy,
	width: f64,
	height: f64,
}

impl BoardView {
	/// Builds a fresh board for `graph`. Every stone starts `Empty`; nodes
	/// seed at their unit-square positions mapped into the canvas.
	pub fn new(graph: &BoardGraph, width: f64, pin_policy: PinPolicy) -> Self {
		let height = BOARD_HEIGHT;
		let min_dim = width.min(height);
		let seeds: Vec<(f64, f64)> = graph
			.positions()
			.iter()
			.map(|&(x, y)| {
				(
					width / 2.0 + min_dim * (x - 0.5),
					height / 2.0 + min_dim * (y - 0.5),
				)
			})
			.collect();
		let node_count = graph.node_count();
		let link_distance = if node_count == 0 {
			0.0
		} else {
			LINK_SPREAD * min_dim / (node_count as f64).sqrt()
		};
		let config = ForceConfig {
			link_distance,
			charge: CHARGE,
			center: (width / 2.0, height / 2.0),
		};

		Self {
			sim: Simulation::new(&seeds, graph.edges(), config),
			links: graph.edges().to_vec(),
			stones: vec![NodeStatus::Empty; node_count],
			drag: DragState::default(),
			pin_policy,
			width,
			height,
		}
	}

	pub fn width(&self) -> f64 {
		self.width
	}

	pub fn height(&self) -> f64 {
		self.height
	}

	pub fn node_count(&self) -> usize {
		self.stones.len()
	}

	pub fn link_count(&self) -> usize {
		self.links.len()
	}

	pub fn links(&self) -> &[(usize, usize)] {
		&self.links
	}

	pub fn stones(&self) -> &[NodeStatus] {
		&self.stones
	}

	pub fn stone(&self, index: usize) -> NodeStatus {
		self.stones[index]
	}

	pub fn node_position(&self, index: usize) -> (f64, f64) {
		let node = &self.sim.nodes()[index];
		(node.x, node.y)
	}

	pub fn link_distance(&self) -> f64 {
		self.sim.config().link_distance
	}

	pub fn alpha_target(&self) -> f64 {
		self.sim.alpha_target()
	}

	pub fn is_pinned(&self, index: usize) -> bool {
		self.sim.is_pinned(index)
	}

	/// Replaces every stone's classification from an engine push.
	pub fn apply(&mut self, state: &[NodeStatus]) -> Result<(), BoardError> {
		if state.len() != self.stones.len() {
			return Err(BoardError::StateLength {
				got: state.len(),
				expected: self.stones.len(),
			});
		}
		self.stones.copy_from_slice(state);
		Ok(())
	}

	pub fn tick(&mut self) {
		self.sim.tick();
	}

	/// The closest node within hit range of a canvas point, if any.
	pub fn node_at(&self, x: f64, y: f64) -> Option<usize> {
		let mut best: Option<(usize, f64)> = None;
		for (index, node) in self.sim.nodes().iter().enumerate() {
			let d = ((node.x - x).powi(2) + (node.y - y).powi(2)).sqrt();
			if d < HIT_RADIUS && best.is_none_or(|(_, bd)| d < bd) {
				best = Some((index, d));
			}
		}
		best.map(|(index, _)| index)
	}

	/// A press on a stone seizes it: the stone pins in place and the
	/// simulation reheats. Returns whether anything was seized.
	pub fn pointer_down(&mut self, x: f64, y: f64) -> bool {
		let Some(index) = self.node_at(x, y) else {
			return false;
		};
		self.drag = DragState {
			node: Some(index),
			start_x: x,
			start_y: y,
			moved: false,
		};
		let (nx, ny) = self.node_position(index);
		self.sim.pin(index, nx, ny);
		self.sim.set_alpha_target(DRAG_ALPHA_TARGET);
		true
	}

	/// Drags the seized stone with the pointer once it travels past the
	/// click slop.
	pub fn pointer_move(&mut self, x: f64, y: f64) {
		let Some(index) = self.drag.node else {
			return;
		};
		if !self.drag.moved {
			let (dx, dy) = (x - self.drag.start_x, y - self.drag.start_y);
			if (dx * dx + dy * dy).sqrt() > DRAG_SLOP {
				self.drag.moved = true;
			}
		}
		if self.drag.moved {
			self.sim.pin(index, x, y);
		}
	}

	/// Ends the gesture. A press that never travelled past the slop is a
	/// click and yields the node index for a move request.
	pub fn pointer_up(&mut self) -> Option<usize> {
		let index = self.drag.node.take()?;
		let clicked = !self.drag.moved;
		self.drag = DragState::default();
		self.finish_gesture(index);
		if clicked { Some(index) } else { None }
	}

	/// Abandons the gesture without producing a click.
	pub fn cancel_pointer(&mut self) {
		if let Some(index) = self.drag.node.take() {
			self.finish_gesture(index);
		}
		self.drag = DragState::default();
	}

	fn finish_gesture(&mut self, index: usize) {
		self.sim.set_alpha_target(0.0);
		if self.pin_policy == PinPolicy::Release {
			self.sim.unpin(index);
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn two_node_graph() -> BoardGraph {
		BoardGraph::new(vec![(0.25, 0.5), (0.75, 0.5)], vec![(0, 1)]).unwrap()
	}

	fn square_graph() -> BoardGraph {
		BoardGraph::new(
			vec![(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)],
			vec![(0, 1), (1, 2), (2, 3), (3, 0)],
		)
		.unwrap()
	}

	#[test]
	fn test_fresh_board_counts_and_classification() {
		let view = BoardView::new(&square_graph(), 800.0, PinPolicy::Retain);
		assert_eq!(view.node_count(), 4);
		assert_eq!(view.link_count(), 4);
		assert!(view.stones().iter().all(|&s| s == NodeStatus::Empty));
		assert!(view.links().iter().all(|&(a, b)| a < 4 && b < 4));
	}

	#[test]
	fn test_seed_positions_follow_canvas_mapping() {
		// width 800, height 550 -> minDim 550
		let graph = BoardGraph::new(vec![(0.5, 0.5), (0.0, 0.0)], Vec::new()).unwrap();
		let view = BoardView::new(&graph, 800.0, PinPolicy::Retain);
		let (cx, cy) = view.node_position(0);
		assert!((cx - 400.0).abs() < 1e-9);
		assert!((cy - 275.0).abs() < 1e-9);
		let (ox, oy) = view.node_position(1);
		assert!((ox - 125.0).abs() < 1e-9);
		assert!(oy.abs() < 1e-9);
	}

	#[test]
	fn test_link_rest_distance_formula() {
		let positions = vec![(0.5, 0.5); 25];
		let graph = BoardGraph::new(positions, Vec::new()).unwrap();
		let view = BoardView::new(&graph, 800.0, PinPolicy::Retain);
		// 0.3 * 550 / sqrt(25)
		assert!((view.link_distance() - 33.0).abs() < 1e-9);
	}

	#[test]
	fn test_apply_classifies_each_node_exactly() {
		let mut view = BoardView::new(&square_graph(), 800.0, PinPolicy::Retain);
		let state = vec![
			NodeStatus::Black,
			NodeStatus::Empty,
			NodeStatus::White,
			NodeStatus::Black,
		];
		view.apply(&state).unwrap();
		assert_eq!(view.stones(), state.as_slice());
		assert_eq!(view.stone(2), NodeStatus::White);
	}

	#[test]
	fn test_apply_is_idempotent() {
		let mut view = BoardView::new(&square_graph(), 800.0, PinPolicy::Retain);
		let state = vec![
			NodeStatus::White,
			NodeStatus::White,
			NodeStatus::Empty,
			NodeStatus::Black,
		];
		view.apply(&state).unwrap();
		let first = view.stones().to_vec();
		view.apply(&state).unwrap();
		assert_eq!(view.stones(), first.as_slice());
	}

	#[test]
	fn test_apply_rejects_wrong_length_and_keeps_stones() {
		let mut view = BoardView::new(&square_graph(), 800.0, PinPolicy::Retain);
		view.apply(&[NodeStatus::Black; 4]).unwrap();
		let err = view.apply(&[NodeStatus::White; 3]).unwrap_err();
		assert_eq!(err, BoardError::StateLength { got: 3, expected: 4 });
		assert!(view.stones().iter().all(|&s| s == NodeStatus::Black));
	}

	#[test]
	fn test_seizing_a_stone_reheats_and_pins() {
		let mut view = BoardView::new(&two_node_graph(), 800.0, PinPolicy::Retain);
		let (x, y) = view.node_position(0);
		assert!(view.pointer_down(x, y));
		assert_eq!(view.alpha_target(), 0.3);
		assert!(view.is_pinned(0));
	}

	#[test]
	fn test_drag_release_cools_and_retains_pin() {
		let mut view = BoardView::new(&two_node_graph(), 800.0, PinPolicy::Retain);
		let (x, y) = view.node_position(0);
		view.pointer_down(x, y);
		view.pointer_move(x + 30.0, y);
		assert_eq!(view.pointer_up(), None, "a drag is not a click");
		assert_eq!(view.alpha_target(), 0.0);
		assert!(view.is_pinned(0));
		let (nx, ny) = view.node_position(0);
		assert!((nx - (x + 30.0)).abs() < 1e-9);
		assert!((ny - y).abs() < 1e-9);
	}

	#[test]
	fn test_release_policy_unpins_on_drop() {
		let mut view = BoardView::new(&two_node_graph(), 800.0, PinPolicy::Release);
		let (x, y) = view.node_position(0);
		view.pointer_down(x, y);
		view.pointer_move(x + 30.0, y);
		view.pointer_up();
		assert_eq!(view.alpha_target(), 0.0);
		assert!(!view.is_pinned(0));
	}

	#[test]
	fn test_press_without_travel_is_a_click() {
		let mut view = BoardView::new(&two_node_graph(), 800.0, PinPolicy::Retain);
		let (x, y) = view.node_position(1);
		view.pointer_down(x + 2.0, y);
		assert_eq!(view.pointer_up(), Some(1));
		assert_eq!(view.alpha_target(), 0.0);
	}

	#[test]
	fn test_press_on_empty_space_is_ignored() {
		let mut view = BoardView::new(&two_node_graph(), 800.0, PinPolicy::Retain);
		assert!(!view.pointer_down(10.0, 10.0));
		assert_eq!(view.pointer_up(), None);
		assert_eq!(view.alpha_target(), 0.0);
	}

	#[test]
	fn test_cancel_abandons_gesture() {
		let mut view = BoardView::new(&two_node_graph(), 800.0, PinPolicy::Retain);
		let (x, y) = view.node_position(0);
		view.pointer_down(x, y);
		view.cancel_pointer();
		assert_eq!(view.alpha_target(), 0.0);
		assert_eq!(view.pointer_up(), None);
	}

	#[test]
	fn test_hit_testing_range() {
		let view = BoardView::new(&two_node_graph(), 800.0, PinPolicy::Retain);
		let (x, y) = view.node_position(0);
		assert_eq!(view.node_at(x + 13.0, y), Some(0));
		assert_eq!(view.node_at(x + 30.0, y + 30.0), None);
	}
}
