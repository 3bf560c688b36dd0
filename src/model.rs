//! Domain types shared by the bridge, the session machine and the board view.

use std::fmt;

use thiserror::Error;

/// Occupancy of a single board node.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NodeStatus {
	Empty,
	Black,
	White,
}

impl NodeStatus {
	/// Decodes the engine's wire code: -1 empty, 0 black, 1 white.
	pub fn from_wire(code: i64) -> Option<Self> {
		match code {
			-1 => Some(Self::Empty),
			0 => Some(Self::Black),
			1 => Some(Self::White),
			_ => None,
		}
	}
}

/// One of the two sides. Wire codes are 0 for black and 1 for white.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Player {
	Black,
	White,
}

impl Player {
	/// Decodes the engine's wire code.
	pub fn from_wire(code: i64) -> Option<Self> {
		match code {
			0 => Some(Self::Black),
			1 => Some(Self::White),
			_ => None,
		}
	}

	pub fn opponent(self) -> Self {
		match self {
			Self::Black => Self::White,
			Self::White => Self::Black,
		}
	}

	pub fn name(self) -> &'static str {
		match self {
			Self::Black => "Black",
			Self::White => "White",
		}
	}
}

impl fmt::Display for Player {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.name())
	}
}

/// A per-player pair of numeric totals (capture counts or final scores).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlayerTotals {
	pub black: f64,
	pub white: f64,
}

impl PlayerTotals {
	pub fn new(black: f64, white: f64) -> Self {
		Self { black, white }
	}

	pub fn get(self, player: Player) -> f64 {
		match player {
			Player::Black => self.black,
			Player::White => self.white,
		}
	}
}

/// Opaque engine-issued session identifier. Echoed back on calls, never inspected.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct SessionKey(String);

impl SessionKey {
	pub fn new(key: impl Into<String>) -> Self {
		Self(key.into())
	}

	pub fn as_str(&self) -> &str {
		&self.0
	}
}

impl fmt::Display for SessionKey {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}

/// An edge referencing a node index outside the graph.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("edge ({a}, {b}) references a node outside 0..{nodes}")]
pub struct InvalidEdge {
	pub a: usize,
	pub b: usize,
	pub nodes: usize,
}

/// Playing graph: seed positions in the unit square plus undirected edges.
///
/// The node index is the position index; edges refer to nodes by index.
#[derive(Clone, Debug, PartialEq)]
pub struct BoardGraph {
	positions: Vec<(f64, f64)>,
	edges: Vec<(usize, usize)>,
}

impl BoardGraph {
	/// Builds a graph, rejecting edges with out-of-range endpoints.
	pub fn new(
		positions: Vec<(f64, f64)>,
		edges: Vec<(usize, usize)>,
	) -> Result<Self, InvalidEdge> {
		let nodes = positions.len();
		for &(a, b) in &edges {
			if a >= nodes || b >= nodes {
				return Err(InvalidEdge { a, b, nodes });
			}
		}
		Ok(Self { positions, edges })
	}

	pub fn node_count(&self) -> usize {
		self.positions.len()
	}

	pub fn edge_count(&self) -> usize {
		self.edges.len()
	}

	pub fn positions(&self) -> &[(f64, f64)] {
		&self.positions
	}

	pub fn edges(&self) -> &[(usize, usize)] {
		&self.edges
	}
}

/// A move request forwarded to the engine.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Move {
	Node(usize),
	Pass,
}

impl fmt::Display for Move {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Node(index) => write!(f, "{index}"),
			Self::Pass => f.write_str("pass"),
		}
	}
}

/// Authoritative game state pushed by the engine.
#[derive(Clone, Debug, PartialEq)]
pub struct SessionInfo {
	pub key: SessionKey,
	pub state: Vec<NodeStatus>,
	pub turn: Player,
	pub ended: bool,
	pub captures: PlayerTotals,
	pub komi: f64,
	/// Final scores; present exactly when `ended` is set.
	pub score: Option<PlayerTotals>,
}

/// Result of a finished game, with an explicit tie.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Outcome {
	BlackWins { margin: f64 },
	WhiteWins { margin: f64 },
	Tie,
}

impl Outcome {
	/// Compares final scores. Equal totals are a tie, not a win for either side.
	pub fn from_scores(score: PlayerTotals) -> Self {
		if score.black > score.white {
			Self::BlackWins {
				margin: score.black - score.white,
			}
		} else if score.white > score.black {
			Self::WhiteWins {
				margin: score.white - score.black,
			}
		} else {
			Self::Tie
		}
	}
}
