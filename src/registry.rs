//! Game-mode catalog and player roster backing the selection controls.

/// Mode selected when the page first loads.
pub const DEFAULT_MODE: &str = "GRID 5 5";
/// Black seat default: the human player.
pub const DEFAULT_BLACK: &str = "you";
/// White seat default.
pub const DEFAULT_WHITE: &str = "MiniMax 3";

/// Player identifiers offered for either colour, exactly as the engine
/// parses them. A player identifier doubles as its own display label;
/// only game modes carry a separate one.
pub const PLAYER_ROSTER: &[&str] = &[
	"you",
	"MiniMax 1",
	"MiniMax 2",
	"MiniMax 3",
	"AlphaBeta 3",
	"AlphaBeta 4",
];

/// Ordered mapping from engine mode identifiers to display labels.
pub struct ModeRegistry {
	modes: Vec<(String, String)>,
}

impl ModeRegistry {
	/// The built-in catalog, in menu order.
	pub fn standard() -> Self {
		let modes = [
			("GRID 5 3", "5x3 Grid"),
			("GRID 4 4", "4x4 Grid"),
			("GRID 5 5", "5x5 Grid"),
			("GRID 7 7", "7x7 Grid"),
			("GRID 9 9", "9x9 Grid"),
			("USA", "USA Map"),
			("VORONOI CELLS", "Random Voronoi Cells"),
			("VORONOI RIDGES", "Random Voronoi Ridges"),
			("KARATE", "Karate Network"),
			("DODECAHEDRAL", "Dodecahedral Graph"),
		]
		.into_iter()
		.map(|(id, label)| (id.to_string(), label.to_string()))
		.collect();
		Self { modes }
	}

	/// Adds a mode at the end of the menu. The engine understands more
	/// identifiers than the standard menu offers (parameterised families
	/// like `REGULAR n d`), so the catalog stays open.
	pub fn with_mode(mut self, id: impl Into<String>, label: impl Into<String>) -> Self {
		self.modes.push((id.into(), label.into()));
		self
	}

	/// The display label for a mode. Total: an identifier missing from the
	/// catalog is its own label, with the gap reported.
	pub fn label_for(&self, id: &str) -> String {
		match self.modes.iter().find(|(mode, _)| mode.as_str() == id) {
			Some((_, label)) => label.clone(),
			None => {
				log::warn!("no display label registered for mode {id:?}");
				id.to_string()
			}
		}
	}

	/// Catalog iteration in menu order.
	pub fn modes(&self) -> impl Iterator<Item = (&str, &str)> {
		self.modes
			.iter()
			.map(|(id, label)| (id.as_str(), label.as_str()))
	}
}
