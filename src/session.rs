//! Session lifecycle: pairs engine pushes with the board they belong to and
//! turns each update into concrete view changes.

use crate::model::{BoardGraph, NodeStatus, Outcome, Player, SessionInfo, SessionKey};

/// Where the client stands relative to the engine-side session.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SessionPhase {
	/// No game running; move intents are refused locally.
	NoSession,
	/// The engine announced a session whose board graph has not arrived yet.
	AwaitingGraph(SessionKey),
	/// Board installed and tracking updates.
	Active(SessionKey),
}

/// View updates produced by feeding a push through the machine, in apply order.
#[derive(Clone, Debug, PartialEq)]
pub enum SessionAction {
	/// Ask the engine for the board graph of the named session.
	FetchGraph(SessionKey),
	/// Replace the rendered board.
	InstallBoard(BoardGraph),
	/// Overwrite the stones on the installed board.
	ApplyBoard(Vec<NodeStatus>),
	/// Replace the turn / result line.
	ShowStatus(String),
	/// Replace the captures line.
	ShowScore(String),
}

/// State machine between engine pushes and the rendered page.
///
/// Graph pushes carry no session key, so ordering does the pairing: a graph
/// arriving while a session awaits one is that session's board.
pub struct Session {
	phase: SessionPhase,
	/// Update that raced ahead of its board; replayed once the graph lands.
	pending: Option<SessionInfo>,
	board_installed: bool,
}

impl Session {
	pub fn new() -> Self {
		Self {
			phase: SessionPhase::NoSession,
			pending: None,
			board_installed: false,
		}
	}

	pub fn phase(&self) -> &SessionPhase {
		&self.phase
	}

	/// The key of the session being tracked, if any.
	pub fn key(&self) -> Option<&SessionKey> {
		match &self.phase {
			SessionPhase::NoSession => None,
			SessionPhase::AwaitingGraph(key) | SessionPhase::Active(key) => Some(key),
		}
	}

	/// Forgets the tracked session. The next update push starts over.
	pub fn reset(&mut self) {
		self.phase = SessionPhase::NoSession;
		self.pending = None;
		self.board_installed = false;
	}

	/// Feeds a board graph push through the machine.
	pub fn on_graph(&mut self, graph: BoardGraph) -> Vec<SessionAction> {
		self.board_installed = true;
		let mut actions = vec![SessionAction::InstallBoard(graph)];
		if let SessionPhase::AwaitingGraph(key) = &self.phase {
			log::info!("session {key} active");
			self.phase = SessionPhase::Active(key.clone());
		}
		if let Some(info) = self.pending.take() {
			actions.extend(apply(&info));
		}
		actions
	}

	/// Feeds a game-state push through the machine.
	pub fn on_info(&mut self, info: SessionInfo) -> Vec<SessionAction> {
		match &self.phase {
			SessionPhase::Active(key) if *key == info.key => apply(&info),
			SessionPhase::AwaitingGraph(key) if *key == info.key => {
				// Text tracks the newest update straight away; the board
				// state waits for its graph. Latest update wins the replay.
				let actions = vec![
					SessionAction::ShowStatus(status_line(&info)),
					SessionAction::ShowScore(score_line(&info)),
				];
				self.pending = Some(info);
				actions
			}
			SessionPhase::NoSession if self.board_installed => {
				// Start flow: the board landed first, and this update names
				// the session it belongs to.
				log::info!("session {} active", info.key);
				self.phase = SessionPhase::Active(info.key.clone());
				apply(&info)
			}
			_ => {
				// Unknown session with no board to show it on. Ask for the
				// graph, show the text right away and hold the board state
				// back until the graph arrives.
				let key = info.key.clone();
				log::info!("adopting session {key}, fetching its board");
				self.phase = SessionPhase::AwaitingGraph(key.clone());
				self.board_installed = false;
				let actions = vec![
					SessionAction::FetchGraph(key),
					SessionAction::ShowStatus(status_line(&info)),
					SessionAction::ShowScore(score_line(&info)),
				];
				self.pending = Some(info);
				actions
			}
		}
	}
}

fn apply(info: &SessionInfo) -> Vec<SessionAction> {
	// Stones land before the labels, so the text never describes an older board.
	vec![
		SessionAction::ApplyBoard(info.state.clone()),
		SessionAction::ShowStatus(status_line(info)),
		SessionAction::ShowScore(score_line(info)),
	]
}

/// The headline: whose turn it is, or the result once the game has ended.
pub fn status_line(info: &SessionInfo) -> String {
	if !info.ended {
		return format!("{}'s turn.", info.turn);
	}
	let Some(score) = info.score else {
		log::error!("finished session {} carries no final scores", info.key);
		return String::from("Game over.");
	};
	let black = score.get(Player::Black);
	let white = score.get(Player::White);
	let (winner, margin) = match Outcome::from_scores(score) {
		Outcome::BlackWins { margin } => (Player::Black, margin),
		Outcome::WhiteWins { margin } => (Player::White, margin),
		Outcome::Tie => return format!("Tie game (Black: {black}, White: {white})"),
	};
	format!("{winner} won with {margin} points (Black: {black}, White: {white})")
}

/// The captures line. Cleared once the game ends and the result takes over.
pub fn score_line(info: &SessionInfo) -> String {
	if info.ended {
		return String::new();
	}
	format!(
		"Black: {} captures, White: {} captures + {} komi.",
		info.captures.get(Player::Black),
		info.captures.get(Player::White),
		info.komi
	)
}
