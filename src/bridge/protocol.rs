//! Decoding of engine payloads into validated domain types.
//!
//! Key names and codes mirror the engine wire format exactly: graphs arrive
//! as `{"pos": [[x, y], ...], "edges": [[a, b], ...]}`, session info keys
//! its totals objects by the player wire code as a string, and `score` is an
//! empty object until the game ends.

use std::collections::BTreeMap;

use serde::Deserialize;
use thiserror::Error;

use crate::model::{
	BoardGraph, InvalidEdge, NodeStatus, Player, PlayerTotals, SessionInfo, SessionKey,
};

/// Result alias for payload decoding.
pub type ProtocolResult<T> = Result<T, ProtocolError>;

/// Ways an engine payload can fail validation.
#[derive(Debug, Error)]
pub enum ProtocolError {
	/// The payload was not the JSON shape the engine sends.
	#[error("malformed engine payload: {0}")]
	Json(#[from] serde_json::Error),

	/// A node status outside {-1, 0, 1}.
	#[error("unknown node status code {0}")]
	UnknownStatus(i64),

	/// A player code outside {0, 1}.
	#[error("unknown player code {0}")]
	UnknownPlayer(i64),

	/// An edge endpoint outside the node range.
	#[error(transparent)]
	Edge(#[from] InvalidEdge),

	/// A totals object without an entry for the given player.
	#[error("totals object is missing the entry for {0}")]
	MissingTotal(Player),

	/// Info flagged `ended` without final scores attached.
	#[error("terminal session info carries no score")]
	MissingScore,
}

#[derive(Debug, Deserialize)]
struct WireInfo {
	key: String,
	state: Vec<i64>,
	komi: f64,
	turn: i64,
	captures: BTreeMap<String, f64>,
	ended: bool,
	#[serde(default)]
	score: BTreeMap<String, f64>,
}

#[derive(Debug, Deserialize)]
struct WireGraph {
	pos: Vec<(f64, f64)>,
	edges: Vec<(usize, usize)>,
}

/// Decodes a session info push.
pub fn parse_session_info(payload: &str) -> ProtocolResult<SessionInfo> {
	let wire: WireInfo = serde_json::from_str(payload)?;
	let state = wire
		.state
		.iter()
		.map(|&code| NodeStatus::from_wire(code).ok_or(ProtocolError::UnknownStatus(code)))
		.collect::<ProtocolResult<Vec<_>>>()?;
	let turn = Player::from_wire(wire.turn).ok_or(ProtocolError::UnknownPlayer(wire.turn))?;
	let captures = totals(&wire.captures)?;
	let score = if wire.score.is_empty() {
		None
	} else {
		Some(totals(&wire.score)?)
	};
	if wire.ended && score.is_none() {
		return Err(ProtocolError::MissingScore);
	}
	Ok(SessionInfo {
		key: SessionKey::new(wire.key),
		state,
		turn,
		ended: wire.ended,
		captures,
		komi: wire.komi,
		score,
	})
}

/// Decodes a graph push.
pub fn parse_graph(payload: &str) -> ProtocolResult<BoardGraph> {
	let wire: WireGraph = serde_json::from_str(payload)?;
	Ok(BoardGraph::new(wire.pos, wire.edges)?)
}

// The engine keys totals objects by the numeric player code, which JSON
// delivers as a string.
fn totals(map: &BTreeMap<String, f64>) -> ProtocolResult<PlayerTotals> {
	let entry = |player: Player, key: &str| {
		map.get(key)
			.copied()
			.ok_or(ProtocolError::MissingTotal(player))
	};
	Ok(PlayerTotals::new(
		entry(Player::Black, "0")?,
		entry(Player::White, "1")?,
	))
}

#[cfg(test)]
mod tests {
	use super::*;
	use serde_json::json;

	fn live_info() -> serde_json::Value {
		json!({
			"key": "QZJLFVPU0WXK3B8M2Y7D",
			"state": [-1, 0, 1, -1],
			"komi": 6.5,
			"turn": 1,
			"captures": {"0": 2, "1": 1},
			"ended": false,
			"score": {}
		})
	}

	#[test]
	fn test_live_info_decodes() {
		let info = parse_session_info(&live_info().to_string()).unwrap();
		assert_eq!(info.key, SessionKey::new("QZJLFVPU0WXK3B8M2Y7D"));
		assert_eq!(
			info.state,
			vec![
				NodeStatus::Empty,
				NodeStatus::Black,
				NodeStatus::White,
				NodeStatus::Empty,
			]
		);
		assert_eq!(info.turn, Player::White);
		assert!(!info.ended);
		assert_eq!(info.captures, PlayerTotals::new(2.0, 1.0));
		assert_eq!(info.komi, 6.5);
		assert_eq!(info.score, None);
	}

	#[test]
	fn test_terminal_info_decodes_scores() {
		let mut payload = live_info();
		payload["ended"] = json!(true);
		payload["score"] = json!({"0": 7.0, "1": 3.0});
		let info = parse_session_info(&payload.to_string()).unwrap();
		assert!(info.ended);
		assert_eq!(info.score, Some(PlayerTotals::new(7.0, 3.0)));
	}

	#[test]
	fn test_terminal_info_without_score_is_rejected() {
		let mut payload = live_info();
		payload["ended"] = json!(true);
		let err = parse_session_info(&payload.to_string()).unwrap_err();
		assert!(matches!(err, ProtocolError::MissingScore));
	}

	#[test]
	fn test_unknown_status_code_is_rejected() {
		let mut payload = live_info();
		payload["state"] = json!([-1, 5]);
		let err = parse_session_info(&payload.to_string()).unwrap_err();
		assert!(matches!(err, ProtocolError::UnknownStatus(5)));
	}

	#[test]
	fn test_unknown_player_code_is_rejected() {
		let mut payload = live_info();
		payload["turn"] = json!(3);
		let err = parse_session_info(&payload.to_string()).unwrap_err();
		assert!(matches!(err, ProtocolError::UnknownPlayer(3)));
	}

	#[test]
	fn test_totals_missing_a_player_is_rejected() {
		let mut payload = live_info();
		payload["captures"] = json!({"0": 2});
		let err = parse_session_info(&payload.to_string()).unwrap_err();
		assert!(matches!(err, ProtocolError::MissingTotal(Player::White)));
	}

	#[test]
	fn test_graph_decodes() {
		let payload = json!({
			"pos": [[0.1, 0.2], [0.9, 0.8], [0.5, 0.5]],
			"edges": [[0, 1], [1, 2]]
		});
		let graph = parse_graph(&payload.to_string()).unwrap();
		assert_eq!(graph.node_count(), 3);
		assert_eq!(graph.edge_count(), 2);
		assert_eq!(graph.positions()[1], (0.9, 0.8));
	}

	#[test]
	fn test_graph_edge_out_of_range_is_rejected() {
		let payload = json!({
			"pos": [[0.1, 0.2], [0.9, 0.8]],
			"edges": [[0, 5]]
		});
		let err = parse_graph(&payload.to_string()).unwrap_err();
		assert!(matches!(
			err,
			ProtocolError::Edge(InvalidEdge { a: 0, b: 5, nodes: 2 })
		));
	}

	#[test]
	fn test_malformed_payload_is_rejected() {
		assert!(matches!(
			parse_session_info("not json").unwrap_err(),
			ProtocolError::Json(_)
		));
	}
}
