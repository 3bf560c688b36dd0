//! Engine bridge surface: outbound calls and inbound push dispatch.
//!
//! Outbound calls are fire-and-forget; nothing returns over them. Engine
//! state flows back through pushes which land in whatever handler the page
//! registered. Registration yields a guard so a page tearing down stops
//! receiving pushes.

use std::cell::RefCell;
use std::rc::Rc;

use thiserror::Error;

use crate::model::{BoardGraph, Move, SessionInfo, SessionKey};

/// Failures raising an outbound engine call.
#[derive(Debug, Error)]
pub enum BridgeError {
	/// No engine host is attached to the page.
	#[error("engine host is not attached")]
	MissingHost,

	/// The host rejected or failed the call.
	#[error("engine call {call} failed: {message}")]
	Call { call: &'static str, message: String },
}

/// Outbound fire-and-forget calls to the game engine.
pub trait EngineBridge {
	/// Asks the engine to start a game; state arrives later as pushes.
	fn start_game(&self, graph_type: &str, black: &str, white: &str) -> Result<(), BridgeError>;

	/// Forwards a move request for the given session.
	fn make_move(&self, key: &SessionKey, mv: Move) -> Result<(), BridgeError>;

	/// Asks the engine to re-push the graph of the given session. The
	/// response arrives through the ordinary graph push, not a return value.
	fn request_graph(&self, key: &SessionKey) -> Result<(), BridgeError>;
}

/// A bridge with no engine behind it; every call reports the absence.
/// Stands in off-target and on pages loaded without a host.
pub struct DetachedBridge;

impl EngineBridge for DetachedBridge {
	fn start_game(&self, _graph_type: &str, _black: &str, _white: &str) -> Result<(), BridgeError> {
		Err(BridgeError::MissingHost)
	}

	fn make_move(&self, _key: &SessionKey, _mv: Move) -> Result<(), BridgeError> {
		Err(BridgeError::MissingHost)
	}

	fn request_graph(&self, _key: &SessionKey) -> Result<(), BridgeError> {
		Err(BridgeError::MissingHost)
	}
}

/// One inbound engine push, already decoded and validated.
#[derive(Clone, Debug, PartialEq)]
pub enum EnginePush {
	/// Authoritative session state.
	Update(SessionInfo),
	/// The playing graph for the current session.
	Graph(BoardGraph),
	/// A human-readable complaint (illegal move, engine failure).
	Alert(String),
}

/// Receiver for decoded engine pushes.
pub type PushHandler = Rc<dyn Fn(EnginePush)>;

thread_local! {
	static PUSH_HANDLER: RefCell<Option<PushHandler>> = const { RefCell::new(None) };
}

/// Keeps a registered push handler alive; dropping it unregisters.
pub struct PushHandlerGuard {
	handler: PushHandler,
}

impl Drop for PushHandlerGuard {
	fn drop(&mut self) {
		PUSH_HANDLER.with(|slot| {
			let mut slot = slot.borrow_mut();
			// Only evict our own registration; a newer one stays.
			if slot.as_ref().is_some_and(|h| Rc::ptr_eq(h, &self.handler)) {
				*slot = None;
			}
		});
	}
}

/// Routes subsequent pushes to `handler`. A newer registration replaces any
/// older one.
pub fn register_push_handler(handler: PushHandler) -> PushHandlerGuard {
	PUSH_HANDLER.with(|slot| {
		if slot.borrow_mut().replace(handler.clone()).is_some() {
			log::warn!("replacing an existing engine push handler");
		}
	});
	PushHandlerGuard { handler }
}

/// Hands one push to the registered handler. A push with no handler is
/// reported and dropped; the engine keeps pushing on every state change.
pub fn dispatch_push(push: EnginePush) {
	let handler = PUSH_HANDLER.with(|slot| slot.borrow().clone());
	match handler {
		Some(handler) => handler(push),
		None => log::warn!("engine push dropped: no handler registered"),
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn recording_handler() -> (PushHandler, Rc<RefCell<Vec<EnginePush>>>) {
		let seen = Rc::new(RefCell::new(Vec::new()));
		let sink = seen.clone();
		let handler: PushHandler = Rc::new(move |push| sink.borrow_mut().push(push));
		(handler, seen)
	}

	#[test]
	fn test_dispatch_reaches_registered_handler() {
		let (handler, seen) = recording_handler();
		let _guard = register_push_handler(handler);
		dispatch_push(EnginePush::Alert("illegal move".into()));
		assert_eq!(*seen.borrow(), vec![EnginePush::Alert("illegal move".into())]);
	}

	#[test]
	fn test_dropped_guard_stops_delivery() {
		let (handler, seen) = recording_handler();
		let guard = register_push_handler(handler);
		drop(guard);
		dispatch_push(EnginePush::Alert("late".into()));
		assert!(seen.borrow().is_empty());
	}

	#[test]
	fn test_newer_registration_wins() {
		let (first, seen_first) = recording_handler();
		let (second, seen_second) = recording_handler();
		let _g1 = register_push_handler(first);
		let _g2 = register_push_handler(second);
		dispatch_push(EnginePush::Alert("x".into()));
		assert!(seen_first.borrow().is_empty());
		assert_eq!(seen_second.borrow().len(), 1);
	}

	#[test]
	fn test_stale_guard_does_not_evict_newer_handler() {
		let (first, _) = recording_handler();
		let (second, seen_second) = recording_handler();
		let stale = register_push_handler(first);
		let _g2 = register_push_handler(second);
		drop(stale);
		dispatch_push(EnginePush::Alert("x".into()));
		assert_eq!(seen_second.borrow().len(), 1);
	}

	#[test]
	fn test_detached_bridge_reports_missing_host() {
		let bridge = DetachedBridge;
		assert!(matches!(
			bridge.start_game("GRID 5 5", "you", "MiniMax 3"),
			Err(BridgeError::MissingHost)
		));
		assert!(matches!(
			bridge.make_move(&SessionKey::new("K"), Move::Pass),
			Err(BridgeError::MissingHost)
		));
	}
}
