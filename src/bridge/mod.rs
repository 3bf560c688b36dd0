//! Typed wrapper over the asymmetric RPC bridge to the game engine.

mod client;
#[cfg(target_arch = "wasm32")]
mod js;
mod protocol;

pub use client::{
	BridgeError, DetachedBridge, EngineBridge, EnginePush, PushHandler, PushHandlerGuard,
	dispatch_push, register_push_handler,
};
#[cfg(target_arch = "wasm32")]
pub use js::JsEngineBridge;
pub use protocol::{ProtocolError, ProtocolResult, parse_graph, parse_session_info};
