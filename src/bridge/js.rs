//! Browser-side bridge plumbing: outbound calls into the `window.engine`
//! shim and the exported entry points the shim feeds pushes into.

use js_sys::{Function, Reflect};
use wasm_bindgen::prelude::*;

use super::client::{BridgeError, EngineBridge, EnginePush, dispatch_push};
use super::protocol;
use crate::model::{Move, SessionKey};

/// Bridge implementation backed by the `window.engine` shim.
///
/// The shim is looked up per call, so the host may attach at any point
/// after the page loads.
pub struct JsEngineBridge;

impl JsEngineBridge {
	fn call(name: &'static str, args: &[JsValue]) -> Result<(), BridgeError> {
		let window = web_sys::window().ok_or(BridgeError::MissingHost)?;
		let host = Reflect::get(&window, &JsValue::from_str("engine"))
			.ok()
			.filter(|host| !host.is_undefined() && !host.is_null())
			.ok_or(BridgeError::MissingHost)?;
		let fun: Function = Reflect::get(&host, &JsValue::from_str(name))
			.ok()
			.and_then(|f| f.dyn_into().ok())
			.ok_or(BridgeError::MissingHost)?;
		let result = match args {
			[a] => fun.call1(&host, a),
			[a, b] => fun.call2(&host, a, b),
			[a, b, c] => fun.call3(&host, a, b, c),
			_ => fun.call0(&host),
		};
		result.map(|_| ()).map_err(|e| BridgeError::Call {
			call: name,
			message: js_error_text(&e),
		})
	}
}

impl EngineBridge for JsEngineBridge {
	fn start_game(&self, graph_type: &str, black: &str, white: &str) -> Result<(), BridgeError> {
		log::debug!("starting game: {graph_type}, black {black}, white {white}");
		Self::call(
			"startGame",
			&[
				JsValue::from_str(graph_type),
				JsValue::from_str(black),
				JsValue::from_str(white),
			],
		)
	}

	fn make_move(&self, key: &SessionKey, mv: Move) -> Result<(), BridgeError> {
		log::debug!("making move {mv}");
		Self::call(
			"makeMove",
			&[JsValue::from_str(key.as_str()), move_to_wire(mv)],
		)
	}

	fn request_graph(&self, key: &SessionKey) -> Result<(), BridgeError> {
		log::debug!("requesting graph for session {key}");
		Self::call("requestGraph", &[JsValue::from_str(key.as_str())])
	}
}

// The engine tells a node move from a pass by type: moves travel as a bare
// number, a pass as the string "pass".
fn move_to_wire(mv: Move) -> JsValue {
	match mv {
		Move::Node(index) => JsValue::from_f64(index as f64),
		Move::Pass => JsValue::from_str("pass"),
	}
}

fn js_error_text(value: &JsValue) -> String {
	value.as_string().unwrap_or_else(|| format!("{value:?}"))
}

fn json_text(payload: &JsValue) -> Option<String> {
	js_sys::JSON::stringify(payload).ok().map(String::from)
}

/// Entry point for session info pushes; the shim forwards the engine's
/// object here.
#[wasm_bindgen(js_name = updateGui)]
pub fn update_gui(payload: JsValue) {
	let Some(text) = json_text(&payload) else {
		log::error!("dropping session info push: payload does not serialise");
		return;
	};
	match protocol::parse_session_info(&text) {
		Ok(info) => dispatch_push(EnginePush::Update(info)),
		Err(e) => log::error!("dropping session info push: {e}"),
	}
}

/// Entry point for graph pushes.
#[wasm_bindgen(js_name = setGraph)]
pub fn set_graph(payload: JsValue) {
	let Some(text) = json_text(&payload) else {
		log::error!("dropping graph push: payload does not serialise");
		return;
	};
	match protocol::parse_graph(&text) {
		Ok(graph) => dispatch_push(EnginePush::Graph(graph)),
		Err(e) => log::error!("dropping graph push: {e}"),
	}
}

/// Entry point for engine alert pushes.
#[wasm_bindgen(js_name = promptAlert)]
pub fn prompt_alert(message: String) {
	dispatch_push(EnginePush::Alert(message));
}
