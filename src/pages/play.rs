use std::cell::RefCell;
use std::rc::Rc;

use leptos::prelude::*;

use crate::bridge::{EngineBridge, EnginePush, register_push_handler};
use crate::components::board::BoardCanvas;
use crate::model::{BoardGraph, Move, NodeStatus};
use crate::registry::{DEFAULT_BLACK, DEFAULT_MODE, DEFAULT_WHITE, ModeRegistry, PLAYER_ROSTER};
use crate::session::{Session, SessionAction};

/// Owns the session machine and publishes everything the page renders.
struct Controller {
	bridge: Rc<dyn EngineBridge>,
	session: RefCell<Session>,
	graph: RwSignal<Option<BoardGraph>>,
	stones: RwSignal<Vec<NodeStatus>>,
	status: RwSignal<String>,
	score: RwSignal<String>,
}

impl Controller {
	fn new(bridge: Rc<dyn EngineBridge>) -> Self {
		Self {
			bridge,
			session: RefCell::new(Session::new()),
			graph: RwSignal::new(None),
			stones: RwSignal::new(Vec::new()),
			status: RwSignal::new(String::new()),
			score: RwSignal::new(String::new()),
		}
	}

	fn handle_push(&self, push: EnginePush) {
		match push {
			EnginePush::Update(info) => {
				let actions = self.session.borrow_mut().on_info(info);
				self.run(actions);
			}
			EnginePush::Graph(graph) => {
				let actions = self.session.borrow_mut().on_graph(graph);
				self.run(actions);
			}
			EnginePush::Alert(message) => {
				log::warn!("engine alert: {message}");
				alert(&message);
			}
		}
	}

	fn run(&self, actions: Vec<SessionAction>) {
		for action in actions {
			match action {
				SessionAction::FetchGraph(key) => {
					if let Err(e) = self.bridge.request_graph(&key) {
						log::error!("graph request failed: {e}");
					}
				}
				SessionAction::InstallBoard(graph) => {
					// Blank until an update lands on the new board.
					self.stones.set(Vec::new());
					self.graph.set(Some(graph));
				}
				SessionAction::ApplyBoard(state) => self.stones.set(state),
				SessionAction::ShowStatus(text) => self.status.set(text),
				SessionAction::ShowScore(text) => self.score.set(text),
			}
		}
	}

	fn start(&self, graph_type: &str, black: &str, white: &str) {
		self.session.borrow_mut().reset();
		// The old board and its captures line come down as soon as a new
		// game is requested; the status line stays until fresh info lands.
		self.stones.set(Vec::new());
		self.graph.set(None);
		self.score.set(String::new());
		if let Err(e) = self.bridge.start_game(graph_type, black, white) {
			log::error!("start_game failed: {e}");
			self.status.set("Engine unavailable.".into());
		}
	}

	fn select_node(&self, index: usize) {
		self.submit(Move::Node(index));
	}

	fn pass(&self) {
		self.submit(Move::Pass);
	}

	fn submit(&self, mv: Move) {
		let key = self.session.borrow().key().cloned();
		let Some(key) = key else {
			log::warn!("ignoring move {mv}: no game running");
			self.status.set("Start a game first.".into());
			return;
		};
		if let Err(e) = self.bridge.make_move(&key, mv) {
			log::error!("make_move failed: {e}");
			self.status.set("Engine unavailable.".into());
		}
	}
}

#[cfg(target_arch = "wasm32")]
fn engine_bridge() -> Rc<dyn EngineBridge> {
	Rc::new(crate::bridge::JsEngineBridge)
}

#[cfg(not(target_arch = "wasm32"))]
fn engine_bridge() -> Rc<dyn EngineBridge> {
	Rc::new(crate::bridge::DetachedBridge)
}

#[cfg(target_arch = "wasm32")]
fn alert(message: &str) {
	if let Some(window) = web_sys::window() {
		let _ = window.alert_with_message(message);
	}
}

#[cfg(not(target_arch = "wasm32"))]
fn alert(_message: &str) {}

/// Game page: selection controls on top, the live board underneath.
#[component]
pub fn Play() -> impl IntoView {
	let mode = RwSignal::new(DEFAULT_MODE.to_string());
	let black = RwSignal::new(DEFAULT_BLACK.to_string());
	let white = RwSignal::new(DEFAULT_WHITE.to_string());

	let controller = Rc::new(Controller::new(engine_bridge()));
	let (graph, stones) = (controller.graph, controller.stones);
	let (status, score) = (controller.status, controller.score);

	// The registration lives exactly as long as the page.
	let handler = {
		let controller = controller.clone();
		register_push_handler(Rc::new(move |push| controller.handle_push(push)))
	};
	let _guard = StoredValue::new_local(handler);

	let registry = ModeRegistry::standard();
	let mode_options: Vec<(String, String)> = registry
		.modes()
		.map(|(id, label)| (id.to_string(), label.to_string()))
		.collect();

	let on_start = {
		let controller = controller.clone();
		move |_| {
			controller.start(
				&mode.get_untracked(),
				&black.get_untracked(),
				&white.get_untracked(),
			)
		}
	};
	let on_pass = {
		let controller = controller.clone();
		move |_| controller.pass()
	};
	let on_select = move |index| controller.select_node(index);

	view! {
		<div class="play-page">
			<h1>"Go on Graphs"</h1>

			<div class="controls">
				<label>
					"Game type "
					<select on:change=move |ev| mode.set(event_target_value(&ev))>
						{mode_options
							.into_iter()
							.map(|(id, label)| {
								let chosen = id == DEFAULT_MODE;
								view! {
									<option value=id selected=chosen>
										{label}
									</option>
								}
							})
							.collect_view()}
					</select>
				</label>
				<label>
					"Black "
					<select on:change=move |ev| black.set(event_target_value(&ev))>
						{player_options(DEFAULT_BLACK)}
					</select>
				</label>
				<label>
					"White "
					<select on:change=move |ev| white.set(event_target_value(&ev))>
						{player_options(DEFAULT_WHITE)}
					</select>
				</label>
				<button on:click=on_start>"Start Game"</button>
				<button on:click=on_pass>"Pass"</button>
			</div>

			<div class="legend">
				<span class="game-type-label">{move || registry.label_for(&mode.get())}</span>
				<span>"Black: "{move || black.get()}</span>
				<span>"White: "{move || white.get()}</span>
			</div>

			<BoardCanvas graph=graph stones=stones on_select=on_select />

			<p class="status-label">{move || status.get()}</p>
			<p class="score-label">{move || score.get()}</p>
		</div>
	}
}

fn player_options(default: &'static str) -> impl IntoView {
	PLAYER_ROSTER
		.iter()
		.map(|&player| {
			let chosen = player == default;
			view! {
				<option value=player selected=chosen>
					{player}
				</option>
			}
		})
		.collect_view()
}
