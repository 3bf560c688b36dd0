use std::f64::consts::PI;

use web_sys::CanvasRenderingContext2d;

use super::state::{BoardView, STONE_RADIUS};
use crate::model::NodeStatus;

const BACKGROUND: &str = "#fafafa";
const LINK_STYLE: &str = "rgba(153, 153, 153, 0.6)";
const LINK_WIDTH: f64 = 3.0;
const STONE_OUTLINE: &str = "#fff";
const STONE_OUTLINE_WIDTH: f64 = 3.0;

pub fn render(view: &BoardView, ctx: &CanvasRenderingContext2d) {
	ctx.set_fill_style_str(BACKGROUND);
	ctx.fill_rect(0.0, 0.0, view.width(), view.height());
	draw_links(view, ctx);
	draw_stones(view, ctx);
}

fn draw_links(view: &BoardView, ctx: &CanvasRenderingContext2d) {
	ctx.set_stroke_style_str(LINK_STYLE);
	ctx.set_line_width(LINK_WIDTH);
	ctx.begin_path();
	for &(a, b) in view.links() {
		let (x1, y1) = view.node_position(a);
		let (x2, y2) = view.node_position(b);
		ctx.move_to(x1, y1);
		ctx.line_to(x2, y2);
	}
	ctx.stroke();
}

fn stone_fill(status: NodeStatus) -> &'static str {
	match status {
		NodeStatus::Empty => "orange",
		NodeStatus::Black => "black",
		NodeStatus::White => "white",
	}
}

fn draw_stones(view: &BoardView, ctx: &CanvasRenderingContext2d) {
	for index in 0..view.node_count() {
		let (x, y) = view.node_position(index);
		let status = view.stone(index);

		ctx.begin_path();
		let _ = ctx.arc(x, y, STONE_RADIUS, 0.0, 2.0 * PI);
		ctx.set_fill_style_str(stone_fill(status));
		ctx.fill();
		ctx.set_stroke_style_str(STONE_OUTLINE);
		ctx.set_line_width(STONE_OUTLINE_WIDTH);
		ctx.stroke();

		if status != NodeStatus::Empty {
			shade_stone(ctx, x, y, status);
		}
	}
}

// Soft radial shading so occupied stones read as discs instead of flat fills.
fn shade_stone(ctx: &CanvasRenderingContext2d, x: f64, y: f64, status: NodeStatus) {
	let gradient = ctx
		.create_radial_gradient(
			x - STONE_RADIUS * 0.35,
			y - STONE_RADIUS * 0.35,
			STONE_RADIUS * 0.2,
			x,
			y,
			STONE_RADIUS,
		)
		.unwrap();
	let (inner, outer) = match status {
		NodeStatus::Black => ("rgba(90, 90, 90, 0.8)", "rgba(0, 0, 0, 0)"),
		_ => ("rgba(255, 255, 255, 0.9)", "rgba(160, 160, 160, 0.35)"),
	};
	gradient.add_color_stop(0.0, inner).unwrap();
	gradient.add_color_stop(1.0, outer).unwrap();
	ctx.begin_path();
	let _ = ctx.arc(x, y, STONE_RADIUS, 0.0, 2.0 * PI);
	#[allow(deprecated)]
	ctx.set_fill_style(&gradient);
	ctx.fill();
}
