//! Cross-draw render state and the redraw coordination logic.
//!
//! The only state that survives a render pass lives here. Everything else
//! (descriptors, edge lists, event wiring) is rebuilt from fresh markup on
//! every draw. The coordinator inspects each incoming request against the
//! previous one and decides whether the viewport should recenter.

use super::types::GraphRenderRequest;

/// Sentinel build id meaning "nothing drawn yet".
pub const NO_BUILD: i64 = -1;

/// Process-wide render state, one instance per page session.
#[derive(Clone, Debug)]
pub struct RenderState {
	/// Whether any draw has completed this session.
	pub has_drawn_once: bool,
	/// Build currently on screen, [`NO_BUILD`] when none.
	pub current_build_id: i64,
	/// Whether the last request targeted the build already drawn.
	pub same_build_as_last_draw: bool,
	/// Whether the last request asked for a fresh draw.
	pub was_fresh_draw: bool,
	/// Filter text active during the last draw.
	pub active_content_filter: String,
}

impl Default for RenderState {
	fn default() -> Self {
		Self {
			has_drawn_once: false,
			current_build_id: NO_BUILD,
			same_build_as_last_draw: false,
			was_fresh_draw: false,
			active_content_filter: String::new(),
		}
	}
}

/// Outcome of coordinating one render request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DrawDecision {
	/// Whether the viewport should recenter after this draw.
	pub recenter: bool,
	/// Whether this is the first draw of the session.
	pub first_draw: bool,
}

/// Decides, for each incoming request, whether it is a fresh draw or a
/// refresh of an already-drawn build. Deciding and recording are separate
/// steps; only a pass that rendered gets recorded.
///
/// Lives for the page session; there is no terminal state. A same-build,
/// non-fresh redraw (the polling case) must not recenter, so the view does
/// not jump while the user is inspecting it.
#[derive(Debug, Default)]
pub struct RedrawCoordinator {
	state: RenderState,
}

impl RedrawCoordinator {
	pub fn new() -> Self {
		Self::default()
	}

	/// Current cross-draw state, read-only.
	pub fn state(&self) -> &RenderState {
		&self.state
	}

	/// Decide whether the incoming request needs a recenter. Does not
	/// change any state; a pass that aborts before rendering must leave
	/// the next request's decision untouched.
	///
	/// Recenter happens on the first draw of a session, whenever the
	/// request carries `fresh_draw`, and whenever the target build differs
	/// from the build currently drawn.
	pub fn decide(&self, request: &GraphRenderRequest) -> DrawDecision {
		let first_draw = !self.state.has_drawn_once;
		DrawDecision {
			recenter: first_draw || request.fresh_draw || !self.same_build(request),
			first_draw,
		}
	}

	/// Record a draw that actually reached the DOM. Callers invoke this
	/// only after the pass rendered; an aborted pass never transitions
	/// the session out of its not-yet-drawn state.
	pub fn commit(&mut self, request: &GraphRenderRequest) {
		self.state.same_build_as_last_draw = self.same_build(request);
		self.state.has_drawn_once = true;
		self.state.current_build_id = request.build_id;
		self.state.was_fresh_draw = request.fresh_draw;
		self.state.active_content_filter = request.filter_text.clone();
	}

	fn same_build(&self, request: &GraphRenderRequest) -> bool {
		self.state.current_build_id == request.build_id && self.state.current_build_id != NO_BUILD
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn request(build_id: i64, fresh_draw: bool) -> GraphRenderRequest {
		GraphRenderRequest {
			graph_text: "digraph {}".to_string(),
			build_id,
			filter_text: String::new(),
			focused_node_id: -1,
			show_services: false,
			show_steps: false,
			fresh_draw,
		}
	}

	fn draw(coordinator: &mut RedrawCoordinator, req: &GraphRenderRequest) -> DrawDecision {
		let decision = coordinator.decide(req);
		coordinator.commit(req);
		decision
	}

	#[test]
	fn first_draw_recenters() {
		let mut coordinator = RedrawCoordinator::new();
		let decision = draw(&mut coordinator, &request(4, false));
		assert!(decision.recenter);
		assert!(decision.first_draw);
		assert_eq!(coordinator.state().current_build_id, 4);
	}

	#[test]
	fn same_build_refresh_does_not_recenter() {
		let mut coordinator = RedrawCoordinator::new();
		draw(&mut coordinator, &request(4, false));
		let decision = draw(&mut coordinator, &request(4, false));
		assert!(!decision.recenter);
		assert!(!decision.first_draw);
		assert!(coordinator.state().same_build_as_last_draw);
	}

	#[test]
	fn build_change_recenters() {
		let mut coordinator = RedrawCoordinator::new();
		draw(&mut coordinator, &request(4, false));
		let decision = draw(&mut coordinator, &request(5, false));
		assert!(decision.recenter);
		assert!(!coordinator.state().same_build_as_last_draw);
	}

	#[test]
	fn fresh_draw_recenters_even_on_same_build() {
		let mut coordinator = RedrawCoordinator::new();
		draw(&mut coordinator, &request(4, false));
		let decision = draw(&mut coordinator, &request(4, true));
		assert!(decision.recenter);
		assert!(coordinator.state().was_fresh_draw);
		assert!(coordinator.state().same_build_as_last_draw);
	}

	#[test]
	fn aborted_pass_does_not_consume_first_draw_recenter() {
		let mut coordinator = RedrawCoordinator::new();

		// First pass decides, then aborts before rendering (layout
		// rejection or a stale generation): no commit.
		let decision = coordinator.decide(&request(4, false));
		assert!(decision.recenter);

		// The retry for the same build is still the session's first draw
		// and must still recenter.
		let retry = draw(&mut coordinator, &request(4, false));
		assert!(retry.recenter);
		assert!(retry.first_draw);

		// Once a pass has committed, a same-build refresh stops
		// recentering as usual.
		assert!(!coordinator.decide(&request(4, false)).recenter);
	}

	#[test]
	fn filter_text_is_recorded() {
		let mut coordinator = RedrawCoordinator::new();
		let mut req = request(4, false);
		req.filter_text = "clone".to_string();
		draw(&mut coordinator, &req);
		assert_eq!(coordinator.state().active_content_filter, "clone");
	}
}
