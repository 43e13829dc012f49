use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

/// Dirty flag shared between background tasks and the terminal loop.
///
/// Tasks call [`Redraw::request`] after mutating state; the loop redraws
/// when [`Redraw::take`] reports a pending request.
#[derive(Debug, Clone)]
pub struct Redraw(Arc<AtomicBool>);

impl Redraw {
    pub fn new() -> Self {
        Redraw(Arc::new(AtomicBool::new(true)))
    }

    pub fn request(&self) {
        self.0.store(true, Ordering::Release);
    }

    pub fn take(&self) -> bool {
        self.0.swap(false, Ordering::AcqRel)
    }
}

impl Default for Redraw {
    fn default() -> Self {
        Redraw::new()
    }
}

/// Whether a detail view is still on screen.
///
/// The polling task checks this on every tick and ends itself once the view
/// that spawned it has gone.
#[derive(Debug, Clone)]
pub struct Visibility(Arc<AtomicBool>);

impl Visibility {
    pub fn visible() -> Self {
        Visibility(Arc::new(AtomicBool::new(true)))
    }

    pub fn hide(&self) {
        self.0.store(false, Ordering::Release);
    }

    pub fn is_visible(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn redraw_request_is_consumed_once() {
        let redraw = Redraw::new();
        assert!(redraw.take());
        assert!(!redraw.take());

        redraw.clone().request();
        assert!(redraw.take());
    }

    #[test]
    fn hidden_visibility_is_seen_by_clones() {
        let view = Visibility::visible();
        let task_side = view.clone();
        view.hide();
        assert!(!task_side.is_visible());
    }
}
