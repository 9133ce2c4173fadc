use quadedit_editor::{FrameRequest, FrameScheduler};

/// [`FrameScheduler`] backed by window redraws.
///
/// Requests wait here until the next presented frame takes them; the app
/// asks the window for a redraw whenever any are pending. Cancelled requests
/// are simply dropped.
#[derive(Debug, Default)]
pub struct RedrawScheduler {
    next_id: u64,
    pending: Vec<FrameRequest>,
}

impl RedrawScheduler {
    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Takes the requests due on this frame. Requests made while firing them
    /// wait for the next frame.
    pub fn take_due(&mut self) -> Vec<FrameRequest> {
        std::mem::take(&mut self.pending)
    }
}

impl FrameScheduler for RedrawScheduler {
    fn request_frame(&mut self) -> FrameRequest {
        self.next_id += 1;
        let req = FrameRequest(self.next_id);
        self.pending.push(req);
        req
    }

    fn cancel_frame(&mut self, request: FrameRequest) {
        self.pending.retain(|r| *r != request);
    }
}
