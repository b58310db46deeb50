//! Serve countdown sub-state machine
//!
//! Every serve gets a fresh, never-reused id. Whoever runs the countdown
//! timer (the host, or [`Countdown::advance`]) must hand that id back to
//! complete the serve; an id from a cancelled or superseded countdown no
//! longer matches and is dropped.

/// Labels for the opening serve of a match
pub const FULL_COUNTDOWN: &[&str] = &["3", "2", "1", "Go!"];
/// Labels for re-serves after a point
pub const GO_ONLY: &[&str] = &["Go!"];

/// A serve waiting on its countdown
#[derive(Debug, Clone, PartialEq)]
pub struct PendingServe {
    pub serve_id: u64,
    /// Horizontal sign of the serve
    pub direction: f32,
    pub steps: &'static [&'static str],
    /// Labels already announced by `advance`
    shown: usize,
    elapsed_ms: f32,
}

/// Progress reported by [`Countdown::advance`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CountdownTick {
    /// Show this label now
    Step(&'static str),
    /// Countdown done; complete the serve with this id
    Ready(u64),
}

#[derive(Debug, Clone, Default)]
pub struct Countdown {
    last_id: u64,
    pending: Option<PendingServe>,
}

impl Countdown {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a countdown, superseding any pending one
    pub fn begin(&mut self, direction: f32, fresh_match: bool) -> &PendingServe {
        self.last_id += 1;
        let steps = if fresh_match { FULL_COUNTDOWN } else { GO_ONLY };
        self.pending.insert(PendingServe {
            serve_id: self.last_id,
            direction,
            steps,
            shown: 0,
            elapsed_ms: 0.0,
        })
    }

    pub fn pending(&self) -> Option<&PendingServe> {
        self.pending.as_ref()
    }

    /// Drop the pending serve; its id can never complete afterwards
    pub fn cancel(&mut self) {
        if let Some(serve) = self.pending.take() {
            log::debug!("Cancelled serve #{}", serve.serve_id);
        }
    }

    /// Take the pending serve if `serve_id` is the current one
    pub fn claim(&mut self, serve_id: u64) -> Option<PendingServe> {
        match &self.pending {
            Some(serve) if serve.serve_id == serve_id => self.pending.take(),
            _ => None,
        }
    }

    /// Run the countdown clock forward by `elapsed_ms`.
    ///
    /// Non-finite or negative steps are ignored.
    /// Label `i` is due at `i * step_ms`; the serve is ready `hold_ms` after
    /// the last label. Does not claim the serve: pass the `Ready` id to
    /// the owner so the usual stale-id guard applies.
    pub fn advance(&mut self, elapsed_ms: f32, step_ms: f32, hold_ms: f32) -> Vec<CountdownTick> {
        let mut ticks = Vec::new();
        if !elapsed_ms.is_finite() || elapsed_ms < 0.0 {
            log::warn!("Ignoring countdown step of {elapsed_ms} ms");
            return ticks;
        }
        let Some(serve) = self.pending.as_mut() else {
            return ticks;
        };

        serve.elapsed_ms += elapsed_ms;
        while serve.shown < serve.steps.len() {
            let due = serve.shown as f32 * step_ms;
            if serve.elapsed_ms < due {
                return ticks;
            }
            ticks.push(CountdownTick::Step(serve.steps[serve.shown]));
            serve.shown += 1;
        }

        let ready_at = (serve.steps.len() - 1) as f32 * step_ms + hold_ms;
        if serve.elapsed_ms >= ready_at {
            ticks.push(CountdownTick::Ready(serve.serve_id));
        }
        ticks
    }
}
