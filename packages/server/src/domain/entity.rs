//! Broadcast entities: the value pair sent to clients each tick and the
//! state the broadcast loop carries between ticks.

use rand::Rng;

/// One broadcast value pair, freshly constructed each tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PulseFrame {
    /// Uniform random value in `[0, 1)`
    pub random_number: f64,
    /// The toggle boolean at the moment the frame was built
    pub boolean: bool,
}

/// Process-wide broadcast state: the running flag and the toggle boolean.
///
/// The running flag is true iff a broadcast task is currently scheduled.
/// The toggle boolean alternates every tick, starting `true` at process
/// start, and PERSISTS across loop stop/restart cycles: reconnecting after
/// the registry drained does not reset the alternation parity.
#[derive(Debug, Clone)]
pub struct BroadcastState {
    running: bool,
    toggle: bool,
}

impl BroadcastState {
    pub fn new() -> Self {
        Self {
            running: false,
            toggle: true,
        }
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn set_running(&mut self, running: bool) {
        self.running = running;
    }

    /// Build the frame for one periodic tick and flip the toggle for the
    /// next one.
    pub fn next_frame<R: Rng>(&mut self, rng: &mut R) -> PulseFrame {
        let frame = PulseFrame {
            random_number: rng.random::<f64>(),
            boolean: self.toggle,
        };
        self.toggle = !self.toggle;
        frame
    }

    /// Build a one-off welcome frame for a newly connected client.
    ///
    /// Uses the current toggle value without flipping it, so the welcome
    /// does not disturb the periodic alternation.
    pub fn welcome_frame<R: Rng>(&self, rng: &mut R) -> PulseFrame {
        PulseFrame {
            random_number: rng.random::<f64>(),
            boolean: self.toggle,
        }
    }
}

impl Default for BroadcastState {
    fn default() -> Self {
        Self::new()
    }
}
