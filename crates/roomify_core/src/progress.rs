/// Progress value at which a session is considered analysed.
pub const PROGRESS_COMPLETE: u8 = 100;

/// One step of the simulated analysis progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgressTick {
    pub value: u8,
    /// Set on exactly one tick: the one that first reaches 100.
    pub reached_complete: bool,
}

/// Bounded counter advanced by a fixed step, clamped to [`PROGRESS_COMPLETE`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressCounter {
    value: u8,
    step: u8,
}

impl ProgressCounter {
    /// A zero step is raised to 1 so the counter always terminates.
    pub fn new(step: u8) -> Self {
        Self {
            value: 0,
            step: step.max(1),
        }
    }

    pub fn value(&self) -> u8 {
        self.value
    }

    pub fn is_complete(&self) -> bool {
        self.value >= PROGRESS_COMPLETE
    }

    pub fn advance(&mut self) -> ProgressTick {
        if self.is_complete() {
            return ProgressTick {
                value: PROGRESS_COMPLETE,
                reached_complete: false,
            };
        }
        let next = u16::from(self.value) + u16::from(self.step);
        if next >= u16::from(PROGRESS_COMPLETE) {
            self.value = PROGRESS_COMPLETE;
            ProgressTick {
                value: PROGRESS_COMPLETE,
                reached_complete: true,
            }
        } else {
            self.value = next as u8;
            ProgressTick {
                value: self.value,
                reached_complete: false,
            }
        }
    }
}
