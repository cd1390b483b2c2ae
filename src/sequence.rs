use std::collections::VecDeque;

/// One suspension point or action in a [`Sequence`].
#[derive(Debug, Clone, PartialEq)]
pub enum Step<C, A> {
    /// Suspend until this many seconds of ticks have elapsed.
    Wait(f32),
    /// Suspend until the owner reports the condition as met.
    Until(C),
    /// Hand an action back to the owner. Takes no time.
    Run(A),
}

/// Ordered list of timed/conditional steps, driven by its owner's tick.
///
/// The sequence never performs actions itself: `poll` yields them one at a
/// time so the owner can apply each with full access to its own state, and a
/// later `Until` sees the effects of earlier actions.
///
/// ```
/// use chase_tag::sequence::Sequence;
///
/// let mut seq: Sequence<(), &str> = Sequence::new().run("ready").wait(1.0).run("go");
/// assert_eq!(seq.poll(|_| true), Some("ready"));
/// assert_eq!(seq.poll(|_| true), None);
/// seq.tick(1.0);
/// assert_eq!(seq.poll(|_| true), Some("go"));
/// assert!(seq.is_finished());
/// ```
#[derive(Debug, Clone)]
pub struct Sequence<C, A> {
    steps: VecDeque<Step<C, A>>,
    /// Time banked toward the `Wait` at the front.
    waited: f32,
}

impl<C, A> Default for Sequence<C, A> {
    fn default() -> Self {
        Self {
            steps: VecDeque::new(),
            waited: 0.0,
        }
    }
}

impl<C, A> Sequence<C, A> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn wait(mut self, seconds: f32) -> Self {
        self.steps.push_back(Step::Wait(seconds));
        self
    }

    pub fn until(mut self, condition: C) -> Self {
        self.steps.push_back(Step::Until(condition));
        self
    }

    pub fn run(mut self, action: A) -> Self {
        self.steps.push_back(Step::Run(action));
        self
    }

    /// Advance the clock. Time only accrues while a `Wait` is at the front.
    pub fn tick(&mut self, dt: f32) {
        if matches!(self.steps.front(), Some(Step::Wait(_))) {
            self.waited += dt;
        }
    }

    /// Resume until the next action or suspension point.
    ///
    /// Returns `Some(action)` when an action is due, `None` when suspended or
    /// finished. Surplus time from a completed `Wait` carries into an
    /// immediately following `Wait`.
    pub fn poll(&mut self, mut ready: impl FnMut(&C) -> bool) -> Option<A> {
        loop {
            match self.steps.front()? {
                Step::Wait(seconds) => {
                    if self.waited < *seconds {
                        return None;
                    }
                    self.waited -= *seconds;
                    self.steps.pop_front();
                    if !matches!(self.steps.front(), Some(Step::Wait(_))) {
                        self.waited = 0.0;
                    }
                }
                Step::Until(condition) => {
                    if !ready(condition) {
                        return None;
                    }
                    self.steps.pop_front();
                }
                Step::Run(_) => {
                    if let Some(Step::Run(action)) = self.steps.pop_front() {
                        return Some(action);
                    }
                }
            }
        }
    }

    pub fn is_finished(&self) -> bool {
        self.steps.is_empty()
    }
}
