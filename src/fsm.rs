/// Deferred-apply finite-state holder.
///
/// `S` is the state type (usually a fieldless enum). The machine tracks the
/// current state, a pending `next` state, and a `none` sentinel that marks
/// "nothing pending". **Entry actions are intentionally kept out of the
/// machine itself**: they live in the controller that drains it.
///
/// # Usage
/// ```
/// use chase_tag::fsm::StateMachine;
///
/// #[derive(Clone, Copy, PartialEq, Debug)]
/// enum Light { Off, Red, Green }
///
/// let mut fsm = StateMachine::new(Light::Off);
/// fsm.set_next(Light::Red);
/// // Each tick:
/// while fsm.pending() {
///     match fsm.do_transit() {
///         Light::Red => { /* entry action */ }
///         _ => {}
///     }
/// }
/// assert_eq!(fsm.current(), Light::Red);
/// ```
#[derive(Debug, Clone)]
pub struct StateMachine<S: Copy + PartialEq> {
    current: S,
    next: S,
    none: S,
}

impl<S: Copy + PartialEq> StateMachine<S> {
    /// Create a machine parked on `none`, with nothing pending.
    pub fn new(none: S) -> Self {
        Self {
            current: none,
            next: none,
            none,
        }
    }

    /// Queue `state` for the next `do_transit`. Overwrites any request that
    /// has not been consumed yet (last write wins).
    pub fn set_next(&mut self, state: S) {
        self.next = state;
    }

    pub fn next(&self) -> S {
        self.next
    }

    pub fn current(&self) -> S {
        self.current
    }

    pub fn none(&self) -> S {
        self.none
    }

    /// `true` while a transition is queued.
    pub fn pending(&self) -> bool {
        self.next != self.none
    }

    /// Commit the pending state and return it. With nothing pending this
    /// returns the sentinel and leaves `current` untouched.
    pub fn do_transit(&mut self) -> S {
        if !self.pending() {
            return self.none;
        }
        self.current = std::mem::replace(&mut self.next, self.none);
        self.current
    }
}
