/// Loop control requested by a match handler.
///
/// Handlers that receive a `&mut FlowControl` can ask the enclosing loop to
/// `continue` or `break`; the caller applies the request with [eval_flow_control].
///
/// [eval_flow_control]: crate::eval_flow_control
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct FlowControl {
    cont: bool,
    brk: bool,
}

impl FlowControl {
    /// Requests that the enclosing loop continue with its next iteration.
    pub fn cont(&mut self) {
        self.cont = true;
    }

    /// Requests that the enclosing loop exit.
    pub fn brk(&mut self) {
        self.brk = true;
    }

    pub fn continue_requested(&self) -> bool {
        self.cont
    }

    pub fn break_requested(&self) -> bool {
        self.brk
    }
}

/// Applies a [FlowControl] to the enclosing loop. A break request wins over a continue request.
///
/// ```rust
/// use matchable::{matchable, eval_flow_control, FlowControl, MatchBox, Matchable};
///
/// #[matchable]
/// enum Step { Skip, Stop, Work }
///
/// let mut handlers: MatchBox<Step, Box<dyn FnMut(&mut FlowControl)>> = MatchBox::new(Box::new(|_| {}));
/// handlers.set(Step::Skip, Box::new(|fc| fc.cont()));
/// handlers.set(Step::Stop, Box::new(|fc| fc.brk()));
///
/// let mut worked = 0;
/// for step in [Step::Work, Step::Skip, Step::Work, Step::Stop, Step::Work] {
///     let fc = step.match_with_flow_control(&mut handlers);
///     eval_flow_control!(fc);
///     worked += 1;
/// }
/// assert_eq!(worked, 2);
/// ```
#[macro_export]
macro_rules! eval_flow_control {
    ($flow:expr) => {{
        let flow: $crate::FlowControl = $flow;
        if flow.break_requested() {
            break;
        }
        if flow.continue_requested() {
            continue;
        }
    }};
}
