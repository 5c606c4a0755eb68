//! Host event turns.
//!
//! A turn covers the delivery of one native event, bubbling included.
//! Work queued with [`after_turn`] runs when the outermost turn on this
//! thread ends.

use std::cell::RefCell;
use std::marker::PhantomData;

type Deferred = Box<dyn FnOnce()>;

#[derive(Default)]
struct TurnState {
    depth: usize,
    queued: Vec<Deferred>,
}

thread_local! {
    static TURN: RefCell<TurnState> = RefCell::new(TurnState::default());
}

/// Guard for a running turn. Turns nest; dropping the outermost one runs
/// the queued work.
#[must_use = "the turn ends when the guard is dropped"]
pub struct Turn {
    _not_send: PhantomData<*const ()>,
}

impl Turn {
    pub fn begin() -> Self {
        TURN.with(|turn| turn.borrow_mut().depth += 1);
        Self {
            _not_send: PhantomData,
        }
    }
}

impl Drop for Turn {
    fn drop(&mut self) {
        let ready = TURN.with(|turn| {
            let mut turn = turn.borrow_mut();
            turn.depth -= 1;
            if turn.depth == 0 {
                std::mem::take(&mut turn.queued)
            } else {
                Vec::new()
            }
        });
        // Unwinding out of a turn drops the queued work instead of running it
        if std::thread::panicking() {
            return;
        }
        for work in ready {
            work();
        }
    }
}

/// Whether a turn is running on this thread.
pub fn in_turn() -> bool {
    TURN.with(|turn| turn.borrow().depth > 0)
}

/// Queue `work` to run when the current turn ends.
///
/// Returns `false` and drops `work` when no turn is running.
pub fn after_turn(work: impl FnOnce() + 'static) -> bool {
    TURN.with(|turn| {
        let mut turn = turn.borrow_mut();
        if turn.depth == 0 {
            return false;
        }
        turn.queued.push(Box::new(work));
        true
    })
}
