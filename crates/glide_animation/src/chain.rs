//! Sequential tween chains
//!
//! A chain plays its members one after another, ticking only the current
//! one. The chain is itself `Tweenable`, so it is scheduled like any tween.

use crate::pool::TweenPool;
use crate::tweenable::{ContextId, Frame, TweenControl, Tweenable};
use smallvec::SmallVec;
use std::any::Any;
use std::fmt;

/// Handler invoked when the last member of a chain finishes
pub type ChainHandler = Box<dyn FnMut(&TweenChain)>;

/// Ordered sequence of animatables played back to back
#[derive(Default)]
pub struct TweenChain {
    tweens: SmallVec<[Box<dyn Tweenable>; 4]>,
    current: usize,
    paused: bool,
    on_complete: Option<ChainHandler>,
    context: Option<ContextId>,
}

impl TweenChain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a member to the end of the chain
    ///
    /// Members are resumed on insertion so that a tween paused while being
    /// built still plays when its turn comes.
    pub fn append(&mut self, mut tween: Box<dyn Tweenable>) -> &mut Self {
        tween.resume();
        self.tweens.push(tween);
        self
    }

    pub fn set_completion_handler(&mut self, handler: impl FnMut(&TweenChain) + 'static) -> &mut Self {
        self.on_complete = Some(Box::new(handler));
        self
    }

    /// Rewind to the first member and restart every member
    pub fn reset(&mut self) {
        for tween in self.tweens.iter_mut() {
            tween.restart();
        }
        self.current = 0;
    }

    pub fn len(&self) -> usize {
        self.tweens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tweens.is_empty()
    }

    /// Index of the member being played
    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn is_finished(&self) -> bool {
        self.current >= self.tweens.len()
    }

    /// Mutable access to a member, e.g. to downcast and inspect it
    pub fn get_mut(&mut self, index: usize) -> Option<&mut (dyn Tweenable + 'static)> {
        self.tweens.get_mut(index).map(|tween| tween.as_mut())
    }

    fn fire_complete(&mut self) {
        if let Some(mut handler) = self.on_complete.take() {
            handler(self);
            if self.on_complete.is_none() {
                self.on_complete = Some(handler);
            }
        }
    }
}

impl TweenControl for TweenChain {
    fn pause(&mut self) {
        self.paused = true;
    }

    fn resume(&mut self) {
        self.paused = false;
    }

    fn is_paused(&self) -> bool {
        self.paused
    }

    fn is_running(&self) -> bool {
        !self.paused && !self.is_finished()
    }

    /// Jump past the last member. Members are not brought to completion.
    fn stop(&mut self, _bring_to_completion: bool) {
        self.current = self.tweens.len();
    }

    fn context(&self) -> Option<ContextId> {
        self.context
    }

    fn set_context(&mut self, context: Option<ContextId>) {
        self.context = context;
    }
}

impl Tweenable for TweenChain {
    fn tick(&mut self, frame: &Frame) -> bool {
        if self.paused {
            return false;
        }
        if self.is_finished() {
            return true;
        }

        if self.tweens[self.current].tick(frame) {
            self.current += 1;
            if self.is_finished() {
                self.fire_complete();
                return true;
            }
        }
        false
    }

    fn restart(&mut self) {
        self.reset();
    }

    fn recycle_self(&mut self) {
        for tween in self.tweens.iter_mut() {
            tween.recycle_self();
        }
        self.tweens.clear();
        self.current = 0;
        self.paused = false;
        self.on_complete = None;
        self.context = None;
    }

    fn release(mut self: Box<Self>, pool: &mut TweenPool) {
        for tween in self.tweens.drain(..) {
            tween.release(pool);
        }
        self.recycle_self();
        pool.release(self);
    }

    fn as_control(&mut self) -> &mut dyn TweenControl {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

impl fmt::Debug for TweenChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TweenChain")
            .field("len", &self.tweens.len())
            .field("current", &self.current)
            .field("paused", &self.paused)
            .field("context", &self.context)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::target::fn_target;
    use crate::tween::Tween;
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    fn recording(log: &Rc<RefCell<Vec<usize>>>, id: usize, duration: f32) -> Box<dyn Tweenable> {
        let log = Rc::clone(log);
        Box::new(Tween::new(
            fn_target(move |_: f32| log.borrow_mut().push(id)),
            0.0,
            1.0,
            duration,
        ))
    }

    #[test]
    fn test_members_play_in_order() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut chain = TweenChain::new();
        chain
            .append(recording(&log, 0, 1.0))
            .append(recording(&log, 1, 1.0))
            .append(recording(&log, 2, 1.0));

        let mut frames = 0;
        while !chain.tick(&Frame::new(0.5)) {
            frames += 1;
        }
        // Each member finishes on its second frame; the chain returns true
        // on the frame its last member finishes.
        assert_eq!(frames, 5);
        let log = log.borrow();
        assert!(log.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(log.first(), Some(&0));
        assert_eq!(log.last(), Some(&2));
    }

    #[test]
    fn test_completion_fires_once() {
        let fired = Rc::new(Cell::new(0));
        let counter = Rc::clone(&fired);
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut chain = TweenChain::new();
        chain
            .append(recording(&log, 0, 0.1))
            .set_completion_handler(move |_| counter.set(counter.get() + 1));

        assert!(chain.tick(&Frame::new(1.0)));
        assert!(chain.tick(&Frame::new(1.0)));
        assert_eq!(fired.get(), 1);
    }

    #[test]
    fn test_append_resumes_paused_member() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut member = recording(&log, 0, 0.1);
        member.pause();
        let mut chain = TweenChain::new();
        chain.append(member);
        assert!(chain.tick(&Frame::new(1.0)));
        assert_eq!(*log.borrow(), vec![0]);
    }

    #[test]
    fn test_paused_chain_does_not_advance() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut chain = TweenChain::new();
        chain.append(recording(&log, 0, 0.1));
        chain.pause();
        assert!(!chain.tick(&Frame::new(1.0)));
        assert!(log.borrow().is_empty());
        chain.resume();
        assert!(chain.tick(&Frame::new(1.0)));
    }

    #[test]
    fn test_stop_and_reset() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut chain = TweenChain::new();
        chain.append(recording(&log, 0, 1.0)).append(recording(&log, 1, 1.0));
        chain.stop(true);
        assert!(chain.is_finished());
        assert!(chain.tick(&Frame::new(0.1)));
        assert!(log.borrow().is_empty());

        chain.reset();
        assert_eq!(chain.current_index(), 0);
        assert!(!chain.is_finished());
    }

    #[test]
    fn test_reset_replays_members() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let completions = Rc::new(Cell::new(0));
        let sink = Rc::clone(&completions);
        let mut chain = TweenChain::new();
        chain
            .append(recording(&log, 0, 1.0))
            .append(recording(&log, 1, 1.0))
            .set_completion_handler(move |_| sink.set(sink.get() + 1));

        while !chain.tick(&Frame::new(0.5)) {}
        let first_run = log.borrow().len();
        assert!(first_run > 0);

        chain.reset();
        assert!(!chain.is_finished());
        let mut frames = 0;
        while !chain.tick(&Frame::new(0.5)) {
            frames += 1;
        }
        assert_eq!(frames, 3);
        assert_eq!(log.borrow().len(), 2 * first_run);
        assert_eq!(completions.get(), 2);
    }

    #[test]
    fn test_empty_chain_finishes_immediately() {
        let mut chain = TweenChain::new();
        assert!(chain.tick(&Frame::new(0.1)));
    }

    #[test]
    fn test_release_returns_members_to_pool() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut chain = Box::new(TweenChain::new());
        chain.append(recording(&log, 0, 1.0)).append(recording(&log, 1, 1.0));
        let mut pool = TweenPool::new();
        chain.release(&mut pool);
        assert_eq!(pool.pooled::<Tween<f32>>(), 2);
        assert_eq!(pool.pooled::<TweenChain>(), 1);
        assert_eq!(Rc::strong_count(&log), 1);
    }
}
