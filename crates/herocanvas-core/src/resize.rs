//! Resize notification subscription.

/// Handle for one registered resize listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ResizeSubscription(pub u64);

/// Process-wide source of container/window resize notifications.
///
/// A mounted scene subscribes once and unsubscribes exactly once on teardown.
/// Events themselves are delivered by the host calling
/// `SceneLifecycleManager::handle_resize`.
pub trait ResizeSource {
    fn subscribe(&mut self) -> ResizeSubscription;

    fn unsubscribe(&mut self, subscription: ResizeSubscription);
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Debug, Default)]
    pub struct ResizeLog {
        pub subscribed: Vec<ResizeSubscription>,
        pub unsubscribed: Vec<ResizeSubscription>,
    }

    /// Resize source whose log outlives the manager that owns it.
    #[derive(Debug, Default, Clone)]
    pub struct SharedResizeSource {
        pub log: Rc<RefCell<ResizeLog>>,
        next: u64,
    }

    impl ResizeSource for SharedResizeSource {
        fn subscribe(&mut self) -> ResizeSubscription {
            self.next += 1;
            let sub = ResizeSubscription(self.next);
            self.log.borrow_mut().subscribed.push(sub);
            sub
        }

        fn unsubscribe(&mut self, subscription: ResizeSubscription) {
            self.log.borrow_mut().unsubscribed.push(subscription);
        }
    }
}
