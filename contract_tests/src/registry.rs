//! Registry contracts
//!
//! Capacity, slot reuse, and unregistration behavior as seen through
//! the guest-facing surface.

#[cfg(test)]
mod tests {
    use crate::test_helpers::*;
    use sdk_types::limits::MAX_CALLBACKS;
    use sdk_types::{GpioPin, GpioPort, SdkError, TimerId};

    #[test]
    fn test_gpio_capacity_is_max_callbacks() {
        let mut ctx = context();
        // 64 distinct (port, pin) pairs fit; the 65th distinct pair
        // fails with NoMemory and registers nothing.
        for i in 0..MAX_CALLBACKS as u32 {
            let (_, cb) = counter();
            ctx.register_gpio_callback(GpioPort::new(i / 16), GpioPin::new(i % 16), cb)
                .unwrap();
        }
        let (_, cb) = counter();
        assert_eq!(
            ctx.register_gpio_callback(GpioPort::new(4), GpioPin::new(0), cb),
            Err(SdkError::NoMemory)
        );
        // All prior registrations remain valid: the first and last
        // registered pairs still dispatch.
        let first = GpioPort::new(0);
        let last = GpioPort::new(3);
        ctx.host_mut()
            .push_gpio_event(first, GpioPin::new(0), sdk_types::GpioPinState::Set);
        ctx.host_mut()
            .push_gpio_event(last, GpioPin::new(15), sdk_types::GpioPinState::Set);
        ctx.process_events();
        assert_eq!(ctx.host().pending_events(), 0);
    }

    #[test]
    fn test_message_capacity_is_max_callbacks() {
        let mut ctx = context();
        for i in 0..MAX_CALLBACKS {
            let (_, cb) = topic_log();
            ctx.register_message_callback(&format!("topic/{i}"), cb)
                .unwrap();
        }
        let (_, cb) = topic_log();
        assert_eq!(
            ctx.register_message_callback("one-too-many", cb),
            Err(SdkError::NoMemory)
        );
        // A topic registered before exhaustion still receives events.
        let (log, cb) = topic_log();
        ctx.register_message_callback("topic/0", cb).unwrap();
        ctx.host_mut()
            .push_message_event("topic/0", "text/plain", b"x");
        ctx.process_events();
        assert_eq!(log.borrow().len(), 1);
    }

    #[test]
    fn test_timer_reregistration_replaces_callback() {
        let mut ctx = context();
        let id = TimerId::new(1);
        let (first, cb1) = counter();
        let (second, cb2) = counter();
        ctx.register_timer_callback(id, cb1).unwrap();
        ctx.register_timer_callback(id, cb2).unwrap();

        ctx.host_mut().push_timer_event(id);
        ctx.process_events();
        // Only the second function is invoked.
        assert_eq!(*first.borrow(), 0);
        assert_eq!(*second.borrow(), 1);
    }

    #[test]
    fn test_unregister_absent_entries_report_not_found() {
        let mut ctx = context();
        assert_eq!(
            ctx.unregister_timer_callback(TimerId::new(5)),
            Err(SdkError::NotFound)
        );
        assert_eq!(
            ctx.unregister_gpio_callback(GpioPort::new(0), GpioPin::new(0)),
            Err(SdkError::NotFound)
        );
        assert_eq!(
            ctx.unregister_message_callback("never/registered"),
            Err(SdkError::NotFound)
        );
    }

    #[test]
    fn test_unregistered_slot_is_reusable() {
        let mut ctx = context();
        for i in 0..MAX_CALLBACKS {
            let (_, cb) = topic_log();
            ctx.register_message_callback(&format!("topic/{i}"), cb)
                .unwrap();
        }
        ctx.unregister_message_callback("topic/10").unwrap();
        let (_, cb) = topic_log();
        ctx.register_message_callback("fresh/topic", cb).unwrap();
    }
}
