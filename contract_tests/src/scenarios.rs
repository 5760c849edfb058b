//! End-to-end scenarios
//!
//! Whole-loop behavior: register, fire, pump, observe — the way an
//! application actually uses the SDK.

#[cfg(test)]
mod tests {
    use crate::test_helpers::*;
    use sdk_types::TimerId;
    use serde::{Deserialize, Serialize};
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Reading {
        channel: String,
        value: f64,
    }

    #[test]
    fn test_timer_counter_scenario() {
        let mut ctx = context();
        let (count, cb) = counter();
        ctx.register_timer_callback(TimerId::new(1), cb).unwrap();

        // Three host timer firings, one process_events call each.
        for _ in 0..3 {
            ctx.host_mut().push_timer_event(TimerId::new(1));
            ctx.process_events();
        }
        assert_eq!(*count.borrow(), 3);
    }

    #[test]
    fn test_message_delivery_scenario() {
        let mut ctx = context();
        let received = Rc::new(RefCell::new(Vec::new()));
        {
            let received = received.clone();
            ctx.register_message_callback("demo/", move |topic, content_type, payload| {
                received.borrow_mut().push((
                    topic.to_string(),
                    content_type.to_string(),
                    payload.to_vec(),
                ));
            })
            .unwrap();
        }
        ctx.host_mut()
            .push_message_event("demo/x", "text/plain", b"hi\0");
        ctx.process_events();

        let received = received.borrow();
        assert_eq!(received.len(), 1);
        let (topic, content_type, payload) = &received[0];
        assert_eq!(topic, "demo/x");
        assert_eq!(content_type, "text/plain");
        assert_eq!(payload.as_slice(), b"hi\0");
        assert_eq!(payload.len(), 3);
    }

    #[test]
    fn test_publish_subscribe_round_trip() {
        let mut ctx = context();
        let readings = Rc::new(RefCell::new(Vec::new()));
        {
            let readings = readings.clone();
            ctx.register_message_callback("sensor/", move |_, content_type, payload| {
                assert_eq!(content_type, "application/json");
                let reading: Reading = serde_json::from_slice(payload).unwrap();
                readings.borrow_mut().push(reading);
            })
            .unwrap();
        }
        ctx.subscribe_message("sensor/").unwrap();

        let reading = Reading {
            channel: "temperature".to_string(),
            value: 21.5,
        };
        let payload = serde_json::to_vec(&reading).unwrap();
        ctx.publish_message("sensor/temperature", "application/json", &payload)
            .unwrap();
        ctx.process_events();

        assert_eq!(readings.borrow().as_slice(), [reading]);
        // The publish was also recorded on the host side.
        assert_eq!(ctx.host().published().len(), 1);
        assert_eq!(ctx.host().published()[0].topic, "sensor/temperature");
    }

    #[test]
    fn test_timer_control_and_fire_scenario() {
        let mut ctx = context();
        let id = TimerId::new(2);
        let (count, cb) = counter();
        ctx.register_timer_callback(id, cb).unwrap();

        ctx.create_timer(id).unwrap();
        ctx.start_timer(id, 100, true).unwrap();
        assert_eq!(ctx.timer_remaining_ms(id).unwrap(), 100);

        ctx.host_mut().fire_timer(id).unwrap();
        ctx.process_events();
        assert_eq!(*count.borrow(), 1);

        ctx.stop_timer(id).unwrap();
        assert!(ctx.host_mut().fire_timer(id).is_err());
        ctx.delete_timer(id).unwrap();
    }
}
