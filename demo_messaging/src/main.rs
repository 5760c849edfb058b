//! Pub/sub round trip
//!
//! Subscribes to a topic prefix, publishes JSON sensor readings, and
//! pumps events until they come back through the message callback. The
//! simulated host loops published messages back to its own subscriber,
//! standing in for the host broker.

use event_dispatch::SdkContext;
use sdk_types::SdkError;
use serde::{Deserialize, Serialize};
use sim_host::SimulatedHost;
use std::cell::RefCell;
use std::rc::Rc;

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Reading {
    channel: String,
    value: f64,
}

fn main() -> Result<(), SdkError> {
    let mut ctx = SdkContext::new(SimulatedHost::new());

    let received = Rc::new(RefCell::new(0u32));
    let received_in_callback = received.clone();
    ctx.register_message_callback("sensor/", move |topic, content_type, payload| {
        *received_in_callback.borrow_mut() += 1;
        match serde_json::from_slice::<Reading>(payload) {
            Ok(reading) => {
                println!("received {topic} ({content_type}): {} = {}", reading.channel, reading.value)
            }
            Err(err) => println!("received {topic}: undecodable payload: {err}"),
        }
    })?;
    ctx.subscribe_message("sensor/")?;

    let readings = [
        ("sensor/temperature", "temperature", 21.5),
        ("sensor/humidity", "humidity", 48.0),
        ("sensor/temperature", "temperature", 21.7),
    ];
    for (topic, channel, value) in readings {
        let reading = Reading {
            channel: channel.to_string(),
            value,
        };
        let payload = serde_json::to_vec(&reading).map_err(|_| SdkError::Invalid)?;
        ctx.publish_message(topic, "application/json", &payload)?;
    }

    // One drain is enough for three pending events; real applications
    // would loop here forever.
    ctx.process_events();

    println!("delivered {} of {} published readings", received.borrow(), readings.len());
    Ok(())
}
