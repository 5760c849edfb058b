//! Timer-driven LED blinker
//!
//! The classic first guest application: a periodic timer whose callback
//! toggles an LED. Here the host is simulated, so timer firings are
//! scripted and the LED is a GPIO pin level you can read back.

use event_dispatch::SdkContext;
use sdk_types::{GpioDirection, GpioPin, GpioPinState, GpioPort, SdkError, TimerId};
use sim_host::SimulatedHost;
use std::cell::RefCell;
use std::rc::Rc;

const LED_PORT: GpioPort = GpioPort::new(0);
const LED_PIN: GpioPin = GpioPin::new(5);
const BLINK_TIMER: TimerId = TimerId::new(1);
const BLINK_INTERVAL_MS: u32 = 500;

fn main() -> Result<(), SdkError> {
    let mut ctx = SdkContext::new(SimulatedHost::new());

    ctx.configure_gpio(LED_PORT, LED_PIN, GpioDirection::Output)?;
    ctx.create_timer(BLINK_TIMER)?;
    ctx.start_timer(BLINK_TIMER, BLINK_INTERVAL_MS, true)?;

    // The callback only flips the shared LED state; the main loop
    // drives the pin, since the context is busy pumping while the
    // callback runs.
    let led = Rc::new(RefCell::new(GpioPinState::Reset));
    let led_in_callback = led.clone();
    ctx.register_timer_callback(BLINK_TIMER, move || {
        let mut led = led_in_callback.borrow_mut();
        *led = led.toggled();
    })?;

    println!("blinky: toggling {LED_PORT} {LED_PIN} every {BLINK_INTERVAL_MS} ms");
    for tick in 0..6 {
        ctx.host_mut().fire_timer(BLINK_TIMER)?;
        ctx.process_events();

        let state = *led.borrow();
        ctx.set_gpio(LED_PORT, LED_PIN, state)?;
        let lit = match ctx.read_gpio(LED_PORT, LED_PIN)? {
            GpioPinState::Set => "on",
            GpioPinState::Reset => "off",
        };
        println!("tick {tick}: led {lit}");
    }

    ctx.stop_timer(BLINK_TIMER)?;
    ctx.delete_timer(BLINK_TIMER)?;
    Ok(())
}
