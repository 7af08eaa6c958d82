//! Example: toggle the keep-awake preference from the terminal.
//!
//! Run with: `cargo run --example toggle_keep_awake`

use std::thread;
use std::time::Duration;

use staywake_core::{
    system_provider, ControllerError, FileStore, ToggleIndicator, Visibility, VisibilityBus,
    WakeController,
};

struct PrintIndicator;

impl ToggleIndicator for PrintIndicator {
    fn set_active(&mut self, active: bool) {
        println!("indicator: {}", if active { "on" } else { "off" });
    }
}

fn main() -> Result<(), ControllerError> {
    // Initialize logging (optional)
    env_logger::init();

    // Create the controller; a previously saved "on" preference re-acquires now
    let controller = WakeController::new(
        Some(Box::new(PrintIndicator)),
        Box::new(FileStore::new()?),
        system_provider(),
    );

    let bus = VisibilityBus::new();
    let _subscription = controller.watch_visibility(&bus);

    println!("Saved preference: {:?}", controller.state().lock_state());

    // Flip the toggle and hold the lock for a moment
    controller.toggle();
    println!("After toggle: {:?}", controller.state().lock_state());

    bus.publish(Visibility::Visible);
    thread::sleep(Duration::from_secs(5));

    // Flip it back
    controller.toggle();
    println!("After second toggle: {:?}", controller.state().lock_state());

    Ok(())
}
