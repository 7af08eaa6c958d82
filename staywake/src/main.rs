use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use iced::widget::{column, container, text, toggler};
use iced::{Element, Event, Subscription, Task, Theme, event, window};
use staywake_core::{
    FileStore, LockState, ToggleIndicator, Visibility, VisibilityBus, VisibilitySubscription,
    WakeController, system_provider,
};

pub fn main() -> iced::Result {
    iced::application(StaywakeApp::default, StaywakeApp::update, StaywakeApp::view)
        .title("Staywake")
        .subscription(StaywakeApp::subscription)
        .theme(StaywakeApp::theme)
        .run()
}

/// The window's toggle control, as the controller sees it.
///
/// The controller writes the active flag; the view reads it back through a
/// shared clone.
#[derive(Clone, Default)]
struct WindowToggle {
    active: Arc<AtomicBool>,
}

impl WindowToggle {
    fn active(&self) -> bool {
        self.active.load(Ordering::SeqCst)
    }
}

impl ToggleIndicator for WindowToggle {
    fn set_active(&mut self, active: bool) {
        self.active.store(active, Ordering::SeqCst);
    }
}

struct StaywakeApp {
    controller: Option<Arc<WakeController>>,
    toggle: WindowToggle,
    bus: VisibilityBus,
    _visibility: Option<VisibilitySubscription>,
    error_message: Option<String>,
}

#[derive(Debug, Clone)]
enum Message {
    KeepAwakeToggled(bool),
    EventOccurred(Event),
}

impl Default for StaywakeApp {
    fn default() -> Self {
        let toggle = WindowToggle::default();
        let bus = VisibilityBus::new();
        let mut app = Self {
            controller: None,
            toggle: toggle.clone(),
            bus,
            _visibility: None,
            error_message: None,
        };

        // Try to initialize the controller
        match FileStore::new() {
            Ok(store) => {
                let controller = WakeController::new(
                    Some(Box::new(toggle)),
                    Box::new(store),
                    system_provider(),
                );
                app._visibility = Some(controller.watch_visibility(&app.bus));
                app.controller = Some(controller);
            }
            Err(e) => {
                app.error_message = Some(format!("Failed to initialize: {}", e));
            }
        }

        app
    }
}

impl StaywakeApp {
    fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::KeepAwakeToggled(_) => {
                self.error_message = None;
                if let Some(ref controller) = self.controller {
                    controller.toggle();
                }
            }

            Message::EventOccurred(event) => {
                if let Event::Window(event) = event {
                    let visibility = match event {
                        window::Event::Focused => Some(Visibility::Visible),
                        window::Event::Unfocused => Some(Visibility::Hidden),
                        _ => None,
                    };
                    if let Some(visibility) = visibility {
                        self.bus.publish(visibility);
                    }
                }
            }
        }

        Task::none()
    }

    fn view(&self) -> Element<'_, Message> {
        let title = text("Staywake").size(24);

        // Error/status message
        let status = if let Some(ref msg) = self.error_message {
            text(msg).size(14)
        } else {
            let line = match self.controller.as_ref().map(|c| c.state().lock_state()) {
                Some(LockState::Active) => "The display will stay awake",
                Some(LockState::Pending) => "Waiting to re-acquire the wake lock",
                Some(LockState::Disabled) | None => "The display may sleep normally",
            };
            text(line).size(14)
        };

        let keep_awake_section = column![
            toggler(self.toggle.active())
                .label("Keep screen awake")
                .on_toggle(Message::KeepAwakeToggled),
        ]
        .spacing(5);

        let content = column![title, status, keep_awake_section]
            .spacing(15)
            .padding(20);

        container(content).into()
    }

    fn subscription(&self) -> Subscription<Message> {
        event::listen().map(Message::EventOccurred)
    }

    fn theme(&self) -> Theme {
        Theme::Dark
    }
}
