use super::super::super::messages::Message;
use super::super::super::state::{App, SCRIPT_SCROLL_ID};
use super::super::Effect;
use iced::Event;
use iced::Task;
use iced::event;
use iced::keyboard;
use iced::mouse;
use iced::widget::scrollable::{self, AbsoluteOffset};
use iced::window;
use podium_core::cache::{load_last_slide, save_last_slide};
use podium_core::loader::load_deck;
use std::path::PathBuf;
use tracing::{info, warn};

impl App {
    pub(super) fn run_effect(&mut self, effect: Effect) -> Task<Message> {
        match effect {
            Effect::Redraw => {
                self.redraw();
                Task::none()
            }
            Effect::SaveBookmark(slide) => {
                if let Some(path) = &self.document {
                    save_last_slide(&self.config.cache_root(), path, slide);
                }
                Task::none()
            }
            Effect::ToggleFullscreen => {
                self.window.fullscreen = !self.window.fullscreen;
                let mode = if self.window.fullscreen {
                    window::Mode::Fullscreen
                } else {
                    window::Mode::Windowed
                };
                info!(fullscreen = self.window.fullscreen, "Toggling fullscreen");
                window::get_latest().and_then(move |id| window::change_mode(id, mode))
            }
            Effect::ToggleRecording => {
                if self.recording.is_recording() {
                    self.stop_recording();
                    return Task::none();
                }
                // The capture origin is the window's inner position on screen,
                // which only the windowing backend knows.
                window::get_latest()
                    .then(|id| match id {
                        Some(id) => window::get_position(id),
                        None => Task::done(None),
                    })
                    .map(Message::RecordingOriginFetched)
            }
            Effect::LoadDeck(path) => {
                self.deck_loading = true;
                self.set_status(format!("Loading {}", path.display()));
                let options = self.config.loader_options();
                Task::perform(
                    async move {
                        let resume_at = load_last_slide(&options.cache_root, &path);
                        match load_deck(&path, &options) {
                            Ok(deck) => Message::DeckLoaded {
                                path,
                                deck,
                                resume_at,
                            },
                            Err(err) => Message::DeckLoadFailed {
                                path,
                                error: err.to_string(),
                            },
                        }
                    },
                    |msg| msg,
                )
            }
            Effect::SaveScript(path) => {
                self.save_script(path);
                Task::none()
            }
            Effect::ScrollScript(offset) => {
                scrollable::scroll_to(SCRIPT_SCROLL_ID.clone(), AbsoluteOffset { x: 0.0, y: offset })
            }
            Effect::ExportAnnotations => {
                self.export_annotations();
                Task::none()
            }
            Effect::QuitSafely => {
                info!("Shutting down");
                self.stop_recording();
                if let Some(path) = &self.document {
                    let slide = self.presenter.deck().current_index();
                    save_last_slide(&self.config.cache_root(), path, slide);
                }
                iced::exit()
            }
        }
    }

    fn export_annotations(&mut self) {
        if self.presenter.overlay().log().is_empty() {
            self.set_status("Nothing to export");
            return;
        }
        let stamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
        let path = PathBuf::from(&self.config.recording_output_dir)
            .join(format!("annotations_{stamp}.png"));
        let result = std::fs::create_dir_all(&self.config.recording_output_dir)
            .map_err(|err| {
                podium_core::ViewerError::io(
                    format!("creating {}", self.config.recording_output_dir),
                    err,
                )
            })
            .and_then(|()| self.presenter.overlay().save_png(&path));
        match result {
            Ok(()) => {
                info!(path = %path.display(), "Exported annotations");
                self.set_status(format!("Annotations saved to {}", path.display()));
            }
            Err(err) => {
                warn!("Failed to export annotations: {err}");
                self.set_status(err.to_string());
            }
        }
    }
}

pub(super) fn runtime_event_to_message(
    event: Event,
    status: event::Status,
    _window_id: window::Id,
) -> Option<Message> {
    // Releases and cursor motion are always forwarded so a drag that ends over
    // a widget still finishes.
    match &event {
        Event::Mouse(mouse::Event::CursorMoved { position }) => {
            return Some(Message::CursorMoved {
                x: position.x,
                y: position.y,
            });
        }
        Event::Mouse(mouse::Event::ButtonReleased(button)) => {
            return Some(Message::MouseReleased(*button));
        }
        Event::Keyboard(keyboard::Event::ModifiersChanged(modifiers)) => {
            return Some(Message::ModifiersChanged(*modifiers));
        }
        Event::Window(window::Event::CloseRequested) => return Some(Message::CloseRequested),
        _ => {}
    }
    if status == event::Status::Captured {
        return None;
    }
    match event {
        Event::Window(window::Event::Resized(size)) => Some(Message::WindowResized {
            width: size.width,
            height: size.height,
        }),
        Event::Keyboard(keyboard::Event::KeyPressed { key, modifiers, .. }) => {
            Some(Message::KeyPressed { key, modifiers })
        }
        Event::Mouse(mouse::Event::ButtonPressed(button)) => Some(Message::MousePressed(button)),
        Event::Mouse(mouse::Event::WheelScrolled { delta }) => {
            let delta_y = match delta {
                mouse::ScrollDelta::Lines { y, .. } => y,
                mouse::ScrollDelta::Pixels { y, .. } => y,
            };
            Some(Message::WheelScrolled { delta_y })
        }
        _ => None,
    }
}
