use super::messages::Message;
use super::state::{App, SCRIPT_PANEL_WIDTH, SCRIPT_SCROLL_ID, STATUS_BAR_HEIGHT, TOOLBAR_HEIGHT};
use iced::alignment::Vertical;
use iced::widget::{
    Row, button, checkbox, column, container, horizontal_space, image, row, scrollable, slider,
    text, text_input, vertical_rule,
};
use iced::{Background, Color, ContentFit, Element, Length};
use podium_core::script::{MAX_SCROLL_SPEED, MIN_SCROLL_SPEED};
use podium_core::strokes::{MAX_PEN_WIDTH, MIN_PEN_WIDTH, PenColor};

impl App {
    pub fn view(&self) -> Element<'_, Message> {
        let mut body: Row<'_, Message> = row![self.stage()].height(Length::Fill);
        if self.config.show_script {
            body = body.push(self.script_panel());
        }

        column![self.toolbar(), body, self.status_bar()]
            .height(Length::Fill)
            .into()
    }

    fn toolbar(&self) -> Element<'_, Message> {
        let deck = self.presenter.deck();
        let open_input = text_input("slides.pdf", &self.open_path_input)
            .on_input(Message::OpenPathInputChanged)
            .on_submit(Message::OpenPathRequested)
            .width(Length::Fixed(200.0));
        let open_button = if self.deck_loading {
            button("Loading...")
        } else {
            button("Open").on_press(Message::OpenPathRequested)
        };

        let prev_button = if deck.is_empty() || deck.is_first() {
            button("Previous")
        } else {
            button("Previous").on_press(Message::PreviousSlide)
        };
        let next_button = if deck.is_empty() || deck.is_last() {
            button("Next")
        } else {
            button("Next").on_press(Message::NextSlide)
        };

        let overlay = self.presenter.overlay();
        let draw_toggle = button(if self.presenter.overlay_visible() {
            "Stop Drawing"
        } else {
            "Draw"
        })
        .on_press(Message::ToggleDrawing);
        let pen_width = overlay.pen_width();

        let record_toggle = button(if self.recording.is_recording() {
            "Stop Recording"
        } else {
            "Record"
        })
        .on_press(Message::ToggleRecording);
        let script_toggle = button(if self.config.show_script {
            "Hide Script"
        } else {
            "Show Script"
        })
        .on_press(Message::ToggleScript);
        let theme_toggle = button(if matches!(
            self.config.theme,
            podium_core::config::ThemeMode::Night
        ) {
            "Day Mode"
        } else {
            "Night Mode"
        })
        .on_press(Message::ToggleTheme);

        let controls = row![
            open_input,
            open_button,
            vertical_rule(1),
            prev_button,
            next_button,
            vertical_rule(1),
            button("-").on_press(Message::ZoomOut),
            text(format!("{}%", self.presenter.view().zoom_percent())),
            button("+").on_press(Message::ZoomIn),
            button("Fit").on_press(Message::ResetView),
            vertical_rule(1),
            draw_toggle,
            button(pen_swatch(overlay.pen_color())).on_press(Message::CycleColor),
            slider(
                MIN_PEN_WIDTH as f32..=MAX_PEN_WIDTH as f32,
                pen_width as f32,
                |value| Message::PenWidthChanged(value.round() as u32),
            )
            .width(Length::Fixed(90.0)),
            text(format!("{pen_width}px")),
            button("Undo").on_press(Message::UndoStroke),
            button("Clear").on_press(Message::ClearStrokes),
            button("Save Ink").on_press(Message::ExportAnnotations),
            vertical_rule(1),
            record_toggle,
            script_toggle,
            button("Fullscreen").on_press(Message::ToggleFullscreen),
            theme_toggle,
        ]
        .spacing(8)
        .align_y(Vertical::Center);

        container(controls)
            .padding([0, 12])
            .width(Length::Fill)
            .height(Length::Fixed(TOOLBAR_HEIGHT))
            .align_y(Vertical::Center)
            .into()
    }

    fn stage(&self) -> Element<'_, Message> {
        let viewport = self.presenter.viewport();
        let content: Element<'_, Message> = match &self.frame {
            Some(handle) => image(handle.clone())
                .width(Length::Fixed(viewport.width as f32))
                .height(Length::Fixed(viewport.height as f32))
                .content_fit(ContentFit::None)
                .into(),
            None => text("").into(),
        };
        container(content)
            .width(Length::Fill)
            .height(Length::Fill)
            .into()
    }

    fn script_panel(&self) -> Element<'_, Message> {
        let path_row = row![
            text_input("notes.txt", &self.script_path_input)
                .on_input(Message::ScriptPathInputChanged)
                .on_submit(Message::LoadScriptRequested)
                .width(Length::Fill),
            button("Load").on_press(Message::LoadScriptRequested),
            button("Save").on_press(Message::SaveScriptRequested),
        ]
        .spacing(6)
        .align_y(Vertical::Center);

        let speed = self.script.speed();
        let speed_row = row![
            checkbox("Auto-scroll", self.script.auto_scroll())
                .on_toggle(|_| Message::ToggleScriptAutoScroll),
            text(format!("Speed: {speed}")),
            slider(
                MIN_SCROLL_SPEED as f32..=MAX_SCROLL_SPEED as f32,
                speed as f32,
                |value| Message::ScriptSpeedChanged(value.round() as u32),
            ),
        ]
        .spacing(8)
        .align_y(Vertical::Center);

        let scroll_row = row![
            button("Top").on_press(Message::ScriptTop),
            button("Up").on_press(Message::ScriptScrollUp),
            button("Down").on_press(Message::ScriptScrollDown),
            button("Bottom").on_press(Message::ScriptBottom),
        ]
        .spacing(6);

        let script_text = if self.script.text().is_empty() {
            "No script loaded."
        } else {
            self.script.text()
        };
        let script_view = scrollable(
            container(text(script_text).size(self.config.script_font_size as f32))
                .width(Length::Fill)
                .padding(8),
        )
        .id(SCRIPT_SCROLL_ID.clone())
        .on_scroll(|viewport| {
            let max_offset = viewport.content_bounds().height - viewport.bounds().height;
            Message::ScriptScrolled {
                offset: viewport.absolute_offset().y,
                max_offset: max_offset.max(0.0),
            }
        })
        .height(Length::Fill);

        container(
            column![path_row, speed_row, scroll_row, script_view]
                .spacing(8)
                .height(Length::Fill),
        )
        .padding(8)
        .width(Length::Fixed(SCRIPT_PANEL_WIDTH))
        .height(Length::Fill)
        .into()
    }

    fn status_bar(&self) -> Element<'_, Message> {
        let mode = if self.presenter.overlay_visible() {
            "Drawing"
        } else {
            "Viewing"
        };
        let status = row![
            text(self.slide_label()),
            text(format!("Zoom {}%", self.presenter.view().zoom_percent())),
            text(mode),
            text(self.recording_label()),
            horizontal_space(),
            text(self.status.as_deref().unwrap_or("")),
        ]
        .spacing(16)
        .align_y(Vertical::Center);

        container(status)
            .padding([0, 12])
            .width(Length::Fill)
            .height(Length::Fixed(STATUS_BAR_HEIGHT))
            .align_y(Vertical::Center)
            .into()
    }
}

fn pen_swatch<'a>(color: PenColor) -> Element<'a, Message> {
    let fill = Color::from_rgba8(color.r, color.g, color.b, color.a as f32 / 255.0);
    container(text(""))
        .width(Length::Fixed(16.0))
        .height(Length::Fixed(16.0))
        .style(move |_theme| container::Style {
            background: Some(Background::Color(fill)),
            ..container::Style::default()
        })
        .into()
}
