// SPDX-License-Identifier: GPL-3.0-only

//! Settings drawer view

use crate::app::state::{AppModel, Message};
use crate::constants::app_info;
use cosmic::Element;
use cosmic::app::context_drawer;
use cosmic::widget;

impl AppModel {
    /// Create the settings view for the context drawer
    ///
    /// Shows camera selection, the recap endpoint, and capture options.
    pub fn settings_view(&self) -> context_drawer::ContextDrawer<'_, Message> {
        let spacing = cosmic::theme::spacing();

        // Camera selection dropdown
        let camera_dropdown = widget::dropdown(
            &self.camera_dropdown_options,
            Some(self.current_camera_index),
            Message::SelectCamera,
        );

        // Recap endpoint, applied on submit
        let endpoint_input = widget::text_input("http://localhost:5000/recap", &self.endpoint_input)
            .on_input(Message::EndpointInputChanged)
            .on_submit(|_| Message::SaveEndpoint);

        let save_frames_toggle = widget::toggler(self.config.save_captured_frames)
            .on_toggle(|_| Message::ToggleSaveFrames);

        let version_info = format!("Version {}", app_info::version());

        let settings_column: Element<'_, Message> = widget::column()
            .push(widget::text("Camera").size(16).font(cosmic::font::bold()))
            .push(widget::vertical_space().height(spacing.space_xxs))
            .push(camera_dropdown)
            .push(widget::vertical_space().height(spacing.space_s))
            .push(
                widget::text("Recap Endpoint")
                    .size(16)
                    .font(cosmic::font::bold()),
            )
            .push(widget::vertical_space().height(spacing.space_xxs))
            .push(endpoint_input)
            .push(widget::vertical_space().height(spacing.space_s))
            .push(
                widget::row()
                    .push(widget::text("Save captured frames"))
                    .push(widget::horizontal_space())
                    .push(save_frames_toggle),
            )
            .push(widget::vertical_space().height(spacing.space_m))
            .push(widget::text(version_info).size(12))
            .into();

        context_drawer::context_drawer(
            settings_column,
            Message::ToggleContextPage(crate::app::state::ContextPage::Settings),
        )
        .title("Settings")
    }
}
