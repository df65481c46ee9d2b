// SPDX-License-Identifier: GPL-3.0-only

//! Main application view
//!
//! The layout is a camera preview filling the window with a status footer
//! underneath. The footer follows the scan phase: a hint while scanning, a
//! progress note while submitting, and the service message with a reset
//! button afterwards.

use crate::app::state::{AppModel, Message};
use crate::constants::ui;
use crate::scanner::ScanPhase;
use cosmic::Element;
use cosmic::iced::{Alignment, Length};
use cosmic::widget;

impl AppModel {
    /// Build the main application view
    pub fn view(&self) -> Element<'_, Message> {
        let preview = self.build_preview();
        let footer = self.build_footer();

        widget::column()
            .push(
                widget::container(preview)
                    .width(Length::Fill)
                    .height(Length::Fill)
                    .align_x(Alignment::Center)
                    .align_y(Alignment::Center),
            )
            .push(footer)
            .width(Length::Fill)
            .height(Length::Fill)
            .into()
    }

    /// The live preview, the frozen captured frame, or a status text
    fn build_preview(&self) -> Element<'_, Message> {
        if let Some(handle) = &self.preview {
            return widget::image(handle.clone())
                .width(Length::Fill)
                .height(Length::Fill)
                .into();
        }

        let status = if let Some(error) = &self.camera_error {
            error.as_str()
        } else if !self.cameras_initialized {
            "Looking for cameras..."
        } else {
            "Waiting for camera..."
        };
        widget::text(status).into()
    }

    /// Phase-dependent footer under the preview
    fn build_footer(&self) -> Element<'_, Message> {
        let content: Element<'_, Message> = match self.session.phase() {
            ScanPhase::Scanning => {
                widget::text("Point the camera at a UPC-A barcode").into()
            }
            ScanPhase::Submitting { code } => widget::column()
                .push(widget::text(code.to_string()).font(cosmic::font::bold()))
                .push(widget::text("Sending..."))
                .spacing(ui::FOOTER_SPACING)
                .align_x(Alignment::Center)
                .into(),
            ScanPhase::Result { message } => self.build_outcome_card(message),
            ScanPhase::Error { message } => self.build_outcome_card(message),
        };

        widget::container(content)
            .width(Length::Fill)
            .padding(ui::FOOTER_PADDING)
            .align_x(Alignment::Center)
            .into()
    }

    /// Result or error message with the reset button
    fn build_outcome_card<'a>(&'a self, message: &'a str) -> Element<'a, Message> {
        widget::column()
            .push(widget::text(message))
            .push(widget::button::suggested("Scan Again").on_press(Message::ScanAgain))
            .spacing(ui::FOOTER_SPACING)
            .align_x(Alignment::Center)
            .max_width(ui::RESULT_CARD_MAX_WIDTH)
            .into()
    }
}
