// SPDX-License-Identifier: GPL-3.0-only

//! UI navigation and settings handlers

use crate::app::state::{AppModel, ContextPage, Message};
use crate::config::Config;
use cosmic::Task;
use tracing::{error, info, warn};

impl AppModel {
    pub(crate) fn handle_launch_url(&self, url: String) -> Task<cosmic::Action<Message>> {
        match open::that_detached(&url) {
            Ok(()) => {}
            Err(err) => {
                error!(url = %url, error = %err, "Failed to open URL");
            }
        }
        Task::none()
    }

    pub(crate) fn handle_toggle_context_page(
        &mut self,
        context_page: ContextPage,
    ) -> Task<cosmic::Action<Message>> {
        if self.context_page == context_page {
            self.core.window.show_context = !self.core.window.show_context;
        } else {
            self.context_page = context_page;
            self.core.window.show_context = true;
        }
        Task::none()
    }

    pub(crate) fn handle_update_config(&mut self, config: Config) -> Task<cosmic::Action<Message>> {
        self.endpoint_input = config.recap_endpoint.clone();
        self.config = config;
        Task::none()
    }

    pub(crate) fn handle_endpoint_input_changed(
        &mut self,
        value: String,
    ) -> Task<cosmic::Action<Message>> {
        self.endpoint_input = value;
        Task::none()
    }

    pub(crate) fn handle_save_endpoint(&mut self) -> Task<cosmic::Action<Message>> {
        let endpoint = self.endpoint_input.trim().to_string();
        if endpoint.is_empty() {
            warn!("Ignoring empty endpoint");
            self.endpoint_input = self.config.recap_endpoint.clone();
            return Task::none();
        }

        info!(endpoint = %endpoint, "Saving recap endpoint");
        if let Some(handler) = &self.config_handler {
            if let Err(err) = self.config.set_recap_endpoint(handler, endpoint) {
                warn!(error = ?err, "Failed to save endpoint");
            }
        } else {
            self.config.recap_endpoint = endpoint;
        }
        Task::none()
    }

    pub(crate) fn handle_toggle_save_frames(&mut self) -> Task<cosmic::Action<Message>> {
        let enabled = !self.config.save_captured_frames;
        if let Some(handler) = &self.config_handler {
            if let Err(err) = self.config.set_save_captured_frames(handler, enabled) {
                warn!(error = ?err, "Failed to save setting");
            }
        } else {
            self.config.save_captured_frames = enabled;
        }
        Task::none()
    }
}
