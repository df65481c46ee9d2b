// SPDX-License-Identifier: GPL-3.0-only

//! Main application module for the recap scanner
//!
//! # Architecture
//!
//! - `state`: Application state types (AppModel, Message, ContextPage)
//! - `settings`: Settings drawer UI
//! - `view`: Main view rendering
//! - `update`: Message handling
//! - `handlers`: Focused message handlers per functional domain
//!
//! # Main Types
//!
//! - `AppModel`: Main application state with camera and scan session
//! - `Message`: All possible user interactions and system events

mod handlers;
mod settings;
mod state;
mod update;
mod view;

use crate::config::Config;
use crate::constants::timing;
use cosmic::app::context_drawer;
use cosmic::cosmic_config::{self, CosmicConfigEntry};
use cosmic::iced::Subscription;
use cosmic::widget::about::About;
use cosmic::{Element, Task};
pub use state::{AppModel, ContextPage, Message};
use std::sync::Arc;
use tracing::{error, info};

const REPOSITORY: &str = "https://github.com/cosmic-utils/comic-recapper";

impl cosmic::Application for AppModel {
    /// The async executor that will be used to run your application's commands.
    type Executor = cosmic::executor::Default;

    /// Data that your application receives to its init method.
    type Flags = ();

    /// Messages which the application and its widgets will emit.
    type Message = Message;

    /// Unique identifier in RDNN (reverse domain name notation) format.
    const APP_ID: &'static str = "io.github.cosmic-utils.comic-recapper";

    fn core(&self) -> &cosmic::Core {
        &self.core
    }

    fn core_mut(&mut self) -> &mut cosmic::Core {
        &mut self.core
    }

    /// Initializes the application with any given flags and startup commands.
    fn init(
        core: cosmic::Core,
        _flags: Self::Flags,
    ) -> (Self, Task<cosmic::Action<Self::Message>>) {
        // Create the about widget
        let about = About::default()
            .name("Comic Recapper")
            .version(env!("GIT_VERSION"))
            .links([("Repository", REPOSITORY)])
            .license(env!("CARGO_PKG_LICENSE"));

        // Load configuration
        let (config_handler, config) =
            match cosmic_config::Config::new(Self::APP_ID, Config::VERSION) {
                Ok(handler) => {
                    let config = match Config::get_entry(&handler) {
                        Ok(config) => config,
                        Err((errors, config)) => {
                            error!(?errors, "Errors loading config");
                            config
                        }
                    };
                    (Some(handler), config)
                }
                Err(err) => {
                    error!(%err, "Failed to create config handler");
                    (None, Config::default())
                }
            };

        // Initialize GStreamer early (required before any GStreamer calls)
        if let Err(e) = gstreamer::init() {
            error!(error = %e, "Failed to initialize GStreamer");
        }

        let endpoint_input = config.recap_endpoint.clone();
        let last_camera_path = config.last_camera_path.clone();

        let app = AppModel {
            core,
            context_page: ContextPage::default(),
            about,
            config,
            config_handler,
            session: crate::scanner::ScanSession::default(),
            last_detection_time: None,
            pending_detection: None,
            detection_seq: 0,
            camera_cancel_flag: Arc::new(std::sync::atomic::AtomicBool::new(false)),
            current_frame: None,
            preview: None,
            camera_error: None,
            available_cameras: Vec::new(),
            current_camera_index: 0,
            camera_dropdown_options: Vec::new(),
            cameras_initialized: false,
            endpoint_input,
        };

        // Enumerate cameras asynchronously (can be slow)
        let init_task = Task::perform(
            async move {
                info!("Enumerating cameras asynchronously");
                let cameras = crate::backends::camera::enumerate_cameras();
                info!(count = cameras.len(), "Found camera(s)");

                // Restore the last used camera or default to the first
                let camera_index = last_camera_path
                    .and_then(|last_path| {
                        cameras.iter().position(|cam| cam.path == last_path)
                    })
                    .unwrap_or(0);

                (cameras, camera_index)
            },
            |(cameras, index)| cosmic::Action::App(Message::CamerasInitialized(cameras, index)),
        );

        (app, init_task)
    }

    /// Elements to pack at the end of the header bar.
    fn header_end(&self) -> Vec<Element<'_, Self::Message>> {
        vec![
            cosmic::widget::button::icon(cosmic::widget::icon::from_name(
                "preferences-system-symbolic",
            ))
            .on_press(Message::ToggleContextPage(ContextPage::Settings))
            .into(),
        ]
    }

    /// Display a context drawer if the context page is requested.
    fn context_drawer(&self) -> Option<context_drawer::ContextDrawer<'_, Self::Message>> {
        if !self.core.window.show_context {
            return None;
        }

        Some(match self.context_page {
            ContextPage::About => context_drawer::about(
                &self.about,
                |url| Message::LaunchUrl(url.to_string()),
                Message::ToggleContextPage(ContextPage::About),
            ),
            ContextPage::Settings => self.settings_view(),
        })
    }

    /// Describes the interface based on the current state of the application model.
    fn view(&self) -> Element<'_, Self::Message> {
        self.view()
    }

    /// Register subscriptions for this application.
    fn subscription(&self) -> Subscription<Self::Message> {
        use cosmic::iced::futures::{SinkExt, StreamExt};

        let config_sub = self
            .core()
            .watch_config::<Config>(Self::APP_ID)
            .map(|update| Message::UpdateConfig(update.config));

        // The camera only runs while scanning; it is released while a
        // submission is in flight or a result is on screen. The session
        // generation in the subscription ID restarts the camera on reset.
        let camera_sub = if self.session.is_scanning() && self.cameras_initialized {
            let current_camera = self
                .available_cameras
                .get(self.current_camera_index)
                .cloned();
            let camera_index = self.current_camera_index;
            let generation = self.session.generation();
            let cancel_flag = Arc::clone(&self.camera_cancel_flag);

            Subscription::run_with_id(
                ("camera", camera_index, generation),
                cosmic::iced::stream::channel(100, move |mut output| async move {
                    info!(camera_index, generation, "Camera subscription started");

                    let Some(device) = current_camera else {
                        info!("No camera available, subscription exiting");
                        return;
                    };

                    loop {
                        if cancel_flag.load(std::sync::atomic::Ordering::Acquire) {
                            info!("Cancel flag set, subscription loop exiting");
                            break;
                        }

                        let (sender, mut receiver) =
                            cosmic::iced::futures::channel::mpsc::channel(100);

                        let pipeline =
                            match crate::backends::camera::PreviewPipeline::new(&device, sender) {
                                Ok(pipeline) => pipeline,
                                Err(e) => {
                                    error!(error = %e, "Failed to initialize pipeline");
                                    let _ = output.try_send(Message::CameraUnavailable(
                                        "Camera unavailable, retrying...".to_string(),
                                    ));
                                    tokio::time::sleep(tokio::time::Duration::from_secs(
                                        timing::PIPELINE_RETRY_SECS,
                                    ))
                                    .await;
                                    continue;
                                }
                            };

                        // Forward frames until cancelled or the stream ends
                        loop {
                            if cancel_flag.load(std::sync::atomic::Ordering::Acquire) {
                                info!("Cancel flag set, stopping pipeline");
                                break;
                            }
                            if output.is_closed() {
                                info!("Output channel closed, stopping pipeline");
                                break;
                            }

                            // Short timeout so cancellation is checked regularly
                            match tokio::time::timeout(
                                tokio::time::Duration::from_millis(timing::FRAME_POLL_MILLIS),
                                receiver.next(),
                            )
                            .await
                            {
                                Ok(Some(frame)) => {
                                    if let Err(e) =
                                        output.try_send(Message::CameraFrame(Arc::new(frame)))
                                    {
                                        if e.is_disconnected() {
                                            info!("Output channel disconnected");
                                            break;
                                        }
                                        // Dropping frames is fine for a live preview
                                    }
                                }
                                Ok(None) => {
                                    info!("Frame stream ended");
                                    break;
                                }
                                Err(_) => continue,
                            }
                        }

                        drop(pipeline);

                        if cancel_flag.load(std::sync::atomic::Ordering::Acquire)
                            || output.is_closed()
                        {
                            break;
                        }

                        // Stream ended unexpectedly (camera unplugged); retry
                        let _ = output.try_send(Message::CameraUnavailable(
                            "Camera disconnected, retrying...".to_string(),
                        ));
                        tokio::time::sleep(tokio::time::Duration::from_secs(
                            timing::PIPELINE_RETRY_SECS,
                        ))
                        .await;
                    }
                }),
            )
        } else {
            Subscription::none()
        };

        // Barcode detection runs on the pinned sample taken by the frame
        // handler. Keying on the sample counter (not the frame timestamp)
        // keeps the decode alive while newer frames stream in.
        let detection_sub = match &self.pending_detection {
            Some(frame) if self.session.is_scanning() => {
                let frame = Arc::clone(frame);
                Subscription::run_with_id(
                    ("upc_detection", self.session.generation(), self.detection_seq),
                    cosmic::iced::stream::channel(1, move |mut output| async move {
                        let detector = crate::scanner::UpcDetector::default();
                        let raw = detector.detect((*frame).clone()).await;
                        let _ = output.send(Message::CodeDetected(raw)).await;
                    }),
                )
            }
            _ => Subscription::none(),
        };

        Subscription::batch([config_sub, camera_sub, detection_sub])
    }

    /// Handles messages emitted by the application and its widgets.
    fn update(&mut self, message: Self::Message) -> Task<cosmic::Action<Self::Message>> {
        self.update(message)
    }
}
