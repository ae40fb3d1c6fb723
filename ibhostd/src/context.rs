//! # Host Context
//!
//! The explicit context object the engine calls back into during a step.
//! It owns the content store, the surface factory, the input register and
//! the compositor, so nothing on this path is global.

use crate::config::HostConfig;
use display_fb::{Compositor, MemoryFramebuffer};
use graphics_rasterizer::{DisplayContext, Rect};
use hal::PixelFormat;
use input_types::InputRegister;
use services_carousel::{CarouselError, ContentStore, LocalCarousel};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Host-side failures reported to the engine
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum HostError {
    /// The receiver cannot do this; recovery is an explicit reboot
    #[error("Unsupported operation: {operation}")]
    Unsupported { operation: &'static str },
}

/// Services the host exposes to the engine
pub trait EngineHost {
    /// True if the object is currently available; never fails
    fn probe(&self, path: &str) -> bool;

    /// Reads a carousel object
    fn fetch(&self, path: &str) -> Result<Vec<u8>, CarouselError>;

    /// Sets the register that gates remote-control input
    fn set_input_register(&mut self, register: InputRegister);

    fn input_register(&self) -> InputRegister;

    /// Asks for the whole display tree to be redrawn after this step
    fn request_redraw(&mut self, damage: Rect);

    /// Surface factory
    fn display(&self) -> &DisplayContext;

    /// Channel index for a service URL
    fn service_index(&self, url: &str) -> Option<u32>;

    fn current_service_index(&self) -> Option<u32>;

    fn tune(&mut self, index: u32) -> Result<(), HostError>;

    fn begin_audio(&mut self, component: &str) -> Result<(), HostError>;

    fn stop_audio(&mut self) -> Result<(), HostError>;

    /// Accepted and recorded; video is never rendered
    fn begin_video(&mut self, component: &str, area: Rect);

    fn stop_video(&mut self);

    fn receiver_id(&self) -> &str;

    fn engine_version(&self) -> &str;

    /// True if the receiver advertises `feature`
    fn engine_support(&self, feature: &str) -> bool;
}

/// Out-of-band video request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoRequest {
    pub component: String,
    pub area: Rect,
}

/// Concrete host context
#[derive(Debug)]
pub struct HostContext {
    config: HostConfig,
    carousel: LocalCarousel,
    display: DisplayContext,
    register: InputRegister,
    compositor: Compositor,
    video: Option<VideoRequest>,
    debug: bool,
}

impl HostContext {
    /// Builds the context; the frame buffer is allocated here, once
    pub fn new(config: HostConfig) -> Self {
        let framebuffer = MemoryFramebuffer::new(
            config.frame.width as usize,
            config.frame.height as usize,
            PixelFormat::Rgb32,
        );
        let compositor = Compositor::new(framebuffer, config.background());
        let mut context = Self {
            carousel: LocalCarousel::new(config.content_root.clone()),
            display: DisplayContext::new(config.font_catalog()),
            register: InputRegister::NONE,
            compositor,
            video: None,
            debug: false,
            config,
        };
        context.reset();
        context
    }

    /// Returns to the post-boot state, re-reading root and fonts from config
    pub fn reset(&mut self) {
        self.register = InputRegister::NONE;
        self.video = None;
        self.carousel.set_root(self.config.content_root.clone());
        self.display.set_catalog(self.config.font_catalog());
        self.compositor.set_background(self.config.background());
        info!(
            root = %self.config.content_root.display(),
            font = self.display.catalog().family(),
            "host context reset"
        );
    }

    pub fn config(&self) -> &HostConfig {
        &self.config
    }

    /// Changes the configuration; takes effect on the next reset
    pub fn config_mut(&mut self) -> &mut HostConfig {
        &mut self.config
    }

    pub fn carousel(&self) -> &LocalCarousel {
        &self.carousel
    }

    pub fn compositor(&self) -> &Compositor {
        &self.compositor
    }

    pub fn compositor_mut(&mut self) -> &mut Compositor {
        &mut self.compositor
    }

    pub fn video(&self) -> Option<&VideoRequest> {
        self.video.as_ref()
    }

    pub fn debug(&self) -> bool {
        self.debug
    }

    /// Flips per-frame diagnostics; returns the new state
    pub fn toggle_debug(&mut self) -> bool {
        self.debug = !self.debug;
        info!(enabled = self.debug, "frame diagnostics");
        self.debug
    }
}

impl EngineHost for HostContext {
    fn probe(&self, path: &str) -> bool {
        self.carousel.probe(path)
    }

    fn fetch(&self, path: &str) -> Result<Vec<u8>, CarouselError> {
        self.carousel.fetch(path)
    }

    fn set_input_register(&mut self, register: InputRegister) {
        if register != self.register {
            debug!(from = %self.register, to = %register, "input register");
        }
        self.register = register;
    }

    fn input_register(&self) -> InputRegister {
        self.register
    }

    fn request_redraw(&mut self, damage: Rect) {
        self.compositor.request_redraw(damage);
    }

    fn display(&self) -> &DisplayContext {
        &self.display
    }

    fn service_index(&self, url: &str) -> Option<u32> {
        self.config.services.get(url).copied()
    }

    fn current_service_index(&self) -> Option<u32> {
        self.config.current_service
    }

    fn tune(&mut self, index: u32) -> Result<(), HostError> {
        warn!(index, "tune requested");
        Err(HostError::Unsupported { operation: "tune" })
    }

    fn begin_audio(&mut self, component: &str) -> Result<(), HostError> {
        warn!(component, "audio requested");
        Err(HostError::Unsupported {
            operation: "begin_audio",
        })
    }

    fn stop_audio(&mut self) -> Result<(), HostError> {
        Err(HostError::Unsupported {
            operation: "stop_audio",
        })
    }

    fn begin_video(&mut self, component: &str, area: Rect) {
        debug!(component, ?area, "video accepted, not rendered");
        self.video = Some(VideoRequest {
            component: component.to_string(),
            area,
        });
    }

    fn stop_video(&mut self) {
        self.video = None;
    }

    fn receiver_id(&self) -> &str {
        &self.config.receiver.id
    }

    fn engine_version(&self) -> &str {
        &self.config.receiver.version
    }

    fn engine_support(&self, feature: &str) -> bool {
        self.config
            .receiver
            .features
            .iter()
            .any(|f| f.eq_ignore_ascii_case(feature))
    }
}
