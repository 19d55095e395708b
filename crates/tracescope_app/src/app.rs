// SPDX-License-Identifier: MIT OR Apache-2.0
//! Viewer application setup and event loop.
//!
//! A single-window winit shell rendering the replay panel through
//! egui-wgpu. The event loop doubles as the animation clock: redraws are
//! requested continuously only while the panel wants ticks, so a stopped
//! viewer sleeps between input events.

use crate::config::ViewerConfig;
use crate::file_watcher::{DatasetWatcher, WatchEvent};
use crate::theme::ViewerTheme;
use egui_wgpu::wgpu;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};
use thiserror::Error;
use tracescope_replay::{Dataset, ReplayPanel};
use winit::application::ApplicationHandler;
use winit::event::{StartCause, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowId};

/// How often the idle loop wakes to poll the dataset watcher
const WATCH_POLL_INTERVAL: Duration = Duration::from_millis(250);

/// Viewer application errors
#[derive(Debug, Error)]
#[allow(dead_code)] // Error variants defined for future use
pub enum ViewerError {
    /// Window creation failed
    #[error("Failed to create window: {0}")]
    WindowCreation(String),

    /// Event loop error
    #[error("Event loop error: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for viewer operations
pub type Result<T> = std::result::Result<T, ViewerError>;

/// Graphics state for wgpu rendering
struct GraphicsState {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    egui_renderer: egui_wgpu::Renderer,
}

impl GraphicsState {
    fn new(window: Arc<Window>) -> Self {
        let size = window.inner_size();

        // Create wgpu instance
        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor {
            backends: wgpu::Backends::PRIMARY,
            ..Default::default()
        });

        // Create surface
        let surface = instance
            .create_surface(window.clone())
            .expect("Failed to create surface");

        // Request adapter
        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::LowPower,
            compatible_surface: Some(&surface),
            force_fallback_adapter: false,
        }))
        .expect("Failed to find suitable GPU adapter");

        tracing::info!("Using GPU: {}", adapter.get_info().name);

        // Request device
        let (device, queue) = pollster::block_on(adapter.request_device(
            &wgpu::DeviceDescriptor {
                label: Some("TraceScope Device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                ..Default::default()
            },
            None,
        ))
        .expect("Failed to create device");

        // Configure surface
        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .copied()
            .find(wgpu::TextureFormat::is_srgb)
            .unwrap_or(surface_caps.formats[0]);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: surface_caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        // Create egui renderer
        let egui_renderer = egui_wgpu::Renderer::new(&device, surface_format, None, 1, false);

        Self {
            surface,
            device,
            queue,
            config,
            egui_renderer,
        }
    }

    fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        if new_size.width > 0 && new_size.height > 0 {
            self.config.width = new_size.width;
            self.config.height = new_size.height;
            self.surface.configure(&self.device, &self.config);
        }
    }

    #[allow(unsafe_code)] // Workaround for wgpu 23 lifetime issue with RenderPass
    fn render(
        &mut self,
        egui_ctx: &egui::Context,
        full_output: egui::FullOutput,
        window: &Window,
    ) -> std::result::Result<(), wgpu::SurfaceError> {
        let output = self.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Viewer Encoder"),
            });

        // Prepare egui render
        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [self.config.width, self.config.height],
            pixels_per_point: window.scale_factor() as f32,
        };

        let paint_jobs = egui_ctx.tessellate(full_output.shapes, full_output.pixels_per_point);

        // Update textures
        for (id, image_delta) in &full_output.textures_delta.set {
            self.egui_renderer
                .update_texture(&self.device, &self.queue, *id, image_delta);
        }

        // Update buffers
        self.egui_renderer.update_buffers(
            &self.device,
            &self.queue,
            &mut encoder,
            &paint_jobs,
            &screen_descriptor,
        );

        // wgpu 23 has a 'static lifetime bound issue with RenderPass
        // We work around this using raw pointers
        let encoder_ptr = Box::into_raw(Box::new(encoder));

        {
            // SAFETY: encoder_ptr is valid and we'll properly reclaim it after the render_pass is dropped
            let encoder_ref: &'static mut wgpu::CommandEncoder = unsafe { &mut *encoder_ptr };

            let mut render_pass = encoder_ref.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Replay Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: 0.09,
                            g: 0.09,
                            b: 0.09,
                            a: 1.0,
                        }),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            self.egui_renderer
                .render(&mut render_pass, &paint_jobs, &screen_descriptor);
            // render_pass is dropped here
        }

        // SAFETY: We're reclaiming the Box after render_pass is dropped
        let encoder = unsafe { Box::from_raw(encoder_ptr) };

        // Submit and present
        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        // Free textures
        for id in &full_output.textures_delta.free {
            self.egui_renderer.free_texture(id);
        }

        Ok(())
    }
}

/// Running state of the viewer
struct ViewerRunning {
    window: Arc<Window>,
    graphics: GraphicsState,
    egui_ctx: egui::Context,
    egui_state: egui_winit::State,
    panel: ReplayPanel,
    watcher: Option<DatasetWatcher>,
}

impl ViewerRunning {
    /// Drain the dataset watcher and reload on change.
    ///
    /// A transient read failure keeps the current dataset; a successful read
    /// that fails to decode degrades the panel the same way a bad initial
    /// load does. Returns whether anything was reloaded.
    fn poll_watcher(&mut self) -> bool {
        let Some(watcher) = &self.watcher else {
            return false;
        };

        let mut reloaded = false;
        for event in watcher.poll_events() {
            match event {
                WatchEvent::DataChanged => {
                    tracing::info!("Dataset file changed, reloading");
                    match std::fs::read_to_string(watcher.path()) {
                        Ok(text) => {
                            self.panel.replace_dataset(Dataset::from_json(&text));
                            reloaded = true;
                        }
                        Err(error) => {
                            tracing::warn!("Failed to re-read dataset: {error}");
                        }
                    }
                }
                WatchEvent::Error(error) => {
                    tracing::warn!("Dataset watcher error: {error}");
                }
            }
        }
        reloaded
    }
}

/// Main viewer application
pub struct ViewerApp {
    running: Option<ViewerRunning>,
    config: ViewerConfig,
    /// Panel prepared by `main`, handed to the window on first resume
    panel: Option<ReplayPanel>,
    /// Dataset file backing the panel, if any
    data_path: Option<PathBuf>,
}

impl ViewerApp {
    /// Run the viewer with a prepared replay panel.
    pub fn run(config: ViewerConfig, panel: ReplayPanel, data_path: Option<PathBuf>) -> Result<()> {
        let event_loop = EventLoop::new()?;
        event_loop.set_control_flow(ControlFlow::Wait);

        let mut app = ViewerApp {
            running: None,
            config,
            panel: Some(panel),
            data_path,
        };
        event_loop.run_app(&mut app)?;

        Ok(())
    }
}

impl ApplicationHandler for ViewerApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.running.is_some() {
            return;
        }
        let Some(panel) = self.panel.take() else {
            return;
        };

        tracing::info!("Creating viewer window...");

        let window_attrs = Window::default_attributes()
            .with_title("TraceScope")
            .with_inner_size(winit::dpi::LogicalSize::new(
                self.config.window.width,
                self.config.window.height,
            ))
            .with_min_inner_size(winit::dpi::LogicalSize::new(640, 360));

        let window = Arc::new(
            event_loop
                .create_window(window_attrs)
                .expect("Failed to create window"),
        );

        tracing::info!("Initializing graphics...");
        let graphics = GraphicsState::new(window.clone());

        let egui_ctx = egui::Context::default();
        ViewerTheme::default().apply(&egui_ctx);

        let egui_state = egui_winit::State::new(
            egui_ctx.clone(),
            egui_ctx.viewport_id(),
            &window,
            Some(window.scale_factor() as f32),
            None,
            Some(2 * 1024), // max texture side
        );

        let watcher = match &self.data_path {
            Some(path) if self.config.watch_data_file => match DatasetWatcher::new(path) {
                Ok(watcher) => Some(watcher),
                Err(error) => {
                    tracing::warn!("Dataset watching disabled: {error}");
                    None
                }
            },
            _ => None,
        };

        tracing::info!("Viewer initialized successfully!");

        self.running = Some(ViewerRunning {
            window,
            graphics,
            egui_ctx,
            egui_state,
            panel,
            watcher,
        });
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        let Some(running) = &mut self.running else {
            return;
        };

        // Let egui handle the event
        let response = running.egui_state.on_window_event(&running.window, &event);
        if response.repaint {
            running.window.request_redraw();
        }
        if response.consumed {
            return;
        }

        match event {
            WindowEvent::CloseRequested => {
                tracing::info!("Close requested, exiting...");
                event_loop.exit();
            }
            WindowEvent::Resized(new_size) => {
                tracing::debug!("Window resized to {:?}", new_size);
                running.graphics.resize(new_size);
                running.window.request_redraw();
            }
            WindowEvent::RedrawRequested => {
                running.poll_watcher();

                // Begin egui frame; the frame delta is the animation clock
                // tick, consumed by the panel only while it is animating.
                let raw_input = running.egui_state.take_egui_input(&running.window);
                let full_output = running.egui_ctx.run(raw_input, |ctx| {
                    let delta_time = ctx.input(|i| i.stable_dt);
                    running.panel.update(delta_time);

                    egui::CentralPanel::default().show(ctx, |ui| {
                        running.panel.ui(ui);
                    });
                });

                // Handle platform output
                running
                    .egui_state
                    .handle_platform_output(&running.window, full_output.platform_output.clone());

                // Render
                match running
                    .graphics
                    .render(&running.egui_ctx, full_output, &running.window)
                {
                    Ok(_) => {}
                    Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                        let size = running.window.inner_size();
                        running.graphics.resize(size);
                    }
                    Err(wgpu::SurfaceError::OutOfMemory) => {
                        tracing::error!("Out of GPU memory!");
                        event_loop.exit();
                    }
                    Err(wgpu::SurfaceError::Timeout) => {
                        tracing::warn!("Surface timeout");
                    }
                }

                // Keep the animation clock running only while playback wants
                // ticks; otherwise the loop sleeps until the next event.
                if running.panel.wants_ticks() {
                    running.window.request_redraw();
                }
            }
            _ => {}
        }
    }

    fn new_events(&mut self, _event_loop: &ActiveEventLoop, cause: StartCause) {
        // Idle wake-up for the dataset watcher.
        if matches!(cause, StartCause::ResumeTimeReached { .. }) {
            if let Some(running) = &mut self.running {
                if running.poll_watcher() {
                    running.window.request_redraw();
                }
            }
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        let Some(running) = &self.running else {
            return;
        };

        if running.panel.wants_ticks() {
            event_loop.set_control_flow(ControlFlow::Poll);
            running.window.request_redraw();
        } else if running.watcher.is_some() {
            event_loop.set_control_flow(ControlFlow::WaitUntil(
                Instant::now() + WATCH_POLL_INTERVAL,
            ));
        } else {
            event_loop.set_control_flow(ControlFlow::Wait);
        }
    }
}
