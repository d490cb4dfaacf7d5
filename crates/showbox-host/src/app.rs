use std::path::Path;
use std::rc::Rc;

use anyhow::Context;
use winit::dpi::LogicalSize;

use showbox_engine::core::{App as EngineApp, AppControl, FrameCtx};
use showbox_engine::device::GpuInit;
use showbox_engine::paint::Color;
use showbox_engine::render::SceneRenderer;
use showbox_engine::scene::DrawList;
use showbox_engine::text::{FontId, FontSystem};
use showbox_engine::window::{Runtime, RuntimeConfig, WindowMode};

use crate::config::HostConfig;
use crate::host::Host;
use crate::registry::Registry;

const FONT_PATHS: &[&str] = &[
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/noto/NotoSans-Regular.ttf",
    "/usr/share/fonts/truetype/noto/NotoSans-Regular.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "C:\\Windows\\Fonts\\segoeui.ttf",
];

/// Loads the first system font that parses. Text is skipped without one.
fn load_host_font(fonts: &mut FontSystem) -> Option<FontId> {
    let found = FONT_PATHS.iter().find_map(|p| fonts.load_font_file(Path::new(p)).ok());
    if found.is_none() {
        log::warn!("no usable system font found; text will not be drawn");
    }
    found
}

/// Opens the window and runs the host until it asks to close.
///
/// The registry is frozen here: from now on it is only read.
pub fn run(registry: Registry, config: HostConfig, mode: WindowMode) -> anyhow::Result<()> {
    let mut fonts = FontSystem::new();
    let font = load_host_font(&mut fonts);
    let fonts = Rc::new(fonts);

    let (width, height) = config.window_size();
    let runtime_config = RuntimeConfig {
        title: config.title.clone(),
        initial_size: LogicalSize::new(width as f64, height as f64),
        mode,
        resizable: false,
    };

    let mut host = Host::new(Rc::new(registry), config, Rc::clone(&fonts), font);
    host.start().context("cannot start the initial example")?;

    let app = ShowboxApp {
        host,
        fonts,
        renderer: SceneRenderer::new(),
        draw_list: DrawList::new(),
        title: String::new(),
    };
    Runtime::run(runtime_config, GpuInit::default(), app)
}

/// Adapts the [`Host`] to the engine's frame loop.
struct ShowboxApp {
    host: Host,
    fonts: Rc<FontSystem>,
    renderer: SceneRenderer,
    draw_list: DrawList,
    /// Last caption pushed to the window.
    title: String,
}

impl EngineApp for ShowboxApp {
    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl {
        self.host.set_elapsed(ctx.time.millis());
        for event in &ctx.input_frame.events {
            self.host.handle_event(event);
        }
        self.host.sync_held(&ctx.input.held);

        self.host.update();
        if self.host.close_requested() {
            log::info!("close requested");
            return AppControl::Exit;
        }

        let caption = self.host.window_caption();
        if caption != self.title {
            ctx.window.set_title(&caption);
            self.title = caption;
        }

        self.draw_list.clear();
        self.host.draw(&mut self.draw_list);

        let renderer = &mut self.renderer;
        let draw_list = &self.draw_list;
        let fonts = &*self.fonts;
        ctx.render(Color::WHITE, |rctx, target| {
            renderer.render(rctx, target, draw_list, fonts);
        })
    }
}
