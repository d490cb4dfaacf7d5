use std::cell::RefCell;
use std::collections::HashSet;
use std::rc::Rc;

use showbox_engine::coords::{Rect, Vec2};
use showbox_engine::input::{Button, ButtonEdge, InputEvent, Key, Modifiers, MouseButton};
use showbox_engine::paint::Color;
use showbox_engine::scene::DrawList;
use showbox_engine::text::{FontId, FontSystem};
use thiserror::Error;

use crate::config::HostConfig;
use crate::example::{Example, ExampleError};
use crate::facade::HostFacade;
use crate::painter::Painter;
use crate::registry::{DescriptorId, Registry, RegistryError};
use crate::sidebar::{self, Sidebar};

#[derive(Debug, Error)]
pub enum HostError {
    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error("no example with id {}", .0.index())]
    UnknownDescriptor(DescriptorId),

    #[error("cannot start `{name}`: {source}")]
    Instantiate { name: String, source: ExampleError },
}

enum InstanceState {
    Running(Box<dyn Example>),
    /// Construction or a hook failed; no further events are delivered.
    Faulted(String),
}

struct ActiveInstance {
    id: DescriptorId,
    state: InstanceState,
}

#[derive(Debug, Default)]
struct SourceView {
    open: bool,
    scroll: usize,
}

/// Runs one example at a time next to the sidebar.
///
/// The host starts idle; [`start`](Self::start) activates the first example.
/// From then on exactly one descriptor is active, possibly in a faulted state.
pub struct Host {
    registry: Rc<Registry>,
    config: HostConfig,
    facade: HostFacade,
    fonts: Rc<FontSystem>,
    font: Option<FontId>,

    sidebar: Sidebar,
    selections: Rc<RefCell<Vec<DescriptorId>>>,

    active: Option<ActiveInstance>,
    source_view: SourceView,

    pointer: (f32, f32),
    modifiers: Modifiers,
    /// Presses the host kept for itself; their releases are swallowed too.
    consumed: HashSet<Button>,
}

impl Host {
    pub fn new(registry: Rc<Registry>, config: HostConfig, fonts: Rc<FontSystem>, font: Option<FontId>) -> Self {
        let selections = Rc::new(RefCell::new(Vec::new()));
        let queue = Rc::clone(&selections);
        let sidebar = Sidebar::build(&registry, move |id| queue.borrow_mut().push(id)).with_title(config.title.clone());

        Self {
            facade: HostFacade::new(Rc::clone(&fonts), font),
            registry,
            config,
            fonts,
            font,
            sidebar,
            selections,
            active: None,
            source_view: SourceView::default(),
            pointer: (0.0, 0.0),
            modifiers: Modifiers::default(),
            consumed: HashSet::new(),
        }
    }

    /// Activates the configured start example, or the `welcome.*` one.
    pub fn start(&mut self) -> Result<(), HostError> {
        let named = self.config.start.as_deref().and_then(|name| {
            let found = self.registry.find_by_name(name).map(|d| d.id());
            if found.is_none() {
                log::warn!("no example named `{name}`; starting with the welcome example");
            }
            found
        });
        let id = match named {
            Some(id) => id,
            None => self.registry.initial_example()?.id(),
        };
        self.activate(id)
    }

    /// Replaces the active instance with a new one built from `id`.
    ///
    /// An unknown id leaves everything untouched. A failing constructor
    /// still makes `id` active, in the faulted state, and is returned as
    /// [`HostError::Instantiate`].
    pub fn switch_to(&mut self, id: DescriptorId) -> Result<(), HostError> {
        self.activate(id)
    }

    fn activate(&mut self, id: DescriptorId) -> Result<(), HostError> {
        let registry = Rc::clone(&self.registry);
        let descriptor = registry.get(id).ok_or(HostError::UnknownDescriptor(id))?;

        // the old instance goes before the new one is built
        self.active = None;
        self.facade.reset_instance_state();
        self.source_view = SourceView::default();

        let (width, height) = self.config.example_size;
        let built = descriptor.factory().instantiate(width, height, &self.config.options, &mut self.facade);
        match built {
            Ok(instance) => {
                log::info!("running `{}` from {}", descriptor.type_name(), descriptor.file_name());
                self.active = Some(ActiveInstance { id, state: InstanceState::Running(instance) });
                Ok(())
            }
            Err(source) => {
                log::error!("`{}` failed to start: {}", descriptor.type_name(), source);
                self.active = Some(ActiveInstance { id, state: InstanceState::Faulted(source.to_string()) });
                Err(HostError::Instantiate { name: descriptor.type_name().to_string(), source })
            }
        }
    }

    pub fn active_id(&self) -> Option<DescriptorId> {
        self.active.as_ref().map(|a| a.id)
    }

    pub fn is_faulted(&self) -> bool {
        matches!(self.active, Some(ActiveInstance { state: InstanceState::Faulted(_), .. }))
    }

    pub fn close_requested(&self) -> bool {
        self.facade.close_requested()
    }

    pub fn facade(&self) -> &HostFacade {
        &self.facade
    }

    pub fn source_view_open(&self) -> bool {
        self.source_view.open
    }

    /// `"<title> - <caption>"`, or just the title while the caption is empty.
    pub fn window_caption(&self) -> String {
        let caption = match &self.active {
            Some(ActiveInstance { state: InstanceState::Running(instance), .. }) => instance.caption(),
            Some(ActiveInstance { id, state: InstanceState::Faulted(_) }) => self
                .registry
                .get(*id)
                .map(|d| format!("{} (stopped)", d.type_name()))
                .unwrap_or_default(),
            None => String::new(),
        };
        if caption.is_empty() {
            self.config.title.clone()
        } else {
            format!("{} - {}", self.config.title, caption)
        }
    }

    fn example_area(&self) -> Rect {
        let (w, h) = self.config.example_size;
        Rect::new(sidebar::WIDTH, 0.0, w, h)
    }

    // ── per-frame ─────────────────────────────────────────────────────────

    pub fn set_elapsed(&mut self, millis: u64) {
        self.facade.set_millis(millis);
    }

    /// Replaces the held-button set, e.g. after the window lost focus.
    pub fn sync_held(&mut self, held: &HashSet<Button>) {
        self.facade.set_held(held);
    }

    /// Pointer position in window coordinates.
    pub fn pointer_moved(&mut self, x: f32, y: f32) {
        self.pointer = (x, y);
        self.facade.set_mouse(x - sidebar::WIDTH, y);
    }

    pub fn update(&mut self) {
        let result = match &mut self.active {
            Some(ActiveInstance { state: InstanceState::Running(instance), .. }) => instance.update(&mut self.facade),
            _ => return,
        };
        if let Err(e) = result {
            self.fault("update", e);
        }
    }

    /// Records the frame: the example clipped to its area, then the host UI.
    pub fn draw(&mut self, draw_list: &mut DrawList) {
        let area = self.example_area();
        draw_list.push_clip(area);

        let mut failure = None;
        match &mut self.active {
            Some(ActiveInstance { state: InstanceState::Running(instance), .. }) => {
                let mut painter = Painter::new(draw_list, &self.fonts, self.font, area);
                if let Err(e) = instance.draw(&mut self.facade, &mut painter) {
                    failure = Some(e);
                }
            }
            Some(ActiveInstance { state: InstanceState::Faulted(message), id }) => {
                let name = self.registry.get(*id).map(|d| d.type_name()).unwrap_or("example");
                let mut painter = Painter::new(draw_list, &self.fonts, self.font, area);
                draw_fault_panel(&mut painter, name, message, self.config.font_size);
            }
            None => {}
        }
        if let Some(e) = failure {
            self.fault("draw", e);
        }

        if self.source_view.open {
            let source = self
                .active_id()
                .and_then(|id| self.registry.get(id))
                .and_then(|d| d.factory().source())
                .unwrap_or("");
            let mut painter = Painter::new(draw_list, &self.fonts, self.font, area);
            draw_source_view(&mut painter, source, self.source_view.scroll, self.config.font_size);
        }
        draw_list.pop_clip();

        let bar = Rect::new(0.0, 0.0, sidebar::WIDTH, area.height());
        draw_list.push_clip(bar);
        let active_origin = self.active_id().and_then(|id| self.registry.get(id)).map(|d| d.origin());
        let mut painter = Painter::new(draw_list, &self.fonts, self.font, bar);
        self.sidebar.render(&mut painter, active_origin);
        draw_list.pop_clip();
    }

    // ── input ─────────────────────────────────────────────────────────────

    /// Feeds one engine input event through the host.
    pub fn handle_event(&mut self, event: &InputEvent) {
        match event {
            InputEvent::PointerMoved(p) => self.pointer_moved(p.x, p.y),
            InputEvent::PointerButton(p) => self.pointer_moved(p.x, p.y),
            InputEvent::ModifiersChanged(m) => self.modifiers = *m,
            InputEvent::Text(t) => self.text(&t.text),
            _ => {}
        }
        if let InputEvent::Key { modifiers, .. } = event {
            self.modifiers = *modifiers;
        }

        match event.button_edge() {
            Some((button, ButtonEdge::Down)) => self.button_down(button),
            Some((button, ButtonEdge::Repeat)) => self.button_repeat(button),
            Some((button, ButtonEdge::Up)) => self.button_up(button),
            None => {}
        }
    }

    /// Committed text, delivered to the focused text field.
    pub fn text(&mut self, text: &str) {
        self.facade.route_text(text);
    }

    pub fn button_down(&mut self, button: Button) {
        if self.intercept(button) {
            self.consumed.insert(button);
            return;
        }
        if let Button::Key(key) = button {
            self.facade.route_key(key, self.modifiers);
        }
        self.facade.press(button);

        let result = match &mut self.active {
            Some(ActiveInstance { state: InstanceState::Running(instance), .. }) => {
                instance.button_down(button, &mut self.facade)
            }
            _ => return,
        };
        if let Err(e) = result {
            self.fault("button_down", e);
        }
    }

    /// Key auto-repeat: edits the focused field or scrolls the source view.
    pub fn button_repeat(&mut self, button: Button) {
        let Button::Key(key) = button else { return };
        if self.source_view.open && matches!(key, Key::ArrowUp | Key::ArrowDown) {
            self.scroll_source(key);
        } else {
            self.facade.route_key(key, self.modifiers);
        }
    }

    pub fn button_up(&mut self, button: Button) {
        if self.consumed.remove(&button) {
            return;
        }
        self.facade.release(button);

        let result = match &mut self.active {
            Some(ActiveInstance { state: InstanceState::Running(instance), .. }) => {
                instance.button_up(button, &mut self.facade)
            }
            _ => return,
        };
        if let Err(e) = result {
            self.fault("button_up", e);
        }
    }

    /// Handles reserved buttons. Returns `true` when the press is the host's.
    fn intercept(&mut self, button: Button) -> bool {
        match button {
            Button::Key(Key::Escape) => {
                if self.facade.text_focus().is_some() {
                    self.facade.set_text_focus(None);
                } else {
                    self.facade.request_close();
                }
                true
            }
            Button::Key(Key::E) if self.facade.text_focus().is_none() => {
                self.source_view.open = !self.source_view.open;
                self.source_view.scroll = 0;
                true
            }
            Button::Key(Key::PageUp) => {
                self.step(-1);
                true
            }
            Button::Key(Key::PageDown) => {
                self.step(1);
                true
            }
            Button::Key(key @ (Key::ArrowUp | Key::ArrowDown)) if self.source_view.open => {
                self.scroll_source(key);
                true
            }
            Button::Mouse(MouseButton::Left) if self.pointer.0 < self.sidebar.width() => {
                let (x, y) = self.pointer;
                if self.sidebar.handle_click(x, y) {
                    self.apply_selections();
                }
                true
            }
            _ => false,
        }
    }

    fn apply_selections(&mut self) {
        let pending: Vec<DescriptorId> = self.selections.borrow_mut().drain(..).collect();
        for id in pending {
            if let Err(e) = self.switch_to(id) {
                log::error!("{e}");
            }
        }
    }

    /// Moves `delta` rows through the example list, wrapping around.
    fn step(&mut self, delta: isize) {
        let ids: Vec<DescriptorId> = self.sidebar.ids().collect();
        if ids.is_empty() {
            return;
        }
        let current = self.active_id().and_then(|id| ids.iter().position(|&i| i == id));
        let next = match current {
            Some(pos) => (pos as isize + delta).rem_euclid(ids.len() as isize) as usize,
            None => 0,
        };
        if let Err(e) = self.switch_to(ids[next]) {
            log::error!("{e}");
        }
    }

    fn scroll_source(&mut self, key: Key) {
        let lines = self
            .active_id()
            .and_then(|id| self.registry.get(id))
            .and_then(|d| d.factory().source())
            .map(|s| s.lines().count())
            .unwrap_or(0);
        self.source_view.scroll = match key {
            Key::ArrowUp => self.source_view.scroll.saturating_sub(1),
            _ => (self.source_view.scroll + 1).min(lines.saturating_sub(1)),
        };
    }

    fn fault(&mut self, hook: &str, error: ExampleError) {
        let Some(active) = &mut self.active else { return };
        let name = self.registry.get(active.id).map(|d| d.type_name()).unwrap_or("example");
        log::error!("`{name}` stopped in {hook}: {error}");
        active.state = InstanceState::Faulted(error.to_string());
    }
}

fn draw_fault_panel(painter: &mut Painter<'_>, name: &str, message: &str, size: f32) {
    painter.clear(Color::from_argb(0xff_3c1414));
    let white = Color::WHITE;
    painter.text(&format!("{name} stopped"), Vec2::new(16.0, 16.0), size * 1.5, white);
    let mut y = 16.0 + size * 2.5;
    for line in message.lines() {
        painter.text(line, Vec2::new(16.0, y), size, Color::from_argb(0xff_ffc8c8));
        y += size * 1.3;
    }
    painter.text("pick another example or press Page Up / Page Down", Vec2::new(16.0, y + size), size, white);
}

fn draw_source_view(painter: &mut Painter<'_>, source: &str, scroll: usize, size: f32) {
    painter.clear(Color::from_argb(0xf0_101418));
    let line_height = size * 1.25;
    let visible = (painter.height() / line_height).floor() as usize;
    for (row, line) in source.lines().skip(scroll).take(visible).enumerate() {
        let y = 4.0 + row as f32 * line_height;
        painter.text(&line.replace('\t', "    "), Vec2::new(8.0, y), size, Color::from_argb(0xff_dcdcdc));
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use showbox_engine::input::{KeyState, PointerButtonEvent, MouseButtonState, TextEvent};

    use super::*;
    use crate::example::{ExampleFactory, ExampleOptions};
    use crate::registry::tests::Named;

    type Log = Rc<RefCell<Vec<String>>>;

    /// Example that records every callback it receives.
    struct Tracked {
        tag: String,
        log: Log,
        fail_update: bool,
    }

    impl Drop for Tracked {
        fn drop(&mut self) {
            self.log.borrow_mut().push(format!("drop {}", self.tag));
        }
    }

    impl Example for Tracked {
        fn caption(&self) -> String {
            self.tag.clone()
        }

        fn update(&mut self, _facade: &mut HostFacade) -> Result<(), ExampleError> {
            self.log.borrow_mut().push(format!("update {}", self.tag));
            if self.fail_update {
                return Err(ExampleError::Failed("boom".into()));
            }
            Ok(())
        }

        fn draw(&mut self, _facade: &mut HostFacade, _painter: &mut Painter<'_>) -> Result<(), ExampleError> {
            self.log.borrow_mut().push(format!("draw {}", self.tag));
            Ok(())
        }

        fn button_down(&mut self, id: Button, _facade: &mut HostFacade) -> Result<(), ExampleError> {
            self.log.borrow_mut().push(format!("down {} {:?}", self.tag, id));
            Ok(())
        }

        fn button_up(&mut self, id: Button, _facade: &mut HostFacade) -> Result<(), ExampleError> {
            self.log.borrow_mut().push(format!("up {} {:?}", self.tag, id));
            Ok(())
        }
    }

    struct TrackedFactory {
        name: &'static str,
        log: Log,
        fail_update: bool,
        fail_new: bool,
    }

    impl ExampleFactory for TrackedFactory {
        fn type_name(&self) -> &str {
            self.name
        }

        fn source(&self) -> Option<&str> {
            Some("line one\nline two\nline three")
        }

        fn instantiate(
            &self,
            _width: f32,
            _height: f32,
            _options: &ExampleOptions,
            _facade: &mut HostFacade,
        ) -> Result<Box<dyn Example>, ExampleError> {
            self.log.borrow_mut().push(format!("new {}", self.name));
            if self.fail_new {
                return Err(ExampleError::Failed("no".into()));
            }
            Ok(Box::new(Tracked { tag: self.name.to_string(), log: Rc::clone(&self.log), fail_update: self.fail_update }))
        }
    }

    fn tracked(log: &Log, name: &'static str) -> Rc<TrackedFactory> {
        Rc::new(TrackedFactory { name, log: Rc::clone(log), fail_update: false, fail_new: false })
    }

    /// welcome.demo: Welcome, a.demo: A, b.demo: Broken (fails on update), c.demo: NoStart.
    fn host() -> (Host, Log, Vec<DescriptorId>) {
        let log: Log = Rc::default();
        let mut reg = Registry::new();
        let ids = vec![
            reg.register(tracked(&log, "Welcome"), false, Path::new("/d/welcome.demo")).unwrap(),
            reg.register(tracked(&log, "A"), false, Path::new("/d/a.demo")).unwrap(),
            reg.register(
                Rc::new(TrackedFactory { name: "Broken", log: Rc::clone(&log), fail_update: true, fail_new: false }),
                false,
                Path::new("/d/b.demo"),
            )
            .unwrap(),
            reg.register(
                Rc::new(TrackedFactory { name: "NoStart", log: Rc::clone(&log), fail_update: false, fail_new: true }),
                false,
                Path::new("/d/c.demo"),
            )
            .unwrap(),
        ];
        let host = Host::new(Rc::new(reg), HostConfig::default(), Rc::new(FontSystem::new()), None);
        (host, log, ids)
    }

    fn take(log: &Log) -> Vec<String> {
        log.borrow_mut().drain(..).collect()
    }

    fn frame(host: &mut Host) {
        host.update();
        host.draw(&mut DrawList::new());
    }

    fn key(key: Key, state: KeyState) -> InputEvent {
        InputEvent::Key { key, state, modifiers: Modifiers::default(), code: 0, repeat: false }
    }

    fn click(x: f32, y: f32) -> [InputEvent; 2] {
        let ev = |state| {
            InputEvent::PointerButton(PointerButtonEvent {
                button: MouseButton::Left,
                state,
                x,
                y,
                modifiers: Modifiers::default(),
            })
        };
        [ev(MouseButtonState::Pressed), ev(MouseButtonState::Released)]
    }

    #[test]
    fn starts_idle_then_runs_welcome() {
        let (mut host, log, ids) = host();
        assert_eq!(host.active_id(), None);
        assert_eq!(host.window_caption(), "Showbox");

        host.start().unwrap();
        assert_eq!(host.active_id(), Some(ids[0]));
        assert_eq!(host.window_caption(), "Showbox - Welcome");
        assert_eq!(take(&log), ["new Welcome"]);
    }

    #[test]
    fn start_without_welcome_is_fatal() {
        let mut reg = Registry::new();
        reg.register(Rc::new(Named("A")), false, Path::new("/d/a.demo")).unwrap();
        let mut host = Host::new(Rc::new(reg), HostConfig::default(), Rc::new(FontSystem::new()), None);
        assert!(matches!(host.start(), Err(HostError::Registry(RegistryError::NoInitialExample))));
        assert_eq!(host.active_id(), None);
    }

    #[test]
    fn start_by_name() {
        let (host, _, ids) = host();
        let mut host = Host { config: HostConfig::default().start(Some("a".into())), ..host };
        host.start().unwrap();
        assert_eq!(host.active_id(), Some(ids[1]));
    }

    #[test]
    fn switching_drops_the_old_instance_first() {
        let (mut host, log, ids) = host();
        host.start().unwrap();
        frame(&mut host);
        take(&log);

        host.switch_to(ids[1]).unwrap();
        assert_eq!(take(&log), ["drop Welcome", "new A"]);

        frame(&mut host);
        assert_eq!(take(&log), ["update A", "draw A"]);
        assert_eq!(host.active_id(), Some(ids[1]));
    }

    #[test]
    fn switching_to_the_active_example_restarts_it() {
        let (mut host, log, ids) = host();
        host.start().unwrap();
        take(&log);
        host.switch_to(ids[0]).unwrap();
        assert_eq!(take(&log), ["drop Welcome", "new Welcome"]);
    }

    #[test]
    fn unknown_descriptor_is_a_no_op() {
        let (mut host, log, ids) = host();
        host.start().unwrap();
        take(&log);

        let err = host.switch_to(DescriptorId::from_index(99)).unwrap_err();
        assert!(matches!(err, HostError::UnknownDescriptor(_)));
        assert_eq!(host.active_id(), Some(ids[0]));
        assert!(take(&log).is_empty());
    }

    #[test]
    fn failing_constructor_leaves_a_faulted_entry() {
        let (mut host, log, ids) = host();
        host.start().unwrap();
        let err = host.switch_to(ids[3]).unwrap_err();
        assert!(matches!(err, HostError::Instantiate { .. }));
        assert_eq!(host.active_id(), Some(ids[3]));
        assert!(host.is_faulted());
        assert_eq!(host.window_caption(), "Showbox - NoStart (stopped)");

        take(&log);
        frame(&mut host);
        assert!(take(&log).is_empty());
    }

    #[test]
    fn failing_hook_faults_the_instance() {
        let (mut host, log, ids) = host();
        host.switch_to(ids[2]).unwrap();
        take(&log);

        frame(&mut host);
        assert_eq!(take(&log), ["update Broken", "drop Broken"]);
        assert!(host.is_faulted());

        frame(&mut host);
        host.button_down(Button::Key(Key::Space));
        assert!(take(&log).is_empty());
    }

    #[test]
    fn sidebar_click_switches_examples() {
        let (mut host, log, ids) = host();
        host.start().unwrap();
        take(&log);

        // second row
        for ev in click(20.0, 100.0) {
            host.handle_event(&ev);
        }
        assert_eq!(host.active_id(), Some(ids[1]));
        assert_eq!(take(&log), ["drop Welcome", "new A"]);

        // below the last row
        for ev in click(20.0, 590.0) {
            host.handle_event(&ev);
        }
        assert_eq!(host.active_id(), Some(ids[1]));
        assert!(take(&log).is_empty());
    }

    #[test]
    fn clicks_in_the_example_area_are_forwarded() {
        let (mut host, log, _) = host();
        host.start().unwrap();
        take(&log);

        for ev in click(400.0, 100.0) {
            host.handle_event(&ev);
        }
        assert_eq!(host.facade().mouse_x(), 100.0);
        assert_eq!(take(&log), ["down Welcome Mouse(Left)", "up Welcome Mouse(Left)"]);
    }

    #[test]
    fn page_keys_cycle_through_examples() {
        let (mut host, _, ids) = host();
        host.start().unwrap();

        host.handle_event(&key(Key::PageDown, KeyState::Pressed));
        host.handle_event(&key(Key::PageDown, KeyState::Released));
        assert_eq!(host.active_id(), Some(ids[1]));

        host.handle_event(&key(Key::PageUp, KeyState::Pressed));
        host.handle_event(&key(Key::PageUp, KeyState::Pressed));
        assert_eq!(host.active_id(), Some(ids[3]));
    }

    #[test]
    fn reserved_keys_are_not_forwarded() {
        let (mut host, log, _) = host();
        host.start().unwrap();
        take(&log);

        host.handle_event(&key(Key::E, KeyState::Pressed));
        host.handle_event(&key(Key::E, KeyState::Released));
        assert!(host.source_view_open());
        host.handle_event(&key(Key::ArrowDown, KeyState::Pressed));
        host.handle_event(&key(Key::ArrowDown, KeyState::Released));
        assert!(take(&log).is_empty());

        host.handle_event(&key(Key::Space, KeyState::Pressed));
        assert_eq!(take(&log), ["down Welcome Key(Space)"]);

        host.handle_event(&key(Key::Escape, KeyState::Pressed));
        assert!(host.close_requested());
        assert!(take(&log).is_empty());
    }

    #[test]
    fn escape_clears_text_focus_before_closing() {
        let (mut host, log, _) = host();
        host.start().unwrap();
        let field = host.facade.create_text_input("", None);
        host.facade.set_text_focus(Some(field));

        host.handle_event(&InputEvent::Text(TextEvent { text: "e".into() }));
        // with a focused field, E is ordinary input
        host.handle_event(&key(Key::E, KeyState::Pressed));
        assert!(!host.source_view_open());
        assert_eq!(host.facade().text_input(field).unwrap().text(), "e");
        assert!(take(&log).contains(&"down Welcome Key(E)".to_string()));

        host.handle_event(&key(Key::Escape, KeyState::Pressed));
        assert_eq!(host.facade().text_focus(), None);
        assert!(!host.close_requested());
    }

    #[test]
    fn switching_resets_text_fields() {
        let (mut host, _, ids) = host();
        host.start().unwrap();
        let field = host.facade.create_text_input("x", None);
        host.facade.set_text_focus(Some(field));
        host.switch_to(ids[1]).unwrap();
        assert_eq!(host.facade().text_focus(), None);
        assert!(host.facade().text_input(field).is_none());
    }
}
