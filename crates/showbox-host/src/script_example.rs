//! Bridge from `.demo` script declarations to the host's example traits.

use std::rc::Rc;

use showbox_engine::coords::{Rect, Vec2};
use showbox_engine::input::Button;
use showbox_engine::paint::Color;
use showbox_script::{ExampleDecl, Hook, Instance, Module, Natives, Value};

use crate::buttons::{button_from_name, button_name};
use crate::example::{Example, ExampleError, ExampleFactory, ExampleOptions};
use crate::facade::{HostFacade, TextInputId};
use crate::painter::Painter;
use crate::text_input::TextInput;

/// Registry entry for one `example` or `feature` declaration.
///
/// Holds the module the declaration came from, so the file's constants and
/// functions stay alive (and private to it) for every instance.
pub struct ScriptExampleFactory {
    module: Rc<Module>,
    decl: Rc<ExampleDecl>,
    source: Rc<str>,
}

impl ScriptExampleFactory {
    pub fn new(module: Rc<Module>, decl: Rc<ExampleDecl>, source: Rc<str>) -> Self {
        Self { module, decl, source }
    }
}

impl ExampleFactory for ScriptExampleFactory {
    fn type_name(&self) -> &str {
        &self.decl.name
    }

    fn declared_caption(&self) -> &str {
        self.decl.caption.as_deref().unwrap_or("")
    }

    fn source(&self) -> Option<&str> {
        Some(&self.source)
    }

    fn instantiate(
        &self,
        width: f32,
        height: f32,
        options: &ExampleOptions,
        facade: &mut HostFacade,
    ) -> Result<Box<dyn Example>, ExampleError> {
        let fields = [
            ("width", Value::Num(width as f64)),
            ("height", Value::Num(height as f64)),
            ("fullscreen", Value::Bool(options.fullscreen)),
        ];
        let mut natives = ScriptNatives { facade, painter: None };
        let instance =
            Instance::with_fields(Rc::clone(&self.module), Rc::clone(&self.decl), fields, &mut natives)?;
        Ok(Box::new(ScriptExample { instance }))
    }
}

struct ScriptExample {
    instance: Instance,
}

impl ScriptExample {
    fn run(
        &mut self,
        hook: Hook,
        arg: Option<Value>,
        facade: &mut HostFacade,
        painter: Option<&mut Painter<'_>>,
    ) -> Result<(), ExampleError> {
        let mut natives = ScriptNatives { facade, painter };
        self.instance.run_hook(hook, arg, &mut natives)?;
        Ok(())
    }
}

fn button_value(id: Button) -> Value {
    button_name(id).map(Value::str).unwrap_or_default()
}

impl Example for ScriptExample {
    fn caption(&self) -> String {
        self.instance.caption()
    }

    fn update(&mut self, facade: &mut HostFacade) -> Result<(), ExampleError> {
        self.run(Hook::Update, None, facade, None)
    }

    fn draw(&mut self, facade: &mut HostFacade, painter: &mut Painter<'_>) -> Result<(), ExampleError> {
        self.run(Hook::Draw, None, facade, Some(painter))
    }

    fn button_down(&mut self, id: Button, facade: &mut HostFacade) -> Result<(), ExampleError> {
        self.run(Hook::ButtonDown, Some(button_value(id)), facade, None)
    }

    fn button_up(&mut self, id: Button, facade: &mut HostFacade) -> Result<(), ExampleError> {
        self.run(Hook::ButtonUp, Some(button_value(id)), facade, None)
    }
}

// ── natives ───────────────────────────────────────────────────────────────

/// Host functions visible to scripts. `painter` is only present during `on draw`.
struct ScriptNatives<'a, 'p> {
    facade: &'a mut HostFacade,
    painter: Option<&'a mut Painter<'p>>,
}

type NativeResult = Result<Value, String>;

impl Natives for ScriptNatives<'_, '_> {
    fn call(&mut self, name: &str, args: &[Value]) -> Option<NativeResult> {
        let result = match name {
            "rect" | "circle" | "text" | "clear" => self.draw(name, args),
            "text_width" => arity(name, args, 2).and_then(|_| {
                let size = arg_num(name, args, 1)?;
                Ok(Value::Num(self.facade.text_width(&args[0].to_text()?, size as f32) as f64))
            }),
            "mouse_x" => arity(name, args, 0).map(|_| Value::Num(self.facade.mouse_x() as f64)),
            "mouse_y" => arity(name, args, 0).map(|_| Value::Num(self.facade.mouse_y() as f64)),
            "is_down" => arity(name, args, 1).and_then(|_| {
                let button = arg_button(name, args, 0)?;
                Ok(Value::Bool(self.facade.is_down(button)))
            }),
            "milliseconds" => {
                arity(name, args, 0).map(|_| Value::Num(self.facade.milliseconds() as f64))
            }
            "random" => arity(name, args, 2).and_then(|_| {
                let (lo, hi) = (arg_num(name, args, 0)?, arg_num(name, args, 1)?);
                Ok(Value::Num(self.facade.random(lo, hi)))
            }),
            "close" => arity(name, args, 0).map(|_| {
                self.facade.request_close();
                Value::None
            }),
            _ => return self.text_field(name, args),
        };
        Some(result)
    }
}

impl ScriptNatives<'_, '_> {
    fn draw(&mut self, name: &str, args: &[Value]) -> NativeResult {
        let Some(painter) = self.painter.as_deref_mut() else {
            return Err(format!("{}() can only be called from `on draw`", name));
        };
        match name {
            "rect" => {
                arity(name, args, 5)?;
                let r = Rect::new(
                    arg_num(name, args, 0)? as f32,
                    arg_num(name, args, 1)? as f32,
                    arg_num(name, args, 2)? as f32,
                    arg_num(name, args, 3)? as f32,
                );
                painter.fill_rect(r, arg_color(name, args, 4)?);
            }
            "circle" => {
                arity(name, args, 4)?;
                let center = Vec2::new(arg_num(name, args, 0)? as f32, arg_num(name, args, 1)? as f32);
                painter.fill_circle(center, arg_num(name, args, 2)? as f32, arg_color(name, args, 3)?);
            }
            "text" => {
                arity(name, args, 5)?;
                let pos = Vec2::new(arg_num(name, args, 1)? as f32, arg_num(name, args, 2)? as f32);
                let size = arg_num(name, args, 3)? as f32;
                painter.text(&args[0].to_text()?, pos, size, arg_color(name, args, 4)?);
            }
            _ => {
                arity(name, args, 1)?;
                painter.clear(arg_color(name, args, 0)?);
            }
        }
        Ok(Value::None)
    }

    fn text_field(&mut self, name: &str, args: &[Value]) -> Option<NativeResult> {
        let result = match name {
            "text_field" => {
                if args.is_empty() || args.len() > 2 {
                    Err(format!("text_field() takes 1 or 2 argument(s), got {}", args.len()))
                } else {
                    let max = match args.get(1) {
                        None | Some(Value::None) => Ok(None),
                        Some(_) => arg_num(name, args, 1).map(|n| Some(n.max(0.0) as usize)),
                    };
                    max.and_then(|max| {
                        let id = self.facade.create_text_input(args[0].to_text()?, max);
                        Ok(Value::Handle(id.index() as u64))
                    })
                }
            }
            "field_text" => arity(name, args, 1)
                .and_then(|_| self.field(name, args, 0))
                .and_then(|id| self.with_field(id, |f| Value::str(f.text()))),
            "field_caret" => arity(name, args, 1)
                .and_then(|_| self.field(name, args, 0))
                .and_then(|id| self.with_field(id, |f| Value::Num(f.caret() as f64))),
            "field_anchor" => arity(name, args, 1)
                .and_then(|_| self.field(name, args, 0))
                .and_then(|id| self.with_field(id, |f| Value::Num(f.anchor() as f64))),
            "set_field_text" => arity(name, args, 2)
                .and_then(|_| self.field(name, args, 0))
                .and_then(|id| {
                    let text = args[1].to_text()?;
                    self.with_field_mut(id, |f| f.set_text(text))
                }),
            "set_field_caret" => {
                if args.len() < 2 || args.len() > 3 {
                    Err(format!("set_field_caret() takes 2 or 3 argument(s), got {}", args.len()))
                } else {
                    self.field(name, args, 0).and_then(|id| {
                        let pos = arg_num(name, args, 1)?.max(0.0) as usize;
                        let select = args.get(2).is_some_and(Value::is_truthy);
                        self.with_field_mut(id, |f| f.set_caret(pos, select))
                    })
                }
            }
            "focus" => arity(name, args, 1).and_then(|_| match &args[0] {
                Value::None => {
                    self.facade.set_text_focus(None);
                    Ok(Value::None)
                }
                _ => self.field(name, args, 0).map(|id| {
                    self.facade.set_text_focus(Some(id));
                    Value::None
                }),
            }),
            "focused" => arity(name, args, 0).map(|_| match self.facade.text_focus() {
                Some(id) => Value::Handle(id.index() as u64),
                None => Value::None,
            }),
            _ => return None,
        };
        Some(result)
    }

    fn field(&self, name: &str, args: &[Value], i: usize) -> Result<TextInputId, String> {
        match args.get(i) {
            Some(Value::Handle(h)) => {
                let id = TextInputId::from_index(*h as usize);
                match self.facade.text_input(id) {
                    Some(_) => Ok(id),
                    None => Err(format!("{}(): text field {} no longer exists", name, h)),
                }
            }
            Some(other) => Err(format!("{}() expects a text field, got {}", name, other.type_name())),
            None => Err(format!("{}() is missing argument {}", name, i + 1)),
        }
    }

    fn with_field(&self, id: TextInputId, f: impl FnOnce(&TextInput) -> Value) -> NativeResult {
        self.facade.text_input(id).map(f).ok_or_else(|| "text field no longer exists".to_string())
    }

    fn with_field_mut(&mut self, id: TextInputId, f: impl FnOnce(&mut TextInput)) -> NativeResult {
        let field = self
            .facade
            .text_input_mut(id)
            .ok_or_else(|| "text field no longer exists".to_string())?;
        f(field);
        Ok(Value::None)
    }
}

// ── argument helpers ──────────────────────────────────────────────────────

fn arity(name: &str, args: &[Value], n: usize) -> Result<(), String> {
    if args.len() == n {
        Ok(())
    } else {
        Err(format!("{}() takes {} argument(s), got {}", name, n, args.len()))
    }
}

fn arg_num(name: &str, args: &[Value], i: usize) -> Result<f64, String> {
    match args.get(i) {
        Some(Value::Num(n)) => Ok(*n),
        Some(other) => Err(format!(
            "{}() expects a number as argument {}, got {}",
            name,
            i + 1,
            other.type_name()
        )),
        None => Err(format!("{}() is missing argument {}", name, i + 1)),
    }
}

fn arg_color(name: &str, args: &[Value], i: usize) -> Result<Color, String> {
    match args.get(i) {
        Some(Value::Color([r, g, b, a])) => Ok(Color::from_srgb_u8(*r, *g, *b, *a)),
        Some(other) => Err(format!(
            "{}() expects a color as argument {}, got {}",
            name,
            i + 1,
            other.type_name()
        )),
        None => Err(format!("{}() is missing argument {}", name, i + 1)),
    }
}

fn arg_button(name: &str, args: &[Value], i: usize) -> Result<Button, String> {
    match args.get(i) {
        Some(Value::Str(s)) => button_from_name(s).ok_or_else(|| format!("{}(): unknown button \"{}\"", name, s)),
        Some(other) => Err(format!(
            "{}() expects a button name as argument {}, got {}",
            name,
            i + 1,
            other.type_name()
        )),
        None => Err(format!("{}() is missing argument {}", name, i + 1)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use showbox_engine::input::Key;
    use showbox_engine::scene::{DrawCmd, DrawList};
    use showbox_engine::text::FontSystem;
    use showbox_script::load_module;

    fn factory(src: &str) -> ScriptExampleFactory {
        let module = load_module(src).unwrap();
        let decl = Rc::clone(&module.examples()[0]);
        ScriptExampleFactory::new(module, decl, Rc::from(src))
    }

    fn facade() -> HostFacade {
        HostFacade::new(Rc::new(FontSystem::new()), None)
    }

    #[test]
    fn factory_reports_declaration() {
        let f = factory(r#"feature Shapes "Shapes demo" { }"#);
        assert_eq!(f.type_name(), "Shapes");
        assert_eq!(f.declared_caption(), "Shapes demo");
        assert!(f.source().unwrap().contains("feature Shapes"));
    }

    #[test]
    fn options_and_size_are_fields() {
        let src = r#"example Opts { on init { caption = str(fullscreen) + " " + width + "x" + height } }"#;
        let mut facade = facade();
        let options = ExampleOptions { fullscreen: true };
        let ex = factory(src).instantiate(600.0, 400.0, &options, &mut facade).unwrap();
        assert_eq!(ex.caption(), "true 600x400");

        let ex = factory(src).instantiate(600.0, 400.0, &ExampleOptions::default(), &mut facade).unwrap();
        assert_eq!(ex.caption(), "false 600x400");
    }

    #[test]
    fn hooks_see_buttons_by_name() {
        let src = r#"
            example Keys {
                var last = none
                on button_down(id) { last = id  caption = "down " + id }
                on button_up(id) { caption = "up " + str(id) }
            }
        "#;
        let mut facade = facade();
        let mut ex = factory(src).instantiate(600.0, 600.0, &ExampleOptions::default(), &mut facade).unwrap();
        ex.button_down(Button::Key(Key::Space), &mut facade).unwrap();
        assert_eq!(ex.caption(), "down space");
        ex.button_up(Button::Key(Key::Unknown(3)), &mut facade).unwrap();
        assert_eq!(ex.caption(), "up none");
    }

    #[test]
    fn draw_natives_record_commands() {
        let src = r#"
            example Art {
                on draw {
                    clear(#000000)
                    rect(10, 10, 20, 20, #ff0000)
                    circle(width / 2, height / 2, 5, rgb(0, 255, 0))
                }
            }
        "#;
        let mut facade = facade();
        let mut ex = factory(src).instantiate(100.0, 50.0, &ExampleOptions::default(), &mut facade).unwrap();

        let mut list = DrawList::new();
        let fonts = FontSystem::new();
        let mut painter = Painter::new(&mut list, &fonts, None, Rect::new(300.0, 0.0, 100.0, 50.0));
        ex.draw(&mut facade, &mut painter).unwrap();

        let items = list.items();
        assert_eq!(items.len(), 3);
        match &items[2].cmd {
            DrawCmd::Circle(c) => assert_eq!(c.center, Vec2::new(350.0, 25.0)),
            other => panic!("expected circle, got {other:?}"),
        }
    }

    #[test]
    fn drawing_outside_draw_is_an_error() {
        let src = "example Bad { on update { rect(0, 0, 1, 1, #ffffff) } }";
        let mut facade = facade();
        let mut ex = factory(src).instantiate(10.0, 10.0, &ExampleOptions::default(), &mut facade).unwrap();
        let err = ex.update(&mut facade).unwrap_err();
        assert!(err.to_string().contains("on draw"), "{err}");
    }

    #[test]
    fn text_fields_and_focus() {
        let src = r#"
            example Form {
                var name = none
                on init {
                    name = text_field("abc", 5)
                    focus(name)
                }
                on update {
                    set_field_caret(name, 1, false)
                    caption = field_text(name) + " " + str(field_caret(name))
                }
            }
        "#;
        let mut facade = facade();
        let mut ex = factory(src).instantiate(10.0, 10.0, &ExampleOptions::default(), &mut facade).unwrap();
        let focused = facade.text_focus().unwrap();

        assert!(facade.route_text("xyz"));
        assert_eq!(facade.text_input(focused).unwrap().text(), "abcxy");

        ex.update(&mut facade).unwrap();
        assert_eq!(ex.caption(), "abcxy 1");
    }

    #[test]
    fn input_natives_read_the_facade() {
        let src = r#"
            example Probe {
                on update {
                    if is_down("mouse_left") and mouse_x() == 12 { close() }
                }
            }
        "#;
        let mut facade = facade();
        let mut ex = factory(src).instantiate(10.0, 10.0, &ExampleOptions::default(), &mut facade).unwrap();
        facade.set_mouse(12.0, 3.0);
        ex.update(&mut facade).unwrap();
        assert!(!facade.close_requested());

        facade.press(Button::Mouse(showbox_engine::input::MouseButton::Left));
        ex.update(&mut facade).unwrap();
        assert!(facade.close_requested());
    }

    #[test]
    fn unknown_button_name_is_an_error() {
        let src = r#"example E { on update { is_down("hyper") } }"#;
        let mut facade = facade();
        let mut ex = factory(src).instantiate(10.0, 10.0, &ExampleOptions::default(), &mut facade).unwrap();
        assert!(ex.update(&mut facade).is_err());
    }
}
