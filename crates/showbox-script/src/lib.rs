//! Lexer, parser, and interpreter for **Showbox demo scripts** (`.demo`).
//!
//! A demo file declares one or more `example` (or `feature`) types together
//! with file-scoped constants and helper functions. Loading a file yields a
//! [`Module`] that owns everything the file declared; nothing leaks between
//! modules, so independently written demos may reuse the same names.
//!
//! # Structure
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`ast`] | `Script`, `ExampleDecl`, `Hook`, statements and expressions |
//! | [`builtins`] | pure functions (`sqrt`, `len`, `rgb`, ...) |
//! | [`error`] | `ScriptError`, `Pos` |
//! | [`interp`] | `Module`, `Instance`, the `Natives` host seam |
//! | [`lexer`] | `Lexer`, `Token` |
//! | [`parser`] | `parse_str` entry point |
//! | [`value`] | `Value` |
//!
//! # Quick start
//!
//! ```rust
//! use showbox_script::{load_module, Instance, NoNatives};
//! use std::rc::Rc;
//!
//! let src = r#"
//!     example Counter "Counter" {
//!         var n = 0
//!         on update { n = n + 1 }
//!     }
//! "#;
//!
//! let module = load_module(src).unwrap();
//! let decl = Rc::clone(&module.examples()[0]);
//! let mut counter = Instance::new(module, decl, 640.0, 480.0, &mut NoNatives).unwrap();
//! counter.run_hook(showbox_script::Hook::Update, None, &mut NoNatives).unwrap();
//! assert_eq!(counter.caption(), "Counter");
//! ```

pub mod ast;
pub mod builtins;
pub mod error;
pub mod interp;
pub mod lexer;
pub mod parser;
pub mod value;

pub use ast::{ExampleDecl, Hook};
pub use error::{ErrorKind, Pos, ScriptError};
pub use interp::{Instance, Module, Natives, NoNatives, load_module};
pub use parser::parse_str;
pub use value::Value;

#[cfg(test)]
mod parse_tests {
    use super::*;

    fn ok(src: &str) { parse_str(src).unwrap(); }
    fn err(src: &str) { parse_str(src).unwrap_err(); }

    #[test] fn empty_file() { ok(""); }
    #[test] fn empty_example() { ok("example Blank { }"); }
    #[test] fn feature_with_caption() { ok(r#"feature Shapes "Shapes" { }"#); }
    #[test] fn constants_and_functions() {
        ok("let SPEED = 4.5;  fn lerp(a, b, t) { return a + (b - a) * t }");
    }
    #[test] fn all_hooks() {
        ok("example A { on init { } on update { } on draw { } on button_down(id) { } on button_up(id) { } }");
    }
    #[test] fn methods_and_vars() {
        ok("example A { var x = 1  var xs = [1, 2, 3,]  fn step(d) { x = x + d } }");
    }
    #[test] fn else_if_chain() {
        ok("fn f(x) { if x < 0 { return -1 } else if x == 0 { return 0 } else { return 1 } }");
    }
    #[test] fn loops() { ok("fn f(xs) { for x in xs { } while not false { return } }"); }
    #[test] fn index_assignment() { ok("fn f(xs) { xs[0] = xs[1] * 2 }"); }
    #[test] fn colors() { ok("let BG = #1565e5  let FG = #ffffff80"); }
    #[test] fn comments() { ok("// line\n/* block */ example A { /* inside */ }"); }

    #[test] fn statement_at_file_scope() { err("x = 1"); }
    #[test] fn unknown_hook() { err("example A { on tick { } }"); }
    #[test] fn parameter_on_update() { err("example A { on update(x) { } }"); }
    #[test] fn duplicate_hook() { err("example A { on draw { } on draw { } }"); }
    #[test] fn duplicate_field() { err("example A { var x = 1 var x = 2 }"); }
    #[test] fn assign_to_call() { err("fn f() { g() = 1 }"); }
    #[test] fn call_non_name() { err("fn f() { [g](1) }"); }
    #[test] fn unclosed_example() { err("example A { var x = 1"); }
    #[test] fn duplicate_param() { err("fn f(a, a) { }"); }

    #[test]
    fn deep_nesting_is_a_parse_error() {
        let n = 200_000;
        let parens = format!("let X = {}1{}", "(".repeat(n), ")".repeat(n));
        let e = parse_str(&parens).unwrap_err();
        assert_eq!(e.kind, ErrorKind::Parse);
        assert!(e.message.contains("nested too deeply"), "{e}");

        err(&format!("let X = {}1", "-".repeat(n)));
        err(&format!("let X = {}1{}", "[".repeat(n), "]".repeat(n)));
        err(&format!("fn f() {}{}", "{ if true ".repeat(n), "}".repeat(n + 1)));
        err(&format!("fn f() {{ if a {{ }}{} }}", " else if a { }".repeat(n)));
    }

    #[test]
    fn long_operator_chains_count_towards_nesting() {
        err(&format!("let X = 1{}", " + 1".repeat(10_000)));
        err(&format!("fn f(xs) {{ return xs{} }}", "[0]".repeat(10_000)));
        ok(&format!("let X = 1{}", " + 1".repeat(20)));
        ok(&format!("let X = {}1{}", "(".repeat(20), ")".repeat(20)));
    }

    #[test]
    fn precedence() {
        use ast::{BinOp, ExprKind, Item};
        let script = parse_str("let X = 1 + 2 * 3").unwrap();
        let Item::Const { value, .. } = &script.items[0] else { panic!("expected const") };
        let ExprKind::Binary(BinOp::Add, _, rhs) = &value.kind else { panic!("expected add") };
        assert!(matches!(rhs.kind, ExprKind::Binary(BinOp::Mul, _, _)));
    }

    #[test]
    fn error_position() {
        let e = parse_str("example A {\n  bogus\n}").unwrap_err();
        assert_eq!((e.line, e.col), (2, 3));
    }
}
