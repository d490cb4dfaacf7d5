use std::collections::HashMap;
use std::rc::Rc;

use crate::ast::{
    BinOp, ExampleDecl, Expr, ExprKind, FnDecl, Hook, Item, Script, Stmt, StmtKind, UnaryOp,
};
use crate::builtins::{self, to_index};
use crate::error::{Pos, ScriptError};
use crate::parser::parse_str;
use crate::value::{Value, check_list_len, concat};

/// Statements and loop iterations one hook invocation may execute.
pub const STEP_LIMIT: u64 = 1_000_000;
/// Maximum nesting of script function calls.
pub const CALL_DEPTH_LIMIT: usize = 64;

// ── Natives ───────────────────────────────────────────────────────────────

/// Functions the embedding host provides (drawing, input, text fields).
///
/// Resolution order for a call is: example methods, module functions, natives,
/// then the pure builtins, so a script may shadow any host function.
pub trait Natives {
    /// Returns `None` when `name` is not a host function.
    fn call(&mut self, name: &str, args: &[Value]) -> Option<Result<Value, String>>;
}

/// A host with no functions. Used while evaluating module constants.
pub struct NoNatives;

impl Natives for NoNatives {
    fn call(&mut self, _name: &str, _args: &[Value]) -> Option<Result<Value, String>> {
        None
    }
}

// ── Module ────────────────────────────────────────────────────────────────

/// The evaluated contents of one script file.
///
/// Every file gets its own `Module`, so two files may both declare
/// `example Player` or `let SPEED` without seeing each other.
#[derive(Debug, Default)]
pub struct Module {
    consts: HashMap<String, Value>,
    functions: HashMap<String, Rc<FnDecl>>,
    examples: Vec<Rc<ExampleDecl>>,
}

/// Parse and evaluate a `.demo` source string into a fresh [`Module`].
pub fn load_module(src: &str) -> Result<Rc<Module>, ScriptError> {
    Module::from_script(parse_str(src)?)
}

impl Module {
    pub fn from_script(script: Script) -> Result<Rc<Module>, ScriptError> {
        let mut module = Module::default();
        let mut seen: HashMap<String, Pos> = HashMap::new();
        let mut consts = Vec::new();

        for item in script.items {
            let (name, pos) = match &item {
                Item::Const { name, pos, .. } => (name.clone(), *pos),
                Item::Function(f) => (f.name.clone(), f.pos),
                Item::Example(e) => (e.name.clone(), e.pos),
            };
            if let Some(first) = seen.insert(name.clone(), pos) {
                return Err(ScriptError::runtime(
                    format!("`{}` is already defined at line {}", name, first.line),
                    pos,
                ));
            }
            match item {
                Item::Const { name, value, .. } => consts.push((name, value)),
                Item::Function(f) => {
                    module.functions.insert(f.name.clone(), f);
                }
                Item::Example(e) => module.examples.push(e),
            }
        }

        // Functions are visible from every constant; constants only from later ones.
        for (name, expr) in consts {
            let value = {
                let mut natives = NoNatives;
                let mut interp = Interp::new(&module, None, None, &mut natives);
                interp.eval(&expr)?
            };
            module.consts.insert(name, value);
        }

        Ok(Rc::new(module))
    }

    /// Example and feature declarations, in declaration order.
    pub fn examples(&self) -> &[Rc<ExampleDecl>] {
        &self.examples
    }

    pub fn constant(&self, name: &str) -> Option<&Value> {
        self.consts.get(name)
    }

    /// Call a module-level function by name.
    pub fn call_function(
        &self,
        name: &str,
        args: Vec<Value>,
        natives: &mut dyn Natives,
    ) -> Result<Value, ScriptError> {
        let mut interp = Interp::new(self, None, None, natives);
        interp.call(name, args, Pos::new(1, 1))
    }
}

// ── Instance ──────────────────────────────────────────────────────────────

/// A live example: its declaration plus the current field values.
#[derive(Debug)]
pub struct Instance {
    module: Rc<Module>,
    decl: Rc<ExampleDecl>,
    fields: HashMap<String, Value>,
}

impl Instance {
    /// Builds the field set (`width`, `height`, `caption`, then each `var` in
    /// order) and runs the `init` hook.
    pub fn new(
        module: Rc<Module>,
        decl: Rc<ExampleDecl>,
        width: f64,
        height: f64,
        natives: &mut dyn Natives,
    ) -> Result<Instance, ScriptError> {
        let size = [("width", Value::Num(width)), ("height", Value::Num(height))];
        Self::with_fields(module, decl, size, natives)
    }

    /// Like [`new`](Self::new), with host-provided fields in place of the size.
    /// They are set before `caption` and the `var`s, so a `var` of the same name wins.
    pub fn with_fields<'n>(
        module: Rc<Module>,
        decl: Rc<ExampleDecl>,
        fields: impl IntoIterator<Item = (&'n str, Value)>,
        natives: &mut dyn Natives,
    ) -> Result<Instance, ScriptError> {
        let mut instance = Instance { module, decl: Rc::clone(&decl), fields: HashMap::new() };
        for (name, value) in fields {
            instance.fields.insert(name.to_string(), value);
        }
        instance
            .fields
            .insert("caption".into(), Value::str(decl.caption.clone().unwrap_or_default()));

        for (name, expr) in &decl.vars {
            let value = {
                let mut interp =
                    Interp::new(&instance.module, Some(&*decl), Some(&mut instance.fields), natives);
                interp.eval(expr)?
            };
            instance.fields.insert(name.clone(), value);
        }

        instance.run_hook(Hook::Init, None, natives)?;
        Ok(instance)
    }

    pub fn field(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    /// The current value of the `caption` field as text.
    pub fn caption(&self) -> String {
        match self.fields.get("caption") {
            None | Some(Value::None) => String::new(),
            Some(Value::Str(s)) => s.clone(),
            Some(other) => other.to_text().unwrap_or_default(),
        }
    }

    pub fn has_hook(&self, hook: Hook) -> bool {
        self.decl.hook(hook).is_some()
    }

    /// Runs `hook` if the example declares it. `arg` binds the hook's parameter.
    pub fn run_hook(
        &mut self,
        hook: Hook,
        arg: Option<Value>,
        natives: &mut dyn Natives,
    ) -> Result<(), ScriptError> {
        let Some(decl) = self.decl.hook(hook) else {
            return Ok(());
        };
        let mut scope = HashMap::new();
        if let (Some(param), Some(arg)) = (&decl.param, arg) {
            scope.insert(param.clone(), arg);
        }
        let mut interp = Interp::new(&self.module, Some(&*self.decl), Some(&mut self.fields), natives);
        interp.scopes.push(scope);
        interp.exec_block(&decl.body)?;
        Ok(())
    }
}

// ── Interpreter ───────────────────────────────────────────────────────────

enum Flow {
    Next,
    Return(Value),
}

struct Interp<'a> {
    module: &'a Module,
    example: Option<&'a ExampleDecl>,
    fields: Option<&'a mut HashMap<String, Value>>,
    natives: &'a mut dyn Natives,
    scopes: Vec<HashMap<String, Value>>,
    steps: u64,
    depth: usize,
}

impl<'a> Interp<'a> {
    fn new(
        module: &'a Module,
        example: Option<&'a ExampleDecl>,
        fields: Option<&'a mut HashMap<String, Value>>,
        natives: &'a mut dyn Natives,
    ) -> Self {
        Self { module, example, fields, natives, scopes: Vec::new(), steps: 0, depth: 0 }
    }

    fn tick(&mut self, pos: Pos) -> Result<(), ScriptError> {
        self.steps += 1;
        if self.steps > STEP_LIMIT {
            return Err(ScriptError::runtime(
                format!("step limit of {} exceeded (infinite loop?)", STEP_LIMIT),
                pos,
            ));
        }
        Ok(())
    }

    // ── Statements ────────────────────────────────────────────────────────

    fn exec_block(&mut self, stmts: &[Stmt]) -> Result<Flow, ScriptError> {
        self.scopes.push(HashMap::new());
        let mut flow = Flow::Next;
        for stmt in stmts {
            match self.exec(stmt) {
                Ok(Flow::Next) => {}
                Ok(ret) => {
                    flow = ret;
                    break;
                }
                Err(err) => {
                    self.scopes.pop();
                    return Err(err);
                }
            }
        }
        self.scopes.pop();
        Ok(flow)
    }

    fn exec(&mut self, stmt: &Stmt) -> Result<Flow, ScriptError> {
        self.tick(stmt.pos)?;
        match &stmt.kind {
            StmtKind::Let(name, expr) => {
                let value = self.eval(expr)?;
                match self.scopes.last_mut() {
                    Some(scope) => {
                        scope.insert(name.clone(), value);
                    }
                    None => self.scopes.push(HashMap::from([(name.clone(), value)])),
                }
            }
            StmtKind::Assign(target, expr) => {
                let value = self.eval(expr)?;
                self.assign(target, value)?;
            }
            StmtKind::If { cond, then, otherwise } => {
                let branch = if self.eval(cond)?.is_truthy() { then } else { otherwise };
                return self.exec_block(branch);
            }
            StmtKind::While { cond, body } => {
                while self.eval(cond)?.is_truthy() {
                    self.tick(stmt.pos)?;
                    if let Flow::Return(v) = self.exec_block(body)? {
                        return Ok(Flow::Return(v));
                    }
                }
            }
            StmtKind::For { var, iter, body } => {
                let items: Vec<Value> = match self.eval(iter)? {
                    Value::List(items) => items.borrow().clone(),
                    Value::Str(s) => s.chars().map(|c| Value::Str(c.to_string())).collect(),
                    other => {
                        return Err(ScriptError::runtime(
                            format!("cannot iterate over {}", other.type_name()),
                            iter.pos,
                        ));
                    }
                };
                for item in items {
                    self.tick(stmt.pos)?;
                    self.scopes.push(HashMap::from([(var.clone(), item)]));
                    let flow = self.exec_block(body);
                    self.scopes.pop();
                    if let Flow::Return(v) = flow? {
                        return Ok(Flow::Return(v));
                    }
                }
            }
            StmtKind::Return(value) => {
                let value = match value {
                    Some(expr) => self.eval(expr)?,
                    None => Value::None,
                };
                return Ok(Flow::Return(value));
            }
            StmtKind::Expr(expr) => {
                self.eval(expr)?;
            }
        }
        Ok(Flow::Next)
    }

    fn assign(&mut self, target: &Expr, value: Value) -> Result<(), ScriptError> {
        match &target.kind {
            ExprKind::Name(name) => {
                for scope in self.scopes.iter_mut().rev() {
                    if let Some(slot) = scope.get_mut(name) {
                        *slot = value;
                        return Ok(());
                    }
                }
                if let Some(slot) = self.fields.as_mut().and_then(|f| f.get_mut(name)) {
                    *slot = value;
                    return Ok(());
                }
                let msg = if self.module.consts.contains_key(name) {
                    format!("cannot assign to constant `{}`", name)
                } else {
                    format!("assignment to undeclared name `{}` (use `let`)", name)
                };
                Err(ScriptError::runtime(msg, target.pos))
            }
            ExprKind::Index(list, index) => {
                let list = self.eval(list)?;
                let index = self.eval(index)?;
                let (Value::List(items), Value::Num(i)) = (&list, &index) else {
                    return Err(ScriptError::runtime(
                        format!("cannot index {} with {}", list.type_name(), index.type_name()),
                        target.pos,
                    ));
                };
                let mut items = items.borrow_mut();
                let len = items.len();
                match to_index(*i, len) {
                    Some(i) => {
                        items[i] = value;
                        Ok(())
                    }
                    None => Err(ScriptError::runtime(
                        format!("index {} out of range for list of length {}", i, len),
                        target.pos,
                    )),
                }
            }
            _ => Err(ScriptError::runtime("invalid assignment target", target.pos)),
        }
    }

    // ── Expressions ───────────────────────────────────────────────────────

    fn eval(&mut self, expr: &Expr) -> Result<Value, ScriptError> {
        match &expr.kind {
            ExprKind::Number(n) => Ok(Value::Num(*n)),
            ExprKind::Str(s) => Ok(Value::Str(s.clone())),
            ExprKind::Color(c) => Ok(Value::Color(*c)),
            ExprKind::Bool(b) => Ok(Value::Bool(*b)),
            ExprKind::None => Ok(Value::None),
            ExprKind::Name(name) => self.lookup(name, expr.pos),
            ExprKind::List(items) => {
                let values = items.iter().map(|e| self.eval(e)).collect::<Result<Vec<_>, _>>()?;
                Ok(Value::list(values))
            }
            ExprKind::Unary(op, operand) => {
                let value = self.eval(operand)?;
                match (op, value) {
                    (UnaryOp::Not, v) => Ok(Value::Bool(!v.is_truthy())),
                    (UnaryOp::Neg, Value::Num(n)) => Ok(Value::Num(-n)),
                    (UnaryOp::Neg, v) => Err(ScriptError::runtime(
                        format!("cannot negate {}", v.type_name()),
                        expr.pos,
                    )),
                }
            }
            ExprKind::Binary(BinOp::And, lhs, rhs) => {
                let ok = self.eval(lhs)?.is_truthy() && self.eval(rhs)?.is_truthy();
                Ok(Value::Bool(ok))
            }
            ExprKind::Binary(BinOp::Or, lhs, rhs) => {
                let ok = self.eval(lhs)?.is_truthy() || self.eval(rhs)?.is_truthy();
                Ok(Value::Bool(ok))
            }
            ExprKind::Binary(op, lhs, rhs) => {
                let lhs = self.eval(lhs)?;
                let rhs = self.eval(rhs)?;
                binary(*op, lhs, rhs).map_err(|msg| ScriptError::runtime(msg, expr.pos))
            }
            ExprKind::Call(name, args) => {
                let args = args.iter().map(|e| self.eval(e)).collect::<Result<Vec<_>, _>>()?;
                self.call(name, args, expr.pos)
            }
            ExprKind::Index(target, index) => {
                let target = self.eval(target)?;
                let index = self.eval(index)?;
                index_value(&target, &index).map_err(|msg| ScriptError::runtime(msg, expr.pos))
            }
        }
    }

    fn lookup(&self, name: &str, pos: Pos) -> Result<Value, ScriptError> {
        for scope in self.scopes.iter().rev() {
            if let Some(v) = scope.get(name) {
                return Ok(v.clone());
            }
        }
        if let Some(v) = self.fields.as_ref().and_then(|f| f.get(name)) {
            return Ok(v.clone());
        }
        if let Some(v) = self.module.consts.get(name) {
            return Ok(v.clone());
        }
        Err(ScriptError::runtime(format!("unknown name `{}`", name), pos))
    }

    fn call(&mut self, name: &str, args: Vec<Value>, pos: Pos) -> Result<Value, ScriptError> {
        if let Some(method) = self.example.and_then(|e| e.method(name)) {
            return self.call_fn(&Rc::clone(method), args, true, pos);
        }
        if let Some(function) = self.module.functions.get(name) {
            return self.call_fn(&Rc::clone(function), args, false, pos);
        }
        if let Some(result) = self.natives.call(name, &args) {
            return result.map_err(|msg| ScriptError::runtime(msg, pos));
        }
        if let Some(result) = builtins::call_builtin(name, &args) {
            return result.map_err(|msg| ScriptError::runtime(msg, pos));
        }
        Err(ScriptError::runtime(format!("unknown function `{}`", name), pos))
    }

    /// Methods keep access to the instance fields; module functions do not.
    fn call_fn(
        &mut self,
        decl: &FnDecl,
        args: Vec<Value>,
        is_method: bool,
        pos: Pos,
    ) -> Result<Value, ScriptError> {
        if args.len() != decl.params.len() {
            return Err(ScriptError::runtime(
                format!("{}() takes {} argument(s), got {}", decl.name, decl.params.len(), args.len()),
                pos,
            ));
        }
        if self.depth >= CALL_DEPTH_LIMIT {
            return Err(ScriptError::runtime("call stack too deep", pos));
        }

        let params: HashMap<String, Value> = decl.params.iter().cloned().zip(args).collect();
        let saved_scopes = std::mem::replace(&mut self.scopes, vec![params]);
        let (saved_fields, saved_example) = if is_method {
            (None, None)
        } else {
            (self.fields.take(), self.example.take())
        };

        self.depth += 1;
        let result = self.exec_block(&decl.body);
        self.depth -= 1;

        self.scopes = saved_scopes;
        if !is_method {
            self.fields = saved_fields;
            self.example = saved_example;
        }

        match result? {
            Flow::Return(v) => Ok(v),
            Flow::Next => Ok(Value::None),
        }
    }
}

fn binary(op: BinOp, lhs: Value, rhs: Value) -> Result<Value, String> {
    use Value::{Bool, List, Num, Str};
    match (op, lhs, rhs) {
        (BinOp::Eq, a, b) => Ok(Bool(a == b)),
        (BinOp::NotEq, a, b) => Ok(Bool(a != b)),
        (BinOp::Add, Num(a), Num(b)) => Ok(Num(a + b)),
        (BinOp::Add, Str(a), b) => concat(&a, &b.to_text()?),
        (BinOp::Add, a, Str(b)) => concat(&a.to_text()?, &b),
        (BinOp::Add, List(a), List(b)) => {
            check_list_len(a.borrow().len() + b.borrow().len())?;
            let mut items = a.borrow().clone();
            items.extend(b.borrow().iter().cloned());
            Ok(Value::list(items))
        }
        (BinOp::Sub, Num(a), Num(b)) => Ok(Num(a - b)),
        (BinOp::Mul, Num(a), Num(b)) => Ok(Num(a * b)),
        (BinOp::Div | BinOp::Rem, Num(_), Num(b)) if b == 0.0 => Err("division by zero".into()),
        (BinOp::Div, Num(a), Num(b)) => Ok(Num(a / b)),
        (BinOp::Rem, Num(a), Num(b)) => Ok(Num(a.rem_euclid(b))),
        (BinOp::Lt, Num(a), Num(b)) => Ok(Bool(a < b)),
        (BinOp::LtEq, Num(a), Num(b)) => Ok(Bool(a <= b)),
        (BinOp::Gt, Num(a), Num(b)) => Ok(Bool(a > b)),
        (BinOp::GtEq, Num(a), Num(b)) => Ok(Bool(a >= b)),
        (BinOp::Lt, Str(a), Str(b)) => Ok(Bool(a < b)),
        (BinOp::LtEq, Str(a), Str(b)) => Ok(Bool(a <= b)),
        (BinOp::Gt, Str(a), Str(b)) => Ok(Bool(a > b)),
        (BinOp::GtEq, Str(a), Str(b)) => Ok(Bool(a >= b)),
        (op, a, b) => Err(format!(
            "unsupported operands for {:?}: {} and {}",
            op,
            a.type_name(),
            b.type_name()
        )),
    }
}

fn index_value(target: &Value, index: &Value) -> Result<Value, String> {
    let (len, i) = match (target, index) {
        (Value::List(items), Value::Num(i)) => (items.borrow().len(), *i),
        (Value::Str(s), Value::Num(i)) => (s.chars().count(), *i),
        _ => {
            return Err(format!(
                "cannot index {} with {}",
                target.type_name(),
                index.type_name()
            ));
        }
    };
    let Some(at) = to_index(i, len) else {
        return Err(format!("index {} out of range for length {}", i, len));
    };
    Ok(match target {
        Value::List(items) => items.borrow()[at].clone(),
        Value::Str(s) => s.chars().nth(at).map(|c| Value::Str(c.to_string())).unwrap_or_default(),
        _ => Value::None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    /// Records every native call and answers `mouse_x()` with 42.
    #[derive(Default)]
    struct Recorder {
        calls: Vec<String>,
    }

    impl Natives for Recorder {
        fn call(&mut self, name: &str, args: &[Value]) -> Option<Result<Value, String>> {
            match name {
                "mouse_x" => Some(Ok(Value::Num(42.0))),
                "rect" | "close" => {
                    let args: Vec<String> = args.iter().map(|a| a.to_string()).collect();
                    self.calls.push(format!("{}({})", name, args.join(",")));
                    Some(Ok(Value::None))
                }
                _ => None,
            }
        }
    }

    fn instance(src: &str) -> (Instance, Recorder) {
        let module = load_module(src).unwrap();
        let decl = Rc::clone(&module.examples()[0]);
        let mut natives = Recorder::default();
        let instance = Instance::new(module, decl, 640.0, 480.0, &mut natives).unwrap();
        (instance, natives)
    }

    #[test]
    fn constants_see_functions_and_earlier_constants() {
        let module = load_module("let A = double(2)  let B = A + 1  fn double(x) { return x * 2 }").unwrap();
        assert_eq!(module.constant("B"), Some(&Value::Num(5.0)));
    }

    #[test]
    fn duplicate_top_level_names_fail() {
        let err = load_module("let Player = 1\nexample Player { }").unwrap_err();
        assert_eq!(err.line, 2);
        assert!(err.message.contains("already defined"));
    }

    #[test]
    fn constants_cannot_use_host_functions() {
        let err = load_module("let X = mouse_x()").unwrap_err();
        assert_eq!(err.kind, ErrorKind::Runtime);
    }

    #[test]
    fn fields_are_initialised_in_order_then_init_runs() {
        let (inst, _) = instance(
            r#"example Demo "Demo!" {
                var half = width / 2
                var count = 0
                on init { count = half + 1 }
            }"#,
        );
        assert_eq!(inst.field("count"), Some(&Value::Num(321.0)));
        assert_eq!(inst.caption(), "Demo!");
    }

    #[test]
    fn caption_field_is_assignable() {
        let (mut inst, mut natives) = instance(
            r#"example Demo { var n = 0  on update { n = n + 1  caption = "frame " + n } }"#,
        );
        assert_eq!(inst.caption(), "");
        inst.run_hook(Hook::Update, None, &mut natives).unwrap();
        inst.run_hook(Hook::Update, None, &mut natives).unwrap();
        assert_eq!(inst.caption(), "frame 2");
    }

    #[test]
    fn hooks_reach_natives_and_bind_the_button() {
        let (mut inst, mut natives) = instance(
            r#"example Demo {
                on draw { rect(mouse_x(), 0, 10, 10, #ff0000) }
                on button_down(id) { if id == "escape" { close() } }
            }"#,
        );
        inst.run_hook(Hook::Draw, None, &mut natives).unwrap();
        inst.run_hook(Hook::ButtonDown, Some(Value::str("a")), &mut natives).unwrap();
        inst.run_hook(Hook::ButtonDown, Some(Value::str("escape")), &mut natives).unwrap();
        assert_eq!(natives.calls, vec!["rect(42,0,10,10,#ff0000ff)", "close()"]);
    }

    #[test]
    fn methods_see_fields_but_module_functions_do_not() {
        let src = r#"
            fn peek() { return score }
            example Demo {
                var score = 3
                fn bump(by) { score = score + by  return score }
                on update { bump(2) }
                on draw { peek() }
            }"#;
        let (mut inst, mut natives) = instance(src);
        inst.run_hook(Hook::Update, None, &mut natives).unwrap();
        assert_eq!(inst.field("score"), Some(&Value::Num(5.0)));
        let err = inst.run_hook(Hook::Draw, None, &mut natives).unwrap_err();
        assert!(err.message.contains("unknown name `score`"));
    }

    #[test]
    fn scripts_may_shadow_host_functions() {
        let (mut inst, mut natives) = instance(
            "fn rect(a, b, c, d, e) { return none }\nexample Demo { on draw { rect(1, 2, 3, 4, 5) } }",
        );
        inst.run_hook(Hook::Draw, None, &mut natives).unwrap();
        assert!(natives.calls.is_empty());
    }

    #[test]
    fn lists_are_shared_and_loops_work() {
        let (inst, _) = instance(
            r#"example Demo {
                var xs = [1, 2, 3]
                var total = 0
                on init {
                    let alias = xs
                    alias[0] = 10
                    for x in xs { total = total + x }
                    let i = 0
                    while i < 3 { i = i + 1 }
                    total = total + i
                }
            }"#,
        );
        assert_eq!(inst.field("total"), Some(&Value::Num(18.0)));
    }

    #[test]
    fn assignment_rules() {
        let module = load_module("let K = 1\nexample A { on update { K = 2 } }\nexample B { on update { nope = 1 } }").unwrap();
        let mut natives = NoNatives;
        for (decl, expected) in module.examples().iter().zip(["constant", "undeclared"]) {
            let mut inst = Instance::new(Rc::clone(&module), Rc::clone(decl), 1.0, 1.0, &mut natives).unwrap();
            let err = inst.run_hook(Hook::Update, None, &mut natives).unwrap_err();
            assert!(err.message.contains(expected), "{}", err);
        }
    }

    #[test]
    fn infinite_loops_hit_the_step_limit() {
        let (mut inst, mut natives) = instance("example Spin { on update { while true { } } }");
        let err = inst.run_hook(Hook::Update, None, &mut natives).unwrap_err();
        assert!(err.message.contains("step limit"));
    }

    #[test]
    fn runaway_recursion_is_bounded() {
        let module = load_module("fn down(n) { return down(n + 1) }").unwrap();
        let err = module.call_function("down", vec![Value::Num(0.0)], &mut NoNatives).unwrap_err();
        assert!(err.message.contains("too deep"));
    }

    #[test]
    fn errors_carry_positions() {
        let (mut inst, mut natives) = instance("example Demo {\n  on update {\n    let x = 1 / 0\n  }\n}");
        let err = inst.run_hook(Hook::Update, None, &mut natives).unwrap_err();
        assert_eq!((err.line, err.message.as_str()), (3, "division by zero"));
    }

    #[test]
    fn string_concatenation_and_indexing() {
        let module = load_module(r#"fn f() { let s = "ab" + 1  return s[2] + len(s) }"#).unwrap();
        assert_eq!(module.call_function("f", vec![], &mut NoNatives).unwrap(), Value::str("13"));
    }

    #[test]
    fn doubling_a_string_hits_the_size_limit() {
        let module = load_module(r#"fn grow() { let s = "x"  for i in range(60) { s = s + s }  return s }"#).unwrap();
        let err = module.call_function("grow", vec![], &mut NoNatives).unwrap_err();
        assert!(err.message.contains("longer than"), "{err}");
    }

    #[test]
    fn oversized_constants_fail_the_load() {
        let err = load_module("let X = range(9007199254740992, 9007199254740994)").unwrap_err();
        assert!(err.message.contains("range()"), "{err}");
        assert!(load_module("let X = range(1e9)").is_err());
    }

    #[test]
    fn missing_hooks_are_no_ops() {
        let (mut inst, mut natives) = instance("example Quiet { }");
        assert!(!inst.has_hook(Hook::Draw));
        inst.run_hook(Hook::Draw, None, &mut natives).unwrap();
    }
}
