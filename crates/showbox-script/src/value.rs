use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// Longest string a script may build, in bytes.
pub const MAX_STRING_LEN: usize = 1 << 20;
/// Most items a single list may hold.
pub const MAX_LIST_LEN: usize = 1 << 20;
/// Lists nested deeper than this print as `[...]` and compare unequal.
const MAX_NESTING: usize = 32;

/// A runtime value.
///
/// Lists are shared references: assigning a list to a second name aliases it.
#[derive(Debug, Clone, Default)]
pub enum Value {
    #[default]
    None,
    Bool(bool),
    Num(f64),
    Str(String),
    /// Straight-alpha sRGB bytes.
    Color([u8; 4]),
    List(Rc<RefCell<Vec<Value>>>),
    /// Opaque host object, e.g. a text field.
    Handle(u64),
}

impl Value {
    pub fn list(items: Vec<Value>) -> Value {
        Value::List(Rc::new(RefCell::new(items)))
    }

    pub fn str(s: impl Into<String>) -> Value {
        Value::Str(s.into())
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Value::None => "none",
            Value::Bool(_) => "bool",
            Value::Num(_) => "number",
            Value::Str(_) => "string",
            Value::Color(_) => "color",
            Value::List(_) => "list",
            Value::Handle(_) => "handle",
        }
    }

    pub fn is_truthy(&self) -> bool {
        !matches!(self, Value::None | Value::Bool(false))
    }

    pub fn as_num(&self) -> Option<f64> {
        match self {
            Value::Num(n) => Some(*n),
            _ => None,
        }
    }

    /// Renders the value as script text. Fails instead of building a string
    /// longer than [`MAX_STRING_LEN`].
    pub fn to_text(&self) -> Result<String, String> {
        let mut out = Capped(String::new());
        match write_value(&mut out, self, 0) {
            Ok(()) => Ok(out.0),
            Err(_) => Err(too_long()),
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }
}

pub(crate) fn too_long() -> String {
    format!("string longer than {} bytes", MAX_STRING_LEN)
}

/// Joins two strings, refusing results over [`MAX_STRING_LEN`].
pub(crate) fn concat(a: &str, b: &str) -> Result<Value, String> {
    if a.len() + b.len() > MAX_STRING_LEN {
        return Err(too_long());
    }
    Ok(Value::Str(format!("{a}{b}")))
}

/// Fails once a list would pass [`MAX_LIST_LEN`] items.
pub(crate) fn check_list_len(len: usize) -> Result<(), String> {
    if len > MAX_LIST_LEN {
        Err(format!("list longer than {} items", MAX_LIST_LEN))
    } else {
        Ok(())
    }
}

struct Capped(String);

impl fmt::Write for Capped {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        if self.0.len() + s.len() > MAX_STRING_LEN {
            return Err(fmt::Error);
        }
        self.0.push_str(s);
        Ok(())
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        eq_at(self, other, 0)
    }
}

fn eq_at(a: &Value, b: &Value, depth: usize) -> bool {
    match (a, b) {
        (Value::None, Value::None) => true,
        (Value::Bool(a), Value::Bool(b)) => a == b,
        (Value::Num(a), Value::Num(b)) => a == b,
        (Value::Str(a), Value::Str(b)) => a == b,
        (Value::Color(a), Value::Color(b)) => a == b,
        (Value::Handle(a), Value::Handle(b)) => a == b,
        (Value::List(a), Value::List(b)) if Rc::ptr_eq(a, b) => true,
        (Value::List(a), Value::List(b)) => {
            let (a, b) = (a.borrow(), b.borrow());
            depth < MAX_NESTING
                && a.len() == b.len()
                && a.iter().zip(b.iter()).all(|(x, y)| eq_at(x, y, depth + 1))
        }
        _ => false,
    }
}

/// Integral numbers print without a fraction so `"score: " + 3` reads `score: 3`.
pub(crate) fn format_num(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{}", n)
    }
}

fn write_value(f: &mut impl fmt::Write, value: &Value, depth: usize) -> fmt::Result {
    match value {
        Value::None => f.write_str("none"),
        Value::Bool(b) => write!(f, "{}", b),
        Value::Num(n) => f.write_str(&format_num(*n)),
        Value::Str(s) => f.write_str(s),
        Value::Color([r, g, b, a]) => write!(f, "#{:02x}{:02x}{:02x}{:02x}", r, g, b, a),
        Value::List(_) if depth >= MAX_NESTING => f.write_str("[...]"),
        Value::List(items) => {
            f.write_str("[")?;
            for (i, item) in items.borrow().iter().enumerate() {
                if i > 0 {
                    f.write_str(", ")?;
                }
                write_value(f, item, depth + 1)?;
            }
            f.write_str("]")
        }
        Value::Handle(h) => write!(f, "<handle {}>", h),
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_value(f, self, 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integral_numbers_print_without_fraction() {
        assert_eq!(Value::Num(3.0).to_string(), "3");
        assert_eq!(Value::Num(-2.5).to_string(), "-2.5");
    }

    #[test]
    fn lists_compare_by_content() {
        let a = Value::list(vec![Value::Num(1.0), Value::str("x")]);
        let b = Value::list(vec![Value::Num(1.0), Value::str("x")]);
        assert_eq!(a, b);
        assert_eq!(a.to_string(), "[1, x]");
    }

    #[test]
    fn cyclic_lists_print_and_compare() {
        let (a, b) = (Value::list(vec![]), Value::list(vec![]));
        let (Value::List(a_items), Value::List(b_items)) = (&a, &b) else { unreachable!() };
        a_items.borrow_mut().push(b.clone());
        b_items.borrow_mut().push(a.clone());

        assert!(a.to_text().unwrap().ends_with("[...]]]"));
        assert_eq!(a, a.clone());
        assert_ne!(a, b);
    }

    #[test]
    fn text_is_capped() {
        let big = Value::str("x".repeat(MAX_STRING_LEN / 2 + 1));
        let twice = Value::list(vec![big.clone(), big]);
        assert!(twice.to_text().unwrap_err().contains("longer than"));
        assert!(concat(&"y".repeat(MAX_STRING_LEN), "z").is_err());
        assert_eq!(concat("a", "b").unwrap(), Value::str("ab"));
    }

    #[test]
    fn only_none_and_false_are_falsy() {
        assert!(!Value::None.is_truthy());
        assert!(!Value::Bool(false).is_truthy());
        assert!(Value::Num(0.0).is_truthy());
        assert!(Value::str("").is_truthy());
    }
}
