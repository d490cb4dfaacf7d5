//! Pure functions available to every script, at load time and at run time.

use crate::value::{MAX_LIST_LEN, Value, check_list_len};

pub(crate) type BuiltinResult = Result<Value, String>;

/// Calls the builtin `name`, or returns `None` when no builtin has that name.
pub fn call_builtin(name: &str, args: &[Value]) -> Option<BuiltinResult> {
    let result = match name {
        "abs" => unary_math(name, args, f64::abs),
        "floor" => unary_math(name, args, f64::floor),
        "ceil" => unary_math(name, args, f64::ceil),
        "round" => unary_math(name, args, f64::round),
        "sqrt" => unary_math(name, args, f64::sqrt),
        "sin" => unary_math(name, args, f64::sin),
        "cos" => unary_math(name, args, f64::cos),
        "atan2" => arity(name, args, 2)
            .and_then(|_| Ok(Value::Num(num(name, args, 0)?.atan2(num(name, args, 1)?)))),
        "pow" => arity(name, args, 2)
            .and_then(|_| Ok(Value::Num(num(name, args, 0)?.powf(num(name, args, 1)?)))),
        "pi" => arity(name, args, 0).map(|_| Value::Num(std::f64::consts::PI)),
        "min" => fold_nums(name, args, f64::min),
        "max" => fold_nums(name, args, f64::max),
        "clamp" => clamp(args),
        "len" => len(args),
        "push" => push(args),
        "pop" => pop(args),
        "remove_at" => remove_at(args),
        "contains" => contains(args),
        "slice" => slice(args),
        "str" => arity(name, args, 1).and_then(|_| args[0].to_text().map(Value::Str)),
        "range" => range(args),
        "rgb" => color(name, args, 3),
        "rgba" => color(name, args, 4),
        _ => return None,
    };
    Some(result)
}

fn arity(name: &str, args: &[Value], n: usize) -> Result<(), String> {
    if args.len() == n {
        Ok(())
    } else {
        Err(format!("{}() takes {} argument(s), got {}", name, n, args.len()))
    }
}

pub(crate) fn num(name: &str, args: &[Value], i: usize) -> Result<f64, String> {
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

fn unary_math(name: &str, args: &[Value], f: fn(f64) -> f64) -> BuiltinResult {
    arity(name, args, 1)?;
    Ok(Value::Num(f(num(name, args, 0)?)))
}

fn fold_nums(name: &str, args: &[Value], f: fn(f64, f64) -> f64) -> BuiltinResult {
    if args.is_empty() {
        return Err(format!("{}() needs at least one argument", name));
    }
    let mut acc = num(name, args, 0)?;
    for i in 1..args.len() {
        acc = f(acc, num(name, args, i)?);
    }
    Ok(Value::Num(acc))
}

fn clamp(args: &[Value]) -> BuiltinResult {
    arity("clamp", args, 3)?;
    let (x, lo, hi) = (num("clamp", args, 0)?, num("clamp", args, 1)?, num("clamp", args, 2)?);
    Ok(Value::Num(x.max(lo).min(hi)))
}

fn len(args: &[Value]) -> BuiltinResult {
    arity("len", args, 1)?;
    match &args[0] {
        Value::List(items) => Ok(Value::Num(items.borrow().len() as f64)),
        Value::Str(s) => Ok(Value::Num(s.chars().count() as f64)),
        other => Err(format!("len() expects a list or string, got {}", other.type_name())),
    }
}

fn push(args: &[Value]) -> BuiltinResult {
    arity("push", args, 2)?;
    match &args[0] {
        Value::List(items) => {
            let mut items = items.borrow_mut();
            check_list_len(items.len() + 1)?;
            items.push(args[1].clone());
            Ok(Value::None)
        }
        other => Err(format!("push() expects a list, got {}", other.type_name())),
    }
}

fn pop(args: &[Value]) -> BuiltinResult {
    arity("pop", args, 1)?;
    match &args[0] {
        Value::List(items) => Ok(items.borrow_mut().pop().unwrap_or_default()),
        other => Err(format!("pop() expects a list, got {}", other.type_name())),
    }
}

fn remove_at(args: &[Value]) -> BuiltinResult {
    arity("remove_at", args, 2)?;
    let Value::List(items) = &args[0] else {
        return Err(format!("remove_at() expects a list, got {}", args[0].type_name()));
    };
    let index = num("remove_at", args, 1)?;
    let mut items = items.borrow_mut();
    match to_index(index, items.len()) {
        Some(i) => Ok(items.remove(i)),
        None => Err(format!("index {} out of range for list of length {}", index, items.len())),
    }
}

fn contains(args: &[Value]) -> BuiltinResult {
    arity("contains", args, 2)?;
    match (&args[0], &args[1]) {
        (Value::List(items), needle) => Ok(Value::Bool(items.borrow().contains(needle))),
        (Value::Str(s), Value::Str(needle)) => Ok(Value::Bool(s.contains(needle.as_str()))),
        (hay, _) => Err(format!("contains() expects a list or string, got {}", hay.type_name())),
    }
}

/// `slice(x, start, end)` over characters of a string or items of a list.
/// Bounds are clamped to the valid range.
fn slice(args: &[Value]) -> BuiltinResult {
    arity("slice", args, 3)?;
    let clamp_to = |v: f64, len: usize| (v.max(0.0) as usize).min(len);
    match &args[0] {
        Value::Str(s) => {
            let len = s.chars().count();
            let start = clamp_to(num("slice", args, 1)?, len);
            let end = clamp_to(num("slice", args, 2)?, len).max(start);
            Ok(Value::Str(s.chars().skip(start).take(end - start).collect()))
        }
        Value::List(items) => {
            let items = items.borrow();
            let start = clamp_to(num("slice", args, 1)?, items.len());
            let end = clamp_to(num("slice", args, 2)?, items.len()).max(start);
            Ok(Value::list(items[start..end].to_vec()))
        }
        other => Err(format!("slice() expects a list or string, got {}", other.type_name())),
    }
}

/// Numbers past this lose integer precision, so stepping by one stalls.
const MAX_EXACT: f64 = 9_007_199_254_740_992.0;

/// `range(n)` is `0..n`; `range(a, b)` is `a..b`.
fn range(args: &[Value]) -> BuiltinResult {
    let (start, end) = match args.len() {
        1 => (0.0, num("range", args, 0)?),
        2 => (num("range", args, 0)?, num("range", args, 1)?),
        n => return Err(format!("range() takes 1 or 2 arguments, got {}", n)),
    };
    if !(start.abs() < MAX_EXACT && end.abs() < MAX_EXACT) {
        return Err(format!("range() bounds must be below {} in size", MAX_EXACT));
    }
    let count = (end - start).ceil().max(0.0);
    if count > MAX_LIST_LEN as f64 {
        return Err(format!("range() of {} items exceeds the {} item limit", count, MAX_LIST_LEN));
    }
    Ok(Value::list((0..count as usize).map(|k| Value::Num(start + k as f64)).collect()))
}

fn color(name: &str, args: &[Value], n: usize) -> BuiltinResult {
    arity(name, args, n)?;
    let mut rgba = [255u8; 4];
    for (i, channel) in rgba.iter_mut().enumerate().take(n) {
        *channel = num(name, args, i)?.clamp(0.0, 255.0).round() as u8;
    }
    Ok(Value::Color(rgba))
}

/// Converts a script number to a list index, rejecting fractions and out-of-range values.
pub(crate) fn to_index(index: f64, len: usize) -> Option<usize> {
    if index.fract() != 0.0 || index < 0.0 || index >= len as f64 {
        None
    } else {
        Some(index as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn call(name: &str, args: &[Value]) -> Value {
        call_builtin(name, args).unwrap().unwrap()
    }

    #[test]
    fn unknown_names_are_not_builtins() {
        assert!(call_builtin("rect", &[]).is_none());
    }

    #[test]
    fn math() {
        assert_eq!(call("floor", &[Value::Num(2.7)]), Value::Num(2.0));
        assert_eq!(call("max", &[Value::Num(1.0), Value::Num(5.0), Value::Num(3.0)]), Value::Num(5.0));
        assert_eq!(call("clamp", &[Value::Num(9.0), Value::Num(0.0), Value::Num(4.0)]), Value::Num(4.0));
    }

    #[test]
    fn slice_counts_characters() {
        assert_eq!(call("slice", &[Value::str("héllo"), Value::Num(1.0), Value::Num(3.0)]), Value::str("él"));
        assert_eq!(call("slice", &[Value::str("abc"), Value::Num(2.0), Value::Num(99.0)]), Value::str("c"));
    }

    #[test]
    fn push_mutates_the_shared_list() {
        let list = Value::list(vec![]);
        call("push", &[list.clone(), Value::Num(1.0)]);
        assert_eq!(call("len", &[list]), Value::Num(1.0));
    }

    #[test]
    fn remove_at_rejects_out_of_range() {
        let list = Value::list(vec![Value::Num(1.0)]);
        assert!(call_builtin("remove_at", &[list, Value::Num(1.0)]).unwrap().is_err());
    }

    #[test]
    fn rgb_clamps_channels() {
        assert_eq!(call("rgb", &[Value::Num(300.0), Value::Num(0.0), Value::Num(16.0)]), Value::Color([255, 0, 16, 255]));
    }

    #[test]
    fn range_steps_by_one() {
        assert_eq!(call("range", &[Value::Num(3.0)]).to_string(), "[0, 1, 2]");
        assert_eq!(call("range", &[Value::Num(1.5), Value::Num(3.0)]).to_string(), "[1.5, 2.5]");
        assert_eq!(call("range", &[Value::Num(5.0), Value::Num(2.0)]).to_string(), "[]");
    }

    #[test]
    fn range_rejects_huge_or_inexact_bounds() {
        let err = |args: &[Value]| call_builtin("range", args).unwrap().unwrap_err();
        assert!(err(&[Value::Num(9007199254740992.0), Value::Num(9007199254740994.0)]).contains("bounds"));
        assert!(err(&[Value::Num(f64::INFINITY)]).contains("bounds"));
        assert!(err(&[Value::Num(f64::NAN)]).contains("bounds"));
        assert!(err(&[Value::Num(1e9)]).contains("item limit"));
    }

    #[test]
    fn push_stops_at_the_list_limit() {
        let list = Value::list(vec![Value::None; MAX_LIST_LEN]);
        assert!(call_builtin("push", &[list.clone(), Value::Num(1.0)]).unwrap().is_err());
        assert_eq!(call("len", &[list]), Value::Num(MAX_LIST_LEN as f64));
    }

    #[test]
    fn arity_errors_name_the_function() {
        let err = call_builtin("sqrt", &[]).unwrap().unwrap_err();
        assert!(err.starts_with("sqrt()"));
    }
}
