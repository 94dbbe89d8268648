//! Built-in functions.
//!
//! A small host library so programs can call something without the embedder
//! registering functions first. Argument-count mistakes are reported as
//! native errors naming the function.

use ember_value::{native_error, EvalError, EvalResult, Value};

use crate::{ArgMode, FunctionTable, NativeFunction};

pub(crate) fn register(table: &mut FunctionTable) {
    table.register_native("strlen", strlen);
    table.register_native("strtoupper", strtoupper);
    table.register_native("strtolower", strtolower);
    table.register_native("count", count);
    table.register_native("implode", implode);
    table.register_native("max", max);
    table.register_native("min", min);
    table.register_native("abs", abs);
    table.register_native("is_null", is_null);
    table.register(
        NativeFunction::new("array_push", array_push).with_arg_modes([ArgMode::ArrayRef]),
    );
}

fn expect_args<'a>(
    function: &str,
    args: &'a [Value],
    count: usize,
) -> Result<&'a [Value], EvalError> {
    if args.len() == count {
        Ok(args)
    } else {
        Err(native_error(
            function,
            format!("expects exactly {count} parameters, {} given", args.len()),
        ))
    }
}

fn strlen(_env: &mut crate::Environment, args: &[Value]) -> EvalResult {
    let [s] = expect_args("strlen", args, 1)? else {
        return Ok(Value::Null);
    };
    let len = i64::try_from(s.to_str().len()).unwrap_or(i64::MAX);
    Ok(Value::Long(len))
}

fn strtoupper(_env: &mut crate::Environment, args: &[Value]) -> EvalResult {
    let [s] = expect_args("strtoupper", args, 1)? else {
        return Ok(Value::Null);
    };
    Ok(Value::string(s.to_str().to_ascii_uppercase()))
}

fn strtolower(_env: &mut crate::Environment, args: &[Value]) -> EvalResult {
    let [s] = expect_args("strtolower", args, 1)? else {
        return Ok(Value::Null);
    };
    Ok(Value::string(s.to_str().to_ascii_lowercase()))
}

fn count(_env: &mut crate::Environment, args: &[Value]) -> EvalResult {
    let [value] = expect_args("count", args, 1)? else {
        return Ok(Value::Null);
    };
    let len = i64::try_from(value.count()).unwrap_or(i64::MAX);
    Ok(Value::Long(len))
}

fn implode(_env: &mut crate::Environment, args: &[Value]) -> EvalResult {
    let [glue, pieces] = expect_args("implode", args, 2)? else {
        return Ok(Value::Null);
    };
    let Some(array) = pieces.as_array() else {
        return Err(native_error(
            "implode",
            format!("expects parameter 2 to be array, {} given", pieces.type_name()),
        ));
    };
    let joined = array
        .read()
        .values()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(&glue.to_str());
    Ok(Value::string(joined))
}

/// Shared body of `max` and `min`: a single array argument is searched,
/// otherwise the arguments themselves are.
fn extreme(function: &str, args: &[Value], keep: std::cmp::Ordering) -> EvalResult {
    let candidates: Vec<Value> = match args {
        [] => return Err(native_error(function, "expects at least 1 parameter, 0 given")),
        [Value::Array(array)] => array.read().values().cloned().collect(),
        _ => args.to_vec(),
    };
    let mut best: Option<Value> = None;
    for candidate in candidates {
        best = Some(match best {
            Some(current) if candidate.loose_cmp(&current)? != Some(keep) => current,
            _ => candidate,
        });
    }
    best.ok_or_else(|| native_error(function, "array must contain at least one element"))
}

fn max(_env: &mut crate::Environment, args: &[Value]) -> EvalResult {
    extreme("max", args, std::cmp::Ordering::Greater)
}

fn min(_env: &mut crate::Environment, args: &[Value]) -> EvalResult {
    extreme("min", args, std::cmp::Ordering::Less)
}

fn abs(_env: &mut crate::Environment, args: &[Value]) -> EvalResult {
    let [value] = expect_args("abs", args, 1)? else {
        return Ok(Value::Null);
    };
    Ok(match value.to_number() {
        ember_value::Numeric::Long(n) => match n.checked_abs() {
            Some(n) => Value::Long(n),
            None => Value::Double(-(n as f64)),
        },
        ember_value::Numeric::Double(d) => Value::Double(d.abs()),
    })
}

fn is_null(_env: &mut crate::Environment, args: &[Value]) -> EvalResult {
    let [value] = expect_args("is_null", args, 1)? else {
        return Ok(Value::Null);
    };
    Ok(Value::Bool(value.is_null()))
}

/// `array_push(&$array, ...$values)`: append in order, return the new count.
fn array_push(_env: &mut crate::Environment, args: &[Value]) -> EvalResult {
    let Some((target, values)) = args.split_first() else {
        return Err(native_error("array_push", "expects at least 2 parameters, 0 given"));
    };
    if target.as_array().is_none() {
        return Err(native_error(
            "array_push",
            format!("expects parameter 1 to be array, {} given", target.type_name()),
        ));
    }
    for value in values {
        target.append(value.copy())?;
    }
    let len = i64::try_from(target.count()).unwrap_or(i64::MAX);
    Ok(Value::Long(len))
}

#[cfg(test)]
mod tests;
