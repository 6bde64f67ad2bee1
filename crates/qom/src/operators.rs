//! Value comparison with type coercion.
//!
//! The right-hand value is converted to the type of the left-hand (dynamic)
//! value before comparing:
//!
//! - numbers widen: `LONG` against `LONG` compares exactly, any other numeric
//!   pair compares as `f64`
//! - dates compare by instant, whatever their offset
//! - strings compare lexically (by code point)
//! - a string compared with a `NAME` or `PATH` is converted through the
//!   resolver, which may fail with `EvalError::UnresolvableName`
//!
//! A pair that cannot be converted is *incomparable*: every operator,
//! including `<>`, is false for it.

use crate::ast::Operator;
use crate::error::EvalError;
use crate::like::like_matches;
use log::trace;
use std::cmp::Ordering;
use sylvan_traits::NamePathResolver;
use sylvan_types::{PropertyType, Value};

/// Applies `operator` to a dynamic value and a static value.
pub fn compare(
    operator: Operator,
    dynamic: &Value,
    fixed: &Value,
    resolver: &dyn NamePathResolver,
) -> Result<bool, EvalError> {
    if operator == Operator::Like {
        let text = lexical(dynamic, resolver)?;
        let pattern = lexical(fixed, resolver)?;
        return Ok(like_matches(&pattern, &text));
    }
    match compare_values(dynamic, fixed, resolver)? {
        Some(ordering) => Ok(operator.holds(ordering)),
        None => {
            trace!(
                "Incomparable values {:?} and {:?} for operator {}",
                dynamic, fixed, operator
            );
            Ok(false)
        }
    }
}

/// Orders `fixed` relative to `dynamic` after converting it to the dynamic
/// value's type. `None` means the pair is incomparable.
pub fn compare_values(
    dynamic: &Value,
    fixed: &Value,
    resolver: &dyn NamePathResolver,
) -> Result<Option<Ordering>, EvalError> {
    let ordering = match (dynamic, fixed) {
        (Value::Long(a), Value::Long(b)) => Some(a.cmp(b)),
        (Value::Long(_) | Value::Double(_), _) => match (dynamic.to_double(), numeric(fixed)) {
            (Some(a), Some(b)) => a.partial_cmp(&b),
            _ => None,
        },
        (Value::Date(a), _) => fixed.to_date().map(|b| a.cmp(&b)),
        (Value::Boolean(a), _) => fixed.to_boolean().map(|b| a.cmp(&b)),
        (Value::Name(a), Value::Name(b)) => Some(a.cmp(b)),
        (Value::Name(a), Value::String(text)) => Some(a.cmp(&resolver.qualified_name(text)?)),
        (Value::Path(a), Value::Path(b)) => Some(a.cmp(b)),
        (Value::Path(a), Value::String(text)) => Some(a.cmp(&resolver.qualified_path(text)?)),
        (Value::Name(_) | Value::Path(_), _) => None,
        (Value::Binary(a), Value::Binary(b)) => Some(a.cmp(b)),
        (Value::Binary(a), _) => fixed.lexical_form().map(|b| a.as_slice().cmp(b.as_bytes())),
        (Value::String(a) | Value::Reference(a), _) => match fixed {
            Value::Name(_) | Value::Path(_) => Some(a.as_str().cmp(lexical(fixed, resolver)?.as_str())),
            _ => fixed.lexical_form().map(|b| a.as_str().cmp(b.as_str())),
        },
    };
    Ok(ordering)
}

/// Numeric view used for widening: strings only count when they parse.
fn numeric(value: &Value) -> Option<f64> {
    match value.property_type() {
        PropertyType::Long | PropertyType::Double | PropertyType::String => value.to_double(),
        _ => None,
    }
}

/// The textual form of any value, resolving names and paths to their
/// prefixed form.
pub fn lexical(value: &Value, resolver: &dyn NamePathResolver) -> Result<String, EvalError> {
    match value {
        Value::Name(name) => Ok(resolver.name_text(name)?),
        Value::Path(path) => Ok(resolver.path_text(path)?),
        other => Ok(other.lexical_form().unwrap_or_default()),
    }
}

fn type_rank(value: &Value) -> u8 {
    match value.property_type() {
        PropertyType::Boolean => 0,
        PropertyType::Long | PropertyType::Double => 1,
        PropertyType::Date => 2,
        PropertyType::String => 3,
        PropertyType::Reference => 4,
        PropertyType::Name => 5,
        PropertyType::Path => 6,
        PropertyType::Binary => 7,
    }
}

/// A total order over values of any type, used to sort results.
///
/// Values of the same kind compare naturally (numbers across `LONG` and
/// `DOUBLE`); values of different kinds are grouped by type. Never consults
/// the namespace registry.
pub fn natural_order(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Long(x), Value::Long(y)) => x.cmp(y),
        (Value::Long(_) | Value::Double(_), Value::Long(_) | Value::Double(_)) => {
            let (x, y) = (a.to_double().unwrap_or(f64::NAN), b.to_double().unwrap_or(f64::NAN));
            x.total_cmp(&y)
        }
        (Value::Boolean(x), Value::Boolean(y)) => x.cmp(y),
        (Value::Date(x), Value::Date(y)) => x.cmp(y),
        (Value::String(x), Value::String(y)) | (Value::Reference(x), Value::Reference(y)) => x.cmp(y),
        (Value::Name(x), Value::Name(y)) => x.cmp(y),
        (Value::Path(x), Value::Path(y)) => x.cmp(y),
        (Value::Binary(x), Value::Binary(y)) => x.cmp(y),
        _ => type_rank(a).cmp(&type_rank(b)),
    }
}
