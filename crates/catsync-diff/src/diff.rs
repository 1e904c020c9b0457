use std::fmt;

use serde_json::{Number, Value};

/// A leaf-level mismatch between two documents.
///
/// `left` is the value from the existing snapshot and `right` the value from
/// the fresh document. `None` means the key does not exist on that side.
#[derive(Debug, Clone, PartialEq)]
pub struct Difference {
    pub path:  String,
    pub left:  Option<Value>,
    pub right: Option<Value>,
}

impl Difference {
    /// Dotted path, or `<root>` when the documents differ at the top level.
    pub fn display_path(&self) -> &str {
        if self.path.is_empty() { "<root>" } else { &self.path }
    }
}

struct Side<'a>(Option<&'a Value>);

impl fmt::Display for Side<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(v) => write!(f, "{v}"),
            None => f.write_str("undefined"),
        }
    }
}

impl fmt::Display for Difference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Difference at path: {}", self.display_path())?;
        writeln!(f, "Existing value: {}", Side(self.left.as_ref()))?;
        write!(f, "New value: {}", Side(self.right.as_ref()))
    }
}

/// Structural diff of two documents.
///
/// Objects and arrays are descended key by key (arrays by index); anything
/// else that is not deeply equal yields one [`Difference`] at its path.
/// Callers normally [`normalize`](crate::normalize) both sides first.
pub fn diff(left: &Value, right: &Value) -> Vec<Difference> {
    let mut out = Vec::new();
    diff_into(Some(left), Some(right), &mut String::new(), &mut out);
    out
}

fn diff_into(left: Option<&Value>, right: Option<&Value>, path: &mut String, out: &mut Vec<Difference>) {
    match (left, right) {
        (Some(l), Some(r)) if deep_equal(l, r) => {}
        (None, None) => {}
        (Some(Value::Object(l)), Some(Value::Object(r))) => {
            let right_only = r.keys().filter(|k| !l.contains_key(*k));
            for key in l.keys().chain(right_only) {
                descend(path, key, |path| diff_into(l.get(key), r.get(key), path, out));
            }
        }
        (Some(Value::Array(l)), Some(Value::Array(r))) => {
            for i in 0..l.len().max(r.len()) {
                descend(path, &i.to_string(), |path| diff_into(l.get(i), r.get(i), path, out));
            }
        }
        _ => out.push(Difference {
            path:  path.clone(),
            left:  left.cloned(),
            right: right.cloned(),
        }),
    }
}

fn descend(path: &mut String, segment: &str, f: impl FnOnce(&mut String)) {
    let len = path.len();
    if !path.is_empty() {
        path.push('.');
    }
    path.push_str(segment);
    f(path);
    path.truncate(len);
}

/// Deep equality with numbers compared by value, so `1` equals `1.0`.
///
/// Arrays are order-sensitive; object key order is ignored.
pub fn deep_equal(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::Null, Value::Null) => true,
        (Value::Bool(l), Value::Bool(r)) => l == r,
        (Value::Number(l), Value::Number(r)) => numbers_equal(l, r),
        (Value::String(l), Value::String(r)) => l == r,
        (Value::Array(l), Value::Array(r)) => {
            l.len() == r.len() && l.iter().zip(r).all(|(l, r)| deep_equal(l, r))
        }
        (Value::Object(l), Value::Object(r)) => {
            l.len() == r.len()
                && l.iter().all(|(k, l)| r.get(k).is_some_and(|r| deep_equal(l, r)))
        }
        _ => false,
    }
}

fn numbers_equal(l: &Number, r: &Number) -> bool {
    if let (Some(l), Some(r)) = (l.as_i64(), r.as_i64()) {
        return l == r;
    }
    if let (Some(l), Some(r)) = (l.as_u64(), r.as_u64()) {
        return l == r;
    }
    match (l.as_f64(), r.as_f64()) {
        (Some(l), Some(r)) => l == r,
        _ => false,
    }
}
