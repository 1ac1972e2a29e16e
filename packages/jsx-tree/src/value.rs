//! Attribute values
//!
//! Only the shapes the rewriting engine reasons about are modeled: scalar
//! literals and object literals of them. Everything else is kept as raw
//! source text and printed back unchanged.

use std::fmt;

/// A literal scalar value.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Str(String),
    Number(f64),
    Bool(bool),
    /// Regular expression literal, kept as written (`/ab+c/i`).
    Regex(String),
}

impl Scalar {
    pub fn str(value: impl Into<String>) -> Self {
        Scalar::Str(value.into())
    }

    /// The value as a lookup key for enum tables and global value lists.
    pub fn as_key(&self) -> String {
        match self {
            Scalar::Str(s) => s.clone(),
            Scalar::Number(n) => format_number(*n),
            Scalar::Bool(b) => b.to_string(),
            Scalar::Regex(raw) => raw.clone(),
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Scalar::Str(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Str(s) => write!(f, "\"{}\"", escape_js_string(s)),
            Scalar::Number(n) => f.write_str(&format_number(*n)),
            Scalar::Bool(b) => write!(f, "{}", b),
            Scalar::Regex(raw) => f.write_str(raw),
        }
    }
}

/// One `key: value` entry of an object literal.
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectEntry {
    /// Static key name (`md` for both `md:` and `"md":`).
    pub key: String,
    /// Key as written in the source.
    pub key_raw: String,
    pub value: JsExpr,
    /// Whole entry as written in the source; dropped once the value changes.
    pub raw: Option<String>,
}

impl ObjectEntry {
    pub fn new(key: impl Into<String>, value: JsExpr) -> Self {
        let key = key.into();
        Self {
            key_raw: key.clone(),
            key,
            value,
            raw: None,
        }
    }

    /// Same key, new value.
    pub fn with_value(&self, value: JsExpr) -> Self {
        Self {
            key: self.key.clone(),
            key_raw: self.key_raw.clone(),
            value,
            raw: None,
        }
    }
}

impl fmt::Display for ObjectEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.raw {
            Some(raw) => f.write_str(raw),
            None => write!(f, "{}: {}", self.key_raw, self.value),
        }
    }
}

/// An object literal whose keys are all static.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ObjectLiteral {
    pub entries: Vec<ObjectEntry>,
}

impl ObjectLiteral {
    pub fn new(entries: Vec<ObjectEntry>) -> Self {
        Self { entries }
    }

    pub fn get(&self, key: &str) -> Option<&JsExpr> {
        self.entries.iter().find(|e| e.key == key).map(|e| &e.value)
    }
}

impl fmt::Display for ObjectLiteral {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.entries.is_empty() {
            return f.write_str("{}");
        }
        f.write_str("{ ")?;
        for (i, entry) in self.entries.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}", entry)?;
        }
        f.write_str(" }")
    }
}

/// An expression inside `{…}`.
#[derive(Debug, Clone, PartialEq)]
pub enum JsExpr {
    Scalar(Scalar),
    Object(ObjectLiteral),
    /// Any other expression, as written.
    Raw(String),
}

impl JsExpr {
    pub fn as_scalar(&self) -> Option<&Scalar> {
        match self {
            JsExpr::Scalar(s) => Some(s),
            _ => None,
        }
    }
}

impl From<Scalar> for JsExpr {
    fn from(scalar: Scalar) -> Self {
        JsExpr::Scalar(scalar)
    }
}

impl fmt::Display for JsExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JsExpr::Scalar(s) => write!(f, "{}", s),
            JsExpr::Object(o) => write!(f, "{}", o),
            JsExpr::Raw(raw) => f.write_str(raw),
        }
    }
}

/// The value of a JSX attribute.
#[derive(Debug, Clone, PartialEq)]
pub enum AttrValue {
    /// `name="text"`
    Str(String),
    /// `name={expr}`
    Expr(JsExpr),
}

impl AttrValue {
    pub fn str(value: impl Into<String>) -> Self {
        AttrValue::Str(value.into())
    }

    pub fn scalar(scalar: Scalar) -> Self {
        AttrValue::Expr(JsExpr::Scalar(scalar))
    }

    /// Literal scalar carried by this value, if any.
    pub fn literal(&self) -> Option<Scalar> {
        match self {
            AttrValue::Str(s) => Some(Scalar::Str(s.clone())),
            AttrValue::Expr(JsExpr::Scalar(s)) => Some(s.clone()),
            AttrValue::Expr(_) => None,
        }
    }

    pub fn as_object(&self) -> Option<&ObjectLiteral> {
        match self {
            AttrValue::Expr(JsExpr::Object(o)) => Some(o),
            _ => None,
        }
    }
}

impl From<JsExpr> for AttrValue {
    fn from(expr: JsExpr) -> Self {
        AttrValue::Expr(expr)
    }
}

impl fmt::Display for AttrValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttrValue::Str(s) if !s.contains('"') => write!(f, "\"{}\"", s),
            AttrValue::Str(s) if !s.contains('\'') => write!(f, "'{}'", s),
            // JSX strings have no escapes; fall back to an expression container.
            AttrValue::Str(s) => write!(f, "{{\"{}\"}}", escape_js_string(s)),
            AttrValue::Expr(expr) => write!(f, "{{{}}}", expr),
        }
    }
}

fn format_number(n: f64) -> String {
    if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{}", n)
    }
}

fn escape_js_string(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_attribute_strings_with_fitting_quotes() {
        assert_eq!(AttrValue::str("auto").to_string(), "\"auto\"");
        assert_eq!(AttrValue::str("say \"hi\"").to_string(), "'say \"hi\"'");
        assert_eq!(
            AttrValue::str("it's \"x\"").to_string(),
            "{\"it's \\\"x\\\"\"}"
        );
    }

    #[test]
    fn renders_numbers_without_trailing_fraction() {
        assert_eq!(Scalar::Number(120.0).to_string(), "120");
        assert_eq!(Scalar::Number(0.5).to_string(), "0.5");
        assert_eq!(Scalar::Number(-4.0).as_key(), "-4");
    }

    #[test]
    fn object_keeps_raw_entries_until_changed() {
        let base = ObjectEntry {
            key: "base".into(),
            key_raw: "base".into(),
            value: JsExpr::Scalar(Scalar::str("a")),
            raw: Some("base: 'a'".into()),
        };
        let md = base.with_value(JsExpr::Scalar(Scalar::str("b")));
        let object = ObjectLiteral::new(vec![base, ObjectEntry { key: "md".into(), key_raw: "md".into(), ..md }]);
        assert_eq!(object.to_string(), "{ base: 'a', md: \"b\" }");
        assert_eq!(AttrValue::from(JsExpr::Object(object)).to_string(), "{{ base: 'a', md: \"b\" }}");
    }
}
