use std::fmt;
use std::rc::Rc;

/// A runtime value. Values are never mutated after construction; every
/// operation builds a new one.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Number(f64),
    Text(Rc<str>),
    Boolean(bool),
    List(Rc<[Value]>),
    Null,
}

/// The tag of a [`Value`], used in type diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueTag {
    Number,
    Text,
    Boolean,
    List,
    Null,
}

impl fmt::Display for ValueTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ValueTag::Number => "Number",
            ValueTag::Text => "Text",
            ValueTag::Boolean => "Boolean",
            ValueTag::List => "List",
            ValueTag::Null => "Null",
        };
        f.write_str(name)
    }
}

impl Value {
    pub fn text(s: impl AsRef<str>) -> Self {
        Value::Text(Rc::from(s.as_ref()))
    }

    pub fn list(items: Vec<Value>) -> Self {
        Value::List(Rc::from(items))
    }

    pub fn tag(&self) -> ValueTag {
        match self {
            Value::Number(_) => ValueTag::Number,
            Value::Text(_) => ValueTag::Text,
            Value::Boolean(_) => ValueTag::Boolean,
            Value::List(_) => ValueTag::List,
            Value::Null => ValueTag::Null,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        if let Value::Number(number) = self {
            Some(*number)
        } else {
            None
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        if let Value::Text(text) = self {
            Some(text.as_ref())
        } else {
            None
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        if let Value::Boolean(flag) = self {
            Some(*flag)
        } else {
            None
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        if let Value::List(items) = self {
            Some(items.as_ref())
        } else {
            None
        }
    }
}

pub fn format_number(number: f64) -> String {
    if number.is_nan() {
        "NaN".to_string()
    } else if number.is_infinite() {
        if number > 0.0 { "Infinity" } else { "-Infinity" }.to_string()
    } else {
        number.to_string()
    }
}

/// Rendering used by DISPLAY and by list formatting. Text inside a list is
/// quoted so `["1"]` and `[1]` stay distinguishable.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Number(number) => f.write_str(&format_number(*number)),
            Value::Text(text) => f.write_str(text),
            Value::Boolean(flag) => write!(f, "{}", flag),
            Value::Null => f.write_str("null"),
            Value::List(items) => {
                f.write_str("[")?;
                for (index, item) in items.iter().enumerate() {
                    if index > 0 {
                        f.write_str(", ")?;
                    }
                    match item {
                        Value::Text(text) => write!(f, "\"{}\"", text)?,
                        other => write!(f, "{}", other)?,
                    }
                }
                f.write_str("]")
            }
        }
    }
}
