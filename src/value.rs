use indexmap::IndexMap;
use serde::ser::SerializeStruct;
use serde::Serialize;

use crate::error::{Error, Result};
use crate::Tag;

/// An NBT compound: named values in insertion order. Written to NBT in the
/// same order.
pub type Compound = IndexMap<String, Value>;

/// Value is a complete NBT value. It owns its data. Compounds and Lists are
/// held recursively.
///
/// Serializing a `Value` with serde produces a `{ "type": ..., "value": ... }`
/// pair, where the type is the [`Tag::name`] of the variant.
///
/// ```
/// # use worldnbt::{Compound, NamedCompound, Value};
/// let mut data = Compound::new();
/// data.insert("LevelName".to_owned(), Value::from("My World"));
///
/// let mut root = NamedCompound::default();
/// root.value.insert("Data".to_owned(), Value::Compound(data));
///
/// assert_eq!(root.pointer("/Data/LevelName").and_then(Value::as_str), Some("My World"));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "value", rename_all = "camelCase")]
pub enum Value {
    Byte(i8),
    Short(i16),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    ByteArray(Vec<i8>),
    String(String),
    List(List),
    Compound(Compound),
    IntArray(Vec<i32>),
    LongArray(Vec<i64>),
}

impl Value {
    /// The tag this value is written with. Never [`Tag::End`].
    pub fn tag(&self) -> Tag {
        match self {
            Value::Byte(_) => Tag::Byte,
            Value::Short(_) => Tag::Short,
            Value::Int(_) => Tag::Int,
            Value::Long(_) => Tag::Long,
            Value::Float(_) => Tag::Float,
            Value::Double(_) => Tag::Double,
            Value::ByteArray(_) => Tag::ByteArray,
            Value::String(_) => Tag::String,
            Value::List(_) => Tag::List,
            Value::Compound(_) => Tag::Compound,
            Value::IntArray(_) => Tag::IntArray,
            Value::LongArray(_) => Tag::LongArray,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match *self {
            Value::Byte(v) => Some(v as i64),
            Value::Short(v) => Some(v as i64),
            Value::Int(v) => Some(v as i64),
            Value::Long(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match *self {
            Value::Byte(v) => Some(v as f64),
            Value::Short(v) => Some(v as f64),
            Value::Int(v) => Some(v as f64),
            Value::Long(v) => Some(v as f64),
            Value::Float(v) => Some(v as f64),
            Value::Double(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_compound(&self) -> Option<&Compound> {
        match self {
            Value::Compound(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_compound_mut(&mut self) -> Option<&mut Compound> {
        match self {
            Value::Compound(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&List> {
        match self {
            Value::List(l) => Some(l),
            _ => None,
        }
    }

    /// Look up a field if this is a compound.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.as_compound()?.get(name)
    }

    /// Looks up a value by a JSON-pointer-like path, eg `/Data/LevelName`.
    /// Compound fields are addressed by name and list elements by index.
    /// `~1` and `~0` escape `/` and `~` within a name. The empty path refers
    /// to this value.
    pub fn pointer(&self, pointer: &str) -> Option<&Value> {
        self.walk(&tokens(pointer)?)
    }

    /// Mutable form of [`Value::pointer`].
    pub fn pointer_mut(&mut self, pointer: &str) -> Option<&mut Value> {
        self.walk_mut(&tokens(pointer)?)
    }

    fn walk(&self, tokens: &[String]) -> Option<&Value> {
        tokens.iter().try_fold(self, |target, token| match target {
            Value::Compound(c) => c.get(token),
            Value::List(l) => l.elements.get(token.parse::<usize>().ok()?),
            _ => None,
        })
    }

    fn walk_mut(&mut self, tokens: &[String]) -> Option<&mut Value> {
        tokens.iter().try_fold(self, |target, token| match target {
            Value::Compound(c) => c.get_mut(token),
            Value::List(l) => l.elements.get_mut(token.parse::<usize>().ok()?),
            _ => None,
        })
    }
}

fn tokens(pointer: &str) -> Option<Vec<String>> {
    if pointer.is_empty() {
        return Some(vec![]);
    }
    if !pointer.starts_with('/') {
        return None;
    }
    Some(
        pointer
            .split('/')
            .skip(1)
            .map(|t| t.replace("~1", "/").replace("~0", "~"))
            .collect(),
    )
}

/// An NBT list. Every element has the same tag, and the list remembers that
/// tag even when empty.
///
/// Elements are kept as [`Value`]s for ease of navigation, but are written
/// without their individual tags.
#[derive(Debug, Clone, PartialEq)]
pub struct List {
    element_tag: Tag,
    elements: Vec<Value>,
}

impl List {
    /// An empty list of the given element tag. Minecraft writes empty lists
    /// with [`Tag::End`], which is allowed here.
    pub fn empty(element_tag: Tag) -> Self {
        Self {
            element_tag,
            elements: Vec::new(),
        }
    }

    /// Create a list, checking every element has `element_tag`.
    pub fn new(element_tag: Tag, elements: Vec<Value>) -> Result<Self> {
        let mut list = Self::empty(element_tag);
        list.elements.reserve(elements.len());
        for el in elements {
            list.push(el)?;
        }
        Ok(list)
    }

    /// Append an element, failing if its tag differs from the list's.
    pub fn push(&mut self, value: Value) -> Result<()> {
        if value.tag() != self.element_tag {
            return Err(Error::format(format!(
                "list of {} cannot hold {}",
                self.element_tag,
                value.tag()
            )));
        }
        self.elements.push(value);
        Ok(())
    }

    pub fn element_tag(&self) -> Tag {
        self.element_tag
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Value> {
        self.elements.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Value> {
        self.elements.iter()
    }

    /// Elements as a slice.
    pub fn elements(&self) -> &[Value] {
        &self.elements
    }

    /// Only the reader builds lists without checking each element, since it
    /// decodes every element with the list's tag.
    pub(crate) fn from_decoded(element_tag: Tag, elements: Vec<Value>) -> Self {
        Self {
            element_tag,
            elements,
        }
    }
}

impl<'a> IntoIterator for &'a List {
    type Item = &'a Value;
    type IntoIter = std::slice::Iter<'a, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.elements.iter()
    }
}

impl Serialize for List {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        // Mirrors the wire: one type for the list, bare element values.
        struct Untagged<'a>(&'a [Value]);

        impl Serialize for Untagged<'_> {
            fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
            where
                S: serde::Serializer,
            {
                serializer.collect_seq(self.0.iter().map(Content))
            }
        }

        let mut s = serializer.serialize_struct("List", 2)?;
        s.serialize_field("type", &self.element_tag)?;
        s.serialize_field("value", &Untagged(&self.elements))?;
        s.end()
    }
}

/// The payload of a value without its tag.
struct Content<'a>(&'a Value);

impl Serialize for Content<'_> {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        match self.0 {
            Value::Byte(v) => v.serialize(serializer),
            Value::Short(v) => v.serialize(serializer),
            Value::Int(v) => v.serialize(serializer),
            Value::Long(v) => v.serialize(serializer),
            Value::Float(v) => v.serialize(serializer),
            Value::Double(v) => v.serialize(serializer),
            Value::ByteArray(v) => v.serialize(serializer),
            Value::String(v) => v.serialize(serializer),
            Value::List(v) => v.serialize(serializer),
            Value::Compound(v) => v.serialize(serializer),
            Value::IntArray(v) => v.serialize(serializer),
            Value::LongArray(v) => v.serialize(serializer),
        }
    }
}

/// The root of an NBT archive: a compound with a name. The name is usually
/// empty.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct NamedCompound {
    pub name: String,
    pub value: Compound,
}

impl NamedCompound {
    pub fn new(name: impl Into<String>, value: Compound) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }

    /// Look up a top level field.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.value.get(name)
    }

    /// [`Value::pointer`] starting from the root compound, eg
    /// `/Data/LevelName`. The empty path refers to nothing, since the root is
    /// not itself a [`Value`].
    pub fn pointer(&self, pointer: &str) -> Option<&Value> {
        let tokens = tokens(pointer)?;
        let (first, rest) = tokens.split_first()?;
        self.value.get(first)?.walk(rest)
    }

    /// [`Value::pointer_mut`] starting from the root compound.
    pub fn pointer_mut(&mut self, pointer: &str) -> Option<&mut Value> {
        let tokens = tokens(pointer)?;
        let (first, rest) = tokens.split_first()?;
        self.value.get_mut(first)?.walk_mut(rest)
    }
}

// ------------- From<T> impls -------------

macro_rules! from {
    ($type:ty, $variant:ident $(, $($part:tt)+)?) => {
        impl From<$type> for Value {
            fn from(val: $type) -> Self {
                Self::$variant(val$($($part)+)?)
            }
        }
    };
}
from!(i8, Byte);
from!(u8, Byte, as i8);
from!(i16, Short);
from!(i32, Int);
from!(i64, Long);
from!(f32, Float);
from!(f64, Double);
from!(String, String);
from!(&str, String, .to_owned());
from!(Vec<i8>, ByteArray);
from!(Vec<i32>, IntArray);
from!(Vec<i64>, LongArray);
from!(List, List);
from!(Compound, Compound);

impl From<bool> for Value {
    fn from(val: bool) -> Self {
        Self::Byte(i8::from(val))
    }
}
