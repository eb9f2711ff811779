//! Host rendering primitive.
//!
//! The resolver never builds output nodes itself; it hands the resolved
//! type, props and normalized children to a [`Renderer`]. The default
//! [`TreeRenderer`] produces plain [`Element`] values.

use crate::registry::ComponentRef;
use crate::value::{Object, Value};
use serde::{Serialize, Serializer};
use std::fmt;
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq)]
pub enum ElementType {
    /// Lower-cased host tag name
    Host(String),
    Component(ComponentRef),
    Fragment,
}

impl fmt::Display for ElementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ElementType::Host(tag) => f.write_str(tag),
            ElementType::Component(component) => f.write_str(component.name()),
            ElementType::Fragment => f.write_str("Fragment"),
        }
    }
}

impl Serialize for ElementType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Rendered element
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Element {
    #[serde(rename = "type")]
    pub element_type: ElementType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    pub props: Object,
    #[serde(skip_serializing_if = "Value::is_undefined")]
    pub children: Value,
}

impl Element {
    pub fn new(element_type: ElementType) -> Self {
        Self {
            element_type,
            key: None,
            props: Object::new(),
            children: Value::Undefined,
        }
    }

    pub fn host(tag: impl Into<String>) -> Self {
        Self::new(ElementType::Host(tag.into()))
    }

    pub fn fragment() -> Self {
        Self::new(ElementType::Fragment)
    }

    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    pub fn with_prop(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.props.insert(name.into(), value.into());
        self
    }

    pub fn with_children(mut self, children: impl Into<Value>) -> Self {
        self.children = children.into();
        self
    }

    pub fn prop(&self, name: &str) -> Option<&Value> {
        self.props.get(name)
    }

    pub fn is_fragment(&self) -> bool {
        self.element_type == ElementType::Fragment
    }

    /// Children as a slice regardless of how many there are
    pub fn child_list(&self) -> &[Value] {
        match &self.children {
            Value::Undefined => &[],
            Value::Array(items) => items,
            single => std::slice::from_ref(single),
        }
    }
}

/// `createElement` equivalent supplied by the host
pub trait Renderer: Send + Sync {
    fn create_element(&self, element_type: ElementType, props: Object, children: Value) -> Value;
}

/// Builds [`Element`] values, moving a `key` prop into the key slot
#[derive(Debug, Default, Clone, Copy)]
pub struct TreeRenderer;

impl Renderer for TreeRenderer {
    fn create_element(&self, element_type: ElementType, mut props: Object, children: Value) -> Value {
        let key = match props.shift_remove("key") {
            None | Some(Value::Undefined) | Some(Value::Null) => None,
            Some(key) => Some(key.to_property_key()),
        };
        Value::Element(Arc::new(Element {
            element_type,
            key,
            props,
            children,
        }))
    }
}
