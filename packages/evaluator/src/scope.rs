use crate::value::Value;
use indexmap::IndexMap;

/// Caller-supplied names consulted when a name is missing from scope
pub type Bindings = IndexMap<String, Value>;

/// Names visible to an expression. Built once per function application
/// and never mutated afterwards.
#[derive(Debug, Clone, Default)]
pub struct Scope {
    values: IndexMap<String, Value>,
}

impl Scope {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind each parameter to the argument at the same position; missing
    /// arguments are `undefined`
    pub fn with_params(params: &[String], args: &[Value]) -> Self {
        params
            .iter()
            .enumerate()
            .map(|(index, param)| (param.clone(), args.get(index).cloned().unwrap_or_default()))
            .collect()
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl FromIterator<(String, Value)> for Scope {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}
