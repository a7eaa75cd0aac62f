use async_graphql_value::ConstValue;
use indexmap::IndexMap;

use crate::graphql::scalars::Timestamp;

/// Argument after scalar coercion
#[derive(Debug, Clone, PartialEq)]
pub enum ArgValue {
    Timestamp(Timestamp),
    Value(ConstValue),
}

/// Coerced arguments of one field. Absent and null arguments are left out.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Arguments {
    values: IndexMap<String, ArgValue>,
}

impl Arguments {
    pub fn insert(&mut self, name: impl Into<String>, value: ArgValue) {
        self.values.insert(name.into(), value);
    }

    pub fn with(mut self, name: impl Into<String>, value: ArgValue) -> Self {
        self.insert(name, value);
        self
    }

    pub fn timestamp(&self, name: &str) -> Option<&Timestamp> {
        match self.values.get(name) {
            Some(ArgValue::Timestamp(timestamp)) => Some(timestamp),
            _ => None,
        }
    }

    pub fn value(&self, name: &str) -> Option<&ConstValue> {
        match self.values.get(name) {
            Some(ArgValue::Value(value)) => Some(value),
            _ => None,
        }
    }
}
