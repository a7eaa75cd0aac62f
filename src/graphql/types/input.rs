use async_graphql_value::ConstValue;

use crate::errors::{QueryError, QueryResult};
use crate::store::PhotoCategory;

/// Validated `PostPhotoInput`
#[derive(Debug, Clone, PartialEq)]
pub struct PostPhotoInput {
    pub name: String,
    pub category: PhotoCategory,
    pub description: Option<String>,
}

impl PostPhotoInput {
    /// Validate a raw input object.
    ///
    /// `name` must be a non-blank string, `category` one of the five enum
    /// values (or absent, meaning `PORTRAIT`) and `description` a string.
    /// Enum values arrive as enum literals inline and as strings through
    /// variables; both are accepted.
    pub fn from_value(value: Option<&ConstValue>) -> QueryResult<Self> {
        let fields = match value {
            Some(ConstValue::Object(fields)) => fields,
            None | Some(ConstValue::Null) => {
                return Err(QueryError::validation("input", "is required"))
            }
            Some(_) => return Err(QueryError::validation("input", "must be an object")),
        };

        if let Some(unknown) = fields
            .keys()
            .find(|key| !matches!(key.as_str(), "name" | "category" | "description"))
        {
            return Err(QueryError::validation(
                unknown.as_str(),
                "is not a field of PostPhotoInput",
            ));
        }

        let name = match fields.get("name") {
            Some(ConstValue::String(name)) if !name.trim().is_empty() => name.clone(),
            Some(ConstValue::String(_)) => {
                return Err(QueryError::validation("name", "must not be empty"))
            }
            None | Some(ConstValue::Null) => {
                return Err(QueryError::validation("name", "is required"))
            }
            Some(_) => return Err(QueryError::validation("name", "must be a string")),
        };

        let category = match fields.get("category") {
            None | Some(ConstValue::Null) => PhotoCategory::default(),
            Some(ConstValue::Enum(value)) => value.as_str().parse()?,
            Some(ConstValue::String(value)) => value.parse()?,
            Some(other) => {
                return Err(QueryError::validation(
                    "category",
                    format!("'{}' is not a valid PhotoCategory", other),
                ))
            }
        };

        let description = match fields.get("description") {
            None | Some(ConstValue::Null) => None,
            Some(ConstValue::String(description)) => Some(description.clone()),
            Some(_) => return Err(QueryError::validation("description", "must be a string")),
        };

        Ok(Self {
            name,
            category,
            description,
        })
    }
}
