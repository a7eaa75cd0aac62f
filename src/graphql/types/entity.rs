use async_graphql_value::{ConstValue, Name};

use crate::graphql::schema::{ArgumentDef, DirectiveDef, FieldDef, TypeRef};
use crate::store::{Photo, User};

/// Object value flowing through the executor
#[derive(Debug, Clone, PartialEq)]
pub enum Entity {
    Query,
    Photo(Photo),
    User(User),
    Schema,
    Type(TypeRef),
    Field(FieldDef),
    InputValue(ArgumentDef),
    EnumValue(&'static str),
    Directive(DirectiveDef),
}

impl Entity {
    pub fn type_name(&self) -> &'static str {
        match self {
            Entity::Query => "Query",
            Entity::Photo(_) => "Photo",
            Entity::User(_) => "User",
            Entity::Schema => "__Schema",
            Entity::Type(_) => "__Type",
            Entity::Field(_) => "__Field",
            Entity::InputValue(_) => "__InputValue",
            Entity::EnumValue(_) => "__EnumValue",
            Entity::Directive(_) => "__Directive",
        }
    }

    pub fn as_photo(&self) -> Option<&Photo> {
        match self {
            Entity::Photo(photo) => Some(photo),
            _ => None,
        }
    }

    pub fn as_user(&self) -> Option<&User> {
        match self {
            Entity::User(user) => Some(user),
            _ => None,
        }
    }

    /// Same-named stored attribute, used when a field has no resolver
    pub fn attribute(&self, field: &str) -> Option<ConstValue> {
        match (self, field) {
            (Entity::Photo(photo), "id") => Some(string(&photo.id)),
            (Entity::Photo(photo), "name") => Some(string(&photo.name)),
            (Entity::Photo(photo), "description") => photo.description.as_deref().map(string),
            (Entity::Photo(photo), "category") => {
                Some(ConstValue::Enum(Name::new(photo.category.as_str())))
            }
            (Entity::User(user), "githubLogin") => Some(string(&user.github_login)),
            (Entity::User(user), "name") => user.name.as_deref().map(string),
            (Entity::User(user), "avatar") => user.avatar.as_deref().map(string),
            (Entity::Type(TypeRef::Named(name)), "name") => Some(string(name)),
            (Entity::Field(field), "name") => Some(string(field.name)),
            (Entity::Field(field), "description") => field.description.map(string),
            (Entity::InputValue(argument), "name") => Some(string(argument.name)),
            (Entity::InputValue(argument), "defaultValue") => {
                argument.default_value.map(string)
            }
            (Entity::EnumValue(name), "name") => Some(string(name)),
            (Entity::Directive(directive), "name") => Some(string(directive.name)),
            (Entity::Directive(directive), "description") => Some(string(directive.description)),
            (Entity::Directive(directive), "locations") => Some(ConstValue::List(
                directive
                    .locations
                    .iter()
                    .map(|location| ConstValue::Enum(Name::new(location)))
                    .collect(),
            )),
            (
                Entity::Field(_) | Entity::InputValue(_) | Entity::EnumValue(_),
                "isDeprecated",
            ) => Some(ConstValue::Boolean(false)),
            (Entity::Directive(_), "isRepeatable") => Some(ConstValue::Boolean(false)),
            _ => None,
        }
    }
}

/// Result of invoking a resolver, before completion against the schema
#[derive(Debug, Clone, PartialEq)]
pub enum Resolved {
    Null,
    Leaf(ConstValue),
    Object(Entity),
    List(Vec<Resolved>),
}

impl Resolved {
    pub fn leaf(value: impl Into<ConstValue>) -> Self {
        Resolved::Leaf(value.into())
    }

    pub fn optional(entity: Option<Entity>) -> Self {
        entity.map_or(Resolved::Null, Resolved::Object)
    }

    pub fn objects(entities: impl IntoIterator<Item = Entity>) -> Self {
        Resolved::List(entities.into_iter().map(Resolved::Object).collect())
    }

    /// Wrap a stored value, turning lists into per-item results
    pub fn from_value(value: ConstValue) -> Self {
        match value {
            ConstValue::Null => Resolved::Null,
            ConstValue::List(items) => {
                Resolved::List(items.into_iter().map(Resolved::from_value).collect())
            }
            other => Resolved::Leaf(other),
        }
    }
}

fn string(text: &str) -> ConstValue {
    ConstValue::String(text.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graphql::scalars::Timestamp;
    use crate::store::PhotoCategory;

    #[test]
    fn default_resolution_reads_stored_attributes() {
        let photo = Entity::Photo(Photo {
            id: "7".to_string(),
            name: "Cornice".to_string(),
            description: None,
            category: PhotoCategory::Graphic,
            github_user: Some("gPlake".to_string()),
            created: Timestamp::raw("1-2-1985"),
        });

        assert_eq!(photo.attribute("name"), Some(ConstValue::String("Cornice".to_string())));
        assert_eq!(photo.attribute("description"), None);
        assert_eq!(
            photo.attribute("category"),
            Some(ConstValue::Enum(Name::new("GRAPHIC")))
        );
        assert_eq!(photo.attribute("githubUser"), None);
    }

    #[test]
    fn introspection_entities_expose_names() {
        let named = Entity::Type(TypeRef::named("Photo"));
        assert_eq!(named.type_name(), "__Type");
        assert_eq!(named.attribute("name"), Some(string("Photo")));

        let wrapped = Entity::Type(TypeRef::named("Photo").non_null());
        assert_eq!(wrapped.attribute("name"), None);

        let value = Entity::EnumValue("SELFIE");
        assert_eq!(value.attribute("name"), Some(string("SELFIE")));
        assert_eq!(value.attribute("isDeprecated"), Some(ConstValue::Boolean(false)));
    }

    #[test]
    fn stored_lists_resolve_per_item() {
        let value = ConstValue::List(vec![
            ConstValue::Enum(Name::new("FIELD")),
            ConstValue::Null,
        ]);
        assert_eq!(
            Resolved::from_value(value),
            Resolved::List(vec![
                Resolved::Leaf(ConstValue::Enum(Name::new("FIELD"))),
                Resolved::Null,
            ])
        );
    }
}
