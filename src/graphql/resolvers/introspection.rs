use async_graphql_value::{ConstValue, Name};

use crate::errors::QueryResult;
use crate::graphql::resolvers::{ResolverContext, ResolverRegistry};
use crate::graphql::schema::{SchemaDef, TypeKind, TypeRef};
use crate::graphql::types::{Arguments, Entity, Resolved};

pub(super) fn register(registry: &mut ResolverRegistry) {
    registry.register("Query", "__schema", resolve_schema);
    registry.register("Query", "__type", resolve_type);

    registry.register("__Schema", "types", resolve_types);
    registry.register("__Schema", "queryType", resolve_query_type);
    registry.register("__Schema", "mutationType", resolve_mutation_type);
    registry.register("__Schema", "directives", resolve_directives);

    registry.register("__Type", "kind", resolve_kind);
    registry.register("__Type", "description", resolve_type_description);
    registry.register("__Type", "fields", resolve_fields);
    registry.register("__Type", "interfaces", resolve_interfaces);
    registry.register("__Type", "enumValues", resolve_enum_values);
    registry.register("__Type", "inputFields", resolve_input_fields);
    registry.register("__Type", "ofType", resolve_of_type);

    registry.register("__Field", "args", resolve_args);
    registry.register("__Field", "type", resolve_value_type);
    registry.register("__InputValue", "type", resolve_value_type);
    registry.register("__Directive", "args", resolve_args);
}

/// Kind of a type reference; `None` for names the schema does not know
pub fn kind(schema: &SchemaDef, ty: &TypeRef) -> Option<TypeKind> {
    match ty {
        TypeRef::Named(name) => schema.kind_of(name),
        TypeRef::List(_) => Some(TypeKind::List),
        TypeRef::NonNull(_) => Some(TypeKind::NonNull),
    }
}

fn named_type(name: &'static str) -> Resolved {
    Resolved::Object(Entity::Type(TypeRef::named(name)))
}

/// Name of a named type reference, skipping wrappers
fn named(entity: &Entity) -> Option<&'static str> {
    match entity {
        Entity::Type(TypeRef::Named(name)) => Some(*name),
        _ => None,
    }
}

fn resolve_schema(_: &Entity, _: &Arguments, _: &ResolverContext<'_>) -> QueryResult<Resolved> {
    Ok(Resolved::Object(Entity::Schema))
}

fn resolve_type(_: &Entity, args: &Arguments, ctx: &ResolverContext<'_>) -> QueryResult<Resolved> {
    let name = match args.value("name") {
        Some(ConstValue::String(name)) => name.as_str(),
        _ => return Ok(Resolved::Null),
    };
    Ok(ctx.schema.find_type(name).map_or(Resolved::Null, named_type))
}

fn resolve_types(_: &Entity, _: &Arguments, ctx: &ResolverContext<'_>) -> QueryResult<Resolved> {
    Ok(Resolved::List(ctx.schema.type_names().into_iter().map(named_type).collect()))
}

fn resolve_query_type(
    _: &Entity,
    _: &Arguments,
    ctx: &ResolverContext<'_>,
) -> QueryResult<Resolved> {
    Ok(named_type(ctx.schema.query))
}

fn resolve_mutation_type(
    _: &Entity,
    _: &Arguments,
    ctx: &ResolverContext<'_>,
) -> QueryResult<Resolved> {
    Ok(ctx
        .schema
        .mutation_type()
        .map_or(Resolved::Null, |mutation| named_type(mutation.name)))
}

fn resolve_directives(
    _: &Entity,
    _: &Arguments,
    ctx: &ResolverContext<'_>,
) -> QueryResult<Resolved> {
    Ok(Resolved::objects(
        ctx.schema.directives.iter().cloned().map(Entity::Directive),
    ))
}

fn resolve_kind(
    entity: &Entity,
    _: &Arguments,
    ctx: &ResolverContext<'_>,
) -> QueryResult<Resolved> {
    let Entity::Type(ty) = entity else {
        return Ok(Resolved::Null);
    };
    Ok(kind(ctx.schema, ty).map_or(Resolved::Null, |kind| {
        Resolved::Leaf(ConstValue::Enum(Name::new(kind.as_str())))
    }))
}

fn resolve_type_description(
    entity: &Entity,
    _: &Arguments,
    ctx: &ResolverContext<'_>,
) -> QueryResult<Resolved> {
    Ok(named(entity)
        .and_then(|name| ctx.schema.description_of(name))
        .map_or(Resolved::Null, |text| Resolved::leaf(text.to_string())))
}

fn resolve_fields(
    entity: &Entity,
    _: &Arguments,
    ctx: &ResolverContext<'_>,
) -> QueryResult<Resolved> {
    Ok(named(entity)
        .and_then(|name| ctx.schema.object(name))
        .map_or(Resolved::Null, |object| {
            Resolved::objects(object.fields.iter().cloned().map(Entity::Field))
        }))
}

fn resolve_interfaces(
    entity: &Entity,
    _: &Arguments,
    ctx: &ResolverContext<'_>,
) -> QueryResult<Resolved> {
    Ok(match named(entity).and_then(|name| ctx.schema.object(name)) {
        Some(_) => Resolved::List(Vec::new()),
        None => Resolved::Null,
    })
}

fn resolve_enum_values(
    entity: &Entity,
    _: &Arguments,
    ctx: &ResolverContext<'_>,
) -> QueryResult<Resolved> {
    Ok(named(entity)
        .and_then(|name| ctx.schema.enum_def(name))
        .map_or(Resolved::Null, |enum_def| {
            Resolved::objects(enum_def.values.iter().copied().map(Entity::EnumValue))
        }))
}

fn resolve_input_fields(
    entity: &Entity,
    _: &Arguments,
    ctx: &ResolverContext<'_>,
) -> QueryResult<Resolved> {
    Ok(named(entity)
        .and_then(|name| ctx.schema.input(name))
        .map_or(Resolved::Null, |input| {
            Resolved::objects(input.fields.iter().cloned().map(Entity::InputValue))
        }))
}

fn resolve_of_type(
    entity: &Entity,
    _: &Arguments,
    _: &ResolverContext<'_>,
) -> QueryResult<Resolved> {
    Ok(match entity {
        Entity::Type(TypeRef::List(inner) | TypeRef::NonNull(inner)) => {
            Resolved::Object(Entity::Type((**inner).clone()))
        }
        _ => Resolved::Null,
    })
}

fn resolve_args(entity: &Entity, _: &Arguments, _: &ResolverContext<'_>) -> QueryResult<Resolved> {
    let arguments = match entity {
        Entity::Field(field) => &field.arguments,
        Entity::Directive(directive) => &directive.arguments,
        _ => return Ok(Resolved::Null),
    };
    Ok(Resolved::objects(arguments.iter().cloned().map(Entity::InputValue)))
}

fn resolve_value_type(
    entity: &Entity,
    _: &Arguments,
    _: &ResolverContext<'_>,
) -> QueryResult<Resolved> {
    let ty = match entity {
        Entity::Field(field) => &field.ty,
        Entity::InputValue(argument) => &argument.ty,
        _ => return Ok(Resolved::Null),
    };
    Ok(Resolved::Object(Entity::Type(ty.clone())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graphql::executor::execute_query;
    use crate::graphql::resolvers::ResolverSettings;
    use crate::graphql::selection::{fields, InputValue, SelectedField};
    use crate::graphql::GraphQLContext;
    use crate::store::default_seed;
    use serde_json::json;

    fn context() -> GraphQLContext {
        GraphQLContext::from_seed(default_seed(), ResolverSettings::default()).unwrap()
    }

    fn type_named(name: &str) -> SelectedField {
        SelectedField::new("__type").argument(
            "name",
            InputValue::Literal(ConstValue::String(name.to_string())),
        )
    }

    #[test]
    fn kinds_follow_wrappers() {
        let schema = SchemaDef::photoshare();
        let created = TypeRef::named("DateTime").non_null();

        assert_eq!(kind(&schema, &created), Some(TypeKind::NonNull));
        assert_eq!(kind(&schema, &created.clone().list()), Some(TypeKind::List));
        assert_eq!(kind(&schema, &TypeRef::named("DateTime")), Some(TypeKind::Scalar));
        assert_eq!(kind(&schema, &TypeRef::named("Lens")), None);
    }

    #[test]
    fn type_lists_enum_values() {
        let ctx = context();
        let selection = vec![type_named("PhotoCategory").select(vec![
            SelectedField::new("kind"),
            SelectedField::new("enumValues").select(fields(&["name"])),
        ])];

        let result = execute_query(&ctx, &selection);
        assert!(result.is_ok(), "{:?}", result.errors);
        assert_eq!(
            result.data.into_json().unwrap(),
            json!({ "__type": {
                "kind": "ENUM",
                "enumValues": [
                    { "name": "SELFIE" },
                    { "name": "PORTRAIT" },
                    { "name": "ACTION" },
                    { "name": "LANDSCAPE" },
                    { "name": "GRAPHIC" },
                ],
            }})
        );
    }

    #[test]
    fn unknown_type_is_null() {
        let ctx = context();
        let selection = vec![type_named("Lens").select(fields(&["name"]))];

        let result = execute_query(&ctx, &selection);
        assert!(result.is_ok());
        assert_eq!(result.data.into_json().unwrap(), json!({ "__type": null }));
    }

    #[test]
    fn field_types_unwrap_through_of_type() {
        let ctx = context();
        let type_ref = vec![
            SelectedField::new("kind"),
            SelectedField::new("name"),
            SelectedField::new("ofType").select(fields(&["kind", "name"])),
        ];
        let selection = vec![type_named("Photo").select(vec![SelectedField::new("fields")
            .select(vec![
                SelectedField::new("name"),
                SelectedField::new("type").select(type_ref),
            ])])];

        let result = execute_query(&ctx, &selection);
        assert!(result.is_ok(), "{:?}", result.errors);

        let data = result.data.into_json().unwrap();
        let created = data["__type"]["fields"]
            .as_array()
            .unwrap()
            .iter()
            .find(|field| field["name"] == "created")
            .unwrap();
        assert_eq!(
            created["type"],
            json!({
                "kind": "NON_NULL",
                "name": null,
                "ofType": { "kind": "SCALAR", "name": "DateTime" },
            })
        );
    }

    #[test]
    fn input_fields_carry_defaults() {
        let ctx = context();
        let selection = vec![type_named("PostPhotoInput").select(vec![
            SelectedField::new("kind"),
            SelectedField::new("inputFields").select(fields(&["name", "defaultValue"])),
        ])];

        let result = execute_query(&ctx, &selection);
        assert!(result.is_ok(), "{:?}", result.errors);
        assert_eq!(
            result.data.into_json().unwrap(),
            json!({ "__type": {
                "kind": "INPUT_OBJECT",
                "inputFields": [
                    { "name": "name", "defaultValue": null },
                    { "name": "category", "defaultValue": "PORTRAIT" },
                    { "name": "description", "defaultValue": null },
                ],
            }})
        );
    }

    #[test]
    fn schema_is_only_reachable_from_query() {
        let ctx = context();
        let selection = vec![SelectedField::new("allPhotos")
            .select(vec![SelectedField::new("__schema").select(fields(&["description"]))])];

        let result = execute_query(&ctx, &selection);
        assert_eq!(result.errors.len(), 3);
        assert!(result
            .errors
            .iter()
            .all(|error| error.error.error_code() == "UNKNOWN_FIELD"));
    }
}
