//! Introspection types
//!
//! `__Schema`, `__Type` and friends, described with the same definitions as
//! the PhotoShare types so the executor walks them like any other object.
//! Their resolvers live in [`crate::graphql::resolvers::introspection`].

use indexmap::IndexMap;

use crate::graphql::schema::{
    ArgumentDef, DirectiveDef, EnumDef, FieldDef, ObjectDef, SystemTypes, TypeRef,
};

const TYPE_KINDS: &[&str] = &[
    "SCALAR",
    "OBJECT",
    "INTERFACE",
    "UNION",
    "ENUM",
    "INPUT_OBJECT",
    "LIST",
    "NON_NULL",
];

const DIRECTIVE_LOCATIONS: &[&str] = &[
    "QUERY",
    "MUTATION",
    "SUBSCRIPTION",
    "FIELD",
    "FRAGMENT_DEFINITION",
    "FRAGMENT_SPREAD",
    "INLINE_FRAGMENT",
    "VARIABLE_DEFINITION",
    "SCHEMA",
    "SCALAR",
    "OBJECT",
    "FIELD_DEFINITION",
    "ARGUMENT_DEFINITION",
    "INTERFACE",
    "UNION",
    "ENUM",
    "ENUM_VALUE",
    "INPUT_OBJECT",
    "INPUT_FIELD_DEFINITION",
];

/// `@skip` and `@include`, the directives the selection lowering honours
pub fn built_in_directives() -> Vec<DirectiveDef> {
    let condition = || ArgumentDef::new("if", TypeRef::named("Boolean").non_null());
    let locations = || vec!["FIELD", "FRAGMENT_SPREAD", "INLINE_FRAGMENT"];

    vec![
        DirectiveDef {
            name: "skip",
            description: "Directs the executor to skip this field or fragment when the `if` \
                          argument is true.",
            locations: locations(),
            arguments: vec![condition()],
        },
        DirectiveDef {
            name: "include",
            description: "Directs the executor to include this field or fragment only when the \
                          `if` argument is true.",
            locations: locations(),
            arguments: vec![condition()],
        },
    ]
}

pub fn system_types() -> SystemTypes {
    let string = || TypeRef::named("String");
    let boolean = || TypeRef::named("Boolean").non_null();
    let ty = || TypeRef::named("__Type");
    let list_of = |name: &'static str| TypeRef::named(name).non_null().list();
    let include_deprecated =
        || ArgumentDef::new("includeDeprecated", TypeRef::named("Boolean")).with_default("false");

    let schema = ObjectDef {
        name: "__Schema",
        fields: vec![
            FieldDef::new("description", string()),
            FieldDef::new("types", list_of("__Type").non_null()),
            FieldDef::new("queryType", ty().non_null()),
            FieldDef::new("mutationType", ty()),
            FieldDef::new("subscriptionType", ty()),
            FieldDef::new("directives", list_of("__Directive").non_null()),
        ],
    };

    let type_ = ObjectDef {
        name: "__Type",
        fields: vec![
            FieldDef::new("kind", TypeRef::named("__TypeKind").non_null()),
            FieldDef::new("name", string()),
            FieldDef::new("description", string()),
            FieldDef::new("specifiedByURL", string()),
            FieldDef::new("fields", list_of("__Field")).argument(include_deprecated()),
            FieldDef::new("interfaces", list_of("__Type")),
            FieldDef::new("possibleTypes", list_of("__Type")),
            FieldDef::new("enumValues", list_of("__EnumValue")).argument(include_deprecated()),
            FieldDef::new("inputFields", list_of("__InputValue")).argument(include_deprecated()),
            FieldDef::new("ofType", ty()),
        ],
    };

    let field = ObjectDef {
        name: "__Field",
        fields: vec![
            FieldDef::new("name", string().non_null()),
            FieldDef::new("description", string()),
            FieldDef::new("args", list_of("__InputValue").non_null())
                .argument(include_deprecated()),
            FieldDef::new("type", ty().non_null()),
            FieldDef::new("isDeprecated", boolean()),
            FieldDef::new("deprecationReason", string()),
        ],
    };

    let input_value = ObjectDef {
        name: "__InputValue",
        fields: vec![
            FieldDef::new("name", string().non_null()),
            FieldDef::new("description", string()),
            FieldDef::new("type", ty().non_null()),
            FieldDef::new("defaultValue", string()),
            FieldDef::new("isDeprecated", boolean()),
            FieldDef::new("deprecationReason", string()),
        ],
    };

    let enum_value = ObjectDef {
        name: "__EnumValue",
        fields: vec![
            FieldDef::new("name", string().non_null()),
            FieldDef::new("description", string()),
            FieldDef::new("isDeprecated", boolean()),
            FieldDef::new("deprecationReason", string()),
        ],
    };

    let directive = ObjectDef {
        name: "__Directive",
        fields: vec![
            FieldDef::new("name", string().non_null()),
            FieldDef::new("description", string()),
            FieldDef::new("locations", list_of("__DirectiveLocation").non_null()),
            FieldDef::new("args", list_of("__InputValue").non_null())
                .argument(include_deprecated()),
            FieldDef::new("isRepeatable", boolean()),
        ],
    };

    let objects: IndexMap<_, _> = [schema, type_, field, input_value, enum_value, directive]
        .into_iter()
        .map(|object| (object.name, object))
        .collect();

    SystemTypes {
        objects,
        enums: vec![
            EnumDef {
                name: "__TypeKind",
                values: TYPE_KINDS.to_vec(),
            },
            EnumDef {
                name: "__DirectiveLocation",
                values: DIRECTIVE_LOCATIONS.to_vec(),
            },
        ],
        meta_fields: vec![
            FieldDef::new("__schema", TypeRef::named("__Schema").non_null()),
            FieldDef::new("__type", ty())
                .argument(ArgumentDef::new("name", string().non_null())),
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn type_fields_take_include_deprecated() {
        let types = system_types();
        let type_ = &types.objects["__Type"];

        for name in ["fields", "enumValues", "inputFields"] {
            let field = type_.field(name).unwrap();
            let argument = field.find_argument("includeDeprecated").unwrap();
            assert_eq!(argument.default_value, Some("false"));
        }
        assert!(type_.field("ofType").unwrap().arguments.is_empty());
    }

    #[test]
    fn meta_fields_cover_schema_and_type() {
        let types = system_types();
        let names: Vec<_> = types.meta_fields.iter().map(|field| field.name).collect();
        assert_eq!(names, vec!["__schema", "__type"]);
        assert_eq!(types.meta_fields[1].arguments[0].ty.to_string(), "String!");
    }

    #[test]
    fn directives_apply_to_fields_and_fragments() {
        for directive in built_in_directives() {
            assert_eq!(directive.arguments[0].name, "if");
            assert!(directive.locations.contains(&"FIELD"));
        }
    }
}
