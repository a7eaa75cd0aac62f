//! Schema description
//!
//! Entity shapes, field types with nullability, arguments, the category enum
//! and the `DateTime` scalar. The executor consults it for nullability and
//! field existence; the transport serves it as SDL. Introspection types live
//! alongside as [`SystemTypes`] and are left out of the SDL.

use std::fmt;

use indexmap::IndexMap;

use crate::graphql::introspection;
use crate::graphql::scalars::DATE_TIME;
use crate::store::PhotoCategory;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeRef {
    Named(&'static str),
    List(Box<TypeRef>),
    NonNull(Box<TypeRef>),
}

impl TypeRef {
    pub fn named(name: &'static str) -> Self {
        TypeRef::Named(name)
    }

    pub fn non_null(self) -> Self {
        TypeRef::NonNull(Box::new(self))
    }

    pub fn list(self) -> Self {
        TypeRef::List(Box::new(self))
    }

    pub fn is_non_null(&self) -> bool {
        matches!(self, TypeRef::NonNull(_))
    }

    /// Innermost named type
    pub fn named_type(&self) -> &'static str {
        match self {
            TypeRef::Named(name) => name,
            TypeRef::List(inner) | TypeRef::NonNull(inner) => inner.named_type(),
        }
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeRef::Named(name) => f.write_str(name),
            TypeRef::List(inner) => write!(f, "[{}]", inner),
            TypeRef::NonNull(inner) => write!(f, "{}!", inner),
        }
    }
}

/// Scalars every schema has without declaring them
pub const BUILT_IN_SCALARS: [&str; 4] = ["Boolean", "ID", "Int", "String"];

/// Kind of a type as reported by introspection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeKind {
    Scalar,
    Object,
    Enum,
    InputObject,
    List,
    NonNull,
}

impl TypeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TypeKind::Scalar => "SCALAR",
            TypeKind::Object => "OBJECT",
            TypeKind::Enum => "ENUM",
            TypeKind::InputObject => "INPUT_OBJECT",
            TypeKind::List => "LIST",
            TypeKind::NonNull => "NON_NULL",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ArgumentDef {
    pub name: &'static str,
    pub ty: TypeRef,
    /// Default value, in SDL syntax
    pub default_value: Option<&'static str>,
}

impl ArgumentDef {
    pub fn new(name: &'static str, ty: TypeRef) -> Self {
        Self {
            name,
            ty,
            default_value: None,
        }
    }

    pub fn with_default(mut self, default_value: &'static str) -> Self {
        self.default_value = Some(default_value);
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FieldDef {
    pub name: &'static str,
    pub ty: TypeRef,
    pub arguments: Vec<ArgumentDef>,
    pub description: Option<&'static str>,
}

impl FieldDef {
    pub fn new(name: &'static str, ty: TypeRef) -> Self {
        Self {
            name,
            ty,
            arguments: Vec::new(),
            description: None,
        }
    }

    pub fn argument(mut self, argument: ArgumentDef) -> Self {
        self.arguments.push(argument);
        self
    }

    pub fn describe(mut self, description: &'static str) -> Self {
        self.description = Some(description);
        self
    }

    pub fn find_argument(&self, name: &str) -> Option<&ArgumentDef> {
        self.arguments.iter().find(|arg| arg.name == name)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ObjectDef {
    pub name: &'static str,
    pub fields: Vec<FieldDef>,
}

impl ObjectDef {
    pub fn field(&self, name: &str) -> Option<&FieldDef> {
        self.fields.iter().find(|field| field.name == name)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct InputObjectDef {
    pub name: &'static str,
    pub fields: Vec<ArgumentDef>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EnumDef {
    pub name: &'static str,
    pub values: Vec<&'static str>,
}

#[derive(Debug, Clone)]
pub struct ScalarDef {
    pub name: &'static str,
    pub description: &'static str,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DirectiveDef {
    pub name: &'static str,
    pub description: &'static str,
    pub locations: Vec<&'static str>,
    pub arguments: Vec<ArgumentDef>,
}

/// Introspection object types and enums plus the `__schema`/`__type` root fields
#[derive(Debug, Clone, Default)]
pub struct SystemTypes {
    pub objects: IndexMap<&'static str, ObjectDef>,
    pub enums: Vec<EnumDef>,
    pub meta_fields: Vec<FieldDef>,
}

#[derive(Debug, Clone)]
pub struct SchemaDef {
    pub query: &'static str,
    pub mutation: &'static str,
    pub scalars: Vec<ScalarDef>,
    pub enums: Vec<EnumDef>,
    pub objects: IndexMap<&'static str, ObjectDef>,
    pub inputs: Vec<InputObjectDef>,
    pub directives: Vec<DirectiveDef>,
    pub system: SystemTypes,
}

impl SchemaDef {
    /// The PhotoShare schema
    pub fn photoshare() -> Self {
        let id = || TypeRef::named("ID").non_null();
        let string = || TypeRef::named("String");
        let photos = || TypeRef::named("Photo").non_null().list().non_null();
        let users = || TypeRef::named("User").non_null().list().non_null();

        let user = ObjectDef {
            name: "User",
            fields: vec![
                FieldDef::new("githubLogin", id()),
                FieldDef::new("name", string()),
                FieldDef::new("avatar", string()),
                FieldDef::new("postedPhotos", photos()).describe("Photos this user posted"),
                FieldDef::new("inPhotos", photos()).describe("Photos this user is tagged in"),
            ],
        };

        let photo = ObjectDef {
            name: "Photo",
            fields: vec![
                FieldDef::new("id", id()),
                FieldDef::new("url", string().non_null()),
                FieldDef::new("name", string().non_null()),
                FieldDef::new("description", string()),
                FieldDef::new("category", TypeRef::named("PhotoCategory").non_null()),
                FieldDef::new("postedBy", TypeRef::named("User")),
                FieldDef::new("taggedUsers", users()),
                FieldDef::new("created", TypeRef::named(DATE_TIME).non_null()),
            ],
        };

        let query = ObjectDef {
            name: "Query",
            fields: vec![
                FieldDef::new("totalPhotos", TypeRef::named("Int").non_null()),
                FieldDef::new("allPhotos", photos())
                    .argument(ArgumentDef::new("after", TypeRef::named(DATE_TIME))),
            ],
        };

        let mutation = ObjectDef {
            name: "Mutation",
            fields: vec![FieldDef::new("postPhoto", TypeRef::named("Photo").non_null())
                .argument(ArgumentDef::new("input", TypeRef::named("PostPhotoInput")))],
        };

        let post_photo_input = InputObjectDef {
            name: "PostPhotoInput",
            fields: vec![
                ArgumentDef::new("name", string().non_null()),
                ArgumentDef::new("category", TypeRef::named("PhotoCategory"))
                    .with_default(PhotoCategory::default().as_str()),
                ArgumentDef::new("description", string()),
            ],
        };

        let objects = [user, photo, query, mutation]
            .into_iter()
            .map(|object| (object.name, object))
            .collect();

        Self {
            query: "Query",
            mutation: "Mutation",
            scalars: vec![ScalarDef {
                name: DATE_TIME,
                description: "A valid date time value",
            }],
            enums: vec![EnumDef {
                name: "PhotoCategory",
                values: PhotoCategory::ALL.iter().map(|c| c.as_str()).collect(),
            }],
            objects,
            inputs: vec![post_photo_input],
            directives: introspection::built_in_directives(),
            system: introspection::system_types(),
        }
    }

    /// Object type by name, introspection types included
    pub fn object(&self, name: &str) -> Option<&ObjectDef> {
        self.objects
            .get(name)
            .or_else(|| self.system.objects.get(name))
    }

    /// `__schema` or `__type`, available on the query root only
    pub fn meta_field(&self, name: &str) -> Option<&FieldDef> {
        self.system.meta_fields.iter().find(|field| field.name == name)
    }

    pub fn enum_def(&self, name: &str) -> Option<&EnumDef> {
        self.enums
            .iter()
            .chain(&self.system.enums)
            .find(|enum_def| enum_def.name == name)
    }

    pub fn input(&self, name: &str) -> Option<&InputObjectDef> {
        self.inputs.iter().find(|input| input.name == name)
    }

    /// Every named type, built-in scalars and introspection types included
    pub fn type_names(&self) -> Vec<&'static str> {
        let mut names: Vec<&'static str> = BUILT_IN_SCALARS.to_vec();
        names.extend(self.scalars.iter().map(|scalar| scalar.name));
        names.extend(self.enums.iter().map(|enum_def| enum_def.name));
        names.extend(self.objects.keys().copied());
        names.extend(self.inputs.iter().map(|input| input.name));
        names.extend(self.system.objects.keys().copied());
        names.extend(self.system.enums.iter().map(|enum_def| enum_def.name));
        names
    }

    /// The schema's own copy of a type name
    pub fn find_type(&self, name: &str) -> Option<&'static str> {
        self.type_names().into_iter().find(|known| *known == name)
    }

    pub fn kind_of(&self, name: &str) -> Option<TypeKind> {
        let is_scalar = BUILT_IN_SCALARS.iter().any(|scalar| *scalar == name)
            || self.scalars.iter().any(|scalar| scalar.name == name);
        if is_scalar {
            Some(TypeKind::Scalar)
        } else if self.object(name).is_some() {
            Some(TypeKind::Object)
        } else if self.enum_def(name).is_some() {
            Some(TypeKind::Enum)
        } else if self.input(name).is_some() {
            Some(TypeKind::InputObject)
        } else {
            None
        }
    }

    pub fn description_of(&self, name: &str) -> Option<&'static str> {
        self.scalars
            .iter()
            .find(|scalar| scalar.name == name)
            .map(|scalar| scalar.description)
    }

    pub fn query_type(&self) -> Option<&ObjectDef> {
        self.object(self.query)
    }

    pub fn mutation_type(&self) -> Option<&ObjectDef> {
        self.object(self.mutation)
    }

    /// Render the schema in GraphQL SDL
    pub fn sdl(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for SchemaDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for scalar in &self.scalars {
            writeln!(f, "\"{}\"\nscalar {}\n", scalar.description, scalar.name)?;
        }

        for enum_def in &self.enums {
            writeln!(f, "enum {} {{", enum_def.name)?;
            for value in &enum_def.values {
                writeln!(f, "  {}", value)?;
            }
            f.write_str("}\n\n")?;
        }

        for object in self.objects.values() {
            writeln!(f, "type {} {{", object.name)?;
            for field in &object.fields {
                if let Some(description) = field.description {
                    writeln!(f, "  \"{}\"", description)?;
                }
                f.write_str("  ")?;
                f.write_str(field.name)?;
                if !field.arguments.is_empty() {
                    f.write_str("(")?;
                    for (index, argument) in field.arguments.iter().enumerate() {
                        if index > 0 {
                            f.write_str(", ")?;
                        }
                        write!(f, "{}", argument)?;
                    }
                    f.write_str(")")?;
                }
                writeln!(f, ": {}", field.ty)?;
            }
            f.write_str("}\n\n")?;
        }

        for input in &self.inputs {
            writeln!(f, "input {} {{", input.name)?;
            for field in &input.fields {
                writeln!(f, "  {}", field)?;
            }
            f.write_str("}\n\n")?;
        }

        writeln!(
            f,
            "schema {{\n  query: {}\n  mutation: {}\n}}",
            self.query, self.mutation
        )
    }
}

impl fmt::Display for ArgumentDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.name, self.ty)?;
        if let Some(default_value) = self.default_value {
            write!(f, " = {}", default_value)?;
        }
        Ok(())
    }
}
