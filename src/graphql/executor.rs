//! Query executor
//!
//! Walks a selection tree against the schema, invoking resolvers only for
//! selected fields. Field failures are recorded with their response path and
//! the field becomes null; when the field is non-nullable the null bubbles to
//! the nearest nullable ancestor. Nothing is retried.

use async_graphql::{PathSegment, Pos, Response, ServerError};
use async_graphql_value::{ConstValue, Name};
use indexmap::IndexMap;
use tracing::{debug, warn};

use crate::errors::{QueryError, QueryResult, ToGraphQLError};
use crate::graphql::context::GraphQLContext;
use crate::graphql::mutations;
use crate::graphql::resolvers::{ResolverContext, ResolverRegistry};
use crate::graphql::scalars::{DateTimeCodec, DATE_TIME};
use crate::graphql::schema::{FieldDef, ObjectDef, SchemaDef, TypeRef};
use crate::graphql::selection::{InputValue, Operation, OperationKind, SelectedField};
use crate::graphql::types::{ArgValue, Arguments, Entity, Resolved};
use crate::store::RecordStore;

/// An error attached to a position in the result tree
#[derive(Debug, Clone, PartialEq)]
pub struct FieldError {
    pub error: QueryError,
    pub path: Vec<PathSegment>,
    pub pos: Option<Pos>,
}

impl FieldError {
    /// Error that concerns the whole request rather than one field
    pub fn request(error: QueryError) -> Self {
        Self {
            error,
            path: Vec::new(),
            pos: None,
        }
    }

    pub fn to_server_error(&self) -> ServerError {
        let graphql_error = self.error.to_graphql_error();
        let mut server_error = ServerError::new(graphql_error.message, self.pos);
        server_error.path = self.path.clone();
        server_error.extensions = graphql_error.extensions;
        server_error
    }
}

/// Result tree plus the field errors collected while building it
#[derive(Debug, Clone, PartialEq)]
pub struct ExecutionResult {
    pub data: ConstValue,
    pub errors: Vec<FieldError>,
}

impl ExecutionResult {
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn into_response(self) -> Response {
        let mut response = Response::new(self.data);
        response.errors = self.errors.iter().map(FieldError::to_server_error).collect();
        response
    }
}

/// Execute a lowered operation
pub fn execute(ctx: &GraphQLContext, operation: &Operation) -> ExecutionResult {
    debug!(
        "Executing {:?} operation {}",
        operation.kind,
        operation.name.as_deref().unwrap_or("<anonymous>")
    );
    match operation.kind {
        OperationKind::Query => execute_query(ctx, &operation.selection),
        OperationKind::Mutation => execute_mutation(ctx, &operation.selection),
    }
}

/// Resolve query root fields against a read view of the store
pub fn execute_query(ctx: &GraphQLContext, selection: &[SelectedField]) -> ExecutionResult {
    let Some(query_type) = ctx.schema.query_type() else {
        return missing_root(ctx.schema.query);
    };

    let store = ctx.store.read();
    let mut execution = Execution::new(ctx, &store);
    let fields: Vec<&SelectedField> = selection.iter().collect();
    let data = execution
        .execute_object(query_type, &Entity::Query, &fields, &[])
        .map_or(ConstValue::Null, ConstValue::Object);

    ExecutionResult {
        data,
        errors: execution.errors,
    }
}

/// Run mutation root fields one after another.
///
/// Each root resolver runs under the write lock; its result is completed
/// against a read view taken afterwards. A null bubbling to the root stops
/// the remaining mutations.
pub fn execute_mutation(ctx: &GraphQLContext, selection: &[SelectedField]) -> ExecutionResult {
    let Some(mutation_type) = ctx.schema.mutation_type() else {
        return missing_root(ctx.schema.mutation);
    };

    let fields: Vec<&SelectedField> = selection.iter().collect();
    let mut data = IndexMap::new();
    let mut errors = Vec::new();

    for (key, grouped) in collect_fields(mutation_type.name, &fields) {
        let field = grouped[0];
        let path = vec![PathSegment::Field(key.to_string())];

        if field.name == "__typename" {
            data.insert(Name::new(key), ConstValue::String(mutation_type.name.to_string()));
            continue;
        }

        let selection = subselection(&grouped);
        let resolved = match mutation_type.field(&field.name) {
            Some(field_def) => check_selection(&ctx.schema, field_def, &selection)
                .and_then(|()| coerce_arguments(field_def, &field.arguments))
                .and_then(|args| {
                    let resolve = mutations::resolver(field_def.name)
                        .ok_or_else(|| unknown_field(mutation_type, field))?;
                    let mut store = ctx.store.write();
                    resolve(&mut store, &args)
                })
                .map(|resolved| (field_def, resolved)),
            None => Err(unknown_field(mutation_type, field)),
        };

        let store = ctx.store.read();
        let mut execution = Execution::new(ctx, &store);
        let completed = match resolved {
            Ok((field_def, resolved)) => execution.complete(
                &field_def.ty,
                resolved,
                &selection,
                &path,
                Origin::new(mutation_type, field_def),
                field.pos,
            ),
            Err(error) => {
                let non_null = mutation_type
                    .field(&field.name)
                    .map_or(false, |field_def| field_def.ty.is_non_null());
                execution.record(error, &path, field.pos);
                if non_null {
                    Err(Bubble)
                } else {
                    Ok(ConstValue::Null)
                }
            }
        };
        errors.append(&mut execution.errors);

        match completed {
            Ok(value) => {
                data.insert(Name::new(key), value);
            }
            Err(Bubble) => {
                return ExecutionResult {
                    data: ConstValue::Null,
                    errors,
                };
            }
        }
    }

    ExecutionResult {
        data: ConstValue::Object(data),
        errors,
    }
}

fn missing_root(name: &str) -> ExecutionResult {
    ExecutionResult {
        data: ConstValue::Null,
        errors: vec![FieldError::request(QueryError::UnknownOperation(format!(
            "schema has no {} type",
            name
        )))],
    }
}

fn unknown_field(object_type: &ObjectDef, field: &SelectedField) -> QueryError {
    QueryError::UnknownField {
        type_name: object_type.name.to_string(),
        field: field.name.clone(),
    }
}

/// Marker for a null that must propagate to the parent
struct Bubble;

#[derive(Clone, Copy)]
struct Origin {
    type_name: &'static str,
    field: &'static str,
}

impl Origin {
    fn new(object_type: &ObjectDef, field_def: &FieldDef) -> Self {
        Self {
            type_name: object_type.name,
            field: field_def.name,
        }
    }
}

struct Execution<'a> {
    schema: &'a SchemaDef,
    registry: &'a ResolverRegistry,
    resolver_ctx: ResolverContext<'a>,
    errors: Vec<FieldError>,
}

impl<'a> Execution<'a> {
    fn new(ctx: &'a GraphQLContext, store: &'a RecordStore) -> Self {
        Self {
            schema: &ctx.schema,
            registry: &ctx.registry,
            resolver_ctx: ResolverContext {
                store,
                settings: &ctx.settings,
                schema: &ctx.schema,
            },
            errors: Vec::new(),
        }
    }

    fn record(&mut self, error: QueryError, path: &[PathSegment], pos: Option<Pos>) {
        if error.is_client_error() {
            debug!("Field error at {:?}: {}", path, error);
        } else {
            warn!("Field error at {:?}: {}", path, error);
        }
        self.errors.push(FieldError {
            error,
            path: path.to_vec(),
            pos,
        });
    }

    fn execute_object(
        &mut self,
        object_type: &ObjectDef,
        entity: &Entity,
        fields: &[&SelectedField],
        path: &[PathSegment],
    ) -> Result<IndexMap<Name, ConstValue>, Bubble> {
        let mut object = IndexMap::new();

        for (key, grouped) in collect_fields(object_type.name, fields) {
            let value = self.execute_field(object_type, entity, key, &grouped, path)?;
            object.insert(Name::new(key), value);
        }

        Ok(object)
    }

    fn execute_field(
        &mut self,
        object_type: &ObjectDef,
        entity: &Entity,
        key: &str,
        fields: &[&SelectedField],
        path: &[PathSegment],
    ) -> Result<ConstValue, Bubble> {
        let field = fields[0];
        let path = child(path, PathSegment::Field(key.to_string()));

        if field.name == "__typename" {
            return Ok(ConstValue::String(object_type.name.to_string()));
        }

        let schema = self.schema;
        let field_def = object_type.field(&field.name).or_else(|| {
            (object_type.name == schema.query)
                .then(|| schema.meta_field(&field.name))
                .flatten()
        });
        let Some(field_def) = field_def else {
            self.record(unknown_field(object_type, field), &path, field.pos);
            return Ok(ConstValue::Null);
        };

        let subselection = subselection(fields);
        if let Err(error) = check_selection(self.schema, field_def, &subselection) {
            return self.fail(error, field_def, &path, field.pos);
        }

        let args = match coerce_arguments(field_def, &field.arguments) {
            Ok(args) => args,
            Err(error) => return self.fail(error, field_def, &path, field.pos),
        };

        let resolved = match self.registry.get(object_type.name, field_def.name) {
            Some(resolve) => {
                debug!("Resolving {}.{}", object_type.name, field_def.name);
                resolve(entity, &args, &self.resolver_ctx)
            }
            None => Ok(entity
                .attribute(field_def.name)
                .map_or(Resolved::Null, Resolved::from_value)),
        };

        match resolved {
            Ok(resolved) => self.complete(
                &field_def.ty,
                resolved,
                &subselection,
                &path,
                Origin::new(object_type, field_def),
                field.pos,
            ),
            Err(error) => self.fail(error, field_def, &path, field.pos),
        }
    }

    fn fail(
        &mut self,
        error: QueryError,
        field_def: &FieldDef,
        path: &[PathSegment],
        pos: Option<Pos>,
    ) -> Result<ConstValue, Bubble> {
        self.record(error, path, pos);
        if field_def.ty.is_non_null() {
            Err(Bubble)
        } else {
            Ok(ConstValue::Null)
        }
    }

    fn complete(
        &mut self,
        ty: &TypeRef,
        resolved: Resolved,
        selection: &[&SelectedField],
        path: &[PathSegment],
        origin: Origin,
        pos: Option<Pos>,
    ) -> Result<ConstValue, Bubble> {
        match ty {
            TypeRef::NonNull(inner) => {
                let value = self.complete_nullable(inner, resolved, selection, path, origin, pos)?;
                if matches!(value, ConstValue::Null) {
                    self.record(
                        QueryError::NonNullViolation {
                            type_name: origin.type_name.to_string(),
                            field: origin.field.to_string(),
                        },
                        path,
                        pos,
                    );
                    return Err(Bubble);
                }
                Ok(value)
            }
            _ => Ok(self
                .complete_nullable(ty, resolved, selection, path, origin, pos)
                .unwrap_or(ConstValue::Null)),
        }
    }

    fn complete_nullable(
        &mut self,
        ty: &TypeRef,
        resolved: Resolved,
        selection: &[&SelectedField],
        path: &[PathSegment],
        origin: Origin,
        pos: Option<Pos>,
    ) -> Result<ConstValue, Bubble> {
        match (ty, resolved) {
            (_, Resolved::Null) => Ok(ConstValue::Null),
            (TypeRef::List(item_ty), Resolved::List(items)) => {
                let mut values = Vec::with_capacity(items.len());
                for (index, item) in items.into_iter().enumerate() {
                    let item_path = child(path, PathSegment::Index(index));
                    values.push(self.complete(item_ty, item, selection, &item_path, origin, pos)?);
                }
                Ok(ConstValue::List(values))
            }
            (TypeRef::Named(_), Resolved::Object(entity)) => {
                match self.schema.object(entity.type_name()) {
                    Some(object_type) => self
                        .execute_object(object_type, &entity, selection, path)
                        .map(ConstValue::Object),
                    None => {
                        warn!("No object type named {}", entity.type_name());
                        Ok(ConstValue::Null)
                    }
                }
            }
            (TypeRef::Named(_), Resolved::Leaf(value)) => Ok(value),
            (ty, other) => {
                warn!(
                    "Resolver for {}.{} returned {:?} where {} was expected",
                    origin.type_name, origin.field, other, ty
                );
                Ok(ConstValue::Null)
            }
        }
    }
}

/// Group fields by response key, keeping first-seen order and skipping
/// fields whose fragment type condition does not match.
fn collect_fields<'f>(
    type_name: &str,
    fields: &[&'f SelectedField],
) -> IndexMap<&'f str, Vec<&'f SelectedField>> {
    let mut grouped: IndexMap<&str, Vec<&SelectedField>> = IndexMap::new();
    for &field in fields {
        if field.applies_to(type_name) {
            grouped.entry(field.response_key()).or_default().push(field);
        }
    }
    grouped
}

fn subselection<'f>(fields: &[&'f SelectedField]) -> Vec<&'f SelectedField> {
    fields.iter().flat_map(|field| field.selection.iter()).collect()
}

fn check_selection(
    schema: &SchemaDef,
    field_def: &FieldDef,
    selection: &[&SelectedField],
) -> QueryResult<()> {
    let is_object = schema.object(field_def.ty.named_type()).is_some();
    match (is_object, selection.is_empty()) {
        (true, true) => Err(QueryError::validation(
            field_def.name,
            format!("field of type {} must have a selection of subfields", field_def.ty),
        )),
        (false, false) => Err(QueryError::validation(
            field_def.name,
            format!("field of type {} cannot have a selection of subfields", field_def.ty),
        )),
        _ => Ok(()),
    }
}

/// Validate and coerce field arguments. `DateTime` arguments take the codec's
/// value path when supplied by variable and its literal path when inline.
fn coerce_arguments(
    field_def: &FieldDef,
    provided: &IndexMap<String, InputValue>,
) -> QueryResult<Arguments> {
    if let Some(unknown) = provided
        .keys()
        .find(|name| field_def.find_argument(name).is_none())
    {
        return Err(QueryError::validation(
            unknown.as_str(),
            format!("is not an argument of {}", field_def.name),
        ));
    }

    let mut args = Arguments::default();
    for def in &field_def.arguments {
        let input = match provided.get(def.name) {
            Some(input) if !input.is_null() => input,
            _ if def.ty.is_non_null() => {
                return Err(QueryError::validation(def.name, "is required"));
            }
            _ => continue,
        };

        let value = if def.ty.named_type() == DATE_TIME {
            let timestamp = match input {
                InputValue::Variable(value) => DateTimeCodec::parse_value(value)?,
                InputValue::Literal(value) => DateTimeCodec::parse_literal(value)?,
            };
            ArgValue::Timestamp(timestamp)
        } else {
            ArgValue::Value(input.value().clone())
        };
        args.insert(def.name, value);
    }

    Ok(args)
}

fn child(path: &[PathSegment], segment: PathSegment) -> Vec<PathSegment> {
    let mut path = path.to_vec();
    path.push(segment);
    path
}
