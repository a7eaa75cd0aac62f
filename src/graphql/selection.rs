//! Selection tree consumed by the executor
//!
//! Documents are parsed by `async-graphql-parser`; this module lowers the
//! parsed operation into [`SelectedField`] trees, resolving variables,
//! flattening fragments and applying `@skip`/`@include`. Each argument keeps
//! track of whether it was written inline or supplied through a variable,
//! since scalar coercion differs between the two.

use std::collections::HashMap;

use async_graphql::Variables;
use async_graphql_parser::types::{
    Directive, ExecutableDocument, FragmentDefinition, OperationDefinition, OperationType,
    Selection, SelectionSet, VariableDefinition,
};
use async_graphql_parser::{Pos, Positioned};
use async_graphql_value::{ConstValue, Name, Value};
use indexmap::IndexMap;

use crate::errors::{QueryError, QueryResult};

/// Argument value and where it came from
#[derive(Debug, Clone, PartialEq)]
pub enum InputValue {
    /// Written inline in the document
    Literal(ConstValue),
    /// Supplied through a variable
    Variable(ConstValue),
}

impl InputValue {
    pub fn value(&self) -> &ConstValue {
        match self {
            InputValue::Literal(value) | InputValue::Variable(value) => value,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self.value(), ConstValue::Null)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SelectedField {
    pub alias: Option<String>,
    pub name: String,
    pub arguments: IndexMap<String, InputValue>,
    /// Set when the field was selected through a fragment with a type condition
    pub type_condition: Option<String>,
    pub selection: Vec<SelectedField>,
    pub pos: Option<Pos>,
}

impl SelectedField {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    pub fn argument(mut self, name: impl Into<String>, value: InputValue) -> Self {
        self.arguments.insert(name.into(), value);
        self
    }

    pub fn select(mut self, fields: impl IntoIterator<Item = SelectedField>) -> Self {
        self.selection.extend(fields);
        self
    }

    /// Key under which the field appears in the response
    pub fn response_key(&self) -> &str {
        self.alias.as_deref().unwrap_or(&self.name)
    }

    /// Whether the field applies to an object of the given type
    pub fn applies_to(&self, type_name: &str) -> bool {
        self.type_condition
            .as_deref()
            .map_or(true, |condition| condition == type_name)
    }
}

/// Build a list of leaf fields, for tests and programmatic callers
pub fn fields(names: &[&str]) -> Vec<SelectedField> {
    names.iter().map(|name| SelectedField::new(*name)).collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationKind {
    Query,
    Mutation,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Operation {
    pub kind: OperationKind,
    pub name: Option<String>,
    pub selection: Vec<SelectedField>,
}

impl Operation {
    pub fn query(selection: Vec<SelectedField>) -> Self {
        Self {
            kind: OperationKind::Query,
            name: None,
            selection,
        }
    }

    pub fn mutation(selection: Vec<SelectedField>) -> Self {
        Self {
            kind: OperationKind::Mutation,
            name: None,
            selection,
        }
    }

    /// Parse a query document and lower the selected operation
    pub fn parse(
        source: &str,
        operation_name: Option<&str>,
        variables: &Variables,
    ) -> QueryResult<Self> {
        let document = async_graphql_parser::parse_query(source)
            .map_err(|e| QueryError::Parse(e.to_string()))?;
        Self::from_document(&document, operation_name, variables)
    }

    pub fn from_document(
        document: &ExecutableDocument,
        operation_name: Option<&str>,
        variables: &Variables,
    ) -> QueryResult<Self> {
        let (name, operation) = pick_operation(document, operation_name)?;

        let kind = match operation.node.ty {
            OperationType::Query => OperationKind::Query,
            OperationType::Mutation => OperationKind::Mutation,
            OperationType::Subscription => {
                return Err(QueryError::UnknownOperation(
                    "subscriptions are not supported".to_string(),
                ))
            }
        };

        let lowering = Lowering {
            fragments: &document.fragments,
            variables,
            definitions: &operation.node.variable_definitions,
        };
        let mut active_fragments = Vec::new();
        let selection = lowering.lower_set(
            &operation.node.selection_set.node,
            None,
            &mut active_fragments,
        )?;

        Ok(Self {
            kind,
            name: name.map(|n| n.to_string()),
            selection,
        })
    }
}

fn pick_operation<'d>(
    document: &'d ExecutableDocument,
    operation_name: Option<&str>,
) -> QueryResult<(Option<&'d Name>, &'d Positioned<OperationDefinition>)> {
    let mut operations = document.operations.iter();

    match operation_name {
        Some(wanted) => operations
            .find(|(name, _)| name.map(|n| n.as_str()) == Some(wanted))
            .ok_or_else(|| {
                QueryError::UnknownOperation(format!("no operation named '{}'", wanted))
            }),
        None => {
            let first = operations.next().ok_or_else(|| {
                QueryError::UnknownOperation("document has no operations".to_string())
            })?;
            if operations.next().is_some() {
                return Err(QueryError::UnknownOperation(
                    "operationName is required for documents with several operations".to_string(),
                ));
            }
            Ok(first)
        }
    }
}

struct Lowering<'d> {
    fragments: &'d HashMap<Name, Positioned<FragmentDefinition>>,
    variables: &'d Variables,
    definitions: &'d [Positioned<VariableDefinition>],
}

impl<'d> Lowering<'d> {
    fn lower_set(
        &self,
        set: &'d SelectionSet,
        type_condition: Option<&str>,
        active_fragments: &mut Vec<&'d str>,
    ) -> QueryResult<Vec<SelectedField>> {
        let mut lowered = Vec::new();

        for item in &set.items {
            match &item.node {
                Selection::Field(field) => {
                    if !self.is_included(&field.node.directives)? {
                        continue;
                    }

                    let mut arguments = IndexMap::new();
                    for (name, value) in &field.node.arguments {
                        arguments.insert(name.node.to_string(), self.lower_value(&value.node)?);
                    }

                    let selection =
                        self.lower_set(&field.node.selection_set.node, None, active_fragments)?;

                    lowered.push(SelectedField {
                        alias: field.node.alias.as_ref().map(|a| a.node.to_string()),
                        name: field.node.name.node.to_string(),
                        arguments,
                        type_condition: type_condition.map(str::to_string),
                        selection,
                        pos: Some(field.pos),
                    });
                }
                Selection::InlineFragment(fragment) => {
                    if !self.is_included(&fragment.node.directives)? {
                        continue;
                    }
                    let condition = fragment
                        .node
                        .type_condition
                        .as_ref()
                        .map(|c| c.node.on.node.as_str())
                        .or(type_condition);
                    lowered.extend(self.lower_set(
                        &fragment.node.selection_set.node,
                        condition,
                        active_fragments,
                    )?);
                }
                Selection::FragmentSpread(spread) => {
                    if !self.is_included(&spread.node.directives)? {
                        continue;
                    }
                    let name = spread.node.fragment_name.node.as_str();
                    if active_fragments.contains(&name) {
                        return Err(QueryError::Parse(format!(
                            "fragment '{}' spreads itself",
                            name
                        )));
                    }
                    let definition = self.fragments.get(name).ok_or_else(|| {
                        QueryError::Parse(format!("unknown fragment '{}'", name))
                    })?;

                    active_fragments.push(name);
                    let fragment_fields = self.lower_set(
                        &definition.node.selection_set.node,
                        Some(definition.node.type_condition.node.on.node.as_str()),
                        active_fragments,
                    )?;
                    active_fragments.pop();
                    lowered.extend(fragment_fields);
                }
            }
        }

        Ok(lowered)
    }

    fn lower_value(&self, value: &Value) -> QueryResult<InputValue> {
        match value {
            Value::Variable(name) => Ok(InputValue::Variable(self.variable(name))),
            other => other
                .clone()
                .into_const_with(|name| Ok::<_, QueryError>(self.variable(&name)))
                .map(InputValue::Literal),
        }
    }

    fn variable(&self, name: &Name) -> ConstValue {
        if let Some(value) = self.variables.get(name) {
            return value.clone();
        }
        self.definitions
            .iter()
            .find(|definition| definition.node.name.node == *name)
            .and_then(|definition| definition.node.default_value.as_ref())
            .map(|default| default.node.clone())
            .unwrap_or(ConstValue::Null)
    }

    fn is_included(&self, directives: &[Positioned<Directive>]) -> QueryResult<bool> {
        for directive in directives {
            let wanted = match directive.node.name.node.as_str() {
                "skip" => false,
                "include" => true,
                _ => continue,
            };
            let condition = directive
                .node
                .arguments
                .iter()
                .find(|(name, _)| name.node.as_str() == "if")
                .map(|(_, value)| self.lower_value(&value.node))
                .transpose()?;
            match condition.as_ref().map(InputValue::value) {
                Some(ConstValue::Boolean(flag)) if *flag != wanted => return Ok(false),
                Some(ConstValue::Boolean(_)) => {}
                _ => {
                    return Err(QueryError::Parse(format!(
                        "@{} requires a boolean 'if' argument",
                        directive.node.name.node
                    )))
                }
            }
        }
        Ok(true)
    }
}
