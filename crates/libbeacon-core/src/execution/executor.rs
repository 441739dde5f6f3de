use crate::ast;
use crate::document::TypeAnnotation;
use crate::document::TypeDefinition;
use crate::execution::complexity::ComplexityCalculator;
use crate::execution::variables::arguments_to_json;
use crate::execution::variables::coerce_variables;
use crate::execution::variables::should_include;
use crate::execution::GraphQLError;
use crate::execution::GraphQLRequest;
use crate::execution::GraphQLResponse;
use crate::execution::PathSegment;
use crate::execution::QueryCost;
use crate::execution::RequestContext;
use crate::resolve::CompiledSchema;
use crate::resolve::ResolveInfo;
use futures::future::BoxFuture;
use futures::FutureExt;
use indexmap::IndexMap;
use std::collections::HashMap;
use std::collections::HashSet;
use std::sync::Arc;
use std::sync::Mutex;

type JsonMap = serde_json::Map<String, serde_json::Value>;
type FieldGroups<'a> = IndexMap<String, Vec<&'a ast::query::Field>>;

/// A `null` in a non-null position, bubbling up to the nearest nullable
/// parent. The error explaining it has already been recorded.
#[derive(Debug)]
struct NullPropagation;
type Completion = Result<serde_json::Value, NullPropagation>;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum OperationKind {
    Mutation,
    Query,
}
impl std::fmt::Display for OperationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Mutation => "mutation",
            Self::Query => "query",
        })
    }
}

/// Runs operations against a [`CompiledSchema`].
///
/// Sibling fields of a query, and the items of a list, resolve
/// concurrently within one task; the fields of a mutation's root run one
/// after the other.
#[derive(Clone, Debug)]
pub struct Executor {
    schema: Arc<CompiledSchema>,
}
impl Executor {
    pub fn new(schema: Arc<CompiledSchema>) -> Self {
        Self {
            schema,
        }
    }

    pub async fn execute(&self, request: GraphQLRequest, ctx: &RequestContext) -> GraphQLResponse {
        let document = match ast::query::parse(&request.query) {
            Ok(document) => document,
            Err(err) => return reject(format!("Syntax Error: {err}")),
        };

        let mut fragments = HashMap::new();
        let mut operations = vec![];
        for def in document.definitions.iter() {
            match def {
                graphql_parser::query::Definition::Fragment(fragment) => {
                    fragments.insert(fragment.name.as_str(), fragment);
                },
                graphql_parser::query::Definition::Operation(operation) => {
                    operations.push(operation);
                },
            }
        }

        let operation = match select_operation(&operations, request.operation_name.as_deref()) {
            Ok(operation) => operation,
            Err(message) => return reject(message),
        };
        use graphql_parser::query::OperationDefinition;
        let (kind, selection_set, variable_definitions) = match operation {
            OperationDefinition::SelectionSet(set) => (OperationKind::Query, set, &[][..]),
            OperationDefinition::Query(query) =>
                (OperationKind::Query, &query.selection_set, &query.variable_definitions[..]),
            OperationDefinition::Mutation(mutation) =>
                (OperationKind::Mutation, &mutation.selection_set, &mutation.variable_definitions[..]),
            OperationDefinition::Subscription(_) =>
                return reject("Subscriptions are not supported.".to_string()),
        };

        let doc = self.schema.document();
        let root_type = match kind {
            OperationKind::Mutation => doc.mutation_type_name(),
            OperationKind::Query => doc.query_type_name(),
        };
        let Some(root_type) = root_type else {
            return reject(format!("Schema is not configured for {kind} operations."));
        };

        let variables = match coerce_variables(variable_definitions, &request.variables) {
            Ok(variables) => variables,
            Err(message) => return reject(message),
        };

        let cost = ComplexityCalculator {
            fragments: &fragments,
            schema: &self.schema,
            variables: &variables,
        }.measure(root_type, selection_set);
        if let Err(message) = self.check_limits(cost) {
            tracing::debug!("Rejected {kind}: {message}");
            return reject(message);
        }

        tracing::debug!(
            "Executing {kind} on `{root_type}` (complexity {}, depth {})",
            cost.complexity,
            cost.depth,
        );
        let run = ExecutionRun {
            ctx,
            errors: Mutex::new(vec![]),
            fragments,
            schema: &self.schema,
            variables,
        };
        let root = Arc::new(serde_json::Value::Object(JsonMap::new()));
        let groups = run.collect_fields(root_type, &[selection_set]);
        let data = run.resolve_fields(root_type, root, groups, vec![], kind == OperationKind::Mutation)
            .await
            .map(serde_json::Value::Object)
            .unwrap_or(serde_json::Value::Null);

        let mut errors = run.errors.into_inner().unwrap_or_default();
        errors.extend(ctx.error_pool().drain());
        GraphQLResponse {
            data: Some(data),
            errors,
        }
    }

    pub fn schema(&self) -> &Arc<CompiledSchema> {
        &self.schema
    }

    fn check_limits(&self, cost: QueryCost) -> Result<(), String> {
        let security = &self.schema.config().security;
        let enabled = |limit: Option<usize>| limit.filter(|max| *max > 0);
        if let Some(max_depth) = enabled(security.max_query_depth) {
            if cost.depth > max_depth {
                return Err(format!("Max query depth should be {max_depth} but got {}.", cost.depth));
            }
        }
        if let Some(max_complexity) = enabled(security.max_query_complexity) {
            if cost.complexity > max_complexity {
                return Err(format!(
                    "Max query complexity should be {max_complexity} but got {}.",
                    cost.complexity,
                ));
            }
        }
        Ok(())
    }
}

fn reject(message: String) -> GraphQLResponse {
    GraphQLResponse::from_errors(vec![GraphQLError::new(message).with_category("graphql")])
}

fn select_operation<'d>(
    operations: &[&'d ast::query::OperationDefinition],
    name: Option<&str>,
) -> Result<&'d ast::query::OperationDefinition, String> {
    fn operation_name(operation: &ast::query::OperationDefinition) -> Option<&str> {
        use graphql_parser::query::OperationDefinition;
        match operation {
            OperationDefinition::Query(query) => query.name.as_deref(),
            OperationDefinition::Mutation(mutation) => mutation.name.as_deref(),
            OperationDefinition::Subscription(subscription) => subscription.name.as_deref(),
            OperationDefinition::SelectionSet(_) => None,
        }
    }

    match name {
        Some(name) => operations.iter()
            .find(|operation| operation_name(operation) == Some(name))
            .copied()
            .ok_or_else(|| format!("Unknown operation named \"{name}\".")),
        None => match operations {
            [operation] => Ok(*operation),
            [] => Err("Must provide an operation.".to_string()),
            _ => Err("Must provide operation name if query contains multiple operations.".to_string()),
        },
    }
}

/// The state of one operation's execution.
struct ExecutionRun<'a> {
    ctx: &'a RequestContext,
    errors: Mutex<Vec<GraphQLError>>,
    fragments: HashMap<&'a str, &'a ast::query::FragmentDefinition>,
    schema: &'a CompiledSchema,
    variables: JsonMap,
}
impl<'a> ExecutionRun<'a> {
    fn collect_fields(
        &self,
        type_name: &str,
        selection_sets: &[&'a ast::query::SelectionSet],
    ) -> FieldGroups<'a> {
        let mut groups = IndexMap::new();
        let mut visited_fragments = HashSet::new();
        for set in selection_sets {
            self.collect_into(type_name, set, &mut groups, &mut visited_fragments);
        }
        groups
    }

    fn collect_into(
        &self,
        type_name: &str,
        set: &'a ast::query::SelectionSet,
        groups: &mut FieldGroups<'a>,
        visited_fragments: &mut HashSet<&'a str>,
    ) {
        use graphql_parser::query::Selection;
        use graphql_parser::query::TypeCondition;

        for selection in set.items.iter() {
            match selection {
                Selection::Field(field) => {
                    if !should_include(&field.directives, &self.variables) {
                        continue;
                    }
                    let response_key = field.alias.as_ref().unwrap_or(&field.name);
                    groups.entry(response_key.clone()).or_default().push(field);
                },

                Selection::FragmentSpread(spread) => {
                    if !should_include(&spread.directives, &self.variables)
                        || !visited_fragments.insert(spread.fragment_name.as_str()) {
                        continue;
                    }
                    let Some(fragment) = self.fragments.get(spread.fragment_name.as_str()).copied() else {
                        continue;
                    };
                    let TypeCondition::On(condition) = &fragment.type_condition;
                    if self.type_applies(type_name, condition) {
                        self.collect_into(type_name, &fragment.selection_set, groups, visited_fragments);
                    }
                },

                Selection::InlineFragment(inline) => {
                    if !should_include(&inline.directives, &self.variables) {
                        continue;
                    }
                    let applies = match &inline.type_condition {
                        Some(TypeCondition::On(condition)) => self.type_applies(type_name, condition),
                        None => true,
                    };
                    if !applies {
                        continue;
                    }
                    self.collect_into(type_name, &inline.selection_set, groups, visited_fragments);
                },
            }
        }
    }

    fn type_applies(&self, type_name: &str, condition: &str) -> bool {
        type_name == condition
            || self.schema.document().possible_type_names(condition).contains(&type_name)
    }

    fn record(&self, error: GraphQLError) {
        if let Ok(mut errors) = self.errors.lock() {
            errors.push(error);
        }
    }

    fn resolve_fields(
        &'a self,
        type_name: &'a str,
        root: Arc<serde_json::Value>,
        groups: FieldGroups<'a>,
        path: Vec<PathSegment>,
        serial: bool,
    ) -> BoxFuture<'a, Result<JsonMap, NullPropagation>> {
        async move {
            let results = if serial {
                let mut results = Vec::with_capacity(groups.len());
                for (key, fields) in groups {
                    let value = self.resolve_field(type_name, root.clone(), key.clone(), fields, path.clone()).await;
                    results.push((key, value));
                }
                results
            } else {
                futures::future::join_all(groups.into_iter().map(|(key, fields)| {
                    let field_future = self.resolve_field(type_name, root.clone(), key.clone(), fields, path.clone());
                    field_future.map(move |value| (key, value))
                })).await
            };

            let mut map = JsonMap::new();
            for (key, value) in results {
                map.insert(key, value?);
            }
            Ok(map)
        }.boxed()
    }

    fn resolve_field(
        &'a self,
        type_name: &'a str,
        root: Arc<serde_json::Value>,
        response_key: String,
        fields: Vec<&'a ast::query::Field>,
        mut path: Vec<PathSegment>,
    ) -> BoxFuture<'a, Completion> {
        async move {
            let Some(field) = fields.first().copied() else {
                return Ok(serde_json::Value::Null);
            };
            path.push(PathSegment::Key(response_key));

            if field.name == "__typename" {
                return Ok(serde_json::Value::String(type_name.to_string()));
            }

            let Some(composed) = self.schema.field(type_name, &field.name) else {
                let mut error = GraphQLError::new(format!(
                    "Cannot query field \"{}\" on type \"{type_name}\".",
                    field.name,
                )).with_category("graphql").with_location(field.position.line, field.position.column);
                error.path = Some(path);
                self.record(error);
                return Ok(serde_json::Value::Null);
            };

            let raw_args = arguments_to_json(&field.arguments, &self.variables);
            let info = ResolveInfo::new(self.schema, composed, path.clone());
            let annotation = composed.definition().type_annotation();
            match composed.resolve(root, &raw_args, self.ctx, &info).await {
                Ok(value) => {
                    let sub_selections = fields.iter().map(|f| &f.selection_set).collect();
                    self.complete_value(annotation, value, sub_selections, path, field).await
                },
                Err(err) => {
                    tracing::debug!("`{type_name}.{}` failed: {err}", field.name);
                    self.record(
                        err.to_graphql_error(Some(path))
                            .with_location(field.position.line, field.position.column),
                    );
                    if annotation.nullable() {
                        Ok(serde_json::Value::Null)
                    } else {
                        Err(NullPropagation)
                    }
                },
            }
        }.boxed()
    }

    fn complete_value(
        &'a self,
        annotation: &'a TypeAnnotation,
        value: serde_json::Value,
        sub_selections: Vec<&'a ast::query::SelectionSet>,
        path: Vec<PathSegment>,
        field: &'a ast::query::Field,
    ) -> BoxFuture<'a, Completion> {
        async move {
            if value.is_null() {
                if annotation.nullable() {
                    return Ok(serde_json::Value::Null);
                }
                let mut error = GraphQLError::new(format!(
                    "Cannot return null for non-nullable field \"{}\".",
                    field.name,
                )).with_category("internal").with_location(field.position.line, field.position.column);
                error.path = Some(path);
                self.record(error);
                return Err(NullPropagation);
            }

            let completed = match annotation {
                TypeAnnotation::List(list) => {
                    let inner = list.inner_type_annotation();
                    let items = match value {
                        serde_json::Value::Array(items) => items,
                        single => vec![single],
                    };
                    let item_futures = items.into_iter().enumerate().map(|(idx, item)| {
                        let mut item_path = path.clone();
                        item_path.push(PathSegment::Index(idx));
                        self.complete_value(inner, item, sub_selections.clone(), item_path, field)
                    });
                    futures::future::join_all(item_futures).await
                        .into_iter()
                        .collect::<Result<Vec<_>, _>>()
                        .map(serde_json::Value::Array)
                },
                TypeAnnotation::Named(named) =>
                    self.complete_named(named.type_name(), value, sub_selections, path, field).await,
            };

            match completed {
                Err(NullPropagation) if annotation.nullable() => Ok(serde_json::Value::Null),
                completed => completed,
            }
        }.boxed()
    }

    async fn complete_named(
        &'a self,
        type_name: &str,
        value: serde_json::Value,
        sub_selections: Vec<&'a ast::query::SelectionSet>,
        path: Vec<PathSegment>,
        field: &'a ast::query::Field,
    ) -> Completion {
        let doc = self.schema.document();
        let object_type = match doc.type_definition(type_name) {
            Some(TypeDefinition::Object(def)) => def.name(),
            Some(def @ (TypeDefinition::Interface(_) | TypeDefinition::Union(_))) => {
                match self.concrete_type(def.name(), &value) {
                    Some(concrete) => concrete,
                    None => {
                        let mut error = GraphQLError::new(format!(
                            "Abstract type \"{}\" must resolve to an Object type at runtime for field \"{}\".",
                            def.name(),
                            field.name,
                        )).with_category("internal").with_location(field.position.line, field.position.column);
                        error.path = Some(path);
                        self.record(error);
                        return Err(NullPropagation);
                    },
                }
            },
            // Scalars, enums and the built-in scalars serialize as they are.
            _ => return Ok(value),
        };

        if !value.is_object() {
            let mut error = GraphQLError::new(format!(
                "Expected a value of type \"{object_type}\" for field \"{}\".",
                field.name,
            )).with_category("internal");
            error.path = Some(path);
            self.record(error);
            return Err(NullPropagation);
        }

        let groups = self.collect_fields(object_type, &sub_selections);
        self.resolve_fields(object_type, Arc::new(value), groups, path, false)
            .await
            .map(serde_json::Value::Object)
    }

    /// The object type of a value of an abstract type: its `__typename`,
    /// else the type registered for its `__model`, else the only possible
    /// type.
    fn concrete_type(&self, abstract_type: &str, value: &serde_json::Value) -> Option<&'a str> {
        let doc = self.schema.document();
        let possible = doc.possible_type_names(abstract_type);

        if let Some(type_name) = value.get("__typename").and_then(|name| name.as_str()) {
            return doc.type_definition(type_name)
                .map(|def| def.name())
                .filter(|name| possible.contains(name));
        }

        if let Some(model) = value.get("__model").and_then(|model| model.as_str()) {
            let by_model = doc.class_name_to_type_names().get(model)
                .and_then(|type_names| type_names.iter()
                    .find(|name| possible.contains(&name.as_str())));
            if let Some(type_name) = by_model {
                return doc.type_definition(type_name).map(|def| def.name());
            }
        }

        match possible.as_slice() {
            [only] => Some(*only),
            _ => None,
        }
    }
}
