use crate::directives::CallableRegistry;
use crate::directives::Directive;
use crate::directives::DirectiveCapability;
use crate::directives::DirectiveError;
use crate::directives::DirectiveRegistry;
use crate::directives::FieldContext;
use crate::directives::FieldMiddlewareDirective;
use crate::document::DirectiveUsage;
use crate::resolve::CompiledSchema;
use crate::resolve::FieldMiddleware;
use crate::resolve::Next;
use crate::resolve::ResolveError;
use crate::resolve::ResolveFuture;
use crate::resolve::ResolveParams;
use crate::schema::SchemaBuildError;
use crate::schema::SchemaBuilder;
use crate::store::InMemoryStore;
use crate::test::context;
use crate::test::run;
use serde_json::json;
use std::sync::Arc;

/// `@wrap(label: "a")` wraps the string result of the rest of the chain
/// as `a(...)`.
struct WrapDirective;
impl Directive for WrapDirective {
    fn name(&self) -> &str {
        "wrap"
    }

    fn definition(&self) -> &str {
        "directive @wrap(label: String!) repeatable on FIELD_DEFINITION"
    }

    fn capabilities(&self) -> &[DirectiveCapability] {
        &[DirectiveCapability::FieldMiddleware]
    }

    fn as_field_middleware(&self) -> Option<&dyn FieldMiddlewareDirective> {
        Some(self)
    }
}
impl FieldMiddlewareDirective for WrapDirective {
    fn field_middleware(
        &self,
        usage: &DirectiveUsage,
        _field: &FieldContext<'_>,
    ) -> Result<Arc<dyn FieldMiddleware>, DirectiveError> {
        Ok(Arc::new(Wrap {
            label: usage.required_string_arg("label")?.to_string(),
        }))
    }
}

struct Wrap {
    label: String,
}
impl FieldMiddleware for Wrap {
    fn handle<'a>(&'a self, params: ResolveParams<'a>, next: Next<'a>) -> ResolveFuture<'a> {
        Box::pin(async move {
            let inner = next.run(params).await?;
            Ok(json!(format!("{}({})", self.label, inner.as_str().unwrap_or_default())))
        })
    }
}

/// `@closed` never calls the rest of the chain.
struct ClosedDirective;
impl Directive for ClosedDirective {
    fn name(&self) -> &str {
        "closed"
    }

    fn definition(&self) -> &str {
        "directive @closed on FIELD_DEFINITION"
    }

    fn capabilities(&self) -> &[DirectiveCapability] {
        &[DirectiveCapability::FieldMiddleware]
    }

    fn as_field_middleware(&self) -> Option<&dyn FieldMiddlewareDirective> {
        Some(self)
    }
}
impl FieldMiddlewareDirective for ClosedDirective {
    fn field_middleware(
        &self,
        _usage: &DirectiveUsage,
        _field: &FieldContext<'_>,
    ) -> Result<Arc<dyn FieldMiddleware>, DirectiveError> {
        Ok(Arc::new(Closed))
    }
}

struct Closed;
impl FieldMiddleware for Closed {
    fn handle<'a>(&'a self, _params: ResolveParams<'a>, _next: Next<'a>) -> ResolveFuture<'a> {
        Box::pin(async { Err(ResolveError::User("Closed for maintenance.".to_string())) })
    }
}

fn compile(sdl: &str) -> Result<CompiledSchema, SchemaBuildError> {
    let mut registry = DirectiveRegistry::with_builtins()?;
    registry.register(WrapDirective)?;
    registry.register(ClosedDirective)?;

    let mut callables = CallableRegistry::new();
    callables.register_sync_resolver("greeting", |_| Ok(json!("hi")));

    SchemaBuilder::new(Arc::new(registry))
        .load_str(None, sdl)
        .compile(Arc::new(callables))
}

#[tokio::test]
async fn first_middleware_is_outermost() -> Result<(), SchemaBuildError> {
    let schema = Arc::new(compile(r#"
        type Query {
          greeting: String @wrap(label: "a") @field(resolver: "greeting") @wrap(label: "b")
        }
    "#)?);

    let response = run(&schema, &context(&InMemoryStore::new()), "{ greeting }").await;
    assert_eq!(response.errors, vec![]);
    assert_eq!(response.data, Some(json!({"greeting": "a(b(hi))"})));
    Ok(())
}

#[tokio::test]
async fn middleware_can_short_circuit() -> Result<(), SchemaBuildError> {
    let schema = Arc::new(compile(r#"
        type Query {
          greeting: String @wrap(label: "a") @closed @field(resolver: "greeting")
          open: String @field(resolver: "greeting")
        }
    "#)?);

    let response = run(&schema, &context(&InMemoryStore::new()), "{ greeting open }").await;
    assert_eq!(response.data, Some(json!({"greeting": null, "open": "hi"})));
    assert_eq!(response.errors.len(), 1);
    assert_eq!(response.errors[0].message, "Closed for maintenance.");
    assert_eq!(response.errors[0].extensions["category"], json!("user"));
    Ok(())
}

#[tokio::test]
async fn fields_without_resolver_read_the_parent() -> Result<(), SchemaBuildError> {
    let store = InMemoryStore::new();
    store.seed("User", vec![json!({"id": 1, "name": "Ada", "secret": "x"})]).unwrap();
    let schema = Arc::new(compile("
        type Query { user: User @first }
        type User { id: ID! name: String! }
    ")?);

    let response = run(&schema, &context(&store), "{ user { id name } }").await;
    assert_eq!(response.data, Some(json!({"user": {"id": 1, "name": "Ada"}})));
    Ok(())
}

#[test]
fn two_field_resolvers_are_rejected() {
    let result = compile("
        type Query { users: [User!]! @all @first }
        type User { id: ID! }
    ");
    assert!(matches!(
        result,
        Err(SchemaBuildError::Directive(DirectiveError::MultipleFieldResolvers { .. })),
    ));
}

#[test]
fn composed_fields_keep_their_complexity_directive() -> Result<(), SchemaBuildError> {
    let schema = compile("
        type Query {
          users: [User!]! @all @complexity
          count: Int
        }
        type User { id: ID! }
    ")?;
    let count = schema.field("Query", "count").unwrap();
    assert!(count.complexity_directive().is_none());
    let users = schema.field("Query", "users").unwrap();
    assert_eq!(users.complexity_directive().map(|bound| bound.usage().name()), Some("complexity"));
    Ok(())
}

#[test]
fn two_complexity_directives_are_rejected() {
    let result = compile("
        type Query { users: [User!]! @paginate @complexity }
        type User { id: ID! }
    ");
    assert!(matches!(
        result,
        Err(SchemaBuildError::Directive(DirectiveError::ExclusiveCapabilityViolation { .. })),
    ));
}
