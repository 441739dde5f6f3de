use crate::directives::builtin::schema_directives::copy_onto_fields;
use crate::directives::Directive;
use crate::directives::DirectiveCapability;
use crate::directives::DirectiveError;
use crate::directives::FieldContext;
use crate::directives::FieldMiddlewareDirective;
use crate::directives::Manipulation;
use crate::directives::TypeExtensionManipulator;
use crate::directives::TypeManipulator;
use crate::document::DirectiveUsage;
use crate::document::TypeDefinition;
use crate::execution::RateLimitError;
use crate::mutation::key_list;
use crate::resolve::FieldMiddleware;
use crate::resolve::Next;
use crate::resolve::ResolveError;
use crate::resolve::ResolveFuture;
use crate::resolve::ResolveParams;
use crate::schema::SchemaBuildError;
use crate::store::Operator;
use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;

/// `@guard(with: ["api"])` requires an authenticated user. The first guard
/// that has a user authenticates the request.
pub struct GuardDirective;
impl Directive for GuardDirective {
    fn name(&self) -> &str {
        "guard"
    }

    fn definition(&self) -> &str {
        r#"
"""
Run authentication through one or more guards.
This is run per field and may allow unauthenticated
users to still receive partial results.
"""
directive @guard(
  """
  Specify which guards to use, e.g. ["api"].
  When not defined, the default from the configuration is used.
  """
  with: [String!]
) repeatable on FIELD_DEFINITION | OBJECT
"#
    }

    fn capabilities(&self) -> &[DirectiveCapability] {
        &[
            DirectiveCapability::FieldMiddleware,
            DirectiveCapability::TypeExtensionManipulator,
            DirectiveCapability::TypeManipulator,
        ]
    }

    fn as_field_middleware(&self) -> Option<&dyn FieldMiddlewareDirective> {
        Some(self)
    }

    fn as_type_extension_manipulator(&self) -> Option<&dyn TypeExtensionManipulator> {
        Some(self)
    }

    fn as_type_manipulator(&self) -> Option<&dyn TypeManipulator> {
        Some(self)
    }
}
impl TypeManipulator for GuardDirective {
    fn manipulate_type_definition(
        &self,
        manipulation: Manipulation<'_>,
        type_name: &str,
    ) -> Result<(), SchemaBuildError> {
        if let Some(def) = manipulation.doc.type_definition_mut(type_name) {
            copy_onto_fields(def, manipulation.usage);
        }
        Ok(())
    }
}
impl TypeExtensionManipulator for GuardDirective {
    fn manipulate_type_extension(
        &self,
        manipulation: Manipulation<'_>,
        extension: &mut TypeDefinition,
    ) -> Result<(), SchemaBuildError> {
        copy_onto_fields(extension, manipulation.usage);
        Ok(())
    }
}
impl FieldMiddlewareDirective for GuardDirective {
    fn field_middleware(
        &self,
        usage: &DirectiveUsage,
        field: &FieldContext<'_>,
    ) -> Result<Arc<dyn FieldMiddleware>, DirectiveError> {
        let guards = match usage.string_list_arg("with")? {
            Some(guards) if !guards.is_empty() => guards,
            _ => field.config.guards.clone(),
        };
        Ok(Arc::new(GuardMiddleware {
            guards,
        }))
    }
}

struct GuardMiddleware {
    guards: Vec<String>,
}
impl FieldMiddleware for GuardMiddleware {
    fn handle<'a>(&'a self, params: ResolveParams<'a>, next: Next<'a>) -> ResolveFuture<'a> {
        let gate = params.ctx.gate();
        let user = self.guards.iter().find_map(|guard| gate.current_user(guard));
        match user {
            Some(user) => {
                params.ctx.set_user(user);
                next.run(params)
            },
            None => {
                tracing::debug!(
                    "Rejected unauthenticated access to `{}.{}`",
                    params.info.parent_type_name(),
                    params.info.field_name(),
                );
                Box::pin(futures::future::ready(Err(ResolveError::Authentication {
                    guards: self.guards.clone(),
                })))
            },
        }
    }
}

/// `@can(ability: "update", find: "id")` checks an ability against the
/// gate before resolving.
///
/// The subject passed to the gate is the model name, or, with `find`, each
/// row whose key is the value of the named argument.
pub struct CanDirective;
impl Directive for CanDirective {
    fn name(&self) -> &str {
        "can"
    }

    fn definition(&self) -> &str {
        r#"
"""
Check a policy ability before resolving the field.
"""
directive @can(
  """
  The ability to check permissions for.
  """
  ability: String!

  """
  The name of the argument that is used to find a specific model
  instance against which the permissions should be checked.
  """
  find: String

  """
  Specify the model name to check against, if it can not be
  derived from the return type of the field.
  """
  model: String

  """
  Pass along the client given input data as arguments to the check.
  """
  injectArgs: Boolean = false
) repeatable on FIELD_DEFINITION
"#
    }

    fn capabilities(&self) -> &[DirectiveCapability] {
        &[DirectiveCapability::FieldMiddleware]
    }

    fn as_field_middleware(&self) -> Option<&dyn FieldMiddlewareDirective> {
        Some(self)
    }
}
impl FieldMiddlewareDirective for CanDirective {
    fn field_middleware(
        &self,
        usage: &DirectiveUsage,
        field: &FieldContext<'_>,
    ) -> Result<Arc<dyn FieldMiddleware>, DirectiveError> {
        Ok(Arc::new(CanMiddleware {
            ability: usage.required_string_arg("ability")?.to_string(),
            find: usage.string_arg("find")?.map(str::to_string),
            inject_args: usage.bool_arg("injectArgs")?.unwrap_or(false),
            model: field.model_name(usage)?,
        }))
    }
}

struct CanMiddleware {
    ability: String,
    find: Option<String>,
    inject_args: bool,
    model: String,
}
impl CanMiddleware {
    async fn subjects(&self, params: &ResolveParams<'_>) -> Result<Vec<serde_json::Value>, ResolveError> {
        let Some(find) = self.find.as_deref() else {
            return Ok(vec![serde_json::Value::String(self.model.clone())]);
        };

        let store = params.ctx.store();
        let key_name = store.key_name(&self.model);
        let keys = key_list(params.args.json(find).unwrap_or(serde_json::Value::Null));
        let mut subjects = vec![];
        for key in keys {
            let mut query = store.query(&self.model)?;
            query.add_where(&key_name, Operator::Eq, key.clone());
            let row = query.get().await?.into_iter().next()
                .ok_or_else(|| ResolveError::NotFound {
                    key: crate::batch::key_id(&key),
                    model: self.model.clone(),
                })?;
            subjects.push(serde_json::Value::Object(row));
        }
        Ok(subjects)
    }
}
impl FieldMiddleware for CanMiddleware {
    fn handle<'a>(&'a self, params: ResolveParams<'a>, next: Next<'a>) -> ResolveFuture<'a> {
        Box::pin(async move {
            let user = params.ctx.user();
            for subject in self.subjects(&params).await? {
                let mut arguments = vec![subject];
                if self.inject_args {
                    arguments.push(serde_json::Value::Object(params.args.to_json()));
                }
                if !params.ctx.gate().check(user.as_ref(), &self.ability, &arguments) {
                    tracing::debug!("Denied `{}` on `{}`", self.ability, self.model);
                    return Err(ResolveError::Authorization {
                        ability: self.ability.clone(),
                    });
                }
            }
            next.run(params).await
        })
    }
}

/// `@throttle(maxAttempts: 10, decayMinutes: 1.0)` limits how often one
/// user (or all guests together) may resolve a field.
pub struct ThrottleDirective;
impl Directive for ThrottleDirective {
    fn name(&self) -> &str {
        "throttle"
    }

    fn definition(&self) -> &str {
        r#"
"""
Sets rate limit to access the field. Does the same as ThrottleRequests middleware.
"""
directive @throttle(
  """
  Maximum number of attempts in a specified time interval.
  """
  maxAttempts: Int = 60

  """
  Time in minutes to reset attempts.
  """
  decayMinutes: Float = 1.0

  """
  Prefix to distinguish several field groups.
  """
  prefix: String = ""
) on FIELD_DEFINITION
"#
    }

    fn capabilities(&self) -> &[DirectiveCapability] {
        &[DirectiveCapability::FieldMiddleware]
    }

    fn validate_usage(&self, usage: &DirectiveUsage) -> Result<(), DirectiveError> {
        throttle_max_attempts(usage)?;
        throttle_decay(usage)?;
        Ok(())
    }

    fn as_field_middleware(&self) -> Option<&dyn FieldMiddlewareDirective> {
        Some(self)
    }
}
impl FieldMiddlewareDirective for ThrottleDirective {
    fn field_middleware(
        &self,
        usage: &DirectiveUsage,
        field: &FieldContext<'_>,
    ) -> Result<Arc<dyn FieldMiddleware>, DirectiveError> {
        let prefix = usage.string_arg("prefix")?.unwrap_or_default();
        Ok(Arc::new(ThrottleMiddleware {
            decay: throttle_decay(usage)?,
            key_prefix: format!("{prefix}{}.{}", field.parent_type, field.field.name()),
            max_attempts: throttle_max_attempts(usage)?,
        }))
    }
}

fn throttle_max_attempts(usage: &DirectiveUsage) -> Result<NonZeroU32, DirectiveError> {
    let max_attempts = usage.int_arg("maxAttempts")?.unwrap_or(60);
    u32::try_from(max_attempts).ok()
        .and_then(NonZeroU32::new)
        .ok_or_else(|| DirectiveError::InvalidArgument {
            argument_name: "maxAttempts".to_string(),
            directive_name: "throttle".to_string(),
            message: format!("must be between 1 and {}", u32::MAX),
        })
}

fn throttle_decay(usage: &DirectiveUsage) -> Result<Duration, DirectiveError> {
    let decay_minutes = usage.float_arg("decayMinutes")?.unwrap_or(1.0);
    Duration::try_from_secs_f64(decay_minutes * 60.0).map_err(|err| {
        DirectiveError::InvalidArgument {
            argument_name: "decayMinutes".to_string(),
            directive_name: "throttle".to_string(),
            message: format!("`{decay_minutes}` is not a valid duration: {err}"),
        }
    })
}

struct ThrottleMiddleware {
    decay: Duration,
    key_prefix: String,
    max_attempts: NonZeroU32,
}
impl FieldMiddleware for ThrottleMiddleware {
    fn handle<'a>(&'a self, params: ResolveParams<'a>, next: Next<'a>) -> ResolveFuture<'a> {
        let principal = params.ctx.user()
            .map(|user| crate::batch::key_id(user.id()))
            .unwrap_or_else(|| "guest".to_string());
        let key = format!("{}:{principal}", self.key_prefix);
        let error = match params.ctx.rate_limiter().hit(&key, self.max_attempts, self.decay) {
            Ok(()) => return next.run(params),
            Err(RateLimitError::Exceeded { retry_after_secs }) => ResolveError::RateLimited {
                key,
                retry_after_secs,
            },
            Err(err @ RateLimitError::Poisoned) => ResolveError::internal(err),
        };
        Box::pin(futures::future::ready(Err(error)))
    }
}
