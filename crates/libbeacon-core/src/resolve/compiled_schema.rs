use crate::arguments::ArgumentPipeline;
use crate::arguments::ArgumentSetFactory;
use crate::directives::BoundDirective;
use crate::directives::CallableRegistry;
use crate::directives::DirectiveRegistry;
use crate::document::DocumentAst;
use crate::document::FieldDefinition;
use crate::document::Node;
use crate::execution::RequestContext;
use crate::resolve::FieldResolverFn;
use crate::resolve::ResolveInfo;
use crate::resolve::ResolveParams;
use crate::resolve::ResolveResult;
use crate::resolve::ResolverComposer;
use crate::schema::SchemaBuildError;
use crate::BeaconConfig;
use indexmap::IndexMap;
use std::collections::HashMap;
use std::sync::Arc;

/// A field with its resolver chain fully composed.
pub struct ComposedField {
    pub(crate) builder_directives: Vec<BoundDirective>,
    pub(crate) complexity: Option<BoundDirective>,
    pub(crate) definition: FieldDefinition,
    pub(crate) parent_type: String,
    pub(crate) resolver: Arc<dyn FieldResolverFn>,
}
impl ComposedField {
    pub fn complexity_directive(&self) -> Option<&BoundDirective> {
        self.complexity.as_ref()
    }

    pub fn definition(&self) -> &FieldDefinition {
        &self.definition
    }

    pub fn name(&self) -> &str {
        self.definition.name()
    }

    pub fn parent_type_name(&self) -> &str {
        self.parent_type.as_str()
    }

    /// Runs the argument pipeline over `raw_args`, then the composed
    /// resolver chain.
    pub async fn resolve<'a>(
        &'a self,
        root: Arc<serde_json::Value>,
        raw_args: &'a serde_json::Map<String, serde_json::Value>,
        ctx: &'a RequestContext,
        info: &'a ResolveInfo<'a>,
    ) -> ResolveResult {
        let schema = info.schema();
        let args = ArgumentSetFactory::new(schema.document())
            .from_field_arguments(&self.definition, raw_args);
        let args = ArgumentPipeline::new(schema, ctx)
            .process(args, self.definition.name())?;

        self.resolver.resolve(ResolveParams {
            args,
            ctx,
            info,
            root,
        }).await
    }
}
impl std::fmt::Debug for ComposedField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ComposedField")
            .field("parent_type", &self.parent_type)
            .field("name", &self.definition.name)
            .finish()
    }
}

/// A built document whose fields all have composed resolvers, ready to be
/// executed against.
pub struct CompiledSchema {
    callables: Arc<CallableRegistry>,
    config: Arc<BeaconConfig>,
    document: Arc<DocumentAst>,
    fields: HashMap<String, IndexMap<String, Arc<ComposedField>>>,
    registry: Arc<DirectiveRegistry>,
}
impl CompiledSchema {
    /// Composes the resolver of every field of every object type.
    pub fn compile(
        document: DocumentAst,
        registry: Arc<DirectiveRegistry>,
        callables: Arc<CallableRegistry>,
        config: Arc<BeaconConfig>,
    ) -> Result<Self, SchemaBuildError> {
        let composer = ResolverComposer {
            callables: &callables,
            config: &config,
            doc: &document,
            registry: &registry,
        };

        let mut fields = HashMap::new();
        for def in document.types().values() {
            let Some(obj_def) = def.as_object() else {
                continue;
            };
            let mut type_fields = IndexMap::new();
            for field in obj_def.fields().values() {
                let composed = composer.compose_field(obj_def.name(), field)?;
                type_fields.insert(field.name().to_string(), Arc::new(composed));
            }
            fields.insert(obj_def.name().to_string(), type_fields);
        }

        Ok(Self {
            callables,
            config,
            document: Arc::new(document),
            fields,
            registry,
        })
    }

    pub fn callables(&self) -> &CallableRegistry {
        &self.callables
    }

    pub fn config(&self) -> &BeaconConfig {
        &self.config
    }

    pub fn document(&self) -> &DocumentAst {
        &self.document
    }

    pub fn field(&self, type_name: &str, field_name: &str) -> Option<&Arc<ComposedField>> {
        self.fields.get(type_name)?.get(field_name)
    }

    pub fn registry(&self) -> &DirectiveRegistry {
        &self.registry
    }
}
impl std::fmt::Debug for CompiledSchema {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompiledSchema")
            .field("types", &self.fields.keys().collect::<Vec<_>>())
            .finish()
    }
}
