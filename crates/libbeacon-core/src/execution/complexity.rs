use crate::ast;
use crate::directives::ComplexityContext;
use crate::execution::variables::arguments_to_json;
use crate::execution::variables::should_include;
use crate::resolve::CompiledSchema;
use std::collections::HashMap;

type JsonMap = serde_json::Map<String, serde_json::Value>;

/// The cost and nesting depth of an operation's selection set.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct QueryCost {
    pub complexity: usize,
    pub depth: usize,
}

/// Measures an operation before it runs.
///
/// A field costs `1 + sum(children)` unless it carries a complexity
/// directive, which then decides its cost from the children's cost and the
/// field's arguments. Fragments count once per spread. Costs saturate at
/// `usize::MAX`.
pub(crate) struct ComplexityCalculator<'a> {
    pub(crate) fragments: &'a HashMap<&'a str, &'a ast::query::FragmentDefinition>,
    pub(crate) schema: &'a CompiledSchema,
    pub(crate) variables: &'a JsonMap,
}
impl ComplexityCalculator<'_> {
    pub(crate) fn measure(&self, type_name: &str, set: &ast::query::SelectionSet) -> QueryCost {
        self.measure_set(type_name, set, &mut vec![])
    }

    fn measure_set<'s>(
        &'s self,
        type_name: &str,
        set: &'s ast::query::SelectionSet,
        spread_stack: &mut Vec<&'s str>,
    ) -> QueryCost {
        use graphql_parser::query::Selection;
        use graphql_parser::query::TypeCondition;

        let mut cost = QueryCost::default();
        for selection in set.items.iter() {
            let selection_cost = match selection {
                Selection::Field(field) => {
                    if !should_include(&field.directives, self.variables)
                        || field.name.starts_with("__") {
                        continue;
                    }
                    self.measure_field(type_name, field, spread_stack)
                },

                Selection::FragmentSpread(spread) => {
                    if !should_include(&spread.directives, self.variables)
                        || spread_stack.contains(&spread.fragment_name.as_str()) {
                        continue;
                    }
                    let Some(fragment) = self.fragments.get(spread.fragment_name.as_str()) else {
                        continue;
                    };
                    let TypeCondition::On(condition) = &fragment.type_condition;
                    spread_stack.push(spread.fragment_name.as_str());
                    let fragment_cost = self.measure_set(condition, &fragment.selection_set, spread_stack);
                    spread_stack.pop();
                    fragment_cost
                },

                Selection::InlineFragment(inline) => {
                    if !should_include(&inline.directives, self.variables) {
                        continue;
                    }
                    let condition = match &inline.type_condition {
                        Some(TypeCondition::On(condition)) => condition.as_str(),
                        None => type_name,
                    };
                    self.measure_set(condition, &inline.selection_set, spread_stack)
                },
            };
            cost.complexity = cost.complexity.saturating_add(selection_cost.complexity);
            cost.depth = cost.depth.max(selection_cost.depth);
        }
        cost
    }

    fn measure_field<'s>(
        &'s self,
        type_name: &str,
        field: &'s ast::query::Field,
        spread_stack: &mut Vec<&'s str>,
    ) -> QueryCost {
        let doc = self.schema.document();
        let child_type = doc.field(type_name, &field.name)
            .map(|def| def.type_annotation().innermost_type_name().to_string());
        let children = match child_type {
            Some(child_type) if !field.selection_set.items.is_empty() =>
                self.measure_set(&child_type, &field.selection_set, spread_stack),
            _ => QueryCost::default(),
        };

        let complexity_directive = self.schema.field(type_name, &field.name)
            .and_then(|composed| composed.complexity_directive());
        let complexity = match complexity_directive {
            Some(bound) => match bound.directive().as_complexity_resolver() {
                Some(resolver) => {
                    let args = arguments_to_json(&field.arguments, self.variables);
                    let ctx = ComplexityContext {
                        callables: self.schema.callables(),
                        config: self.schema.config(),
                    };
                    resolver.complexity(bound.usage(), children.complexity, &args, &ctx)
                },
                None => children.complexity.saturating_add(1),
            },
            None => children.complexity.saturating_add(1),
        };

        QueryCost {
            complexity,
            depth: children.depth.saturating_add(1),
        }
    }
}
