use crate::document::DirectiveUsage;
use crate::loc;

/// Behavior shared by every named, directive-bearing node of a
/// [`DocumentAst`](crate::document::DocumentAst).
pub trait Node {
    fn description(&self) -> Option<&str>;
    fn directive(&self, name: &str) -> Option<&DirectiveUsage>;
    fn directives(&self) -> &Vec<DirectiveUsage>;
    fn directives_mut(&mut self) -> &mut Vec<DirectiveUsage>;
    fn has_directive(&self, name: &str) -> bool;
    fn location(&self) -> &loc::SourceLocation;
    fn name(&self) -> &str;
}

pub(crate) fn find_directive<'a>(
    directives: &'a [DirectiveUsage],
    name: &str,
) -> Option<&'a DirectiveUsage> {
    directives.iter().find(|usage| usage.name() == name)
}
