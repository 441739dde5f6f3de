use crate::auth::Principal;
use std::collections::HashMap;
use std::sync::Arc;

/// The authentication/authorization port.
pub trait Gate: Send + Sync {
    /// Whether `user` may perform `ability`. `arguments` starts with the
    /// subject (a model name or a loaded row), followed by any extra
    /// arguments.
    fn check(
        &self,
        user: Option<&Principal>,
        ability: &str,
        arguments: &[serde_json::Value],
    ) -> bool;

    fn current_user(&self, guard: &str) -> Option<Principal>;
}

pub type AbilityFn = dyn Fn(Option<&Principal>, &[serde_json::Value]) -> bool + Send + Sync;

/// A [`Gate`] configured up front: a fixed user per guard and a policy per
/// ability. Abilities without a policy are denied.
#[derive(Clone, Default)]
pub struct StaticGate {
    abilities: HashMap<String, Arc<AbilityFn>>,
    users: HashMap<String, Principal>,
}
impl StaticGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allows `ability` to any authenticated user.
    pub fn allow(self, ability: impl Into<String>) -> Self {
        self.define(ability, |user, _| user.is_some())
    }

    pub fn define<F>(mut self, ability: impl Into<String>, policy: F) -> Self
    where
        F: Fn(Option<&Principal>, &[serde_json::Value]) -> bool + Send + Sync + 'static,
    {
        self.abilities.insert(ability.into(), Arc::new(policy));
        self
    }

    pub fn with_user(mut self, guard: impl Into<String>, user: Principal) -> Self {
        self.users.insert(guard.into(), user);
        self
    }
}
impl Gate for StaticGate {
    fn check(
        &self,
        user: Option<&Principal>,
        ability: &str,
        arguments: &[serde_json::Value],
    ) -> bool {
        self.abilities.get(ability)
            .is_some_and(|policy| policy(user, arguments))
    }

    fn current_user(&self, guard: &str) -> Option<Principal> {
        self.users.get(guard).cloned()
    }
}
impl std::fmt::Debug for StaticGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StaticGate")
            .field("abilities", &self.abilities.keys().collect::<Vec<_>>())
            .field("users", &self.users)
            .finish()
    }
}
