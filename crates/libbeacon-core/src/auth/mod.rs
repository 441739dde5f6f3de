mod gate;
mod principal;

pub use gate::AbilityFn;
pub use gate::Gate;
pub use gate::StaticGate;
pub use principal::Principal;
