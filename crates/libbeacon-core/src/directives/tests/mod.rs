mod callable_registry_tests;
mod directive_registry_tests;
