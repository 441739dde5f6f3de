mod resolve_error_tests;
mod resolver_composer_tests;
