mod auth_tests;
mod executor_tests;
mod limits_tests;
mod pagination_tests;
mod request_context_tests;
