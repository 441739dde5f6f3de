mod complexity;
mod error_pool;
mod executor;
mod graphql_error;
mod graphql_request;
mod rate_limiter;
mod request_context;
pub(crate) mod variables;

pub use complexity::QueryCost;
pub use error_pool::ErrorPool;
pub use executor::Executor;
pub use graphql_error::ErrorLocation;
pub use graphql_error::GraphQLError;
pub use graphql_error::PathSegment;
pub use graphql_request::GraphQLRequest;
pub use graphql_request::GraphQLResponse;
pub use rate_limiter::RateLimitError;
pub use rate_limiter::RateLimiter;
pub use request_context::RequestContext;

#[cfg(test)]
mod tests;
