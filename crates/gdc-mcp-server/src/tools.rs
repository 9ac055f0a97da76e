//! MCP tools exposed by the server

pub mod graphql_query;
