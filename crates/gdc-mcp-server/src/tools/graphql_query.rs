use crate::schema_from_type;
use rmcp::model::Tool;
use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::{Map, Value};

/// The name of the tool that relays a GraphQL query to the GDC API
pub const GRAPHQL_QUERY_TOOL_NAME: &str = "gdc_graphql_query";

/// Usage guidance shown to the calling model. Prose only; the relay itself
/// performs no validation of queries or filters.
const TOOL_DESCRIPTION: &str = "Execute a GraphQL query against the NCI Genomic Data Commons \
(GDC) API. Provide a complete GraphQL query string and, optionally, a `variables` object. The \
GDC schema covers projects, cases, files, annotations, and aggregation viewers. Filters use the \
GDC filter syntax passed through a variable of type `FiltersArgument`, for example \
{\"op\": \"in\", \"content\": {\"field\": \"cases.project.project_id\", \"value\": [\"TCGA-BRCA\"]}}. \
Start with small result sets (e.g. { projects { hits(first: 5) { edges { node { project_id name \
} } } } }) and request only the fields you need. The raw JSON response is returned verbatim; \
GraphQL errors reported by the service appear in its `errors` field.";

#[derive(Clone)]
pub struct GraphQLQuery {
    pub tool: Tool,
}

/// Input for the gdc_graphql_query tool.
#[derive(Debug, JsonSchema, Deserialize)]
pub struct Input {
    /// The GraphQL query to run against the GDC API
    pub query: String,

    /// Values for any variables referenced by the query
    #[serde(default)]
    pub variables: Option<Map<String, Value>>,
}

impl GraphQLQuery {
    pub fn new() -> Self {
        Self {
            tool: Tool::new(
                GRAPHQL_QUERY_TOOL_NAME,
                TOOL_DESCRIPTION,
                schema_from_type!(Input),
            ),
        }
    }
}

impl Default for GraphQLQuery {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn input_schema_requires_query_only() {
        let tool = GraphQLQuery::new().tool;
        let schema = serde_json::to_value(tool.input_schema.as_ref()).unwrap();

        let required = schema
            .get("required")
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default();
        assert!(required.contains(&json!("query")));
        assert!(!required.contains(&json!("variables")));
    }

    #[test]
    fn input_accepts_missing_variables() {
        let input: Input = serde_json::from_value(json!({ "query": "{ viewer }" })).unwrap();
        assert_eq!(input.query, "{ viewer }");
        assert!(input.variables.is_none());
    }

    #[test]
    fn input_accepts_variables_object() {
        let input: Input = serde_json::from_value(json!({
            "query": "query Q($id: String) { case(case_id: $id) { case_id } }",
            "variables": { "id": "abc" },
        }))
        .unwrap();
        assert_eq!(
            input.variables.unwrap().get("id"),
            Some(&Value::String("abc".to_string()))
        );
    }

    #[test]
    fn input_rejects_non_object_variables() {
        let result = serde_json::from_value::<Input>(json!({
            "query": "{ viewer }",
            "variables": "not a map",
        }));
        assert!(result.is_err());
    }
}
