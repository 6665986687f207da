use serde::{Deserialize, Serialize};

/// A single ad-hoc query addressed to one backend endpoint and database.
///
/// The query text is opaque: it is handed to the backend verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryStatement {
    endpoint: String,
    database: String,
    text: String,
}

impl QueryStatement {
    pub fn new<E, D, T>(endpoint: E, database: D, text: T) -> Self
    where
        E: Into<String>,
        D: Into<String>,
        T: Into<String>,
    {
        Self {
            endpoint: endpoint.into(),
            database: database.into(),
            text: text.into(),
        }
    }

    /// Backend connection target.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Backend database (namespace) the query runs against.
    pub fn database(&self) -> &str {
        &self.database
    }

    /// Raw query text.
    pub fn text(&self) -> &str {
        &self.text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statement_keeps_text_verbatim() {
        let text = "Nodes | where Name has \"a\" | project id, region";
        let stmt = QueryStatement::new("https://demo.kusto.windows.net", "db1", text);

        assert_eq!(stmt.endpoint(), "https://demo.kusto.windows.net");
        assert_eq!(stmt.database(), "db1");
        assert_eq!(stmt.text(), text);
    }
}
