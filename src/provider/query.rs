//! Query descriptions handed to a content provider

use serde::{Deserialize, Serialize};

use super::uri::ContentUri;

/// A filter expression with positional `?` arguments
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    pub clause: String,
    pub args: Vec<String>,
}

impl Selection {
    /// A filter without arguments
    pub fn raw(clause: impl Into<String>) -> Self {
        Self {
            clause: clause.into(),
            args: Vec::new(),
        }
    }

    /// `column = ?`
    pub fn eq(column: &str, arg: impl ToString) -> Self {
        Self {
            clause: format!("{} = ?", column),
            args: vec![arg.to_string()],
        }
    }

    /// `column IN (?,?,...)` with one placeholder per id
    pub fn in_ids(column: &str, ids: &[i64]) -> Self {
        let placeholders = vec!["?"; ids.len()].join(",");
        Self {
            clause: format!("{} IN ({})", column, placeholders),
            args: ids.iter().map(i64::to_string).collect(),
        }
    }
}

/// Everything a provider needs to run one query
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Query {
    pub uri: ContentUri,
    /// Column expressions; `None` selects the provider's default columns
    pub projection: Option<Vec<String>>,
    pub selection: Option<Selection>,
    pub sort_order: Option<String>,
}

impl Query {
    pub fn new(uri: ContentUri) -> Self {
        Self {
            uri,
            projection: None,
            selection: None,
            sort_order: None,
        }
    }

    pub fn projection<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.projection = Some(columns.into_iter().map(Into::into).collect());
        self
    }

    pub fn selection(mut self, selection: Selection) -> Self {
        self.selection = Some(selection);
        self
    }

    pub fn sort_order(mut self, order: impl Into<String>) -> Self {
        self.sort_order = Some(order.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_ids() {
        let selection = Selection::in_ids("_id", &[1, 2, 3]);
        assert_eq!(selection.clause, "_id IN (?,?,?)");
        assert_eq!(selection.args, ["1", "2", "3"]);
    }

    #[test]
    fn test_eq() {
        let selection = Selection::eq("budgets._id", 42);
        assert_eq!(selection.clause, "budgets._id = ?");
        assert_eq!(selection.args, ["42"]);
    }

    #[test]
    fn test_builder() {
        let query = Query::new(ContentUri::new("planner", &["budgets"]))
            .projection(["_id", "title"])
            .selection(Selection::raw("calendar_id = 3"))
            .sort_order("begin ASC");
        assert_eq!(query.projection.as_deref(), Some(&["_id".to_string(), "title".to_string()][..]));
        assert_eq!(query.selection.unwrap().args.len(), 0);
        assert_eq!(query.sort_order.as_deref(), Some("begin ASC"));
    }
}
