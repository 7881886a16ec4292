//! Equality filters over user attributes

use rusqlite::types::{ToSql, ToSqlOutput};

/// Attributes a filter may constrain
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserField {
    Id,
    Username,
    FirstName,
    LastName,
    Email,
    Age,
    Admin,
}

impl UserField {
    /// Column backing this attribute
    pub fn column(self) -> &'static str {
        match self {
            UserField::Id => "id",
            UserField::Username => "username",
            UserField::FirstName => "first_name",
            UserField::LastName => "last_name",
            UserField::Email => "email",
            UserField::Age => "age",
            UserField::Admin => "admin",
        }
    }
}

/// Value compared against an attribute
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterValue {
    Text(String),
    Integer(i64),
    Bool(bool),
}

impl From<&str> for FilterValue {
    fn from(value: &str) -> Self {
        FilterValue::Text(value.to_string())
    }
}

impl From<String> for FilterValue {
    fn from(value: String) -> Self {
        FilterValue::Text(value)
    }
}

impl From<u32> for FilterValue {
    fn from(value: u32) -> Self {
        FilterValue::Integer(i64::from(value))
    }
}

impl From<bool> for FilterValue {
    fn from(value: bool) -> Self {
        FilterValue::Bool(value)
    }
}

impl ToSql for FilterValue {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        match self {
            FilterValue::Text(s) => s.to_sql(),
            FilterValue::Integer(i) => i.to_sql(),
            FilterValue::Bool(b) => b.to_sql(),
        }
    }
}

/// Conjunction of equality constraints. The empty filter matches every record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserFilter {
    conditions: Vec<(UserField, FilterValue)>,
}

impl UserFilter {
    /// Filter that matches all records
    pub fn all() -> Self {
        Self::default()
    }

    /// Add an equality constraint
    pub fn eq(mut self, field: UserField, value: impl Into<FilterValue>) -> Self {
        self.conditions.push((field, value.into()));
        self
    }

    /// Shorthand for a filter on the identifier
    pub fn by_id(id: &str) -> Self {
        Self::all().eq(UserField::Id, id)
    }

    /// Shorthand for a filter on the email
    pub fn by_email(email: &str) -> Self {
        Self::all().eq(UserField::Email, email)
    }

    /// Render the `WHERE` clause (empty for the match-all filter) and its
    /// positional parameters. Column names come from [`UserField`], never
    /// from input.
    pub fn where_clause(&self) -> (String, Vec<&dyn ToSql>) {
        if self.conditions.is_empty() {
            return (String::new(), Vec::new());
        }

        let clause = self
            .conditions
            .iter()
            .map(|(field, _)| format!("{} = ?", field.column()))
            .collect::<Vec<_>>()
            .join(" AND ");
        let params = self
            .conditions
            .iter()
            .map(|(_, value)| value as &dyn ToSql)
            .collect();

        (format!(" WHERE {}", clause), params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_filter_has_no_where_clause() {
        let filter = UserFilter::all();
        let (clause, params) = filter.where_clause();
        assert!(clause.is_empty());
        assert!(params.is_empty());
    }

    #[test]
    fn test_conjunction() {
        let filter = UserFilter::by_email("a@x.com").eq(UserField::Age, 30u32);
        let (clause, params) = filter.where_clause();
        assert_eq!(clause, " WHERE email = ? AND age = ?");
        assert_eq!(params.len(), 2);
    }
}
