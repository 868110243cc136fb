//! Statement classification by leading keyword

use crate::tokenizer::Token;

/// Coarse statement classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatementKind {
    Select,
    Insert,
    Update,
    Delete,
    Create,
    Drop,
    Alter,
    Unknown,
}

impl StatementKind {
    /// Classify a leading keyword (already upper-cased)
    pub fn from_keyword(keyword: &str) -> Self {
        match keyword {
            "SELECT" => Self::Select,
            "INSERT" => Self::Insert,
            "UPDATE" => Self::Update,
            "DELETE" => Self::Delete,
            "CREATE" => Self::Create,
            "DROP" => Self::Drop,
            "ALTER" => Self::Alter,
            _ => Self::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Select => "SELECT",
            Self::Insert => "INSERT",
            Self::Update => "UPDATE",
            Self::Delete => "DELETE",
            Self::Create => "CREATE",
            Self::Drop => "DROP",
            Self::Alter => "ALTER",
            Self::Unknown => "UNKNOWN",
        }
    }

    /// CREATE, DROP or ALTER
    pub fn is_ddl(&self) -> bool {
        matches!(self, Self::Create | Self::Drop | Self::Alter)
    }
}

impl std::fmt::Display for StatementKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The statement a token sequence starts with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Statement<'a> {
    pub kind: StatementKind,

    /// First token text, verbatim
    pub keyword: &'a str,
}

impl<'a> Statement<'a> {
    pub fn from_keyword(keyword: &'a str) -> Self {
        Self {
            kind: StatementKind::from_keyword(keyword),
            keyword,
        }
    }
}

/// Text of the first token, or `None` when there are no tokens
pub fn get_statement_type(tokens: &[Token]) -> Option<&str> {
    tokens.first().map(|token| token.text.as_str())
}

/// Classify a token sequence
pub fn classify(tokens: &[Token]) -> Option<Statement<'_>> {
    get_statement_type(tokens).map(Statement::from_keyword)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokenizer::tokenize;

    #[test]
    fn statement_type_is_first_token() {
        let tokens = tokenize("select * from users").unwrap();
        assert_eq!(get_statement_type(&tokens), Some("SELECT"));
    }

    #[test]
    fn no_tokens_no_statement() {
        assert_eq!(get_statement_type(&[]), None);
        assert!(classify(&[]).is_none());
    }

    #[test]
    fn classify_kinds() {
        for (sql, kind) in [
            ("SELECT a FROM t", StatementKind::Select),
            ("INSERT INTO t VALUES (1)", StatementKind::Insert),
            ("update t set a = 1", StatementKind::Update),
            ("DELETE FROM t", StatementKind::Delete),
            ("CREATE TABLE t (a)", StatementKind::Create),
            ("DROP TABLE t", StatementKind::Drop),
            ("ALTER TABLE t", StatementKind::Alter),
        ] {
            let tokens = tokenize(sql).unwrap();
            assert_eq!(classify(&tokens).unwrap().kind, kind, "{}", sql);
        }
    }

    #[test]
    fn unknown_keeps_keyword() {
        let tokens = tokenize("WITH x AS (SELECT 1) SELECT * FROM x").unwrap();
        let statement = classify(&tokens).unwrap();

        assert_eq!(statement.kind, StatementKind::Unknown);
        assert_eq!(statement.keyword, "WITH");
        assert!(!statement.kind.is_ddl());
        assert!(StatementKind::Drop.is_ddl());
    }
}
