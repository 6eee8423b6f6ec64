//! Keyword denylist for user-submitted SQL.
//!
//! A substring check, not a parser: it rejects harmless statements that
//! mention a keyword inside a literal or identifier, and it does nothing
//! about stacked statements, comments or encoding tricks.

/// Keywords whose presence anywhere in the statement rejects it.
pub const DENYLIST: &[&str] = &["DROP", "DELETE", "UPDATE", "INSERT", "ALTER", "CREATE"];

/// Returns the first denylisted keyword found, case-insensitively.
pub fn find_forbidden_keyword(sql: &str) -> Option<&'static str> {
    let upper = sql.to_uppercase();
    DENYLIST.iter().copied().find(|kw| upper.contains(kw))
}
