//! PuppetDB v4 query expression builder.

use serde_json::json;

/// Fact family a report draws from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FactFamily {
    Users,
    Groups,
}

impl FactFamily {
    /// Name of the fact as reported by the accountfacts Facter module.
    pub fn fact_name(self) -> &'static str {
        match self {
            FactFamily::Users => "accountfacts_users",
            FactFamily::Groups => "accountfacts_groups",
        }
    }
}

/// Build the fact-contents query expression for one fact family,
/// optionally restricted to certnames matching `node_filter`.
pub fn fact_contents_query(family: FactFamily, node_filter: Option<&str>) -> String {
    let name_clause = json!(["=", "name", family.fact_name()]);
    let query = match node_filter {
        Some(pattern) => json!(["and", name_clause, ["~", "certname", pattern]]),
        None => name_clause,
    };
    query.to_string()
}
