//! Parameterized SQL predicate builder.
//!
//! Filter values never appear in the SQL text. Each populated criterion adds a
//! condition with positional `?N` placeholders and a typed parameter.

use super::types::{present, present_items};
use super::FilterCriteria;

/// Column holding the ultimate parent id.
pub const PARENT_ID_COLUMN: &str = "mdm_gems_ult_parent_id";
pub const PARENT_NAME_COLUMN: &str = "parent_name";
pub const CLIENT_ID_COLUMN: &str = "mdm_client_gems_id";
pub const CLIENT_NAME_COLUMN: &str = "client_name";
pub const CUSTOMER_ID_COLUMN: &str = "mdm_cust_gems_id";
pub const CUSTOMER_NAME_COLUMN: &str = "customer_name";
pub const SEGMENT_COLUMN: &str = "mdm_client_segment";
pub const REGION_COLUMN: &str = "region_cd";
pub const COUNTRY_COLUMN: &str = "country_cd";

/// A typed bind parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SqlParam {
    Integer(i64),
    Text(String),
}

/// A WHERE-clause body and the parameters bound to its placeholders.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SqlPredicate {
    /// Conditions joined with `AND`, without a leading `WHERE`.
    pub clause: String,
    pub params: Vec<SqlParam>,
}

impl SqlPredicate {
    pub fn is_empty(&self) -> bool {
        self.clause.is_empty()
    }

    /// Appends the predicate to a base query.
    ///
    /// Uses `AND` when the base query already has a WHERE clause, `WHERE`
    /// otherwise. An empty predicate returns the base query unchanged.
    pub fn apply(&self, base_query: &str) -> String {
        if self.is_empty() {
            return base_query.to_string();
        }
        let base = base_query.trim_end();
        let keyword = if has_where_clause(base) { "AND" } else { "WHERE" };
        format!("{} {} {}", base, keyword, self.clause)
    }
}

/// Builds the predicate for the populated fields of `criteria`.
pub fn build_predicate(criteria: &FilterCriteria) -> SqlPredicate {
    let mut builder = PredicateBuilder::default();

    builder.in_numeric_text(PARENT_ID_COLUMN, &criteria.client);
    builder.in_codes(SEGMENT_COLUMN, &criteria.segment);
    builder.in_codes(REGION_COLUMN, &criteria.region);
    builder.in_codes(COUNTRY_COLUMN, &criteria.country);
    builder.equals(PARENT_ID_COLUMN, present(&criteria.parent_id));
    builder.like(PARENT_NAME_COLUMN, present(&criteria.parent_name));
    builder.equals(CLIENT_ID_COLUMN, present(&criteria.client_id));
    builder.like(CLIENT_NAME_COLUMN, present(&criteria.client_name));
    builder.equals(CUSTOMER_ID_COLUMN, present(&criteria.customer_id));
    builder.like(CUSTOMER_NAME_COLUMN, present(&criteria.customer_name));

    builder.finish()
}

#[derive(Default)]
struct PredicateBuilder {
    conditions: Vec<String>,
    params: Vec<SqlParam>,
}

impl PredicateBuilder {
    fn placeholder(&mut self, param: SqlParam) -> String {
        self.params.push(param);
        format!("?{}", self.params.len())
    }

    /// Matches a TEXT column holding digits against integer ids, so `"007"`
    /// matches `7`. Non-numeric text never matches.
    fn in_numeric_text(&mut self, column: &str, values: &[i64]) {
        if values.is_empty() {
            return;
        }
        let placeholders: Vec<String> = values
            .iter()
            .map(|v| self.placeholder(SqlParam::Integer(*v)))
            .collect();
        self.conditions.push(format!(
            "(TRIM({c}) <> '' AND TRIM({c}) NOT GLOB '*[^0-9]*' AND CAST(TRIM({c}) AS INTEGER) IN ({p}))",
            c = column,
            p = placeholders.join(", ")
        ));
    }

    fn in_codes(&mut self, column: &str, values: &[String]) {
        let values: Vec<&str> = present_items(values).collect();
        if values.is_empty() {
            return;
        }
        let placeholders: Vec<String> = values
            .into_iter()
            .map(|v| self.placeholder(SqlParam::Text(v.to_string())))
            .collect();
        self.conditions.push(format!(
            "{} COLLATE NOCASE IN ({})",
            column,
            placeholders.join(", ")
        ));
    }

    fn equals(&mut self, column: &str, value: Option<&str>) {
        if let Some(value) = value {
            let p = self.placeholder(SqlParam::Text(value.to_string()));
            self.conditions
                .push(format!("{} = {} COLLATE NOCASE", column, p));
        }
    }

    fn like(&mut self, column: &str, value: Option<&str>) {
        if let Some(value) = value {
            let pattern = format!("%{}%", escape_like(value));
            let p = self.placeholder(SqlParam::Text(pattern));
            self.conditions
                .push(format!("{} LIKE {} ESCAPE '\\'", column, p));
        }
    }

    fn finish(self) -> SqlPredicate {
        SqlPredicate {
            clause: self.conditions.join(" AND "),
            params: self.params,
        }
    }
}

/// Escapes LIKE wildcards so user input only matches literally.
fn escape_like(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

fn has_where_clause(query: &str) -> bool {
    query
        .split_whitespace()
        .any(|word| word.eq_ignore_ascii_case("where"))
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "SELECT * FROM product_services";

    #[test]
    fn test_empty_criteria_builds_empty_predicate() {
        let predicate = build_predicate(&FilterCriteria::new());
        assert!(predicate.is_empty());
        assert!(predicate.params.is_empty());
        assert_eq!(predicate.apply(BASE), BASE);
    }

    #[test]
    fn test_client_ids_bind_integers() {
        let predicate = build_predicate(&FilterCriteria::new().with_client([7, 9]));
        assert_eq!(
            predicate.clause,
            "(TRIM(mdm_gems_ult_parent_id) <> '' \
             AND TRIM(mdm_gems_ult_parent_id) NOT GLOB '*[^0-9]*' \
             AND CAST(TRIM(mdm_gems_ult_parent_id) AS INTEGER) IN (?1, ?2))"
        );
        assert_eq!(
            predicate.params,
            vec![SqlParam::Integer(7), SqlParam::Integer(9)]
        );
    }

    #[test]
    fn test_conditions_follow_declaration_order() {
        let criteria = FilterCriteria::new()
            .with_customer_name("fund")
            .with_region(["EMEA"])
            .with_client([1])
            .with_parent_id("1");
        let predicate = build_predicate(&criteria);

        assert_eq!(
            predicate.clause,
            "(TRIM(mdm_gems_ult_parent_id) <> '' \
             AND TRIM(mdm_gems_ult_parent_id) NOT GLOB '*[^0-9]*' \
             AND CAST(TRIM(mdm_gems_ult_parent_id) AS INTEGER) IN (?1)) \
             AND region_cd COLLATE NOCASE IN (?2) \
             AND mdm_gems_ult_parent_id = ?3 COLLATE NOCASE \
             AND customer_name LIKE ?4 ESCAPE '\\'"
        );
        assert_eq!(
            predicate.params,
            vec![
                SqlParam::Integer(1),
                SqlParam::Text("EMEA".to_string()),
                SqlParam::Text("1".to_string()),
                SqlParam::Text("%fund%".to_string()),
            ]
        );
    }

    #[test]
    fn test_values_never_reach_sql_text() {
        let hostile = "x' OR '1'='1";
        let criteria = FilterCriteria::new()
            .with_segment([hostile])
            .with_client_name(hostile);
        let predicate = build_predicate(&criteria);

        assert!(!predicate.clause.contains("OR"));
        assert!(!predicate.clause.contains(hostile));
        assert_eq!(predicate.params.len(), 2);
    }

    #[test]
    fn test_like_wildcards_are_escaped() {
        let predicate = build_predicate(&FilterCriteria::new().with_client_name("50%_off\\"));
        assert_eq!(
            predicate.params,
            vec![SqlParam::Text("%50\\%\\_off\\\\%".to_string())]
        );
    }

    #[test]
    fn test_blank_list_items_are_skipped() {
        let predicate = build_predicate(&FilterCriteria::new().with_country(["", "  "]));
        assert!(predicate.is_empty());
    }

    #[test]
    fn test_apply_uses_where_without_existing_clause() {
        let predicate = build_predicate(&FilterCriteria::new().with_country(["US"]));
        assert_eq!(
            predicate.apply(BASE),
            "SELECT * FROM product_services WHERE country_cd COLLATE NOCASE IN (?1)"
        );
    }

    #[test]
    fn test_apply_uses_and_with_existing_clause() {
        let predicate = build_predicate(&FilterCriteria::new().with_country(["US"]));
        let base = "SELECT * FROM product_services where active = 1";
        assert_eq!(
            predicate.apply(base),
            "SELECT * FROM product_services where active = 1 AND country_cd COLLATE NOCASE IN (?1)"
        );
    }
}
