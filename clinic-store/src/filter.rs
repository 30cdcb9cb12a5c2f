//! Field-match predicates built from optional search parameters.

/// How a filter compares its value against the stored field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterOp {
    /// Byte-for-byte equality.
    Eq,
    /// Case-insensitive (ASCII) match on the start of the field.
    Prefix,
}

/// A single field-match predicate contributed to a query. The value is
/// always literal; only `op` decides how it is compared.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Filter {
    pub field: String,
    pub value: String,
    pub op: FilterOp,
}

impl Filter {
    pub fn eq(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self { field: field.into(), value: value.into(), op: FilterOp::Eq }
    }

    pub fn prefix(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self { field: field.into(), value: value.into(), op: FilterOp::Prefix }
    }
}

/// Collects active predicates in call order; blank values are dropped rather
/// than turned into match-everything predicates.
#[derive(Debug, Default, Clone)]
pub struct FilterBuilder {
    filters: Vec<Filter>,
}

impl FilterBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Exact match on `field`.
    pub fn eq(mut self, field: &str, value: Option<&str>) -> Self {
        if let Some(v) = active(value) {
            self.filters.push(Filter::eq(field, v));
        }
        self
    }

    /// Prefix match on `field`.
    pub fn prefix(mut self, field: &str, value: Option<&str>) -> Self {
        if let Some(v) = active(value) {
            self.filters.push(Filter::prefix(field, v));
        }
        self
    }

    pub fn build(self) -> Vec<Filter> {
        self.filters
    }
}

fn active(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_values_are_skipped() {
        let filters = FilterBuilder::new()
            .eq("patientUuid", Some("p-1"))
            .eq("userUuid", None)
            .eq("status", Some("   "))
            .prefix("name", Some(""))
            .build();
        assert_eq!(filters, vec![Filter::eq("patientUuid", "p-1")]);
    }

    #[test]
    fn op_comes_from_the_builder_call_and_order_is_kept() {
        let filters = FilterBuilder::new().prefix("name", Some("Ja")).eq("gender", Some("f")).build();
        assert_eq!(filters[0], Filter::prefix("name", "Ja"));
        assert_eq!(filters[1].op, FilterOp::Eq);
    }

    #[test]
    fn exact_values_keep_trailing_star() {
        let filters = FilterBuilder::new().eq("username", Some("adm*")).build();
        assert_eq!(filters[0].op, FilterOp::Eq);
        assert_eq!(filters[0].value, "adm*");
    }

    #[test]
    fn no_candidates_means_no_filters() {
        assert!(FilterBuilder::new().build().is_empty());
    }
}
