//! Query form state: query text, feature options and pattern presets

/// A selectable dataset feature; label and value are both the feature name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureOption {
    pub label: String,
    pub value: String,
}

impl FeatureOption {
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            label: name.clone(),
            value: name,
        }
    }
}

/// A canned GBD filter expression offered for quick selection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryPattern {
    pub label: &'static str,
    pub value: &'static str,
}

/// Query pattern presets
pub const QUERY_PATTERNS: &[QueryPattern] = &[
    QueryPattern {
        label: "Large instances",
        value: "variables > 5000000",
    },
    QueryPattern {
        label: "Small instances",
        value: "clauses < 10000",
    },
    QueryPattern {
        label: "Dense formulas",
        value: "clauses > 1000000 and variables < 100000",
    },
    QueryPattern {
        label: "Cryptography family",
        value: "family = cryptography",
    },
    QueryPattern {
        label: "Known satisfiable",
        value: "result = sat",
    },
    QueryPattern {
        label: "Known unsatisfiable",
        value: "result = unsat",
    },
    QueryPattern {
        label: "Compressed benchmarks",
        value: "local like %.xz",
    },
];

/// Payload sent to the `/results` endpoint
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryForm {
    pub query: String,
    pub selected_features: Vec<String>,
}

impl QueryForm {
    /// URL-encoded form fields: `query` plus one `selected_features` per feature
    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![("query", self.query.clone())];
        pairs.extend(
            self.selected_features
                .iter()
                .map(|f| ("selected_features", f.clone())),
        );
        pairs
    }
}

/// Form state mutated by user interaction and read at submit time
#[derive(Debug, Clone, Default)]
pub struct FormState {
    /// Free-text query
    pub query: String,
    /// Options offered in the feature selector
    pub features: Vec<FeatureOption>,
    /// Values of the selected features, in selection order
    pub selected_features: Vec<String>,
    /// Index into `QUERY_PATTERNS` of the last applied pattern
    pub selected_pattern: Option<usize>,
}

impl FormState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append feature options, skipping names that are already offered
    pub fn append_features(&mut self, names: Vec<String>) -> usize {
        let before = self.features.len();
        for name in names {
            if !self.features.iter().any(|f| f.value == name) {
                self.features.push(FeatureOption::new(name));
            }
        }
        self.features.len() - before
    }

    pub fn is_selected(&self, value: &str) -> bool {
        self.selected_features.iter().any(|f| f == value)
    }

    /// Select or deselect a feature value
    pub fn toggle_feature(&mut self, value: &str) {
        if let Some(pos) = self.selected_features.iter().position(|f| f == value) {
            self.selected_features.remove(pos);
        } else {
            self.selected_features.push(value.to_string());
        }
    }

    /// Replace the query text with a preset
    pub fn apply_pattern(&mut self, index: usize) -> bool {
        match QUERY_PATTERNS.get(index) {
            Some(pattern) => {
                self.query = pattern.value.to_string();
                self.selected_pattern = Some(index);
                true
            }
            None => false,
        }
    }

    pub fn push_char(&mut self, c: char) {
        self.query.push(c);
        self.selected_pattern = None;
    }

    pub fn pop_char(&mut self) {
        self.query.pop();
        self.selected_pattern = None;
    }

    pub fn clear_query(&mut self) {
        self.query.clear();
        self.selected_pattern = None;
    }

    /// Snapshot of the form as sent to the server
    pub fn payload(&self) -> QueryForm {
        QueryForm {
            query: self.query.trim().to_string(),
            selected_features: self.selected_features.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_append_features_label_equals_value() {
        let mut form = FormState::new();
        let added = form.append_features(vec!["a".into(), "b".into(), "c".into()]);
        assert_eq!(added, 3);
        assert_eq!(form.features.len(), 3);
        for option in &form.features {
            assert_eq!(option.label, option.value);
        }
    }

    #[test]
    fn test_append_features_skips_duplicates() {
        let mut form = FormState::new();
        form.append_features(vec!["a".into(), "b".into()]);
        let added = form.append_features(vec!["b".into(), "c".into()]);
        assert_eq!(added, 1);
        let values: Vec<_> = form.features.iter().map(|f| f.value.as_str()).collect();
        assert_eq!(values, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_toggle_feature() {
        let mut form = FormState::new();
        form.toggle_feature("variables");
        form.toggle_feature("clauses");
        assert!(form.is_selected("variables"));
        form.toggle_feature("variables");
        assert!(!form.is_selected("variables"));
        assert_eq!(form.selected_features, vec!["clauses"]);
    }

    #[test]
    fn test_apply_pattern() {
        let mut form = FormState::new();
        assert!(form.apply_pattern(0));
        assert_eq!(form.query, QUERY_PATTERNS[0].value);
        assert_eq!(form.selected_pattern, Some(0));

        form.push_char(' ');
        assert_eq!(form.selected_pattern, None);

        assert!(!form.apply_pattern(QUERY_PATTERNS.len()));
    }

    #[test]
    fn test_payload_pairs() {
        let mut form = FormState::new();
        form.query = "  variables > 5000000 ".to_string();
        form.toggle_feature("variables");
        form.toggle_feature("clauses");

        let pairs = form.payload().to_pairs();
        assert_eq!(
            pairs,
            vec![
                ("query", "variables > 5000000".to_string()),
                ("selected_features", "variables".to_string()),
                ("selected_features", "clauses".to_string()),
            ]
        );
    }
}
