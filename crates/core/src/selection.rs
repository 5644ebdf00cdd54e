//! Request-scoped filter selections.

use crate::error::{GestaoError, GestaoResult};
use gestao_period::normalize_name;
use indexmap::IndexMap;

/// Values picked per filter, keyed by the name the user typed (a control
/// label such as `Área` or a real column name).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selections {
    picks: IndexMap<String, Vec<String>>,
}

impl Selections {
    pub fn new() -> Self {
        Self::default()
    }

    /// Split a `Column=Value` argument. The column is trimmed and must not
    /// be empty; the value is trimmed.
    pub fn parse_filter_arg(arg: &str) -> GestaoResult<(String, String)> {
        let (key, value) = arg
            .split_once('=')
            .ok_or_else(|| GestaoError::InvalidFilter(arg.to_string()))?;
        let key = key.trim();
        if key.is_empty() {
            return Err(GestaoError::InvalidFilter(arg.to_string()));
        }
        Ok((key.to_string(), value.trim().to_string()))
    }

    /// Build from repeated `Column=Value` arguments.
    pub fn from_args<I, S>(args: I) -> GestaoResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut selections = Self::new();
        for arg in args {
            let (key, value) = Self::parse_filter_arg(arg.as_ref())?;
            selections.insert(key, value);
        }
        Ok(selections)
    }

    /// Build from already split pairs, e.g. a query string.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut selections = Self::new();
        for (key, value) in pairs {
            selections.insert(key, value);
        }
        selections
    }

    /// Add one picked value. Empty values are ignored.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let value = value.into();
        if value.is_empty() {
            return;
        }
        let values = self.picks.entry(key.into()).or_default();
        if !values.contains(&value) {
            values.push(value);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.picks.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.picks.keys().map(String::as_str)
    }

    /// Values picked for a control, found by its label or its column.
    /// Keys are compared exactly first, then by normalized name.
    pub fn get(&self, label: &str, column: &str) -> &[String] {
        if let Some(values) = self.picks.get(label).or_else(|| self.picks.get(column)) {
            return values;
        }
        let wanted = [normalize_name(label), normalize_name(column)];
        self.picks
            .iter()
            .find(|(key, _)| wanted.contains(&normalize_name(key)))
            .map(|(_, values)| values.as_slice())
            .unwrap_or_default()
    }

    /// Whether `key` addresses the given label or column.
    pub(crate) fn key_matches(key: &str, label: &str, column: &str) -> bool {
        key == label || key == column || {
            let key = normalize_name(key);
            key == normalize_name(label) || key == normalize_name(column)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_filter_arg() {
        assert_eq!(
            Selections::parse_filter_arg("Área = TI").unwrap(),
            ("Área".to_string(), "TI".to_string())
        );
        assert_eq!(
            Selections::parse_filter_arg("Conta=a=b").unwrap(),
            ("Conta".to_string(), "a=b".to_string())
        );
        assert!(Selections::parse_filter_arg("Área").is_err());
        assert!(Selections::parse_filter_arg("=TI").is_err());
    }

    #[test]
    fn test_repeated_keys_accumulate() {
        let selections =
            Selections::from_args(["Área=TI", "Área=RH", "Área=TI", "Projeto="]).unwrap();
        assert_eq!(selections.get("Área", "Área"), ["TI", "RH"]);
        assert_eq!(selections.keys().collect::<Vec<_>>(), vec!["Área"]);
    }

    #[test]
    fn test_lookup_by_label_column_or_normalized_name() {
        let selections = Selections::from_pairs([
            ("Periodo_ND", "Set/25"),
            ("Status do Portal", "Aprovado"),
        ]);
        assert_eq!(selections.get("Período ND", "Período ND"), ["Set/25"]);
        assert_eq!(selections.get("Status Portal", "Status do Portal"), ["Aprovado"]);
        assert!(selections.get("Área", "Área").is_empty());
    }
}
