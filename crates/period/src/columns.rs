//! Column-role detection.
//!
//! Header spelling drifts between workbook revisions ("Período ND",
//! "Periodo_ND", "PERIODO DA ND"), so roles are found on normalized names:
//! an exact pass first, then a keyword fallback.

use crate::normalize::normalize_name;
use serde::Serialize;

/// Which calendar period a column represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PeriodRole {
    /// Period the debit note refers to
    Nd,
    /// Period the hours were allocated to
    Allocation,
    /// Accounting closing period
    Closing,
}

impl PeriodRole {
    /// All roles, in detection order
    pub const ALL: [PeriodRole; 3] = [PeriodRole::Nd, PeriodRole::Allocation, PeriodRole::Closing];

    /// Display label used for filter controls
    pub fn label(self) -> &'static str {
        match self {
            PeriodRole::Nd => "Período ND",
            PeriodRole::Allocation => "Período Alocação",
            PeriodRole::Closing => "Período Fechamento",
        }
    }

    fn exact_name(self) -> &'static str {
        match self {
            PeriodRole::Nd => "periodond",
            PeriodRole::Allocation => "periodoalocacao",
            PeriodRole::Closing => "periodofechamento",
        }
    }

    fn matches_keywords(self, normalized: &str) -> bool {
        if !normalized.contains("periodo") {
            return false;
        }
        let has_nd = normalized.contains("nd");
        match self {
            PeriodRole::Nd => has_nd,
            PeriodRole::Allocation => {
                !has_nd && ["aloc", "alocacao"].iter().any(|k| normalized.contains(k))
            }
            PeriodRole::Closing => {
                !has_nd && ["fech", "fechamento"].iter().any(|k| normalized.contains(k))
            }
        }
    }
}

/// Resolved column name per role; `None` when the dataset has no such column.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PeriodColumns {
    pub nd: Option<String>,
    pub allocation: Option<String>,
    pub closing: Option<String>,
}

impl PeriodColumns {
    pub fn get(&self, role: PeriodRole) -> Option<&str> {
        match role {
            PeriodRole::Nd => self.nd.as_deref(),
            PeriodRole::Allocation => self.allocation.as_deref(),
            PeriodRole::Closing => self.closing.as_deref(),
        }
    }

    fn slot_mut(&mut self, role: PeriodRole) -> &mut Option<String> {
        match role {
            PeriodRole::Nd => &mut self.nd,
            PeriodRole::Allocation => &mut self.allocation,
            PeriodRole::Closing => &mut self.closing,
        }
    }

    /// Roles that resolved to a column, in role order
    pub fn resolved(&self) -> impl Iterator<Item = (PeriodRole, &str)> + '_ {
        PeriodRole::ALL
            .into_iter()
            .filter_map(|role| self.get(role).map(|column| (role, column)))
    }

    /// The role a column was assigned, if any
    pub fn role_of(&self, column: &str) -> Option<PeriodRole> {
        self.resolved()
            .find(|(_, name)| *name == column)
            .map(|(role, _)| role)
    }

    pub fn is_period_column(&self, column: &str) -> bool {
        self.role_of(column).is_some()
    }
}

/// Assign period roles to columns.
///
/// The first column in order wins each role and a filled role is never
/// overwritten. Columns that also mention `nd` are never taken as
/// allocation or closing periods.
pub fn detect_period_columns<S: AsRef<str>>(column_names: &[S]) -> PeriodColumns {
    let normalized: Vec<(&str, String)> = column_names
        .iter()
        .map(|name| (name.as_ref(), normalize_name(name.as_ref())))
        .collect();

    let mut columns = PeriodColumns::default();

    for role in PeriodRole::ALL {
        if let Some((name, _)) = normalized.iter().find(|(_, n)| n == role.exact_name()) {
            *columns.slot_mut(role) = Some((*name).to_string());
        }
    }

    for role in PeriodRole::ALL {
        let slot = columns.slot_mut(role);
        if slot.is_some() {
            continue;
        }
        if let Some((name, _)) = normalized.iter().find(|(_, n)| role.matches_keywords(n)) {
            *slot = Some((*name).to_string());
        }
    }

    tracing::debug!(
        nd = ?columns.nd,
        allocation = ?columns.allocation,
        closing = ?columns.closing,
        "detected period columns"
    );
    columns
}

/// First column whose normalized name contains every keyword. Keywords
/// must already be normalized.
pub fn find_column_by_keywords<'a, S: AsRef<str>>(
    column_names: &'a [S],
    keywords: &[&str],
) -> Option<&'a str> {
    column_names
        .iter()
        .map(AsRef::as_ref)
        .find(|name| {
            let normalized = normalize_name(name);
            keywords.iter().all(|k| normalized.contains(k))
        })
}

/// Locate the column behind a filter label such as `"Conta Contábil"`.
///
/// An exact, case-insensitive match on the trimmed name wins. Otherwise
/// every word of the label longer than one character must appear in the
/// normalized column name.
pub fn find_column<'a, S: AsRef<str>>(column_names: &'a [S], label: &str) -> Option<&'a str> {
    let wanted = label.trim().to_lowercase();
    if let Some(exact) = column_names
        .iter()
        .map(AsRef::as_ref)
        .find(|name| name.trim().to_lowercase() == wanted)
    {
        return Some(exact);
    }

    let words: Vec<String> = label
        .split(|c: char| !(c.is_alphanumeric() || c == '_'))
        .filter(|w| w.chars().count() > 1)
        .map(normalize_name)
        .filter(|w| !w.is_empty())
        .collect();
    if words.is_empty() {
        return None;
    }
    let keywords: Vec<&str> = words.iter().map(String::as_str).collect();
    find_column_by_keywords(column_names, &keywords)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_names_win_over_keywords() {
        let cols = detect_period_columns(&[
            "Periodo Alocacao Antigo",
            "Período Alocação",
            "Período Fechamento",
        ]);
        assert_eq!(cols.allocation.as_deref(), Some("Período Alocação"));
        assert_eq!(cols.closing.as_deref(), Some("Período Fechamento"));
        assert_eq!(cols.nd, None);
    }

    #[test]
    fn test_keyword_fallback_excludes_nd() {
        let cols = detect_period_columns(&["Periodo Fech ND", "Período de Fech."]);
        assert_eq!(cols.nd.as_deref(), Some("Periodo Fech ND"));
        assert_eq!(cols.closing.as_deref(), Some("Período de Fech."));
    }

    #[test]
    fn test_earliest_column_wins() {
        let cols = detect_period_columns(&["Periodo da ND", "Periodo ND (revisado)"]);
        assert_eq!(cols.nd.as_deref(), Some("Periodo da ND"));
    }

    #[test]
    fn test_roles_without_columns_stay_empty() {
        let cols = detect_period_columns(&["Área", "Analista"]);
        assert_eq!(cols, PeriodColumns::default());
        assert_eq!(cols.resolved().count(), 0);
    }

    #[test]
    fn test_role_of() {
        let cols = detect_period_columns(&["Período ND", "Área"]);
        assert_eq!(cols.role_of("Período ND"), Some(PeriodRole::Nd));
        assert!(!cols.is_period_column("Área"));
    }

    #[test]
    fn test_find_column_exact_then_keywords() {
        let names = ["Conta Contábil ", "Status do Portal", "Área"];
        assert_eq!(find_column(&names, "conta contábil"), Some("Conta Contábil "));
        assert_eq!(find_column(&names, "Status Portal"), Some("Status do Portal"));
        assert_eq!(find_column(&names, "Area"), Some("Área"));
        assert_eq!(find_column(&names, "Projeto"), None);
    }

    #[test]
    fn test_find_column_by_keywords() {
        let names = vec!["Horas".to_string(), "Valor Hora".to_string()];
        assert_eq!(find_column_by_keywords(&names, &["valor"]), Some("Valor Hora"));
    }
}
