//! The dashboard pages.

pub mod analistas;
pub mod graficos;
pub mod nds;

use crate::config::DashboardConfig;
use crate::error::GestaoError;
use gestao_period::normalize_name;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Page {
    Nds,
    Analistas,
    Graficos,
}

impl Page {
    pub const ALL: [Page; 3] = [Page::Nds, Page::Analistas, Page::Graficos];

    /// URL and command name
    pub fn slug(self) -> &'static str {
        match self {
            Page::Nds => "nds",
            Page::Analistas => "analistas",
            Page::Graficos => "graficos",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Page::Nds => "NDs Realizadas",
            Page::Analistas => "Analistas",
            Page::Graficos => "Reclassificações por Área",
        }
    }

    /// Worksheet the page reads
    pub fn sheet_name(self, config: &DashboardConfig) -> &str {
        match self {
            Page::Nds | Page::Graficos => &config.sheets.nds,
            Page::Analistas => &config.sheets.analistas,
        }
    }
}

impl fmt::Display for Page {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

impl FromStr for Page {
    type Err = GestaoError;

    /// Accepts the slug or the page title, ignoring case and accents.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = normalize_name(s);
        Page::ALL
            .into_iter()
            .find(|page| wanted == page.slug() || wanted == normalize_name(page.title()))
            .or_else(|| (wanted == "graficosnds").then_some(Page::Graficos))
            .ok_or_else(|| GestaoError::UnknownPage(s.to_string()))
    }
}
