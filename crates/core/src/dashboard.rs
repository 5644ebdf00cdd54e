//! Loading entry point shared by the front ends.

use crate::config::DashboardConfig;
use crate::error::GestaoResult;
use crate::pages::analistas::AnalistasReport;
use crate::pages::graficos::GraficosReport;
use crate::pages::nds::NdsReport;
use crate::pages::{analistas, graficos, nds, Page};
use crate::selection::Selections;
use crate::table::{FilterControl, Render};
use gestao_sheet::Sheet;

/// Reads the workbook fresh for every call; nothing is cached between
/// renders.
#[derive(Debug, Clone)]
pub struct Dashboard {
    config: DashboardConfig,
}

impl Dashboard {
    pub fn new(config: DashboardConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }

    /// Load the worksheet behind `page`.
    pub fn load(&self, page: Page) -> GestaoResult<Sheet> {
        let sheet_name = page.sheet_name(&self.config);
        let sheet = Sheet::from_xlsx_sheet(&self.config.workbook, sheet_name)?;
        tracing::info!(
            page = %page,
            sheet = sheet_name,
            rows = sheet.row_count(),
            "loaded worksheet"
        );
        Ok(sheet)
    }

    /// Filter controls of `page` with their choices.
    pub fn options(&self, page: Page) -> GestaoResult<Render<Vec<FilterControl>>> {
        let sheet = self.load(page)?;
        match page {
            Page::Nds => nds::options(sheet),
            Page::Analistas => analistas::options(sheet),
            Page::Graficos => graficos::options(sheet),
        }
    }

    pub fn nds(&self, selections: &Selections) -> GestaoResult<Render<NdsReport>> {
        nds::render(self.load(Page::Nds)?, selections, &self.config.hidden_columns)
    }

    pub fn analistas(&self, selections: &Selections) -> GestaoResult<Render<AnalistasReport>> {
        analistas::render(self.load(Page::Analistas)?, selections)
    }

    pub fn graficos(&self, selections: &Selections) -> GestaoResult<Render<GraficosReport>> {
        let size = (self.config.chart.width, self.config.chart.height);
        graficos::render(self.load(Page::Graficos)?, selections, size)
    }
}
