//! # gestao-cli
//!
//! Command-line front end for the gestao dashboard.

use anyhow::{Context, Result};
use arrow::util::pretty::pretty_format_batches;
use clap::{Parser, Subcommand};
use colored::Colorize;
use gestao_core::pages::analistas::{AnalistasReport, CostTable, DETAIL_EXPORT_FILE};
use gestao_core::pages::graficos::GraficosReport;
use gestao_core::pages::nds::{NdsReport, EXPORT_FILE};
use gestao_core::{
    Dashboard, DashboardConfig, FilterControl, GestaoError, Page, Render, Selections,
};
use gestao_formatting::Tone;
use gestao_sheet::Sheet;
use gestao_viz::ExportFormat;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// gestao - debit note and analyst cost dashboard
#[derive(Parser)]
#[command(name = "gestao")]
#[command(author, version, about = "Dashboard for the debit note workbook", long_about = None)]
struct Cli {
    /// Workbook to read (overrides config and GESTAO_WORKBOOK)
    #[arg(short = 'f', long = "file", global = true, value_name = "XLSX")]
    file: Option<PathBuf>,

    /// YAML configuration file (default: ./gestao.yaml when present)
    #[arg(short = 'c', long = "config", global = true, value_name = "YAML")]
    config: Option<PathBuf>,

    /// Output format (table, json, csv)
    #[arg(short = 'o', long = "format", global = true, default_value = "table")]
    format: OutputFormat,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// NDs Realizadas: filtered debit notes with totals
    Nds {
        /// Filter (Column=Value), repeatable
        #[arg(short = 'F', long = "filter", value_name = "COLUMN=VALUE")]
        filters: Vec<String>,

        /// Write the detail table to an xlsx file
        #[arg(long, value_name = "XLSX", num_args = 0..=1, default_missing_value = EXPORT_FILE)]
        export: Option<PathBuf>,
    },
    /// Analistas: cost recovery per analyst
    Analistas {
        /// Filter (Column=Value), repeatable
        #[arg(short = 'F', long = "filter", value_name = "COLUMN=VALUE")]
        filters: Vec<String>,

        /// Write the cost and detail tables as xlsx files into this directory
        #[arg(long, value_name = "DIR")]
        export_dir: Option<PathBuf>,
    },
    /// Gráficos NDs: reclassified value per area over time
    Graficos {
        /// Filter (Column=Value), repeatable
        #[arg(short = 'F', long = "filter", value_name = "COLUMN=VALUE")]
        filters: Vec<String>,

        /// Write the chart (.html or .json)
        #[arg(
            long,
            value_name = "FILE",
            num_args = 0..=1,
            default_missing_value = "grafico_reclassificacoes.html"
        )]
        chart: Option<PathBuf>,
    },
    /// List the filter choices of a page
    Options {
        /// nds, analistas or graficos
        page: String,
    },
}

/// Output format for results.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
enum OutputFormat {
    /// JSON output
    Json,
    /// CSV output
    Csv,
    /// Pretty table output (default)
    #[default]
    Table,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            let loading = err
                .downcast_ref::<GestaoError>()
                .is_some_and(|e| matches!(e, GestaoError::Source(_)));
            let prefix = if loading {
                "Erro ao carregar dados:"
            } else {
                "Erro:"
            };
            eprintln!("{} {err:#}", prefix.red().bold());
            ExitCode::FAILURE
        }
    }
}

fn init_logging(verbose: bool) {
    let default = if verbose { "info" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .init();
}

/// Defaults, config file and environment, then `--file`.
fn load_config(cli: &Cli) -> Result<DashboardConfig> {
    let mut config = DashboardConfig::resolve(cli.config.as_deref())?;
    if let Some(file) = &cli.file {
        config.workbook.clone_from(file);
    }
    tracing::debug!(workbook = %config.workbook.display(), "using workbook");
    Ok(config)
}

fn run(cli: Cli) -> Result<()> {
    let dashboard = Dashboard::new(load_config(&cli)?);
    let format = cli.format;

    match cli.command {
        Command::Nds { filters, export } => {
            let selections = Selections::from_args(&filters)?;
            let render = dashboard.nds(&selections)?;
            emit(&render, format, print_nds)?;
            if let (Render::Ready(report), Some(path)) = (&render, export) {
                export_sheet(&report.detail, &path)?;
            }
        }
        Command::Analistas {
            filters,
            export_dir,
        } => {
            let selections = Selections::from_args(&filters)?;
            let render = dashboard.analistas(&selections)?;
            emit(&render, format, print_analistas)?;
            if let (Render::Ready(report), Some(dir)) = (&render, export_dir) {
                export_analistas(report, &dir)?;
            }
        }
        Command::Graficos { filters, chart } => {
            let selections = Selections::from_args(&filters)?;
            let render = dashboard.graficos(&selections)?;
            emit(&render, format, print_graficos)?;
            if let (Render::Ready(report), Some(path)) = (&render, chart) {
                export_chart(report, &path)?;
            }
        }
        Command::Options { page } => {
            let page: Page = page.parse()?;
            let render = dashboard.options(page)?;
            emit(&render, format, |controls, format| {
                print_options(page, controls, format)
            })?;
        }
    }
    Ok(())
}

/// Print a page outcome: JSON as is, otherwise the warning or `print`.
fn emit<T, F>(render: &Render<T>, format: OutputFormat, print: F) -> Result<()>
where
    T: Serialize,
    F: FnOnce(&T, OutputFormat) -> Result<()>,
{
    if format == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(render)?);
        return Ok(());
    }
    match render {
        Render::NoData { warning } => {
            println!("{}", warning.yellow());
            Ok(())
        }
        Render::Ready(value) => print(value, format),
    }
}

fn heading(text: &str) {
    println!("\n{}", text.cyan().bold());
}

/// Print a sheet as a pretty table or CSV.
fn print_sheet(sheet: &Sheet, format: OutputFormat) -> Result<()> {
    println!("{}", render_sheet(sheet, format)?);
    Ok(())
}

fn render_sheet(sheet: &Sheet, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Csv => Ok(sheet.to_csv_string()),
        OutputFormat::Table | OutputFormat::Json => {
            if sheet.col_count() == 0 {
                return Ok("(empty table)".to_string());
            }
            let batch = sheet.to_record_batch()?;
            Ok(pretty_format_batches(&[batch])?.to_string())
        }
    }
}

fn print_nds(report: &NdsReport, format: OutputFormat) -> Result<()> {
    if format == OutputFormat::Table {
        println!("{}", "NDs Realizadas".green().bold());
        println!("Total de Horas: {}", report.metrics.hours_display.bold());
        println!("Total de Valor: {}", report.metrics.value_display.bold());
    }
    if let Some(totals) = &report.totals_by_account {
        heading("Totais por Conta Contábil");
        print_sheet(totals, format)?;
    }
    heading("Detalhamento das NDs");
    print_sheet(&report.detail, format)
}

fn print_analistas(report: &AnalistasReport, format: OutputFormat) -> Result<()> {
    for table in [&report.yearly, &report.monthly] {
        heading(&table.title);
        println!("{}", render_cost_table(table, format)?);
    }
    heading("Detalhamento dos Analistas");
    print_sheet(&report.detail, format)
}

/// Cost table with the balance column coloured by tone.
fn render_cost_table(table: &CostTable, format: OutputFormat) -> Result<String> {
    let text = render_sheet(&table.table, format)?;
    if format != OutputFormat::Table {
        return Ok(text);
    }
    let balance_idx = table.table.col_count().saturating_sub(1);

    // Pretty tables open with a border, the header and another border.
    let mut lines: Vec<String> = text.lines().map(str::to_string).collect();
    for (row_idx, tone) in table.balance_tones.iter().enumerate() {
        let Some(line) = lines.get_mut(row_idx + 3) else {
            break;
        };
        let Ok(cell) = table.table.get(row_idx, balance_idx) else {
            continue;
        };
        let cell = cell.to_string();
        if let Some(pos) = line.rfind(&cell) {
            let painted = match tone {
                Tone::Alert => cell.red().bold().to_string(),
                Tone::Healthy => cell.green().bold().to_string(),
                Tone::Neutral => continue,
            };
            line.replace_range(pos..pos + cell.len(), &painted);
        }
    }
    Ok(lines.join("\n"))
}

fn print_graficos(report: &GraficosReport, format: OutputFormat) -> Result<()> {
    heading(&report.chart.title);
    print_sheet(&report.grouped, format)
}

fn print_options(page: Page, controls: &[FilterControl], format: OutputFormat) -> Result<()> {
    if format == OutputFormat::Csv {
        println!("filtro,coluna,opcao");
        for control in controls {
            for option in &control.options {
                println!(
                    "{},{},{}",
                    csv_field(&control.label),
                    csv_field(&control.column),
                    csv_field(option)
                );
            }
        }
        return Ok(());
    }
    println!("{}", page.title().green().bold());
    for control in controls {
        println!("{} ({})", control.label.cyan().bold(), control.column);
        for option in &control.options {
            println!("  {option}");
        }
    }
    Ok(())
}

/// Quote a CSV field when needed.
fn csv_field(text: &str) -> String {
    if text.contains([',', '"', '\n']) {
        format!("\"{}\"", text.replace('"', "\"\""))
    } else {
        text.to_string()
    }
}

fn export_sheet(sheet: &Sheet, path: &Path) -> Result<()> {
    sheet
        .save_as_xlsx(path)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    println!("{} {}", "Exportado:".green(), path.display());
    Ok(())
}

fn export_analistas(report: &AnalistasReport, dir: &Path) -> Result<()> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create {}", dir.display()))?;
    export_sheet(&report.yearly.table, &dir.join(&report.yearly.file_name))?;
    export_sheet(&report.monthly.table, &dir.join(&report.monthly.file_name))?;
    export_sheet(&report.detail, &dir.join(DETAIL_EXPORT_FILE))
}

/// Chart format from the file extension; anything but `.json` is HTML.
fn chart_format(path: &Path) -> ExportFormat {
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("json") => ExportFormat::Json,
        _ => ExportFormat::Html,
    }
}

fn export_chart(report: &GraficosReport, path: &Path) -> Result<()> {
    report
        .chart
        .write_to(path, chart_format(path))
        .with_context(|| format!("Failed to write {}", path.display()))?;
    println!("{} {}", "Exportado:".green(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use gestao_sheet::CellValue;

    #[test]
    fn test_cli_parse_nds_filters() {
        let cli = Cli::parse_from([
            "gestao",
            "nds",
            "--filter",
            "Período ND=Set/25",
            "-F",
            "Área=TI",
        ]);
        match cli.command {
            Command::Nds { filters, export } => {
                assert_eq!(filters, vec!["Período ND=Set/25", "Área=TI"]);
                assert!(export.is_none());
            }
            _ => panic!("expected nds"),
        }
    }

    #[test]
    fn test_cli_parse_export_default_name() {
        let cli = Cli::parse_from(["gestao", "nds", "--export"]);
        match cli.command {
            Command::Nds { export, .. } => assert_eq!(export, Some(PathBuf::from(EXPORT_FILE))),
            _ => panic!("expected nds"),
        }
    }

    #[test]
    fn test_cli_parse_global_flags_after_subcommand() {
        let cli = Cli::parse_from([
            "gestao",
            "graficos",
            "--file",
            "outro.xlsx",
            "--format",
            "json",
            "-v",
        ]);
        assert_eq!(cli.file, Some(PathBuf::from("outro.xlsx")));
        assert_eq!(cli.format, OutputFormat::Json);
        assert!(cli.verbose);
    }

    #[test]
    fn test_cli_parse_options_page() {
        let cli = Cli::parse_from(["gestao", "options", "analistas"]);
        assert!(matches!(cli.command, Command::Options { page } if page == "analistas"));
    }

    #[test]
    fn test_chart_format_from_extension() {
        assert_eq!(chart_format(Path::new("g.JSON")), ExportFormat::Json);
        assert_eq!(chart_format(Path::new("g.html")), ExportFormat::Html);
        assert_eq!(chart_format(Path::new("g")), ExportFormat::Html);
    }

    #[test]
    fn test_csv_field_quoting() {
        assert_eq!(csv_field("Set/25"), "Set/25");
        assert_eq!(csv_field("a,b"), "\"a,b\"");
        assert_eq!(csv_field("say \"hi\""), "\"say \"\"hi\"\"\"");
    }

    #[test]
    fn test_render_sheet_table_and_csv() {
        let sheet = Sheet::from_data(vec![vec!["Área", "Total R$"], vec!["TI", "R$ 1,00"]]);
        let table = render_sheet(&sheet, OutputFormat::Table).unwrap();
        assert!(table.contains("| Área"));
        assert!(table.contains("R$ 1,00"));

        let csv = render_sheet(&sheet, OutputFormat::Csv).unwrap();
        assert_eq!(csv, "Área,Total R$\nTI,\"R$ 1,00\"\n");
    }

    #[test]
    fn test_cost_table_balance_is_painted() {
        colored::control::set_override(true);
        let table = CostTable {
            title: "Análise".into(),
            file_name: "Análise.xlsx".into(),
            table: Sheet::from_parts(
                "Análise",
                vec!["Analista".into(), "Saldo".into()],
                vec![
                    vec![CellValue::from("Total (1)"), CellValue::from("R$ 5,00")],
                    vec![CellValue::from("Ana"), CellValue::from("R$ 5,00")],
                ],
            )
            .unwrap(),
            balance_tones: vec![Tone::Alert, Tone::Alert],
        };
        let text = render_cost_table(&table, OutputFormat::Table).unwrap();
        assert!(text.contains(&"R$ 5,00".red().bold().to_string()));
        colored::control::unset_override();
    }

    #[test]
    fn test_export_sheet_writes_xlsx() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(EXPORT_FILE);
        let sheet = Sheet::from_data(vec![vec!["Área"], vec!["TI"]]);
        export_sheet(&sheet, &path).unwrap();
        assert!(path.exists());
    }
}
