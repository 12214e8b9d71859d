use crate::aggregation::{format_rating, AggregateResult, CategoryBreakdown, CategoryTypeStats};
use crate::comparison::{ComparisonResult, Finding};
use crate::formatting::{priority_marker, ColoredFormatter, FormattingConfig, OutputFormatter};
use crate::insights::{FlowStats, Insight};
use crate::ranking::RankingEntry;
use crate::report::DashboardReport;
use comfy_table::{presets, ContentArrangement, Table};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::io::Write;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Terminal,
    Markdown,
    Json,
}

/// Renders engine results in one output format.
pub trait OutputWriter {
    fn write_report(&mut self, report: &DashboardReport) -> anyhow::Result<()>;
    fn write_ranking(&mut self, title: &str, entries: &[RankingEntry]) -> anyhow::Result<()>;
    fn write_comparison(&mut self, comparison: &ComparisonResult) -> anyhow::Result<()>;
    fn write_issues(
        &mut self,
        categories: &[CategoryBreakdown],
        category_types: &[CategoryTypeStats],
    ) -> anyhow::Result<()>;
    fn flush(&mut self) -> anyhow::Result<()>;
}

pub fn create_writer<'w>(
    format: OutputFormat,
    writer: Box<dyn Write + 'w>,
    formatting: FormattingConfig,
) -> Box<dyn OutputWriter + 'w> {
    match format {
        OutputFormat::Json => Box::new(JsonWriter::new(writer)),
        OutputFormat::Markdown => Box::new(MarkdownWriter::new(writer)),
        OutputFormat::Terminal => Box::new(TerminalWriter::new(writer, formatting)),
    }
}

pub struct JsonWriter<W: Write> {
    writer: W,
}

impl<W: Write> JsonWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    fn emit<T: Serialize>(&mut self, value: &T) -> anyhow::Result<()> {
        serde_json::to_writer_pretty(&mut self.writer, value)?;
        writeln!(self.writer)?;
        Ok(())
    }
}

impl<W: Write> OutputWriter for JsonWriter<W> {
    fn write_report(&mut self, report: &DashboardReport) -> anyhow::Result<()> {
        self.emit(report)
    }

    fn write_ranking(&mut self, title: &str, entries: &[RankingEntry]) -> anyhow::Result<()> {
        self.emit(&json!({ "title": title, "entries": entries }))
    }

    fn write_comparison(&mut self, comparison: &ComparisonResult) -> anyhow::Result<()> {
        self.emit(comparison)
    }

    fn write_issues(
        &mut self,
        categories: &[CategoryBreakdown],
        category_types: &[CategoryTypeStats],
    ) -> anyhow::Result<()> {
        self.emit(&json!({ "categories": categories, "category_types": category_types }))
    }

    fn flush(&mut self) -> anyhow::Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}

fn severity_cell(row: &CategoryBreakdown) -> String {
    match (row.technical_severity, row.severity_band) {
        (Some(value), Some(band)) => format!("{band} ({value:.1})"),
        _ => "N/A".to_string(),
    }
}

fn summary_rows(stats: &AggregateResult) -> Vec<(&'static str, String)> {
    let mut rows = vec![
        ("Reviews", stats.count.to_string()),
        ("Share of dataset", format!("{}%", stats.percentage_of_parent)),
        ("Average rating", format!("{}/5", stats.formatted_rating())),
        ("Negative", format!("{}%", stats.negative_rate)),
        ("Positive", format!("{}%", stats.positive_rate)),
        ("Customer service impact", format!("{}%", stats.cs_impact_rate)),
    ];
    if let Some(severity) = stats.technical_severity_average {
        rows.push(("Technical severity", format!("{severity:.1}")));
    }
    rows
}

/// Table-cell text with pipes escaped and line breaks flattened.
fn escape_cell(text: &str) -> String {
    text.replace('|', "\\|").replace(['\r', '\n'], " ")
}

pub struct MarkdownWriter<W: Write> {
    writer: W,
}

impl<W: Write> MarkdownWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    fn write_ranking_table(&mut self, entries: &[RankingEntry]) -> anyhow::Result<()> {
        if entries.is_empty() {
            writeln!(self.writer, "_No categories to rank._")?;
            return Ok(());
        }
        writeln!(self.writer, "| # | Category | Reviews | Share |")?;
        writeln!(self.writer, "|---|----------|---------|-------|")?;
        for (i, entry) in entries.iter().enumerate() {
            writeln!(
                self.writer,
                "| {} | {} | {} | {}% |",
                i + 1,
                escape_cell(&entry.label),
                entry.count,
                entry.percentage_of_subset
            )?;
        }
        writeln!(self.writer)?;
        Ok(())
    }

    fn write_insight_list(&mut self, insights: &[Insight]) -> anyhow::Result<()> {
        for insight in insights {
            writeln!(
                self.writer,
                "- {} **{}**: {}",
                priority_marker(insight.priority).0,
                insight.title,
                insight.message
            )?;
        }
        writeln!(self.writer)?;
        Ok(())
    }

    fn write_findings(&mut self, findings: &[Finding]) -> anyhow::Result<()> {
        for finding in findings {
            writeln!(
                self.writer,
                "- {} **{}**: {}",
                priority_marker(finding.priority).0,
                finding.title,
                finding.message
            )?;
        }
        writeln!(self.writer)?;
        Ok(())
    }

    fn write_flows(&mut self, flows: &[FlowStats]) -> anyhow::Result<()> {
        writeln!(self.writer, "| Flow | Impact | Mentions | Negative | Avg Rating |")?;
        writeln!(self.writer, "|------|--------|----------|----------|------------|")?;
        for flow in flows {
            writeln!(
                self.writer,
                "| {} | {} | {} ({}%) | {}% | {}/5 |",
                escape_cell(&flow.name),
                flow.impact,
                flow.mentions,
                flow.share_of_subset,
                flow.negative_rate,
                format_rating(flow.average_rating)
            )?;
        }
        writeln!(self.writer)?;
        Ok(())
    }
}

impl<W: Write> OutputWriter for MarkdownWriter<W> {
    fn write_report(&mut self, report: &DashboardReport) -> anyhow::Result<()> {
        writeln!(self.writer, "# Review Analysis Report")?;
        writeln!(self.writer)?;
        writeln!(
            self.writer,
            "Generated: {}",
            report.metadata.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
        )?;
        if !report.metadata.active_filters.is_empty() {
            writeln!(
                self.writer,
                "Active filters: {}",
                report.metadata.active_filters.join(", ")
            )?;
        }
        writeln!(self.writer)?;

        writeln!(self.writer, "## Summary")?;
        writeln!(self.writer)?;
        writeln!(self.writer, "| Metric | Value |")?;
        writeln!(self.writer, "|--------|-------|")?;
        for (metric, value) in summary_rows(&report.summary) {
            writeln!(self.writer, "| {metric} | {value} |")?;
        }
        writeln!(self.writer)?;

        writeln!(self.writer, "## Key Insights")?;
        writeln!(self.writer)?;
        self.write_insight_list(&report.overview)?;

        writeln!(self.writer, "## Top Categories")?;
        writeln!(self.writer)?;
        self.write_ranking_table(&report.top_categories)?;

        writeln!(self.writer, "## Top Complaints")?;
        writeln!(self.writer)?;
        self.write_ranking_table(&report.top_negative_issues)?;

        self.write_issues(&report.category_breakdown, &report.category_type_stats)?;

        writeln!(self.writer, "## User Flows")?;
        writeln!(self.writer)?;
        self.write_flows(&report.flows)?;

        for comparison in &report.comparisons {
            self.write_comparison(comparison)?;
        }

        for segment in &report.segments {
            writeln!(self.writer, "### {}", segment.label)?;
            writeln!(self.writer)?;
            self.write_insight_list(&segment.insights)?;
        }
        Ok(())
    }

    fn write_ranking(&mut self, title: &str, entries: &[RankingEntry]) -> anyhow::Result<()> {
        writeln!(self.writer, "## {title}")?;
        writeln!(self.writer)?;
        self.write_ranking_table(entries)
    }

    fn write_comparison(&mut self, comparison: &ComparisonResult) -> anyhow::Result<()> {
        writeln!(
            self.writer,
            "## {} vs {} ({})",
            comparison.left.label, comparison.right.label, comparison.dimension
        )?;
        writeln!(self.writer)?;
        writeln!(
            self.writer,
            "| Metric | {} | {} |",
            escape_cell(&comparison.left.label),
            escape_cell(&comparison.right.label)
        )?;
        writeln!(self.writer, "|--------|------|------|")?;
        let (l, r) = (&comparison.left.stats, &comparison.right.stats);
        writeln!(self.writer, "| Reviews | {} | {} |", l.count, r.count)?;
        writeln!(self.writer, "| Negative | {}% | {}% |", l.negative_rate, r.negative_rate)?;
        writeln!(
            self.writer,
            "| Average rating | {} | {} |",
            l.formatted_rating(),
            r.formatted_rating()
        )?;
        writeln!(self.writer)?;
        self.write_findings(&comparison.findings)
    }

    fn write_issues(
        &mut self,
        categories: &[CategoryBreakdown],
        category_types: &[CategoryTypeStats],
    ) -> anyhow::Result<()> {
        writeln!(self.writer, "## Issues")?;
        writeln!(self.writer)?;
        writeln!(
            self.writer,
            "| Category | Reviews | Share | Sentiment | Severity | CS Impact |"
        )?;
        writeln!(
            self.writer,
            "|----------|---------|-------|-----------|----------|-----------|"
        )?;
        for row in categories {
            writeln!(
                self.writer,
                "| {} | {} | {}% | {:.2} | {} | {} ({}%) |",
                escape_cell(&row.category),
                row.count,
                row.percentage,
                row.average_sentiment,
                severity_cell(row),
                row.impact_band,
                row.impact_pct
            )?;
        }
        writeln!(self.writer)?;

        writeln!(self.writer, "## Category Types")?;
        writeln!(self.writer)?;
        writeln!(
            self.writer,
            "| Type | Reviews | Share | Negative | Avg Rating | Owner |"
        )?;
        writeln!(
            self.writer,
            "|------|---------|-------|----------|------------|-------|"
        )?;
        for row in category_types {
            writeln!(
                self.writer,
                "| {} | {} | {}% | {}% | {}/5 | {} |",
                escape_cell(&row.category_type),
                row.count,
                row.percentage,
                row.negative_pct,
                format_rating(row.average_rating),
                escape_cell(&row.main_actionable_by)
            )?;
        }
        writeln!(self.writer)?;
        Ok(())
    }

    fn flush(&mut self) -> anyhow::Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}

pub struct TerminalWriter<W: Write> {
    writer: W,
    formatter: ColoredFormatter,
    ascii: bool,
}

impl<W: Write> TerminalWriter<W> {
    pub fn new(writer: W, config: FormattingConfig) -> Self {
        Self {
            writer,
            ascii: !config.emoji.should_use_emoji(),
            formatter: ColoredFormatter::new(config),
        }
    }

    fn table(&self, header: Vec<&str>) -> Table {
        let mut table = Table::new();
        table
            .load_preset(if self.ascii {
                presets::ASCII_FULL
            } else {
                presets::UTF8_FULL
            })
            .set_content_arrangement(ContentArrangement::Dynamic)
            .set_header(header);
        table
    }

    fn section(&mut self, title: &str) -> anyhow::Result<()> {
        writeln!(self.writer)?;
        writeln!(self.writer, "{}", self.formatter.header(title))?;
        Ok(())
    }

    fn line(
        &mut self,
        marker: String,
        title: &str,
        message: &str,
        priority: crate::core::Priority,
    ) -> anyhow::Result<()> {
        writeln!(
            self.writer,
            "  {} {}: {}",
            marker,
            self.formatter.priority(title, priority),
            message
        )?;
        Ok(())
    }

    fn write_insights(&mut self, insights: &[Insight]) -> anyhow::Result<()> {
        for insight in insights {
            let marker = self.formatter.marker(insight.priority);
            self.line(marker, &insight.title, &insight.message, insight.priority)?;
        }
        Ok(())
    }

    fn ranking_table(&self, entries: &[RankingEntry]) -> Table {
        let mut table = self.table(vec!["#", "Category", "Reviews", "Share"]);
        for (i, entry) in entries.iter().enumerate() {
            table.add_row(vec![
                (i + 1).to_string(),
                entry.label.clone(),
                entry.count.to_string(),
                format!("{}%", entry.percentage_of_subset),
            ]);
        }
        table
    }

    fn write_ranking_body(&mut self, entries: &[RankingEntry]) -> anyhow::Result<()> {
        if entries.is_empty() {
            writeln!(self.writer, "  {}", self.formatter.dim("No categories to rank."))?;
            return Ok(());
        }
        let table = self.ranking_table(entries);
        writeln!(self.writer, "{table}")?;
        Ok(())
    }
}

impl<W: Write> OutputWriter for TerminalWriter<W> {
    fn write_report(&mut self, report: &DashboardReport) -> anyhow::Result<()> {
        writeln!(self.writer, "{}", self.formatter.header("REVIEW ANALYSIS"))?;
        if !report.metadata.active_filters.is_empty() {
            writeln!(
                self.writer,
                "{} {}",
                self.formatter.bold("Active:"),
                report.metadata.active_filters.join(", ")
            )?;
        }

        if report.is_empty() {
            writeln!(self.writer)?;
            writeln!(self.writer, "No reviews match the current filters.")?;
        }

        self.section("Summary")?;
        let mut table = self.table(vec!["Metric", "Value"]);
        for (metric, value) in summary_rows(&report.summary) {
            table.add_row(vec![metric.to_string(), value]);
        }
        writeln!(self.writer, "{table}")?;

        self.section("Key Insights")?;
        self.write_insights(&report.overview)?;

        self.section("Top Categories")?;
        self.write_ranking_body(&report.top_categories)?;

        self.section("Top Complaints")?;
        self.write_ranking_body(&report.top_negative_issues)?;

        self.write_issues(&report.category_breakdown, &report.category_type_stats)?;

        self.section("User Flows")?;
        let mut flows = self.table(vec!["Flow", "Impact", "Mentions", "Negative", "Avg Rating"]);
        for flow in &report.flows {
            flows.add_row(vec![
                flow.name.clone(),
                flow.impact.to_string(),
                format!("{} ({}%)", flow.mentions, flow.share_of_subset),
                format!("{}%", flow.negative_rate),
                format!("{}/5", format_rating(flow.average_rating)),
            ]);
        }
        writeln!(self.writer, "{flows}")?;

        if !report.yearly_trends.is_empty() {
            self.section("Trends by Year")?;
            let mut trends =
                self.table(vec!["Year", "Reviews", "Avg Rating", "Negative", "Positive"]);
            for trend in &report.yearly_trends {
                trends.add_row(vec![
                    trend.year.clone(),
                    trend.count.to_string(),
                    format_rating(trend.average_rating),
                    format!("{}%", trend.negative_pct),
                    format!("{}%", trend.positive_pct),
                ]);
            }
            writeln!(self.writer, "{trends}")?;
        }

        for comparison in &report.comparisons {
            self.write_comparison(comparison)?;
        }

        for segment in &report.segments {
            self.section(&format!("{} ({})", segment.label, segment.dimension))?;
            self.write_insights(&segment.insights)?;
        }
        Ok(())
    }

    fn write_ranking(&mut self, title: &str, entries: &[RankingEntry]) -> anyhow::Result<()> {
        writeln!(self.writer, "{}", self.formatter.header(title))?;
        self.write_ranking_body(entries)
    }

    fn write_comparison(&mut self, comparison: &ComparisonResult) -> anyhow::Result<()> {
        self.section(&format!(
            "{} vs {} ({})",
            comparison.left.label, comparison.right.label, comparison.dimension
        ))?;
        let (l, r) = (&comparison.left.stats, &comparison.right.stats);
        let mut table = self.table(vec![
            "Metric",
            comparison.left.label.as_str(),
            comparison.right.label.as_str(),
        ]);
        table.add_row(vec!["Reviews".to_string(), l.count.to_string(), r.count.to_string()]);
        table.add_row(vec![
            "Negative".to_string(),
            format!("{}%", l.negative_rate),
            format!("{}%", r.negative_rate),
        ]);
        table.add_row(vec![
            "Average rating".to_string(),
            l.formatted_rating(),
            r.formatted_rating(),
        ]);
        for group in &comparison.issue_groups {
            table.add_row(vec![
                format!("{} issues", group.group),
                format!("{}%", group.left_rate),
                format!("{}%", group.right_rate),
            ]);
        }
        writeln!(self.writer, "{table}")?;

        for finding in &comparison.findings {
            let marker = self.formatter.marker(finding.priority);
            self.line(marker, &finding.title, &finding.message, finding.priority)?;
        }
        Ok(())
    }

    fn write_issues(
        &mut self,
        categories: &[CategoryBreakdown],
        category_types: &[CategoryTypeStats],
    ) -> anyhow::Result<()> {
        self.section("Issues")?;
        let mut table = self.table(vec![
            "Category",
            "Reviews",
            "Share",
            "Sentiment",
            "Severity",
            "CS Impact",
        ]);
        for row in categories {
            table.add_row(vec![
                row.category.clone(),
                row.count.to_string(),
                format!("{}%", row.percentage),
                self.formatter
                    .tone(&format!("{:.2}", row.average_sentiment), row.tone),
                severity_cell(row),
                self.formatter.priority(
                    &format!("{} ({}%)", row.impact_band, row.impact_pct),
                    row.impact_band,
                ),
            ]);
        }
        writeln!(self.writer, "{table}")?;

        self.section("Category Types")?;
        let mut types = self.table(vec![
            "Type",
            "Reviews",
            "Share",
            "Negative",
            "Avg Rating",
            "Owner",
        ]);
        for row in category_types {
            types.add_row(vec![
                row.category_type.clone(),
                row.count.to_string(),
                format!("{}%", row.percentage),
                format!("{}%", row.negative_pct),
                format!("{}/5", format_rating(row.average_rating)),
                row.main_actionable_by.clone(),
            ]);
        }
        writeln!(self.writer, "{types}")?;
        Ok(())
    }

    fn flush(&mut self) -> anyhow::Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}
