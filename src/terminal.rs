//! Terminal rendering of threat reports.
//!
//! Same report content as the HTML surface (same gate, tally order,
//! truncation, and sensitive-info rules), produced as indented text with
//! optional ANSI styling.

use crate::models::{ReportInput, ScanResult, SensitiveInfo};
use crate::summary::{summary_line, tally_categories};
use crate::utils::{capitalize_label, truncate_preview};
use console::Style;

const REPORT_TITLE: &str = "Content Threat Analysis Report";

pub struct TerminalReporter {
    header: Style,
    path: Style,
    label: Style,
    alert: Style,
    ok: Style,
}

impl TerminalReporter {
    pub fn colored() -> Self {
        Self {
            header: Style::new().bold(),
            path: Style::new().cyan().bold(),
            label: Style::new().dim(),
            alert: Style::new().red(),
            ok: Style::new().green().bold(),
        }
    }

    /// No style attributes, so output is plain deterministic bytes.
    /// Used for `--no-color` and in tests.
    pub fn plain() -> Self {
        Self {
            header: Style::new(),
            path: Style::new(),
            label: Style::new(),
            alert: Style::new(),
            ok: Style::new(),
        }
    }

    /// Build the full report as a single string. Pure: no I/O.
    pub fn render(&self, input: &ReportInput) -> String {
        let mut out = String::new();
        out.push_str(&format!("{}\n", self.header.apply_to(REPORT_TITLE)));
        out.push_str(&format!("{}\n\n", "=".repeat(REPORT_TITLE.len())));

        if !input.threats_found {
            out.push_str(&format!("{} No threats detected.\n", self.ok.apply_to("✓")));
            return out;
        }

        let tally = tally_categories(&input.data);
        out.push_str(&format!("{}\n", self.header.apply_to("Threat Summary")));
        for (category, count) in tally.iter() {
            out.push_str(&format!(
                "  {}\n",
                self.alert.apply_to(summary_line(category, count))
            ));
        }
        out.push('\n');

        out.push_str(&format!("{}\n\n", self.header.apply_to("Flagged Files")));
        for result in &input.data {
            self.render_result(&mut out, result);
            out.push('\n');
        }

        out
    }

    /// Render straight to stdout.
    pub fn print(&self, input: &ReportInput) {
        print!("{}", self.render(input));
    }

    fn render_result(&self, out: &mut String, result: &ScanResult) {
        out.push_str(&format!(
            "{}  [{}]\n",
            self.path.apply_to(&result.path),
            result.threat_class.join(", ")
        ));
        out.push_str(&format!("  {}\n", self.label.apply_to("Preview:")));
        for line in truncate_preview(&result.content).lines() {
            out.push_str(&format!("    {}\n", line));
        }
        if result.sensitive_info.has_findings() {
            self.render_sensitive(out, &result.sensitive_info);
        }
    }

    fn render_sensitive(&self, out: &mut String, info: &SensitiveInfo) {
        out.push_str(&format!(
            "  {}\n",
            self.alert.apply_to("Sensitive information:")
        ));
        for flag in &info.flags {
            out.push_str(&format!("    ▸ {}\n", flag));
        }
        for (name, value) in info.present_entities() {
            out.push_str(&format!(
                "    {}: {}\n",
                capitalize_label(name),
                value.display_text()
            ));
        }
    }
}
