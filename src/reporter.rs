use crate::errors::{CasefileError, CasefileResult};
use crate::models::{ReportInput, ScanResult, SensitiveInfo};
use crate::summary::{summary_line, tally_categories};
use crate::utils::{capitalize_label, truncate_preview};
use chrono::{DateTime, Utc};
use std::path::Path;

/// Escape text for HTML body and attribute positions. Ampersand is
/// replaced first so the entities added by later substitutions survive.
pub fn html_escape(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

/// Renders a `ReportInput` as a self-contained HTML page.
///
/// The generation timestamp is captured at construction so rendering the
/// same input twice produces identical documents.
pub struct HtmlReporter {
    generated_at: DateTime<Utc>,
}

impl HtmlReporter {
    pub fn new() -> Self {
        Self {
            generated_at: Utc::now(),
        }
    }

    /// Fixed timestamp, for deterministic output in tests and benches.
    pub fn with_timestamp(generated_at: DateTime<Utc>) -> Self {
        Self { generated_at }
    }

    pub fn generate_report(&self, input: &ReportInput, path: &Path) -> CasefileResult<()> {
        let html_content = self.generate_html(input);
        std::fs::write(path, html_content)
            .map_err(|source| CasefileError::io(source, Some(path.to_path_buf())))?;
        println!("📄 HTML report generated: {}", path.display());
        Ok(())
    }

    fn render_all_clear() -> String {
        r#"
            <section class="all-clear">
                <div class="all-clear-icon">✓</div>
                <h2 class="all-clear-title">No threats detected.</h2>
                <p class="all-clear-note">Every scanned file came back clean.</p>
            </section>
        "#
        .to_string()
    }

    fn render_sensitive_panel(info: &SensitiveInfo) -> String {
        let mut flag_items = String::new();
        for flag in &info.flags {
            flag_items.push_str(&format!(
                r#"<li class="flag-line">{}</li>"#,
                html_escape(flag)
            ));
        }
        let flag_list = if flag_items.is_empty() {
            String::new()
        } else {
            format!(r#"<ul class="flag-list">{}</ul>"#, flag_items)
        };

        let mut entity_items = String::new();
        for (name, value) in info.present_entities() {
            let line = format!("{}: {}", capitalize_label(name), value.display_text());
            entity_items.push_str(&format!(
                r#"<li class="entity-line">{}</li>"#,
                html_escape(&line)
            ));
        }
        let entity_list = if entity_items.is_empty() {
            String::new()
        } else {
            format!(r#"<ul class="entity-list">{}</ul>"#, entity_items)
        };

        format!(
            r#"
                    <div class="sensitive-panel">
                        <h4 class="sensitive-title">⚠ Sensitive Information</h4>
                        {}{}
                    </div>"#,
            flag_list, entity_list
        )
    }

    fn render_result_card(result: &ScanResult) -> String {
        let sensitive_section = if result.sensitive_info.has_findings() {
            Self::render_sensitive_panel(&result.sensitive_info)
        } else {
            String::new()
        };

        format!(
            r#"
                <div class="result-card">
                    <div class="card-header">
                        <h3 class="result-path">{}</h3>
                        <span class="class-list">{}</span>
                    </div>
                    <pre class="content-preview">{}</pre>{}
                </div>"#,
            html_escape(&result.path),
            html_escape(&result.threat_class.join(", ")),
            html_escape(&truncate_preview(&result.content)),
            sensitive_section
        )
    }

    fn render_findings(results: &[ScanResult]) -> String {
        let tally = tally_categories(results);
        let sensitive_files = results
            .iter()
            .filter(|r| r.sensitive_info.has_findings())
            .count();

        let mut summary_items = String::new();
        for (category, count) in tally.iter() {
            summary_items.push_str(&format!(
                r#"<li class="summary-line">{}</li>"#,
                html_escape(&summary_line(category, count))
            ));
        }

        let mut result_cards = String::new();
        for result in results {
            result_cards.push_str(&Self::render_result_card(result));
        }

        format!(
            r#"
            <div class="stats-grid">
                <div class="stat-card">
                    <span class="stat-value stat-red">{}</span>
                    <span class="stat-label">Files Flagged</span>
                </div>
                <div class="stat-card">
                    <span class="stat-value stat-amber">{}</span>
                    <span class="stat-label">Threat Categories</span>
                </div>
                <div class="stat-card">
                    <span class="stat-value stat-cyan">{}</span>
                    <span class="stat-label">Total Detections</span>
                </div>
                <div class="stat-card">
                    <span class="stat-value stat-violet">{}</span>
                    <span class="stat-label">Files With Sensitive Info</span>
                </div>
            </div>

            <section class="summary-panel">
                <h2 class="section-title">📊 Threat Summary</h2>
                <ul class="summary-list">{}</ul>
            </section>

            <section class="results-container">
                <h2 class="section-title">🔎 Flagged Files</h2>{}
            </section>
        "#,
            results.len(),
            tally.len(),
            tally.total(),
            sensitive_files,
            summary_items,
            result_cards
        )
    }

    /// Build the complete HTML document. Pure: no I/O, input untouched.
    pub fn generate_html(&self, input: &ReportInput) -> String {
        // The gate skips every per-record step, so an all-clear page costs
        // the same no matter how much data rode along.
        let report_body = if input.threats_found {
            Self::render_findings(&input.data)
        } else {
            Self::render_all_clear()
        };

        let timestamp = self.generated_at.format("%Y-%m-%d %H:%M:%S UTC");

        format!(
            r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Casefile</title>
    <link href="https://fonts.googleapis.com/css2?family=JetBrains+Mono:wght@400;500;700&family=Inter:wght@300;400;500;600;700&display=swap" rel="stylesheet">
    <style>
        :root {{
            --bg-primary: #0b0d12;
            --bg-secondary: #12151d;
            --bg-card: rgba(24, 27, 35, 0.85);
            --border-primary: rgba(255, 255, 255, 0.08);
            --border-alert: rgba(255, 92, 92, 0.35);
            --text-primary: #f4f4f5;
            --text-secondary: #9ca3af;
            --text-muted: #6b7280;
            --accent-red: #ff5c5c;
            --accent-amber: #fbbf24;
            --accent-cyan: #22d3ee;
            --accent-violet: #a78bfa;
            --accent-green: #34d399;
            --gradient-alert: linear-gradient(135deg, #ff5c5c 0%, #fbbf24 100%);
        }}

        * {{
            margin: 0;
            padding: 0;
            box-sizing: border-box;
        }}

        body {{
            background: var(--bg-primary);
            color: var(--text-primary);
            font-family: 'Inter', sans-serif;
            line-height: 1.6;
        }}

        .container {{ max-width: 1100px; margin: 0 auto; padding: 2rem; }}

        .topnav {{
            display: flex;
            justify-content: center;
            gap: 2rem;
            padding: 1rem 0;
            border-bottom: 1px solid var(--border-primary);
            margin-bottom: 2.5rem;
        }}

        .topnav a {{
            color: var(--text-secondary);
            text-decoration: none;
            font-size: 0.95rem;
            transition: color 0.2s ease;
        }}

        .topnav a:hover {{ color: var(--accent-amber); }}

        .header {{ text-align: center; margin-bottom: 2.5rem; }}

        .title {{
            font-size: 3rem;
            font-weight: 700;
            background: var(--gradient-alert);
            -webkit-background-clip: text;
            -webkit-text-fill-color: transparent;
            background-clip: text;
            margin-bottom: 0.5rem;
        }}

        .subtitle {{ color: var(--text-secondary); font-size: 1.1rem; margin-bottom: 1.5rem; }}

        .timestamp {{
            display: inline-block;
            background: var(--bg-card);
            border: 1px solid var(--border-primary);
            padding: 0.5rem 1rem;
            border-radius: 0.5rem;
            font-family: 'JetBrains Mono', monospace;
            font-size: 0.9rem;
            color: var(--accent-amber);
        }}

        .stats-grid {{
            display: grid;
            grid-template-columns: repeat(auto-fit, minmax(180px, 1fr));
            gap: 1.25rem;
            margin: 2rem 0;
        }}

        .stat-card {{
            background: var(--bg-card);
            border: 1px solid var(--border-primary);
            border-radius: 0.75rem;
            padding: 1.25rem;
            text-align: center;
            transition: border-color 0.2s ease;
        }}

        .stat-card:hover {{ border-color: var(--border-alert); }}

        .stat-value {{
            font-size: 2.25rem;
            font-weight: 700;
            font-family: 'JetBrains Mono', monospace;
            display: block;
            margin-bottom: 0.25rem;
        }}

        .stat-label {{
            color: var(--text-secondary);
            font-size: 0.85rem;
            text-transform: uppercase;
            letter-spacing: 0.05em;
        }}

        .stat-red {{ color: var(--accent-red); }}
        .stat-amber {{ color: var(--accent-amber); }}
        .stat-cyan {{ color: var(--accent-cyan); }}
        .stat-violet {{ color: var(--accent-violet); }}

        .section-title {{
            font-size: 1.4rem;
            font-weight: 600;
            margin-bottom: 1rem;
        }}

        .summary-panel {{
            background: var(--bg-card);
            border: 1px solid var(--border-primary);
            border-radius: 0.75rem;
            padding: 1.5rem;
            margin-bottom: 2.5rem;
        }}

        .summary-list {{ list-style: none; }}

        .summary-line {{
            font-family: 'JetBrains Mono', monospace;
            font-size: 0.95rem;
            padding: 0.4rem 0.75rem;
            border-left: 3px solid var(--accent-red);
            margin-bottom: 0.5rem;
            background: rgba(255, 92, 92, 0.06);
        }}

        .result-card {{
            background: var(--bg-card);
            border: 1px solid var(--border-primary);
            border-radius: 0.75rem;
            padding: 1.5rem;
            margin-bottom: 1.5rem;
            animation: fadeIn 0.4s ease-out both;
        }}

        @keyframes fadeIn {{
            from {{ opacity: 0; transform: translateY(12px); }}
            to {{ opacity: 1; transform: translateY(0); }}
        }}

        .card-header {{
            display: flex;
            justify-content: space-between;
            align-items: center;
            gap: 1rem;
            margin-bottom: 1rem;
        }}

        .result-path {{
            font-family: 'JetBrains Mono', monospace;
            font-size: 1.05rem;
            font-weight: 500;
            overflow-wrap: anywhere;
        }}

        .class-list {{
            background: rgba(255, 92, 92, 0.15);
            color: var(--accent-red);
            border: 1px solid var(--border-alert);
            border-radius: 0.5rem;
            padding: 0.25rem 0.75rem;
            font-family: 'JetBrains Mono', monospace;
            font-size: 0.8rem;
            white-space: nowrap;
        }}

        .content-preview {{
            background: var(--bg-secondary);
            border: 1px solid var(--border-primary);
            border-radius: 0.5rem;
            padding: 1rem;
            font-family: 'JetBrains Mono', monospace;
            font-size: 0.85rem;
            color: var(--text-secondary);
            white-space: pre-wrap;
            overflow-wrap: anywhere;
        }}

        .sensitive-panel {{
            margin-top: 1rem;
            padding: 1rem;
            background: rgba(255, 92, 92, 0.05);
            border: 1px solid var(--border-alert);
            border-radius: 0.5rem;
        }}

        .sensitive-title {{
            color: var(--accent-red);
            font-size: 0.95rem;
            margin-bottom: 0.5rem;
        }}

        .flag-list, .entity-list {{ list-style: none; }}

        .flag-line {{
            color: var(--accent-amber);
            font-size: 0.9rem;
            padding: 0.15rem 0;
        }}

        .flag-line::before {{ content: '▸ '; }}

        .entity-line {{
            font-family: 'JetBrains Mono', monospace;
            font-size: 0.9rem;
            color: var(--text-primary);
            padding: 0.15rem 0;
        }}

        .all-clear {{
            text-align: center;
            padding: 4rem 2rem;
            background: var(--bg-card);
            border: 1px solid rgba(52, 211, 153, 0.3);
            border-radius: 1rem;
        }}

        .all-clear-icon {{
            font-size: 3rem;
            color: var(--accent-green);
            margin-bottom: 1rem;
        }}

        .all-clear-title {{ font-size: 1.75rem; margin-bottom: 0.5rem; }}
        .all-clear-note {{ color: var(--text-secondary); }}

        .footer {{
            text-align: center;
            margin-top: 3.5rem;
            padding: 1.5rem;
            border-top: 1px solid var(--border-primary);
        }}

        .footer-text {{ color: var(--text-muted); font-size: 0.9rem; }}
        .footer-brand {{ color: var(--accent-amber); font-weight: 600; }}

        @media (max-width: 768px) {{
            .container {{ padding: 1rem; }}
            .title {{ font-size: 2.25rem; }}
            .topnav {{ gap: 1rem; flex-wrap: wrap; }}
            .card-header {{ flex-direction: column; align-items: flex-start; }}
            .class-list {{ white-space: normal; }}
        }}
    </style>
</head>
<body>
    <div class="container">
        <nav class="topnav">
            <a href="./">Home</a>
            <a href="./upload">Upload</a>
            <a href="./search">Search</a>
            <a href="./charts">Analysis</a>
            <a href="./about">About</a>
        </nav>

        <header class="header">
            <h1 class="title">Casefile</h1>
            <p class="subtitle">Content Threat Analysis Report</p>
            <div class="timestamp">🕒 Generated: {}</div>
        </header>
{}
        <footer class="footer">
            <p class="footer-text">Generated by <span class="footer-brand">Casefile</span></p>
            <p class="footer-text">Report generated on {}</p>
        </footer>
    </div>
</body>
</html>"#,
            timestamp, report_body, timestamp
        )
    }
}

impl Default for HtmlReporter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::EntityValue;
    use chrono::TimeZone;

    fn reporter() -> HtmlReporter {
        HtmlReporter::with_timestamp(Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap())
    }

    fn record(path: &str, classes: &[&str], content: &str) -> ScanResult {
        ScanResult {
            path: path.to_string(),
            threat_class: classes.iter().map(|c| c.to_string()).collect(),
            content: content.to_string(),
            sensitive_info: SensitiveInfo::default(),
        }
    }

    #[test]
    fn test_all_clear_ignores_data() {
        let input = ReportInput {
            threats_found: false,
            data: vec![record("ignored.txt", &["malware"], "payload")],
        };
        let html = reporter().generate_html(&input);
        assert!(html.contains("No threats detected."));
        assert!(!html.contains(r#"<div class="result-card">"#));
        assert!(!html.contains("ignored.txt"));
        assert!(!html.contains(r#"<li class="summary-line">"#));
    }

    #[test]
    fn test_summary_lines_and_pluralization() {
        let input = ReportInput {
            threats_found: true,
            data: vec![
                record("a.txt", &["malware", "pii"], ""),
                record("b.txt", &["malware"], ""),
            ],
        };
        let html = reporter().generate_html(&input);
        assert!(html.contains("malware: 2 threats"));
        assert!(html.contains("pii: 1 threat"));
    }

    #[test]
    fn test_summary_follows_first_encounter_order() {
        let input = ReportInput {
            threats_found: true,
            data: vec![
                record("a.txt", &["spam", "malware"], ""),
                record("b.txt", &["malware"], ""),
            ],
        };
        let html = reporter().generate_html(&input);
        let spam_at = html.find("spam: 1 threat").unwrap();
        let malware_at = html.find("malware: 2 threats").unwrap();
        assert!(spam_at < malware_at, "categories must keep first-encounter order");
    }

    #[test]
    fn test_detail_block_contents() {
        let input = ReportInput {
            threats_found: true,
            data: vec![record("uploads/a.txt", &["malware", "pii"], "suspicious body")],
        };
        let html = reporter().generate_html(&input);
        assert!(html.contains("uploads/a.txt"));
        assert!(html.contains("malware, pii"));
        assert!(html.contains("suspicious body"));
    }

    #[test]
    fn test_preview_truncated_past_500_chars() {
        let input = ReportInput {
            threats_found: true,
            data: vec![record("a.txt", &["spam"], &"X".repeat(501))],
        };
        let html = reporter().generate_html(&input);
        assert!(html.contains(&format!("{}...", "X".repeat(500))));
        assert!(!html.contains(&"X".repeat(501)));
    }

    #[test]
    fn test_preview_at_exactly_500_chars_keeps_everything() {
        let input = ReportInput {
            threats_found: true,
            data: vec![record("a.txt", &["spam"], &"X".repeat(500))],
        };
        let html = reporter().generate_html(&input);
        assert!(html.contains(&"X".repeat(500)));
        assert!(!html.contains(&format!("{}...", "X".repeat(500))));
    }

    #[test]
    fn test_sensitive_block_hidden_when_all_values_empty() {
        let mut result = record("a.txt", &["pii"], "");
        result.sensitive_info.detected_entities =
            vec![("email".to_string(), EntityValue::List(Vec::new()))];
        let input = ReportInput {
            threats_found: true,
            data: vec![result],
        };
        let html = reporter().generate_html(&input);
        assert!(!html.contains(r#"<div class="sensitive-panel">"#));
        assert!(!html.contains("Email"));
    }

    #[test]
    fn test_sensitive_block_shows_only_present_entities() {
        let mut result = record("a.txt", &["pii"], "");
        result.sensitive_info.detected_entities = vec![
            ("email".to_string(), EntityValue::List(Vec::new())),
            ("ip".to_string(), EntityValue::Scalar("10.0.0.1".to_string())),
        ];
        let input = ReportInput {
            threats_found: true,
            data: vec![result],
        };
        let html = reporter().generate_html(&input);
        assert!(html.contains(r#"<div class="sensitive-panel">"#));
        assert!(html.contains("Ip: 10.0.0.1"));
        assert!(!html.contains("Email"));
    }

    #[test]
    fn test_entity_labels_capitalized_and_lists_joined() {
        let mut result = record("a.txt", &["pii"], "");
        result.sensitive_info.detected_entities = vec![(
            "ssn".to_string(),
            EntityValue::List(vec!["123-45-6789".to_string(), "987-65-4321".to_string()]),
        )];
        let input = ReportInput {
            threats_found: true,
            data: vec![result],
        };
        let html = reporter().generate_html(&input);
        assert!(html.contains("Ssn: 123-45-6789, 987-65-4321"));
    }

    #[test]
    fn test_flags_rendered_verbatim_in_order() {
        let mut result = record("a.txt", &["malware"], "");
        result.sensitive_info.flags =
            vec!["high entropy".to_string(), "packed binary".to_string()];
        let input = ReportInput {
            threats_found: true,
            data: vec![result],
        };
        let html = reporter().generate_html(&input);
        let first = html.find("high entropy").unwrap();
        let second = html.find("packed binary").unwrap();
        assert!(first < second);
    }

    #[test]
    fn test_input_text_is_escaped() {
        let mut result = record(
            "<script>alert(1)</script>.txt",
            &["xss & injection"],
            "<b>bold</b>",
        );
        result.sensitive_info.flags = vec!["\"quoted\" flag".to_string()];
        let input = ReportInput {
            threats_found: true,
            data: vec![result],
        };
        let html = reporter().generate_html(&input);
        assert!(!html.contains("<script>alert(1)</script>"));
        assert!(html.contains("&lt;script&gt;alert(1)&lt;/script&gt;.txt"));
        assert!(html.contains("xss &amp; injection"));
        assert!(html.contains("&lt;b&gt;bold&lt;/b&gt;"));
        assert!(html.contains("&quot;quoted&quot; flag"));
    }

    #[test]
    fn test_nav_links_are_fixed_strings() {
        let input = ReportInput {
            threats_found: false,
            data: Vec::new(),
        };
        let html = reporter().generate_html(&input);
        assert!(html.contains(r#"<a href="./">Home</a>"#));
        assert!(html.contains(r#"<a href="./upload">Upload</a>"#));
        assert!(html.contains(r#"<a href="./search">Search</a>"#));
        assert!(html.contains(r#"<a href="./charts">Analysis</a>"#));
        assert!(html.contains(r#"<a href="./about">About</a>"#));
    }

    #[test]
    fn test_stats_grid_counts() {
        let mut flagged = record("a.txt", &["malware", "pii"], "");
        flagged.sensitive_info.flags = vec!["high entropy".to_string()];
        let input = ReportInput {
            threats_found: true,
            data: vec![flagged, record("b.txt", &["malware"], "")],
        };
        let html = reporter().generate_html(&input);
        assert!(html.contains(r#"stat-red">2</span>"#), "two files flagged");
        assert!(html.contains(r#"stat-amber">2</span>"#), "two categories");
        assert!(html.contains(r#"stat-cyan">3</span>"#), "three detections");
        assert!(html.contains(r#"stat-violet">1</span>"#), "one sensitive file");
    }

    #[test]
    fn test_rendering_is_deterministic() {
        let input = ReportInput {
            threats_found: true,
            data: vec![record("a.txt", &["malware"], "body")],
        };
        let html_reporter = reporter();
        assert_eq!(
            html_reporter.generate_html(&input),
            html_reporter.generate_html(&input)
        );
    }

    #[test]
    fn test_end_to_end_scenario() {
        let mut result = record("a.txt", &["malware", "pii"], &"X".repeat(600));
        result.sensitive_info.flags = vec!["high entropy".to_string()];
        result.sensitive_info.detected_entities = vec![(
            "ssn".to_string(),
            EntityValue::List(vec!["123-45-6789".to_string()]),
        )];
        let input = ReportInput {
            threats_found: true,
            data: vec![result],
        };

        let html = reporter().generate_html(&input);
        assert!(html.contains("malware: 1 threat"));
        assert!(html.contains("pii: 1 threat"));
        assert!(html.contains("a.txt"));
        assert!(html.contains("malware, pii"));
        assert!(html.contains(&format!("{}...", "X".repeat(500))));
        assert!(!html.contains(&"X".repeat(501)));
        assert!(html.contains("high entropy"));
        assert!(html.contains("Ssn: 123-45-6789"));
    }

    #[test]
    fn test_generate_report_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let out_path = dir.path().join("report.html");
        let input = ReportInput {
            threats_found: true,
            data: vec![record("a.txt", &["malware"], "body")],
        };

        reporter().generate_report(&input, &out_path).unwrap();

        let written = std::fs::read_to_string(&out_path).unwrap();
        assert!(written.starts_with("<!DOCTYPE html>"));
        assert!(written.contains("a.txt"));
    }
}
