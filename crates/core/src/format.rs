use crate::types::{ScoreBand, ViralityReport};

fn band_label(band: ScoreBand) -> &'static str {
    match band {
        ScoreBand::Strong => "strong",
        ScoreBand::Fair => "fair",
        ScoreBand::Weak => "weak",
    }
}

/// Format a 0–100 score without a trailing `.0`.
pub fn format_score(score: f64) -> String {
    if score.fract() == 0.0 {
        format!("{:.0}", score)
    } else {
        format!("{:.1}", score)
    }
}

pub fn format_report_readable(report: &ViralityReport) -> String {
    let mut output = String::new();
    output.push_str(&format!(
        "# Virality score: {}/100 ({})\n\n",
        format_score(report.overall_score),
        band_label(ScoreBand::of(report.overall_score))
    ));

    output.push_str("## Breakdown\n\n");
    for (title, component) in report.components() {
        output.push_str(&format!(
            "### {}: {} ({})\n\n",
            title,
            format_score(component.score),
            component.label
        ));
        // Summary view: first two insights only.
        for insight in component.insights.iter().take(2) {
            output.push_str(&format!("• {}\n", insight));
        }
        for recommendation in &component.recommendations {
            output.push_str(&format!("→ {}\n", recommendation));
        }
        output.push('\n');
    }

    if !report.timeline_issues.is_empty() {
        output.push_str("## Retention timeline\n\n");
        for issue in &report.timeline_issues {
            let kind: String = issue.kind.clone().into();
            output.push_str(&format!(
                "[{}] {}: {}\n",
                issue.timestamp, kind, issue.message
            ));
        }
        output.push('\n');
    }

    output.push_str("## Action plan\n\n");
    for (idx, item) in report.action_plan.iter().enumerate() {
        output.push_str(&format!(
            "{}. [{}] {} ({})\n",
            idx + 1,
            item.priority,
            item.task,
            item.impact
        ));
    }
    output.push('\n');

    let assets = &report.generated_assets;
    output.push_str("## Generated assets\n\n");
    output.push_str("Alternative titles:\n");
    for (idx, title) in assets.alternative_titles.iter().enumerate() {
        output.push_str(&format!("  {}. {}\n", idx + 1, title));
    }
    output.push_str(&format!("\nDescription hook: {}\n", assets.description_hook));
    output.push_str(&format!(
        "Hashtags: {}\n",
        assets.optimized_hashtags.join(" ")
    ));
    output.push_str(&format!("Thumbnail prompt: {}\n", assets.thumbnail_prompt));

    output
}
