use crate::types::scoring::ScoringResult;

/// Renders a result as a pull-request comment body.
pub fn to_markdown(result: &ScoringResult) -> String {
    let mut output = String::new();
    output.push_str(&format!("# Change Request Score: {}\n\n", result.request_id));
    output.push_str(&format!(
        "**Total: {:.1} / 10** ({})\n\n",
        result.total_score,
        result.rating.label()
    ));

    output.push_str("## Breakdown\n\n");
    output.push_str("| Dimension | Score |\n|---|---|\n");
    for (dimension, score) in result.breakdown.iter() {
        output.push_str(&format!("| {} | {:.1} |\n", dimension.label(), score));
    }
    output.push('\n');

    output.push_str("## Suggestions\n\n");
    for suggestion in &result.suggestions {
        output.push_str(&format!("- {suggestion}\n"));
    }
    output.push('\n');

    output.push_str(&format!(
        "_Scored at {}_\n",
        result.timestamp.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    output
}
