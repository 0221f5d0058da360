use sampleview_core::Sample;
use sampleview_render::{pass_marker, verdict, Verdict};

use crate::terminal_output::{render_table, Column};

/// One row per sample: index, id, task, pass marker, reward.
pub fn list_rows(samples: &[Sample]) -> Vec<Vec<String>> {
    samples
        .iter()
        .enumerate()
        .map(|(i, sample)| {
            let reward = match verdict(sample) {
                Verdict::Passed(r) | Verdict::Partial(r) | Verdict::Failed(r) => format!("{r:.2}"),
                Verdict::NoReward => "-".to_string(),
            };
            vec![
                i.to_string(),
                sample.sample_id.clone().unwrap_or_else(|| "N/A".into()),
                sample.task_name.clone().unwrap_or_else(|| "N/A".into()),
                pass_marker(sample),
                reward,
            ]
        })
        .collect()
}

pub fn render_list(samples: &[Sample], color: bool) -> String {
    let columns = vec![
        Column::right("#"),
        Column::left("Sample ID").max_width(14),
        Column::left("Task").max_width(40),
        Column::center("Pass"),
        Column::right("Reward"),
    ];
    render_table(&columns, &list_rows(samples), color)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn rows_carry_marker_and_reward() {
        let samples = vec![
            Sample::from_value(&json!({
                "sample_id": "abc",
                "task_name": "qa",
                "metrics": {"passed": 1.0, "mean_reward": 1.0}
            })),
            Sample::from_value(&json!({})),
        ];
        let rows = list_rows(&samples);
        assert_eq!(rows[0], ["0", "abc", "qa", "✓", "1.00"]);
        assert_eq!(rows[1], ["1", "N/A", "N/A", "", "-"]);
    }

    #[test]
    fn table_has_header_and_rows() {
        let samples = vec![Sample::from_value(&json!({"sample_id": "0123456789abcdefgh"}))];
        let table = render_list(&samples, false);
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("#  Sample ID"));
        assert!(lines[2].contains("0123456789abc…"));
    }
}
