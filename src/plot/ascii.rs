//! ASCII bar chart of an amount distribution.
//!
//! This is intentionally "dumb" (one row per amount), optimized for:
//! - quick visual sanity checks in a terminal
//! - deterministic output (helpful for golden tests)
//!
//! Each bucket is drawn with its own fill character; the legend maps them back.

use crate::domain::AmountDistribution;

/// Fill characters, assigned to datasets in order.
const FILLS: [char; 6] = ['#', '=', '+', '*', '%', 'o'];

/// Render one stacked horizontal bar per amount.
///
/// `width` is the length of the longest bar in characters.
pub fn render_distribution_bars(dist: &AmountDistribution, width: usize) -> String {
    let width = width.max(10);

    let totals: Vec<usize> = (0..dist.labels.len())
        .map(|idx| dist.datasets.iter().map(|ds| ds.data.get(idx).copied().unwrap_or(0)).sum())
        .collect();
    let max_total = totals.iter().copied().max().unwrap_or(0);

    let mut out = String::new();
    out.push_str(&format!(
        "Histogram: amounts={} | max count={max_total}\n",
        dist.labels.len()
    ));
    if max_total == 0 {
        return out;
    }

    let label_width = dist.labels.iter().map(String::len).max().unwrap_or(0);

    for (idx, label) in dist.labels.iter().enumerate() {
        let mut bar = String::new();
        let mut cumulative = 0;
        let mut drawn = 0;
        for (ds_idx, ds) in dist.datasets.iter().enumerate() {
            cumulative += ds.data.get(idx).copied().unwrap_or(0);
            // Segment ends are scaled from the running total so rounding
            // never accumulates along the bar.
            let end = scale(cumulative, max_total, width);
            let fill = FILLS[ds_idx % FILLS.len()];
            bar.extend(std::iter::repeat_n(fill, end - drawn));
            drawn = end;
        }
        out.push_str(&format!("{label:>label_width$} |{bar} {}\n", totals[idx]));
    }

    let legend: Vec<String> = dist
        .datasets
        .iter()
        .enumerate()
        .map(|(i, ds)| format!("{} {}", FILLS[i % FILLS.len()], ds.label))
        .collect();
    out.push_str(&format!("Legend: {}\n", legend.join("  ")));

    out
}

fn scale(count: usize, max_total: usize, width: usize) -> usize {
    if max_total <= width {
        return count;
    }
    ((count as f64 / max_total as f64) * width as f64).round() as usize
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Dataset;
    use pretty_assertions::assert_eq;

    fn dataset(label: &str, data: Vec<usize>) -> Dataset {
        Dataset {
            label: label.to_string(),
            data,
        }
    }

    #[test]
    fn bars_golden_snapshot_small() {
        let dist = AmountDistribution {
            labels: vec!["500.00".to_string(), "1000.00".to_string()],
            datasets: vec![dataset("30", vec![0, 2]), dataset("other", vec![1, 0])],
            total_records: 3,
        };

        let expected = concat!(
            "Histogram: amounts=2 | max count=2\n",
            " 500.00 |= 1\n",
            "1000.00 |## 2\n",
            "Legend: # 30  = other\n",
        );
        assert_eq!(render_distribution_bars(&dist, 40), expected);
    }

    #[test]
    fn long_bars_are_scaled_to_width() {
        let dist = AmountDistribution {
            labels: vec!["1.00".to_string(), "2.00".to_string()],
            datasets: vec![dataset("10", vec![100, 25]), dataset("20", vec![100, 0])],
            total_records: 225,
        };

        let txt = render_distribution_bars(&dist, 20);
        let lines: Vec<&str> = txt.lines().collect();
        assert_eq!(lines[1], "1.00 |##########========== 200");
        assert_eq!(lines[2], "2.00 |### 25");
    }

    #[test]
    fn empty_distribution_renders_header_only() {
        let txt = render_distribution_bars(&AmountDistribution::default(), 40);
        assert_eq!(txt, "Histogram: amounts=0 | max count=0\n");
    }
}
