use crate::db::Records;

/// Results with this many rows or more are not charted.
pub const MAX_CHART_ROWS: usize = 15;

#[derive(Debug, Clone, PartialEq)]
pub struct BarSeries {
    pub title: String,
    pub bars: Vec<(String, u64)>,
}

impl BarSeries {
    pub fn new(title: impl Into<String>, bars: Vec<(String, u64)>) -> Self {
        Self {
            title: title.into(),
            bars,
        }
    }

    /// A category/value result: two columns, few rows, numeric second column.
    pub fn from_records(recs: &Records) -> Option<Self> {
        if recs.columns.len() != 2 || recs.rows.is_empty() || recs.rows.len() >= MAX_CHART_ROWS {
            return None;
        }
        let bars = recs
            .rows
            .iter()
            .map(|row| {
                let value: f64 = row.get(1)?.trim().parse().ok()?;
                if !value.is_finite() || value < 0.0 {
                    return None;
                }
                Some((row.first()?.clone(), value.round() as u64))
            })
            .collect::<Option<Vec<_>>>()?;
        Some(Self::new(
            format!("Visualization of {} vs {}", recs.columns[0], recs.columns[1]),
            bars,
        ))
    }

    pub fn max(&self) -> u64 {
        self.bars.iter().map(|(_, v)| *v).max().unwrap_or(0)
    }

    /// Horizontal bars scaled to `width` cells, for plain terminals.
    pub fn render_text(&self, width: usize) -> String {
        let label_w = self.bars.iter().map(|(l, _)| l.chars().count()).max().unwrap_or(0);
        let max = self.max().max(1);
        let mut out = format!("{}\n", self.title);
        for (label, value) in &self.bars {
            let len = (u128::from(*value) * width as u128 / u128::from(max)) as usize;
            out.push_str(&format!("{label:<label_w$} | {} {value}\n", "#".repeat(len)));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn recs(columns: &[&str], rows: &[&[&str]]) -> Records {
        Records {
            columns: columns.iter().map(|c| c.to_string()).collect(),
            rows: rows
                .iter()
                .map(|r| r.iter().map(|c| c.to_string()).collect())
                .collect(),
        }
    }

    #[test]
    fn category_counts_are_charted() {
        let r = recs(&["diagnosis", "count"], &[&["Osteoarthritis", "3"], &["Acute bronchitis", "1"]]);
        let chart = BarSeries::from_records(&r).unwrap();
        assert_eq!(chart.title, "Visualization of diagnosis vs count");
        assert_eq!(chart.bars[0], ("Osteoarthritis".to_string(), 3));
    }

    #[test]
    fn non_numeric_values_are_not_charted() {
        let r = recs(&["name", "gender"], &[&["John", "Male"]]);
        assert!(BarSeries::from_records(&r).is_none());
    }

    #[test]
    fn wide_or_long_results_are_not_charted() {
        let r = recs(&["a", "b", "c"], &[&["x", "1", "2"]]);
        assert!(BarSeries::from_records(&r).is_none());

        let rows: Vec<Vec<String>> = (0..MAX_CHART_ROWS)
            .map(|i| vec![i.to_string(), "1".to_string()])
            .collect();
        let long = Records {
            columns: vec!["k".into(), "v".into()],
            rows,
        };
        assert!(BarSeries::from_records(&long).is_none());
    }

    #[test]
    fn text_bars_scale_to_width() {
        let chart = BarSeries::new("t", vec![("A+".into(), 4), ("O-".into(), 2)]);
        let text = chart.render_text(8);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[1], "A+ | ######## 4");
        assert_eq!(lines[2], "O- | #### 2");
    }

    #[test]
    fn huge_values_scale_without_overflow() {
        let r = recs(&["k", "v"], &[&["a", "9223372036854775807"], &["b", "0"]]);
        let chart = BarSeries::from_records(&r).unwrap();
        let text = chart.render_text(40);
        let lines: Vec<&str> = text.lines().collect();
        assert!(lines[1].starts_with(&format!("a | {} ", "#".repeat(40))));
        assert!(lines[2].starts_with("b |  0"));
    }
}
