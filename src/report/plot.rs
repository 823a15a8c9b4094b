use std::io::{self, Write};

use crate::network::classifier::BinaryClassifier;
use crate::train::history::History;

const WIDTH: usize = 60;
const HEIGHT: usize = 12;
const MARKERS: [char; 2] = ['*', 'o'];

/// Renders line series as a fixed-size text chart. The x axis is the sample
/// index (epoch) and the y axis spans the range of all values.
pub fn render_chart(title: &str, y_label: &str, series: &[(&str, &[f64])]) -> String {
    let mut out = format!("{}\n", title);
    let points: Vec<f64> = series.iter().flat_map(|(_, s)| s.iter().copied()).collect();
    if points.is_empty() {
        out.push_str("(no data)\n");
        return out;
    }

    let (mut lo, mut hi) = points.iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| (lo.min(v), hi.max(v)));
    if hi - lo < 1e-12 {
        lo -= 0.5;
        hi += 0.5;
    }
    let last_index = series.iter().map(|(_, s)| s.len()).max().unwrap_or(1).saturating_sub(1);

    let mut canvas = vec![vec![' '; WIDTH]; HEIGHT];
    for (k, (_, values)) in series.iter().enumerate() {
        let marker = MARKERS[k % MARKERS.len()];
        for (i, &v) in values.iter().enumerate() {
            let col = if last_index == 0 { 0 } else { i * (WIDTH - 1) / last_index };
            let frac = (v - lo) / (hi - lo);
            let row = HEIGHT - 1 - ((frac * (HEIGHT - 1) as f64).round() as usize).min(HEIGHT - 1);
            canvas[row][col] = marker;
        }
    }

    out.push_str(&format!("{}\n", y_label));
    for (r, cells) in canvas.iter().enumerate() {
        let tick = match r {
            0 => format!("{:>8.3}", hi),
            r if r == HEIGHT - 1 => format!("{:>8.3}", lo),
            _ => " ".repeat(8),
        };
        out.push_str(&format!("{} |{}\n", tick, cells.iter().collect::<String>()));
    }
    out.push_str(&format!("{} +{}\n", " ".repeat(8), "-".repeat(WIDTH)));
    out.push_str(&format!(
        "{}  0{:>width$}\n",
        " ".repeat(8),
        format!("{} epoch", last_index),
        width = WIDTH - 1
    ));

    let legend: Vec<String> = series.iter()
        .enumerate()
        .map(|(k, (name, _))| format!("{} {}", MARKERS[k % MARKERS.len()], name))
        .collect();
    out.push_str(&format!("{}  {}\n", " ".repeat(8), legend.join("   ")));
    out
}

/// Writes the accuracy chart followed by the loss chart.
pub fn plot_acc_loss<W: Write>(history: &History, out: &mut W) -> io::Result<()> {
    let accuracy = render_chart(
        "model accuracy",
        "accuracy",
        &[("train", history.accuracy.as_slice()), ("val", history.val_accuracy.as_slice())],
    );
    let loss = render_chart(
        "model loss",
        "loss",
        &[("train", history.loss.as_slice()), ("val", history.val_loss.as_slice())],
    );
    writeln!(out, "{}", accuracy)?;
    writeln!(out, "{}", loss)?;
    out.flush()
}

impl BinaryClassifier {
    /// Prints accuracy and loss curves of `history` to stdout.
    pub fn plot_acc_loss(&self, history: &History) -> io::Result<()> {
        plot_acc_loss(history, &mut io::stdout().lock())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chart_places_extremes_on_the_border_rows() {
        let chart = render_chart("t", "y", &[("train", &[0.0, 1.0][..])]);
        let rows: Vec<&str> = chart.lines().filter(|l| l.contains(" |")).collect();
        assert_eq!(rows.len(), HEIGHT);
        assert!(rows[0].trim_start().starts_with("1.000") && rows[0].ends_with('*'));
        assert!(rows[HEIGHT - 1].contains("|*"));
    }

    #[test]
    fn empty_series_render_a_placeholder() {
        let chart = render_chart("t", "y", &[("train", &[][..])]);
        assert!(chart.contains("(no data)"));
    }

    #[test]
    fn plotting_a_fresh_history_succeeds() {
        let mut buf = Vec::new();
        plot_acc_loss(&History::new(), &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.contains("model accuracy") && text.contains("model loss"));
        assert!(text.contains("* train") && text.contains("o val"));
    }
}
