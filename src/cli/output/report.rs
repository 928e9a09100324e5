use ansi_term::Colour;

use crate::tracker::report::{Completion, MonthReport, TodayBanner};

use super::Palette;

fn banner_text(banner: TodayBanner) -> (Colour, &'static str) {
    match banner {
        TodayBanner::NotSet => (Colour::Red, "Value not set yet!"),
        TodayBanner::Set => (Colour::Green, "Value set today!"),
        TodayBanner::CannotSet => (Colour::Yellow, "Value can't be set today!"),
        TodayBanner::NotCurrentMonth => (Colour::White, "Not current month!"),
    }
}

fn completion_line(label: &str, completion: &Completion, palette: Palette) -> String {
    format!(
        "{label}: {}  ->  {}",
        palette.paint(Colour::Cyan, &completion.percentage().to_string()),
        palette.paint(
            Colour::Cyan,
            &format!("{} / {}", completion.completed, completion.total)
        ),
    )
}

/// Renders the monthly table followed by the completion lines.
pub fn render_report(report: &MonthReport, palette: Palette) -> String {
    let (colour, text) = banner_text(report.banner);

    let mut out = format!(
        "\nTracked days for {}/{}\n     {}\n   {:<4} |   Status\n{}\n",
        report.month.month,
        report.month.year,
        palette.paint(colour, text),
        "Day",
        "-".repeat(20)
    );

    for row in &report.rows {
        let marker = if row.is_today { "•" } else { " " };
        out.push_str(&format!(
            "{marker} {:<5} | {}\n",
            row.day,
            palette.status(&row.status)
        ));
    }

    out.push('\n');
    match &report.unfair {
        Some(unfair) => {
            out.push_str(&completion_line("Completion Fair  ", &report.fair, palette));
            out.push('\n');
            out.push_str(&completion_line("Completion Unfair", unfair, palette));
        }
        None => out.push_str(&completion_line("Completion", &report.fair, palette)),
    }
    out.push('\n');
    out
}

/// One line per stored month.
pub fn render_month_list(months: &[(String, Completion)], palette: Palette) -> String {
    months
        .iter()
        .map(|(key, completion)| {
            format!(
                "{key:<10} {}  ->  {} / {}\n",
                palette.paint(Colour::Cyan, &completion.percentage().to_string()),
                completion.completed,
                completion.total
            )
        })
        .collect()
}
