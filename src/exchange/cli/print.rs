use chrono::{DateTime, Utc};
use colored::Colorize;
use exchange::api::{CmdMessage, MessageLevel, OverlayKind};
use exchange::model::{Application, Choice, MAX_CHOICES};
use exchange::overlay::{Location, OverlayState};
use exchange::search::{CandidateRow, SearchView};
use exchange::submission::Notice;
use timeago::Formatter;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

const LINE_WIDTH: usize = 80;
const NAME_WIDTH: usize = 40;

pub(super) fn print_messages(messages: &[CmdMessage]) {
    for message in messages {
        match message.level {
            MessageLevel::Info => println!("{}", message.content.dimmed()),
            MessageLevel::Success => println!("{}", message.content.green()),
            MessageLevel::Warning => println!("{}", message.content.yellow()),
            MessageLevel::Error => println!("{}", message.content.red()),
        }
    }
}

pub(super) fn print_choices(choices: &[Choice]) {
    if choices.is_empty() {
        println!("{}", "No universities selected.".dimmed());
        return;
    }

    for choice in choices {
        let idx = format!("{}. ", choice.rank);
        println!(
            "  {}{}{}",
            idx.yellow(),
            pad_to_width(&choice.university.name, NAME_WIDTH),
            choice.university.country.dimmed()
        );
    }
    println!(
        "{}",
        format!("  {}/{} chosen", choices.len(), MAX_CHOICES).dimmed()
    );
}

/// Prints the search dialog and returns the ids in the order they were
/// numbered, so `pick <n>` can refer back to them.
pub(super) fn print_search(query: &str, view: &SearchView<'_>) -> Vec<uuid::Uuid> {
    let mut numbered = Vec::new();
    let header = if query.is_empty() {
        "Search universities".to_string()
    } else {
        format!("Search universities: \"{}\"", query)
    };
    println!("{}", header.bold());
    println!("{}", "─".repeat(LINE_WIDTH.min(header.width() + 8)));

    if view.selected.is_empty() && view.unselected.is_empty() {
        println!("{}", "No universities match.".dimmed());
        return numbered;
    }

    for row in view.selected.iter().chain(view.unselected.iter()) {
        numbered.push(row.university.id);
        print_row(numbered.len(), row);
    }
    numbered
}

fn print_row(n: usize, row: &CandidateRow<'_>) {
    let idx = format!("{:>3}. ", n);
    let marker = match row.rank {
        Some(rank) => format!("[{}]", rank).green().to_string(),
        None if row.disabled => "[-]".dimmed().to_string(),
        None => "[ ]".to_string(),
    };
    let name = pad_to_width(&row.university.name, NAME_WIDTH);
    let local = &row.university.local_name;
    if row.disabled {
        println!("{}{} {}{}", idx, marker, name.dimmed(), local.dimmed());
    } else {
        println!("{}{} {}{}", idx, marker, name, local.dimmed());
    }
}

pub(super) fn print_location(location: &Location, overlays: &[(OverlayKind, OverlayState)]) {
    println!("{} {}", "url:".dimmed(), location);
    for (kind, state) in overlays {
        let label = match kind {
            OverlayKind::Search => "search",
            OverlayKind::Confirm => "confirm",
        };
        let status = match (state.is_open, state.opened_by_this_controller) {
            (false, _) => "closed".normal(),
            (true, true) => "open (pushed)".green(),
            (true, false) => "open (from url)".cyan(),
        };
        println!("{} {}", format!("{}:", label).dimmed(), status);
    }
}

pub(super) fn print_notice(notice: &Notice) {
    let text = notice.message();
    if notice.shake {
        println!("{} {}", "✗".red().bold(), text.red().bold());
    } else {
        println!("{} {}", "✗".red(), text.red());
    }
}

pub(super) fn print_application(application: &Application) {
    println!(
        "{} {} {}",
        "Application".bold(),
        format!("rev {}", application.revision).yellow(),
        format_time_ago(application.submitted_at).dimmed()
    );
    print_choices(&application.choices);
}

fn pad_to_width(s: &str, width: usize) -> String {
    let mut out = String::new();
    let mut current = 0;
    let needs_cut = s.width() >= width;

    for c in s.chars() {
        let w = c.width().unwrap_or(0);
        if needs_cut && current + w >= width.saturating_sub(1) {
            out.push('…');
            current += 1;
            break;
        }
        out.push(c);
        current += w;
    }

    out.push_str(&" ".repeat(width.saturating_sub(current)));
    out
}

fn format_time_ago(timestamp: DateTime<Utc>) -> String {
    let duration = Utc::now().signed_duration_since(timestamp);
    let formatter = Formatter::new();
    formatter.convert(duration.to_std().unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pads_short_names() {
        let padded = pad_to_width("ETH", 8);
        assert_eq!(padded, "ETH     ");
    }

    #[test]
    fn truncates_long_names_to_width() {
        let padded = pad_to_width("Rheinische Friedrich-Wilhelms-Universität", 12);
        assert_eq!(padded.width(), 12);
        assert!(padded.contains('…'));
    }

    #[test]
    fn wide_characters_count_double() {
        let padded = pad_to_width("東京大学", 10);
        assert_eq!(padded.width(), 10);
        assert!(padded.starts_with("東京大学"));
    }
}
