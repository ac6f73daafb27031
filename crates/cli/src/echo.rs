use owo_colors::OwoColorize;
use spritsit_core::CleanDocument;

use crate::VERSION;

/// Print a styled banner for verbose mode
pub fn print_banner() {
    eprintln!(
        "\n{} {} {}",
        "Spritsit".bold().bright_blue(),
        "v".dimmed(),
        VERSION.dimmed()
    );
    eprintln!("{}", "Clean, language-tagged text from web pages and e-books\n".dimmed());
}

/// Print a styled step message
pub fn print_step(step: usize, total: usize, message: &str) {
    eprintln!("{} {}", format!("[{}/{}]", step, total).dimmed(), message.bright_cyan());
}

/// Print a success message
pub fn print_success(message: &str) {
    eprintln!("{} {}", "✓".green(), message.bright_green());
}

/// Print an info message
pub fn print_info(message: &str) {
    eprintln!("{} {}", "ℹ".blue(), message.bright_blue());
}

/// Print a warning message
pub fn print_warning(message: &str) {
    eprintln!("{} {}", "⚠".yellow(), message.bright_yellow());
}

/// Print timing information with color coding
pub fn print_timing(label: &str, duration: std::time::Duration) {
    let ms = duration.as_secs_f64() * 1000.0;
    let label = format!("{}:", label);

    if ms < 250.0 {
        eprintln!("  {} {:>8.2}ms ({})", label.dimmed(), ms, "fast".dimmed());
    } else if ms < 1000.0 {
        eprintln!("  {} {:>8.2}ms ({})", label.dimmed(), ms, "moderate".bright_yellow());
    } else {
        eprintln!("  {} {:>8.2}ms ({})", label.dimmed(), ms, "slow".bright_red());
    }
}

/// Print the document summary
pub fn print_document_details(doc: &CleanDocument) {
    eprintln!("\n{}", "═".repeat(60).dimmed());
    eprintln!("{}", "Document".bold().cyan());
    eprintln!("{}", "═".repeat(60).dimmed());

    if let Some(title) = doc.title() {
        eprintln!("  {} {}", "Title:".dimmed(), title.bright_white());
    }
    if let Some(author) = doc.author() {
        eprintln!("  {} {}", "Author:".dimmed(), author.bright_white());
    }
    eprintln!("  {} {}", "Type:".dimmed(), format!("{:?}", doc.url_type()).bright_white());
    eprintln!("  {} {}", "Words:".dimmed(), doc.word_count().to_string().bright_white());
    if let Some(lang) = doc.lang() {
        eprintln!("  {} {}", "Language:".dimmed(), lang.bright_white());
    }
    if let Some(direction) = doc.direction() {
        eprintln!("  {} {}", "Direction:".dimmed(), format!("{:?}", direction).bright_white());
    }
    if let Some(text) = doc.text() {
        eprintln!("  {} {}", "Size:".dimmed(), format_size(text.len()).bright_white());
    }
    eprintln!();
}

/// Format file size for display
pub fn format_size(bytes: usize) -> String {
    const KB: usize = 1024;
    const MB: usize = 1024 * KB;

    if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(512), "512 B");
        assert_eq!(format_size(2048), "2.0 KB");
        assert_eq!(format_size(3 * 1024 * 1024), "3.0 MB");
    }
}
