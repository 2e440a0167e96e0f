//! Structural extraction from evidence text.
//!
//! The knowledge document uses ALL-CAPS section headers with bullet lines
//! underneath, plus an optional `Q:`/`A:` quick-FAQ block. These parsers
//! read those markers line by line; they never guess at content that is
//! not literally present.

/// A line that looks like an ALL-CAPS section header, e.g. `OPENING HOURS`
/// or `PAYMENT & REFUNDS`.
fn is_section_header(line: &str) -> bool {
    let trimmed = line.trim();
    trimmed.len() >= 4
        && trimmed.chars().next().is_some_and(|c| c.is_ascii_uppercase())
        && trimmed
            .chars()
            .all(|c| c.is_ascii_uppercase() || " &/()-".contains(c))
}

/// Body of the section starting at a line equal to `header`, up to the
/// next ALL-CAPS header line or end of text. `None` if the header never
/// appears.
fn extract_section(text: &str, header: &str) -> Option<String> {
    let mut body: Vec<&str> = Vec::new();
    let mut in_section = false;
    for line in text.lines() {
        if !in_section {
            if line.trim() == header {
                in_section = true;
            }
            continue;
        }
        if is_section_header(line) {
            break;
        }
        body.push(line.trim_end());
    }
    if in_section {
        Some(body.join("\n").trim().to_string())
    } else {
        None
    }
}

/// Menu items: bullet lines under a `MENU` header, collected until the
/// next blank-line-delimited section or end of text.
pub fn extract_menu(text: &str) -> Vec<String> {
    let mut items = Vec::new();
    let mut in_section = false;
    for line in text.lines() {
        let trimmed = line.trim();
        if !in_section {
            if trimmed.eq_ignore_ascii_case("MENU") {
                in_section = true;
            }
            continue;
        }
        if trimmed.is_empty() || is_section_header(trimmed) {
            break;
        }
        if let Some(item) = trimmed.strip_prefix('-') {
            items.push(item.trim().to_string());
        }
    }
    items
}

/// Opening hours, preferring the `OPENING HOURS` section (bullet lines if
/// any, otherwise the whole body), falling back to the quick-FAQ answer
/// for "are you open now".
pub fn extract_opening_hours(text: &str) -> Option<String> {
    if let Some(body) = extract_section(text, "OPENING HOURS") {
        let bullets: Vec<&str> = body
            .lines()
            .filter(|line| line.trim_start().starts_with('-'))
            .map(str::trim_end)
            .collect();
        let hours = if bullets.is_empty() {
            body
        } else {
            bullets.join("\n")
        };
        if !hours.is_empty() {
            return Some(hours);
        }
    }
    faq_answer(text, "are you open now")
}

/// The `A:` answer following a `Q:` line containing `question_fragment`
/// (case-insensitive), captured until a blank line or the next `Q:` line.
pub fn faq_answer(text: &str, question_fragment: &str) -> Option<String> {
    let fragment = question_fragment.to_lowercase();
    let mut answer: Vec<&str> = Vec::new();
    let mut in_answer = false;
    let mut question_seen = false;
    for line in text.lines() {
        let trimmed = line.trim();
        if in_answer {
            if trimmed.is_empty() || trimmed.starts_with("Q:") {
                break;
            }
            answer.push(trimmed);
            continue;
        }
        if question_seen {
            if let Some(rest) = trimmed.strip_prefix("A:") {
                in_answer = true;
                let rest = rest.trim();
                if !rest.is_empty() {
                    answer.push(rest);
                }
            } else if trimmed.starts_with("Q:") {
                question_seen = false;
            }
        }
        if !question_seen && !in_answer {
            if let Some(rest) = trimmed.strip_prefix("Q:") {
                if rest.to_lowercase().contains(&fragment) {
                    question_seen = true;
                }
            }
        }
    }
    let joined = answer.join("\n");
    if joined.is_empty() { None } else { Some(joined) }
}

/// Prefix extracted hours with a lead-in unless the text is already a
/// sentence that starts with one. Prevents doubled phrasing like
/// "Our opening hours are:\nOur opening hours are Monday...".
pub fn format_opening_hours(hours: &str) -> String {
    let trimmed = hours.trim();
    if trimmed.to_lowercase().starts_with("our opening hours") {
        trimmed.to_string()
    } else {
        format!("Our opening hours are:\n{trimmed}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EVIDENCE: &str = "\
ABOUT US\n\
We are a family restaurant in Wuse, Abuja.\n\
\n\
MENU\n\
- Jollof rice\n\
- Egusi soup with pounded yam\n\
- Fried plantain\n\
\n\
PRICING\n\
- Prices change; ask the till.\n\
\n\
OPENING HOURS\n\
- Mon-Sun: 9:00am - 9:00pm\n\
\n\
WHATSAPP QUICK FAQ\n\
Q: Are you open now?\n\
A: We are open 9am-9pm every day.\n\
\n\
Q: Do you deliver?\n\
A: Within Abuja only.\n";

    #[test]
    fn menu_collects_bullets_until_next_section() {
        let items = extract_menu(EVIDENCE);
        assert_eq!(
            items,
            vec![
                "Jollof rice",
                "Egusi soup with pounded yam",
                "Fried plantain"
            ]
        );
    }

    #[test]
    fn menu_missing_header_yields_empty() {
        assert!(extract_menu("DELIVERY\nWithin Abuja only.").is_empty());
    }

    #[test]
    fn hours_prefer_bullet_lines() {
        assert_eq!(
            extract_opening_hours(EVIDENCE).as_deref(),
            Some("- Mon-Sun: 9:00am - 9:00pm")
        );
    }

    #[test]
    fn hours_section_without_bullets_returns_body() {
        let text = "OPENING HOURS\nWe open at 9am and close at 9pm.\n\nPAYMENT\nPOS only.";
        assert_eq!(
            extract_opening_hours(text).as_deref(),
            Some("We open at 9am and close at 9pm.")
        );
    }

    #[test]
    fn hours_fall_back_to_faq() {
        let text = "WHATSAPP QUICK FAQ\nQ: Are you open now?\nA: Yes, until 9pm today.\n";
        assert_eq!(
            extract_opening_hours(text).as_deref(),
            Some("Yes, until 9pm today.")
        );
    }

    #[test]
    fn hours_absent_everywhere() {
        assert_eq!(extract_opening_hours("MENU\n- Jollof rice"), None);
    }

    #[test]
    fn section_stops_at_next_all_caps_header() {
        let body = extract_section(EVIDENCE, "PRICING").unwrap();
        assert_eq!(body, "- Prices change; ask the till.");
    }

    #[test]
    fn format_skips_duplicate_lead_in() {
        assert_eq!(
            format_opening_hours("Our opening hours are Monday to Sunday, 9-9."),
            "Our opening hours are Monday to Sunday, 9-9."
        );
        assert_eq!(
            format_opening_hours("- Mon-Sun: 9-9"),
            "Our opening hours are:\n- Mon-Sun: 9-9"
        );
    }
}
