//! Verbatim-evidence verification for generated drafts.
//!
//! Exact-substring matching only: paraphrase and fuzzy matches are
//! rejected. A false negative costs one refusal; a false positive costs a
//! fabricated answer.

use crate::generate::QUOTE_SECTION_LABEL;
use crate::types::RefusalReason;

/// A draft that passed verification, split into its deliverable answer
/// and the quote lines that were found verbatim in the evidence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedAnswer {
    pub answer: String,
    pub quotes: Vec<String>,
}

/// Why a draft failed verification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerifyRejection {
    MissingQuoteSection,
    EmptyFinalAnswer,
    NoVerbatimEvidence,
}

impl From<VerifyRejection> for RefusalReason {
    fn from(rejection: VerifyRejection) -> Self {
        match rejection {
            VerifyRejection::MissingQuoteSection => RefusalReason::MissingQuoteSection,
            VerifyRejection::EmptyFinalAnswer => RefusalReason::EmptyFinalAnswer,
            VerifyRejection::NoVerbatimEvidence => RefusalReason::NoVerbatimEvidence,
        }
    }
}

/// Check a cleaned draft against the concatenated evidence text.
///
/// The draft must contain the quote-section label, a non-empty answer
/// before it, and at least one quote line after it that occurs as an
/// exact substring of the evidence.
pub fn verify_draft(draft: &str, evidence: &str) -> Result<VerifiedAnswer, VerifyRejection> {
    let Some(label_at) = draft.find(QUOTE_SECTION_LABEL) else {
        return Err(VerifyRejection::MissingQuoteSection);
    };

    let answer = draft[..label_at].trim();
    if answer.is_empty() {
        return Err(VerifyRejection::EmptyFinalAnswer);
    }

    let quote_block = draft[label_at + QUOTE_SECTION_LABEL.len()..]
        .trim_start_matches(':')
        .trim();
    let quotes: Vec<String> = quote_block
        .lines()
        .map(|line| {
            let line = line.trim();
            // Models often bullet their quotes; the bullet is not evidence.
            line.strip_prefix('-').map(str::trim).unwrap_or(line)
        })
        .filter(|line| !line.is_empty() && evidence.contains(line))
        .map(str::to_string)
        .collect();

    if quotes.is_empty() {
        return Err(VerifyRejection::NoVerbatimEvidence);
    }

    Ok(VerifiedAnswer {
        answer: answer.to_string(),
        quotes,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const EVIDENCE: &str =
        "OPENING HOURS\nWe are open 9am–9pm daily.\n\nDELIVERY\nWe deliver within Abuja only.";

    #[test]
    fn accepts_verbatim_quote() {
        let draft = "We are open every day from 9 to 9.\nQUOTES\nWe are open 9am–9pm daily.";
        let verified = verify_draft(draft, EVIDENCE).unwrap();
        assert_eq!(verified.answer, "We are open every day from 9 to 9.");
        assert_eq!(verified.quotes, vec!["We are open 9am–9pm daily."]);
    }

    #[test]
    fn rejects_paraphrased_quotes() {
        let draft = "We are open all day.\nQUOTES\nThe shop operates from morning until night.";
        assert_eq!(
            verify_draft(draft, EVIDENCE),
            Err(VerifyRejection::NoVerbatimEvidence)
        );
    }

    #[test]
    fn rejects_missing_quote_section() {
        assert_eq!(
            verify_draft("We are open 9am–9pm daily.", EVIDENCE),
            Err(VerifyRejection::MissingQuoteSection)
        );
    }

    #[test]
    fn rejects_empty_answer_before_quotes() {
        let draft = "QUOTES\nWe are open 9am–9pm daily.";
        assert_eq!(
            verify_draft(draft, EVIDENCE),
            Err(VerifyRejection::EmptyFinalAnswer)
        );
    }

    #[test]
    fn one_verbatim_line_among_paraphrases_is_enough() {
        let draft = "Delivery is Abuja only.\nQUOTES\n- Totally invented line.\n- We deliver within Abuja only.";
        let verified = verify_draft(draft, EVIDENCE).unwrap();
        assert_eq!(verified.quotes, vec!["We deliver within Abuja only."]);
    }

    #[test]
    fn empty_quote_block_rejects() {
        let draft = "An answer.\nQUOTES:\n   \n";
        assert_eq!(
            verify_draft(draft, EVIDENCE),
            Err(VerifyRejection::NoVerbatimEvidence)
        );
    }
}
