//! Marker-based extraction of a title and description from generated text.
//!
//! The rewrite prompt asks the model to answer with `Title:` and
//! `Description:` lines. Models mostly comply; this module pulls the two
//! fields back out and refuses anything that is missing either one.
//! Deliberately no smarter than that: free-form model output does not
//! reward clever parsing.

use thiserror::Error;

use crate::error::truncate;

/// Line prefix that introduces the rewritten title.
pub const TITLE_PREFIX: &str = "Title:";
/// Line prefix that introduces the rewritten description.
pub const DESCRIPTION_PREFIX: &str = "Description:";

/// A successfully extracted title/description pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Listing {
    pub title: String,
    pub description: String,
}

/// The generated text never populated one of the required fields.
#[derive(Debug, Error)]
#[error("missing Title:/Description: markers in generated text: {}", truncate(.raw, 200))]
pub struct ParseError {
    /// The full offending text, kept for diagnostic logging.
    pub raw: String,
}

/// Extract the title and description from concatenated generated text.
///
/// Scans line by line for [`TITLE_PREFIX`] and [`DESCRIPTION_PREFIX`]
/// at line start (case-sensitive). The remainder of a matching line
/// becomes the field value, trimmed; asterisks are additionally removed
/// from the title, since models like to bold it. When a prefix occurs
/// more than once the last occurrence wins. A field that ends up empty
/// counts as missing.
pub fn parse_listing(text: &str) -> Result<Listing, ParseError> {
    let mut title = String::new();
    let mut description = String::new();

    for line in text.trim().lines() {
        if let Some(rest) = line.strip_prefix(TITLE_PREFIX) {
            title = rest.trim().replace('*', "");
        } else if let Some(rest) = line.strip_prefix(DESCRIPTION_PREFIX) {
            description = rest.trim().to_string();
        }
    }

    if title.is_empty() || description.is_empty() {
        return Err(ParseError {
            raw: text.to_string(),
        });
    }

    Ok(Listing { title, description })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_and_description_extracted() {
        let listing = parse_listing("Title: Cozy Cabin*\nDescription: A nice place\n").unwrap();
        assert_eq!(listing.title, "Cozy Cabin");
        assert_eq!(listing.description, "A nice place");
    }

    #[test]
    fn test_missing_description_fails() {
        let err = parse_listing("Title: Cozy Cabin\nSomething else entirely\n").unwrap_err();
        assert!(err.raw.contains("Cozy Cabin"));
    }

    #[test]
    fn test_missing_title_fails() {
        assert!(parse_listing("Description: A nice place\n").is_err());
    }

    #[test]
    fn test_last_occurrence_wins() {
        let listing = parse_listing(
            "Title: First Draft\nDescription: A nice place\nTitle: Final Title\n",
        )
        .unwrap();
        assert_eq!(listing.title, "Final Title");
        assert_eq!(listing.description, "A nice place");
    }

    #[test]
    fn test_prefix_not_at_line_start_ignored() {
        let err = parse_listing("The Title: Cozy Cabin\nDescription: A nice place\n").unwrap_err();
        assert!(err.raw.contains("The Title:"));
    }

    #[test]
    fn test_empty_value_counts_as_missing() {
        assert!(parse_listing("Title:\nDescription: A nice place\n").is_err());
        assert!(parse_listing("Title: ***\nDescription: A nice place\n").is_err());
    }

    #[test]
    fn test_asterisks_stripped_from_title_only() {
        let listing =
            parse_listing("Title: **Cozy Cabin**\nDescription: A *truly* nice place\n").unwrap();
        assert_eq!(listing.title, "Cozy Cabin");
        assert_eq!(listing.description, "A *truly* nice place");
    }

    #[test]
    fn test_surrounding_chatter_tolerated() {
        let text = "Sure! Here is the rewrite you asked for:\n\n\
                    Title: Sunlit Loft Retreat\n\
                    Description: A bright two-bedroom loft steps from the beach.\n\n\
                    Let me know if you would like another pass.";
        let listing = parse_listing(text).unwrap();
        assert_eq!(listing.title, "Sunlit Loft Retreat");
        assert_eq!(
            listing.description,
            "A bright two-bedroom loft steps from the beach."
        );
    }

    #[test]
    fn test_error_display_truncates_long_text() {
        let raw = format!("no markers here {}", "x".repeat(400));
        let err = parse_listing(&raw).unwrap_err();
        assert_eq!(err.raw, raw);
        assert!(err.to_string().len() < raw.len());
    }
}
