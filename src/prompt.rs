//! Prompt builders for the two generation steps.
//!
//! Both prompts are fixed-shape: the rewrite prompt pins the model to a
//! `Title:` / `Description:` answer format that [`crate::content`] can
//! extract, and the summarization prompt lays the property facts out one
//! per line.

use crate::content::Listing;
use crate::model::Property;

/// Build the prompt asking the model to rewrite a property's title and
/// description.
pub fn rewrite_prompt(title: &str, description: &str) -> String {
    format!(
        "Please rewrite the following property title and description to make them \
         more engaging, appealing, and descriptive. Ensure that the title is concise \
         yet catchy, and that the description highlights the key features of the \
         property in a clear and compelling manner. Generate only one title and one \
         description without adding any extra text, markdown formatting, or symbols. \
         Always format your response strictly as follows: Title: and Description:\n\
         \n\
         Original Title: {title}\n\
         Original Description: {description}"
    )
}

/// Build the prompt asking the model to summarize a property, using the
/// freshly rewritten title and description plus the stored facts.
///
/// A property with no location reads `N/A`.
pub fn summary_prompt(listing: &Listing, property: &Property) -> String {
    format!(
        "Summarize the following property information:\n\
         Title: {title}\n\
         Description: {description}\n\
         Rating: {rating}\n\
         Location: {location}\n\
         Amenities: {amenities}",
        title = listing.title,
        description = listing.description,
        rating = property.rating,
        location = property.location.as_deref().unwrap_or("N/A"),
        amenities = property.amenities.join(", "),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_property() -> Property {
        Property {
            id: 7,
            title: "Cabin".into(),
            description: "A cabin in the woods".into(),
            rating: 4.5,
            location: Some("Lake Tahoe".into()),
            amenities: vec!["WiFi".into(), "Hot Tub".into(), "Parking".into()],
        }
    }

    #[test]
    fn test_rewrite_prompt_embeds_both_fields() {
        let prompt = rewrite_prompt("Cabin", "A cabin in the woods");
        assert!(prompt.contains("Original Title: Cabin"));
        assert!(prompt.contains("Original Description: A cabin in the woods"));
        assert!(prompt.contains("Title: and Description:"));
    }

    #[test]
    fn test_summary_prompt_uses_rewritten_listing() {
        let listing = Listing {
            title: "Lakeside Hideaway".into(),
            description: "A quiet cabin above the shoreline".into(),
        };
        let prompt = summary_prompt(&listing, &sample_property());
        assert!(prompt.starts_with("Summarize the following property information:"));
        assert!(prompt.contains("Title: Lakeside Hideaway"));
        assert!(prompt.contains("Description: A quiet cabin above the shoreline"));
        assert!(prompt.contains("Rating: 4.5"));
        assert!(prompt.contains("Location: Lake Tahoe"));
        assert!(prompt.contains("Amenities: WiFi, Hot Tub, Parking"));
    }

    #[test]
    fn test_summary_prompt_missing_location_reads_na() {
        let mut property = sample_property();
        property.location = None;
        property.amenities.clear();
        let listing = Listing {
            title: "T".into(),
            description: "D".into(),
        };
        let prompt = summary_prompt(&listing, &property);
        assert!(prompt.contains("Location: N/A"));
        assert!(prompt.ends_with("Amenities: "));
    }
}
