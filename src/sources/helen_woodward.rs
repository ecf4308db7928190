use lazy_static::lazy_static;
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, warn};

use super::{element_text, non_empty, Extractor};
use crate::{
    error::Result,
    listing::{AdoptionListing, Listing},
};

lazy_static! {
    static ref CARD: Selector = Selector::parse("div.product_content").unwrap();
    static ref NAME: Selector = Selector::parse("h3.modal-title").unwrap();
    static ref BREED: Selector = Selector::parse("h4.span-desc").unwrap();
    static ref FACTS: Selector = Selector::parse("ul").unwrap();
    static ref FACT: Selector = Selector::parse("li.class-li").unwrap();
    static ref FACT_HEADING: Selector = Selector::parse("span.span-heading").unwrap();
    static ref FACT_TEXT: Selector = Selector::parse("span.span-text").unwrap();
    static ref IMAGE: Selector = Selector::parse("img").unwrap();
}

/// Adoptable-dogs page of the Helen Woodward Animal Center.
///
/// Each dog is a `div.product_content` card preceded by a `div.product_img`
/// sibling holding the photo.
pub struct HelenWoodward {
    name: String,
    url: String,
}

impl HelenWoodward {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
        }
    }

    fn read_card(&self, card: ElementRef) -> Option<AdoptionListing> {
        let name = element_text(&card.select(&NAME).next()?);
        let breed = card
            .select(&BREED)
            .next()
            .map(|el| element_text(&el))
            .unwrap_or_default();

        // The site renders an empty duplicate of every card
        if breed.is_empty() {
            debug!("Skipping card {:?} without breed", name);
            return None;
        }

        let mut sex = String::new();
        let mut age = String::new();
        let mut weight = String::new();

        if let Some(list) = card.select(&FACTS).next() {
            for fact in list.select(&FACT) {
                let (Some(heading), Some(text)) =
                    (fact.select(&FACT_HEADING).next(), fact.select(&FACT_TEXT).next())
                else {
                    continue;
                };

                let heading = element_text(&heading).to_lowercase();
                let text = element_text(&text);

                if heading.contains("sex") {
                    sex = normalize_sex(&text);
                } else if heading.contains("age") {
                    age = text;
                } else if heading.contains("weight") {
                    weight = text;
                }
            }
        }

        Some(AdoptionListing {
            source: self.name.clone(),
            name,
            breed,
            sex,
            age,
            weight,
            image: card_image(&card),
            url: self.url.clone(),
        })
    }
}

impl Extractor for HelenWoodward {
    fn extract(&self, raw: &str) -> Result<Vec<Listing>> {
        let document = Html::parse_document(raw);

        let dogs: Vec<Listing> = document
            .select(&CARD)
            .filter_map(|card| self.read_card(card))
            .map(Listing::Adoption)
            .collect();

        if dogs.is_empty() {
            warn!("No dog cards found on {}; page layout may have changed", self.url);
        }

        Ok(dogs)
    }
}

/// Photo lives in the `div.product_img` element right before the card
fn card_image(card: &ElementRef) -> Option<String> {
    let previous = card.prev_siblings().find_map(ElementRef::wrap)?;
    if !previous.value().classes().any(|class| class == "product_img") {
        return None;
    }
    let img = previous.select(&IMAGE).next()?;
    non_empty(img.value().attr("src"))
}

/// "Female - Spayed" -> "female"
fn normalize_sex(text: &str) -> String {
    text.to_lowercase()
        .replace(" - spayed", "")
        .replace(" - neutered", "")
        .trim()
        .to_string()
}
