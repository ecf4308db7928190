use lazy_static::lazy_static;
use scraper::{ElementRef, Html, Selector};
use tracing::warn;

use super::{element_text, non_empty, Extractor};
use crate::{
    error::Result,
    listing::{AdoptionListing, Listing},
};

lazy_static! {
    static ref ARTICLE: Selector = Selector::parse("article").unwrap();
    static ref TITLE_LINK: Selector = Selector::parse("h2.entry-title a").unwrap();
    static ref THUMBNAIL_IMAGE: Selector = Selector::parse("div.post-thumbnail img").unwrap();
    static ref CONTENT: Selector = Selector::parse("div.entry-content").unwrap();
}

/// Dogs-for-adoption page of the Rancho Coastal Humane Society.
///
/// Each dog is a blog-style `article`. Breed, sex, age and weight are bare
/// text lines following the dog's name inside the entry content.
pub struct RanchoCoastal {
    name: String,
    url: String,
}

impl RanchoCoastal {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
        }
    }

    fn read_article(&self, article: ElementRef) -> Option<AdoptionListing> {
        let name = element_text(&article.select(&TITLE_LINK).next()?);

        let image = article
            .select(&THUMBNAIL_IMAGE)
            .next()
            .and_then(|img| non_empty(img.value().attr("src")));

        let mut fields = [String::new(), String::new(), String::new(), String::new()];

        if let Some(content) = article.select(&CONTENT).next() {
            let text = content.text().collect::<String>();
            let lines: Vec<&str> = text
                .split('\n')
                .map(str::trim)
                .filter(|line| !line.is_empty())
                .collect();

            let needle = name.to_lowercase();
            if let Some(pos) = lines
                .iter()
                .position(|line| line.to_lowercase().contains(&needle))
            {
                for (field, line) in fields.iter_mut().zip(lines.iter().skip(pos + 1)) {
                    *field = line.to_string();
                }
            }
        }

        let [breed, sex, age, weight] = fields;

        Some(AdoptionListing {
            source: self.name.clone(),
            name,
            breed,
            sex,
            age,
            weight,
            image,
            url: self.url.clone(),
        })
    }
}

impl Extractor for RanchoCoastal {
    fn extract(&self, raw: &str) -> Result<Vec<Listing>> {
        let document = Html::parse_document(raw);

        let dogs: Vec<Listing> = document
            .select(&ARTICLE)
            .filter(|article| article.value().classes().any(|class| class.contains("post")))
            .filter_map(|article| self.read_article(article))
            .map(Listing::Adoption)
            .collect();

        if dogs.is_empty() {
            warn!("No dog articles found on {}; page layout may have changed", self.url);
        }

        Ok(dogs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"
<html><body>
<article class="post-1021 dogs type-dogs">
  <div class="post-thumbnail"><img src="https://rchumanesociety.org/wp/peanut.jpg"></div>
  <h2 class="entry-title"><a href="/dogs/peanut">Peanut</a></h2>
  <div class="entry-content">
    <p>Meet Peanut!</p>
    <p>Miniature Poodle</p>
    <p>Female</p>
    <p>1 year 3 months</p>
    <p>12 ¼ lbs</p>
  </div>
</article>
<article class="page">
  <h2 class="entry-title"><a href="/about">About us</a></h2>
</article>
<article class="post-1022">
  <h2 class="entry-title"><a href="/dogs/rex">Rex</a></h2>
  <div class="entry-content">
    <p>Rex</p>
    <p>Shepherd</p>
  </div>
</article>
<article class="post-1023">
  <h2 class="entry-title">No link here</h2>
</article>
</body></html>
"#;

    fn extractor() -> RanchoCoastal {
        RanchoCoastal::new(
            "Rancho Coastal Humane Society",
            "https://rchumanesociety.org/dogs-for-adoption/",
        )
    }

    #[test]
    fn test_reads_lines_after_name() {
        let listings = extractor().extract(PAGE).unwrap();
        assert_eq!(listings.len(), 2);

        let Listing::Adoption(peanut) = &listings[0] else {
            panic!("expected adoption listing");
        };
        assert_eq!(peanut.name, "Peanut");
        assert_eq!(peanut.breed, "Miniature Poodle");
        assert_eq!(peanut.sex, "Female");
        assert_eq!(peanut.age, "1 year 3 months");
        assert_eq!(peanut.weight, "12 ¼ lbs");
        assert_eq!(peanut.image.as_deref(), Some("https://rchumanesociety.org/wp/peanut.jpg"));
    }

    #[test]
    fn test_short_content_leaves_fields_empty() {
        let listings = extractor().extract(PAGE).unwrap();
        let Listing::Adoption(rex) = &listings[1] else {
            panic!("expected adoption listing");
        };
        assert_eq!(rex.breed, "Shepherd");
        assert!(rex.sex.is_empty());
        assert!(rex.weight.is_empty());
        assert_eq!(rex.image, None);
    }
}
