use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One free promotion, normalized from the catalog payload.
///
/// Field names on disk follow the state file layout: `title`, `description`,
/// `image`, `url`, `expiry`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Offer {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(rename = "image", default)]
    pub image_url: Option<String>,
    #[serde(rename = "url")]
    pub link_url: String,
    #[serde(default)]
    pub expiry: Option<DateTime<Utc>>,
}

/// Ordered snapshot of offers. Equality is element-wise and order-sensitive.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OfferSet(Vec<Offer>);

impl OfferSet {
    pub fn new(offers: Vec<Offer>) -> Self {
        Self(offers)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Offer> {
        self.0.iter()
    }

    pub fn as_slice(&self) -> &[Offer] {
        &self.0
    }

    pub fn titles(&self) -> Vec<&str> {
        self.0.iter().map(|offer| offer.title.as_str()).collect()
    }
}

impl From<Vec<Offer>> for OfferSet {
    fn from(offers: Vec<Offer>) -> Self {
        Self(offers)
    }
}

impl FromIterator<Offer> for OfferSet {
    fn from_iter<I: IntoIterator<Item = Offer>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a OfferSet {
    type Item = &'a Offer;
    type IntoIter = std::slice::Iter<'a, Offer>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl IntoIterator for OfferSet {
    type Item = Offer;
    type IntoIter = std::vec::IntoIter<Offer>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}
