use chrono::{DateTime, Utc};
use notifier_logging::{notifier_debug, notifier_warn};
use serde::Deserialize;
use serde_json::Value;

use crate::{Offer, OfferSet};

/// Store page prefix; the product slug is appended to it.
pub const DEFAULT_STORE_BASE_URL: &str = "https://store.epicgames.com/p/";

#[derive(Debug, thiserror::Error)]
pub enum MalformedPayloadError {
    #[error("catalog payload lacks data.Catalog.searchStore.elements: {0}")]
    Structure(serde_json::Error),
    #[error("catalog element {index} has a free offer but unreadable fields: {source}")]
    InvalidElement {
        index: usize,
        source: serde_json::Error,
    },
    #[error("catalog element {index} has a free offer but no title")]
    MissingTitle { index: usize },
}

#[derive(Debug, Deserialize)]
struct CatalogPayload {
    data: CatalogData,
}

#[derive(Debug, Deserialize)]
struct CatalogData {
    #[serde(rename = "Catalog")]
    catalog: Catalog,
}

#[derive(Debug, Deserialize)]
struct Catalog {
    #[serde(rename = "searchStore")]
    search_store: SearchStore,
}

/// Elements stay raw until their promotions show a free offer.
#[derive(Debug, Deserialize)]
struct SearchStore {
    elements: Vec<Value>,
}

#[derive(Debug, Deserialize)]
struct ElementPromotions {
    promotions: Option<Promotions>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CatalogElement {
    title: Option<String>,
    description: Option<String>,
    product_slug: Option<String>,
    url_slug: Option<String>,
    catalog_ns: Option<CatalogNamespace>,
    key_images: Option<Vec<KeyImage>>,
}

#[derive(Debug, Deserialize)]
struct CatalogNamespace {
    mappings: Option<Vec<PageMapping>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PageMapping {
    page_slug: Option<String>,
}

#[derive(Debug, Deserialize)]
struct KeyImage {
    url: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Promotions {
    promotional_offers: Option<Vec<OfferWindow>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct OfferWindow {
    promotional_offers: Option<Vec<PromotionalOffer>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromotionalOffer {
    end_date: Option<Value>,
    discount_setting: Option<DiscountSetting>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DiscountSetting {
    discount_percentage: Option<Value>,
}

impl PromotionalOffer {
    fn is_free(&self) -> bool {
        self.discount_setting
            .as_ref()
            .and_then(|setting| setting.discount_percentage.as_ref())
            .and_then(Value::as_f64)
            == Some(0.0)
    }
}

impl CatalogElement {
    fn slug(&self) -> Option<&str> {
        non_empty(self.product_slug.as_deref())
            .or_else(|| {
                self.catalog_ns
                    .as_ref()
                    .and_then(|ns| ns.mappings.as_deref())
                    .and_then(|mappings| {
                        mappings
                            .iter()
                            .find_map(|mapping| non_empty(mapping.page_slug.as_deref()))
                    })
            })
            .or_else(|| non_empty(self.url_slug.as_deref()))
    }

    fn image_url(&self) -> Option<String> {
        self.key_images
            .as_deref()
            .and_then(|images| images.first())
            .and_then(|image| image.url.clone())
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Walks a raw `freeGamesPromotions` payload and keeps only 0% discount offers.
#[derive(Debug, Clone)]
pub struct OfferExtractor {
    store_base_url: String,
}

impl Default for OfferExtractor {
    fn default() -> Self {
        Self::new(DEFAULT_STORE_BASE_URL)
    }
}

impl OfferExtractor {
    pub fn new(store_base_url: impl Into<String>) -> Self {
        Self {
            store_base_url: store_base_url.into(),
        }
    }

    pub fn extract(&self, raw: &Value) -> Result<OfferSet, MalformedPayloadError> {
        let payload =
            CatalogPayload::deserialize(raw).map_err(MalformedPayloadError::Structure)?;

        let mut offers = Vec::new();
        for (index, raw_element) in payload.data.catalog.search_store.elements.iter().enumerate() {
            let free = free_promotions(index, raw_element);
            if free.is_empty() {
                continue;
            }

            let element = CatalogElement::deserialize(raw_element)
                .map_err(|source| MalformedPayloadError::InvalidElement { index, source })?;
            for promo in free {
                offers.push(self.build_offer(index, &element, &promo)?);
            }
        }

        Ok(OfferSet::new(offers))
    }

    fn build_offer(
        &self,
        index: usize,
        element: &CatalogElement,
        promo: &PromotionalOffer,
    ) -> Result<Offer, MalformedPayloadError> {
        let title = element
            .title
            .clone()
            .ok_or(MalformedPayloadError::MissingTitle { index })?;

        let link_url = match element.slug() {
            Some(slug) => format!("{}{}", self.store_base_url, slug),
            None => {
                notifier_warn!("No slug for free offer {:?}; linking store root", title);
                self.store_base_url.clone()
            }
        };

        let expiry = parse_expiry(promo.end_date.as_ref(), &title);

        Ok(Offer {
            description: element.description.clone().unwrap_or_default(),
            image_url: element.image_url(),
            link_url,
            expiry,
            title,
        })
    }
}

/// Zero-discount offers of one element. An element whose promotions do not
/// decode cannot be shown to be free and is skipped.
fn free_promotions(index: usize, raw_element: &Value) -> Vec<PromotionalOffer> {
    let windows = match ElementPromotions::deserialize(raw_element) {
        Ok(ElementPromotions {
            promotions: Some(Promotions {
                promotional_offers: Some(windows),
            }),
        }) => windows,
        Ok(_) => return Vec::new(),
        Err(err) => {
            notifier_debug!("Skipping catalog element {} with unreadable promotions: {}", index, err);
            return Vec::new();
        }
    };

    windows
        .into_iter()
        .filter_map(|window| window.promotional_offers)
        .flatten()
        .filter(PromotionalOffer::is_free)
        .collect()
}

fn parse_expiry(raw: Option<&Value>, title: &str) -> Option<DateTime<Utc>> {
    let raw = raw.filter(|value| !value.is_null())?;
    let parsed = raw
        .as_str()
        .map(DateTime::parse_from_rfc3339)
        .and_then(Result::ok);
    match parsed {
        Some(end) => Some(end.with_timezone(&Utc)),
        None => {
            notifier_warn!("Ignoring unparseable end date {} for {:?}", raw, title);
            None
        }
    }
}
