use std::collections::BTreeSet;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use storefront_core::{AggregateRoot, BrandId, CatalogItemId, CategoryId, DomainError, DomainResult, UserId};

use crate::media::MediaDescriptor;
use crate::slug::slugify;

/// Minimum accepted price, in minor currency units (price must be strictly
/// greater than this).
pub const MIN_PRICE_MINOR: u64 = 50;

/// Display status, derived from the publication flag.
///
/// Distinct from `published` so that future display concerns (stock state,
/// scheduling) have a place without overloading the boolean.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemStatus {
    Draft,
    Active,
}

/// The attribute set shared by create and update.
///
/// Update has full-replacement semantics, so both operations take the same
/// fields and run the same validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemAttributes {
    pub name: String,
    pub sku: String,
    pub short_description: String,
    pub long_description: String,
    /// Price in minor currency units (e.g. cents).
    pub price: u64,
    /// Optional sale price; must not exceed `price`.
    pub sale_price: Option<u64>,
    pub category_ids: BTreeSet<CategoryId>,
    pub brand_id: Option<BrandId>,
}

impl ItemAttributes {
    fn validate(&self) -> DomainResult<()> {
        for (field, value) in [
            ("name", &self.name),
            ("sku", &self.sku),
            ("short_description", &self.short_description),
            ("long_description", &self.long_description),
        ] {
            if value.trim().is_empty() {
                return Err(DomainError::validation(format!("{field} cannot be empty")));
            }
        }

        if self.price <= MIN_PRICE_MINOR {
            return Err(DomainError::validation(format!(
                "price must be greater than {MIN_PRICE_MINOR} minor units"
            )));
        }

        if let Some(sale_price) = self.sale_price {
            if sale_price > self.price {
                return Err(DomainError::validation(
                    "sale_price cannot exceed price".to_string(),
                ));
            }
        }

        Ok(())
    }
}

/// Aggregate root: CatalogItem.
///
/// The single consistency boundary of the write side. The aggregate derives
/// its own slug, stamps its own audit fields, and enforces field-format
/// invariants; callers never set those directly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogItem {
    id: CatalogItemId,
    name: String,
    sku: String,
    slug: String,
    short_description: String,
    long_description: String,
    price: u64,
    sale_price: Option<u64>,
    category_ids: BTreeSet<CategoryId>,
    brand_id: Option<BrandId>,
    images: Vec<MediaDescriptor>,
    thumbnail: Option<MediaDescriptor>,
    colors: BTreeSet<String>,
    sizes: BTreeSet<String>,
    tags: BTreeSet<String>,
    seo_title: Option<String>,
    seo_description: Option<String>,
    barcode: Option<String>,
    unit: Option<String>,
    weight_grams: Option<u64>,
    featured: bool,
    published: bool,
    created_on_utc: DateTime<Utc>,
    created_by: UserId,
    last_modified_on_utc: DateTime<Utc>,
    last_modified_by: UserId,
    version: u64,
}

impl CatalogItem {
    /// Construct a new, unpublished item.
    ///
    /// Fails with `Validation` if a required field is empty or the price
    /// constraints are violated. The slug is derived from the name.
    pub fn create(id: CatalogItemId, attributes: ItemAttributes, performed_by: UserId) -> DomainResult<Self> {
        attributes.validate()?;

        let now = Utc::now();
        Ok(Self {
            id,
            slug: slugify(&attributes.name),
            name: attributes.name,
            sku: attributes.sku,
            short_description: attributes.short_description,
            long_description: attributes.long_description,
            price: attributes.price,
            sale_price: attributes.sale_price,
            category_ids: attributes.category_ids,
            brand_id: attributes.brand_id,
            images: Vec::new(),
            thumbnail: None,
            colors: BTreeSet::new(),
            sizes: BTreeSet::new(),
            tags: BTreeSet::new(),
            seo_title: None,
            seo_description: None,
            barcode: None,
            unit: None,
            weight_grams: None,
            featured: false,
            published: false,
            created_on_utc: now,
            created_by: performed_by,
            last_modified_on_utc: now,
            last_modified_by: performed_by,
            version: 0,
        })
    }

    /// Full attribute replacement (not a partial patch).
    ///
    /// Runs the same validation as `create` and recomputes the slug.
    pub fn update(&mut self, attributes: ItemAttributes, performed_by: UserId) -> DomainResult<()> {
        attributes.validate()?;

        self.slug = slugify(&attributes.name);
        self.name = attributes.name;
        self.sku = attributes.sku;
        self.short_description = attributes.short_description;
        self.long_description = attributes.long_description;
        self.price = attributes.price;
        self.sale_price = attributes.sale_price;
        self.category_ids = attributes.category_ids;
        self.brand_id = attributes.brand_id;
        self.touch(performed_by);
        Ok(())
    }

    /// Replace the image list with the retained subset of the prior list plus
    /// the newly staged images.
    ///
    /// "Delete some, keep others, add new ones" is expressed this way rather
    /// than through a separate delete command.
    pub fn add_or_update_images(
        &mut self,
        new_images: Vec<MediaDescriptor>,
        retained_urls: &[String],
        performed_by: UserId,
    ) {
        let mut images: Vec<MediaDescriptor> = self
            .images
            .drain(..)
            .filter(|img| retained_urls.iter().any(|url| *url == img.public_url))
            .collect();
        images.extend(new_images);
        self.images = images;
        self.touch(performed_by);
    }

    /// Replace the thumbnail when a new one is supplied; no-op otherwise.
    pub fn add_or_update_thumbnail(&mut self, image: Option<MediaDescriptor>, performed_by: UserId) {
        if let Some(image) = image {
            self.thumbnail = Some(image);
            self.touch(performed_by);
        }
    }

    pub fn update_colors(&mut self, colors: impl IntoIterator<Item = String>, performed_by: UserId) {
        self.colors = colors.into_iter().collect();
        self.touch(performed_by);
    }

    pub fn update_sizes(&mut self, sizes: impl IntoIterator<Item = String>, performed_by: UserId) {
        self.sizes = sizes.into_iter().collect();
        self.touch(performed_by);
    }

    pub fn update_tags(&mut self, tags: impl IntoIterator<Item = String>, performed_by: UserId) {
        self.tags = tags.into_iter().collect();
        self.touch(performed_by);
    }

    pub fn update_seo(&mut self, title: Option<String>, description: Option<String>, performed_by: UserId) {
        self.seo_title = title;
        self.seo_description = description;
        self.touch(performed_by);
    }

    pub fn update_featured(&mut self, featured: bool, performed_by: UserId) {
        self.featured = featured;
        self.touch(performed_by);
    }

    pub fn update_barcode(&mut self, barcode: Option<String>, performed_by: UserId) {
        self.barcode = barcode;
        self.touch(performed_by);
    }

    pub fn update_unit_and_weight(
        &mut self,
        unit: Option<String>,
        weight_grams: Option<u64>,
        performed_by: UserId,
    ) {
        self.unit = unit;
        self.weight_grams = weight_grams;
        self.touch(performed_by);
    }

    /// Mark the item published.
    ///
    /// Idempotent state-wise; always stamps audit fields, so repeated calls
    /// are observably distinct by audit timestamp (retry-safe reconciliation).
    pub fn publish(&mut self, performed_by: UserId) {
        self.published = true;
        self.touch(performed_by);
    }

    /// Mark the item unpublished. Same idempotency contract as `publish`.
    pub fn unpublish(&mut self, performed_by: UserId) {
        self.published = false;
        self.touch(performed_by);
    }

    /// Audit stamp. `last_modified_on_utc` must strictly increase per
    /// mutation, so the stamp is clamped to at least 1µs past the previous
    /// one when the wall clock has not advanced.
    fn touch(&mut self, performed_by: UserId) {
        let floor = self.last_modified_on_utc + Duration::microseconds(1);
        self.last_modified_on_utc = Utc::now().max(floor);
        self.last_modified_by = performed_by;
    }

    pub fn id_typed(&self) -> CatalogItemId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn sku(&self) -> &str {
        &self.sku
    }

    pub fn slug(&self) -> &str {
        &self.slug
    }

    pub fn short_description(&self) -> &str {
        &self.short_description
    }

    pub fn long_description(&self) -> &str {
        &self.long_description
    }

    pub fn price(&self) -> u64 {
        self.price
    }

    pub fn sale_price(&self) -> Option<u64> {
        self.sale_price
    }

    pub fn category_ids(&self) -> &BTreeSet<CategoryId> {
        &self.category_ids
    }

    pub fn brand_id(&self) -> Option<BrandId> {
        self.brand_id
    }

    pub fn images(&self) -> &[MediaDescriptor] {
        &self.images
    }

    pub fn thumbnail(&self) -> Option<&MediaDescriptor> {
        self.thumbnail.as_ref()
    }

    pub fn colors(&self) -> &BTreeSet<String> {
        &self.colors
    }

    pub fn sizes(&self) -> &BTreeSet<String> {
        &self.sizes
    }

    pub fn tags(&self) -> &BTreeSet<String> {
        &self.tags
    }

    pub fn seo_title(&self) -> Option<&str> {
        self.seo_title.as_deref()
    }

    pub fn seo_description(&self) -> Option<&str> {
        self.seo_description.as_deref()
    }

    pub fn barcode(&self) -> Option<&str> {
        self.barcode.as_deref()
    }

    pub fn unit(&self) -> Option<&str> {
        self.unit.as_deref()
    }

    pub fn weight_grams(&self) -> Option<u64> {
        self.weight_grams
    }

    pub fn featured(&self) -> bool {
        self.featured
    }

    pub fn published(&self) -> bool {
        self.published
    }

    /// Display status derived from the publication flag.
    pub fn status(&self) -> ItemStatus {
        if self.published {
            ItemStatus::Active
        } else {
            ItemStatus::Draft
        }
    }

    pub fn created_on_utc(&self) -> DateTime<Utc> {
        self.created_on_utc
    }

    pub fn created_by(&self) -> UserId {
        self.created_by
    }

    pub fn last_modified_on_utc(&self) -> DateTime<Utc> {
        self.last_modified_on_utc
    }

    pub fn last_modified_by(&self) -> UserId {
        self.last_modified_by
    }

    /// Assigned by the document store on commit. Not a domain operation.
    pub fn set_version(&mut self, version: u64) {
        self.version = version;
    }
}

impl AggregateRoot for CatalogItem {
    type Id = CatalogItemId;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn version(&self) -> u64 {
        self.version
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn test_user() -> UserId {
        UserId::new()
    }

    fn test_attributes() -> ItemAttributes {
        ItemAttributes {
            name: "Black Tee".to_string(),
            sku: "BT-001".to_string(),
            short_description: "A black tee".to_string(),
            long_description: "A very soft black tee".to_string(),
            price: 2000,
            sale_price: None,
            category_ids: BTreeSet::new(),
            brand_id: None,
        }
    }

    fn test_image(url: &str) -> MediaDescriptor {
        MediaDescriptor {
            file_id: Uuid::now_v7(),
            original_name: format!("{url}.png"),
            stored_name: format!("{url}-stored.png"),
            public_url: url.to_string(),
        }
    }

    #[test]
    fn create_derives_slug_and_starts_unpublished() {
        let item = CatalogItem::create(CatalogItemId::new(), test_attributes(), test_user()).unwrap();

        assert_eq!(item.slug(), "black-tee");
        assert!(!item.published());
        assert_eq!(item.status(), ItemStatus::Draft);
        assert_eq!(item.version(), 0);
        assert!(item.thumbnail().is_none());
        assert!(item.images().is_empty());
    }

    #[test]
    fn create_stamps_audit_fields() {
        let actor = test_user();
        let item = CatalogItem::create(CatalogItemId::new(), test_attributes(), actor).unwrap();

        assert_eq!(item.created_by(), actor);
        assert_eq!(item.last_modified_by(), actor);
        assert_eq!(item.created_on_utc(), item.last_modified_on_utc());
    }

    #[test]
    fn create_rejects_empty_required_fields() {
        for field in ["name", "sku", "short_description", "long_description"] {
            let mut attrs = test_attributes();
            match field {
                "name" => attrs.name = "  ".to_string(),
                "sku" => attrs.sku = String::new(),
                "short_description" => attrs.short_description = " ".to_string(),
                _ => attrs.long_description = String::new(),
            }

            let err = CatalogItem::create(CatalogItemId::new(), attrs, test_user()).unwrap_err();
            match err {
                DomainError::Validation(msg) => assert!(msg.contains(field), "message {msg:?} for {field}"),
                other => panic!("expected Validation for empty {field}, got {other:?}"),
            }
        }
    }

    #[test]
    fn create_rejects_price_at_or_below_threshold() {
        let mut attrs = test_attributes();
        attrs.price = MIN_PRICE_MINOR;

        let err = CatalogItem::create(CatalogItemId::new(), attrs, test_user()).unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn create_rejects_sale_price_above_price() {
        let mut attrs = test_attributes();
        attrs.sale_price = Some(attrs.price + 1);

        let err = CatalogItem::create(CatalogItemId::new(), attrs, test_user()).unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn sale_price_equal_to_price_is_accepted() {
        let mut attrs = test_attributes();
        attrs.sale_price = Some(attrs.price);

        assert!(CatalogItem::create(CatalogItemId::new(), attrs, test_user()).is_ok());
    }

    #[test]
    fn update_replaces_attributes_and_recomputes_slug() {
        let mut item = CatalogItem::create(CatalogItemId::new(), test_attributes(), test_user()).unwrap();

        let mut attrs = test_attributes();
        attrs.name = "White Tee XL".to_string();
        item.update(attrs, test_user()).unwrap();

        assert_eq!(item.name(), "White Tee XL");
        assert_eq!(item.slug(), "white-tee-xl");
    }

    #[test]
    fn update_preserves_creation_audit() {
        let creator = test_user();
        let mut item = CatalogItem::create(CatalogItemId::new(), test_attributes(), creator).unwrap();
        let created_on = item.created_on_utc();

        let editor = test_user();
        item.update(test_attributes(), editor).unwrap();

        assert_eq!(item.created_by(), creator);
        assert_eq!(item.created_on_utc(), created_on);
        assert_eq!(item.last_modified_by(), editor);
        assert!(item.last_modified_on_utc() > created_on);
    }

    #[test]
    fn add_or_update_images_retains_and_appends() {
        let actor = test_user();
        let mut item = CatalogItem::create(CatalogItemId::new(), test_attributes(), actor).unwrap();

        item.add_or_update_images(vec![test_image("url1"), test_image("url2")], &[], actor);
        assert_eq!(item.images().len(), 2);

        let new_image = test_image("url3");
        item.add_or_update_images(vec![new_image.clone()], &["url2".to_string()], actor);

        let urls: Vec<&str> = item.images().iter().map(|i| i.public_url.as_str()).collect();
        assert_eq!(urls, vec!["url2", "url3"]);
        assert_eq!(item.images()[1], new_image);
    }

    #[test]
    fn add_or_update_images_with_no_retained_urls_replaces_all() {
        let actor = test_user();
        let mut item = CatalogItem::create(CatalogItemId::new(), test_attributes(), actor).unwrap();
        item.add_or_update_images(vec![test_image("url1")], &[], actor);

        item.add_or_update_images(vec![], &[], actor);
        assert!(item.images().is_empty());
    }

    #[test]
    fn thumbnail_is_replaced_only_when_supplied() {
        let actor = test_user();
        let mut item = CatalogItem::create(CatalogItemId::new(), test_attributes(), actor).unwrap();

        let first = test_image("thumb1");
        item.add_or_update_thumbnail(Some(first.clone()), actor);
        assert_eq!(item.thumbnail(), Some(&first));
        let stamped = item.last_modified_on_utc();

        // No-op on the update path when no new thumbnail is supplied.
        item.add_or_update_thumbnail(None, actor);
        assert_eq!(item.thumbnail(), Some(&first));
        assert_eq!(item.last_modified_on_utc(), stamped);

        let second = test_image("thumb2");
        item.add_or_update_thumbnail(Some(second.clone()), actor);
        assert_eq!(item.thumbnail(), Some(&second));
    }

    #[test]
    fn attribute_setters_deduplicate() {
        let actor = test_user();
        let mut item = CatalogItem::create(CatalogItemId::new(), test_attributes(), actor).unwrap();

        item.update_colors(
            vec!["black".to_string(), "white".to_string(), "black".to_string()],
            actor,
        );
        assert_eq!(item.colors().len(), 2);

        item.update_tags(vec!["sale".to_string(), "sale".to_string()], actor);
        assert_eq!(item.tags().len(), 1);
    }

    #[test]
    fn publish_and_unpublish_are_idempotent_state_wise() {
        let actor = test_user();
        let mut item = CatalogItem::create(CatalogItemId::new(), test_attributes(), actor).unwrap();

        item.publish(actor);
        assert!(item.published());
        assert_eq!(item.status(), ItemStatus::Active);

        let first_stamp = item.last_modified_on_utc();
        item.publish(actor);
        assert!(item.published());
        // Repeated publish differs only in audit metadata.
        assert!(item.last_modified_on_utc() > first_stamp);

        item.unpublish(actor);
        assert!(!item.published());
        assert_eq!(item.status(), ItemStatus::Draft);

        item.unpublish(actor);
        assert!(!item.published());
    }

    #[test]
    fn last_modified_strictly_increases_across_rapid_mutations() {
        let actor = test_user();
        let mut item = CatalogItem::create(CatalogItemId::new(), test_attributes(), actor).unwrap();

        let mut previous = item.last_modified_on_utc();
        for _ in 0..50 {
            item.update_featured(true, actor);
            let current = item.last_modified_on_utc();
            assert!(current > previous);
            previous = current;
        }
    }

    #[cfg(test)]
    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            /// Property: the slug invariant holds after create and after
            /// every update, for any name the validation accepts.
            #[test]
            fn slug_always_matches_name(
                name in "[A-Za-z][A-Za-z0-9 ]{0,48}",
                next_name in "[A-Za-z][A-Za-z0-9 ]{0,48}"
            ) {
                let mut attrs = test_attributes();
                attrs.name = name.clone();
                let mut item = CatalogItem::create(CatalogItemId::new(), attrs, test_user()).unwrap();
                let expected = crate::slug::slugify(&name);
                prop_assert_eq!(item.slug(), expected.as_str());

                let mut attrs = test_attributes();
                attrs.name = next_name.clone();
                item.update(attrs, test_user()).unwrap();
                let expected = crate::slug::slugify(&next_name);
                prop_assert_eq!(item.slug(), expected.as_str());
            }

            /// Property: sale_price above price is always rejected, at or
            /// below is always accepted.
            #[test]
            fn sale_price_bound_is_enforced(
                price in (MIN_PRICE_MINOR + 1)..1_000_000u64,
                delta in 0u64..10_000
            ) {
                let mut attrs = test_attributes();
                attrs.price = price;

                attrs.sale_price = Some(price.saturating_sub(delta));
                prop_assert!(CatalogItem::create(CatalogItemId::new(), attrs.clone(), test_user()).is_ok());

                attrs.sale_price = Some(price + delta + 1);
                let err = CatalogItem::create(CatalogItemId::new(), attrs, test_user()).unwrap_err();
                prop_assert!(matches!(err, DomainError::Validation(_)));
            }
        }
    }
}
