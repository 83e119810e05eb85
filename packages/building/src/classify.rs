//! Tag-based building classification.
//!
//! OSM buildings carry heterogeneous free-form tags. [`classify`] maps
//! them onto the coarse [`BuildingCategory`] taxonomy by walking a fixed,
//! ordered rule table: the first matching rule wins, so a `tourism=hotel`
//! building is a hotel whatever its `amenity` or `building` tags say.

use std::collections::BTreeMap;

use geojson::Feature;
use stay_atlas_building_models::{BuildingCategory, BuildingTags, CLASSIFIED_PROPERTY, TagKey};

/// A predicate over one tag.
#[derive(Debug, Clone, Copy)]
pub enum Condition {
    /// The tag equals one of the listed values (case-sensitive).
    OneOf(TagKey, &'static [&'static str]),
    /// The tag is present with a non-empty value.
    Present(TagKey),
}

impl Condition {
    fn matches(self, tags: &BuildingTags) -> bool {
        match self {
            Self::OneOf(key, values) => {
                let value = tags.get(key);
                values.contains(&value)
            }
            Self::Present(key) => !tags.get(key).is_empty(),
        }
    }
}

/// One row of the priority table.
#[derive(Debug, Clone, Copy)]
pub struct Rule {
    pub condition: Condition,
    pub category: BuildingCategory,
}

const fn one_of(key: TagKey, values: &'static [&'static str], category: BuildingCategory) -> Rule {
    Rule {
        condition: Condition::OneOf(key, values),
        category,
    }
}

const fn present(key: TagKey, category: BuildingCategory) -> Rule {
    Rule {
        condition: Condition::Present(key),
        category,
    }
}

/// Classification rules in priority order.
///
/// Specific use tags (`tourism`, `amenity`, `shop`, `office`, `leisure`)
/// come before the generic `building` tag.
pub const RULES: &[Rule] = &[
    // ── Use tags ────────────────────────────────────────────────────
    one_of(TagKey::Tourism, &["hotel", "hostel", "apartment"], BuildingCategory::Hotel),
    one_of(
        TagKey::Amenity,
        &["restaurant", "cafe", "bar", "fast_food"],
        BuildingCategory::Restaurant,
    ),
    one_of(
        TagKey::Amenity,
        &["school", "university", "college"],
        BuildingCategory::Education,
    ),
    one_of(
        TagKey::Amenity,
        &["hospital", "clinic", "pharmacy"],
        BuildingCategory::Healthcare,
    ),
    one_of(
        TagKey::Amenity,
        &["place_of_worship", "church"],
        BuildingCategory::Religious,
    ),
    present(TagKey::Shop, BuildingCategory::Commercial),
    present(TagKey::Office, BuildingCategory::Office),
    present(TagKey::Leisure, BuildingCategory::Leisure),
    // ── Building tag ────────────────────────────────────────────────
    one_of(
        TagKey::Building,
        &["residential", "house", "apartments"],
        BuildingCategory::Residential,
    ),
    one_of(TagKey::Building, &["commercial", "retail"], BuildingCategory::Commercial),
    one_of(TagKey::Building, &["industrial", "warehouse"], BuildingCategory::Industrial),
    one_of(TagKey::Building, &["hotel"], BuildingCategory::Hotel),
    one_of(TagKey::Building, &["school", "university"], BuildingCategory::Education),
    one_of(TagKey::Building, &["hospital", "clinic"], BuildingCategory::Healthcare),
    one_of(
        TagKey::Building,
        &["church", "cathedral", "mosque", "synagogue"],
        BuildingCategory::Religious,
    ),
    one_of(TagKey::Building, &["public", "civic"], BuildingCategory::Public),
    one_of(TagKey::Building, &["garage", "parking"], BuildingCategory::Parking),
];

/// Classifies a building from its tags.
///
/// Returns [`BuildingCategory::Unknown`] when no rule matches, including
/// for the generic `building=yes`.
#[must_use]
pub fn classify(tags: &BuildingTags) -> BuildingCategory {
    RULES
        .iter()
        .find(|rule| rule.condition.matches(tags))
        .map_or(BuildingCategory::Unknown, |rule| rule.category)
}

/// Number of buildings per category.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryCounts {
    counts: BTreeMap<BuildingCategory, u64>,
}

impl CategoryCounts {
    /// Records one building of `category`.
    pub fn add(&mut self, category: BuildingCategory) {
        *self.counts.entry(category).or_insert(0) += 1;
    }

    /// Count for a single category.
    #[must_use]
    pub fn get(&self, category: BuildingCategory) -> u64 {
        self.counts.get(&category).copied().unwrap_or(0)
    }

    /// Total number of buildings counted.
    #[must_use]
    pub fn total(&self) -> u64 {
        self.counts.values().sum()
    }

    /// Categories with their counts, largest first; ties by name.
    #[must_use]
    pub fn sorted(&self) -> Vec<(BuildingCategory, u64)> {
        let mut rows: Vec<_> = self.counts.iter().map(|(c, n)| (*c, *n)).collect();
        rows.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.as_ref().cmp(b.0.as_ref())));
        rows
    }

    /// Categories no building was classified as, in declaration order.
    #[must_use]
    pub fn missing(&self) -> Vec<BuildingCategory> {
        BuildingCategory::all()
            .iter()
            .copied()
            .filter(|category| self.get(*category) == 0)
            .collect()
    }
}

/// Adds the `building_type_classified` property to every feature.
pub fn classify_features(features: &mut [Feature]) -> CategoryCounts {
    let mut counts = CategoryCounts::default();

    for feature in features.iter_mut() {
        let tags = feature
            .properties
            .as_ref()
            .map(BuildingTags::from_properties)
            .unwrap_or_default();
        let category = classify(&tags);
        feature.set_property(CLASSIFIED_PROPERTY, category.as_ref());
        counts.add(category);
    }

    counts
}
