//! Keyword rule tables that classify free-text product types
//!
//! Two independent classifications are made from the same product type
//! text: the merchandise class (drives volume and price ranges) and the
//! seasonal profile (drives month-by-month multipliers). Each is an ordered
//! rule table evaluated first-match-wins with case-insensitive substring
//! matching, falling back to a default category.

use serde::Serialize;
use std::ops::{Range, RangeInclusive};

/// One rule: any keyword contained in the text selects `category`
#[derive(Debug, Clone, Copy)]
pub struct CategoryRule<T: 'static> {
    pub keywords: &'static [&'static str],
    pub category: T,
}

/// Ordered first-match-wins rule table
#[derive(Debug, Clone, Copy)]
pub struct RuleTable<T: 'static> {
    rules: &'static [CategoryRule<T>],
    fallback: T,
}

impl<T: Copy> RuleTable<T> {
    pub const fn new(rules: &'static [CategoryRule<T>], fallback: T) -> Self {
        Self { rules, fallback }
    }

    /// Category of the first rule with a keyword contained in `text`
    pub fn classify(&self, text: &str) -> T {
        let text = text.to_lowercase();
        self.rules
            .iter()
            .find(|rule| rule.keywords.iter().any(|keyword| text.contains(keyword)))
            .map_or(self.fallback, |rule| rule.category)
    }

    pub fn rules(&self) -> &'static [CategoryRule<T>] {
        self.rules
    }

    pub fn fallback(&self) -> T {
        self.fallback
    }
}

/// Broad merchandise class of a product
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MerchandiseClass {
    Tops,
    Dresses,
    Outerwear,
    Footwear,
    Bottoms,
    Other,
}

pub static MERCHANDISE_RULES: RuleTable<MerchandiseClass> = RuleTable::new(
    &[
        CategoryRule { keywords: &["t-shirt", "top", "vest"], category: MerchandiseClass::Tops },
        CategoryRule { keywords: &["dress", "skirt"], category: MerchandiseClass::Dresses },
        CategoryRule { keywords: &["jacket", "coat"], category: MerchandiseClass::Outerwear },
        CategoryRule { keywords: &["shoe", "sneaker", "boot"], category: MerchandiseClass::Footwear },
        CategoryRule { keywords: &["jean", "trouser", "pant"], category: MerchandiseClass::Bottoms },
    ],
    MerchandiseClass::Other,
);

impl MerchandiseClass {
    pub fn classify(product_type: &str) -> Self {
        MERCHANDISE_RULES.classify(product_type)
    }

    /// Typical monthly unit volume
    pub fn base_volume_range(self) -> RangeInclusive<u64> {
        match self {
            MerchandiseClass::Tops => 800..=1500,
            MerchandiseClass::Dresses => 400..=900,
            MerchandiseClass::Outerwear => 200..=600,
            MerchandiseClass::Footwear => 300..=800,
            MerchandiseClass::Bottoms => 500..=1000,
            MerchandiseClass::Other => 300..=800,
        }
    }

    /// Typical average unit price
    pub fn price_range(self) -> Range<f64> {
        match self {
            MerchandiseClass::Tops => 15.0..35.0,
            MerchandiseClass::Dresses => 30.0..70.0,
            MerchandiseClass::Outerwear => 60.0..150.0,
            MerchandiseClass::Footwear => 40.0..100.0,
            MerchandiseClass::Bottoms => 35.0..80.0,
            MerchandiseClass::Other => 20.0..60.0,
        }
    }
}

/// Seasonal demand shape of a product
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SeasonProfile {
    Winter,
    Summer,
    Dress,
    Footwear,
    Steady,
}

pub static SEASON_RULES: RuleTable<SeasonProfile> = RuleTable::new(
    &[
        CategoryRule { keywords: &["jacket", "coat", "sweater"], category: SeasonProfile::Winter },
        CategoryRule { keywords: &["short", "swim", "bikini", "tank"], category: SeasonProfile::Summer },
        CategoryRule { keywords: &["dress"], category: SeasonProfile::Dress },
        CategoryRule { keywords: &["shoe", "sneaker", "boot"], category: SeasonProfile::Footwear },
    ],
    SeasonProfile::Steady,
);

// Jan..Dec
const WINTER: [f64; 12] = [1.3, 1.2, 1.0, 0.7, 0.6, 0.5, 0.5, 0.6, 0.8, 1.1, 1.3, 1.4];
const SUMMER: [f64; 12] = [0.6, 0.6, 0.8, 1.0, 1.2, 1.4, 1.5, 1.4, 1.1, 0.9, 0.7, 0.6];
const DRESS: [f64; 12] = [0.7, 0.7, 0.9, 1.1, 1.3, 1.4, 1.3, 1.2, 1.0, 0.9, 0.8, 0.9];
const FOOTWEAR: [f64; 12] = [0.9, 0.9, 1.0, 1.1, 1.1, 1.0, 0.9, 0.9, 1.0, 1.1, 1.2, 1.1];
const STEADY: [f64; 12] = [0.9, 0.9, 1.0, 1.0, 1.1, 1.1, 1.0, 1.0, 1.0, 1.1, 1.1, 1.0];

impl SeasonProfile {
    pub fn classify(product_type: &str) -> Self {
        SEASON_RULES.classify(product_type)
    }

    /// Multipliers for January through December
    pub fn multipliers(self) -> &'static [f64; 12] {
        match self {
            SeasonProfile::Winter => &WINTER,
            SeasonProfile::Summer => &SUMMER,
            SeasonProfile::Dress => &DRESS,
            SeasonProfile::Footwear => &FOOTWEAR,
            SeasonProfile::Steady => &STEADY,
        }
    }

    /// Multiplier for calendar month `month` (1 = January)
    pub fn multiplier(self, month: u32) -> f64 {
        let idx = (month.max(1) as usize - 1) % 12;
        self.multipliers()[idx]
    }
}
