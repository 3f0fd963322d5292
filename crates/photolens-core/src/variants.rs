//! Analysis themes and deterministic theme selection.
//!
//! Callers cycle through themes by sending an incrementing `variantIndex`;
//! the same index always yields the same theme.

use serde::Serialize;

/// One analysis theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Variant {
    /// Display name of the theme.
    pub name: &'static str,
    /// Comma-separated ingredients or focus items the theme may draw from.
    pub ingredients: &'static str,
    /// What the theme emphasizes.
    pub focus: &'static str,
}

/// Ordered, immutable theme catalog.
pub static CATALOG: &[Variant] = &[
    Variant {
        name: "Golden Hour Glow",
        ingredients: "warm key light, vitamin C serum, illuminating primer, bronzer, earth-tone knitwear, gold accessories",
        focus: "warm, luminous light and a radiant skin finish",
    },
    Variant {
        name: "Studio Classic",
        ingredients: "softbox lighting, seamless backdrop, matte setting powder, tailored blazer, crisp white shirt, minimal jewelry",
        focus: "clean professional headshot polish and neutral tones",
    },
    Variant {
        name: "Hydration Reset",
        ingredients: "hyaluronic acid, ceramides, glycerin, dewy primer, lip balm, soft diffused window light",
        focus: "fresh, hydrated-looking skin and gentle natural light",
    },
    Variant {
        name: "Urban Editorial",
        ingredients: "hard side light, concrete or brick backdrop, defined brows, leather jacket, structured coat, statement sunglasses",
        focus: "bold contrast, strong lines and street-style attitude",
    },
    Variant {
        name: "Soft Romantic",
        ingredients: "backlight haze, rosewater mist, cream blush, pastel knit, floral backdrop, delicate earrings",
        focus: "airy pastel palette and gentle, approachable expression",
    },
    Variant {
        name: "Outdoor Natural",
        ingredients: "open shade, mineral sunscreen, tinted moisturizer, denim layers, greenery background, canvas tote",
        focus: "relaxed outdoor light and effortless natural styling",
    },
];

/// Number of themes in the catalog.
pub fn catalog_len() -> usize {
    CATALOG.len()
}

/// Map any integer onto a catalog entry.
///
/// Uses Euclidean remainder, so negative indices wrap from the end
/// (`select(-1)` is the last theme) and `select(n) == select(n mod N)`.
pub fn select(index: i64) -> &'static Variant {
    let len = CATALOG.len() as i64;
    &CATALOG[index.rem_euclid(len) as usize]
}
