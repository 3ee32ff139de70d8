use crate::generator::{Fallbacks, TextGenerator, complete};

const FALLBACKS: Fallbacks = Fallbacks {
    not_configured: "AI Configuration Missing (API Key)",
    failed: "Failed to generate description.",
    empty: "No description generated.",
};

pub(crate) fn description_prompt(product_name: &str) -> String {
    format!(
        "Write a short, professional, and catchy product description (max 20 words) for a product named \"{product_name}\"."
    )
}

/// Short marketing description for a product name. Never fails.
pub fn describe_product(generator: Option<&dyn TextGenerator>, product_name: &str) -> String {
    complete(generator, &description_prompt(product_name), &FALLBACKS)
}
