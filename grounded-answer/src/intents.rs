//! Deterministic intent routing with fixed response templates.
//!
//! Every response here is either a fixed policy message or a structural
//! extraction from the evidence text. Nothing on this path invents facts,
//! so templated answers skip quote verification entirely.

use crate::extract;

/// Recognized question intents, in priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    Price,
    Menu,
    CashOnDelivery,
    Delivery,
    OpeningHours,
    Cancellation,
    SpecialDiet,
    Availability,
}

/// Keyword table checked in declared order; first match wins.
///
/// Cash-on-delivery is listed before delivery because "pay on delivery"
/// also contains the generic delivery keywords.
const INTENT_KEYWORDS: &[(Intent, &[&str])] = &[
    (Intent::Price, &["how much", "price", "cost", "₦", "naira"]),
    (
        Intent::Menu,
        &[
            "menu",
            "what food",
            "what do you sell",
            "what do you have",
            "what meals",
        ],
    ),
    (
        Intent::CashOnDelivery,
        &["pay on delivery", "cash on delivery", "cod"],
    ),
    (
        Intent::Delivery,
        &["deliver", "delivery", "dispatch", "send to"],
    ),
    (
        Intent::OpeningHours,
        &[
            "open now",
            "are you open",
            "opening",
            "closing",
            "close",
            "working hours",
            "hours",
        ],
    ),
    (Intent::Cancellation, &["cancel", "cancellation", "refund"]),
    (
        Intent::SpecialDiet,
        &[
            "special diet",
            "allergy",
            "gluten",
            "diabetic",
            "keto",
            "vegetarian",
            "vegan",
        ],
    ),
    (
        Intent::Availability,
        &[
            "available",
            "availability",
            "in stock",
            "do you have",
            "is chicken available",
        ],
    ),
];

/// Cities we never deliver to. Matched against the lowercased question.
const OUT_OF_REGION_CITIES: &[&str] = &[
    "lagos",
    "ibadan",
    "kano",
    "kaduna",
    "port harcourt",
    "enugu",
    "jos",
];

/// Classify a question by substring keyword match, first intent wins.
pub fn classify(question: &str) -> Option<Intent> {
    let q = question.to_lowercase();
    INTENT_KEYWORDS
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|k| q.contains(k)))
        .map(|(intent, _)| *intent)
}

/// Produce the templated response for a question and its evidence.
///
/// Only menu and opening-hours read the evidence; every other template is
/// a fixed policy message.
pub fn respond(question: &str, evidence: &str) -> String {
    match classify(question) {
        // Prices are never answered from evidence, even when present.
        Some(Intent::Price) => "Prices change regularly, so I can’t confirm a price here.\n\
             Please tell me the item and quantity you want, and I’ll confirm the current price for you."
            .to_string(),
        Some(Intent::Menu) => {
            let items = extract::extract_menu(evidence);
            if items.is_empty() {
                // Deferral, not a refusal: the answer stays non-empty.
                "Please allow me confirm our menu for you.".to_string()
            } else {
                format!("Here’s our menu:\n- {}", items.join("\n- "))
            }
        }
        Some(Intent::CashOnDelivery) => "We don’t accept cash on delivery.\n\
             You can pay via Bank Transfer or POS payment, and we’ll confirm before delivery."
            .to_string(),
        Some(Intent::Delivery) => {
            let q = question.to_lowercase();
            if OUT_OF_REGION_CITIES.iter().any(|city| q.contains(city)) {
                "Sorry, we currently deliver within Abuja only.".to_string()
            } else {
                "Yes, we offer delivery within Abuja.\n\
                 Please share your location (area/landmark) + the item(s) and quantity, and your preferred time."
                    .to_string()
            }
        }
        Some(Intent::OpeningHours) => match extract::extract_opening_hours(evidence) {
            Some(hours) => extract::format_opening_hours(&hours),
            None => "Our opening hours are listed in our restaurant info, but I can’t pull them right now. \
                 Please hold on while I confirm."
                .to_string(),
        },
        Some(Intent::Cancellation) => "You can cancel or change an order only before preparation starts.\n\
             Please share your order details so we can confirm the current status."
            .to_string(),
        Some(Intent::SpecialDiet) => "Special dietary or allergy requests need manual confirmation.\n\
             Please share the exact request, and we’ll confirm what we can accommodate."
            .to_string(),
        Some(Intent::Availability) => "Availability depends on stock and time.\n\
             Please tell me the exact item and quantity, and I’ll confirm availability for you."
            .to_string(),
        None => "Please tell me what you’d like to order (item + quantity).\n\
             If you need delivery, also share your location in Abuja and your preferred time."
            .to_string(),
    }
}
