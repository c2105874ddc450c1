//! Sustainability Advice
//!
//! Fixed catalog of sustainability tips; one is sampled uniformly per
//! prediction. Non-deterministic by contract.

use rand::seq::SliceRandom;
use rand::Rng;

/// Advice catalog, sampled uniformly per prediction
pub const SUSTAINABILITY_TIPS: [&str; 8] = [
    "Use drip irrigation to save up to 60% water compared to flood irrigation.",
    "Implement crop rotation with legumes to naturally fix nitrogen.",
    "Apply organic compost to improve soil structure and water retention.",
    "Use precision agriculture techniques with IoT sensors for optimal resource usage.",
    "Consider companion planting to naturally control pests and improve soil nutrients.",
    "Implement rainwater harvesting systems to reduce groundwater dependency.",
    "Use cover crops during off-seasons to prevent soil erosion.",
    "Apply fertilizers during optimal weather conditions to maximize uptake.",
];

/// Pick one tip with a caller-supplied RNG.
pub fn pick_tip<R: Rng + ?Sized>(rng: &mut R) -> &'static str {
    // The catalog is a non-empty const, so choose cannot return None.
    SUSTAINABILITY_TIPS
        .choose(rng)
        .copied()
        .unwrap_or(SUSTAINABILITY_TIPS[0])
}

/// Pick one tip with thread-local randomness.
pub fn random_tip() -> &'static str {
    pick_tip(&mut rand::thread_rng())
}
