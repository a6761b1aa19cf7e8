//! Daily tip selection.
//!
//! Tips are grouped into static age buckets; one is picked at random from the
//! bucket matching the baby's age (or from the pregnancy bucket while the user
//! is expecting).

use rand::seq::SliceRandom;
use rand::Rng;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TipAudience {
    Expecting,
    Newborn,
    EarlyInfant,
    MiddleInfant,
    LateInfant,
    Toddler,
}

impl TipAudience {
    /// Bucket for a baby's age; negative ages count as newborn
    pub fn for_age(age_months: i32) -> Self {
        match age_months.max(0) {
            0..=3 => TipAudience::Newborn,
            4..=6 => TipAudience::EarlyInfant,
            7..=9 => TipAudience::MiddleInfant,
            10..=12 => TipAudience::LateInfant,
            _ => TipAudience::Toddler,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TipAudience::Expecting => "expecting",
            TipAudience::Newborn => "0-3 months",
            TipAudience::EarlyInfant => "4-6 months",
            TipAudience::MiddleInfant => "7-9 months",
            TipAudience::LateInfant => "10-12 months",
            TipAudience::Toddler => "13+ months",
        }
    }

    pub fn tips(&self) -> &'static [&'static str] {
        match self {
            TipAudience::Expecting => EXPECTING_TIPS,
            TipAudience::Newborn => NEWBORN_TIPS,
            TipAudience::EarlyInfant => EARLY_INFANT_TIPS,
            TipAudience::MiddleInfant => MIDDLE_INFANT_TIPS,
            TipAudience::LateInfant => LATE_INFANT_TIPS,
            TipAudience::Toddler => TODDLER_TIPS,
        }
    }
}

const EXPECTING_TIPS: &[&str] = &[
    "Pack your hospital bag a few weeks early so it is one less thing to think about.",
    "Rest when you can. Short naps in the third trimester add up.",
    "Ask a friend to set up a meal rota for the first weeks after birth.",
    "Write down questions for your midwife as they come to you.",
];

const NEWBORN_TIPS: &[&str] = &[
    "Newborns can only stay awake 45-60 minutes. Watch for yawns and staring spells.",
    "Cluster feeding in the evening is normal and usually passes.",
    "Accept every offer of help, even if it is just someone holding the baby while you shower.",
    "Skin-to-skin contact helps regulate your baby's temperature and breathing.",
    "Sleep when the baby sleeps, at least once a day.",
];

const EARLY_INFANT_TIPS: &[&str] = &[
    "A short, predictable wind-down before naps helps your baby learn to settle.",
    "The 4-month sleep regression is a developmental leap, not a step backwards.",
    "Tummy time a few minutes at a time builds up neck strength.",
    "Try putting your baby down drowsy but awake for one nap a day.",
];

const MIDDLE_INFANT_TIPS: &[&str] = &[
    "Many babies drop to two naps around now. Follow their wake windows, not the clock.",
    "Separation anxiety peaks around 8 months; a consistent goodbye routine helps.",
    "Offer a variety of textures as solids become more established.",
    "Crawling practice during the day can mean practicing at night too. Be patient.",
];

const LATE_INFANT_TIPS: &[&str] = &[
    "Keep the two-nap schedule until your baby consistently fights the second nap.",
    "Naming feelings out loud helps your baby start to understand them.",
    "A comfort object can ease bedtime once your baby is over 12 months.",
    "Take a moment for yourself today. You have come a long way this year.",
];

const TODDLER_TIPS: &[&str] = &[
    "Most toddlers move to one nap between 13 and 18 months.",
    "Offer two choices instead of open questions to head off power struggles.",
    "A consistent bedtime routine matters more than the exact bedtime.",
    "Toddlers need 11-14 hours of sleep across the day and night.",
];

/// Pick a random tip for the audience
pub fn pick_tip<R: Rng + ?Sized>(audience: TipAudience, rng: &mut R) -> &'static str {
    audience
        .tips()
        .choose(rng)
        .copied()
        .unwrap_or("Be kind to yourself today.")
}

/// Pick a tip for the user's situation; expecting takes precedence over age
pub fn daily_tip<R: Rng + ?Sized>(
    baby_age_months: Option<i32>,
    is_expecting: bool,
    rng: &mut R,
) -> (TipAudience, &'static str) {
    let audience = match (is_expecting, baby_age_months) {
        (true, _) => TipAudience::Expecting,
        (false, Some(age)) => TipAudience::for_age(age),
        (false, None) => TipAudience::Newborn,
    };
    (audience, pick_tip(audience, rng))
}
