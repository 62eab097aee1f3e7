//! Slipstream detection
//!
//! A sector whose top speed is above the drafting threshold was almost
//! certainly run in another car's tow. Such passes are excluded from the
//! synthesized lap. The opening sector of the layout is exempt because it is
//! where top speed is expected.

use plap_core::{Sector, Thresholds};

pub fn is_drafting(sector: &Sector<'_>, thresholds: &Thresholds) -> bool {
    sector.definition_index != 0 && sector.max_speed > thresholds.drafting_speed
}
