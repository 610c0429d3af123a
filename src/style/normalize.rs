use crate::model::config::DesignConfig;
use crate::model::style::{FontWeight, StyleRole};

/// Bring a config back in line with its coupling rules.
///
/// Every slot using the heavy display family gets the regular weight, and an image
/// background always carries an overlay. Idempotent: `normalize(normalize(c)) == normalize(c)`.
pub fn normalize(config: &DesignConfig) -> DesignConfig {
    let mut out = config.clone();
    for role in StyleRole::ALL {
        let pinned = out.style(role).font_family.is_heavy_display()
            && out.style(role).font_weight != FontWeight::REGULAR;
        if pinned {
            out.style_mut(role).font_weight = FontWeight::REGULAR;
        }
    }
    out.set_background_type(out.bg_type);
    out
}

#[cfg(test)]
#[path = "../../tests/unit/style/normalize.rs"]
mod tests;
