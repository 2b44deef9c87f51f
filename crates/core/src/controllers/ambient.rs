use comadrelab_protocol::{Accent, DomCommand, Target, TileSpec};
use rand::Rng;

use crate::config::AmbientConfig;

/// Four-point bloom drawn inside each tile, in a 100×100 viewBox.
pub const BLOOM_PATH: &str =
    "M50 0 C60 25, 75 40, 100 50 C75 60, 60 75, 50 100 C40 75, 25 60, 0 50 C25 40, 40 25, 50 0 Z";

/// Keyframes every tile loops through: fade in, drift while rotating and
/// growing, fade out.
pub fn keyframes_css(animation_name: &str) -> String {
    format!(
        "@keyframes {animation_name} {{\
         0%, 100% {{ opacity: 0; transform: translate(0, 0) rotate(0deg) scale(0.8); }}\
         20% {{ opacity: 0.1; }}\
         50% {{ opacity: 0.06; transform: translate(20px, -30px) rotate(45deg) scale(1); }}\
         80% {{ opacity: 0.1; }}\
         }}"
    )
}

/// Number of tiles for a viewport width. Decided once per page load.
pub fn tile_count(viewport_width: f64, config: &AmbientConfig) -> usize {
    if viewport_width < config.mobile_breakpoint_px {
        config.mobile_count
    } else {
        config.desktop_count
    }
}

/// Draw one tile with every attribute independently randomized.
pub fn random_tile<R: Rng + ?Sized>(rng: &mut R, config: &AmbientConfig) -> TileSpec {
    let size = &config.size_px;
    let duration = &config.duration_s;
    TileSpec {
        left_pct: rng.random::<f64>() * 100.0,
        top_pct: rng.random::<f64>() * 100.0,
        size_px: size.min + rng.random::<f64>() * (size.max - size.min),
        duration_s: duration.min + rng.random::<f64>() * (duration.max - duration.min),
        delay_s: -(rng.random::<f64>() * config.max_delay_s),
        accent: if rng.random_bool(0.5) {
            Accent::Cobalt
        } else {
            Accent::Gold
        },
    }
}

/// Setup commands for the decorative background.
///
/// Empty when the user prefers reduced motion or the page has no
/// background container. Otherwise one keyframes block followed by the
/// tiles.
pub fn plan<R: Rng + ?Sized>(
    reduced_motion: bool,
    has_container: bool,
    viewport_width: f64,
    rng: &mut R,
    config: &AmbientConfig,
) -> Vec<DomCommand> {
    if reduced_motion || !has_container {
        return Vec::new();
    }

    let count = tile_count(viewport_width, config);
    let mut commands = Vec::with_capacity(count + 1);
    commands.push(DomCommand::InjectStyle {
        css: keyframes_css(&config.animation_name),
    });
    for _ in 0..count {
        commands.push(DomCommand::AppendTile {
            container: Target::HeroBackground,
            class: config.tile_class.clone(),
            animation: config.animation_name.clone(),
            tile: random_tile(rng, config),
        });
    }
    commands
}
