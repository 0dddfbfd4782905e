//! Day-night cycle: the world clock, period presets, and celestial motion.
//!
//! All queries are pure functions over a `time_of_day` scalar in `[0, 1)`
//! (0 = midnight, 0.5 = noon) so they can be evaluated for any instant
//! without touching the store.

use std::f32::consts::PI;

use bevy::prelude::*;

use crate::gameplay::store::GameStore;
use crate::{GameSet, simulation_running};

// === Constants ===

/// Length of one in-game day in real seconds.
pub const DAY_LENGTH_SECONDS: f32 = 300.0;

/// Time of day for a fresh game: 06:00, just after dawn breaks.
pub const INITIAL_TIME_OF_DAY: f32 = 0.25;

/// Orbit radius of the sun disc.
const SUN_ORBIT_RADIUS: f32 = 50.0;

/// The moon rides a flatter arc than the sun.
const MOON_ARC_HEIGHT: f32 = 30.0;

/// Fixed depth of both celestial bodies.
const CELESTIAL_Z: f32 = -30.0;

// === Periods ===

/// Named buckets of the 24-hour clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimePeriod {
    Dawn,
    Morning,
    Noon,
    Afternoon,
    Dusk,
    Night,
}

impl TimePeriod {
    /// The period that follows this one on the clock.
    #[must_use]
    pub const fn next(self) -> Self {
        match self {
            Self::Dawn => Self::Morning,
            Self::Morning => Self::Noon,
            Self::Noon => Self::Afternoon,
            Self::Afternoon => Self::Dusk,
            Self::Dusk => Self::Night,
            Self::Night => Self::Dawn,
        }
    }

    /// Start and end hour of this period. `start > end` means the period
    /// wraps across midnight.
    const fn bounds(self) -> (f32, f32) {
        match self {
            Self::Dawn => (5.0, 7.0),
            Self::Morning => (7.0, 12.0),
            Self::Noon => (12.0, 14.0),
            Self::Afternoon => (14.0, 17.0),
            Self::Dusk => (17.0, 19.0),
            Self::Night => (19.0, 5.0),
        }
    }
}

// === Effects ===

/// Lighting parameters and gameplay modifiers for an instant of the day.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeEffects {
    pub sun_intensity: f32,
    pub ambient_intensity: f32,
    pub sun_color: Color,
    pub ambient_color: Color,
    pub sky_color: Color,
    pub fog_color: Color,
    pub fog_density: f32,

    /// Shops accept customers.
    pub shop_open: bool,
    /// Villagers are out and can be talked to.
    pub npcs_active: bool,
    /// Enemies hit harder.
    pub stronger_enemies: bool,
    /// Ghost-class enemies join the spawn pool.
    pub ghost_enemies_spawn: bool,
    /// Rare encounters are possible.
    pub special_events_active: bool,
}

/// Fixed preset each period blends from.
#[must_use]
pub const fn period_preset(period: TimePeriod) -> TimeEffects {
    match period {
        TimePeriod::Dawn => TimeEffects {
            sun_intensity: 0.4,
            ambient_intensity: 0.3,
            sun_color: Color::srgb(1.0, 0.6, 0.333),
            ambient_color: Color::srgb(0.267, 0.2, 0.333),
            sky_color: Color::srgb(1.0, 0.467, 0.333),
            fog_color: Color::srgb(1.0, 0.667, 0.533),
            fog_density: 0.015,
            shop_open: false,
            npcs_active: false,
            stronger_enemies: false,
            ghost_enemies_spawn: false,
            special_events_active: false,
        },
        TimePeriod::Morning => TimeEffects {
            sun_intensity: 0.8,
            ambient_intensity: 0.5,
            sun_color: Color::srgb(1.0, 1.0, 0.8),
            ambient_color: Color::srgb(0.667, 0.8, 1.0),
            sky_color: Color::srgb(0.529, 0.808, 0.922),
            fog_color: Color::srgb(0.8, 0.867, 1.0),
            fog_density: 0.005,
            shop_open: true,
            npcs_active: true,
            stronger_enemies: false,
            ghost_enemies_spawn: false,
            special_events_active: false,
        },
        TimePeriod::Noon => TimeEffects {
            sun_intensity: 1.0,
            ambient_intensity: 0.6,
            sun_color: Color::srgb(1.0, 1.0, 1.0),
            ambient_color: Color::srgb(0.667, 0.867, 1.0),
            sky_color: Color::srgb(0.333, 0.667, 1.0),
            fog_color: Color::srgb(0.867, 0.933, 1.0),
            fog_density: 0.003,
            shop_open: true,
            npcs_active: true,
            stronger_enemies: false,
            ghost_enemies_spawn: false,
            special_events_active: false,
        },
        TimePeriod::Afternoon => TimeEffects {
            sun_intensity: 0.9,
            ambient_intensity: 0.55,
            sun_color: Color::srgb(1.0, 0.933, 0.8),
            ambient_color: Color::srgb(0.733, 0.867, 1.0),
            sky_color: Color::srgb(0.4, 0.733, 1.0),
            fog_color: Color::srgb(0.867, 0.933, 1.0),
            fog_density: 0.004,
            shop_open: true,
            npcs_active: true,
            stronger_enemies: false,
            ghost_enemies_spawn: false,
            special_events_active: false,
        },
        TimePeriod::Dusk => TimeEffects {
            sun_intensity: 0.5,
            ambient_intensity: 0.35,
            sun_color: Color::srgb(1.0, 0.467, 0.2),
            ambient_color: Color::srgb(0.333, 0.267, 0.4),
            sky_color: Color::srgb(1.0, 0.4, 0.267),
            fog_color: Color::srgb(1.0, 0.533, 0.4),
            fog_density: 0.01,
            shop_open: true,
            npcs_active: true,
            stronger_enemies: true,
            ghost_enemies_spawn: false,
            special_events_active: false,
        },
        TimePeriod::Night => TimeEffects {
            sun_intensity: 0.1,
            ambient_intensity: 0.15,
            sun_color: Color::srgb(0.267, 0.4, 0.667),
            ambient_color: Color::srgb(0.067, 0.133, 0.267),
            sky_color: Color::srgb(0.039, 0.078, 0.157),
            fog_color: Color::srgb(0.067, 0.067, 0.133),
            fog_density: 0.02,
            shop_open: false,
            npcs_active: false,
            stronger_enemies: true,
            ghost_enemies_spawn: true,
            special_events_active: true,
        },
    }
}

// === Clock Queries ===

/// Converts a `[0, 1)` time of day to hours on the 24-hour clock.
#[must_use]
pub fn hours(time_of_day: f32) -> f32 {
    (time_of_day * 24.0).rem_euclid(24.0)
}

/// The named period a time of day falls in.
#[must_use]
pub fn period(time_of_day: f32) -> TimePeriod {
    let h = hours(time_of_day);
    if (5.0..7.0).contains(&h) {
        TimePeriod::Dawn
    } else if (7.0..12.0).contains(&h) {
        TimePeriod::Morning
    } else if (12.0..14.0).contains(&h) {
        TimePeriod::Noon
    } else if (14.0..17.0).contains(&h) {
        TimePeriod::Afternoon
    } else if (17.0..19.0).contains(&h) {
        TimePeriod::Dusk
    } else {
        TimePeriod::Night
    }
}

/// Daytime runs 06:00 to 20:00, wider than the daylight periods so dusk
/// still counts as day for gameplay purposes.
#[must_use]
pub fn is_daytime(time_of_day: f32) -> bool {
    (6.0..20.0).contains(&hours(time_of_day))
}

#[must_use]
pub fn is_nighttime(time_of_day: f32) -> bool {
    !is_daytime(time_of_day)
}

/// Lighting and gameplay modifiers for an instant, blending continuous
/// values toward the next period's preset over the back half of the
/// current period. Booleans switch discretely at period boundaries.
#[must_use]
pub fn effects(time_of_day: f32) -> TimeEffects {
    let h = hours(time_of_day);
    let current = period(time_of_day);
    let from = period_preset(current);
    let to = period_preset(current.next());

    let (start, end) = current.bounds();
    let progress = if start > end {
        // Night wraps across midnight.
        let span = 24.0 - start + end;
        if h >= start {
            (h - start) / span
        } else {
            (24.0 - start + h) / span
        }
    } else {
        (h - start) / (end - start)
    };

    let blend = if progress > 0.5 {
        let t = (progress - 0.5) / 0.5;
        t * t * (3.0 - 2.0 * t)
    } else {
        0.0
    };

    TimeEffects {
        sun_intensity: from.sun_intensity.lerp(to.sun_intensity, blend),
        ambient_intensity: from.ambient_intensity.lerp(to.ambient_intensity, blend),
        sun_color: mix_colors(from.sun_color, to.sun_color, blend),
        ambient_color: mix_colors(from.ambient_color, to.ambient_color, blend),
        sky_color: mix_colors(from.sky_color, to.sky_color, blend),
        fog_color: mix_colors(from.fog_color, to.fog_color, blend),
        fog_density: from.fog_density.lerp(to.fog_density, blend),
        ..from
    }
}

/// Position of the dominant celestial body. The sun arcs over the sky
/// from 06:00 to 18:00; outside that window the moon takes a mirrored,
/// flatter arc.
#[must_use]
pub fn sun_position(time_of_day: f32) -> Vec3 {
    let h = hours(time_of_day);
    if (6.0..18.0).contains(&h) {
        let angle = (h - 6.0) / 12.0 * PI;
        Vec3::new(
            angle.cos() * SUN_ORBIT_RADIUS,
            angle.sin() * SUN_ORBIT_RADIUS,
            CELESTIAL_Z,
        )
    } else {
        let wrapped = if h < 6.0 { h + 24.0 } else { h };
        let angle = (wrapped - 18.0) / 12.0 * PI;
        Vec3::new(
            -angle.cos() * SUN_ORBIT_RADIUS,
            angle.sin() * MOON_ARC_HEIGHT,
            CELESTIAL_Z,
        )
    }
}

/// Renders a time of day as `HH:MM` for display.
#[must_use]
pub fn format_time(time_of_day: f32) -> String {
    let h = hours(time_of_day);
    let whole = h.floor();
    let minutes = ((h - whole) * 60.0).floor();
    format!("{:02}:{:02}", whole as u32, minutes as u32)
}

// === Systems ===

/// Advances the world clock by this frame's share of the day.
/// Runs in `GameSet::Time`.
fn advance_world_clock(time: Res<Time>, mut store: ResMut<GameStore>) {
    store.advance_time(time.delta_secs() / DAY_LENGTH_SECONDS);
}

// === Plugin ===

pub(super) fn plugin(app: &mut App) {
    app.add_systems(
        Update,
        advance_world_clock
            .in_set(GameSet::Time)
            .run_if(simulation_running),
    );
}

fn mix_colors(from: Color, to: Color, t: f32) -> Color {
    let a = from.to_srgba();
    let b = to.to_srgba();
    Color::srgb(
        a.red.lerp(b.red, t),
        a.green.lerp(b.green, t),
        a.blue.lerp(b.blue, t),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn at_hour(h: f32) -> f32 {
        h / 24.0
    }

    #[test]
    fn period_boundaries_are_exact() {
        assert_eq!(period(at_hour(5.0)), TimePeriod::Dawn);
        assert_eq!(period(at_hour(7.0)), TimePeriod::Morning);
        assert_eq!(period(at_hour(12.0)), TimePeriod::Noon);
        assert_eq!(period(at_hour(14.0)), TimePeriod::Afternoon);
        assert_eq!(period(at_hour(17.0)), TimePeriod::Dusk);
        assert_eq!(period(at_hour(19.0)), TimePeriod::Night);
        assert_eq!(period(at_hour(0.0)), TimePeriod::Night);
        assert_eq!(period(at_hour(4.9)), TimePeriod::Night);
    }

    #[test]
    fn periods_cycle_through_the_day() {
        let mut p = TimePeriod::Night;
        for _ in 0..6 {
            p = p.next();
        }
        assert_eq!(p, TimePeriod::Night);
    }

    #[test]
    fn daytime_window_is_six_to_twenty() {
        assert!(!is_daytime(at_hour(5.9)));
        assert!(is_daytime(at_hour(6.0)));
        assert!(is_daytime(at_hour(19.9)));
        assert!(!is_daytime(at_hour(20.0)));
        assert!(is_nighttime(at_hour(23.0)));
        assert!(is_nighttime(at_hour(2.0)));
    }

    #[test]
    fn hours_covers_the_full_clock() {
        assert!((hours(0.0) - 0.0).abs() < 1e-6);
        assert!((hours(0.5) - 12.0).abs() < 1e-5);
        assert!((hours(0.75) - 18.0).abs() < 1e-5);
    }

    #[test]
    fn effects_match_preset_in_front_half_of_period() {
        // 12:30 is in the front half of noon; no blending yet.
        let fx = effects(at_hour(12.5));
        assert_eq!(fx, period_preset(TimePeriod::Noon));
    }

    #[test]
    fn effects_blend_toward_next_period_in_back_half() {
        // 13:30 is 75% through noon; renormalized progress 0.5 eases to 0.5.
        let fx = effects(at_hour(13.5));
        let noon = period_preset(TimePeriod::Noon);
        let afternoon = period_preset(TimePeriod::Afternoon);
        let expected = noon
            .sun_intensity
            .lerp(afternoon.sun_intensity, 0.5);
        assert!((fx.sun_intensity - expected).abs() < 1e-4);
        assert!(fx.sun_intensity < noon.sun_intensity);
        assert!(fx.sun_intensity > afternoon.sun_intensity);
    }

    #[test]
    fn gameplay_booleans_switch_discretely() {
        // Deep in dusk's blend window ghosts still do not spawn.
        let late_dusk = effects(at_hour(18.9));
        assert!(late_dusk.stronger_enemies);
        assert!(!late_dusk.ghost_enemies_spawn);

        let night = effects(at_hour(19.0));
        assert!(night.ghost_enemies_spawn);
        assert!(night.special_events_active);
    }

    #[test]
    fn night_blend_handles_midnight_wrap() {
        // 23:00 is 40% through the 19:00-05:00 night; still pure night.
        assert_eq!(effects(at_hour(23.0)), period_preset(TimePeriod::Night));

        // 02:00 is 70% through; blending toward dawn has begun.
        let fx = effects(at_hour(2.0));
        let night = period_preset(TimePeriod::Night);
        let dawn = period_preset(TimePeriod::Dawn);
        assert!(fx.sun_intensity > night.sun_intensity);
        assert!(fx.sun_intensity < dawn.sun_intensity);
        // Booleans stay on night's settings until dawn actually arrives.
        assert!(fx.ghost_enemies_spawn);
    }

    #[test]
    fn sun_peaks_at_noon() {
        let pos = sun_position(at_hour(12.0));
        assert!(pos.x.abs() < 1e-3);
        assert!((pos.y - 50.0).abs() < 1e-3);
    }

    #[test]
    fn moon_rides_a_lower_arc() {
        let pos = sun_position(at_hour(0.0));
        assert!(pos.x.abs() < 1e-3);
        assert!((pos.y - 30.0).abs() < 1e-3);
    }

    #[test]
    fn format_time_is_zero_padded() {
        assert_eq!(format_time(0.0), "00:00");
        assert_eq!(format_time(0.25), "06:00");
        assert_eq!(format_time(0.5), "12:00");
        assert_eq!(format_time(20.5 / 24.0), "20:30");
    }
}
