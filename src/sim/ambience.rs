//! Cosmetic background state: particles, scenery and clouds
//!
//! Nothing here affects gameplay, but the world owns it so presentation
//! reads one consistent snapshot after each tick.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Hard cap on live particles; the oldest are evicted first
pub const MAX_PARTICLES: usize = 256;
/// Default ambient particle floor
pub const DEFAULT_PARTICLE_FLOOR: usize = 15;
pub const CLOUD_COUNT: usize = 5;

/// Converts particle velocity * dt_ms into pixels
const PARTICLE_SCALE: f32 = 0.05;
/// Converts scenery speed * dt_ms into pixels
const SCENERY_SCALE: f32 = 0.1;
/// Scenery spawn chance per millisecond of play
const SCENERY_CHANCE_PER_MS: f64 = 0.005 * 0.1;

/// A visual particle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub size: f32,
    /// 0xRRGGBB
    pub color: u32,
    pub life_ms: f32,
    /// Background dust counted toward the floor (bursts are not)
    pub ambient: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SceneryKind {
    Mountain,
    Tree,
    Bush,
    Cloud,
}

/// Parallax background element, scrolling left
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenery {
    pub kind: SceneryKind,
    pub pos: Vec2,
    pub width: f32,
    pub height: f32,
    pub speed: f32,
}

/// Sky cloud drifting right and wrapping around
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cloud {
    pub pos: Vec2,
    pub width: f32,
    pub speed: f32,
}

/// Playfield extents the ambience needs
#[derive(Debug, Clone, Copy)]
pub struct Bounds {
    pub width: f32,
    pub height: f32,
    pub ground_y: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ambience {
    pub particles: Vec<Particle>,
    pub scenery: Vec<Scenery>,
    pub clouds: Vec<Cloud>,
    /// Minimum ambient particles maintained every update
    pub particle_floor: usize,
    pub scenery_enabled: bool,
}

impl Default for Ambience {
    fn default() -> Self {
        Self {
            particles: Vec::new(),
            scenery: Vec::new(),
            clouds: Vec::new(),
            particle_floor: DEFAULT_PARTICLE_FLOOR,
            scenery_enabled: true,
        }
    }
}

impl Ambience {
    /// Drop run-specific visuals; clouds persist across runs
    pub fn reset(&mut self) {
        self.particles.clear();
        self.scenery.clear();
    }

    pub fn ambient_count(&self) -> usize {
        self.particles.iter().filter(|p| p.ambient).count()
    }

    /// Advance everything by `dt` ms, then top particles back up to the floor
    pub fn update<R: Rng + ?Sized>(&mut self, rng: &mut R, dt: f32, bounds: Bounds) {
        for p in self.particles.iter_mut() {
            p.pos += p.vel * dt * PARTICLE_SCALE;
            p.life_ms -= dt;
        }
        self.particles.retain(|p| {
            p.life_ms > 0.0
                && p.pos.x >= -p.size
                && p.pos.x <= bounds.width + p.size
                && p.pos.y >= -p.size
                && p.pos.y <= bounds.height + p.size
        });

        let missing = self.particle_floor.saturating_sub(self.ambient_count());
        for _ in 0..missing {
            let particle = ambient_particle(rng, bounds);
            self.push_particle(particle);
        }

        if self.scenery_enabled {
            self.update_scenery(rng, dt, bounds);
        }
        self.update_clouds(rng, dt, bounds);
    }

    /// Emit a short-lived burst around `origin`
    pub fn burst<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
        origin: Vec2,
        count: usize,
        color: u32,
        life_ms: f32,
    ) {
        for _ in 0..count {
            let particle = Particle {
                pos: origin,
                vel: Vec2::new(
                    rng.random_range(-1.5f32..1.5),
                    rng.random_range(-1.5f32..1.5),
                ) * 20.0,
                size: rng.random_range(1.0f32..5.0),
                color,
                life_ms,
                ambient: false,
            };
            self.push_particle(particle);
        }
    }

    fn push_particle(&mut self, particle: Particle) {
        if self.particles.len() >= MAX_PARTICLES {
            self.particles.remove(0);
        }
        self.particles.push(particle);
    }

    fn update_scenery<R: Rng + ?Sized>(&mut self, rng: &mut R, dt: f32, bounds: Bounds) {
        let chance = (SCENERY_CHANCE_PER_MS * dt as f64).clamp(0.0, 1.0);
        if rng.random_bool(chance) {
            self.scenery.push(scenery(rng, bounds));
        }
        for element in self.scenery.iter_mut() {
            element.pos.x -= element.speed * dt * SCENERY_SCALE;
        }
        self.scenery.retain(|e| e.pos.x >= -e.width);
    }

    fn update_clouds<R: Rng + ?Sized>(&mut self, rng: &mut R, dt: f32, bounds: Bounds) {
        if self.clouds.is_empty() {
            for _ in 0..CLOUD_COUNT {
                let mut cloud = cloud(rng, bounds);
                cloud.pos.x = rng.random::<f32>() * bounds.width;
                self.clouds.push(cloud);
            }
        }
        for c in self.clouds.iter_mut() {
            c.pos.x += c.speed * dt * PARTICLE_SCALE;
            if c.pos.x > bounds.width + c.width {
                *c = cloud(rng, bounds);
            }
        }
    }
}

fn ambient_particle<R: Rng + ?Sized>(rng: &mut R, bounds: Bounds) -> Particle {
    Particle {
        pos: Vec2::new(
            rng.random::<f32>() * bounds.width,
            rng.random::<f32>() * bounds.height * 0.7,
        ),
        vel: Vec2::new(rng.random_range(-0.5f32..0.5), rng.random_range(-0.25f32..0.25)),
        size: rng.random_range(2.0f32..7.0),
        // Warm pastel hues
        color: [0xFFE082, 0xFFF59D, 0xFFCC80, 0xE6EE9C][rng.random_range(0..4usize)],
        life_ms: rng.random_range(2_000.0f32..6_000.0),
        ambient: true,
    }
}

fn scenery<R: Rng + ?Sized>(rng: &mut R, bounds: Bounds) -> Scenery {
    let kind = [
        SceneryKind::Mountain,
        SceneryKind::Tree,
        SceneryKind::Bush,
        SceneryKind::Cloud,
    ][rng.random_range(0..4usize)];

    let (height, width) = match kind {
        SceneryKind::Mountain => {
            let h = rng.random_range(100.0f32..250.0);
            (h, h * 1.5)
        }
        SceneryKind::Tree => {
            let h = rng.random_range(50.0f32..150.0);
            (h, h * 0.4)
        }
        SceneryKind::Bush => {
            let h = rng.random_range(20.0f32..50.0);
            (h, h * 2.0)
        }
        SceneryKind::Cloud => {
            let h = rng.random_range(20.0f32..60.0);
            (h, h * 2.0)
        }
    };

    let (y, speed) = if kind == SceneryKind::Cloud {
        (
            rng.random::<f32>() * bounds.height * 0.4,
            rng.random_range(0.2f32..0.7),
        )
    } else {
        (bounds.ground_y - height, rng.random_range(0.5f32..0.8))
    };

    Scenery {
        kind,
        pos: Vec2::new(bounds.width + width, y),
        width,
        height,
        speed,
    }
}

/// Fresh cloud entering from the left edge
fn cloud<R: Rng + ?Sized>(rng: &mut R, bounds: Bounds) -> Cloud {
    let width = rng.random_range(50.0f32..150.0);
    Cloud {
        pos: Vec2::new(-width, rng.random::<f32>() * bounds.height * 0.5),
        width,
        speed: rng.random_range(0.1f32..0.6),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    const BOUNDS: Bounds = Bounds {
        width: 800.0,
        height: 400.0,
        ground_y: 390.0,
    };

    #[test]
    fn test_floor_is_maintained() {
        let mut rng = Pcg32::seed_from_u64(5);
        let mut ambience = Ambience::default();
        for _ in 0..500 {
            ambience.update(&mut rng, 16.0, BOUNDS);
            assert!(ambience.ambient_count() >= DEFAULT_PARTICLE_FLOOR);
        }
    }

    #[test]
    fn test_bursts_expire() {
        let mut rng = Pcg32::seed_from_u64(5);
        let mut ambience = Ambience {
            particle_floor: 0,
            ..Ambience::default()
        };
        ambience.burst(&mut rng, Vec2::new(400.0, 200.0), 10, 0xFFC107, 100.0);
        assert_eq!(ambience.particles.len(), 10);
        ambience.update(&mut rng, 101.0, BOUNDS);
        assert!(ambience.particles.is_empty());
    }

    #[test]
    fn test_particle_cap_evicts_oldest() {
        let mut rng = Pcg32::seed_from_u64(5);
        let mut ambience = Ambience::default();
        ambience.burst(&mut rng, Vec2::ZERO, 1, 0x000001, 1000.0);
        ambience.burst(&mut rng, Vec2::ZERO, MAX_PARTICLES, 0x000002, 1000.0);
        assert_eq!(ambience.particles.len(), MAX_PARTICLES);
        assert!(ambience.particles.iter().all(|p| p.color == 0x000002));
    }

    #[test]
    fn test_scenery_scrolls_off() {
        let mut rng = Pcg32::seed_from_u64(5);
        let mut ambience = Ambience::default();
        ambience.scenery.push(Scenery {
            kind: SceneryKind::Bush,
            pos: Vec2::new(-50.0, 350.0),
            width: 60.0,
            height: 30.0,
            speed: 0.5,
        });
        // 0.5 * 500 * 0.1 = 25px, pushes it past -width
        ambience.scenery_enabled = true;
        ambience.update(&mut rng, 500.0, BOUNDS);
        assert!(ambience.scenery.iter().all(|s| s.pos.x >= -s.width));
        assert!(!ambience.scenery.iter().any(|s| s.kind == SceneryKind::Bush && s.pos.x < 0.0));
    }

    #[test]
    fn test_clouds_seeded_once() {
        let mut rng = Pcg32::seed_from_u64(5);
        let mut ambience = Ambience::default();
        ambience.update(&mut rng, 16.0, BOUNDS);
        assert_eq!(ambience.clouds.len(), CLOUD_COUNT);
        ambience.update(&mut rng, 16.0, BOUNDS);
        assert_eq!(ambience.clouds.len(), CLOUD_COUNT);
    }
}
