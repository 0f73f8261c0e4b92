//! Floating particle decoration drawn behind the hero panel.
use folio_config::ParticleConfig;
use rand::{Rng, SeedableRng, rngs::StdRng};

/// Field units per terminal cell, horizontally and vertically.
pub const CELL_WIDTH: f64 = 4.0;
pub const CELL_HEIGHT: f64 = 8.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hue {
    Blue,
    Purple,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    pub x: f64,
    pub y: f64,
    pub vx: f64,
    pub vy: f64,
    pub size: f64,
    pub opacity: f64,
    pub hue: Hue,
}

/// Two particles close enough to be joined; `strength` fades to 0 at the
/// link distance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Link {
    pub a: usize,
    pub b: usize,
    pub strength: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParticleSettings {
    pub count: usize,
    pub link_distance: f64,
    pub max_speed: f64,
}

impl Default for ParticleSettings {
    fn default() -> Self {
        Self::from(&ParticleConfig::default())
    }
}

impl From<&ParticleConfig> for ParticleSettings {
    fn from(cfg: &ParticleConfig) -> Self {
        Self {
            count: cfg.count,
            link_distance: cfg.link_distance,
            max_speed: cfg.max_speed,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ParticleField {
    width: f64,
    height: f64,
    settings: ParticleSettings,
    particles: Vec<Particle>,
    rng: StdRng,
}

impl ParticleField {
    pub fn new(settings: ParticleSettings, width: f64, height: f64, mut rng: StdRng) -> Self {
        let width = width.max(0.0);
        let height = height.max(0.0);
        let particles = (0..settings.count)
            .map(|_| spawn(&mut rng, width, height, settings.max_speed))
            .collect();
        Self {
            width,
            height,
            settings,
            particles,
            rng,
        }
    }

    pub fn from_entropy(settings: ParticleSettings, width: f64, height: f64) -> Self {
        Self::new(settings, width, height, StdRng::from_entropy())
    }

    /// Field sized for a canvas of `cols` x `rows` cells.
    pub fn for_cells(settings: ParticleSettings, cols: u16, rows: u16, rng: StdRng) -> Self {
        let (w, h) = cell_bounds(cols, rows);
        Self::new(settings, w, h, rng)
    }

    pub fn bounds(&self) -> (f64, f64) {
        (self.width, self.height)
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// Move every particle one step, reflecting off the field edges.
    pub fn step(&mut self) {
        let (w, h) = (self.width, self.height);
        for p in &mut self.particles {
            p.x += p.vx;
            p.y += p.vy;
            reflect(&mut p.x, &mut p.vx, w);
            reflect(&mut p.y, &mut p.vy, h);
        }
    }

    /// Rescale positions to new bounds. Growing from an empty field
    /// re-scatters the particles.
    pub fn resize(&mut self, width: f64, height: f64) {
        let (width, height) = (width.max(0.0), height.max(0.0));
        if width == self.width && height == self.height {
            return;
        }
        let sx = if self.width > 0.0 { width / self.width } else { 0.0 };
        let sy = if self.height > 0.0 { height / self.height } else { 0.0 };
        for p in &mut self.particles {
            p.x = if sx > 0.0 { p.x * sx } else { self.rng.r#gen::<f64>() * width };
            p.y = if sy > 0.0 { p.y * sy } else { self.rng.r#gen::<f64>() * height };
        }
        self.width = width;
        self.height = height;
    }

    pub fn resize_cells(&mut self, cols: u16, rows: u16) {
        let (w, h) = cell_bounds(cols, rows);
        self.resize(w, h);
    }

    /// Every pair closer than the link distance.
    pub fn links(&self) -> Vec<Link> {
        let max = self.settings.link_distance;
        let mut out = Vec::new();
        if max <= 0.0 {
            return out;
        }
        for (a, pa) in self.particles.iter().enumerate() {
            for (b, pb) in self.particles.iter().enumerate().skip(a + 1) {
                let d = (pa.x - pb.x).hypot(pa.y - pb.y);
                if d < max {
                    out.push(Link {
                        a,
                        b,
                        strength: 1.0 - d / max,
                    });
                }
            }
        }
        out
    }
}

fn cell_bounds(cols: u16, rows: u16) -> (f64, f64) {
    (f64::from(cols) * CELL_WIDTH, f64::from(rows) * CELL_HEIGHT)
}

fn spawn(rng: &mut StdRng, width: f64, height: f64, max_speed: f64) -> Particle {
    let mut velocity = || (rng.r#gen::<f64>() * 2.0 - 1.0) * max_speed;
    let vx = velocity();
    let vy = velocity();
    Particle {
        x: rng.r#gen::<f64>() * width,
        y: rng.r#gen::<f64>() * height,
        vx,
        vy,
        size: rng.r#gen::<f64>() * 2.0 + 1.0,
        opacity: rng.r#gen::<f64>() * 0.5 + 0.2,
        hue: if rng.gen_bool(0.5) { Hue::Blue } else { Hue::Purple },
    }
}

fn reflect(pos: &mut f64, vel: &mut f64, max: f64) {
    if *pos < 0.0 {
        *pos = -*pos;
        *vel = -*vel;
    } else if *pos > max {
        *pos = 2.0 * max - *pos;
        *vel = -*vel;
    }
    *pos = pos.clamp(0.0, max);
}
