//! Geometry Rasterizer (C2).
//!
//! Burns analytic triangles and circles into the ε/μ planes and produces
//! per-material boundary masks for overlay rendering. Grounded on the
//! teacher's material-region painting (`fdtd.rs::set_material_region`,
//! `paint_circle`) and on the original C header's implicit geometry model,
//! generalized to the exact triangle/circle contract in the spec.

/// A material's geometry and relative electromagnetic coefficients.
///
/// Boundary masks are computed once at load time (see [`compute_boundary_mask`])
/// and aggregated read-only thereafter, per the data-model lifecycle.
#[derive(Debug, Clone)]
pub enum Material {
    Triangle {
        v1: (f32, f32),
        v2: (f32, f32),
        v3: (f32, f32),
        rel_epsilon: f32,
        rel_mu: f32,
    },
    Circle {
        cx: f32,
        cy: f32,
        radius: f32,
        rel_epsilon: f32,
        rel_mu: f32,
    },
}

impl Material {
    pub fn triangle(
        v1: (f32, f32),
        v2: (f32, f32),
        v3: (f32, f32),
        rel_epsilon: f32,
        rel_mu: f32,
    ) -> Self {
        Material::Triangle {
            v1,
            v2,
            v3,
            rel_epsilon,
            rel_mu,
        }
    }

    pub fn circle(cx: f32, cy: f32, radius: f32, rel_epsilon: f32, rel_mu: f32) -> Self {
        Material::Circle {
            cx,
            cy,
            radius,
            rel_epsilon,
            rel_mu,
        }
    }

    fn coefficients(&self) -> (f32, f32) {
        match *self {
            Material::Triangle {
                rel_epsilon, rel_mu, ..
            } => (rel_epsilon, rel_mu),
            Material::Circle {
                rel_epsilon, rel_mu, ..
            } => (rel_epsilon, rel_mu),
        }
    }
}

/// Burns `material`'s relative coefficients into `epsilon`/`mu`. Called once
/// per material in declaration order, so overlapping materials compose
/// multiplicatively rather than overwrite.
pub fn apply_material(
    material: &Material,
    width: usize,
    height: usize,
    epsilon: &mut [f32],
    mu: &mut [f32],
) {
    let (rel_eps, rel_mu) = material.coefficients();

    for y in 0..height {
        for x in 0..width {
            if is_inside(material, x as f32, y as f32) {
                let idx = y * width + x;
                epsilon[idx] *= rel_eps;
                mu[idx] *= rel_mu;
            }
        }
    }
}

/// Strict interior test; cells exactly on an edge/circumference are boundary,
/// not interior.
fn is_inside(material: &Material, x: f32, y: f32) -> bool {
    match *material {
        Material::Triangle { v1, v2, v3, .. } => triangle_contains(v1, v2, v3, x, y),
        Material::Circle { cx, cy, radius, .. } => {
            let dx = x - cx;
            let dy = y - cy;
            dx * dx + dy * dy < radius * radius
        }
    }
}

/// Edge-sign triangle interior test: inside iff the three signed edge
/// products are not mixed (all >= 0 or all <= 0).
fn triangle_contains(v1: (f32, f32), v2: (f32, f32), v3: (f32, f32), x: f32, y: f32) -> bool {
    let d1 = edge_sign(x, y, v1, v2);
    let d2 = edge_sign(x, y, v2, v3);
    let d3 = edge_sign(x, y, v3, v1);

    let has_neg = d1 < 0.0 || d2 < 0.0 || d3 < 0.0;
    let has_pos = d1 > 0.0 || d2 > 0.0 || d3 > 0.0;

    !(has_neg && has_pos)
}

fn edge_sign(px: f32, py: f32, a: (f32, f32), b: (f32, f32)) -> f32 {
    (px - b.0) * (a.1 - b.1) - (a.0 - b.0) * (py - b.1)
}

/// Computes a W·H 0/1 mask of cells lying on the material's geometric
/// outline (one-pixel line thickness).
pub fn compute_boundary_mask(material: &Material, width: usize, height: usize) -> Vec<f32> {
    let mut mask = vec![0.0; width * height];

    match *material {
        Material::Triangle { v1, v2, v3, .. } => {
            let edges = [(v1, v2), (v2, v3), (v3, v1)];
            let lines: Vec<EdgeLine> = edges.iter().map(|&(a, b)| EdgeLine::new(a, b)).collect();

            for y in 0..height {
                for x in 0..width {
                    let (fx, fy) = (x as f32, y as f32);
                    if lines.iter().any(|line| line.contains(fx, fy)) {
                        mask[y * width + x] = 1.0;
                    }
                }
            }
        }
        Material::Circle { cx, cy, radius, .. } => {
            for y in 0..height {
                for x in 0..width {
                    let dx = x as f32 - cx;
                    let dy = y as f32 - cy;
                    let r = (dx * dx + dy * dy).sqrt();
                    if (r - radius).abs() < 1.0 {
                        mask[y * width + x] = 1.0;
                    }
                }
            }
        }
    }

    mask
}

/// Precomputed line coefficients (A, B, C) for one triangle edge, plus its
/// axis-aligned bounding extent, used by the boundary test.
struct EdgeLine {
    a: f32,
    b: f32,
    c: f32,
    norm: f32,
    x_min: f32,
    x_max: f32,
    y_min: f32,
    y_max: f32,
}

impl EdgeLine {
    fn new(p0: (f32, f32), p1: (f32, f32)) -> Self {
        // Line through p0, p1: A*x + B*y + C = 0
        let a = p1.1 - p0.1;
        let b = p0.0 - p1.0;
        let c = -(a * p0.0 + b * p0.1);
        let norm = (a * a + b * b).sqrt();

        EdgeLine {
            a,
            b,
            c,
            norm,
            x_min: p0.0.min(p1.0),
            x_max: p0.0.max(p1.0),
            y_min: p0.1.min(p1.1),
            y_max: p0.1.max(p1.1),
        }
    }

    fn contains(&self, x: f32, y: f32) -> bool {
        if x < self.x_min - 1.0 || x > self.x_max + 1.0 || y < self.y_min - 1.0 || y > self.y_max + 1.0 {
            return false;
        }
        if self.norm < 1e-12 {
            return false;
        }
        let distance = (self.a * x + self.b * y + self.c).abs() / self.norm;
        distance < 1.0
    }
}
