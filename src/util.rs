pub const EPS: f64 = 1e-8;
