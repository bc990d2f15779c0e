pub const EPSILON: f64 = 1.0e-5;

pub trait ApproxEq<Rhs = Self> {
    fn approx_eq(self, rhs: Rhs) -> bool;
}

impl ApproxEq for f64 {
    fn approx_eq(self, rhs: Self) -> bool {
        (self - rhs).abs() < EPSILON
    }
}

impl ApproxEq for [f64; 3] {
    fn approx_eq(self, rhs: Self) -> bool {
        self.iter().zip(rhs).all(|(a, b)| a.approx_eq(b))
    }
}

impl ApproxEq for [f64; 2] {
    fn approx_eq(self, rhs: Self) -> bool {
        self[0].approx_eq(rhs[0]) && self[1].approx_eq(rhs[1])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn within_epsilon() {
        assert!(1.0.approx_eq(1.0 + EPSILON / 2.));
        assert!(!1.0.approx_eq(1.0 + EPSILON * 2.));
        assert!([1.0, 2.0, 3.0].approx_eq([1.0, 2.0, 3.000001]));
    }
}
