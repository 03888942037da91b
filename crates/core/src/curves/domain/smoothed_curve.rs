/// A resampled closed curve in pixel coordinates of the source frame.
#[derive(Clone, Debug, PartialEq)]
pub struct SmoothedCurve {
    x: Vec<f64>,
    y: Vec<f64>,
}

impl SmoothedCurve {
    pub fn new(x: Vec<f64>, y: Vec<f64>) -> Self {
        debug_assert_eq!(x.len(), y.len(), "x and y must have equal length");
        Self { x, y }
    }

    pub fn x(&self) -> &[f64] {
        &self.x
    }

    pub fn y(&self) -> &[f64] {
        &self.y
    }

    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    pub fn points(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.x.iter().copied().zip(self.y.iter().copied())
    }
}
