/// Ordered boundary of one closed contour, in pixel coordinates.
///
/// The closing edge from the last point back to the first is implicit.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Polygon {
    points: Vec<(i32, i32)>,
}

impl Polygon {
    pub fn new(points: Vec<(i32, i32)>) -> Self {
        Self { points }
    }

    pub fn points(&self) -> &[(i32, i32)] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accessors() {
        let poly = Polygon::new(vec![(0, 0), (3, 0), (3, 2)]);
        assert_eq!(poly.len(), 3);
        assert!(!poly.is_empty());
        assert_eq!(poly.points()[1], (3, 0));
    }

    #[test]
    fn test_empty_polygon() {
        let poly = Polygon::new(vec![]);
        assert!(poly.is_empty());
        assert_eq!(poly.len(), 0);
    }
}
