use super::Vector3;

/// One of the three principal coordinate axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    /// All axes in index order.
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    /// Coordinate index of the axis (x = 0, y = 1, z = 2).
    #[must_use]
    pub fn index(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
        }
    }

    /// The axis along which `v` has its largest absolute component.
    ///
    /// Ties go to the lower axis index.
    #[must_use]
    pub fn dominant(v: &Vector3) -> Axis {
        let mut best = Axis::X;
        for axis in [Axis::Y, Axis::Z] {
            if v[axis.index()].abs() > v[best.index()].abs() {
                best = axis;
            }
        }
        best
    }

    /// The most frequent axis in `axes`, ties going to the lower axis index.
    ///
    /// Returns `None` when `axes` is empty.
    pub fn mode<I: IntoIterator<Item = Axis>>(axes: I) -> Option<Axis> {
        let mut counts = [0usize; 3];
        let mut any = false;
        for axis in axes {
            counts[axis.index()] += 1;
            any = true;
        }
        if !any {
            return None;
        }

        let mut best = Axis::X;
        for axis in [Axis::Y, Axis::Z] {
            if counts[axis.index()] > counts[best.index()] {
                best = axis;
            }
        }
        Some(best)
    }
}
