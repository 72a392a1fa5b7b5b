#[cfg(test)]
mod tests {
    use std::f64::consts::FRAC_PI_2;

    use crate::orchard::axis::{AxisFeature, OrchardFeatures};
    use crate::orchard::detect::{Direction, find_missing_trees};
    use crate::orchard::geo::haversine_distance;
    use crate::orchard::testutil::{ROW_ANGLE, SPACING, grid, grid_cell};

    fn grid_features() -> OrchardFeatures {
        OrchardFeatures {
            axis1: AxisFeature {
                slope: ROW_ANGLE,
                spacing: SPACING,
            },
            axis2: AxisFeature {
                slope: ROW_ANGLE - FRAC_PI_2,
                spacing: SPACING,
            },
        }
    }

    #[test]
    fn test_projection_lands_on_neighbours() {
        let features = grid_features();
        let centre = grid_cell(ROW_ANGLE, SPACING, 1, 1);

        let expected = [
            (Direction::Axis1Forward, grid_cell(ROW_ANGLE, SPACING, 2, 1)),
            (Direction::Axis1Backward, grid_cell(ROW_ANGLE, SPACING, 0, 1)),
            (Direction::Axis2Forward, grid_cell(ROW_ANGLE, SPACING, 1, 2)),
            (Direction::Axis2Backward, grid_cell(ROW_ANGLE, SPACING, 1, 0)),
        ];
        for (direction, cell) in expected {
            let projected = direction.project(&centre, &features);
            assert!(haversine_distance(&projected, &cell) < 1e-3, "{direction:?}");
        }
    }

    #[test]
    fn test_gap_reported_by_every_surrounding_tree() {
        // (1, 1) missing; remaining trees are indexed row by row
        let trees = grid(ROW_ANGLE, SPACING, 3, 3, &[(1, 1)]);
        let gap = grid_cell(ROW_ANGLE, SPACING, 1, 1);

        let candidates = find_missing_trees(&trees, &grid_features(), 2.5).unwrap();
        assert_eq!(candidates.len(), 16);
        for (i, c) in candidates.iter().enumerate() {
            assert_eq!(c.id, i);
        }

        let mut at_gap: Vec<(usize, Direction)> = candidates
            .iter()
            .filter(|c| haversine_distance(&c.coord, &gap) < 0.01)
            .map(|c| (c.source, c.direction))
            .collect();
        at_gap.sort_by_key(|&(source, _)| source);

        assert_eq!(
            at_gap,
            vec![
                (1, Direction::Axis1Forward),
                (3, Direction::Axis2Forward),
                (4, Direction::Axis2Backward),
                (6, Direction::Axis1Backward),
            ]
        );
    }

    #[test]
    fn test_candidates_are_unoccupied() {
        let trees = grid(ROW_ANGLE, SPACING, 5, 5, &[]);
        let candidates = find_missing_trees(&trees, &grid_features(), 2.5).unwrap();

        // Only the outward projections of the border trees
        assert_eq!(candidates.len(), 20);
        for c in &candidates {
            assert!(trees.iter().all(|t| haversine_distance(t, &c.coord) > 2.5));
        }
    }

    #[test]
    fn test_existence_precision_controls_occupancy() {
        let trees = grid(ROW_ANGLE, SPACING, 3, 3, &[]);
        // Every projection from a 3 x 3 grid is within 6 m of some tree
        let candidates = find_missing_trees(&trees, &grid_features(), 6.5).unwrap();
        assert!(candidates.is_empty());
    }
}
