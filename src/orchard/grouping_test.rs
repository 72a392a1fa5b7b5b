#[cfg(test)]
mod tests {
    use quickcheck::{TestResult, quickcheck};
    use std::collections::HashSet;

    use crate::orchard::config::GroupingStrategy;
    use crate::orchard::detect::{Candidate, Direction};
    use crate::orchard::geo::haversine_distance;
    use crate::orchard::grouping::{TreeGroup, group_candidates};
    use crate::orchard::testutil::offset;

    const PRECISION: f64 = 2.5;

    fn candidates(positions: &[(f64, f64)]) -> Vec<Candidate> {
        positions
            .iter()
            .enumerate()
            .map(|(id, &(north, east))| Candidate {
                id,
                source: id,
                direction: Direction::Axis1Forward,
                coord: offset(north, east),
            })
            .collect()
    }

    fn ids(groups: &[TreeGroup]) -> Vec<Vec<usize>> {
        groups
            .iter()
            .map(|g| g.members().iter().map(|c| c.id).collect())
            .collect()
    }

    #[test]
    fn test_greedy_only_takes_seed_neighbours() {
        let chain = candidates(&[(0.0, 0.0), (2.0, 0.0), (4.0, 0.0)]);

        let greedy = group_candidates(chain.clone(), 1, PRECISION, GroupingStrategy::Greedy);
        assert_eq!(ids(&greedy), vec![vec![0, 1], vec![2]]);

        let components = group_candidates(chain, 1, PRECISION, GroupingStrategy::Components);
        assert_eq!(ids(&components), vec![vec![0, 1, 2]]);
    }

    #[test]
    fn test_greedy_seed_order() {
        let chain = candidates(&[(2.0, 0.0), (0.0, 0.0), (4.0, 0.0)]);
        let groups = group_candidates(chain, 1, PRECISION, GroupingStrategy::Greedy);
        assert_eq!(ids(&groups), vec![vec![0, 1, 2]]);
    }

    #[test]
    fn test_min_group_size() {
        let positions = [
            (0.0, 0.0),
            (20.0, 0.0),
            (0.5, 0.0),
            (40.0, 0.0),
            (20.5, 0.0),
            (0.0, 0.5),
        ];

        let confident = group_candidates(
            candidates(&positions),
            3,
            PRECISION,
            GroupingStrategy::Greedy,
        );
        assert_eq!(ids(&confident), vec![vec![0, 2, 5]]);
        assert_eq!(confident[0].len(), 3);

        let potential = group_candidates(
            candidates(&positions),
            2,
            PRECISION,
            GroupingStrategy::Greedy,
        );
        assert_eq!(ids(&potential), vec![vec![0, 2, 5], vec![1, 4]]);
    }

    #[test]
    fn test_identical_coordinates_stay_distinct() {
        let same = candidates(&[(1.0, 1.0), (1.0, 1.0), (1.0, 1.0)]);
        for strategy in [GroupingStrategy::Greedy, GroupingStrategy::Components] {
            let groups = group_candidates(same.clone(), 3, PRECISION, strategy);
            assert_eq!(ids(&groups), vec![vec![0, 1, 2]]);
        }
    }

    #[test]
    fn test_centroid() {
        let pair = candidates(&[(0.0, 0.0), (2.0, 0.0)]);
        let groups = group_candidates(pair, 2, PRECISION, GroupingStrategy::Greedy);
        assert_eq!(groups.len(), 1);
        assert!(!groups[0].is_empty());
        assert!(haversine_distance(&groups[0].centroid(), &offset(1.0, 0.0)) < 1e-6);
    }

    #[test]
    fn test_empty_input() {
        let groups = group_candidates(Vec::new(), 1, PRECISION, GroupingStrategy::Greedy);
        assert!(groups.is_empty());
    }

    #[test]
    fn prop_groups_are_disjoint() {
        fn prop(raw: Vec<(u8, u8)>, min_group_size: u8, components: bool) -> TestResult {
            let min_group_size = (min_group_size % 4) as usize + 1;
            let positions: Vec<(f64, f64)> = raw
                .iter()
                .map(|&(n, e)| (n as f64 * 0.1, e as f64 * 0.1))
                .collect();
            let strategy = if components {
                GroupingStrategy::Components
            } else {
                GroupingStrategy::Greedy
            };

            let groups =
                group_candidates(candidates(&positions), min_group_size, PRECISION, strategy);

            let mut seen = HashSet::new();
            for group in &groups {
                if group.len() < min_group_size {
                    return TestResult::failed();
                }
                for c in group.members() {
                    if !seen.insert(c.id) {
                        return TestResult::failed();
                    }
                }
                if !components {
                    let seed = &group.members()[0];
                    let near_seed = group
                        .members()
                        .iter()
                        .all(|c| haversine_distance(&seed.coord, &c.coord) <= PRECISION);
                    if !near_seed {
                        return TestResult::failed();
                    }
                }
            }
            TestResult::passed()
        }
        quickcheck(prop as fn(Vec<(u8, u8)>, u8, bool) -> TestResult);
    }
}
