//! Breadth-first route planning over the directed jump-gate graph.

use std::collections::{HashMap, HashSet, VecDeque};

use crate::star_system::{StarSystem, SystemId};

/// Find a system by id. Ids are generation indices, so try the direct slot
/// before scanning.
pub(crate) fn lookup(systems: &[StarSystem], id: SystemId) -> Option<&StarSystem> {
    match systems.get(id.index()) {
        Some(sys) if sys.id == id => Some(sys),
        _ => systems.iter().find(|s| s.id == id),
    }
}

/// Shortest route from `start` to `end` by gate count, both inclusive.
///
/// Returns an empty route when `start == end` or when `end` is unreachable.
/// Between equally short routes, the one found first in gate-list order wins.
pub fn find_route(systems: &[StarSystem], start: SystemId, end: SystemId) -> Vec<SystemId> {
    if start == end {
        return Vec::new();
    }

    let mut came_from: HashMap<SystemId, SystemId> = HashMap::new();
    let mut visited = HashSet::new();
    let mut queue = VecDeque::new();
    visited.insert(start);
    queue.push_back(start);

    while let Some(current) = queue.pop_front() {
        if current == end {
            return reconstruct(&came_from, start, end);
        }
        let Some(sys) = lookup(systems, current) else {
            continue;
        };
        for next in sys.neighbors() {
            if visited.insert(next) {
                came_from.insert(next, current);
                queue.push_back(next);
            }
        }
    }

    Vec::new()
}

fn reconstruct(came_from: &HashMap<SystemId, SystemId>, start: SystemId, end: SystemId) -> Vec<SystemId> {
    let mut path = vec![end];
    let mut node = end;
    while node != start {
        match came_from.get(&node) {
            Some(&prev) => {
                path.push(prev);
                node = prev;
            }
            None => return Vec::new(),
        }
    }
    path.reverse();
    path
}

/// Every system reachable from `start` through gates, `start` included.
pub fn reachable_from(systems: &[StarSystem], start: SystemId) -> HashSet<SystemId> {
    let mut visited = HashSet::new();
    if lookup(systems, start).is_none() {
        return visited;
    }
    let mut queue = VecDeque::from([start]);
    visited.insert(start);
    while let Some(current) = queue.pop_front() {
        if let Some(sys) = lookup(systems, current) {
            for next in sys.neighbors() {
                if visited.insert(next) {
                    queue.push_back(next);
                }
            }
        }
    }
    visited
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::star_system::{JumpGate, Rgb};
    use glam::Vec3;

    /// Bare systems wired by a directed edge list.
    fn graph(count: u32, edges: &[(u32, u32)]) -> Vec<StarSystem> {
        let mut systems: Vec<StarSystem> = (0..count)
            .map(|i| StarSystem {
                id: SystemId(i),
                name: format!("S{i}"),
                description: String::new(),
                ambient_tint: Rgb::new(0, 0, 0),
                sun_color: Rgb::new(255, 255, 255),
                coordinates: Vec3::ZERO,
                planets: Vec::new(),
                stations: Vec::new(),
                gates: Vec::new(),
            })
            .collect();
        for &(a, b) in edges {
            systems[a as usize].gates.push(JumpGate {
                target: SystemId(b),
                name: format!("Gate to S{b}"),
                position: Vec3::ZERO,
            });
        }
        systems
    }

    fn ids(raw: &[u32]) -> Vec<SystemId> {
        raw.iter().map(|&i| SystemId(i)).collect()
    }

    #[test]
    fn same_system_is_empty_route() {
        let systems = graph(3, &[(0, 1), (1, 2)]);
        assert!(find_route(&systems, SystemId(1), SystemId(1)).is_empty());
    }

    #[test]
    fn multi_hop_route_is_inclusive() {
        let systems = graph(4, &[(0, 1), (1, 2), (2, 3)]);
        assert_eq!(find_route(&systems, SystemId(0), SystemId(3)), ids(&[0, 1, 2, 3]));
    }

    #[test]
    fn shortcut_beats_long_way() {
        let systems = graph(5, &[(0, 1), (1, 2), (2, 3), (3, 4), (0, 3)]);
        assert_eq!(find_route(&systems, SystemId(0), SystemId(4)), ids(&[0, 3, 4]));
    }

    #[test]
    fn ties_follow_gate_order() {
        // Two equal routes 0-1-3 and 0-2-3; gate to 1 is listed first.
        let systems = graph(4, &[(0, 1), (0, 2), (1, 3), (2, 3)]);
        assert_eq!(find_route(&systems, SystemId(0), SystemId(3)), ids(&[0, 1, 3]));
        let swapped = graph(4, &[(0, 2), (0, 1), (1, 3), (2, 3)]);
        assert_eq!(find_route(&swapped, SystemId(0), SystemId(3)), ids(&[0, 2, 3]));
    }

    #[test]
    fn directed_edges_are_respected() {
        let systems = graph(3, &[(0, 1), (1, 2)]);
        assert!(find_route(&systems, SystemId(2), SystemId(0)).is_empty());
    }

    #[test]
    fn disconnected_returns_empty() {
        let systems = graph(4, &[(0, 1), (1, 0), (2, 3)]);
        assert!(find_route(&systems, SystemId(0), SystemId(3)).is_empty());
        assert!(find_route(&systems, SystemId(0), SystemId(99)).is_empty());
    }

    #[test]
    fn cycles_terminate() {
        let systems = graph(3, &[(0, 1), (1, 0), (1, 2), (2, 1), (2, 0)]);
        assert_eq!(find_route(&systems, SystemId(0), SystemId(2)), ids(&[0, 1, 2]));
        assert_eq!(reachable_from(&systems, SystemId(2)).len(), 3);
    }

    #[test]
    fn reachable_from_unknown_is_empty() {
        let systems = graph(2, &[(0, 1)]);
        assert!(reachable_from(&systems, SystemId(5)).is_empty());
        assert_eq!(reachable_from(&systems, SystemId(1)).len(), 1);
    }
}
