use std::{
    cmp::Ordering,
    collections::BinaryHeap,
    fmt::{Debug, Display},
    ops::{Deref, DerefMut},
};

use log::{debug, trace};

/// Supertrait that collects all the requirements on the NodeReference values
/// Must be copy, comparable and not references (hence 'static)
pub trait NodeReference: Copy + Eq + 'static {}

pub trait MapTrait {
    /// The type that can be used to reference nodes in the map
    type Reference: NodeReference;

    /// The type that the map uses for storage
    type Storage<T: Default + Copy + Clone + 'static>: MapStorage<T, Reference = Self::Reference>;

    /// Check if the provided node reference lies inside the map
    fn is_valid(&self, node: Self::Reference) -> bool;

    /// Check if the provided node can be entered
    fn is_passable(&self, node: Self::Reference) -> bool;

    /// Return an iterator over the passable neighbors of the provided node.
    /// Every move has unit cost.
    fn neighbors_of(&self, node: Self::Reference) -> impl Iterator<Item = Self::Reference>;

    /// Estimated number of moves between two nodes. Must never overestimate.
    fn estimate(&self, from: Self::Reference, to: Self::Reference) -> usize;

    /// Create a storage for values of type T
    fn create_storage<T: Default + Copy + Clone + 'static>(&self) -> Self::Storage<T>;
}

pub trait MapStorage<T> {
    type Reference: NodeReference;

    fn is_valid(&self, node: Self::Reference) -> bool;
    fn get(&self, node: Self::Reference) -> T;
    fn get_mut(&mut self, node: Self::Reference) -> &mut T;
}

/// The objects that we store in the priority queue
#[derive(Debug)]
struct ToVisit<R> {
    priority: usize,
    sequence: usize,
    cost: usize,
    point: R,
}

impl<R> Ord for ToVisit<R> {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        // reverse for BinaryHeap to be a min-heap, earliest insertion wins ties
        self.priority
            .cmp(&other.priority)
            .then_with(|| self.sequence.cmp(&other.sequence))
            .reverse()
    }
}

impl<R> PartialOrd for ToVisit<R> {
    fn partial_cmp(&self, other: &ToVisit<R>) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<R> PartialEq for ToVisit<R> {
    fn eq(&self, other: &ToVisit<R>) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl<R> Eq for ToVisit<R> {}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct VisitedItem<R> {
    /// Moves from the start, final once `finalized` is set
    pub cost: usize,
    pub from: Option<R>,
    pub finalized: bool,
    /// Order in which the node first entered the frontier
    sequence: usize,
}

#[derive(Clone, Copy, Debug)]
pub struct Visited<R>(Option<VisitedItem<R>>);

impl<R> Default for Visited<R> {
    fn default() -> Self {
        Visited(None)
    }
}
impl<R> Deref for Visited<R> {
    type Target = Option<VisitedItem<R>>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}
impl<R> DerefMut for Visited<R> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}
impl<R> Display for Visited<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.0 {
            Some(item) if item.finalized => write!(f, "{:03} ", item.cost),
            Some(_) => write!(f, "... "),
            None => write!(f, "{:3} ", ""),
        }
    }
}

#[derive(Debug, PartialEq, Clone, Eq)]
pub struct PathResult<R> {
    /// Start to goal, both inclusive
    pub path: Vec<R>,
    pub start: R,
    pub goal: R,
    pub total_cost: usize,
    /// Number of nodes finalized before the goal was reached, the goal included
    pub visited: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathFinderState<R> {
    Computing,
    NoPathFound,
    PathFound(PathResult<R>),
}

impl<R> PathFinderState<R> {
    pub fn is_done(&self) -> bool {
        !matches!(self, PathFinderState::Computing)
    }
}

/// Incremental A* search over a [`MapTrait`].
///
/// Each call to [`PathFinder::step`] finalizes at most one node, so a caller
/// can interleave the search with other work or abandon it between steps.
/// [`PathFinder::finish`] runs it to completion.
#[derive(Debug)]
pub struct PathFinder<
    R: NodeReference,
    S: MapStorage<Visited<R>, Reference = R>,
    M: MapTrait<Reference = R, Storage<Visited<R>> = S>,
> {
    start: R,
    goal: R,
    visited: S,
    visit_list: BinaryHeap<ToVisit<R>>,
    next_sequence: usize,
    finalized: usize,
    state: PathFinderState<R>,
    _map: std::marker::PhantomData<M>,
}

impl<
        R: NodeReference + Debug,
        S: MapStorage<Visited<R>, Reference = R>,
        M: MapTrait<Reference = R, Storage<Visited<R>> = S>,
    > PathFinder<R, S, M>
{
    /// Set up a search from `start` to `goal`.
    ///
    /// A start or goal that is outside the map or blocked can never be part of
    /// a path, so such a finder is done from the beginning and never visits anything.
    pub fn new(map: &M, start: R, goal: R) -> Self {
        let mut finder = Self {
            start,
            goal,
            visited: map.create_storage::<Visited<R>>(),
            visit_list: BinaryHeap::new(),
            next_sequence: 0,
            finalized: 0,
            state: PathFinderState::Computing,
            _map: std::marker::PhantomData,
        };

        for (name, node) in [("start", start), ("goal", goal)] {
            if map.is_passable(node) {
                continue;
            }
            if map.is_valid(node) {
                debug!("{} {:?} is blocked", name, node);
            } else {
                debug!("{} {:?} is outside the map", name, node);
            }
            finder.state = PathFinderState::NoPathFound;
        }
        if finder.state.is_done() {
            return finder;
        }

        finder.discover(start, 0, map.estimate(start, goal), None);
        finder
    }

    /// Step until the search is done. `on_visit` is called for every finalized node in order.
    pub fn finish(mut self, map: &M, mut on_visit: impl FnMut(R)) -> (PathFinderState<R>, S) {
        loop {
            match self.step(map, &mut on_visit) {
                PathFinderState::Computing => {}
                s => return (s, self.visited),
            }
        }
    }

    /// Finalize the next node of the frontier.
    pub fn step(&mut self, map: &M, mut on_visit: impl FnMut(R)) -> PathFinderState<R> {
        if self.state.is_done() {
            return self.state.clone();
        }

        // skip entries that were superseded by a cheaper one for the same node
        let (visit, item) = loop {
            let Some(visit) = self.visit_list.pop() else {
                debug!(
                    "frontier exhausted after {} nodes, no path to {:?}",
                    self.finalized, self.goal
                );
                self.state = PathFinderState::NoPathFound;
                return self.state.clone();
            };

            match *self.visited.get(visit.point) {
                Some(item) if !item.finalized && item.cost == visit.cost => break (visit, item),
                _ => continue,
            }
        };

        *self.visited.get_mut(visit.point) = Visited(Some(VisitedItem {
            finalized: true,
            ..item
        }));
        self.finalized += 1;
        trace!("finalized {:?} at cost {}", visit.point, visit.cost);
        on_visit(visit.point);

        if visit.point == self.goal {
            let path = self.backtrack();
            debug!(
                "found goal {:?}: cost={} visited={}",
                self.goal, visit.cost, self.finalized
            );

            self.state = PathFinderState::PathFound(PathResult {
                path,
                start: self.start,
                goal: self.goal,
                total_cost: visit.cost,
                visited: self.finalized,
            });
            return self.state.clone();
        }

        let cost = visit.cost + 1;
        for point in map.neighbors_of(visit.point) {
            if !self.visited.is_valid(point) {
                continue;
            }
            if let Some(known) = *self.visited.get(point) {
                if known.finalized || known.cost <= cost {
                    continue;
                }
            }

            self.discover(point, cost, map.estimate(point, self.goal), Some(visit.point));
        }

        self.state.clone()
    }

    /// Record `point` as on the frontier with the given cost and push it on the queue.
    /// A node that is already on the frontier keeps its place in line among equal priorities.
    fn discover(&mut self, point: R, cost: usize, estimate: usize, from: Option<R>) {
        let sequence = match *self.visited.get(point) {
            Some(known) => known.sequence,
            None => {
                let sequence = self.next_sequence;
                self.next_sequence += 1;
                sequence
            }
        };

        *self.visited.get_mut(point) = Visited(Some(VisitedItem {
            cost,
            from,
            finalized: false,
            sequence,
        }));

        self.visit_list.push(ToVisit {
            priority: cost + estimate,
            sequence,
            cost,
            point,
        });
    }

    /// Follow the predecessor links from the goal back to the start
    fn backtrack(&self) -> Vec<R> {
        let mut path: Vec<R> = vec![self.goal];

        let mut from = self.visited.get(self.goal).and_then(|item| item.from);
        while let Some(point) = from {
            path.push(point);
            from = self.visited.get(point).and_then(|item| item.from);
        }

        path.reverse();
        path
    }

    pub fn state(&self) -> &PathFinderState<R> {
        &self.state
    }

    pub fn get_visited(&self) -> &S {
        &self.visited
    }

    /// Number of nodes finalized so far
    pub fn finalized(&self) -> usize {
        self.finalized
    }

    pub fn start(&self) -> R {
        self.start
    }

    pub fn goal(&self) -> R {
        self.goal
    }
}
