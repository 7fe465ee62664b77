//! Segment graphs and single-stroke traversal.
//!
//! A pattern can be drawn without lifting the pen exactly when the graph
//! whose edges are its segments (and whose vertices are segment endpoints)
//! is connected and has at most two odd-degree vertices. This module
//! builds that graph, checks the condition, and produces a traversal with
//! Hierholzer's algorithm.
//!
//! Endpoints are joined when their coordinates are bit-identical, which the
//! path continuity rule already guarantees for consecutive segments.

use std::collections::HashMap;

use crate::geometry::{Path, Point, Segment};

/// One step of a traversal: which edge, and whether it is walked from its
/// first vertex to its second.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Traversal {
    pub edge: usize,
    pub forward: bool,
}

/// Undirected multigraph over segment endpoints.
#[derive(Debug, Clone, Default)]
pub struct SegmentGraph {
    vertices: Vec<Point>,
    edges: Vec<(usize, usize)>,
    adjacency: Vec<Vec<usize>>,
}

/// Hash key for an endpoint. `+ 0.0` folds `-0.0` into `0.0`.
#[inline]
fn vertex_key(p: Point) -> (u64, u64) {
    ((p.x + 0.0).to_bits(), (p.y + 0.0).to_bits())
}

impl SegmentGraph {
    /// Build the graph of a run of segments (edge `i` is segment `i`).
    pub fn from_segments<'a, I>(segments: I) -> Self
    where
        I: IntoIterator<Item = &'a Segment>,
    {
        let mut graph = SegmentGraph::default();
        let mut ids: HashMap<(u64, u64), usize> = HashMap::new();
        for segment in segments {
            let a = graph.intern(&mut ids, segment.from());
            let b = graph.intern(&mut ids, segment.to());
            graph.add_edge(a, b);
        }
        graph
    }

    /// Build the graph of every segment of every path, in path order.
    pub fn from_paths(paths: &[Path]) -> Self {
        Self::from_segments(paths.iter().flat_map(|p| p.segments()))
    }

    /// Build from explicit vertices and edges (vertex indices must be valid).
    pub fn from_edges(vertices: Vec<Point>, edges: Vec<(usize, usize)>) -> Self {
        let mut graph = SegmentGraph {
            adjacency: vec![Vec::new(); vertices.len()],
            vertices,
            edges: Vec::with_capacity(edges.len()),
        };
        for (a, b) in edges {
            graph.add_edge(a, b);
        }
        graph
    }

    fn intern(&mut self, ids: &mut HashMap<(u64, u64), usize>, p: Point) -> usize {
        *ids.entry(vertex_key(p)).or_insert_with(|| {
            self.vertices.push(p);
            self.adjacency.push(Vec::new());
            self.vertices.len() - 1
        })
    }

    fn add_edge(&mut self, a: usize, b: usize) {
        let e = self.edges.len();
        self.edges.push((a, b));
        if let Some(adj) = self.adjacency.get_mut(a) {
            adj.push(e);
        }
        if let Some(adj) = self.adjacency.get_mut(b) {
            adj.push(e);
        }
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn vertex(&self, v: usize) -> Option<Point> {
        self.vertices.get(v).copied()
    }

    pub fn edge(&self, e: usize) -> Option<(usize, usize)> {
        self.edges.get(e).copied()
    }

    /// Degree of a vertex (a self-loop counts twice).
    pub fn degree(&self, v: usize) -> usize {
        self.adjacency.get(v).map_or(0, Vec::len)
    }

    /// Vertices with odd degree, in index order.
    pub fn odd_vertices(&self) -> Vec<usize> {
        (0..self.vertices.len()).filter(|&v| self.degree(v) % 2 == 1).collect()
    }

    /// True if every vertex that has an edge is reachable from every other.
    pub fn is_connected(&self) -> bool {
        let Some(&(start, _)) = self.edges.first() else {
            return true;
        };
        let mut seen = vec![false; self.vertices.len()];
        let mut stack = vec![start];
        seen[start] = true;
        while let Some(v) = stack.pop() {
            for &e in &self.adjacency[v] {
                let (a, b) = self.edges[e];
                let w = if a == v { b } else { a };
                if !seen[w] {
                    seen[w] = true;
                    stack.push(w);
                }
            }
        }
        (0..self.vertices.len()).all(|v| seen[v] || self.degree(v) == 0)
    }

    /// Connected with at most two odd-degree vertices.
    pub fn is_traversable(&self) -> bool {
        self.odd_vertices().len() <= 2 && self.is_connected()
    }

    /// An order that walks every edge exactly once, or `None` if no single
    /// stroke exists. Starts at the first odd vertex when there is one,
    /// otherwise at the first vertex of edge 0 (and then returns there).
    pub fn euler_trail(&self) -> Option<Vec<Traversal>> {
        let Some(&(first, _)) = self.edges.first() else {
            return Some(Vec::new());
        };
        if !self.is_traversable() {
            return None;
        }
        let start = self.odd_vertices().first().copied().unwrap_or(first);

        let mut used = vec![false; self.edges.len()];
        let mut cursor = vec![0usize; self.vertices.len()];
        let mut stack: Vec<(usize, Option<Traversal>)> = vec![(start, None)];
        let mut trail = Vec::with_capacity(self.edges.len());

        while let Some(&(v, _)) = stack.last() {
            let adj = &self.adjacency[v];
            while cursor[v] < adj.len() && used[adj[cursor[v]]] {
                cursor[v] += 1;
            }
            if let Some(&e) = adj.get(cursor[v]) {
                used[e] = true;
                let (a, b) = self.edges[e];
                let (forward, next) = if a == v { (true, b) } else { (false, a) };
                stack.push((next, Some(Traversal { edge: e, forward })));
            } else if let Some((_, Some(step))) = stack.pop() {
                trail.push(step);
            }
        }

        trail.reverse();
        Some(trail)
    }
}

/// Number of odd-degree vertices in the segment graph of `paths`.
pub fn odd_degree_count(paths: &[Path]) -> usize {
    SegmentGraph::from_paths(paths).odd_vertices().len()
}

/// Whether `paths` can be drawn as one unbroken stroke.
pub fn is_single_stroke(paths: &[Path]) -> bool {
    SegmentGraph::from_paths(paths).is_traversable()
}
