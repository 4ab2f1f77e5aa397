//! Pairing inside a bracket.
//!
//! Eligible pairs (participants that never met) become weighted edges of a
//! general graph, and a maximum-cardinality, maximum-weight matching over
//! that graph gives the bracket's pairings. The matching routine is the
//! classic primal-dual blossom algorithm in its O(n^3) form. Weights are
//! integers, so every dual update stays exact.

use super::error::SwissError;
use super::participant::Participant;

/// Fixed-point scale of pairing weights.
pub const WEIGHT_SCALE: i64 = 1 << 32;

const NIL: usize = usize::MAX;

/// Preference weight for pairing ranks `i` and `j` of a bracket whose upper
/// half ends at `half`. Pairs across the halves always outweigh pairs inside
/// a half; within each kind, a smaller `|i - j - half|` weighs more.
pub fn pairing_weight(i: usize, j: usize, half: usize) -> i64 {
    let distance = (i as i64 - j as i64 - half as i64).abs();
    let closeness = WEIGHT_SCALE / (distance + 1);
    let crosses = (i < half && half <= j) || (j < half && half <= i);
    if crosses {
        WEIGHT_SCALE + closeness
    } else {
        closeness
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BracketPairing {
    /// Arena indices, higher-ranked participant first, ordered by rank.
    pub pairs: Vec<(usize, usize)>,
    /// Every participant but at most one is paired.
    pub is_perfect: bool,
}

/// Pairs a rank-sorted bracket (arena indices, best first) without repeating
/// any previous encounter.
pub fn pair_bracket(
    bracket: &[usize],
    participants: &[Participant],
) -> Result<BracketPairing, SwissError> {
    let half = bracket.len() / 2;
    let mut edges = Vec::new();
    for i in 0..bracket.len() {
        for j in (i + 1)..bracket.len() {
            let (a, b) = (&participants[bracket[i]], &participants[bracket[j]]);
            if !a.has_encountered(b) && !b.has_encountered(a) {
                edges.push((i, j, pairing_weight(i, j, half)));
            }
        }
    }

    let mates = max_weight_matching(bracket.len(), &edges, true)?;
    let pairs: Vec<(usize, usize)> = mates
        .iter()
        .enumerate()
        .filter_map(|(i, mate)| match mate {
            Some(j) if i < *j => Some((bracket[i], bracket[*j])),
            _ => None,
        })
        .collect();

    log::debug!(
        "bracket of {} with {} eligible pairs: {} paired",
        bracket.len(),
        edges.len(),
        pairs.len()
    );
    let is_perfect = pairs.len() == half;
    Ok(BracketPairing { pairs, is_perfect })
}

/// Computes a maximum-weight matching of a general graph with vertices
/// `0..vertex_count` and edges `(i, j, weight)`.
///
/// With `max_cardinality` the matching has the largest possible number of
/// edges, and the largest weight among those. Returns each vertex's mate.
///
/// Fails only if the blossom bookkeeping contradicts itself, which a correct
/// run never does.
pub fn max_weight_matching(
    vertex_count: usize,
    edges: &[(usize, usize, i64)],
    max_cardinality: bool,
) -> Result<Vec<Option<usize>>, SwissError> {
    let edges: Vec<(usize, usize, i64)> = edges
        .iter()
        .copied()
        .filter(|&(i, j, _)| i != j && i < vertex_count && j < vertex_count)
        .collect();
    if edges.is_empty() {
        return Ok(vec![None; vertex_count]);
    }
    Blossom::new(vertex_count, &edges).solve(max_cardinality)
}

// Vertex ids are `0..n`, non-trivial blossom ids `n..2n`. Edge `k` has the
// endpoints `2k` and `2k + 1`; `p ^ 1` is the opposite end of endpoint `p`.
struct Blossom<'a> {
    edges: &'a [(usize, usize, i64)],
    n: usize,
    end_point: Vec<usize>,
    neighbour_ends: Vec<Vec<usize>>,
    mate: Vec<usize>,
    // 0 = free, 1 = S, 2 = T; 5 marks S-blossoms during a scan, -1 expanded
    label: Vec<i8>,
    label_end: Vec<usize>,
    in_blossom: Vec<usize>,
    blossom_parent: Vec<usize>,
    blossom_children: Vec<Vec<usize>>,
    blossom_base: Vec<usize>,
    blossom_endpoints: Vec<Vec<usize>>,
    best_edge: Vec<usize>,
    blossom_best_edges: Vec<Option<Vec<usize>>>,
    unused_blossoms: Vec<usize>,
    dual: Vec<i64>,
    allow_edge: Vec<bool>,
    queue: Vec<usize>,
}

fn cyclic(list: &[usize], j: isize) -> usize {
    list[j.rem_euclid(list.len() as isize) as usize]
}

fn inconsistent(what: &str) -> SwissError {
    log::warn!("blossom matching state is inconsistent: {what}");
    SwissError::PairingIncomplete(format!("matching state is inconsistent: {what}"))
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Delta {
    Stop,
    GrowEdge(usize),
    BlossomEdge(usize),
    Expand(usize),
}

impl<'a> Blossom<'a> {
    fn new(n: usize, edges: &'a [(usize, usize, i64)]) -> Self {
        let max_weight = edges.iter().map(|e| e.2).max().unwrap_or(0).max(0);
        let mut end_point = Vec::with_capacity(2 * edges.len());
        let mut neighbour_ends = vec![Vec::new(); n];
        for (k, &(i, j, _)) in edges.iter().enumerate() {
            end_point.push(i);
            end_point.push(j);
            neighbour_ends[i].push(2 * k + 1);
            neighbour_ends[j].push(2 * k);
        }

        let mut dual = vec![max_weight; n];
        dual.extend(std::iter::repeat_n(0, n));

        Self {
            edges,
            n,
            end_point,
            neighbour_ends,
            mate: vec![NIL; n],
            label: vec![0; 2 * n],
            label_end: vec![NIL; 2 * n],
            in_blossom: (0..n).collect(),
            blossom_parent: vec![NIL; 2 * n],
            blossom_children: vec![Vec::new(); 2 * n],
            blossom_base: (0..n).chain(std::iter::repeat_n(NIL, n)).collect(),
            blossom_endpoints: vec![Vec::new(); 2 * n],
            best_edge: vec![NIL; 2 * n],
            blossom_best_edges: vec![None; 2 * n],
            unused_blossoms: (n..2 * n).collect(),
            dual,
            allow_edge: vec![false; edges.len()],
            queue: Vec::new(),
        }
    }

    fn slack(&self, k: usize) -> i64 {
        let (i, j, weight) = self.edges[k];
        self.dual[i] + self.dual[j] - 2 * weight
    }

    fn leaves(&self, b: usize) -> Vec<usize> {
        let mut out = Vec::new();
        let mut stack = vec![b];
        while let Some(t) = stack.pop() {
            if t < self.n {
                out.push(t);
            } else {
                stack.extend(self.blossom_children[t].iter().rev());
            }
        }
        out
    }

    fn assign_label(&mut self, mut w: usize, mut t: i8, mut p: usize) {
        loop {
            let b = self.in_blossom[w];
            self.label[w] = t;
            self.label[b] = t;
            self.label_end[w] = p;
            self.label_end[b] = p;
            self.best_edge[w] = NIL;
            self.best_edge[b] = NIL;
            if t == 1 {
                let leaves = self.leaves(b);
                self.queue.extend(leaves);
                return;
            }
            // A T-blossom's base is matched; its mate becomes an S-vertex.
            let mate_end = self.mate[self.blossom_base[b]];
            w = self.end_point[mate_end];
            t = 1;
            p = mate_end ^ 1;
        }
    }

    /// Traces back from `v` and `w` to find either a new blossom (returns its
    /// base) or an augmenting path (returns `NIL`).
    fn scan_blossom(&mut self, mut v: usize, mut w: usize) -> usize {
        let mut path = Vec::new();
        let mut base = NIL;
        while v != NIL || w != NIL {
            let mut b = self.in_blossom[v];
            if self.label[b] & 4 != 0 {
                base = self.blossom_base[b];
                break;
            }
            path.push(b);
            self.label[b] = 5;
            if self.label_end[b] == NIL {
                v = NIL;
            } else {
                v = self.end_point[self.label_end[b]];
                b = self.in_blossom[v];
                v = self.end_point[self.label_end[b]];
            }
            if w != NIL {
                std::mem::swap(&mut v, &mut w);
            }
        }
        for b in path {
            self.label[b] = 1;
        }
        base
    }

    /// Position of `child` among the children of blossom `b`.
    fn child_position(&self, b: usize, child: usize) -> Result<usize, SwissError> {
        self.blossom_children[b]
            .iter()
            .position(|&c| c == child)
            .ok_or_else(|| inconsistent("sub-blossom missing from its parent"))
    }

    fn add_blossom(&mut self, base: usize, k: usize) -> Result<(), SwissError> {
        let (mut v, mut w, _) = self.edges[k];
        let bb = self.in_blossom[base];
        let mut bv = self.in_blossom[v];
        let mut bw = self.in_blossom[w];
        // at most n non-trivial blossoms exist at once
        let b = self
            .unused_blossoms
            .pop()
            .ok_or_else(|| inconsistent("no free blossom id"))?;
        self.blossom_base[b] = base;
        self.blossom_parent[b] = NIL;
        self.blossom_parent[bb] = b;

        let mut path = Vec::new();
        let mut endps = Vec::new();
        while bv != bb {
            self.blossom_parent[bv] = b;
            path.push(bv);
            endps.push(self.label_end[bv]);
            v = self.end_point[self.label_end[bv]];
            bv = self.in_blossom[v];
        }
        path.push(bb);
        path.reverse();
        endps.reverse();
        endps.push(2 * k);
        while bw != bb {
            self.blossom_parent[bw] = b;
            path.push(bw);
            endps.push(self.label_end[bw] ^ 1);
            w = self.end_point[self.label_end[bw]];
            bw = self.in_blossom[w];
        }

        self.label[b] = 1;
        self.label_end[b] = self.label_end[bb];
        self.dual[b] = 0;
        self.blossom_children[b] = path.clone();
        self.blossom_endpoints[b] = endps;
        for leaf in self.leaves(b) {
            if self.label[self.in_blossom[leaf]] == 2 {
                // former T-vertices become S-vertices inside the new blossom
                self.queue.push(leaf);
            }
            self.in_blossom[leaf] = b;
        }

        let mut best_edge_to = vec![NIL; 2 * self.n];
        for &child in &path {
            let candidates: Vec<Vec<usize>> = match self.blossom_best_edges[child].take() {
                Some(list) => vec![list],
                None => self
                    .leaves(child)
                    .into_iter()
                    .map(|leaf| self.neighbour_ends[leaf].iter().map(|p| p / 2).collect())
                    .collect(),
            };
            for list in candidates {
                for k in list {
                    let (i, j, _) = self.edges[k];
                    let j = if self.in_blossom[j] == b { i } else { j };
                    let bj = self.in_blossom[j];
                    if bj != b
                        && self.label[bj] == 1
                        && (best_edge_to[bj] == NIL || self.slack(k) < self.slack(best_edge_to[bj]))
                    {
                        best_edge_to[bj] = k;
                    }
                }
            }
            self.best_edge[child] = NIL;
        }

        let best: Vec<usize> = best_edge_to.into_iter().filter(|&k| k != NIL).collect();
        self.best_edge[b] = NIL;
        for &k in &best {
            if self.best_edge[b] == NIL || self.slack(k) < self.slack(self.best_edge[b]) {
                self.best_edge[b] = k;
            }
        }
        self.blossom_best_edges[b] = Some(best);
        Ok(())
    }

    fn expand_blossom(&mut self, b: usize, end_stage: bool) -> Result<(), SwissError> {
        let children = self.blossom_children[b].clone();
        for &s in &children {
            self.blossom_parent[s] = NIL;
            if s < self.n {
                self.in_blossom[s] = s;
            } else if end_stage && self.dual[s] == 0 {
                self.expand_blossom(s, end_stage)?;
            } else {
                for leaf in self.leaves(s) {
                    self.in_blossom[leaf] = s;
                }
            }
        }

        if !end_stage && self.label[b] == 2 {
            // Relabel the children along the even-length path from the
            // entry child to the base.
            let entry_child = self.in_blossom[self.end_point[self.label_end[b] ^ 1]];
            let len = children.len() as isize;
            let mut j = self.child_position(b, entry_child)? as isize;
            let (step, trick): (isize, usize) = if j & 1 != 0 {
                j -= len;
                (1, 0)
            } else {
                (-1, 1)
            };
            let mut p = self.label_end[b];
            while j != 0 {
                let q = cyclic(&self.blossom_endpoints[b], j - trick as isize);
                self.label[self.end_point[p ^ 1]] = 0;
                self.label[self.end_point[q ^ trick ^ 1]] = 0;
                self.assign_label(self.end_point[p ^ 1], 2, p);
                self.allow_edge[q / 2] = true;
                j += step;
                p = cyclic(&self.blossom_endpoints[b], j - trick as isize) ^ trick;
                self.allow_edge[p / 2] = true;
                j += step;
            }
            let bv = cyclic(&children, j);
            let entry = self.end_point[p ^ 1];
            self.label[entry] = 2;
            self.label[bv] = 2;
            self.label_end[entry] = p;
            self.label_end[bv] = p;
            self.best_edge[bv] = NIL;
            j += step;
            while cyclic(&children, j) != entry_child {
                let bv = cyclic(&children, j);
                if self.label[bv] == 1 {
                    j += step;
                    continue;
                }
                let reached = self.leaves(bv).into_iter().find(|&v| self.label[v] != 0);
                if let Some(v) = reached {
                    self.label[v] = 0;
                    let base_mate = self.mate[self.blossom_base[bv]];
                    self.label[self.end_point[base_mate]] = 0;
                    let end = self.label_end[v];
                    self.assign_label(v, 2, end);
                }
                j += step;
            }
        }

        self.label[b] = -1;
        self.label_end[b] = NIL;
        self.blossom_children[b].clear();
        self.blossom_endpoints[b].clear();
        self.blossom_base[b] = NIL;
        self.blossom_best_edges[b] = None;
        self.best_edge[b] = NIL;
        self.unused_blossoms.push(b);
        Ok(())
    }

    /// Swaps matched and unmatched edges along the path through blossom `b`
    /// from vertex `v` to the base, making `v` the new base.
    fn augment_blossom(&mut self, b: usize, v: usize) -> Result<(), SwissError> {
        let mut t = v;
        while self.blossom_parent[t] != b {
            t = self.blossom_parent[t];
        }
        if t >= self.n {
            self.augment_blossom(t, v)?;
        }
        let i = self.child_position(b, t)?;
        let len = self.blossom_children[b].len() as isize;
        let mut j = i as isize;
        let (step, trick): (isize, usize) = if i & 1 != 0 {
            j -= len;
            (1, 0)
        } else {
            (-1, 1)
        };
        while j != 0 {
            j += step;
            let t = cyclic(&self.blossom_children[b], j);
            let p = cyclic(&self.blossom_endpoints[b], j - trick as isize) ^ trick;
            if t >= self.n {
                self.augment_blossom(t, self.end_point[p])?;
            }
            j += step;
            let t = cyclic(&self.blossom_children[b], j);
            if t >= self.n {
                self.augment_blossom(t, self.end_point[p ^ 1])?;
            }
            self.mate[self.end_point[p]] = p ^ 1;
            self.mate[self.end_point[p ^ 1]] = p;
        }
        self.blossom_children[b].rotate_left(i);
        self.blossom_endpoints[b].rotate_left(i);
        self.blossom_base[b] = self.blossom_base[self.blossom_children[b][0]];
        Ok(())
    }

    fn augment_matching(&mut self, k: usize) -> Result<(), SwissError> {
        let (v, w, _) = self.edges[k];
        for (start, first_end) in [(v, 2 * k + 1), (w, 2 * k)] {
            let (mut s, mut p) = (start, first_end);
            loop {
                let bs = self.in_blossom[s];
                if bs >= self.n {
                    self.augment_blossom(bs, s)?;
                }
                self.mate[s] = p;
                if self.label_end[bs] == NIL {
                    // reached a single free vertex
                    break;
                }
                let t = self.end_point[self.label_end[bs]];
                let bt = self.in_blossom[t];
                s = self.end_point[self.label_end[bt]];
                let j = self.end_point[self.label_end[bt] ^ 1];
                if bt >= self.n {
                    self.augment_blossom(bt, j)?;
                }
                self.mate[j] = self.label_end[bt];
                p = self.label_end[bt] ^ 1;
            }
        }
        Ok(())
    }

    fn min_vertex_dual(&self) -> i64 {
        self.dual[..self.n].iter().copied().min().unwrap_or(0)
    }

    fn next_delta(&self, max_cardinality: bool) -> (Delta, i64) {
        let mut best: Option<(Delta, i64)> = None;
        let mut consider = |delta: Delta, value: i64| {
            if best.is_none_or(|(_, current)| value < current) {
                best = Some((delta, value));
            }
        };

        if !max_cardinality {
            consider(Delta::Stop, self.min_vertex_dual());
        }
        for v in 0..self.n {
            if self.label[self.in_blossom[v]] == 0 && self.best_edge[v] != NIL {
                consider(Delta::GrowEdge(self.best_edge[v]), self.slack(self.best_edge[v]));
            }
        }
        for b in 0..2 * self.n {
            if self.blossom_parent[b] == NIL && self.label[b] == 1 && self.best_edge[b] != NIL {
                consider(
                    Delta::BlossomEdge(self.best_edge[b]),
                    self.slack(self.best_edge[b]) / 2,
                );
            }
        }
        for b in self.n..2 * self.n {
            if self.blossom_base[b] != NIL && self.blossom_parent[b] == NIL && self.label[b] == 2 {
                consider(Delta::Expand(b), self.dual[b]);
            }
        }

        best.unwrap_or((Delta::Stop, self.min_vertex_dual().max(0)))
    }

    fn solve(mut self, max_cardinality: bool) -> Result<Vec<Option<usize>>, SwissError> {
        let n = self.n;
        for _stage in 0..n {
            self.label.fill(0);
            self.best_edge.fill(NIL);
            for b in n..2 * n {
                self.blossom_best_edges[b] = None;
            }
            self.allow_edge.fill(false);
            self.queue.clear();

            for v in 0..n {
                if self.mate[v] == NIL && self.label[self.in_blossom[v]] == 0 {
                    self.assign_label(v, 1, NIL);
                }
            }

            let mut augmented = false;
            loop {
                while !augmented {
                    let Some(v) = self.queue.pop() else { break };
                    for idx in 0..self.neighbour_ends[v].len() {
                        let p = self.neighbour_ends[v][idx];
                        let k = p / 2;
                        let w = self.end_point[p];
                        if self.in_blossom[v] == self.in_blossom[w] {
                            continue;
                        }
                        let mut kslack = 0;
                        if !self.allow_edge[k] {
                            kslack = self.slack(k);
                            if kslack <= 0 {
                                self.allow_edge[k] = true;
                            }
                        }
                        if self.allow_edge[k] {
                            if self.label[self.in_blossom[w]] == 0 {
                                self.assign_label(w, 2, p ^ 1);
                            } else if self.label[self.in_blossom[w]] == 1 {
                                let base = self.scan_blossom(v, w);
                                if base != NIL {
                                    self.add_blossom(base, k)?;
                                } else {
                                    self.augment_matching(k)?;
                                    augmented = true;
                                    break;
                                }
                            } else if self.label[w] == 0 {
                                self.label[w] = 2;
                                self.label_end[w] = p ^ 1;
                            }
                        } else if self.label[self.in_blossom[w]] == 1 {
                            let b = self.in_blossom[v];
                            if self.best_edge[b] == NIL || kslack < self.slack(self.best_edge[b]) {
                                self.best_edge[b] = k;
                            }
                        } else if self.label[w] == 0
                            && (self.best_edge[w] == NIL || kslack < self.slack(self.best_edge[w]))
                        {
                            self.best_edge[w] = k;
                        }
                    }
                }
                if augmented {
                    break;
                }

                let (delta, amount) = self.next_delta(max_cardinality);
                for v in 0..n {
                    match self.label[self.in_blossom[v]] {
                        1 => self.dual[v] -= amount,
                        2 => self.dual[v] += amount,
                        _ => {}
                    }
                }
                for b in n..2 * n {
                    if self.blossom_base[b] != NIL && self.blossom_parent[b] == NIL {
                        match self.label[b] {
                            1 => self.dual[b] += amount,
                            2 => self.dual[b] -= amount,
                            _ => {}
                        }
                    }
                }

                match delta {
                    Delta::Stop => break,
                    Delta::GrowEdge(k) => {
                        self.allow_edge[k] = true;
                        let (i, j, _) = self.edges[k];
                        let i = if self.label[self.in_blossom[i]] == 0 { j } else { i };
                        self.queue.push(i);
                    }
                    Delta::BlossomEdge(k) => {
                        self.allow_edge[k] = true;
                        self.queue.push(self.edges[k].0);
                    }
                    Delta::Expand(b) => self.expand_blossom(b, false)?,
                }
            }

            if !augmented {
                break;
            }
            for b in n..2 * n {
                if self.blossom_parent[b] == NIL
                    && self.blossom_base[b] != NIL
                    && self.label[b] == 1
                    && self.dual[b] == 0
                {
                    self.expand_blossom(b, true)?;
                }
            }
        }

        Ok(self
            .mate
            .iter()
            .map(|&p| (p != NIL).then(|| self.end_point[p]))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mates(expected: &[Option<usize>]) -> Vec<Option<usize>> {
        expected.to_vec()
    }

    fn total(edges: &[(usize, usize, i64)], mate: &[Option<usize>]) -> (usize, i64) {
        let mut count = 0;
        let mut weight = 0;
        for &(i, j, w) in edges {
            if mate[i] == Some(j) && mate[j] == Some(i) {
                count += 1;
                weight += w;
            }
        }
        (count, weight)
    }

    fn brute_force(n: usize, edges: &[(usize, usize, i64)], max_cardinality: bool) -> (usize, i64) {
        fn walk(
            k: usize,
            edges: &[(usize, usize, i64)],
            used: &mut Vec<bool>,
            acc: (usize, i64),
            best: &mut Vec<(usize, i64)>,
        ) {
            if k == edges.len() {
                best.push(acc);
                return;
            }
            walk(k + 1, edges, used, acc, best);
            let (i, j, w) = edges[k];
            if !used[i] && !used[j] {
                used[i] = true;
                used[j] = true;
                walk(k + 1, edges, used, (acc.0 + 1, acc.1 + w), best);
                used[i] = false;
                used[j] = false;
            }
        }
        let mut all = Vec::new();
        walk(0, edges, &mut vec![false; n], (0, 0), &mut all);
        if max_cardinality {
            all.into_iter().max().unwrap_or((0, 0))
        } else {
            all.into_iter()
                .max_by_key(|&(count, weight)| (weight, std::cmp::Reverse(count)))
                .map(|(_, weight)| (0, weight))
                .unwrap_or((0, 0))
        }
    }

    #[test]
    fn test_empty_and_single_edge() {
        assert_eq!(max_weight_matching(3, &[], true).unwrap(), vec![None, None, None]);
        assert_eq!(
            max_weight_matching(2, &[(0, 1, 1)], false).unwrap(),
            mates(&[Some(1), Some(0)])
        );
    }

    #[test]
    fn test_heavier_edge_wins_unless_cardinality_required() {
        let edges = [(1, 2, 5), (2, 3, 11), (3, 4, 5)];
        assert_eq!(
            max_weight_matching(5, &edges, false).unwrap(),
            mates(&[None, None, Some(3), Some(2), None])
        );
        assert_eq!(
            max_weight_matching(5, &edges, true).unwrap(),
            mates(&[None, Some(2), Some(1), Some(4), Some(3)])
        );
    }

    #[test]
    fn test_negative_weights() {
        let edges = [(1, 2, 2), (1, 3, -2), (2, 3, 1), (2, 4, -1), (3, 4, -6)];
        assert_eq!(
            max_weight_matching(5, &edges, false).unwrap(),
            mates(&[None, Some(2), Some(1), None, None])
        );
        assert_eq!(
            max_weight_matching(5, &edges, true).unwrap(),
            mates(&[None, Some(3), Some(4), Some(1), Some(2)])
        );
    }

    #[test]
    fn test_blossoms() {
        let s_blossom = [(1, 2, 8), (1, 3, 9), (2, 3, 10), (3, 4, 7), (1, 6, 5), (4, 5, 6)];
        assert_eq!(
            max_weight_matching(7, &s_blossom, false).unwrap(),
            mates(&[None, Some(6), Some(3), Some(2), Some(5), Some(4), Some(1)])
        );

        let t_blossom = [(1, 2, 9), (1, 3, 8), (2, 3, 10), (1, 4, 5), (4, 5, 4), (1, 6, 3)];
        assert_eq!(
            max_weight_matching(7, &t_blossom, false).unwrap(),
            mates(&[None, Some(6), Some(3), Some(2), Some(5), Some(4), Some(1)])
        );

        let nested = [
            (1, 2, 9),
            (1, 3, 9),
            (2, 3, 10),
            (2, 4, 8),
            (3, 5, 8),
            (4, 5, 10),
            (5, 6, 6),
        ];
        assert_eq!(
            max_weight_matching(7, &nested, false).unwrap(),
            mates(&[None, Some(3), Some(4), Some(1), Some(2), Some(6), Some(5)])
        );
    }

    #[test]
    fn test_matches_brute_force_on_small_graphs() {
        let mut seed: u64 = 0x2545_f491_4f6c_dd1d;
        let mut next = move |bound: u64| {
            seed ^= seed << 13;
            seed ^= seed >> 7;
            seed ^= seed << 17;
            seed % bound
        };
        for _ in 0..300 {
            let n = 2 + next(7) as usize;
            let mut edges = Vec::new();
            for i in 0..n {
                for j in (i + 1)..n {
                    if next(100) < 55 {
                        edges.push((i, j, 1 + next(20) as i64));
                    }
                }
            }
            for max_cardinality in [false, true] {
                let mate = max_weight_matching(n, &edges, max_cardinality).unwrap();
                for (v, m) in mate.iter().enumerate() {
                    if let Some(m) = m {
                        assert_eq!(mate[*m], Some(v));
                    }
                }
                let (count, weight) = total(&edges, &mate);
                let (best_count, best_weight) = brute_force(n, &edges, max_cardinality);
                if max_cardinality {
                    assert_eq!((count, weight), (best_count, best_weight), "{edges:?}");
                } else {
                    assert_eq!(weight, best_weight, "{edges:?}");
                }
            }
        }
    }

    #[test]
    fn test_broken_blossom_state_is_an_error() {
        let edges = [(0, 1, 4), (1, 2, 4), (0, 2, 4)];
        let mut state = Blossom::new(3, &edges);
        assert!(matches!(
            state.child_position(3, 0),
            Err(SwissError::PairingIncomplete(_))
        ));

        state.unused_blossoms.clear();
        assert!(matches!(
            state.add_blossom(0, 1),
            Err(SwissError::PairingIncomplete(_))
        ));
    }

    #[test]
    fn test_cross_pairs_outweigh_same_half_pairs() {
        // bracket of 4: half = 2
        assert!(pairing_weight(0, 2, 2) > pairing_weight(0, 1, 2));
        assert!(pairing_weight(0, 3, 2) > pairing_weight(2, 3, 2));
        assert!(pairing_weight(1, 2, 2) > pairing_weight(0, 2, 2));
        assert_eq!(pairing_weight(0, 1, 2), pairing_weight(2, 3, 2));
    }
}
