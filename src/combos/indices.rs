/// Lexicographic `k`-subsets of `0..n`, each yielded as strictly increasing
/// indices. `C(n, k)` items, never permutations.
#[derive(Debug, Clone)]
pub struct IndexCombinations {
    n: usize,
    k: usize,
    indices: Vec<usize>,
    started: bool,
    done: bool,
}

impl IndexCombinations {
    pub fn new(n: usize, k: usize) -> Self {
        Self {
            n,
            k,
            indices: (0..k).collect(),
            started: false,
            done: k == 0 || k > n,
        }
    }
}

impl Iterator for IndexCombinations {
    type Item = Vec<usize>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        if !self.started {
            self.started = true;
            return Some(self.indices.clone());
        }

        let Some(pivot) = (0..self.k).rev().find(|&i| self.indices[i] < self.n - self.k + i) else {
            self.done = true;
            return None;
        };
        self.indices[pivot] += 1;
        for i in (pivot + 1)..self.k {
            self.indices[i] = self.indices[i - 1] + 1;
        }
        Some(self.indices.clone())
    }
}

/// Ordered splits of `total` into `parts` positive counts, lexicographic.
pub fn compositions(total: usize, parts: usize) -> Vec<Vec<usize>> {
    let mut out = Vec::new();
    if parts == 0 || total < parts {
        return out;
    }
    let mut current = Vec::with_capacity(parts);
    fill_compositions(total, parts, &mut current, &mut out);
    out
}

fn fill_compositions(remaining: usize, parts: usize, current: &mut Vec<usize>, out: &mut Vec<Vec<usize>>) {
    if parts == 1 {
        current.push(remaining);
        out.push(current.clone());
        current.pop();
        return;
    }
    for count in 1..=(remaining - (parts - 1)) {
        current.push(count);
        fill_compositions(remaining - count, parts - 1, current, out);
        current.pop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn yields_choose_k_in_lexicographic_order() {
        let all: Vec<Vec<usize>> = IndexCombinations::new(4, 2).collect();
        assert_eq!(
            all,
            vec![
                vec![0, 1],
                vec![0, 2],
                vec![0, 3],
                vec![1, 2],
                vec![1, 3],
                vec![2, 3]
            ]
        );
        assert_eq!(IndexCombinations::new(7, 3).count(), 35);
    }

    #[test]
    fn empty_when_k_exceeds_n() {
        assert_eq!(IndexCombinations::new(2, 3).count(), 0);
        assert_eq!(IndexCombinations::new(0, 2).count(), 0);
    }

    #[test]
    fn compositions_cover_every_positive_split() {
        assert_eq!(
            compositions(4, 2),
            vec![vec![1, 3], vec![2, 2], vec![3, 1]]
        );
        assert_eq!(compositions(3, 3), vec![vec![1, 1, 1]]);
        assert!(compositions(2, 3).is_empty());
    }
}
