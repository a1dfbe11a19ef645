use rand::Rng;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SelectError {
    #[error("Cannot select from an empty weighted list")]
    Empty,

    #[error("Cannot select: total weight of {entries} entries is zero")]
    ZeroWeight { entries: usize },
}

/// Items with selection weights.
///
/// Keeps a running cumulative weight per entry so that a draw in
/// `[0, total)` resolves with a binary search. Zero-weight entries are kept
/// but can never be drawn.
#[derive(Debug, Clone)]
pub struct WeightedList<T> {
    entries: Vec<(T, u32)>,
    cumulative: Vec<u64>,
}

impl<T> WeightedList<T> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            cumulative: Vec::new(),
        }
    }

    pub fn push(&mut self, item: T, weight: u32) {
        let total = self.total_weight() + u64::from(weight);
        self.entries.push((item, weight));
        self.cumulative.push(total);
    }

    /// Replace the weight of the first entry matching `pred`.
    /// Returns false if nothing matched.
    pub fn replace_where(
        &mut self,
        pred: impl Fn(&T) -> bool,
        item: T,
        weight: u32,
    ) -> bool {
        match self.entries.iter().position(|(existing, _)| pred(existing)) {
            Some(index) => {
                self.entries[index] = (item, weight);
                self.rebuild();
                true
            }
            None => false,
        }
    }

    /// Drop every entry matching `pred`. Returns how many were removed.
    pub fn remove_where(&mut self, pred: impl Fn(&T) -> bool) -> usize {
        let before = self.entries.len();
        self.entries.retain(|(item, _)| !pred(item));
        let removed = before - self.entries.len();
        if removed > 0 {
            self.rebuild();
        }
        removed
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn total_weight(&self) -> u64 {
        self.cumulative.last().copied().unwrap_or(0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&T, u32)> {
        self.entries.iter().map(|(item, weight)| (item, *weight))
    }

    /// Draw one item with probability proportional to its weight.
    pub fn select<R: Rng>(&self, rng: &mut R) -> Result<&T, SelectError> {
        if self.entries.is_empty() {
            return Err(SelectError::Empty);
        }
        let total = self.total_weight();
        if total == 0 {
            return Err(SelectError::ZeroWeight {
                entries: self.entries.len(),
            });
        }

        let roll = rng.gen_range(0..total);
        // First entry whose cumulative weight exceeds the roll.
        let index = self.cumulative.partition_point(|&c| c <= roll);
        Ok(&self.entries[index].0)
    }

    fn rebuild(&mut self) {
        self.cumulative.clear();
        let mut total = 0u64;
        for (_, weight) in &self.entries {
            total += u64::from(*weight);
            self.cumulative.push(total);
        }
    }
}

impl<T> Default for WeightedList<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> FromIterator<(T, u32)> for WeightedList<T> {
    fn from_iter<I: IntoIterator<Item = (T, u32)>>(iter: I) -> Self {
        let mut list = WeightedList::new();
        for (item, weight) in iter {
            list.push(item, weight);
        }
        list
    }
}
