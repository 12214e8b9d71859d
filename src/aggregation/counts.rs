use indexmap::IndexMap;

/// Label counter that remembers first-encounter order.
///
/// Rankings break count ties by the order in which a label was first seen.
#[derive(Debug, Clone, Default)]
pub struct LabelCounts {
    counts: IndexMap<String, usize>,
}

impl LabelCounts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, label: &str) {
        match self.counts.get_mut(label) {
            Some(count) => *count += 1,
            None => {
                self.counts.insert(label.to_string(), 1);
            }
        }
    }

    pub fn get(&self, label: &str) -> usize {
        self.counts.get(label).copied().unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }

    /// Entries in first-encounter order.
    pub fn into_entries(self) -> Vec<(String, usize)> {
        self.counts.into_iter().collect()
    }

    /// Entries by count descending; ties keep first-encounter order.
    pub fn into_sorted(self) -> Vec<(String, usize)> {
        let mut counts = self.counts;
        counts.sort_by(|_, a, _, b| b.cmp(a));
        counts.into_iter().collect()
    }
}

impl<'a> FromIterator<&'a str> for LabelCounts {
    fn from_iter<T: IntoIterator<Item = &'a str>>(iter: T) -> Self {
        let mut counts = Self::new();
        for label in iter {
            counts.add(label);
        }
        counts
    }
}
