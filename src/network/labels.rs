/// How many labels the network view aims to show.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LabelDensity {
    pub base_labels: usize,
    /// Fraction of `base_labels` kept even when almost every node is hidden.
    pub min_ratio: f64,
}

impl Default for LabelDensity {
    fn default() -> Self {
        Self {
            base_labels: 15,
            min_ratio: 0.2,
        }
    }
}

impl LabelDensity {
    pub fn adapted_count(&self, visible: usize, total: usize) -> usize {
        if total == 0 {
            return 0;
        }
        let visible_share = visible.min(total) as f64 / total as f64;
        let ratio = self.min_ratio + (1.0 - self.min_ratio) * visible_share;
        (self.base_labels as f64 * ratio).floor() as usize
    }

    /// Importance a visible node must strictly exceed to get a label.
    pub fn threshold<I>(&self, visible_importance: I, total: usize) -> f64
    where
        I: IntoIterator<Item = f64>,
    {
        let mut ranked = visible_importance.into_iter().collect::<Vec<_>>();
        if total == 0 {
            return f64::INFINITY;
        }

        ranked.sort_by(|a, b| b.total_cmp(a));
        let wanted = self.adapted_count(ranked.len(), total);
        ranked.get(wanted).copied().unwrap_or(0.0)
    }
}
