use crate::config::{Config, ABOUT_PAGE, HOME_PAGE};

/// Immutable page registry computed once from configuration at startup.
///
/// Holds the ordered sequence of every navigable page: home, then the
/// four subpages of each category in config order, then about.
pub struct Navigator {
    order: Vec<u16>,
}

impl Navigator {
    pub fn new(config: &Config) -> Self {
        let mut order = vec![HOME_PAGE];
        for cat in &config.categories {
            order.extend([cat.page, cat.page + 1, cat.page + 2, cat.page + 3]);
        }
        order.push(ABOUT_PAGE);
        Self { order }
    }

    /// The full ordered page sequence.
    pub fn pages(&self) -> &[u16] {
        &self.order
    }

    pub fn contains(&self, page: u16) -> bool {
        self.order.contains(&page)
    }

    /// Previous and next page in sequence; `None` at either boundary or
    /// for pages outside the registry.
    pub fn adjacent(&self, page: u16) -> (Option<u16>, Option<u16>) {
        let Some(idx) = self.order.iter().position(|&p| p == page) else {
            return (None, None);
        };
        let prev = if idx > 0 {
            Some(self.order[idx - 1])
        } else {
            None
        };
        let next = self.order.get(idx + 1).copied();
        (prev, next)
    }
}
