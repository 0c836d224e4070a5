//! Leading slices of ranked candidate lists.
use serde::{Deserialize, Serialize};

use super::Variant;

/// How much of each ranked list to keep, as whole percentages.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    pub d1_percent: u32,
    pub d2_percent: u32,
}

impl Selection {
    pub const fn new(d1_percent: u32, d2_percent: u32) -> Selection {
        Selection {
            d1_percent,
            d2_percent,
        }
    }

    /// Number of leading entries kept from a list of `len` at `percent`.
    pub fn head(len: usize, percent: u32) -> usize {
        (len * percent as usize / 100).min(len)
    }

    /// The leading share of `d1` followed by the leading share of `d2`.
    pub fn take<'a>(&self, d1: &'a [Variant], d2: &'a [Variant]) -> Vec<&'a Variant> {
        d1[..Self::head(d1.len(), self.d1_percent)]
            .iter()
            .chain(d2[..Self::head(d2.len(), self.d2_percent)].iter())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn list(prefix: &str, n: usize) -> Vec<Variant> {
        (0..n)
            .map(|i| Variant {
                value: format!("{}{}", prefix, i).into(),
                distance: 1,
                probability: 1.0 / (i + 1) as f64,
                secondary: 0.0,
                provenance: "".into(),
            })
            .collect()
    }

    #[test]
    fn floors_percentages() {
        assert_eq!(Selection::head(250, 15), 37);
        assert_eq!(Selection::head(99, 1), 0);
        assert_eq!(Selection::head(10, 100), 10);
        assert_eq!(Selection::head(10, 250), 10);
    }

    #[test]
    fn d1_then_d2() {
        let d1 = list("a", 20);
        let d2 = list("b", 300);
        let picked = Selection::new(15, 1).take(&d1, &d2);
        let values: Vec<&str> = picked.iter().map(|v| v.value()).collect();
        assert_eq!(values, vec!["a0", "a1", "a2", "b0", "b1", "b2"]);
    }
}
