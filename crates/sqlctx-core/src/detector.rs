//! Domain detection from the tags of selected records.

use std::collections::{BTreeSet, HashMap};

/// Tags seen on the selected records and the most frequent one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Detection {
    pub domains: BTreeSet<String>,
    pub primary: Option<String>,
}

pub struct DomainDetector;

impl DomainDetector {
    /// Count tags across `tag_sets`, visited in order.
    ///
    /// The primary domain is the most frequent tag; ties go to the tag seen
    /// first. Blank tags are ignored.
    pub fn detect<'a, I>(tag_sets: I) -> Detection
    where
        I: IntoIterator<Item = &'a BTreeSet<String>>,
    {
        let mut counts: HashMap<&str, (usize, usize)> = HashMap::new();
        let mut order = 0;

        for tags in tag_sets {
            for tag in tags.iter().map(|t| t.trim()).filter(|t| !t.is_empty()) {
                let entry = counts.entry(tag).or_insert((0, order));
                entry.0 += 1;
                order += 1;
            }
        }

        let primary = counts
            .iter()
            .max_by(|a, b| a.1.0.cmp(&b.1.0).then(b.1.1.cmp(&a.1.1)))
            .map(|(tag, _)| tag.to_string());

        Detection {
            domains: counts.keys().map(|t| t.to_string()).collect(),
            primary,
        }
    }
}
