/// Running counters of simulation events. Never reset during a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Tracker {
    pub pages_referenced: u64,
    /// First-time maps only
    pub pages_mapped: u64,
    pub page_misses: u64,
    /// Frames taken away from a resident page
    pub frames_taken: u64,
    pub frames_written_to_disk: u64,
    pub frames_recovered_from_disk: u64,
}

impl Tracker {
    /// Counters with their report labels, in report order
    pub fn counters(&self) -> [(&'static str, u64); 6] {
        [
            ("Pages referenced", self.pages_referenced),
            ("Pages mapped", self.pages_mapped),
            ("Page misses", self.page_misses),
            ("Frames taken", self.frames_taken),
            ("Frames written to disk", self.frames_written_to_disk),
            ("Frames recovered from disk", self.frames_recovered_from_disk),
        ]
    }

    pub fn hits(&self) -> u64 {
        self.pages_referenced.saturating_sub(self.page_misses)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_zero() {
        let t = Tracker::default();
        assert!(t.counters().iter().all(|&(_, v)| v == 0));
    }

    #[test]
    fn test_counter_order() {
        let t = Tracker {
            pages_referenced: 1,
            pages_mapped: 2,
            page_misses: 3,
            frames_taken: 4,
            frames_written_to_disk: 5,
            frames_recovered_from_disk: 6,
        };
        let values: Vec<u64> = t.counters().iter().map(|&(_, v)| v).collect();
        assert_eq!(values, vec![1, 2, 3, 4, 5, 6]);
        assert_eq!(t.counters()[0].0, "Pages referenced");
        assert_eq!(t.counters()[5].0, "Frames recovered from disk");
    }

    #[test]
    fn test_hits() {
        let t = Tracker {
            pages_referenced: 10,
            page_misses: 4,
            ..Tracker::default()
        };
        assert_eq!(t.hits(), 6);
    }
}
