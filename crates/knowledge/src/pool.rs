//! Default reply pool — uniform random pick when nothing else applies.

use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use std::sync::Mutex;
use voxbot_core::error::Error;

/// A non-empty list of generic replies.
pub struct DefaultReplyPool {
    replies: Vec<String>,
    rng: Mutex<StdRng>,
}

impl DefaultReplyPool {
    /// Create a pool seeded from the OS. Blank entries are dropped; fails when
    /// nothing is left.
    pub fn new(replies: Vec<String>) -> Result<Self, Error> {
        Self::build(replies, StdRng::from_os_rng())
    }

    /// Create a pool with a fixed seed, for reproducible sessions.
    pub fn with_seed(replies: Vec<String>, seed: u64) -> Result<Self, Error> {
        Self::build(replies, StdRng::seed_from_u64(seed))
    }

    fn build(replies: Vec<String>, rng: StdRng) -> Result<Self, Error> {
        let replies: Vec<String> = replies.into_iter().filter(|r| !r.trim().is_empty()).collect();
        if replies.is_empty() {
            return Err(Error::Config {
                message: "default reply pool must not be empty".into(),
            });
        }
        Ok(Self {
            replies,
            rng: Mutex::new(rng),
        })
    }

    pub fn replies(&self) -> &[String] {
        &self.replies
    }

    /// Pick one reply uniformly at random.
    pub fn pick(&self) -> String {
        let mut rng = match self.rng.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        self.replies
            .choose(&mut *rng)
            .cloned()
            .unwrap_or_default()
    }
}

impl std::fmt::Debug for DefaultReplyPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DefaultReplyPool")
            .field("replies", &self.replies)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn replies() -> Vec<String> {
        vec!["one".into(), "two".into(), "three".into()]
    }

    #[test]
    fn empty_pool_rejected() {
        assert!(DefaultReplyPool::new(vec![]).is_err());
    }

    #[test]
    fn blank_entries_dropped() {
        assert!(DefaultReplyPool::new(vec!["  ".into(), String::new()]).is_err());
        let pool = DefaultReplyPool::new(vec!["".into(), "real".into()]).unwrap();
        assert_eq!(pool.replies(), ["real".to_string()]);
    }

    #[test]
    fn picks_are_members() {
        let pool = DefaultReplyPool::new(replies()).unwrap();
        for _ in 0..50 {
            assert!(pool.replies().contains(&pool.pick()));
        }
    }

    #[test]
    fn every_reply_is_reachable() {
        let pool = DefaultReplyPool::with_seed(replies(), 7).unwrap();
        let seen: HashSet<String> = (0..200).map(|_| pool.pick()).collect();
        assert_eq!(seen.len(), 3);
    }

    #[test]
    fn same_seed_same_sequence() {
        let a = DefaultReplyPool::with_seed(replies(), 42).unwrap();
        let b = DefaultReplyPool::with_seed(replies(), 42).unwrap();
        let seq_a: Vec<String> = (0..10).map(|_| a.pick()).collect();
        let seq_b: Vec<String> = (0..10).map(|_| b.pick()).collect();
        assert_eq!(seq_a, seq_b);
    }

    #[test]
    fn single_reply_pool() {
        let pool = DefaultReplyPool::new(vec!["only".into()]).unwrap();
        assert_eq!(pool.pick(), "only");
    }
}
