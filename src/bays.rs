use crate::config::ConfigError;
use heapless::Vec;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

pub const BAY_COUNT: usize = 4;

// One bay is pre-booked to mimic a live service center
pub const DEFAULT_BAY_LAYOUT: [BayState; BAY_COUNT] =
    [BayState::Free, BayState::Free, BayState::Free, BayState::Booked];

static_assertions::const_assert!(BAY_COUNT > 0);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BayState {
    Free,
    Booked,
}

/// Externally visible bay entry. `index` is 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BayStatus {
    pub index: usize,
    pub state: BayState,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum BayError {
    #[error("no free service bay")]
    NoFreeBay,
}

/// Fixed table of service bays. Bays only ever move Free -> Booked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BayAllocator {
    bays: Vec<BayState, BAY_COUNT>,
}

impl BayAllocator {
    pub fn new() -> Self {
        Self {
            bays: Vec::from_iter(DEFAULT_BAY_LAYOUT),
        }
    }

    pub fn with_layout(layout: &[BayState]) -> Result<Self, ConfigError> {
        if layout.len() != BAY_COUNT {
            return Err(ConfigError::BayCount {
                expected: BAY_COUNT,
                actual: layout.len(),
            });
        }

        let bays = Vec::from_slice(layout).map_err(|()| ConfigError::BayCount {
            expected: BAY_COUNT,
            actual: layout.len(),
        })?;

        Ok(Self { bays })
    }

    /// Book the lowest-numbered free bay and return its 1-based index.
    pub fn allocate_first_free(&mut self) -> Result<usize, BayError> {
        let (position, bay) = self
            .bays
            .iter_mut()
            .enumerate()
            .find(|(_, state)| **state == BayState::Free)
            .ok_or(BayError::NoFreeBay)?;

        *bay = BayState::Booked;
        debug!(bay = position + 1, "service bay allocated");
        Ok(position + 1)
    }

    pub fn status(&self) -> alloc::vec::Vec<BayStatus> {
        self.bays
            .iter()
            .enumerate()
            .map(|(position, &state)| BayStatus {
                index: position + 1,
                state,
            })
            .collect()
    }

    pub fn state_of(&self, index: usize) -> Option<BayState> {
        index.checked_sub(1).and_then(|i| self.bays.get(i).copied())
    }

    pub fn free_count(&self) -> usize {
        self.bays.iter().filter(|&&s| s == BayState::Free).count()
    }
}

impl Default for BayAllocator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_layout() {
        let bays = BayAllocator::new();
        assert_eq!(bays.free_count(), 3);
        assert_eq!(bays.state_of(4), Some(BayState::Booked));
        assert_eq!(bays.state_of(0), None);
        assert_eq!(bays.state_of(5), None);
    }

    #[test]
    fn test_allocates_in_index_order() {
        let mut bays = BayAllocator::new();
        assert_eq!(bays.allocate_first_free(), Ok(1));
        assert_eq!(bays.allocate_first_free(), Ok(2));
        assert_eq!(bays.allocate_first_free(), Ok(3));
        assert_eq!(bays.allocate_first_free(), Err(BayError::NoFreeBay));
        assert_eq!(bays.free_count(), 0);
    }

    #[test]
    fn test_skips_booked_bays() {
        let mut bays =
            BayAllocator::with_layout(&[BayState::Booked, BayState::Booked, BayState::Free, BayState::Free])
                .unwrap();
        assert_eq!(bays.allocate_first_free(), Ok(3));
        assert_eq!(bays.state_of(3), Some(BayState::Booked));
        assert_eq!(bays.state_of(4), Some(BayState::Free));
    }

    #[test]
    fn test_exhaustion_leaves_table_untouched() {
        let mut bays = BayAllocator::with_layout(&[BayState::Booked; BAY_COUNT]).unwrap();
        let before = bays.clone();
        assert_eq!(bays.allocate_first_free(), Err(BayError::NoFreeBay));
        assert_eq!(bays, before);
    }

    #[test]
    fn test_status_is_one_based() {
        let status = BayAllocator::new().status();
        assert_eq!(status.len(), BAY_COUNT);
        assert_eq!(status[0], BayStatus { index: 1, state: BayState::Free });
        assert_eq!(status[3], BayStatus { index: 4, state: BayState::Booked });
    }

    #[test]
    fn test_rejects_wrong_layout_size() {
        let result = BayAllocator::with_layout(&[BayState::Free; 3]);
        assert!(matches!(result, Err(ConfigError::BayCount { expected: 4, actual: 3 })));
    }
}
