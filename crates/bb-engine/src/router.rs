//! Track-to-pool routing.

use alloc::collections::BTreeMap;

use bb_ir::{Note, Score, Tick, NEVER};
use slotmap::{new_key_type, SlotMap};

use crate::error::EngineError;
use crate::pool::VoicePool;

new_key_type! {
    /// Key identifying a pool within a router.
    pub struct PoolKey;
}

/// Routes each track id to one voice pool.
///
/// Several tracks may share a pool; the router advances each distinct
/// pool exactly once per step regardless of how many tracks point at it.
#[derive(Default)]
pub struct TrackRouter {
    pools: SlotMap<PoolKey, VoicePool>,
    routes: BTreeMap<u16, PoolKey>,
}

impl TrackRouter {
    /// Create a router with no pools.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a pool and return its key.
    pub fn add_pool(&mut self, pool: VoicePool) -> PoolKey {
        self.pools.insert(pool)
    }

    /// Route `track` to the pool under `key`. Remapping a track is
    /// allowed until playback starts.
    pub fn map_track(&mut self, track: u16, key: PoolKey) {
        self.routes.insert(track, key);
    }

    /// The pool under `key`.
    pub fn pool(&self, key: PoolKey) -> Option<&VoicePool> {
        self.pools.get(key)
    }

    /// Number of registered pools.
    pub fn pool_count(&self) -> usize {
        self.pools.len()
    }

    /// Check that every track the score references has a mapped pool.
    pub fn validate(&self, score: &Score) -> Result<(), EngineError> {
        for track in score.tracks() {
            if !self.routes.contains_key(&track) {
                return Err(EngineError::UnmappedTrack(track));
            }
        }
        Ok(())
    }

    /// Forward `note` to its track's pool.
    pub fn route(&mut self, note: Note) -> Result<(), EngineError> {
        let key = self
            .routes
            .get(&note.track)
            .copied()
            .ok_or(EngineError::UnmappedTrack(note.track))?;
        let pool = self.pools.get_mut(key).ok_or(EngineError::UnmappedTrack(note.track))?;
        pool.assign(note);
        Ok(())
    }

    /// Advance every distinct pool to `time` and return the earliest
    /// wake tick across all of them ([`NEVER`] with no pools).
    pub fn advance(&mut self, time: Tick) -> Tick {
        self.pools
            .values_mut()
            .map(|pool| pool.advance(time))
            .fold(NEVER, Tick::min)
    }

    /// Silence every distinct pool once.
    pub fn silence_all(&mut self) {
        for pool in self.pools.values_mut() {
            pool.silence_all();
        }
    }

    /// Total notes dropped across all pools.
    pub fn dropped_notes(&self) -> u64 {
        self.pools.values().map(VoicePool::dropped_notes).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::{AmplitudeMode, SilentChannel};
    use crate::voice::Voice;

    fn pool_of(size: usize) -> VoicePool {
        let mut pool = VoicePool::new();
        for _ in 0..size {
            pool.add_voice(Voice::new(Box::new(SilentChannel), AmplitudeMode::Soft))
                .unwrap();
        }
        pool
    }

    fn note_on(track: u16, start: u64, duration: u64) -> Note {
        Note::new(0, 69, start, duration, track)
    }

    #[test]
    fn route_to_unmapped_track_fails() {
        let mut router = TrackRouter::new();
        let err = router.route(note_on(3, 0, 100)).unwrap_err();
        assert_eq!(err, EngineError::UnmappedTrack(3));
    }

    #[test]
    fn validate_reports_first_unmapped_track() {
        let mut router = TrackRouter::new();
        let key = router.add_pool(pool_of(1));
        router.map_track(0, key);

        let mut score = Score::default();
        score.push(note_on(0, 0, 100));
        assert_eq!(router.validate(&score), Ok(()));

        score.push(note_on(2, 0, 100));
        assert_eq!(router.validate(&score), Err(EngineError::UnmappedTrack(2)));
    }

    #[test]
    fn tracks_can_share_a_pool() {
        let mut router = TrackRouter::new();
        let key = router.add_pool(pool_of(2));
        router.map_track(0, key);
        router.map_track(1, key);

        router.route(note_on(0, 0, 100)).unwrap();
        router.route(note_on(1, 0, 200)).unwrap();
        assert_eq!(router.pool(key).unwrap().busy_count(), 2);

        // One advance covers both tracks; wake is the earliest note end.
        assert_eq!(router.advance(0), 100);
    }

    #[test]
    fn advance_aggregates_across_pools() {
        let mut router = TrackRouter::new();
        let a = router.add_pool(pool_of(1));
        let b = router.add_pool(pool_of(1));
        router.map_track(0, a);
        router.map_track(1, b);

        router.route(note_on(0, 0, 300)).unwrap();
        router.route(note_on(1, 0, 120)).unwrap();
        assert_eq!(router.pool_count(), 2);
        assert_eq!(router.advance(0), 120);
    }

    #[test]
    fn advance_with_no_pools_is_never() {
        let mut router = TrackRouter::new();
        assert_eq!(router.advance(0), NEVER);
    }

    #[test]
    fn silence_all_quiets_every_pool() {
        let mut router = TrackRouter::new();
        let a = router.add_pool(pool_of(1));
        let b = router.add_pool(pool_of(1));
        router.map_track(0, a);
        router.map_track(1, b);
        router.route(note_on(0, 0, 300)).unwrap();
        router.route(note_on(1, 0, 300)).unwrap();

        router.silence_all();
        assert_eq!(router.pool(a).unwrap().busy_count(), 0);
        assert_eq!(router.pool(b).unwrap().busy_count(), 0);
    }

    #[test]
    fn dropped_notes_sum_across_pools() {
        let mut router = TrackRouter::new();
        let key = router.add_pool(pool_of(1));
        router.map_track(0, key);
        router.map_track(1, key);

        router.route(note_on(0, 0, 100)).unwrap();
        // Pool saturated by a distinct track: dropped.
        router.route(note_on(1, 50, 100)).unwrap();
        assert_eq!(router.dropped_notes(), 1);
    }
}
