//! Lo-fi player state
//!
//! Tracks which station and track are active and where playback stands.
//! Audio output itself lives in the embedding frontend; this state machine
//! only advances positions and wraps the queue.

use std::time::Duration;

use crate::api::study_api::model::{LofiStation, LofiTrack};

#[derive(Debug, Clone)]
pub struct PlayerState {
    stations: Vec<LofiStation>,
    station_index: usize,
    track_index: usize,
    elapsed: Duration,
    playing: bool,
    volume: f32,
}

impl Default for PlayerState {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl PlayerState {
    pub fn new(stations: Vec<LofiStation>) -> Self {
        Self {
            stations,
            station_index: 0,
            track_index: 0,
            elapsed: Duration::ZERO,
            playing: false,
            volume: 1.0,
        }
    }

    /// Replace the station list, keeping playback stopped at the start.
    pub fn set_stations(&mut self, stations: Vec<LofiStation>) {
        self.stations = stations;
        self.station_index = 0;
        self.track_index = 0;
        self.elapsed = Duration::ZERO;
        self.playing = false;
    }

    pub fn current_station(&self) -> Option<&LofiStation> {
        self.stations.get(self.station_index)
    }

    pub fn current_track(&self) -> Option<&LofiTrack> {
        self.current_station()
            .and_then(|s| s.tracks.get(self.track_index))
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    pub fn volume(&self) -> f32 {
        self.volume
    }

    pub fn set_volume(&mut self, volume: f32) {
        self.volume = volume.clamp(0.0, 1.0);
    }

    /// Switch station and start its first track from the beginning.
    pub fn select_station(&mut self, index: usize) {
        if index < self.stations.len() {
            self.station_index = index;
            self.track_index = 0;
            self.elapsed = Duration::ZERO;
        }
    }

    pub fn toggle(&mut self) {
        if self.current_track().is_some() {
            self.playing = !self.playing;
        }
    }

    pub fn pause(&mut self) {
        self.playing = false;
    }

    fn track_count(&self) -> usize {
        self.current_station().map_or(0, |s| s.tracks.len())
    }

    pub fn next_track(&mut self) {
        let count = self.track_count();
        if count == 0 {
            return;
        }
        self.track_index = (self.track_index + 1) % count;
        self.elapsed = Duration::ZERO;
    }

    pub fn prev_track(&mut self) {
        let count = self.track_count();
        if count == 0 {
            return;
        }
        self.track_index = (self.track_index + count - 1) % count;
        self.elapsed = Duration::ZERO;
    }

    /// Advance playback position, wrapping to the next track when the
    /// current one ends. Returns true when the track changed.
    pub fn tick(&mut self, elapsed: Duration) -> bool {
        if !self.playing {
            return false;
        }
        let Some(track) = self.current_track() else {
            return false;
        };
        let duration = Duration::from_secs(track.duration_secs);
        self.elapsed += elapsed;
        if self.elapsed < duration {
            return false;
        }
        self.next_track();
        true
    }

    /// Position within the current track as a 0.0..=1.0 fraction.
    pub fn progress(&self) -> f32 {
        let Some(track) = self.current_track() else {
            return 0.0;
        };
        if track.duration_secs == 0 {
            return 0.0;
        }
        (self.elapsed.as_secs_f32() / track.duration_secs as f32).min(1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn station(id: &str, track_secs: &[u64]) -> LofiStation {
        LofiStation {
            id: id.to_string(),
            name: format!("Station {}", id),
            cover_url: None,
            tracks: track_secs
                .iter()
                .enumerate()
                .map(|(i, secs)| LofiTrack {
                    title: format!("Track {}", i),
                    url: format!("https://cdn.test/{}/{}.mp3", id, i),
                    duration_secs: *secs,
                })
                .collect(),
        }
    }

    #[test]
    fn empty_player_does_nothing() {
        let mut player = PlayerState::default();
        player.toggle();
        assert!(!player.is_playing());
        assert!(!player.tick(Duration::from_secs(10)));
    }

    #[test]
    fn tick_advances_and_wraps_to_next_track() {
        let mut player = PlayerState::new(vec![station("a", &[120, 90])]);
        player.toggle();
        assert!(player.is_playing());

        assert!(!player.tick(Duration::from_secs(60)));
        assert_eq!(player.elapsed(), Duration::from_secs(60));

        // Crossing the track end moves to the next track.
        assert!(player.tick(Duration::from_secs(60)));
        assert_eq!(player.current_track().unwrap().title, "Track 1");
        assert_eq!(player.elapsed(), Duration::ZERO);
    }

    #[test]
    fn queue_wraps_around_at_the_last_track() {
        let mut player = PlayerState::new(vec![station("a", &[120, 90])]);
        player.next_track();
        player.next_track();
        assert_eq!(player.current_track().unwrap().title, "Track 0");

        player.prev_track();
        assert_eq!(player.current_track().unwrap().title, "Track 1");
    }

    #[test]
    fn paused_player_holds_position() {
        let mut player = PlayerState::new(vec![station("a", &[120])]);
        player.toggle();
        player.tick(Duration::from_secs(30));
        player.pause();
        assert!(!player.tick(Duration::from_secs(30)));
        assert_eq!(player.elapsed(), Duration::from_secs(30));
    }

    #[test]
    fn select_station_resets_position() {
        let mut player = PlayerState::new(vec![station("a", &[120]), station("b", &[60])]);
        player.toggle();
        player.tick(Duration::from_secs(30));

        player.select_station(1);
        assert_eq!(player.current_station().unwrap().id, "b");
        assert_eq!(player.elapsed(), Duration::ZERO);

        // Out-of-range selection is ignored.
        player.select_station(7);
        assert_eq!(player.current_station().unwrap().id, "b");
    }

    #[test]
    fn volume_is_clamped() {
        let mut player = PlayerState::default();
        player.set_volume(1.7);
        assert_eq!(player.volume(), 1.0);
        player.set_volume(-0.3);
        assert_eq!(player.volume(), 0.0);
    }

    #[test]
    fn progress_is_a_fraction_of_the_track() {
        let mut player = PlayerState::new(vec![station("a", &[100])]);
        player.toggle();
        player.tick(Duration::from_secs(25));
        assert!((player.progress() - 0.25).abs() < f32::EPSILON);
    }
}
