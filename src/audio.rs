use std::collections::VecDeque;

/// Bounded queue of audio trigger names fed by the `app::audio::play`
/// binding. The actual playback backend is an external collaborator; it
/// drains this queue once per frame.
pub struct AudioManager {
    enabled: bool,
    capacity: usize,
    triggers: VecDeque<String>,
}

impl AudioManager {
    pub fn new(capacity: usize) -> Self {
        Self { enabled: true, capacity: capacity.max(1), triggers: VecDeque::new() }
    }

    pub fn enabled(&self) -> bool {
        self.enabled
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub fn play(&mut self, trigger: impl Into<String>) {
        if !self.enabled {
            return;
        }
        if self.triggers.len() == self.capacity {
            self.triggers.pop_front();
        }
        self.triggers.push_back(trigger.into());
    }

    pub fn drain(&mut self) -> Vec<String> {
        self.triggers.drain(..).collect()
    }

    pub fn pending(&self) -> impl ExactSizeIterator<Item = &String> {
        self.triggers.iter()
    }

    pub fn clear(&mut self) {
        self.triggers.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn queue_drops_oldest_when_full() {
        let mut audio = AudioManager::new(2);
        audio.play("a");
        audio.play("b");
        audio.play("c");
        assert_eq!(audio.drain(), vec!["b", "c"]);
    }

    #[test]
    fn disabled_manager_swallows_triggers() {
        let mut audio = AudioManager::new(4);
        audio.set_enabled(false);
        audio.play("a");
        assert_eq!(audio.pending().len(), 0);
    }
}
